//! Ray-primitive intersection records and the two fold operations every
//! other component uses to combine candidates.

use crate::primitive::Primitive;
use ember_math::DVec3;

/// A hit along a ray. Absence of a hit is `None`; records with a
/// non-positive parameter are rejected at construction.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    /// Distance along the (unit-direction) ray, strictly positive
    pub t: f64,

    /// True when the ray hit the outward-facing side of the surface
    pub front: bool,

    /// Barycentric coordinates of the hit, meaningful for triangles
    pub barycentric: DVec3,

    /// The primitive that produced this hit
    pub primitive: &'a Primitive,
}

impl<'a> Intersection<'a> {
    /// Record at distance `t`, or `None` when `t <= 0`.
    pub fn new(t: f64, front: bool, primitive: &'a Primitive) -> Option<Self> {
        (t > 0.0).then(|| Self {
            t,
            front,
            barycentric: DVec3::new(1.0, 0.0, 0.0),
            primitive,
        })
    }

    /// Record carrying the barycentric coordinates of a triangle hit.
    pub fn with_barycentric(
        t: f64,
        front: bool,
        barycentric: DVec3,
        primitive: &'a Primitive,
    ) -> Option<Self> {
        (t > 0.0).then(|| Self {
            t,
            front,
            barycentric,
            primitive,
        })
    }
}

/// The present record with the smaller `t`; ties keep `a`. Empty is the
/// identity.
pub fn nearest<'a>(
    a: Option<Intersection<'a>>,
    b: Option<Intersection<'a>>,
) -> Option<Intersection<'a>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// True iff `a` is present and either `b` is empty or `a` hits first.
/// Treats empty as farther than any present record.
pub fn closer(a: &Option<Intersection>, b: &Option<Intersection>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.t < b.t,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::primitive::Primitive;
    use crate::sphere::Sphere;

    fn probe() -> Primitive {
        Primitive::from(Sphere::new(1.0, DVec3::ZERO, Material::default()))
    }

    #[test]
    fn test_non_positive_t_is_empty() {
        let p = probe();
        assert!(Intersection::new(0.0, true, &p).is_none());
        assert!(Intersection::new(-2.0, true, &p).is_none());
        assert!(Intersection::new(1.0, true, &p).is_some());
    }

    #[test]
    fn test_nearest_picks_smaller_t() {
        let p = probe();
        let a = Intersection::new(2.0, true, &p);
        let b = Intersection::new(1.0, false, &p);
        let merged = nearest(a, b).unwrap();
        assert_eq!(merged.t, 1.0);
        assert!(!merged.front);
    }

    #[test]
    fn test_nearest_empty_is_identity() {
        let p = probe();
        let a = Intersection::new(3.0, true, &p);
        assert_eq!(nearest(a, None).unwrap().t, 3.0);
        assert_eq!(nearest(None, a).unwrap().t, 3.0);
        assert!(nearest(None, None).is_none());
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let p = probe();
        let a = Intersection::new(1.0, true, &p);
        let b = Intersection::new(1.0, false, &p);
        assert!(nearest(a, b).unwrap().front);
    }

    #[test]
    fn test_nearest_is_associative() {
        let p = probe();
        let a = Intersection::new(3.0, true, &p);
        let b = Intersection::new(1.0, true, &p);
        let c = Intersection::new(2.0, true, &p);
        let left = nearest(nearest(a, b), c).unwrap();
        let right = nearest(a, nearest(b, c)).unwrap();
        assert_eq!(left.t, right.t);
    }

    #[test]
    fn test_closer_ordering() {
        let p = probe();
        let near = Intersection::new(1.0, true, &p);
        let far = Intersection::new(2.0, true, &p);
        assert!(closer(&near, &far));
        assert!(!closer(&far, &near));
        assert!(closer(&near, &None));
        assert!(!closer(&None, &near));
        assert!(!closer(&None, &None));
    }
}
