//! Infinite plane primitive.

use crate::intersection::Intersection;
use crate::material::Material;
use crate::primitive::Primitive;
use ember_math::{Aabb, DVec3, Point, Ray};

/// A plane through `point` with the given normal.
#[derive(Debug, Clone)]
pub struct Plane {
    point: DVec3,
    normal: DVec3,
    material: Material,
}

impl Plane {
    pub fn new(point: DVec3, normal: DVec3, material: Material) -> Self {
        Self {
            point,
            normal,
            material,
        }
    }

    pub(crate) fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn intersect<'a>(&self, ray: &Ray, owner: &'a Primitive) -> Option<Intersection<'a>> {
        let dp = ray.direction().dot(self.normal);
        if dp == 0.0 {
            // Parallel ray; also covers a degenerate zero normal.
            return None;
        }
        let t = -(ray.origin() - self.point).dot(self.normal) / dp;
        Intersection::new(t, dp < 0.0, owner)
    }

    /// Unit normal oriented toward the side `p` lies on. Hit points are
    /// pulled slightly off the surface toward the ray origin, so the result
    /// faces the incoming ray.
    pub(crate) fn normal(&self, p: &Point) -> DVec3 {
        let n = self.normal.normalize();
        if (p.pos - self.point).dot(n) < 0.0 {
            -n
        } else {
            n
        }
    }

    pub(crate) fn bounding_box(&self) -> Aabb {
        Aabb::INFINITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Primitive {
        Primitive::from(Plane::new(
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::Z,
            Material::default(),
        ))
    }

    #[test]
    fn test_hit_from_above_is_front() {
        let plane = floor();
        let ray = Ray::new(DVec3::new(0.5, 0.5, 2.0), -DVec3::Z);
        let hit = plane.intersect(&ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-9);
        assert!(hit.front);
    }

    #[test]
    fn test_hit_from_below_is_back() {
        let plane = floor();
        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
        let hit = plane.intersect(&ray).unwrap();
        assert!(!hit.front);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = floor();
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(plane.intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_origin_misses() {
        let plane = floor();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 2.0), DVec3::Z);
        assert!(plane.intersect(&ray).is_none());
    }

    #[test]
    fn test_normal_faces_incoming_ray() {
        let plane = floor();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 2.0), -DVec3::Z);
        let hit = plane.intersect(&ray).unwrap();
        let n = plane.normal(&Point::new(ray.at(hit.t)));
        assert!((n.length() - 1.0).abs() < 1e-9);
        assert!(n.dot(-ray.direction()) >= 0.0);
    }

    #[test]
    fn test_degenerate_normal_never_hits() {
        let broken = Primitive::from(Plane::new(DVec3::ZERO, DVec3::ZERO, Material::default()));
        let ray = Ray::new(DVec3::new(0.0, 0.0, 2.0), -DVec3::Z);
        assert!(broken.intersect(&ray).is_none());
    }

    #[test]
    fn test_bounding_box_is_infinite() {
        assert_eq!(floor().bounding_box(), Aabb::INFINITE);
    }
}
