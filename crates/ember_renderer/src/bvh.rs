//! Bounding-volume hierarchy over scene primitives.
//!
//! A binary tree built by median split on bounding-box centroids along a
//! randomly drawn axis; leaves hold exactly one primitive. Traversal prunes
//! the far child whenever the near child already produced a closer hit than
//! the far child's box entry, and always returns the globally nearest hit.

use std::cmp::Ordering;

use rand::Rng;

use crate::container::Container;
use crate::intersection::{nearest, Intersection};
use crate::primitive::Primitive;
use ember_math::{Aabb, DVec3, Ray};

enum Node {
    Leaf {
        bounds: Aabb,
        primitive: Primitive,
    },
    Internal {
        bounds: Aabb,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bounds(&self) -> &Aabb {
        match self {
            Node::Leaf { bounds, .. } => bounds,
            Node::Internal { bounds, .. } => bounds,
        }
    }

    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.bounds().entry(ray)?;
        match self {
            Node::Leaf { primitive, .. } => primitive.intersect(ray),
            Node::Internal { left, right, .. } => {
                let first = left.intersect(ray);
                // A positive hit strictly nearer than the point where the
                // ray enters the other child's box cannot be beaten there.
                // A ray starting inside that box has already entered it, so
                // it is never pruned.
                let prune = match (&first, right.bounds().clip(ray)) {
                    (Some(hit), Some((enter, exit))) => hit.t < enter || exit <= 0.0,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if prune {
                    first
                } else {
                    nearest(first, right.intersect(ray))
                }
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// The acceleration index. An empty tree is allowed and never reports hits.
pub struct Bvh {
    root: Option<Node>,
}

impl Bvh {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        let count = primitives.len();
        let items: Vec<(Primitive, Aabb)> = primitives
            .into_iter()
            .map(|primitive| {
                let bounds = primitive.bounding_box();
                (primitive, bounds)
            })
            .collect();

        let mut rng = rand::rng();
        let root = (!items.is_empty()).then(|| Self::build(items, &mut rng));
        log::debug!("built BVH over {} primitives", count);

        Self { root }
    }

    /// Median split: a random axis is drawn, the median-centroid element is
    /// moved to the midpoint in linear time, and both halves recurse.
    fn build(mut items: Vec<(Primitive, Aabb)>, rng: &mut impl Rng) -> Node {
        if items.len() == 1 {
            let (primitive, bounds) = items.remove(0);
            return Node::Leaf { bounds, primitive };
        }

        let axis = rng.random_range(0..3);
        let mid = items.len() / 2;
        items.select_nth_unstable_by(mid, |a, b| {
            centroid_coord(&a.1, axis)
                .partial_cmp(&centroid_coord(&b.1, axis))
                .unwrap_or(Ordering::Equal)
        });

        let upper = items.split_off(mid);
        let left = Self::build(items, rng);
        let right = Self::build(upper, rng);
        let bounds = left.bounds().union(right.bounds());

        Node::Internal {
            bounds,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Bounding box of the whole tree; a degenerate point box when empty.
    pub fn bounding_box(&self) -> Aabb {
        match &self.root {
            Some(node) => *node.bounds(),
            None => Aabb::new(DVec3::ZERO, DVec3::ZERO),
        }
    }

    /// Number of stored primitives.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, Node::leaf_count)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl Container for Bvh {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.root.as_ref().and_then(|node| node.intersect(ray))
    }
}

fn centroid_coord(bounds: &Aabb, axis: usize) -> f64 {
    let centroid = bounds.centroid();
    match axis {
        0 => centroid.x,
        1 => centroid.y,
        _ => centroid.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::PrimitiveList;
    use crate::material::Material;
    use crate::plane::Plane;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_grid() -> Vec<Primitive> {
        let mut primitives = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    primitives.push(Primitive::from(Sphere::new(
                        0.3,
                        DVec3::new(x as f64 * 2.0, y as f64 * 2.0, z as f64 * 2.0 + 5.0),
                        Material::default(),
                    )));
                }
            }
        }
        primitives
    }

    #[test]
    fn test_empty_tree_misses() {
        let bvh = Bvh::new(Vec::new());
        assert!(bvh.is_empty());
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(bvh.intersect(&ray).is_none());
    }

    #[test]
    fn test_one_leaf_per_primitive() {
        let bvh = Bvh::new(sphere_grid());
        assert_eq!(bvh.len(), 64);
    }

    #[test]
    fn test_single_primitive_is_leaf_hit() {
        let bvh = Bvh::new(vec![Primitive::from(Sphere::new(
            1.0,
            DVec3::new(4.0, 0.0, 0.0),
            Material::default(),
        ))]);
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let hit = bvh.intersect(&ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_traversal_matches_naive_list() {
        let bvh = Bvh::new(sphere_grid());
        let list = PrimitiveList::new(sphere_grid());

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let origin = DVec3::new(
                rng.random_range(-4.0..12.0),
                rng.random_range(-4.0..12.0),
                rng.random_range(-4.0..4.0),
            );
            let direction = DVec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(0.1..1.0),
            );
            let ray = Ray::new(origin, direction);

            let from_bvh = bvh.intersect(&ray);
            let from_list = list.intersect(&ray);
            match (from_bvh, from_list) {
                (None, None) => {}
                (Some(a), Some(b)) => assert!((a.t - b.t).abs() < 1e-12),
                _ => panic!("BVH and naive list disagree on hit presence"),
            }
        }
    }

    #[test]
    fn test_closer_plane_is_not_pruned() {
        // The ray starts inside the plane's (infinite) box, so the sphere
        // hit must not cut the traversal short of the closer floor hit.
        let direction = DVec3::new(6.0, 0.0, -1.5);
        let floor_t = direction.length() / 1.5;
        for _ in 0..32 {
            let bvh = Bvh::new(vec![
                Primitive::from(Sphere::new(
                    1.0,
                    DVec3::new(6.0, 0.0, -1.5),
                    Material::default(),
                )),
                Primitive::from(Plane::new(
                    DVec3::new(0.0, 0.0, -1.0),
                    DVec3::Z,
                    Material::default(),
                )),
            ]);
            // Hits the floor at t ~ 4.1 and the sphere at t ~ 5.2.
            let ray = Ray::new(DVec3::ZERO, direction);
            let hit = bvh.intersect(&ray).unwrap();
            assert!((hit.t - floor_t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_infinite_plane_in_tree() {
        let mut primitives = sphere_grid();
        primitives.push(Primitive::from(Plane::new(
            DVec3::new(0.0, 0.0, 20.0),
            DVec3::Z,
            Material::default(),
        )));
        let bvh = Bvh::new(primitives);

        // A ray past all spheres still reaches the plane.
        let ray = Ray::new(DVec3::new(100.0, 100.0, 0.0), DVec3::Z);
        let hit = bvh.intersect(&ray).unwrap();
        assert!((hit.t - 20.0).abs() < 1e-9);
    }
}
