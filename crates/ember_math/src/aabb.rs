use crate::Ray;
use glam::DVec3;
use std::ops::BitOr;

/// Axis-aligned bounding box, stored as its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box spanning the two given corners, in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box containing every point; the bounding box of a plane.
    pub const INFINITE: Aabb = Aabb {
        min: DVec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        max: DVec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
    };

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn centroid(&self) -> DVec3 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, p: DVec3) -> bool {
        self.min.x <= p.x
            && p.x <= self.max.x
            && self.min.y <= p.y
            && p.y <= self.max.y
            && self.min.z <= p.z
            && p.z <= self.max.z
    }

    /// Slab test: the parameter interval over which the ray is inside the
    /// box, or `None` when the ray misses the slabs entirely.
    pub fn clip(&self, ray: &Ray) -> Option<(f64, f64)> {
        let inv = ray.direction().recip();
        let t0 = (self.min - ray.origin()) * inv;
        let t1 = (self.max - ray.origin()) * inv;
        let enter = t0.min(t1).max_element();
        let exit = t0.max(t1).min_element();
        (enter <= exit).then_some((enter, exit))
    }

    /// Closest strictly-positive crossing of the box boundary, with a flag
    /// telling whether it is the entry face. `None` when the box is missed
    /// or lies entirely behind the origin.
    pub fn entry(&self, ray: &Ray) -> Option<(f64, bool)> {
        let (enter, exit) = self.clip(ray)?;
        if enter > 0.0 {
            Some((enter, true))
        } else if exit > 0.0 {
            Some((exit, false))
        } else {
            None
        }
    }
}

impl BitOr for Aabb {
    type Output = Aabb;

    fn bitor(self, rhs: Aabb) -> Aabb {
        self.union(&rhs)
    }
}
