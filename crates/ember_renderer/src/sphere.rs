//! Sphere primitive.

use crate::intersection::{nearest, Intersection};
use crate::material::Material;
use crate::primitive::Primitive;
use ember_math::{Aabb, DVec3, Point, Ray};

/// A sphere, defined by a radius and a center.
#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f64,
    center: DVec3,
    material: Material,
}

impl Sphere {
    pub fn new(radius: f64, center: DVec3, material: Material) -> Self {
        Self {
            radius,
            center,
            material,
        }
    }

    pub(crate) fn material(&self) -> &Material {
        &self.material
    }

    /// Roots of the quadratic |o + t d - c|^2 = r^2, merged to the closest
    /// positive one. The root subtracting the discriminant is the entry
    /// (front-facing) hit.
    pub(crate) fn intersect<'a>(&self, ray: &Ray, owner: &'a Primitive) -> Option<Intersection<'a>> {
        let b = ray.direction().dot(ray.origin() - self.center);
        let delta = 4.0
            * (b * b - (self.center - ray.origin()).length_squared() + self.radius * self.radius);
        if delta < 0.0 {
            return None;
        }
        let sq = delta.sqrt();
        let entry = Intersection::new((-2.0 * b - sq) / 2.0, true, owner);
        let exit = Intersection::new((-2.0 * b + sq) / 2.0, false, owner);
        nearest(entry, exit)
    }

    /// Unit normal at `p`: outward, or inward when `p` lies strictly inside
    /// the sphere (entry hits seen from inside).
    pub(crate) fn normal(&self, p: &Point) -> DVec3 {
        let direction = p.pos - self.center;
        let inside = direction.length_squared() < self.radius * self.radius;
        let n = direction.normalize();
        if inside {
            -n
        } else {
            n
        }
    }

    pub(crate) fn bounding_box(&self) -> Aabb {
        let offset = DVec3::splat(self.radius);
        Aabb::new(self.center - offset, self.center + offset)
    }
}
