//! The primitive variants and their common dispatch surface.

use crate::intersection::{nearest, Intersection};
use crate::material::{Color, Material};
use crate::mesh::Mesh;
use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use ember_math::{Aabb, DVec3, Point, Ray};

/// An axis-aligned box volume usable as a scene object. The same geometry
/// also backs the BVH nodes through [`Aabb`] directly.
#[derive(Debug, Clone)]
pub struct BoxPrimitive {
    bounds: Aabb,
    material: Material,
}

impl BoxPrimitive {
    pub fn new(p1: DVec3, p2: DVec3, material: Material) -> Self {
        Self {
            bounds: Aabb::new(p1, p2),
            material,
        }
    }

    pub(crate) fn material(&self) -> &Material {
        &self.material
    }

    /// Slab test, merged to the nearest positive boundary crossing: the
    /// entry face is front, the exit face is back.
    pub(crate) fn intersect<'a>(&self, ray: &Ray, owner: &'a Primitive) -> Option<Intersection<'a>> {
        let (enter, exit) = self.bounds.clip(ray)?;
        nearest(
            Intersection::new(enter, true, owner),
            Intersection::new(exit, false, owner),
        )
    }

    /// Not a meaningful surface normal; box volumes are bounding helpers,
    /// not shaded geometry.
    pub(crate) fn normal(&self, _p: &Point) -> DVec3 {
        DVec3::X
    }

    pub(crate) fn bounding_box(&self) -> Aabb {
        self.bounds
    }
}

/// A renderable object: one of the supported geometric variants, each
/// carrying its material.
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Box(BoxPrimitive),
    Mesh(Mesh),
}

impl Primitive {
    /// Closest-hit test against this primitive. Mesh hits reference the
    /// individual triangle that was struck.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray, self),
            Primitive::Plane(p) => p.intersect(ray, self),
            Primitive::Triangle(t) => t.intersect(ray, self),
            Primitive::Box(b) => b.intersect(ray, self),
            Primitive::Mesh(m) => m.intersect(ray),
        }
    }

    /// Unit surface normal at `p`, oriented toward the side the query point
    /// lies on.
    pub fn normal(&self, p: &Point) -> DVec3 {
        match self {
            Primitive::Sphere(s) => s.normal(p),
            Primitive::Plane(pl) => pl.normal(p),
            Primitive::Triangle(t) => t.normal(p),
            Primitive::Box(b) => b.normal(p),
            Primitive::Mesh(m) => m.normal(p),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(),
            Primitive::Plane(p) => p.bounding_box(),
            Primitive::Triangle(t) => t.bounding_box(),
            Primitive::Box(b) => b.bounding_box(),
            Primitive::Mesh(m) => m.bounding_box(),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Primitive::Sphere(s) => s.material(),
            Primitive::Plane(p) => p.material(),
            Primitive::Triangle(t) => t.material(),
            Primitive::Box(b) => b.material(),
            Primitive::Mesh(m) => m.material(),
        }
    }

    /// Whether the object has no interior volume (planes and triangles).
    pub fn is_flat(&self) -> bool {
        matches!(self, Primitive::Plane(_) | Primitive::Triangle(_))
    }

    /// Diffuse reflectance at `p`; triangles may sample a texture.
    pub fn diffuse_color(&self, p: &Point) -> Color {
        match self {
            Primitive::Triangle(t) => t.diffuse_color(p),
            _ => self.material().diffuse,
        }
    }

    /// Specular reflectance at `p`; triangles may sample a texture.
    pub fn specular_color(&self, p: &Point) -> Color {
        match self {
            Primitive::Triangle(t) => t.specular_color(p),
            _ => self.material().specular,
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Plane> for Primitive {
    fn from(p: Plane) -> Self {
        Primitive::Plane(p)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<BoxPrimitive> for Primitive {
    fn from(b: BoxPrimitive) -> Self {
        Primitive::Box(b)
    }
}

impl From<Mesh> for Primitive {
    fn from(m: Mesh) -> Self {
        Primitive::Mesh(m)
    }
}
