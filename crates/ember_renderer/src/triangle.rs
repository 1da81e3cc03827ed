//! Triangle primitive with per-vertex normals and optional textures.

use std::sync::Arc;

use crate::intersection::Intersection;
use crate::material::{Color, Material};
use crate::primitive::Primitive;
use ember_core::TexelGrid;
use ember_math::{Aabb, DVec3, Point, Ray};

/// A triangle with smoothed vertex normals. Triangles of a textured mesh
/// additionally carry shared texel grids and per-vertex UV coordinates.
#[derive(Clone)]
pub struct Triangle {
    p1: DVec3,
    p2: DVec3,
    p3: DVec3,

    /// Normal of the embedding plane, oriented into the same half-space as
    /// the first vertex normal. Zero for degenerate triangles, which then
    /// never intersect.
    normal_plane: DVec3,

    n1: DVec3,
    n2: DVec3,
    n3: DVec3,

    diffuse_texture: Option<Arc<TexelGrid>>,
    specular_texture: Option<Arc<TexelGrid>>,

    has_uv: bool,
    uv1: [f64; 2],
    uv2: [f64; 2],
    uv3: [f64; 2],

    material: Material,
}

impl Triangle {
    pub fn new(vertices: [DVec3; 3], normals: [DVec3; 3], material: Material) -> Self {
        let [p1, p2, p3] = vertices;
        let [n1, n2, n3] = normals;

        let cross = (p2 - p1).cross(p3 - p1);
        let mut normal_plane = if cross.length_squared() > 0.0 {
            cross.normalize()
        } else {
            DVec3::ZERO
        };
        if normal_plane.dot(n1) < 0.0 {
            normal_plane = -normal_plane;
        }

        Self {
            p1,
            p2,
            p3,
            normal_plane,
            n1: n1.normalize(),
            n2: n2.normalize(),
            n3: n3.normalize(),
            diffuse_texture: None,
            specular_texture: None,
            has_uv: false,
            uv1: [0.0; 2],
            uv2: [0.0; 2],
            uv3: [0.0; 2],
            material,
        }
    }

    /// Attach shared texel grids and per-vertex UVs. Without UVs the grids
    /// are kept but color lookups fall back to the material.
    pub fn with_textures(
        mut self,
        diffuse_texture: Option<Arc<TexelGrid>>,
        specular_texture: Option<Arc<TexelGrid>>,
        uvs: Option<[[f64; 2]; 3]>,
    ) -> Self {
        self.diffuse_texture = diffuse_texture;
        self.specular_texture = specular_texture;
        if let Some([uv1, uv2, uv3]) = uvs {
            self.has_uv = true;
            self.uv1 = uv1;
            self.uv2 = uv2;
            self.uv3 = uv3;
        }
        self
    }

    pub(crate) fn material(&self) -> &Material {
        &self.material
    }

    /// Barycentric coordinates of `p`, assumed to lie in the embedding
    /// plane. `None` when the triangle is degenerate.
    fn barycentric(&self, p: DVec3) -> Option<DVec3> {
        let v0 = self.p3 - self.p1;
        let v1 = self.p2 - self.p1;
        let v2 = p - self.p1;
        let dot00 = v0.length_squared();
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.length_squared();
        let dot12 = v1.dot(v2);
        let denom = dot00 * dot11 - dot01 * dot01;
        if denom == 0.0 {
            return None;
        }
        let inv_denom = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;
        Some(DVec3::new(1.0 - u - v, v, u))
    }

    /// Plane intersection followed by a strict barycentric inside test:
    /// hits exactly on an edge or vertex are rejected.
    pub(crate) fn intersect<'a>(&self, ray: &Ray, owner: &'a Primitive) -> Option<Intersection<'a>> {
        let dp = ray.direction().dot(self.normal_plane);
        if dp == 0.0 {
            return None;
        }
        let t = -(ray.origin() - self.p1).dot(self.normal_plane) / dp;
        let bary = self.barycentric(ray.at(t))?;
        if bary.x > 0.0 && bary.y > 0.0 && bary.z > 0.0 {
            Intersection::with_barycentric(t, dp < 0.0, bary, owner)
        } else {
            None
        }
    }

    /// Smoothed normal: vertex normals blended by the barycentric weights
    /// carried in `p`, oriented toward the side the (shrunk) hit point lies
    /// on.
    pub(crate) fn normal(&self, p: &Point) -> DVec3 {
        let n = (p.bary.x * self.n1 + p.bary.y * self.n2 + p.bary.z * self.n3).normalize();
        if (self.p1 - p.pos).dot(self.normal_plane) < 0.0 {
            n
        } else {
            -n
        }
    }

    pub(crate) fn bounding_box(&self) -> Aabb {
        Aabb::new(
            self.p1.min(self.p2).min(self.p3),
            self.p1.max(self.p2).max(self.p3),
        )
    }

    pub(crate) fn diffuse_color(&self, p: &Point) -> Color {
        match &self.diffuse_texture {
            Some(grid) if self.has_uv => self.sample_texture(grid, p),
            _ => self.material.diffuse,
        }
    }

    pub(crate) fn specular_color(&self, p: &Point) -> Color {
        match &self.specular_texture {
            Some(grid) if self.has_uv => self.sample_texture(grid, p),
            _ => self.material.specular,
        }
    }

    fn sample_texture(&self, grid: &TexelGrid, p: &Point) -> Color {
        let u = p.bary.x * self.uv1[0] + p.bary.y * self.uv2[0] + p.bary.z * self.uv3[0];
        let v = p.bary.x * self.uv1[1] + p.bary.y * self.uv2[1] + p.bary.z * self.uv3[1];
        // NOTE: the first UV coordinate is scaled by the grid HEIGHT and the
        // second by the WIDTH. The axes look transposed, but reference
        // renders depend on this mapping; do not "fix" it.
        grid.sample(u * grid.height as f64, v * grid.width as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_triangle() -> Primitive {
        // Sits in the x = 2 plane, facing the origin.
        Primitive::from(Triangle::new(
            [
                DVec3::new(2.0, -1.0, -1.0),
                DVec3::new(2.0, 1.0, -1.0),
                DVec3::new(2.0, 0.0, 1.0),
            ],
            [-DVec3::X, -DVec3::X, -DVec3::X],
            Material::matte(Color::new(0.2, 0.4, 0.8)),
        ))
    }

    #[test]
    fn test_hit_inside_is_front() {
        let tri = facing_triangle();
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let hit = tri.intersect(&ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-9);
        assert!(hit.front);
        // Weights sum to one and are all strictly positive.
        let b = hit.barycentric;
        assert!((b.x + b.y + b.z - 1.0).abs() < 1e-9);
        assert!(b.x > 0.0 && b.y > 0.0 && b.z > 0.0);
    }

    #[test]
    fn test_hit_point_lies_in_plane() {
        let tri = facing_triangle();
        let ray = Ray::new(DVec3::new(0.0, 0.2, 0.1), DVec3::new(1.0, 0.05, -0.02));
        let hit = tri.intersect(&ray).unwrap();
        let p = ray.origin() + hit.t * ray.direction();
        assert!((p.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_hit_is_empty() {
        let tri = facing_triangle();
        // Aims exactly at the midpoint of the edge p1-p2 (y axis edge at
        // z = -1), where the third barycentric coordinate vanishes.
        let ray = Ray::new(DVec3::new(0.0, 0.0, -1.0), DVec3::X);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_outside_plane_hit_is_empty() {
        let tri = facing_triangle();
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::X);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_is_empty() {
        let tri = facing_triangle();
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let degenerate = Primitive::from(Triangle::new(
            [DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.0)],
            [DVec3::Y, DVec3::Y, DVec3::Y],
            Material::default(),
        ));
        let ray = Ray::new(DVec3::new(0.5, 1.0, 0.0), -DVec3::Y);
        assert!(degenerate.intersect(&ray).is_none());
    }

    #[test]
    fn test_smoothed_normal_faces_ray() {
        let tri = facing_triangle();
        let ray = Ray::new(DVec3::new(0.0, 0.1, 0.0), DVec3::X);
        let hit = tri.intersect(&ray).unwrap();
        let p = Point::with_barycentric(ray.at(hit.t), hit.barycentric);
        let n = tri.normal(&p);
        assert!((n.length() - 1.0).abs() < 1e-9);
        assert!(n.dot(-ray.direction()) >= 0.0);
    }

    #[test]
    fn test_bounding_box_spans_vertices() {
        let tri = facing_triangle();
        let bbox = tri.bounding_box();
        assert_eq!(bbox.min, DVec3::new(2.0, -1.0, -1.0));
        assert_eq!(bbox.max, DVec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_color_without_texture_is_material() {
        let tri = facing_triangle();
        let p = Point::new(DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(tri.diffuse_color(&p), Color::new(0.2, 0.4, 0.8));
    }

    #[test]
    fn test_textured_color_uses_swapped_axes() {
        // 4 wide x 2 tall grid; only texel (x=3, y=1) is red.
        let mut texels = vec![[0u8, 0, 0]; 8];
        texels[7] = [255, 0, 0];
        let grid = Arc::new(TexelGrid::new(4, 2, texels, "<test>"));

        let tri = Triangle::new(
            [
                DVec3::new(2.0, -1.0, -1.0),
                DVec3::new(2.0, 1.0, -1.0),
                DVec3::new(2.0, 0.0, 1.0),
            ],
            [-DVec3::X, -DVec3::X, -DVec3::X],
            Material::default(),
        )
        .with_textures(
            Some(grid),
            None,
            // Identical UVs at every vertex, so any barycentric blend gives
            // u = 1.9, v = 0.4.
            Some([[1.9, 0.4], [1.9, 0.4], [1.9, 0.4]]),
        );

        // u scales by height (2) -> x = 3.8, v scales by width (4) ->
        // y = 1.6; nearest texel is (3, 1).
        let p = Point::with_barycentric(
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.5, 0.25, 0.25),
        );
        let color = tri.diffuse_color(&p);
        assert!(color.x > 0.9);
        assert_eq!(color.y, 0.0);
    }

    #[test]
    fn test_texture_without_uv_falls_back_to_material() {
        let grid = Arc::new(TexelGrid::solid([255, 0, 0]));
        let tri = Triangle::new(
            [
                DVec3::new(2.0, -1.0, -1.0),
                DVec3::new(2.0, 1.0, -1.0),
                DVec3::new(2.0, 0.0, 1.0),
            ],
            [-DVec3::X, -DVec3::X, -DVec3::X],
            Material::matte(Color::new(0.1, 0.9, 0.1)),
        )
        .with_textures(Some(grid), None, None);
        let p = Point::new(DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(tri.diffuse_color(&p), Color::new(0.1, 0.9, 0.1));
    }
}
