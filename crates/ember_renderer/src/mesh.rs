//! Imported meshes as renderable objects.

use std::sync::Arc;

use crate::bvh::Bvh;
use crate::container::Container;
use crate::intersection::Intersection;
use crate::material::Material;
use crate::primitive::Primitive;
use crate::triangle::Triangle;
use ember_core::{MeshData, TexelGrid};
use ember_math::{Aabb, DVec3, Point, Ray};

/// A triangle mesh behaving as a single scene object. The triangles live in
/// their own bounding-volume hierarchy; hits reference the individual
/// triangle that was struck, so smoothing and texturing happen per face.
pub struct Mesh {
    triangles: Box<Bvh>,
    material: Material,
}

impl Mesh {
    /// Build a mesh from loader output. Vertex normals are taken from the
    /// data when present and smoothed from the faces otherwise; UVs enable
    /// texture lookups on every triangle.
    pub fn new(
        data: &MeshData,
        diffuse_texture: Option<Arc<TexelGrid>>,
        specular_texture: Option<Arc<TexelGrid>>,
        material: Material,
    ) -> Self {
        let normals = match &data.normals {
            Some(normals) => normals.clone(),
            None => data.smoothed_normals(),
        };

        let mut triangles = Vec::with_capacity(data.triangle_count());
        for face in data.indices.chunks_exact(3) {
            let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
            let triangle = Triangle::new(
                [data.positions[a], data.positions[b], data.positions[c]],
                [normals[a], normals[b], normals[c]],
                material,
            )
            .with_textures(
                diffuse_texture.clone(),
                specular_texture.clone(),
                data.uvs.as_ref().map(|uvs| [uvs[a], uvs[b], uvs[c]]),
            );
            triangles.push(Primitive::from(triangle));
        }

        Self {
            triangles: Box::new(Bvh::new(triangles)),
            material,
        }
    }

    pub(crate) fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.triangles.intersect(ray)
    }

    /// Never consulted: intersections always reference the triangle that
    /// was hit, and normals are evaluated there.
    pub(crate) fn normal(&self, _p: &Point) -> DVec3 {
        DVec3::X
    }

    pub(crate) fn bounding_box(&self) -> Aabb {
        self.triangles.bounding_box()
    }
}
