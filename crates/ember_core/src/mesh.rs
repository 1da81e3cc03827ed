//! Imported triangle geometry.
//!
//! External model readers fill a [`MeshData`] per submesh: vertex positions,
//! per-vertex normals, optional UV coordinates and triangle indices. The
//! renderer turns each `MeshData` into its own acceleration structure of
//! textured triangles.

use ember_math::{Aabb, DVec3};

/// A triangle soup with per-vertex attributes.
#[derive(Clone, Debug)]
pub struct MeshData {
    /// Vertex positions (one per vertex)
    pub positions: Vec<DVec3>,

    /// Per-vertex normals; computed on demand when the reader supplies none
    pub normals: Option<Vec<DVec3>>,

    /// UV coordinates (optional, one `[u, v]` per vertex)
    pub uvs: Option<Vec<[f64; 2]>>,

    /// Triangle indices; every three entries form a face
    pub indices: Vec<u32>,

    /// Axis-aligned bounds of the positions
    pub bounds: Aabb,
}

impl MeshData {
    pub fn new(positions: Vec<DVec3>, indices: Vec<u32>, normals: Option<Vec<DVec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            uvs: None,
            indices,
            bounds,
        }
    }

    pub fn with_uvs(
        positions: Vec<DVec3>,
        indices: Vec<u32>,
        normals: Option<Vec<DVec3>>,
        uvs: Option<Vec<[f64; 2]>>,
    ) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            uvs,
            indices,
            bounds,
        }
    }

    fn compute_bounds(positions: &[DVec3]) -> Aabb {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }
        Aabb { min, max }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Smooth per-vertex normals: each vertex gets the normalized sum of the
    /// normals of the faces sharing it.
    pub fn smoothed_normals(&self) -> Vec<DVec3> {
        let vertex_count = self.positions.len();
        let mut normals = vec![DVec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            let len = normal.length();
            if len > 0.0 {
                *normal /= len;
            } else {
                *normal = DVec3::Y;
            }
        }

        normals
    }
}
