//! Ember core — scene data consumed by the renderer.
//!
//! This crate provides:
//!
//! - **Decoded textures**: [`TexelGrid`] plus a path-keyed [`TextureCache`]
//! - **Imported geometry**: [`MeshData`], the triangle-soup handoff type
//!   filled by external model loaders
//!
//! Mesh file parsing itself lives outside the workspace; loaders produce a
//! `MeshData` per submesh and hand it to the renderer together with a
//! material and optional texel grids.

pub mod mesh;
pub mod texture;

pub use mesh::MeshData;
pub use texture::{TexelGrid, TextureCache, TextureError, TextureResult};
