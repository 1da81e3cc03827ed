//! Decoded textures and a path-keyed cache.
//!
//! A [`TexelGrid`] is a width x height grid of 8-bit RGB samples. The same
//! grid is shared by reference across every triangle of a mesh, so the cache
//! hands out `Arc`s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_math::DVec3;
use thiserror::Error;

/// Errors that can occur while decoding a texture from disk.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: width, height and raw RGB byte samples.
#[derive(Clone, Debug)]
pub struct TexelGrid {
    /// Width in texels
    pub width: u32,

    /// Height in texels
    pub height: u32,

    /// RGB samples, row-major
    texels: Vec<[u8; 3]>,

    /// Original file path (for diagnostics)
    pub path: String,
}

impl TexelGrid {
    /// Create a grid from raw samples. `texels.len()` must equal
    /// `width * height`.
    pub fn new(width: u32, height: u32, texels: Vec<[u8; 3]>, path: impl Into<String>) -> Self {
        debug_assert_eq!(texels.len(), (width * height) as usize);
        Self {
            width,
            height,
            texels,
            path: path.into(),
        }
    }

    /// A 1x1 grid of a single color.
    pub fn solid(rgb: [u8; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![rgb],
            path: "<solid>".to_string(),
        }
    }

    /// Nearest-texel lookup at raw grid coordinates.
    ///
    /// Coordinates are truncated and clamped to the grid, so out-of-range
    /// lookups snap to the border texel. Samples are scaled by 1/256.
    pub fn sample(&self, x: f64, y: f64) -> DVec3 {
        let xi = (x as i64).clamp(0, self.width as i64 - 1) as u32;
        let yi = (y as i64).clamp(0, self.height as i64 - 1) as u32;
        let [r, g, b] = self.texels[(yi * self.width + xi) as usize];
        DVec3::new(r as f64, g as f64, b as f64) / 256.0
    }

    /// Approximate memory footprint of the samples.
    pub fn size_bytes(&self) -> usize {
        self.texels.len() * 3
    }
}

/// Cache of decoded textures, keyed by file path.
///
/// Grids are decoded on first use and shared afterwards.
pub struct TextureCache {
    grids: HashMap<String, Arc<TexelGrid>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            grids: HashMap::new(),
            base_dir: None,
        }
    }

    /// Cache resolving relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            grids: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, reusing the cached grid if present.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<TexelGrid>> {
        if let Some(grid) = self.grids.get(path) {
            return Ok(grid.clone());
        }

        let full_path = self.resolve_path(path);
        let grid = Arc::new(decode_texture_file(&full_path)?);
        self.grids.insert(path.to_string(), grid.clone());

        log::debug!(
            "decoded texture {} ({}x{}, {:.1} KB)",
            path,
            grid.width,
            grid.height,
            grid.size_bytes() as f64 / 1024.0
        );

        Ok(grid)
    }

    /// Get a cached grid without loading.
    pub fn get(&self, path: &str) -> Option<Arc<TexelGrid>> {
        self.grids.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_texture_file(path: &Path) -> TextureResult<TexelGrid> {
    let img = image::open(path)
        .map_err(|e| TextureError::Load(format!("failed to open {}: {}", path.display(), e)))?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let texels: Vec<[u8; 3]> = rgb.pixels().map(|p| [p[0], p[1], p[2]]).collect();

    Ok(TexelGrid::new(
        width,
        height,
        texels,
        path.to_string_lossy().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_grid() {
        let grid = TexelGrid::solid([128, 64, 0]);
        assert_eq!(grid.width, 1);
        assert_eq!(grid.height, 1);

        let sample = grid.sample(0.0, 0.0);
        assert!((sample.x - 0.5).abs() < 1e-9);
        assert!((sample.y - 0.25).abs() < 1e-9);
        assert_eq!(sample.z, 0.0);
    }

    #[test]
    fn test_sample_scaling_is_over_256() {
        let grid = TexelGrid::solid([255, 255, 255]);
        let sample = grid.sample(0.0, 0.0);
        assert!((sample.x - 255.0 / 256.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_clamps_to_border() {
        let texels = vec![[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];
        let grid = TexelGrid::new(2, 2, texels, "<test>");

        // Past the right edge of row 0: snaps to texel (1, 0).
        let sample = grid.sample(10.0, 0.0);
        assert!(sample.x > 0.9);
        // Negative coordinates snap to texel (0, 0).
        assert_eq!(grid.sample(-3.0, -3.0), DVec3::ZERO);
    }

    #[test]
    fn test_row_major_indexing() {
        let texels = vec![[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];
        let grid = TexelGrid::new(2, 2, texels, "<test>");
        // (x=0, y=1) is the first texel of the second row.
        let sample = grid.sample(0.0, 1.0);
        assert!(sample.y > 0.9);
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = TextureCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert!(cache.get("missing.png").is_none());
    }
}
