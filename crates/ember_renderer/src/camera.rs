//! Pinhole camera generating primary rays.

use ember_math::{DVec3, Ray};

/// Camera with origin, viewing frame and image dimensions.
///
/// Pixel rows are counted from the bottom of the image: `launch(0, 0)` aims
/// at the bottom-left pixel. The render loop flips rows when writing the
/// buffer, which is stored top-to-bottom.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: DVec3,
    direction: DVec3,
    up: DVec3,
    right: DVec3,
    fov: f64,
    height: usize,
    width: usize,
}

impl Camera {
    /// `direction` and `up` are normalized here and assumed orthogonal;
    /// `fov` is the horizontal field of view in radians.
    pub fn new(
        origin: DVec3,
        direction: DVec3,
        up: DVec3,
        fov: f64,
        height: usize,
        width: usize,
    ) -> Self {
        let direction = direction.normalize();
        let up = up.normalize();
        let right = up.cross(direction);
        Self {
            origin,
            direction,
            up,
            right,
            fov,
            height,
            width,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Primary ray through the center of pixel (i, j).
    pub fn launch(&self, i: usize, j: usize) -> Ray {
        self.launch_jittered(i, j, 0.0, 0.0)
    }

    /// Primary ray through pixel (i, j), displaced by the sub-pixel jitter
    /// (di, dj).
    pub fn launch_jittered(&self, i: usize, j: usize, di: f64, dj: f64) -> Ray {
        let focal = self.height as f64 / (2.0 * (self.fov / 2.0).tan());
        let direction = (j as f64 + dj - self.width as f64 / 2.0 + 0.5) * self.right
            + (i as f64 + di - self.height as f64 / 2.0 + 0.5) * self.up
            + focal * self.direction;
        Ray::new(self.origin, direction)
    }
}
