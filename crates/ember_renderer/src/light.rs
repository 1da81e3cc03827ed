//! Point light sources.

use ember_math::DVec3;

/// A punctual light: a source position and a per-channel intensity in watts
/// per unit solid angle.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    source: DVec3,
    intensity: DVec3,
}

impl Light {
    pub fn new(source: DVec3, intensity: DVec3) -> Self {
        Self { source, intensity }
    }

    pub fn source(&self) -> DVec3 {
        self.source
    }

    pub fn intensity(&self) -> DVec3 {
        self.intensity
    }
}
