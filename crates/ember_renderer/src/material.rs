//! Surface materials.

use ember_math::DVec3;

/// RGB radiance / reflectance triple, components in [0, 1] for reflectances.
pub type Color = DVec3;

/// Physical surface description.
///
/// `opacity` and `fraction_diffuse` partition the behavior of a hit:
/// `opacity * (1 - fraction_diffuse)` of the energy is direct diffuse,
/// `opacity * fraction_diffuse` bounces as indirect diffuse, and the
/// remaining `1 - opacity` goes through reflection/refraction.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Diffuse reflectance
    pub diffuse: Color,

    /// Specular reflectance, used by mirror bounces and highlights
    pub specular: Color,

    /// Filter applied to transmitted light
    pub transparent: Color,

    /// Fraction of energy handled diffusely (alpha)
    pub opacity: f64,

    /// Fraction of the diffuse energy bounced indirectly (beta)
    pub fraction_diffuse: f64,

    /// Phong exponent of the direct specular highlight
    pub shininess: f64,

    /// Weight of the direct specular highlight
    pub specular_weight: f64,

    /// Whether transmitted rays refract at the surface
    pub refractive: bool,

    /// Refractive index of the medium behind the surface
    pub refractive_index: f64,
}

impl Default for Material {
    /// Opaque white matte.
    fn default() -> Self {
        Self {
            diffuse: Color::ONE,
            specular: Color::ONE,
            transparent: Color::ONE,
            opacity: 1.0,
            fraction_diffuse: 0.0,
            shininess: 0.0,
            specular_weight: 0.0,
            refractive: false,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Opaque matte surface of the given color.
    pub fn matte(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Self::default()
        }
    }

    /// Add a direct specular highlight.
    pub fn with_specular(mut self, specular: Color, weight: f64, shininess: f64) -> Self {
        self.specular = specular;
        self.specular_weight = weight;
        self.shininess = shininess;
        self
    }

    /// Set the fraction of diffuse energy bounced indirectly.
    pub fn with_indirect(mut self, fraction_diffuse: f64) -> Self {
        self.fraction_diffuse = fraction_diffuse;
        self
    }

    /// Make the surface partially transmissive.
    pub fn with_transparency(mut self, transparent: Color, opacity: f64) -> Self {
        self.transparent = transparent;
        self.opacity = opacity;
        self
    }

    /// Refract transmitted rays with the given index.
    pub fn with_refraction(mut self, refractive_index: f64) -> Self {
        self.refractive = true;
        self.refractive_index = refractive_index;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_opaque_matte() {
        let m = Material::default();
        assert_eq!(m.opacity, 1.0);
        assert_eq!(m.fraction_diffuse, 0.0);
        assert_eq!(m.specular_weight, 0.0);
        assert!(!m.refractive);
    }

    #[test]
    fn test_builders_compose() {
        let m = Material::matte(Color::new(0.9, 0.1, 0.0))
            .with_indirect(0.5)
            .with_transparency(Color::ONE, 0.1)
            .with_refraction(1.5);
        assert_eq!(m.diffuse, Color::new(0.9, 0.1, 0.0));
        assert_eq!(m.fraction_diffuse, 0.5);
        assert_eq!(m.opacity, 0.1);
        assert!(m.refractive);
        assert_eq!(m.refractive_index, 1.5);
    }
}
