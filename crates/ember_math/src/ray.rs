use glam::DVec3;

/// Fraction by which `at` pulls evaluated points back toward the origin, so
/// that a secondary ray cast from a hit point does not re-hit its own
/// surface.
const SELF_HIT_SHRINK: f64 = 1e-6;

/// A ray with an origin and a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: DVec3,
    direction: DVec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized at construction.
    #[inline]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Point reached after travelling `t` along the ray, shrunk by
    /// `SELF_HIT_SHRINK`.
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * (1.0 - SELF_HIT_SHRINK) * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction().length() - 1.0).abs() < 1e-12);
        assert_eq!(ray.direction(), DVec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_at_shrinks_toward_origin() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let p = ray.at(2.0);
        assert!(p.x < 2.0);
        assert!((p.x - 2.0 * (1.0 - 1e-6)).abs() < 1e-12);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_at_zero_is_origin() {
        let origin = DVec3::new(1.0, -2.0, 0.5);
        let ray = Ray::new(origin, DVec3::Y);
        assert_eq!(ray.at(0.0), origin);
    }
}
