use glam::DVec3;

/// A position in the scene, optionally carrying barycentric coordinates.
///
/// When the point is a hit on a triangle, `bary` holds the weights of the
/// three vertices and is consumed by normal smoothing and texture lookups.
/// Points used anywhere else keep the default `(1, 0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub pos: DVec3,
    pub bary: DVec3,
}

impl Point {
    pub fn new(pos: DVec3) -> Self {
        Self {
            pos,
            bary: DVec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn with_barycentric(pos: DVec3, bary: DVec3) -> Self {
        Self { pos, bary }
    }
}

impl From<DVec3> for Point {
    fn from(pos: DVec3) -> Self {
        Self::new(pos)
    }
}
