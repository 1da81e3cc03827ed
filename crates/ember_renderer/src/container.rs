//! Object containers: anything that can answer a nearest-hit query.

use crate::intersection::{nearest, Intersection};
use crate::primitive::Primitive;
use ember_math::Ray;

/// Nearest-hit query over a set of objects.
pub trait Container: Send + Sync {
    /// The closest intersection of `ray` with any contained object.
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>>;
}

/// The naive container: a flat vector, folded with [`nearest`].
pub struct PrimitiveList {
    primitives: Vec<Primitive>,
}

impl PrimitiveList {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self { primitives }
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Container for PrimitiveList {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.primitives
            .iter()
            .fold(None, |best, primitive| nearest(best, primitive.intersect(ray)))
    }
}
