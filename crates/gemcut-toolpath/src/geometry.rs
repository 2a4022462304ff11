//! Planar geometry helpers shared by the raster generators

use gemcut_core::{CutError, CutResult};
use nalgebra::Vector2;

/// Planar vector in machine units
pub type Vec2 = Vector2<f64>;

/// Shortest segment length the offset primitive accepts
const MIN_SEGMENT_LENGTH: f64 = 1e-12;

/// Vector perpendicular to `start -> end` with the given magnitude
///
/// The result is the segment's normal `(y2 - y1, x1 - x2)` scaled to
/// `magnitude`; a negative magnitude points the other way.
pub fn orthogonal_offset(start: Vec2, end: Vec2, magnitude: f64) -> CutResult<Vec2> {
    let length = (end - start).norm();
    if !length.is_finite() || length < MIN_SEGMENT_LENGTH {
        return Err(CutError::invalid_geometry(format!(
            "segment ({}, {}) -> ({}, {}) has no direction",
            start.x, start.y, end.x, end.y
        )));
    }
    if !magnitude.is_finite() {
        return Err(CutError::invalid_geometry(format!(
            "offset magnitude {magnitude} is not finite"
        )));
    }
    let normal = Vec2::new(end.y - start.y, start.x - end.x);
    Ok(normal * (magnitude / length))
}

/// Straight segment in the cutting plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            start: Vec2::new(x1, y1),
            end: Vec2::new(x2, y2),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Perpendicular offset of the given magnitude
    pub fn offset(&self, magnitude: f64) -> CutResult<Vec2> {
        orthogonal_offset(self.start, self.end, magnitude)
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }
}
