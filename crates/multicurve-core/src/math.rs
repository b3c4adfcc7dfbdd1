//! Re-exports of the `glam` double precision types used for pixel coordinates.
//!
//! Pixel positions are kept in `f64` so that a scale round trip
//! (`invert(scale(v))`) does not lose precision on large domains.

pub use glam::{DVec2, dvec2};

/// Returns `true` when both components are finite.
#[inline]
pub fn is_finite_point(p: DVec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
