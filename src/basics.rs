//! Rounding helpers shared by the rasterizer, sampler and surface conversion.
//!
//! All conversions round in f64 first and then saturate into the integer
//! range, so coordinates far outside any surface never wrap.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round a non-negative value to the nearest unsigned integer (half up).
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

/// Floor toward negative infinity, saturating at the `i32` bounds.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    v.floor() as i32
}

/// Ceiling, saturating at the `i32` bounds.
#[inline]
pub fn iceil(v: f64) -> i32 {
    v.ceil() as i32
}

/// First pixel index whose center `i + 0.5` is at or right of `v`.
#[inline]
pub fn first_center_at_or_after(v: f64) -> i32 {
    iceil(v - 0.5)
}

/// Last pixel index whose center `i + 0.5` is at or left of `v`.
#[inline]
pub fn last_center_at_or_before(v: f64) -> i32 {
    ifloor(v - 0.5)
}
