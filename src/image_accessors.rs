//! Image sample access with boundary handling.
//!
//! Blur taps routinely land outside the image near its borders. Those reads
//! are resolved by an [`EdgePolicy`] instead of failing:
//!
//! - `Clamp` — clone the nearest edge texel (clamp-to-edge)
//! - `Repeat` — tile the image
//! - `Mirror` — tile with every other copy reflected
//! - `Transparent` — read transparent black outside the image
//!
//! Coordinates here are in texel space: texel `i` has its center at `i`.
//! A texture coordinate `u` corresponds to texel coordinate `u * W - 0.5`.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::rendering_buffer::RasterImage;

// ============================================================================
// EdgePolicy
// ============================================================================

/// Out-of-range sample handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    #[default]
    Clamp,
    Repeat,
    Mirror,
    Transparent,
}

impl EdgePolicy {
    /// Map coordinate `v` onto `[0, size)`, or `None` for transparent reads.
    #[inline]
    pub fn resolve(self, v: i64, size: u32) -> Option<u32> {
        if size == 0 {
            return None;
        }
        let n = size as i64;
        match self {
            EdgePolicy::Clamp => Some(v.clamp(0, n - 1) as u32),
            EdgePolicy::Repeat => Some(v.rem_euclid(n) as u32),
            EdgePolicy::Mirror => {
                let m = v.rem_euclid(2 * n);
                let m = if m >= n { 2 * n - 1 - m } else { m };
                Some(m as u32)
            }
            EdgePolicy::Transparent => {
                if (0..n).contains(&v) {
                    Some(v as u32)
                } else {
                    None
                }
            }
        }
    }

    /// Fold a texel-space coordinate into a small range around `[0, size)`
    /// that samples identically under this policy.
    ///
    /// Coordinates between the first and last texel centers are returned
    /// unchanged. The result lies in `[-1, 2 * size]`, so its floor always
    /// fits an `i64`.
    #[inline]
    pub fn fold(self, t: f64, size: u32) -> f64 {
        let n = size as f64;
        match self {
            EdgePolicy::Clamp => t.clamp(0.0, (n - 1.0).max(0.0)),
            EdgePolicy::Transparent => t.clamp(-1.0, n),
            EdgePolicy::Repeat | EdgePolicy::Mirror if !t.is_finite() || size == 0 => 0.0,
            EdgePolicy::Repeat => t.rem_euclid(n),
            EdgePolicy::Mirror => t.rem_euclid(2.0 * n),
        }
    }
}

// ============================================================================
// Texel fetch and bilinear sampling
// ============================================================================

/// Fetch a single texel, resolving out-of-range coordinates through `policy`.
#[inline]
pub fn texel(img: &RasterImage, x: i64, y: i64, policy: EdgePolicy) -> Rgba {
    match (
        policy.resolve(x, img.width()),
        policy.resolve(y, img.height()),
    ) {
        (Some(x), Some(y)) => img.pixel(x, y),
        _ => Rgba::no_color(),
    }
}

/// Bilinear sample at texel-space position `(tx, ty)`.
///
/// Integer positions return the texel exactly. The result is linear in the
/// image contents. Any coordinate, however far out of range, is folded
/// through `policy` before the integer texel index is taken.
pub fn sample_bilinear(img: &RasterImage, tx: f64, ty: f64, policy: EdgePolicy) -> Rgba {
    if tx.is_nan() || ty.is_nan() {
        return Rgba::no_color();
    }
    let tx = policy.fold(tx, img.width());
    let ty = policy.fold(ty, img.height());
    let (x0, y0) = (tx.floor(), ty.floor());
    let fx = tx - x0;
    let fy = ty - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut c = texel(img, x0, y0, policy) * ((1.0 - fx) * (1.0 - fy));
    if fx > 0.0 {
        c += texel(img, x0 + 1, y0, policy) * (fx * (1.0 - fy));
    }
    if fy > 0.0 {
        c += texel(img, x0, y0 + 1, policy) * ((1.0 - fx) * fy);
        if fx > 0.0 {
            c += texel(img, x0 + 1, y0 + 1, policy) * (fx * fy);
        }
    }
    c
}

/// Nearest-texel sample at texture coordinate `(u, v)` in `[0,1]²`.
pub fn sample_nearest_uv(img: &RasterImage, u: f64, v: f64, policy: EdgePolicy) -> Rgba {
    if u.is_nan() || v.is_nan() {
        return Rgba::no_color();
    }
    let x = policy.fold(u * img.width() as f64, img.width()).floor() as i64;
    let y = policy.fold(v * img.height() as f64, img.height()).floor() as i64;
    texel(img, x, y, policy)
}
