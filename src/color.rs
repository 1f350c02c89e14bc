//! Color types and operations.
//!
//! - `Rgba` — f64 components, the linear working space of every offscreen pass
//! - `Rgba8` — u8 components, the format of the output surface and of assets
//!
//! Offscreen images keep f64 samples so the blur stays linear; conversion to
//! 8 bits happens once, when the final image is presented.

use serde::{Deserialize, Serialize};

use crate::basics::uround;

// ============================================================================
// Rgba (f64 precision color)
// ============================================================================

/// RGBA color with f64 components, nominally in range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn new_rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Default marker color: full red.
    pub fn red() -> Self {
        Self::new_rgb(1.0, 0.0, 0.0)
    }

    pub fn no_color() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn with_opacity(c: &Rgba, a: f64) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a,
        }
    }

    /// Interpolate between `self` and `c` by parameter `k`.
    pub fn gradient(&self, c: &Rgba, k: f64) -> Rgba {
        Rgba {
            r: self.r + (c.r - self.r) * k,
            g: self.g + (c.g - self.g) * k,
            b: self.b + (c.b - self.b) * k,
            a: self.a + (c.a - self.a) * k,
        }
    }

    /// Component-wise product (sprite texel times point color).
    pub fn modulate(&self, c: &Rgba) -> Rgba {
        Rgba {
            r: self.r * c.r,
            g: self.g * c.g,
            b: self.b * c.b,
            a: self.a * c.a,
        }
    }

    /// Read a single channel.
    #[inline]
    pub fn channel(&self, channel: DensityChannel) -> f64 {
        match channel {
            DensityChannel::Red => self.r,
            DensityChannel::Green => self.g,
            DensityChannel::Blue => self.b,
            DensityChannel::Alpha => self.a,
        }
    }

    /// Largest absolute per-channel difference.
    pub fn max_abs_diff(&self, c: &Rgba) -> f64 {
        (self.r - c.r)
            .abs()
            .max((self.g - c.g).abs())
            .max((self.b - c.b).abs())
            .max((self.a - c.a).abs())
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::no_color()
    }
}

impl core::ops::Add for Rgba {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a + rhs.a,
        }
    }
}

impl core::ops::AddAssign for Rgba {
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
        self.a += rhs.a;
    }
}

impl core::ops::Mul<f64> for Rgba {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a * k,
        }
    }
}

// ============================================================================
// DensityChannel
// ============================================================================

/// Which channel of the blurred image stands in for point density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityChannel {
    #[default]
    Red,
    Green,
    Blue,
    Alpha,
}

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_MASK: u32 = 255;

    pub fn new(r: u32, g: u32, b: u32, a: u32) -> Self {
        Self {
            r: r as u8,
            g: g as u8,
            b: b as u8,
            a: a as u8,
        }
    }

    pub fn new_opaque(r: u32, g: u32, b: u32) -> Self {
        Self::new(r, g, b, Self::BASE_MASK)
    }

    pub fn from_slice(p: &[u8]) -> Self {
        Self {
            r: p[0],
            g: p[1],
            b: p[2],
            a: p[3],
        }
    }

    /// Convert from `Rgba`, clamping every channel to [0, 1] first.
    pub fn from_rgba(c: &Rgba) -> Self {
        Self {
            r: Self::from_double(c.r),
            g: Self::from_double(c.g),
            b: Self::from_double(c.b),
            a: Self::from_double(c.a),
        }
    }

    pub fn to_rgba(&self) -> Rgba {
        Rgba {
            r: Self::to_double(self.r),
            g: Self::to_double(self.g),
            b: Self::to_double(self.b),
            a: Self::to_double(self.a),
        }
    }

    pub fn to_double(a: u8) -> f64 {
        a as f64 / Self::BASE_MASK as f64
    }

    /// NaN maps to 0.
    pub fn from_double(a: f64) -> u8 {
        if a.is_nan() {
            return 0;
        }
        uround(a.clamp(0.0, 1.0) * Self::BASE_MASK as f64) as u8
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
