//! Density color ramp.
//!
//! A [`DensityRamp`] is a 1D color table mapping a normalized density value
//! to a display color. It can be built from SVG-style color stops (like a
//! gradient lookup table) or read directly from a 1×K / K×1 pixel strip.
//! [`DensityColorizer`] samples it with nearest or linear filtering.

use serde::{Deserialize, Serialize};

use crate::basics::{ifloor, uround};
use crate::color::{Rgba, Rgba8};
use crate::error::{LandscapeError, Result};

/// Default table size for ramps built from color stops.
pub const DEFAULT_RAMP_SIZE: usize = 256;

// ============================================================================
// ColorFunction trait
// ============================================================================

/// Indexed access to a color palette of known size.
pub trait ColorFunction {
    fn size(&self) -> usize;
    fn get(&self, index: usize) -> Rgba;
}

// ============================================================================
// DensityRamp
// ============================================================================

/// Color stop for ramp definition.
#[derive(Debug, Clone, Copy)]
struct ColorPoint {
    offset: f64,
    color: Rgba,
}

/// Non-empty 1D color lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRamp {
    colors: Vec<Rgba>,
}

impl DensityRamp {
    /// Ramp that stores `colors` verbatim, first entry at density 0.
    pub fn from_colors(colors: Vec<Rgba>) -> Result<Self> {
        if colors.is_empty() {
            return Err(LandscapeError::EmptyRamp);
        }
        Ok(Self { colors })
    }

    /// Single-color ramp, used when a ramp asset cannot be loaded.
    pub fn solid(color: Rgba) -> Self {
        Self {
            colors: vec![color],
        }
    }

    /// Build a `size`-entry table from color stops at offsets in [0, 1].
    ///
    /// Fails with `EmptyRamp` when there are no stops or `size` is zero.
    pub fn from_stops(stops: &[(f64, Rgba)], size: usize) -> Result<Self> {
        if stops.is_empty() || size == 0 {
            return Err(LandscapeError::EmptyRamp);
        }
        Ok(Self {
            colors: interpolate_stops(stops, size),
        })
    }

    /// Read a ramp from a pixel strip of tightly packed RGBA8 bytes.
    ///
    /// The strip must be one pixel tall or one pixel wide; any other shape
    /// is rejected rather than guessed at.
    pub fn from_strip(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LandscapeError::EmptyRamp);
        }
        if width != 1 && height != 1 {
            return Err(LandscapeError::RampShape { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(LandscapeError::PixelData {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        let colors = data
            .chunks_exact(4)
            .map(|p| Rgba8::from_slice(p).to_rgba())
            .collect();
        Ok(Self { colors })
    }

    /// Built-in landscape ramp: deep water through lowland green and
    /// highland ochre to snow-white peaks.
    pub fn landscape() -> Self {
        let stops = [
            (0.00, Rgba8::new_opaque(12, 24, 64)),
            (0.15, Rgba8::new_opaque(24, 78, 140)),
            (0.30, Rgba8::new_opaque(46, 139, 87)),
            (0.55, Rgba8::new_opaque(214, 196, 110)),
            (0.80, Rgba8::new_opaque(139, 94, 60)),
            (1.00, Rgba8::new_opaque(250, 250, 250)),
        ];
        let stops: Vec<(f64, Rgba)> = stops.iter().map(|&(o, c)| (o, c.to_rgba())).collect();
        Self {
            colors: interpolate_stops(&stops, DEFAULT_RAMP_SIZE),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the table has no entries. No constructor produces one.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn first(&self) -> Rgba {
        self.colors[0]
    }

    pub fn last(&self) -> Rgba {
        self.colors[self.colors.len() - 1]
    }

    /// Tightly packed RGBA8 bytes of the table, as a K×1 strip.
    pub fn to_strip_rgba8(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|c| Rgba8::from_rgba(c).to_array())
            .collect()
    }
}

/// Sample `size` evenly spaced entries from color stops.
///
/// Offsets are clamped, stops are sorted, and duplicate offsets keep the
/// first stop. Entry `i` sits at offset `i / (size - 1)`; entries before the
/// first stop or after the last take that stop's color. No stops yield an
/// empty table.
fn interpolate_stops(stops: &[(f64, Rgba)], size: usize) -> Vec<Rgba> {
    let mut profile: Vec<ColorPoint> = stops
        .iter()
        .map(|&(offset, color)| ColorPoint {
            offset: if offset.is_nan() { 0.0 } else { offset.clamp(0.0, 1.0) },
            color,
        })
        .collect();
    profile.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    profile.dedup_by(|a, b| (a.offset - b.offset).abs() < 1e-10);
    if profile.is_empty() {
        return Vec::new();
    }

    let denom = size.saturating_sub(1).max(1) as f64;
    (0..size)
        .map(|i| {
            let t = i as f64 / denom;
            let upper = profile.partition_point(|p| p.offset < t);
            if upper == 0 {
                profile[0].color
            } else if upper == profile.len() {
                profile[profile.len() - 1].color
            } else {
                let lo = &profile[upper - 1];
                let hi = &profile[upper];
                let k = (t - lo.offset) / (hi.offset - lo.offset);
                if k >= 1.0 {
                    hi.color
                } else {
                    lo.color.gradient(&hi.color, k)
                }
            }
        })
        .collect()
}

impl Default for DensityRamp {
    fn default() -> Self {
        Self::landscape()
    }
}

impl ColorFunction for DensityRamp {
    fn size(&self) -> usize {
        self.colors.len()
    }

    fn get(&self, index: usize) -> Rgba {
        self.colors[index]
    }
}

// ============================================================================
// DensityColorizer
// ============================================================================

/// Ramp filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampSampling {
    Nearest,
    #[default]
    Linear,
}

/// Maps a scalar density to a ramp color. Pure; holds no mutable state.
#[derive(Debug, Clone)]
pub struct DensityColorizer<'a, F: ColorFunction = DensityRamp> {
    ramp: &'a F,
    sampling: RampSampling,
}

impl<'a, F: ColorFunction> DensityColorizer<'a, F> {
    pub fn new(ramp: &'a F, sampling: RampSampling) -> Self {
        Self { ramp, sampling }
    }

    pub fn sampling(&self) -> RampSampling {
        self.sampling
    }

    /// Color at normalized position `value` along the ramp.
    ///
    /// `0.0` and `1.0` return the first and last entries. The value is
    /// expected in [0, 1]; anything outside reads the nearest end entry.
    pub fn colorize(&self, value: f64) -> Rgba {
        let size = self.ramp.size();
        if size <= 1 || value.is_nan() {
            return self.ramp.get(0);
        }
        let last = size - 1;
        let pos = value * last as f64;
        if pos <= 0.0 {
            return self.ramp.get(0);
        }
        if pos >= last as f64 {
            return self.ramp.get(last);
        }
        match self.sampling {
            RampSampling::Nearest => self.ramp.get(uround(pos) as usize),
            RampSampling::Linear => {
                let i = ifloor(pos) as usize;
                let k = pos - i as f64;
                let lo = self.ramp.get(i);
                if k == 0.0 {
                    lo
                } else {
                    lo.gradient(&self.ramp.get(i + 1), k)
                }
            }
        }
    }
}
