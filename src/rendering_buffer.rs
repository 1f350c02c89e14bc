//! Rendering buffer — owned offscreen image of f64 RGBA samples.
//!
//! [`RasterImage`] backs the three offscreen passes (raster, ping, pong).
//! Rows are stored top-down and contiguously; `row_mut(y)` spans exactly
//! `width` samples. Unlike the output surface, samples are not quantized,
//! so intermediate blur results keep full precision.

use crate::color::{Rgba, Rgba8};
use crate::error::{LandscapeError, Result};

/// How a marker span is written into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanBlend {
    /// Overwrite the destination sample.
    #[default]
    Replace,
    /// Add to the destination sample (overlapping markers accumulate).
    Additive,
}

// ============================================================================
// RasterImage
// ============================================================================

/// A `width`×`height` grid of RGBA samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RasterImage {
    /// Create an image cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::no_color(); width as usize * height as usize],
        }
    }

    /// Create from tightly packed RGBA8 bytes (row-major, top-down).
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(LandscapeError::PixelData {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|p| Rgba8::from_slice(p).to_rgba())
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn same_size(&self, other: &RasterImage) -> bool {
        self.size() == other.size()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Sample at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds ({}x{})",
            x,
            y,
            self.width,
            self.height
        );
        self.pixels[self.offset(x, y)]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, c: Rgba) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds ({}x{})",
            x,
            y,
            self.width,
            self.height
        );
        let off = self.offset(x, y);
        self.pixels[off] = c;
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [Rgba] {
        let start = self.offset(0, y);
        let w = self.width as usize;
        &mut self.pixels[start..start + w]
    }

    /// Fill every sample with `c`.
    pub fn clear(&mut self, c: Rgba) {
        self.pixels.fill(c);
    }

    /// Reallocate at new dimensions. Contents are reset to transparent.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgba::no_color());
    }

    /// Write `c` over pixels `x1..=x2` of row `y`, clipped to the image.
    ///
    /// Rows outside the image and empty spans are ignored.
    pub fn blend_hline(&mut self, x1: i32, x2: i32, y: i32, c: &Rgba, blend: SpanBlend) {
        if y < 0 || y >= self.height as i32 || self.width == 0 {
            return;
        }
        let x1 = x1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        if x1 > x2 {
            return;
        }
        let row = self.row_mut(y as u32);
        for p in &mut row[x1 as usize..=x2 as usize] {
            match blend {
                SpanBlend::Replace => *p = *c,
                SpanBlend::Additive => *p += *c,
            }
        }
    }

    /// Blend a single sample, ignoring out-of-bounds coordinates.
    pub fn blend_pixel(&mut self, x: i32, y: i32, c: &Rgba, blend: SpanBlend) {
        self.blend_hline(x, x, y, c, blend);
    }

    /// Largest per-channel difference against another image of the same size.
    pub fn max_abs_diff(&self, other: &RasterImage) -> Result<f64> {
        if !self.same_size(other) {
            return Err(LandscapeError::SizeMismatch {
                expected: self.size(),
                actual: other.size(),
            });
        }
        Ok(self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| a.max_abs_diff(b))
            .fold(0.0, f64::max))
    }
}
