//! Separable Gaussian blur.
//!
//! A 2D Gaussian blur decomposed into a horizontal and a vertical 1D pass
//! over a fixed 19-tap kernel. The horizontal pass writes all four channels;
//! the vertical pass either does the same or, in the colorized variant,
//! reduces the result to a scalar density and maps it through a
//! [`DensityColorizer`].
//!
//! Taps are spaced `sigma` texels apart, i.e. `sigma / W` (horizontal) and
//! `sigma / H` (vertical) in texture coordinates, so `sigma` scales the
//! kernel's footprint without touching its coefficients. Fractional spacing
//! is resolved with bilinear sampling; reads past the border go through the
//! configured [`EdgePolicy`].

use crate::color::{DensityChannel, Rgba};
use crate::density_ramp::{ColorFunction, DensityColorizer};
use crate::error::{LandscapeError, Result};
use crate::image_accessors::{sample_bilinear, EdgePolicy};
use crate::rendering_buffer::RasterImage;

// ============================================================================
// Kernel
// ============================================================================

/// Taps on each side of the center.
pub const KERNEL_RADIUS: usize = 9;

/// Number of taps.
pub const KERNEL_SIZE: usize = 2 * KERNEL_RADIUS + 1;

/// Discrete Gaussian weights (σ ≈ 3 texels), outermost tap first.
#[rustfmt::skip]
pub const GAUSSIAN_WEIGHTS: [f64; KERNEL_SIZE] = [
    0.008074244714835564,
    0.01373475292908177,
    0.02194807268686863,
    0.032947959470316014,
    0.0464640702427165,
    0.06155489208605796,
    0.07660630093247092,
    0.08956183951296363,
    0.09836443747572207,
    0.10148685989793388,
    0.09836443747572207,
    0.08956183951296363,
    0.07660630093247092,
    0.06155489208605796,
    0.0464640702427165,
    0.032947959470316014,
    0.02194807268686863,
    0.01373475292908177,
    0.008074244714835564,
];

/// Symmetric 1D convolution kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    weights: [f64; KERNEL_SIZE],
}

impl GaussianKernel {
    /// The fixed 19-tap landscape kernel.
    pub const fn standard() -> Self {
        Self {
            weights: GAUSSIAN_WEIGHTS,
        }
    }

    pub fn weights(&self) -> &[f64; KERNEL_SIZE] {
        &self.weights
    }

    pub fn radius(&self) -> usize {
        KERNEL_RADIUS
    }

    /// `(offset, weight)` pairs, offset in taps from the center.
    pub fn taps(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, &w)| (i as i32 - KERNEL_RADIUS as i32, w))
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// SeparableBlur
// ============================================================================

/// Two-pass blur driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparableBlur {
    pub kernel: GaussianKernel,
    /// Tap spacing in texels.
    pub sigma: f64,
    pub edge: EdgePolicy,
}

impl SeparableBlur {
    pub fn new(sigma: f64, edge: EdgePolicy) -> Self {
        Self {
            kernel: GaussianKernel::standard(),
            sigma,
            edge,
        }
    }

    fn check_sizes(src: &RasterImage, dst: &RasterImage) -> Result<()> {
        if src.same_size(dst) {
            Ok(())
        } else {
            Err(LandscapeError::SizeMismatch {
                expected: src.size(),
                actual: dst.size(),
            })
        }
    }

    #[inline]
    fn convolve_x(&self, src: &RasterImage, x: u32, y: u32) -> Rgba {
        let mut sum = Rgba::no_color();
        for (offset, weight) in self.kernel.taps() {
            let tx = x as f64 + offset as f64 * self.sigma;
            sum += sample_bilinear(src, tx, y as f64, self.edge) * weight;
        }
        sum
    }

    #[inline]
    fn convolve_y(&self, src: &RasterImage, x: u32, y: u32) -> Rgba {
        let mut sum = Rgba::no_color();
        for (offset, weight) in self.kernel.taps() {
            let ty = y as f64 + offset as f64 * self.sigma;
            sum += sample_bilinear(src, x as f64, ty, self.edge) * weight;
        }
        sum
    }

    /// Horizontal pass: `dst(x, y) = Σ w[k] · src(x + k·sigma, y)`.
    pub fn horizontal(&self, src: &RasterImage, dst: &mut RasterImage) -> Result<()> {
        Self::check_sizes(src, dst)?;
        for y in 0..src.height() {
            for x in 0..src.width() {
                dst.set_pixel(x, y, self.convolve_x(src, x, y));
            }
        }
        Ok(())
    }

    /// Vertical pass without colorization.
    pub fn vertical(&self, src: &RasterImage, dst: &mut RasterImage) -> Result<()> {
        Self::check_sizes(src, dst)?;
        for y in 0..src.height() {
            for x in 0..src.width() {
                dst.set_pixel(x, y, self.convolve_y(src, x, y));
            }
        }
        Ok(())
    }

    /// Vertical pass that colorizes the blurred density.
    ///
    /// `channel` of the weighted sum is clamped to [0, 1], passed through
    /// `colorizer`, and written with alpha forced to 1.
    pub fn vertical_colorized<F: ColorFunction>(
        &self,
        src: &RasterImage,
        dst: &mut RasterImage,
        colorizer: &DensityColorizer<'_, F>,
        channel: DensityChannel,
    ) -> Result<()> {
        Self::check_sizes(src, dst)?;
        for y in 0..src.height() {
            for x in 0..src.width() {
                let density = self.convolve_y(src, x, y).channel(channel);
                let density = if density.is_nan() {
                    0.0
                } else {
                    density.clamp(0.0, 1.0)
                };
                let color = colorizer.colorize(density);
                dst.set_pixel(x, y, Rgba::with_opacity(&color, 1.0));
            }
        }
        Ok(())
    }
}

impl Default for SeparableBlur {
    fn default() -> Self {
        Self::new(1.0, EdgePolicy::Clamp)
    }
}
