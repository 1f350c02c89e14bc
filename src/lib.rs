//! # landscape-render
//!
//! Renders a 2D point "landscape": every data point is drawn as a small
//! marker, the marker image is blurred into a smooth density field, and the
//! density is mapped through a color ramp onto the output surface.
//!
//! ## Architecture
//!
//! A frame is a fixed three-pass pipeline over offscreen images:
//!
//! 1. **Raster** — [`PointRasterizer`] maps normalized points through a
//!    viewport [`TransAffine`] and fills disk, square or sprite markers
//! 2. **Horizontal blur** — [`SeparableBlur`] convolves with a literal
//!    19-tap Gaussian kernel along x (raster → ping)
//! 3. **Vertical blur + colorize** — the same kernel along y, with the
//!    resulting density mapped through a [`DensityColorizer`] (ping → pong)
//!
//! The [`Compositor`] owns the buffers, gates rendering on a dirty flag and
//! presents the final image into an RGBA8 [`OutputSurface`].
//!
//! ## Coordinates
//!
//! Points live in `[0,1]×[0,1]` with the origin at the top-left and `y`
//! pointing down. Pixel `(i, j)` has its center at `(i + 0.5, j + 0.5)`.

// Foundation
pub mod basics;
pub mod color;
pub mod error;
pub mod trans_affine;

// Images and sampling
pub mod image_accessors;
pub mod rendering_buffer;
pub mod surface;

// Pipeline
pub mod blur;
pub mod compositor;
pub mod config;
pub mod dataset;
pub mod density_ramp;
pub mod rasterizer;

#[cfg(feature = "png")]
pub mod assets;

pub use blur::{GaussianKernel, SeparableBlur, GAUSSIAN_WEIGHTS, KERNEL_RADIUS, KERNEL_SIZE};
pub use color::{DensityChannel, Rgba, Rgba8};
pub use compositor::{render, should_render, Compositor, FrameOutcome, RenderContext, RenderInputs};
pub use config::RenderConfig;
pub use dataset::{Point, PointDataset, PointRecord};
pub use density_ramp::{ColorFunction, DensityColorizer, DensityRamp, RampSampling};
pub use error::{LandscapeError, Result};
pub use image_accessors::EdgePolicy;
pub use rasterizer::{MarkerShape, PointRasterizer};
pub use rendering_buffer::{RasterImage, SpanBlend};
pub use surface::OutputSurface;
pub use trans_affine::TransAffine;
