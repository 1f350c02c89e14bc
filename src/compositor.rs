//! Compositor — runs the offscreen passes and presents the result.
//!
//! A frame is three passes in fixed order:
//!
//! 1. **Raster** — [`PointRasterizer`] draws markers into `raster`
//! 2. **Horizontal blur** — `raster` → `ping`
//! 3. **Vertical blur + colorize** — `ping` → `pong`, then `pong` is
//!    quantized into the [`OutputSurface`]
//!
//! In particles-only mode the raw `raster` image is presented and both blur
//! passes are skipped. All buffers live in an explicit [`RenderContext`]
//! that is resized as a unit, so a frame never mixes image sizes.
//!
//! [`Compositor`] adds the frame-driven contract on top: an external loop
//! calls [`Compositor::tick`] once per refresh, and a render only happens
//! when [`should_render`] says so.

use crate::blur::SeparableBlur;
use crate::color::Rgba;
use crate::config::RenderConfig;
use crate::dataset::PointDataset;
use crate::density_ramp::{DensityColorizer, DensityRamp};
use crate::error::{LandscapeError, Result};
use crate::rasterizer::PointRasterizer;
use crate::rendering_buffer::RasterImage;
use crate::surface::{check_dimensions, OutputSurface};

// ============================================================================
// RenderContext
// ============================================================================

/// The three offscreen images of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    raster: RasterImage,
    ping: RasterImage,
    pong: RasterImage,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            raster: RasterImage::new(width, height),
            ping: RasterImage::new(width, height),
            pong: RasterImage::new(width, height),
        })
    }

    /// Recreate all three images at the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        self.raster.resize(width, height);
        self.ping.resize(width, height);
        self.pong.resize(width, height);
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.raster.size()
    }

    /// Marker pass output.
    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    /// Horizontal blur output.
    pub fn ping(&self) -> &RasterImage {
        &self.ping
    }

    /// Final colorized image.
    pub fn pong(&self) -> &RasterImage {
        &self.pong
    }
}

/// Read-only inputs of a frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderInputs<'a> {
    pub dataset: &'a PointDataset,
    pub ramp: &'a DensityRamp,
    pub sprite: Option<&'a RasterImage>,
}

// ============================================================================
// Frame pipeline
// ============================================================================

/// Whether a tick should produce a frame.
#[inline]
pub fn should_render(dirty: bool, force_render: bool) -> bool {
    dirty || force_render
}

/// Render one frame into `surface`.
///
/// Fails without touching any buffer if the configuration is invalid or the
/// surface does not match the context size. Otherwise every pass runs to
/// completion before returning.
pub fn render(
    ctx: &mut RenderContext,
    inputs: &RenderInputs<'_>,
    config: &RenderConfig,
    surface: &mut OutputSurface,
) -> Result<()> {
    config.validate()?;
    if surface.size() != ctx.size() {
        return Err(LandscapeError::SizeMismatch {
            expected: ctx.size(),
            actual: surface.size(),
        });
    }

    let rasterizer =
        PointRasterizer::new(config.radius, config.marker).with_blend(config.marker_blend);
    rasterizer.rasterize(inputs.dataset, inputs.sprite, &mut ctx.raster);
    tracing::debug!(points = inputs.dataset.len(), "raster pass");

    if config.particles_only {
        return surface.present(&ctx.raster);
    }

    let blur = SeparableBlur::new(config.sigma, config.edge_policy);
    blur.horizontal(&ctx.raster, &mut ctx.ping)?;
    tracing::debug!(sigma = config.sigma, "horizontal blur pass");

    let colorizer = DensityColorizer::new(inputs.ramp, config.ramp_sampling);
    blur.vertical_colorized(&ctx.ping, &mut ctx.pong, &colorizer, config.density_channel)?;
    tracing::debug!(sigma = config.sigma, "vertical blur pass");

    surface.present(&ctx.pong)
}

// ============================================================================
// Compositor
// ============================================================================

/// Result of a [`Compositor::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// Nothing changed and rendering was not forced.
    Idle,
    /// The frame failed and was skipped; the next tick retries.
    Dropped,
}

/// Owns the dataset, assets, offscreen buffers and output surface.
#[derive(Debug, Clone)]
pub struct Compositor {
    dataset: PointDataset,
    ramp: DensityRamp,
    sprite: Option<RasterImage>,
    context: RenderContext,
    surface: OutputSurface,
    pending_resize: Option<(u32, u32)>,
    dirty: bool,
    frames: u64,
}

impl Compositor {
    /// Fails for a zero-sized surface.
    pub fn new(dataset: PointDataset, ramp: DensityRamp, width: u32, height: u32) -> Result<Self> {
        let context = RenderContext::new(width, height)?;
        let surface = OutputSurface::new(width, height)?;
        tracing::info!(width, height, points = dataset.len(), "compositor initialized");
        Ok(Self {
            dataset,
            ramp,
            sprite: None,
            context,
            surface,
            pending_resize: None,
            dirty: true,
            frames: 0,
        })
    }

    pub fn with_sprite(mut self, sprite: RasterImage) -> Self {
        self.sprite = Some(sprite);
        self.dirty = true;
        self
    }

    /// Render unconditionally and clear the dirty flag.
    pub fn render(&mut self, config: &RenderConfig) -> Result<()> {
        let inputs = RenderInputs {
            dataset: &self.dataset,
            ramp: &self.ramp,
            sprite: self.sprite.as_ref(),
        };
        render(&mut self.context, &inputs, config, &mut self.surface)?;
        self.dirty = false;
        self.frames += 1;
        Ok(())
    }

    /// One refresh tick of the external frame loop.
    ///
    /// Applies a pending resize, then renders if [`should_render`] allows.
    /// Errors are logged and the frame is dropped; the dirty flag stays set
    /// so the next tick tries again.
    pub fn tick(&mut self, config: &RenderConfig) -> FrameOutcome {
        if let Some((width, height)) = self.pending_resize.take() {
            if let Err(err) = self.resize(width, height) {
                tracing::warn!(%err, width, height, "resize rejected, frame dropped");
                return FrameOutcome::Dropped;
            }
        }
        if !should_render(self.dirty, config.force_render) {
            return FrameOutcome::Idle;
        }
        match self.render(config) {
            Ok(()) => FrameOutcome::Rendered,
            Err(err) => {
                tracing::warn!(%err, "frame dropped");
                FrameOutcome::Dropped
            }
        }
    }

    /// Recreate every image at the new size before the next render.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        if (width, height) == self.surface.size() {
            return Ok(());
        }
        self.context.resize(width, height)?;
        self.surface.resize(width, height)?;
        self.dirty = true;
        tracing::info!(width, height, "surface resized");
        Ok(())
    }

    /// Defer a resize to the start of the next tick.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width, height));
    }

    pub fn set_dataset(&mut self, dataset: PointDataset) {
        self.dataset = dataset;
        self.dirty = true;
    }

    pub fn set_point_color(&mut self, index: usize, color: Rgba) -> Result<()> {
        self.dataset.set_color(index, color)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_ramp(&mut self, ramp: DensityRamp) {
        self.ramp = ramp;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn dataset(&self) -> &PointDataset {
        &self.dataset
    }

    pub fn ramp(&self) -> &DensityRamp {
        &self.ramp
    }

    pub fn surface(&self) -> &OutputSurface {
        &self.surface
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}
