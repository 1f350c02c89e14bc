//! PNG assets — density ramp strips, marker sprites and surface export.
//!
//! Everything goes through the `image` crate and is decoded to RGBA8 first,
//! so palette, grayscale and 16-bit PNGs are all accepted.

use std::path::Path;

use image::{ImageBuffer, Rgba as ImageRgba, RgbaImage};

use crate::density_ramp::DensityRamp;
use crate::error::{LandscapeError, Result};
use crate::rendering_buffer::RasterImage;
use crate::surface::OutputSurface;

fn open_rgba8(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| LandscapeError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

fn save_rgba8(path: &Path, width: u32, height: u32, data: Vec<u8>) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    let actual = data.len();
    let buf: RgbaImage =
        ImageBuffer::<ImageRgba<u8>, _>::from_raw(width, height, data).ok_or(
            LandscapeError::PixelData {
                width,
                height,
                expected,
                actual,
            },
        )?;
    buf.save(path).map_err(|source| LandscapeError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), width, height, "image written");
    Ok(())
}

/// Load a 1×K or K×1 ramp strip.
pub fn load_ramp(path: impl AsRef<Path>) -> Result<DensityRamp> {
    let path = path.as_ref();
    let img = open_rgba8(path)?;
    let ramp = DensityRamp::from_strip(img.width(), img.height(), img.as_raw())?;
    tracing::info!(path = %path.display(), entries = ramp.len(), "density ramp loaded");
    Ok(ramp)
}

/// Load a ramp, or log the failure and return `fallback`.
pub fn load_ramp_or(path: impl AsRef<Path>, fallback: DensityRamp) -> DensityRamp {
    let path = path.as_ref();
    match load_ramp(path) {
        Ok(ramp) => ramp,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "density ramp unavailable, using fallback");
            fallback
        }
    }
}

/// Load a marker sprite.
pub fn load_sprite(path: impl AsRef<Path>) -> Result<RasterImage> {
    let path = path.as_ref();
    let img = open_rgba8(path)?;
    let sprite = RasterImage::from_rgba8(img.width(), img.height(), img.as_raw())?;
    tracing::info!(
        path = %path.display(),
        width = sprite.width(),
        height = sprite.height(),
        "marker sprite loaded"
    );
    Ok(sprite)
}

/// Load a PNG as an output surface, e.g. a reference frame.
pub fn load_surface(path: impl AsRef<Path>) -> Result<OutputSurface> {
    let img = open_rgba8(path.as_ref())?;
    OutputSurface::from_rgba8(img.width(), img.height(), img.into_raw())
}

pub fn save_surface(surface: &OutputSurface, path: impl AsRef<Path>) -> Result<()> {
    save_rgba8(
        path.as_ref(),
        surface.width(),
        surface.height(),
        surface.data().to_vec(),
    )
}

/// Write `ramp` as a K×1 strip that [`load_ramp`] reads back.
pub fn save_ramp_strip(ramp: &DensityRamp, path: impl AsRef<Path>) -> Result<()> {
    save_rgba8(path.as_ref(), ramp.len() as u32, 1, ramp.to_strip_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgba, Rgba8};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("landscape-render-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_ramp_strip_survives_png() {
        let path = temp_path("ramp.png");
        let ramp = DensityRamp::landscape();
        save_ramp_strip(&ramp, &path).unwrap();
        let loaded = load_ramp(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), ramp.len());
        assert_eq!(loaded.to_strip_rgba8(), ramp.to_strip_rgba8());
    }

    #[test]
    fn test_missing_ramp_uses_fallback() {
        let fallback = DensityRamp::solid(Rgba::new_rgb(0.0, 0.0, 1.0));
        let ramp = load_ramp_or(temp_path("does-not-exist.png"), fallback.clone());
        assert_eq!(ramp, fallback);

        let err = load_ramp(temp_path("does-not-exist.png")).unwrap_err();
        assert!(matches!(err, LandscapeError::Image { .. }));
    }

    #[test]
    fn test_non_strip_png_is_rejected() {
        let path = temp_path("square.png");
        let mut s = OutputSurface::new(3, 3).unwrap();
        s.fill(Rgba8::new(10, 20, 30, 255));
        save_surface(&s, &path).unwrap();

        let err = load_ramp(&path).unwrap_err();
        assert!(matches!(err, LandscapeError::RampShape { width: 3, height: 3 }));

        let sprite = load_sprite(&path).unwrap();
        assert_eq!(sprite.size(), (3, 3));
        assert_eq!(load_surface(&path).unwrap(), s);
        std::fs::remove_file(&path).ok();
    }
}
