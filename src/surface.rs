//! Output surface — the visible RGBA8 pixel buffer.

use crate::color::Rgba8;
use crate::error::{LandscapeError, Result};
use crate::rendering_buffer::RasterImage;

/// An RGBA pixel buffer with dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSurface {
    width: u32,
    height: u32,
    /// RGBA pixel data, row-major, top-to-bottom. Length = width * height * 4.
    data: Vec<u8>,
}

impl OutputSurface {
    /// Zero-sized surfaces are rejected: image dimensions would be undefined.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        })
    }

    /// Wrap existing RGBA8 data.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(LandscapeError::PixelData {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn fill(&mut self, c: Rgba8) {
        for p in self.data.chunks_exact_mut(4) {
            p.copy_from_slice(&c.to_array());
        }
    }

    /// Reallocate at new dimensions, cleared to transparent black.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width as usize * height as usize * 4, 0);
        Ok(())
    }

    /// Quantize `image` into the surface. Sizes must match exactly.
    pub fn present(&mut self, image: &RasterImage) -> Result<()> {
        if image.size() != self.size() {
            return Err(LandscapeError::SizeMismatch {
                expected: self.size(),
                actual: image.size(),
            });
        }
        for (dst, src) in self.data.chunks_exact_mut(4).zip(image.pixels()) {
            dst.copy_from_slice(&Rgba8::from_rgba(src).to_array());
        }
        Ok(())
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(LandscapeError::InvalidSurface { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            OutputSurface::new(0, 10),
            Err(LandscapeError::InvalidSurface { width: 0, height: 10 })
        ));
        assert!(OutputSurface::new(10, 0).is_err());
        let mut s = OutputSurface::new(2, 2).unwrap();
        assert!(s.resize(0, 0).is_err());
        assert_eq!(s.size(), (2, 2));
    }

    #[test]
    fn test_present_quantizes() {
        let mut img = RasterImage::new(2, 1);
        img.set_pixel(0, 0, Rgba::new(1.0, 0.5, 0.0, 1.0));
        img.set_pixel(1, 0, Rgba::new(2.0, -1.0, 0.25, 0.0));
        let mut s = OutputSurface::new(2, 1).unwrap();
        s.present(&img).unwrap();
        assert_eq!(s.pixel(0, 0), [255, 128, 0, 255]);
        assert_eq!(s.pixel(1, 0), [255, 0, 64, 0]);
    }

    #[test]
    fn test_present_size_mismatch() {
        let img = RasterImage::new(3, 3);
        let mut s = OutputSurface::new(2, 2).unwrap();
        assert!(matches!(
            s.present(&img),
            Err(LandscapeError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_rgba8_and_fill() {
        assert!(OutputSurface::from_rgba8(2, 2, vec![0; 15]).is_err());
        let mut s = OutputSurface::from_rgba8(1, 1, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(s.pixel(0, 0), [1, 2, 3, 4]);
        s.fill(Rgba8::new(9, 8, 7, 6));
        assert_eq!(s.data(), &[9, 8, 7, 6]);
    }
}
