//! Frame comparison helpers for the `landscape` CLI.
//!
//! Compares two rendered surfaces pixel by pixel and builds visual diffs.

use landscape_render::{LandscapeError, OutputSurface, Result};

// ============================================================================
// Comparison Result
// ============================================================================

/// A single differing pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: [u8; 4],
    pub pixel_b: [u8; 4],
}

/// Result of comparing two surfaces.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub total_pixels: u64,
    /// Pixels with any channel differing by more than the tolerance.
    pub different_pixels: u64,
    /// Largest absolute difference over all channels of all pixels.
    pub max_channel_diff: u8,
    /// Mean absolute difference over the channels that differ at all.
    pub mean_channel_diff: f64,
    /// First differing pixel in scan order.
    pub first_diff: Option<DiffInfo>,
    /// `histogram[d]` = number of channels differing by exactly `d`.
    pub diff_histogram: [u64; 256],
}

impl CompareResult {
    pub fn matches(&self) -> bool {
        self.different_pixels == 0
    }
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.matches() {
            return write!(
                f,
                "MATCH: {} pixels (max channel diff {})",
                self.total_pixels, self.max_channel_diff
            );
        }
        write!(
            f,
            "DIFFERENT: {}/{} pixels differ ({:.2}%), max_diff={}, mean_diff={:.4}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
            self.mean_channel_diff,
        )?;
        if let Some(ref d) = self.first_diff {
            write!(
                f,
                "\n  First diff at ({}, {}): A={:?} B={:?}",
                d.x, d.y, d.pixel_a, d.pixel_b
            )?;
        }
        Ok(())
    }
}

fn check_same_size(a: &OutputSurface, b: &OutputSurface) -> Result<()> {
    if a.size() != b.size() {
        return Err(LandscapeError::SizeMismatch {
            expected: a.size(),
            actual: b.size(),
        });
    }
    Ok(())
}

fn channel_diff(a: u8, b: u8) -> u8 {
    a.abs_diff(b)
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare two surfaces. A pixel counts as different when any channel
/// differs by more than `tolerance`.
pub fn compare_surfaces(a: &OutputSurface, b: &OutputSurface, tolerance: u8) -> Result<CompareResult> {
    check_same_size(a, b)?;

    let mut different_pixels = 0u64;
    let mut max_channel_diff = 0u8;
    let mut diff_sum = 0u64;
    let mut diff_channels = 0u64;
    let mut first_diff = None;
    let mut diff_histogram = [0u64; 256];

    for y in 0..a.height() {
        for x in 0..a.width() {
            let pa = a.pixel(x, y);
            let pb = b.pixel(x, y);
            let mut worst = 0u8;
            for c in 0..4 {
                let d = channel_diff(pa[c], pb[c]);
                if d > 0 {
                    diff_sum += d as u64;
                    diff_channels += 1;
                    diff_histogram[d as usize] += 1;
                }
                worst = worst.max(d);
            }
            max_channel_diff = max_channel_diff.max(worst);
            if worst > tolerance {
                different_pixels += 1;
                if first_diff.is_none() {
                    first_diff = Some(DiffInfo {
                        x,
                        y,
                        pixel_a: pa,
                        pixel_b: pb,
                    });
                }
            }
        }
    }

    Ok(CompareResult {
        total_pixels: a.width() as u64 * a.height() as u64,
        different_pixels,
        max_channel_diff,
        mean_channel_diff: if diff_channels > 0 {
            diff_sum as f64 / diff_channels as f64
        } else {
            0.0
        },
        first_diff,
        diff_histogram,
    })
}

/// Visual diff: identical pixels dark gray, differing pixels red with
/// brightness proportional to the largest color difference (amplified 10x).
pub fn generate_diff_image(a: &OutputSurface, b: &OutputSurface) -> Result<OutputSurface> {
    check_same_size(a, b)?;
    let mut data = Vec::with_capacity(a.data().len());
    for (pa, pb) in a.data().chunks_exact(4).zip(b.data().chunks_exact(4)) {
        let d = (0..3).map(|c| channel_diff(pa[c], pb[c])).max().unwrap_or(0);
        if d == 0 {
            data.extend_from_slice(&[40, 40, 40, 255]);
        } else {
            let v = (d as u16 * 10).min(255) as u8;
            data.extend_from_slice(&[v, 0, 0, 255]);
        }
    }
    OutputSurface::from_rgba8(a.width(), a.height(), data)
}

/// Side-by-side panel `[A | diff | B]`.
pub fn generate_sidebyside(a: &OutputSurface, b: &OutputSurface) -> Result<OutputSurface> {
    let diff = generate_diff_image(a, b)?;
    let row = a.width() as usize * 4;
    let mut data = Vec::with_capacity(row * 3 * a.height() as usize);
    for y in 0..a.height() as usize {
        let span = y * row..(y + 1) * row;
        data.extend_from_slice(&a.data()[span.clone()]);
        data.extend_from_slice(&diff.data()[span.clone()]);
        data.extend_from_slice(&b.data()[span]);
    }
    OutputSurface::from_rgba8(a.width() * 3, a.height(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landscape_render::Rgba8;

    fn filled(w: u32, h: u32, c: Rgba8) -> OutputSurface {
        let mut s = OutputSurface::new(w, h).unwrap();
        s.fill(c);
        s
    }

    #[test]
    fn test_identical_surfaces_match() {
        let a = filled(4, 3, Rgba8::new(1, 2, 3, 255));
        let r = compare_surfaces(&a, &a.clone(), 0).unwrap();
        assert!(r.matches());
        assert_eq!(r.total_pixels, 12);
        assert_eq!(r.max_channel_diff, 0);
        assert!(r.first_diff.is_none());
        assert!(r.to_string().starts_with("MATCH"));
    }

    #[test]
    fn test_difference_is_located_and_measured() {
        let a = filled(3, 2, Rgba8::new(100, 100, 100, 255));
        let mut data = a.data().to_vec();
        // Pixel (2, 1), green channel.
        data[(3 + 2) * 4 + 1] = 103;
        let b = OutputSurface::from_rgba8(3, 2, data).unwrap();

        let r = compare_surfaces(&a, &b, 0).unwrap();
        assert_eq!(r.different_pixels, 1);
        assert_eq!(r.max_channel_diff, 3);
        assert_eq!(r.diff_histogram[3], 1);
        assert_eq!(
            r.first_diff,
            Some(DiffInfo {
                x: 2,
                y: 1,
                pixel_a: [100, 100, 100, 255],
                pixel_b: [100, 103, 100, 255],
            })
        );

        let tolerant = compare_surfaces(&a, &b, 3).unwrap();
        assert!(tolerant.matches());
        assert_eq!(tolerant.max_channel_diff, 3);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let a = filled(2, 2, Rgba8::new(0, 0, 0, 255));
        let b = filled(2, 3, Rgba8::new(0, 0, 0, 255));
        assert!(compare_surfaces(&a, &b, 0).is_err());
        assert!(generate_diff_image(&a, &b).is_err());
    }

    #[test]
    fn test_diff_image_highlights_changes() {
        let a = filled(2, 1, Rgba8::new(10, 10, 10, 255));
        let b = OutputSurface::from_rgba8(2, 1, vec![10, 10, 10, 255, 15, 10, 10, 255]).unwrap();
        let d = generate_diff_image(&a, &b).unwrap();
        assert_eq!(d.pixel(0, 0), [40, 40, 40, 255]);
        assert_eq!(d.pixel(1, 0), [50, 0, 0, 255]);

        let s = generate_sidebyside(&a, &b).unwrap();
        assert_eq!(s.size(), (6, 1));
        assert_eq!(s.pixel(0, 0), a.pixel(0, 0));
        assert_eq!(s.pixel(3, 0), [50, 0, 0, 255]);
        assert_eq!(s.pixel(5, 0), b.pixel(1, 0));
    }
}
