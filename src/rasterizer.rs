//! Point rasterizer — draws every dataset point as a fixed-size marker.
//!
//! This is the first offscreen pass. The target is cleared to transparent
//! black, then each point is mapped through the viewport transform and
//! filled as a disk, a square, or a sprite-textured square. Coverage is
//! decided per pixel center (no anti-aliasing), so a marker never spills
//! beyond its radius. Markers partly or wholly outside the target are
//! clipped.

use serde::{Deserialize, Serialize};

use crate::basics::{first_center_at_or_after, last_center_at_or_before};
use crate::color::Rgba;
use crate::dataset::PointDataset;
use crate::image_accessors::{sample_nearest_uv, EdgePolicy};
use crate::rendering_buffer::{RasterImage, SpanBlend};
use crate::trans_affine::TransAffine;

/// Default marker radius in pixels.
pub const DEFAULT_RADIUS: f64 = 10.0;

/// Marker geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    #[default]
    Disk,
    Square,
    /// Square mapped with the marker sprite; falls back to `Square` when no
    /// sprite is loaded.
    Textured,
}

/// Draws a [`PointDataset`] into a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRasterizer {
    /// Marker radius in pixels.
    pub radius: f64,
    pub shape: MarkerShape,
    pub blend: SpanBlend,
}

impl PointRasterizer {
    pub fn new(radius: f64, shape: MarkerShape) -> Self {
        Self {
            radius,
            shape,
            blend: SpanBlend::Replace,
        }
    }

    pub fn with_blend(mut self, blend: SpanBlend) -> Self {
        self.blend = blend;
        self
    }

    /// Shape actually drawn, given whether a sprite is available.
    pub fn effective_shape(&self, sprite: Option<&RasterImage>) -> MarkerShape {
        match (self.shape, sprite) {
            (MarkerShape::Textured, Some(s)) if !s.is_empty() => MarkerShape::Textured,
            (MarkerShape::Textured, _) => MarkerShape::Square,
            (shape, _) => shape,
        }
    }

    /// Clear `target` and draw every point of `dataset` into it.
    ///
    /// Output dimensions always equal the target's, whatever the point count.
    pub fn rasterize(
        &self,
        dataset: &PointDataset,
        sprite: Option<&RasterImage>,
        target: &mut RasterImage,
    ) {
        target.clear(Rgba::no_color());
        if target.is_empty() {
            return;
        }
        let shape = self.effective_shape(sprite);
        let mtx = TransAffine::viewport(target.width(), target.height());
        let r = self.radius.max(0.0);
        let (width, height) = (target.width() as f64, target.height() as f64);

        for point in dataset {
            let (mut cx, mut cy) = (point.x, point.y);
            mtx.transform(&mut cx, &mut cy);
            if !cx.is_finite() || !cy.is_finite() {
                continue;
            }
            if cx + r < 0.0 || cx - r > width || cy + r < 0.0 || cy - r > height {
                continue;
            }
            let color = Rgba::with_opacity(&point.color, 1.0);
            match (shape, sprite) {
                (MarkerShape::Disk, _) => self.draw_disk(target, cx, cy, r, &color),
                (MarkerShape::Textured, Some(sprite)) if r > 0.0 => {
                    self.draw_sprite(target, sprite, cx, cy, r, &color)
                }
                _ => self.draw_square(target, cx, cy, r, &color),
            }
        }
    }

    /// Clipped row range covered by a marker centered at `cy`.
    fn rows(target: &RasterImage, cy: f64, r: f64) -> (i32, i32) {
        let y1 = first_center_at_or_after(cy - r).max(0);
        let y2 = last_center_at_or_before(cy + r).min(target.height() as i32 - 1);
        (y1, y2)
    }

    fn draw_disk(&self, target: &mut RasterImage, cx: f64, cy: f64, r: f64, c: &Rgba) {
        let (y1, y2) = Self::rows(target, cy, r);
        for y in y1..=y2 {
            let dy = y as f64 + 0.5 - cy;
            let half = (r * r - dy * dy).max(0.0).sqrt();
            let x1 = first_center_at_or_after(cx - half);
            let x2 = last_center_at_or_before(cx + half);
            target.blend_hline(x1, x2, y, c, self.blend);
        }
    }

    fn draw_square(&self, target: &mut RasterImage, cx: f64, cy: f64, r: f64, c: &Rgba) {
        let (y1, y2) = Self::rows(target, cy, r);
        let x1 = first_center_at_or_after(cx - r);
        let x2 = last_center_at_or_before(cx + r);
        for y in y1..=y2 {
            target.blend_hline(x1, x2, y, c, self.blend);
        }
    }

    fn draw_sprite(
        &self,
        target: &mut RasterImage,
        sprite: &RasterImage,
        cx: f64,
        cy: f64,
        r: f64,
        c: &Rgba,
    ) {
        let (y1, y2) = Self::rows(target, cy, r);
        let x1 = first_center_at_or_after(cx - r).max(0);
        let x2 = last_center_at_or_before(cx + r).min(target.width() as i32 - 1);
        let size = 2.0 * r;
        for y in y1..=y2 {
            let v = (y as f64 + 0.5 - (cy - r)) / size;
            for x in x1..=x2 {
                let u = (x as f64 + 0.5 - (cx - r)) / size;
                let texel = sample_nearest_uv(sprite, u, v, EdgePolicy::Clamp);
                if texel.a <= 0.0 {
                    continue;
                }
                target.blend_pixel(x, y, &texel.modulate(c), self.blend);
            }
        }
    }
}

impl Default for PointRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, MarkerShape::Disk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Point;

    fn lit_pixels(img: &RasterImage) -> Vec<(u32, u32)> {
        let mut lit = Vec::new();
        for y in 0..img.height() {
            for x in 0..img.width() {
                if img.pixel(x, y).a > 0.0 {
                    lit.push((x, y));
                }
            }
        }
        lit
    }

    fn centroid(img: &RasterImage) -> (f64, f64) {
        let lit = lit_pixels(img);
        let n = lit.len() as f64;
        let sx: f64 = lit.iter().map(|&(x, _)| x as f64 + 0.5).sum();
        let sy: f64 = lit.iter().map(|&(_, y)| y as f64 + 0.5).sum();
        (sx / n, sy / n)
    }

    #[test]
    fn test_dimensions_independent_of_point_count() {
        for n in [0usize, 1, 17, 500] {
            let ds = PointDataset::from_positions((0..n).map(|i| {
                let t = i as f64 / 500.0;
                (t, 1.0 - t)
            }));
            let mut img = RasterImage::new(64, 48);
            PointRasterizer::default().rasterize(&ds, None, &mut img);
            assert_eq!(img.size(), (64, 48));
        }
    }

    #[test]
    fn test_empty_dataset_leaves_background() {
        let mut img = RasterImage::new(32, 32);
        img.clear(Rgba::red());
        PointRasterizer::default().rasterize(&PointDataset::default(), None, &mut img);
        assert!(img.pixels().iter().all(|p| *p == Rgba::no_color()));
    }

    #[test]
    fn test_disk_covers_pixel_centers_within_radius() {
        let ds = PointDataset::from_positions([(0.5, 0.5)]);
        let mut img = RasterImage::new(100, 100);
        PointRasterizer::new(10.0, MarkerShape::Disk).rasterize(&ds, None, &mut img);

        for y in 0..100u32 {
            for x in 0..100u32 {
                let dx = x as f64 + 0.5 - 50.0;
                let dy = y as f64 + 0.5 - 50.0;
                let inside = dx * dx + dy * dy <= 100.0;
                assert_eq!(img.pixel(x, y).a > 0.0, inside, "({x},{y})");
            }
        }
        let area = lit_pixels(&img).len() as f64;
        assert!((area - std::f64::consts::PI * 100.0).abs() < 20.0, "area={area}");
    }

    #[test]
    fn test_disk_centered_is_mirror_symmetric() {
        let ds = PointDataset::from_positions([(0.5, 0.5)]);
        let mut img = RasterImage::new(40, 30);
        PointRasterizer::new(7.5, MarkerShape::Disk).rasterize(&ds, None, &mut img);
        for y in 0..30 {
            for x in 0..40 {
                assert_eq!(img.pixel(x, y), img.pixel(39 - x, y));
                assert_eq!(img.pixel(x, y), img.pixel(x, 29 - y));
            }
        }
    }

    #[test]
    fn test_square_marker() {
        let ds = PointDataset::from_positions([(0.5, 0.5)]);
        let mut img = RasterImage::new(20, 20);
        PointRasterizer::new(3.0, MarkerShape::Square).rasterize(&ds, None, &mut img);
        let lit = lit_pixels(&img);
        assert_eq!(lit.len(), 36);
        assert!(lit.iter().all(|&(x, y)| (7..13).contains(&x) && (7..13).contains(&y)));
    }

    #[test]
    fn test_color_written_with_forced_alpha() {
        let ds = PointDataset::new(vec![Point::with_color(
            0.5,
            0.5,
            Rgba::new(0.2, 0.4, 0.6, 0.1),
        )]);
        let mut img = RasterImage::new(10, 10);
        PointRasterizer::new(2.0, MarkerShape::Disk).rasterize(&ds, None, &mut img);
        assert_eq!(img.pixel(5, 5), Rgba::new(0.2, 0.4, 0.6, 1.0));
    }

    #[test]
    fn test_out_of_frame_points_are_clipped() {
        let ds = PointDataset::from_positions([(-1.0, 0.5), (2.0, 2.0), (0.5, -0.5)]);
        let mut img = RasterImage::new(50, 50);
        PointRasterizer::default().rasterize(&ds, None, &mut img);
        assert!(lit_pixels(&img).is_empty());

        // A marker straddling the border is partially visible.
        let ds = PointDataset::from_positions([(0.0, 0.0)]);
        PointRasterizer::default().rasterize(&ds, None, &mut img);
        let lit = lit_pixels(&img);
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| x < 10 && y < 10));
    }

    #[test]
    fn test_far_out_of_frame_points_are_not_drawn() {
        let ds = PointDataset::from_positions([
            (-1e8, -1e8),
            (1e8, 0.5),
            (0.5, -1e12),
            (1e300, 1e300),
            (-1e300, 0.5),
        ]);
        let mut img = RasterImage::new(100, 100);
        for shape in [MarkerShape::Disk, MarkerShape::Square] {
            PointRasterizer::new(10.0, shape).rasterize(&ds, None, &mut img);
            assert!(lit_pixels(&img).is_empty(), "{shape:?}");
        }
        let sprite = RasterImage::from_rgba8(1, 1, &[255, 255, 255, 255]).unwrap();
        PointRasterizer::new(10.0, MarkerShape::Textured).rasterize(&ds, Some(&sprite), &mut img);
        assert!(lit_pixels(&img).is_empty());
    }

    #[test]
    fn test_huge_radius_covers_frame_without_overflow() {
        let ds = PointDataset::from_positions([(0.5, 0.5)]);
        let mut img = RasterImage::new(16, 12);
        PointRasterizer::new(1e12, MarkerShape::Disk).rasterize(&ds, None, &mut img);
        assert_eq!(lit_pixels(&img).len(), 16 * 12);
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let ds = PointDataset::from_positions([(f64::NAN, 0.5), (0.5, f64::INFINITY)]);
        let mut img = RasterImage::new(16, 16);
        PointRasterizer::default().rasterize(&ds, None, &mut img);
        assert!(lit_pixels(&img).is_empty());
    }

    #[test]
    fn test_rasterize_is_idempotent() {
        let ds = PointDataset::from_positions([(0.2, 0.3), (0.25, 0.3), (0.8, 0.9)]);
        let r = PointRasterizer::default();
        let mut a = RasterImage::new(64, 64);
        r.rasterize(&ds, None, &mut a);
        let first = a.clone();
        r.rasterize(&ds, None, &mut a);
        assert_eq!(a, first);
    }

    #[test]
    fn test_additive_blend_accumulates_overlaps() {
        let ds = PointDataset::new(vec![
            Point::with_color(0.5, 0.5, Rgba::new_rgb(0.25, 0.0, 0.0)),
            Point::with_color(0.5, 0.5, Rgba::new_rgb(0.25, 0.0, 0.0)),
        ]);
        let mut img = RasterImage::new(20, 20);
        PointRasterizer::new(2.0, MarkerShape::Disk)
            .with_blend(SpanBlend::Additive)
            .rasterize(&ds, None, &mut img);
        assert_eq!(img.pixel(10, 10).r, 0.5);

        PointRasterizer::new(2.0, MarkerShape::Disk).rasterize(&ds, None, &mut img);
        assert_eq!(img.pixel(10, 10).r, 0.25);
    }

    #[test]
    fn test_textured_marker_modulates_sprite() {
        // 2x2 sprite: left column opaque white, right column transparent.
        let sprite = RasterImage::from_rgba8(
            2,
            2,
            &[
                255, 255, 255, 255, 0, 0, 0, 0, //
                255, 255, 255, 255, 0, 0, 0, 0,
            ],
        )
        .unwrap();
        let ds = PointDataset::new(vec![Point::with_color(0.5, 0.5, Rgba::new_rgb(0.0, 1.0, 0.0))]);
        let mut img = RasterImage::new(20, 20);
        PointRasterizer::new(4.0, MarkerShape::Textured).rasterize(&ds, Some(&sprite), &mut img);

        assert_eq!(img.pixel(7, 10), Rgba::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(img.pixel(12, 10), Rgba::no_color());
        assert_eq!(lit_pixels(&img).len(), 32);
    }

    #[test]
    fn test_textured_without_sprite_falls_back_to_square() {
        let r = PointRasterizer::new(3.0, MarkerShape::Textured);
        assert_eq!(r.effective_shape(None), MarkerShape::Square);
        let ds = PointDataset::from_positions([(0.5, 0.5)]);
        let mut img = RasterImage::new(20, 20);
        r.rasterize(&ds, None, &mut img);
        assert_eq!(lit_pixels(&img).len(), 36);
    }

    #[test]
    fn test_markers_scale_with_surface_size() {
        let ds = PointDataset::from_positions([(0.1, 0.1), (0.5, 0.5), (0.9, 0.9)]);
        let r = PointRasterizer::new(2.0, MarkerShape::Disk);

        let mut small = RasterImage::new(100, 100);
        r.rasterize(&PointDataset::from_positions([(0.9, 0.9)]), None, &mut small);
        let mut large = RasterImage::new(200, 200);
        r.rasterize(&PointDataset::from_positions([(0.9, 0.9)]), None, &mut large);

        let (sx, sy) = centroid(&small);
        let (lx, ly) = centroid(&large);
        assert!((sx - 90.0).abs() < 1e-9 && (sy - 90.0).abs() < 1e-9);
        assert!((lx - 180.0).abs() < 1e-9 && (ly - 180.0).abs() < 1e-9);

        // Marker size stays in pixels: same pixel count at both sizes.
        let mut a = RasterImage::new(100, 100);
        let mut b = RasterImage::new(200, 200);
        r.rasterize(&ds, None, &mut a);
        r.rasterize(&ds, None, &mut b);
        assert_eq!(lit_pixels(&a).len(), lit_pixels(&b).len());
    }
}
