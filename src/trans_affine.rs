//! Affine transformation matrix.
//!
//! Maps normalized dataset coordinates into pixel space. The landscape uses
//! a single convention: normalized `[0,1]×[0,1]` with the origin at the
//! top-left and `y` growing downward, so the viewport map is a pure scaling
//! by the surface dimensions.

/// 2D affine transformation matrix.
///
/// Stores six components `[sx, shy, shx, sy, tx, ty]`:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f64, y: f64) -> Self {
        Self {
            sx: x,
            shy: 0.0,
            shx: 0.0,
            sy: y,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Normalized `[0,1]²` to pixel space of a `width`×`height` surface.
    pub fn viewport(width: u32, height: u32) -> Self {
        Self::new_scaling(width as f64, height as f64)
    }

    /// Forward transform: `(x, y) -> (x', y')`.
    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let tmp = *x;
        *x = tmp * self.sx + *y * self.shx + self.tx;
        *y = tmp * self.shy + *y * self.sy + self.ty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_maps_corners() {
        let m = TransAffine::viewport(200, 100);
        let (mut x, mut y) = (1.0, 1.0);
        m.transform(&mut x, &mut y);
        assert_eq!((x, y), (200.0, 100.0));

        let (mut x, mut y) = (0.5, 0.5);
        m.transform(&mut x, &mut y);
        assert_eq!((x, y), (100.0, 50.0));
    }

    #[test]
    fn test_viewport_scales_linearly_with_size() {
        let small = TransAffine::viewport(100, 100);
        let large = TransAffine::viewport(200, 200);
        for &(nx, ny) in &[(0.1, 0.1), (0.5, 0.5), (0.9, 0.9)] {
            let (mut sx, mut sy) = (nx, ny);
            small.transform(&mut sx, &mut sy);
            let (mut lx, mut ly) = (nx, ny);
            large.transform(&mut lx, &mut ly);
            assert!((lx - 2.0 * sx).abs() < 1e-12);
            assert!((ly - 2.0 * sy).abs() < 1e-12);
        }
    }

    #[test]
    fn test_out_of_range_points_are_not_clamped() {
        let m = TransAffine::viewport(100, 100);
        let (mut x, mut y) = (-0.5, 1.5);
        m.transform(&mut x, &mut y);
        assert_eq!((x, y), (-50.0, 150.0));

        let (mut x, mut y) = (-1e8, 1e9);
        m.transform(&mut x, &mut y);
        assert_eq!((x, y), (-1e10, 1e11));
    }
}
