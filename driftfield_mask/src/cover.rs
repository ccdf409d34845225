// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The object-fit "cover" mapping between mask pixels and an element rect.

use kurbo::Size;

/// Centered "cover" crop from a mask's native pixel space onto an element.
///
/// A cover fit scales the source so it fills the destination box completely,
/// cropping the overflowing axis symmetrically:
///
/// - when the mask is wider (in aspect) than the element, the sides are
///   cropped: the visible width is `mask_height * element_aspect`, centered;
/// - otherwise the top and bottom are cropped: the visible height is
///   `mask_width / element_aspect`, centered.
///
/// The mapping works on fractions of the element rect (`0..1` across each
/// axis), so callers convert pointer positions to fractions first and screen
/// rects back from fractions afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    crop_x: f64,
    crop_y: f64,
    visible_w: f64,
    visible_h: f64,
}

impl CoverFit {
    /// Computes the crop for a mask of `mask_size` covering an element of
    /// `element_size`.
    ///
    /// Returns `None` when either size is degenerate (a zero or negative
    /// dimension), since no crop is defined then.
    #[must_use]
    pub fn new(mask_size: Size, element_size: Size) -> Option<Self> {
        if mask_size.width <= 0.0
            || mask_size.height <= 0.0
            || element_size.width <= 0.0
            || element_size.height <= 0.0
        {
            return None;
        }
        let element_aspect = element_size.width / element_size.height;
        let mask_aspect = mask_size.width / mask_size.height;

        let (crop_x, crop_y, visible_w, visible_h) = if mask_aspect > element_aspect {
            // Mask is wider: crop left/right, full height visible.
            let visible_w = mask_size.height * element_aspect;
            ((mask_size.width - visible_w) / 2.0, 0.0, visible_w, mask_size.height)
        } else {
            // Mask is taller (or equal): crop top/bottom, full width visible.
            let visible_h = mask_size.width / element_aspect;
            (0.0, (mask_size.height - visible_h) / 2.0, mask_size.width, visible_h)
        };

        Some(Self {
            crop_x,
            crop_y,
            visible_w,
            visible_h,
        })
    }

    /// Left edge of the visible region in mask pixels.
    #[must_use]
    pub fn crop_x(&self) -> f64 {
        self.crop_x
    }

    /// Top edge of the visible region in mask pixels.
    #[must_use]
    pub fn crop_y(&self) -> f64 {
        self.crop_y
    }

    /// Width of the visible region in mask pixels.
    #[must_use]
    pub fn visible_width(&self) -> f64 {
        self.visible_w
    }

    /// Height of the visible region in mask pixels.
    #[must_use]
    pub fn visible_height(&self) -> f64 {
        self.visible_h
    }

    /// Maps a fraction of the element rect to mask pixel coordinates.
    #[must_use]
    pub fn mask_from_fraction(&self, fx: f64, fy: f64) -> (f64, f64) {
        (
            self.crop_x + fx * self.visible_w,
            self.crop_y + fy * self.visible_h,
        )
    }

    /// Maps mask pixel coordinates back to fractions of the element rect.
    ///
    /// Inverse of [`CoverFit::mask_from_fraction`]. Coordinates outside the
    /// visible region map outside `0..1`.
    #[must_use]
    pub fn fraction_from_mask(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            (mx - self.crop_x) / self.visible_w,
            (my - self.crop_y) / self.visible_h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_aspects_have_no_crop() {
        let fit = CoverFit::new(Size::new(200.0, 100.0), Size::new(400.0, 200.0)).unwrap();
        assert_eq!(fit.crop_x(), 0.0);
        assert_eq!(fit.crop_y(), 0.0);
        assert_eq!(fit.visible_width(), 200.0);
        assert_eq!(fit.visible_height(), 100.0);
    }

    #[test]
    fn wide_mask_on_square_element_crops_sides() {
        // Mask 200x100 on a square element: visible width = 100, centered.
        let fit = CoverFit::new(Size::new(200.0, 100.0), Size::new(50.0, 50.0)).unwrap();
        assert_eq!(fit.crop_x(), 50.0);
        assert_eq!(fit.crop_y(), 0.0);
        assert_eq!(fit.visible_width(), 100.0);
        assert_eq!(fit.visible_height(), 100.0);
    }

    #[test]
    fn tall_mask_on_wide_element_crops_top_and_bottom() {
        // Mask 100x200 on a 2:1 element: visible height = 50, centered.
        let fit = CoverFit::new(Size::new(100.0, 200.0), Size::new(80.0, 40.0)).unwrap();
        assert_eq!(fit.crop_x(), 0.0);
        assert_eq!(fit.crop_y(), 75.0);
        assert_eq!(fit.visible_width(), 100.0);
        assert_eq!(fit.visible_height(), 50.0);
    }

    #[test]
    fn fraction_mask_roundtrip() {
        let fit = CoverFit::new(Size::new(640.0, 480.0), Size::new(300.0, 500.0)).unwrap();
        for &(fx, fy) in &[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.25, 0.75)] {
            let (mx, my) = fit.mask_from_fraction(fx, fy);
            let (bx, by) = fit.fraction_from_mask(mx, my);
            assert!((bx - fx).abs() < 1e-12);
            assert!((by - fy).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_sizes_yield_no_fit() {
        assert!(CoverFit::new(Size::new(0.0, 100.0), Size::new(10.0, 10.0)).is_none());
        assert!(CoverFit::new(Size::new(100.0, 100.0), Size::new(10.0, 0.0)).is_none());
    }
}
