// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rasterized mask buffer and its point / bounding-box queries.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size};

use crate::cover::CoverFit;

/// Brightness above which a pixel counts as active.
///
/// Bit-exact contract with the mask generation pipeline: strictly greater
/// than 128, where brightness is the unweighted mean of the three color
/// channels.
const ACTIVE_THRESHOLD: u8 = 128;

/// Errors from building a [`PixelMask`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    /// The raw buffer length does not match the stated dimensions.
    #[error("mask buffer is {got} bytes, expected {expected}")]
    BufferSize {
        /// Byte length implied by width, height, and channel count.
        expected: usize,
        /// Byte length actually supplied.
        got: usize,
    },
    /// The encoded image bytes could not be decoded.
    #[cfg(feature = "decode")]
    #[error("mask image failed to decode: {0}")]
    Decode(String),
}

/// Inclusive pixel-space extrema of the active region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelExtent {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

/// A rasterized binary mask for one element.
///
/// Holds the mask's native dimensions and one brightness byte per pixel,
/// computed once at construction. Immutable afterwards; if the underlying
/// mask image changes, build a new `PixelMask`.
#[derive(Clone, Debug)]
pub struct PixelMask {
    width: u32,
    height: u32,
    brightness: Vec<u8>,
    // Mask-space extrema of active pixels, computed on first use.
    active_extent: OnceCell<Option<PixelExtent>>,
}

impl PixelMask {
    /// Builds a mask from a precomputed brightness buffer (one byte per
    /// pixel, row-major).
    pub fn from_brightness(width: u32, height: u32, brightness: Vec<u8>) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize;
        if brightness.len() != expected {
            return Err(MaskError::BufferSize {
                expected,
                got: brightness.len(),
            });
        }
        Ok(Self {
            width,
            height,
            brightness,
            active_extent: OnceCell::new(),
        })
    }

    /// Builds a mask from packed RGB8 pixels.
    ///
    /// Brightness is the unweighted integer mean of the three channels.
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(MaskError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        let brightness = data
            .chunks_exact(3)
            .map(|px| average3(px[0], px[1], px[2]))
            .collect();
        Self::from_brightness(width, height, brightness)
    }

    /// Builds a mask from packed RGBA8 pixels. Alpha is ignored.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MaskError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        let brightness = data
            .chunks_exact(4)
            .map(|px| average3(px[0], px[1], px[2]))
            .collect();
        Self::from_brightness(width, height, brightness)
    }

    /// Native mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native mask size as a [`Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Returns `true` when the pointer position falls on an active pixel.
    ///
    /// `element_rect` is the element's on-screen rectangle; the pointer is
    /// first expressed as a fraction of that rect, then mapped through the
    /// cover crop into mask pixels. Positions mapping outside the mask
    /// return `false`.
    #[must_use]
    pub fn contains_point(&self, pointer: Point, element_rect: Rect) -> bool {
        let Some(fit) = CoverFit::new(self.size(), element_rect.size()) else {
            return false;
        };
        let fx = (pointer.x - element_rect.x0) / element_rect.width();
        let fy = (pointer.y - element_rect.y0) / element_rect.height();
        let (mx, my) = fit.mask_from_fraction(fx, fy);
        let (px, py) = (mx.floor(), my.floor());
        if px < 0.0 || py < 0.0 || px >= f64::from(self.width) || py >= f64::from(self.height) {
            return false;
        }
        self.is_active(px as u32, py as u32)
    }

    /// Tight on-screen bounding box of the active region visible under the
    /// cover crop, or `None` when no active pixel is visible.
    ///
    /// The mask-space extrema are cached on first use; per call only the
    /// portion of the cached extrema inside the crop is rescanned, and the
    /// result is mapped back to screen coordinates through the inverse crop
    /// mapping.
    #[must_use]
    pub fn active_bounds(&self, element_rect: Rect) -> Option<Rect> {
        let fit = CoverFit::new(self.size(), element_rect.size())?;
        let extent = (*self.active_extent())?;

        // Pixel columns/rows that the crop makes visible at all.
        let x0 = (fit.crop_x().floor().max(0.0)) as u32;
        let y0 = (fit.crop_y().floor().max(0.0)) as u32;
        let x1 = ((fit.crop_x() + fit.visible_width()).ceil().min(f64::from(self.width))) as u32;
        let y1 = ((fit.crop_y() + fit.visible_height()).ceil().min(f64::from(self.height))) as u32;

        let sx0 = x0.max(extent.min_x);
        let sy0 = y0.max(extent.min_y);
        let sx1 = x1.min(extent.max_x + 1);
        let sy1 = y1.min(extent.max_y + 1);
        if sx0 >= sx1 || sy0 >= sy1 {
            return None;
        }

        let mut found: Option<PixelExtent> = None;
        for y in sy0..sy1 {
            for x in sx0..sx1 {
                if self.is_active(x, y) {
                    found = Some(match found {
                        None => PixelExtent {
                            min_x: x,
                            min_y: y,
                            max_x: x,
                            max_y: y,
                        },
                        Some(e) => PixelExtent {
                            min_x: e.min_x.min(x),
                            min_y: e.min_y.min(y),
                            max_x: e.max_x.max(x),
                            max_y: e.max_y.max(y),
                        },
                    });
                }
            }
        }
        let e = found?;

        // Map pixel edges back to screen space: the left/top edges of the
        // minimum pixel, the right/bottom edges of the maximum one.
        let (fx0, fy0) = fit.fraction_from_mask(f64::from(e.min_x), f64::from(e.min_y));
        let (fx1, fy1) = fit.fraction_from_mask(f64::from(e.max_x + 1), f64::from(e.max_y + 1));
        let screen = Rect::new(
            element_rect.x0 + fx0 * element_rect.width(),
            element_rect.y0 + fy0 * element_rect.height(),
            element_rect.x0 + fx1 * element_rect.width(),
            element_rect.y0 + fy1 * element_rect.height(),
        );
        // Partially visible edge pixels can map just past the element rect.
        Some(screen.intersect(element_rect))
    }

    fn is_active(&self, x: u32, y: u32) -> bool {
        self.brightness[y as usize * self.width as usize + x as usize] > ACTIVE_THRESHOLD
    }

    fn active_extent(&self) -> &Option<PixelExtent> {
        self.active_extent.get_or_init(|| {
            let mut extent: Option<PixelExtent> = None;
            for y in 0..self.height {
                for x in 0..self.width {
                    if self.is_active(x, y) {
                        extent = Some(match extent {
                            None => PixelExtent {
                                min_x: x,
                                min_y: y,
                                max_x: x,
                                max_y: y,
                            },
                            Some(e) => PixelExtent {
                                min_x: e.min_x.min(x),
                                min_y: e.min_y,
                                max_x: e.max_x.max(x),
                                max_y: y,
                            },
                        });
                    }
                }
            }
            extent
        })
    }
}

/// Unweighted integer mean of three channel values.
fn average3(r: u8, g: u8, b: u8) -> u8 {
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
}
