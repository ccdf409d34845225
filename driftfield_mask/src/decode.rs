// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building masks from encoded image bytes (`decode` feature).

use alloc::string::ToString;

use crate::mask::{MaskError, PixelMask};

impl PixelMask {
    /// Decodes encoded image bytes (PNG etc.) into a mask.
    ///
    /// The image is expanded to RGB and averaged per pixel. Callers treat a
    /// decode failure as "this element has no mask": hover interaction is
    /// silently unavailable for it, and the failure is never retried.
    pub fn decode(bytes: &[u8]) -> Result<Self, MaskError> {
        let img = image::load_from_memory(bytes).map_err(|e| MaskError::Decode(e.to_string()))?;
        let rgb = img.to_rgb8();
        Self::from_rgb8(rgb.width(), rgb.height(), rgb.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = PixelMask::decode(b"not an image").unwrap_err();
        assert!(matches!(err, MaskError::Decode(_)));
    }

    #[test]
    fn png_round_trips_through_decode() {
        // Encode a 2x1 PNG: white pixel, black pixel.
        let mut img = image::RgbImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgb([255, 255, 255]));
        img.put_pixel(1, 0, image::Rgb([0, 0, 0]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png)
            .expect("in-memory PNG encode");

        let mask = PixelMask::decode(&bytes.into_inner()).expect("decode");
        let rect = Rect::new(0.0, 0.0, 2.0, 1.0);
        assert!(mask.contains_point(Point::new(0.5, 0.5), rect));
        assert!(!mask.contains_point(Point::new(1.5, 0.5), rect));
    }
}
