// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driftfield Mask: pixel-accurate hit testing against binary mask images.
//!
//! A [`PixelMask`] is a rasterized brightness buffer built once from a mask
//! image. A pixel is *active* when its brightness — the unweighted mean of
//! its three color channels — exceeds 128 on the 0–255 scale. This threshold
//! and averaging are a bit-exact contract with the pipeline that produces the
//! masks; do not change them.
//!
//! Masks are queried against the screen rectangle of the element they
//! overlay. Because the displayed image is fitted with an object-fit "cover"
//! crop (centered, uncropped along the constrained axis), pointer positions
//! must be mapped through the same crop before sampling; [`CoverFit`] holds
//! that mapping in both directions.
//!
//! Two queries are supported:
//!
//! - [`PixelMask::contains_point`]: is this pointer position over an active
//!   pixel?
//! - [`PixelMask::active_bounds`]: the tight screen-space bounding box of all
//!   active pixels visible under the crop, or `None` for a degenerate mask.
//!
//! ```rust
//! use driftfield_mask::PixelMask;
//! use kurbo::{Point, Rect};
//!
//! // A 4x4 mask whose right half is active.
//! let mut brightness = [0u8; 16];
//! for y in 0..4 {
//!     for x in 2..4 {
//!         brightness[y * 4 + x] = 255;
//!     }
//! }
//! let mask = PixelMask::from_brightness(4, 4, brightness.to_vec()).unwrap();
//!
//! let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
//! assert!(mask.contains_point(Point::new(80.0, 50.0), rect));
//! assert!(!mask.contains_point(Point::new(20.0, 50.0), rect));
//!
//! let bounds = mask.active_bounds(rect).unwrap();
//! assert!((bounds.x0 - 50.0).abs() < 1e-9);
//! assert!((bounds.x1 - 100.0).abs() < 1e-9);
//! ```
//!
//! Masks are immutable after construction. The mask-space extrema of the
//! active region are computed lazily on first use and cached; only the crop
//! mapping depends on the element rectangle, which changes as elements drift.
//!
//! A mask image that fails to decode simply yields no `PixelMask`: elements
//! without a mask have no hover interaction, and no error surfaces to the
//! user.
//!
//! This crate is `no_std` and uses `alloc`; the `decode` feature (which pulls
//! in the `image` crate) requires `std`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod cover;
#[cfg(feature = "decode")]
mod decode;
mod mask;

pub use cover::CoverFit;
pub use mask::{MaskError, PixelMask};
