// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The item model: what a gallery element displays and owns.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Size;

/// Encoded image bytes with their media type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    /// Encoded bytes (PNG, JPEG, whatever the pipeline produced).
    pub bytes: Vec<u8>,
    /// Media type, e.g. `image/png`.
    pub mime: String,
}

impl ImageData {
    /// Convenience constructor.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }
}

/// A purchasable product referenced by gallery items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductInfo {
    /// Stable product identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Price in minor currency units, when known.
    pub price_cents: Option<u32>,
}

/// A scene the user liked, carried as context into later batch requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LikedItem {
    /// Scene identifier of the liked item.
    pub scene_id: String,
    /// Product embedded in that scene, when it had one.
    pub product_id: Option<String>,
}

/// An item produced by the generation pipeline.
///
/// The composed image always exists; the embedded-product mask and the
/// product reference are optional and travel together in practice (a mask
/// without a product has nothing to reveal).
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedItem {
    /// Pipeline scene identifier; the item's stable identity.
    pub scene_id: String,
    /// The composed display image.
    pub image: ImageData,
    /// Native pixel size of the display image.
    pub image_size: Size,
    /// Encoded embedded-product mask, when the scene has one.
    pub mask: Option<ImageData>,
    /// The embedded product, when the scene has one.
    pub product: Option<ProductInfo>,
}

/// A curated item present before any generation ran.
#[derive(Clone, Debug, PartialEq)]
pub struct PreloadedItem {
    /// Stable identifier.
    pub id: String,
    /// The display image.
    pub image: ImageData,
    /// Native pixel size of the display image.
    pub image_size: Size,
    /// Product this item advertises, when it has one.
    pub product: Option<ProductInfo>,
}

/// What a gallery element displays.
///
/// Both variants answer the same questions (identity, display image, image
/// size, product) through uniform accessors, so rendering and hit-testing
/// never branch on provenance. Only generated items can carry a mask.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    /// Produced by the generation pipeline.
    Generated(GeneratedItem),
    /// Curated, present before any generation ran.
    Preloaded(PreloadedItem),
}

impl DisplayItem {
    /// Stable identity, unique across both variants.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Generated(item) => &item.scene_id,
            Self::Preloaded(item) => &item.id,
        }
    }

    /// The image this element displays.
    #[must_use]
    pub fn display_image(&self) -> &ImageData {
        match self {
            Self::Generated(item) => &item.image,
            Self::Preloaded(item) => &item.image,
        }
    }

    /// Native pixel size of the display image.
    #[must_use]
    pub fn image_size(&self) -> Size {
        match self {
            Self::Generated(item) => item.image_size,
            Self::Preloaded(item) => item.image_size,
        }
    }

    /// Width over height of the display image, or 1 for degenerate sizes.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        let size = self.image_size();
        if size.width > 0.0 && size.height > 0.0 {
            size.width / size.height
        } else {
            1.0
        }
    }

    /// The product this element references, if any.
    #[must_use]
    pub fn product(&self) -> Option<&ProductInfo> {
        match self {
            Self::Generated(item) => item.product.as_ref(),
            Self::Preloaded(item) => item.product.as_ref(),
        }
    }

    /// Encoded embedded-product mask; always `None` for preloaded items.
    #[must_use]
    pub fn mask_data(&self) -> Option<&ImageData> {
        match self {
            Self::Generated(item) => item.mask.as_ref(),
            Self::Preloaded(_) => None,
        }
    }
}
