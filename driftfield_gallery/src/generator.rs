// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator interfaces: the batch generator and the session store.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Size;

use crate::item::{DisplayItem, ImageData, LikedItem, ProductInfo};

/// Everything the external pipeline needs to generate one batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchRequest {
    /// Free-form user context (style hints, room description).
    pub user_context: String,
    /// Products the pipeline may embed.
    pub available_products: Vec<ProductInfo>,
    /// Recently liked scenes, as steering context.
    pub recently_liked: Vec<LikedItem>,
}

/// One generated scene as delivered by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResultItem {
    /// Pipeline scene identifier.
    pub scene_id: String,
    /// Composed display image.
    pub image: ImageData,
    /// Native pixel size of the display image.
    pub image_size: Size,
    /// Encoded embedded-product mask, when the scene has one.
    pub mask: Option<ImageData>,
    /// The embedded product, when the scene has one.
    pub product: Option<ProductInfo>,
}

/// Handle identifying one outstanding batch request.
///
/// Issued when a request is dispatched and presented back with the result.
/// A token from a superseded or torn-down gallery no longer matches and its
/// result is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken {
    pub(crate) generation: u64,
}

/// The external generation pipeline.
///
/// The gallery never awaits: it hands the host a [`RequestToken`] and a
/// [`BatchRequest`], the host runs the pipeline however it likes, and later
/// reports the outcome through the gallery's `complete_batch` or
/// `fail_batch`. Implementations only need to ferry the request out.
pub trait BatchGenerator {
    /// Dispatches one batch request.
    fn dispatch(&mut self, token: RequestToken, request: BatchRequest);
}

/// Snapshot of the gallery state worth restoring across mounts.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SessionSnapshot {
    /// Items live at snapshot time, in display order.
    pub items: Vec<DisplayItem>,
    /// User context at snapshot time.
    pub user_context: String,
}

/// Persistence collaborator.
///
/// Read once at mount to seed the gallery; writes are debounced by the
/// gallery so rapid list churn produces one save, not one per change.
pub trait SessionStore {
    /// Returns the stored snapshot, if one exists.
    fn load(&mut self) -> Option<SessionSnapshot>;

    /// Persists a snapshot, replacing any previous one.
    fn save(&mut self, snapshot: &SessionSnapshot);
}
