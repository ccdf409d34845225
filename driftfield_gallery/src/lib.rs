// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driftfield Gallery: the assembled drift field.
//!
//! This crate wires the other Driftfield pieces into one host-driven
//! surface: a list of [`DisplayItem`]s where every visible element owns a
//! simulation body, embedded-product elements own a decoded pixel mask, and
//! scroll position feeds the growth gate.
//!
//! The [`Gallery`] never spawns tasks or reads a clock. The host calls
//! [`Gallery::tick`] once per animation frame with the current timestamp,
//! forwards pointer and scroll events, and runs the generation pipeline
//! itself: a scroll trigger hands back a [`RequestToken`] and a
//! [`BatchRequest`], the host resolves them however it likes (the
//! [`BatchGenerator`] trait is the shape of that collaborator), and reports
//! back through [`Gallery::complete_batch`] or [`Gallery::fail_batch`]. A
//! token outlived by [`Gallery::shutdown`] or a newer dispatch is stale and
//! its result is dropped.
//!
//! ```rust
//! use driftfield_gallery::{Gallery, GalleryConfig, GateStatus, ProductInfo};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut gallery = Gallery::new(GalleryConfig::default());
//! let mut rng = SmallRng::seed_from_u64(7);
//!
//! // Nothing to generate against yet: scrolling never dispatches.
//! assert!(gallery.on_scroll(2_400.0, 0.0).1.is_none());
//!
//! gallery.set_products(vec![ProductInfo {
//!     id: "p-1".into(),
//!     title: "Floor lamp".into(),
//!     price_cents: Some(12_900),
//! }]);
//!
//! // Near the end of content the gate closes and hands out one request.
//! let (_, request) = gallery.on_scroll(2_400.0, 16.0);
//! assert!(request.is_some());
//! assert_eq!(gallery.gate_status(), GateStatus::Gated);
//!
//! gallery.tick(32.0, &mut rng);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod gallery;
mod generator;
mod item;

pub use driftfield_feed::{FeedError, GateStatus};
pub use driftfield_hover::{Effects, HoverEffect};
pub use gallery::{Gallery, GalleryConfig};
pub use generator::{
    BatchGenerator, BatchRequest, BatchResultItem, RequestToken, SessionSnapshot, SessionStore,
};
pub use item::{DisplayItem, GeneratedItem, ImageData, LikedItem, PreloadedItem, ProductInfo};
