// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Idempotent batch merging and spawn placement.

use alloc::vec::Vec;

use kurbo::Rect;
use rand::Rng;

/// A batch item the merger can place.
///
/// Implemented by the host's item type; the merger only needs a stable
/// identity (for idempotence) and the display image's aspect ratio (for
/// sizing).
pub trait MergeCandidate {
    /// Stable identity; duplicates of an existing id are dropped.
    fn id(&self) -> &str;

    /// Width over height of the composed display image.
    fn aspect(&self) -> f64;
}

/// Tuning for spawn placement, shared by initial population and merges.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementParams {
    /// Width of the field in container units (typically 100, for percent).
    pub field_width: f64,
    /// Number of horizontal lanes items can land in.
    pub lane_count: u32,
    /// Item width as a fraction of the field width, sampled uniformly.
    pub width_range: (f64, f64),
    /// Vertical gap between stacked items, in content units.
    pub vertical_gap: f64,
    /// Safety margin added to the content extent past the lowest item.
    pub extent_margin: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            field_width: 100.0,
            lane_count: 3,
            width_range: (0.24, 0.4),
            vertical_gap: 40.0,
            extent_margin: 400.0,
        }
    }
}

/// One surviving batch item with its assigned placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedItem<T> {
    /// The item itself.
    pub item: T,
    /// Assigned rectangle in content coordinates.
    pub rect: Rect,
}

/// Result of a merge.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome<T> {
    /// Items that survived deduplication, in batch order, with placements.
    pub placed: Vec<PlacedItem<T>>,
    /// Content extent after the merge (unchanged when nothing survived).
    pub new_extent: f64,
    /// Number of batch items dropped as duplicates.
    pub duplicates: usize,
}

/// Appends finished batches to the live list.
///
/// Placement mirrors initial population: each survivor gets a randomized
/// horizontal lane and a randomized aspect-respecting size, stacked below
/// both the existing items and the extent's margin band. Stacking past the
/// margin band means a merge with survivors always grows the extent, even
/// when the live items sit far above it; without that, the scroll trigger
/// would re-fire immediately after the gate released. Callers apply the
/// outcome (append items, extend the extent, release the gate) as one
/// operation with respect to the simulation tick, so a partially-merged
/// state is never observable.
#[derive(Clone, Debug)]
pub struct ContentMerger {
    params: PlacementParams,
}

impl ContentMerger {
    /// Creates a merger with the given placement tuning.
    #[must_use]
    pub fn new(params: PlacementParams) -> Self {
        Self { params }
    }

    /// Returns the placement tuning.
    #[must_use]
    pub fn params(&self) -> &PlacementParams {
        &self.params
    }

    /// Places one item at the given stacking cursor, returning its rect.
    ///
    /// Shared by initial population and merges so both spawn identically.
    pub fn place_one(&self, aspect: f64, stack_top: f64, rng: &mut impl Rng) -> Rect {
        let p = &self.params;
        let (w_min, w_max) = p.width_range;
        let width = p.field_width * rng.random_range(w_min..=w_max);
        // Aspect is width/height; guard degenerate metadata.
        let height = width / aspect.max(0.05);
        let lane = rng.random_range(0..p.lane_count.max(1));
        let lane_width = p.field_width / f64::from(p.lane_count.max(1));
        let x0 = (f64::from(lane) * lane_width).min(p.field_width - width).max(0.0);
        Rect::new(x0, stack_top, x0 + width, stack_top + height)
    }

    /// Merges a finished batch against the live list.
    ///
    /// `existing` reports whether an id is already live (the idempotence
    /// check); `current_extent` is the content extent before the merge and
    /// `content_bottom` the bottom edge of the lowest existing item. When
    /// any survivor is placed, `new_extent` strictly exceeds
    /// `current_extent`.
    pub fn merge<T: MergeCandidate>(
        &self,
        batch: Vec<T>,
        existing: impl Fn(&str) -> bool,
        content_bottom: f64,
        current_extent: f64,
        rng: &mut impl Rng,
    ) -> MergeOutcome<T> {
        let mut placed = Vec::new();
        let mut duplicates = 0;
        let mut cursor = content_bottom.max(current_extent - self.params.extent_margin)
            + self.params.vertical_gap;

        for item in batch {
            if existing(item.id()) || placed.iter().any(|p: &PlacedItem<T>| p.item.id() == item.id()) {
                duplicates += 1;
                continue;
            }
            let rect = self.place_one(item.aspect(), cursor, rng);
            cursor = rect.y1 + self.params.vertical_gap;
            placed.push(PlacedItem { item, rect });
        }

        let new_extent = if placed.is_empty() {
            current_extent
        } else {
            let bottom = placed.last().map(|p| p.rect.y1).unwrap_or(content_bottom);
            current_extent.max(bottom + self.params.extent_margin)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            appended = placed.len(),
            duplicates,
            new_extent,
            "batch merged"
        );

        MergeOutcome {
            placed,
            new_extent,
            duplicates,
        }
    }
}
