// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The feed-boundary error type.

use alloc::string::String;

/// Errors surfaced at the feed-gate boundary.
///
/// Pipeline failures are always recoverable: the gate is released and the
/// message becomes an inline notice with a retry control. They never
/// propagate into the simulation or hover subsystems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// The external batch generator rejected or failed.
    #[error("batch generation failed: {message}")]
    Generation {
        /// Human-readable description from the collaborator.
        message: String,
    },
    /// A completion arrived for a request the view no longer expects
    /// (superseded or torn down); the result was dropped.
    #[error("stale generation result dropped")]
    StaleResult,
}
