// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The layout tree uses multi-channel dirty tracking (via
//! [`understory_dirty`]) to find which layout roots need a fresh pass. Each
//! channel represents an independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`LAYOUT`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from container to child. A container's size depends on its children's
//!   sizes, so marking a child dirty marks every enclosing container up to
//!   the root. Intrinsic size, skip flag, style, and available width changes
//!   all go through this channel.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on topology mutations
//!   (add/remove child, create/destroy node). It triggers a traversal-order
//!   rebuild during evaluation but does not propagate.
//!
//! The [`reactive`](crate::reactive) graph uses its own channel,
//! [`DERIVED`], with the same eager policy: a source marks every value that
//! reads it.

use understory_dirty::Channel;

/// Layout input changed: re-run the enclosing layout root.
pub const LAYOUT: Channel = Channel::new(0);

/// Tree topology changed: rebuild traversal order.
pub const TOPOLOGY: Channel = Channel::new(1);

/// A reactive source changed: recompute dependent derived values.
pub const DERIVED: Channel = Channel::new(2);
