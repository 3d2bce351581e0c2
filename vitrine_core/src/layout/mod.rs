// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flexbox layout tree.
//!
//! A *node* is a box in the layout tree. Each node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology — parent, first-child, and sibling links forming an ordered tree.
//! - **Inputs** set by the caller: [`intrinsic size`](LayoutTree::set_intrinsic_size),
//!   [`skip`](LayoutTree::set_skip), and for containers a
//!   [`FlexStyle`](LayoutTree::set_style) and, on roots, an
//!   [`available width`](LayoutTree::set_available_width).
//! - **Computed values** produced by [`evaluate`](LayoutTree::evaluate):
//!   a position relative to the parent's padding box and, for containers, a
//!   size.
//!
//! The flexbox algorithm itself is delegated to `taffy`. Every node owns one
//! backend node; the backend tree is rebuilt from this tree for each pass,
//! so the backend never holds state that this tree does not.
//!
//! # Dirty tracking
//!
//! Input mutations mark the **LAYOUT** channel eagerly, so the mark reaches
//! every enclosing container (see [`dirty`](crate::dirty)). Structural
//! changes also mark **TOPOLOGY**, which triggers a traversal-order rebuild.

mod compute;
mod evaluate;
mod id;
mod store;
mod style;
mod traverse;

pub use compute::{FlexChild, FlexLayout, compute_flex};
pub use evaluate::{LayoutChanges, LayoutPass};
pub use id::{INVALID, NodeId};
pub use store::{ContainerLayout, LayoutTree};
pub use style::{
    AlignContent, AlignItems, ContainerWidth, FlexDirection, FlexStyle, JustifyContent,
};
pub use traverse::Children;
