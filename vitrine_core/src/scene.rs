// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract between the layout tree and the renderer's scene.
//!
//! The renderer owns its elements; the layout tree only mirrors their
//! sizes. Three pieces connect them:
//!
//! - **[`SceneElement`]** — implemented by renderer elements so the tree can
//!   read their intrinsic size and skip flag and write back positions.
//! - **[`Presenter`]** — applies [`LayoutChanges`] to whatever the renderer
//!   uses as its scene. Positions are read from the tree with the raw-index
//!   accessors, e.g. [`position_at`](LayoutTree::position_at). The page
//!   rotation and light arrive separately as a [`PagePose`].
//! - **[`ElementBindings`]** — a ready-made presenter that pairs nodes with
//!   elements and does both directions.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(tick: FrameTick) {
//!     // Inputs: copy element sizes into the tree.
//!     bindings.pull(&mut tree);
//!
//!     // Evaluate: run flexbox passes for dirty roots.
//!     let changes = tree.evaluate();
//!
//!     // Present: write positions back to the elements that moved.
//!     bindings.apply(&tree, &changes);
//! }
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::layout::{LayoutChanges, LayoutTree, NodeId};
use crate::transition::PagePose;

/// A renderer element that takes part in layout.
pub trait SceneElement {
    /// The element's own size.
    fn intrinsic_size(&self) -> Size;

    /// Whether the element is excluded from its container's layout.
    fn is_skipped(&self) -> bool;

    /// Receives the position computed by layout, relative to the parent
    /// container's padding box. `None` when the element is not placed.
    fn set_computed_position(&mut self, position: Option<Point>);
}

/// Applies evaluated layout changes to a renderer's scene.
pub trait Presenter {
    /// Applies the given [`LayoutChanges`], reading current values from
    /// `tree` as needed.
    fn apply(&mut self, tree: &LayoutTree, changes: &LayoutChanges);

    /// Applies the page content rotation and light position for this frame.
    fn apply_pose(&mut self, pose: &PagePose) {
        let _ = pose;
    }
}

/// Scene elements bound to layout nodes, indexed by node slot.
#[derive(Debug)]
pub struct ElementBindings<E> {
    slots: Vec<Option<(NodeId, E)>>,
}

impl<E> Default for ElementBindings<E> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<E: SceneElement> ElementBindings<E> {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `element` to `node`, replacing any previous binding for that
    /// node, and returns the previous element.
    pub fn bind(&mut self, node: NodeId, element: E) -> Option<E> {
        let idx = node.index() as usize;
        if self.slots.len() <= idx {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx].replace((node, element)).map(|(_, e)| e)
    }

    /// Removes and returns the element bound to `node`.
    pub fn unbind(&mut self, node: NodeId) -> Option<E> {
        let slot = self.slots.get_mut(node.index() as usize)?;
        if slot.as_ref().is_some_and(|(n, _)| *n == node) {
            slot.take().map(|(_, e)| e)
        } else {
            None
        }
    }

    /// Returns the element bound to `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&E> {
        match self.slots.get(node.index() as usize)? {
            Some((n, e)) if *n == node => Some(e),
            _ => None,
        }
    }

    /// Returns the element bound to `node`, mutably.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut E> {
        match self.slots.get_mut(node.index() as usize)? {
            Some((n, e)) if *n == node => Some(e),
            _ => None,
        }
    }

    /// Iterates over every binding in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &E)> {
        self.slots.iter().flatten().map(|(n, e)| (*n, e))
    }

    /// Copies every bound element's intrinsic size and skip flag into the
    /// tree. Unchanged values do not dirty anything.
    pub fn pull(&self, tree: &mut LayoutTree) {
        for (node, element) in self.iter() {
            if !tree.is_alive(node) {
                continue;
            }
            if !tree.is_container(node) {
                tree.set_intrinsic_size(node, element.intrinsic_size());
            }
            tree.set_skip(node, element.is_skipped());
        }
    }
}

impl<E: SceneElement> Presenter for ElementBindings<E> {
    fn apply(&mut self, tree: &LayoutTree, changes: &LayoutChanges) {
        for &idx in &changes.removed {
            // The slot may already hold a rebound element for a newer node.
            if let Some(slot) = self.slots.get_mut(idx as usize)
                && slot.as_ref().is_some_and(|(n, _)| !tree.is_alive(*n))
            {
                *slot = None;
            }
        }
        for &idx in &changes.positions {
            if let Some(Some((node, element))) = self.slots.get_mut(idx as usize)
                && tree.is_alive(*node)
            {
                element.set_computed_position(tree.position_at(idx));
            }
        }
    }
}
