// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layout storage with allocation, topology, and input
//! management.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};
use taffy::TaffyTree;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId};
use super::style::{FlexStyle, leaf_style, sanitize_size};
use super::traverse::Children;
use crate::dirty;
use crate::error::{LayoutError, StyleError};
use crate::trace::{Diagnostic, DiagnosticKind, Subject};

/// The laid-out state of one container, as returned by
/// [`LayoutTree::container_layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerLayout {
    /// The container's own computed size.
    pub size: Size,
    /// Each non-skipped child with its position relative to the container's
    /// padding box, in child order.
    pub children: Vec<(NodeId, Point)>,
}

/// Struct-of-arrays storage for every layout node.
///
/// Nodes are addressed by [`NodeId`] handles. A node is either a plain box
/// with an externally supplied intrinsic size, or a flex container (created
/// with [`create_container`](Self::create_container)) whose size is computed
/// from its children. Each node owns exactly one node in the backend flexbox
/// tree, released when the node is destroyed.
pub struct LayoutTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Inputs (set by callers) --
    pub(crate) intrinsic: Vec<Size>,
    pub(crate) skip: Vec<bool>,
    pub(crate) style: Vec<Option<FlexStyle>>,
    pub(crate) available_width: Vec<Option<f64>>,

    // -- Computed (written by evaluate) --
    pub(crate) position: Vec<Option<Point>>,
    pub(crate) size: Vec<Size>,
    pub(crate) measured: Vec<bool>,
    pub(crate) resolved_width: Vec<Option<f64>>,

    // -- Backend mirror --
    pub(crate) taffy: TaffyTree<()>,
    pub(crate) mirror: Vec<Option<taffy::NodeId>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    pub(crate) pending_detached: Vec<u32>,

    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("traversal_dirty", &self.traversal_dirty)
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        let mut taffy = TaffyTree::new();
        taffy.disable_rounding();
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            intrinsic: Vec::new(),
            skip: Vec::new(),
            style: Vec::new(),
            available_width: Vec::new(),
            position: Vec::new(),
            size: Vec::new(),
            measured: Vec::new(),
            resolved_width: Vec::new(),
            taffy,
            mirror: Vec::new(),
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            pending_detached: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a plain node with the given intrinsic size.
    ///
    /// A negative or non-finite extent is clamped to `0` and recorded as a
    /// diagnostic.
    pub fn create_node(&mut self, intrinsic: Size) -> Result<NodeId, LayoutError> {
        let mirror = self.taffy.new_leaf(leaf_style(Size::ZERO))?;
        let idx = self.alloc_slot(mirror);
        let intrinsic = sanitize_size(intrinsic, Subject::Node(idx), &mut self.diagnostics);
        self.intrinsic[idx as usize] = intrinsic;
        self.size[idx as usize] = intrinsic;
        self.dirty.mark(idx, dirty::LAYOUT);
        Ok(self.id_at(idx))
    }

    /// Creates a flex container with the given style.
    ///
    /// The style is [sanitized](FlexStyle::sanitized) first.
    pub fn create_container(&mut self, style: FlexStyle) -> Result<NodeId, LayoutError> {
        let mirror = self.taffy.new_leaf(taffy::Style::default())?;
        let idx = self.alloc_slot(mirror);
        self.style[idx as usize] = Some(style.sanitized(Subject::Node(idx), &mut self.diagnostics));
        self.dirty.mark(idx, dirty::LAYOUT);
        Ok(self.id_at(idx))
    }

    /// Destroys a node, releasing its backend node and freeing its slot.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first, or use
    /// [`destroy_subtree`](Self::destroy_subtree)) or if the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.detach(idx);
        }

        self.dirty.remove_key(idx);

        if let Some(m) = self.mirror[idx as usize].take()
            && self.taffy.remove(m).is_err()
        {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::LayoutBackend,
                Subject::Node(idx),
                "remove",
            ));
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] = self.generation[idx as usize].wrapping_add(1);
        self.live[idx as usize] = false;
        self.style[idx as usize] = None;
        self.position[idx as usize] = None;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
    }

    /// Destroys a node and all of its descendants, children first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_subtree(&mut self, id: NodeId) {
        self.validate(id);
        let mut order = Vec::new();
        self.collect_post_order(id.idx, &mut order);
        for idx in order {
            let child = self.id_at(idx);
            self.destroy_node(child);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && self.live[id.idx as usize]
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }

    /// Number of nodes held by the backend flexbox tree.
    ///
    /// Always equals [`node_count`](Self::node_count); exposed so hosts can
    /// check that teardown releases backend nodes.
    #[must_use]
    pub fn backend_node_count(&self) -> usize {
        self.taffy.total_node_count()
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `parent` is `child` or one of its descendants.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let (p, c) = (parent.idx, child.idx);
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            !self.is_ancestor_or_self(c, p),
            "cannot add a node beneath itself"
        );
        self.link_last(p, c);
        self.attach(p, c);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, `sibling`
    /// has no parent, or the insertion would create a cycle.
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        self.validate(child);
        self.validate(sibling);
        let (c, s) = (child.idx, sibling.idx);
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");
        assert!(
            !self.is_ancestor_or_self(c, p),
            "cannot add a node beneath itself"
        );

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];
        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.attach(p, c);
    }

    /// Removes `child` from its parent. The child keeps its own subtree and
    /// becomes a root; its computed position is cleared.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "node has no parent");
        self.detach(c);
        self.dirty.mark(c, dirty::LAYOUT);
    }

    /// Moves `child` to the end of `new_parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or the move would create a cycle.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        self.validate(child);
        self.validate(new_parent);
        if self.parent[child.idx as usize] != INVALID {
            self.detach(child.idx);
        }
        self.add_child(new_parent, child);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the root nodes (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && self.live[idx as usize])
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Input getters --

    /// Returns the intrinsic size of a node.
    #[must_use]
    pub fn intrinsic_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.intrinsic[id.idx as usize]
    }

    /// Returns whether a node is excluded from its parent's layout.
    #[must_use]
    pub fn is_skipped(&self, id: NodeId) -> bool {
        self.validate(id);
        self.skip[id.idx as usize]
    }

    /// Returns the container style, or `None` for a plain node.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<FlexStyle> {
        self.validate(id);
        self.style[id.idx as usize]
    }

    /// Returns whether the node is a flex container.
    #[must_use]
    pub fn is_container(&self, id: NodeId) -> bool {
        self.style(id).is_some()
    }

    /// Returns the available width set on a root container.
    #[must_use]
    pub fn available_width(&self, id: NodeId) -> Option<f64> {
        self.validate(id);
        self.available_width[id.idx as usize]
    }

    // -- Computed getters --

    /// Returns the node's position relative to its parent container's padding
    /// box, or `None` if it is skipped, has no container parent, or has not
    /// been laid out yet.
    #[must_use]
    pub fn computed_position(&self, id: NodeId) -> Option<Point> {
        self.validate(id);
        self.position[id.idx as usize]
    }

    /// Returns the node's computed size. For plain nodes this is the
    /// intrinsic size.
    #[must_use]
    pub fn computed_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.size[id.idx as usize]
    }

    /// Returns a container's size and the positions of its non-skipped
    /// children.
    ///
    /// Only meaningful after [`evaluate`](Self::evaluate).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is not a container.
    #[must_use]
    pub fn container_layout(&self, id: NodeId) -> ContainerLayout {
        assert!(self.is_container(id), "node is not a flex container");
        let children = self
            .children(id)
            .filter_map(|child| self.position[child.idx as usize].map(|p| (child, p)))
            .collect();
        ContainerLayout {
            size: self.size[id.idx as usize],
            children,
        }
    }

    /// Returns and clears the buffered diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }

    /// Returns the buffered diagnostics without clearing them.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets a node's intrinsic size.
    ///
    /// Setting the current value again does nothing.
    pub fn set_intrinsic_size(&mut self, id: NodeId, size: Size) {
        self.validate(id);
        let idx = id.idx;
        let size = sanitize_size(size, Subject::Node(idx), &mut self.diagnostics);
        if self.intrinsic[idx as usize] == size {
            return;
        }
        self.intrinsic[idx as usize] = size;
        if self.style[idx as usize].is_none() {
            self.size[idx as usize] = size;
        }
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
    }

    /// Sets whether a node is excluded from its parent's layout.
    pub fn set_skip(&mut self, id: NodeId, skip: bool) {
        self.validate(id);
        let idx = id.idx;
        if self.skip[idx as usize] == skip {
            return;
        }
        self.skip[idx as usize] = skip;
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
    }

    /// Replaces a container's style. The style is
    /// [sanitized](FlexStyle::sanitized) first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is not a container.
    pub fn set_style(&mut self, id: NodeId, style: FlexStyle) {
        assert!(self.is_container(id), "node is not a flex container");
        let idx = id.idx;
        let style = style.sanitized(Subject::Node(idx), &mut self.diagnostics);
        if self.style[idx as usize] == Some(style) {
            return;
        }
        self.style[idx as usize] = Some(style);
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
    }

    /// Applies one attribute in its markup spelling, e.g.
    /// `("justify-content", "space-between")`.
    ///
    /// On error the style is unchanged and a diagnostic is recorded.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is not a container.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), StyleError> {
        let Some(mut style) = self.style(id) else {
            panic!("node is not a flex container");
        };
        match style.apply_attribute(name, value) {
            Ok(()) => {
                self.set_style(id, style);
                Ok(())
            }
            Err(err) => {
                self.diagnostics.push(Diagnostic::new(
                    err.diagnostic_kind(),
                    Subject::Node(id.idx),
                    err.field(),
                ));
                Err(err)
            }
        }
    }

    /// Sets the width offered to a root container. `None` means "not known
    /// yet"; the container is skipped until a width arrives.
    pub fn set_available_width(&mut self, id: NodeId, width: Option<f64>) {
        self.validate(id);
        let idx = id.idx;
        let width = width.map(|w| {
            if w.is_finite() && w >= 0.0 {
                w
            } else {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::InvalidConfig,
                        Subject::Node(idx),
                        "available-width",
                    )
                    .with_value(w),
                );
                0.0
            }
        });
        if self.available_width[idx as usize] == width {
            return;
        }
        self.available_width[idx as usize] = width;
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `LayoutChanges`) rather than
    // `NodeId` handles, skipping generation validation. Only use with indices
    // that came from `LayoutChanges` or `traversal_order()`.

    /// Returns the computed position at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn position_at(&self, idx: u32) -> Option<Point> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.position[idx as usize]
    }

    /// Returns the computed size at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn size_at(&self, idx: u32) -> Size {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.size[idx as usize]
    }

    // -- Internal helpers --

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len
                && self.generation[id.idx as usize] == id.generation
                && self.live[id.idx as usize],
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn alloc_slot(&mut self, mirror: taffy::NodeId) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.intrinsic[i] = Size::ZERO;
            self.skip[i] = false;
            self.style[i] = None;
            self.available_width[i] = None;
            self.position[i] = None;
            self.size[i] = Size::ZERO;
            self.measured[i] = false;
            self.resolved_width[i] = None;
            self.mirror[i] = Some(mirror);
            self.live[i] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.intrinsic.push(Size::ZERO);
            self.skip.push(false);
            self.style.push(None);
            self.available_width.push(None);
            self.position.push(None);
            self.size.push(Size::ZERO);
            self.measured.push(false);
            self.resolved_width.push(None);
            self.mirror.push(Some(mirror));
            self.generation.push(0);
            self.live.push(true);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        idx
    }

    /// Appends `c` to `p`'s child list.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Records a freshly linked parent/child pair with the dirty tracker.
    fn attach(&mut self, p: u32, c: u32) {
        // The container's size depends on the child's.
        let _ = self.dirty.add_dependency(p, c, dirty::LAYOUT);
        self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Unlinks `c` from its parent and invalidates the parent's layout.
    fn detach(&mut self, c: u32) {
        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.remove_dependency(p, c, dirty::LAYOUT);
        self.dirty.mark_with(p, dirty::LAYOUT, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
        if self.position[c as usize].take().is_some() {
            self.pending_detached.push(c);
        }
        self.traversal_dirty = true;
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    fn collect_post_order(&self, idx: u32, out: &mut Vec<u32>) {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.collect_post_order(child, out);
            child = self.next_sibling[child as usize];
        }
        out.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tree: &mut LayoutTree, w: f64, h: f64) -> NodeId {
        tree.create_node(Size::new(w, h)).unwrap()
    }

    #[test]
    fn create_and_destroy() {
        let mut tree = LayoutTree::new();
        let id = leaf(&mut tree, 10.0, 10.0);
        assert!(tree.is_alive(id));
        assert_eq!(tree.backend_node_count(), 1);
        tree.destroy_node(id);
        assert!(!tree.is_alive(id));
        assert_eq!(tree.backend_node_count(), 0, "backend node must be released");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = LayoutTree::new();
        let id1 = leaf(&mut tree, 1.0, 1.0);
        tree.destroy_node(id1);
        let id2 = leaf(&mut tree, 1.0, 1.0);
        // id2 reuses the same slot but has a different generation.
        assert!(!tree.is_alive(id1));
        assert!(tree.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn stale_handle_panics() {
        let mut tree = LayoutTree::new();
        let id = leaf(&mut tree, 1.0, 1.0);
        tree.destroy_node(id);
        let _ = tree.intrinsic_size(id);
    }

    #[test]
    fn add_child_and_query() {
        let mut tree = LayoutTree::new();
        let parent = tree.create_container(FlexStyle::new()).unwrap();
        let child1 = leaf(&mut tree, 1.0, 1.0);
        let child2 = leaf(&mut tree, 1.0, 1.0);

        tree.add_child(parent, child1);
        tree.add_child(parent, child2);

        assert_eq!(tree.parent(child1), Some(parent));
        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, [child1, child2]);
        assert_eq!(tree.roots(), [parent]);
    }

    #[test]
    fn insert_before_orders_children() {
        let mut tree = LayoutTree::new();
        let parent = tree.create_container(FlexStyle::new()).unwrap();
        let a = leaf(&mut tree, 1.0, 1.0);
        let b = leaf(&mut tree, 1.0, 1.0);
        let c = leaf(&mut tree, 1.0, 1.0);
        tree.add_child(parent, a);
        tree.add_child(parent, c);
        tree.insert_before(b, c);
        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, [a, b, c]);

        let first = leaf(&mut tree, 1.0, 1.0);
        tree.insert_before(first, a);
        assert_eq!(tree.children(parent).next(), Some(first));
    }

    #[test]
    fn remove_and_reparent() {
        let mut tree = LayoutTree::new();
        let p1 = tree.create_container(FlexStyle::new()).unwrap();
        let p2 = tree.create_container(FlexStyle::new()).unwrap();
        let child = leaf(&mut tree, 1.0, 1.0);
        tree.add_child(p1, child);
        tree.reparent(child, p2);
        assert_eq!(tree.parent(child), Some(p2));
        assert_eq!(tree.children(p1).count(), 0);
        tree.remove_from_parent(child);
        assert_eq!(tree.parent(child), None);
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut tree = LayoutTree::new();
        let parent = tree.create_container(FlexStyle::new()).unwrap();
        let child = leaf(&mut tree, 1.0, 1.0);
        tree.add_child(parent, child);
        tree.destroy_node(parent);
    }

    #[test]
    #[should_panic(expected = "cannot add a node beneath itself")]
    fn cycles_are_rejected() {
        let mut tree = LayoutTree::new();
        let outer = tree.create_container(FlexStyle::new()).unwrap();
        let inner = tree.create_container(FlexStyle::new()).unwrap();
        tree.add_child(outer, inner);
        tree.add_child(inner, outer);
    }

    #[test]
    fn destroy_subtree_releases_every_backend_node() {
        let mut tree = LayoutTree::new();
        let root = tree.create_container(FlexStyle::new()).unwrap();
        let nested = tree.create_container(FlexStyle::new()).unwrap();
        tree.add_child(root, nested);
        for _ in 0..3 {
            let n = leaf(&mut tree, 10.0, 10.0);
            tree.add_child(nested, n);
        }
        let sibling = leaf(&mut tree, 5.0, 5.0);
        tree.add_child(root, sibling);
        assert_eq!(tree.backend_node_count(), 6);

        tree.destroy_subtree(root);
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.backend_node_count(), 0);
        assert!(!tree.is_alive(sibling));
    }

    #[test]
    fn set_attribute_records_diagnostic_on_error() {
        let mut tree = LayoutTree::new();
        let c = tree.create_container(FlexStyle::new()).unwrap();
        assert!(tree.set_attribute(c, "justify-content", "center").is_ok());
        assert!(tree.set_attribute(c, "align-items", "baseline").is_err());
        let diags = tree.take_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnknownValue);
        assert_eq!(diags[0].field, "align-items");
        assert!(tree.diagnostics().is_empty(), "take clears the buffer");
    }

    #[test]
    fn invalid_intrinsic_size_is_clamped() {
        let mut tree = LayoutTree::new();
        let n = leaf(&mut tree, f64::INFINITY, 20.0);
        assert_eq!(tree.intrinsic_size(n), Size::new(0.0, 20.0));
        assert_eq!(tree.diagnostics().len(), 1);
    }

    #[test]
    #[should_panic(expected = "node is not a flex container")]
    fn style_on_plain_node_panics() {
        let mut tree = LayoutTree::new();
        let n = leaf(&mut tree, 1.0, 1.0);
        tree.set_style(n, FlexStyle::new());
    }
}
