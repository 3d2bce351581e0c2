// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout evaluation and change tracking.
//!
//! Evaluation drains the dirty channels and runs flexbox passes:
//!
//! 1. **LAYOUT** — Drain dirty indices (already propagated eagerly to every
//!    enclosing container) and map each to the layout root that owns it.
//! 2. **Passes** — Walk the traversal order. Every layout root that was
//!    dirtied, or whose resolved width changed, gets one pass: its subtree is
//!    mirrored into the backend, computed, and read back.
//! 3. **TOPOLOGY** — Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//!
//! A *layout root* is a container with no container parent, or a skipped
//! container. Roots are visited parent-before-child, so a skipped container
//! nested inside another sees its parent's fresh size.
//!
//! [`LayoutChanges`] uses raw slot indices (`u32`) like the rest of the
//! presenter-facing API; see [`position_at`](super::LayoutTree::position_at).

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Size};
use taffy::style::AvailableSpace;

use super::id::INVALID;
use super::store::LayoutTree;
use super::style::{ContainerWidth, leaf_style, to_f32};
use crate::dirty;
use crate::error::LayoutError;
use crate::trace::{Diagnostic, DiagnosticKind, Subject};

/// One flexbox pass run by [`LayoutTree::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPass {
    /// Raw slot index of the layout root.
    pub root: u32,
    /// Number of children positioned in this pass, across nested containers.
    pub placed: u32,
    /// The width the root was laid out at.
    pub width: f64,
    /// The resulting root height.
    pub height: f64,
}

/// The set of changes produced by a single [`LayoutTree::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct LayoutChanges {
    /// Nodes whose computed position changed, including nodes that lost
    /// their position by being skipped or detached.
    pub positions: Vec<u32>,
    /// Containers whose computed size changed.
    pub sizes: Vec<u32>,
    /// Passes run, in traversal order.
    pub passes: Vec<LayoutPass>,
    /// Nodes added since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl LayoutChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.sizes.clear();
        self.passes.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Moves the changes from `other` into `self`, leaving `other` empty.
    ///
    /// Position and size lists stay free of duplicates.
    pub fn append(&mut self, other: &mut Self) {
        for idx in other.positions.drain(..) {
            if !self.positions.contains(&idx) {
                self.positions.push(idx);
            }
        }
        for idx in other.sizes.drain(..) {
            if !self.sizes.contains(&idx) {
                self.sizes.push(idx);
            }
        }
        self.passes.append(&mut other.passes);
        self.added.append(&mut other.added);
        self.removed.append(&mut other.removed);
        self.topology_changed |= other.topology_changed;
        other.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            && self.sizes.is_empty()
            && self.passes.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl LayoutTree {
    /// Evaluates the tree, laying out every dirty root, and returns the set
    /// of changes.
    ///
    /// Calling this again without intervening mutations does nothing.
    pub fn evaluate(&mut self) -> LayoutChanges {
        let mut changes = LayoutChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut LayoutChanges) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let dirty_nodes: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .collect();
        let mut requested = vec![false; self.len as usize];
        for idx in dirty_nodes {
            if self.live[idx as usize]
                && let Some(root) = self.layout_root_of(idx)
            {
                requested[root as usize] = true;
            }
        }

        for i in 0..self.traversal_order.len() {
            let idx = self.traversal_order[i];
            if !self.is_layout_root(idx) {
                continue;
            }
            let Some(width) = self.resolve_root_width(idx) else {
                if requested[idx as usize] {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::NotReady,
                        Subject::Node(idx),
                        "available-width",
                    ));
                }
                continue;
            };
            if !requested[idx as usize] && self.resolved_width[idx as usize] == Some(width) {
                continue;
            }
            if self.run_pass(idx, width, changes).is_err() {
                // Left unresolved so the next evaluate retries.
                self.resolved_width[idx as usize] = None;
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::LayoutBackend, Subject::Node(idx), "pass")
                        .with_value(width),
                );
            }
        }

        // Drain TOPOLOGY channel (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        for idx in self.pending_detached.drain(..) {
            if self.live[idx as usize] && !changes.positions.contains(&idx) {
                changes.positions.push(idx);
            }
        }

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        self.pending_added.clear();
        self.pending_removed.clear();
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live nodes.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && self.live[idx as usize] {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }

    /// Whether `idx` owns a pass of its own.
    fn is_layout_root(&self, idx: u32) -> bool {
        if self.style[idx as usize].is_none() {
            return false;
        }
        let p = self.parent[idx as usize];
        p == INVALID || self.style[p as usize].is_none() || self.skip[idx as usize]
    }

    /// The layout root whose pass covers `idx`, if any.
    ///
    /// A skipped node is still reported under its parent's root, since
    /// skipping it changes the parent's layout.
    fn layout_root_of(&self, mut idx: u32) -> Option<u32> {
        if self.style[idx as usize].is_none() {
            let p = self.parent[idx as usize];
            if p == INVALID || self.style[p as usize].is_none() {
                return None;
            }
            idx = p;
        }
        while !self.is_layout_root(idx) {
            idx = self.parent[idx as usize];
        }
        Some(idx)
    }

    /// The width a layout root is laid out at, or `None` while unknown.
    fn resolve_root_width(&self, idx: u32) -> Option<f64> {
        let style = self.style[idx as usize]?;
        if let ContainerWidth::Fixed(w) = style.width {
            return Some(w);
        }
        let p = self.parent[idx as usize];
        let offered = if p == INVALID {
            self.available_width[idx as usize]?
        } else if let Some(parent_style) = self.style[p as usize] {
            if !self.measured[p as usize] {
                return None;
            }
            (self.size[p as usize].width - 2.0 * parent_style.padding).max(0.0)
        } else {
            self.size[p as usize].width
        };
        Some(style.width.resolve(offered))
    }

    fn mirror_of(&self, idx: u32) -> Result<taffy::NodeId, LayoutError> {
        self.mirror[idx as usize].ok_or(LayoutError::PassFailed { root: idx })
    }

    /// Runs one flexbox pass over the containers reachable from `root`
    /// without crossing a skipped child.
    fn run_pass(
        &mut self,
        root: u32,
        width: f64,
        changes: &mut LayoutChanges,
    ) -> Result<(), LayoutError> {
        // Containers in this pass, parents before children.
        let mut containers = Vec::new();
        let mut stack = vec![root];
        while let Some(c) = stack.pop() {
            containers.push(c);
            let mut child = self.first_child[c as usize];
            while child != INVALID {
                if !self.skip[child as usize] && self.style[child as usize].is_some() {
                    stack.push(child);
                }
                child = self.next_sibling[child as usize];
            }
        }

        // Mirror the subtree into the backend.
        let mut kids = Vec::new();
        for &c in &containers {
            let style = self.style[c as usize].ok_or(LayoutError::PassFailed { root })?;
            let m = self.mirror_of(c)?;
            self.taffy
                .set_style(m, style.to_taffy((c == root).then_some(width)))?;
            kids.clear();
            let mut child = self.first_child[c as usize];
            while child != INVALID {
                if !self.skip[child as usize] {
                    let cm = self.mirror_of(child)?;
                    if self.style[child as usize].is_none() {
                        self.taffy
                            .set_style(cm, leaf_style(self.intrinsic[child as usize]))?;
                    }
                    kids.push(cm);
                }
                child = self.next_sibling[child as usize];
            }
            self.taffy.set_children(m, &kids)?;
        }

        let root_mirror = self.mirror_of(root)?;
        self.taffy.compute_layout(
            root_mirror,
            taffy::geometry::Size {
                width: AvailableSpace::Definite(to_f32(width)),
                height: AvailableSpace::MaxContent,
            },
        )?;

        // Read back.
        let mut placed = 0_u32;
        for &c in &containers {
            let new_size = {
                let l = self.taffy.layout(self.mirror_of(c)?)?;
                Size::new(f64::from(l.size.width), f64::from(l.size.height))
            };
            if self.size[c as usize] != new_size {
                self.size[c as usize] = new_size;
                changes.sizes.push(c);
            }
            self.measured[c as usize] = true;

            let padding = self.style[c as usize].map_or(0.0, |s| s.padding);
            let mut child = self.first_child[c as usize];
            while child != INVALID {
                let new_pos = if self.skip[child as usize] {
                    None
                } else {
                    let l = self.taffy.layout(self.mirror_of(child)?)?;
                    placed += 1;
                    Some(Point::new(
                        f64::from(l.location.x) - padding,
                        f64::from(l.location.y) - padding,
                    ))
                };
                if self.position[child as usize] != new_pos {
                    self.position[child as usize] = new_pos;
                    changes.positions.push(child);
                }
                child = self.next_sibling[child as usize];
            }
        }

        self.resolved_width[root as usize] = Some(width);
        changes.passes.push(LayoutPass {
            root,
            placed,
            width,
            height: self.size[root as usize].height,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::*;
    use crate::layout::{AlignContent, AlignItems, FlexStyle, JustifyContent, NodeId};

    fn container(tree: &mut LayoutTree, style: FlexStyle, width: f64) -> NodeId {
        let c = tree.create_container(style).unwrap();
        tree.set_available_width(c, Some(width));
        c
    }

    fn leaves(tree: &mut LayoutTree, parent: NodeId, sizes: &[(f64, f64)]) -> Vec<NodeId> {
        sizes
            .iter()
            .map(|&(w, h)| {
                let n = tree.create_node(Size::new(w, h)).unwrap();
                tree.add_child(parent, n);
                n
            })
            .collect()
    }

    fn assert_point(actual: Option<Point>, x: f64, y: f64) {
        let p = actual.expect("node should be positioned");
        assert!(
            (p.x - x).abs() < 1e-3 && (p.y - y).abs() < 1e-3,
            "expected ({x}, {y}), got {p:?}"
        );
    }

    #[test]
    fn wraps_onto_a_second_line() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new().with_gap(40.0), 700.0);
        let kids = leaves(&mut tree, c, &[(300.0, 300.0); 3]);

        let changes = tree.evaluate();
        assert_eq!(changes.passes.len(), 1);
        assert_eq!(changes.passes[0].placed, 3);

        assert_point(tree.computed_position(kids[0]), 0.0, 0.0);
        assert_point(tree.computed_position(kids[1]), 340.0, 0.0);
        assert_point(tree.computed_position(kids[2]), 0.0, 340.0);
        assert!((tree.computed_size(c).height - 640.0).abs() < 1e-3);
    }

    #[test]
    fn padding_offsets_are_excluded_from_positions() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new().with_padding(40.0), 500.0);
        let kids = leaves(&mut tree, c, &[(100.0, 100.0)]);
        let _ = tree.evaluate();
        assert_point(tree.computed_position(kids[0]), 0.0, 0.0);
        assert!((tree.computed_size(c).height - 180.0).abs() < 1e-3);
    }

    #[test]
    fn skipped_child_is_excluded() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new().with_gap(40.0), 700.0);
        let kids = leaves(&mut tree, c, &[(300.0, 300.0); 3]);
        let _ = tree.evaluate();

        tree.set_skip(kids[1], true);
        let changes = tree.evaluate();
        assert_eq!(tree.computed_position(kids[1]), None);
        assert!(changes.positions.contains(&kids[1].index()));
        assert_point(tree.computed_position(kids[2]), 340.0, 0.0);
        assert!((tree.computed_size(c).height - 300.0).abs() < 1e-3);
    }

    #[test]
    fn zero_size_child_still_takes_a_gap() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new().with_gap(40.0), 700.0);
        let kids = leaves(&mut tree, c, &[(300.0, 300.0), (0.0, 0.0), (300.0, 300.0)]);
        let _ = tree.evaluate();
        assert_point(tree.computed_position(kids[1]), 340.0, 0.0);
        assert_point(tree.computed_position(kids[2]), 380.0, 0.0);
    }

    #[test]
    fn empty_container_height_is_padding_or_min_height() {
        let mut tree = LayoutTree::new();
        let a = container(&mut tree, FlexStyle::new().with_padding(40.0), 500.0);
        let b = container(
            &mut tree,
            FlexStyle::new().with_padding(40.0).with_min_height(500.0),
            500.0,
        );
        let _ = tree.evaluate();
        assert!((tree.computed_size(a).height - 80.0).abs() < 1e-3);
        assert!((tree.computed_size(b).height - 500.0).abs() < 1e-3);
        assert!(tree.container_layout(a).children.is_empty());
    }

    #[test]
    fn justify_center_splits_free_space() {
        let mut tree = LayoutTree::new();
        let style = FlexStyle::new()
            .with_gap(40.0)
            .with_justify_content(JustifyContent::Center);
        let c = container(&mut tree, style, 700.0);
        let kids = leaves(&mut tree, c, &[(300.0, 300.0); 2]);
        let _ = tree.evaluate();
        assert_point(tree.computed_position(kids[0]), 30.0, 0.0);
        assert_point(tree.computed_position(kids[1]), 370.0, 0.0);
    }

    #[test]
    fn align_items_center_within_line() {
        let mut tree = LayoutTree::new();
        let style = FlexStyle::new().with_align_items(AlignItems::Center);
        let c = container(&mut tree, style, 500.0);
        let kids = leaves(&mut tree, c, &[(100.0, 50.0), (100.0, 100.0)]);
        let _ = tree.evaluate();
        assert_point(tree.computed_position(kids[0]), 0.0, 25.0);
        assert_point(tree.computed_position(kids[1]), 100.0, 0.0);
    }

    #[test]
    fn align_content_center_uses_min_height() {
        let mut tree = LayoutTree::new();
        let style = FlexStyle::new()
            .with_min_height(300.0)
            .with_align_content(AlignContent::Center);
        let c = container(&mut tree, style, 300.0);
        let kids = leaves(&mut tree, c, &[(100.0, 100.0)]);
        let _ = tree.evaluate();
        assert_point(tree.computed_position(kids[0]), 0.0, 100.0);
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new(), 400.0);
        let _ = leaves(&mut tree, c, &[(10.0, 10.0)]);
        let first = tree.evaluate();
        assert!(!first.is_empty());

        let second = tree.evaluate();
        assert!(second.is_empty(), "idle evaluate should change nothing");
    }

    #[test]
    fn resetting_the_same_size_is_a_no_op() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new(), 400.0);
        let kids = leaves(&mut tree, c, &[(10.0, 10.0)]);
        let _ = tree.evaluate();
        tree.set_intrinsic_size(kids[0], Size::new(10.0, 10.0));
        assert!(tree.evaluate().passes.is_empty());
    }

    #[test]
    fn width_change_reflows() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new().with_gap(40.0), 700.0);
        let kids = leaves(&mut tree, c, &[(300.0, 300.0); 3]);
        let _ = tree.evaluate();

        tree.set_available_width(c, Some(1000.0));
        let changes = tree.evaluate();
        assert_eq!(changes.passes.len(), 1);
        assert_point(tree.computed_position(kids[2]), 680.0, 0.0);
        assert!(changes.sizes.contains(&c.index()));
    }

    #[test]
    fn waits_for_available_width() {
        let mut tree = LayoutTree::new();
        let c = tree.create_container(FlexStyle::new()).unwrap();
        let kids = leaves(&mut tree, c, &[(10.0, 10.0)]);

        let changes = tree.evaluate();
        assert!(changes.passes.is_empty());
        let diags = tree.take_diagnostics();
        assert!(diags.iter().any(|d| d.kind == DiagnosticKind::NotReady));
        assert_eq!(tree.computed_position(kids[0]), None);

        tree.set_available_width(c, Some(100.0));
        let changes = tree.evaluate();
        assert_eq!(changes.passes.len(), 1);
        assert_point(tree.computed_position(kids[0]), 0.0, 0.0);
    }

    #[test]
    fn nested_container_resolves_fraction_of_parent() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, FlexStyle::new(), 1000.0);
        let nested = tree
            .create_container(
                FlexStyle::new()
                    .with_gap(10.0)
                    .with_width(ContainerWidth::Fraction(0.5)),
            )
            .unwrap();
        tree.add_child(root, nested);
        let kids = leaves(&mut tree, nested, &[(100.0, 100.0); 2]);

        let changes = tree.evaluate();
        assert_eq!(changes.passes.len(), 1, "one pass covers nested containers");
        assert_eq!(changes.passes[0].placed, 3);
        assert!((tree.computed_size(nested).width - 500.0).abs() < 1e-3);
        assert_point(tree.computed_position(nested), 0.0, 0.0);
        assert_point(tree.computed_position(kids[1]), 110.0, 0.0);

        // A child size change inside the nested container reaches the root.
        tree.set_intrinsic_size(kids[0], Size::new(100.0, 200.0));
        let changes = tree.evaluate();
        assert_eq!(changes.passes.len(), 1);
        assert!((tree.computed_size(root).height - 200.0).abs() < 1e-3);
    }

    #[test]
    fn skipped_container_lays_out_against_parent_content_width() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, FlexStyle::new().with_padding(40.0), 1024.0);
        let nested = tree
            .create_container(FlexStyle::new().with_width(ContainerWidth::Fraction(0.5)))
            .unwrap();
        tree.add_child(root, nested);
        tree.set_skip(nested, true);
        let _ = leaves(&mut tree, nested, &[(100.0, 100.0)]);

        let changes = tree.evaluate();
        assert_eq!(changes.passes.len(), 2);
        assert_eq!(changes.passes[0].root, root.index(), "parent first");
        assert_eq!(tree.computed_position(nested), None);
        assert!((tree.computed_size(nested).width - 472.0).abs() < 1e-3);
    }

    #[test]
    fn detached_child_reports_lost_position() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new(), 400.0);
        let kids = leaves(&mut tree, c, &[(10.0, 10.0), (10.0, 10.0)]);
        let _ = tree.evaluate();

        tree.remove_from_parent(kids[0]);
        let changes = tree.evaluate();
        assert!(changes.positions.contains(&kids[0].index()));
        assert_eq!(tree.computed_position(kids[0]), None);
        assert_point(tree.computed_position(kids[1]), 0.0, 0.0);
    }

    #[test]
    fn lifecycle_lists_are_reported_once() {
        let mut tree = LayoutTree::new();
        let c = container(&mut tree, FlexStyle::new(), 400.0);
        let changes = tree.evaluate();
        assert_eq!(changes.added, [c.index()]);
        tree.destroy_node(c);
        let changes = tree.evaluate();
        assert_eq!(changes.removed, [c.index()]);
        assert!(tree.evaluate().removed.is_empty());
    }

    #[test]
    fn traversal_order_is_depth_first() {
        let mut tree = LayoutTree::new();
        let a = tree.create_container(FlexStyle::new()).unwrap();
        let b = tree.create_container(FlexStyle::new()).unwrap();
        let c = tree.create_node(Size::ZERO).unwrap();
        let d = tree.create_node(Size::ZERO).unwrap();

        // Tree: a -> [b -> [d], c]
        tree.add_child(a, b);
        tree.add_child(a, c);
        tree.add_child(b, d);

        let _ = tree.evaluate();
        assert_eq!(tree.traversal_order(), &[a.idx, b.idx, d.idx, c.idx]);
    }
}
