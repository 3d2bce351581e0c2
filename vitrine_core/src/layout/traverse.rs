// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::LayoutTree;

/// An iterator over the direct children of a node, in layout order.
///
/// Created by [`LayoutTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a LayoutTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a LayoutTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.tree.generation[idx as usize],
        })
    }
}
