// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateless single-container layout.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use super::store::LayoutTree;
use super::style::FlexStyle;
use crate::error::LayoutError;
use crate::trace::DiagnosticKind;

/// One child passed to [`compute_flex`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlexChild {
    /// The child's intrinsic size.
    pub size: Size,
    /// Whether the child is excluded from layout.
    pub skip: bool,
}

impl FlexChild {
    /// A participating child of the given size.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self { size, skip: false }
    }

    /// A skipped child.
    #[must_use]
    pub const fn skipped(size: Size) -> Self {
        Self { size, skip: true }
    }
}

/// The result of [`compute_flex`].
#[derive(Clone, Debug, PartialEq)]
pub struct FlexLayout {
    /// The container size.
    pub size: Size,
    /// One entry per input child, relative to the padding box; `None` for
    /// skipped children.
    pub positions: Vec<Option<Point>>,
}

/// Lays out `children` in a single container of the given style and width.
///
/// This is a one-shot equivalent of building a [`LayoutTree`] with one
/// container and evaluating it.
pub fn compute_flex(
    style: FlexStyle,
    available_width: f64,
    children: &[FlexChild],
) -> Result<FlexLayout, LayoutError> {
    let mut tree = LayoutTree::new();
    let container = tree.create_container(style)?;
    tree.set_available_width(container, Some(available_width));
    let mut ids = Vec::with_capacity(children.len());
    for child in children {
        let id = tree.create_node(child.size)?;
        tree.set_skip(id, child.skip);
        tree.add_child(container, id);
        ids.push(id);
    }

    let _ = tree.evaluate();
    if tree
        .diagnostics()
        .iter()
        .any(|d| d.kind == DiagnosticKind::LayoutBackend)
    {
        return Err(LayoutError::PassFailed {
            root: container.index(),
        });
    }

    Ok(FlexLayout {
        size: tree.computed_size(container),
        positions: ids.iter().map(|&id| tree.computed_position(id)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::JustifyContent;

    #[test]
    fn matches_the_persistent_tree() {
        let style = FlexStyle::new().with_gap(40.0);
        let layout = compute_flex(style, 700.0, &[FlexChild::new(Size::new(300.0, 300.0)); 3])
            .unwrap();
        assert_eq!(layout.positions.len(), 3);
        let third = layout.positions[2].unwrap();
        assert!((third.x - 0.0).abs() < 1e-3 && (third.y - 340.0).abs() < 1e-3);
        assert!((layout.size.height - 640.0).abs() < 1e-3);
        assert!((layout.size.width - 700.0).abs() < 1e-3);
    }

    #[test]
    fn skipped_children_have_no_position() {
        let style = FlexStyle::new().with_justify_content(JustifyContent::End);
        let children = [
            FlexChild::new(Size::new(100.0, 10.0)),
            FlexChild::skipped(Size::new(100.0, 10.0)),
        ];
        let layout = compute_flex(style, 400.0, &children).unwrap();
        assert_eq!(layout.positions[1], None);
        let first = layout.positions[0].unwrap();
        assert!((first.x - 300.0).abs() < 1e-3, "end-justified, got {first:?}");
    }

    #[test]
    fn no_children() {
        let style = FlexStyle::new().with_padding(10.0).with_min_height(5.0);
        let layout = compute_flex(style, 100.0, &[]).unwrap();
        assert!(layout.positions.is_empty());
        assert!((layout.size.height - 20.0).abs() < 1e-3);
    }
}
