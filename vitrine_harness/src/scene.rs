// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Size};
use vitrine_core::layout::{LayoutChanges, LayoutTree, NodeId};
use vitrine_core::scene::{ElementBindings, Presenter, SceneElement};
use vitrine_core::time::Duration;
use vitrine_core::transition::{
    PagePose, Property, PropertyAccess, TargetId, Tilt, TiltConfig, TiltResponse,
};
use vitrine_core::view::Showcase;

/// A renderer element as seen by tests.
#[derive(Clone, Copy, Debug)]
pub struct FakeElement {
    /// Intrinsic size reported to layout.
    pub size: Size,
    /// Whether the element asks to be skipped.
    pub skip: bool,
    /// Last position received from layout.
    pub position: Option<Point>,
    /// Animated opacity.
    pub opacity: f64,
    /// Animated depth.
    pub depth: f64,
    /// Hover response.
    pub tilt: TiltResponse,
    /// Last tilt produced by [`FakeScene::step_tilts`].
    pub pose: Tilt,
}

impl FakeElement {
    /// A fully visible element at rest.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            skip: false,
            position: None,
            opacity: 1.0,
            depth: 0.0,
            tilt: TiltResponse::new(TiltConfig {
                size,
                ..TiltConfig::card()
            }),
            pose: Tilt::default(),
        }
    }

    /// An element that starts transparent and sunk back, waiting to fade in.
    #[must_use]
    pub fn hidden(size: Size) -> Self {
        Self {
            opacity: 0.0,
            depth: -20.0,
            ..Self::new(size)
        }
    }
}

impl SceneElement for FakeElement {
    fn intrinsic_size(&self) -> Size {
        self.size
    }

    fn is_skipped(&self) -> bool {
        self.skip
    }

    fn set_computed_position(&mut self, position: Option<Point>) {
        self.position = position;
    }
}

/// An in-memory scene keyed by layout node, with animation targets mapped
/// onto nodes.
#[derive(Debug, Default)]
pub struct FakeScene {
    elements: ElementBindings<FakeElement>,
    targets: BTreeMap<TargetId, NodeId>,
    page_pose: PagePose,
}

impl FakeScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene with one element per card of `showcase`.
    #[must_use]
    pub fn for_showcase(showcase: &Showcase) -> Self {
        let mut scene = Self::new();
        let size = showcase.config().card_size;
        for (i, &node) in showcase.cards().iter().enumerate() {
            scene.insert(node, Some(showcase.card_target(i)), FakeElement::new(size));
        }
        scene.sync_showcase(showcase);
        scene
    }

    /// Binds elements for project items that appeared since the last call
    /// and drops target mappings for items that went away.
    pub fn sync_showcase(&mut self, showcase: &Showcase) {
        let items = showcase.project_items();
        for (j, &node) in items.iter().enumerate() {
            let target = showcase.project_item_target(j);
            if self.targets.get(&target) != Some(&node) {
                let size = showcase.tree().intrinsic_size(node);
                self.insert(node, Some(target), FakeElement::hidden(size));
            }
        }
        let first_stale = showcase.project_item_target(items.len());
        let stale: Vec<TargetId> = self.targets.range(first_stale..).map(|(&t, _)| t).collect();
        for target in stale {
            if let Some(node) = self.targets.remove(&target) {
                self.elements.unbind(node);
            }
        }
    }

    /// Binds `element` to `node`, optionally as an animation target.
    pub fn insert(&mut self, node: NodeId, target: Option<TargetId>, element: FakeElement) {
        self.elements.bind(node, element);
        if let Some(target) = target {
            self.targets.insert(target, node);
        }
    }

    /// The element bound to `node`.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&FakeElement> {
        self.elements.get(node)
    }

    /// The element bound to `node`, mutably.
    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut FakeElement> {
        self.elements.get_mut(node)
    }

    /// The element behind an animation target.
    #[must_use]
    pub fn target(&self, target: TargetId) -> Option<&FakeElement> {
        self.elements.get(*self.targets.get(&target)?)
    }

    /// The last page rotation and light position presented.
    #[must_use]
    pub fn page_pose(&self) -> PagePose {
        self.page_pose
    }

    /// Moves the pointer over a target (`Some` in card coordinates) or off
    /// it (`None`).
    pub fn hover(&mut self, target: TargetId, local: Option<Point>) {
        let Some(&node) = self.targets.get(&target) else {
            return;
        };
        let Some(element) = self.elements.get_mut(node) else {
            return;
        };
        match local {
            Some(point) => {
                element.tilt.pointer_enter();
                element.tilt.pointer_move(point);
            }
            None => element.tilt.pointer_leave(),
        }
    }

    /// Advances every element's hover tilt.
    pub fn step_tilts(&mut self, dt: Duration) {
        let nodes: Vec<NodeId> = self.elements.iter().map(|(n, _)| n).collect();
        for node in nodes {
            if let Some(element) = self.elements.get_mut(node) {
                element.pose = element.tilt.step(dt);
            }
        }
    }

    /// Copies element sizes and skip flags into a tree the scene drives
    /// directly.
    pub fn pull(&self, tree: &mut LayoutTree) {
        self.elements.pull(tree);
    }
}

impl PropertyAccess for FakeScene {
    fn get(&self, target: TargetId, property: Property) -> Option<f64> {
        let element = self.target(target)?;
        Some(match property {
            Property::Opacity => element.opacity,
            Property::Depth => element.depth,
        })
    }

    fn set(&mut self, target: TargetId, property: Property, value: f64) -> bool {
        let Some(&node) = self.targets.get(&target) else {
            return false;
        };
        let Some(element) = self.elements.get_mut(node) else {
            return false;
        };
        match property {
            Property::Opacity => element.opacity = value,
            Property::Depth => element.depth = value,
        }
        true
    }
}

impl Presenter for FakeScene {
    fn apply(&mut self, tree: &LayoutTree, changes: &LayoutChanges) {
        self.elements.apply(tree, changes);
    }

    fn apply_pose(&mut self, pose: &PagePose) {
        self.page_pose = *pose;
    }
}
