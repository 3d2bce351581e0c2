// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The showcase page: cards, project detail, and the choreography between
//! them.
//!
//! [`Showcase`] owns one [`LayoutTree`](crate::layout::LayoutTree), one
//! scroll region, and a [`TransitionAnimator`](crate::transition::TransitionAnimator),
//! and steps them in a fixed order every frame. Inputs that several derived
//! values read (viewport, selection, card visibility) live in a
//! [`ViewState`] whose setters invalidate a [`reactive::Graph`](crate::reactive::Graph);
//! the flush phase recomputes only what those inputs reach.
//!
//! The page is laid out as:
//!
//! ```text
//! page (padding, gap, centered)
//! ├── title row (centered)
//! │   ├── back button   skipped unless inline
//! │   └── header
//! └── body (centered, min-height fills the viewport)
//!     ├── card × N      skipped while a project is shown
//!     └── project content (fraction of the body width)
//!         └── item × M
//! ```

mod showcase;
mod state;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Size;

use crate::scroll::ScrollConfig;
use crate::transition::{FadeConfig, PointerFollowConfig};

pub use showcase::{FrameOutput, Showcase};
pub use state::{Derived, ViewState};

/// Where the back button is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackButton {
    /// No project is selected.
    #[default]
    Hidden,
    /// In the title row, beside the header. Used on narrow viewports.
    Inline,
    /// Pinned to the top-left corner of the viewport.
    Floating,
}

/// One block of a project's detail content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectItem {
    /// Height of the block. Its width always spans the project content.
    pub height: f64,
}

impl ProjectItem {
    /// A block of the given height.
    #[must_use]
    pub const fn new(height: f64) -> Self {
        Self { height }
    }
}

/// A project listed as a card.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    /// Routing key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Detail content, in display order.
    pub items: Vec<ProjectItem>,
}

impl Project {
    /// A project with no detail content.
    #[must_use]
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Appends a detail block.
    #[must_use]
    pub fn with_item(mut self, item: ProjectItem) -> Self {
        self.items.push(item);
        self
    }
}

/// Page geometry and choreography parameters.
#[derive(Clone, Copy, Debug)]
pub struct ShowcaseConfig {
    /// Padding of the page container on every side.
    pub page_padding: f64,
    /// Gap between the title row and the body.
    pub page_gap: f64,
    /// Gap between the back button and the header.
    pub title_gap: f64,
    /// Height of the header.
    pub title_height: f64,
    /// Size of the back button.
    pub back_button_size: Size,
    /// Viewport width at and above which the back button floats.
    pub floating_breakpoint: f64,
    /// Size of every card.
    pub card_size: Size,
    /// Gap between cards.
    pub body_gap: f64,
    /// Width of the project content as a fraction of the body.
    pub project_fraction: f64,
    /// Gap between project items.
    pub project_gap: f64,
    /// Cards leaving when a project is selected.
    pub cards_out: FadeConfig,
    /// Cards returning when the selection is cleared.
    pub cards_in: FadeConfig,
    /// Project items appearing.
    pub project_in: FadeConfig,
    /// Project items leaving.
    pub project_out: FadeConfig,
    /// Page scroll region.
    pub scroll: ScrollConfig,
    /// Page lean and light that follow the pointer.
    pub pointer_follow: PointerFollowConfig,
}

impl ShowcaseConfig {
    /// Desktop defaults.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            page_padding: 40.0,
            page_gap: 60.0,
            title_gap: 20.0,
            title_height: 60.0,
            back_button_size: Size::new(60.0, 60.0),
            floating_breakpoint: 1024.0,
            card_size: Size::new(300.0, 300.0),
            body_gap: 60.0,
            project_fraction: 0.8,
            project_gap: 60.0,
            cards_out: FadeConfig::cards_out(),
            cards_in: FadeConfig::cards_in(),
            project_in: FadeConfig::project_in(),
            project_out: FadeConfig::project_out(),
            scroll: ScrollConfig::desktop(),
            pointer_follow: PointerFollowConfig::page(),
        }
    }

    /// Desktop defaults with a separate drag simulation.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            scroll: ScrollConfig::touch(),
            ..Self::desktop()
        }
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self::desktop()
    }
}
