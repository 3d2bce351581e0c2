// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Size;

use crate::reactive::{Graph, Key};

/// A value recomputed during the flush phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Derived {
    /// Back-button placement and the inline item's skip flag.
    BackButton,
    /// Card and project-content skip flags.
    Visibility,
    /// The page's available width.
    PageWidth,
    /// Project item sizes.
    ProjectItems,
    /// Header size.
    Header,
    /// The body's minimum height.
    BodyMinHeight,
}

/// Shared inputs of the showcase view.
///
/// Every setter returns whether the value changed. A change marks the
/// derived values that read it, and [`flush`](Self::flush) hands them back
/// in dependency order.
#[derive(Debug)]
pub struct ViewState {
    graph: Graph,
    viewport_key: Key,
    selection_key: Key,
    show_cards_key: Key,
    header_key: Key,
    body_top_key: Key,
    derived: Vec<(Key, Derived)>,
    viewport: Size,
    selected: Option<usize>,
    show_cards: bool,
    header_width: f64,
    body_top: f64,
}

impl ViewState {
    /// Creates the state for a viewport. Cards start shown with nothing
    /// selected, and every derived value is pending.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let mut graph = Graph::new();
        let viewport_key = graph.source("viewport");
        let selection_key = graph.source("selection");
        let show_cards_key = graph.source("show-cards");
        let header_key = graph.source("header-width");
        let body_top_key = graph.source("body-top");
        let derived = Vec::from([
            (
                graph.derived("back-button", &[viewport_key, selection_key]),
                Derived::BackButton,
            ),
            (
                graph.derived("visibility", &[show_cards_key]),
                Derived::Visibility,
            ),
            (graph.derived("page-width", &[viewport_key]), Derived::PageWidth),
            (
                graph.derived("project-items", &[viewport_key, selection_key]),
                Derived::ProjectItems,
            ),
            (graph.derived("header", &[header_key]), Derived::Header),
            (
                graph.derived("body-min-height", &[viewport_key, body_top_key]),
                Derived::BodyMinHeight,
            ),
        ]);
        Self {
            graph,
            viewport_key,
            selection_key,
            show_cards_key,
            header_key,
            body_top_key,
            derived,
            viewport,
            selected: None,
            show_cards: true,
            header_width: 0.0,
            body_top: 0.0,
        }
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        self.graph.invalidate(self.viewport_key);
        true
    }

    /// Index of the selected project.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Sets the selected project.
    pub fn set_selected(&mut self, selected: Option<usize>) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        self.graph.invalidate(self.selection_key);
        true
    }

    /// Whether cards take part in layout.
    #[must_use]
    pub fn show_cards(&self) -> bool {
        self.show_cards
    }

    /// Shows or hides the cards. The project content takes the opposite
    /// state.
    pub fn set_show_cards(&mut self, show: bool) -> bool {
        if self.show_cards == show {
            return false;
        }
        self.show_cards = show;
        self.graph.invalidate(self.show_cards_key);
        true
    }

    /// Measured width of the header text.
    #[must_use]
    pub fn header_width(&self) -> f64 {
        self.header_width
    }

    /// Sets the measured header width.
    pub fn set_header_width(&mut self, width: f64) -> bool {
        if self.header_width == width {
            return false;
        }
        self.header_width = width;
        self.graph.invalidate(self.header_key);
        true
    }

    /// Top of the body within the page's padding box, as last laid out.
    #[must_use]
    pub fn body_top(&self) -> f64 {
        self.body_top
    }

    /// Records where layout placed the body.
    pub fn set_body_top(&mut self, top: f64) -> bool {
        if self.body_top == top {
            return false;
        }
        self.body_top = top;
        self.graph.invalidate(self.body_top_key);
        true
    }

    /// Returns the derived values to recompute, dependencies first, and
    /// clears all marks.
    pub fn flush(&mut self) -> Vec<Derived> {
        self.graph
            .flush()
            .into_iter()
            .filter_map(|key| {
                self.derived
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|&(_, d)| d)
            })
            .collect()
    }
}
