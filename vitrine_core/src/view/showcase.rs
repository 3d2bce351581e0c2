// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size};

use super::state::{Derived, ViewState};
use super::{BackButton, Project, ShowcaseConfig};
use crate::clock::Clock;
use crate::error::LayoutError;
use crate::layout::{
    AlignContent, ContainerWidth, FlexStyle, JustifyContent, LayoutChanges, LayoutTree, NodeId,
};
use crate::scheduler::{RenderTasks, TaskControl};
use crate::scroll::{ScrollChanges, ScrollController, ScrollHandle, Thumb};
use crate::time::HostTime;
use crate::timing::FrameTick;
use crate::trace::{
    Diagnostic, DiagnosticKind, FrameSummary, FrameSummaryBuilder, FrameTickEvent,
    LayoutPassEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, ScrollEvent, Subject, Tracer,
    TransitionEvent,
};
use crate::transition::{
    BatchId, PagePose, PointerFollow, PropertyAccess, TargetId, TransitionAnimator,
    TransitionChanges,
};

/// Everything one [`Showcase::frame`] produced.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    /// Layout changes to present, read against [`Showcase::tree`].
    pub layout: LayoutChanges,
    /// Scroll offset changes.
    pub scroll: ScrollChanges,
    /// Transition lifecycle steps and written targets.
    pub transitions: TransitionChanges,
    /// Whether the cards gave way to the project content this frame.
    pub swapped: bool,
    /// Page rotation and light position after this frame's render tasks.
    pub pose: PagePose,
    /// Phase timings.
    pub summary: FrameSummary,
}

/// The showcase page.
///
/// Cards are animation targets `0..card_count`; the selected project's
/// items follow at `card_count..`. The host maps those ids to its scene
/// elements through the [`PropertyAccess`] it passes in.
#[derive(Debug)]
pub struct Showcase {
    config: ShowcaseConfig,
    projects: Vec<Project>,
    state: ViewState,
    tree: LayoutTree,
    page: NodeId,
    title_row: NodeId,
    back_button_node: NodeId,
    header: NodeId,
    body: NodeId,
    project_content: NodeId,
    cards: Vec<NodeId>,
    project_items: Vec<NodeId>,
    scroll: ScrollController,
    handle: ScrollHandle,
    animator: TransitionAnimator,
    follow: PointerFollow,
    render_tasks: RenderTasks<PointerFollow>,
    cards_batch: Option<BatchId>,
    project_batch: Option<BatchId>,
    awaiting_swap: bool,
    back_button: BackButton,
    diagnostics: Vec<Diagnostic>,
}

impl Showcase {
    /// Builds the page with one card per project.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout backend rejects a node.
    pub fn new(
        config: ShowcaseConfig,
        projects: Vec<Project>,
        viewport: Size,
    ) -> Result<Self, LayoutError> {
        let mut tree = LayoutTree::new();
        let page = tree.create_container(
            FlexStyle::new()
                .with_padding(config.page_padding)
                .with_gap(config.page_gap)
                .with_justify_content(JustifyContent::Center),
        )?;
        let title_row = tree.create_container(
            FlexStyle::new()
                .with_gap(config.title_gap)
                .with_justify_content(JustifyContent::Center)
                .with_align_content(AlignContent::Center),
        )?;
        let back_button_node = tree.create_node(config.back_button_size)?;
        let header = tree.create_node(Size::new(0.0, config.title_height))?;
        let body = tree.create_container(
            FlexStyle::new()
                .with_gap(config.body_gap)
                .with_justify_content(JustifyContent::Center)
                .with_align_content(AlignContent::Center),
        )?;
        let project_content = tree.create_container(
            FlexStyle::new()
                .with_width(ContainerWidth::Fraction(config.project_fraction))
                .with_gap(config.project_gap)
                .with_justify_content(JustifyContent::Center),
        )?;

        tree.add_child(page, title_row);
        tree.add_child(title_row, back_button_node);
        tree.add_child(title_row, header);
        tree.add_child(page, body);
        let mut cards = Vec::with_capacity(projects.len());
        for _ in &projects {
            let card = tree.create_node(config.card_size)?;
            tree.add_child(body, card);
            cards.push(card);
        }
        tree.add_child(body, project_content);

        let mut scroll = ScrollController::new();
        let region = scroll.create_region_with(config.scroll);
        let handle = scroll.attach(region, viewport.height, 0.0);

        let mut render_tasks = RenderTasks::new();
        let _ = render_tasks.add(|follow: &mut PointerFollow, tick: &FrameTick| {
            follow.step(tick.interval);
            TaskControl::Continue
        });

        Ok(Self {
            config,
            projects,
            state: ViewState::new(viewport),
            tree,
            page,
            title_row,
            back_button_node,
            header,
            body,
            project_content,
            cards,
            project_items: Vec::new(),
            scroll,
            handle,
            animator: TransitionAnimator::new(),
            follow: PointerFollow::new(config.pointer_follow, viewport),
            render_tasks,
            cards_batch: None,
            project_batch: None,
            awaiting_swap: false,
            back_button: BackButton::Hidden,
            diagnostics: Vec::new(),
        })
    }

    // -- Accessors --

    /// The page's layout tree.
    #[must_use]
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// The shared view inputs.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The configuration the page was built with.
    #[must_use]
    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    /// All projects, in card order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The selected project.
    #[must_use]
    pub fn selected(&self) -> Option<&Project> {
        self.state.selected().and_then(|idx| self.projects.get(idx))
    }

    /// Header text.
    #[must_use]
    pub fn title(&self) -> String {
        match self.selected() {
            Some(project) => format!("Project: {}", project.name),
            None => String::from("Showcase"),
        }
    }

    /// Where the back button is shown, as of the last flush.
    #[must_use]
    pub fn back_button(&self) -> BackButton {
        self.back_button
    }

    /// The page root container.
    #[must_use]
    pub fn page(&self) -> NodeId {
        self.page
    }

    /// The title row container.
    #[must_use]
    pub fn title_row(&self) -> NodeId {
        self.title_row
    }

    /// The inline back-button item.
    #[must_use]
    pub fn back_button_node(&self) -> NodeId {
        self.back_button_node
    }

    /// The header item.
    #[must_use]
    pub fn header(&self) -> NodeId {
        self.header
    }

    /// The body container.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The project content container.
    #[must_use]
    pub fn project_content(&self) -> NodeId {
        self.project_content
    }

    /// Card nodes, in project order.
    #[must_use]
    pub fn cards(&self) -> &[NodeId] {
        &self.cards
    }

    /// Item nodes of the selected project.
    #[must_use]
    pub fn project_items(&self) -> &[NodeId] {
        &self.project_items
    }

    /// Animation target of the card at `index`.
    #[must_use]
    pub fn card_target(&self, index: usize) -> TargetId {
        target_id(index)
    }

    /// Animation target of the project item at `index`.
    #[must_use]
    pub fn project_item_target(&self, index: usize) -> TargetId {
        target_id(self.cards.len() + index)
    }

    /// The page scroll handle.
    #[must_use]
    pub fn scroll_handle(&self) -> ScrollHandle {
        self.handle
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset(self.handle)
    }

    /// Vertical translation to apply to the page content.
    #[must_use]
    pub fn content_translation(&self) -> f64 {
        self.scroll.content_translation(self.handle)
    }

    /// Scrollbar thumb for the page.
    #[must_use]
    pub fn thumb(&self) -> Thumb {
        self.scroll.thumb(self.handle)
    }

    /// Current page rotation and light position.
    #[must_use]
    pub fn page_pose(&self) -> PagePose {
        self.follow.pose()
    }

    /// Number of items still animating.
    #[must_use]
    pub fn active_transitions(&self) -> usize {
        self.animator.active_count()
    }

    // -- Inputs --

    /// Sets the viewport size. Takes effect at the next frame.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.state.set_viewport(viewport);
        self.follow.set_viewport(viewport);
    }

    /// Moves the hover pointer, in viewport coordinates. The page leans and
    /// the light drifts toward it over the following frames.
    pub fn pointer_hover(&mut self, position: Point) {
        self.follow.pointer_move(position);
    }

    /// Sets the measured width of the header text.
    pub fn set_header_width(&mut self, width: f64) {
        self.state.set_header_width(width);
    }

    /// Starts or stops scroll simulations with the rendering context.
    pub fn set_context_available(&mut self, available: bool) {
        self.scroll.set_context_available(available);
    }

    /// Feeds a wheel delta to the page.
    pub fn wheel(&mut self, delta: f64) {
        self.scroll.wheel(self.handle, delta);
    }

    /// Starts a pointer drag at a vertical position.
    pub fn pointer_down(&mut self, position: f64, now: HostTime) {
        self.scroll.pointer_down(self.handle, position, now);
    }

    /// Moves an active pointer drag.
    pub fn pointer_move(&mut self, position: f64, now: HostTime) {
        self.scroll.pointer_move(self.handle, position, now);
    }

    /// Ends a pointer drag, handing its velocity to momentum.
    pub fn pointer_up(&mut self, now: HostTime) {
        self.scroll.pointer_up(self.handle, now);
    }

    /// Selects a project by slug, or clears the selection with `None`.
    ///
    /// Selecting fades the cards out; once every card has settled, the next
    /// frame swaps in the project content and fades its items in. Clearing
    /// brings the cards back immediately while they fade in, and fades the
    /// project items out. An unknown slug leaves the selection unchanged.
    pub fn select(&mut self, slug: Option<&str>, now: HostTime, access: &dyn PropertyAccess) {
        let selected = match slug {
            None => None,
            Some(slug) => {
                let Some(idx) = self.projects.iter().position(|p| p.slug == slug) else {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnknownProject,
                        Subject::View,
                        "slug",
                    ));
                    return;
                };
                Some(idx)
            }
        };
        if !self.state.set_selected(selected) {
            return;
        }

        let cards: Vec<TargetId> = (0..self.cards.len()).map(target_id).collect();
        match selected {
            Some(idx) => {
                self.rebuild_project_items(idx, now);
                let batch = self
                    .animator
                    .transition(&cards, &self.config.cards_out, now, access);
                self.replace_cards_batch(batch);
                self.awaiting_swap = true;
            }
            None => {
                self.awaiting_swap = false;
                let batch = self
                    .animator
                    .transition(&cards, &self.config.cards_in, now, access);
                self.replace_cards_batch(batch);
                self.state.set_show_cards(true);
                self.scroll.scroll_to(self.handle, 0.0);
                let items = self.project_targets();
                let batch = self
                    .animator
                    .transition(&items, &self.config.project_out, now, access);
                self.replace_project_batch(batch);
            }
        }
    }

    /// Drains diagnostics recorded outside [`frame`](Self::frame).
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.collect_diagnostics();
        core::mem::take(&mut self.diagnostics)
    }

    // -- Frame --

    /// Runs one frame: animate, swap check, flush, layout, scroll.
    ///
    /// Phase timestamps are read from `clock`. Diagnostics from every
    /// component are forwarded to `tracer`.
    pub fn frame(
        &mut self,
        tick: &FrameTick,
        access: &mut dyn PropertyAccess,
        clock: &dyn Clock,
        tracer: &mut Tracer<'_>,
    ) -> FrameOutput {
        let frame_index = tick.frame_index;
        let tick_event = FrameTickEvent::from(tick);
        tracer.frame_tick(&tick_event);
        let mut summary = FrameSummaryBuilder::new(&tick_event);

        // Animate
        begin_phase(PhaseKind::Animate, frame_index, clock, &mut summary, tracer);
        let mut transitions = TransitionChanges::default();
        self.animator.tick_into(tick, access, &mut transitions);
        let swapped = self.swap_if_settled(tick.now, access);
        self.render_tasks.run(&mut self.follow, tick);
        for record in &transitions.records {
            tracer.transition(&TransitionEvent {
                frame_index,
                target: record.target.0,
                phase: record.phase,
                at: record.at,
            });
        }
        end_phase(PhaseKind::Animate, frame_index, clock, &mut summary, tracer);

        // Flush
        begin_phase(PhaseKind::Flush, frame_index, clock, &mut summary, tracer);
        self.flush();
        end_phase(PhaseKind::Flush, frame_index, clock, &mut summary, tracer);

        // Layout
        begin_phase(PhaseKind::Layout, frame_index, clock, &mut summary, tracer);
        let mut layout = self.tree.evaluate();
        // The body's minimum height depends on where the body lands; one
        // more pass settles it because the body's top does not depend on
        // its own height.
        if let Some(top) = self.tree.computed_position(self.body)
            && self.state.set_body_top(top.y)
        {
            self.flush();
            let mut extra = self.tree.evaluate();
            layout.append(&mut extra);
        }
        for pass in &layout.passes {
            tracer.layout_pass(&LayoutPassEvent {
                frame_index,
                root: pass.root,
                placed: pass.placed,
                width: pass.width,
                height: pass.height,
            });
        }
        end_phase(PhaseKind::Layout, frame_index, clock, &mut summary, tracer);

        // Scroll
        begin_phase(PhaseKind::Scroll, frame_index, clock, &mut summary, tracer);
        let viewport = self.state.viewport();
        let content = self.tree.computed_size(self.page).height;
        self.scroll.set_extents(self.handle, viewport.height, content);
        let scroll = self.scroll.tick(tick);
        for update in &scroll.updates {
            tracer.scroll(&ScrollEvent {
                frame_index,
                region: update.region,
                offset: update.offset,
                velocity: update.velocity,
                source: update.source,
            });
        }
        end_phase(PhaseKind::Scroll, frame_index, clock, &mut summary, tracer);

        self.collect_diagnostics();
        for d in self.diagnostics.drain(..) {
            tracer.diagnostic(frame_index, &d);
        }

        summary.set_layout_passes(u32::try_from(layout.passes.len()).unwrap_or(u32::MAX));
        summary.set_active_transitions(
            u32::try_from(self.animator.active_count()).unwrap_or(u32::MAX),
        );
        let summary = summary.finish();
        tracer.frame_summary(&summary);

        FrameOutput {
            layout,
            scroll,
            transitions,
            swapped,
            pose: self.follow.pose(),
            summary,
        }
    }

    // -- Internals --

    fn swap_if_settled(&mut self, now: HostTime, access: &dyn PropertyAccess) -> bool {
        let Some(batch) = self.cards_batch.filter(|_| self.awaiting_swap) else {
            return false;
        };
        if !self.animator.all_settled(batch) {
            return false;
        }
        self.awaiting_swap = false;
        self.state.set_show_cards(false);
        self.scroll.scroll_to(self.handle, 0.0);
        let items = self.project_targets();
        let batch = self
            .animator
            .transition(&items, &self.config.project_in, now, access);
        self.replace_project_batch(batch);
        true
    }

    fn flush(&mut self) {
        for derived in self.state.flush() {
            match derived {
                Derived::BackButton => {
                    self.back_button = self.placement();
                    self.tree.set_skip(
                        self.back_button_node,
                        self.back_button != BackButton::Inline,
                    );
                }
                Derived::Visibility => {
                    let show = self.state.show_cards();
                    for &card in &self.cards {
                        self.tree.set_skip(card, !show);
                    }
                    self.tree.set_skip(self.project_content, show);
                }
                Derived::PageWidth => {
                    let width = self.state.viewport().width;
                    self.tree.set_available_width(self.page, Some(width));
                }
                Derived::ProjectItems => {
                    let width = self.project_item_width();
                    let Some(project) = self.selected() else {
                        continue;
                    };
                    let sizes: Vec<Size> = project
                        .items
                        .iter()
                        .map(|item| Size::new(width, item.height))
                        .collect();
                    for (&node, size) in self.project_items.iter().zip(sizes) {
                        self.tree.set_intrinsic_size(node, size);
                    }
                }
                Derived::Header => {
                    let size = Size::new(self.state.header_width(), self.config.title_height);
                    self.tree.set_intrinsic_size(self.header, size);
                }
                Derived::BodyMinHeight => {
                    let min_height = (self.state.viewport().height
                        - self.state.body_top()
                        - 2.0 * self.config.page_padding)
                        .max(0.0);
                    if let Some(style) = self.tree.style(self.body)
                        && style.min_height != min_height
                    {
                        self.tree
                            .set_style(self.body, style.with_min_height(min_height));
                    }
                }
            }
        }
    }

    fn placement(&self) -> BackButton {
        match self.state.selected() {
            None => BackButton::Hidden,
            Some(_) if self.state.viewport().width >= self.config.floating_breakpoint => {
                BackButton::Floating
            }
            Some(_) => BackButton::Inline,
        }
    }

    fn project_item_width(&self) -> f64 {
        let body = (self.state.viewport().width - 2.0 * self.config.page_padding).max(0.0);
        ContainerWidth::Fraction(self.config.project_fraction).resolve(body)
    }

    fn rebuild_project_items(&mut self, project: usize, now: HostTime) {
        for target in self.project_targets() {
            self.animator.cancel(target, now);
        }
        if let Some(batch) = self.project_batch.take() {
            self.animator.release(batch);
        }
        for node in self.project_items.drain(..) {
            self.tree.destroy_node(node);
        }

        let width = self.project_item_width();
        let Some(items) = self.projects.get(project).map(|p| p.items.clone()) else {
            return;
        };
        for item in items {
            match self.tree.create_node(Size::new(width, item.height)) {
                Ok(node) => {
                    self.tree.add_child(self.project_content, node);
                    self.project_items.push(node);
                }
                Err(_) => {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::LayoutBackend,
                        Subject::View,
                        "project-item",
                    ));
                    return;
                }
            }
        }
    }

    fn project_targets(&self) -> Vec<TargetId> {
        (0..self.project_items.len())
            .map(|i| target_id(self.cards.len() + i))
            .collect()
    }

    fn replace_cards_batch(&mut self, batch: BatchId) {
        if let Some(old) = self.cards_batch.replace(batch) {
            self.animator.release(old);
        }
    }

    fn replace_project_batch(&mut self, batch: BatchId) {
        if let Some(old) = self.project_batch.replace(batch) {
            self.animator.release(old);
        }
    }

    fn collect_diagnostics(&mut self) {
        self.diagnostics.extend(self.tree.take_diagnostics());
        self.diagnostics.extend(self.scroll.take_diagnostics());
        self.diagnostics.extend(self.animator.take_diagnostics());
    }
}

fn target_id(index: usize) -> TargetId {
    TargetId(u32::try_from(index).unwrap_or(u32::MAX))
}

fn begin_phase(
    phase: PhaseKind,
    frame_index: u64,
    clock: &dyn Clock,
    summary: &mut FrameSummaryBuilder,
    tracer: &mut Tracer<'_>,
) {
    let timestamp = clock.now();
    summary.phase_begin(phase, timestamp);
    tracer.phase_begin(&PhaseBeginEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn end_phase(
    phase: PhaseKind,
    frame_index: u64,
    clock: &dyn Clock,
    summary: &mut FrameSummaryBuilder,
    tracer: &mut Tracer<'_>,
) {
    let timestamp = clock.now();
    summary.phase_end(phase, timestamp);
    tracer.phase_end(&PhaseEndEvent {
        frame_index,
        phase,
        timestamp,
    });
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use kurbo::Point;

    use super::*;
    use crate::clock::ManualClock;
    use crate::time::Duration;
    use crate::timing::FrameTicker;
    use crate::trace::ScrollSource;
    use crate::transition::Property;
    use crate::view::ProjectItem;

    struct Values {
        values: BTreeMap<(u32, bool), f64>,
    }

    impl Values {
        /// Visible cards followed by hidden project items, as a renderer
        /// would create them.
        fn with_targets(cards: u32, items: u32) -> Self {
            let mut values = BTreeMap::new();
            for t in 0..cards {
                values.insert((t, true), 1.0);
                values.insert((t, false), 0.0);
            }
            for t in cards..cards + items {
                values.insert((t, true), 0.0);
                values.insert((t, false), -20.0);
            }
            Self { values }
        }

        fn opacity(&self, target: TargetId) -> f64 {
            self.values[&(target.0, true)]
        }

        fn depth(&self, target: TargetId) -> f64 {
            self.values[&(target.0, false)]
        }
    }

    impl PropertyAccess for Values {
        fn get(&self, target: TargetId, property: Property) -> Option<f64> {
            self.values
                .get(&(target.0, property == Property::Opacity))
                .copied()
        }

        fn set(&mut self, target: TargetId, property: Property, value: f64) -> bool {
            match self.values.get_mut(&(target.0, property == Property::Opacity)) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            }
        }
    }

    fn projects(n: usize) -> Vec<Project> {
        (0..n)
            .map(|i| {
                Project::new(format!("p{i}"), format!("Project {i}"))
                    .with_item(ProjectItem::new(300.0))
                    .with_item(ProjectItem::new(120.0))
            })
            .collect()
    }

    struct Rig {
        showcase: Showcase,
        values: Values,
        clock: ManualClock,
        ticker: FrameTicker,
    }

    impl Rig {
        fn new(cards: usize, viewport: Size) -> Self {
            Self::with_config(ShowcaseConfig::default(), cards, viewport)
        }

        fn with_config(config: ShowcaseConfig, cards: usize, viewport: Size) -> Self {
            let showcase = Showcase::new(config, projects(cards), viewport).unwrap();
            Self {
                showcase,
                values: Values::with_targets(u32::try_from(cards).unwrap(), 2),
                clock: ManualClock::new(HostTime::ZERO),
                ticker: FrameTicker::new(),
            }
        }

        fn frame(&mut self) -> FrameOutput {
            self.clock.advance(Duration::from_micros(16_667));
            let tick = self.ticker.tick(self.clock.now());
            let mut tracer = Tracer::none();
            self.showcase
                .frame(&tick, &mut self.values, &self.clock, &mut tracer)
        }

        fn select(&mut self, slug: Option<&str>) {
            let now = self.clock.now();
            self.showcase.select(slug, now, &self.values);
        }
    }

    #[test]
    fn cards_wrap_two_per_line_at_1024() {
        let mut rig = Rig::new(16, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        let tree = rig.showcase.tree();
        let cards = rig.showcase.cards();
        assert_eq!(tree.computed_position(cards[0]), Some(Point::new(142.0, 0.0)));
        assert_eq!(tree.computed_position(cards[1]), Some(Point::new(502.0, 0.0)));
        assert_eq!(tree.computed_position(cards[2]), Some(Point::new(142.0, 360.0)));
        assert_eq!(
            tree.computed_position(cards[15]),
            Some(Point::new(502.0, 7.0 * 360.0))
        );
        assert_eq!(tree.computed_position(rig.showcase.project_content()), None);
    }

    #[test]
    fn body_fills_the_viewport_when_short() {
        let mut rig = Rig::new(1, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        let tree = rig.showcase.tree();
        // title row (60) + gap (60) puts the body at 120 in the padding box.
        assert_eq!(
            tree.computed_position(rig.showcase.body()),
            Some(Point::new(0.0, 120.0))
        );
        assert_eq!(tree.computed_size(rig.showcase.body()).height, 768.0 - 120.0 - 80.0);
        assert_eq!(tree.computed_size(rig.showcase.page()).height, 768.0);
    }

    #[test]
    fn selecting_swaps_after_cards_settle() {
        let mut rig = Rig::new(4, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        rig.select(Some("p1"));
        assert_eq!(rig.showcase.title(), "Project: Project 1");

        let mut swapped_at = None;
        for i in 0..120 {
            let out = rig.frame();
            if out.swapped {
                swapped_at = Some(i);
                break;
            }
            assert!(rig.showcase.state().show_cards(), "cards stay until settled");
        }
        assert!(swapped_at.is_some(), "swap must happen within two seconds");
        for t in 0..4 {
            assert_eq!(rig.values.opacity(TargetId(t)), 0.0, "card {t} faded out");
        }

        let _ = rig.frame();
        let tree = rig.showcase.tree();
        assert!(rig.showcase.cards().iter().all(|&c| tree.computed_position(c).is_none()));
        assert!(tree.computed_position(rig.showcase.project_content()).is_some());
        assert_eq!(rig.showcase.project_items().len(), 2);
        let item = rig.showcase.project_items()[0];
        // 0.8 of the 944-wide body.
        let content = tree.computed_size(rig.showcase.project_content()).width;
        assert!((content - 755.2).abs() < 1e-3, "content width {content}");
        assert!((tree.intrinsic_size(item).width - 755.2).abs() < 1e-9);

        // Items start hidden and fade in 150 ms apart.
        let second = rig.showcase.project_item_target(1);
        assert_eq!(rig.values.opacity(second), 0.0, "second item waits for its delay");
        for _ in 0..60 {
            let _ = rig.frame();
        }
        for j in 0..2 {
            let item = rig.showcase.project_item_target(j);
            assert_eq!(rig.values.opacity(item), 1.0, "item {j} faded in");
            assert_eq!(rig.values.depth(item), 0.0, "item {j} came forward");
        }
        assert_eq!(rig.showcase.active_transitions(), 0);
    }

    #[test]
    fn deselecting_shows_cards_immediately() {
        let mut rig = Rig::new(2, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        rig.select(Some("p0"));
        for _ in 0..120 {
            if rig.frame().swapped {
                break;
            }
        }
        assert!(!rig.showcase.state().show_cards());

        rig.select(None);
        assert!(rig.showcase.state().show_cards());
        assert_eq!(rig.showcase.title(), "Showcase");
        let _ = rig.frame();
        let tree = rig.showcase.tree();
        assert!(tree.computed_position(rig.showcase.cards()[0]).is_some());
        assert_eq!(tree.computed_position(rig.showcase.project_content()), None);
    }

    #[test]
    fn back_button_placement_follows_width() {
        let mut rig = Rig::new(2, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        assert_eq!(rig.showcase.back_button(), BackButton::Hidden);

        rig.select(Some("p0"));
        let _ = rig.frame();
        assert_eq!(rig.showcase.back_button(), BackButton::Floating);
        assert!(rig.showcase.tree().is_skipped(rig.showcase.back_button_node()));

        rig.showcase.set_viewport(Size::new(800.0, 768.0));
        let _ = rig.frame();
        assert_eq!(rig.showcase.back_button(), BackButton::Inline);
        assert!(!rig.showcase.tree().is_skipped(rig.showcase.back_button_node()));
    }

    #[test]
    fn unknown_slug_keeps_selection() {
        let mut rig = Rig::new(2, Size::new(1024.0, 768.0));
        rig.select(Some("p1"));
        rig.select(Some("missing"));
        assert_eq!(rig.showcase.selected().map(|p| p.slug.as_str()), Some("p1"));
        let diagnostics = rig.showcase.take_diagnostics();
        assert!(
            diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::UnknownProject)
        );
    }

    #[test]
    fn scroll_extent_tracks_page_height() {
        let mut rig = Rig::new(16, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        // 8 lines of cards: 8 * 300 + 7 * 60, plus title, gap, and padding.
        let page = 2820.0 + 120.0 + 80.0;
        assert_eq!(rig.showcase.tree().computed_size(rig.showcase.page()).height, page);
        rig.showcase.set_context_available(true);
        rig.showcase.wheel(1.0e6);
        for _ in 0..200 {
            let _ = rig.frame();
        }
        assert_eq!(rig.showcase.scroll_offset(), page - 768.0);
        assert_eq!(rig.showcase.content_translation(), -(page - 768.0));
    }

    #[test]
    fn touch_drag_after_wheel_wins_the_frame() {
        let mut rig = Rig::with_config(ShowcaseConfig::touch(), 16, Size::new(1024.0, 768.0));
        let _ = rig.frame();
        rig.showcase.set_context_available(true);

        // Wheel and drag land in the same frame; the drag came last.
        let t = rig.clock.now();
        rig.showcase.wheel(300.0);
        rig.showcase.pointer_down(400.0, t);
        rig.showcase
            .pointer_move(300.0, t + Duration::from_millis(16));
        let out = rig.frame();
        assert_eq!(out.scroll.updates.len(), 1, "got {:?}", out.scroll.updates);
        assert_eq!(out.scroll.updates[0].source, ScrollSource::Drag);
        assert_eq!(rig.showcase.scroll_offset(), 100.0);

        // The wheel momentum was dropped when the drag won.
        let _ = rig.frame();
        assert_eq!(rig.showcase.scroll_offset(), 100.0);

        rig.showcase.pointer_up(t + Duration::from_millis(400));
        rig.showcase.wheel(200.0);
        let out = rig.frame();
        assert_eq!(out.scroll.updates[0].source, ScrollSource::Wheel);
        assert!(rig.showcase.scroll_offset() > 100.0);
    }

    #[test]
    fn page_leans_toward_the_hover_pointer() {
        let mut rig = Rig::new(2, Size::new(1000.0, 800.0));
        let _ = rig.frame();
        let rest = rig.showcase.page_pose();
        assert!(rest.rotation_x.abs() < 1e-12 && rest.rotation_y.abs() < 1e-12);

        rig.showcase.pointer_hover(Point::new(1000.0, 0.0));
        let light_before = rig.showcase.page_pose().light;
        let out = rig.frame();
        // One reference frame closes 5% of the way to a 2.5 degree lean.
        assert!((out.pose.rotation_y - 0.125).abs() < 1e-9, "got {:?}", out.pose);
        assert!((out.pose.rotation_x - 0.125).abs() < 1e-9, "got {:?}", out.pose);
        let expected_x = light_before.x + (1000.0 - light_before.x) * 0.05;
        assert!((out.pose.light.x - expected_x).abs() < 1e-9, "got {:?}", out.pose);
        assert_eq!(out.pose, rig.showcase.page_pose());

        for _ in 0..600 {
            let _ = rig.frame();
        }
        let pose = rig.showcase.page_pose();
        assert_eq!((pose.rotation_x, pose.rotation_y), (2.5, 2.5));
        assert_eq!(pose.light, Point::new(1000.0, 0.0));
    }
}
