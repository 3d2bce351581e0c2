// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll regions, input routing, and per-frame reconciliation.

use alloc::vec::Vec;
use core::fmt;

use super::fling::{Fling, FlingConfig};
use super::region::{DEFAULT_MIN_THUMB, ScrollExtents, Thumb, content_translation};
use crate::time::HostTime;
use crate::timing::FrameTick;
use crate::trace::{Diagnostic, DiagnosticKind, ScrollSource, Subject};

/// Per-region configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Physics for wheel and programmatic scrolling.
    pub wheel: FlingConfig,
    /// Physics for pointer drags on touch-capable regions.
    pub touch: FlingConfig,
    /// Whether pointer drags get their own simulation, reconciled with the
    /// wheel simulation once per frame.
    pub touch_capable: bool,
    /// Minimum scrollbar thumb length.
    pub min_thumb: f64,
}

impl ScrollConfig {
    /// Wheel-only scrolling; pointer drags share the wheel simulation.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            wheel: FlingConfig::wheel(),
            touch: FlingConfig::touch(),
            touch_capable: false,
            min_thumb: DEFAULT_MIN_THUMB,
        }
    }

    /// Wheel plus a separate drag simulation.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            touch_capable: true,
            ..Self::desktop()
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// A handle to a scroll region owned by a [`ScrollController`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId {
    idx: u32,
    generation: u32,
}

impl RegionId {
    /// Returns the raw slot index, as reported in [`ScrollUpdate::region`].
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({}@gen{})", self.idx, self.generation)
    }
}

/// One attachment of a region to a viewport.
///
/// Becomes stale when the region is detached or destroyed; operations on a
/// stale handle do nothing and record a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollHandle {
    region: RegionId,
    epoch: u32,
}

impl ScrollHandle {
    /// The region this handle scrolls.
    #[must_use]
    pub const fn region(self) -> RegionId {
        self.region
    }
}

/// An authoritative offset change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollUpdate {
    /// Raw slot index of the region.
    pub region: u32,
    /// New offset.
    pub offset: f64,
    /// Velocity of the winning simulation.
    pub velocity: f64,
    /// What produced the change.
    pub source: ScrollSource,
}

/// Changes produced by [`ScrollController::tick`].
#[derive(Clone, Debug, Default)]
pub struct ScrollChanges {
    /// Offset changes, in region order, programmatic and clamp changes first.
    pub updates: Vec<ScrollUpdate>,
}

impl ScrollChanges {
    /// Clears the change list.
    pub fn clear(&mut self) {
        self.updates.clear();
    }
}

#[derive(Debug)]
struct Sims {
    primary: Fling,
    drag: Option<Fling>,
    primary_seq: u64,
    drag_seq: u64,
    primary_source: ScrollSource,
}

#[derive(Debug)]
struct Region {
    generation: u32,
    live: bool,
    config: ScrollConfig,
    extents: ScrollExtents,
    offset: f64,
    epoch: u32,
    attached: bool,
    sims: Option<Sims>,
}

/// Owns every scroll region and its momentum simulations.
///
/// Offsets change in three ways: programmatic writes and extent changes
/// apply immediately; wheel and drag input feed the simulations, whose
/// results are merged into the authoritative offset once per
/// [`tick`](Self::tick). When a region has both a wheel and a drag
/// simulation, the one that received input last wins the frame and the
/// other adopts its offset and drops its momentum.
#[derive(Debug, Default)]
pub struct ScrollController {
    regions: Vec<Region>,
    free_list: Vec<u32>,
    context_available: bool,
    input_seq: u64,
    pending: Vec<ScrollUpdate>,
    diagnostics: Vec<Diagnostic>,
}

impl ScrollController {
    /// Creates a controller. The rendering context starts unavailable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Region lifecycle --

    /// Creates a detached region with the default configuration.
    pub fn create_region(&mut self) -> RegionId {
        self.create_region_with(ScrollConfig::default())
    }

    /// Creates a detached region.
    pub fn create_region_with(&mut self, config: ScrollConfig) -> RegionId {
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = u32::try_from(self.regions.len()).unwrap_or(u32::MAX);
            self.regions.push(Region {
                generation: 0,
                live: false,
                config,
                extents: ScrollExtents::default(),
                offset: 0.0,
                epoch: 0,
                attached: false,
                sims: None,
            });
            idx
        };
        let subject = Subject::Region(idx);
        let mut config = config;
        config.wheel = config.wheel.sanitized(subject, &mut self.diagnostics);
        config.touch = config.touch.sanitized(subject, &mut self.diagnostics);
        if !(config.min_thumb.is_finite() && config.min_thumb >= 0.0) {
            self.diagnostics.push(
                Diagnostic::new(DiagnosticKind::InvalidConfig, subject, "min-thumb")
                    .with_value(config.min_thumb),
            );
            config.min_thumb = DEFAULT_MIN_THUMB;
        }

        let region = &mut self.regions[idx as usize];
        region.live = true;
        region.config = config;
        region.extents = ScrollExtents::default();
        region.offset = 0.0;
        region.attached = false;
        region.sims = None;
        RegionId {
            idx,
            generation: region.generation,
        }
    }

    /// Destroys a region, stopping its momentum and releasing its
    /// simulations. Outstanding handles become stale.
    ///
    /// # Panics
    ///
    /// Panics if the region id is stale.
    pub fn destroy_region(&mut self, id: RegionId) {
        self.validate(id);
        let region = &mut self.regions[id.idx as usize];
        region.live = false;
        region.attached = false;
        region.sims = None;
        region.generation = region.generation.wrapping_add(1);
        region.epoch = region.epoch.wrapping_add(1);
        self.pending.retain(|u| u.region != id.idx);
        self.free_list.push(id.idx);
    }

    /// Attaches a region to a viewport with the given extents.
    ///
    /// A region that was attached before resumes from its last offset,
    /// clamped to the new bounds. Any previous handle becomes stale.
    ///
    /// # Panics
    ///
    /// Panics if the region id is stale.
    pub fn attach(&mut self, id: RegionId, viewport: f64, content: f64) -> ScrollHandle {
        self.validate(id);
        let context = self.context_available;
        let region = &mut self.regions[id.idx as usize];
        region.epoch = region.epoch.wrapping_add(1);
        region.attached = true;
        region.extents = ScrollExtents::new(viewport, content);
        let resumed = region.extents.clamp(region.offset);
        if resumed != region.offset {
            region.offset = resumed;
            self.pending.push(ScrollUpdate {
                region: id.idx,
                offset: resumed,
                velocity: 0.0,
                source: ScrollSource::Clamp,
            });
        }
        if context {
            region.sims = Some(start_sims(region));
        }
        ScrollHandle {
            region: id,
            epoch: region.epoch,
        }
    }

    /// Detaches a region, stopping its momentum. The offset is remembered
    /// for the next [`attach`](Self::attach).
    pub fn detach(&mut self, handle: ScrollHandle) {
        let Some(region) = self.region_mut(handle) else {
            return;
        };
        region.attached = false;
        region.sims = None;
        region.epoch = region.epoch.wrapping_add(1);
    }

    /// Returns whether the handle is current.
    #[must_use]
    pub fn is_attached(&self, handle: ScrollHandle) -> bool {
        self.region(handle).is_some()
    }

    /// Starts (`true`) or stops (`false`) the simulations of every attached
    /// region, following the rendering context's lifetime.
    pub fn set_context_available(&mut self, available: bool) {
        if self.context_available == available {
            return;
        }
        self.context_available = available;
        for region in &mut self.regions {
            if !(region.live && region.attached) {
                continue;
            }
            region.sims = available.then(|| start_sims(region));
        }
    }

    /// Returns whether the rendering context is available.
    #[must_use]
    pub fn is_context_available(&self) -> bool {
        self.context_available
    }

    // -- Extents --

    /// Updates both extents and re-clamps the offset.
    pub fn set_extents(&mut self, handle: ScrollHandle, viewport: f64, content: f64) {
        let idx = handle.region.idx;
        let Some(region) = self.region_mut(handle) else {
            return;
        };
        let extents = ScrollExtents::new(viewport, content);
        if region.extents == extents {
            return;
        }
        region.extents = extents;
        if let Some(sims) = &mut region.sims {
            sims.primary.set_extents(extents);
            if let Some(drag) = &mut sims.drag {
                drag.set_extents(extents);
            }
        }
        let clamped = extents.clamp(region.offset);
        if clamped == region.offset {
            return;
        }
        region.offset = clamped;
        self.pending.push(ScrollUpdate {
            region: idx,
            offset: clamped,
            velocity: 0.0,
            source: ScrollSource::Clamp,
        });
    }

    /// Updates the viewport extent.
    pub fn set_viewport(&mut self, handle: ScrollHandle, viewport: f64) {
        if let Some(e) = self.extents(handle) {
            self.set_extents(handle, viewport, e.content);
        }
    }

    /// Updates the content extent.
    pub fn set_content(&mut self, handle: ScrollHandle, content: f64) {
        if let Some(e) = self.extents(handle) {
            self.set_extents(handle, e.viewport, content);
        }
    }

    /// Returns the current extents, or `None` for a stale handle.
    #[must_use]
    pub fn extents(&self, handle: ScrollHandle) -> Option<ScrollExtents> {
        self.region(handle).map(|r| r.extents)
    }

    // -- Offset --

    /// Returns the authoritative offset (`0` for a stale handle).
    #[must_use]
    pub fn offset(&self, handle: ScrollHandle) -> f64 {
        self.region(handle).map_or(0.0, |r| r.offset)
    }

    /// Returns the velocity of the simulation that last won the region.
    #[must_use]
    pub fn velocity(&self, handle: ScrollHandle) -> f64 {
        self.region(handle)
            .and_then(|r| r.sims.as_ref())
            .map_or(0.0, |s| {
                match &s.drag {
                    Some(drag) if s.drag_seq > s.primary_seq => drag.velocity(),
                    _ => s.primary.velocity(),
                }
            })
    }

    /// Writes the offset (clamped), stopping all momentum.
    pub fn set_offset(&mut self, handle: ScrollHandle, offset: f64) {
        self.input_seq += 1;
        let seq = self.input_seq;
        let idx = handle.region.idx;
        let Some(region) = self.region_mut(handle) else {
            return;
        };
        let clamped = region.extents.clamp(offset);
        if let Some(sims) = &mut region.sims {
            sims.primary.set_offset(clamped);
            sims.primary_seq = seq;
            sims.primary_source = ScrollSource::Programmatic;
            if let Some(drag) = &mut sims.drag {
                drag.set_offset(clamped);
            }
        }
        if clamped == region.offset {
            return;
        }
        region.offset = clamped;
        self.pending.push(ScrollUpdate {
            region: idx,
            offset: clamped,
            velocity: 0.0,
            source: ScrollSource::Programmatic,
        });
    }

    /// Scrolls to `offset`, e.g. `scroll_to(handle, 0.0)` to reset on a view
    /// switch.
    pub fn scroll_to(&mut self, handle: ScrollHandle, offset: f64) {
        self.set_offset(handle, offset);
    }

    // -- Input --

    /// Feeds a wheel delta to the region's wheel simulation.
    pub fn wheel(&mut self, handle: ScrollHandle, delta: f64) {
        self.input_seq += 1;
        let seq = self.input_seq;
        let Some(sims) = self.sims_mut(handle) else {
            return;
        };
        sims.primary.impulse(delta);
        sims.primary_seq = seq;
        sims.primary_source = ScrollSource::Wheel;
    }

    /// Begins a pointer drag at `position` along the scroll axis.
    pub fn pointer_down(&mut self, handle: ScrollHandle, position: f64, now: HostTime) {
        self.input_seq += 1;
        let seq = self.input_seq;
        let Some(sims) = self.sims_mut(handle) else {
            return;
        };
        let offset = sims.primary.offset();
        let fling = drag_target(sims, seq);
        fling.set_offset(offset);
        fling.drag_start(position, now);
    }

    /// Moves an active pointer drag.
    pub fn pointer_move(&mut self, handle: ScrollHandle, position: f64, now: HostTime) {
        self.input_seq += 1;
        let seq = self.input_seq;
        let Some(sims) = self.sims_mut(handle) else {
            return;
        };
        drag_target(sims, seq).drag_move(position, now);
    }

    /// Ends a pointer drag; the release velocity carries on as momentum.
    pub fn pointer_up(&mut self, handle: ScrollHandle, now: HostTime) {
        self.input_seq += 1;
        let seq = self.input_seq;
        let Some(sims) = self.sims_mut(handle) else {
            return;
        };
        drag_target(sims, seq).drag_end(now);
    }

    // -- Geometry --

    /// Scrollbar thumb geometry for the current offset.
    #[must_use]
    pub fn thumb(&self, handle: ScrollHandle) -> Thumb {
        self.region(handle)
            .map_or(Thumb::HIDDEN, |r| r.extents.thumb(r.offset, r.config.min_thumb))
    }

    /// Translation to apply to the scrolled content.
    #[must_use]
    pub fn content_translation(&self, handle: ScrollHandle) -> f64 {
        content_translation(self.offset(handle))
    }

    // -- Frame --

    /// Advances every simulation by the tick interval and reconciles each
    /// region's offset.
    pub fn tick(&mut self, tick: &FrameTick) -> ScrollChanges {
        let mut changes = ScrollChanges::default();
        self.tick_into(tick, &mut changes);
        changes
    }

    /// Like [`tick`](Self::tick), but reuses a caller-provided buffer.
    pub fn tick_into(&mut self, tick: &FrameTick, changes: &mut ScrollChanges) {
        changes.clear();
        changes.updates.append(&mut self.pending);

        for (idx, region) in (0_u32..).zip(self.regions.iter_mut()) {
            if !(region.live && region.attached) {
                continue;
            }
            let Some(sims) = &mut region.sims else {
                continue;
            };
            sims.primary.step(tick.interval);
            let (offset, velocity, source) = match &mut sims.drag {
                Some(drag) => {
                    drag.step(tick.interval);
                    if sims.drag_seq > sims.primary_seq {
                        sims.primary.set_offset(drag.offset());
                        (drag.offset(), drag.velocity(), ScrollSource::Drag)
                    } else {
                        drag.set_offset(sims.primary.offset());
                        (
                            sims.primary.offset(),
                            sims.primary.velocity(),
                            sims.primary_source,
                        )
                    }
                }
                None => (
                    sims.primary.offset(),
                    sims.primary.velocity(),
                    sims.primary_source,
                ),
            };
            if offset != region.offset {
                region.offset = offset;
                changes.updates.push(ScrollUpdate {
                    region: idx,
                    offset,
                    velocity,
                    source,
                });
            }
        }
    }

    /// Returns and clears the buffered diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }

    // -- Internal helpers --

    fn validate(&self, id: RegionId) {
        assert!(
            self.regions
                .get(id.idx as usize)
                .is_some_and(|r| r.live && r.generation == id.generation),
            "stale RegionId: {id:?}"
        );
    }

    fn region(&self, handle: ScrollHandle) -> Option<&Region> {
        self.regions
            .get(handle.region.idx as usize)
            .filter(|r| is_current(r, handle))
    }

    fn region_mut(&mut self, handle: ScrollHandle) -> Option<&mut Region> {
        let current = self
            .regions
            .get(handle.region.idx as usize)
            .is_some_and(|r| is_current(r, handle));
        if !current {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::StaleHandle,
                Subject::Region(handle.region.idx),
                "scroll-handle",
            ));
            return None;
        }
        self.regions.get_mut(handle.region.idx as usize)
    }

    /// The region's simulations, or `None` with a diagnostic when the handle
    /// is stale or the rendering context is not up yet.
    fn sims_mut(&mut self, handle: ScrollHandle) -> Option<&mut Sims> {
        let idx = handle.region.idx;
        let has_sims = self.region_mut(handle).map(|r| r.sims.is_some())?;
        if !has_sims {
            let field = if self.context_available {
                "simulation"
            } else {
                "context"
            };
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::NotReady,
                Subject::Region(idx),
                field,
            ));
            return None;
        }
        self.regions
            .get_mut(idx as usize)
            .and_then(|r| r.sims.as_mut())
    }
}

fn is_current(region: &Region, handle: ScrollHandle) -> bool {
    region.live
        && region.attached
        && region.generation == handle.region.generation
        && region.epoch == handle.epoch
}

fn start_sims(region: &Region) -> Sims {
    let primary = Fling::new(region.config.wheel, region.extents, region.offset);
    let drag = region
        .config
        .touch_capable
        .then(|| Fling::new(region.config.touch, region.extents, region.offset));
    Sims {
        primary,
        drag,
        primary_seq: 0,
        drag_seq: 0,
        primary_source: ScrollSource::Wheel,
    }
}

/// The simulation pointer input goes to, stamped with `seq`.
fn drag_target(sims: &mut Sims, seq: u64) -> &mut Fling {
    match &mut sims.drag {
        Some(drag) => {
            sims.drag_seq = seq;
            drag
        }
        None => {
            sims.primary_seq = seq;
            sims.primary_source = ScrollSource::Drag;
            &mut sims.primary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Duration;
    use crate::timing::{DEFAULT_FRAME_INTERVAL, FrameTicker};

    struct Frames {
        ticker: FrameTicker,
        now: HostTime,
    }

    impl Frames {
        fn new() -> Self {
            Self {
                ticker: FrameTicker::new(),
                now: HostTime::ZERO,
            }
        }

        fn next(&mut self) -> FrameTick {
            self.now += DEFAULT_FRAME_INTERVAL;
            self.ticker.tick(self.now)
        }
    }

    fn ready(config: ScrollConfig, viewport: f64, content: f64) -> (ScrollController, ScrollHandle) {
        let mut scroll = ScrollController::new();
        scroll.set_context_available(true);
        let region = scroll.create_region_with(config);
        let handle = scroll.attach(region, viewport, content);
        (scroll, handle)
    }

    #[test]
    fn offset_stays_clamped() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 1_500.0);
        scroll.set_offset(h, 5_000.0);
        assert_eq!(scroll.offset(h), 1_000.0);
        scroll.set_offset(h, -20.0);
        assert_eq!(scroll.offset(h), 0.0);

        let mut frames = Frames::new();
        scroll.wheel(h, 50_000.0);
        for _ in 0..200 {
            let _ = scroll.tick(&frames.next());
            let o = scroll.offset(h);
            assert!((0.0..=1_000.0).contains(&o), "offset {o} out of range");
        }
        assert_eq!(scroll.offset(h), 1_000.0);
        assert_eq!(scroll.velocity(h), 0.0, "bound hit zeroes velocity");
    }

    #[test]
    fn shrinking_content_clamps_offset() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 3_000.0);
        scroll.set_offset(h, 2_500.0);
        let _ = scroll.tick(&Frames::new().next());

        scroll.set_content(h, 1_200.0);
        assert_eq!(scroll.offset(h), 700.0);
        let changes = scroll.tick(&Frames::new().next());
        assert_eq!(changes.updates.len(), 1);
        assert_eq!(changes.updates[0].source, ScrollSource::Clamp);

        scroll.set_content(h, 100.0);
        assert_eq!(scroll.offset(h), 0.0);
        assert_eq!(scroll.thumb(h), Thumb::HIDDEN);
    }

    #[test]
    fn scroll_to_zero_resets_and_stops_momentum() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 3_000.0);
        let mut frames = Frames::new();
        scroll.wheel(h, 400.0);
        let _ = scroll.tick(&frames.next());
        assert!(scroll.offset(h) > 0.0);

        scroll.scroll_to(h, 0.0);
        assert_eq!(scroll.offset(h), 0.0);
        let changes = scroll.tick(&frames.next());
        assert_eq!(changes.updates.len(), 1, "only the programmatic reset");
        assert_eq!(changes.updates[0].source, ScrollSource::Programmatic);
        assert_eq!(scroll.offset(h), 0.0);
    }

    #[test]
    fn input_before_context_is_not_ready() {
        let mut scroll = ScrollController::new();
        let region = scroll.create_region();
        let h = scroll.attach(region, 500.0, 3_000.0);
        scroll.wheel(h, 100.0);
        let diags = scroll.take_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::NotReady);

        scroll.set_context_available(true);
        scroll.wheel(h, 100.0);
        let _ = scroll.tick(&Frames::new().next());
        assert!(scroll.offset(h) > 0.0);
    }

    #[test]
    fn reattach_resumes_clamped_offset() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 3_000.0);
        scroll.set_offset(h, 2_000.0);
        scroll.detach(h);
        assert!(!scroll.is_attached(h));
        assert_eq!(scroll.offset(h), 0.0, "stale handles read zero");

        let h2 = scroll.attach(h.region(), 500.0, 1_000.0);
        assert_eq!(scroll.offset(h2), 500.0);

        scroll.set_offset(h, 10.0);
        assert_eq!(scroll.offset(h2), 500.0, "stale handle writes are ignored");
        let diags = scroll.take_diagnostics();
        assert!(diags.iter().any(|d| d.kind == DiagnosticKind::StaleHandle));
    }

    #[test]
    fn context_loss_stops_momentum() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 3_000.0);
        let mut frames = Frames::new();
        scroll.wheel(h, 1_000.0);
        let _ = scroll.tick(&frames.next());
        let stopped_at = scroll.offset(h);

        scroll.set_context_available(false);
        let changes = scroll.tick(&frames.next());
        assert!(changes.updates.is_empty());
        assert_eq!(scroll.offset(h), stopped_at);

        scroll.set_context_available(true);
        let _ = scroll.tick(&frames.next());
        assert_eq!(scroll.offset(h), stopped_at, "restart does not revive momentum");
    }

    #[test]
    fn latest_source_wins_the_frame() {
        let (mut scroll, h) = ready(ScrollConfig::touch(), 500.0, 5_000.0);
        let mut frames = Frames::new();
        let t = HostTime::from_millis(0);

        scroll.wheel(h, 300.0);
        scroll.pointer_down(h, 400.0, t);
        scroll.pointer_move(h, 300.0, t + Duration::from_millis(16));
        let changes = scroll.tick(&frames.next());
        assert_eq!(changes.updates.len(), 1);
        assert_eq!(changes.updates[0].source, ScrollSource::Drag);
        assert_eq!(scroll.offset(h), 100.0, "drag arrived last");

        // The wheel simulation adopted the drag offset and lost its momentum.
        let _ = scroll.tick(&frames.next());
        assert_eq!(scroll.offset(h), 100.0);

        scroll.pointer_up(h, t + Duration::from_millis(400));
        scroll.wheel(h, 200.0);
        let changes = scroll.tick(&frames.next());
        assert_eq!(changes.updates[0].source, ScrollSource::Wheel);
        assert!(scroll.offset(h) > 100.0);
    }

    #[test]
    fn desktop_drag_shares_the_wheel_simulation() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 5_000.0);
        let t = HostTime::from_millis(0);
        scroll.pointer_down(h, 400.0, t);
        scroll.pointer_move(h, 350.0, t + Duration::from_millis(16));
        let changes = scroll.tick(&Frames::new().next());
        assert_eq!(changes.updates[0].source, ScrollSource::Drag);
        assert_eq!(scroll.offset(h), 50.0);
    }

    #[test]
    fn zero_extents_hide_the_thumb() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 0.0, 0.0);
        assert_eq!(scroll.thumb(h), Thumb::HIDDEN);
        assert!(!scroll.thumb(h).is_visible());

        scroll.set_extents(h, 500.0, 1_000.0);
        assert!(scroll.thumb(h).is_visible());
        scroll.set_extents(h, 0.0, 0.0);
        assert_eq!(scroll.offset(h), 0.0);
        assert_eq!(scroll.thumb(h), Thumb::HIDDEN);
    }

    #[test]
    fn thumb_follows_offset() {
        let (mut scroll, h) = ready(ScrollConfig::desktop(), 500.0, 1_000.0);
        assert_eq!(scroll.thumb(h).extent, 250.0);
        scroll.set_offset(h, 250.0);
        assert_eq!(scroll.thumb(h).offset, 125.0);
        assert_eq!(scroll.content_translation(h), -250.0);
    }

    #[test]
    #[should_panic(expected = "stale RegionId")]
    fn destroyed_region_panics_on_attach() {
        let mut scroll = ScrollController::new();
        let region = scroll.create_region();
        scroll.destroy_region(region);
        let _ = scroll.attach(region, 1.0, 1.0);
    }
}
