// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered opacity and depth transitions.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use super::easing::Easing;
use super::tween::Tween;
use crate::scheduler::{TimerId, TimerQueue};
use crate::time::{Duration, HostTime};
use crate::timing::FrameTick;
use crate::trace::{Diagnostic, DiagnosticKind, Subject, TransitionPhase};

/// Identifies an animated element. The animator never owns the element; it
/// reads and writes it through [`PropertyAccess`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(pub u32);

/// An animatable property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Opacity, nominally `0..=1`.
    Opacity,
    /// Position along the depth axis.
    Depth,
}

/// Read/write access to the elements being animated.
pub trait PropertyAccess {
    /// Returns the current value, or `None` if the target no longer exists.
    fn get(&self, target: TargetId, property: Property) -> Option<f64>;

    /// Writes a value. Returns `false` if the target no longer exists.
    fn set(&mut self, target: TargetId, property: Property, value: f64) -> bool;
}

/// How start times are spaced across the items of one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stagger {
    /// Item `i` starts `i × step` after the call.
    PerItem(Duration),
    /// Item `i` of `n` starts `i × total / n` after the call.
    Spread(Duration),
}

impl Stagger {
    /// No staggering.
    pub const NONE: Self = Self::PerItem(Duration::ZERO);

    /// Delay of item `index` out of `count`.
    #[must_use]
    pub fn delay(self, index: usize, count: usize) -> Duration {
        let index = index as u64;
        match self {
            Self::PerItem(step) => step * index,
            Self::Spread(total) => (total * index).split(count as u64),
        }
    }
}

/// Parameters of one batch transition.
#[derive(Clone, Copy, Debug)]
pub struct FadeConfig {
    /// Final opacity.
    pub target_opacity: f64,
    /// Final depth.
    pub target_depth: f64,
    /// Start-time spacing.
    pub stagger: Stagger,
    /// Length of each item's interpolation.
    pub duration: Duration,
    /// Opacity progress curve.
    pub opacity_easing: Easing,
    /// Depth progress curve.
    pub depth_easing: Easing,
    /// Time after an item finishes before it counts as settled.
    pub grace: Option<Duration>,
}

impl FadeConfig {
    /// Cards leaving: fade to transparent and sink back, spread over half a
    /// second, then a short grace period before the view swaps.
    #[must_use]
    pub const fn cards_out() -> Self {
        Self {
            target_opacity: 0.0,
            target_depth: -20.0,
            stagger: Stagger::Spread(Duration::from_millis(500)),
            duration: Duration::from_millis(500),
            opacity_easing: Easing::CubicIn,
            depth_easing: Easing::Linear,
            grace: Some(Duration::from_millis(150)),
        }
    }

    /// Cards returning.
    #[must_use]
    pub const fn cards_in() -> Self {
        Self {
            target_opacity: 1.0,
            target_depth: 0.0,
            grace: None,
            ..Self::cards_out()
        }
    }

    /// Project detail items appearing one after another.
    #[must_use]
    pub const fn project_in() -> Self {
        Self {
            target_opacity: 1.0,
            target_depth: 0.0,
            stagger: Stagger::PerItem(Duration::from_millis(150)),
            duration: Duration::from_millis(350),
            opacity_easing: Easing::CubicIn,
            depth_easing: Easing::Linear,
            grace: None,
        }
    }

    /// Project detail items leaving.
    #[must_use]
    pub const fn project_out() -> Self {
        Self {
            target_opacity: 0.0,
            target_depth: -20.0,
            ..Self::project_in()
        }
    }

    /// Returns a copy with non-finite targets replaced by `0`, pushing one
    /// diagnostic per fix.
    #[must_use]
    pub fn sanitized(mut self, diagnostics: &mut Vec<Diagnostic>) -> Self {
        for (field, value) in [
            ("target-opacity", &mut self.target_opacity),
            ("target-depth", &mut self.target_depth),
        ] {
            if !value.is_finite() {
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::InvalidConfig, Subject::View, field)
                        .with_value(*value),
                );
                *value = 0.0;
            }
        }
        self
    }
}

/// A handle to one [`TransitionAnimator::transition`] call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId {
    idx: u32,
    generation: u32,
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({}@gen{})", self.idx, self.generation)
    }
}

/// Completion state of a batch, in the order items were passed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchStatus {
    /// Whether each item reached its targets. An item taken over by a later
    /// transition counts as not done.
    pub done: Vec<bool>,
    /// Whether each item is done and past its grace period.
    pub settled: Vec<bool>,
    /// Every item is done.
    pub all_done: bool,
    /// Every item is settled.
    pub all_settled: bool,
}

/// One lifecycle step, reported by [`TransitionAnimator::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionRecord {
    /// The item.
    pub target: TargetId,
    /// What happened.
    pub phase: TransitionPhase,
    /// When it happened. For `Started` and `Settled` this is the exact timer
    /// deadline, which may precede the tick that observed it.
    pub at: HostTime,
}

/// Changes produced by [`TransitionAnimator::tick`].
#[derive(Clone, Debug, Default)]
pub struct TransitionChanges {
    /// Lifecycle steps since the previous tick, in order.
    pub records: Vec<TransitionRecord>,
    /// Items whose properties were written this tick.
    pub written: Vec<TargetId>,
}

impl TransitionChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.records.clear();
        self.written.clear();
    }

    /// Number of records with the given phase.
    #[must_use]
    pub fn count(&self, phase: TransitionPhase) -> usize {
        self.records.iter().filter(|r| r.phase == phase).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Start,
    Settle,
}

#[derive(Clone, Copy, Debug)]
struct TimerEvent {
    target: TargetId,
    epoch: u64,
    kind: TimerKind,
}

#[derive(Clone, Copy, Debug)]
enum ItemState {
    Waiting(TimerId),
    Running,
    Grace(TimerId),
    Settled,
}

#[derive(Clone, Copy, Debug)]
struct Item {
    epoch: u64,
    state: ItemState,
    opacity: Option<Tween>,
    depth: Option<Tween>,
    grace: Option<Duration>,
}

impl Item {
    fn is_done(&self) -> bool {
        matches!(self.state, ItemState::Grace(_) | ItemState::Settled)
    }

    fn is_settled(&self) -> bool {
        matches!(self.state, ItemState::Settled)
    }
}

#[derive(Debug)]
struct Batch {
    generation: u32,
    live: bool,
    members: Vec<(TargetId, u64)>,
}

/// Runs at most one transition per item, sampling every running item once
/// per frame tick.
///
/// Starting a transition on an item that already has one cancels the old
/// one first: its timers are cancelled and it reports not-done to the batch
/// it belonged to.
#[derive(Debug, Default)]
pub struct TransitionAnimator {
    items: BTreeMap<TargetId, Item>,
    timers: TimerQueue<TimerEvent>,
    batches: Vec<Batch>,
    free_batches: Vec<u32>,
    next_epoch: u64,
    pending: Vec<TransitionRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl TransitionAnimator {
    /// Creates an idle animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts transitioning `targets` toward the configured values.
    ///
    /// Start values are read now. Items already at both targets are done
    /// and settled immediately with nothing scheduled. Every other item gets
    /// a start timer at `now + stagger delay`.
    pub fn transition(
        &mut self,
        targets: &[TargetId],
        config: &FadeConfig,
        now: HostTime,
        access: &dyn PropertyAccess,
    ) -> BatchId {
        let config = config.sanitized(&mut self.diagnostics);
        let mut members = Vec::with_capacity(targets.len());

        for (i, &target) in targets.iter().enumerate() {
            self.cancel(target, now);
            self.next_epoch += 1;
            let epoch = self.next_epoch;
            members.push((target, epoch));

            let (Some(opacity), Some(depth)) = (
                access.get(target, Property::Opacity),
                access.get(target, Property::Depth),
            ) else {
                // Nothing to animate; count it as settled so the batch can
                // still complete.
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::StaleHandle,
                    Subject::Target(target.0),
                    "transition",
                ));
                self.items.insert(target, settled_item(epoch));
                continue;
            };

            if opacity == config.target_opacity && depth == config.target_depth {
                self.items.insert(target, settled_item(epoch));
                continue;
            }

            let start = now + config.stagger.delay(i, targets.len());
            let tween = |from: f64, to: f64, easing: Easing| {
                (from != to).then(|| Tween::new(from, to, start, config.duration, easing))
            };
            let timer = self.timers.schedule(
                start,
                TimerEvent {
                    target,
                    epoch,
                    kind: TimerKind::Start,
                },
            );
            self.items.insert(
                target,
                Item {
                    epoch,
                    state: ItemState::Waiting(timer),
                    opacity: tween(opacity, config.target_opacity, config.opacity_easing),
                    depth: tween(depth, config.target_depth, config.depth_easing),
                    grace: config.grace,
                },
            );
            self.pending.push(TransitionRecord {
                target,
                phase: TransitionPhase::Scheduled,
                at: start,
            });
        }

        self.alloc_batch(members)
    }

    /// Cancels the item's transition, if one is in flight. Its timers are
    /// released and its values stay wherever they were.
    pub fn cancel(&mut self, target: TargetId, now: HostTime) {
        let Some(item) = self.items.remove(&target) else {
            return;
        };
        let timer = match item.state {
            ItemState::Waiting(timer) | ItemState::Grace(timer) => Some(timer),
            ItemState::Running => None,
            ItemState::Settled => return,
        };
        if let Some(timer) = timer {
            let _ = self.timers.cancel(timer);
        }
        self.pending.push(TransitionRecord {
            target,
            phase: TransitionPhase::Cancelled,
            at: now,
        });
    }

    /// Cancels every in-flight transition.
    pub fn cancel_all(&mut self, now: HostTime) {
        let targets: Vec<TargetId> = self.items.keys().copied().collect();
        for target in targets {
            self.cancel(target, now);
        }
    }

    /// Whether the item's current transition reached its targets. Items that
    /// were never animated count as done.
    #[must_use]
    pub fn item_done(&self, target: TargetId) -> bool {
        self.items.get(&target).is_none_or(Item::is_done)
    }

    /// Completion state of a batch, or `None` once it has been released.
    #[must_use]
    pub fn batch_status(&self, batch: BatchId) -> Option<BatchStatus> {
        let b = self.batch(batch)?;
        let mut status = BatchStatus {
            done: Vec::with_capacity(b.members.len()),
            settled: Vec::with_capacity(b.members.len()),
            all_done: true,
            all_settled: true,
        };
        for &(target, epoch) in &b.members {
            let item = self.items.get(&target).filter(|it| it.epoch == epoch);
            let done = item.is_some_and(Item::is_done);
            let settled = item.is_some_and(Item::is_settled);
            status.done.push(done);
            status.settled.push(settled);
            status.all_done &= done;
            status.all_settled &= settled;
        }
        Some(status)
    }

    /// Every member of the batch is done. `false` for a released batch.
    #[must_use]
    pub fn all_done(&self, batch: BatchId) -> bool {
        self.batch(batch).is_some_and(|b| {
            b.members.iter().all(|&(target, epoch)| {
                self.items
                    .get(&target)
                    .is_some_and(|it| it.epoch == epoch && it.is_done())
            })
        })
    }

    /// Every member of the batch is settled. `false` for a released batch.
    #[must_use]
    pub fn all_settled(&self, batch: BatchId) -> bool {
        self.batch(batch).is_some_and(|b| {
            b.members.iter().all(|&(target, epoch)| {
                self.items
                    .get(&target)
                    .is_some_and(|it| it.epoch == epoch && it.is_settled())
            })
        })
    }

    /// Forgets a batch. Its items keep animating.
    pub fn release(&mut self, batch: BatchId) {
        if self.batch(batch).is_none() {
            return;
        }
        let b = &mut self.batches[batch.idx as usize];
        b.live = false;
        b.members.clear();
        b.generation = b.generation.wrapping_add(1);
        self.free_batches.push(batch.idx);
    }

    /// Number of items that are waiting, running, or in their grace period.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.items.values().filter(|it| !it.is_settled()).count()
    }

    /// Fires due timers, then samples every running item and writes the
    /// values through `access`.
    ///
    /// An item whose target can no longer be written is dropped with a
    /// diagnostic.
    pub fn tick(&mut self, tick: &FrameTick, access: &mut dyn PropertyAccess) -> TransitionChanges {
        let mut changes = TransitionChanges::default();
        self.tick_into(tick, access, &mut changes);
        changes
    }

    /// Like [`tick`](Self::tick), but reuses a caller-provided buffer.
    pub fn tick_into(
        &mut self,
        tick: &FrameTick,
        access: &mut dyn PropertyAccess,
        changes: &mut TransitionChanges,
    ) {
        changes.clear();
        changes.records.append(&mut self.pending);
        let now = tick.now;

        while let Some((_, deadline, event)) = self.timers.pop_due(now) {
            let Some(item) = self
                .items
                .get_mut(&event.target)
                .filter(|it| it.epoch == event.epoch)
            else {
                continue;
            };
            let phase = match event.kind {
                TimerKind::Start => {
                    item.state = ItemState::Running;
                    TransitionPhase::Started
                }
                TimerKind::Settle => {
                    item.state = ItemState::Settled;
                    TransitionPhase::Settled
                }
            };
            changes.records.push(TransitionRecord {
                target: event.target,
                phase,
                at: deadline,
            });
        }

        let mut lost = Vec::new();
        for (&target, item) in &mut self.items {
            if !matches!(item.state, ItemState::Running) {
                continue;
            }
            let mut finished = true;
            let mut alive = true;
            for (property, tween) in [
                (Property::Opacity, item.opacity),
                (Property::Depth, item.depth),
            ] {
                let Some(tween) = tween else {
                    continue;
                };
                alive &= access.set(target, property, tween.sample(now));
                finished &= tween.is_finished(now);
            }
            if !alive {
                lost.push(target);
                continue;
            }
            changes.written.push(target);
            if !finished {
                continue;
            }

            changes.records.push(TransitionRecord {
                target,
                phase: TransitionPhase::Finished,
                at: now,
            });
            item.state = match item.grace {
                Some(grace) => ItemState::Grace(self.timers.schedule(
                    now + grace,
                    TimerEvent {
                        target,
                        epoch: item.epoch,
                        kind: TimerKind::Settle,
                    },
                )),
                None => {
                    changes.records.push(TransitionRecord {
                        target,
                        phase: TransitionPhase::Settled,
                        at: now,
                    });
                    ItemState::Settled
                }
            };
        }

        for target in lost {
            self.items.remove(&target);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::StaleHandle,
                Subject::Target(target.0),
                "set",
            ));
        }
    }

    /// Returns and clears the buffered diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }

    fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches
            .get(id.idx as usize)
            .filter(|b| b.live && b.generation == id.generation)
    }

    fn alloc_batch(&mut self, members: Vec<(TargetId, u64)>) -> BatchId {
        if let Some(idx) = self.free_batches.pop() {
            let b = &mut self.batches[idx as usize];
            b.live = true;
            b.members = members;
            return BatchId {
                idx,
                generation: b.generation,
            };
        }
        let idx = u32::try_from(self.batches.len()).unwrap_or(u32::MAX);
        self.batches.push(Batch {
            generation: 0,
            live: true,
            members,
        });
        BatchId { idx, generation: 0 }
    }
}

fn settled_item(epoch: u64) -> Item {
    Item {
        epoch,
        state: ItemState::Settled,
        opacity: None,
        depth: None,
        grace: None,
    }
}
