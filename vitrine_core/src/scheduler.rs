// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred work: one-shot timers and per-frame render tasks.
//!
//! [`TimerQueue`] stands in for `setTimeout`. A timer is a deadline plus a
//! payload; the owner polls [`TimerQueue::pop_due`] from its frame tick and
//! acts on whatever payloads come back. Timer slots are generational, so a
//! cancelled [`TimerId`] can never resolve to a later timer that reuses the
//! slot, and a cancelled payload is dropped immediately. Nothing is ever
//! delivered after cancellation.
//!
//! [`RenderTasks`] stands in for `requestAnimationFrame` subscriptions that
//! run every frame until removed or until they ask to stop. Tasks receive
//! the state they drive as an argument, so the registry can live next to
//! that state in the same owner.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::time::HostTime;
use crate::timing::FrameTick;

/// A handle to a scheduled timer in a [`TimerQueue`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    idx: u32,
    generation: u32,
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({}@gen{})", self.idx, self.generation)
    }
}

#[derive(Debug)]
struct TimerSlot<T> {
    generation: u32,
    deadline: HostTime,
    seq: u64,
    payload: Option<T>,
}

/// One-shot timers ordered by deadline, then by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    slots: Vec<TimerSlot<T>>,
    free_list: Vec<u32>,
    next_seq: u64,
    pending: usize,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            next_seq: 0,
            pending: 0,
        }
    }

    /// Schedules `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: HostTime, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.deadline = deadline;
            slot.seq = seq;
            slot.payload = Some(payload);
            return TimerId {
                idx,
                generation: slot.generation,
            };
        }
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(TimerSlot {
            generation: 0,
            deadline,
            seq,
            payload: Some(payload),
        });
        TimerId { idx, generation: 0 }
    }

    /// Cancels a timer, returning its payload if it was still pending.
    ///
    /// Cancelling a timer that already fired or was already cancelled is a
    /// no-op that returns `None`.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        if !self.is_pending(id) {
            return None;
        }
        self.release(id.idx)
    }

    /// Returns `true` if `id` refers to a timer that has neither fired nor
    /// been cancelled.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots
            .get(id.idx as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.payload.is_some())
    }

    /// Returns the deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<HostTime> {
        self.is_pending(id)
            .then(|| self.slots[id.idx as usize].deadline)
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.slots
            .iter()
            .filter(|slot| slot.payload.is_some())
            .map(|slot| slot.deadline)
            .min()
    }

    /// Removes and returns the earliest timer whose deadline is at or before
    /// `now`, together with its deadline.
    ///
    /// Call repeatedly until it returns `None` to drain everything due. Ties
    /// resolve in scheduling order.
    pub fn pop_due(&mut self, now: HostTime) -> Option<(TimerId, HostTime, T)> {
        let (idx, slot) = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.payload.is_some() && slot.deadline <= now)
            .min_by_key(|(_, slot)| (slot.deadline, slot.seq))?;
        let id = TimerId {
            idx: u32::try_from(idx).unwrap_or(u32::MAX),
            generation: slot.generation,
        };
        let deadline = slot.deadline;
        let payload = self.release(id.idx)?;
        Some((id, deadline, payload))
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        for idx in 0..self.slots.len() {
            if self.slots[idx].payload.is_some() {
                let _ = self.release(u32::try_from(idx).unwrap_or(u32::MAX));
            }
        }
    }

    fn release(&mut self, idx: u32) -> Option<T> {
        let slot = self.slots.get_mut(idx as usize)?;
        let payload = slot.payload.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.pending -= 1;
        Some(payload)
    }
}

// ---------------------------------------------------------------------------
// Render tasks
// ---------------------------------------------------------------------------

/// A handle to a registered render task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// What a render task wants after running for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskControl {
    /// Run again next frame.
    Continue,
    /// Unregister after this frame.
    Stop,
}

type RenderTask<C> = Box<dyn FnMut(&mut C, &FrameTick) -> TaskControl>;

/// Callbacks that run once per frame against a context `C`, in
/// registration order.
pub struct RenderTasks<C> {
    tasks: Vec<(TaskId, RenderTask<C>)>,
    next_id: u64,
}

impl<C> fmt::Debug for RenderTasks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTasks")
            .field("len", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl<C> Default for RenderTasks<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RenderTasks<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a task to run on every subsequent [`run`](Self::run).
    pub fn add(
        &mut self,
        task: impl FnMut(&mut C, &FrameTick) -> TaskControl + 'static,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push((id, Box::new(task)));
        id
    }

    /// Unregisters a task. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(task_id, _)| *task_id != id);
        self.tasks.len() != before
    }

    /// Returns whether `id` is still registered.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|(task_id, _)| *task_id == id)
    }

    /// Runs every task for `tick`, dropping those that return
    /// [`TaskControl::Stop`].
    pub fn run(&mut self, context: &mut C, tick: &FrameTick) {
        self.tasks
            .retain_mut(|(_, task)| task(context, tick) == TaskControl::Continue);
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if no tasks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
