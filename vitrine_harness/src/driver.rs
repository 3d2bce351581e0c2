// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vitrine_core::clock::{Clock, ManualClock};
use vitrine_core::scene::Presenter;
use vitrine_core::scheduler::{RenderTasks, TaskControl, TaskId};
use vitrine_core::time::{Duration, HostTime};
use vitrine_core::timing::{DEFAULT_FRAME_INTERVAL, FrameTick, FrameTicker};
use vitrine_core::trace::Tracer;
use vitrine_core::view::{FrameOutput, Showcase};

use crate::scene::FakeScene;

/// Produces frame ticks from a manual clock.
///
/// Every [`tick`](Self::tick) advances the clock by the configured
/// interval (or a one-off override) and numbers the frame. After each
/// showcase frame the driver runs its render tasks against the scene; the
/// first of them steps card hover tilts.
#[derive(Debug)]
pub struct FrameDriver {
    clock: ManualClock,
    ticker: FrameTicker,
    interval: Duration,
    tasks: RenderTasks<FakeScene>,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl FrameDriver {
    /// Creates a driver at time zero.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let mut tasks = RenderTasks::new();
        let _ = tasks.add(|scene: &mut FakeScene, tick: &FrameTick| {
            scene.step_tilts(tick.interval);
            TaskControl::Continue
        });
        Self {
            clock: ManualClock::new(HostTime::ZERO),
            ticker: FrameTicker::new(),
            interval,
            tasks,
        }
    }

    /// Registers a task to run against the scene after every frame.
    pub fn add_task(
        &mut self,
        task: impl FnMut(&mut FakeScene, &FrameTick) -> TaskControl + 'static,
    ) -> TaskId {
        self.tasks.add(task)
    }

    /// Unregisters a task. Returns `false` if it already stopped.
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id)
    }

    /// The clock phases are timed against.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.clock.now()
    }

    /// The nominal frame interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advances by the nominal interval and returns the tick.
    pub fn tick(&mut self) -> FrameTick {
        self.tick_after(self.interval)
    }

    /// Advances by `elapsed` and returns the tick. Used to simulate
    /// dropped or late frames.
    pub fn tick_after(&mut self, elapsed: Duration) -> FrameTick {
        self.clock.advance(elapsed);
        self.ticker.tick(self.clock.now())
    }

    /// Runs one showcase frame against `scene` and presents the layout
    /// changes to it.
    pub fn frame(
        &mut self,
        showcase: &mut Showcase,
        scene: &mut FakeScene,
        tracer: &mut Tracer<'_>,
    ) -> FrameOutput {
        let tick = self.tick();
        self.present(tick, showcase, scene, tracer)
    }

    /// Like [`frame`](Self::frame), after `elapsed` instead of the nominal
    /// interval.
    pub fn frame_after(
        &mut self,
        elapsed: Duration,
        showcase: &mut Showcase,
        scene: &mut FakeScene,
        tracer: &mut Tracer<'_>,
    ) -> FrameOutput {
        let tick = self.tick_after(elapsed);
        self.present(tick, showcase, scene, tracer)
    }

    /// Runs frames until `done` returns `true` for an output or
    /// `max_frames` have run. Returns the number of frames run and whether
    /// `done` was satisfied.
    pub fn run_until(
        &mut self,
        showcase: &mut Showcase,
        scene: &mut FakeScene,
        max_frames: usize,
        mut done: impl FnMut(&Showcase, &FrameOutput) -> bool,
    ) -> (usize, bool) {
        for n in 1..=max_frames {
            let output = self.frame(showcase, scene, &mut Tracer::none());
            if done(showcase, &output) {
                return (n, true);
            }
        }
        (max_frames, false)
    }

    fn present(
        &mut self,
        tick: FrameTick,
        showcase: &mut Showcase,
        scene: &mut FakeScene,
        tracer: &mut Tracer<'_>,
    ) -> FrameOutput {
        scene.sync_showcase(showcase);
        let output = showcase.frame(&tick, scene, &self.clock, tracer);
        scene.apply(showcase.tree(), &output.layout);
        scene.apply_pose(&output.pose);
        self.tasks.run(scene, &tick);
        output
    }
}
