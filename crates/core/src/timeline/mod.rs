//! Cooperative tick loop.
//!
//! One pose sample is processed per tick. The loop keeps requesting ticks
//! from its [`FrameSource`] even while the workout is paused, and stops only
//! when the source runs dry (the host cancelled) or the workout finishes.
//! Each tick is committed to the controller before observers see it.

use serde::{Deserialize, Serialize};

use crate::{
    pose::PoseSample,
    session::SessionSnapshot,
    workout::{CoachEvent, WorkoutController, WorkoutPhase},
};

/// User control riding on a tick, applied before the pose is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Pause,
    Resume,
    Skip,
}

/// Everything the host delivers for one display refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub pose: Option<PoseSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<ControlCommand>,
}

impl TickInput {
    pub fn new(timestamp_ms: u64, pose: Option<PoseSample>) -> Self {
        Self {
            timestamp_ms,
            pose,
            command: None,
        }
    }

    pub fn with_command(mut self, command: ControlCommand) -> Self {
        self.command = Some(command);
        self
    }
}

/// Supplies ticks. Returning `None` stops the loop.
pub trait FrameSource {
    fn next_tick(&mut self) -> Option<TickInput>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = TickInput>,
{
    fn next_tick(&mut self) -> Option<TickInput> {
        self.next()
    }
}

/// Read-only consumer of committed ticks (renderer, narrator).
pub trait TickObserver {
    fn on_tick(&mut self, snapshot: &SessionSnapshot, events: &[CoachEvent]);
}

/// Observer that ignores everything.
impl TickObserver for () {
    fn on_tick(&mut self, _snapshot: &SessionSnapshot, _events: &[CoachEvent]) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopStats {
    pub ticks: u64,
    pub processed: u64,
    pub skipped: u64,
}

#[derive(Debug, Default)]
pub struct TickLoop {
    stats: LoopStats,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Drives `controller` until the source is exhausted or the workout is
    /// complete.
    pub fn run<S, O>(&mut self, controller: &mut WorkoutController, source: &mut S, observer: &mut O) -> LoopStats
    where
        S: FrameSource + ?Sized,
        O: TickObserver + ?Sized,
    {
        while let Some(input) = source.next_tick() {
            self.step(controller, input, observer);
            if controller.phase() == WorkoutPhase::Completed {
                tracing::debug!(ticks = self.stats.ticks, "workout finished, stopping tick loop");
                break;
            }
        }
        self.stats
    }

    /// Applies a single tick and notifies the observer.
    pub fn step<O>(&mut self, controller: &mut WorkoutController, input: TickInput, observer: &mut O)
    where
        O: TickObserver + ?Sized,
    {
        let now = input.timestamp_ms;
        let mut events = Vec::new();

        match input.command {
            Some(ControlCommand::Pause) => events.extend(controller.pause(now)),
            Some(ControlCommand::Resume) => events.extend(controller.resume(now)),
            Some(ControlCommand::Skip) => match controller.skip(now) {
                Ok(skipped) => events.extend(skipped),
                Err(err) => tracing::warn!(%err, "ignoring skip"),
            },
            None => {}
        }

        let outcome = controller.tick(now, input.pose.as_ref());
        events.extend(outcome.events);

        self.stats.ticks += 1;
        if outcome.processed {
            self.stats.processed += 1;
        } else {
            self.stats.skipped += 1;
        }

        observer.on_tick(&outcome.snapshot, &events);
    }
}
