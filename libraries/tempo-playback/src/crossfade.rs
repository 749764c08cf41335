//! Stepped fade ramps for crossfades
//!
//! A crossfade is two independent ramps: the outgoing pipeline fades down
//! to silence and is torn down, the incoming one fades up to full. Each
//! ramp advances one step per [`FADE_STEP`] tick, interpolating linearly
//! over the time it has left.

use crate::pipeline::{Pipeline, PipelineSlot, PipelineState};
use std::time::Duration;
use tracing::{debug, warn};

/// Interval between two ramp steps
pub const FADE_STEP: Duration = Duration::from_millis(250);

/// Ramp direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Fade out, then stop the pipeline
    Down,
    /// Fade in to full level
    Up,
}

/// Outcome of one ramp step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampStatus {
    /// More steps to go
    Running,
    /// Target level reached
    Finished,
    /// The ramp no longer applies to its pipeline and was dropped
    Cancelled,
}

/// One running fade
#[derive(Debug, Clone, PartialEq)]
pub struct FadeRamp {
    slot: PipelineSlot,
    direction: FadeDirection,
    remaining: Duration,
}

impl FadeRamp {
    /// Fade `slot` out over `duration`
    pub fn down(slot: PipelineSlot, duration: Duration) -> Self {
        Self {
            slot,
            direction: FadeDirection::Down,
            remaining: duration,
        }
    }

    /// Fade `slot` in over `duration`
    pub fn up(slot: PipelineSlot, duration: Duration) -> Self {
        Self {
            slot,
            direction: FadeDirection::Up,
            remaining: duration,
        }
    }

    pub fn slot(&self) -> PipelineSlot {
        self.slot
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Advance the ramp by one step
    ///
    /// A fade-out cancels itself once its pipeline became active again,
    /// a fade-in once its pipeline stopped being the active one.
    pub fn step(&mut self, pipeline: &mut dyn Pipeline, active: PipelineSlot) -> RampStatus {
        match self.direction {
            FadeDirection::Down => self.step_down(pipeline, active),
            FadeDirection::Up => self.step_up(pipeline, active),
        }
    }

    fn step_down(&mut self, pipeline: &mut dyn Pipeline, active: PipelineSlot) -> RampStatus {
        if self.slot == active {
            debug!("Fade out of {:?} cancelled, pipeline is active again", self.slot);
            return RampStatus::Cancelled;
        }

        if !self.remaining.is_zero() {
            let level = pipeline.fade_level();
            let rate = level - level / self.steps_left();
            if rate > 0.0 {
                pipeline.set_fade_level(rate);
                self.remaining = self.remaining.saturating_sub(FADE_STEP);
                return RampStatus::Running;
            }
        }

        pipeline.set_fade_level(0.0);
        if let Err(e) = pipeline.set_state(PipelineState::Null) {
            warn!("Failed to stop faded out pipeline {:?}: {}", self.slot, e);
        }
        debug!("Fade out of {:?} finished", self.slot);
        RampStatus::Finished
    }

    fn step_up(&mut self, pipeline: &mut dyn Pipeline, active: PipelineSlot) -> RampStatus {
        if self.slot != active {
            debug!("Fade in of {:?} cancelled, pipeline replaced", self.slot);
            return RampStatus::Cancelled;
        }

        if !self.remaining.is_zero() {
            let level = pipeline.fade_level();
            let rate = level + (1.0 - level) / self.steps_left();
            if rate < 1.0 {
                pipeline.set_fade_level(rate);
                self.remaining = self.remaining.saturating_sub(FADE_STEP);
                return RampStatus::Running;
            }
        }

        pipeline.set_fade_level(1.0);
        debug!("Fade in of {:?} finished", self.slot);
        RampStatus::Finished
    }

    /// Steps left, never below one so a partial step lands on the target
    fn steps_left(&self) -> f64 {
        (self.remaining.as_secs_f64() / FADE_STEP.as_secs_f64()).max(1.0)
    }
}
