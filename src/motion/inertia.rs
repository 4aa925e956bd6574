//! Free-running momentum
//!
//! A single signed velocity (px/ms) integrated once per frame with
//! frame-rate independent exponential decay. Positive velocity moves the
//! strip content to the right, i.e. decreases the scroll offset.

use crate::consts::*;
use crate::sign;
use crate::tuning::CarouselTuning;

/// How an impulse combines with the current velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseMode {
    /// Accumulate (wheel nudges, arrow taps)
    Add,
    /// Overwrite, with partial carry-over of same-direction momentum (drag release)
    Replace,
}

/// Result of [`Inertia::apply_impulse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseOutcome {
    /// Resulting velocity is below the stop threshold; nothing runs
    Negligible,
    /// The integration loop was idle and must be scheduled
    Started,
    /// The loop is already running and picks up the new velocity
    Updated,
}

/// Output of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaFrame {
    /// Offset change for this frame
    pub delta: f64,
    /// 0..=1.6 visual intensity derived from the pre-decay speed
    pub intensity: f64,
    /// Velocity after decay
    pub velocity: f64,
    /// The loop ended this frame (velocity dropped below the threshold)
    pub stopped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Inertia {
    velocity: f64,
    last_frame_ms: Option<f64>,
    running: bool,
}

impl Inertia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Combine an impulse into the velocity and clamp it
    pub fn apply_impulse(
        &mut self,
        impulse: f64,
        mode: ImpulseMode,
        now_ms: f64,
        tuning: &CarouselTuning,
    ) -> ImpulseOutcome {
        let current = self.velocity;
        let same_direction = current != 0.0 && sign(current) == sign(impulse);
        let combined = match mode {
            ImpulseMode::Replace => {
                if same_direction {
                    current + impulse * tuning.replace_carry
                } else {
                    impulse
                }
            }
            ImpulseMode::Add => {
                let mut next = current + impulse;
                if same_direction && current.abs() > tuning.add_momentum_threshold {
                    next += impulse * tuning.add_momentum_bonus;
                }
                next
            }
        };
        self.velocity = combined.clamp(-tuning.max_velocity, tuning.max_velocity);

        if self.velocity.abs() < tuning.min_velocity {
            if !self.running {
                self.velocity = 0.0;
            }
            return ImpulseOutcome::Negligible;
        }
        if self.running {
            return ImpulseOutcome::Updated;
        }
        self.running = true;
        self.last_frame_ms = Some(now_ms);
        ImpulseOutcome::Started
    }

    /// Advance one frame. Returns `None` when not running.
    pub fn step(&mut self, now_ms: f64, tuning: &CarouselTuning) -> Option<InertiaFrame> {
        if !self.running {
            return None;
        }
        let elapsed = self.last_frame_ms.map(|last| now_ms - last).unwrap_or(0.0);
        let dt = if elapsed > 0.0 { elapsed } else { FALLBACK_FRAME_MS };
        let dt = dt.clamp(MIN_FRAME_MS, MAX_FRAME_MS);
        self.last_frame_ms = Some(now_ms);

        let delta = -self.velocity * dt;
        let intensity = (self.velocity.abs() / 3.15).min(MAX_INTENSITY);

        self.velocity *= tuning.decay_per_frame.powf(dt / REFERENCE_FRAME_MS);
        let stopped = self.velocity.abs() < tuning.min_velocity;
        if stopped {
            self.stop();
        }

        Some(InertiaFrame {
            delta,
            intensity,
            velocity: self.velocity,
            stopped,
        })
    }

    /// Zero the velocity and end the loop
    pub fn stop(&mut self) {
        self.velocity = 0.0;
        self.running = false;
        self.last_frame_ms = None;
    }
}
