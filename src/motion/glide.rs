//! Eased, time-bounded moves
//!
//! A glide moves the offset from `from` to `to` along an ease-out quartic
//! curve. Requesting another glide while one is in flight re-targets it from
//! the currently displayed position, so repeated requests compose instead of
//! restarting.

use crate::consts::NEGLIGIBLE_DISTANCE;
use crate::ease_out_quart;
use crate::tuning::CarouselTuning;

/// Follow-up the carousel runs when a glide lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlideCompletion {
    #[default]
    None,
    /// Arrow navigation finished its glide portion
    ArrowSettled,
    /// Dock glide landed; check the error against the slot and correct once
    DockCorrection { slot: usize },
    /// Corrective sub-glide landed; snap if within tolerance
    DockSettle { slot: usize },
}

/// Per-request options; `None` inherits from the glide being re-targeted
#[derive(Debug, Clone, Copy, Default)]
pub struct GlideOptions {
    pub keep_looping: Option<bool>,
    pub on_complete: Option<GlideCompletion>,
}

impl GlideOptions {
    pub fn looping() -> Self {
        Self {
            keep_looping: Some(true),
            on_complete: None,
        }
    }

    pub fn then(mut self, completion: GlideCompletion) -> Self {
        self.on_complete = Some(completion);
        self
    }
}

/// State of the glide in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    pub start_ms: f64,
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    pub keep_looping: bool,
    pub on_complete: GlideCompletion,
}

impl Glide {
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased position at `now_ms`
    pub fn position_at(&self, now_ms: f64) -> f64 {
        self.from + (self.to - self.from) * ease_out_quart(self.progress(now_ms))
    }

    /// Translate the whole path (track wraps, concurrent inertia drift)
    pub fn shift(&mut self, delta: f64) {
        self.from += delta;
        self.to += delta;
    }
}

/// Result of a glide request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlideStart {
    /// Distance too small to animate
    Ignored,
    /// No glide was running; a frame loop must be scheduled
    Started { duration_ms: f64 },
    /// The running glide was re-targeted; its loop continues
    Retargeted { duration_ms: f64 },
    /// Reduced motion: the move was applied at once
    Instant { offset: f64, completion: GlideCompletion },
}

/// Output of one glide frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideFrame {
    pub offset: f64,
    pub keep_looping: bool,
    /// Set on the landing frame
    pub finished: Option<GlideCompletion>,
}

#[derive(Debug, Clone, Default)]
pub struct GlideController {
    state: Option<Glide>,
}

impl GlideController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&Glide> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut Glide> {
        self.state.as_mut()
    }

    /// Start or re-target a glide by `distance` from `current_offset`
    pub fn glide_by(
        &mut self,
        current_offset: f64,
        distance: f64,
        duration_hint_ms: f64,
        options: GlideOptions,
        now_ms: f64,
        reduced_motion: bool,
        tuning: &CarouselTuning,
    ) -> GlideStart {
        if distance.abs() < NEGLIGIBLE_DISTANCE || !distance.is_finite() {
            return GlideStart::Ignored;
        }
        let duration_ms = duration_hint_ms.clamp(tuning.glide_min_ms, tuning.glide_max_ms);

        let mut from = current_offset;
        let mut to = current_offset + distance;
        let mut keep_looping = options.keep_looping.unwrap_or(true);
        let mut on_complete = options.on_complete.unwrap_or_default();
        let running = self.state.take();
        if let Some(running) = running {
            from = running.position_at(now_ms);
            to = running.to + distance;
            keep_looping = options.keep_looping.unwrap_or(running.keep_looping);
            on_complete = options.on_complete.unwrap_or(running.on_complete);
        }

        if reduced_motion {
            return GlideStart::Instant {
                offset: to,
                completion: on_complete,
            };
        }

        self.state = Some(Glide {
            start_ms: now_ms,
            from,
            to,
            duration_ms,
            keep_looping,
            on_complete,
        });

        if running.is_some() {
            GlideStart::Retargeted { duration_ms }
        } else {
            GlideStart::Started { duration_ms }
        }
    }

    /// Advance to `now_ms`. Returns `None` when idle.
    pub fn step(&mut self, now_ms: f64) -> Option<GlideFrame> {
        let glide = self.state?;
        let progress = glide.progress(now_ms);
        if progress < 1.0 {
            return Some(GlideFrame {
                offset: glide.position_at(now_ms),
                keep_looping: glide.keep_looping,
                finished: None,
            });
        }
        self.state = None;
        Some(GlideFrame {
            offset: glide.to,
            keep_looping: glide.keep_looping,
            finished: Some(glide.on_complete),
        })
    }

    pub fn cancel(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn start(ctrl: &mut GlideController, offset: f64, distance: f64, hint: f64, now: f64) -> GlideStart {
        ctrl.glide_by(
            offset,
            distance,
            hint,
            GlideOptions::looping(),
            now,
            false,
            &CarouselTuning::default(),
        )
    }

    #[test]
    fn test_duration_clamped() {
        let mut ctrl = GlideController::new();
        assert_eq!(
            start(&mut ctrl, 0.0, 100.0, 1000.0, 0.0),
            GlideStart::Started { duration_ms: 340.0 }
        );
        ctrl.cancel();
        assert_eq!(
            start(&mut ctrl, 0.0, 100.0, 10.0, 0.0),
            GlideStart::Started { duration_ms: 120.0 }
        );
    }

    #[test]
    fn test_tiny_distance_ignored() {
        let mut ctrl = GlideController::new();
        assert_eq!(start(&mut ctrl, 0.0, 0.4, 200.0, 0.0), GlideStart::Ignored);
        assert!(!ctrl.is_active());
    }

    #[test]
    fn test_lands_exactly_and_reports_completion() {
        let mut ctrl = GlideController::new();
        ctrl.glide_by(
            10.0,
            300.0,
            200.0,
            GlideOptions::looping().then(GlideCompletion::DockCorrection { slot: 4 }),
            0.0,
            false,
            &CarouselTuning::default(),
        );
        let mid = ctrl.step(100.0).unwrap();
        assert!(mid.offset > 10.0 && mid.offset < 310.0);
        assert!(mid.finished.is_none());

        let end = ctrl.step(200.0).unwrap();
        assert_eq!(end.offset, 310.0);
        assert_eq!(end.finished, Some(GlideCompletion::DockCorrection { slot: 4 }));
        assert!(!ctrl.is_active());
        assert!(ctrl.step(216.0).is_none());
    }

    #[test]
    fn test_retarget_extends_destination() {
        let mut ctrl = GlideController::new();
        start(&mut ctrl, 0.0, 300.0, 200.0, 0.0);
        let result = start(&mut ctrl, 0.0, 200.0, 200.0, 50.0);
        assert!(matches!(result, GlideStart::Retargeted { .. }));
        assert_eq!(ctrl.state().unwrap().to, 500.0);
    }

    #[test]
    fn test_retarget_inherits_completion() {
        let mut ctrl = GlideController::new();
        ctrl.glide_by(
            0.0,
            300.0,
            200.0,
            GlideOptions::looping().then(GlideCompletion::ArrowSettled),
            0.0,
            false,
            &CarouselTuning::default(),
        );
        start(&mut ctrl, 0.0, 100.0, 200.0, 20.0);
        assert_eq!(ctrl.state().unwrap().on_complete, GlideCompletion::ArrowSettled);
    }

    #[test]
    fn test_reduced_motion_is_instant() {
        let mut ctrl = GlideController::new();
        let result = ctrl.glide_by(
            50.0,
            100.0,
            200.0,
            GlideOptions::default(),
            0.0,
            true,
            &CarouselTuning::default(),
        );
        assert_eq!(
            result,
            GlideStart::Instant {
                offset: 150.0,
                completion: GlideCompletion::None
            }
        );
        assert!(!ctrl.is_active());
    }

    proptest! {
        #[test]
        fn retarget_is_continuous(
            first in -2000.0f64..2000.0,
            second in -2000.0f64..2000.0,
            at in 0.0f64..400.0,
        ) {
            prop_assume!(first.abs() >= 0.5 && second.abs() >= 0.5);
            let mut ctrl = GlideController::new();
            start(&mut ctrl, 100.0, first, 260.0, 0.0);
            let shown = ctrl.state().map(|g| g.position_at(at));
            start(&mut ctrl, 100.0, second, 260.0, at);
            let after = ctrl.state().unwrap().position_at(at);
            if let Some(shown) = shown {
                prop_assert!((shown - after).abs() < 1e-9);
            }
        }
    }
}
