//! Idle docking
//!
//! After the track has been quiet for a while it re-centers on the nearest
//! card. This module holds the guard sequence and the timing curves; the
//! carousel owns the timer and performs the glide.

use crate::consts::MAX_INTENSITY;
use crate::tuning::CarouselTuning;

/// Shortest re-arm delay while waiting for the idle window
const MIN_REARM_MS: f64 = 70.0;
/// Slack added to the remaining idle time when re-arming
const REARM_SLACK_MS: f64 = 22.0;

/// What the carousel is doing when the dock timer fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockContext {
    pub now_ms: f64,
    pub last_motion_ms: f64,
    pub dragging: bool,
    pub gliding: bool,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DockDecision {
    /// Check again after `delay_ms`
    Rearm { delay_ms: f64 },
    /// Quiet: dock now
    Dock,
}

/// Run the guards in order
pub fn evaluate(ctx: &DockContext, tuning: &CarouselTuning) -> DockDecision {
    let idle = ctx.now_ms - ctx.last_motion_ms;
    if idle < tuning.dock_idle_ms {
        return DockDecision::Rearm {
            delay_ms: (tuning.dock_idle_ms - idle + REARM_SLACK_MS).max(MIN_REARM_MS),
        };
    }
    if ctx.dragging {
        return DockDecision::Rearm {
            delay_ms: tuning.dock_drag_recheck_ms,
        };
    }
    if ctx.gliding || ctx.velocity.abs() >= tuning.dock_velocity_eps {
        return DockDecision::Rearm {
            delay_ms: tuning.dock_recheck_ms,
        };
    }
    DockDecision::Dock
}

/// Duration hint for the docking glide over `distance` px
pub fn dock_duration(distance: f64, tuning: &CarouselTuning) -> f64 {
    (220.0 + distance.abs() * 0.32).clamp(tuning.dock_min_ms, tuning.dock_max_ms)
}

/// Plasma pulse accompanying a docking glide
pub fn dock_plasma(distance: f64) -> f64 {
    (distance.abs() / 180.0).max(0.2).min(1.18).min(MAX_INTENSITY)
}

/// Duration hint for the single corrective sub-glide
pub fn correction_duration(error: f64) -> f64 {
    (120.0 + error.abs() * 1.45).clamp(160.0, 280.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(now: f64, last: f64) -> DockContext {
        DockContext {
            now_ms: now,
            last_motion_ms: last,
            dragging: false,
            gliding: false,
            velocity: 0.0,
        }
    }

    #[test]
    fn test_rearm_while_recently_moved() {
        let tuning = CarouselTuning::default();
        // 100ms idle: 220 - 100 + 22
        assert_eq!(
            evaluate(&ctx(1100.0, 1000.0), &tuning),
            DockDecision::Rearm { delay_ms: 142.0 }
        );
        // 200ms idle: floor of 70
        assert_eq!(
            evaluate(&ctx(1200.0, 1000.0), &tuning),
            DockDecision::Rearm { delay_ms: 70.0 }
        );
    }

    #[test]
    fn test_guards_in_order() {
        let tuning = CarouselTuning::default();
        let mut c = ctx(2000.0, 1000.0);
        c.dragging = true;
        c.gliding = true;
        assert_eq!(evaluate(&c, &tuning), DockDecision::Rearm { delay_ms: 90.0 });
        c.dragging = false;
        assert_eq!(evaluate(&c, &tuning), DockDecision::Rearm { delay_ms: 92.0 });
        c.gliding = false;
        c.velocity = -0.05;
        assert_eq!(evaluate(&c, &tuning), DockDecision::Rearm { delay_ms: 92.0 });
        c.velocity = 0.03;
        assert_eq!(evaluate(&c, &tuning), DockDecision::Dock);
    }

    #[test]
    fn test_timings() {
        let tuning = CarouselTuning::default();
        assert_eq!(dock_duration(10.0, &tuning), 320.0);
        assert_eq!(dock_duration(500.0, &tuning), 380.0);
        assert_eq!(dock_duration(-5000.0, &tuning), 640.0);

        assert_eq!(dock_plasma(1.0), 0.2);
        assert_eq!(dock_plasma(90.0), 0.5);
        assert_eq!(dock_plasma(900.0), 1.18);

        assert_eq!(correction_duration(2.0), 160.0);
        assert_eq!(correction_duration(200.0), 280.0);
    }
}
