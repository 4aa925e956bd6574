//! Data-driven motion tuning
//!
//! Every empirically tuned constant of the carousel and page scroller lives
//! here so a host can override them from JSON without rebuilding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be {requirement} (got {value})")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

/// Carousel motion constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselTuning {
    /// Number of times the logical card list is repeated in the strip
    pub repeat: usize,
    /// Velocity cap (px/ms)
    pub max_velocity: f64,
    /// Velocity below which inertia stops
    pub min_velocity: f64,
    /// Velocity multiplier per 16.666ms frame
    pub decay_per_frame: f64,
    /// Carry-over of existing velocity on a same-sign replace impulse
    pub replace_carry: f64,
    /// Extra share of an additive impulse when already moving fast the same way
    pub add_momentum_bonus: f64,
    /// Speed above which the additive bonus applies
    pub add_momentum_threshold: f64,

    /// Window (ms) inside which repeated inputs grow the streak
    pub input_window_ms: f64,
    /// Multiplier of the input window inside which the streak decays instead of resetting
    pub input_decay_window: f64,
    /// Boost added per streak step
    pub boost_step: f64,
    /// Maximum boost multiplier
    pub boost_cap: f64,
    /// Maximum streak length
    pub max_streak: u32,

    /// Dominant-axis movement (px) that turns a press into a drag
    pub drag_threshold_px: f64,
    /// Release velocity multiplier for flicks
    pub drag_release_multiplier: f64,
    /// Release speed below which no inertia is seeded
    pub drag_release_min_velocity: f64,
    /// Maximum flick boost
    pub flick_boost_cap: f64,

    /// Share of the wheel distance glided immediately
    pub wheel_glide_share: f64,
    /// Base inertia impulse per wheel pixel
    pub wheel_impulse_base: f64,

    /// Share of an arrow move covered by the glide (rest drifts)
    pub arrow_glide_share: f64,
    /// Arrow plasma pulse strength
    pub arrow_plasma_power: f64,
    /// Arrow plasma pulse length (ms)
    pub arrow_plasma_ms: f64,
    /// Largest impulse an arrow press may seed
    pub arrow_impulse_cap: f64,

    /// Glide duration bounds (ms)
    pub glide_min_ms: f64,
    pub glide_max_ms: f64,

    /// Required quiet time (ms) before docking
    pub dock_idle_ms: f64,
    /// Re-check delay (ms) while a glide or residual velocity blocks docking
    pub dock_recheck_ms: f64,
    /// Re-check delay (ms) while a drag blocks docking
    pub dock_drag_recheck_ms: f64,
    /// Dock glide duration bounds (ms)
    pub dock_min_ms: f64,
    pub dock_max_ms: f64,
    /// Distance (px) below which docking snaps instead of gliding
    pub dock_min_distance: f64,
    /// Velocity below which the track counts as resting
    pub dock_velocity_eps: f64,
    /// Landing error (px) tolerated before a corrective sub-glide
    pub dock_correction_px: f64,
}

impl Default for CarouselTuning {
    fn default() -> Self {
        Self {
            repeat: 5,
            max_velocity: 6.6,
            min_velocity: 0.014,
            decay_per_frame: 0.948,
            replace_carry: 0.72,
            add_momentum_bonus: 0.15,
            add_momentum_threshold: 1.15,

            input_window_ms: 270.0,
            input_decay_window: 2.6,
            boost_step: 0.18,
            boost_cap: 3.1,
            max_streak: 16,

            drag_threshold_px: 10.0,
            drag_release_multiplier: 6.8,
            drag_release_min_velocity: 0.008,
            flick_boost_cap: 2.15,

            wheel_glide_share: 0.78,
            wheel_impulse_base: 0.0023,

            arrow_glide_share: 0.76,
            arrow_plasma_power: 1.18,
            arrow_plasma_ms: 340.0,
            arrow_impulse_cap: 6.1,

            glide_min_ms: 120.0,
            glide_max_ms: 340.0,

            dock_idle_ms: 220.0,
            dock_recheck_ms: 92.0,
            dock_drag_recheck_ms: 90.0,
            dock_min_ms: 320.0,
            dock_max_ms: 640.0,
            dock_min_distance: 0.6,
            dock_velocity_eps: 0.04,
            dock_correction_px: 1.2,
        }
    }
}

/// Page-level scroll constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageTuning {
    /// Fixed header height subtracted from section tops
    pub header_offset: f64,
    /// Narrowest viewport (px) on which section snapping is active
    pub snap_min_viewport_width: f64,
    /// Wheel deltas smaller than this never snap
    pub snap_min_wheel_delta: f64,
    /// Re-entrancy lock after a snap (ms)
    pub snap_lock_ms: f64,
    /// Elapsed time (ms) after which an opposite-direction wheel breaks the lock
    pub snap_reversal_ms: f64,
    /// Distance (px) from a section edge that triggers a snap
    pub snap_edge_threshold: f64,
    /// Section tops closer than this are treated as one
    pub section_dedupe_px: f64,
    /// Tolerance (px) when deciding which section contains the marker line
    pub section_marker_slack: f64,
    /// Snap duration hint (ms) for generic section snaps
    pub snap_duration_ms: f64,
    /// Upward catch into the "about" block: distance below its top that triggers it
    pub about_catch_px: f64,
    /// Slack (px) around the about zone bounds
    pub about_zone_slack: f64,
    /// Snap duration hint (ms) for the about catch
    pub about_duration_ms: f64,
    /// Catalog top tolerance (px) for upward exits
    pub catalog_top_tolerance: f64,
    /// Featured bottom line tolerance (px) for upward exits
    pub featured_line_tolerance: f64,

    /// Smooth scroll duration bounds (ms)
    pub scroll_min_ms: f64,
    pub scroll_max_ms: f64,
    /// Extra duration per pixel of distance
    pub scroll_ms_per_px: f64,
    /// Cap on the distance-dependent extra duration (ms)
    pub scroll_distance_cap_ms: f64,

    /// Marker line position as a share of the viewport height
    pub quick_nav_marker: f64,
    /// Settle window (ms) after a quick-nav jump lands
    pub quick_nav_settle_ms: f64,
    /// Duration hint (ms) for quick-nav jumps
    pub quick_nav_duration_ms: f64,
}

impl Default for PageTuning {
    fn default() -> Self {
        Self {
            header_offset: 72.0,
            snap_min_viewport_width: 1200.0,
            snap_min_wheel_delta: 12.0,
            snap_lock_ms: 380.0,
            snap_reversal_ms: 90.0,
            snap_edge_threshold: 24.0,
            section_dedupe_px: 8.0,
            section_marker_slack: 2.0,
            snap_duration_ms: 260.0,
            about_catch_px: 26.0,
            about_zone_slack: 10.0,
            about_duration_ms: 240.0,
            catalog_top_tolerance: 14.0,
            featured_line_tolerance: 22.0,

            scroll_min_ms: 320.0,
            scroll_max_ms: 980.0,
            scroll_ms_per_px: 0.15,
            scroll_distance_cap_ms: 280.0,

            quick_nav_marker: 0.42,
            quick_nav_settle_ms: 300.0,
            quick_nav_duration_ms: 760.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub carousel: CarouselTuning,
    pub page: PageTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let c = &self.carousel;
        if c.repeat < 3 {
            return Err(TuningError::OutOfRange {
                field: "carousel.repeat",
                requirement: "at least 3",
                value: c.repeat as f64,
            });
        }
        positive("carousel.max_velocity", c.max_velocity)?;
        positive("carousel.min_velocity", c.min_velocity)?;
        if c.min_velocity >= c.max_velocity {
            return Err(TuningError::OutOfRange {
                field: "carousel.min_velocity",
                requirement: "below max_velocity",
                value: c.min_velocity,
            });
        }
        if !(c.decay_per_frame > 0.0 && c.decay_per_frame < 1.0) {
            return Err(TuningError::OutOfRange {
                field: "carousel.decay_per_frame",
                requirement: "strictly between 0 and 1",
                value: c.decay_per_frame,
            });
        }
        positive("carousel.glide_min_ms", c.glide_min_ms)?;
        if c.glide_max_ms < c.glide_min_ms {
            return Err(TuningError::OutOfRange {
                field: "carousel.glide_max_ms",
                requirement: "at least glide_min_ms",
                value: c.glide_max_ms,
            });
        }
        positive("carousel.boost_cap", c.boost_cap)?;
        positive("carousel.drag_threshold_px", c.drag_threshold_px)?;

        let p = &self.page;
        positive("page.scroll_min_ms", p.scroll_min_ms)?;
        if p.scroll_max_ms < p.scroll_min_ms {
            return Err(TuningError::OutOfRange {
                field: "page.scroll_max_ms",
                requirement: "at least scroll_min_ms",
                value: p.scroll_max_ms,
            });
        }
        if !(0.0..=1.0).contains(&p.quick_nav_marker) {
            return Err(TuningError::OutOfRange {
                field: "page.quick_nav_marker",
                requirement: "between 0 and 1",
                value: p.quick_nav_marker,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            requirement: "positive",
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "carousel": { "max_velocity": 4.0 } }"#).unwrap();
        assert_eq!(tuning.carousel.max_velocity, 4.0);
        assert_eq!(tuning.carousel.repeat, 5);
        assert_eq!(tuning.page.header_offset, 72.0);
    }

    #[test]
    fn test_rejects_small_repeat() {
        let err = Tuning::from_json(r#"{ "carousel": { "repeat": 2 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "carousel.repeat",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_runaway_decay() {
        let err = Tuning::from_json(r#"{ "carousel": { "decay_per_frame": 1.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("decay_per_frame"));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(TuningError::Json(_))
        ));
    }
}
