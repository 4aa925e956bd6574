//! Featured Orbit - looping carousel and section-snap scroll engine
//!
//! Core modules:
//! - `track`: Looped track model (render slots, wrapping, closest card)
//! - `motion`: Inertia, eased glides and input rhythm
//! - `input`: Pointer drag, wheel and keyboard adapters
//! - `dock`: Idle-docking guards and timings
//! - `carousel`: The controller that owns all carousel state
//! - `page`: Section snapping, smooth page scroll, quick-nav tracking, tilt
//! - `platform`: Frame/timer scheduler and clocks
//! - `tuning`: Data-driven motion constants
//! - `settings`: User preferences

pub mod carousel;
pub mod dock;
pub mod input;
pub mod motion;
pub mod page;
pub mod platform;
pub mod settings;
pub mod track;
pub mod tuning;

pub use carousel::{CarouselController, CarouselEvent, Phase, VisualFeedback};
pub use settings::Settings;
pub use track::{CardId, FeaturedCard, LoopedTrack, TrackGeometry, UniformTrack};
pub use tuning::{CarouselTuning, PageTuning, Tuning, TuningError};

/// Engine-wide constants that are not meant to be tuned
pub mod consts {
    /// Reference frame length (ms) used to scale per-frame decay
    pub const REFERENCE_FRAME_MS: f64 = 16.666;
    /// Frame delta used when no time has elapsed since the previous frame
    pub const FALLBACK_FRAME_MS: f64 = 16.0;
    /// Shortest frame delta fed into the integrator
    pub const MIN_FRAME_MS: f64 = 8.0;
    /// Longest frame delta fed into the integrator (tab switches, hitches)
    pub const MAX_FRAME_MS: f64 = 34.0;
    /// Upper bound for the plasma/glow intensity signal
    pub const MAX_INTENSITY: f64 = 1.6;
    /// Plasma above this is rendered "hot"
    pub const HOT_INTENSITY: f64 = 0.35;
    /// Distances below this are not worth animating
    pub const NEGLIGIBLE_DISTANCE: f64 = 0.5;
}

/// Ease-out quartic curve for glides
#[inline]
pub fn ease_out_quart(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(4)
}

/// Ease-in-out quintic curve for page scrolls
#[inline]
pub fn ease_in_out_quint(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        16.0 * t.powi(5)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
    }
}

/// Sign that treats zero as zero (unlike `f64::signum`)
#[inline]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Normalize a wheel delta to pixels for the given DOM delta mode
/// (0 = pixels, 1 = lines, 2 = pages)
#[inline]
pub fn wheel_pixels(delta: f64, delta_mode: u32, page_height: f64) -> f64 {
    match delta_mode {
        1 => delta * 16.0,
        2 => delta * page_height,
        _ => delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(ease_in_out_quint(0.0), 0.0);
        assert_eq!(ease_in_out_quint(1.0), 1.0);
        assert!((ease_in_out_quint(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ease_out_is_front_loaded() {
        // Quartic ease-out covers most of the distance in the first half
        assert!(ease_out_quart(0.5) > 0.9);
        assert!(ease_out_quart(0.25) > ease_out_quart(0.2));
    }

    #[test]
    fn test_sign_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.1), 1.0);
    }

    #[test]
    fn test_wheel_pixels_modes() {
        assert_eq!(wheel_pixels(3.0, 0, 900.0), 3.0);
        assert_eq!(wheel_pixels(3.0, 1, 900.0), 48.0);
        assert_eq!(wheel_pixels(1.0, 2, 900.0), 900.0);
    }
}
