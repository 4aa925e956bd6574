//! Input rhythm boost
//!
//! Repeated directional inputs in quick succession build a streak that makes
//! each following move longer and snappier.

use crate::tuning::CarouselTuning;

#[derive(Debug, Clone, Default)]
pub struct InputRhythm {
    last_input_ms: Option<f64>,
    streak: u32,
}

impl InputRhythm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Record an input at `now_ms` and return the boost multiplier (>= 1)
    pub fn register(&mut self, now_ms: f64, tuning: &CarouselTuning) -> f64 {
        let window = tuning.input_window_ms;
        self.streak = match self.last_input_ms.map(|last| now_ms - last) {
            Some(elapsed) if elapsed < window => (self.streak + 1).min(tuning.max_streak),
            Some(elapsed) if elapsed < window * tuning.input_decay_window => {
                self.streak.saturating_sub(1)
            }
            _ => 0,
        };
        self.last_input_ms = Some(now_ms);
        self.boost(tuning)
    }

    /// Boost for the current streak
    pub fn boost(&self, tuning: &CarouselTuning) -> f64 {
        (1.0 + self.streak as f64 * tuning.boost_step).min(tuning.boost_cap)
    }

    /// Forget the streak (layout reset)
    pub fn reset(&mut self) {
        self.last_input_ms = None;
        self.streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_input_has_no_boost() {
        let tuning = CarouselTuning::default();
        let mut rhythm = InputRhythm::new();
        assert_eq!(rhythm.register(1000.0, &tuning), 1.0);
    }

    #[test]
    fn test_quick_repeats_build_streak() {
        let tuning = CarouselTuning::default();
        let mut rhythm = InputRhythm::new();
        rhythm.register(0.0, &tuning);
        let second = rhythm.register(100.0, &tuning);
        let third = rhythm.register(200.0, &tuning);
        assert!(second > 1.0);
        assert!(third > second);
        assert_eq!(rhythm.streak(), 2);
    }

    #[test]
    fn test_boost_capped() {
        let tuning = CarouselTuning::default();
        let mut rhythm = InputRhythm::new();
        let mut boost = 0.0;
        for i in 0..40 {
            boost = rhythm.register(i as f64 * 50.0, &tuning);
        }
        assert_eq!(rhythm.streak(), 16);
        assert_eq!(boost, 3.1);
    }

    #[test]
    fn test_slow_inputs_decay_then_reset() {
        let tuning = CarouselTuning::default();
        let mut rhythm = InputRhythm::new();
        for i in 0..4 {
            rhythm.register(i as f64 * 100.0, &tuning);
        }
        assert_eq!(rhythm.streak(), 3);
        // Inside the wider window: decays by one
        rhythm.register(300.0 + 500.0, &tuning);
        assert_eq!(rhythm.streak(), 2);
        // Long pause: reset
        rhythm.register(5000.0, &tuning);
        assert_eq!(rhythm.streak(), 0);
    }

    #[test]
    fn test_reset_forgets_streak() {
        let tuning = CarouselTuning::default();
        let mut rhythm = InputRhythm::new();
        rhythm.register(0.0, &tuning);
        rhythm.register(100.0, &tuning);
        rhythm.reset();
        assert_eq!(rhythm.streak(), 0);
        // The next input is a first input again, however soon it comes
        assert_eq!(rhythm.register(150.0, &tuning), 1.0);
    }
}
