//! Millisecond clocks

use std::cell::Cell;

/// Source of monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Manually advanced clock for deterministic tests and the native demo
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Cell<f64>,
}

impl FakeClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward and return the new time
    pub fn advance(&self, ms: f64) -> f64 {
        let next = self.now.get() + ms.max(0.0);
        self.now.set(next);
        next
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// `performance.now()` clock
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceClock;

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_clock_never_goes_back() {
        let clock = FakeClock::new(100.0);
        assert_eq!(clock.advance(16.0), 116.0);
        assert_eq!(clock.advance(-50.0), 116.0);
        assert_eq!(clock.now_ms(), 116.0);
    }
}
