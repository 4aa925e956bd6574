//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (performance.now() on web, a fake clock in tests and demos)
//! - Animation frames and timeouts (cooperative, handle-based scheduler)

pub mod clock;
pub mod scheduler;

pub use clock::{Clock, FakeClock};
pub use scheduler::{Scheduler, StepHandle};
