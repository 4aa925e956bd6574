//! Carousel motion
//!
//! Pure, clock-driven motion primitives. Nothing here touches the DOM or the
//! scheduler; the carousel controller calls `step` from its frame tasks.

pub mod glide;
pub mod inertia;
pub mod rhythm;

pub use glide::{Glide, GlideCompletion, GlideController, GlideFrame, GlideOptions, GlideStart};
pub use inertia::{ImpulseMode, ImpulseOutcome, Inertia, InertiaFrame};
pub use rhythm::InputRhythm;
