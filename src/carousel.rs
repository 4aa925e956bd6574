//! Featured carousel controller
//!
//! Owns every piece of carousel state: the looped track, the scroll offset,
//! inertia, the glide in flight, the input rhythm, the drag session and all
//! pending frame/timer handles. The host feeds it input events and calls
//! [`CarouselController::pump`] once per animation frame, then reads back the
//! offset, the visual feedback and any emitted events.

use crate::consts::{MAX_INTENSITY, NEGLIGIBLE_DISTANCE, REFERENCE_FRAME_MS};
use crate::dock::{self, DockContext, DockDecision};
use crate::input::{
    DragSession, Key, KeyAction, KeyContext, PRIMARY_BUTTON, PointerDown, PointerSample,
    WheelInput, cycle_index, route_key,
};
use crate::motion::{
    GlideCompletion, GlideController, GlideOptions, GlideStart, ImpulseMode, ImpulseOutcome,
    Inertia, InputRhythm,
};
use crate::platform::{Scheduler, StepHandle};
use crate::settings::Settings;
use crate::sign;
use crate::track::{CardId, FeaturedCard, LoopedTrack, TrackGeometry, nearest_cycle};
use crate::tuning::CarouselTuning;

/// Extra delay before docking after a drag release
const RELEASE_DOCK_DELAY_MS: f64 = 40.0;
/// Extra delay before docking after arrow navigation
const ARROW_DOCK_DELAY_MS: f64 = 50.0;
/// Added to the shortest glide for arrow moves
const ARROW_MIN_EXTRA_MS: f64 = 56.0;
/// Added to the shortest glide for wheel moves
const WHEEL_EXTRA_MS: f64 = 60.0;
/// Drag speed (px/ms) that maps to full plasma
const DRAG_PLASMA_SPEED: f64 = 0.95;

/// What the carousel is doing
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// A pointer owns the offset
    Dragging(DragSession),
    /// An eased glide is in flight (inertia may drift alongside)
    Gliding,
    /// Only momentum is moving the track
    Inertial,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dragging(_) => "dragging",
            Phase::Gliding => "gliding",
            Phase::Inertial => "inertial",
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Phase::Dragging(_))
    }
}

#[derive(Debug)]
enum PhaseEvent {
    Press(DragSession),
    Release,
    /// Glide or inertia started or stopped
    MotionChanged,
    Dispose,
}

/// Intents for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEvent {
    /// A card was clicked (not dragged)
    OpenCard { id: CardId, slot: usize },
}

/// Presentation-only output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualFeedback {
    /// 0..=1.6 motion glow, written to `--plasma-power`
    pub plasma_power: f64,
    /// Direction of the arrow button currently pulsing
    pub arrow_pulse: Option<i32>,
}

impl VisualFeedback {
    pub fn plasma_hot(&self) -> bool {
        self.plasma_power > crate::consts::HOT_INTENSITY
    }
}

/// What an arrow press decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationPlan {
    pub target_slot: usize,
    /// Full distance to the target center
    pub distance: f64,
    /// Part covered by the glide
    pub glide_distance: f64,
    pub glide_duration_ms: f64,
    pub boost: f64,
    /// Velocity seeded to drift the remainder
    pub impulse: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    InertiaFrame,
    GlideFrame,
    Dock,
    PlasmaCooldown,
}

pub struct CarouselController<G: TrackGeometry> {
    track: LoopedTrack,
    geometry: G,
    tuning: CarouselTuning,
    settings: Settings,
    default_center: Option<String>,

    offset: f64,
    phase: Phase,
    inertia: Inertia,
    glide: GlideController,
    rhythm: InputRhythm,
    /// Slot the current arrow glide is heading to
    nav_slot: Option<usize>,
    last_motion_ms: f64,
    feedback: VisualFeedback,
    events: Vec<CarouselEvent>,

    scheduler: Scheduler<Task>,
    inertia_frame: Option<StepHandle>,
    glide_frame: Option<StepHandle>,
    dock_timer: Option<StepHandle>,
    plasma_timer: Option<StepHandle>,

    disposed: bool,
}

impl<G: TrackGeometry> CarouselController<G> {
    pub fn new(cards: Vec<FeaturedCard>, geometry: G, tuning: CarouselTuning, settings: Settings) -> Self {
        let track = LoopedTrack::new(cards, tuning.repeat);
        Self {
            track,
            geometry,
            tuning,
            settings,
            default_center: None,
            offset: 0.0,
            phase: Phase::Idle,
            inertia: Inertia::new(),
            glide: GlideController::new(),
            rhythm: InputRhythm::new(),
            nav_slot: None,
            last_motion_ms: 0.0,
            feedback: VisualFeedback::default(),
            events: Vec::new(),
            scheduler: Scheduler::new(),
            inertia_frame: None,
            glide_frame: None,
            dock_timer: None,
            plasma_timer: None,
            disposed: false,
        }
    }

    /// Card to center on first mount
    pub fn with_default_center(mut self, id: impl Into<String>) -> Self {
        self.default_center = Some(id.into());
        self
    }

    // ---- lifecycle ----

    /// Center the default card immediately
    pub fn start(&mut self, now_ms: f64) {
        if self.disposed {
            return;
        }
        self.last_motion_ms = now_ms;
        self.recenter();
    }

    /// Cancel every pending frame and timer. The controller ignores all
    /// further input.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.cancel_slot(&mut self.inertia_frame);
        self.scheduler.cancel_slot(&mut self.glide_frame);
        self.scheduler.cancel_slot(&mut self.dock_timer);
        self.scheduler.cancel_slot(&mut self.plasma_timer);
        self.scheduler.clear();
        self.glide.cancel();
        self.inertia.stop();
        self.nav_slot = None;
        self.feedback = VisualFeedback::default();
        self.transition(PhaseEvent::Dispose);
        self.disposed = true;
        log::info!("Featured carousel disposed");
    }

    /// Run due timers, then the frame steps requested so far
    pub fn pump(&mut self, now_ms: f64) {
        if self.disposed {
            return;
        }
        for (handle, task) in self.scheduler.take_due(now_ms) {
            self.run_task(handle, task, now_ms);
        }
        for (handle, task) in self.scheduler.take_frames() {
            self.run_task(handle, task, now_ms);
        }
    }

    /// Layout changed (resize, images loaded). Motion stops and the default
    /// card is centered again without animation.
    pub fn set_geometry(&mut self, geometry: G, now_ms: f64) {
        self.geometry = geometry;
        if self.disposed {
            return;
        }
        self.scheduler.cancel_slot(&mut self.dock_timer);
        self.clear_arrow_pulse();
        self.cancel_glide();
        self.stop_inertia();
        self.nav_slot = None;
        self.rhythm.reset();
        if self.phase.is_dragging() {
            // The drag's start offset no longer matches the layout
            self.transition(PhaseEvent::Release);
        }
        self.last_motion_ms = now_ms;
        self.recenter();
    }

    /// Apply new preferences; switching reduced motion on lands any glide at once
    pub fn set_settings(&mut self, settings: Settings) {
        let entering_reduced = settings.reduced_motion && !self.settings.reduced_motion;
        self.settings = settings;
        if !entering_reduced || self.disposed {
            return;
        }
        self.stop_inertia();
        if let Some(glide) = self.glide.state().copied() {
            self.glide.cancel();
            self.scheduler.cancel_slot(&mut self.glide_frame);
            self.offset = glide.to;
            self.rewrap();
            self.transition(PhaseEvent::MotionChanged);
            self.finish_glide(glide.on_complete, self.last_motion_ms);
        }
    }

    // ---- queries ----

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn velocity(&self) -> f64 {
        self.inertia.velocity()
    }

    pub fn feedback(&self) -> VisualFeedback {
        self.feedback
    }

    pub fn track(&self) -> &LoopedTrack {
        &self.track
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Card nearest the viewport center
    pub fn centered_card(&self) -> Option<&CardId> {
        self.track
            .closest_slot(&self.geometry, self.offset)
            .and_then(|slot| self.track.slot(slot))
            .map(|slot| slot.id)
    }

    /// Card next to `current` in `direction`, wrapping at either end. An
    /// unknown id steps from the first card.
    pub fn adjacent_card(&self, current: &str, direction: i32) -> Option<&CardId> {
        let index = cycle_index(self.track.len(), self.track.index_of(current), direction)?;
        self.track.cards().get(index).map(|card| &card.id)
    }

    /// A frame step is pending
    pub fn wants_frame(&self) -> bool {
        self.scheduler.has_frames()
    }

    /// Earliest pending timer
    pub fn next_deadline(&self) -> Option<f64> {
        self.scheduler.next_deadline()
    }

    /// Nothing scheduled: the track is at rest
    pub fn is_quiet(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn drain_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- pointer ----

    /// Returns `true` when the press starts a gesture (host captures the pointer)
    pub fn pointer_down(&mut self, down: PointerDown, now_ms: f64) -> bool {
        if self.disposed || down.button != PRIMARY_BUTTON || down.on_control || self.phase.is_dragging() {
            return false;
        }
        self.last_motion_ms = now_ms;
        self.scheduler.cancel_slot(&mut self.dock_timer);
        self.clear_arrow_pulse();
        self.cancel_glide();
        self.stop_inertia();
        self.nav_slot = None;
        self.set_plasma(0.0);

        let session = DragSession::begin(&down, self.offset, now_ms);
        self.transition(PhaseEvent::Press(session));
        true
    }

    /// Returns `true` when native scrolling should be suppressed
    pub fn pointer_move(&mut self, sample: PointerSample, now_ms: f64) -> bool {
        if self.disposed {
            return false;
        }
        let update = match &mut self.phase {
            Phase::Dragging(session) if session.owns(sample.pointer_id) => {
                session.update(sample.position, now_ms, &self.tuning)
            }
            _ => return false,
        };
        self.offset = update.offset;
        self.rewrap();
        if let Some(velocity) = update.velocity {
            self.set_plasma((velocity.abs() / DRAG_PLASMA_SPEED).min(MAX_INTENSITY));
        }
        self.note_motion(now_ms);
        update.prevent_default
    }

    /// Finish a gesture: a click opens the pressed card, a drag seeds inertia
    pub fn pointer_up(&mut self, sample: PointerSample, now_ms: f64) {
        if self.disposed || !self.owns_drag(sample.pointer_id) {
            return;
        }
        let Some(session) = self.transition(PhaseEvent::Release) else {
            return;
        };

        if !session.moved {
            self.set_plasma(0.0);
            if let Some(slot) = session.pressed_slot {
                self.open_card(slot);
            }
        } else if session.velocity.abs() > self.tuning.drag_release_min_velocity {
            let impulse =
                session.velocity * self.tuning.drag_release_multiplier * session.flick_boost(&self.tuning);
            self.apply_impulse(impulse, ImpulseMode::Replace, now_ms);
        } else {
            self.set_plasma(0.0);
        }
        self.arm_dock(now_ms, self.tuning.dock_idle_ms + RELEASE_DOCK_DELAY_MS);
    }

    /// Gesture aborted by the browser; never counts as a click
    pub fn pointer_cancel(&mut self, pointer_id: i32, now_ms: f64) {
        if self.disposed || !self.owns_drag(pointer_id) {
            return;
        }
        self.transition(PhaseEvent::Release);
        self.set_plasma(0.0);
        self.arm_dock(now_ms, self.tuning.dock_idle_ms + RELEASE_DOCK_DELAY_MS);
    }

    fn owns_drag(&self, pointer_id: i32) -> bool {
        matches!(&self.phase, Phase::Dragging(session) if session.owns(pointer_id))
    }

    fn open_card(&mut self, slot: usize) {
        if let Some(card) = self.track.slot(slot) {
            log::debug!("Open card {} from slot {}", card.id, slot);
            self.events.push(CarouselEvent::OpenCard {
                id: card.id.clone(),
                slot,
            });
        }
    }

    // ---- wheel ----

    /// Wheel over the track. Returns `true` when the event was consumed.
    pub fn wheel(&mut self, input: WheelInput, page_height: f64, now_ms: f64) -> bool {
        if self.disposed || self.track.is_empty() || self.phase.is_dragging() {
            return false;
        }
        self.last_motion_ms = now_ms;
        self.scheduler.cancel_slot(&mut self.dock_timer);

        let pixels = input.pixel_delta(page_height);
        let boost = self.rhythm.register(now_ms, &self.tuning);
        let extra = boost - 1.0;

        let share = if self.settings.reduced_motion {
            1.0
        } else {
            self.tuning.wheel_glide_share + (extra * 0.22).min(0.42)
        };
        self.glide_by(
            pixels * share,
            self.tuning.glide_min_ms + WHEEL_EXTRA_MS,
            GlideOptions::default(),
            now_ms,
        );

        let per_pixel = self.tuning.wheel_impulse_base + (extra * 0.0011).min(0.0032);
        self.apply_impulse(-pixels * per_pixel, ImpulseMode::Add, now_ms);
        if self.settings.reduced_motion {
            self.arm_dock(now_ms, self.tuning.dock_idle_ms);
        }
        true
    }

    // ---- keyboard / arrows ----

    /// Route a key press; featured arrows are handled here, the rest is
    /// returned for the host to act on
    pub fn key(&mut self, key: Key, ctx: KeyContext, now_ms: f64) -> KeyAction {
        let action = route_key(key, ctx);
        match action {
            KeyAction::Featured(direction) => {
                if !self.settings.keyboard_navigation {
                    return KeyAction::Ignore;
                }
                self.scroll_featured(direction, now_ms);
                action
            }
            other => other,
        }
    }

    /// Move to the adjacent logical card. Quick repeats chain from the
    /// pending target and grow faster.
    pub fn scroll_featured(&mut self, direction: i32, now_ms: f64) -> Option<NavigationPlan> {
        if self.disposed || self.track.is_empty() || self.phase.is_dragging() || direction == 0 {
            return None;
        }
        let direction = direction.signum();
        self.last_motion_ms = now_ms;
        self.scheduler.cancel_slot(&mut self.dock_timer);
        self.rewrap();

        let pending = self.nav_slot.filter(|_| self.glide.is_active());
        let (reference, reference_offset) = match pending {
            Some(slot) => (slot, self.track.center_offset(&self.geometry, slot)?),
            None => (self.track.closest_slot(&self.geometry, self.offset)?, self.offset),
        };
        let target_slot = self.track.equivalent_slot(reference as isize + direction as isize)?;
        let target_offset = self.track.center_offset(&self.geometry, target_slot)?;
        let segment = self.track.segment_width(&self.geometry).unwrap_or(0.0);
        let distance = nearest_cycle(target_offset - reference_offset, segment);
        if distance.abs() < NEGLIGIBLE_DISTANCE {
            return None;
        }

        let boost = self.rhythm.register(now_ms, &self.tuning);
        let extra = boost - 1.0;
        let glide_distance = if self.settings.reduced_motion {
            distance
        } else {
            distance * self.tuning.arrow_glide_share
        };
        let glide_duration_ms = (180.0 + distance.abs() * 0.12 - (extra * 24.0).min(80.0))
            .clamp(self.tuning.glide_min_ms + ARROW_MIN_EXTRA_MS, self.tuning.glide_max_ms);

        self.ignite_arrow_pulse(direction, now_ms);
        self.nav_slot = Some(target_slot);
        self.glide_by(
            glide_distance,
            glide_duration_ms,
            GlideOptions::looping().then(GlideCompletion::ArrowSettled),
            now_ms,
        );

        let residual = distance - glide_distance;
        let impulse = if residual.abs() < f64::EPSILON {
            0.0
        } else {
            let drift = residual.abs() * (1.0 - self.tuning.decay_per_frame) / REFERENCE_FRAME_MS;
            let lift = 1.0 + (extra * 0.2).min(0.35);
            -sign(residual) * (drift * lift).min(self.tuning.arrow_impulse_cap)
        };
        if impulse != 0.0 {
            self.apply_impulse(impulse, ImpulseMode::Add, now_ms);
        }
        self.arm_dock(now_ms, self.tuning.dock_idle_ms + ARROW_DOCK_DELAY_MS);

        log::debug!(
            "Arrow {:+} -> slot {} (distance {:.1}, boost {:.2})",
            direction,
            target_slot,
            distance,
            boost
        );
        Some(NavigationPlan {
            target_slot,
            distance,
            glide_distance,
            glide_duration_ms,
            boost,
            impulse,
        })
    }

    // ---- native scrolling ----

    /// The host saw the container scroll. Reports matching the current
    /// offset are echoes of our own writes and are ignored. Returns `true`
    /// when the offset was adopted.
    pub fn on_native_scroll(&mut self, offset: f64, now_ms: f64) -> bool {
        if self.disposed || !offset.is_finite() || (offset - self.offset).abs() <= NEGLIGIBLE_DISTANCE {
            return false;
        }
        self.offset = offset;
        self.rewrap();
        self.note_motion(now_ms);
        true
    }

    // ---- internals ----

    fn run_task(&mut self, handle: StepHandle, task: Task, now_ms: f64) {
        let slot = match task {
            Task::InertiaFrame => &mut self.inertia_frame,
            Task::GlideFrame => &mut self.glide_frame,
            Task::Dock => &mut self.dock_timer,
            Task::PlasmaCooldown => &mut self.plasma_timer,
        };
        if *slot != Some(handle) {
            return;
        }
        *slot = None;
        match task {
            Task::InertiaFrame => self.inertia_step(now_ms),
            Task::GlideFrame => self.glide_step(now_ms),
            Task::Dock => self.dock_check(now_ms),
            Task::PlasmaCooldown => self.plasma_cooldown(),
        }
    }

    /// The only place `phase` changes. Returns the drag session when one ends.
    fn transition(&mut self, event: PhaseEvent) -> Option<DragSession> {
        let next = match event {
            PhaseEvent::Press(session) => Phase::Dragging(session),
            PhaseEvent::Release => self.resting_phase(),
            PhaseEvent::MotionChanged => {
                if self.phase.is_dragging() {
                    return None;
                }
                self.resting_phase()
            }
            PhaseEvent::Dispose => Phase::Idle,
        };
        let previous = std::mem::replace(&mut self.phase, next);
        if previous.name() != self.phase.name() {
            log::debug!("Carousel {} -> {}", previous.name(), self.phase.name());
        }
        match previous {
            Phase::Dragging(session) if !self.phase.is_dragging() => Some(session),
            _ => None,
        }
    }

    fn resting_phase(&self) -> Phase {
        if self.glide.is_active() {
            Phase::Gliding
        } else if self.inertia.is_running() {
            Phase::Inertial
        } else {
            Phase::Idle
        }
    }

    fn recenter(&mut self) {
        let Some(base) = self.track.default_center(self.default_center.as_deref()) else {
            return;
        };
        let Some(slot) = self.track.canonical_slot(base) else {
            return;
        };
        if let Some(offset) = self.track.center_offset(&self.geometry, slot) {
            self.offset = offset;
            self.rewrap();
            self.set_plasma(0.0);
            log::info!("Featured carousel centered on slot {} at {:.1}", slot, self.offset);
        } else {
            log::debug!("Featured carousel not laid out yet; centering deferred");
        }
    }

    /// Keep the offset inside the safe zone, carrying dependent state along
    fn rewrap(&mut self) {
        let shift = self.track.wrap_delta(&self.geometry, self.offset);
        if shift == 0.0 {
            return;
        }
        self.offset += shift;
        if let Some(glide) = self.glide.state_mut() {
            glide.shift(shift);
        }
        if let Phase::Dragging(session) = &mut self.phase {
            session.start_offset += shift;
        }
        if let (Some(slot), Some(segment)) = (self.nav_slot, self.track.segment_width(&self.geometry)) {
            let cycles = (shift / segment).round() as isize;
            self.nav_slot = self
                .track
                .equivalent_slot(slot as isize + cycles * self.track.len() as isize);
        }
        log::trace!("Track wrapped by {:.1}", shift);
    }

    /// Record motion and push the dock check back
    fn note_motion(&mut self, now_ms: f64) {
        self.last_motion_ms = now_ms;
        self.arm_dock(now_ms, self.tuning.dock_idle_ms);
    }

    fn arm_dock(&mut self, now_ms: f64, delay_ms: f64) {
        self.scheduler.cancel_slot(&mut self.dock_timer);
        self.dock_timer = Some(self.scheduler.set_timeout(Task::Dock, now_ms, delay_ms));
    }

    fn set_plasma(&mut self, power: f64) {
        self.feedback.plasma_power = power.clamp(0.0, MAX_INTENSITY);
    }

    /// Drop the glow unless an arrow pulse still holds it
    fn release_plasma(&mut self) {
        if self.feedback.arrow_pulse.is_none() {
            self.set_plasma(0.0);
        }
    }

    fn ignite_arrow_pulse(&mut self, direction: i32, now_ms: f64) {
        self.feedback.arrow_pulse = Some(direction);
        self.set_plasma(self.tuning.arrow_plasma_power);
        self.scheduler.cancel_slot(&mut self.plasma_timer);
        self.plasma_timer = Some(
            self.scheduler
                .set_timeout(Task::PlasmaCooldown, now_ms, self.tuning.arrow_plasma_ms),
        );
    }

    fn clear_arrow_pulse(&mut self) {
        self.scheduler.cancel_slot(&mut self.plasma_timer);
        self.feedback.arrow_pulse = None;
    }

    fn plasma_cooldown(&mut self) {
        self.feedback.arrow_pulse = None;
        let moving = self.phase.is_dragging()
            || self.glide.is_active()
            || self.inertia.velocity().abs() >= self.tuning.dock_velocity_eps;
        if !moving {
            self.set_plasma(0.0);
        }
    }

    fn apply_impulse(&mut self, impulse: f64, mode: ImpulseMode, now_ms: f64) {
        if self.settings.reduced_motion {
            return;
        }
        match self.inertia.apply_impulse(impulse, mode, now_ms, &self.tuning) {
            ImpulseOutcome::Negligible => {
                if !self.inertia.is_running() {
                    self.release_plasma();
                }
            }
            ImpulseOutcome::Started => {
                self.scheduler.cancel_slot(&mut self.inertia_frame);
                self.inertia_frame = Some(self.scheduler.request_frame(Task::InertiaFrame));
                self.transition(PhaseEvent::MotionChanged);
            }
            ImpulseOutcome::Updated => {}
        }
    }

    fn stop_inertia(&mut self) {
        self.scheduler.cancel_slot(&mut self.inertia_frame);
        if self.inertia.is_running() || self.inertia.velocity() != 0.0 {
            self.inertia.stop();
            self.transition(PhaseEvent::MotionChanged);
        }
    }

    fn inertia_step(&mut self, now_ms: f64) {
        let Some(frame) = self.inertia.step(now_ms, &self.tuning) else {
            return;
        };
        self.offset += frame.delta;
        if let Some(glide) = self.glide.state_mut() {
            glide.shift(frame.delta);
        }
        self.rewrap();
        self.note_motion(now_ms);

        if frame.stopped {
            self.release_plasma();
            self.transition(PhaseEvent::MotionChanged);
        } else {
            let power = match self.feedback.arrow_pulse {
                Some(_) => frame.intensity.max(self.tuning.arrow_plasma_power),
                None => frame.intensity,
            };
            self.set_plasma(power);
            self.inertia_frame = Some(self.scheduler.request_frame(Task::InertiaFrame));
        }
    }

    /// Start or re-target a glide; reduced motion applies it at once
    fn glide_by(&mut self, distance: f64, duration_hint_ms: f64, options: GlideOptions, now_ms: f64) {
        let start = self.glide.glide_by(
            self.offset,
            distance,
            duration_hint_ms,
            options,
            now_ms,
            self.settings.reduced_motion,
            &self.tuning,
        );
        match start {
            GlideStart::Ignored => {}
            GlideStart::Started { .. } | GlideStart::Retargeted { .. } => {
                if self.glide_frame.is_none() {
                    self.glide_frame = Some(self.scheduler.request_frame(Task::GlideFrame));
                }
                self.transition(PhaseEvent::MotionChanged);
            }
            GlideStart::Instant { offset, completion } => {
                self.scheduler.cancel_slot(&mut self.glide_frame);
                self.offset = offset;
                self.rewrap();
                self.transition(PhaseEvent::MotionChanged);
                self.finish_glide(completion, now_ms);
            }
        }
    }

    fn cancel_glide(&mut self) {
        self.scheduler.cancel_slot(&mut self.glide_frame);
        if self.glide.is_active() {
            self.glide.cancel();
            self.transition(PhaseEvent::MotionChanged);
        }
    }

    fn glide_step(&mut self, now_ms: f64) {
        let Some(frame) = self.glide.step(now_ms) else {
            return;
        };
        self.offset = frame.offset;
        if frame.keep_looping {
            self.rewrap();
        }
        self.note_motion(now_ms);

        match frame.finished {
            None => {
                self.glide_frame = Some(self.scheduler.request_frame(Task::GlideFrame));
            }
            Some(completion) => {
                self.transition(PhaseEvent::MotionChanged);
                self.finish_glide(completion, now_ms);
            }
        }
    }

    fn finish_glide(&mut self, completion: GlideCompletion, now_ms: f64) {
        match completion {
            GlideCompletion::None => {}
            GlideCompletion::ArrowSettled => {
                self.nav_slot = None;
            }
            GlideCompletion::DockCorrection { slot } => {
                let Some(error) = self.dock_error(slot) else {
                    self.release_plasma();
                    return;
                };
                if error.abs() <= self.tuning.dock_correction_px {
                    self.settle_at(slot);
                    return;
                }
                log::debug!("Dock landed {:.2}px off slot {}; correcting", error, slot);
                self.glide_by(
                    error,
                    dock::correction_duration(error),
                    GlideOptions::looping().then(GlideCompletion::DockSettle { slot }),
                    now_ms,
                );
            }
            GlideCompletion::DockSettle { slot } => {
                match self.dock_error(slot) {
                    Some(error) if error.abs() <= self.tuning.dock_correction_px => self.settle_at(slot),
                    _ => self.release_plasma(),
                }
            }
        }
    }

    /// Short-way distance from the offset to a slot's center
    fn dock_error(&self, slot: usize) -> Option<f64> {
        let center = self.track.center_offset(&self.geometry, slot)?;
        let segment = self.track.segment_width(&self.geometry).unwrap_or(0.0);
        Some(nearest_cycle(center - self.offset, segment))
    }

    /// Snap exactly onto a slot's center. When the track sits on another
    /// copy of the same card the jump is a whole number of cycles.
    fn settle_at(&mut self, slot: usize) {
        if let Some(center) = self.track.center_offset(&self.geometry, slot) {
            self.offset = center;
            self.rewrap();
        }
        self.release_plasma();
    }

    fn dock_check(&mut self, now_ms: f64) {
        let ctx = DockContext {
            now_ms,
            last_motion_ms: self.last_motion_ms,
            dragging: self.phase.is_dragging(),
            gliding: self.glide.is_active(),
            velocity: self.inertia.velocity(),
        };
        match dock::evaluate(&ctx, &self.tuning) {
            DockDecision::Rearm { delay_ms } => self.arm_dock(now_ms, delay_ms),
            DockDecision::Dock => self.dock(now_ms),
        }
    }

    /// Glide the nearest card's middle copy into the center
    fn dock(&mut self, now_ms: f64) {
        self.stop_inertia();
        self.rewrap();
        let Some(closest) = self.track.closest_slot(&self.geometry, self.offset) else {
            return;
        };
        let Some(target) = self
            .track
            .base_index(closest)
            .and_then(|base| self.track.canonical_slot(base))
        else {
            return;
        };
        let Some(distance) = self.dock_error(target) else {
            return;
        };
        if distance.abs() <= self.tuning.dock_min_distance {
            self.settle_at(target);
            return;
        }

        let duration = dock::dock_duration(distance, &self.tuning);
        log::debug!("Docking to slot {} over {:.1}px", target, distance);
        self.set_plasma(dock::dock_plasma(distance));
        self.glide_by(
            distance,
            duration,
            GlideOptions::looping().then(GlideCompletion::DockCorrection { slot: target }),
            now_ms,
        );
    }
}
