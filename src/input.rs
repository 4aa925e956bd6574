//! Input adapters
//!
//! Platform-neutral pointer, wheel and keyboard inputs. The browser host
//! fills these from DOM events; the carousel turns them into impulses and
//! glides.

use glam::DVec2;

use crate::tuning::CarouselTuning;
use crate::wheel_pixels;

/// Primary mouse button / touch contact / pen tip
pub const PRIMARY_BUTTON: i16 = 0;

/// Pointer press on the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub pointer_id: i32,
    pub button: i16,
    pub position: DVec2,
    /// The press started on a button, link or form control inside a card
    pub on_control: bool,
    /// Render slot of the card under the pointer, if any
    pub slot: Option<usize>,
}

/// Pointer move or release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: i32,
    pub position: DVec2,
}

/// Raw wheel input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    /// DOM delta mode: 0 pixels, 1 lines, 2 pages
    pub delta_mode: u32,
}

impl WheelInput {
    pub fn pixels(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            delta_mode: 0,
        }
    }

    /// Dominant delta, horizontal winning only when strictly larger
    pub fn dominant_delta(&self) -> f64 {
        if self.delta_x.abs() > self.delta_y.abs() {
            self.delta_x
        } else {
            self.delta_y
        }
    }

    /// Dominant delta converted to pixels
    pub fn pixel_delta(&self, page_height: f64) -> f64 {
        wheel_pixels(self.dominant_delta(), self.delta_mode, page_height)
    }
}

/// Keys the storefront reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }

    fn direction(self) -> Option<i32> {
        match self {
            Key::ArrowLeft => Some(-1),
            Key::ArrowRight => Some(1),
            _ => None,
        }
    }
}

/// Where keyboard focus and overlays are when a key arrives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Focus is in an input, textarea or select
    pub in_text_field: bool,
    /// The card detail view is open
    pub detail_open: bool,
    /// Any other overlay (quick view, cart, compare, manufacturer) is open
    pub other_overlay_open: bool,
}

/// What a key press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move the featured carousel by one card
    Featured(i32),
    /// Show the previous/next card in the open detail view
    Detail(i32),
    /// Close the topmost overlay
    CloseOverlay,
    Ignore,
}

/// Route a key press
pub fn route_key(key: Key, ctx: KeyContext) -> KeyAction {
    if ctx.in_text_field {
        return KeyAction::Ignore;
    }
    if key == Key::Escape {
        return if ctx.detail_open || ctx.other_overlay_open {
            KeyAction::CloseOverlay
        } else {
            KeyAction::Ignore
        };
    }
    let Some(direction) = key.direction() else {
        return KeyAction::Ignore;
    };
    if ctx.detail_open {
        KeyAction::Detail(direction)
    } else if ctx.other_overlay_open {
        KeyAction::Ignore
    } else {
        KeyAction::Featured(direction)
    }
}

/// Step through a list with wrap-around; `None` for an empty list.
/// An unknown current index starts from the first entry.
pub fn cycle_index(len: usize, current: Option<usize>, direction: i32) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let base = current.filter(|&i| i < len).unwrap_or(0) as i64;
    Some((base + direction as i64).rem_euclid(len as i64) as usize)
}

/// Result of feeding a move into a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Offset the track should show now
    pub offset: f64,
    /// The gesture is a drag; suppress native scrolling
    pub prevent_default: bool,
    /// Instantaneous speed (px/ms) if a sample was taken
    pub velocity: Option<f64>,
}

/// One press-move-release gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub pointer_id: i32,
    pub start: DVec2,
    pub start_offset: f64,
    pub last: DVec2,
    pub last_time_ms: f64,
    /// Latest sampled horizontal speed (px/ms)
    pub velocity: f64,
    /// Passed the drag threshold; a release will not count as a click
    pub moved: bool,
    /// Slot pressed, opened on a click release
    pub pressed_slot: Option<usize>,
}

impl DragSession {
    pub fn begin(down: &PointerDown, offset: f64, now_ms: f64) -> Self {
        Self {
            pointer_id: down.pointer_id,
            start: down.position,
            start_offset: offset,
            last: down.position,
            last_time_ms: now_ms,
            velocity: 0.0,
            moved: false,
            pressed_slot: down.slot,
        }
    }

    pub fn owns(&self, pointer_id: i32) -> bool {
        self.pointer_id == pointer_id
    }

    /// Track a move: classify, follow the pointer, sample velocity. Only a
    /// mostly horizontal move past the threshold turns the press into a drag.
    pub fn update(&mut self, position: DVec2, now_ms: f64, tuning: &CarouselTuning) -> DragUpdate {
        let delta = position - self.start;
        let dx = delta.x.abs();
        if dx > tuning.drag_threshold_px && dx > delta.y.abs() {
            self.moved = true;
        }

        let dt = now_ms - self.last_time_ms;
        let velocity = (dt > 0.0).then(|| (position.x - self.last.x) / dt);
        if let Some(v) = velocity {
            self.velocity = v;
        }
        self.last = position;
        self.last_time_ms = now_ms;

        DragUpdate {
            offset: self.start_offset - delta.x,
            prevent_default: self.moved,
            velocity,
        }
    }

    /// Momentum multiplier for fast releases
    pub fn flick_boost(&self, tuning: &CarouselTuning) -> f64 {
        (1.0 + (self.velocity.abs() - 0.35).max(0.0) * 0.75).min(tuning.flick_boost_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f64, y: f64) -> PointerDown {
        PointerDown {
            pointer_id: 1,
            button: PRIMARY_BUTTON,
            position: DVec2::new(x, y),
            on_control: false,
            slot: Some(3),
        }
    }

    #[test]
    fn test_small_motion_stays_a_click() {
        let tuning = CarouselTuning::default();
        let mut drag = DragSession::begin(&press(100.0, 100.0), 500.0, 0.0);
        let update = drag.update(DVec2::new(108.0, 103.0), 16.0, &tuning);
        assert!(!drag.moved);
        assert!(!update.prevent_default);
        assert_eq!(update.offset, 492.0);
    }

    #[test]
    fn test_threshold_marks_drag() {
        let tuning = CarouselTuning::default();
        let mut drag = DragSession::begin(&press(100.0, 100.0), 500.0, 0.0);
        let update = drag.update(DVec2::new(70.0, 100.0), 16.0, &tuning);
        assert!(drag.moved);
        assert!(update.prevent_default);
        assert_eq!(update.offset, 530.0);
        assert!((drag.velocity + 30.0 / 16.0).abs() < 1e-12);

        // Once a drag, always a drag
        drag.update(DVec2::new(100.0, 100.0), 32.0, &tuning);
        assert!(drag.moved);
    }

    #[test]
    fn test_vertical_motion_stays_a_click() {
        let tuning = CarouselTuning::default();
        let mut drag = DragSession::begin(&press(400.0, 200.0), 0.0, 0.0);
        let update = drag.update(DVec2::new(402.0, 214.0), 16.0, &tuning);
        assert!(!drag.moved);
        assert!(!update.prevent_default);

        // A vertical swipe past the threshold leaves the page scrolling
        let update = drag.update(DVec2::new(412.0, 260.0), 32.0, &tuning);
        assert!(!drag.moved);
        assert!(!update.prevent_default);
    }

    #[test]
    fn test_horizontal_must_dominate() {
        let tuning = CarouselTuning::default();
        let mut drag = DragSession::begin(&press(0.0, 0.0), 0.0, 0.0);
        drag.update(DVec2::new(12.0, 12.0), 16.0, &tuning);
        assert!(!drag.moved);
        drag.update(DVec2::new(-13.0, 12.0), 32.0, &tuning);
        assert!(drag.moved);
    }

    #[test]
    fn test_zero_dt_keeps_velocity() {
        let tuning = CarouselTuning::default();
        let mut drag = DragSession::begin(&press(0.0, 0.0), 0.0, 0.0);
        drag.update(DVec2::new(16.0, 0.0), 16.0, &tuning);
        let update = drag.update(DVec2::new(40.0, 0.0), 16.0, &tuning);
        assert!(update.velocity.is_none());
        assert_eq!(drag.velocity, 1.0);
    }

    #[test]
    fn test_flick_boost() {
        let tuning = CarouselTuning::default();
        let mut drag = DragSession::begin(&press(0.0, 0.0), 0.0, 0.0);
        drag.velocity = 0.2;
        assert_eq!(drag.flick_boost(&tuning), 1.0);
        drag.velocity = -1.35;
        assert!((drag.flick_boost(&tuning) - 1.75).abs() < 1e-12);
        drag.velocity = 9.0;
        assert_eq!(drag.flick_boost(&tuning), 2.15);
    }

    #[test]
    fn test_wheel_dominant_axis() {
        let wheel = WheelInput::pixels(-3.0, 40.0);
        assert_eq!(wheel.dominant_delta(), 40.0);
        let wheel = WheelInput::pixels(-50.0, 40.0);
        assert_eq!(wheel.dominant_delta(), -50.0);
        let lines = WheelInput {
            delta_x: 0.0,
            delta_y: 3.0,
            delta_mode: 1,
        };
        assert_eq!(lines.pixel_delta(900.0), 48.0);
    }

    #[test]
    fn test_route_key() {
        let free = KeyContext::default();
        assert_eq!(route_key(Key::ArrowRight, free), KeyAction::Featured(1));
        assert_eq!(route_key(Key::ArrowLeft, free), KeyAction::Featured(-1));
        assert_eq!(route_key(Key::Escape, free), KeyAction::Ignore);

        let typing = KeyContext {
            in_text_field: true,
            ..Default::default()
        };
        assert_eq!(route_key(Key::ArrowRight, typing), KeyAction::Ignore);

        let detail = KeyContext {
            detail_open: true,
            ..Default::default()
        };
        assert_eq!(route_key(Key::ArrowLeft, detail), KeyAction::Detail(-1));
        assert_eq!(route_key(Key::Escape, detail), KeyAction::CloseOverlay);

        let cart = KeyContext {
            other_overlay_open: true,
            ..Default::default()
        };
        assert_eq!(route_key(Key::ArrowRight, cart), KeyAction::Ignore);
    }

    #[test]
    fn test_cycle_index() {
        assert_eq!(cycle_index(0, None, 1), None);
        assert_eq!(cycle_index(4, Some(3), 1), Some(0));
        assert_eq!(cycle_index(4, Some(0), -1), Some(3));
        assert_eq!(cycle_index(4, None, 1), Some(1));
        assert_eq!(cycle_index(4, Some(9), -1), Some(3));
    }
}
