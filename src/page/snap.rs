//! Section-snap wheel interceptor
//!
//! On wide, fine-pointer viewports a wheel tick near a section edge becomes
//! a programmed scroll to the neighbouring section. A short lock swallows
//! the rest of the wheel burst; turning the wheel the other way breaks it
//! once the reversal window has passed.

use super::{PageGeometry, anchors};
use crate::sign;
use crate::tuning::PageTuning;

/// Where the wheel event originated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelTarget {
    /// Inside the featured carousel track
    pub in_carousel: bool,
    /// Inside the quick-nav orbit
    pub in_orbit_nav: bool,
    /// Inside an element that scrolls on its own
    pub in_scrollable: bool,
    /// Inside the catalog section
    pub in_catalog: bool,
    /// Inside the about or manufacturers block
    pub in_about: bool,
}

/// A page-level wheel event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageWheel {
    pub delta_x: f64,
    pub delta_y: f64,
    pub default_prevented: bool,
    /// Ctrl, Meta or Shift held
    pub modifier: bool,
    pub target: WheelTarget,
}

impl PageWheel {
    pub fn vertical(delta_y: f64) -> Self {
        Self {
            delta_y,
            ..Default::default()
        }
    }

    /// Dominant delta; vertical wins ties
    pub fn delta(&self) -> f64 {
        if self.delta_y.abs() >= self.delta_x.abs() {
            self.delta_y
        } else {
            self.delta_x
        }
    }
}

/// Page state gating the interceptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEnvironment {
    /// `(pointer: fine)` matches
    pub fine_pointer: bool,
    pub overlay_open: bool,
    /// Snapping is enabled in the user settings
    pub enabled: bool,
    /// A quick-nav jump is scrolling the page
    pub quick_nav_jumping: bool,
}

impl Default for SnapEnvironment {
    fn default() -> Self {
        Self {
            fine_pointer: true,
            overlay_open: false,
            enabled: true,
            quick_nav_jumping: false,
        }
    }
}

/// What to do with a wheel event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapDecision {
    /// Let the browser scroll
    Native,
    /// Prevent default and do nothing
    Suppress,
    /// Prevent default and scroll to `y`
    SnapTo { y: f64, duration_hint_ms: f64 },
}

impl SnapDecision {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, SnapDecision::Native)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SnapLock {
    direction: f64,
    armed_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SectionSnap {
    lock: Option<SnapLock>,
}

impl SectionSnap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock still holding at `now_ms`
    pub fn is_locked(&self, now_ms: f64, tuning: &PageTuning) -> bool {
        self.lock
            .is_some_and(|lock| now_ms - lock.armed_ms < tuning.snap_lock_ms)
    }

    pub fn reset(&mut self) {
        self.lock = None;
    }

    /// Decide what a wheel event does
    pub fn on_wheel<P: PageGeometry + ?Sized>(
        &mut self,
        wheel: &PageWheel,
        env: &SnapEnvironment,
        page: &P,
        now_ms: f64,
        tuning: &PageTuning,
    ) -> SnapDecision {
        if !env.enabled
            || !env.fine_pointer
            || env.overlay_open
            || page.viewport_width() < tuning.snap_min_viewport_width
        {
            return SnapDecision::Native;
        }
        if env.quick_nav_jumping {
            return SnapDecision::Suppress;
        }
        if wheel.default_prevented || wheel.modifier {
            return SnapDecision::Native;
        }
        let delta = wheel.delta();
        if delta.abs() < tuning.snap_min_wheel_delta {
            return SnapDecision::Native;
        }
        let target = wheel.target;
        if target.in_carousel || target.in_orbit_nav || target.in_scrollable {
            return SnapDecision::Native;
        }
        let direction = sign(delta);
        let scroll_y = page.scroll_y();

        if target.in_catalog && !catalog_exit(direction, scroll_y, page, tuning) {
            return SnapDecision::Native;
        }

        if let Some(lock) = self.lock {
            let elapsed = now_ms - lock.armed_ms;
            if elapsed < tuning.snap_lock_ms {
                let reversal = lock.direction != direction && elapsed > tuning.snap_reversal_ms;
                if !reversal {
                    return SnapDecision::Suppress;
                }
                log::debug!("Section snap lock broken by reversal after {:.0}ms", elapsed);
            }
            self.lock = None;
        }

        if direction < 0.0 {
            if let Some(y) = about_catch(target, scroll_y, page, tuning) {
                return self.engage(direction, y, tuning.about_duration_ms, now_ms);
            }
        }

        match nearest_section(direction, page, tuning) {
            Some(y) => self.engage(direction, y, tuning.snap_duration_ms, now_ms),
            None => SnapDecision::Native,
        }
    }

    fn engage(&mut self, direction: f64, y: f64, duration_hint_ms: f64, now_ms: f64) -> SnapDecision {
        self.lock = Some(SnapLock {
            direction,
            armed_ms: now_ms,
        });
        let y = y.max(0.0);
        log::debug!("Section snap to {:.0} ({})", y, if direction > 0.0 { "down" } else { "up" });
        SnapDecision::SnapTo { y, duration_hint_ms }
    }
}

/// Inside the catalog the wheel scrolls natively, except upward right at
/// its top or at the featured block's bottom line
fn catalog_exit<P: PageGeometry + ?Sized>(direction: f64, scroll_y: f64, page: &P, tuning: &PageTuning) -> bool {
    let (Some(catalog_top), Some(featured_bottom)) = (
        page.anchor_top(anchors::CATALOG),
        page.anchor_bottom(anchors::FEATURED),
    ) else {
        return false;
    };
    let catalog_top = catalog_top - tuning.header_offset;
    let featured_line = featured_bottom - tuning.header_offset;
    let near_top = scroll_y <= catalog_top + tuning.catalog_top_tolerance;
    let near_line = (scroll_y - featured_line).abs() <= tuning.featured_line_tolerance;
    direction < 0.0 && (near_top || near_line)
}

/// Upward wheel inside the about/manufacturers zone returns to the about top
fn about_catch<P: PageGeometry + ?Sized>(
    target: WheelTarget,
    scroll_y: f64,
    page: &P,
    tuning: &PageTuning,
) -> Option<f64> {
    let about_top = page.anchor_top(anchors::ABOUT)?.round() - tuning.header_offset;
    let manufacturers_top = page
        .anchor_top(anchors::MANUFACTURERS)
        .map(|top| top.round() - tuning.header_offset)
        .unwrap_or(f64::INFINITY);
    let slack = tuning.about_zone_slack;
    let in_zone = target.in_about || (scroll_y >= about_top - slack && scroll_y <= manufacturers_top + slack);
    (in_zone && scroll_y > about_top + tuning.about_catch_px).then_some(about_top)
}

/// Section tops rounded, with near-duplicates of their predecessor dropped
pub fn dedupe_tops(tops: &[f64], min_gap: f64) -> Vec<f64> {
    let rounded: Vec<f64> = tops.iter().map(|top| top.round()).collect();
    rounded
        .iter()
        .enumerate()
        .filter(|&(i, top)| i == 0 || (top - rounded[i - 1]).abs() > min_gap)
        .map(|(_, top)| *top)
        .collect()
}

/// Generic detection: snap to the neighbouring section when the viewport
/// sits within the edge threshold of the current section's boundary
fn nearest_section<P: PageGeometry + ?Sized>(direction: f64, page: &P, tuning: &PageTuning) -> Option<f64> {
    let tops = dedupe_tops(&page.section_tops(), tuning.section_dedupe_px);
    if tops.len() < 2 {
        return None;
    }
    let header = tuning.header_offset;
    let scroll_y = page.scroll_y();
    let marker = scroll_y + header;

    let current = tops
        .iter()
        .take_while(|&&top| marker >= top - tuning.section_marker_slack)
        .count()
        .saturating_sub(1);
    let next = (current as isize + direction as isize).clamp(0, tops.len() as isize - 1) as usize;
    if next == current {
        return None;
    }

    let current_top = (tops[current] - header).max(0.0);
    let current_bottom = match tops.get(current + 1) {
        Some(top) => (top - header).max(current_top),
        None => page.max_scroll().max(current_top),
    };
    let remaining_down = current_bottom - (scroll_y + page.viewport_height());
    let remaining_up = scroll_y - current_top;
    let threshold = tuning.snap_edge_threshold;
    if (direction > 0.0 && remaining_down > threshold) || (direction < 0.0 && remaining_up > threshold) {
        return None;
    }
    Some(tops[next] - header)
}
