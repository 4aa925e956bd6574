//! Programmed page scroll
//!
//! Eases the window scroll position to a target with an ease-in-out quintic
//! curve. A new scroll replaces the running one and drops its completion.

use crate::ease_in_out_quint;
use crate::tuning::PageTuning;

/// Distance (px) below which scrolling is instant
const INSTANT_DISTANCE: f64 = 1.0;

/// Who asked for the scroll; reported back on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTag {
    /// Section snap from the wheel interceptor
    SectionSnap,
    /// Quick-nav jump to the section at this index
    QuickNav(usize),
    /// "Browse catalog" call to action
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    start_ms: f64,
    from: f64,
    distance: f64,
    duration_ms: f64,
    tag: ScrollTag,
}

/// Result of [`SmoothScroll::start`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollStart {
    /// Jump straight to `y`; the scroll is already complete
    Instant { y: f64, tag: ScrollTag },
    Animated { target: f64, duration_ms: f64 },
}

/// One animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    pub y: f64,
    /// Set on the final frame
    pub finished: Option<ScrollTag>,
}

#[derive(Debug, Clone, Default)]
pub struct SmoothScroll {
    animation: Option<ScrollAnimation>,
}

/// Duration for a scroll of `distance` px
pub fn scroll_duration(distance: f64, hint_ms: f64, tuning: &PageTuning) -> f64 {
    (hint_ms + (distance.abs() * tuning.scroll_ms_per_px).min(tuning.scroll_distance_cap_ms))
        .clamp(tuning.scroll_min_ms, tuning.scroll_max_ms)
}

impl SmoothScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.animation.is_some()
    }

    /// Tag of the running scroll
    pub fn tag(&self) -> Option<ScrollTag> {
        self.animation.map(|a| a.tag)
    }

    /// Scroll from `from_y` towards `target_y`, clamped to `[0, max_scroll]`
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        &mut self,
        from_y: f64,
        target_y: f64,
        max_scroll: f64,
        hint_ms: f64,
        tag: ScrollTag,
        now_ms: f64,
        reduced_motion: bool,
        tuning: &PageTuning,
    ) -> ScrollStart {
        self.animation = None;
        let target = target_y.clamp(0.0, max_scroll.max(0.0));
        let distance = target - from_y;
        if distance.abs() < INSTANT_DISTANCE || reduced_motion {
            return ScrollStart::Instant { y: target, tag };
        }
        let duration_ms = scroll_duration(distance, hint_ms, tuning);
        self.animation = Some(ScrollAnimation {
            start_ms: now_ms,
            from: from_y,
            distance,
            duration_ms,
            tag,
        });
        ScrollStart::Animated { target, duration_ms }
    }

    /// Position at `now_ms`; `None` when idle
    pub fn step(&mut self, now_ms: f64) -> Option<ScrollFrame> {
        let animation = self.animation?;
        let progress = ((now_ms - animation.start_ms) / animation.duration_ms).clamp(0.0, 1.0);
        let y = animation.from + animation.distance * ease_in_out_quint(progress);
        if progress < 1.0 {
            return Some(ScrollFrame { y, finished: None });
        }
        self.animation = None;
        Some(ScrollFrame {
            y: animation.from + animation.distance,
            finished: Some(animation.tag),
        })
    }

    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(scroll: &mut SmoothScroll, from: f64, to: f64, tag: ScrollTag, now: f64) -> ScrollStart {
        scroll.start(from, to, 4500.0, 260.0, tag, now, false, &PageTuning::default())
    }

    #[test]
    fn test_duration_curve() {
        let tuning = PageTuning::default();
        assert_eq!(scroll_duration(10.0, 260.0, &tuning), 320.0);
        assert_eq!(scroll_duration(400.0, 260.0, &tuning), 320.0);
        assert_eq!(scroll_duration(-1000.0, 760.0, &tuning), 910.0);
        assert_eq!(scroll_duration(5000.0, 760.0, &tuning), 980.0);
    }

    #[test]
    fn test_short_or_reduced_is_instant() {
        let mut scroll = SmoothScroll::new();
        assert_eq!(
            start(&mut scroll, 100.0, 100.5, ScrollTag::SectionSnap, 0.0),
            ScrollStart::Instant {
                y: 100.5,
                tag: ScrollTag::SectionSnap
            }
        );
        let reduced = scroll.start(0.0, 800.0, 4500.0, 260.0, ScrollTag::Catalog, 0.0, true, &PageTuning::default());
        assert_eq!(
            reduced,
            ScrollStart::Instant {
                y: 800.0,
                tag: ScrollTag::Catalog
            }
        );
        assert!(!scroll.is_active());
    }

    #[test]
    fn test_target_clamped() {
        let mut scroll = SmoothScroll::new();
        let result = start(&mut scroll, 4000.0, 9000.0, ScrollTag::SectionSnap, 0.0);
        assert!(matches!(result, ScrollStart::Animated { target, .. } if target == 4500.0));
        assert_eq!(
            start(&mut scroll, 10.0, -50.0, ScrollTag::SectionSnap, 0.0),
            ScrollStart::Animated {
                target: 0.0,
                duration_ms: 320.0
            }
        );
    }

    #[test]
    fn test_runs_to_completion() {
        let mut scroll = SmoothScroll::new();
        start(&mut scroll, 0.0, 828.0, ScrollTag::QuickNav(1), 0.0);
        let mid = scroll.step(190.0).unwrap();
        assert!(mid.y > 0.0 && mid.y < 828.0);
        assert_eq!(mid.finished, None);
        let end = scroll.step(1000.0).unwrap();
        assert_eq!(end.y, 828.0);
        assert_eq!(end.finished, Some(ScrollTag::QuickNav(1)));
        assert!(scroll.step(1016.0).is_none());
    }

    #[test]
    fn test_replacement_drops_previous_completion() {
        let mut scroll = SmoothScroll::new();
        start(&mut scroll, 0.0, 828.0, ScrollTag::QuickNav(1), 0.0);
        start(&mut scroll, 300.0, 1728.0, ScrollTag::SectionSnap, 100.0);
        let mut last = None;
        let mut now = 100.0;
        while let Some(frame) = scroll.step(now) {
            last = frame.finished.or(last);
            now += 16.0;
        }
        assert_eq!(last, Some(ScrollTag::SectionSnap));
    }
}
