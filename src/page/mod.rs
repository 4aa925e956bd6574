//! Page-level scroll behaviour
//!
//! - `snap`: wheel interceptor that snaps between sections
//! - `smooth_scroll`: eased programmed window scrolls
//! - `quick_nav`: active section tracking for the orbit nav
//! - `tilt`: hover tilt feedback
//!
//! [`PageScroller`] ties the first three together. The host feeds it wheel
//! events and a [`PageGeometry`] snapshot, and writes back the scroll
//! position returned by [`PageScroller::frame`].

pub mod quick_nav;
pub mod smooth_scroll;
pub mod snap;
pub mod tilt;

pub use quick_nav::{QuickNav, QuickNavSection, STOREFRONT_SECTIONS};
pub use smooth_scroll::{ScrollStart, ScrollTag, SmoothScroll};
pub use snap::{PageWheel, SectionSnap, SnapDecision, SnapEnvironment, WheelTarget};
pub use tilt::{Tilt, TiltRect, TiltTarget};

use crate::settings::Settings;
use crate::tuning::PageTuning;

/// Element ids of the storefront sections
pub mod anchors {
    pub const HOME: &str = "home";
    pub const FEATURED: &str = "featured";
    pub const CATALOG: &str = "catalog";
    pub const ABOUT: &str = "about";
    pub const MANUFACTURERS: &str = "manufacturers";
    pub const JOURNEY: &str = "journey";
    pub const CONTACT: &str = "contact";
}

/// Page measurements, in document pixels
pub trait PageGeometry {
    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn document_height(&self) -> f64;
    /// Top of every top-level section, in document order
    fn section_tops(&self) -> Vec<f64>;
    /// Top of the element with `id`, if it is on the page
    fn anchor_top(&self, id: &str) -> Option<f64>;
    fn anchor_bottom(&self, id: &str) -> Option<f64>;

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height()).max(0.0)
    }
}

/// Fixed page layout
#[derive(Debug, Clone, PartialEq)]
pub struct StaticPage {
    pub scroll_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub document_height: f64,
    /// `(id, top, bottom)` per section
    pub sections: Vec<(&'static str, f64, f64)>,
}

impl StaticPage {
    /// The storefront at desktop size: six sections on a 5400px page
    pub fn storefront(scroll_y: f64) -> Self {
        Self {
            scroll_y,
            viewport_width: 1440.0,
            viewport_height: 900.0,
            document_height: 5400.0,
            sections: vec![
                (anchors::HOME, 0.0, 900.0),
                (anchors::FEATURED, 900.0, 1800.0),
                (anchors::CATALOG, 1800.0, 3400.0),
                (anchors::ABOUT, 3400.0, 4000.0),
                (anchors::MANUFACTURERS, 4000.0, 4600.0),
                (anchors::CONTACT, 4600.0, 5400.0),
            ],
        }
    }

    fn section(&self, id: &str) -> Option<&(&'static str, f64, f64)> {
        self.sections.iter().find(|(section, _, _)| *section == id)
    }
}

impl PageGeometry for StaticPage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn section_tops(&self) -> Vec<f64> {
        self.sections.iter().map(|&(_, top, _)| top).collect()
    }

    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.section(id).map(|&(_, top, _)| top)
    }

    fn anchor_bottom(&self, id: &str) -> Option<f64> {
        self.section(id).map(|&(_, _, bottom)| bottom)
    }
}

/// Scroll progress in `0..=1` for the `--scroll-ratio` property
pub fn scroll_ratio(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    scroll_y / (document_height - viewport_height).max(1.0)
}

/// Owns section snapping, programmed scrolls and quick-nav state
#[derive(Debug, Clone)]
pub struct PageScroller {
    snap: SectionSnap,
    scroll: SmoothScroll,
    quick_nav: QuickNav,
    tuning: PageTuning,
    settings: Settings,
    /// Instant scroll to apply on the next frame
    pending: Option<f64>,
    disposed: bool,
}

impl PageScroller {
    pub fn new(quick_nav: QuickNav, tuning: PageTuning, settings: Settings) -> Self {
        Self {
            snap: SectionSnap::new(),
            scroll: SmoothScroll::new(),
            quick_nav,
            tuning,
            settings,
            pending: None,
            disposed: false,
        }
    }

    /// Storefront sections with default tuning
    pub fn storefront(settings: Settings) -> Self {
        Self::new(QuickNav::storefront(), PageTuning::default(), settings)
    }

    /// Compute the initial active section
    pub fn start<P: PageGeometry + ?Sized>(&mut self, page: &P, now_ms: f64) -> usize {
        log::info!(
            "Page scroller started (section snap {})",
            if self.settings.effective_section_snap() { "on" } else { "off" }
        );
        self.refresh_active(page, now_ms)
    }

    /// Cancel the running scroll and drop all locks
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scroll.cancel();
        self.quick_nav.release();
        self.snap.reset();
        self.pending = None;
        self.disposed = true;
        log::info!("Page scroller disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply new preferences. Turning snapping off drops any snap lock.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !self.settings.effective_section_snap() {
            self.snap.reset();
        }
    }

    pub fn quick_nav(&self) -> &QuickNav {
        &self.quick_nav
    }

    pub fn active_section(&self) -> usize {
        self.quick_nav.active()
    }

    /// A programmed scroll is running or waiting to be applied
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_active() || self.pending.is_some()
    }

    /// Handle a page wheel event. The host prevents default when the
    /// decision says so.
    pub fn on_wheel<P: PageGeometry + ?Sized>(
        &mut self,
        wheel: &PageWheel,
        env: SnapEnvironment,
        page: &P,
        now_ms: f64,
    ) -> SnapDecision {
        if self.disposed {
            return SnapDecision::Native;
        }
        let env = SnapEnvironment {
            enabled: env.enabled && self.settings.effective_section_snap(),
            quick_nav_jumping: self.quick_nav.is_jumping(),
            ..env
        };
        let decision = self.snap.on_wheel(wheel, &env, page, now_ms, &self.tuning);
        if let SnapDecision::SnapTo { y, duration_hint_ms } = decision {
            self.begin(page, y, duration_hint_ms, ScrollTag::SectionSnap, now_ms);
        }
        decision
    }

    /// Scroll to the quick-nav section at `index`
    pub fn jump_to_section<P: PageGeometry + ?Sized>(
        &mut self,
        index: usize,
        page: &P,
        now_ms: f64,
    ) -> Option<ScrollStart> {
        if self.disposed {
            return None;
        }
        let section = *self.quick_nav.sections().get(index)?;
        let top = page.anchor_top(section.id)?;
        self.quick_nav.begin_jump(index);
        log::debug!("Quick-nav jump to {}", section.id);
        let start = self.begin(
            page,
            top - self.tuning.header_offset,
            self.tuning.quick_nav_duration_ms,
            ScrollTag::QuickNav(index),
            now_ms,
        );
        if matches!(start, ScrollStart::Instant { .. }) {
            self.quick_nav.finish_jump(index, now_ms, &self.tuning);
        }
        Some(start)
    }

    pub fn jump_to_id<P: PageGeometry + ?Sized>(&mut self, id: &str, page: &P, now_ms: f64) -> Option<ScrollStart> {
        let index = self.quick_nav.index_of(id)?;
        self.jump_to_section(index, page, now_ms)
    }

    /// Orbit shift: jump to the adjacent section, `None` at either end
    pub fn shift_section<P: PageGeometry + ?Sized>(
        &mut self,
        direction: i32,
        page: &P,
        now_ms: f64,
    ) -> Option<ScrollStart> {
        let index = self.quick_nav.shift_target(direction)?;
        self.jump_to_section(index, page, now_ms)
    }

    /// "Browse catalog" call to action
    pub fn scroll_to_catalog<P: PageGeometry + ?Sized>(&mut self, page: &P, now_ms: f64) -> Option<ScrollStart> {
        if self.disposed {
            return None;
        }
        let top = page.anchor_top(anchors::CATALOG)?;
        Some(self.begin(
            page,
            top - self.tuning.header_offset,
            self.tuning.scroll_min_ms,
            ScrollTag::Catalog,
            now_ms,
        ))
    }

    fn begin<P: PageGeometry + ?Sized>(
        &mut self,
        page: &P,
        target_y: f64,
        hint_ms: f64,
        tag: ScrollTag,
        now_ms: f64,
    ) -> ScrollStart {
        // A scroll replacing a jump would leave the highlight pinned
        if matches!(self.scroll.tag(), Some(ScrollTag::QuickNav(_))) && !matches!(tag, ScrollTag::QuickNav(_)) {
            self.quick_nav.release();
        }
        let start = self.scroll.start(
            page.scroll_y(),
            target_y,
            page.max_scroll(),
            hint_ms,
            tag,
            now_ms,
            self.settings.reduced_motion,
            &self.tuning,
        );
        self.pending = match start {
            ScrollStart::Instant { y, .. } => Some(y),
            ScrollStart::Animated { .. } => None,
        };
        start
    }

    /// Scroll position to write this frame, `None` when nothing is moving
    pub fn frame(&mut self, now_ms: f64) -> Option<f64> {
        if let Some(y) = self.pending.take() {
            return Some(y);
        }
        let frame = self.scroll.step(now_ms)?;
        if let Some(ScrollTag::QuickNav(index)) = frame.finished {
            self.quick_nav.finish_jump(index, now_ms, &self.tuning);
        }
        Some(frame.y)
    }

    /// Recompute the highlighted quick-nav section
    pub fn refresh_active<P: PageGeometry + ?Sized>(&mut self, page: &P, now_ms: f64) -> usize {
        let tops: Vec<Option<f64>> = self
            .quick_nav
            .sections()
            .iter()
            .map(|section| page.anchor_top(section.id))
            .collect();
        self.quick_nav.refresh(
            &tops,
            page.scroll_y(),
            page.viewport_height(),
            now_ms,
            &self.tuning,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(scroller: &mut PageScroller, mut now: f64) -> (f64, f64) {
        let mut y = f64::NAN;
        while let Some(next) = scroller.frame(now) {
            y = next;
            now += 16.0;
        }
        (y, now)
    }

    #[test]
    fn test_wheel_snap_scrolls_page() {
        let mut scroller = PageScroller::storefront(Settings::default());
        let page = StaticPage::storefront(10.0);
        let decision = scroller.on_wheel(&PageWheel::vertical(100.0), SnapEnvironment::default(), &page, 0.0);
        assert!(decision.prevents_default());
        assert!(scroller.is_scrolling());

        let (y, _) = run_to_end(&mut scroller, 0.0);
        assert_eq!(y, 828.0);
        assert!(!scroller.is_scrolling());
    }

    #[test]
    fn test_snap_disabled_by_settings() {
        let settings = Settings {
            section_snap: false,
            ..Default::default()
        };
        let mut scroller = PageScroller::storefront(settings);
        let page = StaticPage::storefront(10.0);
        let decision = scroller.on_wheel(&PageWheel::vertical(100.0), SnapEnvironment::default(), &page, 0.0);
        assert_eq!(decision, SnapDecision::Native);
    }

    #[test]
    fn test_settings_applied_live() {
        let mut scroller = PageScroller::storefront(Settings::default());
        let page = StaticPage::storefront(10.0);
        let wheel = PageWheel::vertical(100.0);
        assert!(scroller.on_wheel(&wheel, SnapEnvironment::default(), &page, 0.0).prevents_default());

        scroller.set_settings(Settings::default().with_reduced_motion(true));
        assert_eq!(
            scroller.on_wheel(&wheel, SnapEnvironment::default(), &page, 50.0),
            SnapDecision::Native
        );
        assert!(matches!(
            scroller.scroll_to_catalog(&page, 60.0),
            Some(ScrollStart::Instant { y, .. }) if y == 1728.0
        ));
    }

    #[test]
    fn test_jump_pins_and_suppresses_snap() {
        let mut scroller = PageScroller::storefront(Settings::default());
        let page = StaticPage::storefront(0.0);
        let start = scroller.jump_to_id("catalog", &page, 0.0);
        assert!(matches!(start, Some(ScrollStart::Animated { target, .. }) if target == 1728.0));
        assert_eq!(scroller.active_section(), 2);

        // Wheel input is swallowed while the jump runs
        let mid = StaticPage::storefront(400.0);
        assert_eq!(
            scroller.on_wheel(&PageWheel::vertical(100.0), SnapEnvironment::default(), &mid, 100.0),
            SnapDecision::Suppress
        );
        assert_eq!(scroller.refresh_active(&mid, 100.0), 2);

        let (y, end) = run_to_end(&mut scroller, 16.0);
        assert_eq!(y, 1728.0);
        assert!(!scroller.quick_nav().is_jumping());

        // Still pinned inside the settle window, even with the page elsewhere
        let elsewhere = StaticPage::storefront(0.0);
        assert_eq!(scroller.refresh_active(&elsewhere, end + 100.0), 2);
        assert_eq!(scroller.refresh_active(&elsewhere, end + 400.0), 0);
    }

    #[test]
    fn test_reduced_motion_jump_is_instant() {
        let settings = Settings::default().with_reduced_motion(true);
        let mut scroller = PageScroller::storefront(settings);
        let page = StaticPage::storefront(0.0);
        let start = scroller.jump_to_section(1, &page, 0.0);
        assert_eq!(
            start,
            Some(ScrollStart::Instant {
                y: 828.0,
                tag: ScrollTag::QuickNav(1)
            })
        );
        assert!(!scroller.quick_nav().is_jumping());
        assert_eq!(scroller.frame(0.0), Some(828.0));
        assert_eq!(scroller.frame(16.0), None);
    }

    #[test]
    fn test_missing_section_is_noop() {
        let mut scroller = PageScroller::storefront(Settings::default());
        let page = StaticPage::storefront(0.0);
        // The storefront layout has no journey block
        assert_eq!(scroller.jump_to_id(anchors::JOURNEY, &page, 0.0), None);
        assert!(!scroller.quick_nav().is_jumping());
        assert_eq!(scroller.shift_section(-1, &page, 0.0), None);
    }

    #[test]
    fn test_catalog_replaces_jump() {
        let mut scroller = PageScroller::storefront(Settings::default());
        let page = StaticPage::storefront(0.0);
        scroller.jump_to_section(5, &page, 0.0);
        assert!(scroller.quick_nav().is_jumping());
        scroller.scroll_to_catalog(&page, 50.0);
        assert!(!scroller.quick_nav().is_jumping());
        let (y, _) = run_to_end(&mut scroller, 66.0);
        assert_eq!(y, 1728.0);
    }

    #[test]
    fn test_dispose() {
        let mut scroller = PageScroller::storefront(Settings::default());
        let page = StaticPage::storefront(0.0);
        assert_eq!(scroller.start(&page, 0.0), 0);
        scroller.jump_to_section(3, &page, 0.0);
        scroller.dispose();
        assert!(scroller.is_disposed());
        assert_eq!(scroller.frame(16.0), None);
        assert_eq!(scroller.jump_to_section(2, &page, 32.0), None);
        assert_eq!(
            scroller.on_wheel(&PageWheel::vertical(100.0), SnapEnvironment::default(), &page, 32.0),
            SnapDecision::Native
        );
    }

    #[test]
    fn test_scroll_ratio() {
        assert_eq!(scroll_ratio(2250.0, 5400.0, 900.0), 0.5);
        assert_eq!(scroll_ratio(0.0, 600.0, 900.0), 0.0);
    }

    #[test]
    fn test_static_page_geometry() {
        let page = StaticPage::storefront(0.0);
        assert_eq!(page.max_scroll(), 4500.0);
        assert_eq!(page.anchor_bottom(anchors::FEATURED), Some(1800.0));
        assert_eq!(page.anchor_top(anchors::JOURNEY), None);
        assert_eq!(page.section_tops().len(), 6);
    }
}
