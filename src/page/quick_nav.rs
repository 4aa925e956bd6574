//! Quick-nav active section tracking
//!
//! The orbit nav highlights the section under a marker line 42% down the
//! viewport. While a jump is scrolling the page the highlight is pinned to
//! the destination, and it stays pinned for a short settle window after
//! landing so the nav does not flicker through intermediate sections.

use crate::tuning::PageTuning;

/// Vertical spacing of orbit nodes (px)
const NODE_SPACING: f64 = 24.0;

/// One entry of the orbit nav
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickNavSection {
    pub id: &'static str,
    pub label: &'static str,
}

/// The storefront's sections, top to bottom
pub const STOREFRONT_SECTIONS: [QuickNavSection; 6] = [
    QuickNavSection { id: "home", label: "Home" },
    QuickNavSection { id: "featured", label: "Featured" },
    QuickNavSection { id: "catalog", label: "Catalog" },
    QuickNavSection { id: "about", label: "Advantages" },
    QuickNavSection { id: "journey", label: "Journeys" },
    QuickNavSection { id: "contact", label: "Contact" },
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Settle {
    index: usize,
    until_ms: f64,
}

#[derive(Debug, Clone)]
pub struct QuickNav {
    sections: Vec<QuickNavSection>,
    active: usize,
    /// Destination of the jump in progress
    jump: Option<usize>,
    settle: Option<Settle>,
}

impl QuickNav {
    pub fn new(sections: Vec<QuickNavSection>) -> Self {
        Self {
            sections,
            active: 0,
            jump: None,
            settle: None,
        }
    }

    pub fn storefront() -> Self {
        Self::new(STOREFRONT_SECTIONS.to_vec())
    }

    pub fn sections(&self) -> &[QuickNavSection] {
        &self.sections
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.sections.get(self.active).map(|s| s.id)
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// Pin the highlight to `index` until the jump lands
    pub fn begin_jump(&mut self, index: usize) {
        if index >= self.sections.len() {
            return;
        }
        self.settle = None;
        self.jump = Some(index);
        self.active = index;
    }

    /// The programmed scroll for `index` finished. Completions of a
    /// superseded jump are ignored.
    pub fn finish_jump(&mut self, index: usize, now_ms: f64, tuning: &PageTuning) {
        if self.jump != Some(index) {
            return;
        }
        self.jump = None;
        self.settle = Some(Settle {
            index,
            until_ms: now_ms + tuning.quick_nav_settle_ms,
        });
    }

    /// Drop any jump or settle state (teardown, jump replaced by a snap)
    pub fn release(&mut self) {
        self.jump = None;
        self.settle = None;
    }

    /// Recompute the active section. `tops` holds the document top of each
    /// section (`None` when it is not on the page).
    pub fn refresh(
        &mut self,
        tops: &[Option<f64>],
        scroll_y: f64,
        viewport_height: f64,
        now_ms: f64,
        tuning: &PageTuning,
    ) -> usize {
        if let Some(index) = self.jump {
            self.active = index;
            return self.active;
        }
        if let Some(settle) = self.settle {
            if now_ms < settle.until_ms {
                self.active = settle.index;
                return self.active;
            }
            self.settle = None;
        }

        let marker = scroll_y + viewport_height * tuning.quick_nav_marker;
        let present = tops
            .iter()
            .enumerate()
            .filter_map(|(i, &top)| top.map(|top| (i, top)));
        let Some((first, _)) = present.clone().next() else {
            return self.active;
        };
        self.active = present
            .take_while(|&(_, top)| marker >= top)
            .last()
            .map_or(first, |(i, _)| i);
        self.active
    }

    /// Neighbouring section in `direction`, `None` at either end
    pub fn shift_target(&self, direction: i32) -> Option<usize> {
        let last = self.sections.len().checked_sub(1)?;
        let next = (self.active as i64 + direction.signum() as i64).clamp(0, last as i64) as usize;
        (next != self.active).then_some(next)
    }

    pub fn can_shift_up(&self) -> bool {
        self.active > 0
    }

    pub fn can_shift_down(&self) -> bool {
        self.active + 1 < self.sections.len()
    }

    /// Height of the progress line (px)
    pub fn progress_height(&self) -> f64 {
        8.0 + self.active as f64 * NODE_SPACING
    }

    /// Top of the focus ring (px)
    pub fn focus_top(&self) -> f64 {
        self.active as f64 * NODE_SPACING - 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tops() -> Vec<Option<f64>> {
        vec![
            Some(0.0),
            Some(900.0),
            Some(1800.0),
            Some(3400.0),
            None,
            Some(4600.0),
        ]
    }

    #[test]
    fn test_marker_line() {
        let tuning = PageTuning::default();
        let mut nav = QuickNav::storefront();
        // Marker at 500 + 378 = 878: still the hero
        assert_eq!(nav.refresh(&tops(), 500.0, 900.0, 0.0, &tuning), 0);
        // Marker at 530 + 378 = 908: featured
        assert_eq!(nav.refresh(&tops(), 530.0, 900.0, 0.0, &tuning), 1);
        // Missing sections are skipped
        assert_eq!(nav.refresh(&tops(), 4400.0, 900.0, 0.0, &tuning), 5);
        assert_eq!(nav.active_id(), Some("contact"));
    }

    #[test]
    fn test_jump_pins_then_settles() {
        let tuning = PageTuning::default();
        let mut nav = QuickNav::storefront();
        nav.begin_jump(3);
        assert!(nav.is_jumping());
        // Mid-jump scroll positions do not move the highlight
        assert_eq!(nav.refresh(&tops(), 1000.0, 900.0, 100.0, &tuning), 3);

        nav.finish_jump(3, 800.0, &tuning);
        assert!(!nav.is_jumping());
        assert_eq!(nav.refresh(&tops(), 1000.0, 900.0, 1000.0, &tuning), 3);
        // Settle window over
        assert_eq!(nav.refresh(&tops(), 1000.0, 900.0, 1101.0, &tuning), 1);
    }

    #[test]
    fn test_superseded_completion_ignored() {
        let tuning = PageTuning::default();
        let mut nav = QuickNav::storefront();
        nav.begin_jump(2);
        nav.begin_jump(4);
        nav.finish_jump(2, 500.0, &tuning);
        assert!(nav.is_jumping());
        assert_eq!(nav.active(), 4);
    }

    #[test]
    fn test_shift_clamped() {
        let mut nav = QuickNav::storefront();
        assert_eq!(nav.shift_target(-1), None);
        assert!(!nav.can_shift_up());
        assert_eq!(nav.shift_target(1), Some(1));
        nav.begin_jump(5);
        assert_eq!(nav.shift_target(1), None);
        assert!(!nav.can_shift_down());
        assert_eq!(nav.shift_target(-1), Some(4));
        assert_eq!(nav.progress_height(), 128.0);
        assert_eq!(nav.focus_top(), 114.0);
    }
}
