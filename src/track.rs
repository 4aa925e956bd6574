//! Looped track model
//!
//! The featured strip renders the logical card list `repeat` times in a row.
//! A slot is one physical copy: `slot = loop_index * N + base_index`. The
//! scroll offset is kept inside the middle of the strip by moving it whole
//! cycles at a time, which the user cannot see because every cycle shows the
//! same cards.

use serde::{Deserialize, Serialize};

/// Stable card identifier, shared by all loop copies of a card
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logical card and its display payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedCard {
    pub id: CardId,
    /// Badge text shown on the card
    #[serde(default)]
    pub label: String,
}

impl FeaturedCard {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: CardId::new(id),
            label: label.into(),
        }
    }
}

/// Card centered on first mount in the storefront lineup
pub const DEFAULT_CENTER_ID: &str = "solstice-r9";

/// The storefront's featured lineup, in display order
pub fn storefront_lineup() -> Vec<FeaturedCard> {
    [
        ("helix-vx2", "New release"),
        ("vesper-x2", "Color shift"),
        ("anx-99-spectra", "Prototype"),
        ("ketra-x2", "Premium"),
        ("orion-x9", "Legend"),
        ("nyx-skiff-s2-rival", "Rival"),
        ("solstice-r9", "Flagship"),
    ]
    .into_iter()
    .map(|(id, label)| FeaturedCard::new(id, label))
    .collect()
}

/// A physical copy of a card in the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'a> {
    pub id: &'a CardId,
    pub loop_index: usize,
    pub base_index: usize,
}

/// Layout measurements of the rendered strip.
///
/// Positions are in content coordinates (0 = left edge of the scrollable
/// content). Implementations return zero/`None` while the strip is not laid
/// out; every operation then becomes a no-op.
pub trait TrackGeometry {
    /// Visible width of the scroll container
    fn viewport_width(&self) -> f64;
    /// Number of rendered slots
    fn slot_count(&self) -> usize;
    /// Horizontal center of a slot
    fn slot_center(&self, slot: usize) -> Option<f64>;
    /// Total scrollable width
    fn content_width(&self) -> f64;
}

/// Evenly spaced cards, for tests and hosts with a fixed layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformTrack {
    pub slots: usize,
    pub card_width: f64,
    pub gap: f64,
    pub padding: f64,
    pub viewport: f64,
}

impl UniformTrack {
    pub fn new(slots: usize, card_width: f64, gap: f64, viewport: f64) -> Self {
        Self {
            slots,
            card_width,
            gap,
            padding: 0.0,
            viewport,
        }
    }

    /// Distance between neighbouring card centers
    pub fn pitch(&self) -> f64 {
        self.card_width + self.gap
    }
}

impl TrackGeometry for UniformTrack {
    fn viewport_width(&self) -> f64 {
        self.viewport
    }

    fn slot_count(&self) -> usize {
        self.slots
    }

    fn slot_center(&self, slot: usize) -> Option<f64> {
        (slot < self.slots)
            .then(|| self.padding + slot as f64 * self.pitch() + self.card_width / 2.0)
    }

    fn content_width(&self) -> f64 {
        if self.slots == 0 {
            return 0.0;
        }
        2.0 * self.padding + self.slots as f64 * self.card_width + (self.slots - 1) as f64 * self.gap
    }
}

/// Whole-segment shift that brings `offset` into the safe zone
/// `[segment * 0.5, segment * (repeat - 1.5)]`. Zero when already inside or
/// when the geometry cannot be wrapped.
pub fn wrap_shift(offset: f64, segment: f64, repeat: usize) -> f64 {
    if !(segment > 0.0) || !offset.is_finite() {
        return 0.0;
    }
    let lower = segment * 0.5;
    let upper = segment * (repeat as f64 - 1.5);
    if upper - lower < segment {
        return 0.0;
    }
    if offset < lower {
        ((lower - offset) / segment).ceil() * segment
    } else if offset > upper {
        -((offset - upper) / segment).ceil() * segment
    } else {
        0.0
    }
}

/// Reduce a distance by whole segments into `[-segment/2, segment/2]`
pub fn nearest_cycle(distance: f64, segment: f64) -> f64 {
    if !(segment > 0.0) {
        return distance;
    }
    distance - (distance / segment).round() * segment
}

/// The logical card list repeated `repeat` times
#[derive(Debug, Clone)]
pub struct LoopedTrack {
    cards: Vec<FeaturedCard>,
    repeat: usize,
}

impl LoopedTrack {
    pub fn new(cards: Vec<FeaturedCard>, repeat: usize) -> Self {
        Self {
            cards,
            repeat: repeat.max(1),
        }
    }

    /// Logical card count (N)
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn repeat(&self) -> usize {
        self.repeat
    }

    pub fn cards(&self) -> &[FeaturedCard] {
        &self.cards
    }

    /// Rendered slot count (R * N)
    pub fn slot_count(&self) -> usize {
        self.cards.len() * self.repeat
    }

    /// Physical copy at `index`
    pub fn slot(&self, index: usize) -> Option<Slot<'_>> {
        let n = self.cards.len();
        if n == 0 || index >= self.slot_count() {
            return None;
        }
        Some(Slot {
            id: &self.cards[index % n].id,
            loop_index: index / n,
            base_index: index % n,
        })
    }

    /// All slots in render order
    pub fn slots(&self) -> impl Iterator<Item = Slot<'_>> + '_ {
        (0..self.slot_count()).filter_map(move |i| self.slot(i))
    }

    pub fn base_index(&self, slot: usize) -> Option<usize> {
        self.slot(slot).map(|s| s.base_index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id.as_str() == id)
    }

    /// Loop copy used as the home of every card
    pub fn middle_loop(&self) -> usize {
        self.repeat / 2
    }

    /// Middle-loop slot of a logical card
    pub fn canonical_slot(&self, base_index: usize) -> Option<usize> {
        (base_index < self.cards.len()).then(|| self.middle_loop() * self.cards.len() + base_index)
    }

    /// Bring an out-of-range slot index back into the strip by whole cycles
    pub fn equivalent_slot(&self, slot: isize) -> Option<usize> {
        let n = self.cards.len() as isize;
        let count = self.slot_count() as isize;
        if n == 0 {
            return None;
        }
        let mut slot = slot;
        while slot < 0 {
            slot += n;
        }
        while slot >= count {
            slot -= n;
        }
        Some(slot as usize)
    }

    /// Card centered on first mount: the requested id, else the middle card
    pub fn default_center(&self, id: Option<&str>) -> Option<usize> {
        if self.cards.is_empty() {
            return None;
        }
        id.and_then(|id| self.index_of(id))
            .or(Some((self.cards.len() - 1) / 2))
    }

    /// Width of one logical cycle, measured between equivalent slots
    pub fn segment_width<G: TrackGeometry + ?Sized>(&self, geometry: &G) -> Option<f64> {
        let n = self.cards.len();
        if n == 0 || !usable(geometry) {
            return None;
        }
        let measured = match (geometry.slot_center(0), geometry.slot_center(n)) {
            (Some(a), Some(b)) => b - a,
            _ => geometry.content_width() / self.repeat as f64,
        };
        (measured > 0.0).then_some(measured)
    }

    /// Offset after keeping it inside the safe zone
    pub fn wrap<G: TrackGeometry + ?Sized>(&self, geometry: &G, offset: f64) -> f64 {
        offset + self.wrap_delta(geometry, offset)
    }

    /// Shift [`wrap`](Self::wrap) would apply
    pub fn wrap_delta<G: TrackGeometry + ?Sized>(&self, geometry: &G, offset: f64) -> f64 {
        match self.segment_width(geometry) {
            Some(segment) => wrap_shift(offset, segment, self.repeat),
            None => 0.0,
        }
    }

    /// Slot whose center is nearest the viewport center
    pub fn closest_slot<G: TrackGeometry + ?Sized>(&self, geometry: &G, offset: f64) -> Option<usize> {
        if !usable(geometry) {
            return None;
        }
        let viewport_center = offset + geometry.viewport_width() / 2.0;
        let count = self.slot_count().min(geometry.slot_count());
        let mut closest = None;
        let mut closest_distance = f64::INFINITY;
        for slot in 0..count {
            if let Some(center) = geometry.slot_center(slot) {
                let distance = (center - viewport_center).abs();
                if distance < closest_distance {
                    closest_distance = distance;
                    closest = Some(slot);
                }
            }
        }
        closest
    }

    /// Offset that centers `slot` in the viewport
    pub fn center_offset<G: TrackGeometry + ?Sized>(&self, geometry: &G, slot: usize) -> Option<f64> {
        if !usable(geometry) || slot >= self.slot_count() {
            return None;
        }
        geometry
            .slot_center(slot)
            .map(|center| center - geometry.viewport_width() / 2.0)
    }
}

fn usable<G: TrackGeometry + ?Sized>(geometry: &G) -> bool {
    geometry.viewport_width() > 0.0 && geometry.slot_count() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ships(n: usize) -> Vec<FeaturedCard> {
        (0..n)
            .map(|i| FeaturedCard::new(format!("ship-{i}"), ""))
            .collect()
    }

    fn setup() -> (LoopedTrack, UniformTrack) {
        let track = LoopedTrack::new(ships(7), 5);
        let geometry = UniformTrack::new(track.slot_count(), 300.0, 20.0, 800.0);
        (track, geometry)
    }

    #[test]
    fn test_slot_indexing() {
        let (track, _) = setup();
        assert_eq!(track.slot_count(), 35);
        let slot = track.slot(20).unwrap();
        assert_eq!(slot.loop_index, 2);
        assert_eq!(slot.base_index, 6);
        assert_eq!(slot.id.as_str(), "ship-6");
        assert!(track.slot(35).is_none());

        // loop_index * N + base_index is unique per slot
        let mut seen: Vec<usize> = track.slots().map(|s| s.loop_index * 7 + s.base_index).collect();
        seen.dedup();
        assert_eq!(seen.len(), 35);
    }

    #[test]
    fn test_canonical_slot_is_middle_copy() {
        let (track, _) = setup();
        assert_eq!(track.canonical_slot(0), Some(14));
        assert_eq!(track.canonical_slot(6), Some(20));
        assert_eq!(track.canonical_slot(7), None);
    }

    #[test]
    fn test_default_center() {
        let (track, _) = setup();
        assert_eq!(track.default_center(Some("ship-6")), Some(6));
        assert_eq!(track.default_center(Some("missing")), Some(3));
        assert_eq!(track.default_center(None), Some(3));
        assert_eq!(LoopedTrack::new(Vec::new(), 5).default_center(None), None);

        let lineup = LoopedTrack::new(storefront_lineup(), 5);
        assert_eq!(lineup.default_center(Some(DEFAULT_CENTER_ID)), Some(6));
    }

    #[test]
    fn test_segment_is_cycle_pitch() {
        let (track, mut geometry) = setup();
        assert_eq!(track.segment_width(&geometry), Some(7.0 * 320.0));
        // Padding does not leak into the segment width
        geometry.padding = 48.0;
        assert_eq!(track.segment_width(&geometry), Some(7.0 * 320.0));
    }

    #[test]
    fn test_wrap_bounds() {
        let (track, geometry) = setup();
        let segment = 2240.0;
        assert_eq!(track.wrap(&geometry, 1000.0), 1000.0 + segment);
        assert_eq!(track.wrap(&geometry, 8000.0), 8000.0 - segment);
        assert_eq!(track.wrap(&geometry, 4000.0), 4000.0);
        // Far outside still lands in the safe zone
        let wrapped = track.wrap(&geometry, -9000.0);
        assert!(wrapped >= segment * 0.5 && wrapped <= segment * 3.5);
    }

    #[test]
    fn test_wrap_noop_without_layout() {
        let (track, mut geometry) = setup();
        geometry.viewport = 0.0;
        assert_eq!(track.wrap(&geometry, -500.0), -500.0);
        assert_eq!(track.closest_slot(&geometry, 0.0), None);
        assert_eq!(track.center_offset(&geometry, 3), None);
    }

    #[test]
    fn test_closest_and_center_offset() {
        let (track, geometry) = setup();
        let offset = track.center_offset(&geometry, 20).unwrap();
        assert_eq!(offset, 20.0 * 320.0 + 150.0 - 400.0);
        assert_eq!(track.closest_slot(&geometry, offset), Some(20));
        assert_eq!(track.closest_slot(&geometry, offset + 150.0), Some(20));
        assert_eq!(track.closest_slot(&geometry, offset + 170.0), Some(21));
    }

    #[test]
    fn test_equivalent_slot() {
        let (track, _) = setup();
        assert_eq!(track.equivalent_slot(-1), Some(6));
        assert_eq!(track.equivalent_slot(35), Some(28));
        assert_eq!(track.equivalent_slot(12), Some(12));
    }

    #[test]
    fn test_nearest_cycle() {
        assert_eq!(nearest_cycle(2300.0, 2240.0), 60.0);
        assert_eq!(nearest_cycle(-2000.0, 2240.0), 240.0);
        assert_eq!(nearest_cycle(100.0, 0.0), 100.0);
    }

    proptest! {
        #[test]
        fn wrap_is_invisible(offset in -20_000.0f64..30_000.0) {
            let (track, geometry) = setup();
            let wrapped = track.wrap(&geometry, offset);
            let before = track.closest_slot(&geometry, offset).and_then(|s| track.slot(s)).map(|s| s.id.clone());
            let after = track.closest_slot(&geometry, wrapped).and_then(|s| track.slot(s)).map(|s| s.id.clone());
            // Offsets beyond the strip clamp to its end card; only compare inside it
            if offset >= 0.0 && offset <= geometry.content_width() - geometry.viewport {
                prop_assert_eq!(before, after);
            }
            let shift = wrapped - offset;
            prop_assert!((shift / 2240.0 - (shift / 2240.0).round()).abs() < 1e-9);
        }

        #[test]
        fn wrap_is_idempotent(offset in -20_000.0f64..30_000.0) {
            let (track, geometry) = setup();
            let once = track.wrap(&geometry, offset);
            let twice = track.wrap(&geometry, once);
            prop_assert!((once - twice).abs() < 1e-6);
            prop_assert!(once >= 1120.0 - 1e-6 && once <= 7840.0 + 1e-6);
        }
    }
}
