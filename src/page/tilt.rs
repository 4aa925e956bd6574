//! Hover tilt feedback
//!
//! Cards and panels lean towards the pointer. Purely presentational: the
//! host writes the result to `--card-tilt-x/y`, `--card-shift-x/y` and
//! `--tilt-perspective`.

use glam::DVec2;

/// Perspective (px) the tilt transform is rendered with
pub const TILT_PERSPECTIVE_PX: f64 = 1100.0;

/// Strength used for featured cards
pub const FEATURED_CARD_INTENSITY: f64 = 1.28;

/// What kind of element is tilting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltTarget {
    /// Card wired to its own tilt handler
    Card,
    /// Generic hover target: a button
    Button,
    /// Generic hover target: a panel
    Panel,
}

impl TiltTarget {
    /// Default strength for the target
    pub fn intensity(self) -> f64 {
        match self {
            TiltTarget::Card => 1.0,
            TiltTarget::Button => 0.55,
            TiltTarget::Panel => 0.85,
        }
    }

    fn shift_factors(self) -> DVec2 {
        match self {
            TiltTarget::Card => DVec2::new(3.4, 2.6),
            TiltTarget::Button | TiltTarget::Panel => DVec2::new(3.6, 2.8),
        }
    }
}

/// Element rectangle in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltRect {
    pub origin: DVec2,
    pub size: DVec2,
}

impl TiltRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(left, top),
            size: DVec2::new(width, height),
        }
    }
}

/// Tilt to apply
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Degrees
    pub rotate_x: f64,
    /// Degrees
    pub rotate_y: f64,
    /// Pixels
    pub shift: DVec2,
}

impl Tilt {
    /// The neutral pose written on pointer leave
    pub const RESET: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
        shift: DVec2::ZERO,
    };

    /// CSS custom properties for the pose
    pub fn css_properties(&self) -> [(&'static str, String); 5] {
        [
            ("--tilt-perspective", format!("{TILT_PERSPECTIVE_PX}px")),
            ("--card-tilt-x", format!("{:.3}deg", self.rotate_x)),
            ("--card-tilt-y", format!("{:.3}deg", self.rotate_y)),
            ("--card-shift-x", format!("{:.3}px", self.shift.x)),
            ("--card-shift-y", format!("{:.3}px", self.shift.y)),
        ]
    }
}

/// Touch pointers never tilt: there is no hover to follow
pub fn tilts_for_pointer(pointer_type: &str) -> bool {
    pointer_type != "touch"
}

/// Tilt for a pointer at `pointer` over `rect`; `None` for an empty rect
pub fn tilt_for(pointer: DVec2, rect: TiltRect, target: TiltTarget, intensity: f64) -> Option<Tilt> {
    if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
        return None;
    }
    // -0.5..0.5 from the element center
    let offset = (pointer - rect.origin) / rect.size - DVec2::splat(0.5);
    Some(Tilt {
        rotate_x: -offset.y * 2.6 * intensity,
        rotate_y: offset.x * 3.2 * intensity,
        shift: offset * target.shift_factors() * intensity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_neutral() {
        let rect = TiltRect::new(100.0, 100.0, 200.0, 100.0);
        let tilt = tilt_for(DVec2::new(200.0, 150.0), rect, TiltTarget::Card, 1.0).unwrap();
        assert_eq!(tilt, Tilt::RESET);
    }

    #[test]
    fn test_corner_leans() {
        let rect = TiltRect::new(0.0, 0.0, 200.0, 100.0);
        // Bottom-right corner
        let tilt = tilt_for(DVec2::new(200.0, 100.0), rect, TiltTarget::Card, 1.0).unwrap();
        assert!((tilt.rotate_x + 1.3).abs() < 1e-12);
        assert!((tilt.rotate_y - 1.6).abs() < 1e-12);
        assert!((tilt.shift - DVec2::new(1.7, 1.3)).length() < 1e-12);

        let button = TiltTarget::Button;
        let tilt = tilt_for(DVec2::new(0.0, 0.0), rect, button, button.intensity()).unwrap();
        assert!((tilt.shift - DVec2::new(-0.99, -0.77)).length() < 1e-12);
    }

    #[test]
    fn test_empty_rect() {
        let rect = TiltRect::new(0.0, 0.0, 0.0, 40.0);
        assert!(tilt_for(DVec2::ZERO, rect, TiltTarget::Panel, 0.85).is_none());
    }

    #[test]
    fn test_css_properties() {
        let props = Tilt::RESET.css_properties();
        assert_eq!(props[0], ("--tilt-perspective", "1100px".to_string()));
        assert_eq!(props[1], ("--card-tilt-x", "0.000deg".to_string()));
        assert_eq!(props[4], ("--card-shift-y", "0.000px".to_string()));
    }

    #[test]
    fn test_touch_does_not_tilt() {
        assert!(!tilts_for_pointer("touch"));
        assert!(tilts_for_pointer("mouse"));
        assert!(tilts_for_pointer("pen"));
    }
}
