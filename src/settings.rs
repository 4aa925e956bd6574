//! User preferences
//!
//! Persisted in LocalStorage, separately from tuning data.

use serde::{Deserialize, Serialize};

/// Motion preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Accessibility ===
    /// Reduced motion (instant positioning, no inertia or eased scrolls)
    pub reduced_motion: bool,

    // === Page behaviour ===
    /// Snap the page between sections on wheel input
    pub section_snap: bool,
    /// Arrow keys move the featured carousel
    pub keyboard_navigation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            section_snap: true,
            keyboard_navigation: true,
        }
    }
}

impl Settings {
    /// Settings with reduced motion forced on (e.g. from `prefers-reduced-motion`)
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = self.reduced_motion || reduced;
        self
    }

    /// Effective section snapping (reduced motion keeps native scrolling)
    pub fn effective_section_snap(&self) -> bool {
        self.section_snap && !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "featured_orbit_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_snap() {
        let settings = Settings::default().with_reduced_motion(true);
        assert!(settings.reduced_motion);
        assert!(!settings.effective_section_snap());
    }

    #[test]
    fn test_reduced_motion_is_sticky() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(settings.with_reduced_motion(false).reduced_motion);
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: Settings = serde_json::from_str(r#"{ "section_snap": false }"#).unwrap();
        assert!(!settings.section_snap);
        assert!(settings.keyboard_navigation);
    }
}
