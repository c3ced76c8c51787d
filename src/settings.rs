//! Game settings
//!
//! Read once at startup and never written back.

use serde::{Deserialize, Serialize};

/// Light radii and torch flicker range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    /// Radius of the light carried by the player
    pub player_radius: f32,
    /// Base radius of each torch before flicker
    pub torch_radius: f32,
    /// Per-frame flicker factor range applied to torch radius
    pub flicker_min: f32,
    pub flicker_max: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            player_radius: 100.0,
            torch_radius: 50.0,
            flicker_min: 0.9,
            flicker_max: 1.1,
        }
    }
}

impl LightingSettings {
    /// Flicker range with bounds in order
    pub fn flicker_range(&self) -> (f32, f32) {
        if self.flicker_min <= self.flicker_max {
            (self.flicker_min, self.flicker_max)
        } else {
            (self.flicker_max, self.flicker_min)
        }
    }
}

/// Key codes (`KeyboardEvent.code`) bound to each action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub reset: String,
    pub skip: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
            up: "ArrowUp".to_string(),
            down: "ArrowDown".to_string(),
            reset: "KeyR".to_string(),
            skip: "KeyS".to_string(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lighting: LightingSettings,
    pub keys: KeyBindings,
    /// Allow the skip key to force-advance levels (debug affordance)
    pub skip_enabled: bool,
    /// Fixed flicker seed; taken from the host clock when absent
    pub flicker_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lighting: LightingSettings::default(),
            keys: KeyBindings::default(),
            skip_enabled: true,
            flicker_seed: None,
        }
    }
}

impl Settings {
    /// Element holding inline JSON settings on the page
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "game-settings";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from the page's inline JSON element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_native_load_is_default() {
        assert_eq!(Settings::load(), Settings::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "skip_enabled": false, "lighting": { "torch_radius": 80 } }"#)
                .unwrap();
        assert!(!settings.skip_enabled);
        assert_eq!(settings.lighting.torch_radius, 80.0);
        assert_eq!(settings.lighting.player_radius, 100.0);
        assert_eq!(settings.keys.reset, "KeyR");
    }

    #[test]
    fn test_flicker_range_is_ordered() {
        let lighting = LightingSettings {
            flicker_min: 1.2,
            flicker_max: 0.8,
            ..Default::default()
        };
        assert_eq!(lighting.flicker_range(), (0.8, 1.2));
        assert_eq!(LightingSettings::default().flicker_range(), (0.9, 1.1));
    }
}
