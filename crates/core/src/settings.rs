use serde::{Deserialize, Serialize};

use crate::projector::RenderOptions;

/// Application settings persisted by the [`ConfigManager`](crate::ConfigManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // General settings
    pub target_fps: u32,
    pub show_directory: String,

    // Preview settings
    pub preview_width: u32,
    pub preview_height: u32,
    pub transparency: i32,
    pub black_transparency: i32,

    // Audio settings
    pub audio_device: String,
    pub default_volume: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // General defaults
            target_fps: 40,
            show_directory: ".".to_string(),

            // Preview defaults
            preview_width: 800,
            preview_height: 600,
            transparency: 0,
            black_transparency: 0,

            // Audio defaults
            audio_device: "Default".to_string(),
            default_volume: 100,
        }
    }
}

impl Settings {
    /// Render options for the effect preview, where every fixture is live.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            transparency: self.transparency,
            black_transparency: self.black_transparency,
            ..Default::default()
        }
    }

    /// Render options for a layout pass. A fixture drawn for selection shows
    /// its beam as off.
    pub fn render_options_for(&self, selected: bool) -> RenderOptions {
        RenderOptions {
            active: !selected,
            ..self.render_options()
        }
    }

    /// Milliseconds between scheduler ticks at the target frame rate.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_fixtures_are_active() {
        let settings = Settings {
            transparency: 30,
            black_transparency: 70,
            ..Default::default()
        };

        let options = settings.render_options();
        assert!(options.active);
        assert_eq!(options.transparency, 30);
        assert_eq!(options.black_transparency, 70);
        assert_eq!(options.override_color, None);

        assert_eq!(settings.render_options_for(false), options);
    }

    #[test]
    fn test_selected_fixture_draws_beam_off() {
        let settings = Settings::default();
        let options = settings.render_options_for(true);
        assert!(!options.active);
        assert_eq!(options.transparency, settings.transparency);
    }

    #[test]
    fn test_frame_interval() {
        let mut settings = Settings::default();
        assert_eq!(settings.frame_interval_ms(), 25);
        settings.target_fps = 0;
        assert_eq!(settings.frame_interval_ms(), 1000);
    }
}
