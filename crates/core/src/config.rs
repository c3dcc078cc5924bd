use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Settings;

/// Configuration manager for Lumen settings
/// Provides a layered configuration system that separates schema, available options, and persisted
/// values. Configuration is stored in the user's config directory by default
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

/// Available configuration options with validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    pub general: GeneralConfigSchema,
    pub preview: PreviewConfigSchema,
    pub audio: AudioConfigSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfigSchema {
    pub target_fps: ConfigOption<u32>,
    pub show_directory: ConfigOption<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfigSchema {
    pub preview_width: ConfigOption<u32>,
    pub preview_height: ConfigOption<u32>,
    pub transparency: ConfigOption<i32>,
    pub black_transparency: ConfigOption<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfigSchema {
    pub audio_device: ConfigOption<String>,
    pub default_volume: ConfigOption<u32>,
}

/// Configuration option with validation and available choices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption<T> {
    pub default: T,
    pub valid_range: Option<(T, T)>,
    pub valid_choices: Option<Vec<T>>,
    pub description: String,
    pub requires_restart: bool,
}

impl<T: PartialOrd + std::fmt::Display> ConfigOption<T> {
    fn check(&self, name: &str, value: &T, errors: &mut Vec<String>) {
        if let Some((min, max)) = &self.valid_range {
            if value < min || value > max {
                errors.push(format!("{} must be between {} and {}", name, min, max));
            }
        }
    }
}

/// Persisted configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub settings: Settings,
    pub created_at: String,
    pub modified_at: String,
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("lumen").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

impl ConfigManager {
    /// Create a new configuration manager
    /// If no path is provided, defaults to 'lumen/config.json' in the user's config directory
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(default_config_path);

        Self {
            config_path,
            settings: Settings::default(),
        }
    }

    /// Load settings from configuration file
    /// Writes and returns default settings if the file doesn't exist yet
    pub fn load(&mut self) -> Result<Settings, ConfigError> {
        if !self.config_path.exists() {
            self.save()?;
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config_file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Validate version compatibility
        if config_file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Config file version {} doesn't match application version {}. Using defaults for new settings.",
                config_file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        Self::validate_settings(&config_file.settings).map_err(ConfigError::ValidationError)?;

        self.settings = config_file.settings;
        Ok(self.settings.clone())
    }

    /// Save current settings to configuration file
    pub fn save(&self) -> Result<(), ConfigError> {
        // Ensure config directory exists (if config is in a subdirectory)
        if let Some(parent) = self.config_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        let created_at = self
            .read_created_at()
            .unwrap_or_else(|| now.clone());

        let config_file = ConfigFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings: self.settings.clone(),
            created_at,
            modified_at: now,
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        log::debug!("Saved settings to {}", self.config_path.display());
        Ok(())
    }

    fn read_created_at(&self) -> Option<String> {
        let content = fs::read_to_string(&self.config_path).ok()?;
        let config_file: ConfigFile = serde_json::from_str(&content).ok()?;
        Some(config_file.created_at)
    }

    /// Validate, update settings and save to file
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        Self::validate_settings(&settings).map_err(ConfigError::ValidationError)?;
        self.settings = settings;
        self.save()
    }

    /// Get current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get configuration schema with available options
    pub fn schema() -> ConfigSchema {
        ConfigSchema {
            general: GeneralConfigSchema {
                target_fps: ConfigOption {
                    default: 40,
                    valid_range: Some((10, 120)),
                    valid_choices: None,
                    description: "Scheduler tick rate in frames per second".to_string(),
                    requires_restart: false,
                },
                show_directory: ConfigOption {
                    default: ".".to_string(),
                    valid_range: None,
                    valid_choices: None,
                    description: "Directory searched for show files".to_string(),
                    requires_restart: false,
                },
            },
            preview: PreviewConfigSchema {
                preview_width: ConfigOption {
                    default: 800,
                    valid_range: Some((64, 8192)),
                    valid_choices: None,
                    description: "Width of the preview canvas".to_string(),
                    requires_restart: false,
                },
                preview_height: ConfigOption {
                    default: 600,
                    valid_range: Some((64, 8192)),
                    valid_choices: None,
                    description: "Height of the preview canvas".to_string(),
                    requires_restart: false,
                },
                transparency: ConfigOption {
                    default: 0,
                    valid_range: Some((0, 100)),
                    valid_choices: None,
                    description: "Transparency of fixture bodies and beams (percent)".to_string(),
                    requires_restart: false,
                },
                black_transparency: ConfigOption {
                    default: 0,
                    valid_range: Some((0, 100)),
                    valid_choices: None,
                    description: "Transparency used for black silhouette passes (percent)"
                        .to_string(),
                    requires_restart: false,
                },
            },
            audio: AudioConfigSchema {
                audio_device: ConfigOption {
                    default: "Default".to_string(),
                    valid_range: None,
                    valid_choices: None, // Will be populated from system enumeration
                    description: "Audio output device for playlist audio".to_string(),
                    requires_restart: true,
                },
                default_volume: ConfigOption {
                    default: 100,
                    valid_range: Some((0, 100)),
                    valid_choices: None,
                    description: "Volume for audio items without their own volume".to_string(),
                    requires_restart: false,
                },
            },
        }
    }

    /// Validate settings against schema
    pub fn validate_settings(settings: &Settings) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let schema = Self::schema();

        schema
            .general
            .target_fps
            .check("target_fps", &settings.target_fps, &mut errors);
        schema
            .preview
            .preview_width
            .check("preview_width", &settings.preview_width, &mut errors);
        schema
            .preview
            .preview_height
            .check("preview_height", &settings.preview_height, &mut errors);
        schema
            .preview
            .transparency
            .check("transparency", &settings.transparency, &mut errors);
        schema.preview.black_transparency.check(
            "black_transparency",
            &settings.black_transparency,
            &mut errors,
        );
        schema
            .audio
            .default_volume
            .check("default_volume", &settings.default_volume, &mut errors);

        if settings.audio_device.trim().is_empty() {
            errors.push("audio_device must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Reset settings to defaults
    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.settings = Settings::default();
        self.save()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    ReadError(String),
    WriteError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(msg) => write!(f, "Failed to read config file: {}", msg),
            ConfigError::WriteError(msg) => write!(f, "Failed to write config file: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
            ConfigError::SerializeError(msg) => write!(f, "Failed to serialize config: {}", msg),
            ConfigError::ValidationError(errors) => {
                write!(f, "Config validation errors: {}", errors.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
