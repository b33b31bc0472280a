//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::channel::{DEFAULT_CAPACITY, DEFAULT_SWEEP_PROBABILITY};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tunables for the effect system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Number of simultaneously-audible voices
    pub channel_capacity: usize,
    /// War sound level, 0 (combat muted) to 100 (full)
    pub war_sound_level: i32,
    /// Per-slot, per-tick probability of polling a voice for completion
    pub sweep_probability: f64,
    /// Ticks the danger alert stays raised after a danger sound triggers
    pub danger_alert_ticks: u32,
    /// Horizontal audible margin beyond the visible window, world units
    pub loose_margin_x: i32,
    /// Vertical audible margin beyond the visible window, world units
    pub loose_margin_y: i32,
    /// Minimum fog visibility for a positional trigger to be audible
    pub fog_threshold: u32,
    /// Seed for the shared effect-selection table
    pub random_seed: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CAPACITY,
            war_sound_level: 100,
            sweep_probability: DEFAULT_SWEEP_PROBABILITY,
            danger_alert_ticks: 400,
            loose_margin_x: 1024,
            loose_margin_y: 512,
            fog_threshold: 900,
            random_seed: 0,
        }
    }
}

impl Config for AudioConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipping_tuning() {
        let config = AudioConfig::default();
        assert_eq!(config.channel_capacity, 600);
        assert_eq!(config.war_sound_level, 100);
        assert_eq!(config.danger_alert_ticks, 400);
        assert_eq!(config.loose_margin_x, 1024);
        assert_eq!(config.loose_margin_y, 512);
        assert_eq!(config.fog_threshold, 900);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AudioConfig {
            war_sound_level: 55,
            ..AudioConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AudioConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.war_sound_level, 55);
        assert_eq!(parsed.channel_capacity, config.channel_capacity);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: AudioConfig = toml::from_str("war_sound_level = 30").unwrap();
        assert_eq!(parsed.war_sound_level, 30);
        assert_eq!(parsed.channel_capacity, 600);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("sfx_audio_config_{}.toml", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        let config = AudioConfig {
            channel_capacity: 32,
            ..AudioConfig::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = AudioConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.channel_capacity, 32);
    }
}
