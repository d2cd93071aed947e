use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "CAVITY_QUEST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/cavity_quest.toml";

/// Presentation settings. Gameplay constants are fixed and not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CavityQuestConfig {
    /// Visible width in pixels; the camera keeps the player centred within it.
    pub viewport_width: f32,
    /// Visible height in pixels; candy beans are removed below it.
    pub viewport_height: f32,
    /// Spawn the decorative candy-bean rain.
    pub rain_enabled: bool,
    /// Seed for the rain RNG, so runs replay identically.
    pub rain_seed: u64,
}

impl Default for CavityQuestConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            rain_enabled: true,
            rain_seed: 0xCA71_7E55,
        }
    }
}

impl CavityQuestConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && let Some(config) = Self::load_file(&path)
        {
            return config;
        }
        Self::load_file(DEFAULT_CONFIG_PATH).unwrap_or_default()
    }

    fn load_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match Self::from_toml_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path, error = %e, "Invalid config file, ignoring");
                None
            },
        }
    }

    /// Parse a config, replacing unusable viewport sizes with the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(contents)?;
        let defaults = Self::default();
        if !(config.viewport_width.is_finite() && config.viewport_width > 0.0) {
            warn!(
                viewport_width = config.viewport_width,
                "Invalid viewport width, using default"
            );
            config.viewport_width = defaults.viewport_width;
        }
        if !(config.viewport_height.is_finite() && config.viewport_height > 0.0) {
            warn!(
                viewport_height = config.viewport_height,
                "Invalid viewport height, using default"
            );
            config.viewport_height = defaults.viewport_height;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = CavityQuestConfig::from_toml_str("rain_enabled = false").unwrap();
        assert!(!config.rain_enabled);
        assert_eq!(config.viewport_width, 800.0);
        assert_eq!(config.viewport_height, 600.0);
    }

    #[test]
    fn full_config_parses() {
        let src = r#"
            viewport_width = 1024.0
            viewport_height = 768.0
            rain_enabled = true
            rain_seed = 42
        "#;
        let config = CavityQuestConfig::from_toml_str(src).unwrap();
        assert_eq!(config.viewport_width, 1024.0);
        assert_eq!(config.rain_seed, 42);
    }

    #[test]
    fn non_positive_viewport_falls_back() {
        let src = "viewport_width = -5.0\nviewport_height = 0.0";
        let config = CavityQuestConfig::from_toml_str(src).unwrap();
        assert_eq!(config, CavityQuestConfig::default());
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(CavityQuestConfig::from_toml_str("viewport_width = \"wide\"").is_err());
    }
}
