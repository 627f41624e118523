use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltedConfig {
    #[serde(default)]
    pub instance: InstanceConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Base URL of the server, e.g. "https://mastodon.example".
    #[serde(default)]
    pub base_url: String,

    /// OAuth access token with `write:media` scope.
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Whether to fetch and render attachment previews in the dialog.
    #[serde(default = "default_true")]
    pub show_previews: bool,

    /// How long a failure toast stays visible, in ticks (one tick = 100ms).
    #[serde(default = "default_toast_ticks")]
    pub toast_ticks: u16,
}

fn default_true() -> bool {
    true
}
fn default_toast_ticks() -> u16 {
    40
}

impl Default for AltedConfig {
    fn default() -> Self {
        Self {
            instance: InstanceConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            access_token: String::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_previews: default_true(),
            toast_ticks: default_toast_ticks(),
        }
    }
}

impl AltedConfig {
    /// Load config from ~/.config/alted/config.toml, creating defaults if missing.
    pub fn load() -> crate::error::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|e| {
                crate::error::AltedError::Config(format!("Failed to read config: {e}"))
            })?;
            let config: AltedConfig = toml::from_str(&contents).map_err(|e| {
                crate::error::AltedError::Config(format!("Failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            let config = AltedConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> crate::error::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            crate::error::AltedError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> crate::error::Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            crate::error::AltedError::Config("Could not determine config directory".into())
        })?;
        Ok(config_dir.join("alted").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: AltedConfig = toml::from_str("").unwrap();
        assert!(config.ui.show_previews);
        assert_eq!(config.ui.toast_ticks, 40);
        assert!(config.instance.base_url.is_empty());
    }

    #[test]
    fn partial_config_parses() {
        let config: AltedConfig = toml::from_str(
            "[instance]\nbase_url = \"https://mastodon.example\"\n",
        )
        .unwrap();
        assert_eq!(config.instance.base_url, "https://mastodon.example");
        assert!(config.instance.access_token.is_empty());
        assert_eq!(config.ui.toast_ticks, 40);
    }

    #[test]
    fn roundtrips_through_toml() {
        let mut config = AltedConfig::default();
        config.instance.base_url = "https://example.social".to_string();
        config.ui.toast_ticks = 20;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AltedConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.instance.base_url, "https://example.social");
        assert_eq!(back.ui.toast_ticks, 20);
    }
}
