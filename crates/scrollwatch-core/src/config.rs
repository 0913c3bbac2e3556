use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::container::STICKY_HEADER_ATTRIBUTE;
use crate::host::ScrollBehavior;
use crate::visibility::DEFAULT_MARGIN;
use crate::watcher::WatchParams;

/// Defaults applied by [`crate::Scroller`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Tolerance in pixels for edge visibility checks
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Compensate for sticky headers when scrolling to the bottom
    #[serde(default = "default_true")]
    pub add_sticky: bool,
    /// Attribute carrying a sticky header height
    #[serde(default = "default_sticky_attribute")]
    pub sticky_attribute: String,
    /// Behavior hint for commands that don't specify one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<ScrollBehavior>,
    /// Drop a watcher's listener when its element is found detached,
    /// instead of idling until it is re-attached or cancelled
    #[serde(default)]
    pub release_detached: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            add_sticky: default_true(),
            sticky_attribute: default_sticky_attribute(),
            behavior: None,
            release_detached: false,
        }
    }
}

impl WatchConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file or return defaults
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    fn validate(&self) -> crate::Result<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(crate::Error::Config(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if self.sticky_attribute.trim().is_empty() {
            return Err(crate::Error::Config(
                "sticky_attribute must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Watcher tuning derived from this configuration
    pub fn watch_params(&self) -> WatchParams {
        WatchParams {
            margin: self.margin,
            release_detached: self.release_detached,
        }
    }
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

fn default_true() -> bool {
    true
}

fn default_sticky_attribute() -> String {
    STICKY_HEADER_ATTRIBUTE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WatchConfig::default();
        assert_eq!(config.margin, 1.0);
        assert!(config.add_sticky);
        assert_eq!(config.sticky_attribute, "data-sticky-container-header-height");
        assert_eq!(config.behavior, None);
        assert!(!config.release_detached);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WatchConfig::from_toml_str(
            r#"
            margin = 4.0
            behavior = "smooth"
            "#,
        )
        .unwrap();
        assert_eq!(config.margin, 4.0);
        assert_eq!(config.behavior, Some(ScrollBehavior::Smooth));
        assert!(config.add_sticky);
        assert_eq!(config.sticky_attribute, STICKY_HEADER_ATTRIBUTE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            WatchConfig::from_toml_str("margin = -1.0"),
            Err(crate::Error::Config(_))
        ));
        assert!(matches!(
            WatchConfig::from_toml_str("sticky_attribute = \"  \""),
            Err(crate::Error::Config(_))
        ));
        assert!(matches!(
            WatchConfig::from_toml_str("behavior = \"bouncy\""),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WatchConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WatchConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scrollwatch.toml");
        let config = WatchConfig {
            margin: 2.5,
            add_sticky: false,
            behavior: Some(ScrollBehavior::Instant),
            release_detached: true,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(WatchConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_watch_params() {
        let config = WatchConfig {
            margin: 3.0,
            release_detached: true,
            ..Default::default()
        };
        let params = config.watch_params();
        assert_eq!(params.margin, 3.0);
        assert!(params.release_detached);
    }
}
