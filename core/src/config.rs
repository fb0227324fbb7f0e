//! Widget configuration: loaded once at startup.
//!
//! Every field has a default, so a partial (or absent) config file
//! still yields a usable widget.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STORAGE_KEY: &str = "affiliateTracking";
pub const DEFAULT_FALLBACK_IMAGE: &str = "/images/placeholder.jpg";
pub const DEFAULT_LINK_LABEL: &str = "Läs mer & Köp";
pub const DEFAULT_EVENT_CATEGORY: &str = "monetization";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    /// Durable storage key for the tracking state.
    pub storage_key:    String,
    /// Image shown when a product image fails to load.
    pub fallback_image: String,
    /// Text of the outbound affiliate link.
    pub link_label:     String,
    /// `event_category` attached to every analytics event.
    pub event_category: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            storage_key:    DEFAULT_STORAGE_KEY.to_string(),
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
            link_label:     DEFAULT_LINK_LABEL.to_string(),
            event_category: DEFAULT_EVENT_CATEGORY.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: WidgetConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Like `load`, but an absent file yields `WidgetConfig::default()`.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No widget config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: WidgetConfig =
            serde_json::from_str(r#"{ "link_label": "Köp nu" }"#).unwrap();
        assert_eq!(config.link_label, "Köp nu");
        assert_eq!(config.storage_key, "affiliateTracking");
        assert_eq!(config.fallback_image, "/images/placeholder.jpg");
    }
}
