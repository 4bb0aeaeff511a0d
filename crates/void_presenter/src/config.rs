//! Presenter configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};
use void_asset::{HitDelivery, LoadCacheConfig};

/// Presenter configuration
///
/// ```toml
/// validate_scenes = true
///
/// [loads]
/// hit_delivery = "immediate"
/// pending_warn_threshold = 512
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Check submitted scenes for duplicate publish tokens
    pub validate_scenes: bool,
    /// Load cache settings
    pub loads: LoadCacheConfig,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            validate_scenes: cfg!(debug_assertions),
            loads: LoadCacheConfig::default(),
        }
    }
}

impl PresenterConfig {
    /// Parse from TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Enable or disable scene validation
    pub fn with_validation(mut self, validate_scenes: bool) -> Self {
        self.validate_scenes = validate_scenes;
        self
    }

    /// Set load cache hit delivery
    pub fn with_hit_delivery(mut self, hit_delivery: HitDelivery) -> Self {
        self.loads.hit_delivery = hit_delivery;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PresenterError;

    #[test]
    fn test_from_toml() {
        let config = PresenterConfig::from_toml_str(
            r#"
            validate_scenes = false

            [loads]
            hit_delivery = "immediate"
            "#,
        )
        .unwrap();

        assert!(!config.validate_scenes);
        assert_eq!(config.loads.hit_delivery, HitDelivery::Immediate);
        assert_eq!(config.loads.pending_warn_threshold, 256);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PresenterConfig::from_toml_str("").unwrap();
        assert_eq!(config.validate_scenes, cfg!(debug_assertions));
        assert_eq!(config.loads.hit_delivery, HitDelivery::Deferred);
    }

    #[test]
    fn test_bad_toml() {
        let result = PresenterConfig::from_toml_str("[loads]\nhit_delivery = \"sometimes\"");
        assert!(matches!(result, Err(PresenterError::Config(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PresenterConfig::default().with_hit_delivery(HitDelivery::Immediate);
        let json = serde_json::to_string(&config).unwrap();
        let back: PresenterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.loads.hit_delivery, HitDelivery::Immediate);
        assert_eq!(back.validate_scenes, config.validate_scenes);
    }
}
