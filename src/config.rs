//! Crate configuration, loaded once at startup by the host

use crate::geometry::VerticalExtent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse realms config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Deployment-wide settings for claim geometry and the display path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmsConfig {
    /// Vertical span convention for every claim box
    pub vertical_extent: VerticalExtent,

    /// Distance within which observers receive boundary visuals. Consumed
    /// by the host's display path, not by the queries in this crate.
    pub viewer_range: f64,
}

impl Default for RealmsConfig {
    fn default() -> Self {
        Self {
            vertical_extent: VerticalExtent::MatchRadius,
            viewer_range: 128.0,
        }
    }
}

impl RealmsConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}
