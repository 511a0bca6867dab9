//! # Player Configuration
//!
//! Tunables for the shared video session and the mini-window transition.
//!
//! ## Overview
//!
//! Sizes are expressed in density-independent pixels (dp) and converted to
//! pixels against the current display density when a transition needs them.
//! Every field has a serde default, so a host can ship a partial JSON
//! document and only override what it cares about.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::builder()
//!     .position_cache_capacity(50)
//!     .mini_layout_margin_dp(12.0)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.position_cache_capacity, 50);
//! ```
//!
//! ```
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::from_json_str(r#"{ "min_video_width_dp": 120 }"#).unwrap();
//! assert_eq!(config.min_video_width_dp, 120.0);
//! assert_eq!(config.min_video_height_dp, 100.0);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the video session and its mini-window transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Number of resume positions remembered, least recently used evicted first.
    ///
    /// Default: 20.
    #[serde(default = "default_position_cache_capacity")]
    pub position_cache_capacity: usize,

    /// Mini window width used for portrait or square content.
    ///
    /// Default: 100dp.
    #[serde(default = "default_min_video_width_dp")]
    pub min_video_width_dp: f32,

    /// Mini window height used for landscape content.
    ///
    /// Default: 100dp.
    #[serde(default = "default_min_video_height_dp")]
    pub min_video_height_dp: f32,

    /// Inset of the mini window from the bottom-right display corner.
    ///
    /// Default: 16dp.
    #[serde(default = "default_mini_layout_margin_dp")]
    pub mini_layout_margin_dp: f32,

    /// Fraction of the display height above which a released drag returns to
    /// the full layout instead of entering the mini window.
    ///
    /// Default: 0.5.
    #[serde(default = "default_return_full_threshold")]
    pub return_full_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position_cache_capacity: default_position_cache_capacity(),
            min_video_width_dp: default_min_video_width_dp(),
            min_video_height_dp: default_min_video_height_dp(),
            mini_layout_margin_dp: default_mini_layout_margin_dp(),
            return_full_threshold: default_return_full_threshold(),
        }
    }
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid player config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.position_cache_capacity == 0 {
            return Err(Error::Config(
                "position_cache_capacity must be > 0".to_string(),
            ));
        }

        if !(self.min_video_width_dp > 0.0) {
            return Err(Error::Config("min_video_width_dp must be > 0".to_string()));
        }

        if !(self.min_video_height_dp > 0.0) {
            return Err(Error::Config("min_video_height_dp must be > 0".to_string()));
        }

        if !(self.mini_layout_margin_dp >= 0.0) {
            return Err(Error::Config(
                "mini_layout_margin_dp cannot be negative".to_string(),
            ));
        }

        if !(self.return_full_threshold > 0.0 && self.return_full_threshold < 1.0) {
            return Err(Error::Config(
                "return_full_threshold must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for [`PlayerConfig`]; [`build`](PlayerConfigBuilder::build)
/// validates before returning.
#[derive(Debug, Clone, Default)]
pub struct PlayerConfigBuilder {
    config: PlayerConfig,
}

impl PlayerConfigBuilder {
    pub fn position_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.position_cache_capacity = capacity;
        self
    }

    pub fn min_video_width_dp(mut self, dp: f32) -> Self {
        self.config.min_video_width_dp = dp;
        self
    }

    pub fn min_video_height_dp(mut self, dp: f32) -> Self {
        self.config.min_video_height_dp = dp;
        self
    }

    pub fn mini_layout_margin_dp(mut self, dp: f32) -> Self {
        self.config.mini_layout_margin_dp = dp;
        self
    }

    pub fn return_full_threshold(mut self, fraction: f32) -> Self {
        self.config.return_full_threshold = fraction;
        self
    }

    pub fn build(self) -> Result<PlayerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_position_cache_capacity() -> usize {
    20
}

fn default_min_video_width_dp() -> f32 {
    100.0
}

fn default_min_video_height_dp() -> f32 {
    100.0
}

fn default_mini_layout_margin_dp() -> f32 {
    16.0
}

fn default_return_full_threshold() -> f32 {
    0.5
}
