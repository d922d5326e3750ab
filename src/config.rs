//! Engine configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file is
//! sparse: stock defaults are the base layer and the site's `config.toml`
//! overrides only the keys it names.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml      # Overrides stock defaults
//! ├── catalog.toml     # Optional, replaces the builtin catalog
//! └── posts.toml       # Optional, replaces the builtin blog posts
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [loader]
//! base_delay_ms = 500       # Delay before the first image load
//! stagger_ms = 100          # Added per catalog position
//! notify_failures = true    # Warn the user when an image fails
//!
//! [gallery]
//! special_from = 8          # Cards from this position get the `special` style
//!
//! [lightbox]
//! arrow_keys = false        # ArrowLeft/ArrowRight navigation
//!
//! [notifications]
//! dismiss_after_ms = 5000   # Toast lifetime
//!
//! [blog]
//! pages = 3                 # Pagination buttons under the post listing
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::blog::DEFAULT_PAGES;
use crate::loader::{DEFAULT_BASE_DELAY, DEFAULT_SPECIAL_FROM, DEFAULT_STAGGER, LoaderConfig};
use crate::notify::DEFAULT_DISMISS_AFTER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Staggered image loading.
    pub loader: LoaderSection,
    /// Card grid presentation.
    pub gallery: GallerySection,
    /// Modal viewer input handling.
    pub lightbox: LightboxSection,
    /// Toast lifetime.
    pub notifications: NotificationsSection,
    /// Blog listing.
    pub blog: BlogSection,
}

impl EngineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notifications.dismiss_after_ms == 0 {
            return Err(ConfigError::Validation(
                "notifications.dismiss_after_ms must be greater than 0".into(),
            ));
        }
        if self.blog.pages == 0 {
            return Err(ConfigError::Validation(
                "blog.pages must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Loader timing plus the gallery's `special` threshold.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            base_delay: Duration::from_millis(self.loader.base_delay_ms),
            stagger: Duration::from_millis(self.loader.stagger_ms),
            special_from: self.gallery.special_from,
        }
    }

    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.notifications.dismiss_after_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSection {
    pub base_delay_ms: u64,
    pub stagger_ms: u64,
    pub notify_failures: bool,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            stagger_ms: DEFAULT_STAGGER.as_millis() as u64,
            notify_failures: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySection {
    pub special_from: usize,
}

impl Default for GallerySection {
    fn default() -> Self {
        Self {
            special_from: DEFAULT_SPECIAL_FROM,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxSection {
    pub arrow_keys: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationsSection {
    pub dismiss_after_ms: u64,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            dismiss_after_ms: DEFAULT_DISMISS_AFTER.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogSection {
    pub pages: u32,
}

impl Default for BlogSection {
    fn default() -> Self {
        Self {
            pages: DEFAULT_PAGES,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EngineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EngineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EngineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<EngineConfig, ConfigError> {
    let overlay = load_raw_config(root)?;
    if overlay.is_some() {
        tracing::debug!(dir = %root.display(), "merging config.toml onto stock defaults");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to catalog.toml in the site directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Image loading
# ---------------------------------------------------------------------------
[loader]
# Delay before the first card's image starts loading (milliseconds).
base_delay_ms = 500

# Extra delay per catalog position, so images appear one after another.
stagger_ms = 100

# Show a warning toast when an image fails to load.
notify_failures = true

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# Cards at this position and later get the `special` placeholder style.
special_from = 8

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[lightbox]
# Navigate with ArrowLeft/ArrowRight. Escape always closes.
arrow_keys = false

# ---------------------------------------------------------------------------
# Notifications
# ---------------------------------------------------------------------------
[notifications]
# How long a toast stays up before dismissing itself (milliseconds).
dismiss_after_ms = 5000

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
# Number of pagination buttons under the post listing.
pages = 3
"##
}
