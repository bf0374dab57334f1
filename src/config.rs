//! Widget configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. Stock defaults
//! reproduce the markup contract the widget was written against; a user config
//! only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! active_class = "active"   # Marker class toggled on the current slide/dot/thumbnail
//!
//! [gestures]
//! swipe_threshold = 50.0    # Horizontal travel (px) a swipe must exceed
//!
//! [lightbox]
//! trigger = "open-full-gallery-btn"
//!
//! [inline]
//! gallery = "dotnav-gallery-iner"
//! container = "dotnav-gallery-container-iner"
//! slide = "dotnav-gallery-slide-iner"
//! caption = "dotnav-gallery-caption-iner"
//! dots = "dotnav-gallery-dots-iner"
//! dot = "dotnav-gallery-dot-iner"
//! prev = "prev-btn-iner"
//! next = "next-btn-iner"
//!
//! [autoplay]
//! gallery = "dotnav-gallery"
//! # ... same keys as [inline], plus:
//! thumbnails = "dotnav-gallery-thumbnails"
//! thumbnail = "dotnav-gallery-thumbnail"
//! interval_ms = 5000
//! ```
//!
//! The optional keys (`thumbnails`, `thumbnail`, `interval_ms`) are switched
//! off with `false`. Leaving them out keeps the stock value.
//!
//! ## Partial Configuration
//!
//! Sparse files are merged onto the stock defaults before deserializing, so
//! this is a complete config:
//!
//! ```toml
//! [autoplay]
//! interval_ms = 8000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Variant;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
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

/// Widget configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Class toggled on whichever slide, dot, and thumbnail is current.
    pub active_class: String,
    /// Touch gesture tuning.
    pub gestures: GestureConfig,
    /// Lightbox trigger.
    pub lightbox: LightboxConfig,
    /// Class names of the inline (lightbox-feeding) galleries.
    pub inline: VariantConfig,
    /// Class names and timing of the auto-advancing galleries.
    pub autoplay: VariantConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            active_class: "active".to_string(),
            gestures: GestureConfig::default(),
            lightbox: LightboxConfig::default(),
            inline: VariantConfig::default_inline(),
            autoplay: VariantConfig::default_autoplay(),
        }
    }
}

impl WidgetConfig {
    pub fn variant(&self, variant: Variant) -> &VariantConfig {
        match variant {
            Variant::Inline => &self.inline,
            Variant::Autoplay => &self.autoplay,
        }
    }

    /// Validate config values are usable as class selectors and timings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_class("active_class", &self.active_class)?;
        check_class("lightbox.trigger", &self.lightbox.trigger)?;
        if !self.gestures.swipe_threshold.is_finite() || self.gestures.swipe_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "gestures.swipe_threshold must be a non-negative number".into(),
            ));
        }
        for variant in Variant::ALL {
            let section = variant.label();
            let v = self.variant(variant);
            for (key, value) in v.required_classes() {
                check_class(&format!("{section}.{key}"), value)?;
            }
            if let Some(ref t) = v.thumbnails {
                check_class(&format!("{section}.thumbnails"), t)?;
            }
            if let Some(ref t) = v.thumbnail {
                check_class(&format!("{section}.thumbnail"), t)?;
            }
            if v.thumbnails.is_some() != v.thumbnail.is_some() {
                return Err(ConfigError::Validation(format!(
                    "{section}.thumbnails and {section}.thumbnail must be set together"
                )));
            }
            if v.interval_ms == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "{section}.interval_ms must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

fn check_class(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    if value.chars().any(|c| c.is_whitespace() || c == '.') {
        return Err(ConfigError::Validation(format!(
            "{key} must be a single class name, got {value:?}"
        )));
    }
    Ok(())
}

/// Touch gesture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// A swipe navigates only when the horizontal travel is strictly greater.
    pub swipe_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 50.0,
        }
    }
}

/// Lightbox settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// Class of the "open full gallery" button.
    pub trigger: String,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            trigger: "open-full-gallery-btn".to_string(),
        }
    }
}

/// Markup contract of one gallery family.
///
/// No serde defaults here: the two variants have different stock values, so
/// partial sections are completed by [`merge_toml`] against the stock table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantConfig {
    pub gallery: String,
    pub container: String,
    pub slide: String,
    pub caption: String,
    pub dots: String,
    pub dot: String,
    pub prev: String,
    pub next: String,
    /// Thumbnail strip container; absent = no thumbnails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Auto-advance period; absent = no auto-advance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u32>,
}

impl VariantConfig {
    pub fn default_inline() -> Self {
        Self {
            gallery: "dotnav-gallery-iner".to_string(),
            container: "dotnav-gallery-container-iner".to_string(),
            slide: "dotnav-gallery-slide-iner".to_string(),
            caption: "dotnav-gallery-caption-iner".to_string(),
            dots: "dotnav-gallery-dots-iner".to_string(),
            dot: "dotnav-gallery-dot-iner".to_string(),
            prev: "prev-btn-iner".to_string(),
            next: "next-btn-iner".to_string(),
            thumbnails: None,
            thumbnail: None,
            interval_ms: None,
        }
    }

    pub fn default_autoplay() -> Self {
        Self {
            gallery: "dotnav-gallery".to_string(),
            container: "dotnav-gallery-container".to_string(),
            slide: "dotnav-gallery-slide".to_string(),
            caption: "dotnav-gallery-caption".to_string(),
            dots: "dotnav-gallery-dots".to_string(),
            dot: "dotnav-gallery-dot".to_string(),
            prev: "dotnav-gallery-prev".to_string(),
            next: "dotnav-gallery-next".to_string(),
            thumbnails: Some("dotnav-gallery-thumbnails".to_string()),
            thumbnail: Some("dotnav-gallery-thumbnail".to_string()),
            interval_ms: Some(5000),
        }
    }

    /// Classes every gallery of this family must use.
    pub fn required_classes(&self) -> [(&'static str, &str); 8] {
        [
            ("gallery", self.gallery.as_str()),
            ("container", self.container.as_str()),
            ("slide", self.slide.as_str()),
            ("caption", self.caption.as_str()),
            ("dots", self.dots.as_str()),
            ("dot", self.dot.as_str()),
            ("prev", self.prev.as_str()),
            ("next", self.next.as_str()),
        ]
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WidgetConfig::default()).expect("default config must serialize")
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

/// Keys of a variant section that may be switched off.
const OPTIONAL_KEYS: [&str; 3] = ["thumbnails", "thumbnail", "interval_ms"];

/// Remove optional variant keys set to `false`, leaving them unset.
///
/// Merging can only add or replace keys, so `false` is how a user file turns
/// off a stock thumbnail strip or auto-advance.
fn drop_disabled(value: &mut toml::Value) {
    for variant in Variant::ALL {
        let Some(section) = value.get_mut(variant.label()).and_then(|v| v.as_table_mut()) else {
            continue;
        };
        section.retain(|key, v| {
            !(OPTIONAL_KEYS.contains(&key) && v.as_bool() == Some(false))
        });
    }
}

/// Parse a sparse TOML document and resolve it against the stock defaults.
///
/// This is the path the web binding takes for `start_with_config`.
pub fn parse_config(source: &str) -> Result<WidgetConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(source)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WidgetConfig, ConfigError> {
    let mut merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    drop_disabled(&mut merged);
    let config: WidgetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file, or stock defaults when `path` is `None`.
///
/// A path that is given but missing is an error: the user asked for it.
pub fn load_config(path: Option<&Path>) -> Result<WidgetConfig, ConfigError> {
    match path {
        Some(path) => parse_config(&fs::read_to_string(path)?),
        None => resolve_config(stock_defaults_value(), None),
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# dotnav-gallery Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# A section only needs the keys it wants to override.
# Unknown keys will cause an error.

# Class toggled on the current slide, dot and thumbnail.
active_class = "active"

# ---------------------------------------------------------------------------
# Touch gestures
# ---------------------------------------------------------------------------
[gestures]
# Horizontal travel in CSS pixels a swipe must exceed to change slides.
# A swipe of exactly this distance is ignored.
swipe_threshold = 50.0

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[lightbox]
# Class of the button that opens the full-screen gallery.
trigger = "open-full-gallery-btn"

# ---------------------------------------------------------------------------
# Inline galleries (collected into the lightbox)
# ---------------------------------------------------------------------------
[inline]
gallery = "dotnav-gallery-iner"
container = "dotnav-gallery-container-iner"
slide = "dotnav-gallery-slide-iner"
caption = "dotnav-gallery-caption-iner"
dots = "dotnav-gallery-dots-iner"
dot = "dotnav-gallery-dot-iner"
prev = "prev-btn-iner"
next = "next-btn-iner"

# ---------------------------------------------------------------------------
# Auto-advancing galleries
# ---------------------------------------------------------------------------
[autoplay]
gallery = "dotnav-gallery"
container = "dotnav-gallery-container"
slide = "dotnav-gallery-slide"
caption = "dotnav-gallery-caption"
dots = "dotnav-gallery-dots"
dot = "dotnav-gallery-dot"
prev = "dotnav-gallery-prev"
next = "dotnav-gallery-next"
# Thumbnail strip; set both keys to false to disable thumbnails.
thumbnails = "dotnav-gallery-thumbnails"
thumbnail = "dotnav-gallery-thumbnail"
# Milliseconds between automatic advances. Hovering or touching the gallery
# pauses it; leaving restarts the full interval. Set to false to disable.
interval_ms = 5000
"##
}
