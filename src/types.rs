//! Shared types passed between the collector, the controllers, and the CLI.

use serde::{Deserialize, Serialize};

/// One image + caption unit read from gallery markup.
///
/// Slides are collected once per page and never mutated afterwards. The caption
/// is the inner HTML of the slide's caption element, so it may carry markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Value of the `url(...)` in the slide's `background-image`.
    pub image_url: String,
    /// Caption inner HTML; empty when the slide has no caption element.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caption: String,
}

impl Slide {
    pub fn new(image_url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            caption: caption.into(),
        }
    }
}

/// Which markup family a gallery belongs to.
///
/// Both variants share the controller; they differ in class names, whether
/// thumbnails are rendered, and whether the gallery auto-advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Dots, prev/next buttons, swipe. Feeds the shared lightbox.
    Inline,
    /// Dots, thumbnails, prev/next buttons, swipe, timed auto-advance.
    Autoplay,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Inline, Variant::Autoplay];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Inline => "inline",
            Variant::Autoplay => "autoplay",
        }
    }
}
