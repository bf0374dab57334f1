//! Generated markup.
//!
//! Everything the widget injects into a page is rendered here with
//! [maud](https://maud.lambda.xyz/): the dot row, the thumbnail strip, and the
//! lightbox overlay. The class names in the overlay are a fixed style contract
//! the host page's CSS targets.
//!
//! Image URLs and class names are escaped as attribute values. Captions are
//! inserted as raw HTML because they *are* HTML: the inner markup of the
//! page's own caption elements, read back verbatim by the collector.

use crate::types::Slide;
use maud::{Markup, PreEscaped, html};

/// Overlay root; a click whose target is this element closes the lightbox.
pub const MODAL_CLASS: &str = "full-gallery-modal";
pub const OVERLAY_CLASS: &str = "full-gallery-overlay";
pub const CLOSE_CLASS: &str = "close-gallery";
pub const MAIN_SLIDE_CLASS: &str = "main-slide";
pub const CAPTION_CLASS: &str = "slide-caption";
pub const PREV_CLASS: &str = "prev-btn";
pub const NEXT_CLASS: &str = "next-btn";
pub const THUMBNAILS_CLASS: &str = "thumbnails-container";
pub const THUMBNAIL_CLASS: &str = "thumbnail";
/// Active marker used inside the overlay.
pub const ACTIVE_CLASS: &str = "active";

/// Rendered overlay plus the facts a host needs without re-parsing it.
#[derive(Debug, Clone)]
pub struct OverlayMarkup {
    /// Inner HTML of the `.full-gallery-modal` root.
    pub inner_html: String,
    pub thumbnails: usize,
}

impl OverlayMarkup {
    /// The complete overlay including its root element.
    pub fn to_html(&self) -> String {
        html! {
            div class=(MODAL_CLASS) { (PreEscaped(&self.inner_html)) }
        }
        .into_string()
    }
}

/// CSS `background-image` value for an image URL.
pub fn background_image(url: &str) -> String {
    format!("url('{}')", url)
}

fn background_style(url: &str) -> String {
    format!("background-image: {}", background_image(url))
}

fn class_list(base: &str, active_class: &str, active: bool) -> String {
    if active {
        format!("{base} {active_class}")
    } else {
        base.to_string()
    }
}

/// One dot per slide; the dot at `active` carries `active_class`.
pub fn dots(count: usize, active: usize, dot_class: &str, active_class: &str) -> Markup {
    html! {
        @for i in 0..count {
            div class=(class_list(dot_class, active_class, i == active)) {}
        }
    }
}

/// One thumbnail per slide showing the slide's image.
pub fn thumbnails(slides: &[Slide], active: usize, thumb_class: &str, active_class: &str) -> Markup {
    html! {
        @for (i, slide) in slides.iter().enumerate() {
            div
                class=(class_list(thumb_class, active_class, i == active))
                style=(background_style(&slide.image_url)) {}
        }
    }
}

/// The lightbox overlay opened on `slides[current]`.
///
/// `slides` must be non-empty and `current` in range; the lightbox session
/// guarantees both.
pub fn lightbox_overlay(slides: &[Slide], current: usize) -> OverlayMarkup {
    let slide = &slides[current];
    let inner = html! {
        div class=(OVERLAY_CLASS) {
            button class=(CLOSE_CLASS) { (PreEscaped("&times;")) }
            div.gallery-container {
                div class=(MAIN_SLIDE_CLASS) style=(background_style(&slide.image_url)) {
                    div class=(CAPTION_CLASS) { (PreEscaped(&slide.caption)) }
                }
                button class={ "nav-btn " (PREV_CLASS) } { "<" }
                button class={ "nav-btn " (NEXT_CLASS) } { ">" }
            }
            div class=(THUMBNAILS_CLASS) {
                (thumbnails(slides, current, THUMBNAIL_CLASS, ACTIVE_CLASS))
            }
        }
    };
    OverlayMarkup {
        inner_html: inner.into_string(),
        thumbnails: slides.len(),
    }
}
