//! Slide collection.
//!
//! Scans a page once for every gallery of a variant and reads each slide's
//! image URL and caption. Order is document order: galleries as they appear,
//! slides within a gallery as they appear. The flattened list feeds the
//! lightbox.
//!
//! ## Failing Soft
//!
//! - A slide without a caption element gets an empty caption.
//! - A slide whose background image has no `url(...)` is skipped and counted
//!   in [`CollectedGallery::skipped`].
//! - A gallery with zero slides stays in the [`Collection`] (the audit reports
//!   it) but contributes nothing to the lightbox.
//!
//! ## Page Sources
//!
//! The collector is written against [`PageSource`], a read-only view of a
//! document that can find elements by class and read their background image
//! and inner HTML. The `web` binding implements it over the live DOM; the CLI
//! implements it over static HTML (see `static_page`).

use crate::config::VariantConfig;
use crate::types::Slide;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only access to a document's elements.
pub trait PageSource {
    type Node<'a>: Clone
    where
        Self: 'a;

    /// Every element in the document carrying `class`, in document order.
    fn select_all<'a>(&'a self, class: &str) -> Vec<Self::Node<'a>>;

    /// Descendants of `node` carrying `class`, in document order.
    fn select_within<'a>(&'a self, node: &Self::Node<'a>, class: &str) -> Vec<Self::Node<'a>>;

    /// The element's `background-image` CSS value, if it has one.
    fn background_image<'a>(&'a self, node: &Self::Node<'a>) -> Option<String>;

    fn inner_html<'a>(&'a self, node: &Self::Node<'a>) -> String;

    /// First descendant of `node` carrying `class`.
    fn find_within<'a>(&'a self, node: &Self::Node<'a>, class: &str) -> Option<Self::Node<'a>> {
        self.select_within(node, class).into_iter().next()
    }
}

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?(.*?)["']?\)"#).expect("valid url() pattern"));

/// Extract the URL from a CSS value such as `url("a.jpg")`.
///
/// Quotes are optional. The match is lazy, so the first `url(...)` of a
/// layered background wins. `none` and empty values yield `None`.
pub fn css_url(value: &str) -> Option<&str> {
    CSS_URL
        .captures(value)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|url| !url.is_empty())
}

/// Slides found in one gallery container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedGallery {
    /// Slides with a usable image, in document order.
    pub slides: Vec<Slide>,
    /// Slide elements dropped for lacking a background image URL.
    #[serde(skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Every gallery of one variant on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    pub galleries: Vec<CollectedGallery>,
}

impl Collection {
    /// All slides across all galleries, in document order.
    pub fn slides(&self) -> Vec<Slide> {
        self.galleries
            .iter()
            .flat_map(|g| g.slides.iter().cloned())
            .collect()
    }

    pub fn slide_count(&self) -> usize {
        self.galleries.iter().map(|g| g.slides.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, CollectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read one slide element. `None` when it has no background image URL.
pub fn read_slide<'a, P: PageSource>(
    page: &'a P,
    slide: &P::Node<'a>,
    caption_class: &str,
) -> Option<Slide> {
    let background = page.background_image(slide)?;
    let image_url = css_url(&background)?.to_string();
    let caption = page
        .find_within(slide, caption_class)
        .map(|c| page.inner_html(&c))
        .unwrap_or_default();
    Some(Slide { image_url, caption })
}

/// Collect the slides of a single gallery element.
pub fn collect_gallery<'a, P: PageSource>(
    page: &'a P,
    gallery: &P::Node<'a>,
    classes: &VariantConfig,
) -> CollectedGallery {
    let mut slides = Vec::new();
    let mut skipped = 0;
    for (i, node) in page.select_within(gallery, &classes.slide).iter().enumerate() {
        match read_slide(page, node, &classes.caption) {
            Some(slide) => slides.push(slide),
            None => {
                log::debug!("skipping slide {i} of .{}: no background image", classes.gallery);
                skipped += 1;
            }
        }
    }
    CollectedGallery { slides, skipped }
}

/// Collect every gallery of a variant on `page`.
pub fn collect<P: PageSource>(page: &P, classes: &VariantConfig) -> Collection {
    let galleries = page
        .select_all(&classes.gallery)
        .iter()
        .map(|g| collect_gallery(page, g, classes))
        .collect();
    Collection { galleries }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::static_page::StaticPage;

    fn inline() -> VariantConfig {
        WidgetConfig::default().inline
    }

    fn slide(url: &str, caption: Option<&str>) -> String {
        let caption = caption
            .map(|c| format!(r#"<div class="dotnav-gallery-caption-iner">{c}</div>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="dotnav-gallery-slide-iner" style="background-image: url('{url}')">{caption}</div>"#
        )
    }

    fn gallery(slides: &[String]) -> String {
        format!(
            r#"<div class="dotnav-gallery-iner"><div class="dotnav-gallery-container-iner">{}</div></div>"#,
            slides.concat()
        )
    }

    #[test]
    fn css_url_variants() {
        assert_eq!(css_url(r#"url("a.jpg")"#), Some("a.jpg"));
        assert_eq!(css_url("url('b.jpg')"), Some("b.jpg"));
        assert_eq!(css_url("url(c.jpg)"), Some("c.jpg"));
        assert_eq!(
            css_url(r#"url("https://x.test/p.jpg?w=1")"#),
            Some("https://x.test/p.jpg?w=1")
        );
    }

    #[test]
    fn css_url_first_layer_wins() {
        assert_eq!(css_url("url(a.png), url(b.png)"), Some("a.png"));
    }

    #[test]
    fn css_url_rejects_none() {
        assert_eq!(css_url("none"), None);
        assert_eq!(css_url(""), None);
        assert_eq!(css_url("url()"), None);
    }

    #[test]
    fn collects_in_document_order() {
        let html = format!(
            "{}{}",
            gallery(&[slide("a1.jpg", Some("A1")), slide("a2.jpg", Some("A2"))]),
            gallery(&[slide("b1.jpg", Some("B1"))]),
        );
        let page = StaticPage::parse(&html);
        let collection = collect(&page, &inline());
        assert_eq!(collection.galleries.len(), 2);
        let urls: Vec<_> = collection
            .slides()
            .into_iter()
            .map(|s| s.image_url)
            .collect();
        assert_eq!(urls, vec!["a1.jpg", "a2.jpg", "b1.jpg"]);
        assert_eq!(collection.slide_count(), 3);
    }

    #[test]
    fn caption_keeps_inner_html() {
        let html = gallery(&[slide("a.jpg", Some("Dawn <em>light</em>"))]);
        let page = StaticPage::parse(&html);
        let collection = collect(&page, &inline());
        assert_eq!(collection.slides()[0].caption, "Dawn <em>light</em>");
    }

    #[test]
    fn missing_caption_is_empty() {
        let html = gallery(&[slide("a.jpg", None)]);
        let page = StaticPage::parse(&html);
        let slides = collect(&page, &inline()).slides();
        assert_eq!(slides, vec![Slide::new("a.jpg", "")]);
    }

    #[test]
    fn slide_without_image_is_skipped() {
        let html = gallery(&[
            slide("a.jpg", None),
            r#"<div class="dotnav-gallery-slide-iner">no image</div>"#.to_string(),
        ]);
        let page = StaticPage::parse(&html);
        let collection = collect(&page, &inline());
        assert_eq!(collection.galleries[0].slides.len(), 1);
        assert_eq!(collection.galleries[0].skipped, 1);
    }

    #[test]
    fn empty_gallery_is_kept_but_contributes_nothing() {
        let html = format!("{}{}", gallery(&[]), gallery(&[slide("a.jpg", None)]));
        let page = StaticPage::parse(&html);
        let collection = collect(&page, &inline());
        assert_eq!(collection.galleries.len(), 2);
        assert!(collection.galleries[0].slides.is_empty());
        assert_eq!(collection.slide_count(), 1);
    }

    #[test]
    fn no_galleries_is_empty_collection() {
        let page = StaticPage::parse("<p>nothing here</p>");
        let collection = collect(&page, &inline());
        assert_eq!(collection, Collection::default());
        assert!(collection.slides().is_empty());
    }

    #[test]
    fn other_variant_is_not_collected() {
        let html = gallery(&[slide("a.jpg", None)]);
        let page = StaticPage::parse(&html);
        let autoplay = WidgetConfig::default().autoplay;
        assert!(collect(&page, &autoplay).galleries.is_empty());
    }

    #[test]
    fn json_omits_empty_fields() {
        let html = gallery(&[slide("a.jpg", None)]);
        let page = StaticPage::parse(&html);
        let json = collect(&page, &inline()).to_json().unwrap();
        assert!(json.contains(r#""image_url": "a.jpg""#));
        assert!(!json.contains("caption"));
        assert!(!json.contains("skipped"));
    }
}
