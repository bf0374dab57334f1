//! Markup contract checks.
//!
//! The widget trusts the page: a gallery missing its dots container or a
//! button is a markup bug, not a runtime condition. This module finds those
//! bugs ahead of time. [`missing_parts`] is also what the browser binding uses
//! to skip a broken gallery instead of failing the whole page.

use crate::collect::{self, PageSource};
use crate::config::{VariantConfig, WidgetConfig};
use crate::types::Variant;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Variant and 1-based position of the offending gallery, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<(Variant, usize)>,
    pub message: String,
}

impl Finding {
    fn error(gallery: (Variant, usize), message: String) -> Self {
        Self {
            severity: Severity::Error,
            gallery: Some(gallery),
            message,
        }
    }

    fn warning(gallery: Option<(Variant, usize)>, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            gallery,
            message,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Audit {
    pub inline_galleries: usize,
    pub autoplay_galleries: usize,
    pub findings: Vec<Finding>,
}

impl Audit {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn errors(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.findings.len() - self.errors()
    }
}

/// Roles (config keys) of required children absent from `gallery`.
pub fn missing_parts<'a, P: PageSource>(
    page: &'a P,
    gallery: &P::Node<'a>,
    classes: &VariantConfig,
) -> Vec<&'static str> {
    let mut required = vec![
        ("container", classes.container.as_str()),
        ("dots", classes.dots.as_str()),
        ("prev", classes.prev.as_str()),
        ("next", classes.next.as_str()),
    ];
    if let Some(ref thumbs) = classes.thumbnails {
        required.push(("thumbnails", thumbs.as_str()));
    }
    required
        .into_iter()
        .filter(|(_, class)| page.find_within(gallery, class).is_none())
        .map(|(role, _)| role)
        .collect()
}

/// Check every gallery of both variants plus the lightbox trigger.
pub fn audit<P: PageSource>(page: &P, config: &WidgetConfig) -> Audit {
    let mut audit = Audit::default();
    let mut inline_slides = 0;

    for variant in Variant::ALL {
        let classes = config.variant(variant);
        let galleries = page.select_all(&classes.gallery);
        match variant {
            Variant::Inline => audit.inline_galleries = galleries.len(),
            Variant::Autoplay => audit.autoplay_galleries = galleries.len(),
        }

        for (i, gallery) in galleries.iter().enumerate() {
            let at = (variant, i + 1);
            for role in missing_parts(page, gallery, classes) {
                let class = match role {
                    "container" => &classes.container,
                    "dots" => &classes.dots,
                    "prev" => &classes.prev,
                    "next" => &classes.next,
                    _ => classes.thumbnails.as_ref().unwrap_or(&classes.dots),
                };
                audit
                    .findings
                    .push(Finding::error(at, format!("missing {role} element .{class}")));
            }

            let collected = collect::collect_gallery(page, gallery, classes);
            if collected.slides.is_empty() && collected.skipped == 0 {
                audit
                    .findings
                    .push(Finding::warning(Some(at), format!("no .{} elements", classes.slide)));
            }
            if collected.skipped > 0 {
                audit.findings.push(Finding::warning(
                    Some(at),
                    format!(
                        "{} slide(s) without a background-image url(), skipped",
                        collected.skipped
                    ),
                ));
            }
            if variant == Variant::Inline {
                inline_slides += collected.slides.len();
            }
        }
    }

    let trigger = &config.lightbox.trigger;
    let has_trigger = !page.select_all(trigger).is_empty();
    if audit.inline_galleries > 0 && !has_trigger {
        audit.findings.push(Finding::warning(
            None,
            format!("no .{trigger} button; the lightbox cannot be opened"),
        ));
    }
    if has_trigger && inline_slides == 0 {
        audit.findings.push(Finding::warning(
            None,
            format!(".{trigger} present but there are no inline slides to show"),
        ));
    }
    if audit.inline_galleries + audit.autoplay_galleries == 0 {
        audit
            .findings
            .push(Finding::warning(None, "no galleries found".to_string()));
    }
    audit
}
