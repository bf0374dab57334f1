//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Galleries have no names in the page, so their identity is their position:
//! the n-th gallery of a variant in document order. Slides are shown by image
//! URL with the caption (tags stripped, truncated) as an indented context line.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Inline galleries
//! 001 (2 slides)
//!     001 img/dawn.jpg
//!         Caption: Dawn over the bay
//!     002 img/dusk.jpg
//!
//! Autoplay galleries
//! 001 (3 slides)
//!     Skipped: 1 slide without an image
//!     ...
//!
//! Lightbox: 2 slides
//! ```
//!
//! ## Check
//!
//! ```text
//! Inline galleries: 1
//! Autoplay galleries: 1
//! error   autoplay 001: missing thumbnails element .dotnav-gallery-thumbnails
//! warning page: no galleries found
//!
//! 1 error, 1 warning
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::collect::{CollectedGallery, Collection};
use crate::contract::{Audit, Finding, Severity};
use crate::types::Variant;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_caption(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn variant_heading(variant: Variant) -> &'static str {
    match variant {
        Variant::Inline => "Inline galleries",
        Variant::Autoplay => "Autoplay galleries",
    }
}

// ============================================================================
// Scan
// ============================================================================

fn format_gallery(index: usize, gallery: &CollectedGallery) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        format_index(index),
        plural(gallery.slides.len(), "slide")
    )];
    if gallery.skipped > 0 {
        lines.push(format!(
            "{}Skipped: {} without an image",
            indent(1),
            plural(gallery.skipped, "slide")
        ));
    }
    for (i, slide) in gallery.slides.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), slide.image_url));
        let caption = strip_html_tags(&slide.caption);
        let caption = caption.trim();
        if !caption.is_empty() {
            lines.push(format!(
                "{}Caption: {}",
                indent(2),
                truncate_caption(caption, 60)
            ));
        }
    }
    lines
}

/// Collected galleries per variant, followed by the lightbox slide count.
///
/// The lightbox is fed by the inline variant only.
pub fn format_scan_output(collections: &[(Variant, Collection)]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut lightbox = 0;

    for (variant, collection) in collections {
        if collection.galleries.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(variant_heading(*variant).to_string());
        for (i, gallery) in collection.galleries.iter().enumerate() {
            lines.extend(format_gallery(i + 1, gallery));
        }
        if *variant == Variant::Inline {
            lightbox += collection.slide_count();
        }
    }

    if lines.is_empty() {
        lines.push("No galleries found".to_string());
    } else {
        lines.push(String::new());
        lines.push(format!("Lightbox: {}", plural(lightbox, "slide")));
    }
    lines
}

pub fn print_scan_output(collections: &[(Variant, Collection)]) {
    for line in format_scan_output(collections) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

fn format_finding(finding: &Finding) -> String {
    let severity = match finding.severity {
        Severity::Error => "error  ",
        Severity::Warning => "warning",
    };
    let location = match finding.gallery {
        Some((variant, pos)) => format!("{} {}", variant.label(), format_index(pos)),
        None => "page".to_string(),
    };
    format!("{severity} {location}: {}", finding.message)
}

pub fn format_check_output(audit: &Audit) -> Vec<String> {
    let mut lines = vec![
        format!("{}: {}", variant_heading(Variant::Inline), audit.inline_galleries),
        format!(
            "{}: {}",
            variant_heading(Variant::Autoplay),
            audit.autoplay_galleries
        ),
    ];
    lines.extend(audit.findings.iter().map(format_finding));
    lines.push(String::new());
    if audit.findings.is_empty() {
        lines.push("Markup is valid".to_string());
    } else {
        lines.push(format!(
            "{}, {}",
            plural(audit.errors(), "error"),
            plural(audit.warnings(), "warning")
        ));
    }
    lines
}

pub fn print_check_output(audit: &Audit) {
    for line in format_check_output(audit) {
        println!("{}", line);
    }
}
