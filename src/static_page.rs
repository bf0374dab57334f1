//! Static HTML as a [`PageSource`].
//!
//! Lets the CLI run the same collector and audit the browser build runs, but
//! against a saved page. Only inline `style` attributes are consulted, which
//! is also all the browser binding reads (`element.style`).

use crate::collect::PageSource;
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document.
pub struct StaticPage {
    html: Html,
}

impl StaticPage {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

fn class_selector(class: &str) -> Option<Selector> {
    match Selector::parse(&format!(".{class}")) {
        Ok(selector) => Some(selector),
        Err(err) => {
            log::warn!("unusable class name {class:?}: {err:?}");
            None
        }
    }
}

/// Value of the last `background-image` / `background` declaration in an
/// inline style attribute.
pub fn style_background(style: &str) -> Option<String> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(prop, _)| {
            let prop = prop.trim();
            prop.eq_ignore_ascii_case("background-image") || prop.eq_ignore_ascii_case("background")
        })
        .map(|(_, value)| value.trim().to_string())
        .next_back()
}

impl PageSource for StaticPage {
    type Node<'a> = ElementRef<'a>;

    fn select_all<'a>(&'a self, class: &str) -> Vec<ElementRef<'a>> {
        class_selector(class)
            .map(|s| self.html.select(&s).collect())
            .unwrap_or_default()
    }

    fn select_within<'a>(&'a self, node: &ElementRef<'a>, class: &str) -> Vec<ElementRef<'a>> {
        class_selector(class)
            .map(|s| node.select(&s).collect())
            .unwrap_or_default()
    }

    fn background_image<'a>(&'a self, node: &ElementRef<'a>) -> Option<String> {
        node.value().attr("style").and_then(style_background)
    }

    fn inner_html<'a>(&'a self, node: &ElementRef<'a>) -> String {
        node.inner_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_background_image() {
        assert_eq!(
            style_background("background-image: url('a.jpg')").as_deref(),
            Some("url('a.jpg')")
        );
    }

    #[test]
    fn style_background_shorthand_and_case() {
        assert_eq!(
            style_background("color: red; BACKGROUND: #000 url(b.jpg) no-repeat").as_deref(),
            Some("#000 url(b.jpg) no-repeat")
        );
    }

    #[test]
    fn style_background_last_declaration_wins() {
        assert_eq!(
            style_background("background-image: url(a.jpg); background-image: url(b.jpg);")
                .as_deref(),
            Some("url(b.jpg)")
        );
    }

    #[test]
    fn style_background_keeps_url_with_colon() {
        assert_eq!(
            style_background(r#"background-image:url("https://x.test/a.jpg")"#).as_deref(),
            Some(r#"url("https://x.test/a.jpg")"#)
        );
    }

    #[test]
    fn style_without_background() {
        assert_eq!(style_background("width: 10px"), None);
    }

    #[test]
    fn select_within_excludes_self_and_keeps_order() {
        let page = StaticPage::parse(
            r#"<div class="g"><p class="s">1</p><div class="g"><p class="s">2</p></div></div>"#,
        );
        let outer = page.select_all("g");
        assert_eq!(outer.len(), 2);
        let inner: Vec<String> = page
            .select_within(&outer[0], "s")
            .iter()
            .map(|n| page.inner_html(n))
            .collect();
        assert_eq!(inner, vec!["1", "2"]);
        assert_eq!(page.select_within(&outer[1], "g").len(), 0);
    }

    #[test]
    fn bad_class_selects_nothing() {
        let page = StaticPage::parse("<p class='a'>x</p>");
        assert!(page.select_all("1bad[").is_empty());
    }
}
