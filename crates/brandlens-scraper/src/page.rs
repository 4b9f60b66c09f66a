//! Parsed HTML page with script-free visible text.
//!
//! `scraper::Html` is not `Send`; a `Page` is built, queried and dropped
//! inside synchronous code and never held across an `.await`.

use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches the reader.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct Page {
    document: Html,
    text: String,
}

impl Page {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let text = visible_text(document.root_element());
        Self { document, text }
    }

    #[must_use]
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Whitespace-collapsed visible text of the whole page.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Visible text of every element matching `selector`, in document order.
    pub fn select_texts<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = String> + 'a {
        self.document.select(selector).map(visible_text)
    }
}

/// Text nodes under `element`, skipping script-like subtrees, joined by
/// single spaces.
#[must_use]
pub fn visible_text(element: ElementRef<'_>) -> String {
    text_skipping(element, INVISIBLE_ELEMENTS)
}

/// Like [`visible_text`] but skips every subtree rooted at one of `skip`.
#[must_use]
pub fn text_skipping(element: ElementRef<'_>, skip: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| skip.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        parts.extend(text.split_whitespace());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_skips_scripts_and_styles() {
        let page = Page::parse(
            r"<html><head><style>.a{color:red}</style><script>var x = 1;</script></head>
            <body><p>Hello
            world</p><noscript>enable js</noscript><div>again</div></body></html>",
        );
        assert_eq!(page.text(), "Hello world again");
    }

    #[test]
    fn select_texts_returns_matches_in_order() {
        let page = Page::parse(r#"<ul><li class="x">one</li><li class="x"> two  <b>b</b></li></ul>"#);
        let selector = Selector::parse(".x").unwrap();
        let texts: Vec<String> = page.select_texts(&selector).collect();
        assert_eq!(texts, vec!["one".to_string(), "two b".to_string()]);
    }

    #[test]
    fn text_skipping_drops_named_subtrees() {
        let page = Page::parse("<body><nav>Menu</nav><p>Story</p><footer>Legal</footer></body>");
        let body = Selector::parse("body").unwrap();
        let element = page.document().select(&body).next().unwrap();
        assert_eq!(text_skipping(element, &["nav", "footer"]), "Story");
    }

    #[test]
    fn empty_document_has_no_text() {
        let page = Page::parse("");
        assert!(page.is_empty());
    }
}
