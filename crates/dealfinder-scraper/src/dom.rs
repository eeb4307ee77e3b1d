//! Parsed-page abstraction used by the locator and extractor.
//!
//! [`DealNode`] is the small capability set the container heuristics need,
//! so they can run over any tree. [`HtmlDocument`] backs it with the
//! `scraper` crate.

use std::hash::Hash;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};

use crate::classify::PRICE_RE;

/// Elements whose text never belongs to a visible listing.
const NON_VISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// An element in a parsed page.
pub trait DealNode: Sized {
    /// Stable identity of the element within its tree. Two distinct
    /// elements with identical text must have different keys.
    type Key: Eq + Hash + Clone + std::fmt::Debug;

    fn node_key(&self) -> Self::Key;

    /// Lowercase tag name, e.g. `div`.
    fn tag_name(&self) -> &str;

    fn class_names(&self) -> Vec<&str>;

    fn attribute(&self, name: &str) -> Option<&str>;

    fn parent_node(&self) -> Option<Self>;

    /// Trimmed, non-empty text lines of the whole subtree in document order.
    fn text_lines(&self) -> Vec<String>;
}

/// A rendered weekly-ad page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parent element of every visible text node containing a `$D.DD` price,
    /// in document order.
    #[must_use]
    pub fn price_anchors(&self) -> Vec<ElementRef<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| PRICE_RE.is_match(text))
            })
            .filter_map(|node| node.parent().and_then(ElementRef::wrap))
            .filter(|parent| !NON_VISIBLE_TAGS.contains(&parent.value().name()))
            .collect()
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("parse_errors", &self.html.errors.len())
            .finish_non_exhaustive()
    }
}

impl DealNode for ElementRef<'_> {
    type Key = NodeId;

    fn node_key(&self) -> NodeId {
        self.id()
    }

    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn class_names(&self) -> Vec<&str> {
        self.value().classes().collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn parent_node(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn text_lines(&self) -> Vec<String> {
        let root = **self;
        root.descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().take_while(|a| *a != root).any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|el| NON_VISIBLE_TAGS.contains(&el.name()))
                });
                (!hidden).then_some(text)
            })
            .flat_map(|text| text.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a HtmlDocument, css: &str) -> ElementRef<'a> {
        let selector = scraper::Selector::parse(css).expect("valid selector");
        doc.html.select(&selector).next().expect("element present")
    }

    #[test]
    fn price_anchors_are_text_parents_in_order() {
        let doc = HtmlDocument::parse(
            r#"<div><span id="a">$1.99</span><p>no price</p><b id="b">Now $2.49!</b></div>"#,
        );
        let anchors = doc.price_anchors();
        let ids: Vec<_> = anchors.iter().map(|a| a.value().id()).collect();
        assert_eq!(ids, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn price_anchors_skip_script_text() {
        let doc = HtmlDocument::parse(
            r#"<div><script>var p = "$3.99";</script><span>$4.99</span></div>"#,
        );
        let anchors = doc.price_anchors();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].tag_name(), "span");
    }

    #[test]
    fn text_lines_trim_and_drop_empty() {
        let doc = HtmlDocument::parse(
            "<div id=\"c\">\n  <h3> Chicken Breast </h3>\n\n <span>Buy 1 Get 1 Free</span><span>$5.99</span></div>",
        );
        let container = first(&doc, "#c");
        assert_eq!(
            container.text_lines(),
            vec!["Chicken Breast", "Buy 1 Get 1 Free", "$5.99"]
        );
    }

    #[test]
    fn text_lines_skip_non_visible_content() {
        let doc = HtmlDocument::parse(
            r#"<div id="c"><style>.x{}</style><span>Ice Cream</span><script>track()</script></div>"#,
        );
        assert_eq!(first(&doc, "#c").text_lines(), vec!["Ice Cream"]);
    }

    #[test]
    fn node_key_distinguishes_identical_siblings() {
        let doc = HtmlDocument::parse(
            r#"<section><div class="card">Same</div><div class="card">Same</div></section>"#,
        );
        let selector = scraper::Selector::parse("div.card").unwrap();
        let keys: Vec<_> = doc.html.select(&selector).map(|el| el.node_key()).collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
    }

    #[test]
    fn node_key_is_shared_by_every_handle_to_an_element() {
        let doc = HtmlDocument::parse(
            r#"<div class="card" id="c"><span>$1.00</span><b>$2.00</b></div>"#,
        );
        let parents: Vec<_> = doc
            .price_anchors()
            .iter()
            .filter_map(DealNode::parent_node)
            .map(|p| p.node_key())
            .collect();
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0], parents[1]);
        assert_eq!(parents[0], first(&doc, "#c").node_key());
    }

    #[test]
    fn class_names_and_attributes() {
        let doc = HtmlDocument::parse(
            r#"<div id="c" class="Product-Tile  promo" data-testid="deal-1"></div>"#,
        );
        let el = first(&doc, "#c");
        assert_eq!(el.class_names(), vec!["Product-Tile", "promo"]);
        assert_eq!(el.attribute("data-testid"), Some("deal-1"));
        assert!(el.attribute("data-product-id").is_none());
        assert_eq!(el.parent_node().map(|p| p.tag_name().to_string()).as_deref(), Some("body"));
    }
}
