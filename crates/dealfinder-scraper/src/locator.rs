//! Container detection.
//!
//! Weekly-ad markup nests each price a few levels below a wrapper whose
//! class names say what it is (`product-card`, `deal-tile`, ...). Starting
//! from every price anchor we walk up a bounded number of ancestors and keep
//! the first one that looks like such a wrapper.

use std::collections::HashSet;

use crate::dom::DealNode;

/// HTML elements rendered as blocks by default.
const BLOCK_LEVEL_TAGS: [&str; 32] = [
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "ul",
];

/// Tunables for the ancestor walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Maximum number of elements inspected per anchor, starting with the
    /// anchor itself.
    pub max_depth: usize,
    /// Block-level tags that may act as containers.
    pub container_tags: Vec<String>,
    /// Substrings looked for in the lowercased, space-joined class list.
    pub class_keywords: Vec<String>,
    /// Attributes that mark a container when present with a non-empty value.
    pub marker_attributes: Vec<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            max_depth: 10,
            container_tags: owned(&BLOCK_LEVEL_TAGS),
            class_keywords: owned(&["product", "item", "card", "deal", "tile"]),
            marker_attributes: owned(&["data-testid", "data-product-id"]),
        }
    }
}

impl LocatorConfig {
    /// Whether `node` qualifies as a deal container on its own merits.
    #[must_use]
    pub fn is_container<N: DealNode>(&self, node: &N) -> bool {
        let tag = node.tag_name().to_ascii_lowercase();
        if !self.container_tags.iter().any(|t| *t == tag) {
            return false;
        }

        let class_str = node.class_names().join(" ").to_lowercase();
        if self
            .class_keywords
            .iter()
            .any(|keyword| class_str.contains(keyword.as_str()))
        {
            return true;
        }

        self.marker_attributes
            .iter()
            .any(|attr| node.attribute(attr).is_some_and(|v| !v.is_empty()))
    }
}

/// Walks up from `anchor` and returns the first qualifying container, if one
/// exists within `config.max_depth` elements.
pub fn find_container<N: DealNode>(anchor: N, config: &LocatorConfig) -> Option<N> {
    let mut current = Some(anchor);
    for _ in 0..config.max_depth {
        let node = current?;
        if config.is_container(&node) {
            return Some(node);
        }
        current = node.parent_node();
    }
    None
}

/// Resolves every anchor to its container and deduplicates by node identity.
///
/// Output order is the order in which containers were first reached.
pub fn locate_containers<N, I>(anchors: I, config: &LocatorConfig) -> Vec<N>
where
    N: DealNode,
    I: IntoIterator<Item = N>,
{
    let mut seen = HashSet::new();
    let mut containers = Vec::new();
    let mut orphaned = 0usize;

    for anchor in anchors {
        match find_container(anchor, config) {
            Some(container) => {
                if seen.insert(container.node_key()) {
                    containers.push(container);
                }
            }
            None => orphaned += 1,
        }
    }

    tracing::debug!(
        containers = containers.len(),
        orphaned,
        "located deal containers"
    );
    containers
}
