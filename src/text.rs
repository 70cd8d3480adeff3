//! Visible-text rendering for HTML documents.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "title",
    "tr", "ul",
];

/// Visible text of a document, one line per block-level element. Text nodes within a
/// block are space-separated and whitespace is collapsed within each line.
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    let mut current_block = None;

    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        if is_hidden(&node) {
            continue;
        }
        let block = nearest_block(&node);
        if block != current_block {
            text.push('\n');
            current_block = block;
        } else {
            text.push(' ');
        }
        text.push_str(fragment);
    }

    collapse_lines(&text)
}

/// Text content of one element on a single line.
pub fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_hidden(node: &NodeRef<Node>) -> bool {
    node.ancestors().any(|a| {
        a.value()
            .as_element()
            .map(|e| HIDDEN.contains(&e.name()))
            .unwrap_or(false)
    })
}

fn nearest_block(node: &NodeRef<Node>) -> Option<ego_tree::NodeId> {
    node.ancestors()
        .find(|a| {
            a.value()
                .as_element()
                .map(|e| BLOCKS.contains(&e.name()))
                .unwrap_or(false)
        })
        .map(|a| a.id())
}
