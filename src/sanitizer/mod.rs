// src/sanitizer/mod.rs

//! Allow-list HTML sanitizer for rendered Markdown.
//!
//! The input is parsed into an arena tree and walked in document order.
//! Every element outside [`ALLOWED_TAGS`] is replaced by a text node holding
//! its text content, so the words stay visible and the markup goes away.
//! Allowed elements keep only the attributes listed in
//! [`ALLOWED_ATTRIBUTES`]. Links are additionally checked against a small
//! set of safe URL schemes and get `rel="noopener noreferrer"`.

mod serialize;
pub mod tree;

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

pub use serialize::serialize;
pub use tree::{Fragment, NodeId, NodeKind};

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "pre", "code", "blockquote",
    "strong", "em", "hr", "br", "table", "thead", "tbody", "tr", "th", "td",
];

/// Per-tag attribute allow-list. Tags not listed here keep no attributes.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("code", &["class"]),
    ("pre", &["class"]),
];

/// Value forced onto every link that keeps its `href`.
pub const LINK_REL: &str = "noopener noreferrer";

static SAFE_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:https?://|mailto:)").expect("valid scheme pattern"));

/// Upper bound on sanitize passes. Each extra pass only flattens nesting
/// left by the previous one, so real input settles in two or three.
const MAX_PASSES: usize = 16;

/// Elements whose direct text children the HTML parser moves in front of
/// the enclosing table.
const TABLE_CONTEXT: &[&str] = &["table", "thead", "tbody", "tr"];

pub fn is_allowed_tag(name: &str) -> bool {
    ALLOWED_TAGS.contains(&name)
}

pub fn is_allowed_attribute(tag: &str, attribute: &str) -> bool {
    ALLOWED_ATTRIBUTES
        .iter()
        .find(|(t, _)| *t == tag)
        .is_some_and(|(_, attrs)| attrs.contains(&attribute))
}

/// Whether a link target is a fragment, a root or dot relative path, or an
/// http(s)/mailto URL.
pub fn is_safe_href(href: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    if href.starts_with('#') || href.starts_with('/') || href.starts_with("./") {
        return true;
    }
    SAFE_SCHEME.is_match(href)
}

/// Sanitizes HTML produced by the Markdown renderer.
///
/// Never fails: malformed markup is repaired by the parser, and anything
/// the allow-list rejects is reduced to plain text. The output is stable,
/// i.e. sanitizing it again returns the same string.
pub fn sanitize(html: &str) -> String {
    let mut out = sanitize_pass(html);
    // A reparse can still split nesting the tree builder produced, such as
    // a heading foster-parented into another heading. Repeat until the
    // output parses back to itself.
    for _ in 1..MAX_PASSES {
        let next = sanitize_pass(&out);
        if next == out {
            return out;
        }
        out = next;
    }
    warn!(passes = MAX_PASSES, "Sanitized HTML did not settle");
    out
}

/// One parse, policy walk and serialization.
fn sanitize_pass(html: &str) -> String {
    let mut fragment = Fragment::parse(html);
    let mut defanged = Vec::new();

    let mut stack = vec![fragment.root()];
    while let Some(id) = stack.pop() {
        let allowed = match &fragment.node(id).kind {
            NodeKind::Text(_) => continue,
            NodeKind::Root => true,
            NodeKind::Element { name, html, .. } => *html && is_allowed_tag(name),
        };

        if !allowed {
            let text = fragment.text_content(id);
            fragment.replace_with_text(id, text);
            defanged.push(id);
            continue;
        }

        if let NodeKind::Element { name, attrs, .. } = &mut fragment.node_mut(id).kind {
            filter_attributes(name, attrs);
        }
        stack.extend(fragment.children(id).iter().rev());
    }

    for id in defanged {
        foster_parent_text_run(&mut fragment, id);
    }

    serialize(&fragment)
}

/// Applies the attribute policy to one allowed element.
///
/// Order matters: event handlers and `style` go first, then anything not on
/// the tag's list, then unsafe link targets.
fn filter_attributes(tag: &str, attrs: &mut Vec<(String, String)>) {
    attrs.retain(|(name, value)| {
        let name = name.to_ascii_lowercase();
        if name.starts_with("on") || name == "style" {
            return false;
        }
        if !is_allowed_attribute(tag, &name) {
            return false;
        }
        !(tag == "a" && name == "href" && !is_safe_href(value))
    });

    if tag == "a"
        && attrs
            .iter()
            .any(|(name, value)| name.eq_ignore_ascii_case("href") && !value.is_empty())
    {
        attrs.push(("rel".to_string(), LINK_REL.to_string()));
    }
}

/// Moves defanged text out of table structure, the way a reparse would.
///
/// Text that is not whitespace cannot live directly inside a table, table
/// section or row. The parser relocates the whole run of adjacent text in
/// front of the table, so the run is moved together, preserving order.
fn foster_parent_text_run(fragment: &mut Fragment, id: NodeId) {
    let Some(parent) = fragment.node(id).parent else {
        return;
    };
    let in_table = fragment
        .element_name(parent)
        .is_some_and(|name| TABLE_CONTEXT.contains(&name));
    if !in_table {
        return;
    }
    let Some(table) = fragment.ancestor_named(id, "table") else {
        return;
    };

    let siblings = fragment.children(parent).to_vec();
    let Some(position) = siblings.iter().position(|&child| child == id) else {
        return;
    };
    let is_text = |child: &NodeId| matches!(fragment.node(*child).kind, NodeKind::Text(_));
    let start = siblings[..position]
        .iter()
        .rposition(|child| !is_text(child))
        .map_or(0, |i| i + 1);
    let end = siblings[position..]
        .iter()
        .position(|child| !is_text(child))
        .map_or(siblings.len(), |i| position + i);
    let run = &siblings[start..end];

    let has_content = run.iter().any(|&child| match &fragment.node(child).kind {
        NodeKind::Text(text) => text.chars().any(|c| !is_html_whitespace(c)),
        _ => false,
    });
    if !has_content {
        return;
    }

    for &child in run {
        fragment.move_before(child, table);
    }
}

fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}
