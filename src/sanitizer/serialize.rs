// src/sanitizer/serialize.rs

use super::tree::{Fragment, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serializes the children of the fragment root as HTML.
///
/// Text and attribute values are escaped. A `<pre>` whose content starts with
/// a newline gets an extra one, since the parser swallows the first.
pub fn serialize(fragment: &Fragment) -> String {
    let mut out = String::new();
    let mut stack: Vec<Step> = vec![Step::Open(fragment.root())];

    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Close(id) => {
                if let Some(name) = fragment.element_name(id) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
                continue;
            }
            Step::Open(id) => id,
        };

        match &fragment.node(id).kind {
            NodeKind::Root => {}
            NodeKind::Text(text) => {
                escape_text(&mut out, text);
                continue;
            }
            NodeKind::Element { name, attrs, .. } => {
                out.push('<');
                out.push_str(name);
                for (attr, value) in attrs {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    escape_attribute(&mut out, value);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                if name == "pre" && starts_with_newline(fragment, id) {
                    out.push('\n');
                }
                stack.push(Step::Close(id));
            }
        }

        stack.extend(fragment.children(id).iter().rev().map(|&child| Step::Open(child)));
    }

    out
}

fn starts_with_newline(fragment: &Fragment, id: NodeId) -> bool {
    fragment
        .children(id)
        .iter()
        .find_map(|&child| match &fragment.node(child).kind {
            NodeKind::Text(text) if text.is_empty() => None,
            NodeKind::Text(text) => Some(text.starts_with('\n')),
            _ => Some(false),
        })
        .unwrap_or(false)
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
