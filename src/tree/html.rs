//! HTML serialization of the mounted host output.

use crate::tree::node::{Node, NodeKind};
use crate::types::NodeId;
use std::borrow::Cow;
use std::collections::HashMap;

/// Serialize the subtree below `root` (exclusive) as HTML.
pub(crate) fn render_html(nodes: &HashMap<NodeId, Node>, root: NodeId, escape: bool) -> String {
    let mut out = String::new();
    if let Some(node) = nodes.get(&root) {
        for child in &node.children {
            write_node(nodes, *child, escape, &mut out);
        }
    }
    out
}

fn write_node(nodes: &HashMap<NodeId, Node>, id: NodeId, escape: bool, out: &mut String) {
    let Some(node) = nodes.get(&id) else {
        return;
    };

    match &node.kind {
        NodeKind::Empty => {}
        NodeKind::Text(text) => {
            if escape {
                out.push_str(&escape_text(text));
            } else {
                out.push_str(text);
            }
        }
        NodeKind::Tag { name, attrs } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                if escape {
                    out.push_str(&escape_attr(value));
                } else {
                    out.push_str(value);
                }
                out.push('"');
            }
            out.push('>');
            for child in &node.children {
                write_node(nodes, *child, escape, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        // Structural nodes contribute only their children.
        _ => {
            for child in &node.children {
                write_node(nodes, *child, escape, out);
            }
        }
    }
}

pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

pub fn escape_attr(text: &str) -> Cow<'_, str> {
    escape(text, true)
}

fn escape(text: &str, quotes: bool) -> Cow<'_, str> {
    let needs = |c: char| matches!(c, '&' | '<' | '>') || (quotes && c == '"');
    if !text.chars().any(needs) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if quotes => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
