//! Selector serialization.
//!
//! Output is canonical: selectors joined by `", "`, descendant combinators as a
//! single space, other combinators padded with spaces. Parsing the output
//! again yields the same tree.

use hostcss_tree::{Attribute, Combinator, NodeId, NodeKind, Pseudo, QuoteStyle, SelectorTree};

/// Serialize the subtree rooted at `node`.
#[must_use]
pub fn to_css(tree: &SelectorTree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, &mut out);
    out
}

/// Serialize the whole selector list.
#[must_use]
pub fn serialize_list(tree: &SelectorTree) -> String {
    to_css(tree, tree.root())
}

fn write_node(tree: &SelectorTree, node: NodeId, out: &mut String) {
    match tree.kind(node) {
        NodeKind::SelectorList => write_list(tree, node, out),
        NodeKind::Selector => {
            for (index, &child) in tree.children(node).iter().enumerate() {
                match tree.kind(child).combinator() {
                    Some(Combinator::Descendant) => out.push(' '),
                    // Leading combinator of a relative selector
                    Some(c) if index == 0 => {
                        out.push_str(c.as_str());
                        out.push(' ');
                    }
                    Some(c) => {
                        out.push(' ');
                        out.push_str(c.as_str());
                        out.push(' ');
                    }
                    None => write_node(tree, child, out),
                }
            }
        }
        NodeKind::Tag(name) => out.push_str(name),
        NodeKind::Universal => out.push('*'),
        NodeKind::Class(name) => {
            out.push('.');
            out.push_str(name);
        }
        NodeKind::Id(name) => {
            out.push('#');
            out.push_str(name);
        }
        NodeKind::Attribute(attr) => write_attribute(attr, out),
        NodeKind::PseudoClass(pseudo) => {
            out.push(':');
            write_pseudo(tree, node, pseudo, out);
        }
        NodeKind::PseudoElement(pseudo) => {
            out.push_str(if pseudo.legacy { ":" } else { "::" });
            write_pseudo(tree, node, pseudo, out);
        }
        NodeKind::Combinator(c) => out.push_str(c.as_str()),
    }
}

/// Children of `node` joined by `", "`.
fn write_list(tree: &SelectorTree, node: NodeId, out: &mut String) {
    for (index, &child) in tree.children(node).iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_node(tree, child, out);
    }
}

fn write_pseudo(tree: &SelectorTree, node: NodeId, pseudo: &Pseudo, out: &mut String) {
    out.push_str(&pseudo.name);
    if !tree.children(node).is_empty() {
        out.push('(');
        write_list(tree, node, out);
        out.push(')');
    } else if let Some(raw) = &pseudo.raw_argument {
        out.push('(');
        out.push_str(raw);
        out.push(')');
    }
}

/// Write `value` for a string delimited by `quote`, escaping bare quotes.
/// Existing escapes are copied as they are.
fn write_quoted(value: &str, quote: char, out: &mut String) {
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(c);
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            if c == quote {
                out.push('\\');
            }
            out.push(c);
        }
    }
}

fn write_attribute(attr: &Attribute, out: &mut String) {
    out.push('[');
    out.push_str(&attr.name);
    if let Some(matcher) = &attr.matcher {
        out.push_str(matcher.operator.as_str());
        let quote = match matcher.quote {
            QuoteStyle::None => None,
            QuoteStyle::Single => Some('\''),
            QuoteStyle::Double => Some('"'),
        };
        match quote {
            Some(q) => {
                out.push(q);
                write_quoted(&matcher.value, q, out);
                out.push(q);
            }
            None => out.push_str(&matcher.value),
        }
        if let Some(flag) = matcher.case_flag {
            out.push(' ');
            out.push(flag);
        }
    }
    out.push(']');
}
