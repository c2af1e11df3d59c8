//! Directionality hoisting.
//!
//! `[dir="rtl"]` predicates scattered through a selector are gathered into a
//! single predicate: inside the `:host()` argument when the selector is
//! anchored, otherwise at the end of its first compound.

use hostcss_tree::{Attribute, Combinator, NodeId, NodeKind, Pseudo, SelectorTree};

use super::anchor_argument;

/// Hoist every `dir` predicate in `selector` and its nested arguments.
///
/// When one selector carries several, the last one wins.
pub fn hoist_dir(tree: &mut SelectorTree, selector: NodeId) {
    let nodes: Vec<NodeId> = std::iter::once(selector)
        .chain(tree.descendants(selector))
        .collect();

    for &node in &nodes {
        if let NodeKind::Attribute(attr) = tree.kind(node)
            && attr.name.starts_with("dir")
        {
            let marker = Pseudo {
                name: "dir".to_string(),
                raw_argument: attr.value().map(str::to_string),
                legacy: false,
            };
            *tree.kind_mut(node) = NodeKind::PseudoClass(marker);
        }
    }

    // Innermost selectors first, so a nested argument keeps its own predicate.
    for &node in nodes.iter().rev() {
        if matches!(tree.kind(node), NodeKind::Selector) {
            gather(tree, node);
        }
    }
}

/// Replace the `:dir()` markers directly under `selector` with one attribute.
fn gather(tree: &mut SelectorTree, selector: NodeId) {
    let markers: Vec<NodeId> = tree
        .children(selector)
        .iter()
        .copied()
        .filter(|&child| tree.kind(child).is_pseudo_class("dir"))
        .collect();
    let Some(&last) = markers.last() else {
        return;
    };

    let value = match tree.kind(last) {
        NodeKind::PseudoClass(pseudo) => pseudo.raw_argument.clone(),
        _ => None,
    };
    for marker in markers {
        tree.detach(marker);
    }

    let attribute = tree.alloc(NodeKind::Attribute(match value {
        Some(value) => Attribute::equals("dir", value),
        None => Attribute::exists("dir"),
    }));

    match tree.first_child(selector) {
        Some(first) if tree.kind(first).is_host_anchor() => {
            let argument = anchor_argument(tree, first);
            tree.prepend_child(argument, attribute);
        }
        _ => {
            let end_of_compound = tree
                .children(selector)
                .iter()
                .position(|&child| tree.kind(child).is_combinator())
                .unwrap_or(tree.children(selector).len());
            tree.insert_child(selector, end_of_compound, attribute);
        }
    }

    tidy_combinators(tree, selector);
}

/// Repair combinators left dangling by removed markers: a leading descendant
/// combinator, a trailing one, or two in a row (the explicit one is kept).
fn tidy_combinators(tree: &mut SelectorTree, selector: NodeId) {
    let mut pending: Option<NodeId> = None;

    for (index, child) in tree.children(selector).to_vec().into_iter().enumerate() {
        let Some(combinator) = tree.kind(child).combinator() else {
            pending = None;
            continue;
        };
        if index == 0 && combinator == Combinator::Descendant {
            tree.detach(child);
            continue;
        }
        if let Some(previous) = pending {
            if combinator == Combinator::Descendant {
                tree.detach(child);
                continue;
            }
            tree.detach(previous);
        }
        pending = Some(child);
    }

    if let Some(trailing) = pending {
        tree.detach(trailing);
    }
}
