//! Specificity normalization for `:host()` arguments.
//!
//! [§ 4.4 The Specificity-adjustment Pseudo-class](https://www.w3.org/TR/selectors-4/#zero-matches)
//! "The specificity of a :where() pseudo-class is replaced by zero."

use hostcss_tree::{NodeId, NodeKind, Pseudo, SelectorTree};

/// Wrap each argument of a leading `:host(...)` in `:where(...)`.
///
/// Pseudo-elements cannot appear inside `:host()`; they move out to follow the
/// anchor in their original order, and an argument left empty is dropped.
pub fn whereify_host(tree: &mut SelectorTree, selector: NodeId) {
    let Some(anchor) = tree.first_child(selector) else {
        return;
    };
    if !tree.kind(anchor).is_host_anchor() || tree.children(anchor).is_empty() {
        return;
    }

    let wrapped = tree.alloc(NodeKind::Selector);
    let mut pseudo_elements = Vec::new();

    for argument in tree.take_children(anchor) {
        let extracted: Vec<NodeId> = tree
            .children(argument)
            .iter()
            .copied()
            .filter(|&node| matches!(tree.kind(node), NodeKind::PseudoElement(_)))
            .collect();
        for node in extracted {
            tree.detach(node);
            pseudo_elements.push(node);
        }
        if tree.children(argument).is_empty() {
            continue;
        }

        let wrapper = tree.alloc(NodeKind::PseudoClass(Pseudo::new("where")));
        tree.append_child(wrapper, argument);
        tree.append_child(wrapped, wrapper);
    }

    if !tree.children(wrapped).is_empty() {
        tree.append_child(anchor, wrapped);
    }

    let mut previous = anchor;
    for node in pseudo_elements {
        tree.insert_after(previous, node);
        previous = node;
    }
}
