//! Removal of `:host` where it adds nothing.

use hostcss_tree::{Combinator, NodeId, NodeKind, SelectorTree};

/// Drop a leading bare `:host` followed by a descendant combinator.
///
/// Must run last: any earlier pass that gave the anchor an argument means the
/// rule depends on host state and keeps its anchor.
pub fn dehostify(tree: &mut SelectorTree, selector: NodeId) {
    let &[anchor, combinator, ..] = tree.children(selector) else {
        return;
    };

    let bare_anchor = match tree.kind(anchor) {
        NodeKind::PseudoClass(pseudo) => {
            pseudo.name == "host"
                && pseudo.raw_argument.is_none()
                && tree.children(anchor).is_empty()
        }
        _ => false,
    };
    let descendant = tree.kind(combinator).combinator() == Some(Combinator::Descendant);

    if bare_anchor && descendant {
        tree.detach(combinator);
        tree.detach(anchor);
    }
}
