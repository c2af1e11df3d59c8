//! Slot conversion.
//!
//! [§ 3.2.4 Selecting Slot-Assigned Content](https://www.w3.org/TR/css-scoping-1/#slotted-pseudo)
//! "The ::slotted() pseudo-element represents the elements assigned, after
//! flattening, to a slot." It only takes a compound selector and must end the
//! selector, so where a matched node sits decides what it becomes.

use hostcss_tree::{Attribute, NodeId, NodeKind, Pseudo, SelectorTree};

use super::{ConvertContext, Conversion, Converter};
use crate::config::SlotConversion;

/// Message recorded when a slot source is followed by anything but a sibling
/// combinator.
pub const SLOTTED_NOT_LAST: &str = "::slotted() rules must be the last in the selector";

/// Converts matches of `slots` entries.
///
/// - Last node of the selector: `::slotted(<content>[slot="name"])`.
/// - Followed by `+` or `~`: the `slot[name="name"]` element itself.
/// - Anywhere else: left alone, with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlottedConverter;

impl Converter for SlottedConverter {
    fn convert(
        &self,
        tree: &mut SelectorTree,
        node: NodeId,
        cx: &mut ConvertContext<'_>,
    ) -> Conversion {
        let component = cx.component;
        let kind = tree.kind(node);
        let Some(slot) = component
            .slots
            .iter()
            .find(|slot| slot.source.matches(kind))
        else {
            return Conversion::Keep;
        };

        match tree.next_sibling(node).map(|next| tree.kind(next).combinator()) {
            None => Conversion::Splice(vec![slotted(tree, slot)]),
            Some(Some(combinator)) if combinator.is_sibling() => {
                Conversion::Splice(slot_element(tree, slot))
            }
            Some(_) => {
                cx.warn(SLOTTED_NOT_LAST);
                Conversion::Keep
            }
        }
    }
}

/// `::slotted(<content>[slot="name"])`, or `::slotted(<content or *>)` for the
/// default slot.
fn slotted(tree: &mut SelectorTree, slot: &SlotConversion) -> NodeId {
    let pseudo = tree.alloc(NodeKind::PseudoElement(Pseudo::new("slotted")));
    let argument = tree.alloc(NodeKind::Selector);
    tree.append_child(pseudo, argument);

    if let Some(content) = &slot.content
        && let Some(compound) = content.first_child(content.root())
    {
        for &node in content.children(compound) {
            let copy = tree.graft(content, node);
            tree.append_child(argument, copy);
        }
    }

    match &slot.name {
        Some(name) => {
            let attr = tree.alloc(NodeKind::Attribute(Attribute::equals("slot", name.as_str())));
            tree.append_child(argument, attr);
        }
        None if tree.children(argument).is_empty() => {
            let universal = tree.alloc(NodeKind::Universal);
            tree.append_child(argument, universal);
        }
        None => {}
    }

    pseudo
}

/// `slot[name="name"]`, or a bare `slot` for the default slot.
fn slot_element(tree: &mut SelectorTree, slot: &SlotConversion) -> Vec<NodeId> {
    let mut nodes = vec![tree.alloc(NodeKind::Tag("slot".to_string()))];
    if let Some(name) = &slot.name {
        nodes.push(tree.alloc(NodeKind::Attribute(Attribute::equals("name", name.as_str()))));
    }
    nodes
}
