//! Node conversion.
//!
//! A [`Converter`] looks at one node against the component's tables and says
//! what should take its place. [`convert`] walks the tree depth-first, asks the
//! converter about every simple selector (nested arguments included) and
//! splices the answers in.

use hostcss_tree::{NodeId, NodeKind, SelectorTree};

use super::Warning;
use crate::config::Component;

mod attribute;
mod class;
mod id;
mod pseudo;
mod slotted;

pub use attribute::AttributeConverter;
pub use class::ClassConverter;
pub use id::IdConverter;
pub use pseudo::PseudoConverter;
pub use slotted::{SLOTTED_NOT_LAST, SlottedConverter};

/// Converters in the order the pipeline runs them.
pub const CONVERTERS: [&dyn Converter; 5] = [
    &AttributeConverter,
    &ClassConverter,
    &SlottedConverter,
    &IdConverter,
    &PseudoConverter,
];

/// What a converter wants done with a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Leave the node; its argument selectors are still visited.
    Keep,
    /// Replace the node. A pseudo replacement adopts the old node's argument
    /// selectors, which are then visited.
    Replace(NodeKind),
    /// Replace the node with these detached, fully built nodes. They are not
    /// visited again by the same converter.
    Splice(Vec<NodeId>),
}

/// Shared state for one run of the converters over a selector list.
pub struct ConvertContext<'a> {
    /// The component's conversion tables.
    pub component: &'a Component,
    /// The selector list as it was before rewriting, for diagnostics.
    pub raw: &'a str,
    warnings: &'a mut Vec<Warning>,
}

impl<'a> ConvertContext<'a> {
    /// Create a context collecting warnings into `warnings`.
    #[must_use]
    pub const fn new(
        component: &'a Component,
        raw: &'a str,
        warnings: &'a mut Vec<Warning>,
    ) -> Self {
        Self {
            component,
            raw,
            warnings,
        }
    }

    /// Record an advisory warning against the raw selector.
    pub fn warn(&mut self, message: &str) {
        self.warnings.push(Warning {
            component: self.component.name.clone(),
            selector: self.raw.to_string(),
            message: message.to_string(),
        });
    }
}

/// Maps one node to its replacement.
pub trait Converter {
    /// Decide what to do with `node`. Unmatched nodes are [`Conversion::Keep`].
    fn convert(
        &self,
        tree: &mut SelectorTree,
        node: NodeId,
        cx: &mut ConvertContext<'_>,
    ) -> Conversion;
}

/// Run `converter` over every simple selector below `container`.
pub fn convert(
    tree: &mut SelectorTree,
    container: NodeId,
    converter: &dyn Converter,
    cx: &mut ConvertContext<'_>,
) {
    for child in tree.children(container).to_vec() {
        match tree.kind(child) {
            NodeKind::SelectorList | NodeKind::Selector => {
                convert(tree, child, converter, cx);
                continue;
            }
            NodeKind::Combinator(_) => continue,
            _ => {}
        }

        match converter.convert(tree, child, cx) {
            Conversion::Keep => convert(tree, child, converter, cx),
            Conversion::Replace(kind) => {
                let adopts = matches!(kind, NodeKind::PseudoClass(_) | NodeKind::PseudoElement(_));
                let replacement = tree.alloc(kind);
                if adopts {
                    tree.move_children(child, replacement);
                }
                tree.replace_child(child, replacement);
                convert(tree, replacement, converter, cx);
            }
            Conversion::Splice(nodes) => {
                for node in nodes {
                    tree.insert_before(child, node);
                }
                tree.detach(child);
            }
        }
    }
}
