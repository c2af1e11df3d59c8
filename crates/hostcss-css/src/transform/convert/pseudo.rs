//! Pseudo-class substitution.

use hostcss_tree::{NodeId, NodeKind, SelectorTree};

use super::{ConvertContext, Conversion, Converter};

/// Substitutes pseudo-classes from `pseudos`, including the built-in
/// `.focus-ring` to `:focus-visible` rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct PseudoConverter;

impl Converter for PseudoConverter {
    fn convert(
        &self,
        tree: &mut SelectorTree,
        node: NodeId,
        cx: &mut ConvertContext<'_>,
    ) -> Conversion {
        let kind = tree.kind(node);
        cx.component
            .pseudos
            .iter()
            .find(|conversion| conversion.source.matches(kind))
            .map_or(Conversion::Keep, |conversion| {
                Conversion::Replace(NodeKind::PseudoClass(conversion.value.clone()))
            })
    }
}
