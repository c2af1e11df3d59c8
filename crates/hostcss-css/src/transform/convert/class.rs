//! Class renames.

use hostcss_tree::{NodeId, NodeKind, SelectorTree};

use super::{ConvertContext, Conversion, Converter};

/// Renames classes listed in `classes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassConverter;

impl Converter for ClassConverter {
    fn convert(
        &self,
        tree: &mut SelectorTree,
        node: NodeId,
        cx: &mut ConvertContext<'_>,
    ) -> Conversion {
        let kind = tree.kind(node);
        cx.component
            .classes
            .iter()
            .find(|conversion| conversion.source.matches(kind))
            .map_or(Conversion::Keep, |conversion| {
                Conversion::Replace(NodeKind::Class(conversion.name.clone()))
            })
    }
}
