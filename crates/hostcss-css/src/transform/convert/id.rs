//! Classes to shadow-root ids.

use hostcss_tree::{NodeId, NodeKind, SelectorTree};

use super::{ConvertContext, Conversion, Converter};

/// Converts matches of `ids` entries to `#name`, for elements the component
/// renders with a fixed id inside its shadow root.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdConverter;

impl Converter for IdConverter {
    fn convert(
        &self,
        tree: &mut SelectorTree,
        node: NodeId,
        cx: &mut ConvertContext<'_>,
    ) -> Conversion {
        let kind = tree.kind(node);
        cx.component
            .ids
            .iter()
            .find(|conversion| conversion.source.matches(kind))
            .map_or(Conversion::Keep, |conversion| {
                Conversion::Replace(NodeKind::Id(conversion.name.clone()))
            })
    }
}
