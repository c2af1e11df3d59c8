//! Modifier classes to host attributes.

use hostcss_tree::{Attribute, NodeId, NodeKind, SelectorTree};

use super::{ConvertContext, Conversion, Converter};
use crate::config::AttributeConversion;

/// Converts matches of `attributes` entries to `[name]` or `[name="value"]`.
///
/// Entries are tried in order and the first match wins; inside an enum entry
/// the first matching value wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeConverter;

impl Converter for AttributeConverter {
    fn convert(
        &self,
        tree: &mut SelectorTree,
        node: NodeId,
        cx: &mut ConvertContext<'_>,
    ) -> Conversion {
        let kind = tree.kind(node);
        cx.component
            .attributes
            .iter()
            .find_map(|conversion| match conversion {
                AttributeConversion::Boolean { source, name } => source
                    .matches(kind)
                    .then(|| Attribute::exists(name.clone())),
                AttributeConversion::Enum { name, values } => values
                    .iter()
                    .find(|(source, _)| source.matches(kind))
                    .map(|(_, value)| Attribute::equals(name.clone(), value.clone())),
            })
            .map_or(Conversion::Keep, |attr| {
                Conversion::Replace(NodeKind::Attribute(attr))
            })
    }
}
