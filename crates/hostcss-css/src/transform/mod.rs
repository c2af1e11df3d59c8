//! The selector rewrite pipeline.
//!
//! Each pass mutates a [`SelectorTree`] in place. [`rewrite_selector`] runs
//! them in order over a freshly parsed selector list:
//!
//! 1. [`hostify`] anchors every top-level selector on `:host`.
//! 2. [`hoist_dir`] gathers `[dir]` predicates into one leading predicate.
//! 3. [`convert`] runs the attribute, class, slot, id and pseudo converters.
//! 4. [`whereify_host`] zeroes the specificity of `:host()` arguments.
//! 5. [`dehostify`] strips `:host` from rules that never needed it.

use std::fmt;

use hostcss_tree::{NodeId, NodeKind, Pseudo, SelectorTree};

use crate::config::Component;
use crate::selector::{SelectorParseError, parse_selector_list, serialize_list};

mod convert;
mod dehostify;
mod hoist_dir;
mod hostify;
mod whereify;

pub use convert::{
    AttributeConverter, CONVERTERS, ClassConverter, ConvertContext, Conversion, Converter,
    IdConverter, PseudoConverter, SLOTTED_NOT_LAST, SlottedConverter, convert,
};
pub use dehostify::dehostify;
pub use hoist_dir::hoist_dir;
pub use hostify::{HostClass, HostPresence, HostScan, classify_host, hostify, scan_host};
pub use whereify::whereify_host;

/// An advisory diagnostic raised while rewriting a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Component being processed.
    pub component: String,
    /// The selector as it was before rewriting.
    pub selector: String,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.component, self.message, self.selector)
    }
}

/// A rewritten selector list and the warnings raised producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The shadow-scoped selector list.
    pub selector: String,
    /// Advisory warnings; the selector is still usable.
    pub warnings: Vec<Warning>,
}

/// Rewrite one selector list for a component's shadow root.
///
/// # Errors
///
/// Returns a [`SelectorParseError`] if `raw` is not a valid selector list.
/// Every pass after parsing is total.
pub fn rewrite_selector(raw: &str, component: &Component) -> Result<Rewritten, SelectorParseError> {
    let mut tree = parse_selector_list(raw)?;
    let selectors = tree.children(tree.root()).to_vec();

    for &selector in &selectors {
        hostify(&mut tree, selector, &component.host);
        hoist_dir(&mut tree, selector);
    }

    let mut warnings = Vec::new();
    let mut cx = ConvertContext::new(component, raw, &mut warnings);
    let root = tree.root();
    for converter in CONVERTERS {
        convert(&mut tree, root, converter, &mut cx);
    }

    for &selector in &selectors {
        whereify_host(&mut tree, selector);
        dehostify(&mut tree, selector);
    }

    Ok(Rewritten {
        selector: serialize_list(&tree),
        warnings,
    })
}

/// A fresh `:host` pseudo-class with no argument.
fn host_anchor() -> NodeKind {
    NodeKind::PseudoClass(Pseudo::new("host"))
}

/// The argument selector of a `:host` anchor, created when missing.
fn anchor_argument(tree: &mut SelectorTree, anchor: NodeId) -> NodeId {
    if let Some(argument) = tree.first_child(anchor) {
        return argument;
    }
    let argument = tree.alloc(NodeKind::Selector);
    tree.append_child(anchor, argument);
    argument
}
