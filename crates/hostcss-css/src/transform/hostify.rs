//! Anchor a selector on `:host`.
//!
//! Classification and rewriting are separate steps: [`scan_host`] walks the
//! untouched selector once and records where the host region ends and how the
//! host shows up, then [`hostify`] restructures the selector from that record.
//!
//! The host region is the first compound. Any combinator ends it, so sibling
//! combinators stay outside the anchor (`:host + .x`).

use hostcss_tree::{Combinator, NodeId, NodeKind, SelectorTree};

use super::{anchor_argument, host_anchor};

/// How strongly the host class appears in a selector.
///
/// Ordered so that a stronger sighting is never downgraded by a weaker one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HostPresence {
    /// Neither the host class nor a host modifier.
    No,
    /// A `host--modifier` class, but not the host class itself.
    Modifier,
    /// The host class (or an existing `:host` anchor).
    Yes,
}

/// The four shapes a selector can take relative to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClass {
    /// No host reference: `:host ` is prepended.
    Absent,
    /// Only host modifiers: the host region moves into `:host(...)`.
    ModifierOnly,
    /// The host class alone in the first compound: it becomes `:host`.
    Leading,
    /// Anything else: the host class is removed and the rest of its region
    /// moves into `:host(...)`.
    General,
}

/// Result of scanning a selector's top-level nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostScan {
    /// Strongest host sighting.
    pub presence: HostPresence,
    /// Index of the first combinator, or the node count when there is none.
    pub boundary: usize,
    /// Index of the last host node.
    pub host_at: Option<usize>,
}

impl HostScan {
    /// Map the scan onto one of the four host shapes.
    #[must_use]
    pub const fn classify(&self) -> HostClass {
        match self.presence {
            HostPresence::No => HostClass::Absent,
            HostPresence::Modifier => HostClass::ModifierOnly,
            HostPresence::Yes if self.boundary == 1 && matches!(self.host_at, Some(0)) => {
                HostClass::Leading
            }
            HostPresence::Yes => HostClass::General,
        }
    }
}

fn is_host(kind: &NodeKind, host: &str) -> bool {
    kind.is_host_anchor() || kind.class_name() == Some(host)
}

fn is_modifier(kind: &NodeKind, host: &str) -> bool {
    kind.class_name()
        .and_then(|name| name.strip_prefix(host))
        .is_some_and(|rest| rest.starts_with("--"))
}

/// Scan the direct children of `selector` for the host class `host` (without
/// its leading `.`).
#[must_use]
pub fn scan_host(tree: &SelectorTree, selector: NodeId, host: &str) -> HostScan {
    let children = tree.children(selector);
    let mut boundary = None;
    let mut presence = HostPresence::No;
    let mut host_at = None;

    for (index, &child) in children.iter().enumerate() {
        let kind = tree.kind(child);
        if boundary.is_none() && kind.is_combinator() {
            boundary = Some(index);
        }
        if is_host(kind, host) {
            presence = HostPresence::Yes;
            host_at = Some(index);
        } else if is_modifier(kind, host) {
            presence = presence.max(HostPresence::Modifier);
        }
    }

    HostScan {
        presence,
        boundary: boundary.unwrap_or(children.len()),
        host_at,
    }
}

/// Classify a selector without changing it.
#[must_use]
pub fn classify_host(tree: &SelectorTree, selector: NodeId, host: &str) -> HostClass {
    scan_host(tree, selector, host).classify()
}

/// Rewrite `selector` so that it starts with a `:host` anchor.
pub fn hostify(tree: &mut SelectorTree, selector: NodeId, host: &str) {
    let scan = scan_host(tree, selector, host);

    match scan.classify() {
        HostClass::Absent => {
            let combinator = tree.alloc(NodeKind::Combinator(Combinator::Descendant));
            tree.prepend_child(selector, combinator);
            let anchor = tree.alloc(host_anchor());
            tree.prepend_child(selector, anchor);
        }
        HostClass::ModifierOnly => {
            let region = tree.children(selector)[..scan.boundary].to_vec();
            wrap_region(tree, selector, &region, host);
        }
        HostClass::Leading => {
            let Some(first) = tree.first_child(selector) else {
                return;
            };
            if !tree.kind(first).is_host_anchor() {
                let anchor = tree.alloc(host_anchor());
                tree.replace_child(first, anchor);
            }
        }
        HostClass::General => {
            let mut boundary = scan.boundary;
            if let Some(host_at) = scan.host_at
                && host_at >= boundary
            {
                // The host sits past the first compound: drop it with the
                // combinator that led to it.
                let host_node = tree.children(selector)[host_at];
                if let Some(previous) = tree.prev_sibling(host_node)
                    && tree.kind(previous).is_combinator()
                {
                    tree.detach(previous);
                }
                tree.detach(host_node);
                boundary = scan_host(tree, selector, host).boundary;
            }
            let region = tree.children(selector)[..boundary].to_vec();
            wrap_region(tree, selector, &region, host);
        }
    }
}

/// Replace `region` with one anchor carrying it as argument.
///
/// Host classes are dropped; the argument of an existing anchor in the region
/// goes first.
fn wrap_region(tree: &mut SelectorTree, selector: NodeId, region: &[NodeId], host: &str) {
    let mut inherited = Vec::new();
    let mut collected = Vec::new();

    for &node in region {
        tree.detach(node);
        let is_anchor = tree.kind(node).is_host_anchor();
        let is_host_class = tree.kind(node).class_name() == Some(host);
        if is_anchor {
            for argument in tree.take_children(node) {
                inherited.extend(tree.take_children(argument));
            }
        } else if !is_host_class {
            collected.push(node);
        }
    }

    let anchor = tree.alloc(host_anchor());
    if !inherited.is_empty() || !collected.is_empty() {
        let argument = anchor_argument(tree, anchor);
        for node in inherited.into_iter().chain(collected) {
            tree.append_child(argument, node);
        }
    }
    tree.prepend_child(selector, anchor);
}
