//! Selector tree for the hostcss rewriter.
//!
//! This crate provides an arena-based tree for CSS selectors following the
//! shape of [Selectors Level 4](https://www.w3.org/TR/selectors-4/): a selector
//! list holds complex selectors, and each complex selector holds a flat run of
//! simple selectors and combinators.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! Rewrite passes clone, splice and reparent nodes freely; indices keep that
//! free of ownership cycles and aliasing. Detached nodes stay allocated until
//! the tree is dropped, which is fine for a tree that lives for one selector.

/// A type-safe index into the selector tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root selector list is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`
    NextSibling,
    /// `A ~ B`
    SubsequentSibling,
}

impl Combinator {
    /// The combinator's source character (a single space for descendant).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::NextSibling => "+",
            Self::SubsequentSibling => "~",
        }
    }

    /// Sibling combinators (`+` and `~`) relate elements sharing a parent.
    #[must_use]
    pub const fn is_sibling(self) -> bool {
        matches!(self, Self::NextSibling | Self::SubsequentSibling)
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[attr=value]`
    Equals,
    /// `[attr~=value]`
    Includes,
    /// `[attr|=value]`
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
}

impl AttributeOperator {
    /// The operator as written in CSS.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// How an attribute value was quoted in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Bare identifier: `[dir=rtl]`
    None,
    /// `[dir='rtl']`
    Single,
    /// `[dir="rtl"]`
    Double,
}

/// The value half of an attribute selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatcher {
    /// The comparison operator.
    pub operator: AttributeOperator,
    /// The value with its quotes stripped.
    pub value: String,
    /// The quoting used when serializing the value.
    pub quote: QuoteStyle,
    /// Optional `i` / `s` case-sensitivity flag.
    pub case_flag: Option<char>,
}

/// An attribute selector: `[name]` or `[name op value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Operator and value, absent for presence tests.
    pub matcher: Option<AttributeMatcher>,
}

impl Attribute {
    /// `[name]`
    #[must_use]
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: None,
        }
    }

    /// `[name="value"]`
    #[must_use]
    pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: Some(AttributeMatcher {
                operator: AttributeOperator::Equals,
                value: value.into(),
                quote: QuoteStyle::Double,
                case_flag: None,
            }),
        }
    }

    /// The compared value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.matcher.as_ref().map(|m| m.value.as_str())
    }
}

/// A pseudo-class or pseudo-element.
///
/// Selector-list arguments (`:not(.a, .b)`, `:host(.quiet)`) are stored as
/// child `Selector` nodes. Arguments that are not selectors (`:nth-child(2n+1)`)
/// are kept verbatim in `raw_argument`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pseudo {
    /// Name without the leading colons.
    pub name: String,
    /// Unparsed argument text.
    pub raw_argument: Option<String>,
    /// Pseudo-element written with a single colon (`:before`).
    pub legacy: bool,
}

impl Pseudo {
    /// A pseudo without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_argument: None,
            legacy: false,
        }
    }
}

/// The variant carried by every node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root container; children are `Selector` nodes separated by commas.
    SelectorList,
    /// A complex selector; children are simple selectors and combinators.
    Selector,
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    Tag(String),
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(Attribute),
    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(Pseudo),
    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    PseudoElement(Pseudo),
    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    Combinator(Combinator),
}

impl NodeKind {
    /// The `:host` pseudo-class anchoring a shadow-scoped selector.
    #[must_use]
    pub fn is_host_anchor(&self) -> bool {
        matches!(self, Self::PseudoClass(p) if p.name == "host")
    }

    /// True for pseudo-classes with the given name.
    #[must_use]
    pub fn is_pseudo_class(&self, name: &str) -> bool {
        matches!(self, Self::PseudoClass(p) if p.name == name)
    }

    /// True for any combinator node.
    #[must_use]
    pub const fn is_combinator(&self) -> bool {
        matches!(self, Self::Combinator(_))
    }

    /// The combinator, if this is one.
    #[must_use]
    pub const fn combinator(&self) -> Option<Combinator> {
        match self {
            Self::Combinator(c) => Some(*c),
            _ => None,
        }
    }

    /// The class name, if this is a class selector.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            _ => None,
        }
    }
}

/// A node in the arena: its variant plus tree links.
#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    /// `None` for the root and detached nodes.
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-based selector tree.
///
/// All nodes live in one vector; relationships are [`NodeId`] indices. The root
/// `SelectorList` is always at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct SelectorTree {
    nodes: Vec<Node>,
}

impl SelectorTree {
    /// Create a tree holding just an empty root selector list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::SelectorList,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root selector list.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The variant of a node allocated by this tree.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Mutable access to a node's variant.
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Allocate a new, detached node and return its ID.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of a node within its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Insert `child` at `index` in `parent`'s children, detaching it first.
    ///
    /// Indices past the end append.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, usize::MAX, child);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, 0, child);
    }

    /// Insert `node` immediately before `reference` in its parent.
    ///
    /// Does nothing when `reference` is detached.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        if node == reference {
            return;
        }
        self.detach(node);
        if let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference))
        {
            self.insert_child(parent, index, node);
        }
    }

    /// Insert `node` immediately after `reference` in its parent.
    ///
    /// Does nothing when `reference` is detached.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if node == reference {
            return;
        }
        self.detach(node);
        if let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference))
        {
            self.insert_child(parent, index + 1, node);
        }
    }

    /// Detach a node from its parent, keeping its own subtree intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Put `replacement` where `old` is, detaching `old`.
    pub fn replace_child(&mut self, old: NodeId, replacement: NodeId) {
        if old == replacement {
            return;
        }
        self.detach(replacement);
        let Some(parent) = self.nodes[old.0].parent.take() else {
            return;
        };
        if let Some(slot) = self.nodes[parent.0].children.iter_mut().find(|c| **c == old) {
            *slot = replacement;
        }
        self.nodes[replacement.0].parent = Some(parent);
    }

    /// Detach all children of `id` and return them in order.
    pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for &child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.take_children(from) {
            self.append_child(to, child);
        }
    }

    /// Copy the subtree rooted at `id` in `source` into fresh, detached nodes
    /// of this tree.
    pub fn graft(&mut self, source: &Self, id: NodeId) -> NodeId {
        let copy = self.alloc(source.kind(id).clone());
        for &child in source.children(id) {
            let child_copy = self.graft(source, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Iterate over all descendants of a node in document (pre-)order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }
}

impl Default for SelectorTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a SelectorTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
