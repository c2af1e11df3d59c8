//! Selector parsing per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! Selector text is parsed straight into a [`SelectorTree`]. A complex selector
//! becomes a `Selector` node whose children are the simple selectors and
//! combinators in source order, the flat shape the rewrite passes scan.

use std::iter::Peekable;
use std::str::CharIndices;

use hostcss_tree::{
    Attribute, AttributeMatcher, AttributeOperator, Combinator, NodeId, NodeKind, Pseudo,
    QuoteStyle, SelectorTree,
};
use thiserror::Error;

mod serialize;

pub use serialize::{serialize_list, to_css};

/// A selector that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset} in selector `{selector}`")]
pub struct SelectorParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into `selector`.
    pub offset: usize,
    /// The full selector text being parsed.
    pub selector: String,
}

/// Functional pseudos whose argument is a selector list.
///
/// Every other functional pseudo (`:nth-child(2n+1)`, `:dir(rtl)`, `:lang(en)`)
/// keeps its argument as raw text.
const SELECTOR_ARGUMENT_PSEUDOS: &[&str] = &[
    "not",
    "is",
    "where",
    "matches",
    "any",
    "-webkit-any",
    "-moz-any",
    "has",
    "host",
    "host-context",
    "slotted",
];

/// [§ 3.6.1 Legacy pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-element-syntax)
/// "For compatibility with existing style sheets, user agents must also accept
/// the previous one-colon notation for pseudo-elements introduced in CSS levels
/// 1 and 2 (namely, :first-line, :first-letter, :before and :after)."
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Parse a comma-separated selector list into a fresh tree.
///
/// Supports:
/// - Type and universal selectors: `div`, `*`
/// - Class and ID selectors: `.class`, `#id`
/// - Attribute selectors with every operator, quoted or bare values, and
///   `i` / `s` flags
/// - Pseudo-classes and pseudo-elements, including legacy `:before`
/// - Functional pseudos with nested selector lists: `:not(.a, .b)`, `:host(.quiet)`
/// - All four combinators and backslash escapes inside identifiers
///
/// # Errors
///
/// Returns a [`SelectorParseError`] for empty selectors, dangling combinators,
/// unterminated strings or brackets, and characters outside selector syntax.
pub fn parse_selector_list(raw: &str) -> Result<SelectorTree, SelectorParseError> {
    let mut tree = SelectorTree::new();
    let root = tree.root();
    SelectorParser::new(raw, raw, 0).parse_list(&mut tree, root, false)?;
    Ok(tree)
}

/// Character-level selector parser over one (possibly nested) selector list.
struct SelectorParser<'a> {
    /// Text being parsed.
    input: &'a str,
    /// Outermost selector text, for error messages.
    source: &'a str,
    /// Offset of `input` within `source`.
    base: usize,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str, source: &'a str, base: usize) -> Self {
        Self {
            input,
            source,
            base,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.bump();
        }
    }

    /// Error at the current position.
    fn error(&mut self, message: impl Into<String>) -> SelectorParseError {
        let offset = self.chars.peek().map_or(self.input.len(), |&(i, _)| i);
        self.error_at(message, self.base + offset)
    }

    fn error_at(&self, message: impl Into<String>, offset: usize) -> SelectorParseError {
        SelectorParseError {
            message: message.into(),
            offset,
            selector: self.source.to_string(),
        }
    }

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// `relative` allows a leading combinator, as in `:has(> img)`.
    fn parse_list(
        &mut self,
        tree: &mut SelectorTree,
        parent: NodeId,
        relative: bool,
    ) -> Result<(), SelectorParseError> {
        loop {
            let selector = tree.alloc(NodeKind::Selector);
            tree.append_child(parent, selector);
            self.parse_complex(tree, selector, relative)?;
            match self.peek() {
                Some(',') => {
                    let _ = self.bump();
                }
                None => return Ok(()),
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Stops before a `,` or at the end of input.
    fn parse_complex(
        &mut self,
        tree: &mut SelectorTree,
        selector: NodeId,
        relative: bool,
    ) -> Result<(), SelectorParseError> {
        self.skip_whitespace();

        loop {
            let last = tree.last_child(selector);
            let after_combinator = last.is_some_and(|id| tree.kind(id).is_combinator());

            let kind = match self.peek() {
                None | Some(',') => break,

                // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
                // Whitespace is only a combinator when no explicit one follows.
                Some(c) if c.is_ascii_whitespace() => {
                    self.skip_whitespace();
                    if matches!(self.peek(), None | Some(',' | '>' | '+' | '~')) {
                        continue;
                    }
                    if last.is_none() || after_combinator {
                        continue;
                    }
                    NodeKind::Combinator(Combinator::Descendant)
                }

                // [§ 16.2-16.4](https://www.w3.org/TR/selectors-4/#child-combinators)
                Some(c @ ('>' | '+' | '~')) => {
                    if after_combinator || (last.is_none() && !relative) {
                        return Err(self.error(format!("unexpected combinator `{c}`")));
                    }
                    let _ = self.bump();
                    self.skip_whitespace();
                    NodeKind::Combinator(match c {
                        '>' => Combinator::Child,
                        '+' => Combinator::NextSibling,
                        _ => Combinator::SubsequentSibling,
                    })
                }

                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                Some('.') => {
                    let _ = self.bump();
                    NodeKind::Class(self.consume_ident("class name")?)
                }

                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                Some('#') => {
                    let _ = self.bump();
                    NodeKind::Id(self.consume_ident("id")?)
                }

                Some('*') => {
                    let _ = self.bump();
                    NodeKind::Universal
                }

                Some('[') => self.consume_attribute()?,

                Some(':') => {
                    let node = self.consume_pseudo(tree)?;
                    tree.append_child(selector, node);
                    continue;
                }

                Some(c) if is_ident_start_char(c) || c == '-' || c == '\\' => {
                    NodeKind::Tag(self.consume_ident("type selector")?)
                }

                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            };

            let node = tree.alloc(kind);
            tree.append_child(selector, node);
        }

        match tree.last_child(selector) {
            None => Err(self.error("empty selector")),
            Some(last) if tree.kind(last).is_combinator() => {
                Err(self.error("selector ends with a combinator"))
            }
            Some(_) => Ok(()),
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Escapes are kept verbatim (`\:` stays `\:`) so serialization is lossless.
    fn consume_ident(&mut self, what: &str) -> Result<String, SelectorParseError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                let _ = self.bump();
                ident.push('\\');
                match self.bump() {
                    Some(escaped) => ident.push(escaped),
                    None => return Err(self.error("unterminated escape")),
                }
            } else if is_ident_char(c) {
                ident.push(c);
                let _ = self.bump();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            Err(self.error(format!("expected {what}")))
        } else {
            Ok(ident)
        }
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn consume_attribute(&mut self) -> Result<NodeKind, SelectorParseError> {
        let _ = self.bump(); // '['
        self.skip_whitespace();
        let name = self.consume_ident("attribute name")?;
        self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                let _ = self.bump();
                return Ok(NodeKind::Attribute(Attribute::exists(name)));
            }
            Some('=') => {
                let _ = self.bump();
                AttributeOperator::Equals
            }
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                let _ = self.bump();
                if self.peek() != Some('=') {
                    return Err(self.error("expected `=` in attribute selector"));
                }
                let _ = self.bump();
                match op {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                }
            }
            _ => return Err(self.error("malformed attribute selector")),
        };

        self.skip_whitespace();
        let (value, quote) = self.consume_attribute_value()?;
        self.skip_whitespace();

        // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
        let case_flag = match self.peek() {
            Some(c @ ('i' | 'I' | 's' | 'S')) => {
                let _ = self.bump();
                self.skip_whitespace();
                Some(c.to_ascii_lowercase())
            }
            _ => None,
        };

        if self.peek() != Some(']') {
            return Err(self.error("expected `]`"));
        }
        let _ = self.bump();

        Ok(NodeKind::Attribute(Attribute {
            name,
            matcher: Some(AttributeMatcher {
                operator,
                value,
                quote,
                case_flag,
            }),
        }))
    }

    /// Parse an attribute value: a quoted string or a bare identifier.
    fn consume_attribute_value(&mut self) -> Result<(String, QuoteStyle), SelectorParseError> {
        let Some(q @ ('"' | '\'')) = self.peek() else {
            let value = self.consume_ident("attribute value")?;
            return Ok((value, QuoteStyle::None));
        };
        let _ = self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') => {
                    value.push('\\');
                    if let Some(c) = self.bump() {
                        value.push(c);
                    }
                }
                Some(c) if c == q => break,
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
        let quote = if q == '"' {
            QuoteStyle::Double
        } else {
            QuoteStyle::Single
        };
        Ok((value, quote))
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Returns a detached node. Selector-list arguments become child `Selector`
    /// nodes; an argument that does not parse as one is kept as raw text.
    fn consume_pseudo(&mut self, tree: &mut SelectorTree) -> Result<NodeId, SelectorParseError> {
        let _ = self.bump(); // ':'
        let double = self.peek() == Some(':');
        if double {
            let _ = self.bump();
        }
        let name = self.consume_ident("pseudo name")?;
        let argument = if self.peek() == Some('(') {
            Some(self.consume_argument()?)
        } else {
            None
        };

        let lower = name.to_ascii_lowercase();
        let legacy = !double && LEGACY_PSEUDO_ELEMENTS.contains(&lower.as_str());
        let pseudo = Pseudo {
            name,
            raw_argument: None,
            legacy,
        };
        let node = tree.alloc(if double || legacy {
            NodeKind::PseudoElement(pseudo)
        } else {
            NodeKind::PseudoClass(pseudo)
        });

        if let Some((text, start)) = argument {
            let parsed = SELECTOR_ARGUMENT_PSEUDOS.contains(&lower.as_str())
                && SelectorParser::new(text, self.source, start)
                    .parse_list(tree, node, true)
                    .is_ok();
            if !parsed {
                let _ = tree.take_children(node);
                if let NodeKind::PseudoClass(p) | NodeKind::PseudoElement(p) = tree.kind_mut(node) {
                    p.raw_argument = Some(text.trim().to_string());
                }
            }
        }

        Ok(node)
    }

    /// Consume a parenthesized argument, returning its inner text and the
    /// offset of that text within the outermost selector.
    fn consume_argument(&mut self) -> Result<(&'a str, usize), SelectorParseError> {
        let Some((open, _)) = self.chars.next() else {
            return Err(self.error("expected `(`"));
        };
        let start = open + 1;
        let mut depth = 1u32;
        let mut quote: Option<char> = None;

        while let Some((index, c)) = self.chars.next() {
            match (quote, c) {
                (_, '\\') => {
                    let _ = self.chars.next();
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok((&self.input[start..index], self.base + start));
                    }
                }
                (None, _) => {}
            }
        }

        Err(self.error_at("unbalanced parentheses", self.base + open))
    }
}
