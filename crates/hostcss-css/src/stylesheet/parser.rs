//! Rule-level CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! Only the rule structure is parsed. Preludes and declaration blocks are kept
//! as source text: the rewriter only touches selectors, and leaving the rest
//! verbatim keeps every declaration byte-for-byte intact.

/// Conditional group rules whose blocks hold more rules.
///
/// [§ 2 Conditional group rules](https://www.w3.org/TR/css-conditional-3/#processing)
const GROUP_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "container",
    "layer",
    "document",
    "-moz-document",
    "scope",
];

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
///
/// A style rule: selector list plus declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector list text, trimmed.
    pub selector: String,
    /// Block contents between the braces, verbatim.
    pub block: String,
    /// Comment emitted at the top of the block.
    pub comment: Option<String>,
}

/// The block of an at-rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtRuleBody {
    /// Conditional group rule contents.
    Rules(Vec<Rule>),
    /// Any other block, verbatim (`@keyframes`, `@font-face`).
    Raw(String),
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude text, trimmed.
    pub prelude: String,
    /// The block, absent for statement at-rules such as `@import`.
    pub body: Option<AtRuleBody>,
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
}

/// Remove `/* ... */` comments outside strings.
///
/// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
#[must_use]
pub fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '/' && chars.peek() == Some(&'*') => {
                let _ = chars.next();
                let mut previous = '\0';
                for ch in chars.by_ref() {
                    if previous == '*' && ch == '/' {
                        break;
                    }
                    previous = ch;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }

    out
}

/// Parse a stylesheet. Comments are stripped first; malformed trailing input
/// (an unterminated block) is consumed to the end.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let source = strip_comments(css);
    let mut parser = CSSParser::new(&source);
    Stylesheet {
        rules: parser.consume_list_of_rules(false),
    }
}

/// Where a prelude scan stopped.
enum PreludeEnd {
    Block,
    Semicolon,
    Eof,
}

/// CSS rule parser over comment-free source text.
struct CSSParser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> CSSParser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Nested lists stop before the closing `}` of their block.
    fn consume_list_of_rules(&mut self, nested: bool) -> Vec<Rule> {
        let mut rules = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return rules,
                Some('}') if nested => return rules,
                // Stray closing brace or semicolon at top level
                Some('}' | ';') => {
                    let _ = self.consume();
                }
                Some('@') => {
                    if let Some(rule) = self.consume_at_rule() {
                        rules.push(Rule::At(rule));
                    }
                }
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<AtRule> {
        let _ = self.consume(); // '@'
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            let _ = self.consume();
        }
        let name = self.input[start..self.position].to_string();
        if name.is_empty() {
            return None;
        }

        let (prelude, end) = self.consume_prelude();
        let prelude = prelude.trim().to_string();

        let body = match end {
            PreludeEnd::Semicolon | PreludeEnd::Eof => None,
            PreludeEnd::Block if GROUP_AT_RULES.contains(&name.to_ascii_lowercase().as_str()) => {
                let rules = self.consume_list_of_rules(true);
                let _ = self.consume(); // '}'
                Some(AtRuleBody::Rules(rules))
            }
            PreludeEnd::Block => Some(AtRuleBody::Raw(self.consume_block().to_string())),
        };

        Some(AtRule {
            name,
            prelude,
            body,
        })
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
    ///
    /// "If the input ends before a block is found, this is a parse error.
    /// Return nothing."
    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        let (prelude, end) = self.consume_prelude();
        match end {
            PreludeEnd::Block => {
                let selector = prelude.trim().to_string();
                let block = self.consume_block().to_string();
                Some(StyleRule {
                    selector,
                    block,
                    comment: None,
                })
            }
            PreludeEnd::Semicolon | PreludeEnd::Eof => None,
        }
    }

    /// Consume up to a top-level `{` or `;`, consuming that character too.
    fn consume_prelude(&mut self) -> (&'a str, PreludeEnd) {
        let start = self.position;
        let mut depth = 0u32;
        let mut quote: Option<char> = None;

        while let Some(c) = self.consume() {
            match (quote, c) {
                (_, '\\') => {
                    let _ = self.consume();
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(' | '[') => depth += 1,
                (None, ')' | ']') => depth = depth.saturating_sub(1),
                (None, '{') if depth == 0 => {
                    return (&self.input[start..self.position - 1], PreludeEnd::Block);
                }
                (None, ';') if depth == 0 => {
                    return (&self.input[start..self.position - 1], PreludeEnd::Semicolon);
                }
                (None, _) => {}
            }
        }

        (&self.input[start..], PreludeEnd::Eof)
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Called after the opening `{`; returns the contents and consumes the
    /// matching `}`.
    fn consume_block(&mut self) -> &'a str {
        let start = self.position;
        let mut depth = 1u32;
        let mut quote: Option<char> = None;

        while let Some(c) = self.consume() {
            match (quote, c) {
                (_, '\\') => {
                    let _ = self.consume();
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '{') => depth += 1,
                (None, '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return &self.input[start..self.position - 1];
                    }
                }
                (None, _) => {}
            }
        }

        &self.input[start..]
    }
}
