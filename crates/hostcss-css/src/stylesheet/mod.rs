//! Whole-stylesheet processing for one component.
//!
//! Around the selector pipeline this layer drops rules that have no place in a
//! shadow root, splits rules configured as complex selectors, and rewrites the
//! selector of every remaining rule. Declarations pass through untouched.

use thiserror::Error;

use crate::config::Component;
use crate::selector::SelectorParseError;
use crate::transform::{Warning, rewrite_selector};

mod parser;

pub use parser::{AtRule, AtRuleBody, Rule, StyleRule, Stylesheet, parse_stylesheet, strip_comments};

/// Theme-root selectors that never belong in a component stylesheet.
const THEME_ROOT_SELECTORS: &[&str] = &[".spectrum", ".spectrum--express"];

/// A stylesheet that could not be processed.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A rule's selector did not parse.
    #[error("cannot rewrite `{selector}`: {source}")]
    Selector {
        /// The rule selector, after complex selector expansion.
        selector: String,
        /// Underlying error.
        #[source]
        source: SelectorParseError,
    },
}

/// Knobs for [`process_stylesheet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Prepend `/* <source selector> */` to every rewritten rule.
    pub source_comments: bool,
}

/// The processed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    /// Output CSS.
    pub css: String,
    /// Advisory warnings collected from every rewritten selector.
    pub warnings: Vec<Warning>,
    /// Number of style rules removed by filtering.
    pub dropped: usize,
}

/// Filter, split and rewrite every rule of `css` for `component`.
///
/// # Errors
///
/// Returns [`ProcessError::Selector`] when a rule selector is not valid
/// selector syntax.
pub fn process_stylesheet(
    css: &str,
    component: &Component,
    options: &ProcessOptions,
) -> Result<Processed, ProcessError> {
    let stylesheet = parse_stylesheet(css);
    let mut processor = Processor {
        component,
        options,
        warnings: Vec::new(),
        dropped: 0,
    };
    let rules = processor.process_rules(stylesheet.rules)?;

    let mut out = String::new();
    write_rules(&rules, &mut out);

    Ok(Processed {
        css: out,
        warnings: processor.warnings,
        dropped: processor.dropped,
    })
}

struct Processor<'a> {
    component: &'a Component,
    options: &'a ProcessOptions,
    warnings: Vec<Warning>,
    dropped: usize,
}

impl Processor<'_> {
    fn process_rules(&mut self, rules: Vec<Rule>) -> Result<Vec<Rule>, ProcessError> {
        let mut kept = Vec::with_capacity(rules.len());

        for rule in rules {
            match rule {
                Rule::Style(style) => {
                    if let Some(style) = self.process_style_rule(style)? {
                        kept.push(Rule::Style(style));
                    }
                }
                Rule::At(AtRule {
                    name,
                    prelude,
                    body: Some(AtRuleBody::Rules(children)),
                }) => {
                    let children = self.process_rules(children)?;
                    // A conditional group with nothing left in it is dropped
                    if !children.is_empty() {
                        kept.push(Rule::At(AtRule {
                            name,
                            prelude,
                            body: Some(AtRuleBody::Rules(children)),
                        }));
                    }
                }
                Rule::At(at) => kept.push(Rule::At(at)),
            }
        }

        Ok(kept)
    }

    fn process_style_rule(&mut self, rule: StyleRule) -> Result<Option<StyleRule>, ProcessError> {
        if THEME_ROOT_SELECTORS.contains(&rule.selector.as_str())
            || self.component.is_excluded(&rule.selector)
        {
            self.dropped += 1;
            return Ok(None);
        }

        let expanded = split_selector_list(&rule.selector)
            .into_iter()
            .flat_map(|selector| match self.component.complex_replacement(selector) {
                Some(replacements) => replacements.to_vec(),
                None => vec![selector.to_string()],
            })
            .collect::<Vec<_>>()
            .join(", ");

        let rewritten =
            rewrite_selector(&expanded, self.component).map_err(|source| ProcessError::Selector {
                selector: expanded.clone(),
                source,
            })?;
        self.warnings.extend(rewritten.warnings);

        Ok(Some(StyleRule {
            selector: rewritten.selector,
            comment: self.options.source_comments.then_some(rule.selector),
            block: rule.block,
        }))
    }
}

/// Split a selector list on top-level commas.
fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, c) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(selector[start..index].trim());
                start = index + 1;
            }
            (None, _) => {}
        }
    }
    parts.push(selector[start..].trim());
    parts
}

fn write_rules(rules: &[Rule], out: &mut String) {
    for (index, rule) in rules.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        match rule {
            Rule::Style(style) => {
                out.push_str(&style.selector);
                out.push_str(" {");
                if let Some(comment) = &style.comment {
                    out.push_str("\n  /* ");
                    out.push_str(comment);
                    out.push_str(" */");
                }
                out.push_str(&style.block);
                out.push_str("}\n");
            }
            Rule::At(at) => {
                out.push('@');
                out.push_str(&at.name);
                if !at.prelude.is_empty() {
                    out.push(' ');
                    out.push_str(&at.prelude);
                }
                match &at.body {
                    None => out.push_str(";\n"),
                    Some(AtRuleBody::Raw(block)) => {
                        out.push_str(" {");
                        out.push_str(block);
                        out.push_str("}\n");
                    }
                    Some(AtRuleBody::Rules(children)) => {
                        out.push_str(" {\n");
                        write_rules(children, out);
                        out.push_str("}\n");
                    }
                }
            }
        }
    }
}
