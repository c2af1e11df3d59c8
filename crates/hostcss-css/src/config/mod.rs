//! Component conversion descriptors.
//!
//! A package config is a JSON document listing one descriptor per component.
//! Descriptors are deserialized into the `*Config` types, which mirror the
//! document, then compiled into a [`Component`]: selectors parsed, names
//! derived and patterns built once, so the rewrite passes only read it.

use std::fs;
use std::path::{Path, PathBuf};

use hostcss_tree::{NodeKind, Pseudo, SelectorTree};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::selector::parse_selector_list;

/// Errors raised while loading or compiling a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON or does not match the schema.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    /// An `exclude` or `excludeSourceSelector` entry is not a valid regex.
    #[error("component {component}: invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// Component name.
        component: String,
        /// Offending pattern.
        pattern: String,
        /// Underlying error.
        #[source]
        source: regex::Error,
    },
    /// A `selector` field is not a single simple selector.
    #[error("component {component}: source selector `{selector}` {reason}")]
    SourceSelector {
        /// Component name.
        component: String,
        /// Offending selector text.
        selector: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A replacement target has the wrong shape.
    #[error("component {component}: target `{selector}` {reason}")]
    TargetSelector {
        /// Component name.
        component: String,
        /// Offending selector text.
        selector: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A package of component descriptors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    /// Upstream package the stylesheets come from.
    #[serde(default)]
    pub spectrum: Option<String>,
    /// Package the output belongs to.
    #[serde(default)]
    pub package: Option<String>,
    /// One entry per component.
    pub components: Vec<ComponentConfig>,
}

impl PackageConfig {
    /// Parse a package config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text does not match the schema.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a package config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Compile every component descriptor.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error.
    pub fn compile(&self) -> Result<Vec<Component>, ConfigError> {
        self.components.iter().map(ComponentConfig::compile).collect()
    }
}

/// The selector identifying a component's root element.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HostConfig {
    /// `".spectrum-Search"`
    Selector(String),
    /// `{ "selector": ".spectrum-Search" }`. Other keys such as
    /// `shadowSelector` are accepted and ignored.
    Detailed {
        /// Host selector.
        selector: String,
    },
}

impl HostConfig {
    /// The host selector text.
    #[must_use]
    pub fn selector(&self) -> &str {
        match self {
            Self::Selector(selector) | Self::Detailed { selector } => selector,
        }
    }
}

/// Literal `"enum"` in an attribute entry's `type` field.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumTag {
    /// The only accepted value.
    Enum,
}

/// Literal `"boolean"` in an attribute entry's `type` field.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanTag {
    /// The only accepted value.
    Boolean,
}

/// One source of an enum attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumValueConfig {
    /// Bare selector; the value is derived from it.
    Selector(String),
    /// Explicit value.
    Named {
        /// Source selector.
        selector: String,
        /// Attribute value.
        name: String,
    },
}

/// An entry of `attributes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttributeConfig {
    /// Bare class selector mapped to a boolean attribute.
    Selector(String),
    /// `{ "type": "enum", "name": "size", "values": [...] }`
    Enum {
        /// Marker.
        #[serde(rename = "type")]
        kind: EnumTag,
        /// Attribute name.
        name: String,
        /// Source selectors in priority order.
        values: Vec<EnumValueConfig>,
    },
    /// `{ "type": "boolean", "selector": ".x--quiet", "name": "quiet" }`
    Boolean {
        /// Optional marker.
        #[serde(default, rename = "type")]
        kind: Option<BooleanTag>,
        /// Source selector.
        selector: String,
        /// Attribute name, derived from the selector when absent.
        #[serde(default)]
        name: Option<String>,
    },
}

/// An entry of `ids`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdConfig {
    /// Bare class selector.
    Selector(String),
    /// Explicit mapping.
    Named {
        /// Source selector.
        selector: String,
        /// Target id, derived from the selector when absent.
        #[serde(default)]
        name: Option<String>,
    },
}

/// An entry of `slots`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotConfig {
    /// Source selector.
    pub selector: String,
    /// Slot name.
    #[serde(default)]
    pub name: Option<String>,
    /// Selector placed inside `::slotted()` ahead of the slot predicate.
    #[serde(default)]
    pub content: Option<String>,
}

/// An entry of `classes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassConfig {
    /// Source selector.
    pub selector: String,
    /// New class name.
    pub name: String,
}

/// An entry of `pseudos`.
#[derive(Debug, Clone, Deserialize)]
pub struct PseudoConfig {
    /// Source selector.
    pub selector: String,
    /// Replacement pseudo-class, e.g. `:focus-visible`.
    pub value: String,
}

/// Replacement side of a `complexSelectors` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReplacementConfig {
    /// One selector.
    One(String),
    /// Several selectors.
    Many(Vec<String>),
}

/// An entry of `complexSelectors`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplexSelectorConfig {
    /// Source selector, matched after whitespace normalization.
    pub selector: String,
    /// Selectors that replace it.
    pub replacement: ReplacementConfig,
}

/// A component descriptor as written in the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    /// Output name; the stylesheet is written as `spectrum-<name>.css`.
    pub name: String,
    /// The component's root selector.
    pub host: HostConfig,
    /// Conversions to attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
    /// Conversions to ids.
    #[serde(default)]
    pub ids: Vec<IdConfig>,
    /// Conversions to slots.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
    /// Class renames.
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
    /// Pseudo-class substitutions.
    #[serde(default)]
    pub pseudos: Vec<PseudoConfig>,
    /// Patterns dropping whole rules.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Patterns dropping whole rules by source selector.
    #[serde(default)]
    pub exclude_source_selector: Vec<String>,
    /// Selector splitting directives.
    #[serde(default)]
    pub complex_selectors: Vec<ComplexSelectorConfig>,
}

impl ComponentConfig {
    /// Parse a single component descriptor from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text does not match the schema.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compile into an immutable [`Component`].
    ///
    /// # Errors
    ///
    /// Fails if a source selector is not a single simple selector, a pseudo
    /// target is not a pseudo-class, or a pattern is not a valid regex.
    pub fn compile(&self) -> Result<Component, ConfigError> {
        let cx = Compiler {
            component: &self.name,
            host_selector: self.host.selector(),
        };

        let host = match cx.source(self.host.selector())?.kind {
            NodeKind::Class(name) => name,
            _ => {
                return Err(cx.source_error(self.host.selector(), "is not a class selector"));
            }
        };

        let attributes = self
            .attributes
            .iter()
            .map(|entry| cx.attribute(entry))
            .collect::<Result<_, ConfigError>>()?;

        let ids = self
            .ids
            .iter()
            .map(|entry| {
                let (selector, name) = match entry {
                    IdConfig::Selector(selector) => (selector, cx.bare_name(selector)),
                    IdConfig::Named { selector, name } => (
                        selector,
                        name.clone().unwrap_or_else(|| cx.modifier_name(selector)),
                    ),
                };
                Ok(IdConversion {
                    source: cx.source(selector)?,
                    name,
                })
            })
            .collect::<Result<_, ConfigError>>()?;

        let slots = self
            .slots
            .iter()
            .map(|entry| {
                Ok(SlotConversion {
                    source: cx.source(&entry.selector)?,
                    name: entry.name.clone(),
                    content: entry
                        .content
                        .as_deref()
                        .map(|content| cx.compound(content))
                        .transpose()?,
                })
            })
            .collect::<Result<_, ConfigError>>()?;

        let classes = self
            .classes
            .iter()
            .map(|entry| {
                Ok(ClassConversion {
                    source: cx.source(&entry.selector)?,
                    name: entry
                        .name
                        .strip_prefix('.')
                        .unwrap_or(&entry.name)
                        .to_string(),
                })
            })
            .collect::<Result<_, ConfigError>>()?;

        let mut pseudos = self
            .pseudos
            .iter()
            .map(|entry| cx.pseudo(&entry.selector, &entry.value))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        pseudos.push(cx.pseudo(FOCUS_RING_SELECTOR, FOCUS_RING_REPLACEMENT)?);

        Ok(Component {
            name: self.name.clone(),
            host,
            attributes,
            ids,
            slots,
            classes,
            pseudos,
            exclude: cx.patterns(&self.exclude)?,
            exclude_source_selector: cx.patterns(&self.exclude_source_selector)?,
            complex_selectors: self
                .complex_selectors
                .iter()
                .map(|entry| ComplexSelector {
                    selector: normalize_whitespace(&entry.selector),
                    replacements: match &entry.replacement {
                        ReplacementConfig::One(one) => vec![one.clone()],
                        ReplacementConfig::Many(many) => many.clone(),
                    },
                })
                .collect(),
        })
    }
}

/// The built-in substitution every component receives.
pub const FOCUS_RING_SELECTOR: &str = ".focus-ring";
/// Replacement for [`FOCUS_RING_SELECTOR`].
pub const FOCUS_RING_REPLACEMENT: &str = ":focus-visible";

/// Collapse runs of whitespace to one space and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A source selector: one simple selector matched against tree nodes.
#[derive(Debug, Clone)]
pub struct SourceSelector {
    text: String,
    kind: NodeKind,
}

impl SourceSelector {
    /// The selector as written in the config.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether a tree node is the simple selector this source names.
    ///
    /// Pseudos match by name alone; attributes by name and value.
    #[must_use]
    pub fn matches(&self, kind: &NodeKind) -> bool {
        match (&self.kind, kind) {
            (NodeKind::Class(a), NodeKind::Class(b))
            | (NodeKind::Id(a), NodeKind::Id(b))
            | (NodeKind::Tag(a), NodeKind::Tag(b)) => a == b,
            (NodeKind::Universal, NodeKind::Universal) => true,
            (NodeKind::Attribute(a), NodeKind::Attribute(b)) => {
                a.name == b.name && a.value() == b.value()
            }
            (NodeKind::PseudoClass(a), NodeKind::PseudoClass(b))
            | (NodeKind::PseudoElement(a), NodeKind::PseudoElement(b)) => {
                a.name.eq_ignore_ascii_case(&b.name)
            }
            _ => false,
        }
    }
}

/// `attributes` entry after compilation.
#[derive(Debug, Clone)]
pub enum AttributeConversion {
    /// Source becomes `[name]`.
    Boolean {
        /// Matched selector.
        source: SourceSelector,
        /// Attribute name.
        name: String,
    },
    /// The first matching source becomes `[name="value"]`.
    Enum {
        /// Attribute name.
        name: String,
        /// `(source, value)` pairs in priority order.
        values: Vec<(SourceSelector, String)>,
    },
}

/// `ids` entry after compilation.
#[derive(Debug, Clone)]
pub struct IdConversion {
    /// Matched selector.
    pub source: SourceSelector,
    /// Target id.
    pub name: String,
}

/// `slots` entry after compilation.
#[derive(Debug, Clone)]
pub struct SlotConversion {
    /// Matched selector.
    pub source: SourceSelector,
    /// Slot name; unnamed entries target the default slot.
    pub name: Option<String>,
    /// Compound selector placed inside `::slotted()`: a list holding one
    /// selector without combinators or pseudo-elements.
    pub content: Option<SelectorTree>,
}

/// `classes` entry after compilation.
#[derive(Debug, Clone)]
pub struct ClassConversion {
    /// Matched selector.
    pub source: SourceSelector,
    /// New class name without the leading `.`.
    pub name: String,
}

/// `pseudos` entry after compilation.
#[derive(Debug, Clone)]
pub struct PseudoConversion {
    /// Matched selector.
    pub source: SourceSelector,
    /// Replacement pseudo-class.
    pub value: Pseudo,
}

/// `complexSelectors` entry after compilation.
#[derive(Debug, Clone)]
pub struct ComplexSelector {
    /// Whitespace-normalized source selector.
    pub selector: String,
    /// Replacement selectors.
    pub replacements: Vec<String>,
}

/// A compiled, read-only component descriptor.
#[derive(Debug, Clone)]
pub struct Component {
    /// Output name.
    pub name: String,
    /// Host class name without the leading `.`.
    pub host: String,
    /// Attribute conversions in priority order.
    pub attributes: Vec<AttributeConversion>,
    /// Id conversions in priority order.
    pub ids: Vec<IdConversion>,
    /// Slot conversions in priority order.
    pub slots: Vec<SlotConversion>,
    /// Class renames in priority order.
    pub classes: Vec<ClassConversion>,
    /// Pseudo substitutions, ending with the built-in focus ring rule.
    pub pseudos: Vec<PseudoConversion>,
    /// Rules whose selector matches any of these are dropped.
    pub exclude: Vec<Regex>,
    /// Rules whose source selector matches any of these are dropped.
    pub exclude_source_selector: Vec<Regex>,
    /// Selector splitting directives.
    pub complex_selectors: Vec<ComplexSelector>,
}

impl Component {
    /// Parse and compile one component descriptor from JSON text.
    ///
    /// # Errors
    ///
    /// See [`ComponentConfig::from_json`] and [`ComponentConfig::compile`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        ComponentConfig::from_json(text)?.compile()
    }

    /// The host class as a selector, e.g. `.spectrum-Search`.
    #[must_use]
    pub fn host_selector(&self) -> String {
        format!(".{}", self.host)
    }

    /// Whether a rule selector is dropped by `excludeSourceSelector` or `exclude`.
    #[must_use]
    pub fn is_excluded(&self, selector: &str) -> bool {
        self.exclude_source_selector
            .iter()
            .chain(&self.exclude)
            .any(|pattern| pattern.is_match(selector))
    }

    /// Replacement selectors for a top-level selector, if one is configured.
    #[must_use]
    pub fn complex_replacement(&self, selector: &str) -> Option<&[String]> {
        let normalized = normalize_whitespace(selector);
        self.complex_selectors
            .iter()
            .find(|entry| entry.selector == normalized)
            .map(|entry| entry.replacements.as_slice())
    }
}

/// Compilation context for one component.
struct Compiler<'a> {
    component: &'a str,
    host_selector: &'a str,
}

impl Compiler<'_> {
    fn source_error(&self, selector: &str, reason: &str) -> ConfigError {
        ConfigError::SourceSelector {
            component: self.component.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    fn target_error(&self, selector: &str, reason: &str) -> ConfigError {
        ConfigError::TargetSelector {
            component: self.component.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Parse a selector that must be exactly one simple selector.
    fn source(&self, text: &str) -> Result<SourceSelector, ConfigError> {
        let tree = parse_selector_list(text)
            .map_err(|err| self.source_error(text, &format!("does not parse: {err}")))?;
        let [selector] = tree.children(tree.root()) else {
            return Err(self.source_error(text, "must be a single selector"));
        };
        let [node] = tree.children(*selector) else {
            return Err(self.source_error(text, "must be a single simple selector"));
        };
        Ok(SourceSelector {
            text: text.trim().to_string(),
            kind: tree.kind(*node).clone(),
        })
    }

    /// Name for a bare string entry: `H--x` → `x`, `H-x` → `x`, `.x` → `x`.
    fn bare_name(&self, selector: &str) -> String {
        let selector = selector.trim();
        selector
            .strip_prefix(self.host_selector)
            .and_then(|rest| rest.strip_prefix("--").or_else(|| rest.strip_prefix('-')))
            .unwrap_or_else(|| strip_marker(selector))
            .to_string()
    }

    /// Name for an object entry without `name`: `H--x` → `x`, else the
    /// selector without its leading marker.
    fn modifier_name(&self, selector: &str) -> String {
        let selector = selector.trim();
        selector
            .strip_prefix(self.host_selector)
            .and_then(|rest| rest.strip_prefix("--"))
            .unwrap_or_else(|| strip_marker(selector))
            .to_string()
    }

    fn attribute(&self, entry: &AttributeConfig) -> Result<AttributeConversion, ConfigError> {
        Ok(match entry {
            AttributeConfig::Selector(selector) => AttributeConversion::Boolean {
                source: self.source(selector)?,
                name: self.bare_name(selector),
            },
            AttributeConfig::Boolean { selector, name, .. } => AttributeConversion::Boolean {
                source: self.source(selector)?,
                name: name.clone().unwrap_or_else(|| self.modifier_name(selector)),
            },
            AttributeConfig::Enum { name, values, .. } => AttributeConversion::Enum {
                name: name.clone(),
                values: values
                    .iter()
                    .map(|value| match value {
                        EnumValueConfig::Selector(selector) => {
                            Ok((self.source(selector)?, self.modifier_name(selector)))
                        }
                        EnumValueConfig::Named { selector, name } => {
                            Ok((self.source(selector)?, name.clone()))
                        }
                    })
                    .collect::<Result<_, ConfigError>>()?,
            },
        })
    }

    fn pseudo(&self, selector: &str, value: &str) -> Result<PseudoConversion, ConfigError> {
        let source = self.source(selector)?;
        let tree = parse_selector_list(value)
            .map_err(|err| self.target_error(value, &format!("does not parse: {err}")))?;
        let target = match (tree.children(tree.root()), tree.first_child(tree.root())) {
            ([_], Some(selector)) => match tree.children(selector) {
                [node] => tree.kind(*node).clone(),
                _ => return Err(self.target_error(value, "must be a single pseudo-class")),
            },
            _ => return Err(self.target_error(value, "must be a single pseudo-class")),
        };
        let NodeKind::PseudoClass(pseudo) = target else {
            return Err(self.target_error(value, "is not a pseudo-class"));
        };
        Ok(PseudoConversion {
            source,
            value: pseudo,
        })
    }

    /// Parse a slot content selector, which must be one compound selector.
    fn compound(&self, text: &str) -> Result<SelectorTree, ConfigError> {
        let tree = parse_selector_list(text)
            .map_err(|err| self.target_error(text, &format!("does not parse: {err}")))?;
        let is_compound = match tree.children(tree.root()) {
            [selector] => {
                let nodes = tree.children(*selector);
                !nodes.is_empty()
                    && nodes.iter().all(|&node| {
                        !matches!(
                            tree.kind(node),
                            NodeKind::Combinator(_) | NodeKind::PseudoElement(_)
                        )
                    })
            }
            _ => false,
        };
        if !is_compound {
            return Err(self.target_error(text, "must be a single compound selector"));
        }
        Ok(tree)
    }

    fn patterns(&self, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
        patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::Pattern {
                    component: self.component.to_string(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Strip a leading `.`, `#` or colons from a selector.
fn strip_marker(selector: &str) -> &str {
    selector.trim_start_matches(['.', '#', ':'])
}
