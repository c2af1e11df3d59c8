//! Shadow-scoped CSS rewriting.
//!
//! Rewrites component stylesheets written for a global page (class-based
//! selectors) into stylesheets for a custom element's shadow root, where the
//! element itself is `:host` and its variants are attributes, ids or slots.
//!
//! The crate is organised in layers:
//!
//! - [`selector`]: parse selector text into a [`hostcss_tree::SelectorTree`] and
//!   serialize it back.
//! - [`config`]: per-component conversion descriptors loaded from JSON.
//! - [`transform`]: the rewrite passes and the per-selector pipeline.
//! - [`stylesheet`]: rule-level filtering, splitting and rewriting of whole
//!   stylesheets.

/// Per-component conversion descriptors.
pub mod config;
/// Selector parsing and serialization.
pub mod selector;
/// Stylesheet-level processing around the selector pipeline.
pub mod stylesheet;
/// Selector rewrite passes.
pub mod transform;

pub use config::{Component, ConfigError, PackageConfig};
pub use selector::{SelectorParseError, parse_selector_list, serialize_list, to_css};
pub use stylesheet::{ProcessError, ProcessOptions, Processed, process_stylesheet};
pub use transform::{Rewritten, Warning, rewrite_selector};
