//! Common utilities for the hostcss rewriter.
//!
//! This crate provides shared infrastructure used by the engine and the CLI:
//! - **Warning System** - colored, deduplicated terminal output for advisory diagnostics

pub mod warning;
