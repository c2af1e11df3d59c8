//! Advisory warnings with colored terminal output.
//!
//! Provides deduplication so a stylesheet that repeats the same offending
//! selector across several rules only reports it once. The rewrite engine never
//! prints on its own; callers forward its diagnostics here.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Record a warning key, returning `true` the first time it is seen.
fn first_sighting(key: String) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Warn about a component-level problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("search", "exclude pattern matched no rules");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if first_sighting(format!("[{component}] {message}")) {
        eprintln!(
            "{}",
            format!("[hostcss {component}] ⚠ {message}").bold().yellow()
        );
    }
}

/// Warn about a problem tied to one source selector.
///
/// The message is printed in bold with the offending selector indented on
/// the following line, once per unique `(component, message, detail)`.
pub fn warn_once_with_detail(component: &str, message: &str, detail: &str) {
    if first_sighting(format!("[{component}] {message} {detail}")) {
        eprintln!(
            "{}",
            format!("[hostcss {component}] ⚠ {message}").bold().yellow()
        );
        eprintln!("      {}", detail.yellow());
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

/// Clear all recorded warnings (call before processing a new component)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
