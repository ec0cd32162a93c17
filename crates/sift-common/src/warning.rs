//! Deduplicated warnings with colored terminal output.
//!
//! Lenient components never fail on odd input. When they silently accept
//! something they cannot honor (an unknown pseudo-class, say) they report it
//! here once per process instead of once per occurrence.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an accepted-but-ignored construct (prints once per unique message).
///
/// The warning is also emitted as a `tracing` event so that embedders with a
/// subscriber installed see it in their own logs.
///
/// # Example
/// ```
/// sift_common::warn_once("selector", "unsupported pseudo-class ':hover'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        tracing::warn!(component, "{message}");
        eprintln!("{}", format!("[sift {component}] ⚠ {message}").yellow());
    }
}

/// Forget every recorded warning so they can be reported again.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings recorded so far.
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}
