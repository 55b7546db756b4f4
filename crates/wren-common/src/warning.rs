//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer, parser and matcher to report recovered errors and
//! unsupported constructs without failing the caller.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// A poisoned lock only means another thread panicked while printing; the
/// set itself is still usable.
fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Warn about a recovered error or unsupported feature (prints once per
/// unique message).
///
/// # Example
/// ```
/// use wren_common::warning::warn_once;
///
/// warn_once("CSS", "pseudo-element '::before' never matches");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = warned().get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{}", format!("[Wren {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if the given warning has been reported since the last
/// [`clear_warnings`].
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    warned().as_ref().is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when loading a new stylesheet set)
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        let message = "duplicate-detection-probe";
        assert!(!was_warned("test", message));
        warn_once("test", message);
        warn_once("test", message);
        assert!(was_warned("test", message));
    }

    #[test]
    fn test_distinct_components_are_distinct_keys() {
        warn_once("alpha", "component-key-probe");
        assert!(was_warned("alpha", "component-key-probe"));
        assert!(!was_warned("beta", "component-key-probe"));
    }
}
