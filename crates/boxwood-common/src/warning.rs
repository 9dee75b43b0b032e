//! Deduplicated warnings for unsupported or malformed input.
//!
//! Malformed property values never fail layout; they are reported here once
//! and the property keeps its previous value. Messages go through the `log`
//! facade so the embedding application decides where they end up.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already reported (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report an unsupported feature or rejected value (once per unique message).
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// message was already reported.
///
/// # Example
/// ```
/// use boxwood_common::warning::warn_once;
///
/// assert!(warn_once("style", "unknown property 'colr'"));
/// assert!(!warn_once("style", "unknown property 'colr'"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first {
        log::warn!(target: "boxwood", "[{component}] {message}");
    }
    first
}

/// Forget all recorded warnings (call before laying out a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates_per_component() {
        assert!(warn_once("test-a", "same message"));
        assert!(!warn_once("test-a", "same message"));
        assert!(warn_once("test-b", "same message"));
    }
}
