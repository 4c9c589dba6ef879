//! Deduplicated warnings.
//!
//! Parsers and layout report unsupported or recovered input here instead of
//! failing. Each distinct message is logged once (at `warn` level, with the
//! component as the log target) until [`clear_warnings`] is called, which the
//! browser does at the start of every load.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature or recovered error, once per unique
/// message.
///
/// Returns true if the message was new and has been logged.
///
/// # Example
/// ```ignore
/// warn_once("CSS", "skipped malformed declaration near 'color red'");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    // A poisoned lock only loses deduplication, never the warning itself.
    let is_new = match WARNED.lock() {
        Ok(mut guard) => guard.get_or_insert_with(HashSet::new).insert(key),
        Err(_) => true,
    };

    if is_new {
        log::warn!(target: component, "{message}");
    }
    is_new
}

/// Forget every recorded warning so they can be reported again.
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock() {
        if let Some(set) = guard.as_mut() {
            set.clear();
        }
    }
}
