//! Callsign → user id resolution.

use tracing::debug;

use crate::ranking::Population;

/// A source that may know the user id behind a callsign.
pub trait CallsignDirectory {
    fn user_id_for(&self, callsign: &str) -> Option<String>;
}

impl CallsignDirectory for Population {
    fn user_id_for(&self, callsign: &str) -> Option<String> {
        let wanted = callsign.trim();
        self.entries()
            .iter()
            .find(|entry| {
                entry
                    .callsign()
                    .is_some_and(|known| known.trim().eq_ignore_ascii_case(wanted))
            })
            .and_then(|entry| entry.user_id())
    }
}

/// Asks each directory in turn and returns the first id found.
///
/// Callers put the live lookup service first and the cached honor rolls
/// after it, so participants the service does not know are still found.
pub fn resolve_user_id(callsign: &str, directories: &[&dyn CallsignDirectory]) -> Option<String> {
    let found = directories
        .iter()
        .find_map(|directory| directory.user_id_for(callsign));
    if found.is_none() {
        debug!(callsign, "no directory knows this callsign");
    }
    found
}
