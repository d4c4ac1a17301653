//! Tracker name matching.
//!
//! Decides whether a queried host name is a known tracking endpoint by
//! checking it against the blocklist compiled into the module.

mod blocklist;

pub use blocklist::{Blocklist, Pattern, match_pattern};

static STALKERS: Blocklist = Blocklist::new();

/// The compiled-in blocklist.
pub fn stalkers() -> &'static Blocklist {
    &STALKERS
}

/// Check `name` against the compiled-in blocklist.
pub fn is_blacklisted(name: impl AsRef<[u8]>) -> bool {
    STALKERS.is_blocked(name)
}
