//! Network interface index lookup.

use std::ffi::CStr;

use log::debug;

use crate::config::LOOPBACK_INTERFACE;

/// Index of `name`, or 0 when the interface does not exist.
pub fn interface_index(name: &CStr) -> u32 {
    // SAFETY: `name` is a valid NUL-terminated string for the whole call.
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    if index == 0 {
        debug!("no interface {name:?}, tagging answers with index 0");
    }
    index
}

/// Index of the loopback interface answers are tagged with.
pub fn loopback_index() -> u32 {
    interface_index(LOOPBACK_INTERFACE)
}
