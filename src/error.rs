//! Lookup failures and their host-facing status codes.

use std::ffi::c_int;

use thiserror::Error;

use crate::abi::{HOST_NOT_FOUND, NO_DATA, NO_RECOVERY, NssStatus};

/// Why a lookup produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Name is not on the blocklist; the host should ask the next source.
    #[error("host not found")]
    NotFound,
    /// The caller's buffer cannot hold the answer; retry with a larger one.
    #[error("buffer too small: need {required} bytes, got {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },
    /// Requested family is neither IPv4 nor IPv6.
    #[error("address family {0} not supported")]
    UnsupportedFamily(c_int),
}

impl LookupError {
    pub fn status(&self) -> NssStatus {
        match self {
            LookupError::NotFound => NssStatus::NotFound,
            LookupError::BufferTooSmall { .. } => NssStatus::TryAgain,
            LookupError::UnsupportedFamily(_) => NssStatus::Unavail,
        }
    }

    /// Value for the host's `*errnop`.
    pub fn errno(&self) -> c_int {
        match self {
            LookupError::NotFound => libc::ENOENT,
            LookupError::BufferTooSmall { .. } => libc::ENOMEM,
            LookupError::UnsupportedFamily(_) => libc::EAFNOSUPPORT,
        }
    }

    /// Value for the host's `*h_errnop`.
    pub fn h_errno(&self) -> c_int {
        match self {
            LookupError::NotFound => HOST_NOT_FOUND,
            LookupError::BufferTooSmall { .. } => NO_RECOVERY,
            LookupError::UnsupportedFamily(_) => NO_DATA,
        }
    }
}
