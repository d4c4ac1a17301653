//! Address family selection for single-family answers.

use std::ffi::c_int;
use std::net::IpAddr;

use crate::config::{LOCAL_ADDRESS_V4, LOCAL_ADDRESS_V6};
use crate::error::LookupError;

static LOCAL_OCTETS_V4: [u8; 4] = LOCAL_ADDRESS_V4.octets();
static LOCAL_OCTETS_V6: [u8; 16] = LOCAL_ADDRESS_V6.octets();

/// An address family we can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Normalize a host-supplied `AF_*` value. `AF_UNSPEC` means IPv4.
    pub fn from_raw(af: c_int) -> Result<Self, LookupError> {
        match af {
            libc::AF_UNSPEC | libc::AF_INET => Ok(Family::V4),
            libc::AF_INET6 => Ok(Family::V6),
            other => Err(LookupError::UnsupportedFamily(other)),
        }
    }

    pub fn as_raw(self) -> c_int {
        match self {
            Family::V4 => libc::AF_INET,
            Family::V6 => libc::AF_INET6,
        }
    }

    /// Length in bytes of one raw address.
    pub fn address_len(self) -> usize {
        self.local_octets().len()
    }

    /// The synthesized address in network byte order.
    pub fn local_octets(self) -> &'static [u8] {
        match self {
            Family::V4 => &LOCAL_OCTETS_V4,
            Family::V6 => &LOCAL_OCTETS_V6,
        }
    }

    pub fn local_address(self) -> IpAddr {
        match self {
            Family::V4 => IpAddr::V4(LOCAL_ADDRESS_V4),
            Family::V6 => IpAddr::V6(LOCAL_ADDRESS_V6),
        }
    }
}
