//! C layouts shared with the NSS host (`<nss.h>`, `<netdb.h>`).

use std::ffi::{c_char, c_int};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// `h_errno` values from `<netdb.h>`.
pub const HOST_NOT_FOUND: c_int = 1;
pub const NO_RECOVERY: c_int = 3;
pub const NO_DATA: c_int = 4;

/// `enum nss_status`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NssStatus {
    TryAgain = -2,
    Unavail = -1,
    NotFound = 0,
    Success = 1,
    Return = 2,
}

/// `struct gaih_addrtuple`, the node type of a `gethostbyname4_r` answer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GaihAddrtuple {
    pub next: *mut GaihAddrtuple,
    pub name: *mut c_char,
    pub family: c_int,
    pub addr: [u32; 4],
    pub scopeid: u32,
}

impl GaihAddrtuple {
    /// Pack raw address octets the way glibc lays them out in `addr`.
    pub fn address_words(octets: &[u8]) -> [u32; 4] {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(octets.chunks(4)) {
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            *word = u32::from_ne_bytes(bytes);
        }
        words
    }

    /// Decode `addr` according to `family`.
    pub fn address(&self) -> Option<IpAddr> {
        match self.family {
            libc::AF_INET => Some(IpAddr::V4(Ipv4Addr::from(self.addr[0].to_ne_bytes()))),
            libc::AF_INET6 => {
                let mut octets = [0u8; 16];
                for (chunk, word) in octets.chunks_mut(4).zip(self.addr) {
                    chunk.copy_from_slice(&word.to_ne_bytes());
                }
                Some(IpAddr::V6(Ipv6Addr::from(octets)))
            }
            _ => None,
        }
    }
}
