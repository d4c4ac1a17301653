//! Single-family answers (`gethostbyname{3,2,}_r`).
//!
//! Buffer layout:
//!
//! ```text
//! | name\0 .. | aliases: [null] | address .. | addr_list: [&address, null] |
//! ```

use std::ffi::{CStr, c_char, c_int};
use std::marker::PhantomData;
use std::mem::size_of;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ptr;
use std::slice;

use crate::arena::{Arena, align};
use crate::config::TTL;
use crate::error::LookupError;
use crate::family::Family;

const PTR_SIZE: usize = size_of::<*mut c_char>();

/// Bytes needed to answer for `name` in `family`.
pub fn hostent_size(name: &CStr, family: Family) -> usize {
    align(name.to_bytes_with_nul().len())
        + PTR_SIZE
        + align(family.address_len())
        + 2 * PTR_SIZE
}

/// A `hostent` whose strings and arrays live in a caller buffer.
pub struct HostRecord<'a> {
    hostent: libc::hostent,
    written: usize,
    _buf: PhantomData<&'a mut [u8]>,
}

impl HostRecord<'_> {
    /// The filled-in structure, ready to copy into the host's `*host`.
    pub fn hostent(&self) -> libc::hostent {
        self.hostent
    }

    /// Pointer for the host's `*canonp`: the name stored in the buffer.
    pub fn canonical_name(&self) -> *mut c_char {
        self.hostent.h_name
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn ttl(&self) -> i32 {
        TTL
    }

    pub fn family(&self) -> c_int {
        self.hostent.h_addrtype
    }

    pub fn name(&self) -> &CStr {
        // SAFETY: h_name points at the NUL-terminated copy at the start of
        // the borrowed buffer.
        unsafe { CStr::from_ptr(self.hostent.h_name) }
    }

    pub fn alias_count(&self) -> usize {
        let aliases = self.hostent.h_aliases;
        (0..)
            .take_while(|&i| {
                // SAFETY: h_aliases is a null-terminated array inside the buffer.
                let alias = unsafe { ptr::read_unaligned(aliases.add(i)) };
                !alias.is_null()
            })
            .count()
    }

    /// Decode every entry of `h_addr_list`.
    pub fn addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        let list = self.hostent.h_addr_list;
        let len = self.hostent.h_length as usize;
        (0..).map_while(move |i| {
            // SAFETY: h_addr_list is a null-terminated array inside the buffer.
            let entry = unsafe { ptr::read_unaligned(list.add(i)) };
            if entry.is_null() {
                return None;
            }
            // SAFETY: each entry points at `h_length` address bytes.
            let octets = unsafe { slice::from_raw_parts(entry.cast::<u8>(), len) };
            ip_from_octets(octets)
        })
    }
}

fn ip_from_octets(octets: &[u8]) -> Option<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        return Some(IpAddr::V4(Ipv4Addr::from(v4)));
    }
    if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        return Some(IpAddr::V6(Ipv6Addr::from(v6)));
    }
    None
}

/// Write a `hostent` answering `name` with the loopback address of `family`.
///
/// Nothing is written when `buf` is shorter than [`hostent_size`].
pub fn build_single<'a>(
    name: &CStr,
    family: Family,
    buf: &'a mut [u8],
) -> Result<HostRecord<'a>, LookupError> {
    let alen = family.address_len();
    let required = hostent_size(name, family);
    let mut arena = Arena::new(buf, required)?;

    let r_name = arena.push_cstr(name);
    let r_aliases = arena.push_ptr(None);
    let r_addr = arena.push_bytes(family.local_octets(), align(alen));
    let r_addr_list = arena.push_ptr_array(&[r_addr]);

    let hostent = libc::hostent {
        h_name: arena.ptr(r_name),
        h_aliases: arena.ptr(r_aliases),
        h_addrtype: family.as_raw(),
        h_length: alen as c_int,
        h_addr_list: arena.ptr(r_addr_list),
    };
    let written = arena.finish();

    Ok(HostRecord {
        hostent,
        written,
        _buf: PhantomData,
    })
}
