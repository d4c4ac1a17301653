//! Dual-stack answers (`gethostbyname4_r`).
//!
//! Buffer layout, every region pointer-aligned:
//!
//! ```text
//! | name\0 .. | IPv6 tuple (next = null) | IPv4 tuple (next = IPv6) |
//! ```
//!
//! The head handed back is the IPv4 tuple, so walking `next` yields IPv4
//! first.

use std::ffi::{CStr, c_char};
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::{self, NonNull};

use crate::abi::GaihAddrtuple;
use crate::arena::{Arena, align};
use crate::config::TTL;
use crate::error::LookupError;
use crate::family::Family;

/// Bytes needed to answer for `name`.
pub fn dual_size(name: &CStr) -> usize {
    align(name.to_bytes_with_nul().len()) + 2 * align(size_of::<GaihAddrtuple>())
}

/// A `gaih_addrtuple` chain written into a caller buffer.
#[derive(Debug)]
pub struct TupleList<'a> {
    head: NonNull<GaihAddrtuple>,
    written: usize,
    _buf: PhantomData<&'a mut [u8]>,
}

impl TupleList<'_> {
    /// First tuple of the chain, for the host's `*pat`.
    pub fn head(&self) -> *mut GaihAddrtuple {
        self.head.as_ptr()
    }

    /// Bytes of the caller buffer the chain occupies.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn ttl(&self) -> i32 {
        TTL
    }

    /// Walk the chain through its `next` links.
    pub fn iter(&self) -> impl Iterator<Item = GaihAddrtuple> + '_ {
        let mut next = self.head.as_ptr();
        std::iter::from_fn(move || {
            if next.is_null() {
                return None;
            }
            // SAFETY: every link was written by `build_dual` and points into
            // the buffer this list borrows.
            let tuple = unsafe { ptr::read_unaligned(next) };
            next = tuple.next;
            Some(tuple)
        })
    }

    /// Name shared by every tuple.
    pub fn name(&self) -> &CStr {
        // SAFETY: the head tuple's `name` points at the NUL-terminated copy
        // at the start of the borrowed buffer.
        unsafe { CStr::from_ptr(ptr::read_unaligned(self.head.as_ptr()).name) }
    }
}

/// Write the IPv6 and IPv4 loopback tuples for `name` into `buf`.
///
/// Both tuples carry `scope_id`, the loopback interface index. Nothing is
/// written when `buf` is shorter than [`dual_size`].
pub fn build_dual<'a>(
    name: &CStr,
    scope_id: u32,
    buf: &'a mut [u8],
) -> Result<TupleList<'a>, LookupError> {
    let required = dual_size(name);
    let mut arena = Arena::new(buf, required)?;

    let r_name = arena.push_cstr(name);
    let name_ptr: *mut c_char = arena.ptr(r_name);

    let v6 = arena.push_value(GaihAddrtuple {
        next: ptr::null_mut(),
        name: name_ptr,
        family: Family::V6.as_raw(),
        addr: GaihAddrtuple::address_words(Family::V6.local_octets()),
        scopeid: scope_id,
    });
    let v4 = arena.push_value(GaihAddrtuple {
        next: arena.ptr(v6),
        name: name_ptr,
        family: Family::V4.as_raw(),
        addr: GaihAddrtuple::address_words(Family::V4.local_octets()),
        scopeid: scope_id,
    });

    let head = arena.non_null::<GaihAddrtuple>(v4);
    let written = arena.finish();

    Ok(TupleList {
        head,
        written,
        _buf: PhantomData,
    })
}
