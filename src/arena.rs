//! Bump allocation inside a caller-owned buffer.
//!
//! Answers handed back to the NSS host must live entirely in the buffer the
//! host passed in: the name string, the records, and every pointer between
//! them. [`Arena`] hands out [`Slot`]s (offsets from the buffer start) and
//! only turns them into addresses when a pointer field is written, so no
//! pointer can ever refer to memory outside the buffer.

use std::ffi::CStr;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::{self, NonNull};

use crate::error::LookupError;

/// Boundary every region is rounded up to.
pub const POINTER_ALIGN: usize = size_of::<*const u8>();

/// Round `size` up to the next multiple of [`POINTER_ALIGN`].
#[inline]
pub const fn align(size: usize) -> usize {
    size.next_multiple_of(POINTER_ALIGN)
}

/// Offset of a region previously handed out by an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(usize);

impl Slot {
    pub fn offset(self) -> usize {
        self.0
    }
}

/// Writer over the first `limit` bytes of a caller buffer.
///
/// All writes go through the raw base pointer so that pointers derived from
/// it stay valid for the caller after the arena is dropped.
pub struct Arena<'a> {
    base: NonNull<u8>,
    limit: usize,
    used: usize,
    _buf: PhantomData<&'a mut [u8]>,
}

impl<'a> Arena<'a> {
    /// Claim `required` bytes of `buf`, or report that the caller must retry
    /// with a larger buffer.
    pub fn new(buf: &'a mut [u8], required: usize) -> Result<Self, LookupError> {
        if buf.len() < required {
            return Err(LookupError::BufferTooSmall {
                required,
                capacity: buf.len(),
            });
        }
        Ok(Self {
            base: NonNull::from(buf).cast::<u8>(),
            limit: required,
            used: 0,
            _buf: PhantomData,
        })
    }

    /// Zero `len` bytes at the bump offset and return their slot.
    fn reserve(&mut self, len: usize) -> Slot {
        let end = self.used + len;
        assert!(
            end <= self.limit,
            "arena overflow: {end} bytes written, {} computed",
            self.limit
        );
        let slot = Slot(self.used);
        // SAFETY: [used, end) lies within the first `limit` bytes of the
        // exclusively borrowed buffer, checked above and in `new`.
        unsafe { ptr::write_bytes(self.base.as_ptr().add(slot.0), 0, len) };
        self.used = end;
        slot
    }

    /// Copy `bytes` into a region of `len` bytes (`len >= bytes.len()`).
    pub fn push_bytes(&mut self, bytes: &[u8], len: usize) -> Slot {
        assert!(bytes.len() <= len);
        let slot = self.reserve(len);
        // SAFETY: the reserved region holds at least `bytes.len()` bytes and
        // cannot overlap `bytes`, which the arena does not own.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.base.as_ptr().add(slot.0), bytes.len());
        }
        slot
    }

    /// Copy a NUL-terminated string into an aligned region.
    pub fn push_cstr(&mut self, s: &CStr) -> Slot {
        let bytes = s.to_bytes_with_nul();
        self.push_bytes(bytes, align(bytes.len()))
    }

    /// Store a pointer to `target`, or null, in one pointer-sized slot.
    pub fn push_ptr(&mut self, target: Option<Slot>) -> Slot {
        let value: *mut u8 = match target {
            Some(target) => self.ptr(target),
            None => ptr::null_mut(),
        };
        self.push_value(value)
    }

    /// Store a pointer array terminated by a null entry.
    pub fn push_ptr_array(&mut self, targets: &[Slot]) -> Slot {
        let first = self.push_ptr(targets.first().copied());
        for target in targets.iter().skip(1) {
            self.push_ptr(Some(*target));
        }
        if !targets.is_empty() {
            self.push_ptr(None);
        }
        first
    }

    /// Store `value` in an aligned region sized for `T`.
    pub fn push_value<T: Copy>(&mut self, value: T) -> Slot {
        let slot = self.reserve(align(size_of::<T>()));
        // SAFETY: the reserved region is at least `size_of::<T>()` bytes;
        // the write tolerates a base that is not aligned for `T`.
        unsafe { ptr::write_unaligned(self.base.as_ptr().add(slot.0).cast::<T>(), value) };
        slot
    }

    /// Resolve a slot to its address inside the caller buffer.
    pub fn non_null<T>(&self, slot: Slot) -> NonNull<T> {
        assert!(slot.0 < self.used);
        // SAFETY: the slot was handed out by `reserve`, so the offset lies
        // within the buffer.
        unsafe { self.base.add(slot.0) }.cast::<T>()
    }

    pub fn ptr<T>(&self, slot: Slot) -> *mut T {
        self.non_null(slot).as_ptr()
    }

    /// Check the answer filled exactly the size computed up front.
    pub fn finish(self) -> usize {
        assert_eq!(
            self.used, self.limit,
            "answer size mismatch: wrote {} bytes, computed {}",
            self.used, self.limit
        );
        self.used
    }
}
