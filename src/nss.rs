//! NSS `hosts` entry points exported from `libnss_dontstalkme.so`.
//!
//! glibc looks these up by name once `dontstalkme` is listed on the `hosts:`
//! line of `/etc/nsswitch.conf`. Each symbol turns the raw arguments into a
//! borrowed buffer and a `CStr`, asks the [`Resolver`], and reports the
//! outcome through `enum nss_status` plus `*errnop`/`*h_errnop`.

#![allow(clippy::missing_safety_doc)]
#![allow(clippy::too_many_arguments)]

use std::ffi::{CStr, c_char, c_int};
use std::slice;

use crate::abi::{GaihAddrtuple, NssStatus};
use crate::error::LookupError;
use crate::filter::Blocklist;
use crate::resolver::Resolver;

static RESOLVER: Resolver = Resolver::new(Blocklist::new());

unsafe fn opt_cstr<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: caller-provided C string pointer.
    Some(unsafe { CStr::from_ptr(ptr) })
}

/// View the host's scratch buffer as a byte slice; null means no capacity.
unsafe fn caller_buffer<'a>(buffer: *mut c_char, buflen: usize) -> &'a mut [u8] {
    if buffer.is_null() || buflen == 0 {
        return &mut [];
    }
    // SAFETY: the host guarantees `buffer` is writable for `buflen` bytes
    // and not aliased for the duration of the call.
    unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), buflen) }
}

#[inline]
unsafe fn set_out<T>(out: *mut T, value: T) {
    if !out.is_null() {
        // SAFETY: caller-provided out-parameter pointer.
        unsafe { *out = value };
    }
}

unsafe fn report(err: LookupError, errnop: *mut c_int, h_errnop: *mut c_int) -> NssStatus {
    // SAFETY: optional out-parameters from the host.
    unsafe {
        set_out(errnop, err.errno());
        set_out(h_errnop, err.h_errno());
    }
    err.status()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_dontstalkme_gethostbyname4_r(
    name: *const c_char,
    pat: *mut *mut GaihAddrtuple,
    buffer: *mut c_char,
    buflen: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
    ttlp: *mut i32,
) -> NssStatus {
    // SAFETY: pointer arguments follow the NSS gethostbyname4_r contract.
    unsafe {
        let Some(name) = opt_cstr(name) else {
            return report(LookupError::NotFound, errnop, h_errnop);
        };
        let buf = caller_buffer(buffer, buflen);

        match RESOLVER.resolve_dual(name, buf) {
            Ok(list) => {
                set_out(pat, list.head());
                set_out(ttlp, list.ttl());
                NssStatus::Success
            }
            Err(err) => report(err, errnop, h_errnop),
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_dontstalkme_gethostbyname3_r(
    name: *const c_char,
    af: c_int,
    host: *mut libc::hostent,
    buffer: *mut c_char,
    buflen: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
    ttlp: *mut i32,
    canonp: *mut *mut c_char,
) -> NssStatus {
    // SAFETY: pointer arguments follow the NSS gethostbyname3_r contract.
    unsafe {
        let Some(name) = opt_cstr(name) else {
            return report(LookupError::NotFound, errnop, h_errnop);
        };
        let buf = caller_buffer(buffer, buflen);

        let resolution = if canonp.is_null() {
            RESOLVER
                .resolve_family(name, af, buf)
                .map(|record| (record, None))
        } else {
            RESOLVER
                .resolve_family_canon(name, af, buf)
                .map(|resolution| (resolution.record, resolution.canonical))
        };

        match resolution {
            Ok((record, canonical)) => {
                set_out(host, record.hostent());
                set_out(ttlp, record.ttl());
                if let Some(canonical) = canonical {
                    set_out(canonp, canonical);
                }
                NssStatus::Success
            }
            Err(err) => report(err, errnop, h_errnop),
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_dontstalkme_gethostbyname2_r(
    name: *const c_char,
    af: c_int,
    host: *mut libc::hostent,
    buffer: *mut c_char,
    buflen: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
) -> NssStatus {
    // SAFETY: same contract as gethostbyname3_r without the optional outputs.
    unsafe {
        _nss_dontstalkme_gethostbyname3_r(
            name,
            af,
            host,
            buffer,
            buflen,
            errnop,
            h_errnop,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_dontstalkme_gethostbyname_r(
    name: *const c_char,
    host: *mut libc::hostent,
    buffer: *mut c_char,
    buflen: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
) -> NssStatus {
    // SAFETY: same contract as gethostbyname3_r without the optional outputs.
    unsafe {
        _nss_dontstalkme_gethostbyname3_r(
            name,
            libc::AF_UNSPEC,
            host,
            buffer,
            buflen,
            errnop,
            h_errnop,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    }
}
