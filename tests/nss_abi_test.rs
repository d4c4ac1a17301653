use std::ffi::{CStr, CString, c_char, c_int};
use std::mem::size_of;
use std::ptr;

use nss_dontstalkme::abi::{GaihAddrtuple, HOST_NOT_FOUND, NO_DATA, NO_RECOVERY, NssStatus};
use nss_dontstalkme::family::Family;
use nss_dontstalkme::ifindex::loopback_index;
use nss_dontstalkme::nss;
use nss_dontstalkme::response::{dual_size, hostent_size};

/// Pointer-aligned scratch space, like the malloc'd buffers glibc passes in.
fn scratch(len: usize) -> Vec<u64> {
    vec![0xAAAA_AAAA_AAAA_AAAA; len.div_ceil(size_of::<u64>())]
}

fn bytes(buf: &[u64]) -> &[u8] {
    // SAFETY: reinterpreting u64 storage as bytes.
    unsafe { std::slice::from_raw_parts(buf.as_ptr().cast::<u8>(), buf.len() * size_of::<u64>()) }
}

fn gethostbyname2(
    name: &CStr,
    af: c_int,
    host: &mut libc::hostent,
    buf: &mut [u64],
    buflen: usize,
) -> (NssStatus, c_int, c_int) {
    let mut errno = -1;
    let mut h_errno = -1;
    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname2_r(
            name.as_ptr(),
            af,
            host,
            buf.as_mut_ptr().cast::<c_char>(),
            buflen,
            &mut errno,
            &mut h_errno,
        )
    };
    (status, errno, h_errno)
}

#[test]
fn gethostbyname4_r_returns_v4_then_v6() {
    let query = CString::new("p.twitter.com").expect("query should be valid C string");
    let mut buf = scratch(512);
    let mut pat: *mut GaihAddrtuple = ptr::null_mut();
    let mut errno = -1;
    let mut h_errno = -1;
    let mut ttl = -1;

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname4_r(
            query.as_ptr(),
            &mut pat,
            buf.as_mut_ptr().cast::<c_char>(),
            512,
            &mut errno,
            &mut h_errno,
            &mut ttl,
        )
    };

    assert_eq!(status, NssStatus::Success);
    assert_eq!((errno, h_errno), (-1, -1));
    assert_eq!(ttl, 0);
    assert!(!pat.is_null());

    let first = unsafe { &*pat };
    assert_eq!(first.family, libc::AF_INET);
    assert_eq!(first.addr[0].to_ne_bytes(), [127, 0, 2, 1]);
    assert_eq!(first.scopeid, loopback_index());
    let name = unsafe { CStr::from_ptr(first.name) };
    assert_eq!(name, query.as_c_str());

    assert!(!first.next.is_null());
    let second = unsafe { &*first.next };
    assert_eq!(second.family, libc::AF_INET6);
    let mut octets = [0u8; 16];
    for (chunk, word) in octets.chunks_mut(4).zip(second.addr) {
        chunk.copy_from_slice(&word.to_ne_bytes());
    }
    assert_eq!(octets, std::net::Ipv6Addr::LOCALHOST.octets());
    assert_eq!(second.scopeid, first.scopeid);
    assert_eq!(second.name, first.name);
    assert!(second.next.is_null());
}

#[test]
fn gethostbyname4_r_unknown_host_not_found() {
    let query = CString::new("www.rust-lang.org").expect("query should be valid C string");
    let mut buf = scratch(512);
    let mut pat: *mut GaihAddrtuple = ptr::null_mut();
    let mut errno = -1;
    let mut h_errno = -1;

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname4_r(
            query.as_ptr(),
            &mut pat,
            buf.as_mut_ptr().cast::<c_char>(),
            512,
            &mut errno,
            &mut h_errno,
            ptr::null_mut(),
        )
    };

    assert_eq!(status, NssStatus::NotFound);
    assert_eq!(errno, libc::ENOENT);
    assert_eq!(h_errno, HOST_NOT_FOUND);
    assert!(pat.is_null());
}

#[test]
fn gethostbyname4_r_small_buffer_asks_for_retry() {
    let query = CString::new("p.twitter.com").expect("query should be valid C string");
    let required = dual_size(&query);
    let mut buf = scratch(required);
    let mut pat: *mut GaihAddrtuple = ptr::null_mut();
    let mut errno = -1;
    let mut h_errno = -1;

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname4_r(
            query.as_ptr(),
            &mut pat,
            buf.as_mut_ptr().cast::<c_char>(),
            required - 1,
            &mut errno,
            &mut h_errno,
            ptr::null_mut(),
        )
    };

    assert_eq!(status, NssStatus::TryAgain);
    assert_eq!(errno, libc::ENOMEM);
    assert_eq!(h_errno, NO_RECOVERY);
    assert!(pat.is_null());
    assert!(bytes(&buf).iter().all(|b| *b == 0xAA));
}

#[test]
fn gethostbyname4_r_null_buffer_asks_for_retry() {
    let query = CString::new("p.twitter.com").expect("query should be valid C string");
    let mut pat: *mut GaihAddrtuple = ptr::null_mut();
    let mut errno = -1;
    let mut h_errno = -1;

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname4_r(
            query.as_ptr(),
            &mut pat,
            ptr::null_mut(),
            0,
            &mut errno,
            &mut h_errno,
            ptr::null_mut(),
        )
    };

    assert_eq!(status, NssStatus::TryAgain);
    assert_eq!(errno, libc::ENOMEM);
}

#[test]
fn gethostbyname3_r_sets_canonical_name_and_ttl() {
    let query = CString::new("partner.googleadservices.com").expect("query should be valid C string");
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);
    let mut errno = -1;
    let mut h_errno = -1;
    let mut ttl = -1;
    let mut canon: *mut c_char = ptr::null_mut();

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname3_r(
            query.as_ptr(),
            libc::AF_INET6,
            &mut host,
            buf.as_mut_ptr().cast::<c_char>(),
            512,
            &mut errno,
            &mut h_errno,
            &mut ttl,
            &mut canon,
        )
    };

    assert_eq!(status, NssStatus::Success);
    assert_eq!(ttl, 0);
    assert_eq!(canon, host.h_name);
    assert_eq!(canon.cast::<u8>(), buf.as_mut_ptr().cast::<u8>());
    assert_eq!(host.h_addrtype, libc::AF_INET6);
    assert_eq!(host.h_length, 16);
    let addr = unsafe { std::slice::from_raw_parts((*host.h_addr_list).cast::<u8>(), 16) };
    assert_eq!(addr, std::net::Ipv6Addr::LOCALHOST.octets());
}

#[test]
fn gethostbyname2_r_populates_hostent_inside_buffer() {
    let query = CString::new("ad.doubleclick.net").expect("query should be valid C string");
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);
    let start = buf.as_ptr() as usize;
    let end = start + hostent_size(&query, Family::V4);

    let (status, errno, h_errno) = gethostbyname2(&query, libc::AF_INET, &mut host, &mut buf, 512);

    assert_eq!(status, NssStatus::Success);
    assert_eq!((errno, h_errno), (-1, -1));
    assert_eq!(host.h_addrtype, libc::AF_INET);
    assert_eq!(host.h_length, 4);

    let inside = |p: usize| p >= start && p < end;
    assert!(inside(host.h_name as usize));
    assert!(inside(host.h_aliases as usize));
    assert!(inside(host.h_addr_list as usize));
    assert!(unsafe { *host.h_aliases }.is_null());

    let first_addr_ptr = unsafe { *host.h_addr_list };
    assert!(inside(first_addr_ptr as usize));
    let octets = unsafe { std::slice::from_raw_parts(first_addr_ptr.cast::<u8>(), 4) };
    assert_eq!(octets, [127, 0, 2, 1]);
    assert!(unsafe { *host.h_addr_list.add(1) }.is_null());
    assert_eq!(unsafe { CStr::from_ptr(host.h_name) }, query.as_c_str());
}

#[test]
fn gethostbyname2_r_negotiates_buffer_size() {
    let query = CString::new("ad.doubleclick.net").expect("query should be valid C string");
    let required = hostent_size(&query, Family::V4);
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(required + 64);

    let (short, errno, h_errno) =
        gethostbyname2(&query, libc::AF_INET, &mut host, &mut buf, required - 1);
    assert_eq!(short, NssStatus::TryAgain);
    assert_eq!(errno, libc::ENOMEM);
    assert_eq!(h_errno, NO_RECOVERY);
    assert!(host.h_name.is_null());

    let (exact, _, _) = gethostbyname2(&query, libc::AF_INET, &mut host, &mut buf, required);
    assert_eq!(exact, NssStatus::Success);
    assert!(bytes(&buf)[required..].iter().all(|b| *b == 0xAA));
}

#[test]
fn gethostbyname2_r_unsupported_family() {
    let query = CString::new("google-analytics.com").expect("query should be valid C string");
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);

    let (status, errno, h_errno) = gethostbyname2(&query, 99, &mut host, &mut buf, 512);

    assert_eq!(status, NssStatus::Unavail);
    assert_eq!(errno, libc::EAFNOSUPPORT);
    assert_eq!(h_errno, NO_DATA);
}

#[test]
fn gethostbyname2_r_unknown_host_not_found() {
    let query = CString::new("unknown-host.example.org").expect("query should be valid C string");
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);

    let (status, errno, h_errno) = gethostbyname2(&query, libc::AF_INET, &mut host, &mut buf, 512);

    assert_eq!(status, NssStatus::NotFound);
    assert_eq!(errno, libc::ENOENT);
    assert_eq!(h_errno, HOST_NOT_FOUND);
    assert!(bytes(&buf).iter().all(|b| *b == 0xAA));
}

#[test]
fn gethostbyname_r_defaults_to_ipv4() {
    let query = CString::new("P.TWITTER.COM").expect("query should be valid C string");
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);
    let mut errno = -1;
    let mut h_errno = -1;

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname_r(
            query.as_ptr(),
            &mut host,
            buf.as_mut_ptr().cast::<c_char>(),
            512,
            &mut errno,
            &mut h_errno,
        )
    };

    assert_eq!(status, NssStatus::Success);
    assert_eq!(host.h_addrtype, libc::AF_INET);
    assert_eq!(host.h_length, 4);
}

#[test]
fn null_name_is_not_found() {
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);
    let mut errno = -1;
    let mut h_errno = -1;

    let status = unsafe {
        nss::_nss_dontstalkme_gethostbyname_r(
            ptr::null(),
            &mut host,
            buf.as_mut_ptr().cast::<c_char>(),
            512,
            &mut errno,
            &mut h_errno,
        )
    };

    assert_eq!(status, NssStatus::NotFound);
    assert_eq!(errno, libc::ENOENT);
}

#[test]
fn repeated_calls_write_identical_bytes() {
    let query = CString::new("www.google-analytics.com").expect("query should be valid C string");
    let mut host: libc::hostent = unsafe { std::mem::zeroed() };
    let mut buf = scratch(512);
    let required = hostent_size(&query, Family::V6);

    gethostbyname2(&query, libc::AF_INET6, &mut host, &mut buf, 512);
    let first = bytes(&buf)[..required].to_vec();
    buf.fill(0);
    gethostbyname2(&query, libc::AF_INET6, &mut host, &mut buf, 512);

    assert_eq!(bytes(&buf)[..required], first[..]);
}

#[test]
fn concurrent_lookups_do_not_interfere() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let query = CString::new(format!("host{i}.doubleclick.net"))
                    .expect("query should be valid C string");
                let mut host: libc::hostent = unsafe { std::mem::zeroed() };
                let mut buf = scratch(256);
                for _ in 0..1000 {
                    let (status, _, _) =
                        gethostbyname2(&query, libc::AF_INET, &mut host, &mut buf, 256);
                    assert_eq!(status, NssStatus::Success);
                    assert_eq!(unsafe { CStr::from_ptr(host.h_name) }, query.as_c_str());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("lookup thread panicked");
    }
}
