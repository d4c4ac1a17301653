//! dontstalkme - answer tracker lookups with a loopback address.
//!
//! Built as `libnss_dontstalkme.so`, a glibc NSS `hosts` module. Names on the
//! compiled-in blocklist resolve to `127.0.2.1` / `::1`, so tracking requests
//! never leave the machine. Every other name is reported as not found and
//! glibc moves on to the next source.
//!
//! The library also exposes the matcher and the buffer serializers for the
//! `dontstalkme` CLI, benchmarks and tests.

pub mod abi;
pub mod arena;
pub mod config;
pub mod error;
pub mod family;
pub mod filter;
pub mod ifindex;
pub mod nss;
pub mod resolver;
pub mod response;
