//! Lookup dispatch.
//!
//! Every host entry point ends up here:
//! 1. Normalize the requested address family
//! 2. Check the name against the blocklist
//! 3. Serialize the loopback answer into the caller's buffer
//!
//! The NSS symbols handle pointer marshalling, the resolver handles decisions.

use std::ffi::{CStr, c_char, c_int};

use log::{debug, trace};

use crate::error::LookupError;
use crate::family::Family;
use crate::filter::Blocklist;
use crate::ifindex::loopback_index;
use crate::response::{HostRecord, TupleList, build_dual, build_single};

/// Single-family answer plus the optional canonical name output.
pub struct Resolution<'a> {
    pub record: HostRecord<'a>,
    /// Set only when the caller asked for the canonical name.
    pub canonical: Option<*mut c_char>,
}

/// Resolver decides which names get a synthesized answer.
///
/// Holds nothing but a read-only blocklist, so one instance can serve any
/// number of threads at once.
pub struct Resolver {
    blocklist: Blocklist,
}

impl Resolver {
    /// Create a new resolver with the given blocklist.
    pub const fn new(blocklist: Blocklist) -> Self {
        Self { blocklist }
    }

    fn check(&self, name: &CStr) -> Result<(), LookupError> {
        if self.blocklist.is_blocked(name.to_bytes()) {
            debug!("answering {name:?} locally");
            Ok(())
        } else {
            trace!("{name:?} not blocked");
            Err(LookupError::NotFound)
        }
    }

    /// Dual-stack lookup: an IPv4 and an IPv6 tuple in one answer.
    pub fn resolve_dual<'a>(
        &self,
        name: &CStr,
        buf: &'a mut [u8],
    ) -> Result<TupleList<'a>, LookupError> {
        let scope_id = loopback_index();
        self.check(name)?;
        build_dual(name, scope_id, buf)
    }

    /// Single-family lookup that also reports the canonical name.
    pub fn resolve_family_canon<'a>(
        &self,
        name: &CStr,
        af: c_int,
        buf: &'a mut [u8],
    ) -> Result<Resolution<'a>, LookupError> {
        self.dispatch_single(name, af, buf, true)
    }

    /// Single-family lookup.
    pub fn resolve_family<'a>(
        &self,
        name: &CStr,
        af: c_int,
        buf: &'a mut [u8],
    ) -> Result<HostRecord<'a>, LookupError> {
        self.dispatch_single(name, af, buf, false)
            .map(|resolution| resolution.record)
    }

    /// Lookup without a family; answers with IPv4.
    pub fn resolve_default<'a>(
        &self,
        name: &CStr,
        buf: &'a mut [u8],
    ) -> Result<HostRecord<'a>, LookupError> {
        self.resolve_family(name, libc::AF_UNSPEC, buf)
    }

    fn dispatch_single<'a>(
        &self,
        name: &CStr,
        af: c_int,
        buf: &'a mut [u8],
        want_canonical: bool,
    ) -> Result<Resolution<'a>, LookupError> {
        let family = Family::from_raw(af)?;
        self.check(name)?;
        let record = build_single(name, family, buf)?;
        let canonical = want_canonical.then(|| record.canonical_name());
        Ok(Resolution { record, canonical })
    }

    /// Returns the number of patterns in the blocklist.
    pub fn blocked_count(&self) -> usize {
        self.blocklist.len()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Blocklist::new())
    }
}
