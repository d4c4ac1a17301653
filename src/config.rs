//! Build-time settings for synthesized answers.

use std::ffi::CStr;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Interface whose index tags every dual-stack answer.
pub const LOOPBACK_INTERFACE: &CStr = c"lo";

/// IPv4 answer. Deliberately not `127.0.0.1` so synthesized answers stand out.
pub const LOCAL_ADDRESS_V4: Ipv4Addr = Ipv4Addr::new(127, 0, 2, 1);

/// IPv6 answer.
pub const LOCAL_ADDRESS_V6: Ipv6Addr = Ipv6Addr::LOCALHOST;

/// Time-to-live reported to hosts that ask for one.
pub const TTL: i32 = 0;
