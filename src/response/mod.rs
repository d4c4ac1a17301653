//! Serialization of synthesized answers into caller buffers.
//!
//! Two shapes exist: the dual-stack `gaih_addrtuple` chain used by
//! `gethostbyname4_r`, and the single-family `hostent` used by the older
//! entry points. Both compute their exact size first and refuse to write
//! anything when the buffer is too small.

pub mod dual;
pub mod hostent;

pub use dual::{TupleList, build_dual, dual_size};
pub use hostent::{HostRecord, build_single, hostent_size};
