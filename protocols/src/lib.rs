//! Wire codecs used by the address sources and the latency probe.
//!
//! Packet construction and parsing only; sockets live in `fasthosts-core`.

pub mod dns;
pub mod icmp;
