//! # Fastest-address hosts generation
//!
//! For every domain of a list, find the address with the lowest latency and
//! render the choices as a hosts file.
//!
//! ## Pipeline
//! * **[`sources`]**: candidate discovery from public DNS resolvers and a lookup page.
//! * **[`aggregator`]**: merges, de-duplicates and filters candidates per domain.
//! * **[`probe`]**: ICMP latency measurement with a per-process cache.
//! * **[`selector`]**: picks the fastest candidate with a reproducible tie-break.
//! * **[`orchestrator`]**: bounded-concurrency fan-out over the domain list.
//! * **[`hosts`]**: rendering and persisting the mapping.
//! * **[`detector`]**: the service tying it all together for a [`Config`](fasthosts_common::config::Config).

pub mod aggregator;
pub mod detector;
pub mod hosts;
pub mod orchestrator;
pub mod probe;
pub mod selector;
pub mod sources;

pub use detector::{HostsDetector, PassReport};
