//! # Resolution models
//!
//! A pass produces exactly one [`ResolutionResult`] per input domain. Results are
//! immutable once built and are consumed by the hosts renderer.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Written in place of an address when a domain could not be resolved.
pub const NOT_FOUND_MARKER: &str = "# IP Address Not Found";

/// Round trip time of one address.
///
/// `TimedOut` is the worst-case sentinel for addresses that never answered: it
/// orders after every measured value, so such an address only wins when no
/// candidate answered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Latency {
    Measured(Duration),
    TimedOut,
}

impl Latency {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Latency::TimedOut)
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Latency::Measured(rtt) => write!(f, "{:.2} ms", rtt.as_secs_f64() * 1000.0),
            Latency::TimedOut => f.write_str("timeout"),
        }
    }
}

impl Serialize for Latency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Latency::Measured(rtt) => serializer.serialize_f64(rtt.as_secs_f64() * 1000.0),
            Latency::TimedOut => serializer.serialize_str("timeout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub domain: String,
    /// `None` when discovery failed; otherwise a probed, non-denylisted address.
    pub ip: Option<Ipv4Addr>,
    pub latency: Option<Latency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolutionResult {
    pub fn resolved(domain: impl Into<String>, ip: Ipv4Addr, latency: Latency) -> Self {
        Self {
            domain: domain.into(),
            ip: Some(ip),
            latency: Some(latency),
            error: None,
        }
    }

    pub fn failed(domain: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            domain: domain.into(),
            ip: None,
            latency: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.ip.is_some()
    }

    pub fn is_timed_out(&self) -> bool {
        self.latency.is_some_and(|latency| latency.is_timed_out())
    }

    /// The address column of a hosts line.
    pub fn address_field(&self) -> String {
        match self.ip {
            Some(ip) => ip.to_string(),
            None => NOT_FOUND_MARKER.to_string(),
        }
    }
}
