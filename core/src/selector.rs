//! Picks the lowest-latency candidate.
//!
//! Candidates are probed one after another; the probe cache already removes
//! repeated work. Ties keep the first candidate in lexicographic order, so the
//! choice is reproducible between runs.

use std::net::Ipv4Addr;
use std::sync::Arc;

use fasthosts_common::models::Latency;
use tracing::debug;

use crate::probe::LatencyProbe;

pub struct BestAddressSelector {
    probe: Arc<LatencyProbe>,
}

impl BestAddressSelector {
    pub fn new(probe: Arc<LatencyProbe>) -> Self {
        Self { probe }
    }

    /// `None` only for an empty candidate list.
    pub async fn select(&self, candidates: &[Ipv4Addr]) -> Option<(Ipv4Addr, Latency)> {
        let mut ordered: Vec<Ipv4Addr> = candidates.to_vec();
        ordered.sort_by_cached_key(Ipv4Addr::to_string);

        let mut best: Option<(Ipv4Addr, Latency)> = None;
        for ip in ordered {
            let latency: Latency = self.probe.measure(ip).await;
            debug!(%ip, %latency, "candidate measured");
            if best.is_none_or(|(_, current)| latency < current) {
                best = Some((ip, latency));
            }
        }
        best
    }
}
