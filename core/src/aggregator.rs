//! # Candidate aggregation
//!
//! Runs the DNS and web sources side by side for one domain and turns their raw
//! output into a clean candidate list: merged, de-duplicated, denylist-filtered,
//! syntactically valid IPv4 only, ordered by textual form.

use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;

use fasthosts_common::error::DiscoveryError;
use tracing::debug;

use crate::sources::AddressSource;

pub struct CandidateAggregator {
    dns: Arc<dyn AddressSource>,
    web: Arc<dyn AddressSource>,
    denylist: HashSet<Ipv4Addr>,
}

impl CandidateAggregator {
    pub fn new(
        dns: Arc<dyn AddressSource>,
        web: Arc<dyn AddressSource>,
        denylist: impl IntoIterator<Item = Ipv4Addr>,
    ) -> Self {
        Self {
            dns,
            web,
            denylist: denylist.into_iter().collect(),
        }
    }

    /// Candidates for `domain`. An empty result after filtering is the only
    /// failure of discovery.
    pub async fn resolve(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DiscoveryError> {
        let (dns_tokens, web_tokens) = tokio::join!(self.dns.lookup(domain), self.web.lookup(domain));
        debug!(
            domain,
            dns = dns_tokens.len(),
            web = web_tokens.len(),
            "{} and {} sources finished",
            self.dns.name(),
            self.web.name()
        );

        let candidates: Vec<Ipv4Addr> = self.filter(dns_tokens.into_iter().chain(web_tokens));
        if candidates.is_empty() {
            return Err(DiscoveryError::NoValidAddress);
        }
        Ok(candidates)
    }

    /// Keeps valid, non-denylisted addresses once each, sorted lexicographically.
    pub fn filter(&self, tokens: impl IntoIterator<Item = String>) -> Vec<Ipv4Addr> {
        tokens
            .into_iter()
            .filter_map(|token| token.trim().parse::<Ipv4Addr>().ok())
            .filter(|ip| !self.denylist.contains(ip))
            .map(|ip| (ip.to_string(), ip))
            .collect::<BTreeMap<String, Ipv4Addr>>()
            .into_values()
            .collect()
    }
}
