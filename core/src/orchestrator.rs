//! # Resolution orchestration
//!
//! Drives a whole domain list through discovery and selection.
//!
//! One task is spawned per domain, but a task only starts working once it holds
//! a permit of the concurrency limiter, so at most `max_concurrent` domains are
//! discovering or probing at any time. Tasks are independent: a failing domain
//! produces a failed [`ResolutionResult`] and nothing else. Results arrive in
//! completion order and are put back into input order before being returned.

use std::net::Ipv4Addr;
use std::sync::Arc;

use fasthosts_common::error::DiscoveryError;
use fasthosts_common::models::{Latency, ResolutionResult};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::aggregator::CandidateAggregator;
use crate::selector::BestAddressSelector;

/// Called with `(completed, total)` every time a domain finishes.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

pub struct ResolutionOrchestrator {
    aggregator: Arc<CandidateAggregator>,
    selector: Arc<BestAddressSelector>,
    max_concurrent: usize,
    on_progress: Option<ProgressCallback>,
}

impl ResolutionOrchestrator {
    pub fn new(
        aggregator: Arc<CandidateAggregator>,
        selector: Arc<BestAddressSelector>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            aggregator,
            selector,
            max_concurrent: max_concurrent.max(1),
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Resolves every domain; the output has one result per input, in input order.
    pub async fn resolve_all(&self, domains: &[String]) -> Vec<ResolutionResult> {
        let total: usize = domains.len();
        let limiter: Arc<Semaphore> = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks: JoinSet<(usize, ResolutionResult)> = JoinSet::new();

        for (index, domain) in domains.iter().cloned().enumerate() {
            let aggregator: Arc<CandidateAggregator> = Arc::clone(&self.aggregator);
            let selector: Arc<BestAddressSelector> = Arc::clone(&self.selector);
            let limiter: Arc<Semaphore> = Arc::clone(&limiter);

            tasks.spawn(async move {
                let result: ResolutionResult = match limiter.acquire_owned().await {
                    Ok(_permit) => {
                        info!("Processing {}/{total}: {domain}", index + 1);
                        resolve_domain(&aggregator, &selector, domain).await
                    }
                    Err(_closed) => ResolutionResult::failed(domain, "concurrency limiter closed"),
                };
                (index, result)
            });
        }

        let mut completed: usize = 0;
        let mut slots: Vec<Option<ResolutionResult>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("A domain task ended abnormally: {e}"),
            }
            completed += 1;
            if let Some(cb) = &self.on_progress {
                cb(completed, total);
            }
        }

        slots
            .into_iter()
            .zip(domains)
            .map(|(slot, domain)| {
                slot.unwrap_or_else(|| ResolutionResult::failed(domain.as_str(), "resolution task aborted"))
            })
            .collect()
    }
}

/// Discovering, then selecting; both exits produce the terminal result.
async fn resolve_domain(
    aggregator: &CandidateAggregator,
    selector: &BestAddressSelector,
    domain: String,
) -> ResolutionResult {
    let candidates: Vec<Ipv4Addr> = match aggregator.resolve(&domain).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("{domain}: {e}");
            return ResolutionResult::failed(domain, e);
        }
    };
    info!("{domain}: candidates {candidates:?}");

    match selector.select(&candidates).await {
        Some((ip, latency)) => {
            info!("{domain}: selected {ip} ({latency})");
            ResolutionResult::resolved(domain, ip, latency)
        }
        None => ResolutionResult::failed(domain, DiscoveryError::NoValidAddress),
    }
}

/// Resolved domains in a finished pass.
pub fn success_count(results: &[ResolutionResult]) -> usize {
    results.iter().filter(|result| result.is_success()).count()
}

/// Resolved domains whose every candidate timed out.
pub fn timed_out_count(results: &[ResolutionResult]) -> usize {
    results
        .iter()
        .filter(|result| result.latency == Some(Latency::TimedOut))
        .count()
}
