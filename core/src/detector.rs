//! # Hosts detection service
//!
//! Wires the pipeline together for one configuration and runs full passes:
//! read the domain list, resolve everything, render, persist.
//!
//! A detector owns one [`LatencyCache`]; keeping the detector alive across
//! passes (watch mode) keeps the measured latencies too.

use std::sync::Arc;

use fasthosts_common::config::Config;
use fasthosts_common::domains;
use fasthosts_common::error::DomainListError;
use fasthosts_common::models::ResolutionResult;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::CandidateAggregator;
use crate::hosts;
use crate::orchestrator::{self, ProgressCallback, ResolutionOrchestrator};
use crate::probe::{IcmpPinger, LatencyCache, LatencyProbe, Pinger};
use crate::selector::BestAddressSelector;
use crate::sources::{AddressSource, DnsSource, WebSource};

/// Outcome of [`HostsDetector::detect_and_save`].
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub content: String,
    pub results: Vec<ResolutionResult>,
    pub updated_at: String,
    pub total: usize,
    pub success: usize,
    /// Resolved domains whose every candidate timed out; counted in `success`.
    pub timed_out: usize,
    /// Set when the rendered mapping could not be written; the report itself is still valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}

impl PassReport {
    pub fn failed(&self) -> usize {
        self.total - self.success
    }
}

pub struct HostsDetector {
    config: Config,
    orchestrator: ResolutionOrchestrator,
    cache: LatencyCache,
}

impl HostsDetector {
    /// Detector backed by the real network: public resolvers, the lookup page and ICMP echo.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let dns: Arc<dyn AddressSource> = Arc::new(DnsSource::from_config(&config));
        let web: Arc<dyn AddressSource> = Arc::new(WebSource::from_config(&config)?);
        let pinger: Arc<dyn Pinger> = Arc::new(IcmpPinger::new(config.ping_count, config.ping_timeout));
        Ok(Self::with_components(config, dns, web, pinger))
    }

    pub fn with_components(
        config: Config,
        dns: Arc<dyn AddressSource>,
        web: Arc<dyn AddressSource>,
        pinger: Arc<dyn Pinger>,
    ) -> Self {
        let cache: LatencyCache = LatencyCache::new();
        let aggregator = CandidateAggregator::new(dns, web, config.denylist.iter().copied());
        let probe = LatencyProbe::new(pinger, cache.clone());
        let selector = BestAddressSelector::new(Arc::new(probe));
        let orchestrator =
            ResolutionOrchestrator::new(Arc::new(aggregator), Arc::new(selector), config.max_concurrent);

        Self {
            config,
            orchestrator,
            cache,
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.orchestrator = self.orchestrator.with_progress(on_progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &LatencyCache {
        &self.cache
    }

    pub fn load_domains(&self) -> Result<Vec<String>, DomainListError> {
        domains::read_domain_file(&self.config.domain_file)
    }

    /// Resolves `domains`; output order equals input order.
    pub async fn resolve_all(&self, domains: &[String]) -> Vec<ResolutionResult> {
        self.orchestrator.resolve_all(domains).await
    }

    /// Loads the domain list and resolves it. Input problems abort before any network traffic.
    pub async fn detect_hosts(&self) -> Result<Vec<ResolutionResult>, DomainListError> {
        let domains: Vec<String> = self.load_domains()?;
        info!(
            "Loaded {} domains from {}, resolving {} at a time",
            domains.len(),
            self.config.domain_file.display(),
            self.orchestrator.max_concurrent()
        );
        Ok(self.resolve_all(&domains).await)
    }

    pub fn render(&self, results: &[ResolutionResult], generated_at: &str) -> String {
        hosts::render(results, generated_at, &self.config.project_url)
    }

    /// Runs a full pass and writes the hosts file.
    ///
    /// A write failure is reported through [`PassReport::save_error`] and never
    /// discards the resolved results.
    pub async fn detect_and_save(&self) -> Result<PassReport, DomainListError> {
        let results: Vec<ResolutionResult> = self.detect_hosts().await?;
        let updated_at: String = hosts::timestamp();
        let content: String = self.render(&results, &updated_at);

        let save_error: Option<String> = match hosts::persist(&self.config.output_file, &content) {
            Ok(()) => {
                info!("Hosts written to {}", self.config.output_file.display());
                None
            }
            Err(e) => {
                warn!("{e}");
                Some(e.to_string())
            }
        };

        let success: usize = orchestrator::success_count(&results);
        let timed_out: usize = orchestrator::timed_out_count(&results);
        info!("Resolved {success}/{} domains ({timed_out} unreachable)", results.len());

        Ok(PassReport {
            content,
            total: results.len(),
            success,
            timed_out,
            results,
            updated_at,
            save_error,
        })
    }
}
