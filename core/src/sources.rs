//! Candidate address discovery.
//!
//! Every source answers with a possibly empty list of address strings and never
//! fails: transient network problems degrade to "nothing from this source".
//! Validation is left to the [`crate::aggregator`].

use async_trait::async_trait;

mod dns;
mod web;

pub use dns::DnsSource;
pub use web::{WebSource, extract_ipv4_tokens, visible_text};

#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    async fn lookup(&self, domain: &str) -> Vec<String>;
}
