use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use fasthosts_common::config::Config;
use regex::Regex;
use tracing::debug;

use super::AddressSource;

static HIDDEN_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->")
        .expect("hidden block pattern is valid")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));
static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("dotted quad pattern is valid")
});

/// Scrapes a third-party "IP lookup" page for a domain.
///
/// Every dotted-quad looking token of the page text is returned as is.
pub struct WebSource {
    client: reqwest::Client,
    url_template: String,
}

impl WebSource {
    pub fn new(url_template: impl Into<String>, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client: reqwest::Client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Self::new(cfg.lookup_url.clone(), &cfg.user_agent, cfg.http_timeout)
    }

    pub fn lookup_url(&self, domain: &str) -> String {
        self.url_template.replace("{domain}", domain)
    }

    async fn fetch(&self, domain: &str) -> anyhow::Result<Vec<String>> {
        let url: String = self.lookup_url(domain);
        let response: reqwest::Response = self.client.get(&url).send().await?;
        debug!(domain, %url, status = %response.status(), "lookup page fetched");

        let body: String = response.text().await.context("reading lookup page")?;
        Ok(extract_ipv4_tokens(&visible_text(&body)))
    }
}

#[async_trait]
impl AddressSource for WebSource {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn lookup(&self, domain: &str) -> Vec<String> {
        match self.fetch(domain).await {
            Ok(tokens) => {
                debug!(domain, ?tokens, "web lookup finished");
                tokens
            }
            Err(e) => {
                debug!(domain, "web lookup failed: {e:#}");
                Vec::new()
            }
        }
    }
}

/// Text a browser would render: markup, scripts, styles and comments removed.
pub fn visible_text(html: &str) -> String {
    let without_hidden = HIDDEN_BLOCK.replace_all(html, " ");
    TAG.replace_all(&without_hidden, " ").into_owned()
}

/// Every `a.b.c.d` token with one to three digits per part, in page order.
pub fn extract_ipv4_tokens(text: &str) -> Vec<String> {
    DOTTED_QUAD
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
