use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fasthosts_core::probe::Pinger;
use fasthosts_core::sources::AddressSource;

/// Counts calls that are currently running and remembers the highest count seen.
///
/// One gauge can be shared by several doubles to observe a whole pipeline stage.
#[derive(Default)]
pub struct ActivityGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ActivityGauge {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) -> ActiveCall<'_> {
        let now: usize = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ActiveCall(self)
    }
}

struct ActiveCall<'a>(&'a ActivityGauge);

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Answers from a fixed table, optionally after a per-domain delay.
#[derive(Default)]
pub struct TableSource {
    answers: HashMap<String, Vec<String>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    activity: Arc<ActivityGauge>,
    calls: AtomicUsize,
}

impl TableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, domain: &str, ips: &[&str]) -> Self {
        self.answers
            .insert(domain.to_string(), ips.iter().map(|ip| ip.to_string()).collect());
        self
    }

    pub fn delay(mut self, domain: &str, delay: Duration) -> Self {
        self.delays.insert(domain.to_string(), delay);
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Reports lookups to `gauge` instead of a private one.
    pub fn gauge(mut self, gauge: Arc<ActivityGauge>) -> Self {
        self.activity = gauge;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressSource for TableSource {
    fn name(&self) -> &'static str {
        "table"
    }

    async fn lookup(&self, domain: &str) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _active: ActiveCall<'_> = self.activity.enter();

        let delay: Duration = self.delays.get(domain).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.answers.get(domain).cloned().unwrap_or_default()
    }
}

/// Replies with fixed round trip samples; unknown addresses never answer.
#[derive(Default)]
pub struct TablePinger {
    samples: HashMap<Ipv4Addr, Vec<Duration>>,
    delay: Duration,
    activity: Arc<ActivityGauge>,
    calls: AtomicUsize,
    per_ip_calls: Mutex<HashMap<Ipv4Addr, usize>>,
}

impl TablePinger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rtt(mut self, ip: &str, samples_ms: &[u64]) -> Self {
        let ip: Ipv4Addr = ip.parse().expect("test address is valid");
        self.samples
            .insert(ip, samples_ms.iter().map(|ms| Duration::from_millis(*ms)).collect());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reports pings to `gauge` instead of a private one.
    pub fn gauge(mut self, gauge: Arc<ActivityGauge>) -> Self {
        self.activity = gauge;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, ip: &str) -> usize {
        let ip: Ipv4Addr = ip.parse().expect("test address is valid");
        self.per_ip_calls.lock().unwrap().get(&ip).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Pinger for TablePinger {
    async fn ping(&self, ip: Ipv4Addr) -> Vec<Duration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.per_ip_calls.lock().unwrap().entry(ip).or_default() += 1;
        let _active: ActiveCall<'_> = self.activity.enter();
        tokio::time::sleep(self.delay).await;
        self.samples.get(&ip).cloned().unwrap_or_default()
    }
}

pub fn domains(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
