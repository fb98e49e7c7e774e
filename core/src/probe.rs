//! # Latency probe
//!
//! Measures the round trip time of a single IPv4 address and memoizes it.
//!
//! The echo transport sits behind the [`Pinger`] trait; [`IcmpPinger`] is the
//! real implementation using an unprivileged ICMP datagram socket. The
//! representative latency is the **median** of the replies that came back, and
//! an address without a single reply is [`Latency::TimedOut`].

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use fasthosts_common::models::Latency;
use fasthosts_protocols::icmp;
use parking_lot::RwLock;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::{debug, warn};

const ECHO_PAYLOAD_LEN: usize = 16;
const RECV_BUFFER_SIZE: usize = 1500;

/// Echo transport.
#[async_trait]
pub trait Pinger: Send + Sync {
    /// Sends echo requests to `ip` and returns the round trip time of every
    /// reply that arrived in time. Failures are reported as missing samples.
    async fn ping(&self, ip: Ipv4Addr) -> Vec<Duration>;
}

/// Process wide latency memo, keyed by address alone.
///
/// Entries are never invalidated. Each address owns a once-cell, so concurrent
/// requests for the same uncached address share a single probe. The map is
/// read-locked on the hot path; the write lock is only taken to insert the
/// cell of an address seen for the first time.
#[derive(Clone, Default)]
pub struct LatencyCache {
    entries: Arc<RwLock<HashMap<Ipv4Addr, Arc<OnceCell<Latency>>>>>,
}

impl LatencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ip: Ipv4Addr) -> Option<Latency> {
        self.entries
            .read()
            .get(&ip)
            .and_then(|cell| cell.get().copied())
    }

    /// Number of addresses with a finished measurement.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, ip: Ipv4Addr) -> Arc<OnceCell<Latency>> {
        if let Some(cell) = self.entries.read().get(&ip) {
            return Arc::clone(cell);
        }
        Arc::clone(self.entries.write().entry(ip).or_default())
    }
}

pub struct LatencyProbe {
    pinger: Arc<dyn Pinger>,
    cache: LatencyCache,
}

impl LatencyProbe {
    pub fn new(pinger: Arc<dyn Pinger>, cache: LatencyCache) -> Self {
        Self { pinger, cache }
    }

    pub fn cache(&self) -> &LatencyCache {
        &self.cache
    }

    /// Latency of `ip`, probing the network only on the first request per process.
    pub async fn measure(&self, ip: Ipv4Addr) -> Latency {
        if let Some(latency) = self.cache.get(ip) {
            debug!(%ip, %latency, "latency cache hit");
            return latency;
        }

        let slot: Arc<OnceCell<Latency>> = self.cache.slot(ip);
        *slot.get_or_init(|| self.probe(ip)).await
    }

    async fn probe(&self, ip: Ipv4Addr) -> Latency {
        let samples: Vec<Duration> = self.pinger.ping(ip).await;
        match median(samples) {
            Some(rtt) => {
                let latency: Latency = Latency::Measured(rtt);
                debug!(%ip, %latency, "probed");
                latency
            }
            None => {
                warn!("No echo replies from {ip}, ranking it as timed out");
                Latency::TimedOut
            }
        }
    }
}

/// Middle sample after sorting; the upper one of the two middles for even counts.
pub fn median(mut samples: Vec<Duration>) -> Option<Duration> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_unstable();
    Some(samples[samples.len() / 2])
}

/// Unprivileged ICMP echo over a `SOCK_DGRAM` socket.
///
/// Requests are sent one after another, each waiting at most `timeout` for its reply.
pub struct IcmpPinger {
    count: u16,
    timeout: Duration,
}

impl IcmpPinger {
    pub fn new(count: u16, timeout: Duration) -> Self {
        Self { count, timeout }
    }

    async fn try_ping(&self, ip: Ipv4Addr) -> anyhow::Result<Vec<Duration>> {
        let socket: UdpSocket = open_icmp_socket().context("opening ICMP datagram socket")?;
        socket
            .connect(SocketAddr::new(ip.into(), 0))
            .await
            .with_context(|| format!("connecting ICMP socket to {ip}"))?;

        let identifier: u16 = rand::random();
        let token: [u8; ECHO_PAYLOAD_LEN] = rand::random();
        let mut buffer: Vec<u8> = vec![0u8; RECV_BUFFER_SIZE];
        let mut samples: Vec<Duration> = Vec::with_capacity(usize::from(self.count));

        for sequence in 0..self.count {
            let request: Vec<u8> = icmp::create_echo_request(identifier, sequence, &token)?;
            let sent_at: Instant = Instant::now();
            if let Err(e) = socket.send(&request).await {
                debug!(%ip, sequence, "echo request not sent: {e}");
                continue;
            }

            match timeout(self.timeout, wait_for_reply(&socket, sequence, &token, &mut buffer)).await {
                Ok(Ok(())) => samples.push(sent_at.elapsed()),
                Ok(Err(e)) => debug!(%ip, sequence, "echo reply failed: {e}"),
                Err(_elapsed) => debug!(%ip, sequence, "echo request timed out"),
            }
        }

        Ok(samples)
    }
}

#[async_trait]
impl Pinger for IcmpPinger {
    async fn ping(&self, ip: Ipv4Addr) -> Vec<Duration> {
        match self.try_ping(ip).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Ping {ip} failed: {e:#}");
                Vec::new()
            }
        }
    }
}

fn open_icmp_socket() -> io::Result<UdpSocket> {
    let socket: Socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::ICMPV4))?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

async fn wait_for_reply(
    socket: &UdpSocket,
    sequence: u16,
    token: &[u8],
    buffer: &mut [u8],
) -> io::Result<()> {
    loop {
        let len: usize = socket.recv(buffer).await?;
        if let Some(reply) = icmp::parse_echo_reply(&buffer[..len])
            && reply.sequence == sequence
            && reply.payload == token
        {
            return Ok(());
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
