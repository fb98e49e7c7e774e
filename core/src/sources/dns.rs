use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use fasthosts_common::config::Config;
use fasthosts_protocols::dns;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::debug;

use super::AddressSource;

const MAX_UDP_PAYLOAD: usize = 4096;

/// Asks a fixed, ordered list of public resolvers for A records.
///
/// The first resolver that answers with at least one address wins; resolvers
/// that error or time out are skipped.
pub struct DnsSource {
    servers: Vec<SocketAddr>,
    timeout: Duration,
}

impl DnsSource {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { servers, timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.dns_servers.clone(), cfg.dns_timeout)
    }

    async fn query(&self, domain: &str, server: SocketAddr) -> anyhow::Result<Vec<Ipv4Addr>> {
        let id: u16 = rand::random();
        let packet: Vec<u8> = dns::create_a_packet(domain, id)?;

        let socket: UdpSocket = UdpSocket::bind(unspecified_for(server))
            .await
            .context("binding udp socket")?;
        socket.connect(server).await.context("connecting udp socket")?;
        socket.send(&packet).await.context("sending dns query")?;

        let mut buffer: Vec<u8> = vec![0u8; MAX_UDP_PAYLOAD];
        timeout(self.timeout, recv_answer(&socket, id, &mut buffer))
            .await
            .context("dns query timed out")?
    }
}

#[async_trait]
impl AddressSource for DnsSource {
    fn name(&self) -> &'static str {
        "dns"
    }

    async fn lookup(&self, domain: &str) -> Vec<String> {
        for server in &self.servers {
            match self.query(domain, *server).await {
                Ok(records) if !records.is_empty() => {
                    debug!(domain, %server, ?records, "dns answered");
                    return records.iter().map(Ipv4Addr::to_string).collect();
                }
                Ok(_) => debug!(domain, %server, "dns returned no A records"),
                Err(e) => debug!(domain, %server, "dns query failed: {e:#}"),
            }
        }
        Vec::new()
    }
}

async fn recv_answer(socket: &UdpSocket, id: u16, buffer: &mut [u8]) -> anyhow::Result<Vec<Ipv4Addr>> {
    loop {
        let len: usize = socket.recv(buffer).await.context("receiving dns response")?;
        match dns::get_a_records(&buffer[..len], id) {
            Ok(records) => return Ok(records),
            Err(e) => debug!("ignoring datagram: {e}"),
        }
    }
}

fn unspecified_for(server: SocketAddr) -> SocketAddr {
    let ip: IpAddr = match server {
        SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
        SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
    };
    SocketAddr::new(ip, 0)
}
