use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_CONCURRENT: usize = 10;
pub const DEFAULT_LOOKUP_URL: &str = "https://sites.ipaddress.com/{domain}";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/106.0.0.0 Safari/537.36";
pub const DEFAULT_PROJECT_URL: &str = "https://github.com/ineo6/hosts";

/// Public resolvers queried in order: Cloudflare, Google, Quad101 (two addresses).
pub const DEFAULT_DNS_SERVERS: [([u8; 4], u16); 4] = [
    ([1, 1, 1, 1], 53),
    ([8, 8, 8, 8], 53),
    ([101, 101, 101, 101], 53),
    ([101, 102, 103, 104], 53),
];

/// Placeholder answers handed out by misconfigured upstreams.
pub const DEFAULT_DENYLIST: [Ipv4Addr; 3] = [
    Ipv4Addr::new(1, 0, 1, 1),
    Ipv4Addr::new(1, 2, 1, 1),
    Ipv4Addr::new(127, 0, 0, 1),
];

#[derive(Debug, Clone)]
pub struct Config {
    /// Newline separated list of domains to resolve.
    pub domain_file: PathBuf,
    /// Where the rendered hosts mapping is written after every pass.
    pub output_file: PathBuf,
    /// Upper bound on domains being discovered or probed at the same time.
    pub max_concurrent: usize,
    pub dns_servers: Vec<SocketAddr>,
    pub dns_timeout: Duration,
    /// Lookup page template, `{domain}` is substituted.
    pub lookup_url: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    /// Echo requests sent per probed address.
    pub ping_count: u16,
    /// Per echo request timeout.
    ///
    /// An address without a single reply is ranked as if it took this long.
    pub ping_timeout: Duration,
    pub denylist: Vec<Ipv4Addr>,
    pub project_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain_file: PathBuf::from("domain.txt"),
            output_file: PathBuf::from("hosts"),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            dns_servers: DEFAULT_DNS_SERVERS
                .iter()
                .map(|&(ip, port)| SocketAddr::from((ip, port)))
                .collect(),
            dns_timeout: Duration::from_secs(3),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: Duration::from_secs(5),
            ping_count: 3,
            ping_timeout: Duration::from_secs(1),
            denylist: DEFAULT_DENYLIST.to_vec(),
            project_url: DEFAULT_PROJECT_URL.to_string(),
        }
    }
}
