pub mod detect;
pub mod watch;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use fasthosts_common::config::Config;

use crate::terminal::logging::Verbosity;

#[derive(Parser)]
#[command(name = "fasthosts")]
#[command(about = "Pick the fastest address of every domain and write it as a hosts file.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Domain list, one hostname per line
    #[arg(short, long, global = true)]
    pub domain: Option<PathBuf>,

    /// Where to write the hosts file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Domains resolved at the same time
    #[arg(short, long, global = true)]
    pub concurrency: Option<usize>,

    /// Resolver to query instead of the defaults, repeatable (e.g. 9.9.9.9:53)
    #[arg(long = "dns-server", global = true)]
    pub dns_servers: Vec<SocketAddr>,

    /// Per query DNS timeout in seconds
    #[arg(long, global = true)]
    pub dns_timeout: Option<u64>,

    /// Lookup page timeout in seconds
    #[arg(long, global = true)]
    pub http_timeout: Option<u64>,

    /// Print the pass report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output, repeat for trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only warnings and the final result
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Resolve every domain once and write the hosts file (default)
    #[command(alias = "d")]
    Detect,
    /// Resolve now and then again on a fixed interval until interrupted
    #[command(alias = "w")]
    Watch {
        /// Hours between two passes
        #[arg(long, default_value_t = 3)]
        interval_hours: u64,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Debug,
            (false, _) => Verbosity::Trace,
        }
    }

    pub fn to_config(&self) -> Config {
        let mut cfg: Config = Config::default();
        if let Some(domain) = &self.domain {
            cfg.domain_file = domain.clone();
        }
        if let Some(output) = &self.output {
            cfg.output_file = output.clone();
        }
        if let Some(concurrency) = self.concurrency {
            cfg.max_concurrent = concurrency;
        }
        if !self.dns_servers.is_empty() {
            cfg.dns_servers = self.dns_servers.clone();
        }
        if let Some(secs) = self.dns_timeout {
            cfg.dns_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.http_timeout {
            cfg.http_timeout = Duration::from_secs(secs);
        }
        cfg
    }
}
