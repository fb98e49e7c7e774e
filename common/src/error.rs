use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The domain list could not provide anything to resolve.
///
/// Fatal for a whole pass and raised before any network activity.
#[derive(Debug, Error)]
pub enum DomainListError {
    #[error("failed to read domain list {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("domain list {} contains no domains", path.display())]
    Empty { path: PathBuf },
}

/// Per-domain failure, recorded in that domain's result.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("no valid address found")]
    NoValidAddress,
}

#[derive(Debug, Error)]
#[error("failed to write hosts file {}: {source}", path.display())]
pub struct PersistError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
