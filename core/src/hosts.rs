//! # Hosts file rendering
//!
//! The artifact is regenerated in full on every pass:
//!
//! ```text
//! # Hosts
//! # Updated: 2026-10-19 12:00:00
//! # Project: https://github.com/ineo6/hosts
//!
//! 140.82.112.3                   github.com
//! # IP Address Not Found         gist.github.com
//! 185.199.108.133                raw.githubusercontent.com  # Timeout
//! ```

use std::fmt::Write as _;
use std::fs::{self, Permissions};
use std::io::Write as _;
use std::path::Path;

use fasthosts_common::error::PersistError;
use fasthosts_common::models::ResolutionResult;
use tempfile::{Builder, NamedTempFile};

pub const HOSTS_TITLE: &str = "# Hosts";
pub const TIMEOUT_ANNOTATION: &str = "  # Timeout";
const ADDRESS_WIDTH: usize = 30;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn render(results: &[ResolutionResult], generated_at: &str, project_url: &str) -> String {
    let mut content: String = String::new();
    content.push_str(HOSTS_TITLE);
    content.push('\n');
    let _ = writeln!(content, "# Updated: {generated_at}");
    let _ = writeln!(content, "# Project: {project_url}");
    content.push('\n');

    for result in results {
        content.push_str(&render_line(result));
        content.push('\n');
    }
    content
}

pub fn render_line(result: &ResolutionResult) -> String {
    let mut line: String = format!("{:<width$} {}", result.address_field(), result.domain, width = ADDRESS_WIDTH);
    if result.is_timed_out() {
        line.push_str(TIMEOUT_ANNOTATION);
    }
    line
}

/// Replaces `path` with `content`.
///
/// The text is written to a temporary file next to `path` and renamed over it,
/// so readers see either the previous or the new mapping. An existing file keeps
/// its permissions; a new one is created `0644` minus the umask.
pub fn persist(path: &Path, content: &str) -> Result<(), PersistError> {
    let wrap = |source: std::io::Error| PersistError {
        path: path.to_path_buf(),
        source,
    };

    let dir: &Path = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing: Option<Permissions> = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder: Builder = Builder::new();
    builder.prefix(".hosts");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if existing.is_none() {
            builder.permissions(Permissions::from_mode(NEW_FILE_MODE));
        }
    }

    let mut file: NamedTempFile = builder.tempfile_in(dir).map_err(wrap)?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions).map_err(wrap)?;
    }
    file.write_all(content.as_bytes()).map_err(wrap)?;
    file.flush().map_err(wrap)?;
    file.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
