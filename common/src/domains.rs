//! Domain list reader.
//!
//! One hostname per line. Blank lines and `#` comment lines are skipped, and
//! anything after an unescaped `#` on a line is dropped.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::DomainListError;

pub fn read_domain_file(path: &Path) -> Result<Vec<String>, DomainListError> {
    let content: String = fs::read_to_string(path).map_err(|source| DomainListError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let domains: Vec<String> = parse_domains(&content);
    if domains.is_empty() {
        return Err(DomainListError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), count = domains.len(), "loaded domain list");
    Ok(domains)
}

pub fn parse_domains(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(strip_comment)
        .filter(|domain| !domain.is_empty())
        .collect()
}

fn strip_comment(line: &str) -> String {
    let mut domain: String = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                domain.push('#');
                chars.next();
            }
            '#' => break,
            _ => domain.push(c),
        }
    }
    domain.trim().to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
