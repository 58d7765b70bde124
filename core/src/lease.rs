//! # Lease Parser
//!
//! Reads dnsmasq lease files. Each lease is one whitespace-separated line:
//!
//! ```text
//! <expiry-epoch> <mac-or-iaid> <ip-address> <hostname> <client-id>
//! ```
//!
//! The hostname is `*` when the client did not send one; the client-id column
//! may be missing. IPv6 lease files start with a `duid <server-duid>` line and
//! carry an IAID instead of a MAC address.

use std::collections::HashSet;
use std::net::IpAddr;

use leasefetch_common::config::LeaseSource;
use leasefetch_common::device::Candidate;
use leasefetch_common::error::ConfigError;
use leasefetch_common::{debug, warn};
use reqwest::Client;

const UNKNOWN_HOSTNAME: &str = "*";

/// Candidates found in a lease file plus the lines that had to be dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LeaseParse {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_no: usize,
    pub reason: String,
}

/// Parses lease text into candidates, in file order, one per unique address.
///
/// Malformed lines are collected in [`LeaseParse::skipped`]; blank lines,
/// `#` comments and the `duid` header are ignored.
pub fn parse_leases(text: &str) -> LeaseParse {
    parse_lease_bytes(text.as_bytes())
}

/// Like [`parse_leases`], for raw file contents. A line that is not valid
/// UTF-8 is skipped like any other malformed line.
pub fn parse_lease_bytes(raw: &[u8]) -> LeaseParse {
    let mut parsed = LeaseParse::default();
    let mut seen: HashSet<IpAddr> = HashSet::new();

    for (idx, line) in raw.split(|b| *b == b'\n').enumerate() {
        let line = std::str::from_utf8(line).map_err(|_| "line is not valid UTF-8".to_string());
        match line.and_then(parse_line) {
            Ok(Some(candidate)) => {
                if seen.insert(candidate.address) {
                    parsed.candidates.push(candidate);
                } else {
                    debug!("Line {}: duplicate lease for {}, keeping the first", idx + 1, candidate.address);
                }
            }
            Ok(None) => {}
            Err(reason) => parsed.skipped.push(SkippedLine {
                line_no: idx + 1,
                reason,
            }),
        }
    }

    parsed
}

fn parse_line(line: &str) -> Result<Option<Candidate>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields[0] == "duid" {
        return Ok(None);
    }
    if !(3..=5).contains(&fields.len()) {
        return Err(format!("expected 3 to 5 fields, found {}", fields.len()));
    }

    fields[0]
        .parse::<u64>()
        .map_err(|_| format!("invalid expiry '{}'", fields[0]))?;

    if !is_hardware_id(fields[1]) {
        return Err(format!("invalid hardware address '{}'", fields[1]));
    }

    let address = fields[2]
        .parse::<IpAddr>()
        .map_err(|_| format!("invalid IP address '{}'", fields[2]))?;

    let candidate = Candidate::new(address);
    match fields.get(3) {
        Some(&hostname) if hostname != UNKNOWN_HOSTNAME => Ok(Some(candidate.with_hostname(hostname))),
        _ => Ok(Some(candidate)),
    }
}

/// A colon-separated hex MAC address, or a decimal IAID on IPv6 leases.
fn is_hardware_id(field: &str) -> bool {
    if field.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }

    let groups: Vec<&str> = field.split(':').collect();
    groups.len() >= 6
        && groups
            .iter()
            .all(|g| (1..=2).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Drops candidates whose hostname does not start with `prefix`, ignoring case.
/// Candidates without a hostname never match.
pub fn filter_by_prefix(candidates: Vec<Candidate>, prefix: &str) -> Vec<Candidate> {
    let prefix = prefix.to_ascii_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate
                .hostname
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().starts_with(&prefix))
        })
        .collect()
}

/// Loads and parses the lease source, logging every skipped line.
///
/// An unreadable file or a failed download is fatal.
pub async fn read_leases(source: &LeaseSource, client: &Client) -> Result<Vec<Candidate>, ConfigError> {
    let raw: Vec<u8> = match source {
        LeaseSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|source| ConfigError::LeaseUnreadable {
                path: path.clone(),
                source,
            })?,
        LeaseSource::Url(url) => download(url, client).await?,
    };

    let parsed = parse_lease_bytes(&raw);
    for skipped in &parsed.skipped {
        warn!("Skipping lease line {}: {}", skipped.line_no, skipped.reason);
    }

    Ok(parsed.candidates)
}

async fn download(url: &str, client: &Client) -> Result<Vec<u8>, ConfigError> {
    let failed = |reason: String| ConfigError::LeaseDownload {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("server answered {status}")));
    }

    let body = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    Ok(body.to_vec())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
