//! # Config Fetcher
//!
//! One `GET` per reachable device, no retries. Each successful body is saved
//! as `<output_dir>/<address>[_<hostname>].<ext>`; a failure only affects the
//! device it happened on.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use leasefetch_common::config::Config;
use leasefetch_common::device::{Candidate, FetchOutcome, FetchStatus, ProbeResult};
use leasefetch_common::{debug, success, warn};
use reqwest::Client;

use crate::client::device_url;

pub struct Fetcher {
    client: Client,
    port: u16,
    path: String,
    timeout: Duration,
    output_dir: PathBuf,
    extension: String,
}

impl Fetcher {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            port: cfg.port,
            path: cfg.fetch.path.clone(),
            timeout: cfg.fetch.timeout,
            output_dir: cfg.output_dir.clone(),
            extension: file_extension(&cfg.fetch.path),
        }
    }

    /// Fetches every reachable candidate in order, skipping unreachable ones.
    pub async fn fetch_all<F>(&self, probes: &[ProbeResult], mut on_fetched: F) -> Vec<FetchOutcome>
    where
        F: FnMut(&FetchOutcome),
    {
        let mut outcomes: Vec<FetchOutcome> = Vec::new();
        for probe in probes.iter().filter(|probe| probe.reachable) {
            let outcome = self.fetch(&probe.candidate).await;
            on_fetched(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    pub async fn fetch(&self, candidate: &Candidate) -> FetchOutcome {
        let url: String = device_url(candidate.address, self.port, &self.path);
        debug!("GET {url}");

        let body = match self.download(&url).await {
            Ok(body) => body,
            Err(status) => {
                warn!("Fetching {url} from {candidate} failed: {status}");
                return FetchOutcome::failed(candidate.clone(), status);
            }
        };

        let target: PathBuf = self.target_path(candidate);
        match save(&target, &body).await {
            Ok(()) => {
                success!("Saved {} bytes from {candidate} to {}", body.len(), target.display());
                FetchOutcome::saved(candidate.clone(), target)
            }
            Err(e) => {
                warn!("Could not write {}: {e}", target.display());
                FetchOutcome::failed(
                    candidate.clone(),
                    FetchStatus::NetworkError(format!("write failed: {e}")),
                )
            }
        }
    }

    /// Where the configuration of `candidate` is saved.
    pub fn target_path(&self, candidate: &Candidate) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", candidate.file_stem(), self.extension))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchStatus> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchStatus::NetworkError(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchStatus::HttpError(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchStatus::NetworkError(describe(&e)))?;
        Ok(body.to_vec())
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.to_string()
    }
}

/// Writes `body` next to `target` first, then renames it over `target`, so a
/// failed write never leaves a truncated file behind.
async fn save(target: &Path, body: &[u8]) -> io::Result<()> {
    let file_name = target
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"))?;
    let partial: PathBuf = target.with_file_name(format!(".{}.part", file_name.to_string_lossy()));

    let written = match tokio::fs::write(&partial, body).await {
        Ok(()) => tokio::fs::rename(&partial, target).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    written
}

/// Extension of the last segment of `fetch_path`, or the segment itself when
/// it has none: `/config.dat` → `dat`, `/json` → `json`.
pub fn file_extension(fetch_path: &str) -> String {
    let segment: &str = fetch_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let extension = match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => segment,
    };

    if extension.is_empty() {
        "bin".to_string()
    } else {
        extension.to_string()
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
