//! # Pipeline
//!
//! Runs Parser → Prober → Fetcher once. Configuration problems are raised
//! before any device is contacted; everything after that is reported per
//! candidate in the returned [`Report`].

use std::path::Path;

use leasefetch_common::config::{Config, ProbeMode};
use leasefetch_common::device::{Candidate, FetchOutcome, Report};
use leasefetch_common::error::ConfigError;
use leasefetch_common::{info, warn};

use crate::client;
use crate::fetch::Fetcher;
use crate::lease;
use crate::probe::http::HttpCheck;
use crate::probe::tcp::TcpCheck;
use crate::probe::{LivenessCheck, Prober, RoundReport};

/// Hooks for following a run while it happens. Every method defaults to a no-op.
pub trait Observer {
    fn leases_loaded(&mut self, _candidates: &[Candidate]) {}
    fn round_finished(&mut self, _report: &RoundReport) {}
    fn probing_finished(&mut self) {}
    fn fetched(&mut self, _outcome: &FetchOutcome) {}
}

/// An [`Observer`] that ignores everything.
pub struct NoopObserver;

impl Observer for NoopObserver {}

pub async fn run(cfg: &Config, observer: &mut dyn Observer) -> anyhow::Result<Report> {
    cfg.validate()?;
    check_output_dir(&cfg.output_dir)?;

    let lease_client = client::lease_client()?;
    let mut candidates: Vec<Candidate> = lease::read_leases(&cfg.lease_source, &lease_client).await?;
    info!("{} candidates found in {}", candidates.len(), cfg.lease_source);
    prepare_output_dir(&cfg.output_dir)?;

    if let Some(prefix) = &cfg.hostname_prefix {
        let before = candidates.len();
        candidates = lease::filter_by_prefix(candidates, prefix);
        info!("{} of {before} candidates match hostname prefix '{prefix}'", candidates.len());
    }
    observer.leases_loaded(&candidates);

    if candidates.is_empty() {
        warn!("No candidates to probe");
        return Ok(Report::default());
    }

    let device_client = client::device_client(cfg)?;
    let check: Box<dyn LivenessCheck> = match cfg.probe.mode {
        ProbeMode::Http => Box::new(HttpCheck::new(
            device_client.clone(),
            cfg.port,
            cfg.probe.path.clone(),
            cfg.probe.timeout,
        )),
        ProbeMode::Tcp => Box::new(TcpCheck::new(cfg.port, cfg.probe.timeout)),
    };

    let probes = Prober::new(check, &cfg.probe)
        .run(candidates, |report| observer.round_finished(report))
        .await;
    observer.probing_finished();

    let outcomes = Fetcher::new(device_client, cfg)
        .fetch_all(&probes, |outcome| observer.fetched(outcome))
        .await;

    Ok(Report::assemble(probes, outcomes))
}

fn output_dir_invalid(path: &Path, reason: String) -> ConfigError {
    ConfigError::OutputDirInvalid {
        path: path.to_path_buf(),
        reason,
    }
}

/// Fails early when something other than a directory sits at `path`.
fn check_output_dir(path: &Path) -> Result<(), ConfigError> {
    if path.exists() && !path.is_dir() {
        return Err(output_dir_invalid(path, "exists and is not a directory".to_string()));
    }
    Ok(())
}

/// Creates the output directory when missing; anything other than a writable
/// directory at that path is a configuration error.
fn prepare_output_dir(path: &Path) -> Result<(), ConfigError> {
    let invalid = |reason: String| output_dir_invalid(path, reason);

    check_output_dir(path)?;
    std::fs::create_dir_all(path).map_err(|e| invalid(e.to_string()))?;

    let metadata = std::fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if metadata.permissions().readonly() {
        return Err(invalid("directory is read-only".to_string()));
    }
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
