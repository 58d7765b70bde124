//! # Liveness Prober
//!
//! Devices that sleep most of the time (battery powered ESP nodes) only answer
//! for a short window after waking up. Instead of waiting on one device at a
//! time, every pending candidate gets one attempt per round, and the prober
//! sleeps between rounds until all answered or the bound is hit.
//!
//! The actual check is pluggable through [`LivenessCheck`]:
//! * [`http::HttpCheck`] sends `HEAD` to the liveness endpoint.
//! * [`tcp::TcpCheck`] only opens a TCP connection.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use leasefetch_common::config::ProbeConfig;
use leasefetch_common::device::{Candidate, ProbeResult, Unreachable};
use leasefetch_common::{debug, success, warn};

pub mod http;
pub mod tcp;

/// Result of a single attempt against one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The device answered as expected.
    Alive,
    /// The host answered with a non-success HTTP status, so it is not a device
    /// of the expected kind. Not retried.
    Rejected(u16),
    /// No usable answer this time (refused, timed out, ...). Retried next round.
    Silent(String),
}

#[async_trait]
pub trait LivenessCheck: Send + Sync {
    async fn check(&self, addr: IpAddr) -> Attempt;
}

/// Progress after each finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub max_rounds: u32,
    pub alive: usize,
    pub pending: usize,
    pub total: usize,
}

pub struct Prober {
    check: Box<dyn LivenessCheck>,
    interval: Duration,
    max_attempts: u32,
    max_duration: Option<Duration>,
}

impl Prober {
    pub fn new(check: Box<dyn LivenessCheck>, cfg: &ProbeConfig) -> Self {
        Self {
            check,
            interval: cfg.interval,
            max_attempts: cfg.max_attempts,
            max_duration: cfg.max_duration,
        }
    }

    /// Probes `candidates` in rounds and returns one result per candidate, in
    /// input order.
    ///
    /// The time bound is checked before every attempt, so a round cut short by
    /// it leaves the rest of its candidates untried. `on_round` is called after
    /// every round.
    pub async fn run<F>(&self, candidates: Vec<Candidate>, mut on_round: F) -> Vec<ProbeResult>
    where
        F: FnMut(&RoundReport),
    {
        let start: Instant = Instant::now();
        let total: usize = candidates.len();
        let mut results: Vec<Option<ProbeResult>> = vec![None; total];
        let mut pending: Vec<usize> = (0..total).collect();
        let mut tries: Vec<u32> = vec![0; total];
        let mut alive: usize = 0;
        let mut round: u32 = 0;

        while !pending.is_empty() && round < self.max_attempts && !self.expired(start) {
            round += 1;
            debug!("Probe round {round}: {} candidates pending", pending.len());

            let mut still_pending: Vec<usize> = Vec::with_capacity(pending.len());
            for idx in pending {
                if self.expired(start) {
                    still_pending.push(idx);
                    continue;
                }
                let candidate = &candidates[idx];
                tries[idx] += 1;
                match self.check.check(candidate.address).await {
                    Attempt::Alive => {
                        success!("{candidate} is awake (attempt {})", tries[idx]);
                        alive += 1;
                        results[idx] = Some(ProbeResult::alive(candidate.clone(), tries[idx]));
                    }
                    Attempt::Rejected(code) => {
                        warn!("{candidate} answered the liveness check with HTTP {code}, skipping it");
                        results[idx] = Some(ProbeResult::unreachable(
                            candidate.clone(),
                            tries[idx],
                            Unreachable::Rejected(code),
                        ));
                    }
                    Attempt::Silent(reason) => {
                        debug!("{candidate} did not answer: {reason}");
                        still_pending.push(idx);
                    }
                }
            }
            pending = still_pending;

            on_round(&RoundReport {
                round,
                max_rounds: self.max_attempts,
                alive,
                pending: pending.len(),
                total,
            });

            if pending.is_empty() || round >= self.max_attempts || !self.has_time_for_round(start) {
                break;
            }
            tokio::time::sleep(self.interval).await;
        }

        for idx in pending {
            let candidate = &candidates[idx];
            warn!("{candidate} never answered after {} attempts", tries[idx]);
            results[idx] = Some(ProbeResult::unreachable(
                candidate.clone(),
                tries[idx],
                Unreachable::Exhausted,
            ));
        }

        results.into_iter().flatten().collect()
    }

    fn expired(&self, start: Instant) -> bool {
        self.max_duration
            .is_some_and(|limit| start.elapsed() >= limit)
    }

    /// Whether another round would still start inside the time bound after sleeping.
    fn has_time_for_round(&self, start: Instant) -> bool {
        self.max_duration
            .is_none_or(|limit| start.elapsed() + self.interval < limit)
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
