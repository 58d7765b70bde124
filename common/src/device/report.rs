use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

use super::{Candidate, FetchOutcome, FetchStatus, ProbeResult, Unreachable};

/// Where a candidate ended up once the pipeline finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalState {
    Fetched { path: PathBuf },
    FetchFailed { status: FetchStatus },
    Unreachable { reason: Unreachable },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub candidate: Candidate,
    pub attempts: u32,
    pub state: TerminalState,
}

/// Per-candidate summary of a run, in lease order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Joins probe results with fetch outcomes.
    ///
    /// Every probe result yields one entry. A reachable candidate without a
    /// matching outcome is recorded as a failed fetch.
    pub fn assemble(probes: Vec<ProbeResult>, outcomes: Vec<FetchOutcome>) -> Self {
        let mut by_address: HashMap<IpAddr, FetchOutcome> = outcomes
            .into_iter()
            .map(|outcome| (outcome.candidate.address, outcome))
            .collect();

        let entries = probes
            .into_iter()
            .map(|probe| {
                let state = match (probe.reason, by_address.remove(&probe.candidate.address)) {
                    (Some(reason), _) => TerminalState::Unreachable { reason },
                    (None, Some(FetchOutcome { saved_path: Some(path), .. })) => {
                        TerminalState::Fetched { path }
                    }
                    (None, Some(outcome)) => TerminalState::FetchFailed {
                        status: outcome.status,
                    },
                    (None, None) => TerminalState::FetchFailed {
                        status: FetchStatus::NetworkError("no fetch attempted".to_string()),
                    },
                };
                ReportEntry {
                    candidate: probe.candidate,
                    attempts: probe.attempts,
                    state,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn fetched(&self) -> usize {
        self.count(|state| matches!(state, TerminalState::Fetched { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|state| matches!(state, TerminalState::FetchFailed { .. }))
    }

    pub fn unreachable(&self) -> usize {
        self.count(|state| matches!(state, TerminalState::Unreachable { .. }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, pred: impl Fn(&TerminalState) -> bool) -> usize {
        self.entries.iter().filter(|entry| pred(&entry.state)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn candidate(last: u8) -> Candidate {
        Candidate::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, last)))
    }

    #[test]
    fn assemble_keeps_probe_order_and_maps_states() {
        let probes = vec![
            ProbeResult::alive(candidate(10), 1),
            ProbeResult::unreachable(candidate(11), 3, Unreachable::Exhausted),
            ProbeResult::alive(candidate(12), 2),
        ];
        let outcomes = vec![
            FetchOutcome::failed(candidate(12), FetchStatus::HttpError(404)),
            FetchOutcome::saved(candidate(10), PathBuf::from("out/192-168-1-10.dat")),
        ];

        let report = Report::assemble(probes, outcomes);

        assert_eq!(report.len(), 3);
        assert_eq!(report.entries[0].candidate, candidate(10));
        assert!(matches!(report.entries[0].state, TerminalState::Fetched { .. }));
        assert_eq!(
            report.entries[1].state,
            TerminalState::Unreachable { reason: Unreachable::Exhausted }
        );
        assert_eq!(report.entries[1].attempts, 3);
        assert_eq!(
            report.entries[2].state,
            TerminalState::FetchFailed { status: FetchStatus::HttpError(404) }
        );
        assert_eq!((report.fetched(), report.failed(), report.unreachable()), (1, 1, 1));
    }

    #[test]
    fn reachable_without_outcome_counts_as_failure() {
        let report = Report::assemble(vec![ProbeResult::alive(candidate(20), 1)], Vec::new());
        assert_eq!(report.failed(), 1);
    }
}
