use std::fmt;
use std::path::PathBuf;

use super::Candidate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    /// The device answered with a non-success status code.
    HttpError(u16),
    /// Transport failure, timeout, or the body could not be saved.
    NetworkError(String),
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Success => write!(f, "fetched"),
            FetchStatus::HttpError(code) => write!(f, "HTTP {code}"),
            FetchStatus::NetworkError(reason) => write!(f, "{reason}"),
        }
    }
}

/// Result of downloading the configuration of one reachable candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub candidate: Candidate,
    pub status: FetchStatus,
    pub saved_path: Option<PathBuf>,
}

impl FetchOutcome {
    pub fn saved(candidate: Candidate, path: PathBuf) -> Self {
        Self {
            candidate,
            status: FetchStatus::Success,
            saved_path: Some(path),
        }
    }

    pub fn failed(candidate: Candidate, status: FetchStatus) -> Self {
        Self {
            candidate,
            status,
            saved_path: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}
