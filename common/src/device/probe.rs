use super::Candidate;

/// Why a candidate never made it to the fetch stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unreachable {
    /// No answer within the attempt or time bound.
    Exhausted,
    /// Answered the liveness check with this non-success HTTP status.
    Rejected(u16),
}

/// Result of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub candidate: Candidate,
    pub reachable: bool,
    pub attempts: u32,
    /// Set exactly when `reachable` is false.
    pub reason: Option<Unreachable>,
}

impl ProbeResult {
    pub fn alive(candidate: Candidate, attempts: u32) -> Self {
        Self {
            candidate,
            reachable: true,
            attempts,
            reason: None,
        }
    }

    pub fn unreachable(candidate: Candidate, attempts: u32, reason: Unreachable) -> Self {
        Self {
            candidate,
            reachable: false,
            attempts,
            reason: Some(reason),
        }
    }
}
