//! # Device Records
//!
//! The immutable records each pipeline stage hands to the next:
//! [`Candidate`] from the lease parser, [`ProbeResult`] from the prober and
//! [`FetchOutcome`] from the fetcher. [`Report`] collects the terminal state
//! of every candidate for the final summary.

pub mod candidate;
pub mod outcome;
pub mod probe;
pub mod report;

pub use candidate::Candidate;
pub use outcome::{FetchOutcome, FetchStatus};
pub use probe::{ProbeResult, Unreachable};
pub use report::{Report, ReportEntry, TerminalState};
