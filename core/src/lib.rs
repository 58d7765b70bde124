//! # leasefetch core
//!
//! The three pipeline stages and the glue that runs them in order:
//!
//! * **[`lease`]**: turns a dnsmasq lease file into [`Candidate`]s.
//! * **[`probe`]**: round-based liveness probing until devices answer.
//! * **[`fetch`]**: downloads each reachable device's configuration file.
//! * **[`pipeline`]**: Parser → Prober → Fetcher for one invocation.
//!
//! [`Candidate`]: leasefetch_common::device::Candidate

pub mod client;
pub mod fetch;
pub mod lease;
pub mod pipeline;
pub mod probe;
