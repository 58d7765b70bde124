use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before any device is contacted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read lease file {}: {source}", path.display())]
    LeaseUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot download leases from {url}: {reason}")]
    LeaseDownload { url: String, reason: String },

    #[error("output directory {} is unusable: {reason}", path.display())]
    OutputDirInvalid { path: PathBuf, reason: String },

    #[error("cannot load configuration file {}: {reason}", path.display())]
    ConfigFile { path: PathBuf, reason: String },

    #[error("no lease source given: pass LEASES or set `lease_file` in the configuration file")]
    MissingLeaseSource,

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}
