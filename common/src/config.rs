//! # Run Configuration
//!
//! Everything a run needs, resolved once at startup and passed by reference
//! into each stage.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_PROBE_PATH: &str = "/json";
pub const DEFAULT_FETCH_PATH: &str = "/config.dat";
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the DHCP leases are read from.
    pub lease_source: LeaseSource,
    /// Directory receiving one file per fetched device.
    pub output_dir: PathBuf,
    /// Device HTTP port, used for probing and fetching.
    pub port: u16,
    pub probe: ProbeConfig,
    pub fetch: FetchConfig,
    /// Keep only leases whose hostname starts with this prefix (case-insensitive).
    pub hostname_prefix: Option<String>,
    /// HTTP proxy for all device traffic.
    pub proxy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub mode: ProbeMode,
    /// Liveness endpoint, only used in [`ProbeMode::Http`].
    pub path: String,
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Pause between two rounds.
    pub interval: Duration,
    /// Number of rounds before pending candidates are given up.
    pub max_attempts: u32,
    /// Wall-clock bound on the whole probing stage.
    pub max_duration: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Configuration-export endpoint of the device firmware.
    pub path: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(lease_source: LeaseSource) -> Self {
        Self {
            lease_source,
            output_dir: PathBuf::from("."),
            port: DEFAULT_PORT,
            probe: ProbeConfig::default(),
            fetch: FetchConfig::default(),
            hostname_prefix: None,
            proxy: None,
        }
    }

    /// Rejects values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port",
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        let timeouts = [
            ("probe_timeout_ms", Some(self.probe.timeout)),
            ("fetch_timeout_secs", Some(self.fetch.timeout)),
            ("max_duration_secs", self.probe.max_duration),
        ];
        for (field, value) in timeouts {
            if value.is_some_and(|d| d.is_zero()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        for (field, path) in [("probe_path", &self.probe.path), ("fetch_path", &self.fetch.path)] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("'{path}' must start with '/'"),
                });
            }
        }
        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            mode: ProbeMode::Http,
            path: DEFAULT_PROBE_PATH.to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
            interval: DEFAULT_PROBE_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_duration: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_FETCH_PATH.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// A lease file on disk or a URL serving one (e.g. a router exporting `dnsmasq.leases`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseSource {
    File(PathBuf),
    Url(String),
}

impl FromStr for LeaseSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("lease source cannot be empty".to_string());
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(LeaseSource::Url(trimmed.to_string()))
        } else {
            Ok(LeaseSource::File(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for LeaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseSource::File(path) => write!(f, "{}", path.display()),
            LeaseSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// How liveness is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// `HEAD` request against the liveness endpoint.
    #[default]
    Http,
    /// Plain TCP connect to the device port.
    Tcp,
}

impl FromStr for ProbeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProbeMode::Http),
            "tcp" => Ok(ProbeMode::Tcp),
            _ => Err(format!("unknown probe mode '{s}' (expected 'http' or 'tcp')")),
        }
    }
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMode::Http => write!(f, "http"),
            ProbeMode::Tcp => write!(f, "tcp"),
        }
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
