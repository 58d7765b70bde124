//! Builds the run [`Config`] from the command line and an optional JSON file.
//!
//! Precedence: command line, then configuration file, then built-in defaults.
//! Relative paths inside the file are taken relative to the file itself.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use leasefetch_common::config::{Config, LeaseSource, ProbeMode};
use leasefetch_common::error::ConfigError;
use serde::Deserialize;

use crate::commands::CommandLine;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub lease_file: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub max_duration_secs: Option<u64>,
    pub port: Option<u16>,
    pub probe: Option<ProbeMode>,
    pub probe_path: Option<String>,
    pub probe_timeout_ms: Option<u64>,
    pub fetch_path: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
    pub hostname_prefix: Option<String>,
    pub proxy: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let failed = |reason: String| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
        let mut file: FileConfig = serde_json::from_str(&text).map_err(|e| failed(e.to_string()))?;

        let base: &Path = path.parent().unwrap_or_else(|| Path::new(""));
        file.output_dir = file.output_dir.map(|dir| base.join(dir));
        file.lease_file = file.lease_file.map(|lease| match LeaseSource::from_str(&lease) {
            Ok(LeaseSource::File(p)) => base.join(p).to_string_lossy().into_owned(),
            _ => lease,
        });

        Ok(file)
    }
}

pub fn resolve(cli: &CommandLine) -> Result<Config, ConfigError> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    merge(cli, file)
}

pub fn merge(cli: &CommandLine, file: FileConfig) -> Result<Config, ConfigError> {
    let lease_source: LeaseSource = match (&cli.leases, file.lease_file) {
        (Some(source), _) => source.clone(),
        (None, Some(raw)) => LeaseSource::from_str(&raw).map_err(|reason| ConfigError::InvalidValue {
            field: "lease_file",
            reason,
        })?,
        (None, None) => return Err(ConfigError::MissingLeaseSource),
    };

    let mut cfg = Config::new(lease_source);

    if let Some(dir) = cli.output_dir.clone().or(file.output_dir) {
        cfg.output_dir = dir;
    }
    if let Some(port) = cli.port.or(file.port) {
        cfg.port = port;
    }
    if let Some(prefix) = cli.prefix.clone().or(file.hostname_prefix) {
        cfg.hostname_prefix = Some(prefix);
    }
    cfg.proxy = cli.proxy.clone().or(file.proxy);

    if let Some(mode) = cli.probe.or(file.probe) {
        cfg.probe.mode = mode;
    }
    if let Some(path) = cli.probe_path.clone().or(file.probe_path) {
        cfg.probe.path = path;
    }
    if let Some(ms) = cli.probe_timeout.or(file.probe_timeout_ms) {
        cfg.probe.timeout = Duration::from_millis(ms);
    }
    if let Some(secs) = cli.interval.or(file.interval_secs) {
        cfg.probe.interval = Duration::from_secs(secs);
    }
    if let Some(n) = cli.max_attempts.or(file.max_attempts) {
        cfg.probe.max_attempts = n;
    }
    cfg.probe.max_duration = cli
        .max_duration
        .or(file.max_duration_secs)
        .map(Duration::from_secs);

    if let Some(path) = cli.fetch_path.clone().or(file.fetch_path) {
        cfg.fetch.path = path;
    }
    if let Some(secs) = cli.fetch_timeout.or(file.fetch_timeout_secs) {
        cfg.fetch.timeout = Duration::from_secs(secs);
    }

    cfg.validate()?;
    Ok(cfg)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use leasefetch_common::config::{DEFAULT_FETCH_PATH, DEFAULT_MAX_ATTEMPTS, DEFAULT_PORT};

    fn write_config(json: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leasefetch.json");
        std::fs::write(&path, json).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_fill_everything_but_the_lease_source() {
        let cli = CommandLine {
            leases: Some(LeaseSource::File(PathBuf::from("dnsmasq.leases"))),
            ..CommandLine::default()
        };

        let cfg = merge(&cli, FileConfig::default()).unwrap();

        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.fetch.path, DEFAULT_FETCH_PATH);
        assert_eq!(cfg.probe.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(cfg.probe.max_duration, None);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
    }

    #[test]
    fn missing_lease_source_is_an_error() {
        let err = merge(&CommandLine::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingLeaseSource));
    }

    #[test]
    fn command_line_overrides_file() {
        let (_dir, path) = write_config(
            r#"{
                "lease_file": "http://router/dnsmasq.leases",
                "port": 8080,
                "max_attempts": 5,
                "probe": "tcp",
                "hostname_prefix": "ESP-"
            }"#,
        );
        let cli = CommandLine {
            config: Some(path),
            port: Some(81),
            ..CommandLine::default()
        };

        let cfg = resolve(&cli).unwrap();

        assert_eq!(
            cfg.lease_source,
            LeaseSource::Url("http://router/dnsmasq.leases".to_string())
        );
        assert_eq!(cfg.port, 81);
        assert_eq!(cfg.probe.max_attempts, 5);
        assert_eq!(cfg.probe.mode, ProbeMode::Tcp);
        assert_eq!(cfg.hostname_prefix.as_deref(), Some("ESP-"));
    }

    #[test]
    fn relative_paths_in_file_follow_the_file() {
        let (dir, path) = write_config(r#"{ "lease_file": "dnsmasq.leases", "output_dir": "out" }"#);
        let cli = CommandLine {
            config: Some(path),
            ..CommandLine::default()
        };

        let cfg = resolve(&cli).unwrap();

        assert_eq!(
            cfg.lease_source,
            LeaseSource::File(dir.path().join("dnsmasq.leases"))
        );
        assert_eq!(cfg.output_dir, dir.path().join("out"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let (_dir, path) = write_config(r#"{ "lease_file": "x", "proxies": {} }"#);

        let err = FileConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigFile { .. }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cli = CommandLine {
            leases: Some(LeaseSource::File(PathBuf::from("dnsmasq.leases"))),
            fetch_path: Some("config.dat".to_string()),
            ..CommandLine::default()
        };

        assert!(matches!(
            merge(&cli, FileConfig::default()),
            Err(ConfigError::InvalidValue { field: "fetch_path", .. })
        ));
    }
}
