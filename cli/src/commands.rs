pub mod fetch;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use leasefetch_common::config::{LeaseSource, ProbeMode};

#[derive(Parser, Debug, Default)]
#[command(name = "leasefetch", version)]
#[command(about = "Download configuration files from devices listed in a DHCP lease file.")]
pub struct CommandLine {
    /// dnsmasq lease file, or an http(s) URL serving one
    pub leases: Option<LeaseSource>,

    /// Directory receiving one file per device [default: .]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration file; command-line options take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait between probe rounds [default: 15]
    #[arg(short, long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Probe rounds before a silent device is given up [default: 40]
    #[arg(short = 'n', long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Stop probing after this many seconds
    #[arg(short = 'd', long, value_name = "SECS")]
    pub max_duration: Option<u64>,

    /// Device HTTP port [default: 80]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Liveness check: `http` (HEAD request) or `tcp` (connect only) [default: http]
    #[arg(long, value_name = "MODE")]
    pub probe: Option<ProbeMode>,

    /// Liveness endpoint used by the http check [default: /json]
    #[arg(long, value_name = "PATH")]
    pub probe_path: Option<String>,

    /// Timeout of a single probe in milliseconds [default: 1000]
    #[arg(long, value_name = "MS")]
    pub probe_timeout: Option<u64>,

    /// Configuration-export endpoint to download [default: /config.dat]
    #[arg(long, value_name = "PATH")]
    pub fetch_path: Option<String>,

    /// Timeout of a single download in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,

    /// Only keep leases whose hostname starts with this prefix (e.g. `ESP-`)
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// HTTP proxy for all device traffic
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Less output; repeat (-qq) to print only the final counts
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
