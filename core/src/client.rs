//! HTTP clients for lease downloads and device traffic.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use leasefetch_common::config::Config;
use leasefetch_common::error::ConfigError;
use reqwest::{Client, Proxy};

const LEASE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("leasefetch/", env!("CARGO_PKG_VERSION"));

/// Client used to download a lease file from a router.
pub fn lease_client() -> Result<Client, ConfigError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(LEASE_DOWNLOAD_TIMEOUT)
        .no_proxy()
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Client used for probing and fetching. Requests set their own timeouts.
///
/// Environment proxy variables are ignored; only `cfg.proxy` is honoured.
pub fn device_client(cfg: &Config) -> Result<Client, ConfigError> {
    let builder = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(cfg.probe.timeout.max(Duration::from_millis(1)));

    let builder = match &cfg.proxy {
        Some(url) => {
            let proxy = Proxy::all(url).map_err(|e| ConfigError::InvalidValue {
                field: "proxy",
                reason: e.to_string(),
            })?;
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// `http://<addr>:<port><path>`, with brackets around IPv6 addresses.
pub fn device_url(addr: IpAddr, port: u16, path: &str) -> String {
    format!("http://{}{}", SocketAddr::new(addr, port), path)
}
