use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Attempt, LivenessCheck};
use crate::client::device_url;

/// Sends `HEAD` to the liveness endpoint. ESPEasy answers `/json` as soon as
/// its web server is up.
pub struct HttpCheck {
    client: Client,
    port: u16,
    path: String,
    timeout: Duration,
}

impl HttpCheck {
    pub fn new(client: Client, port: u16, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            port,
            path: path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl LivenessCheck for HttpCheck {
    async fn check(&self, addr: IpAddr) -> Attempt {
        let url: String = device_url(addr, self.port, &self.path);

        match self.client.head(&url).timeout(self.timeout).send().await {
            Ok(response) if response.status().is_success() => Attempt::Alive,
            Ok(response) => Attempt::Rejected(response.status().as_u16()),
            Err(e) if e.is_timeout() => Attempt::Silent(format!("no answer within {:?}", self.timeout)),
            Err(e) => Attempt::Silent(e.to_string()),
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
