use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{Attempt, LivenessCheck};

/// Treats a completed TCP handshake on the device port as "awake".
pub struct TcpCheck {
    port: u16,
    timeout: Duration,
}

impl TcpCheck {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

#[async_trait]
impl LivenessCheck for TcpCheck {
    async fn check(&self, addr: IpAddr) -> Attempt {
        let socket_addr: SocketAddr = SocketAddr::new(addr, self.port);

        match timeout(self.timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(_stream)) => Attempt::Alive,
            Ok(Err(e)) => Attempt::Silent(e.to_string()),
            Err(_elapsed) => Attempt::Silent(format!("no handshake within {:?}", self.timeout)),
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
