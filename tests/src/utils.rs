use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use std::path::Path;
use std::time::Duration;

use leasefetch_common::config::{Config, LeaseSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// How a mock device reacts.
#[derive(Clone)]
pub enum Behaviour {
    /// Answers the liveness check and serves this body.
    Serves(&'static str),
    /// Answers the liveness check but fails the download with this status.
    FailsFetch(u16),
    /// Stays silent for this many liveness checks, then serves the body.
    WakesAfter(usize, &'static str),
    /// Liveness check answers with a non-success status.
    NotADevice(u16),
}

pub struct Lab {
    pub port: u16,
    pub servers: Vec<MockServer>,
}

pub const PROBE_TIMEOUT: Duration = Duration::from_millis(150);

pub fn loopback(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, last))
}

/// Starts one mock device per entry, all on the same port.
pub async fn start_lab(devices: &[(u8, Behaviour)]) -> Lab {
    let first = TcpListener::bind(SocketAddr::new(loopback(200), 0)).unwrap();
    let port = first.local_addr().unwrap().port();
    drop(first);

    let mut servers = Vec::new();
    for (last, behaviour) in devices {
        let listener = TcpListener::bind(SocketAddr::new(loopback(*last), port))
            .expect("binding a second loopback address on the shared port");
        listener.set_nonblocking(true).unwrap();
        let server = MockServer::builder().listener(listener).start().await;
        mount(&server, behaviour.clone()).await;
        servers.push(server);
    }

    Lab { port, servers }
}

async fn mount(server: &MockServer, behaviour: Behaviour) {
    match behaviour {
        Behaviour::Serves(body) => {
            alive(server).await;
            config(server, ResponseTemplate::new(200).set_body_string(body)).await;
        }
        Behaviour::FailsFetch(status) => {
            alive(server).await;
            config(server, ResponseTemplate::new(status)).await;
        }
        Behaviour::WakesAfter(silent_checks, body) => {
            Mock::given(method("HEAD"))
                .and(path("/json"))
                .respond_with(ResponseTemplate::new(200).set_delay(PROBE_TIMEOUT * 4))
                .up_to_n_times(silent_checks as u64)
                .with_priority(1)
                .mount(server)
                .await;
            alive(server).await;
            config(server, ResponseTemplate::new(200).set_body_string(body)).await;
        }
        Behaviour::NotADevice(status) => {
            Mock::given(method("HEAD"))
                .and(path("/json"))
                .respond_with(ResponseTemplate::new(status))
                .mount(server)
                .await;
        }
    }
}

async fn alive(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(2)
        .mount(server)
        .await;
}

async fn config(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/config.dat"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Writes a dnsmasq lease file with one line per `(last octet, hostname)`.
pub fn write_leases(path: &Path, leases: &[(u8, &str)]) {
    let text: String = leases
        .iter()
        .enumerate()
        .map(|(idx, (last, hostname))| {
            format!(
                "1577480{idx:03} 84:f3:eb:00:00:{idx:02x} {} {hostname} *\n",
                loopback(*last)
            )
        })
        .collect();
    std::fs::write(path, text).unwrap();
}

pub fn config_for(leases: &Path, output_dir: &Path, port: u16) -> Config {
    let mut cfg = Config::new(LeaseSource::File(leases.to_path_buf()));
    cfg.output_dir = output_dir.to_path_buf();
    cfg.port = port;
    cfg.probe.interval = Duration::from_millis(10);
    cfg.probe.max_attempts = 4;
    cfg.probe.timeout = PROBE_TIMEOUT;
    cfg.fetch.timeout = Duration::from_secs(2);
    cfg
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
