use std::fmt;
use std::net::IpAddr;

/// A device address taken from a lease, considered for probing and fetching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub address: IpAddr,
    pub hostname: Option<String>,
}

impl Candidate {
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            hostname: None,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        let hostname: String = hostname.into();
        self.hostname = (!hostname.is_empty()).then_some(hostname);
        self
    }

    pub fn hostname_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.hostname.as_deref().unwrap_or(fallback)
    }

    /// File-name stem identifying this device: the address with separators
    /// replaced by `-`, followed by `_<hostname>` when one is known.
    pub fn file_stem(&self) -> String {
        let address: String = self.address.to_string().replace(['.', ':'], "-");
        match &self.hostname {
            Some(hostname) => format!("{address}_{}", sanitize(hostname)),
            None => address,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hostname {
            Some(hostname) => write!(f, "{} ({hostname})", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}
