use std::net::IpAddr;

use colored::*;
use leasefetch_common::device::{ReportEntry, TerminalState, Unreachable};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn address_to_detail(address: &IpAddr) -> Detail {
    match address {
        IpAddr::V4(ipv4_addr) => ("IPv4".to_string(), ipv4_addr.to_string().color(colors::IPV4_ADDR)),
        IpAddr::V6(ipv6_addr) => ("IPv6".to_string(), ipv6_addr.to_string().color(colors::IPV6_ADDR)),
    }
}

pub fn state_to_detail(state: &TerminalState) -> Detail {
    let value: ColoredString = match state {
        TerminalState::Fetched { .. } => "fetched".color(colors::FETCHED).bold(),
        TerminalState::FetchFailed { status } => {
            format!("fetch failed ({status})").color(colors::FAILED).bold()
        }
        TerminalState::Unreachable { reason: Unreachable::Exhausted } => {
            "unreachable".color(colors::UNREACHABLE).bold()
        }
        TerminalState::Unreachable { reason: Unreachable::Rejected(code) } => {
            format!("unreachable (liveness check answered HTTP {code})")
                .color(colors::UNREACHABLE)
                .bold()
        }
    };
    ("State".to_string(), value)
}

pub fn entry_to_details(entry: &ReportEntry) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![address_to_detail(&entry.candidate.address)];
    details.push(state_to_detail(&entry.state));
    details.push(("Tries".to_string(), entry.attempts.to_string().normal()));

    if let TerminalState::Fetched { path } = &entry.state {
        details.push(("File".to_string(), path.display().to_string().color(colors::TEXT_DEFAULT)));
    }
    details
}
