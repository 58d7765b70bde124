use std::time::{Duration, Instant};

use colored::*;
use leasefetch_common::config::{Config, ProbeMode};
use leasefetch_common::device::{Candidate, Report};
use leasefetch_core::pipeline::{self, Observer};
use leasefetch_core::probe::RoundReport;

use crate::lprint;
use crate::terminal::{colors, format, print, spinner};

/// Follows the pipeline on the terminal.
struct TerminalObserver {
    quiet: u8,
}

impl Observer for TerminalObserver {
    fn leases_loaded(&mut self, candidates: &[Candidate]) {
        if candidates.is_empty() {
            return;
        }
        print::header("probing devices", self.quiet);
        if self.quiet < 2 {
            spinner::start(&format!("Waiting for {} devices to wake up...", candidates.len()));
        }
    }

    fn round_finished(&mut self, report: &RoundReport) {
        spinner::report_round(report);
    }

    fn probing_finished(&mut self) {
        spinner::stop();
        print::header("fetching configurations", self.quiet);
    }
}

pub async fn fetch(cfg: &Config, quiet: u8) -> anyhow::Result<()> {
    print_settings(cfg, quiet);

    let start_time: Instant = Instant::now();
    let mut observer = TerminalObserver { quiet };
    let result = pipeline::run(cfg, &mut observer).await;
    spinner::stop();

    let report: Report = result?;
    fetch_ends(&report, start_time.elapsed(), quiet);
    Ok(())
}

fn print_settings(cfg: &Config, quiet: u8) {
    if quiet > 0 {
        return;
    }

    print::header("configuration", quiet);
    print::GLOBAL_KEY_WIDTH.set(8);
    print::aligned_line("Leases", cfg.lease_source.to_string());
    print::aligned_line("Output", cfg.output_dir.display().to_string());

    let probe: String = match cfg.probe.mode {
        ProbeMode::Http => format!("HEAD :{}{}", cfg.port, cfg.probe.path),
        ProbeMode::Tcp => format!("TCP connect :{}", cfg.port),
    };
    print::aligned_line("Probe", probe);

    let mut bound: String = format!("{} rounds every {:?}", cfg.probe.max_attempts, cfg.probe.interval);
    if let Some(limit) = cfg.probe.max_duration {
        bound.push_str(&format!(", at most {limit:?}"));
    }
    print::aligned_line("Bound", bound);
    print::aligned_line("Fetch", format!("GET :{}{}", cfg.port, cfg.fetch.path));
}

fn fetch_ends(report: &Report, total_time: Duration, quiet: u8) {
    if report.is_empty() {
        print::header("nothing to do", quiet);
        print::no_candidates();
        return;
    }

    if quiet < 2 {
        print::header("fetch summary", quiet);
        print_entries(report);
    }
    print_summary(report, total_time, quiet);
}

fn print_entries(report: &Report) {
    for (idx, entry) in report.entries.iter().enumerate() {
        print::tree_head(idx, entry.candidate.hostname_or("No hostname"));
        print::as_tree_one_level(format::entry_to_details(entry));
        if idx + 1 != report.len() {
            lprint!();
        }
    }
}

fn print_summary(report: &Report, total_time: Duration, quiet: u8) {
    let fetched: ColoredString = format!("{} fetched", report.fetched()).color(colors::FETCHED).bold();
    let failed: ColoredString = format!("{} failed", report.failed()).color(colors::FAILED).bold();
    let unreachable: ColoredString =
        format!("{} unreachable", report.unreachable()).color(colors::UNREACHABLE).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Run Complete: {fetched}, {failed}, {unreachable} in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            lprint!(&output);
        }
    }
}
