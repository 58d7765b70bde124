use leasefetch_common::config::ProbeMode;
use leasefetch_common::device::{FetchStatus, Report, TerminalState, Unreachable};
use leasefetch_core::pipeline::{self, NoopObserver};

use crate::utils::{Behaviour, config_for, files_in, start_lab, write_leases};

async fn run(cfg: &leasefetch_common::config::Config) -> Report {
    pipeline::run(cfg, &mut NoopObserver)
        .await
        .expect("pipeline run failed")
}

/// Two awake devices serving `A` and `B` end up as two files with those bodies.
#[tokio::test]
async fn two_devices_are_fetched() {
    let lab = start_lab(&[(10, Behaviour::Serves("A")), (11, Behaviour::Serves("B"))]).await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    let out = dir.path().join("out");
    write_leases(&leases, &[(10, "esp-kitchen"), (11, "esp-bath")]);

    let report = run(&config_for(&leases, &out, lab.port)).await;

    assert_eq!(report.fetched(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.unreachable(), 0);
    assert_eq!(
        files_in(&out),
        vec!["127-0-0-10_esp-kitchen.dat", "127-0-0-11_esp-bath.dat"]
    );
    assert_eq!(std::fs::read_to_string(out.join("127-0-0-10_esp-kitchen.dat")).unwrap(), "A");
    assert_eq!(std::fs::read_to_string(out.join("127-0-0-11_esp-bath.dat")).unwrap(), "B");
}

#[tokio::test]
async fn failed_download_does_not_affect_other_devices() {
    let lab = start_lab(&[
        (20, Behaviour::FailsFetch(500)),
        (21, Behaviour::Serves("ok")),
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    write_leases(&leases, &[(20, "esp-broken"), (21, "esp-fine")]);

    let report = run(&config_for(&leases, dir.path(), lab.port)).await;

    assert_eq!(
        report.entries[0].state,
        TerminalState::FetchFailed { status: FetchStatus::HttpError(500) }
    );
    assert!(matches!(report.entries[1].state, TerminalState::Fetched { .. }));
    assert!(!dir.path().join("127-0-0-20_esp-broken.dat").exists());
    assert!(dir.path().join("127-0-0-21_esp-fine.dat").exists());
}

#[tokio::test]
async fn silent_device_is_unreachable_and_leaves_no_file() {
    let lab = start_lab(&[(30, Behaviour::Serves("cfg"))]).await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    let out = dir.path().join("out");
    write_leases(&leases, &[(30, "esp-awake"), (31, "esp-asleep")]);
    let mut cfg = config_for(&leases, &out, lab.port);
    cfg.probe.max_attempts = 2;

    let report = run(&cfg).await;

    assert_eq!(report.fetched(), 1);
    assert_eq!(
        report.entries[1].state,
        TerminalState::Unreachable { reason: Unreachable::Exhausted }
    );
    assert_eq!(report.entries[1].attempts, 2);
    assert_eq!(files_in(&out), vec!["127-0-0-30_esp-awake.dat"]);
}

#[tokio::test]
async fn late_waking_device_is_found_in_a_later_round() {
    let lab = start_lab(&[(40, Behaviour::WakesAfter(2, "late"))]).await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    write_leases(&leases, &[(40, "esp-sleepy")]);

    let report = run(&config_for(&leases, dir.path(), lab.port)).await;

    assert_eq!(report.fetched(), 1);
    assert_eq!(report.entries[0].attempts, 3);
}

#[tokio::test]
async fn host_failing_the_liveness_check_is_not_fetched() {
    let lab = start_lab(&[(50, Behaviour::NotADevice(404))]).await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    let out = dir.path().join("out");
    write_leases(&leases, &[(50, "printer")]);

    let report = run(&config_for(&leases, &out, lab.port)).await;

    assert_eq!(
        report.entries[0].state,
        TerminalState::Unreachable { reason: Unreachable::Rejected(404) }
    );
    assert_eq!(report.entries[0].attempts, 1);
    assert!(files_in(&out).is_empty());
}

#[tokio::test]
async fn rerun_overwrites_with_identical_content() {
    let lab = start_lab(&[(60, Behaviour::Serves("same config"))]).await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    let out = dir.path().join("out");
    write_leases(&leases, &[(60, "esp-stable")]);
    let cfg = config_for(&leases, &out, lab.port);

    run(&cfg).await;
    let first = std::fs::read(out.join("127-0-0-60_esp-stable.dat")).unwrap();
    run(&cfg).await;
    let second = std::fs::read(out.join("127-0-0-60_esp-stable.dat")).unwrap();

    assert_eq!(first, second);
    assert_eq!(files_in(&out).len(), 1);
}

#[tokio::test]
async fn hostname_prefix_limits_the_candidates() {
    let lab = start_lab(&[(70, Behaviour::Serves("esp")), (71, Behaviour::Serves("other"))]).await;
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    let out = dir.path().join("out");
    write_leases(&leases, &[(70, "ESP-garage"), (71, "laptop")]);
    let mut cfg = config_for(&leases, &out, lab.port);
    cfg.hostname_prefix = Some("esp-".to_string());

    let report = run(&cfg).await;

    assert_eq!(report.len(), 1);
    assert_eq!(files_in(&out), vec!["127-0-0-70_ESP-garage.dat"]);
}

#[tokio::test]
async fn tcp_probe_mode_skips_the_http_liveness_check() {
    let lab = start_lab(&[(80, Behaviour::NotADevice(404))]).await;
    for server in &lab.servers {
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("raw"))
            .mount(server)
            .await;
    }
    let dir = tempfile::tempdir().unwrap();
    let leases = dir.path().join("dnsmasq.leases");
    write_leases(&leases, &[(80, "esp-tcp")]);
    let mut cfg = config_for(&leases, dir.path(), lab.port);
    cfg.probe.mode = ProbeMode::Tcp;

    let report = run(&cfg).await;

    assert_eq!(report.fetched(), 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("127-0-0-80_esp-tcp.dat")).unwrap(),
        "raw"
    );
}
