use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use fasthosts_common::config::Config;
use fasthosts_common::models::{Latency, ResolutionResult};
use fasthosts_core::HostsDetector;
use fasthosts_core::hosts;

use crate::support::{ActivityGauge, TablePinger, TableSource, domains};

fn config(max_concurrent: usize, denylist: &[&str]) -> Config {
    Config {
        max_concurrent,
        denylist: denylist.iter().map(|ip| ip.parse().unwrap()).collect(),
        ..Config::default()
    }
}

fn detector(cfg: Config, dns: Arc<TableSource>, web: Arc<TableSource>, pinger: Arc<TablePinger>) -> HostsDetector {
    HostsDetector::with_components(cfg, dns, web, pinger)
}

#[tokio::test]
async fn resolves_known_domain_and_reports_unknown_one() {
    let dns = Arc::new(TableSource::new().answer("a.example", &["10.0.0.1"]));
    let web = Arc::new(TableSource::new());
    let pinger = Arc::new(TablePinger::new().rtt("10.0.0.1", &[15, 12, 30]));
    let det: HostsDetector = detector(config(10, &["10.0.0.2"]), dns, web, pinger);

    let results: Vec<ResolutionResult> = det.resolve_all(&domains(&["a.example", "b.example"])).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].domain, "a.example");
    assert_eq!(results[0].ip, Some(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(results[0].latency, Some(Latency::Measured(Duration::from_millis(15))));
    assert!(results[0].error.is_none());

    assert_eq!(results[1].domain, "b.example");
    assert_eq!(results[1].ip, None);
    assert_eq!(results[1].error.as_deref(), Some("no valid address found"));
}

#[tokio::test]
async fn output_order_ignores_completion_order() {
    let names: Vec<String> = domains(&["slow.example", "mid.example", "fast.example", "none.example"]);
    let dns = Arc::new(
        TableSource::new()
            .answer("slow.example", &["10.0.1.1"])
            .answer("mid.example", &["10.0.1.2"])
            .answer("fast.example", &["10.0.1.3"])
            .delay("slow.example", Duration::from_millis(90))
            .delay("mid.example", Duration::from_millis(45))
            .delay("none.example", Duration::from_millis(60)),
    );
    let pinger = Arc::new(TablePinger::new().rtt("10.0.1.1", &[1]).rtt("10.0.1.2", &[1]).rtt("10.0.1.3", &[1]));
    let det: HostsDetector = detector(config(10, &[]), dns, Arc::new(TableSource::new()), pinger);

    let results: Vec<ResolutionResult> = det.resolve_all(&names).await;

    let order: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(order, vec!["slow.example", "mid.example", "fast.example", "none.example"]);
}

#[tokio::test]
async fn concurrency_limit_bounds_active_domains() {
    const LIMIT: usize = 3;
    let names: Vec<String> = (0..12).map(|i| format!("d{i}.example")).collect();

    // Each domain has one address, so a domain is either looking up or pinging.
    let activity: Arc<ActivityGauge> = Arc::new(ActivityGauge::default());
    let mut dns: TableSource = TableSource::new()
        .default_delay(Duration::from_millis(20))
        .gauge(Arc::clone(&activity));
    let mut pinger: TablePinger = TablePinger::new()
        .delay(Duration::from_millis(20))
        .gauge(Arc::clone(&activity));
    for (i, name) in names.iter().enumerate() {
        let ip: String = format!("10.0.5.{i}");
        dns = dns.answer(name, &[ip.as_str()]);
        pinger = pinger.rtt(&ip, &[2]);
    }
    let dns: Arc<TableSource> = Arc::new(dns);
    let pinger: Arc<TablePinger> = Arc::new(pinger);
    let det: HostsDetector = detector(
        config(LIMIT, &[]),
        Arc::clone(&dns),
        Arc::new(TableSource::new()),
        Arc::clone(&pinger),
    );

    let results: Vec<ResolutionResult> = det.resolve_all(&names).await;

    assert!(results.iter().all(ResolutionResult::is_success));
    assert_eq!(dns.calls(), names.len());
    assert_eq!(pinger.calls(), names.len());
    assert!(activity.peak() <= LIMIT, "peak was {}", activity.peak());
    assert!(activity.peak() > 1, "domains were not resolved concurrently");
}

#[tokio::test]
async fn failing_domains_do_not_affect_siblings() {
    let dns = Arc::new(
        TableSource::new()
            .answer("ok1.example", &["10.0.2.1"])
            .answer("denied.example", &["10.0.0.2", "127.0.0.1"])
            .answer("ok2.example", &["10.0.2.2"]),
    );
    let web = Arc::new(TableSource::new().answer("garbage.example", &["999.0.0.1", "1.2.3"]));
    let pinger = Arc::new(TablePinger::new().rtt("10.0.2.1", &[3]).rtt("10.0.2.2", &[4]));
    let det: HostsDetector = detector(config(2, &["10.0.0.2", "127.0.0.1"]), dns, web, pinger);

    let names: Vec<String> = domains(&["ok1.example", "denied.example", "garbage.example", "ok2.example"]);
    let results: Vec<ResolutionResult> = det.resolve_all(&names).await;

    let succeeded: Vec<bool> = results.iter().map(ResolutionResult::is_success).collect();
    assert_eq!(succeeded, vec![true, false, false, true]);
    assert!(results[1].error.as_deref().is_some_and(|e| !e.is_empty()));
    assert!(results[2].error.as_deref().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn sources_are_merged_and_fastest_candidate_wins() {
    let dns = Arc::new(TableSource::new().answer("github.com", &["140.82.112.3", "140.82.112.4"]));
    let web = Arc::new(TableSource::new().answer("github.com", &["140.82.112.4", "140.82.114.4", "1.0.1.1"]));
    let pinger = Arc::new(
        TablePinger::new()
            .rtt("140.82.112.3", &[180, 170, 175])
            .rtt("140.82.112.4", &[90, 400, 95])
            .rtt("140.82.114.4", &[]),
    );
    let det: HostsDetector = detector(config(10, &["1.0.1.1"]), dns, web, Arc::clone(&pinger));

    let results: Vec<ResolutionResult> = det.resolve_all(&domains(&["github.com"])).await;

    assert_eq!(results[0].ip, Some(Ipv4Addr::new(140, 82, 112, 4)));
    assert_eq!(results[0].latency, Some(Latency::Measured(Duration::from_millis(95))));
    assert_eq!(pinger.calls(), 3);
    assert_eq!(pinger.calls_for("1.0.1.1"), 0);
}

#[tokio::test]
async fn shared_address_is_probed_once_per_process() {
    let dns = Arc::new(
        TableSource::new()
            .answer("a.example", &["10.0.3.1"])
            .answer("b.example", &["10.0.3.1"])
            .answer("c.example", &["10.0.3.1", "10.0.3.2"]),
    );
    let pinger = Arc::new(
        TablePinger::new()
            .rtt("10.0.3.1", &[8])
            .rtt("10.0.3.2", &[9])
            .delay(Duration::from_millis(30)),
    );
    let det: HostsDetector =
        detector(config(10, &[]), dns, Arc::new(TableSource::new()), Arc::clone(&pinger));
    let names: Vec<String> = domains(&["a.example", "b.example", "c.example"]);

    let first: Vec<ResolutionResult> = det.resolve_all(&names).await;
    let second: Vec<ResolutionResult> = det.resolve_all(&names).await;

    assert_eq!(pinger.calls_for("10.0.3.1"), 1);
    assert_eq!(pinger.calls_for("10.0.3.2"), 1);
    assert_eq!(first, second);
    assert_eq!(det.cache().len(), 2);
}

#[tokio::test]
async fn unreachable_candidates_are_kept_and_marked() {
    let dns = Arc::new(TableSource::new().answer("dark.example", &["10.0.4.2", "10.0.4.1"]));
    let det: HostsDetector =
        detector(config(10, &[]), dns, Arc::new(TableSource::new()), Arc::new(TablePinger::new()));

    let results: Vec<ResolutionResult> = det.resolve_all(&domains(&["dark.example"])).await;

    assert_eq!(results[0].ip, Some(Ipv4Addr::new(10, 0, 4, 1)));
    assert_eq!(results[0].latency, Some(Latency::TimedOut));
    assert!(hosts::render_line(&results[0]).ends_with(hosts::TIMEOUT_ANNOTATION));
}

#[tokio::test]
async fn rendered_mapping_has_one_line_per_result() {
    let dns = Arc::new(TableSource::new().answer("a.example", &["10.0.0.1"]));
    let pinger = Arc::new(TablePinger::new().rtt("10.0.0.1", &[5]));
    let det: HostsDetector = detector(config(10, &[]), dns, Arc::new(TableSource::new()), pinger);

    let results: Vec<ResolutionResult> = det.resolve_all(&domains(&["a.example", "b.example"])).await;
    let content: String = det.render(&results, "2026-10-19 08:00:00");

    let data: Vec<&str> = content.lines().filter(|l| l.contains(".example")).collect();
    assert_eq!(data.len(), 2);
    assert!(data[0].starts_with("10.0.0.1 "));
    assert!(data[0].ends_with(" a.example"));
    assert!(data[1].starts_with("# IP Address Not Found"));
    assert!(data[1].ends_with(" b.example"));
    assert!(!content.contains("# Timeout"));
}
