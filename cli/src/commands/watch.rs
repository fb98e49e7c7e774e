use std::time::{Duration, Instant};

use fasthosts_common::config::Config;
use fasthosts_core::HostsDetector;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{Instrument, info, warn};

use crate::terminal::spinner;

use super::detect;

/// Runs a pass immediately and then every `interval` until Ctrl-C.
///
/// The detector, and with it the latency cache, lives for the whole loop.
pub async fn watch(cfg: Config, interval: Duration, json: bool) -> anyhow::Result<()> {
    let detector: HostsDetector = HostsDetector::new(cfg)?.with_progress(spinner::progress_callback());
    let mut ticker: Interval = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Re-running every {:.1} hours, press Ctrl-C to stop", interval.as_secs_f64() / 3600.0);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                return Ok(());
            }
            _ = async {
                ticker.tick().await;
                run_pass(&detector, json).await;
            } => {}
        }
    }
}

async fn run_pass(detector: &HostsDetector, json: bool) {
    let start_time: Instant = Instant::now();
    let outcome = detector
        .detect_and_save()
        .instrument(spinner::progress_span())
        .await;

    match outcome {
        Ok(report) => {
            let output = &detector.config().output_file;
            if let Err(e) = detect::present(&report, output, start_time.elapsed(), json) {
                warn!("Failed to print pass report: {e}");
            }
        }
        Err(e) => warn!("Scheduled pass failed: {e}"),
    }
}
