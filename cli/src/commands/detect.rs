use std::path::Path;
use std::time::{Duration, Instant};

use fasthosts_common::config::Config;
use fasthosts_core::{HostsDetector, PassReport};
use tracing::Instrument;

use crate::terminal::{print, spinner};

pub async fn detect(cfg: Config, json: bool) -> anyhow::Result<()> {
    let detector: HostsDetector = HostsDetector::new(cfg)?.with_progress(spinner::progress_callback());

    let start_time: Instant = Instant::now();
    let report: PassReport = detector
        .detect_and_save()
        .instrument(spinner::progress_span())
        .await?;

    present(&report, &detector.config().output_file, start_time.elapsed(), json)
}

pub fn present(report: &PassReport, output: &Path, total_time: Duration, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print::header("resolved hosts");
    print::results(&report.results);
    print::summary(report, output, total_time);
    Ok(())
}
