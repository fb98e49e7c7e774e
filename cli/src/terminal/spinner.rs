use std::sync::Arc;

use fasthosts_core::orchestrator::ProgressCallback;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Span shown as a progress bar for the duration of one pass.
pub fn progress_span() -> Span {
    let span: Span = info_span!("resolving", indicatif.pb_show = true);
    span.pb_set_style(&style());
    span.pb_set_message("Resolving domains...");
    span
}

/// Advances the bar of the pass span the orchestrator is running in.
pub fn progress_callback() -> ProgressCallback {
    Arc::new(|completed: usize, total: usize| {
        let span: Span = Span::current();
        span.pb_set_length(total as u64);
        span.pb_set_position(completed as u64);
    })
}

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}
