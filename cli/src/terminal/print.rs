use std::path::Path;
use std::time::Duration;

use colored::*;
use fasthosts_common::models::ResolutionResult;
use fasthosts_core::PassReport;
use tracing::info;

use crate::terminal::colors;
use crate::terminal::logging::PRINT_TARGET;

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 7;

type Detail = (String, ColoredString);

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    let output: String = format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
    print(&output);
}

pub fn as_tree_one_level(key_value_pair: Vec<Detail>) {
    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        let dots: String = ".".repeat(KEY_WIDTH.saturating_sub(key.len()));
        let output: String = format!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
        print(&output);
    }
}

pub fn centerln(msg: &str) {
    let space: String = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}", space, msg));
}

pub fn results(results: &[ResolutionResult]) {
    for (idx, result) in results.iter().enumerate() {
        tree_head(idx, &result.domain);
        as_tree_one_level(result_details(result));
    }
}

fn result_details(result: &ResolutionResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();
    match result.ip {
        Some(ip) => details.push(("IPv4".to_string(), ip.to_string().color(colors::IPV4_ADDR))),
        None => details.push(("IPv4".to_string(), "not found".color(colors::FAILURE))),
    }
    if let Some(latency) = result.latency {
        let color = if latency.is_timed_out() { colors::FAILURE } else { colors::LATENCY };
        details.push(("Latency".to_string(), latency.to_string().color(color)));
    }
    if let Some(error) = &result.error {
        details.push(("Error".to_string(), error.as_str().color(colors::FAILURE)));
    }
    details
}

pub fn summary(report: &PassReport, output: &Path, total_time: Duration) {
    let resolved: ColoredString = format!("{}/{} domains", report.success, report.total).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let line: String = format!("Resolved {resolved} in {total_time}");

    fat_separator();
    centerln(&line);
    match &report.save_error {
        Some(e) => centerln(&format!("{}", e.as_str().red().bold())),
        None => centerln(&format!("Written to {}", output.display().to_string().color(colors::ACCENT))),
    }
    if report.timed_out > 0 {
        centerln(&format!("{}", format!("{} domains did not answer echo", report.timed_out).yellow()));
    }
    if report.failed() > 0 {
        centerln(&format!("{}", format!("{} domains unresolved", report.failed()).yellow()));
    }
}
