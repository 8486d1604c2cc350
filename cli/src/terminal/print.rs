use colored::*;
use sweepr_common::network::range::Ipv4Range;
use sweepr_core::report::{CancelReason, HostRecord, ScanReport, SweepOutcome};

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
const MAX_UNFINISHED_SHOWN: usize = 10;

/// Decorations go to stderr, result lines to stdout.
pub fn print(msg: &str) {
    eprintln!("{msg}");
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = console::measure_text_width(&formatted);

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

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

pub fn sweep_banner(range: Ipv4Range) {
    header(&format!("sweepr v{}", env!("CARGO_PKG_VERSION")));
    centerln(&format!(
        "{} {} {}",
        range.start().to_string().color(colors::IPV4_ADDR),
        "→".color(colors::SEPARATOR),
        range.end().to_string().color(colors::IPV4_ADDR)
    ));
    centerln(&format!(
        "{}",
        format!("{} addresses", range.width()).color(colors::MUTED)
    ));
    fat_separator();
}

/// One `<ip> - <name>` line; unreachable hosts only differ in color.
pub fn host_line(record: &HostRecord) {
    println!("{}", host_text(record));
}

fn host_text(record: &HostRecord) -> String {
    let sep = "-".color(colors::SEPARATOR);
    if record.reachable {
        format!(
            "{} {} {}",
            record.address.to_string().color(colors::IPV4_ADDR),
            sep,
            record.display_name().color(colors::PRIMARY)
        )
    } else {
        format!(
            "{} {} {}",
            record.address.to_string().color(colors::MUTED),
            sep,
            record.display_name().color(colors::MUTED)
        )
    }
}

pub fn summary(report: &ScanReport) {
    fat_separator();
    let up = report.reachable().count();
    let status: ColoredString = match report.outcome() {
        SweepOutcome::Completed => "complete".green().bold(),
        SweepOutcome::Cancelled(reason) => cancel_text(reason).yellow().bold(),
    };
    print(&format!(
        "{} {} of {} addresses answered in {:.2}s ({})",
        ">".color(colors::SEPARATOR),
        up.to_string().color(colors::ACCENT).bold(),
        report.range().width(),
        report.elapsed().as_secs_f64(),
        status
    ));

    if !report.is_complete() {
        print(&format!(
            "{} {} addresses were not swept:",
            ">".color(colors::SEPARATOR),
            report.unfinished_count().to_string().yellow().bold()
        ));
        for line in unfinished_lines(report.unfinished()) {
            print(&format!("  {}", line.color(colors::TEXT_DEFAULT)));
        }
    }
}

pub fn cancel_text(reason: CancelReason) -> &'static str {
    match reason {
        CancelReason::BudgetExhausted => "time budget exhausted",
        CancelReason::Aborted => "stopped by user",
        CancelReason::WorkerFailed => "a worker failed",
    }
}

pub fn unfinished_lines(gaps: &[Ipv4Range]) -> Vec<String> {
    let mut lines: Vec<String> = gaps
        .iter()
        .take(MAX_UNFINISHED_SHOWN)
        .map(ToString::to_string)
        .collect();
    if gaps.len() > MAX_UNFINISHED_SHOWN {
        lines.push(format!("... and {} more", gaps.len() - MAX_UNFINISHED_SHOWN));
    }
    lines
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
