use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Progress of a running sweep, drawn on stderr.
pub struct SweepProgress {
    bar: ProgressBar,
    hosts_up: u64,
}

impl SweepProgress {
    /// Hidden when `quiet` or when stderr is not a terminal.
    pub fn start(total: u64, quiet: bool) -> Self {
        let bar = ProgressBar::new(total);
        if quiet || !console::Term::stderr().is_term() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        let style = ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len} {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(style);
        bar.set_message(format!("{}", "Press Ctrl-C to stop early".italic().white()));
        bar.enable_steady_tick(TICK_INTERVAL);

        Self { bar, hosts_up: 0 }
    }

    pub fn advance(&mut self, reachable: bool) {
        if reachable {
            self.hosts_up += 1;
            self.bar.set_message(format!(
                "Identified {} hosts so far...",
                self.hosts_up.to_string().green().bold()
            ));
        }
        self.bar.inc(1);
    }

    /// Runs `f` with the bar temporarily cleared so plain output is not garbled.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
