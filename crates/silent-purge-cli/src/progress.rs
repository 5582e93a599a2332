use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use silent_purge_core::{PurgeReporter, Volume};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

/// Console reporter: a spinner while batches run, plus one line per flagged file on stdout.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    /// Print above the spinner without tearing it.
    fn print_line(&self, line: String) {
        match self.bar.borrow().as_ref() {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }
}

impl PurgeReporter for CliReporter {
    fn on_run_start(&self, root: &Path) {
        self.finish_bar();
        *self.bar.borrow_mut() = Some(Self::spinner(format!("Scanning {}...", root.display())));
    }

    fn on_batch_start(&self, batch_index: usize, files: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Batch {}: checking {} files", batch_index + 1, files));
        }
    }

    fn on_batch_complete(&self, batch_index: usize, cache_hits: usize, measured: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!(
                "Batch {}: {} cached, {} measured",
                batch_index + 1,
                cache_hits,
                measured
            ));
        }
    }

    fn on_flagged(&self, path: &Path, volume: Volume) {
        self.print_line(format!(
            "File: {}, max_volume={}.",
            path.display(),
            format!("{}", volume).yellow()
        ));
    }

    fn on_deleted(&self, _path: &Path) {
        self.print_line(format!("{}", "> Deleted.".red()));
    }

    fn on_delete_failed(&self, _path: &Path, error: &str) {
        self.print_line(format!("{} {}", "> Delete failed:".red().bold(), error));
    }

    fn on_run_complete(&self, files_seen: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Checked {} media files in {:.2}s",
            "✓".green(),
            files_seen,
            duration_secs
        );
    }
}
