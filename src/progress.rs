//! Progress reporting for the experiment run
//!
//! Real-time status display using an indicatif spinner, plus the styled
//! header and summary blocks printed around a run.

use crate::measure::SizeSummary;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Progress reporter that displays experiment status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Announce a trial that is about to run
    pub fn trial_started(&self, size: u64, trial: usize, trials: usize) {
        self.bar.set_message(format!(
            "Size {} | Trial {}/{}...",
            format_number(size),
            trial,
            trials
        ));
    }

    /// Update the display after a finished trial
    pub fn trial_finished(&self, size: u64, trial: usize, trials: usize, prime_count: u64) {
        self.bar.set_message(format!(
            "Size {} | Trial {}/{} | Primes: {}",
            format_number(size),
            trial,
            trials,
            format_number(prime_count)
        ));
    }

    /// Print the per-size summary block above the spinner
    pub fn size_finished(&self, summary: &SizeSummary) {
        self.bar.println(format!(
            "  {} {} -> {} primes, avg {:.0} us, parallel {:.1}%, max speedup {:.2}x",
            style("Size").bold(),
            format_number(summary.size),
            format_number(summary.prime_count),
            summary.mean_total_us,
            summary.parallel_fraction() * 100.0,
            summary.max_speedup(),
        ));
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a header at the start of a run
pub fn print_header(sizes: &[u64], workers: usize, trials: usize, output_dir: &str) {
    let size_list = sizes
        .iter()
        .map(|&s| format_number(s))
        .collect::<Vec<_>>()
        .join(", ");

    println!();
    println!(
        "{} {}",
        style("amdahl-sieve").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Sizes:").bold(), size_list);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Trials:").bold(), trials);
    println!("  {} {}", style("Output:").bold(), output_dir);
    println!();
}

/// Print a summary of the whole run
pub fn print_summary(
    summaries: &[SizeSummary],
    duration: Duration,
    csv_path: &Path,
    txt_path: &Path,
) {
    println!();
    println!("{}", style("Experiments Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    for summary in summaries {
        println!(
            "  {} {}: {} primes, parallel fraction {:.1}%, max speedup {:.2}x",
            style("N =").bold(),
            format_number(summary.size),
            format_number(summary.prime_count),
            summary.parallel_fraction() * 100.0,
            summary.max_speedup(),
        );
    }
    println!(
        "  {} {:.1}s",
        style("Duration:").bold(),
        duration.as_secs_f64()
    );
    println!("  {} {}", style("CSV:").bold(), csv_path.display());
    println!("  {} {}", style("Text:").bold(), txt_path.display());
    println!();
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
