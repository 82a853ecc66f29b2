//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use storefront_probe::{Scenario, ScenarioResult, ScenarioStatus, SuiteResults};

/// Progress reporter for a suite run. Writes to stderr so stdout stays
/// free for `list` and `config` output.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            spinner: None,
            use_color,
            quiet,
        }
    }

    /// Spin while the suite runs
    pub fn start_spinner(&mut self, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(pb);
    }

    /// Clear the spinner
    pub fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message (shown in quiet mode too)
    pub fn failure(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "SKIP".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// One line per scenario, failures followed by their error
    pub fn scenario(&self, result: &ScenarioResult) {
        let line = format!("{} ({}ms)", result.id, result.duration_ms);
        match result.status {
            ScenarioStatus::Passed => self.success(&line),
            ScenarioStatus::Skipped => self.warning(&format!("{} (not run)", result.id)),
            ScenarioStatus::Failed => {
                self.failure(&line);
                if let Some(error) = &result.error {
                    let _ = self.term.write_line(&format!("    {error}"));
                }
            }
        }
    }

    /// Print every scenario then the totals
    pub fn suite(&self, results: &SuiteResults) {
        for result in &results.results {
            self.scenario(result);
        }
        self.summary(results);
    }

    /// Print suite summary
    pub fn summary(&self, results: &SuiteResults) {
        let failed = results.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&summary_line(results, self.use_color));
    }
}

/// `PASSED 9 scenarios in 1.20s (9 passed, 0 failed, 0 skipped) seed 24301`
#[must_use]
pub fn summary_line(results: &SuiteResults, use_color: bool) -> String {
    let passed = results.passed_count();
    let failed = results.failed_count();
    let skipped = results.skipped_count();
    let total = results.total();
    let secs = Duration::from_millis(results.duration_ms).as_secs_f64();
    let seed = results.seed;

    if use_color {
        let passed_style = Style::new().green().bold();
        let failed_style = Style::new().red().bold();
        let skipped_style = Style::new().yellow();

        let status = if results.all_passed() {
            passed_style.apply_to("PASSED")
        } else {
            failed_style.apply_to("FAILED")
        };

        format!(
            "{status} {total} scenarios in {secs:.2}s ({} passed, {} failed, {} skipped) seed {seed}",
            passed_style.apply_to(passed),
            if failed > 0 {
                failed_style.apply_to(failed).to_string()
            } else {
                failed.to_string()
            },
            skipped_style.apply_to(skipped)
        )
    } else {
        let status = if results.all_passed() { "PASSED" } else { "FAILED" };
        format!(
            "{status} {total} scenarios in {secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped) seed {seed}"
        )
    }
}

/// Catalog line: id, name and tags
#[must_use]
pub fn listing_line(scenario: &Scenario) -> String {
    format!(
        "{:<30} {:<55} [{}]",
        scenario.id,
        scenario.name,
        scenario.tags.join(", ")
    )
}
