//! Suite runner: selection, session factory choice, reporting

use std::sync::Arc;

use storefront_probe::{
    scenario, write_report, BrowserOptions, MockSessionFactory, ReportFormat, Scenario,
    SessionFactory, SuiteResults, TestHarness,
};
use tracing::info;

use crate::commands::RunArgs;
use crate::config::{CliConfig, Settings};
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;

/// Runs the selected scenarios and reports them
#[derive(Debug)]
pub struct SuiteRunner {
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { reporter }
    }

    /// Run the suite described by `args`.
    ///
    /// Returns the results whatever their outcome; the caller decides the
    /// exit code.
    pub async fn run(&mut self, args: &RunArgs) -> CliResult<SuiteResults> {
        let settings = Settings::resolve(&args.source, &args.overrides)?;
        let selected = select(args.filter.as_deref(), &args.tags)?;
        info!(
            selected = selected.len(),
            mock = args.mock,
            headless = settings.probe.headless,
            "starting suite"
        );

        let data = Arc::new(settings.data);
        let harness = TestHarness::new(settings.probe, Arc::clone(&data));

        self.reporter.start_spinner(&format!(
            "running {} scenario(s){}",
            selected.len(),
            if args.mock { " against the mock storefront" } else { "" }
        ));
        let results = if args.mock {
            let factory = MockSessionFactory::new(&data);
            execute(&harness, &factory, &selected).await
        } else {
            let options = browser_options(args, harness.config().headless);
            run_in_browser(&harness, options, &selected).await
        };
        self.reporter.finish();
        let results = results?;

        self.reporter.suite(&results);
        if let Some(path) = &args.report {
            let format = ReportFormat::from(args.format);
            write_report(&results, format, path)?;
            self.reporter
                .info(&format!("{format} report written to {}", path.display()));
        }
        Ok(results)
    }
}

/// Catalog entries matching the filter and tags; empty is an error
pub fn select(filter: Option<&str>, tags: &[String]) -> CliResult<Vec<&'static Scenario>> {
    let selected = scenario::select(filter, tags);
    if selected.is_empty() {
        return Err(CliError::NoScenarios {
            filter: filter.unwrap_or("-").to_string(),
            tags: if tags.is_empty() {
                "-".to_string()
            } else {
                tags.join(",")
            },
        });
    }
    Ok(selected)
}

fn browser_options(args: &RunArgs, headless: bool) -> BrowserOptions {
    let mut options = BrowserOptions::default().with_headless(headless);
    if let Some(path) = &args.chromium {
        options = options.with_chromium_path(path);
    }
    if args.no_sandbox {
        options = options.with_no_sandbox();
    }
    options
}

async fn execute<F: SessionFactory>(
    harness: &TestHarness,
    factory: &F,
    selected: &[&Scenario],
) -> CliResult<SuiteResults> {
    Ok(harness.run(factory, selected).await)
}

#[cfg(feature = "browser")]
async fn run_in_browser(
    harness: &TestHarness,
    options: BrowserOptions,
    selected: &[&Scenario],
) -> CliResult<SuiteResults> {
    let factory = storefront_probe::ChromiumSessionFactory::new(options);
    execute(harness, &factory, selected).await
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn run_in_browser(
    _harness: &TestHarness,
    _options: BrowserOptions,
    _selected: &[&Scenario],
) -> CliResult<SuiteResults> {
    Err(CliError::BrowserUnavailable)
}
