//! Storefront Probe CLI library
//!
//! Command definitions, settings layering, progress output and the suite
//! runner behind the `storefront-probe` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ListArgs, OverrideArgs, ReportFormatArg, RunArgs,
    SourceArgs,
};
pub use config::{CliConfig, ColorChoice, Settings, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{listing_line, summary_line, ProgressReporter};
pub use runner::{select, SuiteRunner};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over the `-v`/`-q` level.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
