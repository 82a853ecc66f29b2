//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use storefront_probe::ReportFormat;

/// Storefront Probe: end-to-end cart, favorites, search and checkout checks
#[derive(Parser, Debug)]
#[command(name = "storefront-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the storefront
    Run(RunArgs),

    /// List the scenario catalog
    List(ListArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Where the fixture and run configuration come from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Fixture file (.json, .yaml, .yml)
    #[arg(long, env = "STOREFRONT_PROBE_DATA")]
    pub data: Option<PathBuf>,

    /// Run configuration file (.yaml, .yml, .json)
    #[arg(long, env = "STOREFRONT_PROBE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Flags that override configuration file values
#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct OverrideArgs {
    /// Seed for the random product draw
    #[arg(long, env = "STOREFRONT_PROBE_SEED")]
    pub seed: Option<u64>,

    /// Show the browser window
    #[arg(long, env = "STOREFRONT_PROBE_HEADED")]
    pub headed: bool,

    /// Number of scenarios run concurrently, each on its own session
    #[arg(short = 'j', long, env = "STOREFRONT_PROBE_JOBS")]
    pub jobs: Option<usize>,

    /// Stop scheduling scenarios after the first failure
    #[arg(long, env = "STOREFRONT_PROBE_FAIL_FAST")]
    pub fail_fast: bool,

    /// Element wait window in milliseconds
    #[arg(long, env = "STOREFRONT_PROBE_ELEMENT_TIMEOUT")]
    pub element_timeout: Option<u64>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Select scenarios whose id or name contains this (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Select scenarios carrying any of these tags
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Run against the in-memory storefront instead of a browser
    #[arg(long, env = "STOREFRONT_PROBE_MOCK")]
    pub mock: bool,

    /// Chromium binary (auto-detected when omitted)
    #[arg(long, env = "STOREFRONT_PROBE_CHROMIUM")]
    pub chromium: Option<PathBuf>,

    /// Disable the browser sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Write a report to this path
    #[arg(short, long, env = "STOREFRONT_PROBE_REPORT")]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "json")]
    pub format: ReportFormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only scenarios carrying any of these tags
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Print as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Report format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormatArg {
    /// Suite results as JSON
    #[default]
    Json,
    /// JUnit XML
    Junit,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => Self::Json,
            ReportFormatArg::Junit => Self::Junit,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
