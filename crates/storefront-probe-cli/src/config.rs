//! CLI configuration and layering of the run settings.
//!
//! Precedence, lowest first: built-in defaults, the configuration file,
//! `STOREFRONT_PROBE_*` environment variables and command-line flags (the
//! last two arrive together through clap).

use serde::{Deserialize, Serialize};
use storefront_probe::{ProbeConfig, Seed, TestData};

use crate::commands::{OverrideArgs, SourceArgs};
use crate::error::CliResult;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// From the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default tracing filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// Presentation settings shared by every command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Fixture and run configuration after every layer is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Storefront fixture
    pub data: TestData,
    /// Run configuration
    pub probe: ProbeConfig,
}

impl Settings {
    /// Load the files named in `source` and apply `overrides` on top
    pub fn resolve(source: &SourceArgs, overrides: &OverrideArgs) -> CliResult<Self> {
        let data = match &source.data {
            Some(path) => TestData::load(path)?,
            None => TestData::default(),
        };
        let mut probe = match &source.config {
            Some(path) => ProbeConfig::load(path)?,
            None => ProbeConfig::default(),
        };

        apply_overrides(&mut probe, overrides);
        probe.validate()?;
        tracing::debug!(
            data = ?source.data,
            config = ?source.config,
            seed = probe.seed.value(),
            jobs = probe.jobs,
            "settings resolved"
        );
        Ok(Self { data, probe })
    }

    /// Copy fit for printing
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            data: self.data.redacted(),
            probe: self.probe.clone(),
        }
    }
}

fn apply_overrides(probe: &mut ProbeConfig, overrides: &OverrideArgs) {
    if let Some(seed) = overrides.seed {
        probe.seed = Seed::from_u64(seed);
    }
    if overrides.headed {
        probe.headless = false;
    }
    if let Some(jobs) = overrides.jobs {
        probe.jobs = jobs;
    }
    if overrides.fail_fast {
        probe.fail_fast = true;
    }
    if let Some(ms) = overrides.element_timeout {
        probe.element_timeout_ms = ms;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
        }

        #[test]
        fn test_log_level() {
            assert_eq!(Verbosity::Normal.log_level(), "warn");
            assert_eq!(Verbosity::Debug.log_level(), "debug");
            assert!(Verbosity::Debug.is_verbose());
            assert!(!Verbosity::Normal.is_verbose());
        }

        #[test]
        fn test_color_choice() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod settings_tests {
        use super::*;

        #[test]
        fn test_defaults_without_files() {
            let settings =
                Settings::resolve(&SourceArgs::default(), &OverrideArgs::default()).unwrap();
            assert_eq!(settings.data, TestData::default());
            assert_eq!(settings.probe, ProbeConfig::default());
        }

        #[test]
        fn test_flags_override_file() {
            let file = write_temp(".yaml", "jobs: 2\nseed: 11\nheadless: true\n");
            let source = SourceArgs {
                data: None,
                config: Some(file.path().to_path_buf()),
            };
            let overrides = OverrideArgs {
                seed: Some(99),
                headed: true,
                ..OverrideArgs::default()
            };
            let settings = Settings::resolve(&source, &overrides).unwrap();
            assert_eq!(settings.probe.jobs, 2);
            assert_eq!(settings.probe.seed.value(), 99);
            assert!(!settings.probe.headless);
        }

        #[test]
        fn test_invalid_override_rejected() {
            let overrides = OverrideArgs {
                jobs: Some(0),
                ..OverrideArgs::default()
            };
            let err = Settings::resolve(&SourceArgs::default(), &overrides).unwrap_err();
            assert!(err.to_string().contains("jobs"));
        }

        #[test]
        fn test_fixture_loaded_and_redacted() {
            let file = write_temp(
                ".json",
                r#"{"homePageUrl":"https://shop.test/","login":{"email":"a@b.c","password":"secret"}}"#,
            );
            let source = SourceArgs {
                data: Some(file.path().to_path_buf()),
                config: None,
            };
            let settings = Settings::resolve(&source, &OverrideArgs::default()).unwrap();
            assert_eq!(settings.data.home_page_url, "https://shop.test/");
            let printed = serde_yaml_ng::to_string(&settings.redacted()).unwrap();
            assert!(!printed.contains("secret"));
            assert!(printed.contains("a@b.c"));
        }

        #[test]
        fn test_missing_file_is_error() {
            let source = SourceArgs {
                data: Some("/nonexistent/fixture.json".into()),
                config: None,
            };
            assert!(Settings::resolve(&source, &OverrideArgs::default()).is_err());
        }
    }
}
