//! Run configuration.
//!
//! Timeouts, the random-draw seed, price policies and runner knobs. Loaded
//! from YAML (or JSON); the CLI layers its flags and `STOREFRONT_PROBE_*`
//! environment variables on top.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver::BrowserDriver;
use crate::picker::Seed;
use crate::price::{DiscountRule, PriceTolerance};
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use crate::wait::WaitOptions;

/// Configuration for a probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Wait window for element resolution
    pub element_timeout_ms: u64,
    /// Wait window for an intercepted call to complete
    pub intercept_timeout_ms: u64,
    /// Wait window for URL changes and page loads
    pub navigation_timeout_ms: u64,
    /// Polling interval for every wait
    pub poll_interval_ms: u64,
    /// Seed for the random product draw
    pub seed: Seed,
    /// How displayed totals are compared
    pub price_tolerance: PriceTolerance,
    /// Bundle discount rule
    pub discount_rule: DiscountRule,
    /// Run the browser without a window
    pub headless: bool,
    /// Scenarios run concurrently, each on its own session
    pub jobs: usize,
    /// Stop scheduling scenarios after the first failure
    pub fail_fast: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            element_timeout_ms: 4_000,
            intercept_timeout_ms: 10_000,
            navigation_timeout_ms: 30_000,
            poll_interval_ms: 50,
            seed: Seed::default(),
            price_tolerance: PriceTolerance::Exact,
            discount_rule: DiscountRule::literal_bundle(),
            headless: true,
            jobs: 1,
            fail_fast: false,
        }
    }
}

impl ProbeConfig {
    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml" | "yml") => serde_yaml_ng::from_str(&content)?,
            _ => {
                return Err(ProbeError::Config {
                    message: format!("unsupported config format: {}", path.display()),
                })
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the values make sense together
    pub fn validate(&self) -> ProbeResult<()> {
        if self.jobs == 0 {
            return Err(config_error("jobs must be at least 1"));
        }
        if self.poll_interval_ms == 0 {
            return Err(config_error("poll_interval_ms must be positive"));
        }
        if self.poll_interval_ms > self.element_timeout_ms {
            return Err(config_error(format!(
                "poll_interval_ms ({}) exceeds element_timeout_ms ({})",
                self.poll_interval_ms, self.element_timeout_ms
            )));
        }
        if self.discount_rule.multiplier.is_sign_negative() {
            return Err(config_error("discount_rule.multiplier must not be negative"));
        }
        Ok(())
    }

    /// Element wait window
    #[must_use]
    pub const fn element_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.element_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Intercept wait window
    #[must_use]
    pub const fn intercept_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.intercept_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Navigation wait window
    #[must_use]
    pub const fn navigation_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.navigation_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wrap a driver in a session using these windows
    #[must_use]
    pub fn session<D: BrowserDriver>(&self, driver: D) -> Session<D> {
        Session::new(driver)
            .with_wait(self.element_wait())
            .with_intercept_wait(self.intercept_wait())
            .with_navigation_wait(self.navigation_wait())
    }
}

fn config_error(message: impl Into<String>) -> ProbeError {
    ProbeError::Config {
        message: message.into(),
    }
}
