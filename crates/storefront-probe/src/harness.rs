//! Test harness for running scenario suites.
//!
//! Every scenario gets a fresh driver from a [`SessionFactory`], so one
//! scenario's cart, favorites or sign-in never leaks into the next. With
//! `jobs > 1` scenarios run concurrently on their own sessions; results are
//! always reported in the order the scenarios were given.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};

use crate::config::ProbeConfig;
use crate::driver::BrowserDriver;
use crate::fixture::TestData;
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::{Scenario, ScenarioContext};
use crate::session::millis;
use crate::storefront::Storefront;

/// Creates one isolated browser per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Driver type handed out
    type Driver: BrowserDriver;

    /// Launch a fresh driver
    async fn create(&self) -> ProbeResult<Self::Driver>;
}

/// Scenario outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Every step and check succeeded
    Passed,
    /// A step or check failed
    Failed,
    /// Not run because an earlier scenario failed under fail-fast
    Skipped,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario id
    pub id: String,
    /// Scenario name
    pub name: String,
    /// Scenario tags
    pub tags: Vec<String>,
    /// Outcome
    pub status: ScenarioStatus,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error variant name if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Whether the failure was a business-rule mismatch rather than
    /// infrastructure
    pub assertion_failure: bool,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl ScenarioResult {
    fn base(scenario: &Scenario, status: ScenarioStatus) -> Self {
        Self {
            id: scenario.id.to_string(),
            name: scenario.name.to_string(),
            tags: scenario.tags.iter().map(ToString::to_string).collect(),
            status,
            error: None,
            error_kind: None,
            assertion_failure: false,
            duration_ms: 0,
        }
    }

    /// A passing result
    #[must_use]
    pub fn passed(scenario: &Scenario, duration: Duration) -> Self {
        Self {
            duration_ms: millis(duration),
            ..Self::base(scenario, ScenarioStatus::Passed)
        }
    }

    /// A failing result
    #[must_use]
    pub fn failed(scenario: &Scenario, duration: Duration, error: &ProbeError) -> Self {
        Self {
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
            assertion_failure: error.is_assertion(),
            duration_ms: millis(duration),
            ..Self::base(scenario, ScenarioStatus::Failed)
        }
    }

    /// A skipped result
    #[must_use]
    pub fn skipped(scenario: &Scenario) -> Self {
        Self::base(scenario, ScenarioStatus::Skipped)
    }
}

/// Results from running a suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Seed used for random draws
    pub seed: u64,
    /// Individual results, in input order
    pub results: Vec<ScenarioResult>,
    /// Total wall time in milliseconds
    pub duration_ms: u64,
}

impl SuiteResults {
    /// At least one scenario ran and none failed or was skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.status.is_passed())
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| r.status.is_failed()).collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped ({} total) in {:.2}s",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total(),
            Duration::from_millis(self.duration_ms).as_secs_f64()
        )
    }
}

/// Runs scenarios, each on its own session
#[derive(Debug, Clone)]
pub struct TestHarness {
    config: ProbeConfig,
    data: Arc<TestData>,
    suite_name: String,
}

impl TestHarness {
    /// Create a harness sharing `data` with every scenario
    #[must_use]
    pub fn new(config: ProbeConfig, data: Arc<TestData>) -> Self {
        Self {
            config,
            data,
            suite_name: "storefront".to_string(),
        }
    }

    /// Set the suite name used in reports
    #[must_use]
    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run `scenarios` with up to `config.jobs` in flight
    pub async fn run<F: SessionFactory>(
        &self,
        factory: &F,
        scenarios: &[&Scenario],
    ) -> SuiteResults {
        let start = Instant::now();
        let stop = AtomicBool::new(false);
        let jobs = self.config.jobs.max(1);
        info!(scenarios = scenarios.len(), jobs, seed = self.config.seed.value(), "suite started");

        let mut indexed: Vec<(usize, ScenarioResult)> = stream::iter(scenarios.iter().enumerate())
            .map(|(index, scenario)| {
                let stop = &stop;
                async move {
                    if stop.load(Ordering::SeqCst) {
                        return (index, ScenarioResult::skipped(scenario));
                    }
                    let result = self.run_one(factory, scenario).await;
                    if self.config.fail_fast && result.status.is_failed() {
                        stop.store(true, Ordering::SeqCst);
                    }
                    (index, result)
                }
            })
            .buffer_unordered(jobs)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let results = SuiteResults {
            suite_name: self.suite_name.clone(),
            seed: self.config.seed.value(),
            results: indexed.into_iter().map(|(_, r)| r).collect(),
            duration_ms: millis(start.elapsed()),
        };
        info!(summary = %results.summary(), "suite finished");
        results
    }

    /// Run one scenario on a fresh session
    pub async fn run_one<F: SessionFactory>(&self, factory: &F, scenario: &Scenario) -> ScenarioResult {
        let span = info_span!("scenario", id = scenario.id, name = scenario.name);
        async {
            let start = Instant::now();
            let outcome = self.drive(factory, scenario).await;
            let elapsed = start.elapsed();
            match outcome {
                Ok(()) => {
                    info!(duration_ms = millis(elapsed), "passed");
                    ScenarioResult::passed(scenario, elapsed)
                }
                Err(error) => {
                    warn!(kind = error.kind(), %error, "failed");
                    ScenarioResult::failed(scenario, elapsed, &error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive<F: SessionFactory>(&self, factory: &F, scenario: &Scenario) -> ProbeResult<()> {
        let driver = factory.create().await?;
        let mut shop = Storefront::new(self.config.session(driver), Arc::clone(&self.data));
        let mut ctx = ScenarioContext::new(&self.config, scenario);

        let outcome = scenario.run(&mut shop, &mut ctx).await;
        if let Err(error) = shop.into_session().close().await {
            warn!(%error, "closing browser failed");
        }
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use rust_decimal::Decimal;

    use super::*;
    use crate::mock::MockStorefront;
    use crate::scenario::{by_id, catalog, select};

    struct CountingFactory {
        created: AtomicUsize,
        multiplier: Decimal,
        fail_launch: bool,
    }

    impl CountingFactory {
        fn new() -> Self {
            Self {
                created: AtomicUsize::new(0),
                multiplier: Decimal::new(2, 1),
                fail_launch: false,
            }
        }
    }

    #[async_trait]
    impl SessionFactory for CountingFactory {
        type Driver = MockStorefront;

        async fn create(&self) -> ProbeResult<MockStorefront> {
            let _ = self.created.fetch_add(1, Ordering::SeqCst);
            if self.fail_launch {
                return Err(ProbeError::BrowserLaunch {
                    message: "no browser here".into(),
                });
            }
            Ok(MockStorefront::new(&TestData::default()).with_bundle_multiplier(self.multiplier))
        }
    }

    fn harness(config: ProbeConfig) -> TestHarness {
        let config = ProbeConfig {
            element_timeout_ms: 200,
            intercept_timeout_ms: 200,
            navigation_timeout_ms: 200,
            poll_interval_ms: 5,
            ..config
        };
        TestHarness::new(config, Arc::new(TestData::default()))
    }

    mod status_tests {
        use super::*;

        #[test]
        fn test_status_serializes_lowercase() {
            let json = serde_json::to_string(&ScenarioStatus::Skipped).unwrap();
            assert_eq!(json, "\"skipped\"");
        }

        #[test]
        fn test_failed_result_keeps_kind() {
            let scenario = by_id("search-wood").unwrap();
            let result = ScenarioResult::failed(
                scenario,
                Duration::from_millis(12),
                &ProbeError::assertion("no wood"),
            );
            assert_eq!(result.error_kind.as_deref(), Some("AssertionFailed"));
            assert!(result.assertion_failure);
            assert_eq!(result.duration_ms, 12);
            assert_eq!(result.tags, vec!["catalog", "search"]);
        }

        #[test]
        fn test_empty_suite_is_not_a_pass() {
            let results = SuiteResults {
                suite_name: "s".into(),
                seed: 1,
                results: vec![],
                duration_ms: 0,
            };
            assert!(!results.all_passed());
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_catalog_passes_sequentially() {
            let factory = CountingFactory::new();
            let scenarios: Vec<&Scenario> = catalog().iter().collect();
            let results = harness(ProbeConfig::default()).run(&factory, &scenarios).await;
            assert!(results.all_passed(), "{:?}", results.failures());
            assert_eq!(results.passed_count(), 9);
            assert_eq!(factory.created.load(Ordering::SeqCst), 9);
        }

        #[tokio::test]
        async fn test_parallel_keeps_catalog_order() {
            let factory = CountingFactory::new();
            let scenarios = select(None, &[]);
            let config = ProbeConfig {
                jobs: 4,
                ..ProbeConfig::default()
            };
            let results = harness(config).run(&factory, &scenarios).await;
            assert!(results.all_passed());
            let ids: Vec<&str> = results.results.iter().map(|r| r.id.as_str()).collect();
            let expected: Vec<&str> = catalog().iter().map(|s| s.id).collect();
            assert_eq!(ids, expected);
        }

        #[tokio::test]
        async fn test_failure_is_isolated() {
            let factory = CountingFactory {
                multiplier: Decimal::new(8, 1),
                ..CountingFactory::new()
            };
            let scenarios = select(Some("discount"), &[]);
            let mut all = select(Some("cart-single"), &[]);
            all.extend(scenarios);
            all.extend(select(Some("search"), &[]));

            let results = harness(ProbeConfig::default()).run(&factory, &all).await;
            assert_eq!(results.passed_count(), 2);
            assert_eq!(results.failed_count(), 1);
            let failure = results.failures()[0];
            assert_eq!(failure.id, "discount-rental-bundle");
            assert!(failure.assertion_failure);
        }

        #[tokio::test]
        async fn test_fail_fast_skips_the_rest() {
            let factory = CountingFactory {
                fail_launch: true,
                ..CountingFactory::new()
            };
            let config = ProbeConfig {
                fail_fast: true,
                ..ProbeConfig::default()
            };
            let scenarios = select(None, &[]);
            let results = harness(config).run(&factory, &scenarios).await;
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.skipped_count(), 8);
            assert_eq!(results.results[0].error_kind.as_deref(), Some("BrowserLaunch"));
            assert_eq!(factory.created.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_without_fail_fast_everything_runs() {
            let factory = CountingFactory {
                fail_launch: true,
                ..CountingFactory::new()
            };
            let scenarios = select(Some("cart"), &[]);
            let results = harness(ProbeConfig::default()).run(&factory, &scenarios).await;
            assert_eq!(results.failed_count(), scenarios.len());
            assert!(results.results.iter().all(|r| !r.assertion_failure));
        }
    }
}
