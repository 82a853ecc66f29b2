//! Storefront Probe: end-to-end checks for an e-commerce storefront
//!
//! Drives a browser against a live shop and verifies cart, favorites,
//! search/filter and checkout behaviour, including price arithmetic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  STOREFRONT PROBE Architecture                  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Storefront │    │ Session +  │            │
//! │   │ Verifier   │───►│ (page      │───►│ Locators   │──► Driver  │
//! │   │            │    │  objects)  │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                                                       │
//! │         ▼                                                       │
//! │   verifier / price / assertion (pure business rules)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers: [`MockStorefront`] (in-memory, always available) and
//! `ChromiumDriver` (chromiumoxide, `browser` feature).

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
#[allow(clippy::missing_errors_doc)]
mod browser;
mod config;
mod driver;
mod fixture;
#[allow(clippy::missing_errors_doc)]
mod harness;
mod locator;
#[allow(clippy::missing_errors_doc)]
mod network;
#[allow(clippy::missing_errors_doc)]
mod page_object;
mod picker;
mod price;
#[allow(clippy::missing_errors_doc, clippy::format_push_string)]
mod reporter;
mod result;
#[allow(clippy::missing_errors_doc)]
mod session;
#[allow(clippy::missing_errors_doc)]
mod storefront;
mod wait;

/// In-memory storefront for tests and dry runs
///
/// Implements [`BrowserDriver`] over a deterministic catalog, cart,
/// favorites and checkout.
#[allow(clippy::missing_errors_doc, clippy::too_many_lines)]
pub mod mock;

/// Scenario catalog and selection
#[allow(clippy::missing_errors_doc)]
pub mod scenario;

/// Named locators for every storefront control
pub mod selectors;

/// Pure business-rule checks
#[allow(clippy::missing_errors_doc)]
pub mod verifier;

pub use assertion::{Assertion, AssertionResult};
pub use browser::BrowserOptions;
#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumSessionFactory};
pub use config::ProbeConfig;
pub use driver::{BrowserDriver, ClickOptions, ElementHandle};
pub use fixture::{Credentials, ExpectedLabels, TestData};
pub use harness::{ScenarioResult, ScenarioStatus, SessionFactory, SuiteResults, TestHarness};
pub use locator::{Locator, LocatorOptions, Ordinal, Resolution, Selector};
pub use mock::{MockSessionFactory, MockStorefront};
pub use network::{
    HttpMethod, InterceptHandle, InterceptId, InterceptSpec, InterceptedResponse, UrlPattern,
};
pub use page_object::{
    wait_for_page, CartPage, FavoritesPage, HomePage, LoginPage, PageObject, ProductPage,
    UrlMatcher,
};
pub use picker::{Picker, Seed};
pub use price::{round2, DiscountRule, Price, PriceTolerance};
pub use reporter::{render, render_junit, write_report, ReportFormat};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{Scenario, ScenarioContext, ScenarioKind};
pub use session::{Action, Session};
pub use storefront::Storefront;
pub use wait::{Deadline, WaitOptions};
