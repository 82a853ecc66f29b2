//! BrowserDriver - Abstract Browser Automation Trait
//!
//! The browser engine is an external collaborator. Everything above this
//! seam (session, page objects, scenarios) talks to a [`BrowserDriver`], so
//! the engine can be swapped:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  BrowserDriver (Abstract Trait)                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐        ┌─────────────────────────┐  │
//! │  │  ChromiumDriver     │        │  MockStorefront         │  │
//! │  │  (feature=browser)  │        │  (unit + scenario tests)│  │
//! │  │  CDP via            │        │  in-memory storefront   │  │
//! │  │  chromiumoxide      │        │                         │  │
//! │  └─────────────────────┘        └─────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers return element *snapshots*: the session re-queries on every
//! poll, so a handle is only meaningful until the next navigation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::locator::Selector;
use crate::network::{InterceptId, InterceptSpec, InterceptedResponse};
use crate::result::ProbeResult;

/// Snapshot of a DOM element at query time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-scoped identifier for acting on the element
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Trimmed text content
    pub text_content: Option<String>,
    /// Current `value` for form controls
    pub value: Option<String>,
    /// Attributes of interest
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Rendered and displayed
    pub visible: bool,
    /// Covered by another element at its centre point
    #[serde(default)]
    pub obscured: bool,
}

impl ElementHandle {
    /// Create a new visible element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
            value: None,
            attributes: BTreeMap::new(),
            visible: true,
            obscured: false,
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Set form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark as not displayed
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark as covered by another element
    #[must_use]
    pub const fn covered(mut self) -> Self {
        self.obscured = true;
        self
    }

    /// Text content, empty when absent
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().unwrap_or("")
    }

    /// Attribute value by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether a real user could click it right now
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.visible && !self.obscured
    }
}

/// Options for a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOptions {
    /// Dispatch the click even if the element is hidden or covered
    pub force: bool,
}

impl ClickOptions {
    /// Forced click
    #[must_use]
    pub const fn forced() -> Self {
        Self { force: true }
    }
}

/// Abstract driver trait for browser automation
///
/// # Implementations
///
/// - `ChromiumDriver` - chromiumoxide over CDP (`browser` feature)
/// - `MockStorefront` - in-memory storefront for tests and dry runs
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to URL (full page load)
    async fn visit(&mut self, url: &str) -> ProbeResult<()>;

    /// Get current URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// All elements matching the selector (CSS part and text predicate),
    /// in document order
    async fn query_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>>;

    /// Click an element previously returned by `query_all`
    async fn click(&mut self, element: &ElementHandle, options: ClickOptions) -> ProbeResult<()>;

    /// Type text into an input
    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Choose an `<option>` of a `<select>` by its visible label
    async fn select_option(&mut self, element: &ElementHandle, label: &str) -> ProbeResult<()>;

    /// Start capturing network calls matching `spec`
    async fn intercept(&mut self, spec: &InterceptSpec) -> ProbeResult<InterceptId>;

    /// Drain responses captured for `id` since the last call, oldest first
    async fn take_responses(&mut self, id: InterceptId) -> ProbeResult<Vec<InterceptedResponse>>;

    /// Close the browser
    async fn close(&mut self) -> ProbeResult<()>;
}
