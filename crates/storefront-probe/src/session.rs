//! Session: the explicit browser-session handle.
//!
//! Every page-object operation goes through a [`Session`], which owns one
//! driver and turns locate → act → (wait) steps into auto-waiting
//! primitives. Resolution is re-done on every poll; nothing is cached
//! across navigations.

use std::time::Duration;

use tracing::debug;

use crate::driver::{BrowserDriver, ClickOptions, ElementHandle};
use crate::locator::{Locator, Resolution};
use crate::network::{HttpMethod, InterceptHandle, InterceptSpec, InterceptedResponse, UrlPattern};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::WaitOptions;

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Action kinds a primitive can perform on a located element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Click (honours the locator's force flag)
    Click,
    /// Type text, appending to the current value
    Type(String),
    /// Select an option by visible label
    Select(String),
    /// Tick a checkbox if it is not ticked yet
    Check,
    /// Trimmed text equals
    AssertText(String),
    /// Trimmed text contains
    AssertContainsText(String),
    /// Form value equals
    AssertValue(String),
    /// Attribute equals
    AssertAttribute {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
}

/// One browser session, isolated from every other scenario's session
#[derive(Debug)]
pub struct Session<D: BrowserDriver> {
    driver: D,
    wait: WaitOptions,
    intercept_wait: WaitOptions,
    navigation_wait: WaitOptions,
}

impl<D: BrowserDriver> Session<D> {
    /// Wrap a driver with default waits
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            wait: WaitOptions::default(),
            intercept_wait: WaitOptions::default().with_timeout(10_000),
            navigation_wait: WaitOptions::default().with_timeout(30_000),
        }
    }

    /// Set the element wait window used when a locator has none of its own
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the intercept resolution window
    #[must_use]
    pub const fn with_intercept_wait(mut self, wait: WaitOptions) -> Self {
        self.intercept_wait = wait;
        self
    }

    /// Set the window for URL changes
    #[must_use]
    pub const fn with_navigation_wait(mut self, wait: WaitOptions) -> Self {
        self.navigation_wait = wait;
        self
    }

    /// Element wait window
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        self.wait
    }

    /// Borrow the driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Borrow the driver mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn window(&self, locator: &Locator) -> WaitOptions {
        if locator.has_custom_timeout() {
            let options = locator.options();
            WaitOptions::new()
                .with_timeout(millis(options.timeout))
                .with_poll_interval(millis(options.poll_interval))
        } else {
            self.wait
        }
    }

    /// Navigate to a URL
    pub async fn visit(&mut self, url: &str) -> ProbeResult<()> {
        debug!(url, "visit");
        self.driver.visit(url).await
    }

    /// Current URL
    pub async fn current_url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    /// Current matches without waiting. Malformed descriptors are
    /// rejected before reaching the driver.
    pub async fn query(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        locator.selector().validate()?;
        self.driver.query_all(locator.selector()).await
    }

    /// Wait for the locator to designate exactly one element
    pub async fn find(&self, locator: &Locator) -> ProbeResult<ElementHandle> {
        self.resolve(locator, false).await
    }

    /// Wait for at least one match and return all of them
    pub async fn find_all(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        let options = self.window(locator);
        let deadline = options.start();
        loop {
            let matches = self.query(locator).await?;
            if !matches.is_empty() {
                return Ok(matches);
            }
            if !deadline.tick().await {
                return Err(ProbeError::ElementNotFound {
                    selector: locator.describe(),
                    timeout_ms: options.timeout_ms,
                });
            }
        }
    }

    /// Wait until exactly `count` elements match
    pub async fn wait_for_count(&self, locator: &Locator, count: usize) -> ProbeResult<()> {
        let options = self.window(locator);
        let deadline = options.start();
        loop {
            let seen = self.query(locator).await?.len();
            if seen == count {
                return Ok(());
            }
            if !deadline.tick().await {
                return Err(ProbeError::assertion(format!(
                    "expected {count} match(es) for {}, found {seen}",
                    locator.describe()
                )));
            }
        }
    }

    async fn resolve(&self, locator: &Locator, actionable: bool) -> ProbeResult<ElementHandle> {
        let options = self.window(locator);
        let must_be_actionable = actionable && !locator.options().force;
        let deadline = options.start();
        let mut seen_blocked = false;

        loop {
            let matches = self.query(locator).await?;
            match locator.resolve(&matches) {
                Resolution::Found(element) => {
                    if !must_be_actionable || element.is_actionable() {
                        return Ok(element);
                    }
                    seen_blocked = true;
                }
                Resolution::Ambiguous(count) => {
                    return Err(ProbeError::AmbiguousSelector {
                        selector: locator.describe(),
                        count,
                    });
                }
                Resolution::Missing => {}
            }

            if !deadline.tick().await {
                let selector = locator.describe();
                let timeout_ms = options.timeout_ms;
                return Err(if seen_blocked {
                    ProbeError::NotInteractable {
                        selector,
                        timeout_ms,
                    }
                } else {
                    ProbeError::ElementNotFound {
                        selector,
                        timeout_ms,
                    }
                });
            }
        }
    }

    /// Click the element
    pub async fn click(&mut self, locator: &Locator) -> ProbeResult<()> {
        let element = self.resolve(locator, true).await?;
        let options = ClickOptions {
            force: locator.options().force,
        };
        debug!(selector = %locator, force = options.force, "click");
        self.driver.click(&element, options).await
    }

    /// Type into the element
    pub async fn type_text(&mut self, locator: &Locator, text: &str) -> ProbeResult<()> {
        let element = self.resolve(locator, true).await?;
        debug!(selector = %locator, chars = text.len(), "type");
        self.driver.type_text(&element, text).await
    }

    /// Select an option by label
    pub async fn select(&mut self, locator: &Locator, label: &str) -> ProbeResult<()> {
        let element = self.resolve(locator, true).await?;
        debug!(selector = %locator, label, "select");
        self.driver.select_option(&element, label).await
    }

    /// Tick a checkbox; no-op when already ticked
    pub async fn check(&mut self, locator: &Locator) -> ProbeResult<()> {
        let element = self.resolve(locator, true).await?;
        if element.attribute("checked").is_some() {
            debug!(selector = %locator, "already checked");
            return Ok(());
        }
        debug!(selector = %locator, "check");
        let options = ClickOptions {
            force: locator.options().force,
        };
        self.driver.click(&element, options).await
    }

    /// Trimmed text of the element
    pub async fn text_of(&self, locator: &Locator) -> ProbeResult<String> {
        Ok(self.find(locator).await?.text().trim().to_string())
    }

    /// Form value of the element
    pub async fn value_of(&self, locator: &Locator) -> ProbeResult<String> {
        Ok(self.find(locator).await?.value.unwrap_or_default())
    }

    /// Trimmed texts of every current match, after waiting for at least one
    pub async fn texts_of(&self, locator: &Locator) -> ProbeResult<Vec<String>> {
        Ok(self
            .find_all(locator)
            .await?
            .iter()
            .map(|e| e.text().trim().to_string())
            .collect())
    }

    /// Wait until the trimmed texts of the matches equal `expected`, in
    /// order. An empty `expected` waits for the locator to match nothing.
    pub async fn wait_for_texts(&self, locator: &Locator, expected: &[String]) -> ProbeResult<()> {
        let options = self.window(locator);
        let deadline = options.start();
        loop {
            let seen: Vec<String> = self
                .query(locator)
                .await?
                .iter()
                .map(|e| e.text().trim().to_string())
                .collect();
            if seen == expected {
                return Ok(());
            }
            if !deadline.tick().await {
                return Err(ProbeError::assertion(format!(
                    "expected {} to show {expected:?}, got {seen:?}",
                    locator.describe()
                )));
            }
        }
    }

    async fn eventually<C, A>(
        &self,
        locator: &Locator,
        expectation: &str,
        check: C,
        actual: A,
    ) -> ProbeResult<()>
    where
        C: Fn(&ElementHandle) -> bool,
        A: Fn(&ElementHandle) -> String,
    {
        let options = self.window(locator);
        let deadline = options.start();
        let mut last_actual: Option<String> = None;

        loop {
            let matches = self.query(locator).await?;
            match locator.resolve(&matches) {
                Resolution::Found(element) => {
                    if check(&element) {
                        return Ok(());
                    }
                    last_actual = Some(actual(&element));
                }
                Resolution::Ambiguous(count) => {
                    return Err(ProbeError::AmbiguousSelector {
                        selector: locator.describe(),
                        count,
                    });
                }
                Resolution::Missing => {}
            }

            if !deadline.tick().await {
                return Err(match last_actual {
                    Some(got) => ProbeError::assertion(format!(
                        "expected {} to {expectation}, got {got:?}",
                        locator.describe()
                    )),
                    None => ProbeError::ElementNotFound {
                        selector: locator.describe(),
                        timeout_ms: options.timeout_ms,
                    },
                });
            }
        }
    }

    /// Wait until the trimmed text equals `expected`
    pub async fn assert_text(&self, locator: &Locator, expected: &str) -> ProbeResult<()> {
        self.eventually(
            locator,
            &format!("have text {expected:?}"),
            |e| e.text().trim() == expected,
            |e| e.text().trim().to_string(),
        )
        .await
    }

    /// Wait until the text contains `expected`
    pub async fn assert_contains_text(&self, locator: &Locator, expected: &str) -> ProbeResult<()> {
        self.eventually(
            locator,
            &format!("contain text {expected:?}"),
            |e| e.text().contains(expected),
            |e| e.text().trim().to_string(),
        )
        .await
    }

    /// Wait until the form value equals `expected`
    pub async fn assert_value(&self, locator: &Locator, expected: &str) -> ProbeResult<()> {
        self.eventually(
            locator,
            &format!("have value {expected:?}"),
            |e| e.value.as_deref() == Some(expected),
            |e| e.value.clone().unwrap_or_default(),
        )
        .await
    }

    /// Wait until attribute `name` equals `expected`
    pub async fn assert_attribute(
        &self,
        locator: &Locator,
        name: &str,
        expected: &str,
    ) -> ProbeResult<()> {
        self.eventually(
            locator,
            &format!("have attribute {name}={expected:?}"),
            |e| e.attribute(name) == Some(expected),
            |e| e.attribute(name).unwrap_or("<absent>").to_string(),
        )
        .await
    }

    /// Perform one action kind on the located element
    pub async fn perform(&mut self, locator: &Locator, action: &Action) -> ProbeResult<()> {
        match action {
            Action::Click => self.click(locator).await,
            Action::Type(text) => self.type_text(locator, text).await,
            Action::Select(label) => self.select(locator, label).await,
            Action::Check => self.check(locator).await,
            Action::AssertText(text) => self.assert_text(locator, text).await,
            Action::AssertContainsText(text) => self.assert_contains_text(locator, text).await,
            Action::AssertValue(value) => self.assert_value(locator, value).await,
            Action::AssertAttribute { name, value } => {
                self.assert_attribute(locator, name, value).await
            }
        }
    }

    /// Poll the URL until `predicate` holds; `on_timeout` builds the error
    /// from the last URL seen
    pub async fn wait_for_url<P, E>(&self, predicate: P, on_timeout: E) -> ProbeResult<String>
    where
        P: Fn(&str) -> bool,
        E: FnOnce(String) -> ProbeError,
    {
        let deadline = self.navigation_wait.start();
        loop {
            let url = self.current_url().await?;
            if predicate(&url) {
                return Ok(url);
            }
            if !deadline.tick().await {
                return Err(on_timeout(url));
            }
        }
    }

    /// Register an intercept for (method, URL pattern)
    pub async fn intercept(
        &mut self,
        method: HttpMethod,
        pattern: UrlPattern,
    ) -> ProbeResult<InterceptHandle> {
        let spec = InterceptSpec::new(method, pattern);
        let id = self.driver.intercept(&spec).await?;
        debug!(%method, pattern = %spec.pattern, "intercept registered");
        Ok(InterceptHandle::new(id, spec))
    }

    /// Wait for the next response captured by `handle`
    pub async fn next_response(
        &mut self,
        handle: &mut InterceptHandle,
    ) -> ProbeResult<InterceptedResponse> {
        let deadline = self.intercept_wait.start();
        loop {
            let fresh = self.driver.take_responses(handle.id()).await?;
            handle.absorb(fresh);
            if let Some(response) = handle.pop() {
                debug!(
                    status = response.status,
                    url = %response.url,
                    nth = handle.yielded(),
                    "intercept resolved"
                );
                return Ok(response);
            }
            if !deadline.tick().await {
                return Err(handle.timeout_error(self.intercept_wait.timeout_ms));
            }
        }
    }

    /// Close the underlying browser
    pub async fn close(&mut self) -> ProbeResult<()> {
        self.driver.close().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::locator::Selector;
    use crate::network::InterceptId;

    /// Scripted driver: a fixed DOM keyed by CSS query, plus a response queue
    #[derive(Debug, Default)]
    struct ScriptedDriver {
        dom: HashMap<String, Vec<ElementHandle>>,
        url: String,
        clicks: Arc<Mutex<Vec<(String, bool)>>>,
        typed: Vec<(String, String)>,
        responses: Vec<InterceptedResponse>,
    }

    impl ScriptedDriver {
        fn with(mut self, css: &str, elements: Vec<ElementHandle>) -> Self {
            let _ = self.dom.insert(css.to_string(), elements);
            self
        }
    }

    #[async_trait]
    impl BrowserDriver for ScriptedDriver {
        async fn visit(&mut self, url: &str) -> ProbeResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        async fn current_url(&self) -> ProbeResult<String> {
            Ok(self.url.clone())
        }

        async fn query_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
            let all = self.dom.get(&selector.css_query()).cloned().unwrap_or_default();
            Ok(match selector.text_filter() {
                Some(text) => all.into_iter().filter(|e| e.text().contains(text)).collect(),
                None => all,
            })
        }

        async fn click(&mut self, element: &ElementHandle, options: ClickOptions) -> ProbeResult<()> {
            self.clicks
                .lock()
                .unwrap()
                .push((element.id.clone(), options.force));
            Ok(())
        }

        async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
            self.typed.push((element.id.clone(), text.to_string()));
            Ok(())
        }

        async fn select_option(&mut self, _element: &ElementHandle, _label: &str) -> ProbeResult<()> {
            Ok(())
        }

        async fn intercept(&mut self, _spec: &InterceptSpec) -> ProbeResult<InterceptId> {
            Ok(InterceptId(1))
        }

        async fn take_responses(&mut self, _id: InterceptId) -> ProbeResult<Vec<InterceptedResponse>> {
            Ok(std::mem::take(&mut self.responses))
        }

        async fn close(&mut self) -> ProbeResult<()> {
            Ok(())
        }
    }

    fn fast(driver: ScriptedDriver) -> Session<ScriptedDriver> {
        let wait = WaitOptions::new().with_timeout(60).with_poll_interval(5);
        Session::new(driver)
            .with_wait(wait)
            .with_intercept_wait(wait)
            .with_navigation_wait(wait)
    }

    fn cards(n: usize) -> Vec<ElementHandle> {
        (0..n)
            .map(|i| ElementHandle::new(format!("card-{i}"), "img"))
            .collect()
    }

    mod find_tests {
        use super::*;

        #[tokio::test]
        async fn test_missing_element_times_out() {
            let session = fast(ScriptedDriver::default());
            let err = session.find(&Locator::new("#email")).await.unwrap_err();
            assert!(matches!(
                err,
                ProbeError::ElementNotFound { timeout_ms: 60, .. }
            ));
        }

        #[tokio::test]
        async fn test_ambiguous_fails_fast() {
            let session = fast(ScriptedDriver::default().with(".card-img-top", cards(3)));
            let err = session
                .find(&Locator::new(".card-img-top"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::AmbiguousSelector { count: 3, .. }));
        }

        #[tokio::test]
        async fn test_ordinal_picks() {
            let session = fast(ScriptedDriver::default().with(".card-img-top", cards(3)));
            let last = session
                .find(&Locator::new(".card-img-top").last())
                .await
                .unwrap();
            assert_eq!(last.id, "card-2");
        }

        #[tokio::test]
        async fn test_locator_timeout_overrides_session() {
            let session = Session::new(ScriptedDriver::default());
            let locator = Locator::new("#missing").with_timeout(Duration::from_millis(30));
            let err = session.find(&locator).await.unwrap_err();
            assert!(matches!(
                err,
                ProbeError::ElementNotFound { timeout_ms: 30, .. }
            ));
        }

        #[tokio::test]
        async fn test_malformed_locator_fails_without_waiting() {
            let session = Session::new(ScriptedDriver::default());
            let broken = Locator::new("input[type='checkbox'");
            let started = std::time::Instant::now();
            let err = session.find(&broken).await.unwrap_err();
            assert!(matches!(err, ProbeError::InvalidSelector { .. }), "{err:?}");
            assert!(started.elapsed() < Duration::from_secs(1));
            assert!(matches!(
                session.query(&Locator::test_id("")).await,
                Err(ProbeError::InvalidSelector { .. })
            ));
            assert!(Locator::parse("input[type='checkbox'").is_err());
        }

        #[tokio::test]
        async fn test_wait_for_count() {
            let session = fast(ScriptedDriver::default().with(".quantity", cards(2)));
            assert!(session.wait_for_count(&Locator::new(".quantity"), 2).await.is_ok());
            let err = session
                .wait_for_count(&Locator::new(".quantity"), 1)
                .await
                .unwrap_err();
            assert!(err.is_assertion());
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_covered_element_not_interactable() {
            let nav = ElementHandle::new("cart", "a").covered();
            let session_driver = ScriptedDriver::default().with("[data-test='nav-cart']", vec![nav]);
            let mut session = fast(session_driver);
            let err = session
                .click(&Locator::test_id("nav-cart"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::NotInteractable { .. }));
        }

        #[tokio::test]
        async fn test_forced_click_goes_through() {
            let nav = ElementHandle::new("cart", "a").covered();
            let driver = ScriptedDriver::default().with("[data-test='nav-cart']", vec![nav]);
            let clicks = Arc::clone(&driver.clicks);
            let mut session = fast(driver);
            session
                .click(&Locator::test_id("nav-cart").with_force())
                .await
                .unwrap();
            assert_eq!(clicks.lock().unwrap().as_slice(), &[("cart".to_string(), true)]);
        }

        #[tokio::test]
        async fn test_check_skips_checked_box() {
            let ticked = ElementHandle::new("hammer", "input").with_attribute("checked", "true");
            let driver = ScriptedDriver::default().with("input[type='checkbox']", vec![ticked]);
            let clicks = Arc::clone(&driver.clicks);
            let mut session = fast(driver);
            session
                .perform(&Locator::new("input[type='checkbox']"), &Action::Check)
                .await
                .unwrap();
            assert!(clicks.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_type_records_text() {
            let email = ElementHandle::new("email", "input");
            let mut session = fast(ScriptedDriver::default().with("#email", vec![email]));
            session
                .perform(&Locator::new("#email"), &Action::Type("hello@gmail.com".into()))
                .await
                .unwrap();
            assert_eq!(
                session.driver().typed,
                vec![("email".to_string(), "hello@gmail.com".to_string())]
            );
        }
    }

    mod assertion_tests {
        use super::*;

        #[tokio::test]
        async fn test_assert_value_reports_actual() {
            let qty = ElementHandle::new("q", "input").with_value("2");
            let session = fast(ScriptedDriver::default().with("#qty", vec![qty]));
            assert!(session.assert_value(&Locator::new("#qty"), "2").await.is_ok());

            let err = session
                .assert_value(&Locator::new("#qty"), "1")
                .await
                .unwrap_err();
            assert!(err.is_assertion());
            assert!(err.to_string().contains("\"2\""));
        }

        #[tokio::test]
        async fn test_assert_text_trims() {
            let total = ElementHandle::new("t", "td").with_text("  $28.30 ");
            let session = fast(ScriptedDriver::default().with("#total", vec![total]));
            session
                .assert_text(&Locator::new("#total"), "$28.30")
                .await
                .unwrap();
            session
                .assert_contains_text(&Locator::new("#total"), "28")
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_assert_attribute() {
            let cat = ElementHandle::new("c", "span").with_attribute("aria-label", "category");
            let mut session = fast(ScriptedDriver::default().with("span", vec![cat]));
            session
                .perform(
                    &Locator::new("span"),
                    &Action::AssertAttribute {
                        name: "aria-label".into(),
                        value: "category".into(),
                    },
                )
                .await
                .unwrap();
        }
    }

    mod listing_tests {
        use super::*;

        fn names(texts: &[&str]) -> Vec<ElementHandle> {
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| ElementHandle::new(format!("name-{i}"), "h5").with_text(*t))
                .collect()
        }

        #[tokio::test]
        async fn test_wait_for_texts_matches_in_order() {
            let driver = ScriptedDriver::default().with("h5", names(&[" Wood Saw ", "Chisels"]));
            let session = fast(driver);
            let expected = vec!["Wood Saw".to_string(), "Chisels".to_string()];
            session.wait_for_texts(&Locator::new("h5"), &expected).await.unwrap();

            let reversed: Vec<String> = expected.into_iter().rev().collect();
            let err = session
                .wait_for_texts(&Locator::new("h5"), &reversed)
                .await
                .unwrap_err();
            assert!(err.is_assertion());
            assert!(err.to_string().contains("Wood Saw"));
        }

        #[tokio::test]
        async fn test_wait_for_texts_empty_means_no_match() {
            let session = fast(ScriptedDriver::default());
            session.wait_for_texts(&Locator::new("h5"), &[]).await.unwrap();
        }
    }

    mod intercept_tests {
        use super::*;

        fn response(status: u16) -> InterceptedResponse {
            InterceptedResponse {
                url: "https://api/favorites".into(),
                method: HttpMethod::Post,
                status,
                body: serde_json::Value::Null,
            }
        }

        #[tokio::test]
        async fn test_responses_in_order() {
            let driver = ScriptedDriver {
                responses: vec![response(201), response(422)],
                ..ScriptedDriver::default()
            };
            let mut session = fast(driver);
            let mut handle = session
                .intercept(HttpMethod::Post, UrlPattern::glob("**/favorites"))
                .await
                .unwrap();
            assert_eq!(session.next_response(&mut handle).await.unwrap().status, 201);
            assert_eq!(session.next_response(&mut handle).await.unwrap().status, 422);
            let err = session.next_response(&mut handle).await.unwrap_err();
            assert!(matches!(err, ProbeError::InterceptTimeout { .. }));
        }

        #[tokio::test]
        async fn test_wait_for_url_error_carries_last_url() {
            let mut session = fast(ScriptedDriver::default());
            session.visit("https://shop/auth/login").await.unwrap();
            let err = session
                .wait_for_url(
                    |url| !url.contains("/auth/login"),
                    |url| ProbeError::LoginFailed {
                        email: "a@b".into(),
                        url,
                    },
                )
                .await
                .unwrap_err();
            assert!(err.to_string().contains("/auth/login"));
        }
    }
}
