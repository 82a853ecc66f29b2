//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a typed selector descriptor: a locator kind and value,
//! an optional text predicate, and an optional ordinal. Descriptors are
//! validated when built from untrusted strings and again before every
//! query, so a malformed one fails at once instead of timing out.
//! Resolution against a list of matches is strict: several matches without
//! an ordinal is an error rather than an arbitrary pick.

use std::fmt;
use std::time::Duration;

use crate::driver::ElementHandle;
use crate::result::{ProbeError, ProbeResult};

/// Default element wait window (4 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 4000;

/// Default polling interval while waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., ".card-img-top")
    Css(String),
    /// `data-test` attribute selector
    TestId(String),
    /// Any element whose text contains the value
    Text(String),
    /// CSS selector narrowed to elements whose text (or enclosing label's
    /// text) contains `text`
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a CSS selector and validate it
    pub fn try_css(selector: impl Into<String>) -> ProbeResult<Self> {
        let selector = Self::Css(selector.into());
        selector.validate()?;
        Ok(selector)
    }

    /// Check the descriptor is well formed.
    ///
    /// Values must be non-blank; CSS must have balanced brackets, parens
    /// and quotes.
    pub fn validate(&self) -> ProbeResult<()> {
        match self {
            Self::Css(css) => validate_css(css),
            Self::TestId(id) => {
                if id.trim().is_empty() {
                    return Err(invalid("empty data-test id"));
                }
                if id.contains('\'') || id.contains('"') {
                    return Err(invalid(format!("quote in data-test id {id:?}")));
                }
                Ok(())
            }
            Self::Text(text) => {
                if text.trim().is_empty() {
                    return Err(invalid("empty text selector"));
                }
                Ok(())
            }
            Self::CssWithText { css, text } => {
                validate_css(css)?;
                if text.trim().is_empty() {
                    return Err(invalid(format!("empty text filter on {css:?}")));
                }
                Ok(())
            }
        }
    }

    /// The CSS part handed to the driver (`*` for pure text selectors)
    #[must_use]
    pub fn css_query(&self) -> String {
        match self {
            Self::Css(css) | Self::CssWithText { css, .. } => css.clone(),
            Self::TestId(id) => format!("[data-test='{id}']"),
            Self::Text(_) => "*".to_string(),
        }
    }

    /// Text predicate, if any
    #[must_use]
    pub fn text_filter(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::CssWithText { text, .. } => Some(text),
            Self::Css(_) | Self::TestId(_) => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{css}"),
            Self::TestId(id) => write!(f, "[data-test='{id}']"),
            Self::Text(text) => write!(f, "text={text:?}"),
            Self::CssWithText { css, text } => write!(f, "{css} containing {text:?}"),
        }
    }
}

fn invalid(message: impl Into<String>) -> ProbeError {
    ProbeError::InvalidSelector {
        message: message.into(),
    }
}

fn validate_css(css: &str) -> ProbeResult<()> {
    if css.trim().is_empty() {
        return Err(invalid("empty CSS selector"));
    }

    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    for c in css.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => stack.push(c),
            ']' => {
                if stack.pop() != Some('[') {
                    return Err(invalid(format!("unbalanced ']' in {css:?}")));
                }
            }
            ')' => {
                if stack.pop() != Some('(') {
                    return Err(invalid(format!("unbalanced ')' in {css:?}")));
                }
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(invalid(format!("unterminated quote in {css:?}")));
    }
    if !stack.is_empty() {
        return Err(invalid(format!("unclosed bracket in {css:?}")));
    }
    Ok(())
}

/// Which of several matches to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ordinal {
    /// First match in document order
    First,
    /// Last match in document order
    Last,
    /// Zero-based index into the matches
    Nth(usize),
}

impl Ordinal {
    /// Pick the element this ordinal designates
    #[must_use]
    pub fn pick<'a, T>(self, items: &'a [T]) -> Option<&'a T> {
        match self {
            Self::First => items.first(),
            Self::Last => items.last(),
            Self::Nth(index) => items.get(index),
        }
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Last => write!(f, "last"),
            Self::Nth(index) => write!(f, "#{index}"),
        }
    }
}

/// Locator options for customizing behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Wait window for the element to appear
    pub timeout: Duration,
    /// Polling interval while waiting
    pub poll_interval: Duration,
    /// Whether several matches without an ordinal is an error
    pub strict: bool,
    /// Skip visibility and occlusion checks when acting
    pub force: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            strict: true,
            force: false,
        }
    }
}

/// Outcome of resolving a locator against the current matches
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Exactly one element designated
    Found(ElementHandle),
    /// Nothing designated (yet)
    Missing,
    /// Several matches and no ordinal
    Ambiguous(usize),
}

/// A locator for finding elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    ordinal: Option<Ordinal>,
    options: LocatorOptions,
    timeout_overridden: bool,
}

impl Locator {
    /// Create a new locator with a CSS selector.
    ///
    /// Unchecked here; a malformed selector is rejected with
    /// `InvalidSelector` on first use. Use [`Locator::parse`] to fail early.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            ordinal: None,
            options: LocatorOptions::default(),
            timeout_overridden: false,
        }
    }

    /// Create a `data-test` locator
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::TestId(id.into()))
    }

    /// Build a locator from an untrusted CSS string, validating it
    pub fn parse(css: impl Into<String>) -> ProbeResult<Self> {
        Ok(Self::from_selector(Selector::try_css(css)?))
    }

    /// Filter by text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        let selector = match self.selector {
            Selector::Css(css) | Selector::CssWithText { css, .. } => {
                Selector::CssWithText { css, text }
            }
            Selector::TestId(id) => Selector::CssWithText {
                css: format!("[data-test='{id}']"),
                text,
            },
            Selector::Text(_) => Selector::Text(text),
        };
        Self { selector, ..self }
    }

    /// Act on the first match
    #[must_use]
    pub fn first(self) -> Self {
        self.with_ordinal(Ordinal::First)
    }

    /// Act on the last match
    #[must_use]
    pub fn last(self) -> Self {
        self.with_ordinal(Ordinal::Last)
    }

    /// Act on the match at `index`
    #[must_use]
    pub fn nth(self, index: usize) -> Self {
        self.with_ordinal(Ordinal::Nth(index))
    }

    /// Set the ordinal
    #[must_use]
    pub const fn with_ordinal(mut self, ordinal: Ordinal) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    /// Set a custom wait window
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self.timeout_overridden = true;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Bypass visibility and occlusion checks when acting
    #[must_use]
    pub const fn with_force(mut self) -> Self {
        self.options.force = true;
        self
    }

    /// Disable strict mode (first match wins when no ordinal is set)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the ordinal
    #[must_use]
    pub const fn ordinal(&self) -> Option<Ordinal> {
        self.ordinal
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Whether a caller set the wait window explicitly
    #[must_use]
    pub const fn has_custom_timeout(&self) -> bool {
        self.timeout_overridden
    }

    /// Human-readable description used in errors and logs
    #[must_use]
    pub fn describe(&self) -> String {
        match self.ordinal {
            Some(ordinal) => format!("{} ({ordinal})", self.selector),
            None => self.selector.to_string(),
        }
    }

    /// Resolve against the current matches, in document order
    #[must_use]
    pub fn resolve(&self, matches: &[ElementHandle]) -> Resolution {
        let picked = match self.ordinal {
            Some(ordinal) => ordinal.pick(matches),
            None if matches.len() > 1 && self.options.strict => {
                return Resolution::Ambiguous(matches.len());
            }
            None => matches.first(),
        };

        picked.map_or(Resolution::Missing, |element| {
            Resolution::Found(element.clone())
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn handles(n: usize) -> Vec<ElementHandle> {
        (0..n)
            .map(|i| ElementHandle::new(format!("el-{i}"), "div"))
            .collect()
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_test_id_css_query() {
            let selector = Selector::test_id("nav-cart");
            assert_eq!(selector.css_query(), "[data-test='nav-cart']");
            assert!(selector.text_filter().is_none());
        }

        #[test]
        fn test_css_with_text_parts() {
            let selector = Selector::CssWithText {
                css: "label".to_string(),
                text: "Hammer".to_string(),
            };
            assert_eq!(selector.css_query(), "label");
            assert_eq!(selector.text_filter(), Some("Hammer"));
        }

        #[test]
        fn test_text_selector_queries_everything() {
            let selector = Selector::text("Rentals");
            assert_eq!(selector.css_query(), "*");
            assert_eq!(selector.text_filter(), Some("Rentals"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#email").to_string(), "#email");
            assert_eq!(
                Selector::test_id("delete").to_string(),
                "[data-test='delete']"
            );
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_valid_css() {
            assert!(Selector::try_css("input[data-test='product-quantity']").is_ok());
            assert!(Selector::try_css(".col-md-9 .container a").is_ok());
            assert!(Selector::try_css("a:not(.disabled)").is_ok());
        }

        #[test]
        fn test_empty_css_rejected() {
            let err = Selector::try_css("   ").unwrap_err();
            assert!(matches!(err, ProbeError::InvalidSelector { .. }));
        }

        #[test]
        fn test_unbalanced_bracket_rejected() {
            assert!(Selector::try_css("input[data-test='x'").is_err());
            assert!(Selector::try_css("input]").is_err());
            assert!(Selector::try_css("a:not(.x").is_err());
        }

        #[test]
        fn test_unterminated_quote_rejected() {
            assert!(Selector::try_css("[data-test='nav-cart]").is_err());
        }

        #[test]
        fn test_brackets_inside_quotes_ignored() {
            assert!(Selector::try_css("[aria-label='a]b']").is_ok());
        }

        #[test]
        fn test_test_id_rules() {
            assert!(Selector::test_id("nav-menu").validate().is_ok());
            assert!(Selector::test_id("").validate().is_err());
            assert!(Selector::test_id("it's").validate().is_err());
        }

        #[test]
        fn test_blank_text_filter_rejected() {
            let selector = Selector::CssWithText {
                css: "label".to_string(),
                text: " ".to_string(),
            };
            assert!(selector.validate().is_err());
        }

        #[test]
        fn test_locator_parse() {
            assert!(Locator::parse("#search-query").is_ok());
            assert!(Locator::parse("").is_err());
        }
    }

    mod ordinal_tests {
        use super::*;

        #[test]
        fn test_pick() {
            let items = [1, 2, 3];
            assert_eq!(Ordinal::First.pick(&items), Some(&1));
            assert_eq!(Ordinal::Last.pick(&items), Some(&3));
            assert_eq!(Ordinal::Nth(1).pick(&items), Some(&2));
            assert_eq!(Ordinal::Nth(3).pick(&items), None);
        }

        #[test]
        fn test_pick_empty() {
            let items: [u8; 0] = [];
            assert_eq!(Ordinal::First.pick(&items), None);
            assert_eq!(Ordinal::Last.pick(&items), None);
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_single_match_without_ordinal() {
            let locator = Locator::new("#btn-add-to-cart");
            match locator.resolve(&handles(1)) {
                Resolution::Found(el) => assert_eq!(el.id, "el-0"),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_zero_matches_is_missing() {
            let locator = Locator::new("#btn-add-to-cart");
            assert_eq!(locator.resolve(&[]), Resolution::Missing);
        }

        #[test]
        fn test_many_matches_without_ordinal_is_ambiguous() {
            let locator = Locator::new(".card-img-top");
            assert_eq!(locator.resolve(&handles(9)), Resolution::Ambiguous(9));
        }

        #[test]
        fn test_non_strict_takes_first() {
            let locator = Locator::new(".card-img-top").with_strict(false);
            match locator.resolve(&handles(3)) {
                Resolution::Found(el) => assert_eq!(el.id, "el-0"),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_ordinals() {
            let matches = handles(3);
            let last = Locator::new(".card-img-top").last().resolve(&matches);
            assert_eq!(last, Resolution::Found(matches[2].clone()));

            let out_of_range = Locator::new(".quantity").nth(5).resolve(&matches);
            assert_eq!(out_of_range, Resolution::Missing);
        }
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_with_text_on_css() {
            let locator = Locator::new("label").with_text("Hammer");
            assert_eq!(
                locator.selector(),
                &Selector::CssWithText {
                    css: "label".to_string(),
                    text: "Hammer".to_string()
                }
            );
        }

        #[test]
        fn test_with_text_on_test_id() {
            let locator = Locator::test_id("product-name").with_text("Pliers");
            assert_eq!(locator.selector().css_query(), "[data-test='product-name']");
            assert_eq!(locator.selector().text_filter(), Some("Pliers"));
        }

        #[test]
        fn test_force_and_timeout() {
            let locator = Locator::test_id("nav-cart")
                .with_force()
                .with_timeout(Duration::from_millis(250));
            assert!(locator.options().force);
            assert!(locator.has_custom_timeout());
            assert_eq!(locator.options().timeout, Duration::from_millis(250));
        }

        #[test]
        fn test_describe_includes_ordinal() {
            let locator = Locator::new(".quantity").nth(1);
            assert_eq!(locator.describe(), ".quantity (#1)");
            assert_eq!(Locator::new(".st3").first().to_string(), ".st3 (first)");
        }
    }
}
