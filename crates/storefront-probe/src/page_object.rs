//! Page Object Model support.
//!
//! A page object names one screen of the storefront: the route it lives at
//! and an element whose presence means the screen has rendered. The facade
//! uses them to wait for navigation instead of sleeping.

use std::collections::HashMap;

use tracing::debug;

use crate::driver::BrowserDriver;
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::selectors;
use crate::session::Session;

/// Trait for page objects representing a page of the storefront.
///
/// # Example
///
/// ```ignore
/// struct OrdersPage;
///
/// impl PageObject for OrdersPage {
///     fn url_pattern(&self) -> &str {
///         "/account/orders"
///     }
///
///     fn ready_marker(&self) -> Locator {
///         Locator::test_id("order-list")
///     }
/// }
/// ```
pub trait PageObject {
    /// Route pattern that matches this page (e.g. "/auth/login", "/product/:id")
    fn url_pattern(&self) -> &str;

    /// Element whose presence means the page has rendered
    fn ready_marker(&self) -> Locator;

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether `url` is this page's route
    fn matches_url(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches(url)
    }
}

/// Wait until the session is on `page` and its ready marker is present
pub async fn wait_for_page<D, P>(session: &Session<D>, page: &P) -> ProbeResult<()>
where
    D: BrowserDriver,
    P: PageObject + Sync,
{
    let url = session
        .wait_for_url(
            |url| page.matches_url(url),
            |url| ProbeError::Navigation {
                url,
                message: format!("expected route {}", page.url_pattern()),
            },
        )
        .await?;
    let _ = session.find(&page.ready_marker()).await?;
    debug!(page = page.page_name(), url, "page ready");
    Ok(())
}

/// Sign-in form
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginPage;

impl PageObject for LoginPage {
    fn url_pattern(&self) -> &str {
        "/auth/login"
    }

    fn ready_marker(&self) -> Locator {
        selectors::login::email()
    }

    fn page_name(&self) -> &str {
        "login"
    }
}

/// Product grid
#[derive(Debug, Clone, Copy, Default)]
pub struct HomePage;

impl PageObject for HomePage {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn ready_marker(&self) -> Locator {
        selectors::product::first_card()
    }

    fn page_name(&self) -> &str {
        "home"
    }
}

/// Product detail
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductPage;

impl ProductPage {
    /// Product id from a product detail URL
    #[must_use]
    pub fn product_id(url: &str) -> Option<String> {
        let matcher = UrlMatcher::new(Self.url_pattern());
        if !matcher.matches(url) {
            return None;
        }
        matcher.extract_params(url).remove("id")
    }
}

impl PageObject for ProductPage {
    fn url_pattern(&self) -> &str {
        "/product/:id"
    }

    fn ready_marker(&self) -> Locator {
        selectors::product::add_to_cart()
    }

    fn page_name(&self) -> &str {
        "product"
    }
}

/// Cart, the first step of the checkout wizard
#[derive(Debug, Clone, Copy, Default)]
pub struct CartPage;

impl PageObject for CartPage {
    fn url_pattern(&self) -> &str {
        "/checkout"
    }

    fn ready_marker(&self) -> Locator {
        selectors::cart::total()
    }

    fn page_name(&self) -> &str {
        "cart"
    }
}

/// Favorites list of the signed-in account
#[derive(Debug, Clone, Copy, Default)]
pub struct FavoritesPage;

impl PageObject for FavoritesPage {
    fn url_pattern(&self) -> &str {
        "/account/favorites"
    }

    fn ready_marker(&self) -> Locator {
        Locator::new("h1").with_text("Favorites")
    }

    fn page_name(&self) -> &str {
        "favorites"
    }
}

/// URL route matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a route pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/auth/login`
    /// - Wildcards: `/category/*`
    /// - Named parameters: `/product/:id`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Route part of a URL: no scheme, host, query or fragment
    #[must_use]
    pub fn route(url: &str) -> &str {
        let without_origin = url
            .split_once("://")
            .map_or(url, |(_, rest)| rest.find('/').map_or("/", |i| &rest[i..]));
        without_origin
            .split(['?', '#'])
            .next()
            .unwrap_or(without_origin)
    }

    fn url_segments(url: &str) -> Vec<&str> {
        Self::route(url)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Check if a URL matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url_segments = Self::url_segments(url);

        // wildcards and parameters each consume exactly one segment
        if url_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(&url_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit == actual,
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
            })
    }

    /// Whether the URL's route starts with this pattern's segments
    #[must_use]
    pub fn matches_prefix(&self, url: &str) -> bool {
        let url_segments = Self::url_segments(url);
        url_segments.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(&url_segments)
                .all(|(segment, actual)| match segment {
                    UrlSegment::Literal(lit) => lit == actual,
                    UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
                })
    }

    /// Extract parameters from a URL
    #[must_use]
    pub fn extract_params(&self, url: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let url_segments = Self::url_segments(url);

        for (segment, value) in self.segments.iter().zip(&url_segments) {
            if let UrlSegment::Parameter(name) = segment {
                let _ = params.insert(name.clone(), (*value).to_string());
            }
        }

        params
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
