//! Storefront facade.
//!
//! Semantically named operations over the selector/action layer. Each one
//! is a fixed sequence of locate → act → wait steps; callers never see a
//! selector or a sleep. Navigation preconditions (being signed in before
//! touching favorites, being on the cart before reading prices) live here.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::driver::BrowserDriver;
use crate::fixture::TestData;
use crate::network::{HttpMethod, InterceptHandle, InterceptedResponse, UrlPattern};
use crate::page_object::{
    wait_for_page, CartPage, FavoritesPage, HomePage, LoginPage, PageObject, ProductPage,
    UrlMatcher,
};
use crate::price::Price;
use crate::result::{ProbeError, ProbeResult};
use crate::selectors::{cart, checkout, favorites, filter, login, nav, product, search};
use crate::session::Session;

/// Product listing endpoint hit by category pages and sidebar filters
const LISTING_API: &str = "**/products";
/// Product listing endpoint hit by the search box
const SEARCH_API: &str = "**/products/search";

#[derive(Debug, Deserialize)]
struct Listing {
    data: Vec<ListedProduct>,
}

#[derive(Debug, Deserialize)]
struct ListedProduct {
    name: String,
}

/// Names the listing response says the grid will show
fn listed_names(response: &InterceptedResponse) -> ProbeResult<Vec<String>> {
    let _ = response.expect_success()?;
    let listing: Listing = response.body_json()?;
    Ok(listing.data.into_iter().map(|p| p.name.trim().to_string()).collect())
}

/// Page-object facade over one browser session
#[derive(Debug)]
pub struct Storefront<D: BrowserDriver> {
    session: Session<D>,
    data: Arc<TestData>,
}

impl<D: BrowserDriver> Storefront<D> {
    /// Create a facade over `session` using the shared fixture
    #[must_use]
    pub const fn new(session: Session<D>, data: Arc<TestData>) -> Self {
        Self { session, data }
    }

    /// The fixture in use
    #[must_use]
    pub fn data(&self) -> &TestData {
        &self.data
    }

    /// Borrow the session
    #[must_use]
    pub const fn session(&self) -> &Session<D> {
        &self.session
    }

    /// Borrow the session mutably
    pub fn session_mut(&mut self) -> &mut Session<D> {
        &mut self.session
    }

    /// Give the session back
    pub fn into_session(self) -> Session<D> {
        self.session
    }

    /// Open the product grid
    pub async fn visit_home(&mut self) -> ProbeResult<()> {
        let url = self.data.home_page_url.clone();
        self.session.visit(&url).await?;
        wait_for_page(&self.session, &HomePage).await
    }

    /// Whether the header shows the signed-in account menu
    pub async fn is_authenticated(&self) -> ProbeResult<bool> {
        Ok(!self.session.query(&nav::menu()).await?.is_empty())
    }

    async fn on_storefront(&self) -> ProbeResult<bool> {
        let url = self.session.current_url().await?;
        Ok(url.starts_with(self.data.home_page_url.trim_end_matches('/')))
    }

    /// Sign in with the fixture credentials.
    ///
    /// Fails with `LoginFailed` if the browser is still on the login route
    /// once the navigation window is over.
    #[instrument(skip(self))]
    pub async fn login(&mut self) -> ProbeResult<()> {
        if !self.on_storefront().await? {
            let url = self.data.home_page_url.clone();
            self.session.visit(&url).await?;
        }

        self.session.click(&nav::sign_in()).await?;
        wait_for_page(&self.session, &LoginPage).await?;

        let credentials = self.data.login.clone();
        self.session.type_text(&login::email(), &credentials.email).await?;
        self.session
            .type_text(&login::password(), &credentials.password)
            .await?;
        self.session.click(&login::submit()).await?;

        let login_route = UrlMatcher::new(LoginPage.url_pattern());
        let url = self
            .session
            .wait_for_url(
                |url| !login_route.matches_prefix(url),
                |url| ProbeError::LoginFailed {
                    email: credentials.email.clone(),
                    url,
                },
            )
            .await?;
        info!(email = %credentials.email, url, "signed in");
        Ok(())
    }

    /// Visit the grid, open the first product and add it to the cart
    #[instrument(skip(self))]
    pub async fn add_first_item_to_cart(&mut self) -> ProbeResult<()> {
        self.visit_home().await?;
        self.open_first_product().await?;
        self.add_to_cart().await?;
        info!("first product added to cart");
        Ok(())
    }

    /// Sign in if needed, open the first product and add it to favorites.
    ///
    /// Returns once the add-to-favorites click has been issued; the request
    /// outcome is observed through an intercept.
    #[instrument(skip(self))]
    pub async fn add_first_item_to_favorites(&mut self) -> ProbeResult<()> {
        self.visit_home().await?;
        if !self.is_authenticated().await? {
            self.login().await?;
        }

        let url = self.session.current_url().await?;
        if LoginPage.matches_url(&url) {
            return Err(ProbeError::LoginFailed {
                email: self.data.login.email.clone(),
                url,
            });
        }

        self.session.click(&nav::home()).await?;
        wait_for_page(&self.session, &HomePage).await?;
        self.open_first_product().await?;
        self.session.click(&product::add_to_favorites()).await?;
        info!("add-to-favorites issued");
        Ok(())
    }

    async fn open_first_product(&mut self) -> ProbeResult<()> {
        self.session.click(&product::first_card()).await?;
        wait_for_page(&self.session, &ProductPage).await
    }

    /// Open the last product of the grid once it is visible
    pub async fn open_last_product(&mut self) -> ProbeResult<()> {
        self.session.click(&product::last_card()).await?;
        wait_for_page(&self.session, &ProductPage).await
    }

    /// Add the open product to the cart
    pub async fn add_to_cart(&mut self) -> ProbeResult<()> {
        self.session.click(&product::add_to_cart()).await
    }

    /// Click add-to-favorites on the open product
    pub async fn add_to_favorites(&mut self) -> ProbeResult<()> {
        self.session.click(&product::add_to_favorites()).await
    }

    /// Go to the cart through the (overlaid) header link
    pub async fn go_to_cart(&mut self) -> ProbeResult<()> {
        self.session.click(&nav::cart()).await?;
        wait_for_page(&self.session, &CartPage).await
    }

    /// Back to the product grid through the brand logo
    pub async fn back_to_products(&mut self) -> ProbeResult<()> {
        self.session.click(&nav::logo()).await?;
        wait_for_page(&self.session, &HomePage).await
    }

    /// Open the favorites list through the account menu
    pub async fn open_favorites(&mut self) -> ProbeResult<()> {
        self.session.click(&nav::menu()).await?;
        self.session.click(&nav::my_favorites()).await?;
        wait_for_page(&self.session, &FavoritesPage).await
    }

    /// Names on the favorites list (empty list is not an error)
    pub async fn favorite_names(&self) -> ProbeResult<Vec<String>> {
        Ok(self
            .session
            .query(&favorites::names())
            .await?
            .iter()
            .map(|e| e.text().trim().to_string())
            .collect())
    }

    /// Names on the favorites list, once at least one is rendered
    pub async fn listed_favorites(&self) -> ProbeResult<Vec<String>> {
        self.session.texts_of(&favorites::names()).await
    }

    /// Open favorites and delete the first entry
    #[instrument(skip(self))]
    pub async fn delete_item(&mut self) -> ProbeResult<()> {
        self.open_favorites().await?;
        let before = self.session.find_all(&favorites::delete_buttons()).await?.len();
        self.session
            .click(&favorites::delete_buttons().first())
            .await?;
        self.session
            .wait_for_count(&favorites::delete_buttons(), before - 1)
            .await?;
        info!(remaining = before - 1, "favorite deleted");
        Ok(())
    }

    /// Wait for the next listing response whose URL contains `marker`,
    /// then for the grid to show exactly the products it returned
    async fn settle_grid(&mut self, listing: &mut InterceptHandle, marker: &str) -> ProbeResult<()> {
        let response = loop {
            let response = self.session.next_response(listing).await?;
            if response.url.contains(marker) {
                break response;
            }
            debug!(url = %response.url, "skipping unrelated listing");
        };
        let expected = listed_names(&response)?;
        debug!(url = %response.url, products = expected.len(), "listing received");
        self.session.wait_for_texts(&product::names(), &expected).await
    }

    /// Open a category from the header dropdown and wait for its products
    pub async fn open_category(&mut self, name: &str) -> ProbeResult<()> {
        let mut listing = self
            .session
            .intercept(HttpMethod::Get, UrlPattern::glob(LISTING_API))
            .await?;
        self.session.click(&nav::categories()).await?;
        self.session.click(&nav::category(name)).await?;
        let _ = self
            .session
            .wait_for_url(
                |url| url.contains("/category/"),
                |url| ProbeError::Navigation {
                    url,
                    message: format!("category {name:?} did not open"),
                },
            )
            .await?;
        self.settle_grid(&mut listing, "by_category").await
    }

    /// Open the first product card of the current listing
    pub async fn open_first_card_body(&mut self) -> ProbeResult<()> {
        self.session.click(&product::card_body(0)).await?;
        wait_for_page(&self.session, &ProductPage).await
    }

    /// Submit a free-text search from the grid and wait until the grid
    /// shows the results
    pub async fn search(&mut self, term: &str) -> ProbeResult<()> {
        let mut listing = self
            .session
            .intercept(HttpMethod::Get, UrlPattern::glob(SEARCH_API))
            .await?;
        self.session.type_text(&search::query(), term).await?;
        self.session.click(&search::submit()).await?;
        self.settle_grid(&mut listing, "/products/search").await
    }

    /// Names shown in the result grid, once at least one is rendered
    pub async fn search_result_names(&self) -> ProbeResult<Vec<String>> {
        self.session.texts_of(&product::names()).await
    }

    /// Tick the sidebar filter labelled `label` and wait until the grid
    /// shows the filtered products. Already ticked is a no-op.
    pub async fn apply_category_filter(&mut self, label: &str) -> ProbeResult<()> {
        let checkbox = filter::checkbox(label);
        if self.session.find(&checkbox).await?.attribute("checked").is_some() {
            return Ok(());
        }
        let mut listing = self
            .session
            .intercept(HttpMethod::Get, UrlPattern::glob(LISTING_API))
            .await?;
        self.session.check(&checkbox).await?;
        self.settle_grid(&mut listing, "by_category").await
    }

    /// Number of product links in the filtered grid, once at least one is
    /// rendered
    pub async fn filtered_product_count(&self) -> ProbeResult<usize> {
        Ok(self.session.find_all(&product::filtered_links()).await?.len())
    }

    /// Open the filtered product at `index`
    pub async fn open_filtered_product(&mut self, index: usize) -> ProbeResult<()> {
        self.session
            .click(&product::filtered_links().nth(index))
            .await?;
        wait_for_page(&self.session, &ProductPage).await
    }

    /// Category badge of the open product
    pub async fn category_label(&self) -> ProbeResult<String> {
        self.session.text_of(&product::category_badge()).await
    }

    /// Wait until cart line `index` shows quantity `expected`
    pub async fn expect_quantity(&self, index: usize, expected: &str) -> ProbeResult<()> {
        self.session.assert_value(&cart::quantity(index), expected).await
    }

    /// Quantity field of every cart line
    pub async fn cart_quantities(&self) -> ProbeResult<Vec<String>> {
        Ok(self
            .session
            .find_all(&cart::quantity_inputs())
            .await?
            .into_iter()
            .map(|e| e.value.unwrap_or_default())
            .collect())
    }

    /// Displayed unit price of every cart line
    pub async fn cart_line_prices(&self) -> ProbeResult<Vec<Price>> {
        self.session
            .texts_of(&cart::prices())
            .await?
            .iter()
            .map(|t| Price::parse(t))
            .collect()
    }

    /// Displayed cart total
    pub async fn cart_total(&self) -> ProbeResult<Price> {
        Price::parse(&self.session.text_of(&cart::total()).await?)
    }

    /// Walk the checkout wizard from the cart and pay cash on delivery
    #[instrument(skip(self))]
    pub async fn checkout_cash_on_delivery(&mut self) -> ProbeResult<()> {
        for step in 1..=3 {
            self.session.click(&checkout::proceed(step)).await?;
        }

        let labels = self.data.expected_labels.clone();
        self.session
            .select(&checkout::payment_method(), &labels.payment_method_label)
            .await?;
        self.session
            .assert_value(&checkout::payment_method(), &labels.payment_method_value)
            .await?;
        self.session.click(&checkout::finish()).await?;
        let _ = self.session.find(&checkout::confirmation()).await?;
        info!(payment = %labels.payment_method_label, "order confirmed");
        Ok(())
    }
}
