//! Scenario catalog.
//!
//! Each scenario is a linear sequence of facade calls followed by business
//! rule checks from [`crate::verifier`]. The only branch point is the seeded
//! product draw in the filter scenario. Any error ends the scenario.

use std::fmt;

use tracing::info;

use crate::assertion::Assertion;
use crate::config::ProbeConfig;
use crate::driver::BrowserDriver;
use crate::network::{HttpMethod, UrlPattern};
use crate::picker::Picker;
use crate::price::{DiscountRule, PriceTolerance};
use crate::result::{ProbeError, ProbeResult};
use crate::storefront::Storefront;
use crate::verifier;

/// Which procedure a scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    /// Add one product, its cart line shows quantity 1
    CartSingleItem,
    /// Add two different products, two lines of quantity 1
    CartTwoDistinctItems,
    /// Favorite a product while signed out, see it listed, delete it
    FavoritesAddAndDelete,
    /// Favorite the same product twice, the server rejects the second
    FavoritesDuplicateRejected,
    /// Cart total equals the sum of line prices
    CartPriceSum,
    /// Walk checkout and pay cash on delivery
    CheckoutCashOnDelivery,
    /// Filter by category and open a random match
    FilterRandomProduct,
    /// Free-text search results all contain the term
    SearchResults,
    /// Tool + rental bundle total follows the discount rule
    DiscountRentalBundle,
}

/// A named, tagged scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    /// Stable id used for selection and reports
    pub id: &'static str,
    /// Human readable name
    pub name: &'static str,
    /// Selection tags
    pub tags: &'static [&'static str],
    /// Procedure
    pub kind: ScenarioKind,
}

const CATALOG: [Scenario; 9] = [
    Scenario {
        id: "cart-single-item",
        name: "Added product shows quantity 1 in the cart",
        tags: &["cart"],
        kind: ScenarioKind::CartSingleItem,
    },
    Scenario {
        id: "cart-two-distinct-items",
        name: "Two different products make two cart lines",
        tags: &["cart"],
        kind: ScenarioKind::CartTwoDistinctItems,
    },
    Scenario {
        id: "favorites-add-and-delete",
        name: "Favorite added while signed out can be deleted",
        tags: &["favorites"],
        kind: ScenarioKind::FavoritesAddAndDelete,
    },
    Scenario {
        id: "favorites-duplicate-rejected",
        name: "Adding the same favorite twice is rejected",
        tags: &["favorites", "network"],
        kind: ScenarioKind::FavoritesDuplicateRejected,
    },
    Scenario {
        id: "cart-price-sum",
        name: "Cart total is the sum of line prices",
        tags: &["cart", "pricing"],
        kind: ScenarioKind::CartPriceSum,
    },
    Scenario {
        id: "checkout-cash-on-delivery",
        name: "Checkout paying cash on delivery",
        tags: &["checkout"],
        kind: ScenarioKind::CheckoutCashOnDelivery,
    },
    Scenario {
        id: "filter-hammer-random-product",
        name: "Any filtered product belongs to the filter category",
        tags: &["catalog", "filter"],
        kind: ScenarioKind::FilterRandomProduct,
    },
    Scenario {
        id: "search-wood",
        name: "Every search result contains the term",
        tags: &["catalog", "search"],
        kind: ScenarioKind::SearchResults,
    },
    Scenario {
        id: "discount-rental-bundle",
        name: "Rental bundle total follows the discount rule",
        tags: &["cart", "pricing", "discount"],
        kind: ScenarioKind::DiscountRentalBundle,
    },
];

/// Every scenario, in catalog order
#[must_use]
pub fn catalog() -> &'static [Scenario] {
    &CATALOG
}

/// Look a scenario up by id
#[must_use]
pub fn by_id(id: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Scenarios whose id or name contains `filter` (case-insensitive) and that
/// carry at least one of `tags` (no tags selects all), in catalog order
#[must_use]
pub fn select(filter: Option<&str>, tags: &[String]) -> Vec<&'static Scenario> {
    CATALOG
        .iter()
        .filter(|s| filter.map_or(true, |f| s.matches_filter(f)))
        .filter(|s| tags.is_empty() || tags.iter().any(|t| s.has_tag(t)))
        .collect()
}

impl Scenario {
    /// Whether id or name contains `filter`, ignoring case
    #[must_use]
    pub fn matches_filter(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.id.contains(&filter) || self.name.to_lowercase().contains(&filter)
    }

    /// Whether the scenario carries `tag`
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Run the procedure against a fresh storefront session
    pub async fn run<D: BrowserDriver>(
        &self,
        shop: &mut Storefront<D>,
        ctx: &mut ScenarioContext,
    ) -> ProbeResult<()> {
        match self.kind {
            ScenarioKind::CartSingleItem => cart_single_item(shop).await,
            ScenarioKind::CartTwoDistinctItems => cart_two_distinct_items(shop).await,
            ScenarioKind::FavoritesAddAndDelete => favorites_add_and_delete(shop).await,
            ScenarioKind::FavoritesDuplicateRejected => favorites_duplicate_rejected(shop).await,
            ScenarioKind::CartPriceSum => cart_price_sum(shop, ctx).await,
            ScenarioKind::CheckoutCashOnDelivery => checkout_cash_on_delivery(shop).await,
            ScenarioKind::FilterRandomProduct => filter_random_product(shop, ctx).await,
            ScenarioKind::SearchResults => search_results(shop).await,
            ScenarioKind::DiscountRentalBundle => discount_rental_bundle(shop, ctx).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.name)
    }
}

/// Per-scenario knobs and the seeded picker
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    /// Price comparison policy
    pub tolerance: PriceTolerance,
    /// Bundle discount rule
    pub discount_rule: DiscountRule,
    /// Random draw source, seeded for this scenario
    pub picker: Picker,
}

impl ScenarioContext {
    /// Context for `scenario` under `config`
    #[must_use]
    pub fn new(config: &ProbeConfig, scenario: &Scenario) -> Self {
        Self {
            tolerance: config.price_tolerance,
            discount_rule: config.discount_rule,
            picker: Picker::new(config.seed.for_scenario(scenario.id)),
        }
    }
}

async fn cart_single_item<D: BrowserDriver>(shop: &mut Storefront<D>) -> ProbeResult<()> {
    let expected = shop.data().expected_labels.expected_quantity.clone();
    shop.add_first_item_to_cart().await?;
    shop.go_to_cart().await?;
    shop.expect_quantity(0, &expected).await?;
    let quantities = shop.cart_quantities().await?;
    verifier::verify_quantities(&quantities, 1, &expected)
}

async fn add_two_distinct_items<D: BrowserDriver>(shop: &mut Storefront<D>) -> ProbeResult<()> {
    shop.add_first_item_to_cart().await?;
    shop.back_to_products().await?;
    shop.open_last_product().await?;
    shop.add_to_cart().await?;
    shop.go_to_cart().await
}

async fn cart_two_distinct_items<D: BrowserDriver>(shop: &mut Storefront<D>) -> ProbeResult<()> {
    let expected = shop.data().expected_labels.expected_quantity.clone();
    add_two_distinct_items(shop).await?;
    let quantities = shop.cart_quantities().await?;
    verifier::verify_quantities(&quantities, 2, &expected)
}

async fn favorites_add_and_delete<D: BrowserDriver>(shop: &mut Storefront<D>) -> ProbeResult<()> {
    let favorite = shop.data().expected_labels.favorite_product.clone();
    shop.add_first_item_to_favorites().await?;
    shop.open_favorites().await?;
    let names = shop.listed_favorites().await?;
    verifier::verify_favorites(&names, &[favorite.as_str()])?;

    shop.delete_item().await?;
    let remaining = shop.favorite_names().await?;
    verifier::verify_favorites::<String>(&remaining, &[])
}

async fn favorites_duplicate_rejected<D: BrowserDriver>(
    shop: &mut Storefront<D>,
) -> ProbeResult<()> {
    let favorite = shop.data().expected_labels.favorite_product.clone();
    let mut handle = shop
        .session_mut()
        .intercept(HttpMethod::Post, UrlPattern::glob("**/favorites"))
        .await?;

    shop.add_first_item_to_favorites().await?;
    let first = shop.session_mut().next_response(&mut handle).await?;
    verifier::verify_first_success(&first)?;

    shop.add_to_favorites().await?;
    let second = shop.session_mut().next_response(&mut handle).await?;
    verifier::verify_duplicate_rejection(&second)?;
    info!(status = second.status, message = ?second.message(), "duplicate rejected");

    shop.open_favorites().await?;
    let names = shop.listed_favorites().await?;
    verifier::verify_favorites(&names, &[favorite.as_str()])?;

    // leave the account as it was found
    shop.delete_item().await?;
    let remaining = shop.favorite_names().await?;
    verifier::verify_favorites::<String>(&remaining, &[])
}

async fn cart_price_sum<D: BrowserDriver>(
    shop: &mut Storefront<D>,
    ctx: &ScenarioContext,
) -> ProbeResult<()> {
    add_two_distinct_items(shop).await?;
    let prices = shop.cart_line_prices().await?;
    Assertion::has_length(&prices, 2)
        .context("cart line prices")
        .into_result()?;
    let total = shop.cart_total().await?;
    verifier::verify_cart_total(&prices, total, ctx.tolerance)
}

async fn checkout_cash_on_delivery<D: BrowserDriver>(
    shop: &mut Storefront<D>,
) -> ProbeResult<()> {
    shop.login().await?;
    shop.add_first_item_to_cart().await?;
    shop.go_to_cart().await?;
    shop.checkout_cash_on_delivery().await
}

async fn filter_random_product<D: BrowserDriver>(
    shop: &mut Storefront<D>,
    ctx: &mut ScenarioContext,
) -> ProbeResult<()> {
    let category = shop.data().expected_labels.filter_category.clone();
    shop.visit_home().await?;
    shop.apply_category_filter(&category).await?;

    let count = shop.filtered_product_count().await?;
    let index = ctx
        .picker
        .pick_index(count)
        .ok_or_else(|| ProbeError::assertion(format!("no products under filter {category:?}")))?;
    info!(index, count, seed = ctx.picker.seed().value(), "drew filtered product");

    shop.open_filtered_product(index).await?;
    let label = shop.category_label().await?;
    verifier::verify_category(&label, &category)
}

async fn search_results<D: BrowserDriver>(shop: &mut Storefront<D>) -> ProbeResult<()> {
    let term = shop.data().expected_labels.search_term.clone();
    shop.visit_home().await?;
    shop.search(&term).await?;
    let names = shop.search_result_names().await?;
    verifier::verify_search_results(&names, &term)
}

async fn discount_rental_bundle<D: BrowserDriver>(
    shop: &mut Storefront<D>,
    ctx: &ScenarioContext,
) -> ProbeResult<()> {
    let category = shop.data().expected_labels.discount_category.clone();
    shop.add_first_item_to_cart().await?;
    shop.open_category(&category).await?;
    shop.open_first_card_body().await?;
    shop.add_to_cart().await?;
    shop.go_to_cart().await?;

    let prices = shop.cart_line_prices().await?;
    Assertion::has_length(&prices, 2)
        .context("bundle lines")
        .into_result()?;
    let total = shop.cart_total().await?;
    verifier::verify_discounted_total(&prices, total, &ctx.discount_rule, ctx.tolerance)
}
