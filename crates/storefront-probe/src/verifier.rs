//! Business-rule checks over observed storefront state.
//!
//! Everything here is pure: the scenarios collect text, prices and
//! intercepted responses through the facade and hand them over. A failed
//! rule is an `AssertionFailed` (or `NetworkUnexpectedStatus` for a wrong
//! HTTP status), never a silent correction.

use tracing::debug;

use crate::assertion::{Assertion, AssertionResult};
use crate::network::InterceptedResponse;
use crate::price::{DiscountRule, Price, PriceTolerance};
use crate::result::{ProbeError, ProbeResult};

/// Status the favorites endpoint answers a duplicate with
pub const DUPLICATE_STATUS: u16 = 422;

/// Marker the duplicate response's message carries
pub const DUPLICATE_MARKER: &str = "Duplicate";

/// Parse every displayed price
pub fn parse_prices<S: AsRef<str>>(texts: &[S]) -> ProbeResult<Vec<Price>> {
    texts.iter().map(|t| Price::parse(t.as_ref())).collect()
}

/// One cart line per distinct product, each with the expected quantity
pub fn verify_quantities<S: AsRef<str>>(
    quantities: &[S],
    expected_lines: usize,
    expected_value: &str,
) -> ProbeResult<()> {
    let values: Vec<&str> = quantities.iter().map(AsRef::as_ref).collect();
    Assertion::has_length(&values, expected_lines)
        .context("cart lines")
        .into_result()?;
    Assertion::all(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Assertion::equals(expected_value, *v).context(&format!("quantity #{i}"))),
    )
    .into_result()
}

/// Displayed total equals the sum of displayed line prices
pub fn verify_cart_total(
    prices: &[Price],
    total: Price,
    tolerance: PriceTolerance,
) -> ProbeResult<()> {
    let expected = Price::total(prices.iter().copied())?;
    debug!(%expected, %total, %tolerance, lines = prices.len(), "cart total");
    Assertion::price_matches(expected, total, tolerance)
        .context("cart total")
        .into_result()
}

/// Displayed total equals the discount rule applied to the line prices
pub fn verify_discounted_total(
    prices: &[Price],
    total: Price,
    rule: &DiscountRule,
    tolerance: PriceTolerance,
) -> ProbeResult<()> {
    let expected = rule.expected_total(prices)?;
    debug!(%expected, %total, multiplier = %rule.multiplier, "discounted total");
    Assertion::price_matches(expected, total, tolerance)
        .context("discounted total")
        .into_result()
}

/// The first add-to-favorites call succeeded
pub fn verify_first_success(response: &InterceptedResponse) -> ProbeResult<()> {
    let _ = response.expect_success()?;
    Ok(())
}

/// The repeated add-to-favorites call was rejected by the server
pub fn verify_duplicate_rejection(response: &InterceptedResponse) -> ProbeResult<()> {
    let _ = response.expect_status(DUPLICATE_STATUS)?;
    match response.message() {
        Some(message) => Assertion::contains(message, DUPLICATE_MARKER)
            .context("duplicate message")
            .into_result(),
        None => Err(ProbeError::assertion(format!(
            "{DUPLICATE_STATUS} response from {} has no message field",
            response.url
        ))),
    }
}

/// Favorites list shows exactly `expected`, in order
pub fn verify_favorites<S: AsRef<str>>(names: &[S], expected: &[&str]) -> ProbeResult<()> {
    let names: Vec<&str> = names.iter().map(|n| n.as_ref().trim()).collect();
    Assertion::equals(expected, names.as_slice())
        .context("favorites")
        .into_result()
}

/// The opened product's category label names the filter
pub fn verify_category(label: &str, expected: &str) -> ProbeResult<()> {
    Assertion::contains(label, expected)
        .context("category label")
        .into_result()
}

/// At least one result, and every result name contains the term
pub fn verify_search_results<S: AsRef<str>>(names: &[S], term: &str) -> ProbeResult<()> {
    Assertion::not_empty(names)
        .context(&format!("search results for {term:?}"))
        .into_result()?;
    let checks: Vec<AssertionResult> = names
        .iter()
        .map(|n| Assertion::contains_ignore_case(n.as_ref(), term))
        .collect();
    Assertion::all(checks).context("search result").into_result()
}
