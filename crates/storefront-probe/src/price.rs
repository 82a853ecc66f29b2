//! Currency values observed in the UI.
//!
//! Prices are parsed into fixed-precision decimals before any arithmetic,
//! so sums of displayed prices are exact and a total can be compared
//! without float noise.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::result::{ProbeError, ProbeResult};

/// Round to cents, half away from zero
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A parsed price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Wrap a decimal amount
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount in cents, e.g. `Price::from_cents(1415)` is $14.15
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a displayed price such as `"$1,234.50"` or `" 14.15 "`
    pub fn parse(text: &str) -> ProbeResult<Self> {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$')
            .collect();
        if cleaned.is_empty() {
            return Err(ProbeError::PriceParse {
                input: text.to_string(),
            });
        }
        Decimal::from_str(&cleaned)
            .map(Self)
            .map_err(|_| ProbeError::PriceParse {
                input: text.to_string(),
            })
    }

    /// The decimal amount
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Rounded to cents
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(round2(self.0))
    }

    /// Multiply and round to cents
    pub fn scaled(self, factor: Decimal) -> ProbeResult<Self> {
        self.0
            .checked_mul(factor)
            .map(|amount| Self(round2(amount)))
            .ok_or_else(|| overflow(format!("{self} × {factor}")))
    }

    /// Sum of two prices
    pub fn checked_add(self, rhs: Self) -> ProbeResult<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| overflow(format!("{self} + {rhs}")))
    }

    /// Sum of every price; zero for none
    pub fn total<I: IntoIterator<Item = Self>>(prices: I) -> ProbeResult<Self> {
        prices
            .into_iter()
            .try_fold(Self::default(), Self::checked_add)
    }
}

fn overflow(operation: String) -> ProbeError {
    ProbeError::PriceOverflow { operation }
}

impl FromStr for Price {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// How close a displayed total must be to the computed one.
///
/// Written in configuration as `exact` or as a `cents: n` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ToleranceForm", into = "ToleranceForm")]
pub enum PriceTolerance {
    /// Same amount to the cent
    #[default]
    Exact,
    /// Within this many cents either way
    Cents(u32),
}

impl PriceTolerance {
    /// Whether `actual` is acceptable for `expected`
    #[must_use]
    pub fn accepts(self, expected: Price, actual: Price) -> bool {
        match self {
            Self::Exact => expected.amount() == actual.amount(),
            Self::Cents(cents) => {
                let slack = Decimal::new(i64::from(cents), 2);
                expected
                    .amount()
                    .checked_sub(actual.amount())
                    .is_some_and(|gap| gap.abs() <= slack)
            }
        }
    }
}

/// Serialized shape of [`PriceTolerance`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ToleranceForm {
    Named(String),
    Cents { cents: u32 },
}

impl TryFrom<ToleranceForm> for PriceTolerance {
    type Error = String;

    fn try_from(form: ToleranceForm) -> Result<Self, Self::Error> {
        match form {
            ToleranceForm::Named(name) if name.trim().eq_ignore_ascii_case("exact") => {
                Ok(Self::Exact)
            }
            ToleranceForm::Named(name) => Err(format!(
                "unknown price tolerance {name:?}, expected `exact` or `cents: <n>`"
            )),
            ToleranceForm::Cents { cents } => Ok(Self::Cents(cents)),
        }
    }
}

impl From<PriceTolerance> for ToleranceForm {
    fn from(tolerance: PriceTolerance) -> Self {
        match tolerance {
            PriceTolerance::Exact => Self::Named("exact".to_string()),
            PriceTolerance::Cents(cents) => Self::Cents { cents },
        }
    }
}

impl fmt::Display for PriceTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Cents(cents) => write!(f, "±{cents}¢"),
        }
    }
}

/// Discount applied to a bundle total.
///
/// The expected total is `round2(sum * multiplier)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    /// Factor applied to the undiscounted sum
    pub multiplier: Decimal,
}

impl Default for DiscountRule {
    fn default() -> Self {
        Self::literal_bundle()
    }
}

impl DiscountRule {
    /// Total is 0.2 × sum, as the bundle check has always computed it
    #[must_use]
    pub fn literal_bundle() -> Self {
        Self {
            multiplier: Decimal::new(2, 1),
        }
    }

    /// Conventional "n% off": total is (1 - n/100) × sum
    #[must_use]
    pub fn percent_off(percent: u32) -> Self {
        Self {
            multiplier: Decimal::ONE - Decimal::new(i64::from(percent), 2),
        }
    }

    /// Expected total for the given line prices
    pub fn expected_total(&self, prices: &[Price]) -> ProbeResult<Price> {
        Price::total(prices.iter().copied())?.scaled(self.multiplier)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_dollar_amount() {
            assert_eq!(Price::parse("$14.15").unwrap(), Price::from_cents(1415));
            assert_eq!(Price::parse(" $ 1,234.50 ").unwrap(), Price::from_cents(123_450));
            assert_eq!("9.99".parse::<Price>().unwrap(), Price::from_cents(999));
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(matches!(
                Price::parse("$"),
                Err(ProbeError::PriceParse { .. })
            ));
            assert!(Price::parse("free").is_err());
            assert!(Price::parse("").is_err());
        }

        #[test]
        fn test_display() {
            assert_eq!(Price::from_cents(1415).to_string(), "$14.15");
            assert_eq!(Price::parse("3").unwrap().to_string(), "$3.00");
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn test_sum_is_exact() {
            let total = Price::total([Price::from_cents(10), Price::from_cents(20)]).unwrap();
            assert_eq!(total, Price::from_cents(30));
            assert_eq!(Price::total([]).unwrap(), Price::default());
        }

        #[test]
        fn test_sum_past_decimal_range_is_error() {
            let huge = Price::new(Decimal::MAX);
            let err = Price::total([huge, Price::from_cents(100)]).unwrap_err();
            assert!(matches!(err, ProbeError::PriceOverflow { .. }), "{err:?}");
            assert_eq!(err.kind(), "PriceOverflow");
        }

        #[test]
        fn test_scaling_past_decimal_range_is_error() {
            let huge = Price::new(Decimal::MAX);
            assert!(matches!(
                huge.scaled(Decimal::TWO),
                Err(ProbeError::PriceOverflow { .. })
            ));
            assert_eq!(
                Price::from_cents(1415).scaled(Decimal::TWO).unwrap(),
                Price::from_cents(2830)
            );
        }

        #[test]
        fn test_round2_half_away_from_zero() {
            assert_eq!(round2(Decimal::new(1005, 3)), Decimal::new(101, 2));
            assert_eq!(round2(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
            assert_eq!(round2(Decimal::new(1004, 3)), Decimal::new(100, 2));
        }
    }

    mod tolerance_tests {
        use super::*;

        #[test]
        fn test_exact() {
            let a = Price::from_cents(2830);
            assert!(PriceTolerance::Exact.accepts(a, Price::parse("28.30").unwrap()));
            assert!(!PriceTolerance::Exact.accepts(a, Price::from_cents(2831)));
        }

        #[test]
        fn test_cents() {
            let a = Price::from_cents(2830);
            assert!(PriceTolerance::Cents(1).accepts(a, Price::from_cents(2831)));
            assert!(PriceTolerance::Cents(1).accepts(a, Price::from_cents(2829)));
            assert!(!PriceTolerance::Cents(1).accepts(a, Price::from_cents(2832)));
        }

        #[test]
        fn test_serde_forms() {
            let exact: PriceTolerance = serde_yaml_ng::from_str("exact").unwrap();
            assert_eq!(exact, PriceTolerance::Exact);
            let cents: PriceTolerance = serde_yaml_ng::from_str("cents: 2").unwrap();
            assert_eq!(cents, PriceTolerance::Cents(2));
            let json: PriceTolerance = serde_json::from_str(r#"{"cents": 3}"#).unwrap();
            assert_eq!(json, PriceTolerance::Cents(3));
        }

        #[test]
        fn test_serialized_form_reads_back() {
            let yaml = serde_yaml_ng::to_string(&PriceTolerance::Cents(1)).unwrap();
            assert_eq!(yaml.trim(), "cents: 1");
            let back: PriceTolerance = serde_yaml_ng::from_str(&yaml).unwrap();
            assert_eq!(back, PriceTolerance::Cents(1));
            assert_eq!(
                serde_json::to_string(&PriceTolerance::Exact).unwrap(),
                r#""exact""#
            );
        }

        #[test]
        fn test_unknown_form_rejected() {
            let err = serde_yaml_ng::from_str::<PriceTolerance>("roughly").unwrap_err();
            assert!(err.to_string().contains("unknown price tolerance"));
            assert!(serde_yaml_ng::from_str::<PriceTolerance>("cents: -1").is_err());
        }

        #[test]
        fn test_cents_gap_past_decimal_range_not_accepted() {
            let (high, low) = (Price::new(Decimal::MAX), Price::new(Decimal::MIN));
            assert!(!PriceTolerance::Cents(1).accepts(high, low));
        }
    }

    mod discount_tests {
        use super::*;

        #[test]
        fn test_literal_bundle() {
            let rule = DiscountRule::literal_bundle();
            let expected = rule
                .expected_total(&[Price::from_cents(1415), Price::from_cents(2999)])
                .unwrap();
            // (14.15 + 29.99) * 0.2 = 8.828
            assert_eq!(expected, Price::from_cents(883));
        }

        #[test]
        fn test_percent_off() {
            let rule = DiscountRule::percent_off(20);
            assert_eq!(rule.multiplier, Decimal::new(8, 1));
            let expected = rule
                .expected_total(&[Price::from_cents(1000), Price::from_cents(500)])
                .unwrap();
            assert_eq!(expected, Price::from_cents(1200));
        }

        #[test]
        fn test_overflowing_lines_are_error() {
            let rule = DiscountRule::literal_bundle();
            let lines = [Price::new(Decimal::MAX), Price::new(Decimal::MAX)];
            assert!(matches!(
                rule.expected_total(&lines),
                Err(ProbeError::PriceOverflow { .. })
            ));
        }

        #[test]
        fn test_default_is_literal() {
            assert_eq!(DiscountRule::default(), DiscountRule::literal_bundle());
        }
    }

    mod property_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn prop_displayed_prices_sum_exactly(cents in proptest::collection::vec(0i64..1_000_000, 1..6)) {
                let displayed: Vec<Price> = cents
                    .iter()
                    .map(|c| Price::parse(&Price::from_cents(*c).to_string()).unwrap())
                    .collect();
                let total = Price::total(displayed).unwrap();
                prop_assert_eq!(total, Price::from_cents(cents.iter().sum()));
            }

            #[test]
            fn prop_round2_is_idempotent(units in -10_000_000i64..10_000_000, scale in 0u32..6) {
                let value = Decimal::new(units, scale);
                prop_assert_eq!(round2(round2(value)), round2(value));
            }

            #[test]
            fn prop_exact_tolerance_is_equality(a in 0i64..100_000, b in 0i64..100_000) {
                let (pa, pb) = (Price::from_cents(a), Price::from_cents(b));
                prop_assert_eq!(PriceTolerance::Exact.accepts(pa, pb), a == b);
            }
        }
    }
}
