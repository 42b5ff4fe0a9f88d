//! Exact decimal prices for tours and bookings.
//!
//! Prices are stored and transmitted as decimal strings so no floating point
//! rounding ever touches money. Arithmetic happens on [`BigDecimal`] and the
//! wire form always carries two fraction digits, for example `"500.00"`.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// Largest representable price, one short of nine integer digits.
const MAX_INTEGER_DIGITS: u32 = 8;
/// Fraction digits kept on every price.
const FRACTION_DIGITS: i64 = 2;

/// Validation errors for price values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceValidationError {
    /// Price was negative.
    Negative,
    /// Price carried more than two fraction digits.
    TooPrecise,
    /// Price reached nine or more integer digits.
    TooLarge,
    /// Input could not be parsed as a decimal number.
    Unparseable,
}

impl fmt::Display for PriceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "price must not be negative"),
            Self::TooPrecise => write!(
                f,
                "price must have at most {FRACTION_DIGITS} fraction digits"
            ),
            Self::TooLarge => write!(
                f,
                "price must have at most {MAX_INTEGER_DIGITS} integer digits"
            ),
            Self::Unparseable => write!(f, "price must be a decimal number"),
        }
    }
}

impl std::error::Error for PriceValidationError {}

/// Non-negative tour price in the campus currency.
///
/// ## Invariants
/// - Never negative.
/// - At most two fraction digits and eight integer digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(BigDecimal);

impl Price {
    /// Validate and construct a [`Price`] from a decimal value.
    pub fn try_new(value: BigDecimal) -> Result<Self, PriceValidationError> {
        if value < BigDecimal::zero() {
            return Err(PriceValidationError::Negative);
        }
        if value.normalized().fractional_digit_count() > FRACTION_DIGITS {
            return Err(PriceValidationError::TooPrecise);
        }
        if value >= BigDecimal::from(10u64.pow(MAX_INTEGER_DIGITS)) {
            return Err(PriceValidationError::TooLarge);
        }
        Ok(Self(value.with_scale(FRACTION_DIGITS)))
    }

    /// Parse a price from its decimal string form.
    pub fn parse(value: &str) -> Result<Self, PriceValidationError> {
        let parsed = BigDecimal::from_str(value.trim())
            .map_err(|_| PriceValidationError::Unparseable)?;
        Self::try_new(parsed)
    }

    /// The zero price used by free tours.
    #[must_use]
    pub fn free() -> Self {
        Self(BigDecimal::zero().with_scale(FRACTION_DIGITS))
    }

    /// Whether the price is exactly zero.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.0.is_zero()
    }

    /// Underlying decimal amount.
    #[must_use]
    pub fn amount(&self) -> &BigDecimal {
        &self.0
    }

    /// Total cost for a party of `participants`.
    ///
    /// The result must itself satisfy the price bounds so it fits the same
    /// storage column as a unit price.
    pub fn total_for(&self, participants: u32) -> Result<Self, PriceValidationError> {
        Self::try_new(&self.0 * BigDecimal::from(participants))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.with_scale(FRACTION_DIGITS))
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Price {
    type Error = PriceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Price filter bands offered by the tour catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBand {
    /// Exactly zero.
    #[serde(rename = "free")]
    Free,
    /// Strictly below 500, free tours included.
    #[serde(rename = "under500")]
    Under500,
    /// From 500 to 1000 inclusive.
    #[serde(rename = "500-1000")]
    Between500And1000,
    /// Strictly above 1000.
    #[serde(rename = "over1000")]
    Over1000,
}

impl PriceBand {
    /// Stable string form used in query parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Under500 => "under500",
            Self::Between500And1000 => "500-1000",
            Self::Over1000 => "over1000",
        }
    }

    /// Whether `price` falls inside this band.
    #[must_use]
    pub fn matches(self, price: &Price) -> bool {
        let amount = price.amount();
        match self {
            Self::Free => price.is_free(),
            Self::Under500 => amount < &BigDecimal::from(500),
            Self::Between500And1000 => {
                amount >= &BigDecimal::from(500) && amount <= &BigDecimal::from(1000)
            }
            Self::Over1000 => amount > &BigDecimal::from(1000),
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a price band query value is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriceBand(pub String);

impl fmt::Display for UnknownPriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown price band: {}", self.0)
    }
}

impl std::error::Error for UnknownPriceBand {}

impl FromStr for PriceBand {
    type Err = UnknownPriceBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "under500" => Ok(Self::Under500),
            "500-1000" => Ok(Self::Between500And1000),
            "over1000" => Ok(Self::Over1000),
            other => Err(UnknownPriceBand(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", "0.00")]
    #[case("500", "500.00")]
    #[case("499.9", "499.90")]
    #[case("  1250.75 ", "1250.75")]
    fn parse_normalises_to_two_fraction_digits(#[case] raw: &str, #[case] display: &str) {
        let price = Price::parse(raw).expect("valid price should parse");
        assert_eq!(price.to_string(), display);
    }

    #[rstest]
    #[case("-1", PriceValidationError::Negative)]
    #[case("10.505", PriceValidationError::TooPrecise)]
    #[case("100000000", PriceValidationError::TooLarge)]
    #[case("ten", PriceValidationError::Unparseable)]
    fn parse_rejects_out_of_range_values(
        #[case] raw: &str,
        #[case] expected: PriceValidationError,
    ) {
        assert_eq!(Price::parse(raw).unwrap_err(), expected);
    }

    #[rstest]
    fn free_is_zero() {
        assert!(Price::free().is_free());
        assert_eq!(Price::free().to_string(), "0.00");
    }

    #[rstest]
    fn total_multiplies_exactly() {
        let unit = Price::parse("499.99").expect("valid price");
        let total = unit.total_for(3).expect("total fits the bounds");
        assert_eq!(total.to_string(), "1499.97");
    }

    #[rstest]
    fn total_rejects_overflowing_amounts() {
        let unit = Price::parse("99999999.99").expect("valid price");
        assert_eq!(unit.total_for(2).unwrap_err(), PriceValidationError::TooLarge);
    }

    #[rstest]
    #[case("0.00", PriceBand::Free, true)]
    #[case("0.00", PriceBand::Under500, true)]
    #[case("499.99", PriceBand::Under500, true)]
    #[case("500.00", PriceBand::Under500, false)]
    #[case("500.00", PriceBand::Between500And1000, true)]
    #[case("1000.00", PriceBand::Between500And1000, true)]
    #[case("1000.01", PriceBand::Over1000, true)]
    #[case("1000.00", PriceBand::Over1000, false)]
    fn bands_partition_prices(#[case] raw: &str, #[case] band: PriceBand, #[case] expected: bool) {
        let price = Price::parse(raw).expect("valid price");
        assert_eq!(band.matches(&price), expected);
    }

    #[rstest]
    #[case("free", PriceBand::Free)]
    #[case("under500", PriceBand::Under500)]
    #[case("500-1000", PriceBand::Between500And1000)]
    #[case("over1000", PriceBand::Over1000)]
    fn bands_round_trip_through_str(#[case] text: &str, #[case] band: PriceBand) {
        assert_eq!(text.parse::<PriceBand>().expect("known band"), band);
        assert_eq!(band.as_str(), text);
    }

    #[rstest]
    fn serde_uses_decimal_strings() {
        let price = Price::parse("500").expect("valid price");
        let json = serde_json::to_string(&price).expect("serialisation succeeds");
        assert_eq!(json, "\"500.00\"");
        let parsed: Price = serde_json::from_str(&json).expect("deserialisation succeeds");
        assert_eq!(parsed, price);
    }
}
