//! Type-safe price representation in integer minor units.
//!
//! Product prices arrive from the backend as display strings such as
//! `"₹1,299.00"`. They are parsed once, where data enters the storefront, into
//! a [`Price`] holding paise/cents as an `i64`. Totals are integer sums and
//! formatting back to a display string is the job of [`Currency::format`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places held in minor units.
const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input contains no parseable number.
    #[error("invalid price format: {0:?}")]
    InvalidPriceFormat(String),
    /// The amount does not fit in `i64` minor units.
    #[error("price out of range: {0:?}")]
    Overflow(String),
}

/// A price in the currency's minor unit (paise for INR, cents for USD).
///
/// ## Examples
///
/// ```
/// use knitwear_core::Price;
///
/// let price: Price = "₹715.00".parse().unwrap();
/// assert_eq!(price.minor_units(), 71_500);
/// assert_eq!(price.saturating_mul(2).to_string(), "1430.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Amount in the currency's standard unit (e.g. rupees, not paise).
    #[must_use]
    pub fn amount(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Amount as a float, for wire formats that carry plain JSON numbers.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.amount().to_f64().unwrap_or(0.0)
    }

    /// Multiply by a quantity, clamping at `i64::MAX`.
    #[must_use]
    pub fn saturating_mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Add two prices, clamping at the `i64` bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Returns true if this is the zero price.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_price(s)
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Parse a currency-formatted display string into a [`Price`].
///
/// Every character that is not an ASCII digit or `.` is dropped, then the
/// longest leading decimal number is read: `"₹1,234.50"` is 1234.50 and
/// `"1.2.3"` is 1.2. Amounts are rounded to two decimal places, midpoint
/// away from zero.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPriceFormat`] if no digits remain (for
/// example `""`, `"."` or `"Free"`) and [`PriceError::Overflow`] if the
/// amount cannot be represented in `i64` minor units.
pub fn parse_price(input: &str) -> Result<Price, PriceError> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let (whole, fraction) = leading_decimal(&cleaned);
    if whole.is_empty() && fraction.is_empty() {
        return Err(PriceError::InvalidPriceFormat(input.to_owned()));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_owned()
    } else {
        format!("{whole}.{fraction}")
    };

    let amount = Decimal::from_str(&normalized)
        .map_err(|_| PriceError::Overflow(input.to_owned()))?
        .round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .map(Price)
        .ok_or_else(|| PriceError::Overflow(input.to_owned()))
}

/// Parse a display price, falling back to zero for unparsable input.
///
/// Used where backend data is mapped into storefront types, so one bad price
/// string cannot poison a cart total.
#[must_use]
pub fn parse_price_or_zero(input: &str) -> Price {
    parse_price(input).unwrap_or_else(|e| {
        tracing::warn!(input = %input, error = %e, "Unparsable price, treating as zero");
        Price::ZERO
    })
}

/// Split the leading `digits[.digits]` run of a cleaned string.
fn leading_decimal(cleaned: &str) -> (&str, &str) {
    let whole_len = cleaned.bytes().take_while(u8::is_ascii_digit).count();
    let whole = cleaned.get(..whole_len).unwrap_or_default();

    let fraction = cleaned
        .get(whole_len..)
        .and_then(|rest| rest.strip_prefix('.'))
        .map_or("", |rest| {
            let len = rest.bytes().take_while(u8::is_ascii_digit).count();
            rest.get(..len).unwrap_or_default()
        });

    (whole, fraction)
}

/// Errors that can occur when parsing a [`Currency`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyError(pub String);

/// ISO 4217 currency codes used for display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Format a price for display (e.g. `"₹715.00"`).
    #[must_use]
    pub fn format(self, price: Price) -> String {
        format!("{}{}", self.symbol(), price)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(CurrencyError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rupee_price() {
        assert_eq!(parse_price("₹715.00").unwrap(), Price::from_minor_units(71_500));
    }

    #[test]
    fn test_parse_strips_thousands_separators() {
        assert_eq!(
            parse_price("₹1,234.50").unwrap(),
            Price::from_minor_units(123_450)
        );
        assert_eq!(parse_price("INR 2,000").unwrap().minor_units(), 200_000);
    }

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_price("499").unwrap().minor_units(), 49_900);
    }

    #[test]
    fn test_parse_leading_decimal_point() {
        assert_eq!(parse_price(".5").unwrap().minor_units(), 50);
        assert_eq!(parse_price("12.").unwrap().minor_units(), 1_200);
    }

    #[test]
    fn test_parse_stops_at_second_decimal_point() {
        assert_eq!(parse_price("1.2.3").unwrap().minor_units(), 120);
    }

    #[test]
    fn test_parse_rounds_to_minor_units() {
        assert_eq!(parse_price("10.005").unwrap().minor_units(), 1_001);
        assert_eq!(parse_price("10.004").unwrap().minor_units(), 1_000);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            parse_price("Free"),
            Err(PriceError::InvalidPriceFormat(_))
        ));
        assert!(matches!(
            parse_price(""),
            Err(PriceError::InvalidPriceFormat(_))
        ));
        assert!(matches!(
            parse_price("."),
            Err(PriceError::InvalidPriceFormat(_))
        ));
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(40);
        assert!(matches!(parse_price(&huge), Err(PriceError::Overflow(_))));
    }

    #[test]
    fn test_parse_or_zero_falls_back() {
        assert_eq!(parse_price_or_zero("N/A"), Price::ZERO);
        assert_eq!(parse_price_or_zero("₹10").minor_units(), 1_000);
    }

    #[test]
    fn test_display_and_amount() {
        let price = Price::from_minor_units(143_000);
        assert_eq!(price.to_string(), "1430.00");
        assert_eq!(price.amount(), Decimal::new(143_000, 2));
        assert!((price.to_f64() - 1430.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sum_and_mul() {
        let total: Price = [
            Price::from_minor_units(71_500).saturating_mul(2),
            Price::from_minor_units(50),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.minor_units(), 143_050);
        assert_eq!(
            Price::from_minor_units(i64::MAX).saturating_mul(2),
            Price::from_minor_units(i64::MAX)
        );
    }

    #[test]
    fn test_currency_format() {
        let price = Price::from_minor_units(71_500);
        assert_eq!(Currency::INR.format(price), "₹715.00");
        assert_eq!(Currency::USD.format(price), "$715.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::INR);
        assert_eq!(" GBP ".parse::<Currency>().unwrap(), Currency::GBP);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serde_is_minor_units() {
        let price = Price::from_minor_units(71_500);
        assert_eq!(serde_json::to_string(&price).unwrap(), "71500");
    }
}
