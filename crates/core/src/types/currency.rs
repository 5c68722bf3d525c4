//! Currency codes and money rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Round a monetary amount to 2 decimal places.
///
/// Midpoints round away from zero, so `1.005` becomes `1.01`. The result
/// always carries exactly 2 decimal places so amounts serialize uniformly
/// ("165.00", never "165.0").
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money("1.005".parse().unwrap()), "1.01".parse().unwrap());
        assert_eq!(round_money("1.004".parse().unwrap()), "1.00".parse().unwrap());
    }

    #[test]
    fn test_round_money_passthrough() {
        let exact: Decimal = "15.00".parse().unwrap();
        assert_eq!(round_money(exact), exact);
    }

    #[test]
    fn test_round_money_pads_to_two_places() {
        assert_eq!(round_money("165.0".parse().unwrap()).to_string(), "165.00");
        assert_eq!(round_money("15".parse().unwrap()).to_string(), "15.00");
    }

    #[test]
    fn test_symbol_and_code() {
        assert_eq!(CurrencyCode::USD.symbol(), "$");
        assert_eq!(CurrencyCode::GBP.symbol(), "£");
        assert_eq!(CurrencyCode::EUR.code(), "EUR");
        assert_eq!(CurrencyCode::default().code(), "USD");
    }
}
