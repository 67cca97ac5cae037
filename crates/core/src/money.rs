//! Price display formatting.
//!
//! Prices are stored as fixed-point decimals (NUMERIC(10,2)); the
//! `formatted_price` field in API responses is derived here, in one
//! place, so every read path formats identically.

use rust_decimal::Decimal;
use rusty_money::{iso, Money};

/// Format a price as a display string, e.g. `$1,234.50`.
pub fn format_price(price: Decimal) -> String {
    Money::from_decimal(price, iso::USD).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn formats_with_symbol_and_two_fraction_digits() {
        assert_eq!(format_price(Decimal::new(1050, 2)), "$10.50");
        assert_eq!(format_price(Decimal::new(123450, 2)), "$1,234.50");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }
}
