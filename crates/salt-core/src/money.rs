//! # Monetary Rounding Policy
//!
//! Two rounding surfaces exist in the whole stack, and only two:
//!
//! - [`round_internal`] — 4 decimal places, applied at the point a computed
//!   tax amount is *stored* on a row or audit record.
//! - [`round_display`] — 2 decimal places, applied only when an amount is
//!   aggregated for display or export.
//!
//! Intermediate values are never rounded; `amount × rate` happens on the
//! full-precision `Decimal` and the result is rounded once. Midpoints round
//! away from zero (conventional half-up for positive money).

use rust_decimal::{Decimal, RoundingStrategy};

/// Internal storage precision for computed tax amounts.
pub const INTERNAL_SCALE: u32 = 4;

/// Display precision for aggregated/exported amounts.
pub const DISPLAY_SCALE: u32 = 2;

/// Round a computed amount to the 4-decimal internal storage precision.
pub fn round_internal(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(INTERNAL_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an amount to the 2-decimal display precision.
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn internal_rounding_is_four_places_half_up() {
        assert_eq!(round_internal(dec!(1.00005)), dec!(1.0001));
        assert_eq!(round_internal(dec!(1.00004)), dec!(1.0000));
        assert_eq!(round_internal(dec!(7000)), dec!(7000));
    }

    #[test]
    fn display_rounding_is_two_places_half_up() {
        assert_eq!(round_display(dec!(1.005)), dec!(1.01));
        assert_eq!(round_display(dec!(1.004)), dec!(1.00));
    }

    #[test]
    fn rounding_is_idempotent() {
        let v = round_internal(dec!(123.456789));
        assert_eq!(round_internal(v), v);
        let d = round_display(v);
        assert_eq!(round_display(d), d);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn internal_rounding_moves_at_most_half_an_ulp(micros in 0i64..1_000_000_000_000) {
                let v = Decimal::new(micros, 6);
                let r = round_internal(v);
                prop_assert!(r.scale() <= INTERNAL_SCALE);
                prop_assert!((r - v).abs() <= Decimal::new(5, 5));
            }

            #[test]
            fn display_rounding_moves_at_most_half_a_cent(micros in 0i64..1_000_000_000_000) {
                let v = Decimal::new(micros, 6);
                let r = round_display(v);
                prop_assert!(r.scale() <= DISPLAY_SCALE);
                prop_assert!((r - v).abs() <= Decimal::new(5, 3));
            }
        }
    }
}
