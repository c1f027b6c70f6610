//! Property-based tests for currency conversion.
//!
//! - Identity: converting a currency to itself never changes the amount
//! - Round trip: base -> X -> base returns the original amount
//! - Cross rates: a direct cross conversion agrees with routing through the base
//! - Display rounding never keeps more than six fractional digits

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{DISPLAY_SCALE, round_for_display, triangulate};
use super::snapshot::RateMap;

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate three-letter codes.
fn currency_code() -> impl Strategy<Value = String> {
    "[A-Z]{3}"
}

fn rates(from: Decimal, to: Decimal) -> RateMap {
    RateMap::from([("AAA".to_string(), from), ("BBB".to_string(), to)])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_same_currency_is_identity(
        amount in positive_amount(),
        code in currency_code(),
        base in currency_code(),
    ) {
        let result = triangulate(amount, &code, &code, &base, &RateMap::new()).unwrap();
        prop_assert_eq!(result, amount);
    }

    #[test]
    fn prop_base_round_trip(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let map = rates(rate, rate);
        let there = triangulate(amount, "USD", "AAA", "USD", &map).unwrap();
        let back = triangulate(there, "AAA", "USD", "USD", &map).unwrap();
        prop_assert_eq!(round_for_display(back), round_for_display(amount));
    }

    #[test]
    fn prop_cross_matches_two_legs(
        amount in positive_amount(),
        rate_from in positive_rate(),
        rate_to in positive_rate(),
    ) {
        let map = rates(rate_from, rate_to);
        let direct = triangulate(amount, "AAA", "BBB", "USD", &map).unwrap();

        let via_base = triangulate(amount, "AAA", "USD", "USD", &map).unwrap();
        let two_legs = triangulate(via_base, "USD", "BBB", "USD", &map).unwrap();

        let diff = (round_for_display(direct) - round_for_display(two_legs)).abs();
        prop_assert!(
            diff <= Decimal::new(1, DISPLAY_SCALE),
            "direct {} vs two legs {}",
            direct,
            two_legs
        );
    }

    #[test]
    fn prop_display_scale_is_bounded(
        amount in positive_amount(),
        rate_from in positive_rate(),
        rate_to in positive_rate(),
    ) {
        let map = rates(rate_from, rate_to);
        let direct = triangulate(amount, "AAA", "BBB", "USD", &map).unwrap();
        prop_assert!(round_for_display(direct).scale() <= DISPLAY_SCALE);
    }

    #[test]
    fn prop_from_base_is_exact_product(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let map = rates(rate, rate);
        let result = triangulate(amount, "USD", "BBB", "USD", &map).unwrap();
        prop_assert_eq!(result, amount * rate);
    }
}
