//! Current-value computation for shared items.
//!
//! Pure function of the item's parameters and the valuation date; no clock
//! reads, no state. Depreciation compounds continuously: value at `t`
//! fractional years is `initial × (1 − rate)^t`, clamped from below by the
//! configured floor and from above by the initial value.

use chrono::NaiveDate;

use flatshare_core::{DomainError, DomainResult, Money};

use crate::item::Item;

/// Average Gregorian year length, so fractional years stay calendar-stable.
const DAYS_PER_YEAR: f64 = 365.25;

/// Compute the item's worth at `as_of`.
///
/// Bills do not depreciate: they are valued at `initial_value` until closed.
///
/// Errors with [`DomainError::InvalidDate`] when `as_of` precedes the purchase
/// date and [`DomainError::InvalidRate`] when the stored rate is out of range
/// (possible only for items that bypassed constructor validation, e.g.
/// deserialized rows).
pub fn current_value(item: &Item, as_of: NaiveDate) -> DomainResult<Money> {
    let rate = item.yearly_depreciation();
    if !(0.0..=1.0).contains(&rate) {
        return Err(DomainError::InvalidRate(rate));
    }
    if as_of < item.purchase_date() {
        return Err(DomainError::InvalidDate {
            as_of: as_of.to_string(),
            purchase: item.purchase_date().to_string(),
        });
    }

    if item.is_bill() {
        return Ok(item.initial_value());
    }

    let elapsed_days = (as_of - item.purchase_date()).num_days();
    let years = elapsed_days as f64 / DAYS_PER_YEAR;
    let raw_cents = (item.initial_value().cents() as f64 * (1.0 - rate).powf(years)).round() as i64;

    let floor_cents = floor_for(item);
    let clamped = raw_cents
        .max(floor_cents)
        .min(item.initial_value().cents());
    Ok(Money::from_cents(clamped))
}

/// Derived floor: the larger of the absolute floor and the percentage floor,
/// zero when neither is configured.
fn floor_for(item: &Item) -> i64 {
    let absolute = item.minimum_value().map_or(0, Money::cents);
    let relative = item
        .minimum_value_pct()
        .map_or(0, |pct| (item.initial_value().cents() as f64 * pct).round() as i64);
    absolute.max(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatshare_core::{FlatId, ItemId};
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn item(
        initial_cents: i64,
        rate: f64,
        purchase: &str,
        minimum: Option<i64>,
        minimum_pct: Option<f64>,
        is_bill: bool,
    ) -> Item {
        Item::new(
            ItemId::new(),
            FlatId::new(),
            "TV",
            Money::from_cents(initial_cents),
            date(purchase),
            rate,
            minimum.map(Money::from_cents),
            minimum_pct,
            is_bill,
        )
        .unwrap()
    }

    #[test]
    fn value_on_purchase_day_is_the_initial_value() {
        let it = item(100_000, 0.2, "2025-01-01", None, None, false);
        assert_eq!(
            current_value(&it, date("2025-01-01")).unwrap(),
            Money::from_cents(100_000)
        );
    }

    #[test]
    fn one_year_at_twenty_percent_is_about_eight_hundred() {
        // 1000.00 at 20%/year, valued one year later: ~800.00 (the 365-day
        // year is slightly short of 365.25, so the value lands a hair above).
        let it = item(100_000, 0.2, "2025-01-01", None, None, false);
        let v = current_value(&it, date("2026-01-01")).unwrap();
        assert!(
            (79_990..=80_030).contains(&v.cents()),
            "expected ~800.00, got {v}"
        );
    }

    #[test]
    fn percentage_floor_clamps_exactly() {
        // After 10 years at 20%/year the raw value (~107.37) is far below the
        // 50% floor; the result must be exactly 500.00.
        let it = item(100_000, 0.2, "2025-01-01", None, Some(0.5), false);
        assert_eq!(
            current_value(&it, date("2035-01-01")).unwrap(),
            Money::from_cents(50_000)
        );
    }

    #[test]
    fn absolute_floor_wins_when_higher() {
        let it = item(100_000, 0.2, "2025-01-01", Some(60_000), Some(0.5), false);
        assert_eq!(
            current_value(&it, date("2035-01-01")).unwrap(),
            Money::from_cents(60_000)
        );
    }

    #[test]
    fn bills_do_not_depreciate() {
        let it = item(4_200, 0.9, "2025-01-01", None, None, true);
        assert_eq!(
            current_value(&it, date("2045-06-15")).unwrap(),
            Money::from_cents(4_200)
        );
    }

    #[test]
    fn valuation_before_purchase_is_rejected() {
        let it = item(100_000, 0.2, "2025-01-01", None, None, false);
        let err = current_value(&it, date("2024-12-31")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate { .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: value is always within [0, initial_value].
        #[test]
        fn value_stays_within_bounds(
            initial in 0i64..10_000_000,
            rate in 0.0f64..=1.0,
            days in 0i64..20_000,
        ) {
            let it = item(initial, rate, "2020-01-01", None, None, false);
            let as_of = date("2020-01-01") + chrono::Days::new(days as u64);
            let v = current_value(&it, as_of).unwrap();
            prop_assert!(v >= Money::ZERO);
            prop_assert!(v <= it.initial_value());
        }

        /// Property: for d1 < d2 the value never increases.
        #[test]
        fn value_is_monotonically_non_increasing(
            initial in 0i64..10_000_000,
            rate in 0.0f64..=1.0,
            d1 in 0i64..10_000,
            extra in 1i64..10_000,
        ) {
            let it = item(initial, rate, "2020-01-01", None, None, false);
            let purchase = date("2020-01-01");
            let v1 = current_value(&it, purchase + chrono::Days::new(d1 as u64)).unwrap();
            let v2 = current_value(&it, purchase + chrono::Days::new((d1 + extra) as u64)).unwrap();
            prop_assert!(v1 >= v2);
        }

        /// Property: the floor is respected whenever one is configured.
        #[test]
        fn floor_is_respected(
            initial in 1i64..10_000_000,
            rate in 0.0f64..=1.0,
            days in 0i64..20_000,
            pct in 0.0f64..=1.0,
        ) {
            let it = item(initial, rate, "2020-01-01", None, Some(pct), false);
            let as_of = date("2020-01-01") + chrono::Days::new(days as u64);
            let v = current_value(&it, as_of).unwrap();
            let floor = (initial as f64 * pct).round() as i64;
            prop_assert!(v.cents() >= floor.min(initial));
        }
    }
}
