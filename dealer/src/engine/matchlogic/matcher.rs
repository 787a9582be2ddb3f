//! Order Matching Rules
//!
//! Decides whether an order fills against a single price bar and assigns
//! close timestamps to orders that fill on a later bar than they were placed.

use crate::engine::entry::{Bar, Order, OrderType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price at which `order` would fill against `bar`, or `None` for no match.
///
/// Market orders always fill at the bar close. Limit orders fill at their own
/// limit price when it lies within the bar range, bounds inclusive.
pub fn match_order(order: &Order, bar: &Bar) -> Option<Decimal> {
    match order.order_type? {
        OrderType::Market => Some(bar.close),
        OrderType::Limit => order.limit_price.filter(|limit| bar.touches(*limit)),
    }
}

/// Close timestamp for an order referenced at `prev_start` and triggered by
/// the bar starting at `curr_start`.
///
/// Assumes the triggering bar lasts as long as the interval just observed and
/// closes the order at its implied end. An unset reference, or the zero bar
/// start, closes at `curr_start`; a feed that went backwards closes at the
/// reference itself.
pub fn close_time(prev_start: Option<DateTime<Utc>>, curr_start: DateTime<Utc>) -> DateTime<Utc> {
    let Some(prev_start) = prev_start.filter(|t| *t != DateTime::<Utc>::default()) else {
        return curr_start;
    };
    if curr_start < prev_start {
        return prev_start;
    }
    curr_start
        .checked_add_signed(curr_start - prev_start)
        .unwrap_or(curr_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entry::OrderSide;
    use chrono::{Duration, FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn quote() -> Bar {
        Bar::new(Utc::now(), dec!(8), dec!(15), dec!(5), dec!(10))
    }

    #[test]
    fn test_match_limit_inside_range() {
        let order = Order::limit(OrderSide::Buy, dec!(12), dec!(1));
        assert_eq!(match_order(&order, &quote()), Some(dec!(12)));
    }

    #[test]
    fn test_match_limit_bounds_inclusive() {
        let lower = Order::limit(OrderSide::Buy, dec!(5), dec!(1));
        let upper = Order::limit(OrderSide::Sell, dec!(15), dec!(1));
        assert_eq!(match_order(&lower, &quote()), Some(dec!(5)));
        assert_eq!(match_order(&upper, &quote()), Some(dec!(15)));
    }

    #[test]
    fn test_no_match_limit_out_of_range() {
        let below = Order::limit(OrderSide::Buy, dec!(2), dec!(1));
        let above = Order::limit(OrderSide::Buy, dec!(100), dec!(1));
        assert_eq!(match_order(&below, &quote()), None);
        assert_eq!(match_order(&above, &quote()), None);
    }

    #[test]
    fn test_match_market_on_close() {
        let order = Order::market(OrderSide::Sell, dec!(3));
        assert_eq!(match_order(&order, &quote()), Some(dec!(10)));
    }

    #[test]
    fn test_zero_limit_is_a_real_price() {
        let order = Order::limit(OrderSide::Buy, Decimal::ZERO, dec!(1));
        let zero_range = Bar::new(Utc::now(), dec!(0), dec!(1), dec!(0), dec!(0.5));
        assert_eq!(match_order(&order, &zero_range), Some(Decimal::ZERO));
        assert_eq!(match_order(&order, &quote()), None);
    }

    #[test]
    fn test_zero_bar_matches_market_only() {
        let bar = Bar::default();
        let market = Order::market(OrderSide::Buy, dec!(1));
        let limit = Order::limit(OrderSide::Buy, dec!(8), dec!(1));
        assert_eq!(match_order(&market, &bar), Some(Decimal::ZERO));
        assert_eq!(match_order(&limit, &bar), None);
    }

    #[test]
    fn test_untyped_order_never_matches() {
        assert_eq!(match_order(&Order::default(), &quote()), None);
    }

    #[test]
    fn test_close_time_extrapolates_interval() {
        let interval = Duration::hours(4);
        let start1 = Utc::now();
        let start2 = start1 + interval;
        assert_eq!(close_time(Some(start1), start2), start2 + interval);
    }

    #[test]
    fn test_close_time_unset_reference() {
        let start = Utc::now();
        assert_eq!(close_time(None, start), start);
    }

    #[test]
    fn test_close_time_zero_bar_reference() {
        let start = Utc::now();
        assert_eq!(close_time(Some(DateTime::<Utc>::UNIX_EPOCH), start), start);
    }

    #[test]
    fn test_close_time_overflow_stays_at_current() {
        let curr = DateTime::<Utc>::MAX_UTC;
        let prev = curr - Duration::days(1);
        assert_eq!(close_time(Some(prev), curr), curr);
    }

    #[test]
    fn test_close_time_backwards_feed() {
        let start1 = Utc::now();
        let start2 = start1 + Duration::hours(4);
        assert_eq!(close_time(Some(start2), start1), start2);
    }

    #[test]
    fn test_close_time_same_start() {
        let start = Utc::now();
        assert_eq!(close_time(Some(start), start), start);
    }

    #[test]
    fn test_close_time_normalized_to_utc() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let prev = offset.with_ymd_and_hms(2022, 5, 5, 9, 0, 0).unwrap();
        let curr = offset.with_ymd_and_hms(2022, 5, 5, 10, 0, 0).unwrap();
        let act = close_time(Some(prev.with_timezone(&Utc)), curr.with_timezone(&Utc));
        assert_eq!(act, Utc.with_ymd_and_hms(2022, 5, 5, 6, 0, 0).unwrap());
    }
}
