//! Price Bar Types
//!
//! A bar is one sampling interval of market price, replayed in order by the
//! backtest driver.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Open/high/low/close aggregate for one interval starting at `start`
///
/// `low <= open, close <= high` is assumed, not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bar {
    pub start: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Bar {
    pub fn new(
        start: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Self {
        Self {
            start,
            open,
            high,
            low,
            close,
            volume: Decimal::ZERO,
        }
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    /// True when `price` lies within `[low, high]`, both bounds inclusive
    pub fn touches(&self, price: Decimal) -> bool {
        self.low <= price && price <= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_zero_bar() {
        let bar = Bar::default();
        assert_eq!(bar.start, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(bar.close, Decimal::ZERO);
    }

    #[test]
    fn test_touches_inclusive() {
        let bar = Bar::new(Utc::now(), dec!(8), dec!(15), dec!(5), dec!(10));
        assert!(bar.touches(dec!(5)));
        assert!(bar.touches(dec!(15)));
        assert!(!bar.touches(dec!(4.99)));
        assert!(!bar.touches(dec!(15.01)));
    }
}
