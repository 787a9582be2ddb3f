//! Account Module
//!
//! Turns dealer fills into running cash, position and an equity series.

use crate::engine::entry::{Bar, OrderSide};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Time-ordered account equity, one point per received bar
pub type EquitySeries = BTreeMap<DateTime<Utc>, Decimal>;

/// Cash and net position of a single-instrument backtest account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    initial_capital: Decimal,
    cash: Decimal,
    position: Decimal,
    equity: EquitySeries,
}

impl Account {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            cash: initial_capital,
            position: Decimal::ZERO,
            equity: EquitySeries::new(),
        }
    }

    /// Applies a fill of `size` at `price`
    pub fn apply_fill(&mut self, side: OrderSide, price: Decimal, size: Decimal) {
        let signed = side.sign() * size;
        self.cash -= signed * price;
        self.position += signed;
    }

    /// Marks the account at the bar close and records the point at the bar start.
    ///
    /// Marking the same bar twice overwrites its point.
    pub fn mark(&mut self, bar: &Bar) -> Decimal {
        let equity = self.cash + self.position * bar.close;
        self.equity.insert(bar.start, equity);
        equity
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn position(&self) -> Decimal {
        self.position
    }

    pub fn equity_series(&self) -> &EquitySeries {
        &self.equity
    }
}
