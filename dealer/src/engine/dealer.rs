//! Simulated Dealer
//!
//! Owns the order book and the latest price bar, and decides which orders fill
//! at what price and when they close. Every evaluation of an order against a
//! bar goes through [`Dealer::process_order`].

use crate::account::{Account, EquitySeries};
use crate::cancel::Cancel;
use crate::config::DealerConfig;
use crate::engine::data::OrderBook;
use crate::engine::entry::{Bar, Order, OrderId, OrderState};
use crate::engine::matchlogic::{close_time, match_order};
use crate::error::DealerError;
use crate::metrics;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Backtest dealer for a single instrument
///
/// Built for strictly sequential use by one driving loop: a bar is fully
/// processed before the next one is received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dealer {
    book: OrderBook,
    /// Latest received bar; `None` until the first bar arrives
    bar: Option<Bar>,
    account: Account,
}

impl Default for Dealer {
    fn default() -> Self {
        Dealer::new()
    }
}

impl Dealer {
    pub fn new() -> Dealer {
        Dealer::from_config(&DealerConfig::default())
    }

    pub fn from_config(config: &DealerConfig) -> Dealer {
        Dealer {
            book: OrderBook::new(),
            bar: None,
            account: Account::new(config.initial_capital),
        }
    }

    /// Places a new order and evaluates it against the held bar.
    ///
    /// # Returns
    /// * `Ok((Order, OrderState))` - Latest snapshot of the order and its state
    /// * `Err(DealerError::InvalidOrderState)` - The order failed validation; the book is untouched
    /// * `Err(DealerError::Cancelled)` - `cancel` fired before anything was applied
    pub fn place_order(
        &mut self,
        mut order: Order,
        cancel: &Cancel,
    ) -> Result<(Order, OrderState), DealerError> {
        if cancel.is_cancelled() {
            return Err(DealerError::Cancelled);
        }
        if let Err(reason) = order.validate_for_placement() {
            warn!("rejected order {}: {}", order.id, reason);
            metrics::record_placement(false);
            return Err(DealerError::InvalidOrderState(reason.to_string()));
        }
        if order.id.is_nil() {
            order.id = OrderId::generate();
        } else if self.book.contains(&order.id) {
            warn!("rejected order {}: id already in book", order.id);
            metrics::record_placement(false);
            return Err(DealerError::InvalidOrderState(format!(
                "order {} already exists",
                order.id
            )));
        }
        if self.bar.is_none() {
            warn!("order {} placed before any price bar was received", order.id);
        }
        metrics::record_placement(true);

        let order = self.process_order(order);
        let state = order.state();
        Ok((order, state))
    }

    /// Replaces the held bar and re-evaluates every open order against it.
    ///
    /// Cancellation is checked once before the pass starts; either the whole
    /// pass applies or nothing does.
    pub fn receive_price(&mut self, bar: Bar, cancel: &Cancel) -> Result<(), DealerError> {
        if cancel.is_cancelled() {
            return Err(DealerError::Cancelled);
        }
        metrics::record_bar(|| {
            debug!("received bar starting {}", bar.start);
            self.bar = Some(bar);
            for id in self.book.open_ids() {
                if let Some(order) = self.book.get_order(&id).cloned() {
                    self.process_order(order);
                }
            }
            if let Some(bar) = &self.bar {
                self.account.mark(bar);
            }
        });
        Ok(())
    }

    /// Evaluates `order` against the held bar: fill then close on a match,
    /// otherwise open.
    pub(crate) fn process_order(&mut self, mut order: Order) -> Order {
        if order.id.is_nil() {
            order.id = OrderId::generate();
        }
        let bar = self.bar.clone().unwrap_or_default();
        match match_order(&order, &bar) {
            Some(price) => {
                let order = self.fill_order(order, price);
                self.close_order(order)
            }
            None => self.open_order(order),
        }
    }

    /// Marks a pending order open at the held bar start
    pub(crate) fn open_order(&mut self, mut order: Order) -> Order {
        if order.state() == OrderState::Pending {
            let opened_at = self.bar.as_ref().map(|b| b.start).unwrap_or_default();
            order.opened_at = Some(opened_at);
            debug!("opened order {} at {}", order.id, opened_at);
        }
        self.book.upsert(order.clone());
        order
    }

    /// Fills the full requested size at `price`
    pub(crate) fn fill_order(&mut self, mut order: Order, price: Decimal) -> Order {
        if order.filled_size.is_some() {
            return order;
        }
        order.filled_price = Some(price);
        order.filled_size = Some(order.size);
        if let Some(side) = order.side {
            self.account.apply_fill(side, price, order.size);
        }
        metrics::ORDERS_FILLED.inc();
        info!(
            "filled order {} {:?} {} @ {}",
            order.id, order.side, order.size, price
        );
        order
    }

    /// Closes the order at the time extrapolated from its open time and the held bar
    pub(crate) fn close_order(&mut self, mut order: Order) -> Order {
        if order.closed_at.is_none() {
            let start = self.bar.as_ref().map(|b| b.start).unwrap_or_default();
            let closed_at = close_time(order.opened_at, start);
            order.closed_at = Some(closed_at);
            debug!("closed order {} at {}", order.id, closed_at);
        }
        self.book.upsert(order.clone());
        order
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.book.get_order(order_id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.book.orders()
    }

    /// Open orders, oldest first
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.book.open_orders()
    }

    pub fn current_bar(&self) -> Option<&Bar> {
        self.bar.as_ref()
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn equity_series(&self) -> &EquitySeries {
        self.account.equity_series()
    }

    /// Creates a snapshot of the full dealer state
    pub fn snapshot(&self) -> Result<Vec<u8>, DealerError> {
        bincode::serialize(self).map_err(|e| DealerError::Snapshot(e.to_string()))
    }

    /// Restores dealer state from a snapshot
    pub fn restore(data: &[u8]) -> Result<Dealer, DealerError> {
        bincode::deserialize(data).map_err(|e| {
            log::error!("failed to deserialize dealer: {}", e);
            DealerError::Snapshot(e.to_string())
        })
    }
}
