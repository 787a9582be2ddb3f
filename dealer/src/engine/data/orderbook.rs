use crate::engine::entry::{Order, OrderId, OrderState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// All orders seen by a dealer, keyed by identity.
///
/// Closed orders are never evicted: the full record feeds reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    orders_by_id: HashMap<OrderId, Order>,
    open: BTreeSet<(DateTime<Utc>, OrderId)>, // opened_at, id
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            orders_by_id: HashMap::new(),
            open: BTreeSet::new(),
        }
    }

    /// Inserts or replaces the record for `order.id`, keeping the open index
    /// in step with the order's derived state.
    pub fn upsert(&mut self, order: Order) {
        if let Some(previous) = self.orders_by_id.get(&order.id) {
            if let Some(opened_at) = previous.opened_at {
                self.open.remove(&(opened_at, previous.id));
            }
        }
        if order.state() == OrderState::Open {
            if let Some(opened_at) = order.opened_at {
                self.open.insert((opened_at, order.id));
            }
        }
        self.orders_by_id.insert(order.id, order);
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders_by_id.contains_key(order_id)
    }

    pub fn get_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders_by_id.get(order_id)
    }

    /// Ids of open orders, oldest first
    pub fn open_ids(&self) -> Vec<OrderId> {
        self.open.iter().map(|(_, id)| *id).collect()
    }

    pub fn open_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.open
            .iter()
            .filter_map(move |(_, id)| self.orders_by_id.get(id))
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders_by_id.values()
    }

    pub fn len(&self) -> usize {
        self.orders_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders_by_id.is_empty()
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }
}
