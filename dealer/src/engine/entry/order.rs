//! Order Types and Structures
//!
//! This module defines the order record held in the dealer's book.
//! The lifecycle state of an order is never stored: it is derived from which
//! of the execution fields have been populated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identity of an order, assigned at placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// True for the unassigned (nil) identifier
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Sign applied to a quantity when it moves a position
    pub fn sign(&self) -> Decimal {
        match self {
            OrderSide::Buy => Decimal::ONE,
            OrderSide::Sell => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Lifecycle state of an order, computed by [`Order::state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    Pending,
    Open,
    Filled,
    Closed,
}

/// One trade intent and its execution outcome
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Option<OrderSide>,
    pub order_type: Option<OrderType>,
    pub size: Decimal,
    /// Only meaningful for limit orders
    pub limit_price: Option<Decimal>,
    pub filled_price: Option<Decimal>,
    pub filled_size: Option<Decimal>,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a pending market order
    pub fn market(side: OrderSide, size: Decimal) -> Self {
        Self {
            side: Some(side),
            order_type: Some(OrderType::Market),
            size,
            ..Default::default()
        }
    }

    /// Creates a pending limit order
    pub fn limit(side: OrderSide, limit_price: Decimal, size: Decimal) -> Self {
        Self {
            side: Some(side),
            order_type: Some(OrderType::Limit),
            size,
            limit_price: Some(limit_price),
            ..Default::default()
        }
    }

    /// Derives the lifecycle state from the populated fields.
    ///
    /// Precedence is closed, then filled, then open; an order with none of
    /// those fields set is pending.
    pub fn state(&self) -> OrderState {
        if self.closed_at.is_some() {
            OrderState::Closed
        } else if self.filled_size.is_some() {
            OrderState::Filled
        } else if self.opened_at.is_some() {
            OrderState::Open
        } else {
            OrderState::Pending
        }
    }

    /// Checks the order is acceptable for placement.
    ///
    /// # Returns
    /// * `Ok(())` - The order is pending and fully specified
    /// * `Err(&str)` - The first rule the order breaks
    pub fn validate_for_placement(&self) -> Result<(), &'static str> {
        if self.state() != OrderState::Pending || self.filled_price.is_some() {
            return Err("order is not pending");
        }
        if self.side.is_none() {
            return Err("order side is not set");
        }
        let order_type = self.order_type.ok_or("order type is not set")?;
        if self.size <= Decimal::ZERO {
            return Err("order size must be positive");
        }
        if order_type == OrderType::Limit && self.limit_price.is_none() {
            return Err("limit order has no limit price");
        }
        Ok(())
    }

    /// Notional value of the fill, if any
    pub fn filled_amount(&self) -> Option<Decimal> {
        Some(self.filled_price? * self.filled_size?)
    }
}
