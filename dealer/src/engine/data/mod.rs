//! Data Structures Module
//!
//! Holds the order book a dealer keeps for the lifetime of a backtest run.

pub mod orderbook;

pub use orderbook::OrderBook;
