//! Dealer Engine Module
//!
//! This module contains the core components of the simulated dealer:
//! - `data`: The order book kept for a backtest run
//! - `entry`: Order and price bar definitions
//! - `matchlogic`: Pure matching and close-time rules
//! - `dealer`: The dealer driving order lifecycle transitions

pub mod data;
pub mod dealer;
pub mod entry;
pub mod matchlogic;
