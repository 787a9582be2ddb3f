//! Simulated order execution against replayed OHLC price bars.
//!
//! A [`Dealer`] accepts order placements and price bars from a single driving
//! backtest loop and decides, without look-ahead, which orders fill, at what
//! price and when they close.

pub mod account;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;

pub use account::{Account, EquitySeries};
pub use cancel::Cancel;
pub use config::{read_dealer_from_config, DealerConfig, RuntimeConfig};
pub use engine::dealer::Dealer;
pub use engine::entry::{Bar, Order, OrderId, OrderSide, OrderState, OrderType};
pub use engine::matchlogic::{close_time, match_order};
pub use error::{ConfigError, DealerError};
