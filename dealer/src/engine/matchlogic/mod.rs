//! Match Logic Module
//!
//! Pure functions deciding whether an order fills against a price bar and
//! when a resting order that fills on a later bar is considered closed.

pub mod matcher;

pub use matcher::{close_time, match_order};
