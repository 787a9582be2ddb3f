//! Metrics collection module for the dealer
//!
//! Counters and timings for order placement and bar processing, exposed
//! through a Prometheus registry the embedding application can scrape.

use lazy_static::lazy_static;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::time::Instant;

lazy_static! {
    /// Global Prometheus registry instance
    pub static ref REGISTRY_INSTANCE: Registry = Registry::new();

    /// Placement attempts by outcome (`accepted` / `rejected`)
    pub static ref ORDERS_PLACED: IntCounterVec = IntCounterVec::new(
        Opts::new("dealer_orders_placed", "order placement attempts"),
        &["outcome"]
    )
    .expect("valid metric definition");

    /// Orders that reached a fill
    pub static ref ORDERS_FILLED: IntCounter =
        IntCounter::new("dealer_orders_filled", "filled orders").expect("valid metric definition");

    /// Price bars ingested
    pub static ref BARS_RECEIVED: IntCounter =
        IntCounter::new("dealer_bars_received", "received price bars").expect("valid metric definition");

    /// Duration of one bar re-evaluation pass
    pub static ref BAR_SECONDS: Histogram = Histogram::with_opts(HistogramOpts::new(
        "dealer_bar_seconds",
        "bar processing time"
    ))
    .expect("valid metric definition");
}

/// Registers all metric collectors with the global registry
pub fn init_registry() {
    let _ = REGISTRY_INSTANCE.register(Box::new(ORDERS_PLACED.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(ORDERS_FILLED.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(BARS_RECEIVED.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(BAR_SECONDS.clone()));
}

pub(crate) fn record_placement(accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    ORDERS_PLACED.with_label_values(&[outcome]).inc();
}

/// Runs `handler` and records its duration in the bar histogram
pub(crate) fn record_bar<T>(handler: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    BARS_RECEIVED.inc();
    let result = handler();
    BAR_SECONDS.observe(start.elapsed().as_secs_f64());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_registry_idempotent() {
        init_registry();
        init_registry();
        let names: Vec<String> = REGISTRY_INSTANCE
            .gather()
            .iter()
            .map(|m| m.get_name().to_string())
            .collect();
        assert!(names.contains(&"dealer_orders_filled".to_string()));
    }

    #[test]
    fn test_record_bar_returns_result() {
        let before = BARS_RECEIVED.get();
        assert_eq!(record_bar(|| 7), 7);
        assert!(BARS_RECEIVED.get() > before);
    }
}
