use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use clap::Parser;
use dealer::{Bar, Cancel, Dealer, DealerError, Order, OrderSide, OrderState, RuntimeConfig};
use hdrhistogram::Histogram;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of bars to replay
    #[arg(short, long, default_value = "100000")]
    bars: usize,

    /// Orders placed after each bar
    #[arg(short, long, default_value = "1")]
    orders_per_bar: usize,

    /// Bar interval in minutes
    #[arg(short, long, default_value = "1")]
    interval_minutes: i64,

    /// Seed for the synthetic price walk and order flow
    #[arg(short, long, default_value = "7")]
    seed: u64,

    /// Runtime config file with a [dealer] table
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

struct Report {
    bars: u64,
    orders: u64,
    filled: u64,
    cancelled: bool,
    histogram: Histogram<u64>,
    dealer: Dealer,
}

/// Random walk with a bar range around open and close
fn next_bar(rng: &mut StdRng, start: chrono::DateTime<Utc>, open: Decimal) -> Bar {
    let step = Decimal::from_f64(rng.gen_range(-0.01..0.01)).unwrap_or_default();
    let close = (open * (Decimal::ONE + step)).round_dp(2).max(dec!(0.01));
    let wick = Decimal::from_f64(rng.gen_range(0.0..0.005)).unwrap_or_default();
    let high = (open.max(close) * (Decimal::ONE + wick)).round_dp(2);
    let low = (open.min(close) * (Decimal::ONE - wick)).round_dp(2);
    Bar::new(start, open, high, low, close)
        .with_volume(Decimal::from(rng.gen_range(1..1000u32)))
}

fn random_order(rng: &mut StdRng, close: Decimal) -> Order {
    let side = if rng.gen_bool(0.5) {
        OrderSide::Buy
    } else {
        OrderSide::Sell
    };
    let size = Decimal::from(rng.gen_range(1..10u32));
    if rng.gen_bool(0.2) {
        return Order::market(side, size);
    }
    let offset = Decimal::from_f64(rng.gen_range(-0.02..0.02)).unwrap_or_default();
    Order::limit(side, (close * (Decimal::ONE + offset)).round_dp(2), size)
}

fn replay(args: Args, runtime: RuntimeConfig, cancel: Cancel) -> anyhow::Result<Report> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut dealer = Dealer::from_config(&runtime.dealer);
    let mut histogram = Histogram::<u64>::new(3)?;
    let interval = ChronoDuration::minutes(args.interval_minutes);
    let mut start = Utc
        .with_ymd_and_hms(2022, 5, 5, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid replay start"))?;
    let mut open = dec!(30000);
    let mut report_orders = 0u64;
    let mut bars = 0u64;
    let mut cancelled = false;

    for _ in 0..args.bars {
        let bar = next_bar(&mut rng, start, open);
        open = bar.close;
        start += interval;

        let begin = Instant::now();
        match dealer.receive_price(bar.clone(), &cancel) {
            Ok(()) => {}
            Err(DealerError::Cancelled) => {
                cancelled = true;
                break;
            }
            Err(e) => return Err(e.into()),
        }
        histogram.record(begin.elapsed().as_micros() as u64)?;
        bars += 1;

        for _ in 0..args.orders_per_bar {
            match dealer.place_order(random_order(&mut rng, bar.close), &cancel) {
                Ok(_) => report_orders += 1,
                Err(DealerError::Cancelled) => {
                    cancelled = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        if cancelled {
            break;
        }
    }

    let filled = dealer
        .orders()
        .filter(|o| o.state() == OrderState::Closed)
        .count() as u64;
    Ok(Report {
        bars,
        orders: report_orders,
        filled,
        cancelled,
        histogram,
        dealer,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::try_init().unwrap_or_default();
    let args = Args::parse();
    let runtime = RuntimeConfig::from_toml(&args.config)?;
    dealer::metrics::init_registry();

    println!(
        "Starting replay of {} bars, {} orders per bar, seed {}",
        args.bars, args.orders_per_bar, args.seed
    );

    let cancel = Cancel::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupt received, stopping replay");
            on_signal.cancel();
        }
    });

    let started = Instant::now();
    let report = tokio::task::spawn_blocking(move || replay(args, runtime, cancel)).await??;
    let elapsed = started.elapsed();

    let account = report.dealer.account();
    println!("\nReplay Results:");
    if report.cancelled {
        println!("Interrupted before the last bar");
    }
    println!("Bars: {}", report.bars);
    println!("Orders placed: {}", report.orders);
    println!("Orders filled: {}", report.filled);
    println!("Orders resting: {}", report.dealer.open_orders().count());
    println!(
        "Bars per second: {:.2}",
        report.bars as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("Start equity: {}", account.initial_capital());
    if let Some((at, equity)) = report.dealer.equity_series().iter().next_back() {
        println!("End equity: {} at {}", equity, at);
    }
    println!("\nBar Latency Distribution (microseconds):");
    let hist = &report.histogram;
    println!("p50: {}", hist.value_at_percentile(50.0));
    println!("p90: {}", hist.value_at_percentile(90.0));
    println!("p95: {}", hist.value_at_percentile(95.0));
    println!("p99: {}", hist.value_at_percentile(99.0));
    println!("p99.9: {}", hist.value_at_percentile(99.9));

    Ok(())
}
