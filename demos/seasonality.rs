//! Walk-through of seasonality testing, decomposition and diagnostics.
//!
//! Run with `cargo run --example seasonality`. Set `RUST_LOG=anofox_seasonality=debug`
//! to see the per-candidate statistics.

use anofox_seasonality::core::{ModelMode, TimeSeries, TimeSeriesBuilder};
use anofox_seasonality::diagnostics::{acf_plot_data, residuals_analysis};
use anofox_seasonality::seasonality::{
    check_seasonality, extract_trend_and_seasonality, remove_from_series, remove_seasonality,
    SeasonalityConfig,
};
use anofox_seasonality::validation::granger_causality_tests;
use anofox_seasonality::Result;
use chrono::{TimeZone, Utc};
use tracing_subscriber::EnvFilter;

/// Initialize tracing; `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("anofox_seasonality=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Ten years of monthly sales: growth, a yearly cycle and some wobble.
fn monthly_sales() -> Result<TimeSeries> {
    let n = 120;
    let timestamps = (0..n)
        .map(|i| {
            Utc.with_ymd_and_hms(2015 + (i / 12) as i32, (i % 12) as u32 + 1, 1, 0, 0, 0)
                .unwrap()
        })
        .collect();
    let values = (0..n)
        .map(|i| {
            let t = i as f64;
            let season = (2.0 * std::f64::consts::PI * t / 12.0).sin();
            let wobble = ((i * 7919) % 13) as f64 / 13.0 - 0.5;
            (100.0 + 0.8 * t) * (1.0 + 0.2 * season) + wobble
        })
        .collect();
    TimeSeriesBuilder::new()
        .timestamps(timestamps)
        .values(values)
        .labels(vec!["sales".to_string()])
        .build()
}

fn main() -> Result<()> {
    init_logging();

    let sales = monthly_sales()?;
    println!("=== Seasonality test: {} ===", sales.label(0));
    let verdict = check_seasonality(&sales, &SeasonalityConfig::default())?;
    println!(
        "seasonal: {}, period: {}",
        verdict.seasonal, verdict.period
    );

    println!("\n=== Decomposition ===");
    let (trend, seasonal) = extract_trend_and_seasonality(&sales, None, ModelMode::Multiplicative)?;
    let seasonal_values = seasonal.univariate_values()?;
    println!("seasonal indices (first cycle):");
    for (month, index) in seasonal_values.iter().take(12).enumerate() {
        println!("  month {:2}: {:.3}", month + 1, index);
    }
    let trend_values = trend.univariate_values()?;
    println!(
        "trend: {:.1} -> {:.1}",
        trend_values[0],
        trend_values[trend_values.len() - 1]
    );

    println!("\n=== Seasonal adjustment ===");
    let adjusted = remove_seasonality(&sales, Some(12), ModelMode::Multiplicative)?;
    let check = check_seasonality(&adjusted, &SeasonalityConfig::default().with_period(12))?;
    println!("still seasonal at 12 after adjustment: {}", check.seasonal);

    println!("\n=== Residual diagnostics ===");
    let residuals = remove_from_series(&adjusted, &trend, ModelMode::Multiplicative)?;
    let analysis = residuals_analysis(&residuals, 20, true)?;
    let significant: Vec<usize> = (1..=analysis.correlogram.max_lag())
        .filter(|&lag| analysis.correlogram.is_significant(lag))
        .collect();
    println!("residual ACF lags outside the band: {:?}", significant);

    let correlogram = acf_plot_data(&sales, Some(12), 24, 0.05, true)?;
    println!(
        "sales ACF at lag 12: {:.3} (band {:.3})",
        correlogram.values[12],
        correlogram.band[11]
    );

    println!("\n=== Granger causality ===");
    // Promotions lift next month's sales
    let promotions: Vec<f64> = (0..sales.len())
        .map(|i| ((i * 37) % 61) as f64 / 61.0)
        .collect();
    let boosted: Vec<f64> = sales
        .univariate_values()?
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { v } else { v + 20.0 * promotions[i - 1] })
        .collect();
    let promotions = sales.with_values(promotions)?;
    let boosted = sales.with_values(boosted)?;
    let results = granger_causality_tests(&promotions, &boosted, 2, true)?;
    for (lag, result) in &results {
        println!(
            "lag {}: F = {:.2}, p = {:.4}",
            lag, result.ssr_ftest.statistic, result.ssr_ftest.p_value
        );
    }

    Ok(())
}
