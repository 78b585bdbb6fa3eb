//! Coarse graining of a synthetic flood event
//!
//! Run with `RUST_LOG=sd_coarse=debug` to follow the search.

use sd_coarse::{coarse_grain, coarse_grain_splits, CoarseGrainingParameters};
use sd_core::replace_equal_neighbours;
use sd_distance::{no_event_error, ErrorModel};
use tracing_subscriber::EnvFilter;

/// Flood wave with small superimposed oscillations
fn hydrograph(len: usize, peak_at: f64, peak: f64, wiggle: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            let wave = peak * (-((t - peak_at) / 6.0).powi(2)).exp();
            5.0 + wave + wiggle * (t * 1.3).sin()
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    println!("=== Series Distance Coarse Graining ===\n");

    // Example 1: one event, simulation late and too low
    println!("1. Single event");
    let obs = hydrograph(48, 20.0, 40.0, 0.8);
    let sim = hydrograph(48, 23.0, 32.0, 0.5);
    let (obs, nudged) = replace_equal_neighbours(&obs);
    let index: Vec<usize> = (0..obs.len()).collect();

    let params = CoarseGrainingParameters::default();
    let result = coarse_grain(&obs, &index, &sim, &index, &params)?;
    println!("  Plateau samples nudged: {nudged}");
    println!(
        "  Initial segments: {} observed, {} simulated",
        result.obs_statistics.rising + result.obs_statistics.falling,
        result.sim_statistics.rising + result.sim_statistics.falling
    );
    println!("{result}");
    for (step, value) in result.objective.iter().enumerate() {
        println!("    step {step}: objective {value:.3}");
    }

    // Example 2: same event with standard magnitude errors
    println!("\n2. Standard error model");
    let standard = params.clone().with_error_model(ErrorModel::Standard);
    let result = coarse_grain(&obs, &index, &sim, &index, &standard)?;
    if let (Some(t), Some(v)) = (
        result.distance.mean_abs_timing(),
        result.distance.mean_abs_magnitude(),
    ) {
        println!("  Mean |timing| {t:.2} steps, mean |magnitude| {v:.2}");
    }

    // Example 3: continuous series cut into two windows
    println!("\n3. Continuous series");
    let mut obs_long = hydrograph(48, 20.0, 40.0, 0.8);
    obs_long.extend(hydrograph(40, 15.0, 25.0, 0.4));
    let mut sim_long = hydrograph(48, 22.0, 36.0, 0.6);
    sim_long.extend(hydrograph(40, 14.0, 28.0, 0.3));
    let splits = [0, 48, obs_long.len()];

    let combined = coarse_grain_splits(&obs_long, &sim_long, &splits, &params)?;
    println!(
        "  {} of {} windows succeeded, {} connectors",
        combined.succeeded(),
        combined.splits.len(),
        combined.connectors.len()
    );
    for (window, err) in combined.failures() {
        println!("    window {window} failed: {err}");
    }

    // Example 4: errors outside of the events
    println!("\n4. No-event error");
    let events = [(10, 32), (55, 75)];
    let mapping = [(10, 10), (55, 55)];
    let outside = no_event_error(
        &obs_long,
        &sim_long,
        &events,
        &events,
        &mapping,
        ErrorModel::Relative,
    )?;
    println!("  {} samples outside of events", outside.len());

    Ok(())
}
