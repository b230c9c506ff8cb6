//! End-to-end Tevatron run example.
//!
//! Demonstrates: build config → EventGenerator → parallel batch →
//! inspect events and statistics. Set `RUST_LOG=debug` to see
//! abandoned events, `RUST_LOG=info` for the table and run summaries.
//!
//! Usage: `cargo run --example tevatron_run -- [events] [workers]`

use mbr_bench::tevatron_profile;
use mbr_core::ProcessKind;
use mbr_engine::{generate_batch, run_fingerprint, EventGenerator};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let events: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(10_000);
    let workers: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(4);

    let config = tevatron_profile(92_253_591);
    let seed = config.seed;
    let generator = match EventGenerator::new(config) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    println!("=== MBR Tevatron Run ===\n");
    println!("sqrt(s) = {:.1} GeV", generator.config().sqrt_s());
    for kind in ProcessKind::ALL {
        println!(
            "  {:<20} sigma = {:7.3} mb  p = {:.4}",
            kind.to_string(),
            generator.table().sigma.of(kind),
            generator.table().probability(kind)
        );
    }

    let batch = generate_batch(&generator, seed, workers, events);
    batch.stats.log_summary();

    let total: usize = batch.events.iter().map(|e| e.multiplicity()).sum();
    let charged: usize = batch
        .events
        .iter()
        .flat_map(|e| e.final_state())
        .filter(|p| p.charge() != 0)
        .count();
    let n = batch.events.len().max(1) as f64;

    println!("\n{} events on {} workers ({} failed)", batch.events.len(), workers, batch.failed.len());
    println!("  <n>          = {:.2}", total as f64 / n);
    println!("  <n_charged>  = {:.2}", charged as f64 / n);
    println!("  abandonment  = {:.5}", batch.stats.abandonment_rate());
    println!("  soft retries = {:.5}", batch.stats.soft_failure_rate());
    println!("  fingerprint  = {:016x}", run_fingerprint(&batch.events));
}
