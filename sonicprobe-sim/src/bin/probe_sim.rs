//! Run one simulated probe and print the outcome
//!
//! Set RUST_LOG=debug to see per-move detail.

use sonicprobe_core::command::ProbeCommand;
use sonicprobe_core::config::ProbeConfig;
use sonicprobe_core::probe::{CancelToken, FeedPolicy, ProbeRunner};
use sonicprobe_sim::{ConsoleDispatcher, SimClock, SimEndstop, SimToolhead};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = ProbeConfig::default();
    let clock = SimClock::new();
    let mut toolhead = SimToolhead::new(clock.clone());
    // Bed contact halfway through the run
    let mut endstop = SimEndstop::at_time(config.dt / 2.0);
    let mut dispatch = ConsoleDispatcher::default();
    let cancel = CancelToken::new();
    let mut runner = ProbeRunner::new(config, &cancel);

    info!(
        "Running {}: freq={} Hz, dz={} mm, dt={} s",
        ProbeCommand::Vibrate.name(),
        config.freq,
        config.dz,
        config.dt
    );

    match runner.run(
        &mut toolhead,
        &mut endstop,
        &clock,
        &mut dispatch,
        FeedPolicy::PeakOscillation,
    ) {
        Ok(result) => {
            info!(
                "Result: {:?} after {} moves and {} endstop queries",
                result,
                toolhead.issued.len(),
                endstop.queries.len()
            );
        }
        Err(err) => {
            eprintln!("Probe error: {err}");
            std::process::exit(1);
        }
    }
}
