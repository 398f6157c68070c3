//! Simulates a battery under a cyclic load until end of discharge.
//!
//! Run with `cargo run --example sim_battery`. Set `RUST_LOG=debug` to see
//! the simulation loop.

use prog_models::{
    PrognosticsModel,
    models::battery::BatteryCircuit,
    prognostics::Input,
    simulation::{RefineConfig, SimulationConfig},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const CYCLE_TIME: f64 = 600.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let battery = BatteryCircuit::default();

    // Draw 3 A for the first half of each cycle, then 1 A.
    let future_loading = |t: f64| {
        let current = if t % CYCLE_TIME < CYCLE_TIME / 2.0 {
            3.0
        } else {
            1.0
        };
        Input::from([("i", current)])
    };

    let x0 = battery.initialize(&future_loading(0.0), &Default::default())?;
    let first_output = battery.output(0.0, &x0)?;

    let config = SimulationConfig {
        dt: 1.0,
        save_freq: 600.0,
        horizon: 20_000.0,
        refine_event_time: Some(RefineConfig::default()),
        ..SimulationConfig::default()
    };

    println!("Simulating to threshold\n");
    let result = battery.simulate_to_threshold(future_loading, &first_output, &config)?;

    for point in result.points() {
        println!(
            "Time: {:.2}\n\tInput: {:?}\n\tState: {:?}\n\tOutput: {:?}\n\tEvent State: {:?}\n",
            point.time, point.input, point.state, point.output, point.event_state
        );
    }

    if let Some(eod) = result.last_time() {
        println!("End of discharge at {eod:.2} s");
    }

    Ok(())
}
