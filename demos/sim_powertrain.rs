//! Simulates a UAV powertrain spinning up under a constant throttle.
//!
//! The full PWM signal is simulated, so the step size is 10 µs.
//! Run with `cargo run --example sim_powertrain`.

use prog_models::{
    PrognosticsModel, models::powertrain::Powertrain, prognostics::Input,
    simulation::SimulationConfig,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let powertrain = Powertrain::default();
    let future_loading = |_t: f64| Input::from([("duty", 1.0), ("v", 23.0)]);

    let x0 = powertrain.initialize(&future_loading(0.0), &Default::default())?;
    let first_output = powertrain.output(0.0, &x0)?;

    let config = SimulationConfig {
        dt: 1e-5,
        save_freq: 0.05,
        ..SimulationConfig::default()
    };

    let result = powertrain.simulate_to(0.5, future_loading, &first_output, &config)?;

    for point in result.points() {
        println!(
            "t = {:.3} s\tv_rot = {:8.2} rad/s\ttheta = {:8.2} rad",
            point.time,
            point.output.get("v_rot")?,
            point.output.get("theta")?,
        );
    }

    Ok(())
}
