//! Simulation of prognostics models.
//!
//! A simulation advances a model with a fixed step from time zero, querying
//! a loading function for the input at each step, until either a time
//! horizon or an event threshold is reached. Points are saved at a fixed
//! period into a [`SimResult`].

mod adapter;
mod config;
mod error;
mod refine;
mod result;
mod run;

#[cfg(test)]
mod test_support;

pub use adapter::ThresholdSimulation;
pub use config::{RefineConfig, SimulationConfig};
pub use error::SimulationError;
pub use result::{SimPoint, SimResult};

use crate::{
    prognostics::{Input, ModelError, Output, PrognosticsModel, State},
    support::constraint::StrictlyPositive,
};

use run::{Stop, run};

/// Simulates a model until `time`, ignoring event thresholds.
///
/// The configured horizon is replaced by `time`.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidTime`] if `time` is not positive, or any
/// error described by [`simulate_to_threshold`].
pub fn simulate_to<M, L>(
    model: &M,
    time: f64,
    loading: L,
    first_output: &Output,
    config: &SimulationConfig,
) -> Result<SimResult, SimulationError>
where
    M: PrognosticsModel,
    L: Fn(f64) -> Input,
{
    let time = StrictlyPositive::new(time)
        .map_err(|source| SimulationError::InvalidTime { time, source })?
        .into_inner();

    let config = SimulationConfig {
        horizon: time,
        ..config.clone()
    };
    run(model, loading, first_output, &config, &Stop::Never)
}

/// Simulates a model until any event threshold is met or the horizon is reached.
///
/// When `config.threshold_keys` lists events, only those events stop the
/// simulation. An empty list behaves like no list.
///
/// # Errors
///
/// Returns a [`SimulationError`] if the first output lacks a model output,
/// a threshold key is not an event, a step setting is not positive, or a
/// model equation fails.
pub fn simulate_to_threshold<M, L>(
    model: &M,
    loading: L,
    first_output: &Output,
    config: &SimulationConfig,
) -> Result<SimResult, SimulationError>
where
    M: PrognosticsModel,
    L: Fn(f64) -> Input,
{
    let stop = Stop::thresholds(config.threshold_keys.as_deref());
    run(model, loading, first_output, config, &stop)
}

/// Simulates a model until `predicate` returns true or the horizon is reached.
///
/// The predicate replaces the model's threshold equation.
///
/// # Errors
///
/// Returns a [`SimulationError`] as described by [`simulate_to_threshold`],
/// or if the predicate fails.
pub fn simulate_to_threshold_with<M, L, P>(
    model: &M,
    loading: L,
    first_output: &Output,
    config: &SimulationConfig,
    predicate: P,
) -> Result<SimResult, SimulationError>
where
    M: PrognosticsModel,
    L: Fn(f64) -> Input,
    P: Fn(f64, &State) -> Result<bool, ModelError>,
{
    run(model, loading, first_output, config, &Stop::Custom(&predicate))
}
