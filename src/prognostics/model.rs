use rand::Rng;

use crate::simulation::{self, SimResult, SimulationConfig, SimulationError};

use super::{EventStates, Input, ModelError, ModelKeys, Output, ProcessNoise, State, ThresholdsMet};

/// A time-variant state space model of system degradation.
///
/// Implementors provide the state, output and (optionally) event equations.
/// Times and step sizes are in seconds.
///
/// Simulation is available through the provided
/// [`simulate_to`](Self::simulate_to) and
/// [`simulate_to_threshold`](Self::simulate_to_threshold) methods.
pub trait PrognosticsModel {
    /// Names of the model's inputs, states, outputs and events.
    fn keys(&self) -> &ModelKeys;

    /// Process noise applied to the state during noisy simulation.
    fn process_noise(&self) -> &ProcessNoise;

    /// Calculates the initial state given inputs and outputs.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a required value is missing or invalid.
    fn initialize(&self, u: &Input, z: &Output) -> Result<State, ModelError>;

    /// State transition equation: calculates the state at `t` after a step of `dt`.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a required value is missing or invalid.
    fn next_state(&self, t: f64, x: &State, u: &Input, dt: f64) -> Result<State, ModelError>;

    /// Calculates the outputs for a state.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a required value is missing or invalid.
    fn output(&self, t: f64, x: &State) -> Result<Output, ModelError>;

    /// Calculates event states, the progress toward each event.
    ///
    /// Values run from 1 (healthy) to 0 (event occurred).
    /// The default model has no events.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a required value is missing or invalid.
    fn event_state(&self, _t: f64, _x: &State) -> Result<EventStates, ModelError> {
        Ok(EventStates::new())
    }

    /// Determines, for each event, whether its threshold has been met.
    ///
    /// By default a threshold is met once its event state drops below zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a required value is missing or invalid.
    fn threshold_met(&self, t: f64, x: &State) -> Result<ThresholdsMet, ModelError> {
        Ok(self
            .event_state(t, x)?
            .into_iter()
            .map(|(key, event_state)| (key, event_state < 0.0))
            .collect())
    }

    /// Returns `x` with process noise added.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if `x` lacks a state key.
    fn apply_process_noise<R: Rng + ?Sized>(
        &self,
        x: &State,
        rng: &mut R,
    ) -> Result<State, ModelError>
    where
        Self: Sized,
    {
        self.process_noise().apply(x, rng)
    }

    /// Simulates the model until `time`, ignoring event thresholds.
    ///
    /// `loading` returns the input at a given time.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] for invalid arguments or model failures.
    fn simulate_to<L>(
        &self,
        time: f64,
        loading: L,
        first_output: &Output,
        config: &SimulationConfig,
    ) -> Result<SimResult, SimulationError>
    where
        Self: Sized,
        L: Fn(f64) -> Input,
    {
        simulation::simulate_to(self, time, loading, first_output, config)
    }

    /// Simulates the model until an event threshold is met or the horizon is reached.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] for invalid arguments or model failures.
    fn simulate_to_threshold<L>(
        &self,
        loading: L,
        first_output: &Output,
        config: &SimulationConfig,
    ) -> Result<SimResult, SimulationError>
    where
        Self: Sized,
        L: Fn(f64) -> Input,
    {
        simulation::simulate_to_threshold(self, loading, first_output, config)
    }
}
