use serde::Deserialize;
use twine_solvers::equation::bisection;

use crate::{prognostics::State, support::constraint::StrictlyPositive};

use super::SimulationError;

/// Configuration for a simulation run.
///
/// Model parameters are configured on the model itself; this only controls
/// how the simulation advances and when it saves.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use prog_models::simulation::SimulationConfig;
///
/// let config: SimulationConfig = serde_json::from_str(r#"{"dt": 0.01, "save_freq": 60}"#).unwrap();
/// assert_eq!(config.dt, 0.01);
/// assert_eq!(config.horizon, 1e100);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Step size in seconds.
    pub dt: f64,

    /// Period between saved points, in seconds.
    pub save_freq: f64,

    /// Simulation stops once time reaches the horizon, in seconds.
    pub horizon: f64,

    /// Initial state; when absent the model's `initialize` is used.
    pub x0: Option<State>,

    /// Only these events stop the simulation; when absent any event does.
    pub threshold_keys: Option<Vec<String>>,

    /// Adds the model's process noise after each step.
    pub apply_process_noise: bool,

    /// Seed for the process noise generator; when absent it is seeded from entropy.
    pub seed: Option<u64>,

    /// Locates the event crossing within the final step.
    pub refine_event_time: Option<RefineConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            save_freq: 10.0,
            horizon: 1e100,
            x0: None,
            threshold_keys: None,
            apply_process_noise: false,
            seed: None,
            refine_event_time: None,
        }
    }
}

/// Step settings after validation.
#[derive(Debug, Clone, Copy)]
pub(super) struct Steps {
    pub(super) dt: f64,
    pub(super) save_freq: f64,
    pub(super) horizon: f64,
}

impl SimulationConfig {
    pub(super) fn steps(&self) -> Result<Steps, SimulationError> {
        let dt = StrictlyPositive::new(self.dt)
            .map_err(|source| SimulationError::InvalidConfig { field: "dt", source })?;
        let save_freq = StrictlyPositive::new(self.save_freq).map_err(|source| {
            SimulationError::InvalidConfig {
                field: "save_freq",
                source,
            }
        })?;

        Ok(Steps {
            dt: dt.into_inner(),
            save_freq: save_freq.into_inner(),
            horizon: self.horizon,
        })
    }
}

/// Solver configuration for event time refinement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the crossing time, in seconds.
    pub time_tol: f64,

    /// Absolute tolerance on the event state at the crossing.
    pub residual_tol: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            time_tol: 1e-9,
            residual_tol: 1e-12,
        }
    }
}

impl RefineConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.time_tol,
            x_rel_tol: 0.0,
            residual_tol: self.residual_tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::support::constraint::ConstraintError;

    #[test]
    fn rejects_non_positive_steps() {
        let config = SimulationConfig {
            dt: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.steps(),
            Err(SimulationError::InvalidConfig {
                field: "dt",
                source: ConstraintError::Zero
            })
        ));

        let config = SimulationConfig {
            save_freq: -1.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.steps(),
            Err(SimulationError::InvalidConfig {
                field: "save_freq",
                source: ConstraintError::Negative
            })
        ));
    }

    #[test]
    fn deserializes_nested_settings() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{
                "x0": {"a": 1.5},
                "threshold_keys": ["EOD"],
                "refine_event_time": {"max_iters": 20}
            }"#,
        )
        .unwrap();

        assert_eq!(config.x0, Some(State::from([("a", 1.5)])));
        assert_eq!(config.threshold_keys, Some(vec!["EOD".to_owned()]));
        let refine = config.refine_event_time.unwrap();
        assert_eq!(refine.max_iters, 20);
        assert_eq!(refine.time_tol, 1e-9);
    }
}
