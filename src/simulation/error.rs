use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::{prognostics::ModelError, support::constraint::ConstraintError};

/// Errors that can occur while simulating a prognostics model.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The target time for `simulate_to` is not a positive number.
    #[error("'time' must be a number greater than 0, was {time}")]
    InvalidTime {
        time: f64,
        #[source]
        source: ConstraintError,
    },

    /// A step setting is invalid.
    #[error("'{field}' must be positive")]
    InvalidConfig {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// The first output lacks one of the model's output keys.
    #[error("missing key `{key}` in first output, must have every key in model outputs")]
    MissingFirstOutput { key: String },

    /// A threshold key does not name a model event.
    #[error("threshold key `{key}` is not an event name")]
    UnknownThresholdKey { key: String },

    /// A model equation failed.
    #[error("model evaluation failed")]
    Model(#[from] ModelError),

    /// The bisection solver encountered an error while refining an event time.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// Event time refinement reached the iteration limit without converging.
    #[error("event time refinement hit iteration limit: residual={residual}")]
    RefinementMaxIters {
        /// Event state at the best crossing estimate.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}
