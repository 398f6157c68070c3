//! Event time refinement.
//!
//! A fixed-step simulation detects an event at the end of the step in which
//! it happened. Refinement bisects the length of that final step so the
//! event state of the triggering event is zero, placing the event between
//! step boundaries.

mod problem;

use tracing::trace;
use twine_solvers::equation::bisection;

use crate::prognostics::{Input, PrognosticsModel, State};

use super::{RefineConfig, SimulationError};

use problem::{CrossingProblem, StepModel};

/// The step in which a threshold was met.
pub(super) struct Step<'a> {
    /// Time at the start of the step.
    pub(super) t: f64,
    /// State at the start of the step.
    pub(super) x: &'a State,
    /// Input applied over the step.
    pub(super) u: &'a Input,
    /// Full step size.
    pub(super) dt: f64,
}

/// An event crossing located within a step.
#[derive(Debug, Clone)]
pub(super) struct Crossing {
    pub(super) event: String,
    pub(super) t: f64,
    pub(super) state: State,
}

/// Locates the earliest event crossing within `step`.
///
/// Only events whose event state is non-negative at the start of the step and
/// negative at its end are considered. Returns `None` when no event qualifies.
///
/// # Errors
///
/// Returns a [`SimulationError`] if the model fails at a step boundary or
/// the solver does not converge.
pub(super) fn crossing<M: PrognosticsModel>(
    model: &M,
    step: &Step<'_>,
    events: Option<&[String]>,
    config: &RefineConfig,
) -> Result<Option<Crossing>, SimulationError> {
    let candidates: Vec<&String> = match events {
        Some(keys) => keys.iter().collect(),
        None => model.keys().events.iter().collect(),
    };

    let mut earliest: Option<Crossing> = None;

    for event in candidates {
        let step_model = StepModel::new(model, step, event);

        let start = step_model.evaluate(0.0)?;
        let end = step_model.evaluate(step.dt)?;
        if !(start.event_state >= 0.0 && end.event_state < 0.0) {
            trace!(event = %event, "no sign change, skipping refinement");
            continue;
        }

        let outcome = solve(&step_model, step.dt, config)?;
        if earliest.as_ref().is_none_or(|found| outcome.t < found.t) {
            earliest = Some(Crossing {
                event: event.clone(),
                t: outcome.t,
                state: outcome.state,
            });
        }
    }

    Ok(earliest)
}

fn solve<M: PrognosticsModel>(
    step_model: &StepModel<'_, M>,
    dt: f64,
    config: &RefineConfig,
) -> Result<problem::StepOutcome, SimulationError> {
    let solution = bisection::solve(
        step_model,
        &CrossingProblem,
        [0.0, dt],
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A failed partial step is treated as not yet crossed so the
            // bracket moves toward the end of the step.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(SimulationError::RefinementMaxIters {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    Ok(solution.snapshot.output)
}
