//! Problem formulation for event time refinement.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};

use crate::prognostics::{ModelError, PrognosticsModel, State};

use super::Step;

/// The state reached after a partial step.
#[derive(Debug, Clone)]
pub(super) struct StepOutcome {
    pub(super) t: f64,
    pub(super) state: State,
    pub(super) event_state: f64,
}

/// Model adapter for bisecting a step length.
///
/// Takes a partial step `h` from the start of the step and reports the
/// event state of a single event at the reached state.
pub(super) struct StepModel<'a, M> {
    model: &'a M,
    step: &'a Step<'a>,
    event: &'a str,
}

impl<'a, M: PrognosticsModel> StepModel<'a, M> {
    pub(super) fn new(model: &'a M, step: &'a Step<'a>, event: &'a str) -> Self {
        Self { model, step, event }
    }

    pub(super) fn evaluate(&self, h: f64) -> Result<StepOutcome, ModelError> {
        let t = self.step.t + h;
        let state = self.model.next_state(t, self.step.x, self.step.u, h)?;
        let event_state = self.model.event_state(t, &state)?.get(self.event)?;
        Ok(StepOutcome {
            t,
            state,
            event_state,
        })
    }
}

impl<M: PrognosticsModel> Model for StepModel<'_, M> {
    type Input = f64;
    type Output = StepOutcome;
    type Error = ModelError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.evaluate(*input)
    }
}

/// Equation problem whose residual is the event state after the partial step.
pub(super) struct CrossingProblem;

impl EquationProblem<1> for CrossingProblem {
    type Input = f64;
    type Output = StepOutcome;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.event_state])
    }
}
