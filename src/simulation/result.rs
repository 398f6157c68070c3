use serde::Serialize;

use crate::prognostics::{EventStates, Input, ModelError, Output, PrognosticsModel, State};

/// The saved points of a simulation.
///
/// All vectors have the same length; index `i` describes time `times[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimResult {
    pub times: Vec<f64>,
    pub inputs: Vec<Input>,
    pub states: Vec<State>,
    pub outputs: Vec<Output>,
    pub event_states: Vec<EventStates>,
}

/// A single saved point of a [`SimResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimPoint<'a> {
    pub time: f64,
    pub input: &'a Input,
    pub state: &'a State,
    pub output: &'a Output,
    pub event_state: &'a EventStates,
}

impl SimResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last saved point.
    #[must_use]
    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Iterates over saved points in time order.
    pub fn points(&self) -> impl Iterator<Item = SimPoint<'_>> {
        self.times
            .iter()
            .zip(&self.inputs)
            .zip(&self.states)
            .zip(&self.outputs)
            .zip(&self.event_states)
            .map(|((((time, input), state), output), event_state)| SimPoint {
                time: *time,
                input,
                state,
                output,
                event_state,
            })
    }

    /// Returns the last saved point.
    #[must_use]
    pub fn last(&self) -> Option<SimPoint<'_>> {
        self.points().last()
    }

    /// Saves a point, evaluating outputs and event states for `x`.
    pub(super) fn record<M: PrognosticsModel>(
        &mut self,
        model: &M,
        t: f64,
        u: &Input,
        x: &State,
    ) -> Result<(), ModelError> {
        let output = model.output(t, x)?;
        let event_state = model.event_state(t, x)?;

        self.times.push(t);
        self.inputs.push(u.clone());
        self.states.push(x.clone());
        self.outputs.push(output);
        self.event_states.push(event_state);
        Ok(())
    }
}
