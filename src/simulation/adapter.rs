use twine_core::Model;

use crate::prognostics::{Input, PrognosticsModel, State};

use super::{SimResult, SimulationConfig, SimulationError, run};

/// A [`twine_core::Model`] that simulates from an initial state to a threshold.
///
/// The input is the initial state. The first output is computed from it, so
/// the model's `initialize` equation is not used.
pub struct ThresholdSimulation<'a, M, L> {
    model: &'a M,
    loading: L,
    config: SimulationConfig,
}

impl<'a, M, L> ThresholdSimulation<'a, M, L>
where
    M: PrognosticsModel,
    L: Fn(f64) -> Input,
{
    #[must_use]
    pub fn new(model: &'a M, loading: L, config: SimulationConfig) -> Self {
        Self {
            model,
            loading,
            config,
        }
    }
}

impl<M, L> Model for ThresholdSimulation<'_, M, L>
where
    M: PrognosticsModel,
    L: Fn(f64) -> Input,
{
    type Input = State;
    type Output = SimResult;
    type Error = SimulationError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let first_output = self.model.output(0.0, input)?;
        let config = SimulationConfig {
            x0: Some(input.clone()),
            ..self.config.clone()
        };
        let stop = run::Stop::thresholds(config.threshold_keys.as_deref());
        run::run(self.model, &self.loading, &first_output, &config, &stop)
    }
}
