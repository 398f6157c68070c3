use std::fmt;

use super::{
    EventStates, Input, ModelError, ModelKeys, NoiseConfig, Output, PrognosticsModel,
    ProcessNoise, State, ThresholdsMet,
};

type InitializeFn = Box<dyn Fn(&Input, &Output) -> Result<State, ModelError> + Send + Sync>;
type NextStateFn = Box<dyn Fn(f64, &State, &Input, f64) -> Result<State, ModelError> + Send + Sync>;
type OutputFn = Box<dyn Fn(f64, &State) -> Result<Output, ModelError> + Send + Sync>;
type EventStateFn = Box<dyn Fn(f64, &State) -> Result<EventStates, ModelError> + Send + Sync>;
type ThresholdFn = Box<dyn Fn(f64, &State) -> Result<ThresholdsMet, ModelError> + Send + Sync>;

/// A prognostics model assembled from closures.
///
/// # Example
///
/// ```
/// use prog_models::prognostics::{GeneratedModel, ModelKeys, PrognosticsModel, State};
///
/// let keys = ModelKeys::new(&["load"], &["wear"], &["wear"], &["EOL"]).unwrap();
///
/// let model = GeneratedModel::builder(keys)
///     .initialize(|_u, _z| Ok(State::from([("wear", 0.0)])))
///     .next_state(|_t, x, u, dt| {
///         Ok(State::from([("wear", x.get("wear")? + u.get("load")? * dt)]))
///     })
///     .output(|_t, x| Ok(x.clone()))
///     .event_state(|_t, x| Ok(State::from([("EOL", 1.0 - x.get("wear")? / 100.0)])))
///     .build()
///     .unwrap();
///
/// let x = model.next_state(1.0, &State::from([("wear", 0.0)]), &State::from([("load", 2.0)]), 1.0);
/// assert_eq!(x.unwrap().get("wear").unwrap(), 2.0);
/// ```
pub struct GeneratedModel {
    keys: ModelKeys,
    process_noise: ProcessNoise,
    initialize: InitializeFn,
    next_state: NextStateFn,
    output: OutputFn,
    event_state: Option<EventStateFn>,
    threshold_met: Option<ThresholdFn>,
}

impl GeneratedModel {
    /// Starts building a model with the given keys.
    #[must_use]
    pub fn builder(keys: ModelKeys) -> GeneratedModelBuilder {
        GeneratedModelBuilder {
            keys,
            process_noise: NoiseConfig::Uniform(0.1),
            initialize: None,
            next_state: None,
            output: None,
            event_state: None,
            threshold_met: None,
        }
    }
}

impl fmt::Debug for GeneratedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedModel")
            .field("keys", &self.keys)
            .field("process_noise", &self.process_noise)
            .finish_non_exhaustive()
    }
}

impl PrognosticsModel for GeneratedModel {
    fn keys(&self) -> &ModelKeys {
        &self.keys
    }

    fn process_noise(&self) -> &ProcessNoise {
        &self.process_noise
    }

    fn initialize(&self, u: &Input, z: &Output) -> Result<State, ModelError> {
        (self.initialize)(u, z)
    }

    fn next_state(&self, t: f64, x: &State, u: &Input, dt: f64) -> Result<State, ModelError> {
        (self.next_state)(t, x, u, dt)
    }

    fn output(&self, t: f64, x: &State) -> Result<Output, ModelError> {
        (self.output)(t, x)
    }

    fn event_state(&self, t: f64, x: &State) -> Result<EventStates, ModelError> {
        match &self.event_state {
            Some(event_state) => event_state(t, x),
            None => Ok(EventStates::new()),
        }
    }

    fn threshold_met(&self, t: f64, x: &State) -> Result<ThresholdsMet, ModelError> {
        match &self.threshold_met {
            Some(threshold_met) => threshold_met(t, x),
            None => Ok(self
                .event_state(t, x)?
                .into_iter()
                .map(|(key, event_state)| (key, event_state < 0.0))
                .collect()),
        }
    }
}

/// Builder for [`GeneratedModel`].
///
/// `initialize`, `next_state` and `output` are required.
/// Process noise defaults to a standard deviation of 0.1 on every state.
pub struct GeneratedModelBuilder {
    keys: ModelKeys,
    process_noise: NoiseConfig,
    initialize: Option<InitializeFn>,
    next_state: Option<NextStateFn>,
    output: Option<OutputFn>,
    event_state: Option<EventStateFn>,
    threshold_met: Option<ThresholdFn>,
}

impl GeneratedModelBuilder {
    #[must_use]
    pub fn initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Input, &Output) -> Result<State, ModelError> + Send + Sync + 'static,
    {
        self.initialize = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn next_state<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, &State, &Input, f64) -> Result<State, ModelError> + Send + Sync + 'static,
    {
        self.next_state = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn output<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, &State) -> Result<Output, ModelError> + Send + Sync + 'static,
    {
        self.output = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn event_state<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, &State) -> Result<EventStates, ModelError> + Send + Sync + 'static,
    {
        self.event_state = Some(Box::new(f));
        self
    }

    /// Overrides the default `event_state < 0` threshold rule.
    #[must_use]
    pub fn threshold_met<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, &State) -> Result<ThresholdsMet, ModelError> + Send + Sync + 'static,
    {
        self.threshold_met = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn process_noise(mut self, config: impl Into<NoiseConfig>) -> Self {
        self.process_noise = config.into();
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingEquation`] if a required equation was not
    /// supplied, or a noise error if the process noise does not fit the states.
    pub fn build(self) -> Result<GeneratedModel, ModelError> {
        let initialize = self
            .initialize
            .ok_or(ModelError::MissingEquation { name: "initialize" })?;
        let next_state = self
            .next_state
            .ok_or(ModelError::MissingEquation { name: "next_state" })?;
        let output = self
            .output
            .ok_or(ModelError::MissingEquation { name: "output" })?;
        let process_noise = ProcessNoise::from_config(&self.process_noise, &self.keys.states)?;

        Ok(GeneratedModel {
            keys: self.keys,
            process_noise,
            initialize,
            next_state,
            output,
            event_state: self.event_state,
            threshold_met: self.threshold_met,
        })
    }
}
