use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::prognostics::{Input, ModelError, Output, PrognosticsModel, State};

use super::{SimResult, SimulationConfig, SimulationError, refine};

/// Decides when a simulation stops before its horizon.
pub(super) enum Stop<'a> {
    /// Any model threshold, or only the listed events.
    Thresholds(Option<&'a [String]>),

    /// Run to the horizon.
    Never,

    /// A caller-supplied predicate.
    Custom(&'a dyn Fn(f64, &State) -> Result<bool, ModelError>),
}

impl<'a> Stop<'a> {
    /// Stops on the listed events, or on any event when none are listed.
    pub(super) fn thresholds(keys: Option<&'a [String]>) -> Self {
        Self::Thresholds(keys.filter(|keys| !keys.is_empty()))
    }

    fn is_met<M: PrognosticsModel>(&self, model: &M, t: f64, x: &State) -> Result<bool, ModelError> {
        match self {
            Self::Thresholds(keys) => {
                let met = model.threshold_met(t, x)?;
                Ok(match keys {
                    Some(keys) => keys.iter().any(|key| met.get(key).copied().unwrap_or(false)),
                    None => met.values().any(|&met| met),
                })
            }
            Self::Never => Ok(false),
            Self::Custom(predicate) => predicate(t, x),
        }
    }

    /// Events eligible for crossing refinement.
    fn events(&self) -> Option<Option<&[String]>> {
        match self {
            Self::Thresholds(keys) => Some(*keys),
            Self::Never | Self::Custom(_) => None,
        }
    }
}

/// Runs the simulation loop.
///
/// The initial point is always saved. Afterwards a point is saved whenever
/// time reaches the next save time, and the final point is saved unless it
/// was just saved.
pub(super) fn run<M, L>(
    model: &M,
    loading: L,
    first_output: &Output,
    config: &SimulationConfig,
    stop: &Stop<'_>,
) -> Result<SimResult, SimulationError>
where
    M: PrognosticsModel,
    L: Fn(f64) -> Input,
{
    let keys = model.keys();
    if let Some(key) = keys.outputs.iter().find(|key| !first_output.contains_key(key)) {
        return Err(SimulationError::MissingFirstOutput { key: key.clone() });
    }
    if let Stop::Thresholds(Some(threshold_keys)) = stop {
        if let Some(key) = threshold_keys.iter().find(|key| !keys.has_event(key)) {
            return Err(SimulationError::UnknownThresholdKey { key: key.clone() });
        }
    }

    let steps = config.steps()?;
    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let mut t = 0.0;
    let mut u = loading(t);
    let mut x = match &config.x0 {
        Some(x0) => x0.clone(),
        None => model.initialize(&u, first_output)?,
    };

    let mut result = SimResult::default();
    result.record(model, t, &u, &x)?;

    debug!(
        dt = steps.dt,
        save_freq = steps.save_freq,
        horizon = steps.horizon,
        "starting simulation"
    );

    let mut next_save = steps.save_freq;
    let mut threshold_met = false;

    while !threshold_met && t < steps.horizon {
        let previous = config.refine_event_time.map(|_| (t, x.clone()));

        t += steps.dt;
        u = loading(t);
        x = model.next_state(t, &x, &u, steps.dt)?;
        if config.apply_process_noise {
            x = model.apply_process_noise(&x, &mut rng)?;
        }
        threshold_met = stop.is_met(model, t, &x)?;

        if threshold_met {
            if let (Some(refine_config), Some((t_prev, x_prev)), Some(events)) =
                (&config.refine_event_time, &previous, stop.events())
            {
                let step = refine::Step {
                    t: *t_prev,
                    x: x_prev,
                    u: &u,
                    dt: steps.dt,
                };
                if let Some(crossing) = refine::crossing(model, &step, events, refine_config)? {
                    debug!(event = %crossing.event, t = crossing.t, "refined event time");
                    t = crossing.t;
                    x = crossing.state;
                }
            }
        }

        if t >= next_save {
            next_save += steps.save_freq;
            result.record(model, t, &u, &x)?;
            trace!(t, "saved point");
        }
    }

    if result.last_time() != Some(t) {
        result.record(model, t, &u, &x)?;
    }

    debug!(t, threshold_met, points = result.len(), "simulation finished");
    Ok(result)
}
