use uom::si::{f64::Frequency, frequency::hertz};

use crate::{
    models::check,
    prognostics::{
        Input, ModelError, ModelKeys, NoiseConfig, Output, PrognosticsModel, ProcessNoise, State,
    },
    support::constraint::{Constraint, StrictlyPositive, UnitInterval},
};

use super::commutation;

/// Parameters of the electronic speed controller.
#[derive(Debug, Clone, PartialEq)]
pub struct EscParams {
    /// Frequency of the sawtooth carrier compared against the duty cycle.
    pub sawtooth_freq: Frequency,

    /// Pole pairs of the driven motor, mapping rotor angle to electrical angle.
    pub pole_pairs: u32,
}

impl Default for EscParams {
    fn default() -> Self {
        Self {
            sawtooth_freq: Frequency::new::<hertz>(16_000.0),
            pole_pairs: 14,
        }
    }
}

/// Electronic speed controller for a three-phase brushless DC motor.
///
/// - Inputs: `duty` (duty cycle in `[0, 1]`), `theta` (rotor angle, rad),
///   `v` (supply voltage, V)
/// - States: `v_a`, `v_b`, `v_c` (phase voltages, V), `t` (PWM clock, s)
/// - Outputs: `v_a`, `v_b`, `v_c`
///
/// The supply is switched on while the duty cycle exceeds a sawtooth carrier.
/// Six-step commutation on the electrical angle selects which two phases are
/// driven, each at half the supply voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct Esc {
    params: EscParams,
    sawtooth_freq: f64,
    keys: ModelKeys,
    process_noise: ProcessNoise,
}

impl Default for Esc {
    fn default() -> Self {
        Self::new(EscParams::default(), &NoiseConfig::default())
            .unwrap_or_else(|err| panic!("default ESC parameters are valid: {err}"))
    }
}

fn keys() -> ModelKeys {
    ModelKeys {
        inputs: vec!["duty".into(), "theta".into(), "v".into()],
        states: vec!["v_a".into(), "v_b".into(), "v_c".into(), "t".into()],
        outputs: vec!["v_a".into(), "v_b".into(), "v_c".into()],
        events: Vec::new(),
    }
}

impl Esc {
    /// Creates a speed controller.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameter`] if the sawtooth frequency or
    /// pole pair count is not strictly positive, or a noise error if the
    /// process noise does not fit the states.
    pub fn new(params: EscParams, noise: &NoiseConfig) -> Result<Self, ModelError> {
        let sawtooth_freq =
            check::<StrictlyPositive, _>("sawtooth_freq", params.sawtooth_freq)?.get::<hertz>();
        check::<StrictlyPositive, _>("pole_pairs", params.pole_pairs)?;

        let keys = keys();
        let process_noise = ProcessNoise::from_config(noise, &keys.states)?;
        Ok(Self {
            params,
            sawtooth_freq,
            keys,
            process_noise,
        })
    }

    #[must_use]
    pub fn params(&self) -> &EscParams {
        &self.params
    }

    /// Electrical angle for a rotor angle.
    pub(super) fn electrical_angle(&self, theta: f64) -> f64 {
        theta * f64::from(self.params.pole_pairs)
    }
}

impl PrognosticsModel for Esc {
    fn keys(&self) -> &ModelKeys {
        &self.keys
    }

    fn process_noise(&self) -> &ProcessNoise {
        &self.process_noise
    }

    fn initialize(&self, _u: &Input, _z: &Output) -> Result<State, ModelError> {
        Ok(State::from([
            ("v_a", 0.0),
            ("v_b", 0.0),
            ("v_c", 0.0),
            ("t", 0.0),
        ]))
    }

    fn next_state(&self, _t: f64, x: &State, u: &Input, dt: f64) -> Result<State, ModelError> {
        let duty = u.get("duty")?;
        UnitInterval::check(&duty).map_err(|source| ModelError::InvalidInput {
            key: "duty".into(),
            source,
        })?;

        let t = x.get("t")? + dt;
        let carrier = (t * self.sawtooth_freq).fract();
        let supply = if duty > carrier { u.get("v")? } else { 0.0 };

        let theta_e = self.electrical_angle(u.get("theta")?);
        let [s_a, s_b, s_c] = commutation::six_step(theta_e);
        let half = supply / 2.0;

        Ok(State::from([
            ("v_a", half * s_a),
            ("v_b", half * s_b),
            ("v_c", half * s_c),
            ("t", t),
        ]))
    }

    fn output(&self, _t: f64, x: &State) -> Result<Output, ModelError> {
        x.project(&self.keys.outputs)
    }
}
