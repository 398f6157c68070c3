use uom::si::{
    f64::{Length, MassDensity, MomentOfInertia},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    moment_of_inertia::kilogram_square_meter,
};

use crate::{
    models::check,
    prognostics::{
        Input, ModelError, ModelKeys, NoiseConfig, Output, PrognosticsModel, ProcessNoise, State,
    },
    support::constraint::{NonNegative, StrictlyPositive},
};

use super::{DcMotor, Esc};

/// Propeller load parameters.
///
/// Defaults describe a commercial UAV propeller.
#[derive(Debug, Clone, PartialEq)]
pub struct PowertrainParams {
    /// Dimensionless torque coefficient of the propeller.
    pub c_q: f64,

    /// Air density.
    pub rho: MassDensity,

    /// Propeller diameter.
    pub d: Length,
}

impl Default for PowertrainParams {
    fn default() -> Self {
        Self {
            c_q: 0.00542,
            rho: MassDensity::new::<kilogram_per_cubic_meter>(1.225),
            d: Length::new::<meter>(0.381),
        }
    }
}

impl PowertrainParams {
    fn validate(&self) -> Result<(), ModelError> {
        check::<NonNegative, _>("c_q", self.c_q)?;
        check::<NonNegative, _>("rho", self.rho)?;
        check::<StrictlyPositive, _>("d", self.d)?;
        Ok(())
    }

    /// Propeller load coefficient `C_q = c_q ρ D⁵`; load torque is `C_q ω²`.
    #[must_use]
    pub fn load_coefficient(&self) -> MomentOfInertia {
        let rho = self.rho.get::<kilogram_per_cubic_meter>();
        let d = self.d.get::<meter>();
        MomentOfInertia::new::<kilogram_square_meter>(self.c_q * rho * d.powi(5))
    }
}

/// An ESC driving a brushless DC motor that turns a propeller.
///
/// - Inputs: `duty` (duty cycle in `[0, 1]`), `v` (supply voltage, V)
/// - States: the ESC states `v_a`, `v_b`, `v_c`, `t` followed by the motor
///   states `i_a`, `i_b`, `i_c`, `v_rot`, `theta`
/// - Outputs: `v_rot` (rad/s), `theta` (rad)
///
/// Each step advances the ESC using the current rotor angle, then advances
/// the motor using the new phase voltages and the propeller load torque at
/// the current speed.
///
/// # Example
///
/// ```
/// use prog_models::{
///     PrognosticsModel,
///     models::powertrain::Powertrain,
///     prognostics::{Input, Output},
///     simulation::SimulationConfig,
/// };
///
/// let powertrain = Powertrain::default();
/// let config = SimulationConfig {
///     dt: 1e-5,
///     save_freq: 1e-3,
///     ..SimulationConfig::default()
/// };
/// let first_output = Output::from([("v_rot", 0.0), ("theta", 0.0)]);
///
/// let result = powertrain
///     .simulate_to(0.005, |_t| Input::from([("duty", 1.0), ("v", 16.0)]), &first_output, &config)
///     .unwrap();
///
/// assert!(result.last().unwrap().output.get("v_rot").unwrap() > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Powertrain {
    esc: Esc,
    motor: DcMotor,
    params: PowertrainParams,
    keys: ModelKeys,
    process_noise: ProcessNoise,
}

impl Default for Powertrain {
    fn default() -> Self {
        Self::new(
            Esc::default(),
            DcMotor::default(),
            PowertrainParams::default(),
            &NoiseConfig::default(),
        )
        .unwrap_or_else(|err| panic!("default powertrain parameters are valid: {err}"))
    }
}

impl Powertrain {
    /// Composes a powertrain from its components.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameter`] for a negative torque
    /// coefficient or air density, or a non-positive diameter.
    /// Returns [`ModelError::ParameterMismatch`] if the ESC and motor pole
    /// pair counts differ, or a noise error if the process noise does not
    /// fit the states.
    pub fn new(
        esc: Esc,
        motor: DcMotor,
        params: PowertrainParams,
        noise: &NoiseConfig,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if esc.params().pole_pairs != motor.params().pole_pairs {
            return Err(ModelError::ParameterMismatch { name: "pole_pairs" });
        }

        let states = esc
            .keys()
            .states
            .iter()
            .chain(&motor.keys().states)
            .cloned()
            .collect::<Vec<_>>();
        let keys = ModelKeys {
            inputs: vec!["duty".into(), "v".into()],
            states,
            outputs: vec!["v_rot".into(), "theta".into()],
            events: Vec::new(),
        };
        let process_noise = ProcessNoise::from_config(noise, &keys.states)?;

        Ok(Self {
            esc,
            motor,
            params,
            keys,
            process_noise,
        })
    }

    #[must_use]
    pub fn esc(&self) -> &Esc {
        &self.esc
    }

    #[must_use]
    pub fn motor(&self) -> &DcMotor {
        &self.motor
    }

    #[must_use]
    pub fn params(&self) -> &PowertrainParams {
        &self.params
    }

    /// Replaces the propeller load parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameter`] if the new parameters are
    /// invalid, leaving the current ones in place.
    pub fn set_params(&mut self, params: PowertrainParams) -> Result<(), ModelError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }
}

impl PrognosticsModel for Powertrain {
    fn keys(&self) -> &ModelKeys {
        &self.keys
    }

    fn process_noise(&self) -> &ProcessNoise {
        &self.process_noise
    }

    fn initialize(&self, u: &Input, z: &Output) -> Result<State, ModelError> {
        Ok(self
            .esc
            .initialize(u, z)?
            .merge(self.motor.initialize(u, z)?))
    }

    fn next_state(&self, t: f64, x: &State, u: &Input, dt: f64) -> Result<State, ModelError> {
        let omega = x.get("v_rot")?;

        let u_esc = Input::from([
            ("duty", u.get("duty")?),
            ("theta", x.get("theta")?),
            ("v", u.get("v")?),
        ]);
        let x_esc = self
            .esc
            .next_state(t, &x.project(&self.esc.keys().states)?, &u_esc, dt)?;

        let c_q = self.params.load_coefficient().get::<kilogram_square_meter>();
        let u_motor = Input::from([
            ("v_a", x_esc.get("v_a")?),
            ("v_b", x_esc.get("v_b")?),
            ("v_c", x_esc.get("v_c")?),
            ("t_l", c_q * omega.powi(2)),
        ]);
        let x_motor = self
            .motor
            .next_state(t, &x.project(&self.motor.keys().states)?, &u_motor, dt)?;

        Ok(x_esc.merge(x_motor))
    }

    fn output(&self, _t: f64, x: &State) -> Result<Output, ModelError> {
        x.project(&self.keys.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::inductance::henry;

    use crate::{
        models::powertrain::{DcMotorParams, EscParams},
        simulation::SimulationConfig,
        support::constraint::ConstraintError,
    };

    fn throttle(duty: f64) -> impl Fn(f64) -> Input {
        move |_t| Input::from([("duty", duty), ("v", 16.0)])
    }

    fn pwm_config() -> SimulationConfig {
        SimulationConfig {
            dt: 1e-5,
            save_freq: 1e-3,
            ..SimulationConfig::default()
        }
    }

    fn at_rest() -> Output {
        Output::from([("v_rot", 0.0), ("theta", 0.0)])
    }

    #[test]
    fn states_are_the_union_of_components() {
        let powertrain = Powertrain::default();
        assert_eq!(
            powertrain.keys().states,
            ["v_a", "v_b", "v_c", "t", "i_a", "i_b", "i_c", "v_rot", "theta"]
        );

        let x0 = powertrain.initialize(&Input::new(), &at_rest()).unwrap();
        assert_eq!(x0.len(), 9);
        assert!(x0.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn load_coefficient_from_propeller() {
        let params = PowertrainParams::default();
        assert_relative_eq!(
            params.load_coefficient().get::<kilogram_square_meter>(),
            0.00542 * 1.225 * 0.381_f64.powi(5),
            max_relative = 1e-12
        );
    }

    #[test]
    fn zero_duty_stays_at_rest() {
        let powertrain = Powertrain::default();
        let result = powertrain
            .simulate_to(0.002, throttle(0.0), &at_rest(), &pwm_config())
            .unwrap();

        for point in result.points() {
            assert_eq!(point.output.get("v_rot").unwrap(), 0.0);
            assert_eq!(point.output.get("theta").unwrap(), 0.0);
            assert_eq!(point.state.get("i_a").unwrap(), 0.0);
        }
    }

    #[test]
    fn full_throttle_spins_up() {
        let powertrain = Powertrain::default();
        let result = powertrain
            .simulate_to(0.02, throttle(1.0), &at_rest(), &pwm_config())
            .unwrap();

        let last = result.last().unwrap();
        assert!(last.time >= 0.02 - 1e-9);
        assert!(last.output.get("v_rot").unwrap() > 0.0);
        assert!(last.output.get("theta").unwrap() > 0.0);
    }

    #[test]
    fn propeller_load_slows_spin_up() {
        let unloaded = Powertrain::new(
            Esc::default(),
            DcMotor::default(),
            PowertrainParams {
                c_q: 0.0,
                ..PowertrainParams::default()
            },
            &NoiseConfig::default(),
        )
        .unwrap();
        let loaded = Powertrain::default();

        let speed = |powertrain: &Powertrain| {
            let result = powertrain
                .simulate_to(0.01, throttle(1.0), &at_rest(), &pwm_config())
                .unwrap();
            result.last().unwrap().output.get("v_rot").unwrap()
        };

        assert!(speed(&loaded) < speed(&unloaded));
    }

    #[test]
    fn rejects_invalid_propeller() {
        let mut powertrain = Powertrain::default();
        let params = PowertrainParams {
            d: Length::new::<meter>(0.0),
            ..PowertrainParams::default()
        };

        assert_eq!(
            powertrain.set_params(params),
            Err(ModelError::InvalidParameter {
                name: "d",
                source: ConstraintError::Zero
            })
        );
        assert_eq!(powertrain.params(), &PowertrainParams::default());
    }

    #[test]
    fn rejects_mismatched_pole_pairs() {
        let esc = Esc::new(
            EscParams {
                pole_pairs: 7,
                ..EscParams::default()
            },
            &NoiseConfig::default(),
        )
        .unwrap();

        assert_eq!(
            Powertrain::new(
                esc,
                DcMotor::default(),
                PowertrainParams::default(),
                &NoiseConfig::default(),
            ),
            Err(ModelError::ParameterMismatch { name: "pole_pairs" })
        );
    }

    #[test]
    fn equality_covers_components() {
        let motor = DcMotor::new(
            DcMotorParams {
                l: uom::si::f64::Inductance::new::<henry>(90e-6),
                ..DcMotorParams::default()
            },
            &NoiseConfig::default(),
        )
        .unwrap();
        let other = Powertrain::new(
            Esc::default(),
            motor,
            PowertrainParams::default(),
            &NoiseConfig::default(),
        )
        .unwrap();

        assert_eq!(Powertrain::default(), Powertrain::default());
        assert_ne!(Powertrain::default(), other);
    }
}
