use uom::si::{
    electrical_resistance::ohm,
    f64::{ElectricalResistance, Inductance, MagneticFlux, MomentOfInertia},
    inductance::henry,
    magnetic_flux::weber,
    moment_of_inertia::kilogram_square_meter,
};

use crate::{
    models::check,
    prognostics::{
        Input, ModelError, ModelKeys, NoiseConfig, Output, PrognosticsModel, ProcessNoise, State,
    },
    support::constraint::{NonNegative, StrictlyPositive},
};

use super::commutation;

/// Parameters of a three-phase brushless DC motor.
///
/// Defaults describe a multirotor motor driving a 15 inch propeller.
#[derive(Debug, Clone, PartialEq)]
pub struct DcMotorParams {
    /// Phase self-inductance.
    pub l: Inductance,

    /// Mutual inductance between phases.
    pub m: Inductance,

    /// Phase resistance.
    pub r: ElectricalResistance,

    /// Back-EMF constant, in V·s/rad.
    pub k: MagneticFlux,

    /// Viscous friction coefficient, in N·m·s/rad.
    pub b: f64,

    /// Rotor moment of inertia.
    pub j: MomentOfInertia,

    /// Pole pairs, mapping rotor angle to electrical angle.
    pub pole_pairs: u32,
}

impl Default for DcMotorParams {
    fn default() -> Self {
        Self {
            l: Inductance::new::<henry>(83e-6),
            m: Inductance::new::<henry>(0.0),
            r: ElectricalResistance::new::<ohm>(0.081),
            k: MagneticFlux::new::<weber>(0.0265),
            b: 0.0,
            j: MomentOfInertia::new::<kilogram_square_meter>(2.6e-5),
            pole_pairs: 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    /// Effective phase inductance, `L - M`.
    l_eff: f64,
    r: f64,
    k: f64,
    b: f64,
    j: f64,
    pole_pairs: f64,
}

impl DcMotorParams {
    fn coefficients(&self) -> Result<Coefficients, ModelError> {
        check::<NonNegative, _>("m", self.m)?;
        let l_eff = check::<StrictlyPositive, _>("l", self.l - self.m)?.get::<henry>();

        Ok(Coefficients {
            l_eff,
            r: check::<StrictlyPositive, _>("r", self.r)?.get::<ohm>(),
            k: check::<StrictlyPositive, _>("k", self.k)?.get::<weber>(),
            b: check::<NonNegative, _>("b", self.b)?,
            j: check::<StrictlyPositive, _>("j", self.j)?.get::<kilogram_square_meter>(),
            pole_pairs: f64::from(check::<StrictlyPositive, _>("pole_pairs", self.pole_pairs)?),
        })
    }
}

/// Three-phase brushless DC motor with trapezoidal back-EMF.
///
/// - Inputs: `v_a`, `v_b`, `v_c` (phase voltages, V), `t_l` (load torque, N·m)
/// - States: `i_a`, `i_b`, `i_c` (phase currents, A), `v_rot` (rotor speed,
///   rad/s), `theta` (rotor angle, rad)
/// - Outputs: `v_rot`, `theta`
///
/// Each phase obeys `(L - M) di/dt = v - R i - K ω F(θe)`, where `F` is the
/// back-EMF shape at the electrical angle. The rotor obeys
/// `J dω/dt = K Σ F i - B ω - t_l`.
#[derive(Debug, Clone, PartialEq)]
pub struct DcMotor {
    params: DcMotorParams,
    coefficients: Coefficients,
    keys: ModelKeys,
    process_noise: ProcessNoise,
}

impl Default for DcMotor {
    fn default() -> Self {
        Self::new(DcMotorParams::default(), &NoiseConfig::default())
            .unwrap_or_else(|err| panic!("default motor parameters are valid: {err}"))
    }
}

const PHASES: [(&str, &str); 3] = [("i_a", "v_a"), ("i_b", "v_b"), ("i_c", "v_c")];

fn keys() -> ModelKeys {
    ModelKeys {
        inputs: vec!["v_a".into(), "v_b".into(), "v_c".into(), "t_l".into()],
        states: vec![
            "i_a".into(),
            "i_b".into(),
            "i_c".into(),
            "v_rot".into(),
            "theta".into(),
        ],
        outputs: vec!["v_rot".into(), "theta".into()],
        events: Vec::new(),
    }
}

impl DcMotor {
    /// Creates a motor.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameter`] if the effective inductance,
    /// resistance, back-EMF constant, inertia or pole pair count is not
    /// strictly positive, or if the mutual inductance or friction is negative.
    pub fn new(params: DcMotorParams, noise: &NoiseConfig) -> Result<Self, ModelError> {
        let coefficients = params.coefficients()?;
        let keys = keys();
        let process_noise = ProcessNoise::from_config(noise, &keys.states)?;
        Ok(Self {
            params,
            coefficients,
            keys,
            process_noise,
        })
    }

    #[must_use]
    pub fn params(&self) -> &DcMotorParams {
        &self.params
    }
}

impl PrognosticsModel for DcMotor {
    fn keys(&self) -> &ModelKeys {
        &self.keys
    }

    fn process_noise(&self) -> &ProcessNoise {
        &self.process_noise
    }

    /// Starts at rest with no current.
    fn initialize(&self, _u: &Input, _z: &Output) -> Result<State, ModelError> {
        Ok(self.keys.states.iter().map(|key| (key.as_str(), 0.0)).collect())
    }

    fn next_state(&self, _t: f64, x: &State, u: &Input, dt: f64) -> Result<State, ModelError> {
        let c = &self.coefficients;
        let omega = x.get("v_rot")?;
        let theta = x.get("theta")?;
        let shapes = commutation::back_emf_shapes(theta * c.pole_pairs);

        let mut next = State::new();
        let mut torque = 0.0;
        for ((current, voltage), shape) in PHASES.into_iter().zip(shapes) {
            let i = x.get(current)?;
            let di = (u.get(voltage)? - c.r * i - c.k * omega * shape) / c.l_eff;
            next.insert(current, i + di * dt);
            torque += c.k * shape * i;
        }

        let d_omega = (torque - c.b * omega - u.get("t_l")?) / c.j;
        next.insert("v_rot", omega + d_omega * dt);
        next.insert("theta", theta + omega * dt);

        Ok(next)
    }

    fn output(&self, _t: f64, x: &State) -> Result<Output, ModelError> {
        x.project(&self.keys.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::constraint::ConstraintError;

    fn phases(v_a: f64, v_b: f64, v_c: f64, t_l: f64) -> Input {
        Input::from([("v_a", v_a), ("v_b", v_b), ("v_c", v_c), ("t_l", t_l)])
    }

    #[test]
    fn stays_at_rest_without_voltage() {
        let motor = DcMotor::default();
        let mut x = motor.initialize(&Input::new(), &Output::new()).unwrap();

        for _ in 0..100 {
            x = motor.next_state(0.0, &x, &phases(0.0, 0.0, 0.0, 0.0), 1e-5).unwrap();
        }

        assert!(x.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn first_step_builds_current() {
        let motor = DcMotor::default();
        let x0 = motor.initialize(&Input::new(), &Output::new()).unwrap();

        let x = motor.next_state(0.0, &x0, &phases(0.0, -8.0, 8.0, 0.0), 1e-5).unwrap();

        // di/dt = v / L at rest with no current.
        assert_relative_eq!(x.get("i_a").unwrap(), 0.0);
        assert_relative_eq!(x.get("i_b").unwrap(), -8.0 / 83e-6 * 1e-5, max_relative = 1e-12);
        assert_relative_eq!(x.get("i_c").unwrap(), 8.0 / 83e-6 * 1e-5, max_relative = 1e-12);
        assert_relative_eq!(x.get("v_rot").unwrap(), 0.0);
    }

    #[test]
    fn energized_phases_accelerate_rotor() {
        // At rest the b and c back-EMF shapes are -1 and +1, so driving b
        // negative and c positive produces positive torque.
        let motor = DcMotor::default();
        let mut x = motor.initialize(&Input::new(), &Output::new()).unwrap();

        for _ in 0..20 {
            x = motor.next_state(0.0, &x, &phases(0.0, -8.0, 8.0, 0.0), 1e-5).unwrap();
        }

        assert!(x.get("v_rot").unwrap() > 0.0);
        assert!(x.get("theta").unwrap() > 0.0);
    }

    #[test]
    fn load_torque_decelerates_rotor() {
        let motor = DcMotor::default();
        let x0 = State::from([
            ("i_a", 0.0),
            ("i_b", 0.0),
            ("i_c", 0.0),
            ("v_rot", 100.0),
            ("theta", 0.0),
        ]);

        let x = motor.next_state(0.0, &x0, &phases(0.0, 0.0, 0.0, 0.01), 1e-5).unwrap();

        assert_relative_eq!(x.get("v_rot").unwrap(), 100.0 - 0.01 / 2.6e-5 * 1e-5, epsilon = 1e-9);
        assert_relative_eq!(x.get("theta").unwrap(), 1e-3, epsilon = 1e-12);
    }

    #[test]
    fn rejects_mutual_inductance_at_self_inductance() {
        let params = DcMotorParams {
            m: Inductance::new::<henry>(83e-6),
            ..DcMotorParams::default()
        };

        assert_eq!(
            DcMotor::new(params, &NoiseConfig::default()),
            Err(ModelError::InvalidParameter {
                name: "l",
                source: ConstraintError::Zero
            })
        );
    }
}
