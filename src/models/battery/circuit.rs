use crate::prognostics::{
    EventStates, Input, ModelError, ModelKeys, NoiseConfig, Output, PrognosticsModel,
    ProcessNoise, State, ThresholdsMet,
};

use super::params::{BatteryCircuitParams, Coefficients};

const EOD: &str = "EOD";

/// Equivalent-circuit lithium-ion battery model.
///
/// The cell is a nonlinear bulk capacitance in series with a surface
/// overpotential branch (`Rs ∥ Cs`) and a charge-transfer branch
/// (`Rcp ∥ Ccp`), with a parallel self-discharge resistance and a lumped
/// thermal mass.
///
/// - Inputs: `i` (discharge current, A)
/// - States: `tb` (cell temperature, °C), `qb` (bulk charge, C),
///   `qcp` (charge-transfer branch charge, C), `qcs` (surface branch charge, C)
/// - Outputs: `t` (temperature, °C), `v` (terminal voltage, V)
/// - Events: `EOD`, end of discharge
///
/// The `EOD` event state is the lesser of the state of charge and the
/// normalized voltage margin above the cutoff. The threshold is met once the
/// terminal voltage falls below the cutoff voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryCircuit {
    params: BatteryCircuitParams,
    coefficients: Coefficients,
    keys: ModelKeys,
    process_noise: ProcessNoise,
}

/// Default process noise standard deviation, applied to every state.
const DEFAULT_NOISE: f64 = 1e-3;

impl Default for BatteryCircuit {
    /// An 18650 cell with the default parameters and process noise.
    fn default() -> Self {
        Self::new(
            BatteryCircuitParams::default(),
            &NoiseConfig::Uniform(DEFAULT_NOISE),
        )
        .unwrap_or_else(|err| panic!("default battery parameters are valid: {err}"))
    }
}

fn keys() -> ModelKeys {
    ModelKeys {
        inputs: vec!["i".into()],
        states: vec!["tb".into(), "qb".into(), "qcp".into(), "qcs".into()],
        outputs: vec!["t".into(), "v".into()],
        events: vec![EOD.into()],
    }
}

/// Electrical quantities derived from a state.
struct Circuit {
    soc: f64,
    vb: f64,
    vcp: f64,
    vcs: f64,
    rcp: f64,
}

impl BatteryCircuit {
    /// Creates a battery model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameter`] if a resistance, capacitance,
    /// charge or thermal parameter is out of range, or a noise error if the
    /// process noise does not fit the states.
    pub fn new(params: BatteryCircuitParams, noise: &NoiseConfig) -> Result<Self, ModelError> {
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
    pub fn params(&self) -> &BatteryCircuitParams {
        &self.params
    }

    fn circuit(&self, x: &State) -> Result<Circuit, ModelError> {
        let c = &self.coefficients;
        let qb = x.get("qb")?;

        let soc = (c.c_max - c.q_max + qb) / c.c_max;
        let [cb0, cb1, cb2, cb3] = c.cb;
        let cb = cb0 * soc.powi(3) + cb1 * soc.powi(2) + cb2 * soc + cb3;
        let rcp = c.rcp0 + c.rcp1 * (c.rcp2 * (1.0 - soc)).exp();

        Ok(Circuit {
            soc,
            vb: qb / cb,
            vcp: x.get("qcp")? / c.ccp,
            vcs: x.get("qcs")? / c.cs,
            rcp,
        })
    }

    fn voltage(&self, x: &State) -> Result<(Circuit, f64), ModelError> {
        let circuit = self.circuit(x)?;
        let v = circuit.vb - circuit.vcp - circuit.vcs;
        Ok((circuit, v))
    }
}

impl PrognosticsModel for BatteryCircuit {
    fn keys(&self) -> &ModelKeys {
        &self.keys
    }

    fn process_noise(&self) -> &ProcessNoise {
        &self.process_noise
    }

    /// Starts fully charged at ambient temperature with relaxed overpotentials.
    fn initialize(&self, _u: &Input, _z: &Output) -> Result<State, ModelError> {
        Ok(State::from([
            ("tb", self.coefficients.ambient),
            ("qb", self.coefficients.q_max),
            ("qcp", 0.0),
            ("qcs", 0.0),
        ]))
    }

    fn next_state(&self, _t: f64, x: &State, u: &Input, dt: f64) -> Result<State, ModelError> {
        let c = &self.coefficients;
        let Circuit {
            vb, vcp, vcs, rcp, ..
        } = self.circuit(x)?;
        let tb = x.get("tb")?;

        let tb_dot = (rcp * c.rs * c.ha * (c.ambient - tb)
            + rcp * vcs.powi(2) * c.hcs
            + c.rs * vcp.powi(2) * c.hcp)
            / (c.jt * rcp * c.rs);

        let vp = vb - vcp - vcs;
        let ip = vp / c.rp;
        let ib = u.get("i")? + ip;
        let icp = ib - vcp / rcp;
        let ics = ib - vcs / c.rs;

        Ok(State::from([
            ("tb", tb + tb_dot * dt),
            ("qb", x.get("qb")? - ib * dt),
            ("qcp", x.get("qcp")? + icp * dt),
            ("qcs", x.get("qcs")? + ics * dt),
        ]))
    }

    fn output(&self, _t: f64, x: &State) -> Result<Output, ModelError> {
        let (_, v) = self.voltage(x)?;
        Ok(Output::from([("t", x.get("tb")?), ("v", v)]))
    }

    fn event_state(&self, _t: f64, x: &State) -> Result<EventStates, ModelError> {
        let (circuit, v) = self.voltage(x)?;
        let c = &self.coefficients;
        let voltage_margin = (v - c.v_eod) / c.v_dropoff;
        Ok(EventStates::from([(EOD, circuit.soc.min(voltage_margin))]))
    }

    fn threshold_met(&self, _t: f64, x: &State) -> Result<ThresholdsMet, ModelError> {
        let (_, v) = self.voltage(x)?;
        Ok(ThresholdsMet::from([(EOD.to_owned(), v < self.coefficients.v_eod)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{electrical_resistance::ohm, f64::ElectricalResistance};

    use crate::{
        simulation::{RefineConfig, SimulationConfig},
        support::constraint::ConstraintError,
    };

    fn constant_current(amps: f64) -> impl Fn(f64) -> Input {
        move |_t| Input::from([("i", amps)])
    }

    fn first_output(battery: &BatteryCircuit) -> Output {
        let x0 = battery.initialize(&Input::new(), &Output::new()).unwrap();
        battery.output(0.0, &x0).unwrap()
    }

    #[test]
    fn fully_charged_cell() {
        let battery = BatteryCircuit::default();
        let x0 = battery.initialize(&Input::new(), &Output::new()).unwrap();

        let z0 = battery.output(0.0, &x0).unwrap();
        assert_relative_eq!(z0.get("v").unwrap(), 4.183, max_relative = 1e-6);
        assert_relative_eq!(z0.get("t").unwrap(), 18.95, epsilon = 1e-9);

        let es = battery.event_state(0.0, &x0).unwrap();
        assert_relative_eq!(es.get(EOD).unwrap(), 1.0, epsilon = 1e-12);
        assert!(!battery.threshold_met(0.0, &x0).unwrap()[EOD]);
    }

    #[test]
    fn discharge_lowers_charge_and_voltage() {
        let battery = BatteryCircuit::default();
        let x0 = battery.initialize(&Input::new(), &Output::new()).unwrap();
        let u = Input::from([("i", 2.0)]);

        let mut x = x0.clone();
        for step in 1..=100 {
            x = battery.next_state(f64::from(step), &x, &u, 1.0).unwrap();
        }

        assert!(x.get("qb").unwrap() < x0.get("qb").unwrap() - 199.0);
        assert!(x.get("qcs").unwrap() > 0.0);
        let v0 = battery.output(0.0, &x0).unwrap().get("v").unwrap();
        let v = battery.output(100.0, &x).unwrap().get("v").unwrap();
        assert!(v < v0);
    }

    #[test]
    fn simulates_to_end_of_discharge() {
        let battery = BatteryCircuit::default();
        let config = SimulationConfig {
            save_freq: 100.0,
            ..SimulationConfig::default()
        };

        let result = battery
            .simulate_to_threshold(constant_current(2.0), &first_output(&battery), &config)
            .unwrap();

        let eod = result.last_time().unwrap();
        assert!((2000.0..5000.0).contains(&eod), "EOD at {eod} s");

        let last = result.last().unwrap();
        assert!(last.output.get("v").unwrap() < 3.0);
        assert!(last.event_state.get(EOD).unwrap() < 0.0);

        let previous = &result.outputs[result.len() - 2];
        assert!(previous.get("v").unwrap() >= 3.0);
    }

    #[test]
    fn refined_end_of_discharge_is_within_last_step() {
        let battery = BatteryCircuit::default();
        let coarse = SimulationConfig {
            save_freq: 1000.0,
            ..SimulationConfig::default()
        };
        let refined = SimulationConfig {
            refine_event_time: Some(RefineConfig::default()),
            ..coarse.clone()
        };

        let z0 = first_output(&battery);
        let coarse = battery
            .simulate_to_threshold(constant_current(2.0), &z0, &coarse)
            .unwrap();
        let refined = battery
            .simulate_to_threshold(constant_current(2.0), &z0, &refined)
            .unwrap();

        let t_coarse = coarse.last_time().unwrap();
        let t_refined = refined.last_time().unwrap();
        assert!(t_refined <= t_coarse);
        assert!(t_refined > t_coarse - 1.0);

        let es = refined.last().unwrap().event_state.get(EOD).unwrap();
        assert!(es.abs() < 1e-6);
    }

    #[test]
    fn rejects_non_physical_parameters() {
        let params = BatteryCircuitParams {
            rs: ElectricalResistance::new::<ohm>(0.0),
            ..BatteryCircuitParams::default()
        };

        assert_eq!(
            BatteryCircuit::new(params, &NoiseConfig::default()),
            Err(ModelError::InvalidParameter {
                name: "rs",
                source: ConstraintError::Zero
            })
        );
    }

    #[test]
    fn default_noise_is_uniform() {
        let battery = BatteryCircuit::default();
        for key in ["tb", "qb", "qcp", "qcs"] {
            assert_eq!(battery.process_noise().std_dev(key), Some(DEFAULT_NOISE));
        }
    }

    #[test]
    fn missing_current_is_reported() {
        let battery = BatteryCircuit::default();
        let x0 = battery.initialize(&Input::new(), &Output::new()).unwrap();

        assert_eq!(
            battery.next_state(1.0, &x0, &Input::new(), 1.0),
            Err(ModelError::MissingKey { key: "i".into() })
        );
    }
}
