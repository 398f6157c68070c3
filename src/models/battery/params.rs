use uom::si::{
    capacitance::farad,
    electric_charge::coulomb,
    electric_potential::volt,
    electrical_resistance::ohm,
    f64::{
        Capacitance, ElectricCharge, ElectricPotential, ElectricalResistance, HeatCapacity,
        ThermalConductance, ThermodynamicTemperature,
    },
    heat_capacity::joule_per_kelvin,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
};

use crate::{
    models::check,
    prognostics::ModelError,
    support::constraint::{NonNegative, StrictlyPositive},
};

/// Parameters of the equivalent-circuit battery model.
///
/// Defaults describe an 18650 lithium-ion cell.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryCircuitParams {
    /// Maximum charge of the cell.
    pub q_max: ElectricCharge,

    /// Usable charge capacity; `q_max - c_max` is never drawn.
    pub c_max: ElectricCharge,

    /// Voltage at which discharge ends.
    pub v_eod: ElectricPotential,

    /// Voltage margin over which the voltage-based event state falls from 1 to 0.
    pub v_dropoff: ElectricPotential,

    /// Cubic coefficients of the bulk capacitance in state of charge,
    /// highest order first.
    pub cb: [Capacitance; 4],

    /// Self-discharge (parasitic) resistance.
    pub rp: ElectricalResistance,

    /// Surface overpotential resistance and capacitance.
    pub rs: ElectricalResistance,
    pub cs: Capacitance,

    /// Charge-transfer resistance, `rcp0 + rcp1 * exp(rcp2 * (1 - SOC))`.
    pub rcp0: ElectricalResistance,
    pub rcp1: ElectricalResistance,
    pub rcp2: f64,

    /// Charge-transfer capacitance.
    pub ccp: Capacitance,

    /// Ambient temperature, also the initial cell temperature.
    pub ambient: ThermodynamicTemperature,

    /// Lumped thermal mass of the cell.
    pub heat_capacity: HeatCapacity,

    /// Heat transfer to ambient and from the two overpotential branches.
    pub ha: ThermalConductance,
    pub hcp: ThermalConductance,
    pub hcs: ThermalConductance,
}

impl Default for BatteryCircuitParams {
    fn default() -> Self {
        Self {
            q_max: ElectricCharge::new::<coulomb>(7856.3254),
            c_max: ElectricCharge::new::<coulomb>(7777.0),
            v_eod: ElectricPotential::new::<volt>(3.0),
            v_dropoff: ElectricPotential::new::<volt>(0.1),
            cb: [
                Capacitance::new::<farad>(-230.0),
                Capacitance::new::<farad>(1.2),
                Capacitance::new::<farad>(2079.9),
                Capacitance::new::<farad>(27.055726),
            ],
            rp: ElectricalResistance::new::<ohm>(1e4),
            rs: ElectricalResistance::new::<ohm>(0.0538926),
            cs: Capacitance::new::<farad>(234.387),
            rcp0: ElectricalResistance::new::<ohm>(0.0697776),
            rcp1: ElectricalResistance::new::<ohm>(1.50528e-17),
            rcp2: 37.223,
            ccp: Capacitance::new::<farad>(14.8223),
            ambient: ThermodynamicTemperature::new::<degree_celsius>(18.95),
            heat_capacity: HeatCapacity::new::<joule_per_kelvin>(800.0),
            ha: ThermalConductance::new::<watt_per_kelvin>(0.5),
            hcp: ThermalConductance::new::<watt_per_kelvin>(19.0),
            hcs: ThermalConductance::new::<watt_per_kelvin>(1.0),
        }
    }
}

/// Validated parameters in SI units (temperatures in °C).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Coefficients {
    pub(super) q_max: f64,
    pub(super) c_max: f64,
    pub(super) v_eod: f64,
    pub(super) v_dropoff: f64,
    pub(super) cb: [f64; 4],
    pub(super) rp: f64,
    pub(super) rs: f64,
    pub(super) cs: f64,
    pub(super) rcp0: f64,
    pub(super) rcp1: f64,
    pub(super) rcp2: f64,
    pub(super) ccp: f64,
    pub(super) ambient: f64,
    pub(super) jt: f64,
    pub(super) ha: f64,
    pub(super) hcp: f64,
    pub(super) hcs: f64,
}

impl BatteryCircuitParams {
    pub(super) fn coefficients(&self) -> Result<Coefficients, ModelError> {
        Ok(Coefficients {
            q_max: check::<StrictlyPositive, _>("q_max", self.q_max)?.get::<coulomb>(),
            c_max: check::<StrictlyPositive, _>("c_max", self.c_max)?.get::<coulomb>(),
            v_eod: self.v_eod.get::<volt>(),
            v_dropoff: check::<StrictlyPositive, _>("v_dropoff", self.v_dropoff)?.get::<volt>(),
            cb: self.cb.map(|c| c.get::<farad>()),
            rp: check::<StrictlyPositive, _>("rp", self.rp)?.get::<ohm>(),
            rs: check::<StrictlyPositive, _>("rs", self.rs)?.get::<ohm>(),
            cs: check::<StrictlyPositive, _>("cs", self.cs)?.get::<farad>(),
            rcp0: check::<StrictlyPositive, _>("rcp0", self.rcp0)?.get::<ohm>(),
            rcp1: check::<NonNegative, _>("rcp1", self.rcp1)?.get::<ohm>(),
            rcp2: self.rcp2,
            ccp: check::<StrictlyPositive, _>("ccp", self.ccp)?.get::<farad>(),
            ambient: self.ambient.get::<degree_celsius>(),
            jt: check::<StrictlyPositive, _>("heat_capacity", self.heat_capacity)?
                .get::<joule_per_kelvin>(),
            ha: check::<NonNegative, _>("ha", self.ha)?.get::<watt_per_kelvin>(),
            hcp: check::<NonNegative, _>("hcp", self.hcp)?.get::<watt_per_kelvin>(),
            hcs: check::<NonNegative, _>("hcs", self.hcs)?.get::<watt_per_kelvin>(),
        })
    }
}
