//! Battery models.
//!
//! The [`BatteryCircuit`] model predicts end of discharge (EOD) of a
//! lithium-ion cell from an equivalent circuit.

mod circuit;
mod params;

pub use circuit::BatteryCircuit;
pub use params::BatteryCircuitParams;
