//! # Prognostics Models
//!
//! A framework for modeling the degradation of engineering systems and
//! simulating them forward in time to estimate when an event, such as end of
//! life, will occur. The time remaining until that event is the system's
//! remaining useful life (RUL).
//!
//! This is version 1.3 (2022) of the Prognostics Models package developed at
//! the NASA Prognostics Center of Excellence (PCoE).
//!
//! ## Crate layout
//!
//! - [`prognostics`]: The [`PrognosticsModel`] trait, keyed state containers,
//!   process noise, and models generated from closures.
//! - [`simulation`]: Simulation to a fixed time or until an event threshold is
//!   met, producing a [`SimResult`].
//! - [`models`]: Physics-based models (battery, powertrain).
//! - `datasets`: Loaders for NASA PCoE datasets (feature `datasets`).
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Example
//!
//! ```
//! use prog_models::models::battery::BatteryCircuit;
//! use prog_models::prognostics::{Input, PrognosticsModel};
//! use prog_models::simulation::SimulationConfig;
//!
//! let battery = BatteryCircuit::default();
//! let load = |_t: f64| Input::from([("i", 2.0)]);
//!
//! let x0 = battery.initialize(&load(0.0), &Default::default()).unwrap();
//! let z0 = battery.output(0.0, &x0).unwrap();
//!
//! let config = SimulationConfig {
//!     save_freq: 500.0,
//!     ..SimulationConfig::default()
//! };
//! let result = battery.simulate_to_threshold(load, &z0, &config).unwrap();
//! let eod = result.last_time().unwrap();
//! assert!(eod > 1000.0);
//! ```
//!
//! ## Notices
//!
//! Copyright © 2020 United States Government as represented by the
//! Administrator of the National Aeronautics and Space Administration.
//! All Rights Reserved. Distributed under the NASA Open Source Agreement.

#[cfg(feature = "datasets")]
pub mod datasets;
pub mod models;
pub mod prognostics;
pub mod simulation;
pub mod support;

pub use prognostics::PrognosticsModel;
pub use simulation::SimResult;
