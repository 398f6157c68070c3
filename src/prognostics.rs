//! The prognostics model framework.
//!
//! A prognostics model is a time-variant state space model of a system's
//! degradation. It is defined by four equations over keyed containers:
//!
//! - `initialize(u, z) -> x`: initial state from inputs and outputs
//! - `next_state(t, x, u, dt) -> x`: state transition
//! - `output(t, x) -> z`: measurable outputs
//! - `event_state(t, x)`: progress toward each event, from 1 (healthy) to 0
//!   (event occurred), and `threshold_met(t, x)` for each event
//!
//! Models implement [`PrognosticsModel`]. Models can also be assembled at
//! runtime from closures with [`GeneratedModel`].

mod container;
mod error;
mod generated;
mod keys;
mod model;
mod noise;

pub use container::{Container, EventStates, Input, Output, State, ThresholdsMet};
pub use error::ModelError;
pub use generated::{GeneratedModel, GeneratedModelBuilder};
pub use keys::ModelKeys;
pub use model::PrognosticsModel;
pub use noise::{NoiseConfig, ProcessNoise};
