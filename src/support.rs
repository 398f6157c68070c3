//! Supporting utilities used by models and the simulation engine.
//!
//! These APIs are public because they are useful when writing new models,
//! but they are not stable.

pub mod constraint;
