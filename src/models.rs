//! Physics-based prognostics models.
//!
//! Models are organized by the system they describe. Each implements
//! [`PrognosticsModel`](crate::PrognosticsModel) over SI values, with
//! parameters expressed as [`uom`] quantities and validated on construction.

pub mod battery;
pub mod powertrain;

use crate::{prognostics::ModelError, support::constraint::Constraint};

/// Checks a named parameter against a constraint, returning it unchanged.
fn check<C: Constraint<T>, T>(name: &'static str, value: T) -> Result<T, ModelError> {
    C::check(&value).map_err(|source| ModelError::InvalidParameter { name, source })?;
    Ok(value)
}
