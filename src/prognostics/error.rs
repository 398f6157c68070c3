use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors raised while constructing or evaluating a prognostics model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A model was declared without any keys of a required kind.
    #[error("`{kind}` must have at least one key")]
    EmptyKeys {
        /// Which key list was empty (`inputs`, `states` or `outputs`).
        kind: &'static str,
    },

    /// A container lookup failed.
    #[error("missing key `{key}`")]
    MissingKey { key: String },

    /// A model parameter violates its physical constraint.
    #[error("invalid parameter `{name}`")]
    InvalidParameter {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// Composed components disagree on a shared parameter.
    #[error("components disagree on parameter `{name}`")]
    ParameterMismatch { name: &'static str },

    /// An input value is outside the range the model accepts.
    #[error("invalid input `{key}`")]
    InvalidInput {
        key: String,
        #[source]
        source: ConstraintError,
    },

    /// A process noise standard deviation is negative or not a number.
    #[error("invalid process noise for `{key}`")]
    InvalidNoise {
        key: String,
        #[source]
        source: ConstraintError,
    },

    /// A generated model is missing a required equation.
    #[error("missing `{name}` equation")]
    MissingEquation { name: &'static str },
}

impl ModelError {
    pub(crate) fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }
}
