use super::ModelError;

/// The names a model uses for its inputs, states, outputs and events.
///
/// Inputs, states and outputs must each have at least one key.
/// A model without events is valid; it simply never reaches a threshold.
///
/// # Example
///
/// ```
/// use prog_models::prognostics::ModelKeys;
///
/// let keys = ModelKeys::new(&["i"], &["tb", "qb"], &["t", "v"], &["EOD"]).unwrap();
/// assert_eq!(keys.events, ["EOD"]);
///
/// assert!(ModelKeys::new(&[], &["x"], &["z"], &[]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelKeys {
    pub inputs: Vec<String>,
    pub states: Vec<String>,
    pub outputs: Vec<String>,
    pub events: Vec<String>,
}

impl ModelKeys {
    /// Creates validated model keys.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyKeys`] if `inputs`, `states` or `outputs` is empty.
    pub fn new<S: AsRef<str>>(
        inputs: &[S],
        states: &[S],
        outputs: &[S],
        events: &[S],
    ) -> Result<Self, ModelError> {
        let owned = |keys: &[S]| keys.iter().map(|k| k.as_ref().to_owned()).collect::<Vec<_>>();

        let keys = Self {
            inputs: owned(inputs),
            states: owned(states),
            outputs: owned(outputs),
            events: owned(events),
        };

        for (kind, list) in [
            ("inputs", &keys.inputs),
            ("states", &keys.states),
            ("outputs", &keys.outputs),
        ] {
            if list.is_empty() {
                return Err(ModelError::EmptyKeys { kind });
            }
        }

        Ok(keys)
    }

    /// Returns true if `key` names one of this model's events.
    #[must_use]
    pub fn has_event(&self, key: &str) -> bool {
        self.events.iter().any(|event| event == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_which_list_is_empty() {
        let empty: [&str; 0] = [];

        assert_eq!(
            ModelKeys::new(&empty, &["x"], &["z"], &empty),
            Err(ModelError::EmptyKeys { kind: "inputs" })
        );
        assert_eq!(
            ModelKeys::new(&["u"], &empty, &["z"], &empty),
            Err(ModelError::EmptyKeys { kind: "states" })
        );
        assert_eq!(
            ModelKeys::new(&["u"], &["x"], &empty, &empty),
            Err(ModelError::EmptyKeys { kind: "outputs" })
        );
    }

    #[test]
    fn events_are_optional() {
        let empty: [&str; 0] = [];
        let keys = ModelKeys::new(&["u"], &["x"], &["z"], &empty).unwrap();
        assert!(keys.events.is_empty());
        assert!(!keys.has_event("EOL"));
    }
}
