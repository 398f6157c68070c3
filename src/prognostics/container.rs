use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Named scalar values keyed by the model's input, state, output or event names.
///
/// Serializes as a plain map, e.g. `{"i": 2.0}`.
///
/// # Example
///
/// ```
/// use prog_models::prognostics::State;
///
/// let mut x = State::from([("qb", 7856.3), ("tb", 18.95)]);
/// x.insert("qcp", 0.0);
///
/// assert_eq!(x.get("tb").unwrap(), 18.95);
/// assert!(x.get("qcs").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Container(BTreeMap<String, f64>);

/// Model state, keyed by [`ModelKeys::states`](super::ModelKeys).
pub type State = Container;

/// Model inputs (loading), keyed by [`ModelKeys::inputs`](super::ModelKeys).
pub type Input = Container;

/// Model outputs, keyed by [`ModelKeys::outputs`](super::ModelKeys).
pub type Output = Container;

/// Event states, keyed by [`ModelKeys::events`](super::ModelKeys).
pub type EventStates = Container;

/// Whether each event threshold has been met.
pub type ThresholdsMet = BTreeMap<String, bool>;

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingKey`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<f64, ModelError> {
        self.try_get(key).ok_or_else(|| ModelError::missing_key(key))
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn try_get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a container holding exactly `keys`.
    ///
    /// Used by composite models to hand each component its own slice of a
    /// combined state.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingKey`] if any key is absent.
    pub fn project<K: AsRef<str>>(&self, keys: &[K]) -> Result<Self, ModelError> {
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                self.get(key).map(|value| (key.to_owned(), value))
            })
            .collect()
    }

    /// Merges `other` into this container; values from `other` win.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl<const N: usize> From<[(&str, f64); N]> for Container {
    fn from(entries: [(&str, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for Container {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }
}

impl FromIterator<(String, f64)> for Container {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Container {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_selects_component_keys() {
        let x = State::from([("v_a", 1.0), ("i_a", 2.0), ("t", 0.5)]);

        let esc = x.project(&["v_a", "t"]).unwrap();
        assert_eq!(esc, State::from([("v_a", 1.0), ("t", 0.5)]));

        assert_eq!(
            x.project(&["v_b"]),
            Err(ModelError::MissingKey { key: "v_b".into() })
        );
    }

    #[test]
    fn merge_prefers_incoming_values() {
        let a = State::from([("x", 1.0), ("y", 2.0)]);
        let b = State::from([("y", 3.0), ("z", 4.0)]);

        let merged = a.merge(b);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("y").unwrap(), 3.0);
    }

    #[test]
    fn serializes_as_plain_map() {
        let u = Input::from([("i", 2.0)]);
        let json = serde_json::to_string(&u).unwrap();
        assert_eq!(json, r#"{"i":2.0}"#);

        let back: Input = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }
}
