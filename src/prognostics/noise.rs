use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::support::constraint::{Constrained, ConstraintError, NonNegative};

use super::{ModelError, State};

/// Process noise as configured by a user.
///
/// Deserializes from either a number (applied to every state) or a map of
/// per-state standard deviations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NoiseConfig {
    /// The same standard deviation for every state.
    Uniform(f64),

    /// A standard deviation for each state key.
    PerState(BTreeMap<String, f64>),
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl From<f64> for NoiseConfig {
    fn from(std_dev: f64) -> Self {
        Self::Uniform(std_dev)
    }
}

/// Zero-mean Gaussian process noise, one standard deviation per state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessNoise {
    std_dev: BTreeMap<String, Constrained<f64, NonNegative>>,
}

impl ProcessNoise {
    /// Resolves a [`NoiseConfig`] against a model's state keys.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingKey`] if a per-state config omits a state,
    /// or [`ModelError::InvalidNoise`] for a negative or NaN standard deviation.
    pub fn from_config<S: AsRef<str>>(
        config: &NoiseConfig,
        states: &[S],
    ) -> Result<Self, ModelError> {
        let std_dev = states
            .iter()
            .map(|key| {
                let key = key.as_ref();
                let value = match config {
                    NoiseConfig::Uniform(value) => *value,
                    NoiseConfig::PerState(values) => *values
                        .get(key)
                        .ok_or_else(|| ModelError::missing_key(key))?,
                };
                let value = NonNegative::new(value).map_err(|source| ModelError::InvalidNoise {
                    key: key.to_owned(),
                    source,
                })?;
                Ok((key.to_owned(), value))
            })
            .collect::<Result<_, ModelError>>()?;

        Ok(Self { std_dev })
    }

    /// Noise that leaves every state unchanged.
    #[must_use]
    pub fn zero<S: AsRef<str>>(states: &[S]) -> Self {
        Self {
            std_dev: states
                .iter()
                .map(|key| (key.as_ref().to_owned(), NonNegative::zero()))
                .collect(),
        }
    }

    /// Returns the standard deviation for a state, if configured.
    #[must_use]
    pub fn std_dev(&self, key: &str) -> Option<f64> {
        self.std_dev.get(key).map(|value| *value.as_ref())
    }

    /// Returns true if no state receives noise.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.std_dev.values().all(|value| *value.as_ref() == 0.0)
    }

    /// Adds a zero-mean normal sample to each state.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingKey`] if `x` lacks a configured state.
    pub fn apply<R: Rng + ?Sized>(&self, x: &State, rng: &mut R) -> Result<State, ModelError> {
        let mut noisy = x.clone();
        for (key, sigma) in &self.std_dev {
            let sigma = *sigma.as_ref();
            let value = x.get(key)?;
            if sigma == 0.0 {
                continue;
            }
            let normal = Normal::new(0.0, sigma).map_err(|_| ModelError::InvalidNoise {
                key: key.clone(),
                source: ConstraintError::NotANumber,
            })?;
            noisy.insert(key.clone(), value + normal.sample(rng));
        }
        Ok(noisy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::StdRng};

    const STATES: [&str; 2] = ["qb", "tb"];

    #[test]
    fn uniform_expands_to_every_state() {
        let noise = ProcessNoise::from_config(&NoiseConfig::Uniform(0.2), &STATES).unwrap();
        assert_eq!(noise.std_dev("qb"), Some(0.2));
        assert_eq!(noise.std_dev("tb"), Some(0.2));
    }

    #[test]
    fn per_state_must_cover_all_states() {
        let config = NoiseConfig::PerState(BTreeMap::from([("qb".to_owned(), 0.1)]));
        assert_eq!(
            ProcessNoise::from_config(&config, &STATES),
            Err(ModelError::MissingKey { key: "tb".into() })
        );
    }

    #[test]
    fn rejects_negative_std_dev() {
        assert!(matches!(
            ProcessNoise::from_config(&NoiseConfig::Uniform(-1.0), &STATES),
            Err(ModelError::InvalidNoise { .. })
        ));
    }

    #[test]
    fn deserializes_number_or_map() {
        let uniform: NoiseConfig = serde_json::from_str("0.5").unwrap();
        assert_eq!(uniform, NoiseConfig::Uniform(0.5));

        let per_state: NoiseConfig = serde_json::from_str(r#"{"qb": 1.0, "tb": 0.0}"#).unwrap();
        assert!(matches!(per_state, NoiseConfig::PerState(ref map) if map.len() == 2));
    }

    #[test]
    fn zero_noise_is_identity() {
        let x = State::from([("qb", 10.0), ("tb", 20.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        let noise = ProcessNoise::zero(&STATES);
        assert!(noise.is_zero());
        assert_eq!(noise.apply(&x, &mut rng).unwrap(), x);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let x = State::from([("qb", 10.0), ("tb", 20.0)]);
        let noise = ProcessNoise::from_config(&NoiseConfig::Uniform(1.0), &STATES).unwrap();

        let a = noise.apply(&x, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = noise.apply(&x, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, x);
    }
}
