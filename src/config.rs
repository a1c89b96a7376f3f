use std::{num::NonZeroUsize, path::Path, time::Duration};

use log::info;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlaygroundErr, Result},
    training::{Speed, LEARNING_RATE_MAX, LEARNING_RATE_MIN},
};

/// Everything tunable about a playground session. Every field has a default, so
/// `{}` is a valid configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaygroundConfig {
    pub hidden_units: usize,
    pub learning_rate: f64,
    pub speed: u8,
    /// Seeds every random initialization. `None` draws the seed from the OS.
    pub seed: Option<u64>,
    /// The shortest pause between two automatic steps.
    pub min_interval_ms: u64,
    /// Headless runs give up after this many epochs.
    pub max_epochs: u64,
    /// Progress is logged every this many epochs.
    pub log_every: u64,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            hidden_units: 4,
            learning_rate: 0.5,
            speed: 50,
            seed: None,
            min_interval_ms: 33,
            max_epochs: 10_000,
            log_every: 500,
        }
    }
}

impl PlaygroundConfig {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file can't be read, isn't valid JSON or holds
    /// out of range values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;

        info!("config loaded from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field is within its range.
    pub fn validate(&self) -> Result<()> {
        if self.hidden_units == 0 {
            return Err(invalid("hidden_units must be at least 1"));
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0. {
            return Err(invalid("learning_rate must be a positive number"));
        }

        if !(LEARNING_RATE_MIN..=LEARNING_RATE_MAX).contains(&self.learning_rate) {
            return Err(invalid(format!(
                "learning_rate must be within [{LEARNING_RATE_MIN}, {LEARNING_RATE_MAX}]"
            )));
        }

        if !(Speed::MIN.get()..=Speed::MAX.get()).contains(&self.speed) {
            return Err(invalid("speed must be within [1, 100]"));
        }

        if self.log_every == 0 {
            return Err(invalid("log_every must be at least 1"));
        }

        Ok(())
    }

    pub fn hidden_units(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.hidden_units).ok_or_else(|| invalid("hidden_units must be at least 1"))
    }

    pub fn speed(&self) -> Speed {
        Speed::new(self.speed)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// A random number generator honouring `seed`.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> PlaygroundErr {
    PlaygroundErr::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = PlaygroundConfig::from_json("{}").unwrap();
        assert_eq!(config, PlaygroundConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = PlaygroundConfig::from_json(r#"{ "hidden_units": 8, "seed": 3 }"#).unwrap();

        assert_eq!(config.hidden_units().unwrap().get(), 8);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.learning_rate, 0.5);
    }

    #[test]
    fn rejects_out_of_range() {
        for json in [
            r#"{ "hidden_units": 0 }"#,
            r#"{ "learning_rate": 0 }"#,
            r#"{ "learning_rate": 5.0 }"#,
            r#"{ "speed": 0 }"#,
            r#"{ "speed": 101 }"#,
            r#"{ "log_every": 0 }"#,
        ] {
            let err = PlaygroundConfig::from_json(json);
            assert!(matches!(err, Err(PlaygroundErr::InvalidConfig(_))), "{json}");
        }
    }

    #[test]
    fn rejects_unknown_fields_and_bad_json() {
        assert!(matches!(
            PlaygroundConfig::from_json(r#"{ "hiden_units": 4 }"#),
            Err(PlaygroundErr::Json(_))
        ));
        assert!(matches!(
            PlaygroundConfig::from_json("{"),
            Err(PlaygroundErr::Json(_))
        ));
    }

    #[test]
    fn missing_file() {
        let err = PlaygroundConfig::load("/definitely/not/here.json");
        assert!(matches!(err, Err(PlaygroundErr::Io(_))));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = PlaygroundConfig {
            seed: Some(42),
            ..Default::default()
        };

        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }
}
