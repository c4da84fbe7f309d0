//! Serializable model configuration.
//!
//! A config names one model kind via its `type` tag; regime configs nest two
//! further configs for their bull and bear sides. Omitted fields take the
//! model defaults.
//!
//! ```toml
//! type = "regime"
//! threshold = 55.0
//!
//! [bull]
//! type = "boost"
//! learners = 4
//!
//! [bear]
//! type = "linear"
//! lambda = 0.001
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{LinearModel, Model, OnlineBoost, RegimeSwitch};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid model config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelConfig {
    Linear(LinearConfig),
    Boost(BoostConfig),
    Regime(RegimeConfig),
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::Linear(LinearConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub lambda: f64,
    pub decay: f64,
    pub logistic: bool,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            learning_rate: LinearModel::DEFAULT_LEARNING_RATE,
            epochs: LinearModel::DEFAULT_EPOCHS,
            lambda: 0.0,
            decay: 0.0,
            logistic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub learners: usize,
    pub learning_rate: f64,
    pub shrinkage: f64,
    /// One learning rate per stage. Overrides `learners` and `learning_rate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rates: Option<Vec<f64>>,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            learners: OnlineBoost::DEFAULT_LEARNERS,
            learning_rate: LinearModel::DEFAULT_LEARNING_RATE,
            shrinkage: OnlineBoost::DEFAULT_SHRINKAGE,
            learning_rates: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub threshold: f64,
    pub bull: Box<ModelConfig>,
    pub bear: Box<ModelConfig>,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            threshold: RegimeSwitch::DEFAULT_THRESHOLD,
            bull: Box::default(),
            bear: Box::default(),
        }
    }
}

impl ModelConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Short identifier of the configured model kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(c) if c.logistic => "logistic",
            Self::Linear(_) => "linear",
            Self::Boost(_) => "boost",
            Self::Regime(_) => "regime",
        }
    }

    /// Reject values no learner can train with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Linear(c) => {
                check_rate(c.learning_rate)?;
                check_finite("lambda", c.lambda)?;
                check_finite("decay", c.decay)
            }
            Self::Boost(c) => {
                check_finite("shrinkage", c.shrinkage)?;
                match &c.learning_rates {
                    Some(rates) => rates.iter().try_for_each(|&r| check_rate(r)),
                    None => check_rate(c.learning_rate),
                }
            }
            Self::Regime(c) => {
                check_finite("threshold", c.threshold)?;
                c.bull.validate()?;
                c.bear.validate()
            }
        }
    }

    /// Construct an untrained model.
    pub fn build(&self) -> Box<dyn Model> {
        match self {
            Self::Linear(c) => Box::new(c.build()),
            Self::Boost(c) => {
                let learners = match &c.learning_rates {
                    Some(rates) => rates.iter().map(|&lr| LinearModel::new(lr)).collect(),
                    None => (0..c.learners)
                        .map(|_| LinearModel::new(c.learning_rate))
                        .collect(),
                };
                Box::new(OnlineBoost::from_learners(learners, c.shrinkage))
            }
            Self::Regime(c) => Box::new(RegimeSwitch::new(
                c.bull.build(),
                c.bear.build(),
                c.threshold,
            )),
        }
    }
}

impl LinearConfig {
    pub fn build(&self) -> LinearModel {
        LinearModel::new(self.learning_rate)
            .with_epochs(self.epochs)
            .with_lambda(self.lambda)
            .with_decay(self.decay)
            .with_logistic(self.logistic)
    }
}

fn check_rate(rate: f64) -> Result<(), ConfigError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "learning rate must be positive and finite, got {rate}"
        )))
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")))
    }
}
