use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::{NelderMead, NelderMeadSettings, Trilaterator, TrilateratorConfig};
use crate::core::DEFAULT_MAX_MEASUREMENTS;
use crate::distance::DistanceMethod;
use crate::validation::ConfigError;

/// Serializable trilateration parameters
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrilaterationSettings {
    /// Distance model for the objective
    pub distance_method: DistanceMethod,
    /// Largest number of measurements accepted per call
    pub max_measurements: usize,
    /// Nelder-Mead coefficients and stopping rule
    pub optimizer: NelderMeadSettings,
}

impl Default for TrilaterationSettings {
    fn default() -> Self {
        Self {
            distance_method: DistanceMethod::Haversine,
            max_measurements: DEFAULT_MAX_MEASUREMENTS,
            optimizer: NelderMeadSettings::default(),
        }
    }
}

impl TrilaterationSettings {
    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_measurements < 1 {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_measurements".to_string(),
                value: self.max_measurements.to_string(),
                reason: "at least one measurement must be accepted".to_string(),
            });
        }
        self.optimizer.validate()?;
        Ok(())
    }

    /// Trilaterator configuration for these settings (optimizer settings excluded)
    pub fn trilaterator_config(&self) -> TrilateratorConfig {
        TrilateratorConfig::default()
            .with_distance_function(self.distance_method)
            .with_max_measurements(self.max_measurements)
    }

    /// Validate and build a trilaterator
    pub fn build(&self) -> Result<Trilaterator, ConfigError> {
        self.validate()?;
        debug!(
            "building trilaterator: {:?}, up to {} measurements",
            self.distance_method, self.max_measurements
        );
        let minimizer = NelderMead::with_settings(self.optimizer.clone())?;
        Ok(Trilaterator::with_minimizer(
            self.trilaterator_config(),
            minimizer,
        ))
    }
}
