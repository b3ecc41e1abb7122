//! Demo configuration

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use domain_assessment::{AssessmentError, RoutingThresholds, Scenario};

/// Errors raised while loading the demo configuration
#[derive(Debug, Error)]
pub enum DemoConfigError {
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Domain(#[from] AssessmentError),
}

/// Demo configuration
///
/// Every field has a default, so any subset of `CLAIMS_*` variables may be set.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct DemoConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub log_level: String,
    /// Simulated analysis time in milliseconds
    #[validate(range(max = 60_000))]
    pub analysis_delay_ms: u64,
    /// Claims must total strictly less than this to avoid escalation
    #[validate(custom(function = "validate_cost_threshold"))]
    pub cost_threshold: Decimal,
    /// Minimum detection confidence for the high-confidence branches
    #[validate(custom(function = "validate_confidence_threshold"))]
    pub confidence_threshold: Decimal,
    /// Single scenario to run; all three when unset
    pub scenario: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            analysis_delay_ms: 800,
            cost_threshold: RoutingThresholds::STANDARD.cost_threshold,
            confidence_threshold: RoutingThresholds::STANDARD.confidence_threshold,
            scenario: None,
        }
    }
}

impl DemoConfig {
    /// Loads configuration from `CLAIMS_*` environment variables
    pub fn from_env() -> Result<Self, DemoConfigError> {
        Self::from_environment(config::Environment::with_prefix("CLAIMS"))
    }

    /// Loads and validates configuration from an environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, DemoConfigError> {
        let config: DemoConfig = config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Routing thresholds for the session
    pub fn thresholds(&self) -> Result<RoutingThresholds, AssessmentError> {
        RoutingThresholds::new(self.cost_threshold, self.confidence_threshold)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    /// Scenarios to walk through, in order
    pub fn scenarios(&self) -> Result<Vec<Scenario>, AssessmentError> {
        match self.scenario.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(Scenario::ALL.to_vec()),
            Some(name) => Ok(vec![name.parse()?]),
        }
    }
}

fn validate_cost_threshold(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_cost_threshold"));
    }
    Ok(())
}

fn validate_confidence_threshold(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > dec!(1) {
        return Err(ValidationError::new("confidence_threshold_out_of_range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        config::Environment::with_prefix("CLAIMS").source(Some(map))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds().unwrap(), RoutingThresholds::STANDARD);
        assert_eq!(config.analysis_delay(), Duration::from_millis(800));
        assert_eq!(config.scenarios().unwrap().len(), 3);
    }

    #[test]
    fn test_environment_overrides() {
        let config = DemoConfig::from_environment(environment(&[
            ("CLAIMS_COST_THRESHOLD", "1500"),
            ("CLAIMS_ANALYSIS_DELAY_MS", "0"),
            ("CLAIMS_SCENARIO", "agent_reassessment"),
        ]))
        .unwrap();

        assert_eq!(config.cost_threshold, dec!(1500));
        assert_eq!(config.confidence_threshold, dec!(0.90));
        assert_eq!(config.analysis_delay_ms, 0);
        assert_eq!(config.scenarios().unwrap(), vec![Scenario::AgentReassessment]);
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let config = DemoConfig {
            confidence_threshold: dec!(1.5),
            ..DemoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let config = DemoConfig {
            scenario: Some("total_loss".to_string()),
            ..DemoConfig::default()
        };
        assert!(config.scenarios().is_err());
    }
}
