//! Loads a [`shiftsolve_solver::SolverConfig`] from TOML or YAML, validating
//! it against the recognized constraint id and parameter set before a solve
//! is attempted (§7: configuration errors are fatal before `solve()` runs,
//! not during constraint application).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use shiftsolve_constraints::CONSTRAINT_IDS;
use shiftsolve_core::domain::{ConstraintSpec, ParamValue};
use shiftsolve_solver::SolverConfig;

/// Errors raised while loading or validating a solve configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The raw, on-disk shape of a solve configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
struct RawSolverConfig {
    #[serde(default)]
    constraint_specs: BTreeMap<String, ConstraintSpec>,
    #[serde(default = "default_time_limit_seconds")]
    time_limit_seconds: u64,
    #[serde(default = "default_num_workers")]
    num_workers: u32,
    #[serde(default)]
    relative_gap: f64,
    #[serde(default = "default_true")]
    log_search_progress: bool,
    #[serde(default = "default_throttle_seconds")]
    throttle_seconds: f64,
}

fn default_time_limit_seconds() -> u64 {
    60
}
fn default_num_workers() -> u32 {
    8
}
fn default_true() -> bool {
    true
}
fn default_throttle_seconds() -> f64 {
    1.0
}

impl Default for RawSolverConfig {
    fn default() -> Self {
        RawSolverConfig {
            constraint_specs: BTreeMap::new(),
            time_limit_seconds: default_time_limit_seconds(),
            num_workers: default_num_workers(),
            relative_gap: 0.0,
            log_search_progress: true,
            throttle_seconds: default_throttle_seconds(),
        }
    }
}

/// Loads configuration from a TOML file.
pub fn load_toml_file(path: impl AsRef<Path>) -> Result<SolverConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    load_toml_str(&contents)
}

/// Parses configuration from a TOML string.
pub fn load_toml_str(s: &str) -> Result<SolverConfig, ConfigError> {
    let raw: RawSolverConfig = toml::from_str(s)?;
    validate(raw)
}

/// Loads configuration from a YAML file.
pub fn load_yaml_file(path: impl AsRef<Path>) -> Result<SolverConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    load_yaml_str(&contents)
}

/// Parses configuration from a YAML string.
pub fn load_yaml_str(s: &str) -> Result<SolverConfig, ConfigError> {
    let raw: RawSolverConfig = serde_yaml::from_str(s)?;
    validate(raw)
}

fn validate(raw: RawSolverConfig) -> Result<SolverConfig, ConfigError> {
    for (id, spec) in &raw.constraint_specs {
        if !CONSTRAINT_IDS.contains(&id.as_str()) {
            return Err(ConfigError::Invalid(format!("unknown constraint id: {id}")));
        }
        validate_spec(id, spec)?;
    }
    if raw.time_limit_seconds == 0 {
        return Err(ConfigError::Invalid("time_limit_seconds must be positive".to_string()));
    }
    if raw.num_workers == 0 {
        return Err(ConfigError::Invalid("num_workers must be positive".to_string()));
    }
    if raw.relative_gap < 0.0 {
        return Err(ConfigError::Invalid("relative_gap must be nonnegative".to_string()));
    }
    if raw.throttle_seconds <= 0.0 {
        return Err(ConfigError::Invalid("throttle_seconds must be positive".to_string()));
    }

    Ok(SolverConfig {
        constraint_specs: raw.constraint_specs,
        time_limit_seconds: raw.time_limit_seconds,
        num_workers: raw.num_workers,
        relative_gap: raw.relative_gap,
        log_search_progress: raw.log_search_progress,
        throttle_seconds: raw.throttle_seconds,
    })
}

const POSITIVE_INT_PARAMS: &[(&str, &str)] = &[
    ("frequency", "max_periods_between"),
    ("max_absence", "max_periods_absent"),
];

fn validate_spec(constraint_id: &str, spec: &ConstraintSpec) -> Result<(), ConfigError> {
    for (id, key) in POSITIVE_INT_PARAMS {
        if constraint_id != *id {
            continue;
        }
        if let Some(value) = spec.get_param(key) {
            match value {
                ParamValue::Int(n) if *n > 0 => {}
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "{constraint_id}.{key} must be a positive integer"
                    )))
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_toml() {
        let config = load_toml_str("time_limit_seconds = 30\n").unwrap();
        assert_eq!(config.time_limit_seconds, 30);
        assert_eq!(config.num_workers, 8);
    }

    #[test]
    fn rejects_unknown_constraint_id() {
        let err = load_toml_str("[constraint_specs.not_real]\nweight = 100\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_window() {
        let toml = r#"
            [constraint_specs.frequency]
            [constraint_specs.frequency.parameters]
            max_periods_between = -1
        "#;
        let err = load_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_time_limit() {
        let err = load_toml_str("time_limit_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn accepts_valid_fairness_spec() {
        let toml = r#"
            [constraint_specs.fairness]
            weight = 1000
            is_hard = false
        "#;
        let config = load_toml_str(toml).unwrap();
        assert_eq!(config.constraint_specs["fairness"].weight, 1000);
    }

    #[test]
    fn loads_from_yaml() {
        let yaml = "time_limit_seconds: 45\nnum_workers: 4\n";
        let config = load_yaml_str(yaml).unwrap();
        assert_eq!(config.time_limit_seconds, 45);
        assert_eq!(config.num_workers, 4);
    }
}
