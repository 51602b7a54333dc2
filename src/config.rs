//! Runtime configuration from the environment (and `.env` via dotenvy).

use thiserror::Error;

use crate::gas::limits::{SearchLimits, MAX_SEARCH_DEPTH_M};

/// Configuration errors, raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a list of numbers")]
    InvalidList { var: &'static str, value: String },

    #[error("{var}: '{value}' is not a whole number of meters")]
    InvalidDepth { var: &'static str, value: String },
}

/// Target lists the report sweeps over.
#[derive(Debug, Clone, PartialEq)]
pub struct Targets {
    /// PO2 targets in bar
    pub po2: Vec<f64>,
    /// Gas density targets in g/l (soft and hard limit)
    pub density: Vec<f64>,
    /// Closed-circuit set points in bar
    pub set_points: Vec<f64>,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            po2: vec![1.1, 1.4, 1.6],
            density: vec![5.2, 6.2],
            set_points: vec![1.0, 1.1, 1.2, 1.3],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub targets: Targets,
    pub limits: SearchLimits,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: Targets::default(),
            limits: SearchLimits::default(),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let po2 = list_var(&lookup, "GAS_PO2_TARGETS")?.unwrap_or(defaults.targets.po2);
        let density =
            list_var(&lookup, "GAS_DENSITY_TARGETS")?.unwrap_or(defaults.targets.density);
        let set_points =
            list_var(&lookup, "GAS_SET_POINTS")?.unwrap_or(defaults.targets.set_points);

        let max_depth_m = match lookup("GAS_MAX_SEARCH_DEPTH") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidDepth {
                var: "GAS_MAX_SEARCH_DEPTH",
                value,
            })?,
            None => MAX_SEARCH_DEPTH_M,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);

        Ok(Self {
            targets: Targets {
                po2,
                density,
                set_points,
            },
            limits: SearchLimits::new(max_depth_m),
            bind_addr,
        })
    }
}

fn list_var<F>(lookup: &F, var: &'static str) -> Result<Option<Vec<f64>>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => parse_list(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidList { var, value }),
        None => Ok(None),
    }
}

/// Parse a comma-separated list of numbers, e.g. "1.1, 1.4,1.6".
///
/// An empty string is an empty list.
pub fn parse_list(value: &str) -> Option<Vec<f64>> {
    if value.trim().is_empty() {
        return Some(Vec::new());
    }
    value
        .split(',')
        .map(|item| item.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.targets, Targets::default());
        assert_eq!(config.limits.max_depth_m, 1000);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GAS_PO2_TARGETS", "1.2, 1.5"),
            ("GAS_SET_POINTS", "0.7,1.3"),
            ("GAS_MAX_SEARCH_DEPTH", "300"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();

        assert_eq!(config.targets.po2, vec![1.2, 1.5]);
        assert_eq!(config.targets.density, vec![5.2, 6.2]);
        assert_eq!(config.targets.set_points, vec![0.7, 1.3]);
        assert_eq!(config.limits.max_depth_m, 300);
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("GAS_DENSITY_TARGETS", "5.2,soft")]),
            Err(ConfigError::InvalidList { var: "GAS_DENSITY_TARGETS", .. })
        ));
        assert!(matches!(
            config_from(&[("GAS_MAX_SEARCH_DEPTH", "-10")]),
            Err(ConfigError::InvalidDepth { .. })
        ));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("1.1,1.4"), Some(vec![1.1, 1.4]));
        assert_eq!(parse_list(""), Some(vec![]));
        assert_eq!(parse_list("1.1,,1.4"), None);
        assert_eq!(parse_list("NaN"), None);
    }
}
