//! Data types for gas limit calculations.

use serde::{Deserialize, Serialize};

use crate::error::{GasError, Result};

/// Breathing gas composition in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GasMix {
    /// Oxygen percent
    pub o2_percent: i32,
    /// Helium percent
    pub he_percent: i32,
    /// Nitrogen percent, always `100 - o2 - he`
    pub n2_percent: i32,
}

impl GasMix {
    /// Build a mix from its oxygen and helium share, rejecting impossible blends.
    pub fn new(o2_percent: i32, he_percent: i32) -> Result<Self> {
        if !(0..=100).contains(&o2_percent) {
            return Err(GasError::InvalidMix(format!(
                "oxygen {o2_percent}% is outside 0-100"
            )));
        }
        if !(0..=100).contains(&he_percent) {
            return Err(GasError::InvalidMix(format!(
                "helium {he_percent}% is outside 0-100"
            )));
        }
        if o2_percent + he_percent > 100 {
            return Err(GasError::InvalidMix(format!(
                "oxygen {o2_percent}% + helium {he_percent}% exceeds 100"
            )));
        }

        Ok(Self {
            o2_percent,
            he_percent,
            n2_percent: 100 - o2_percent - he_percent,
        })
    }

    /// Air, 21/0.
    #[cfg(test)]
    pub fn air() -> Self {
        Self {
            o2_percent: 21,
            he_percent: 0,
            n2_percent: 79,
        }
    }
}

impl std::fmt::Display for GasMix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.he_percent == 0 {
            write!(f, "{}", self.o2_percent)
        } else {
            write!(f, "{}/{}", self.o2_percent, self.he_percent)
        }
    }
}

/// Request payload for the limits endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsRequest {
    /// Trimix notation, e.g. "18/35" or "50"
    pub mix: String,
    /// PO2 targets in bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po2_targets: Option<Vec<f64>>,
    /// Gas density targets in g/l
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_targets: Option<Vec<f64>>,
    /// Closed-circuit set points in bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_points: Option<Vec<f64>>,
}

/// Depth at which a PO2 target is reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Po2Limit {
    pub target_po2: f64,
    #[serde(flatten)]
    pub outcome: Outcome<f64>,
}

/// Depth at which a density target is reached on a set point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetPointLimit {
    pub set_point: f64,
    #[serde(flatten)]
    pub outcome: Outcome<u32>,
}

/// Density limit on open circuit plus the closed-circuit sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityLimit {
    pub target_density: f64,
    /// Open-circuit result
    pub open_circuit: Outcome<u32>,
    /// Closed-circuit results, one per set point
    pub closed_circuit: Vec<SetPointLimit>,
}

/// Result of a single limit calculation.
///
/// Individual failures are kept in the report rather than aborting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Depth { depth_m: T },
    Unreachable { unreachable: String },
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(depth_m) => Self::Depth { depth_m },
            Err(e) => Self::Unreachable {
                unreachable: e.to_string(),
            },
        }
    }
}

impl<T: Copy> Outcome<T> {
    #[cfg(test)]
    pub fn depth(&self) -> Option<T> {
        match self {
            Self::Depth { depth_m } => Some(*depth_m),
            Self::Unreachable { .. } => None,
        }
    }
}

/// Full limits report for one mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasReport {
    /// Tool identifier
    pub tool: &'static str,
    /// Tool version
    pub tool_version: &'static str,

    /// Parsed mix
    pub mix: GasMix,
    /// Depths for each PO2 target
    pub po2: Vec<Po2Limit>,
    /// Depth at which the END is 30 m
    pub end_30m: Outcome<f64>,
    /// Density limits on OC and CC
    pub density: Vec<DensityLimit>,

    /// SHA256 hash of input
    pub input_hash: String,
}
