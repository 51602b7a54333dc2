//! Error types shared by the calculator, config loader and HTTP layer.

use thiserror::Error;

/// Errors raised while parsing a mix or computing a depth limit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GasError {
    /// Malformed trimix notation.
    #[error("invalid trimix '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Percentages outside 0-100, or O2 + He above 100.
    #[error("invalid gas mix: {0}")]
    InvalidMix(String),

    /// A set point or density target that is not a positive finite number.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The algebraic depth formula produced a negative or non-finite depth.
    #[error("target {target} is unreachable with this mix")]
    UnreachableTarget { target: f64 },

    /// The set point needs an oxygen fraction of 1.0 or more.
    #[error("set point {set_point} bar cannot be held at {depth_m} m (fO2 {fraction_o2:.2})")]
    UnreachableSetPoint {
        set_point: f64,
        depth_m: u32,
        fraction_o2: f64,
    },

    /// The density search passed its depth cap without reaching the target.
    #[error("density {target} g/l not reached above {max_depth_m} m")]
    DensityUnreachable { target: f64, max_depth_m: u32 },
}

impl GasError {
    /// Stable machine-readable tag used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse_error",
            Self::InvalidMix(_) => "invalid_mix",
            Self::InvalidInput(_) => "invalid_input",
            Self::UnreachableTarget { .. } => "unreachable_target",
            Self::UnreachableSetPoint { .. } => "unreachable_set_point",
            Self::DensityUnreachable { .. } => "density_unreachable",
        }
    }
}

pub type Result<T> = std::result::Result<T, GasError>;
