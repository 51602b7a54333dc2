//! Breathing gas limits.
//!
//! Parses trimix notation and computes the depths at which a mix reaches a
//! PO2 target, a 30 m equivalent narcotic depth, and the soft and hard gas
//! density limits on open circuit and on a rebreather set point.

pub mod limits;
pub mod models;
pub mod parser;
pub mod report;
mod routes;

pub use limits::{
    depth_for_30m_end, depth_for_gas_density, depth_for_po2, depth_for_set_point_and_gas_density,
    SearchLimits,
};
pub use models::{GasMix, GasReport, LimitsRequest};
pub use parser::parse_trimix;
pub use routes::router;
