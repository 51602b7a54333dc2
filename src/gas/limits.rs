//! Depth limits for a breathing gas.
//!
//! Ambient pressure follows the usual diving approximation of one atmosphere
//! per 10 m of water on top of one atmosphere at the surface. The PO2 and END
//! limits are algebraic inverses; the density limits are whole-meter searches
//! that return the first depth at or beyond the target density.

use tracing::debug;

use crate::error::{GasError, Result};

/// Default cap for the density searches, in meters.
pub const MAX_SEARCH_DEPTH_M: u32 = 1000;

/// Closed-circuit density search starts here.
pub const CC_SEARCH_START_M: u32 = 10;

/// Nitrogen fraction of air.
const AIR_FRACTION_N2: f64 = 0.79;

/// Ambient pressure at 30 m, ATA.
const AMBIENT_AT_30M: f64 = 4.0;

/// Specific gravity of a gas at standard conditions, g/l.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecificGravity {
    pub o2: f64,
    pub n2: f64,
    pub he: f64,
}

/// Specific gravities used by every density calculation.
pub const SPECIFIC_GRAVITY: SpecificGravity = SpecificGravity {
    o2: 1.429,
    n2: 1.2506,
    he: 0.1786,
};

/// Ambient pressure in ATA at `depth_m` meters.
pub fn ambient_pressure(depth_m: f64) -> f64 {
    1.0 + depth_m / 10.0
}

/// Gas density in g/l for the given fractions at `ambient` ATA.
pub fn gas_density(ambient: f64, frac_o2: f64, frac_he: f64, frac_n2: f64) -> f64 {
    ambient
        * (frac_o2 * SPECIFIC_GRAVITY.o2
            + frac_n2 * SPECIFIC_GRAVITY.n2
            + frac_he * SPECIFIC_GRAVITY.he)
}

/// Depth in meters at which `target_po2` bar is reached breathing `o2_percent`.
pub fn depth_for_po2(target_po2: f64, o2_percent: i32) -> Result<f64> {
    let frac_o2 = f64::from(o2_percent) / 100.0;
    let depth = (target_po2 / frac_o2 - 1.0) * 10.0;
    reachable(depth, target_po2)
}

/// Depth in meters at which the equivalent narcotic depth is 30 m.
///
/// The target is the nitrogen partial pressure of air at 30 m.
pub fn depth_for_30m_end(n2_percent: i32) -> Result<f64> {
    let frac_n2 = f64::from(n2_percent) / 100.0;
    let target_ppn2 = AIR_FRACTION_N2 * AMBIENT_AT_30M;
    let depth = (target_ppn2 / frac_n2 - 1.0) * 10.0;
    reachable(depth, target_ppn2)
}

fn reachable(depth: f64, target: f64) -> Result<f64> {
    if depth.is_finite() && depth >= 0.0 {
        Ok(depth)
    } else {
        Err(GasError::UnreachableTarget { target })
    }
}

/// Open-circuit density limit with the default search cap.
pub fn depth_for_gas_density(o2_percent: i32, he_percent: i32, target_density: f64) -> Result<u32> {
    SearchLimits::default().depth_for_gas_density(o2_percent, he_percent, target_density)
}

/// Closed-circuit density limit with the default search cap.
pub fn depth_for_set_point_and_gas_density(
    o2_percent: i32,
    he_percent: i32,
    n2_percent: i32,
    set_point: f64,
    target_density: f64,
) -> Result<u32> {
    SearchLimits::default().depth_for_set_point_and_gas_density(
        o2_percent,
        he_percent,
        n2_percent,
        set_point,
        target_density,
    )
}

/// Bounds for the whole-meter density searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest depth tested before giving up, meters
    pub max_depth_m: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth_m: MAX_SEARCH_DEPTH_M,
        }
    }
}

impl SearchLimits {
    pub fn new(max_depth_m: u32) -> Self {
        Self { max_depth_m }
    }

    /// First whole-meter depth from the surface where the mix reaches
    /// `target_density` g/l.
    pub fn depth_for_gas_density(
        &self,
        o2_percent: i32,
        he_percent: i32,
        target_density: f64,
    ) -> Result<u32> {
        positive("target density", target_density)?;

        let frac_o2 = f64::from(o2_percent) / 100.0;
        let frac_he = f64::from(he_percent) / 100.0;
        let frac_n2 = 1.0 - frac_o2 - frac_he;

        for depth in 0..=self.max_depth_m {
            let ambient = ambient_pressure(f64::from(depth));
            if gas_density(ambient, frac_o2, frac_he, frac_n2) >= target_density {
                debug!(o2_percent, he_percent, target_density, depth, "OC density limit");
                return Ok(depth);
            }
        }

        Err(GasError::DensityUnreachable {
            target: target_density,
            max_depth_m: self.max_depth_m,
        })
    }

    /// First whole-meter depth from 10 m where a rebreather holding
    /// `set_point` bar on this diluent reaches `target_density` g/l.
    ///
    /// The loop tops up oxygen to the set point and the diluent's helium and
    /// nitrogen fill the rest in their original ratio. The fractions always
    /// sum to one, so depths come out shallower than the older script that
    /// scaled the remainder by the raw He and N2 percent (48 m vs 58 m for
    /// 18/35 at SP 1.0, 5.2 g/l).
    pub fn depth_for_set_point_and_gas_density(
        &self,
        o2_percent: i32,
        he_percent: i32,
        n2_percent: i32,
        set_point: f64,
        target_density: f64,
    ) -> Result<u32> {
        positive("set point", set_point)?;
        positive("target density", target_density)?;

        let inert_percent = f64::from(he_percent) + f64::from(n2_percent);
        let (he_share, n2_share) = if inert_percent > 0.0 {
            (
                f64::from(he_percent) / inert_percent,
                f64::from(n2_percent) / inert_percent,
            )
        } else {
            (0.0, 0.0)
        };

        for depth in CC_SEARCH_START_M..=self.max_depth_m {
            let ambient = ambient_pressure(f64::from(depth));

            let frac_o2 = set_point / ambient;
            if frac_o2 >= 1.0 {
                return Err(GasError::UnreachableSetPoint {
                    set_point,
                    depth_m: depth,
                    fraction_o2: frac_o2,
                });
            }

            let remainder = 1.0 - frac_o2;
            let frac_he = he_share * remainder;
            let frac_n2 = n2_share * remainder;

            if gas_density(ambient, frac_o2, frac_he, frac_n2) >= target_density {
                debug!(
                    o2_percent,
                    he_percent, set_point, target_density, depth, "CC density limit"
                );
                return Ok(depth);
            }
        }

        Err(GasError::DensityUnreachable {
            target: target_density,
            max_depth_m: self.max_depth_m,
        })
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GasError::InvalidInput(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
