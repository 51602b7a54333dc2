//! Limits report: runs every formula over the target lists for one mix.

use sha2::{Digest, Sha256};

use crate::config::Targets;
use crate::error::{GasError, Result};

use super::limits::{depth_for_30m_end, depth_for_po2, SearchLimits};
use super::models::{
    DensityLimit, GasReport, LimitsRequest, Outcome, Po2Limit, SetPointLimit,
};
use super::parser::parse_trimix;

pub const TOOL: &str = "gas-limits";
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest accepted target list. The CC sweep runs one search per
/// density target and set point pair.
pub const MAX_TARGETS: usize = 32;

/// Compute SHA256 hash of input string.
fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let digest = hasher.finalize();
    format!("sha256:{}", hex::encode(digest))
}

/// Build the report for a request, filling missing target lists from `defaults`.
///
/// A malformed mix or an oversized target list fails the whole report.
/// Unreachable targets are recorded per line.
pub fn build_report(
    request: &LimitsRequest,
    defaults: &Targets,
    limits: SearchLimits,
) -> Result<GasReport> {
    let mix = parse_trimix(&request.mix)?;

    // Hash the resolved request so defaults are part of the fingerprint
    let resolved = LimitsRequest {
        mix: mix.to_string(),
        po2_targets: Some(request.po2_targets.clone().unwrap_or_else(|| defaults.po2.clone())),
        density_targets: Some(
            request
                .density_targets
                .clone()
                .unwrap_or_else(|| defaults.density.clone()),
        ),
        set_points: Some(
            request
                .set_points
                .clone()
                .unwrap_or_else(|| defaults.set_points.clone()),
        ),
    };
    for (name, list) in [
        ("po2_targets", &resolved.po2_targets),
        ("density_targets", &resolved.density_targets),
        ("set_points", &resolved.set_points),
    ] {
        let len = list.as_ref().map_or(0, Vec::len);
        if len > MAX_TARGETS {
            return Err(GasError::InvalidInput(format!(
                "{name} has {len} entries, at most {MAX_TARGETS} allowed"
            )));
        }
    }

    let input_json = serde_json::to_string(&resolved).unwrap_or_default();
    let input_hash = sha256_hex(&input_json);

    let po2 = resolved
        .po2_targets
        .iter()
        .flatten()
        .map(|&target_po2| Po2Limit {
            target_po2,
            outcome: depth_for_po2(target_po2, mix.o2_percent).into(),
        })
        .collect();

    let end_30m = depth_for_30m_end(mix.n2_percent).into();

    let set_points = resolved.set_points.unwrap_or_default();
    let density = resolved
        .density_targets
        .iter()
        .flatten()
        .map(|&target_density| DensityLimit {
            target_density,
            open_circuit: limits
                .depth_for_gas_density(mix.o2_percent, mix.he_percent, target_density)
                .into(),
            closed_circuit: set_points
                .iter()
                .map(|&set_point| SetPointLimit {
                    set_point,
                    outcome: limits
                        .depth_for_set_point_and_gas_density(
                            mix.o2_percent,
                            mix.he_percent,
                            mix.n2_percent,
                            set_point,
                            target_density,
                        )
                        .into(),
                })
                .collect(),
        })
        .collect();

    Ok(GasReport {
        tool: TOOL,
        tool_version: TOOL_VERSION,
        mix,
        po2,
        end_30m,
        density,
        input_hash,
    })
}

/// Render the report as plain text, one limit per line.
pub fn render_text(report: &GasReport) -> String {
    let mut lines = Vec::new();
    let mix = &report.mix;

    lines.push(format!(
        "Oxygen: {}%, Helium: {}%, Nitrogen: {}%",
        mix.o2_percent, mix.he_percent, mix.n2_percent
    ));

    for limit in &report.po2 {
        lines.push(match &limit.outcome {
            Outcome::Depth { depth_m } => format!(
                "PO2 of {} bar at {:.2} meters.",
                value(limit.target_po2),
                depth_m
            ),
            Outcome::Unreachable { unreachable } => format!(
                "PO2 of {} bar is unreachable ({}).",
                value(limit.target_po2),
                unreachable
            ),
        });
    }

    lines.push(match &report.end_30m {
        Outcome::Depth { depth_m } => format!("END is 30 meters at {:.2} meters.", depth_m),
        Outcome::Unreachable { unreachable } => {
            format!("END of 30 meters is unreachable ({}).", unreachable)
        }
    });

    for limit in &report.density {
        let target = value(limit.target_density);
        lines.push(match &limit.open_circuit {
            Outcome::Depth { depth_m } => format!(
                "Depth for {} g/l gas density is {} meters on OC.",
                target, depth_m
            ),
            Outcome::Unreachable { unreachable } => format!(
                "Depth for {} g/l gas density on OC is unreachable ({}).",
                target, unreachable
            ),
        });

        for cc in &limit.closed_circuit {
            let set_point = value(cc.set_point);
            lines.push(match &cc.outcome {
                Outcome::Depth { depth_m } => format!(
                    "With SP {} the depth for {} g/l is {}.",
                    set_point, target, depth_m
                ),
                Outcome::Unreachable { unreachable } => format!(
                    "With SP {} the depth for {} g/l is unreachable ({}).",
                    set_point, target, unreachable
                ),
            });
        }
    }

    lines.join("\n")
}

/// Target values keep their decimal point, so 1.0 prints as "1.0".
fn value(v: f64) -> String {
    format!("{v:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mix: &str) -> LimitsRequest {
        LimitsRequest {
            mix: mix.to_string(),
            po2_targets: None,
            density_targets: None,
            set_points: None,
        }
    }

    #[test]
    fn test_report_uses_defaults() {
        let report =
            build_report(&request("18/35"), &Targets::default(), SearchLimits::default()).unwrap();

        assert_eq!(report.tool, "gas-limits");
        assert_eq!(report.po2.len(), 3);
        assert_eq!(report.density.len(), 2);
        assert_eq!(report.density[0].closed_circuit.len(), 4);
        assert_eq!(report.density[0].open_circuit.depth(), Some(48));
        assert_eq!(report.density[1].open_circuit.depth(), Some(59));
    }

    #[test]
    fn test_report_custom_targets() {
        let mut req = request("32");
        req.po2_targets = Some(vec![1.4]);
        req.density_targets = Some(vec![5.2]);
        req.set_points = Some(vec![]);

        let report = build_report(&req, &Targets::default(), SearchLimits::default()).unwrap();
        assert_eq!(report.po2.len(), 1);
        assert_eq!(report.po2[0].target_po2, 1.4);
        assert!(report.density[0].closed_circuit.is_empty());
    }

    #[test]
    fn test_report_keeps_unreachable_lines() {
        let mut req = request("100");
        req.po2_targets = Some(vec![0.7, 1.6]);
        req.set_points = Some(vec![1.3]);

        let report = build_report(&req, &Targets::default(), SearchLimits::default()).unwrap();
        assert!(report.po2[0].outcome.depth().is_none());
        assert!(report.po2[1].outcome.depth().is_some());
        // No nitrogen at all
        assert!(report.end_30m.depth().is_none());
    }

    #[test]
    fn test_report_bad_mix() {
        let err = build_report(&request("x/y"), &Targets::default(), SearchLimits::default())
            .unwrap_err();
        assert!(matches!(err, GasError::Parse { .. }));
    }

    #[test]
    fn test_report_rejects_long_target_lists() {
        let mut req = request("21");
        req.set_points = Some(vec![1.2; MAX_TARGETS + 1]);

        let err = build_report(&req, &Targets::default(), SearchLimits::default()).unwrap_err();
        assert_eq!(
            err,
            GasError::InvalidInput("set_points has 33 entries, at most 32 allowed".to_string())
        );

        req.set_points = Some(vec![1.2; MAX_TARGETS]);
        assert!(build_report(&req, &Targets::default(), SearchLimits::default()).is_ok());
    }

    #[test]
    fn test_input_hash_is_stable() {
        let defaults = Targets::default();
        let a = build_report(&request("18/35"), &defaults, SearchLimits::default()).unwrap();
        let b = build_report(&request(" 18/35 "), &defaults, SearchLimits::default()).unwrap();
        let c = build_report(&request("21/35"), &defaults, SearchLimits::default()).unwrap();

        assert!(a.input_hash.starts_with("sha256:"));
        assert_eq!(a.input_hash.len(), 7 + 64); // "sha256:" + 64 hex chars
        assert_eq!(a.input_hash, b.input_hash);
        assert_ne!(a.input_hash, c.input_hash);
    }

    #[test]
    fn test_render_text() {
        let report =
            build_report(&request("18/35"), &Targets::default(), SearchLimits::default()).unwrap();
        let text = render_text(&report);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Oxygen: 18%, Helium: 35%, Nitrogen: 47%");
        assert_eq!(lines[1], "PO2 of 1.1 bar at 51.11 meters.");
        assert_eq!(lines[4], "END is 30 meters at 57.23 meters.");
        assert_eq!(lines[5], "Depth for 5.2 g/l gas density is 48 meters on OC.");
        assert_eq!(lines[6], "With SP 1.0 the depth for 5.2 g/l is 48.");
        // 1 header + 3 PO2 + 1 END + 2 * (1 OC + 4 CC)
        assert_eq!(lines.len(), 15);
    }

    #[test]
    fn test_render_unreachable() {
        let mut req = request("21");
        req.po2_targets = Some(vec![0.1]);
        req.density_targets = Some(vec![]);

        let report = build_report(&req, &Targets::default(), SearchLimits::default()).unwrap();
        let text = render_text(&report);
        assert!(text.contains("PO2 of 0.1 bar is unreachable (target 0.1 is unreachable with this mix)."));
    }
}
