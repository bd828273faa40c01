//! Profile checks against the contacts
//!
//! All checks run to completion; a FATAL finding does not stop later ones.

use tracing::{error, warn};

use crate::config::ConsistencyConfig;
use crate::types::{Contacts, DepthNode, DepthProfile, Diagnostic, Phase, Severity};

/// Check a computed profile and return every finding in depth order.
///
/// - GOC node (nearest to the GOC, checked when top < GOC < OWC): gas denser
///   than oil is FATAL, a saturation pressure above local pressure is ERROR,
///   one materially below it is WARNING
/// - every oil / gas node: saturation pressure above local pressure is ERROR
/// - consecutive same-phase nodes: bubble point rising with depth in oil or
///   dew point falling with depth in gas is FATAL, a steep saturation
///   pressure gradient is WARNING
pub fn check_profile(
    profile: &DepthProfile,
    contacts: &Contacts,
    settings: &ConsistencyConfig,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if contacts.top < contacts.goc && contacts.goc < contacts.owc {
        if let Some((_, node)) = profile.nearest_node(contacts.goc) {
            check_goc(node, settings, &mut diagnostics);
        }
    }

    for node in profile.nodes() {
        if let Some(psat) = node.saturation_pressure() {
            if psat > node.pressure + settings.saturation_tolerance_bar {
                diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    Some(node.depth),
                    format!(
                        "{} saturation pressure {psat:.2} bar exceeds pressure {:.2} bar",
                        node.phase, node.pressure
                    ),
                ));
            }
        }
    }

    for pair in profile.nodes().windows(2) {
        check_pair(&pair[0], &pair[1], settings, &mut diagnostics);
    }

    for d in &diagnostics {
        log_diagnostic(profile.eqlnum, d);
    }
    diagnostics
}

fn check_goc(node: &DepthNode, settings: &ConsistencyConfig, out: &mut Vec<Diagnostic>) {
    let depth = Some(node.depth);
    if node.deng > node.deno {
        out.push(Diagnostic::new(
            Severity::Fatal,
            depth,
            format!(
                "Gas density {:.2} kg/m3 exceeds oil density {:.2} kg/m3 at GOC",
                node.deng, node.deno
            ),
        ));
    }

    for (name, psat) in [("Bubble point", node.pbub), ("Dew point", node.pdew)] {
        if psat > node.pressure + settings.saturation_tolerance_bar {
            out.push(Diagnostic::new(
                Severity::Error,
                depth,
                format!(
                    "{name} {psat:.2} bar exceeds GOC pressure {:.2} bar",
                    node.pressure
                ),
            ));
        } else if psat < node.pressure - settings.goc_undersaturation_bar {
            out.push(Diagnostic::new(
                Severity::Warning,
                depth,
                format!(
                    "{name} {psat:.2} bar is below GOC pressure {:.2} bar (undersaturated at contact)",
                    node.pressure
                ),
            ));
        }
    }
}

fn check_pair(
    upper: &DepthNode,
    lower: &DepthNode,
    settings: &ConsistencyConfig,
    out: &mut Vec<Diagnostic>,
) {
    if upper.phase != lower.phase {
        return;
    }
    let (Some(p_upper), Some(p_lower)) = (upper.saturation_pressure(), lower.saturation_pressure())
    else {
        return;
    };
    let dz = lower.depth - upper.depth;
    let dp = p_lower - p_upper;

    let reversed = match lower.phase {
        Phase::Oil => dp > 0.0,
        Phase::Gas => dp < 0.0,
        Phase::Water => false,
    };
    if reversed {
        let (name, expected) = match lower.phase {
            Phase::Oil => ("Bubble point", "decrease"),
            _ => ("Dew point", "increase"),
        };
        out.push(Diagnostic::new(
            Severity::Fatal,
            Some(lower.depth),
            format!(
                "{name} goes from {p_upper:.2} to {p_lower:.2} bar between {:.1} and {:.1} m; it must {expected} with depth",
                upper.depth, lower.depth
            ),
        ));
    }

    if dz > 0.0 {
        let gradient = dp.abs() / dz;
        if gradient > settings.max_saturation_gradient_bar_per_m {
            out.push(Diagnostic::new(
                Severity::Warning,
                Some(lower.depth),
                format!(
                    "{} saturation pressure gradient {gradient:.3} bar/m between {:.1} and {:.1} m exceeds {:.3} bar/m",
                    lower.phase, upper.depth, lower.depth, settings.max_saturation_gradient_bar_per_m
                ),
            ));
        }
    }
}

fn log_diagnostic(eqlnum: u32, d: &Diagnostic) {
    let depth = d.depth.unwrap_or(f64::NAN);
    match d.severity {
        Severity::Warning => warn!(eqlnum, depth, "{}", d.message),
        Severity::Error | Severity::Fatal => {
            error!(eqlnum, depth, severity = %d.severity, "{}", d.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(depth: f64, phase: Phase, pressure: f64, pbub: f64, pdew: f64) -> DepthNode {
        DepthNode {
            depth,
            phase,
            pressure,
            rs: 0.0,
            rv: 0.0,
            pbub,
            pdew,
            bo: 1.3,
            viso: 0.5,
            deno: 650.0,
            bg: 0.004,
            visg: 0.03,
            deng: 300.0,
            bw: 1.01,
            visw: 0.3,
            denw: 990.0,
        }
    }

    fn contacts() -> Contacts {
        Contacts {
            goc: 2000.0,
            owc: 2100.0,
            top: 1900.0,
            bottom: 2200.0,
        }
    }

    /// Saturated at the GOC, undersaturated and monotone away from it.
    fn consistent() -> DepthProfile {
        DepthProfile {
            eqlnum: 1,
            pvtnum: 1,
            nodes: vec![
                node(1900.0, Phase::Gas, 198.0, 150.0, 180.0),
                node(1950.0, Phase::Gas, 199.0, 160.0, 190.0),
                node(2000.0, Phase::Gas, 200.0, 200.0, 200.0),
                node(2050.0, Phase::Oil, 203.0, 190.0, 205.0),
                node(2100.0, Phase::Water, 206.0, 180.0, 210.0),
                node(2150.0, Phase::Water, 211.0, 170.0, 215.0),
            ],
        }
    }

    #[test]
    fn test_consistent_profile_has_no_findings() {
        let diags = check_profile(&consistent(), &contacts(), &ConsistencyConfig::default());
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn test_dense_gas_at_goc_is_fatal() {
        let mut profile = consistent();
        profile.nodes[2].deng = 700.0;
        let diags = check_profile(&profile, &contacts(), &ConsistencyConfig::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Fatal);
        assert_eq!(diags[0].depth, Some(2000.0));
    }

    #[test]
    fn test_goc_outside_structure_is_skipped() {
        let mut profile = consistent();
        profile.nodes[2].deng = 700.0;
        let mut c = contacts();
        c.top = 2000.0;
        assert!(check_profile(&profile, &c, &ConsistencyConfig::default()).is_empty());
    }

    #[test]
    fn test_undersaturated_goc_warns() {
        let mut profile = consistent();
        profile.nodes[2].pbub = 195.0;
        let diags = check_profile(&profile, &contacts(), &ConsistencyConfig::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert!(diags[0].message.contains("Bubble point"));
    }

    #[test]
    fn test_oversaturation_is_error() {
        let mut profile = consistent();
        profile.nodes[3].pbub = 203.5;
        let diags = check_profile(&profile, &contacts(), &ConsistencyConfig::default());
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Error && d.depth == Some(2050.0)));
        // Within tolerance is fine.
        profile.nodes[3].pbub = 199.0;
        profile.nodes[3].pressure = 198.95;
        let diags = check_profile(&profile, &contacts(), &ConsistencyConfig::default());
        assert!(!diags.iter().any(|d| d.severity == Severity::Error));
    }

    #[test]
    fn test_non_monotonic_dew_point_is_fatal() {
        let mut profile = consistent();
        profile.nodes[1].pdew = 170.0;
        let diags = check_profile(&profile, &contacts(), &ConsistencyConfig::default());
        let fatal: Vec<_> = diags.iter().filter(|d| d.severity == Severity::Fatal).collect();
        assert_eq!(fatal.len(), 1);
        assert_eq!(fatal[0].depth, Some(1950.0));
    }

    #[test]
    fn test_steep_gradient_warns() {
        let settings = ConsistencyConfig {
            max_saturation_gradient_bar_per_m: 0.5,
            ..ConsistencyConfig::default()
        };
        // Gas pair 1950 -> 2000 rises 10 bar over 50 m (0.2 bar/m): fine.
        assert!(check_profile(&consistent(), &contacts(), &settings).is_empty());
        let settings = ConsistencyConfig {
            max_saturation_gradient_bar_per_m: 0.15,
            ..ConsistencyConfig::default()
        };
        let diags = check_profile(&consistent(), &contacts(), &settings);
        assert!(!diags.is_empty());
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }
}
