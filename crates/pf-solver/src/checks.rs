//! Post-solve design checks.
//!
//! Driven by `SolverOptions.checks`; each check appends warnings and never
//! mutates a numeric result. A severity of `error` flags a design problem,
//! it does not invalidate the converged state.

use pf_hydraulics::FlowRegime;
use pf_model::CheckOptions;
use pf_results::{Severity, SolvedState, Warning, WarningCategory};

pub fn run_checks(state: &mut SolvedState, checks: &CheckOptions) {
    let mut warnings = Vec::new();

    for link in &state.link_results {
        if link.flow_m3_s < 0.0 {
            warnings.push(Warning::for_component(
                WarningCategory::ReverseFlow,
                Severity::Info,
                link.link_id.clone(),
                format!(
                    "flow runs against the defined direction ({:.4e} m³/s)",
                    link.flow_m3_s
                ),
            ));
        }
        if link.regime == FlowRegime::Transitional {
            warnings.push(Warning::for_component(
                WarningCategory::TransitionalRegime,
                Severity::Info,
                link.link_id.clone(),
                format!(
                    "Re = {:.0} is in the transitional band; friction factor is a blend",
                    link.reynolds
                ),
            ));
        }
        if let Some(v_max) = checks.max_velocity_m_s {
            if link.velocity_m_s.abs() > v_max {
                warnings.push(Warning::for_component(
                    WarningCategory::HighVelocity,
                    Severity::Warning,
                    link.link_id.clone(),
                    format!(
                        "velocity {:.2} m/s exceeds limit {v_max:.2} m/s",
                        link.velocity_m_s.abs()
                    ),
                ));
            }
        }
    }

    for node in &state.node_results {
        if let Some(p_min) = checks.min_pressure_pa {
            if node.pressure_pa < p_min {
                warnings.push(Warning::for_component(
                    WarningCategory::LowPressure,
                    Severity::Warning,
                    node.node_id.clone(),
                    format!(
                        "pressure {:.0} Pa below minimum {p_min:.0} Pa",
                        node.pressure_pa
                    ),
                ));
            }
        }
        if let Some(p_max) = checks.max_pressure_pa {
            if node.pressure_pa > p_max {
                warnings.push(Warning::for_component(
                    WarningCategory::HighPressure,
                    Severity::Warning,
                    node.node_id.clone(),
                    format!(
                        "pressure {:.0} Pa above maximum {p_max:.0} Pa",
                        node.pressure_pa
                    ),
                ));
            }
        }
    }

    for pump in &state.pump_results {
        if let Some(npshr) = pump.npsh_required_m {
            let margin = pump.npsh_available_m - npshr;
            if margin < 0.0 {
                warnings.push(Warning::for_component(
                    WarningCategory::NpshMargin,
                    Severity::Error,
                    pump.component_id.clone(),
                    format!(
                        "NPSH available {:.2} m is below required {npshr:.2} m (cavitation risk)",
                        pump.npsh_available_m
                    ),
                ));
            } else if let Some(min_margin) = checks.min_npsh_margin_m {
                if margin < min_margin {
                    warnings.push(Warning::for_component(
                        WarningCategory::NpshMargin,
                        Severity::Warning,
                        pump.component_id.clone(),
                        format!(
                            "NPSH margin {margin:.2} m is below minimum {min_margin:.2} m"
                        ),
                    ));
                }
            }
        }
    }

    state.warnings.extend(warnings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_results::{LinkResult, NodeResult, PumpResult};

    fn empty_state() -> SolvedState {
        SolvedState {
            converged: true,
            iterations: 3,
            timestamp: String::new(),
            residual: 1e-6,
            node_results: vec![],
            link_results: vec![],
            pump_results: vec![],
            warnings: vec![],
        }
    }

    fn link(flow: f64, velocity: f64, regime: FlowRegime) -> LinkResult {
        LinkResult {
            link_id: "c1".into(),
            flow_m3_s: flow,
            velocity_m_s: velocity,
            head_loss_m: 0.1,
            friction_loss_m: 0.1,
            minor_loss_m: 0.0,
            reynolds: 3000.0,
            friction_factor: Some(0.03),
            regime,
        }
    }

    #[test]
    fn reverse_flow_is_informational() {
        let mut state = empty_state();
        state.link_results.push(link(-0.002, -0.3, FlowRegime::Turbulent));
        run_checks(&mut state, &CheckOptions::default());
        assert_eq!(state.warnings.len(), 1);
        assert_eq!(state.warnings[0].category, WarningCategory::ReverseFlow);
        assert_eq!(state.warnings[0].severity, Severity::Info);
        // The flow value itself is untouched.
        assert_eq!(state.link_results[0].flow_m3_s, -0.002);
    }

    #[test]
    fn transitional_regime_flagged() {
        let mut state = empty_state();
        state
            .link_results
            .push(link(0.001, 0.2, FlowRegime::Transitional));
        run_checks(&mut state, &CheckOptions::default());
        assert!(state
            .warnings
            .iter()
            .any(|w| w.category == WarningCategory::TransitionalRegime));
    }

    #[test]
    fn velocity_and_pressure_limits() {
        let mut state = empty_state();
        state.link_results.push(link(0.02, 4.5, FlowRegime::Turbulent));
        state.node_results.push(NodeResult {
            node_id: "j1".into(),
            pressure_pa: -5_000.0,
            hgl_m: 1.0,
            egl_m: 1.1,
        });
        let checks = CheckOptions {
            max_velocity_m_s: Some(3.0),
            min_pressure_pa: Some(0.0),
            max_pressure_pa: None,
            min_npsh_margin_m: None,
        };
        run_checks(&mut state, &checks);
        assert!(state
            .warnings
            .iter()
            .any(|w| w.category == WarningCategory::HighVelocity));
        assert!(state
            .warnings
            .iter()
            .any(|w| w.category == WarningCategory::LowPressure));
    }

    #[test]
    fn npsh_below_required_is_error_severity() {
        let mut state = empty_state();
        state.pump_results.push(PumpResult {
            component_id: "p1".into(),
            flow_m3_s: 0.05,
            head_m: 22.0,
            npsh_available_m: 2.0,
            npsh_required_m: Some(4.0),
            efficiency_pct: None,
            power_w: None,
            system_curve: vec![],
        });
        run_checks(&mut state, &CheckOptions::default());
        assert_eq!(state.warnings.len(), 1);
        assert_eq!(state.warnings[0].severity, Severity::Error);
        assert!(state.converged);
    }
}
