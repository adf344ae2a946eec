//! Result data types.
//!
//! Everything here is SI and serde-serializable; field names carry the
//! unit suffix so serialized output is unambiguous without a schema.

use pf_hydraulics::FlowRegime;
use serde::{Deserialize, Serialize};

/// Output of one steady-state solve. `converged: false` is a valid state,
/// not an error; the diagnostics live in `warnings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedState {
    pub converged: bool,
    pub iterations: u32,
    /// UTC RFC3339.
    pub timestamp: String,
    /// Final residual norm.
    pub residual: f64,
    pub node_results: Vec<NodeResult>,
    pub link_results: Vec<LinkResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pump_results: Vec<PumpResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResult {
    pub node_id: String,
    /// Gauge pressure at the node elevation.
    pub pressure_pa: f64,
    /// Hydraulic grade line: elevation + pressure head.
    pub hgl_m: f64,
    /// Energy grade line: HGL + velocity head of the dominant incident link.
    pub egl_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResult {
    pub link_id: String,
    /// Positive in the link's defined direction; negative is reverse flow.
    pub flow_m3_s: f64,
    pub velocity_m_s: f64,
    pub head_loss_m: f64,
    pub friction_loss_m: f64,
    pub minor_loss_m: f64,
    pub reynolds: f64,
    /// Undefined in the still regime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friction_factor: Option<f64>,
    pub regime: FlowRegime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PumpResult {
    pub component_id: String,
    pub flow_m3_s: f64,
    pub head_m: f64,
    pub npsh_available_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npsh_required_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_w: Option<f64>,
    /// System resistance curve through the operating point,
    /// h = h_static + r·Q².
    pub system_curve: Vec<SystemCurvePoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SystemCurvePoint {
    pub flow_m3_s: f64,
    pub head_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub category: WarningCategory,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    Convergence,
    ReverseFlow,
    TransitionalRegime,
    CurveExtrapolation,
    LowTankLevel,
    HighVelocity,
    LowPressure,
    HighPressure,
    NpshMargin,
    NoIntersection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Warning {
    pub fn new(category: WarningCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            component_id: None,
            message: message.into(),
        }
    }

    pub fn for_component(
        category: WarningCategory,
        severity: Severity,
        component_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            component_id: Some(component_id.into()),
            message: message.into(),
        }
    }
}

impl SolvedState {
    pub fn node(&self, node_id: &str) -> Option<&NodeResult> {
        self.node_results.iter().find(|n| n.node_id == node_id)
    }

    pub fn link(&self, link_id: &str) -> Option<&LinkResult> {
        self.link_results.iter().find(|l| l.link_id == link_id)
    }

    pub fn pump(&self, component_id: &str) -> Option<&PumpResult> {
        self.pump_results.iter().find(|p| p.component_id == component_id)
    }

    /// Highest severity across all warnings, or `None` when clean.
    pub fn max_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|w| w.severity).max()
    }
}
