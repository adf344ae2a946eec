//! Project schema definitions.
//!
//! All numeric fields are interpreted per the project's `unit_system`.
//! SI projects use meters, m³/s, Pa, °C. US-customary projects use feet,
//! GPM, psi, °F; `convert::to_si` normalizes them before any physics sees
//! the numbers. Nominal pipe sizes are inches in both systems (they are
//! table keys, not lengths).

use pf_hydraulics::{FittingKind, PipeMaterial, PipeSchedule};
use serde::{Deserialize, Serialize};

/// Current schema version; older files are rejected by `validate`.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub unit_system: UnitSystem,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    #[serde(default)]
    pub pump_library: Vec<PumpCurveDef>,
    pub fluid: FluidDef,
    #[serde(default)]
    pub solver_options: SolverOptions,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Si,
    UsCustomary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    /// Centerline elevation (m or ft).
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub ports: Vec<PortDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ComponentKind {
    /// Fixed-grade boundary: an effectively infinite free surface.
    Reservoir {
        /// Surface level above the component elevation.
        surface_level: f64,
    },
    /// Finite free surface; `min_level` drives the low-level warning.
    Tank {
        level: f64,
        #[serde(default)]
        min_level: f64,
        diameter: f64,
    },
    Junction {
        /// Fixed withdrawal at this node (m³/s or GPM). Negative is inflow.
        #[serde(default)]
        demand: f64,
    },
    Pump {
        curve_id: String,
        #[serde(default = "default_speed_ratio")]
        speed_ratio: f64,
    },
    Valve {
        kind: ValveKind,
        /// 0.0 fully closed, 1.0 fully open.
        #[serde(default = "default_valve_position")]
        position: f64,
        /// Fully-open K. Absent means resolve from the fitting tables.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        k_open: Option<f64>,
    },
    HeatExchanger {
        k_factor: f64,
    },
    Strainer {
        k_factor: f64,
    },
    Orifice {
        /// Bore diameter (m or inches).
        bore_diameter: f64,
        #[serde(default = "default_discharge_coeff")]
        discharge_coeff: f64,
    },
    /// Emitter discharging to atmosphere: q = k·√(pressure head).
    Sprinkler {
        /// k in m³/s per √m (SI) or GPM per √ft (US).
        discharge_coeff: f64,
    },
    /// Boundary with a known pressure, either fixed or flow-dependent.
    ReferenceNode {
        ideal: ReferenceIdeal,
    },
    /// Dead end. Terminates a port with zero flow.
    Plug,
    Branch {
        style: BranchStyle,
    },
}

fn default_speed_ratio() -> f64 {
    1.0
}

fn default_valve_position() -> f64 {
    1.0
}

fn default_discharge_coeff() -> f64 {
    0.62
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValveKind {
    Gate,
    Globe,
    Ball,
    Butterfly,
    Angle,
    SwingCheck,
    LiftCheck,
}

impl ValveKind {
    /// Fitting-table equivalent for K resolution.
    pub fn fitting_kind(&self) -> FittingKind {
        match self {
            ValveKind::Gate => FittingKind::GateValve,
            ValveKind::Globe => FittingKind::GlobeValve,
            ValveKind::Ball => FittingKind::BallValve,
            ValveKind::Butterfly => FittingKind::ButterflyValve,
            ValveKind::Angle => FittingKind::AngleValve,
            ValveKind::SwingCheck => FittingKind::SwingCheckValve,
            ValveKind::LiftCheck => FittingKind::LiftCheckValve,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ReferenceIdeal {
    /// Fixed pressure regardless of flow.
    Pressure { pressure: f64 },
    /// Pressure as a function of withdrawn flow, linearly interpolated.
    Curve { points: Vec<CurvePointDef> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BranchStyle {
    Tee,
    Wye,
    Cross,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortDef {
    pub id: String,
    /// Nominal pipe size in inches (table key in both unit systems).
    pub nominal_size: f64,
    pub direction: PortDirection,
    /// Overrides the component elevation when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Inlet,
    Outlet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub id: String,
    pub from: EndpointRef,
    pub to: EndpointRef,
    pub piping: PipingSegmentDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub component: String,
    pub port: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipingSegmentDef {
    pub material: PipeMaterial,
    /// Nominal pipe size in inches.
    pub nominal_diameter: f64,
    #[serde(default = "default_schedule")]
    pub schedule: PipeSchedule,
    pub length: f64,
    /// Absolute roughness (m or ft). Absent means use the material default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_override: Option<f64>,
    #[serde(default)]
    pub fittings: Vec<FittingDef>,
}

fn default_schedule() -> PipeSchedule {
    PipeSchedule::Sch40
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingDef {
    pub kind: FittingKind,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_factor_override: Option<f64>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpCurveDef {
    pub id: String,
    pub name: String,
    /// (flow, head) samples at rated speed; ≥2, strictly increasing flow.
    pub head_points: Vec<CurvePointDef>,
    /// (flow, efficiency %) samples. Empty means no efficiency/power output.
    #[serde(default)]
    pub efficiency_points: Vec<CurvePointDef>,
    /// (flow, required NPSH) samples.
    #[serde(default)]
    pub npshr_points: Vec<CurvePointDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_speed_rpm: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurvePointDef {
    pub flow: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub kind: FluidKindDef,
    /// °C (SI) or °F (US).
    pub temperature: f64,
    /// Glycol mass concentration in percent; required for glycol kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<f64>,
    /// Required properties for `custom`; ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFluidDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FluidKindDef {
    Water,
    EthyleneGlycol,
    PropyleneGlycol,
    Custom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomFluidDef {
    /// kg/m³.
    pub density: Option<f64>,
    /// m²/s.
    pub kinematic_viscosity: Option<f64>,
    /// Pa, absolute.
    pub vapor_pressure: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverOptions {
    pub max_iterations: u32,
    /// Convergence threshold on the residual norm (m³/s and m mixed).
    pub tolerance: f64,
    /// Wall-clock deadline checked once per iteration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time_s: Option<f64>,
    /// Scales the expected flow magnitude; sizes the initial flow seed.
    pub flow_range_factor: f64,
    /// Samples on each reported pump system curve.
    pub system_curve_points: u32,
    /// Treat empty tanks/reservoirs as validation failures instead of
    /// warnings.
    pub strict_boundaries: bool,
    pub checks: CheckOptions,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.001,
            max_time_s: None,
            flow_range_factor: 1.0,
            system_curve_points: 20,
            strict_boundaries: false,
            checks: CheckOptions::default(),
        }
    }
}

/// Post-solve design-check thresholds. All optional; absent checks are
/// skipped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CheckOptions {
    pub max_velocity_m_s: Option<f64>,
    pub min_pressure_pa: Option<f64>,
    pub max_pressure_pa: Option<f64>,
    pub min_npsh_margin_m: Option<f64>,
}

impl ComponentKind {
    /// Node-like components collapse all their ports onto one solver node;
    /// link-like components become a solver link between two nodes.
    pub fn is_node_like(&self) -> bool {
        matches!(
            self,
            ComponentKind::Reservoir { .. }
                | ComponentKind::Tank { .. }
                | ComponentKind::Junction { .. }
                | ComponentKind::Sprinkler { .. }
                | ComponentKind::ReferenceNode { .. }
                | ComponentKind::Plug
                | ComponentKind::Branch { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Reservoir { .. } => "reservoir",
            ComponentKind::Tank { .. } => "tank",
            ComponentKind::Junction { .. } => "junction",
            ComponentKind::Pump { .. } => "pump",
            ComponentKind::Valve { .. } => "valve",
            ComponentKind::HeatExchanger { .. } => "heat_exchanger",
            ComponentKind::Strainer { .. } => "strainer",
            ComponentKind::Orifice { .. } => "orifice",
            ComponentKind::Sprinkler { .. } => "sprinkler",
            ComponentKind::ReferenceNode { .. } => "reference_node",
            ComponentKind::Plug => "plug",
            ComponentKind::Branch { .. } => "branch",
        }
    }
}

impl ComponentDef {
    /// Port elevation with the component elevation as fallback.
    pub fn port_elevation(&self, port_id: &str) -> f64 {
        self.ports
            .iter()
            .find(|p| p.id == port_id)
            .and_then(|p| p.elevation)
            .unwrap_or(self.elevation)
    }
}
