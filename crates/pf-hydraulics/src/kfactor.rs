//! Minor-loss K-factor resolution for fittings and valves.
//!
//! Resolution priority is strict:
//! 1. user-supplied `k_override`, used verbatim;
//! 2. equivalent-length (L/D) correlation: `K = f * (L/D)`;
//! 3. generic size-independent reference K;
//! 4. otherwise `MissingKFactor` naming the fitting. Never zero by default.

use crate::error::{HydraulicsError, HydraulicsResult};
use serde::{Deserialize, Serialize};

/// Closed set of tabulated fitting types, plus an escape hatch for
/// project-specific fittings that must carry their own K.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittingKind {
    Elbow90,
    Elbow90LongRadius,
    Elbow45,
    TeeThrough,
    TeeBranch,
    GateValve,
    GlobeValve,
    AngleValve,
    BallValve,
    ButterflyValve,
    SwingCheckValve,
    LiftCheckValve,
    Entrance,
    Exit,
    Coupling,
    Union,
    /// Not in any table; requires a `k_override`.
    Other(String),
}

impl FittingKind {
    pub fn label(&self) -> String {
        match self {
            FittingKind::Elbow90 => "90° elbow".into(),
            FittingKind::Elbow90LongRadius => "90° long-radius elbow".into(),
            FittingKind::Elbow45 => "45° elbow".into(),
            FittingKind::TeeThrough => "tee (run)".into(),
            FittingKind::TeeBranch => "tee (branch)".into(),
            FittingKind::GateValve => "gate valve".into(),
            FittingKind::GlobeValve => "globe valve".into(),
            FittingKind::AngleValve => "angle valve".into(),
            FittingKind::BallValve => "ball valve".into(),
            FittingKind::ButterflyValve => "butterfly valve".into(),
            FittingKind::SwingCheckValve => "swing check valve".into(),
            FittingKind::LiftCheckValve => "lift check valve".into(),
            FittingKind::Entrance => "pipe entrance".into(),
            FittingKind::Exit => "pipe exit".into(),
            FittingKind::Coupling => "coupling".into(),
            FittingKind::Union => "union".into(),
            FittingKind::Other(name) => name.clone(),
        }
    }

    /// Equivalent-length ratio L/D for the standard correlation table.
    fn equivalent_length_ratio(&self) -> Option<f64> {
        match self {
            FittingKind::Elbow90 => Some(30.0),
            FittingKind::Elbow90LongRadius => Some(16.0),
            FittingKind::Elbow45 => Some(16.0),
            FittingKind::TeeThrough => Some(20.0),
            FittingKind::TeeBranch => Some(60.0),
            FittingKind::GateValve => Some(8.0),
            FittingKind::GlobeValve => Some(340.0),
            FittingKind::AngleValve => Some(150.0),
            FittingKind::BallValve => Some(3.0),
            FittingKind::ButterflyValve => Some(45.0),
            FittingKind::SwingCheckValve => Some(100.0),
            FittingKind::LiftCheckValve => Some(600.0),
            _ => None,
        }
    }

    /// Generic size-independent reference K-factors.
    fn generic_k(&self) -> Option<f64> {
        match self {
            FittingKind::Entrance => Some(0.5),
            FittingKind::Exit => Some(1.0),
            FittingKind::Coupling => Some(0.04),
            FittingKind::Union => Some(0.04),
            _ => None,
        }
    }
}

/// A fitting installed on a piping segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitting {
    pub kind: FittingKind,
    pub quantity: u32,
    /// User override: takes priority over every table.
    #[serde(default)]
    pub k_override: Option<f64>,
}

impl Fitting {
    pub fn new(kind: FittingKind, quantity: u32) -> Self {
        Self {
            kind,
            quantity,
            k_override: None,
        }
    }

    pub fn with_override(kind: FittingKind, quantity: u32, k: f64) -> Self {
        Self {
            kind,
            quantity,
            k_override: Some(k),
        }
    }
}

/// Resolve the K-factor for one fitting.
///
/// `friction_factor` is the Darcy friction factor of the host pipe, needed
/// for L/D-based entries.
pub fn resolve_k(fitting: &Fitting, friction_factor: f64) -> HydraulicsResult<f64> {
    if let Some(k) = fitting.k_override {
        if !k.is_finite() || k < 0.0 {
            return Err(HydraulicsError::NonPhysical {
                what: "K-factor override must be non-negative and finite",
            });
        }
        return Ok(k);
    }

    if let Some(ld) = fitting.kind.equivalent_length_ratio() {
        return Ok(friction_factor * ld);
    }

    if let Some(k) = fitting.kind.generic_k() {
        return Ok(k);
    }

    Err(HydraulicsError::MissingKFactor {
        fitting: fitting.kind.label(),
    })
}

/// Total minor-loss K for a segment: `sum(quantity * K)` over all fittings.
pub fn segment_minor_k(fittings: &[Fitting], friction_factor: f64) -> HydraulicsResult<f64> {
    let mut total = 0.0;
    for fitting in fittings {
        total += f64::from(fitting.quantity) * resolve_k(fitting, friction_factor)?;
    }
    Ok(total)
}
