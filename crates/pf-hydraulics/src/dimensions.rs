//! Pipe material roughness and schedule dimension tables.

use crate::error::{HydraulicsError, HydraulicsResult};
use pf_core::units::{inch, Length};
use serde::{Deserialize, Serialize};

/// Pipe materials with tabulated absolute roughness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeMaterial {
    Steel,
    StainlessSteel,
    Copper,
    Pvc,
    CastIron,
}

impl PipeMaterial {
    /// Absolute roughness [m]. Commercial handbook values.
    pub fn roughness_m(&self) -> f64 {
        match self {
            PipeMaterial::Steel => 4.5e-5,
            PipeMaterial::StainlessSteel => 1.5e-5,
            PipeMaterial::Copper => 1.5e-6,
            PipeMaterial::Pvc => 1.5e-6,
            PipeMaterial::CastIron => 2.6e-4,
        }
    }
}

/// Supported pipe schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeSchedule {
    Sch40,
    Sch80,
}

impl PipeSchedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipeSchedule::Sch40 => "Sch 40",
            PipeSchedule::Sch80 => "Sch 80",
        }
    }
}

/// (nominal [in], ID Sch40 [in], ID Sch80 [in])
const PIPE_DIMENSIONS: &[(f64, f64, f64)] = &[
    (0.5, 0.622, 0.546),
    (0.75, 0.824, 0.742),
    (1.0, 1.049, 0.957),
    (1.25, 1.380, 1.278),
    (1.5, 1.610, 1.500),
    (2.0, 2.067, 1.939),
    (2.5, 2.469, 2.323),
    (3.0, 3.068, 2.900),
    (4.0, 4.026, 3.826),
    (6.0, 6.065, 5.761),
    (8.0, 7.981, 7.625),
    (10.0, 10.020, 9.562),
    (12.0, 11.938, 11.374),
];

/// Inner diameter for a nominal pipe size and schedule.
pub fn inner_diameter(nominal_in: f64, schedule: PipeSchedule) -> HydraulicsResult<Length> {
    for &(nominal, id40, id80) in PIPE_DIMENSIONS {
        if (nominal - nominal_in).abs() < 1e-9 {
            let id_in = match schedule {
                PipeSchedule::Sch40 => id40,
                PipeSchedule::Sch80 => id80,
            };
            return Ok(inch(id_in));
        }
    }
    Err(HydraulicsError::UnknownPipeSize {
        nominal_in,
        schedule: schedule.as_str(),
    })
}
