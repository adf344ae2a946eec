//! Project validation logic.
//!
//! Structural checks only: id uniqueness, reference integrity, value
//! sanity, pump curve shape. Hydraulic feasibility is the solver's job.

use crate::schema::{ComponentKind, Project, ReferenceIdeal, SCHEMA_VERSION};
use std::collections::{HashMap, HashSet};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported schema version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut component_ports: HashMap<&str, HashSet<&str>> = HashMap::new();
    for component in &project.components {
        if component_ports.contains_key(component.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.id.clone(),
                context: "components".to_string(),
            });
        }
        let mut ports = HashSet::new();
        for port in &component.ports {
            if !ports.insert(port.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    id: port.id.clone(),
                    context: format!("ports of {}", component.id),
                });
            }
            if port.nominal_size <= 0.0 {
                return Err(invalid(
                    &format!("{}.{}.nominal_size", component.id, port.id),
                    port.nominal_size,
                    "must be positive",
                ));
            }
        }
        component_ports.insert(component.id.as_str(), ports);
        validate_kind(project, component.id.as_str(), &component.kind)?;
    }

    let mut connection_ids = HashSet::new();
    let mut used_ports: HashSet<(&str, &str)> = HashSet::new();
    for connection in &project.connections {
        if !connection_ids.insert(connection.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: connection.id.clone(),
                context: "connections".to_string(),
            });
        }
        for end in [&connection.from, &connection.to] {
            let ports = component_ports.get(end.component.as_str()).ok_or_else(|| {
                ValidationError::MissingReference {
                    id: end.component.clone(),
                    context: format!("connection {}", connection.id),
                }
            })?;
            if !ports.contains(end.port.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: format!("{}.{}", end.component, end.port),
                    context: format!("connection {}", connection.id),
                });
            }
            if !used_ports.insert((end.component.as_str(), end.port.as_str())) {
                return Err(ValidationError::InvalidValue {
                    field: format!("{}.{}", end.component, end.port),
                    value: connection.id.clone(),
                    reason: "port used by more than one connection".to_string(),
                });
            }
        }
        if connection.from == connection.to {
            return Err(ValidationError::InvalidValue {
                field: format!("connection {}", connection.id),
                value: format!("{}.{}", connection.from.component, connection.from.port),
                reason: "both ends reference the same port".to_string(),
            });
        }
        let piping = &connection.piping;
        if piping.length <= 0.0 {
            return Err(invalid(
                &format!("connection {}.piping.length", connection.id),
                piping.length,
                "must be positive",
            ));
        }
        if let Some(r) = piping.roughness_override {
            if r < 0.0 {
                return Err(invalid(
                    &format!("connection {}.piping.roughness_override", connection.id),
                    r,
                    "must be non-negative",
                ));
            }
        }
        for fitting in &piping.fittings {
            if fitting.quantity == 0 {
                return Err(invalid(
                    &format!("connection {}.piping.fittings.quantity", connection.id),
                    0.0,
                    "must be at least 1",
                ));
            }
        }
    }

    let mut curve_ids = HashSet::new();
    for curve in &project.pump_library {
        if !curve_ids.insert(curve.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: curve.id.clone(),
                context: "pump_library".to_string(),
            });
        }
        validate_curve_points(&curve.id, "head_points", &curve.head_points, 2)?;
        if !curve.efficiency_points.is_empty() {
            validate_curve_points(&curve.id, "efficiency_points", &curve.efficiency_points, 2)?;
        }
        if !curve.npshr_points.is_empty() {
            validate_curve_points(&curve.id, "npshr_points", &curve.npshr_points, 2)?;
        }
    }

    let opts = &project.solver_options;
    if opts.max_iterations == 0 {
        return Err(invalid("solver_options.max_iterations", 0.0, "must be positive"));
    }
    if !(opts.tolerance > 0.0) {
        return Err(invalid(
            "solver_options.tolerance",
            opts.tolerance,
            "must be positive",
        ));
    }
    if opts.system_curve_points < 20 {
        return Err(invalid(
            "solver_options.system_curve_points",
            opts.system_curve_points as f64,
            "must be at least 20",
        ));
    }
    if !(opts.flow_range_factor > 0.0) {
        return Err(invalid(
            "solver_options.flow_range_factor",
            opts.flow_range_factor,
            "must be positive",
        ));
    }

    Ok(())
}

fn validate_kind(
    project: &Project,
    component_id: &str,
    kind: &ComponentKind,
) -> Result<(), ValidationError> {
    match kind {
        ComponentKind::Tank {
            level,
            min_level,
            diameter,
        } => {
            if *diameter <= 0.0 {
                return Err(invalid(
                    &format!("{component_id}.diameter"),
                    *diameter,
                    "must be positive",
                ));
            }
            if min_level > level {
                return Err(invalid(
                    &format!("{component_id}.min_level"),
                    *min_level,
                    "exceeds level",
                ));
            }
        }
        ComponentKind::Pump {
            curve_id,
            speed_ratio,
        } => {
            if !project.pump_library.iter().any(|c| &c.id == curve_id) {
                return Err(ValidationError::MissingReference {
                    id: curve_id.clone(),
                    context: format!("pump {component_id}"),
                });
            }
            if !(*speed_ratio > 0.0) {
                return Err(invalid(
                    &format!("{component_id}.speed_ratio"),
                    *speed_ratio,
                    "must be positive",
                ));
            }
        }
        ComponentKind::Valve { position, k_open, .. } => {
            if !(0.0..=1.0).contains(position) {
                return Err(invalid(
                    &format!("{component_id}.position"),
                    *position,
                    "must be within 0..=1",
                ));
            }
            if let Some(k) = k_open {
                if *k < 0.0 {
                    return Err(invalid(
                        &format!("{component_id}.k_open"),
                        *k,
                        "must be non-negative",
                    ));
                }
            }
        }
        ComponentKind::HeatExchanger { k_factor } | ComponentKind::Strainer { k_factor } => {
            if *k_factor < 0.0 {
                return Err(invalid(
                    &format!("{component_id}.k_factor"),
                    *k_factor,
                    "must be non-negative",
                ));
            }
        }
        ComponentKind::Orifice {
            bore_diameter,
            discharge_coeff,
        } => {
            if *bore_diameter <= 0.0 {
                return Err(invalid(
                    &format!("{component_id}.bore_diameter"),
                    *bore_diameter,
                    "must be positive",
                ));
            }
            if !(0.0..=1.0).contains(discharge_coeff) || *discharge_coeff == 0.0 {
                return Err(invalid(
                    &format!("{component_id}.discharge_coeff"),
                    *discharge_coeff,
                    "must be within (0, 1]",
                ));
            }
        }
        ComponentKind::Sprinkler { discharge_coeff } => {
            if !(*discharge_coeff > 0.0) {
                return Err(invalid(
                    &format!("{component_id}.discharge_coeff"),
                    *discharge_coeff,
                    "must be positive",
                ));
            }
        }
        ComponentKind::ReferenceNode { ideal } => {
            if let ReferenceIdeal::Curve { points } = ideal {
                if points.len() < 2 {
                    return Err(invalid(
                        &format!("{component_id}.ideal.points"),
                        points.len() as f64,
                        "curve needs at least 2 points",
                    ));
                }
                for pair in points.windows(2) {
                    if pair[1].flow <= pair[0].flow {
                        return Err(invalid(
                            &format!("{component_id}.ideal.points"),
                            pair[1].flow,
                            "flow values must be strictly increasing",
                        ));
                    }
                }
            }
        }
        ComponentKind::Reservoir { .. }
        | ComponentKind::Junction { .. }
        | ComponentKind::Plug
        | ComponentKind::Branch { .. } => {}
    }
    Ok(())
}

fn validate_curve_points(
    curve_id: &str,
    field: &str,
    points: &[crate::schema::CurvePointDef],
    min_len: usize,
) -> Result<(), ValidationError> {
    if points.len() < min_len {
        return Err(invalid(
            &format!("{curve_id}.{field}"),
            points.len() as f64,
            &format!("needs at least {min_len} points"),
        ));
    }
    for pair in points.windows(2) {
        if pair[1].flow <= pair[0].flow {
            return Err(invalid(
                &format!("{curve_id}.{field}"),
                pair[1].flow,
                "flow values must be strictly increasing",
            ));
        }
    }
    for p in points {
        if !p.flow.is_finite() || !p.value.is_finite() {
            return Err(invalid(
                &format!("{curve_id}.{field}"),
                p.value,
                "values must be finite",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use pf_hydraulics::{PipeMaterial, PipeSchedule};

    fn base_project() -> Project {
        Project {
            version: 1,
            name: "t".into(),
            unit_system: UnitSystem::Si,
            components: vec![
                ComponentDef {
                    id: "res".into(),
                    name: "Reservoir".into(),
                    kind: ComponentKind::Reservoir { surface_level: 5.0 },
                    elevation: 0.0,
                    ports: vec![PortDef {
                        id: "out".into(),
                        nominal_size: 4.0,
                        direction: PortDirection::Outlet,
                        elevation: None,
                    }],
                },
                ComponentDef {
                    id: "j".into(),
                    name: "Junction".into(),
                    kind: ComponentKind::Junction { demand: 0.005 },
                    elevation: 0.0,
                    ports: vec![PortDef {
                        id: "in".into(),
                        nominal_size: 4.0,
                        direction: PortDirection::Inlet,
                        elevation: None,
                    }],
                },
            ],
            connections: vec![ConnectionDef {
                id: "c1".into(),
                from: EndpointRef {
                    component: "res".into(),
                    port: "out".into(),
                },
                to: EndpointRef {
                    component: "j".into(),
                    port: "in".into(),
                },
                piping: PipingSegmentDef {
                    material: PipeMaterial::Steel,
                    nominal_diameter: 4.0,
                    schedule: PipeSchedule::Sch40,
                    length: 30.0,
                    roughness_override: None,
                    fittings: vec![],
                },
            }],
            pump_library: vec![],
            fluid: FluidDef {
                kind: FluidKindDef::Water,
                temperature: 20.0,
                concentration: None,
                custom: None,
            },
            solver_options: SolverOptions::default(),
        }
    }

    #[test]
    fn base_project_is_valid() {
        validate_project(&base_project()).unwrap();
    }

    #[test]
    fn duplicate_component_id_rejected() {
        let mut project = base_project();
        let dup = project.components[0].clone();
        project.components.push(dup);
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn dangling_connection_endpoint_rejected() {
        let mut project = base_project();
        project.connections[0].to.component = "ghost".into();
        let err = validate_project(&project).unwrap_err();
        assert!(matches!(err, ValidationError::MissingReference { ref id, .. } if id == "ghost"));
    }

    #[test]
    fn unknown_pump_curve_rejected() {
        let mut project = base_project();
        project.components[1].kind = ComponentKind::Pump {
            curve_id: "nope".into(),
            speed_ratio: 1.0,
        };
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn non_increasing_pump_curve_rejected() {
        let mut project = base_project();
        project.pump_library.push(PumpCurveDef {
            id: "p".into(),
            name: "P".into(),
            head_points: vec![
                CurvePointDef {
                    flow: 0.0,
                    value: 30.0,
                },
                CurvePointDef {
                    flow: 0.0,
                    value: 25.0,
                },
            ],
            efficiency_points: vec![],
            npshr_points: vec![],
            rated_speed_rpm: None,
        });
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn valve_position_out_of_range_rejected() {
        let mut project = base_project();
        project.components[1].kind = ComponentKind::Valve {
            kind: ValveKind::Gate,
            position: 1.5,
            k_open: None,
        };
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn port_reuse_rejected() {
        let mut project = base_project();
        let mut extra = project.connections[0].clone();
        extra.id = "c2".into();
        project.connections.push(extra);
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn newer_schema_version_rejected() {
        let mut project = base_project();
        project.version = SCHEMA_VERSION + 1;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }
}
