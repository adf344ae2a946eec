//! US-customary to SI normalization.
//!
//! Runs once at the model boundary; everything downstream of `to_si` is
//! SI (meters, m³/s, Pa, °C). Nominal pipe sizes stay in inches in both
//! systems because they are dimension-table keys.

use crate::schema::{
    ComponentKind, CurvePointDef, Project, ReferenceIdeal, UnitSystem,
};

const FT_TO_M: f64 = 0.3048;
const IN_TO_M: f64 = 0.0254;
const GPM_TO_M3_S: f64 = 6.309_019_64e-5;
const PSI_TO_PA: f64 = 6_894.757_293_168;
const FT_S_TO_M_S: f64 = FT_TO_M;

fn f_to_c(f: f64) -> f64 {
    (f - 32.0) / 1.8
}

/// Sprinkler emitter coefficient, GPM per √ft to m³/s per √m.
fn emitter_to_si(k: f64) -> f64 {
    k * GPM_TO_M3_S / FT_TO_M.sqrt()
}

fn flow_head_points_to_si(points: &mut [CurvePointDef]) {
    for p in points {
        p.flow *= GPM_TO_M3_S;
        p.value *= FT_TO_M;
    }
}

/// Normalize a project to SI. An SI project passes through untouched.
pub fn to_si(mut project: Project) -> Project {
    if project.unit_system == UnitSystem::Si {
        return project;
    }
    project.unit_system = UnitSystem::Si;

    for component in &mut project.components {
        component.elevation *= FT_TO_M;
        for port in &mut component.ports {
            if let Some(e) = &mut port.elevation {
                *e *= FT_TO_M;
            }
        }
        match &mut component.kind {
            ComponentKind::Reservoir { surface_level } => *surface_level *= FT_TO_M,
            ComponentKind::Tank {
                level,
                min_level,
                diameter,
            } => {
                *level *= FT_TO_M;
                *min_level *= FT_TO_M;
                *diameter *= FT_TO_M;
            }
            ComponentKind::Junction { demand } => *demand *= GPM_TO_M3_S,
            ComponentKind::Orifice { bore_diameter, .. } => *bore_diameter *= IN_TO_M,
            ComponentKind::Sprinkler { discharge_coeff } => {
                *discharge_coeff = emitter_to_si(*discharge_coeff)
            }
            ComponentKind::ReferenceNode { ideal } => match ideal {
                ReferenceIdeal::Pressure { pressure } => *pressure *= PSI_TO_PA,
                ReferenceIdeal::Curve { points } => {
                    for p in points.iter_mut() {
                        p.flow *= GPM_TO_M3_S;
                        p.value *= PSI_TO_PA;
                    }
                }
            },
            ComponentKind::Pump { .. }
            | ComponentKind::Valve { .. }
            | ComponentKind::HeatExchanger { .. }
            | ComponentKind::Strainer { .. }
            | ComponentKind::Plug
            | ComponentKind::Branch { .. } => {}
        }
    }

    for connection in &mut project.connections {
        let piping = &mut connection.piping;
        piping.length *= FT_TO_M;
        if let Some(r) = &mut piping.roughness_override {
            *r *= FT_TO_M;
        }
    }

    for curve in &mut project.pump_library {
        flow_head_points_to_si(&mut curve.head_points);
        flow_head_points_to_si(&mut curve.npshr_points);
        // Efficiency is percent vs flow; only the flow axis converts.
        for p in &mut curve.efficiency_points {
            p.flow *= GPM_TO_M3_S;
        }
    }

    project.fluid.temperature = f_to_c(project.fluid.temperature);

    let checks = &mut project.solver_options.checks;
    if let Some(v) = &mut checks.max_velocity_m_s {
        *v *= FT_S_TO_M_S;
    }
    if let Some(p) = &mut checks.min_pressure_pa {
        *p *= PSI_TO_PA;
    }
    if let Some(p) = &mut checks.max_pressure_pa {
        *p *= PSI_TO_PA;
    }
    if let Some(h) = &mut checks.min_npsh_margin_m {
        *h *= FT_TO_M;
    }

    project
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        ComponentDef, ConnectionDef, EndpointRef, FluidDef, FluidKindDef, PipingSegmentDef,
        PortDef, PortDirection, PumpCurveDef, SolverOptions,
    };
    use approx::assert_relative_eq;
    use pf_hydraulics::{PipeMaterial, PipeSchedule};

    fn us_project() -> Project {
        Project {
            version: 1,
            name: "us".into(),
            unit_system: UnitSystem::UsCustomary,
            components: vec![
                ComponentDef {
                    id: "res".into(),
                    name: "Reservoir".into(),
                    kind: ComponentKind::Reservoir {
                        surface_level: 10.0,
                    },
                    elevation: 100.0,
                    ports: vec![PortDef {
                        id: "out".into(),
                        nominal_size: 4.0,
                        direction: PortDirection::Outlet,
                        elevation: Some(99.0),
                    }],
                },
                ComponentDef {
                    id: "j".into(),
                    name: "Junction".into(),
                    kind: ComponentKind::Junction { demand: 100.0 },
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
                    length: 100.0,
                    roughness_override: None,
                    fittings: vec![],
                },
            }],
            pump_library: vec![PumpCurveDef {
                id: "p".into(),
                name: "Pump".into(),
                head_points: vec![
                    CurvePointDef {
                        flow: 0.0,
                        value: 100.0,
                    },
                    CurvePointDef {
                        flow: 200.0,
                        value: 60.0,
                    },
                ],
                efficiency_points: vec![],
                npshr_points: vec![],
                rated_speed_rpm: None,
            }],
            fluid: FluidDef {
                kind: FluidKindDef::Water,
                temperature: 68.0,
                concentration: None,
                custom: None,
            },
            solver_options: SolverOptions::default(),
        }
    }

    #[test]
    fn converts_us_lengths_flows_and_temperature() {
        let si = to_si(us_project());
        assert_eq!(si.unit_system, UnitSystem::Si);

        assert_relative_eq!(si.components[0].elevation, 30.48, epsilon = 1e-9);
        assert_relative_eq!(
            si.components[0].ports[0].elevation.unwrap(),
            99.0 * 0.3048,
            epsilon = 1e-9
        );
        match &si.components[1].kind {
            ComponentKind::Junction { demand } => {
                // 100 GPM
                assert_relative_eq!(*demand, 6.309_019_64e-3, epsilon = 1e-10);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_relative_eq!(si.connections[0].piping.length, 30.48, epsilon = 1e-9);
        // Nominal sizes are table keys and never convert.
        assert_relative_eq!(si.connections[0].piping.nominal_diameter, 4.0);

        // 68 °F is 20 °C.
        assert_relative_eq!(si.fluid.temperature, 20.0, epsilon = 1e-12);

        // Pump head points: GPM → m³/s, ft → m.
        let p = &si.pump_library[0].head_points[1];
        assert_relative_eq!(p.flow, 200.0 * 6.309_019_64e-5, epsilon = 1e-12);
        assert_relative_eq!(p.value, 60.0 * 0.3048, epsilon = 1e-12);
    }

    #[test]
    fn si_project_is_untouched() {
        let mut project = us_project();
        project.unit_system = UnitSystem::Si;
        let before = project.clone();
        assert_eq!(to_si(project), before);
    }
}
