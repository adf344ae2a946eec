//! Model-to-network compilation.
//!
//! Node-like components (reservoir, tank, junction, sprinkler, reference
//! node, plug, branch) collapse all their ports onto one solver node.
//! Link-like components (pump, valve, heat exchanger, strainer, orifice)
//! get one solver node per port and a link between them; every connection's
//! piping becomes a link of its own. Positive flow runs in the link's
//! defined direction.

use std::collections::HashMap;

use pf_core::units::constants::G0_MPS2;
use pf_fluids::FluidProperties;
use pf_graph::{Network, NetworkBuilder};
use pf_hydraulics::{inner_diameter, resolve_k, Fitting, PipeSchedule, PipeSegment};
use pf_model::{
    ComponentDef, ComponentKind, EndpointRef, PortDirection, Project, PumpCurveDef,
    ReferenceIdeal, SolverOptions,
};
use pf_pumps::{CurveSample, LinearInterpolant, PumpCurve};
use pf_results::{Severity, Warning, WarningCategory};

use crate::error::{SolverError, SolverResult};

/// Hydraulic resistance of a fully closed valve. Large enough to pin the
/// flow to zero at solver tolerance, small enough to keep the Jacobian
/// solvable; tested equivalent to removing the edge.
pub const K_CLOSED: f64 = 1e10;

/// Nominal fully turbulent friction factor for flow-independent K
/// resolution (valve tables, pre-solve fitting checks).
const F_NOMINAL: f64 = 0.02;

/// One solver node with its boundary classification.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// External id: the component id, or `component.port` for the port
    /// nodes of link-like components.
    pub name: String,
    pub elevation_m: f64,
    pub class: NodeClass,
}

#[derive(Debug, Clone)]
pub enum NodeClass {
    /// Head is known; no mass balance is enforced here.
    FixedHead { head_m: f64 },
    /// Head unknown; mass balance with a fixed demand (m³/s, withdrawal
    /// positive).
    Free { demand_m3_s: f64 },
    /// Head unknown; mass balance with a pressure-dependent emitter
    /// withdrawal `q = k·√(H − z)`.
    Emitter { coeff: f64 },
    /// Head unknown but pinned to a flow-dependent boundary relation
    /// `H = z + head(q_withdrawn)`; no mass balance is enforced here.
    ReferenceCurve { head_m: LinearInterpolant },
}

impl NodeClass {
    pub fn is_fixed(&self) -> bool {
        matches!(self, NodeClass::FixedHead { .. })
    }
}

/// One solver link with its hydraulic relation.
#[derive(Debug, Clone)]
pub struct LinkData {
    /// Connection id, or the component id for link-like components.
    pub name: String,
    /// Present when this link is a link-like component.
    pub component_id: Option<String>,
    pub kind: LinkKind,
}

#[derive(Debug, Clone)]
pub enum LinkKind {
    Pipe(PipeSegment),
    Pump { curve: PumpCurve, speed_ratio: f64 },
    /// Fixed-K element: `h = K·v·|v| / 2g` referred to `diameter_m`.
    Resistance { k: f64, diameter_m: f64 },
}

impl LinkKind {
    pub fn area_m2(&self) -> Option<f64> {
        match self {
            LinkKind::Pipe(seg) => Some(seg.area_m2()),
            LinkKind::Resistance { diameter_m, .. } => {
                Some(std::f64::consts::PI * diameter_m * diameter_m / 4.0)
            }
            LinkKind::Pump { .. } => None,
        }
    }
}

/// Compiled solve-ready form of a project. Node and link order matches the
/// network's index order.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub network: Network,
    pub nodes: Vec<NodeData>,
    pub links: Vec<LinkData>,
    /// Link indices of pump links, in network order.
    pub pumps: Vec<usize>,
    /// Warnings gathered during compilation (lenient boundary handling).
    pub warnings: Vec<Warning>,
}

pub fn compile(
    project: &Project,
    fluid: &FluidProperties,
    options: &SolverOptions,
) -> SolverResult<Compiled> {
    let rho_g = fluid.density.value * G0_MPS2;
    let mut builder = NetworkBuilder::new();
    let mut nodes: Vec<NodeData> = Vec::new();
    let mut links: Vec<LinkData> = Vec::new();
    let mut link_endpoints: Vec<(pf_core::NodeId, pf_core::NodeId)> = Vec::new();
    let mut warnings: Vec<Warning> = Vec::new();

    // (component, port) -> solver node. Node-like components map every
    // port to the same node.
    let mut port_nodes: HashMap<(String, String), pf_core::NodeId> = HashMap::new();

    for component in &project.components {
        if component.kind.is_node_like() {
            let class = node_class(component, rho_g, options, &mut warnings)?;
            let id = builder.add_node(component.id.clone());
            nodes.push(NodeData {
                name: component.id.clone(),
                elevation_m: component.elevation,
                class,
            });
            for port in &component.ports {
                port_nodes.insert((component.id.clone(), port.id.clone()), id);
            }
        } else {
            let (up_port, dn_port) = component_ports(component)?;
            let up_name = format!("{}.{}", component.id, up_port);
            let dn_name = format!("{}.{}", component.id, dn_port);
            let up = builder.add_node(up_name.clone());
            nodes.push(NodeData {
                name: up_name,
                elevation_m: component.port_elevation(&up_port),
                class: NodeClass::Free { demand_m3_s: 0.0 },
            });
            let dn = builder.add_node(dn_name.clone());
            nodes.push(NodeData {
                name: dn_name,
                elevation_m: component.port_elevation(&dn_port),
                class: NodeClass::Free { demand_m3_s: 0.0 },
            });
            port_nodes.insert((component.id.clone(), up_port), up);
            port_nodes.insert((component.id.clone(), dn_port), dn);

            let kind = link_kind(component, project)?;
            builder.add_link(component.id.clone(), up, dn);
            link_endpoints.push((up, dn));
            links.push(LinkData {
                name: component.id.clone(),
                component_id: Some(component.id.clone()),
                kind,
            });
        }
    }

    for connection in &project.connections {
        let up = endpoint_node(&port_nodes, &connection.from, &connection.id)?;
        let dn = endpoint_node(&port_nodes, &connection.to, &connection.id)?;
        let segment = pipe_segment(connection)?;
        segment.check_fittings_resolvable()?;
        builder.add_link(connection.id.clone(), up, dn);
        link_endpoints.push((up, dn));
        links.push(LinkData {
            name: connection.id.clone(),
            component_id: None,
            kind: LinkKind::Pipe(segment),
        });
    }

    if links.is_empty() {
        return Err(SolverError::topology("network has no connections"));
    }

    let network = builder.build()?;

    check_boundaries(&network, &nodes)?;

    let pumps = links
        .iter()
        .enumerate()
        .filter(|(_, l)| matches!(l.kind, LinkKind::Pump { .. }))
        .map(|(i, _)| i)
        .collect();

    Ok(Compiled {
        network,
        nodes,
        links,
        pumps,
        warnings,
    })
}

fn node_class(
    component: &ComponentDef,
    rho_g: f64,
    options: &SolverOptions,
    warnings: &mut Vec<Warning>,
) -> SolverResult<NodeClass> {
    let z = component.elevation;
    match &component.kind {
        ComponentKind::Reservoir { surface_level } => {
            low_level(component, *surface_level, 0.0, options, warnings)?;
            Ok(NodeClass::FixedHead {
                head_m: z + surface_level,
            })
        }
        ComponentKind::Tank {
            level, min_level, ..
        } => {
            low_level(component, *level, *min_level, options, warnings)?;
            Ok(NodeClass::FixedHead { head_m: z + level })
        }
        ComponentKind::Junction { demand } => Ok(NodeClass::Free {
            demand_m3_s: *demand,
        }),
        ComponentKind::Sprinkler { discharge_coeff } => Ok(NodeClass::Emitter {
            coeff: *discharge_coeff,
        }),
        ComponentKind::ReferenceNode { ideal } => match ideal {
            ReferenceIdeal::Pressure { pressure } => Ok(NodeClass::FixedHead {
                head_m: z + pressure / rho_g,
            }),
            ReferenceIdeal::Curve { points } => {
                let pairs: Vec<(f64, f64)> =
                    points.iter().map(|p| (p.flow, z + p.value / rho_g)).collect();
                Ok(NodeClass::ReferenceCurve {
                    head_m: LinearInterpolant::new(&pairs)?,
                })
            }
        },
        ComponentKind::Plug | ComponentKind::Branch { .. } => {
            Ok(NodeClass::Free { demand_m3_s: 0.0 })
        }
        other => Err(SolverError::topology(format!(
            "component {} ({}) is not node-like",
            component.id,
            other.label()
        ))),
    }
}

fn low_level(
    component: &ComponentDef,
    level: f64,
    min_level: f64,
    options: &SolverOptions,
    warnings: &mut Vec<Warning>,
) -> SolverResult<()> {
    if level > min_level {
        return Ok(());
    }
    if options.strict_boundaries {
        return Err(SolverError::EmptyBoundary {
            component_id: component.id.clone(),
        });
    }
    warnings.push(Warning::for_component(
        WarningCategory::LowTankLevel,
        Severity::Warning,
        component.id.clone(),
        format!(
            "{} level {level} m is at or below minimum {min_level} m",
            component.kind.label()
        ),
    ));
    Ok(())
}

/// Pick the upstream and downstream port of a two-port component. The
/// inlet-direction port is upstream when directions are given.
fn component_ports(component: &ComponentDef) -> SolverResult<(String, String)> {
    if component.ports.len() != 2 {
        return Err(SolverError::topology(format!(
            "component {} ({}) must have exactly 2 ports, has {}",
            component.id,
            component.kind.label(),
            component.ports.len()
        )));
    }
    let (a, b) = (&component.ports[0], &component.ports[1]);
    if a.direction == PortDirection::Outlet && b.direction == PortDirection::Inlet {
        Ok((b.id.clone(), a.id.clone()))
    } else {
        Ok((a.id.clone(), b.id.clone()))
    }
}

fn endpoint_node(
    port_nodes: &HashMap<(String, String), pf_core::NodeId>,
    endpoint: &EndpointRef,
    connection_id: &str,
) -> SolverResult<pf_core::NodeId> {
    port_nodes
        .get(&(endpoint.component.clone(), endpoint.port.clone()))
        .copied()
        .ok_or_else(|| {
            SolverError::topology(format!(
                "connection {connection_id} references unknown port {}.{}",
                endpoint.component, endpoint.port
            ))
        })
}

fn pipe_segment(connection: &pf_model::ConnectionDef) -> SolverResult<PipeSegment> {
    let piping = &connection.piping;
    let diameter = inner_diameter(piping.nominal_diameter, piping.schedule)?;
    let roughness = piping
        .roughness_override
        .unwrap_or_else(|| piping.material.roughness_m());
    let fittings: Vec<Fitting> = piping.fittings.iter().map(|f| f.to_fitting()).collect();
    Ok(PipeSegment::new(
        piping.length,
        diameter.value,
        roughness,
        fittings,
    ))
}

fn link_kind(component: &ComponentDef, project: &Project) -> SolverResult<LinkKind> {
    let diameter = port_diameter(component)?;
    match &component.kind {
        ComponentKind::Pump {
            curve_id,
            speed_ratio,
        } => {
            let def = project
                .pump_library
                .iter()
                .find(|c| &c.id == curve_id)
                .ok_or_else(|| {
                    SolverError::topology(format!(
                        "pump {} references unknown curve {curve_id}",
                        component.id
                    ))
                })?;
            Ok(LinkKind::Pump {
                curve: build_pump_curve(def)?,
                speed_ratio: *speed_ratio,
            })
        }
        ComponentKind::Valve {
            kind,
            position,
            k_open,
        } => {
            let open_k = match k_open {
                Some(k) => *k,
                None => resolve_k(&Fitting::new(kind.fitting_kind(), 1), F_NOMINAL)?,
            };
            let k = if *position <= 0.0 {
                K_CLOSED
            } else {
                (open_k / (position * position)).min(K_CLOSED)
            };
            Ok(LinkKind::Resistance {
                k,
                diameter_m: diameter,
            })
        }
        ComponentKind::HeatExchanger { k_factor } | ComponentKind::Strainer { k_factor } => {
            Ok(LinkKind::Resistance {
                k: *k_factor,
                diameter_m: diameter,
            })
        }
        ComponentKind::Orifice {
            bore_diameter,
            discharge_coeff,
        } => {
            let beta = bore_diameter / diameter;
            if beta <= 0.0 || beta >= 1.0 {
                return Err(SolverError::topology(format!(
                    "orifice {} bore {bore_diameter} m must be smaller than the pipe bore {diameter} m",
                    component.id
                )));
            }
            // K referred to pipe velocity.
            let beta4 = beta.powi(4);
            let k = (1.0 - beta4) / (discharge_coeff * discharge_coeff * beta4);
            Ok(LinkKind::Resistance {
                k,
                diameter_m: diameter,
            })
        }
        other => Err(SolverError::topology(format!(
            "component {} ({}) is not link-like",
            component.id,
            other.label()
        ))),
    }
}

/// Flow diameter for a link-like component, from its first port's nominal
/// size at schedule 40.
fn port_diameter(component: &ComponentDef) -> SolverResult<f64> {
    let port = component.ports.first().ok_or_else(|| {
        SolverError::topology(format!("component {} has no ports", component.id))
    })?;
    Ok(inner_diameter(port.nominal_size, PipeSchedule::Sch40)?.value)
}

pub fn build_pump_curve(def: &PumpCurveDef) -> SolverResult<PumpCurve> {
    let to_samples = |points: &[pf_model::CurvePointDef]| -> Vec<CurveSample> {
        points
            .iter()
            .map(|p| CurveSample::new(p.flow, p.value))
            .collect()
    };
    let head = to_samples(&def.head_points);
    let efficiency = (!def.efficiency_points.is_empty()).then(|| to_samples(&def.efficiency_points));
    let npshr = (!def.npshr_points.is_empty()).then(|| to_samples(&def.npshr_points));
    Ok(PumpCurve::new(
        &head,
        efficiency.as_deref(),
        npshr.as_deref(),
    )?)
}

/// Every connected part of the network must contain a head reference,
/// otherwise its heads are undetermined.
fn check_boundaries(network: &Network, nodes: &[NodeData]) -> SolverResult<()> {
    let n = network.nodes().len();
    let mut visited = vec![false; n];
    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(i) = stack.pop() {
            component.push(i);
            let id = pf_core::NodeId::from_index(i as u32);
            for &(link_id, _) in network.node_links(id) {
                if let Some(next) = network.opposite(link_id, id) {
                    let j = next.index() as usize;
                    if !visited[j] {
                        visited[j] = true;
                        stack.push(j);
                    }
                }
            }
        }
        let anchored = component.iter().any(|&i| {
            matches!(
                nodes[i].class,
                NodeClass::FixedHead { .. } | NodeClass::ReferenceCurve { .. }
            )
        });
        if !anchored {
            return Err(SolverError::NoBoundary {
                component_id: nodes[component[0]].name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_model::{
        ConnectionDef, EndpointRef, FluidDef, FluidKindDef, PipingSegmentDef, PortDef,
        UnitSystem, ValveKind,
    };

    fn water() -> FluidProperties {
        pf_fluids::resolve(&pf_fluids::FluidSpec::water(pf_core::units::celsius(20.0))).unwrap()
    }

    fn port(id: &str, direction: PortDirection) -> PortDef {
        PortDef {
            id: id.into(),
            nominal_size: 4.0,
            direction,
            elevation: None,
        }
    }

    fn piping(length: f64) -> PipingSegmentDef {
        PipingSegmentDef {
            material: pf_hydraulics::PipeMaterial::Steel,
            nominal_diameter: 4.0,
            schedule: PipeSchedule::Sch40,
            length,
            roughness_override: None,
            fittings: vec![],
        }
    }

    fn connection(id: &str, from: (&str, &str), to: (&str, &str)) -> ConnectionDef {
        ConnectionDef {
            id: id.into(),
            from: EndpointRef {
                component: from.0.into(),
                port: from.1.into(),
            },
            to: EndpointRef {
                component: to.0.into(),
                port: to.1.into(),
            },
            piping: piping(30.0),
        }
    }

    fn two_reservoir_valve_project() -> Project {
        Project {
            version: 1,
            name: "t".into(),
            unit_system: UnitSystem::Si,
            components: vec![
                ComponentDef {
                    id: "res_a".into(),
                    name: "A".into(),
                    kind: ComponentKind::Reservoir { surface_level: 10.0 },
                    elevation: 0.0,
                    ports: vec![port("out", PortDirection::Outlet)],
                },
                ComponentDef {
                    id: "v1".into(),
                    name: "Valve".into(),
                    kind: ComponentKind::Valve {
                        kind: ValveKind::Gate,
                        position: 1.0,
                        k_open: None,
                    },
                    elevation: 0.0,
                    ports: vec![
                        port("in", PortDirection::Inlet),
                        port("out", PortDirection::Outlet),
                    ],
                },
                ComponentDef {
                    id: "res_b".into(),
                    name: "B".into(),
                    kind: ComponentKind::Reservoir { surface_level: 2.0 },
                    elevation: 0.0,
                    ports: vec![port("in", PortDirection::Inlet)],
                },
            ],
            connections: vec![
                connection("c1", ("res_a", "out"), ("v1", "in")),
                connection("c2", ("v1", "out"), ("res_b", "in")),
            ],
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
    fn valve_becomes_two_nodes_and_a_link() {
        let project = two_reservoir_valve_project();
        let compiled = compile(&project, &water(), &project.solver_options).unwrap();
        // res_a, v1.in, v1.out, res_b
        assert_eq!(compiled.nodes.len(), 4);
        // valve link + two pipes
        assert_eq!(compiled.links.len(), 3);
        let valve = compiled
            .links
            .iter()
            .find(|l| l.component_id.as_deref() == Some("v1"))
            .unwrap();
        match &valve.kind {
            LinkKind::Resistance { k, .. } => {
                // Gate valve L/D = 8 at nominal f.
                assert!((*k - 8.0 * 0.02).abs() < 1e-12);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn closed_valve_gets_large_k() {
        let mut project = two_reservoir_valve_project();
        project.components[1].kind = ComponentKind::Valve {
            kind: ValveKind::Gate,
            position: 0.0,
            k_open: None,
        };
        let compiled = compile(&project, &water(), &project.solver_options).unwrap();
        let valve = compiled
            .links
            .iter()
            .find(|l| l.component_id.as_deref() == Some("v1"))
            .unwrap();
        assert!(matches!(&valve.kind, LinkKind::Resistance { k, .. } if *k == K_CLOSED));
    }

    #[test]
    fn unanchored_network_is_rejected() {
        let mut project = two_reservoir_valve_project();
        project.components[0].kind = ComponentKind::Junction { demand: 0.0 };
        project.components[2].kind = ComponentKind::Junction { demand: 0.0 };
        let err = compile(&project, &water(), &project.solver_options).unwrap_err();
        assert!(matches!(err, SolverError::NoBoundary { .. }));
    }

    #[test]
    fn empty_tank_strict_vs_lenient() {
        let mut project = two_reservoir_valve_project();
        project.components[0].kind = ComponentKind::Tank {
            level: 0.5,
            min_level: 0.5,
            diameter: 2.0,
        };
        let compiled = compile(&project, &water(), &project.solver_options).unwrap();
        assert_eq!(compiled.warnings.len(), 1);
        assert_eq!(compiled.warnings[0].category, WarningCategory::LowTankLevel);

        project.solver_options.strict_boundaries = true;
        let err = compile(&project, &water(), &project.solver_options).unwrap_err();
        assert!(matches!(err, SolverError::EmptyBoundary { .. }));
    }

    #[test]
    fn missing_fitting_k_fails_compilation() {
        let mut project = two_reservoir_valve_project();
        project.connections[0].piping.fittings.push(pf_model::FittingDef {
            kind: pf_hydraulics::FittingKind::Other("mystery".into()),
            quantity: 1,
            k_factor_override: None,
        });
        let err = compile(&project, &water(), &project.solver_options).unwrap_err();
        assert!(matches!(
            err,
            SolverError::Hydraulics(pf_hydraulics::HydraulicsError::MissingKFactor { .. })
        ));
    }
}
