//! Shared builders for solver integration tests.

use pf_hydraulics::{PipeMaterial, PipeSchedule};
use pf_model::{
    ComponentDef, ComponentKind, ConnectionDef, EndpointRef, FluidDef, FluidKindDef,
    PipingSegmentDef, PortDef, PortDirection, Project, SolverOptions, UnitSystem,
};

pub fn port(id: &str, direction: PortDirection) -> PortDef {
    PortDef {
        id: id.into(),
        nominal_size: 4.0,
        direction,
        elevation: None,
    }
}

pub fn component(id: &str, kind: ComponentKind, elevation: f64, ports: Vec<PortDef>) -> ComponentDef {
    ComponentDef {
        id: id.into(),
        name: id.into(),
        kind,
        elevation,
        ports,
    }
}

pub fn piping(length: f64) -> PipingSegmentDef {
    PipingSegmentDef {
        material: PipeMaterial::Steel,
        nominal_diameter: 4.0,
        schedule: PipeSchedule::Sch40,
        length,
        roughness_override: None,
        fittings: vec![],
    }
}

pub fn connection(id: &str, from: (&str, &str), to: (&str, &str), length: f64) -> ConnectionDef {
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
        piping: piping(length),
    }
}

pub fn water_at(temperature: f64) -> FluidDef {
    FluidDef {
        kind: FluidKindDef::Water,
        temperature,
        concentration: None,
        custom: None,
    }
}

pub fn tight_options() -> SolverOptions {
    SolverOptions {
        tolerance: 1e-8,
        ..SolverOptions::default()
    }
}

pub fn project(
    components: Vec<ComponentDef>,
    connections: Vec<ConnectionDef>,
    fluid: FluidDef,
    solver_options: SolverOptions,
) -> Project {
    Project {
        version: 1,
        name: "test".into(),
        unit_system: UnitSystem::Si,
        components,
        connections,
        pump_library: vec![],
        fluid,
        solver_options,
    }
}
