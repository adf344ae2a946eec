//! Failure-mode behavior: hard errors, diagnosed non-convergence, and
//! warnings on otherwise valid solves.

mod common;

use approx::assert_relative_eq;
use pf_hydraulics::{FittingKind, HydraulicsError};
use pf_model::{
    BranchStyle, ComponentDef, ComponentKind, CurvePointDef, FittingDef, PortDirection,
    Project, PumpCurveDef, ValveKind,
};
use pf_results::{Severity, WarningCategory};
use pf_solver::{solve, SolverError};

fn reservoir(id: &str, surface_level: f64, ports: Vec<pf_model::PortDef>) -> ComponentDef {
    common::component(id, ComponentKind::Reservoir { surface_level }, 0.0, ports)
}

#[test]
fn unresolvable_fitting_is_a_hard_error() {
    let components = vec![
        reservoir("src", 20.0, vec![common::port("out", PortDirection::Outlet)]),
        common::component(
            "load",
            ComponentKind::Junction { demand: 0.004 },
            0.0,
            vec![common::port("in", PortDirection::Inlet)],
        ),
    ];
    let mut connection = common::connection("c1", ("src", "out"), ("load", "in"), 50.0);
    connection.piping.fittings.push(FittingDef {
        kind: FittingKind::Other("venturi".into()),
        quantity: 1,
        k_factor_override: None,
    });
    let project = common::project(
        components,
        vec![connection],
        common::water_at(20.0),
        common::tight_options(),
    );

    let err = solve(&project).unwrap_err();
    assert!(matches!(
        err,
        SolverError::Hydraulics(HydraulicsError::MissingKFactor { .. })
    ));
    assert!(err.to_string().contains("venturi"));
}

#[test]
fn undersized_pump_reports_no_intersection() {
    // 20 m of static lift against a pump with 5 m shutoff head.
    let components = vec![
        reservoir("lower", 1.0, vec![common::port("out", PortDirection::Outlet)]),
        common::component(
            "p1",
            ComponentKind::Pump {
                curve_id: "small".into(),
                speed_ratio: 1.0,
            },
            0.0,
            vec![
                common::port("in", PortDirection::Inlet),
                common::port("out", PortDirection::Outlet),
            ],
        ),
        reservoir("upper", 21.0, vec![common::port("in", PortDirection::Inlet)]),
    ];
    let connections = vec![
        common::connection("suction", ("lower", "out"), ("p1", "in"), 10.0),
        common::connection("discharge", ("p1", "out"), ("upper", "in"), 10.0),
    ];
    let mut project = common::project(
        components,
        connections,
        common::water_at(20.0),
        common::tight_options(),
    );
    project.pump_library.push(PumpCurveDef {
        id: "small".into(),
        name: "Small".into(),
        head_points: vec![
            CurvePointDef { flow: 0.00, value: 5.0 },
            CurvePointDef { flow: 0.01, value: 4.0 },
            CurvePointDef { flow: 0.02, value: 2.0 },
        ],
        efficiency_points: vec![],
        npshr_points: vec![],
        rated_speed_rpm: None,
    });

    let state = solve(&project).unwrap();
    assert!(!state.converged);
    assert!(state
        .warnings
        .iter()
        .any(|w| w.category == WarningCategory::Convergence && w.severity == Severity::Error));
    let diagnosis = state
        .warnings
        .iter()
        .find(|w| w.category == WarningCategory::NoIntersection)
        .unwrap();
    assert_eq!(diagnosis.severity, Severity::Error);
    assert_eq!(diagnosis.component_id.as_deref(), Some("p1"));
    assert!(diagnosis.message.contains("static head"));
}

fn tee() -> ComponentDef {
    common::component(
        "tee",
        ComponentKind::Branch {
            style: BranchStyle::Tee,
        },
        0.0,
        vec![
            common::port("in", PortDirection::Inlet),
            common::port("run", PortDirection::Outlet),
            common::port("branch", PortDirection::Outlet),
        ],
    )
}

fn load() -> ComponentDef {
    common::component(
        "load",
        ComponentKind::Junction { demand: 0.004 },
        0.0,
        vec![common::port("in", PortDirection::Inlet)],
    )
}

#[test]
fn closed_valve_isolates_its_branch() {
    let with_closed_branch = {
        let components = vec![
            reservoir("src", 20.0, vec![common::port("out", PortDirection::Outlet)]),
            tee(),
            load(),
            common::component(
                "v1",
                ComponentKind::Valve {
                    kind: ValveKind::Gate,
                    position: 0.0,
                    k_open: None,
                },
                0.0,
                vec![
                    common::port("in", PortDirection::Inlet),
                    common::port("out", PortDirection::Outlet),
                ],
            ),
            reservoir("alt", 5.0, vec![common::port("in", PortDirection::Inlet)]),
        ];
        let connections = vec![
            common::connection("c1", ("src", "out"), ("tee", "in"), 30.0),
            common::connection("c2", ("tee", "run"), ("load", "in"), 30.0),
            common::connection("c3", ("tee", "branch"), ("v1", "in"), 10.0),
            common::connection("c4", ("v1", "out"), ("alt", "in"), 10.0),
        ];
        common::project(components, connections, common::water_at(20.0), common::tight_options())
    };
    let without_branch = {
        let components = vec![
            reservoir("src", 20.0, vec![common::port("out", PortDirection::Outlet)]),
            tee(),
            load(),
        ];
        let connections = vec![
            common::connection("c1", ("src", "out"), ("tee", "in"), 30.0),
            common::connection("c2", ("tee", "run"), ("load", "in"), 30.0),
        ];
        common::project(components, connections, common::water_at(20.0), common::tight_options())
    };

    let closed = solve(&with_closed_branch).unwrap();
    let reference = solve(&without_branch).unwrap();
    assert!(closed.converged && reference.converged);

    // The closed branch carries only seepage-scale flow.
    assert!(closed.link("c3").unwrap().flow_m3_s.abs() < 1e-6);
    assert!(closed.link("c4").unwrap().flow_m3_s.abs() < 1e-6);
    assert_relative_eq!(closed.link("c2").unwrap().flow_m3_s, 0.004, epsilon = 1e-7);

    // The main path behaves as if the branch were not there.
    let h_closed = closed.node("load").unwrap().hgl_m;
    let h_reference = reference.node("load").unwrap().hgl_m;
    assert_relative_eq!(h_closed, h_reference, epsilon = 1e-4);
}

#[test]
fn reverse_flow_is_flagged_but_solved() {
    // The connection is authored low-to-high; gravity drives it the other way.
    let components = vec![
        reservoir("low", 2.0, vec![common::port("out", PortDirection::Outlet)]),
        reservoir("high", 10.0, vec![common::port("in", PortDirection::Inlet)]),
    ];
    let connections = vec![common::connection("c1", ("low", "out"), ("high", "in"), 10.0)];
    let project = common::project(
        components,
        connections,
        common::water_at(20.0),
        common::tight_options(),
    );

    let state = solve(&project).unwrap();
    assert!(state.converged);
    assert!(state.link("c1").unwrap().flow_m3_s < 0.0);
    let warning = state
        .warnings
        .iter()
        .find(|w| w.category == WarningCategory::ReverseFlow)
        .unwrap();
    assert_eq!(warning.severity, Severity::Info);
    assert_eq!(warning.component_id.as_deref(), Some("c1"));
}

fn empty_tank_project(strict: bool) -> Project {
    let components = vec![
        common::component(
            "t1",
            ComponentKind::Tank {
                level: 0.1,
                min_level: 0.5,
                diameter: 2.0,
            },
            0.0,
            vec![common::port("out", PortDirection::Outlet)],
        ),
        common::component(
            "load",
            ComponentKind::Junction { demand: 0.001 },
            0.0,
            vec![common::port("in", PortDirection::Inlet)],
        ),
    ];
    let connections = vec![common::connection("c1", ("t1", "out"), ("load", "in"), 10.0)];
    let mut project = common::project(
        components,
        connections,
        common::water_at(20.0),
        common::tight_options(),
    );
    project.solver_options.strict_boundaries = strict;
    project
}

#[test]
fn empty_tank_errors_under_strict_boundaries() {
    let err = solve(&empty_tank_project(true)).unwrap_err();
    assert!(matches!(err, SolverError::EmptyBoundary { .. }));
    assert!(err.to_string().contains("t1"));
}

#[test]
fn empty_tank_warns_when_lenient() {
    let state = solve(&empty_tank_project(false)).unwrap();
    assert!(state.converged);
    let warning = state
        .warnings
        .iter()
        .find(|w| w.category == WarningCategory::LowTankLevel)
        .unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.component_id.as_deref(), Some("t1"));
}
