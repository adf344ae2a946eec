//! pf-solver: steady-state hydraulic network solver.
//!
//! Compiles a `pf-model` project into a node/link network, solves the
//! coupled mass and energy balances with damped Newton iteration, and
//! reports a `pf-results` solved state with per-node, per-link, and
//! per-pump results plus design-check warnings.

pub mod checks;
pub mod compile;
pub mod error;
pub mod extract;
pub mod init;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod solve;
pub mod system_curve;

pub use compile::{compile, Compiled, LinkData, LinkKind, NodeClass, NodeData, K_CLOSED};
pub use error::{SolverError, SolverResult};
pub use newton::{newton_solve, NewtonConfig, NewtonOutcome};
pub use problem::SteadyProblem;
pub use solve::solve;
