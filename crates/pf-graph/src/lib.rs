//! pf-graph: network topology layer for pipeflow.
//!
//! Provides:
//! - Core network data structures (Node, Link, Network)
//! - Incremental network builder with validation
//! - Stable indexing for solver integration
//!
//! # Example
//!
//! ```
//! use pf_graph::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! let n1 = builder.add_node("Supply");
//! let n2 = builder.add_node("Demand");
//! let l1 = builder.add_link("Main", n1, n2);
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.nodes().len(), 2);
//! assert_eq!(network.links().len(), 1);
//! assert_eq!(network.link(l1).unwrap().upstream, n1);
//! ```

pub mod builder;
pub mod error;
pub mod indexing;
pub mod network;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use error::NetworkError;
pub use indexing::IndexMap;
pub use network::{Incidence, Link, Network, Node};
