//! Network-specific error types.

use pf_core::{LinkId, NodeId, PfError};

/// Network construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// A link refers to a node that doesn't exist.
    InvalidNodeRef { link: LinkId, node: NodeId },

    /// A link connects a node to itself.
    SelfLoop { link: LinkId, node: NodeId },

    /// Adjacency list is inconsistent (link in node's list but link doesn't
    /// touch that node).
    InconsistentAdjacency { link: LinkId, node: NodeId },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::InvalidNodeRef { link, node } => {
                write!(f, "Link {} refers to non-existent node {}", link, node)
            }
            NetworkError::SelfLoop { link, node } => {
                write!(f, "Link {} connects node {} to itself", link, node)
            }
            NetworkError::InconsistentAdjacency { link, node } => {
                write!(
                    f,
                    "Link {} in node {}'s adjacency list but doesn't touch that node",
                    link, node
                )
            }
            NetworkError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<NetworkError> for PfError {
    fn from(err: NetworkError) -> Self {
        PfError::Invariant {
            what: Box::leak(err.to_string().into_boxed_str()),
        }
    }
}
