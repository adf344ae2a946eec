//! Core network data structures.

use pf_core::{LinkId, NodeId};

/// A node in the hydraulic network: a single point with one head value.
///
/// Nodes are minimal: they hold no hydraulic data, just an ID and a name
/// for human reference. Heads, elevations, and demands live in the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// A link carries flow between two nodes.
///
/// The upstream/downstream orientation fixes the sign convention: positive
/// flow runs upstream → downstream. Reverse flow is a negative value, not a
/// different edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub name: String,
    pub upstream: NodeId,
    pub downstream: NodeId,
}

/// How a link touches a node in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Incidence {
    /// The node is the link's upstream end (positive flow leaves the node).
    Out,
    /// The node is the link's downstream end (positive flow enters the node).
    In,
}

impl Incidence {
    /// Mass-balance sign for flow accounting at the node: +1 for inflow.
    pub fn sign(self) -> f64 {
        match self {
            Incidence::In => 1.0,
            Incidence::Out => -1.0,
        }
    }
}

/// The network: a validated, immutable collection of nodes and links.
///
/// Stores compact adjacency: for each node, which links are incident and
/// with what orientation. Optimized for solver indexing.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,

    /// Offsets for node->link adjacency: node i's links are in
    /// node_links[node_link_offsets[i]..node_link_offsets[i+1]].
    pub(crate) node_link_offsets: Vec<usize>,

    /// Flat list of (link, incidence) pairs, sorted by node then link ID
    /// for determinism.
    pub(crate) node_links: Vec<(LinkId, Incidence)>,
}

impl Network {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    /// Get a link by ID (returns None if ID out of bounds).
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index() as usize)
    }

    /// Links incident to a node, with their orientation at that node.
    pub fn node_links(&self, node_id: NodeId) -> &[(LinkId, Incidence)] {
        let idx = node_id.index() as usize;
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_link_offsets[idx];
        let end = self.node_link_offsets[idx + 1];
        &self.node_links[start..end]
    }

    /// The node at the other end of a link.
    pub fn opposite(&self, link_id: LinkId, node_id: NodeId) -> Option<NodeId> {
        let link = self.link(link_id)?;
        if link.upstream == node_id {
            Some(link.downstream)
        } else if link.downstream == node_id {
            Some(link.upstream)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Id;

    #[test]
    fn incidence_signs() {
        assert_eq!(Incidence::In.sign(), 1.0);
        assert_eq!(Incidence::Out.sign(), -1.0);
    }

    #[test]
    fn link_endpoints() {
        let link = Link {
            id: Id::from_index(0),
            name: "Test".into(),
            upstream: Id::from_index(3),
            downstream: Id::from_index(7),
        };
        assert_eq!(link.upstream.index(), 3);
        assert_eq!(link.downstream.index(), 7);
    }
}
