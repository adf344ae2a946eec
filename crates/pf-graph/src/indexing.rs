//! Stable indexing for solver integration.
//!
//! Provides bidirectional mappings between domain IDs (NodeId, LinkId) and
//! contiguous solver indices (0..N).

use pf_core::{LinkId, NodeId, PfResult};

use crate::error::NetworkError;
use crate::network::Network;

/// Index map providing stable, contiguous indices for network objects.
///
/// Used by the solver to map network entities to contiguous arrays/vectors.
/// Provides O(1) bidirectional lookup between IDs and indices.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of node IDs (index -> NodeId).
    node_ids: Vec<NodeId>,

    /// Contiguous list of link IDs (index -> LinkId).
    link_ids: Vec<LinkId>,

    /// Reverse lookup: NodeId -> index.
    /// Sized to max(NodeId.index) + 1; None if that ID doesn't exist.
    node_to_idx: Vec<Option<usize>>,

    /// Reverse lookup: LinkId -> index.
    link_to_idx: Vec<Option<usize>>,
}

impl IndexMap {
    /// Build an index map from a network.
    pub fn from_network(network: &Network) -> Self {
        // Forward maps are trivial: IDs are already contiguous by construction
        let node_ids: Vec<NodeId> = network.nodes().iter().map(|n| n.id).collect();
        let link_ids: Vec<LinkId> = network.links().iter().map(|l| l.id).collect();

        let max_node_idx = node_ids
            .iter()
            .map(|id| id.index() as usize)
            .max()
            .unwrap_or(0);
        let max_link_idx = link_ids
            .iter()
            .map(|id| id.index() as usize)
            .max()
            .unwrap_or(0);

        let mut node_to_idx = vec![None; max_node_idx + 1];
        let mut link_to_idx = vec![None; max_link_idx + 1];

        for (i, &id) in node_ids.iter().enumerate() {
            node_to_idx[id.index() as usize] = Some(i);
        }
        for (i, &id) in link_ids.iter().enumerate() {
            link_to_idx[id.index() as usize] = Some(i);
        }

        Self {
            node_ids,
            link_ids,
            node_to_idx,
            link_to_idx,
        }
    }

    /// Number of nodes in the index.
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of links in the index.
    pub fn link_count(&self) -> usize {
        self.link_ids.len()
    }

    /// Get the contiguous index for a node ID.
    pub fn node_idx(&self, id: NodeId) -> PfResult<usize> {
        let idx = id.index() as usize;
        self.node_to_idx
            .get(idx)
            .and_then(|&opt| opt)
            .ok_or_else(|| NetworkError::IdNotFound { what: "NodeId" }.into())
    }

    /// Get the contiguous index for a link ID.
    pub fn link_idx(&self, id: LinkId) -> PfResult<usize> {
        let idx = id.index() as usize;
        self.link_to_idx
            .get(idx)
            .and_then(|&opt| opt)
            .ok_or_else(|| NetworkError::IdNotFound { what: "LinkId" }.into())
    }

    /// Get the node ID for a contiguous index (panics if out of bounds).
    pub fn node_id(&self, i: usize) -> NodeId {
        self.node_ids[i]
    }

    /// Get the link ID for a contiguous index (panics if out of bounds).
    pub fn link_id(&self, i: usize) -> LinkId {
        self.link_ids[i]
    }

    /// Iterate over all node IDs in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Iterate over all link IDs in index order.
    pub fn link_ids(&self) -> &[LinkId] {
        &self.link_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;

    #[test]
    fn index_map_basic() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("N1");
        let n2 = builder.add_node("N2");
        let l1 = builder.add_link("L1", n1, n2);
        let network = builder.build().unwrap();

        let idx_map = IndexMap::from_network(&network);

        assert_eq!(idx_map.node_count(), 2);
        assert_eq!(idx_map.link_count(), 1);

        // Round-trip node IDs
        let i1 = idx_map.node_idx(n1).unwrap();
        assert_eq!(idx_map.node_id(i1), n1);

        // Round-trip link ID
        let il = idx_map.link_idx(l1).unwrap();
        assert_eq!(idx_map.link_id(il), l1);
    }

    #[test]
    fn index_map_invalid_id() {
        let mut builder = NetworkBuilder::new();
        builder.add_node("N1");
        let network = builder.build().unwrap();

        let idx_map = IndexMap::from_network(&network);

        let bogus_id = NodeId::from_index(999);
        assert!(idx_map.node_idx(bogus_id).is_err());
    }

    #[test]
    fn index_map_contiguous() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("N1");
        let n2 = builder.add_node("N2");
        let n3 = builder.add_node("N3");
        builder.add_link("L1", n1, n2);
        builder.add_link("L2", n2, n3);
        let network = builder.build().unwrap();

        let idx_map = IndexMap::from_network(&network);

        assert_eq!(idx_map.node_idx(n1).unwrap(), 0);
        assert_eq!(idx_map.node_idx(n2).unwrap(), 1);
        assert_eq!(idx_map.node_idx(n3).unwrap(), 2);

        assert_eq!(idx_map.node_id(0), n1);
        assert_eq!(idx_map.node_id(1), n2);
        assert_eq!(idx_map.node_id(2), n3);
    }
}
