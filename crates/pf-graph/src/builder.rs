//! Incremental network builder.

use std::collections::HashMap;
use pf_core::{LinkId, NodeId, PfResult};

use crate::network::{Incidence, Link, Network, Node};
use crate::validate;

/// Builder for constructing a network incrementally.
///
/// Use `add_node` and `add_link` to build up the topology, then call
/// `build()` to validate and freeze it into an immutable `Network`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
    next_node_id: u32,
    next_link_id: u32,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the network and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a link from an upstream node to a downstream node.
    ///
    /// The orientation fixes the positive-flow direction.
    pub fn add_link(
        &mut self,
        name: impl Into<String>,
        upstream: NodeId,
        downstream: NodeId,
    ) -> LinkId {
        let id = LinkId::from_index(self.next_link_id);
        self.next_link_id += 1;
        self.links.push(Link {
            id,
            name: name.into(),
            upstream,
            downstream,
        });
        id
    }

    /// Number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Build and validate the network, returning an immutable `Network`.
    pub fn build(self) -> PfResult<Network> {
        validate::validate_structure(&self.nodes, &self.links)?;

        let (node_link_offsets, node_links) = Self::build_adjacency(&self.nodes, &self.links);

        validate::validate_adjacency(&self.nodes, &self.links, &node_link_offsets, &node_links)?;

        Ok(Network {
            nodes: self.nodes,
            links: self.links,
            node_link_offsets,
            node_links,
        })
    }

    /// Build compact adjacency: for each node, the incident links and their
    /// orientation at that node.
    fn build_adjacency(
        nodes: &[Node],
        links: &[Link],
    ) -> (Vec<usize>, Vec<(LinkId, Incidence)>) {
        let mut node_to_links: HashMap<NodeId, Vec<(LinkId, Incidence)>> = HashMap::new();
        for link in links {
            node_to_links
                .entry(link.upstream)
                .or_default()
                .push((link.id, Incidence::Out));
            node_to_links
                .entry(link.downstream)
                .or_default()
                .push((link.id, Incidence::In));
        }

        // Sort each node's list for determinism
        for list in node_to_links.values_mut() {
            list.sort_by_key(|(id, _)| id.index());
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);

        for node in nodes {
            if let Some(list) = node_to_links.get(&node.id) {
                flat.extend_from_slice(list);
            }
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
