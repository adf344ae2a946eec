//! Network validation logic.

use std::collections::HashSet;
use pf_core::{LinkId, PfResult};

use crate::error::NetworkError;
use crate::network::{Incidence, Link, Node};

/// Validate the network structure: all endpoint references exist and no
/// link connects a node to itself.
pub(crate) fn validate_structure(nodes: &[Node], links: &[Link]) -> PfResult<()> {
    // Link IDs are contiguous and match their indices by construction;
    // verify anyway so hand-built networks can't slip through.
    for (i, link) in links.iter().enumerate() {
        if link.id.index() as usize != i {
            return Err(NetworkError::InconsistentAdjacency {
                link: link.id,
                node: link.upstream,
            }
            .into());
        }
    }

    for link in links {
        for node in [link.upstream, link.downstream] {
            if node.index() as usize >= nodes.len() {
                return Err(NetworkError::InvalidNodeRef {
                    link: link.id,
                    node,
                }
                .into());
            }
        }

        if link.upstream == link.downstream {
            return Err(NetworkError::SelfLoop {
                link: link.id,
                node: link.upstream,
            }
            .into());
        }
    }

    Ok(())
}

/// Validate adjacency lists for consistency with the link table.
pub(crate) fn validate_adjacency(
    nodes: &[Node],
    links: &[Link],
    node_link_offsets: &[usize],
    node_links: &[(LinkId, Incidence)],
) -> PfResult<()> {
    if node_link_offsets.len() != nodes.len() + 1 {
        return Err(NetworkError::IdNotFound {
            what: "node_link_offsets",
        }
        .into());
    }

    for node in nodes {
        let idx = node.id.index() as usize;
        let start = node_link_offsets[idx];
        let end = node_link_offsets[idx + 1];

        for &(link_id, incidence) in &node_links[start..end] {
            if link_id.index() as usize >= links.len() {
                return Err(NetworkError::InconsistentAdjacency {
                    link: link_id,
                    node: node.id,
                }
                .into());
            }

            let link = &links[link_id.index() as usize];
            let expected = match incidence {
                Incidence::Out => link.upstream,
                Incidence::In => link.downstream,
            };
            if expected != node.id {
                return Err(NetworkError::InconsistentAdjacency {
                    link: link_id,
                    node: node.id,
                }
                .into());
            }
        }
    }

    // Every link end appears exactly once across all adjacency lists.
    let mut seen: HashSet<(LinkId, Incidence)> = HashSet::new();
    for &(link_id, incidence) in node_links {
        if !seen.insert((link_id, incidence)) {
            return Err(NetworkError::InconsistentAdjacency {
                link: link_id,
                node: links[link_id.index() as usize].upstream,
            }
            .into());
        }
    }
    for link in links {
        if !seen.contains(&(link.id, Incidence::Out)) || !seen.contains(&(link.id, Incidence::In))
        {
            return Err(NetworkError::InconsistentAdjacency {
                link: link.id,
                node: link.upstream,
            }
            .into());
        }
    }

    Ok(())
}
