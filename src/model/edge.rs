//! Tree edges and the edge payload capability.

use crate::model::tree::{EdgeIndex, LinkIndex};
use crate::newick::broker::NewickBrokerElement;

/// Capability contract for edge payloads, mirroring
/// [NodeData](crate::model::NodeData).
pub trait EdgeData: Default + Clone + std::fmt::Debug {
    /// Builds the payload from a broker element, e.g. taking its branch
    /// length.
    fn from_broker_element(element: &NewickBrokerElement) -> Self;

    /// Writes the payload back into a broker element for serialization.
    fn to_broker_element(&self, element: &mut NewickBrokerElement);

    /// Returns a short human-readable description of the payload.
    fn dump(&self) -> String;
}

/// Default edge payload: the branch length between the two nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultEdgeData {
    pub branch_length: f64,
}

impl EdgeData for DefaultEdgeData {
    fn from_broker_element(element: &NewickBrokerElement) -> Self {
        DefaultEdgeData {
            branch_length: element.branch_length.unwrap_or(0.0),
        }
    }

    fn to_broker_element(&self, element: &mut NewickBrokerElement) {
        element.branch_length = Some(self.branch_length);
    }

    fn dump(&self) -> String {
        format!("Branch Length: {}", self.branch_length)
    }
}

/// An edge of a [Tree](crate::model::Tree), connecting two nodes via the
/// links at its two ends.
#[derive(Debug, Clone)]
pub struct TreeEdge<E> {
    pub(crate) index: EdgeIndex,
    pub(crate) link_primary: LinkIndex,
    pub(crate) link_secondary: LinkIndex,
    /// Domain payload of this edge.
    pub data: E,
}

impl<E> TreeEdge<E> {
    /// Returns the index of this edge in its tree.
    pub fn index(&self) -> EdgeIndex {
        self.index
    }

    /// Returns the link at the root-facing end of this edge.
    pub fn primary_link(&self) -> LinkIndex {
        self.link_primary
    }

    /// Returns the link at the leaf-facing end of this edge.
    pub fn secondary_link(&self) -> LinkIndex {
        self.link_secondary
    }
}
