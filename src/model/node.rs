//! Tree nodes and the node payload capability.

use crate::model::tree::{LinkIndex, NodeIndex};
use crate::newick::broker::NewickBrokerElement;

/// Capability contract for node payloads.
///
/// A tree is generic over its node payload; anything that can be filled
/// from and written back to a [NewickBrokerElement] can live on a node.
pub trait NodeData: Default + Clone + std::fmt::Debug {
    /// Builds the payload from a broker element, e.g. taking its name.
    fn from_broker_element(element: &NewickBrokerElement) -> Self;

    /// Writes the payload back into a broker element for serialization.
    fn to_broker_element(&self, element: &mut NewickBrokerElement);

    /// Returns a short human-readable description of the payload.
    fn dump(&self) -> String;
}

/// Default node payload: a name, which for leaves is usually the name of
/// the taxon represented by the node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultNodeData {
    pub name: String,
}

impl NodeData for DefaultNodeData {
    fn from_broker_element(element: &NewickBrokerElement) -> Self {
        DefaultNodeData {
            name: element.name.clone(),
        }
    }

    fn to_broker_element(&self, element: &mut NewickBrokerElement) {
        element.name = self.name.clone();
    }

    fn dump(&self) -> String {
        format!("Name: '{}'", self.name)
    }
}

/// A node of a [Tree](crate::model::Tree).
///
/// Owns a domain payload and a reference to one of its incident links, the
/// primary link, which is oriented toward the root. Nodes are created only
/// by the broker import and live as long as their tree.
#[derive(Debug, Clone)]
pub struct TreeNode<N> {
    pub(crate) index: NodeIndex,
    pub(crate) link: LinkIndex,
    /// Domain payload of this node.
    pub data: N,
}

impl<N> TreeNode<N> {
    /// Returns the index of this node in its tree.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the primary link of this node, pointing toward the root.
    pub fn primary_link(&self) -> LinkIndex {
        self.link
    }
}
