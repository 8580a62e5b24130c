//! Arena-based tree owning nodes, edges, and links.

use crate::model::edge::{EdgeData, TreeEdge};
use crate::model::link::{NO_EDGE, TreeLink};
use crate::model::node::{NodeData, TreeNode};
use crate::model::traversal::{Children, EulerTour, LevelOrder, LinksAround, Postorder, Preorder};
use crate::model::{DefaultEdgeData, DefaultNodeData};

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// Index of an edge in a tree (arena).
pub type EdgeIndex = usize;

/// Index of a link in a tree (arena).
pub type LinkIndex = usize;

/// A rooted, possibly multifurcating tree represented as three arenas of
/// [TreeNode], [TreeEdge], and [TreeLink], addressed by dense indices.
///
/// Adjacency is stored exclusively in the links: every node carries one
/// link per incident edge plus, for the root, its self-paired top link.
/// The `next` references of a node's links form a circular list (rank plus
/// one entries), and the `outer` references pair up the two links of each
/// edge. Indices are dense and contiguous from 0; the graph induced by the
/// `outer` pairs is connected and acyclic.
///
/// Trees are constructed exclusively through the Newick broker import, see
/// [NewickProcessor::from_broker](crate::newick::NewickProcessor::from_broker).
/// Generic over the node and edge payloads `N` and `E` (see
/// [NodeData](crate::model::NodeData) and [EdgeData](crate::model::EdgeData)).
#[derive(Debug, Clone)]
pub struct Tree<N, E> {
    pub(crate) nodes: Vec<TreeNode<N>>,
    pub(crate) edges: Vec<TreeEdge<E>>,
    pub(crate) links: Vec<TreeLink>,
    pub(crate) root_link: LinkIndex,
}

/// Tree with name-carrying nodes and branch-length edges.
pub type DefaultTree = Tree<DefaultNodeData, DefaultEdgeData>;

// ============================================================================
// Counts, lookup, root access (pub)
// ============================================================================
impl<N, E> Tree<N, E> {
    /// Returns the number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in this tree.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of links in this tree.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Returns the number of leaf nodes in this tree.
    pub fn leaf_count(&self) -> usize {
        (0..self.nodes.len()).filter(|&i| self.is_leaf(i)).count()
    }

    /// Returns the number of inner nodes in this tree.
    pub fn inner_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    /// Returns the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &TreeNode<N> {
        &self.nodes[index]
    }

    /// Returns the edge at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn edge(&self, index: EdgeIndex) -> &TreeEdge<E> {
        &self.edges[index]
    }

    /// Returns the link at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn link(&self, index: LinkIndex) -> &TreeLink {
        &self.links[index]
    }

    /// Returns the distinguished root link (the root node's top link).
    pub fn root_link(&self) -> LinkIndex {
        self.root_link
    }

    /// Returns the index of the root node.
    pub fn root_index(&self) -> NodeIndex {
        self.links[self.root_link].node
    }

    /// Returns the root node.
    pub fn root_node(&self) -> &TreeNode<N> {
        &self.nodes[self.root_index()]
    }
}

// ============================================================================
// Rank and neighborhood queries (pub)
// ============================================================================
impl<N, E> Tree<N, E> {
    /// Returns the rank of a node, i.e. its number of children.
    ///
    /// Derived from the circular link list: a node has `rank + 1` links.
    pub fn rank(&self, node: NodeIndex) -> usize {
        self.links_around(node).count() - 1
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self, node: NodeIndex) -> bool {
        let top = self.nodes[node].link;
        self.links[top].next == top
    }

    /// Returns `true` if the node has at least one child.
    pub fn is_inner(&self, node: NodeIndex) -> bool {
        !self.is_leaf(node)
    }

    /// Returns the parent of a node, or `None` for the root.
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        let top = self.nodes[node].link;
        let outer = self.links[top].outer;
        if outer == top {
            None
        } else {
            Some(self.links[outer].node)
        }
    }

    /// Iterates over the children of a node, in the order of its link list.
    pub fn children(&self, node: NodeIndex) -> Children<'_, N, E> {
        Children::new(self, node)
    }

    /// Iterates over all links incident to a node, starting at its primary
    /// link and following the circular `next` chain; yields `rank + 1`
    /// links.
    pub fn links_around(&self, node: NodeIndex) -> LinksAround<'_, N, E> {
        LinksAround::new(self, self.nodes[node].link)
    }

    /// Iterates the circular link list starting (and ending) at the given
    /// link instead of the node's primary link.
    pub fn links_from(&self, link: LinkIndex) -> LinksAround<'_, N, E> {
        LinksAround::new(self, link)
    }
}

// ============================================================================
// Traversals (pub)
// ============================================================================
impl<N, E> Tree<N, E> {
    /// Iterates over all nodes in preorder (parents before children).
    ///
    /// The position of a node in this sequence is its preorder ID, the
    /// canonical node identity used by the comparison algorithms.
    pub fn preorder(&self) -> Preorder<'_, N, E> {
        Preorder::new(self)
    }

    /// Iterates over all nodes in postorder (children before parents).
    pub fn postorder(&self) -> Postorder<'_, N, E> {
        Postorder::new(self)
    }

    /// Iterates over all nodes in level order (breadth first from the
    /// root).
    pub fn level_order(&self) -> LevelOrder<'_, N, E> {
        LevelOrder::new(self)
    }

    /// Iterates over the Euler tour of the tree: the closed walk
    /// `link = next(outer(link))` starting at the root link, which
    /// traverses every edge twice, once per direction. A node of degree
    /// `d` (counting the root's self-paired top link) is visited `d`
    /// times.
    pub fn euler_tour(&self) -> EulerTour<'_, N, E> {
        EulerTour::new(self)
    }
}

// ============================================================================
// Validation and debugging (pub)
// ============================================================================
impl<N: NodeData, E: EdgeData> Tree<N, E> {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - All arenas are consistent in size and all stored indices match
    ///   their arena positions
    /// - The root link is its node's primary link and its own outer link
    /// - `outer` is an involution and pairs exactly the two links of an edge
    /// - Every `next` chain cycles through links of a single node
    /// - Only the root link has no edge
    /// - Every node is reachable from the root
    ///
    /// # Returns
    /// `true` if the tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.nodes.is_empty() || self.root_link >= self.links.len() {
            return false;
        }
        if self.edges.len() + 1 != self.nodes.len() {
            return false;
        }
        if self.links.len() != 2 * self.edges.len() + 1 {
            return false;
        }

        // root link invariants
        let root_link = &self.links[self.root_link];
        if root_link.outer != self.root_link || root_link.edge != NO_EDGE {
            return false;
        }
        if self.nodes[root_link.node].link != self.root_link {
            return false;
        }

        // per-link invariants
        for (index, link) in self.links.iter().enumerate() {
            if link.index != index {
                return false;
            }
            if link.next >= self.links.len()
                || link.outer >= self.links.len()
                || link.node >= self.nodes.len()
            {
                return false;
            }
            if self.links[link.outer].outer != index {
                return false;
            }
            if self.links[link.next].node != link.node {
                return false;
            }
            if link.edge == NO_EDGE {
                if index != self.root_link {
                    return false;
                }
            } else {
                if link.edge >= self.edges.len() {
                    return false;
                }
                let edge = &self.edges[link.edge];
                if edge.link_primary != index && edge.link_secondary != index {
                    return false;
                }
            }
        }

        // per-node invariants: the primary link belongs to the node and the
        // next chain returns to it without leaving the node
        for (index, node) in self.nodes.iter().enumerate() {
            if node.index != index {
                return false;
            }
            if node.link >= self.links.len() || self.links[node.link].node != index {
                return false;
            }
            let mut steps = 0;
            let mut current = self.links[node.link].next;
            while current != node.link {
                if self.links[current].node != index || steps > self.links.len() {
                    return false;
                }
                current = self.links[current].next;
                steps += 1;
            }
        }

        // per-edge invariants
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.index != index {
                return false;
            }
            if edge.link_primary >= self.links.len() || edge.link_secondary >= self.links.len() {
                return false;
            }
            if self.links[edge.link_primary].edge != index
                || self.links[edge.link_secondary].edge != index
            {
                return false;
            }
            if self.links[edge.link_primary].outer != edge.link_secondary {
                return false;
            }
        }

        // connectivity
        if self.preorder().count() != self.nodes.len() {
            return false;
        }

        true
    }

    /// Returns a readable listing of the tree, one line per node in
    /// preorder, indented by depth.
    pub fn dump(&self) -> String {
        let mut out = format!(
            "Tree with {} nodes, {} edges, {} links\n",
            self.node_count(),
            self.edge_count(),
            self.link_count()
        );
        let mut depths = vec![0usize; self.nodes.len()];
        for node in self.preorder() {
            let index = node.index();
            if let Some(parent) = self.parent(index) {
                depths[index] = depths[parent] + 1;
            }
            out.push_str(&format!(
                "{}[{}] rank {}: {}\n",
                "    ".repeat(depths[index]),
                index,
                self.rank(index),
                node.data.dump()
            ));
        }
        out
    }
}
