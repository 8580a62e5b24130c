//! Data model for rooted, possibly multifurcating trees.
//!
//! # Tree representation
//! A [Tree] owns three dense arenas: [TreeNode]s, [TreeEdge]s, and
//! [TreeLink]s, addressed by [NodeIndex]/[EdgeIndex]/[LinkIndex]. The links
//! carry all adjacency: every link belongs to one node and one edge, chains
//! to the `next` link around its node (circularly), and pairs with the
//! `outer` link at the other end of its edge. A node's number of children
//! (its rank) and its neighborhood fall out of the link structure.
//!
//! # Payloads
//! Trees are generic over a node payload and an edge payload. The
//! capability contracts [NodeData] and [EdgeData] tie payloads to the
//! Newick broker, so parsing and serialization work for any payload pair.
//! [DefaultNodeData] (a name) and [DefaultEdgeData] (a branch length) cover
//! the common case; [DefaultTree] is the alias for that pair.
//!
//! # Traversals
//! Five traversal shapes are provided, all iterative:
//! preorder, postorder, level order, the per-node circular link iteration,
//! and the Euler tour used by the RMQ/LCA comparison machinery. See
//! [traversal].

pub mod edge;
pub mod link;
pub mod node;
pub mod traversal;
pub mod tree;

pub use edge::{DefaultEdgeData, EdgeData, TreeEdge};
pub use link::TreeLink;
pub use node::{DefaultNodeData, NodeData, TreeNode};
pub use tree::{DefaultTree, EdgeIndex, LinkIndex, NodeIndex, Tree};
