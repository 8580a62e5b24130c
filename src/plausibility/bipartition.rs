//! Bipartitions of a tree, encoded as bit vectors over its leaf set.

use crate::model::{DefaultTree, NodeIndex};
use fixedbitset::FixedBitSet;
use std::collections::HashSet;

/// The split of a tree's leaf set induced by removing one edge.
///
/// A split and its complement describe the same bipartition, so the stored
/// bitset is normalized to the lexicographically smaller of the two sides.
/// Equality and hashing therefore treat complementary sides as equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bipartition(FixedBitSet);

impl Bipartition {
    /// Normalizes one side of a split into a bipartition.
    pub fn new(side: FixedBitSet) -> Self {
        let mut complement = side.clone();
        complement.toggle_range(..);
        Bipartition(side.min(complement))
    }

    /// Returns the normalized side of this bipartition.
    pub fn bitset(&self) -> &FixedBitSet {
        &self.0
    }
}

/// All bipartitions of one tree, with the per-node clade bitsets they are
/// derived from.
///
/// Leaves are numbered densely in traversal order (identical for pre- and
/// postorder), and each node's clade is the set of leaf indices in its
/// subtree, accumulated bottom-up. Every non-root node contributes the
/// bipartition of the edge above it.
#[derive(Debug, Clone)]
pub struct TreeBipartitions {
    num_leaves: usize,
    leaf_indices: Vec<Option<usize>>,
    clades: Vec<FixedBitSet>,
    splits: HashSet<Bipartition>,
}

impl TreeBipartitions {
    /// Computes clades and bipartitions of the given tree.
    pub fn new(tree: &DefaultTree) -> Self {
        let num_leaves = tree.leaf_count();
        let node_count = tree.node_count();
        let mut leaf_indices: Vec<Option<usize>> = vec![None; node_count];
        let mut clades: Vec<FixedBitSet> = vec![FixedBitSet::with_capacity(num_leaves); node_count];
        let mut next_leaf_index = 0;

        for node in tree.postorder() {
            let index = node.index();
            if tree.is_leaf(index) {
                leaf_indices[index] = Some(next_leaf_index);
                clades[index].insert(next_leaf_index);
                next_leaf_index += 1;
            } else {
                let mut clade = FixedBitSet::with_capacity(num_leaves);
                for child in tree.children(index) {
                    clade.union_with(&clades[child]);
                }
                clades[index] = clade;
            }
        }

        let root = tree.root_index();
        let splits = (0..node_count)
            .filter(|&index| index != root)
            .map(|index| Bipartition::new(clades[index].clone()))
            .collect();

        TreeBipartitions {
            num_leaves,
            leaf_indices,
            clades,
            splits,
        }
    }

    /// Returns the number of leaves of the underlying tree.
    pub fn leaf_count(&self) -> usize {
        self.num_leaves
    }

    /// Returns the dense leaf index of a node, or `None` for inner nodes.
    pub fn leaf_index(&self, node: NodeIndex) -> Option<usize> {
        self.leaf_indices[node]
    }

    /// Returns the clade (subtree leaf set) of a node.
    pub fn clade(&self, node: NodeIndex) -> &FixedBitSet {
        &self.clades[node]
    }

    /// Returns `true` if the given bipartition occurs in the tree.
    pub fn contains(&self, split: &Bipartition) -> bool {
        self.splits.contains(split)
    }

    /// Iterates over all bipartitions of the tree.
    pub fn splits(&self) -> impl Iterator<Item = &Bipartition> {
        self.splits.iter()
    }
}
