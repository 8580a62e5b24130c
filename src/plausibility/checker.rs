//! Checks query-tree bipartitions against a reference tree.

use crate::error::PlausibilityError;
use crate::model::{DefaultTree, NodeIndex};
use crate::plausibility::bipartition::{Bipartition, TreeBipartitions};
use crate::plausibility::rmq::SparseRmq;
use fixedbitset::FixedBitSet;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Where a reference leaf sits: its preorder ID and its dense leaf index.
#[derive(Debug, Clone, Copy)]
struct LeafRef {
    pid: u32,
    leaf_index: usize,
}

/// Result of checking one query tree against the reference.
#[derive(Debug, Clone)]
pub struct PlausibilityReport {
    /// Number of query splits that were checked (one per inner node).
    pub splits_checked: usize,
    /// Query splits that do not occur in the reference tree.
    pub missing: Vec<Bipartition>,
}

impl PlausibilityReport {
    /// Returns `true` if every checked split occurs in the reference tree.
    pub fn is_plausible(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Preprocessed reference tree for bipartition plausibility checks.
///
/// Construction walks the reference once in preorder to number its nodes
/// and map leaf names to preorder IDs, collects the Euler tour of preorder
/// IDs with a first-occurrence table, preprocesses the tour for
/// range-minimum queries, and accumulates the per-node clade bitsets. A
/// checker is then reusable for any number of query trees.
///
/// # Example
/// ```
/// use splitwick::newick::parse_str;
/// use splitwick::plausibility::PlausibilityChecker;
///
/// let reference = parse_str("((A,B),(C,D));").unwrap();
/// let checker = PlausibilityChecker::new(&reference);
///
/// let plausible = parse_str("(A,B);").unwrap();
/// assert!(checker.check(&plausible).unwrap().is_plausible());
///
/// let implausible = parse_str("(A,C);").unwrap();
/// assert!(!checker.check(&implausible).unwrap().is_plausible());
/// ```
pub struct PlausibilityChecker {
    /// preorder ID per node index
    pid_of_node: Vec<u32>,
    /// node index per preorder ID
    node_of_pid: Vec<NodeIndex>,
    /// leaf name → position in the reference
    leaves: HashMap<String, LeafRef>,
    /// dense leaf index → preorder ID; strictly increasing
    pid_of_leaf_index: Vec<u32>,
    /// preorder ID → first index in the Euler tour
    first_occurrence: Vec<u32>,
    /// range-minimum structure over the Euler tour of preorder IDs
    rmq: SparseRmq,
    /// clades and splits of the reference tree
    bipartitions: TreeBipartitions,
}

impl PlausibilityChecker {
    /// Preprocesses the given reference tree.
    pub fn new(reference: &DefaultTree) -> Self {
        let node_count = reference.node_count();

        // preorder IDs for every node, and a reference map for the leaves
        let mut pid_of_node = vec![0u32; node_count];
        let mut node_of_pid = Vec::with_capacity(node_count);
        let mut leaves = HashMap::new();
        let bipartitions = TreeBipartitions::new(reference);
        for (pid, node) in reference.preorder().enumerate() {
            let index = node.index();
            pid_of_node[index] = pid as u32;
            node_of_pid.push(index);
            if let Some(leaf_index) = bipartitions.leaf_index(index) {
                let replaced = leaves.insert(
                    node.data.name.clone(),
                    LeafRef {
                        pid: pid as u32,
                        leaf_index,
                    },
                );
                if replaced.is_some() {
                    warn!(name = %node.data.name, "duplicate leaf name in reference tree");
                }
            }
        }

        let mut pid_of_leaf_index = vec![0u32; bipartitions.leaf_count()];
        for node in 0..node_count {
            if let Some(leaf_index) = bipartitions.leaf_index(node) {
                pid_of_leaf_index[leaf_index] = pid_of_node[node];
            }
        }

        // Euler tour of preorder IDs, with first occurrences
        let mut euler = Vec::with_capacity(2 * reference.edge_count() + 1);
        let mut first_occurrence = vec![u32::MAX; node_count];
        for link in reference.euler_tour() {
            let pid = pid_of_node[link.node()];
            if first_occurrence[pid as usize] == u32::MAX {
                first_occurrence[pid as usize] = euler.len() as u32;
            }
            euler.push(pid);
        }

        debug!(
            nodes = node_count,
            leaves = bipartitions.leaf_count(),
            tour_length = euler.len(),
            "preprocessed reference tree"
        );

        PlausibilityChecker {
            pid_of_node,
            node_of_pid,
            leaves,
            pid_of_leaf_index,
            first_occurrence,
            rmq: SparseRmq::new(euler),
            bipartitions,
        }
    }

    /// Returns the bipartitions of the reference tree.
    pub fn reference_bipartitions(&self) -> &TreeBipartitions {
        &self.bipartitions
    }

    /// Returns the lowest common ancestor of two reference nodes.
    ///
    /// Both nodes are mapped to the first occurrences of their preorder IDs
    /// in the Euler tour; the minimum preorder ID between those tour
    /// positions identifies the ancestor.
    pub fn lca(&self, a: NodeIndex, b: NodeIndex) -> NodeIndex {
        let pid = self.lca_pid(self.pid_of_node[a], self.pid_of_node[b]);
        self.node_of_pid[pid as usize]
    }

    fn lca_pid(&self, a: u32, b: u32) -> u32 {
        let mut i = self.first_occurrence[a as usize] as usize;
        let mut j = self.first_occurrence[b as usize] as usize;
        if i > j {
            std::mem::swap(&mut i, &mut j);
        }
        self.rmq.values()[self.rmq.range_min(i, j)]
    }

    /// Checks whether every split implied by the query tree's inner nodes
    /// occurs in the reference tree.
    ///
    /// The query is walked bottom-up, accumulating each node's clade as a
    /// bitset over the reference leaf universe together with the smallest
    /// and largest preorder ID in it. For each inner node, the only
    /// reference edge that could realize the split sits above the clade's
    /// lowest common ancestor (or, for the complementary side, above the
    /// complement's ancestor); both candidates are resolved with
    /// range-minimum queries on the Euler tour and compared clade-for-clade.
    ///
    /// # Errors
    /// A query leaf name absent from the reference map fails the whole
    /// check with [PlausibilityError::UnknownLeaf]; no partial answer is
    /// produced.
    pub fn check(&self, query: &DefaultTree) -> Result<PlausibilityReport, PlausibilityError> {
        let num_leaves = self.bipartitions.leaf_count();
        let node_count = query.node_count();
        let mut clades: Vec<FixedBitSet> = vec![FixedBitSet::with_capacity(num_leaves); node_count];
        let mut pid_ranges: Vec<(u32, u32)> = vec![(u32::MAX, 0); node_count];

        for node in query.postorder() {
            let index = node.index();
            if query.is_leaf(index) {
                let name = &node.data.name;
                let leaf = self
                    .leaves
                    .get(name)
                    .ok_or_else(|| PlausibilityError::UnknownLeaf(name.clone()))?;
                clades[index].insert(leaf.leaf_index);
                pid_ranges[index] = (leaf.pid, leaf.pid);
            } else {
                let mut clade = FixedBitSet::with_capacity(num_leaves);
                let mut lowest = u32::MAX;
                let mut highest = 0;
                for child in query.children(index) {
                    clade.union_with(&clades[child]);
                    lowest = lowest.min(pid_ranges[child].0);
                    highest = highest.max(pid_ranges[child].1);
                }
                clades[index] = clade;
                pid_ranges[index] = (lowest, highest);
            }
        }

        let mut splits_checked = 0;
        let mut missing = Vec::new();
        for node in query.preorder() {
            let index = node.index();
            if query.is_leaf(index) {
                continue;
            }
            splits_checked += 1;
            let (lowest, highest) = pid_ranges[index];
            if !self.split_is_present(&clades[index], lowest, highest) {
                missing.push(Bipartition::new(clades[index].clone()));
            }
        }

        debug!(
            splits_checked,
            missing = missing.len(),
            "checked query tree against reference"
        );
        Ok(PlausibilityReport {
            splits_checked,
            missing,
        })
    }

    /// Decides whether the clade (or its complement) is realized by a
    /// reference edge.
    fn split_is_present(&self, clade: &FixedBitSet, lowest: u32, highest: u32) -> bool {
        // the LCA of a clade is the LCA of its extreme preorder IDs
        let ancestor = self.lca_pid(lowest, highest);
        if self.bipartitions.clade(self.node_of_pid[ancestor as usize]) == clade {
            return true;
        }

        // the other side of the candidate edge: the complement clade
        let mut complement = clade.clone();
        complement.toggle_range(..);
        let mut ones = complement.ones();
        let first = match ones.next() {
            Some(first) => first,
            None => return false,
        };
        let last = ones.last().unwrap_or(first);
        // leaf indices are increasing in preorder ID
        let ancestor = self.lca_pid(self.pid_of_leaf_index[first], self.pid_of_leaf_index[last]);
        self.bipartitions.clade(self.node_of_pid[ancestor as usize]) == &complement
    }
}
