//! Flat, depth-tagged staging list between Newick text and trees.
//!
//! The [NewickBroker] decouples text parsing from topology construction:
//! the parser appends one [NewickBrokerElement] per finished node, and the
//! tree builder consumes the list front to back. Serialization fills a
//! broker from a tree walk and renders it bottom-up. The `depth` field is
//! the sole structural signal; parent/child relationships are recovered
//! from it without recursion.
//!
//! Elements are stored root-first: the parser pushes each finished node to
//! the top, so the element finished last (the root) ends up in front and
//! sibling groups appear in reverse input order. Brokers are transient and
//! never persisted.

use crate::error::NewickError;
use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

/// One flattened node record used during parsing and serialization.
#[derive(Debug, Clone, Default)]
pub struct NewickBrokerElement {
    /// Label of the node; empty if the input had none.
    pub name: String,
    /// Branch length toward the parent, if the input had one.
    pub branch_length: Option<f64>,
    /// Comment spans (`[...]`) attached to this node, in input order.
    pub comments: Vec<String>,
    /// Tag spans (`{...}`) attached to this node, in input order.
    pub tags: Vec<String>,
    /// Distance from the broker's first element, the de facto root.
    pub depth: usize,
    /// Number of children; set by [NewickBroker::assign_ranks].
    rank: Option<usize>,
}

impl NewickBrokerElement {
    /// Creates an empty element at the given depth.
    pub fn new(depth: usize) -> Self {
        NewickBrokerElement {
            depth,
            ..Default::default()
        }
    }

    /// Returns the number of children of this node.
    ///
    /// # Panics
    /// Panics if [NewickBroker::assign_ranks] has not run on the owning
    /// broker.
    pub fn rank(&self) -> usize {
        match self.rank {
            Some(rank) => rank,
            None => panic!("NewickBroker::assign_ranks must run before rank queries"),
        }
    }

    /// Returns `true` if this element describes a leaf.
    ///
    /// # Panics
    /// Panics if ranks have not been assigned.
    pub fn is_leaf(&self) -> bool {
        self.rank() == 0
    }
}

/// Ordered sequence of [NewickBrokerElement]s, root in front.
#[derive(Debug, Clone, Default)]
pub struct NewickBroker {
    elements: VecDeque<NewickBrokerElement>,
}

impl NewickBroker {
    /// Creates an empty broker.
    pub fn new() -> Self {
        NewickBroker {
            elements: VecDeque::new(),
        }
    }

    /// Pushes an element to the front; used by the parser, which finishes
    /// children before their parents.
    pub fn push_top(&mut self, element: NewickBrokerElement) {
        self.elements.push_front(element);
    }

    /// Pushes an element to the back; used when filling the broker from a
    /// tree walk, which starts at the root.
    pub fn push_bottom(&mut self, element: NewickBrokerElement) {
        self.elements.push_back(element);
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the broker holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the elements from the root outward.
    pub fn iter(&self) -> impl Iterator<Item = &NewickBrokerElement> {
        self.elements.iter()
    }

    /// Checks the depth structure: the first element has depth 0, every
    /// later element has positive depth, and depth never increases by more
    /// than one from one element to the next.
    pub fn validate(&self) -> Result<(), NewickError> {
        let mut previous_depth = 0;
        for (i, element) in self.elements.iter().enumerate() {
            if i == 0 {
                if element.depth != 0 {
                    return Err(NewickError::InvalidStructure(
                        "first broker element must have depth 0".to_string(),
                    ));
                }
            } else if element.depth == 0 {
                return Err(NewickError::InvalidStructure(
                    "more than one broker element with depth 0".to_string(),
                ));
            } else if element.depth > previous_depth + 1 {
                return Err(NewickError::InvalidStructure(format!(
                    "broker depth jumps from {} to {}",
                    previous_depth, element.depth
                )));
            }
            previous_depth = element.depth;
        }
        Ok(())
    }

    /// Computes the rank (number of children) of every element from the
    /// depth structure, in one linear pass.
    ///
    /// The broker must satisfy [validate](Self::validate).
    pub fn assign_ranks(&mut self) {
        let mut ranks = vec![0usize; self.elements.len()];
        // ancestor chain: one entry per depth level, deepest last
        let mut chain: Vec<usize> = Vec::new();
        for (i, element) in self.elements.iter().enumerate() {
            chain.truncate(element.depth);
            if let Some(&parent) = chain.last() {
                ranks[parent] += 1;
            }
            chain.push(i);
        }
        for (element, rank) in self.elements.iter_mut().zip(ranks) {
            element.rank = Some(rank);
        }
    }

    /// Returns the number of leaf elements.
    ///
    /// # Panics
    /// Panics if ranks have not been assigned.
    pub fn leaf_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_leaf()).count()
    }

    /// Returns a readable listing of the broker, indented by depth.
    pub fn dump(&self) -> String {
        let mut out = format!("Broker with {} elements\n", self.len());
        for element in &self.elements {
            out.push_str(&format!(
                "{}{}{}\n",
                "    ".repeat(element.depth),
                if element.name.is_empty() {
                    "(unnamed)"
                } else {
                    element.name.as_str()
                },
                match element.branch_length {
                    Some(bl) => format!(" :{}", bl),
                    None => String::new(),
                }
            ));
        }
        out
    }
}

impl Index<usize> for NewickBroker {
    type Output = NewickBrokerElement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl IndexMut<usize> for NewickBroker {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.elements[index]
    }
}
