//! Traversal iterators over [Tree].
//!
//! All iterators use explicit stacks or queues, so arbitrarily deep or
//! degenerate trees never exhaust the call stack.

use crate::model::link::TreeLink;
use crate::model::node::TreeNode;
use crate::model::tree::{LinkIndex, NodeIndex, Tree};
use std::collections::VecDeque;

/// Iterator over the circular link list of one node.
///
/// Starts at the given link and follows `next` until it returns to the
/// start, yielding `rank + 1` links.
pub struct LinksAround<'a, N, E> {
    tree: &'a Tree<N, E>,
    start: LinkIndex,
    current: Option<LinkIndex>,
}

impl<'a, N, E> LinksAround<'a, N, E> {
    pub(crate) fn new(tree: &'a Tree<N, E>, start: LinkIndex) -> Self {
        LinksAround {
            tree,
            start,
            current: Some(start),
        }
    }
}

impl<'a, N, E> Iterator for LinksAround<'a, N, E> {
    type Item = &'a TreeLink;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let link = &self.tree.links[current];
        self.current = if link.next == self.start {
            None
        } else {
            Some(link.next)
        };
        Some(link)
    }
}

/// Iterator over the children of one node, in link-list order.
pub struct Children<'a, N, E> {
    tree: &'a Tree<N, E>,
    top: LinkIndex,
    current: Option<LinkIndex>,
}

impl<'a, N, E> Children<'a, N, E> {
    pub(crate) fn new(tree: &'a Tree<N, E>, node: NodeIndex) -> Self {
        let top = tree.nodes[node].link;
        let first = tree.links[top].next;
        Children {
            tree,
            top,
            current: if first == top { None } else { Some(first) },
        }
    }
}

impl<'a, N, E> Iterator for Children<'a, N, E> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let link = &self.tree.links[current];
        let child = self.tree.links[link.outer].node;
        self.current = if link.next == self.top {
            None
        } else {
            Some(link.next)
        };
        Some(child)
    }
}

/// Iterator for preorder traversal (parents before children), using an
/// explicit stack.
pub struct Preorder<'a, N, E> {
    tree: &'a Tree<N, E>,
    stack: Vec<NodeIndex>,
}

impl<'a, N, E> Preorder<'a, N, E> {
    pub(crate) fn new(tree: &'a Tree<N, E>) -> Self {
        let mut stack = Vec::new();
        if !tree.nodes.is_empty() {
            stack.push(tree.root_index());
        }
        Preorder { tree, stack }
    }
}

impl<'a, N, E> Iterator for Preorder<'a, N, E> {
    type Item = &'a TreeNode<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;

        // push children in reverse so the first child is visited first
        let children: Vec<NodeIndex> = self.tree.children(index).collect();
        self.stack.extend(children.into_iter().rev());

        Some(&self.tree.nodes[index])
    }
}

/// Iterator for postorder traversal (children before parents), using an
/// explicit stack of (node, children already expanded) entries.
pub struct Postorder<'a, N, E> {
    tree: &'a Tree<N, E>,
    stack: Vec<(NodeIndex, bool)>,
}

impl<'a, N, E> Postorder<'a, N, E> {
    pub(crate) fn new(tree: &'a Tree<N, E>) -> Self {
        let mut stack = Vec::new();
        if !tree.nodes.is_empty() {
            stack.push((tree.root_index(), false));
        }
        Postorder { tree, stack }
    }
}

impl<'a, N, E> Iterator for Postorder<'a, N, E> {
    type Item = &'a TreeNode<N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, expanded)) = self.stack.pop() {
            if expanded || self.tree.is_leaf(index) {
                return Some(&self.tree.nodes[index]);
            }
            self.stack.push((index, true));
            let children: Vec<NodeIndex> = self.tree.children(index).collect();
            self.stack
                .extend(children.into_iter().rev().map(|c| (c, false)));
        }
        None
    }
}

/// Iterator for level-order traversal (breadth first by depth).
pub struct LevelOrder<'a, N, E> {
    tree: &'a Tree<N, E>,
    queue: VecDeque<NodeIndex>,
}

impl<'a, N, E> LevelOrder<'a, N, E> {
    pub(crate) fn new(tree: &'a Tree<N, E>) -> Self {
        let mut queue = VecDeque::new();
        if !tree.nodes.is_empty() {
            queue.push_back(tree.root_index());
        }
        LevelOrder { tree, queue }
    }
}

impl<'a, N, E> Iterator for LevelOrder<'a, N, E> {
    type Item = &'a TreeNode<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        self.queue.extend(self.tree.children(index));
        Some(&self.tree.nodes[index])
    }
}

/// Iterator for the Euler tour: the closed link walk
/// `link = next(outer(link))` starting at the root link.
///
/// Yields every link of the tree exactly once; projecting the yielded
/// links to their nodes gives the tour sequence consumed by the RMQ/LCA
/// preprocessing.
pub struct EulerTour<'a, N, E> {
    tree: &'a Tree<N, E>,
    start: LinkIndex,
    current: Option<LinkIndex>,
}

impl<'a, N, E> EulerTour<'a, N, E> {
    pub(crate) fn new(tree: &'a Tree<N, E>) -> Self {
        let start = tree.root_link;
        EulerTour {
            tree,
            start,
            current: if tree.nodes.is_empty() {
                None
            } else {
                Some(start)
            },
        }
    }
}

impl<'a, N, E> Iterator for EulerTour<'a, N, E> {
    type Item = &'a TreeLink;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let link = &self.tree.links[current];
        let step = self.tree.links[link.outer].next;
        self.current = if step == self.start { None } else { Some(step) };
        Some(link)
    }
}
