//! Orchestrates tokenizing, broker staging, and tree building.
//!
//! Parsing runs text → [Lexer] → [NewickBroker] → [Tree]; serialization
//! runs the same pipeline in reverse. Both directions use explicit loops
//! and stacks, so deeply nested inputs never exhaust the call stack.

use crate::error::NewickError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::model::edge::{EdgeData, TreeEdge};
use crate::model::link::{NO_EDGE, TreeLink};
use crate::model::node::{NodeData, TreeNode};
use crate::model::tree::{LinkIndex, NodeIndex, Tree};
use crate::newick::broker::{NewickBroker, NewickBrokerElement};
use crate::newick::lexer::newick_lexer;
use std::iter::Peekable;
use std::path::Path;
use std::{fs, fmt::Write};
use tracing::{debug, warn};

/// The token most recently consumed by the parse loop, used to reject
/// tokens in invalid positions.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Previous {
    Start,
    Open,
    Close,
    Separator,
    Label,
    Length,
}

/// Reader and writer for trees in Newick format.
///
/// All parsing and serialization policy is an explicit, immutable part of
/// this value: default-name substitution for unlabeled nodes, the
/// per-field print toggles, and the branch-length precision. Configure
/// with the `with_*` builders, then call the `from_*` parsing or `to_*`
/// serialization methods; a processor can be reused freely.
///
/// # Example
/// ```
/// use splitwick::model::DefaultTree;
/// use splitwick::newick::NewickProcessor;
///
/// let processor = NewickProcessor::new().with_print_branch_lengths(true);
/// let tree: DefaultTree = processor.from_string("(A:0.1,B:0.2);").unwrap();
/// assert_eq!(processor.to_newick_string(&tree), "(A:0.100000,B:0.200000);");
/// ```
#[derive(Debug, Clone)]
pub struct NewickProcessor {
    use_default_names: bool,
    default_leaf_name: String,
    default_internal_name: String,
    default_root_name: String,
    print_names: bool,
    print_branch_lengths: bool,
    print_comments: bool,
    print_tags: bool,
    precision: usize,
}

impl Default for NewickProcessor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickProcessor {
    /// Creates a processor with default policy: no default names, names
    /// printed, branch lengths/comments/tags not printed, precision 6.
    pub fn new() -> Self {
        NewickProcessor {
            use_default_names: false,
            default_leaf_name: "Leaf_Node".to_string(),
            default_internal_name: "Internal_Node".to_string(),
            default_root_name: "Root_Node".to_string(),
            print_names: true,
            print_branch_lengths: false,
            print_comments: false,
            print_tags: false,
            precision: 6,
        }
    }

    /// Enables substitution of default names for unlabeled nodes while
    /// parsing, with distinct templates for leaf, internal, and root
    /// positions.
    pub fn with_default_names(mut self) -> Self {
        self.use_default_names = true;
        self
    }

    /// Replaces the default-name templates (implies
    /// [with_default_names](Self::with_default_names)).
    pub fn with_name_templates(mut self, leaf: &str, internal: &str, root: &str) -> Self {
        self.use_default_names = true;
        self.default_leaf_name = leaf.to_string();
        self.default_internal_name = internal.to_string();
        self.default_root_name = root.to_string();
        self
    }

    /// Sets whether serialization emits node names.
    pub fn with_print_names(mut self, print_names: bool) -> Self {
        self.print_names = print_names;
        self
    }

    /// Sets whether serialization emits branch lengths.
    pub fn with_print_branch_lengths(mut self, print_branch_lengths: bool) -> Self {
        self.print_branch_lengths = print_branch_lengths;
        self
    }

    /// Sets whether serialization emits comment spans.
    pub fn with_print_comments(mut self, print_comments: bool) -> Self {
        self.print_comments = print_comments;
        self
    }

    /// Sets whether serialization emits tag spans.
    pub fn with_print_tags(mut self, print_tags: bool) -> Self {
        self.print_tags = print_tags;
        self
    }

    /// Sets the number of decimal digits used for branch lengths.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

// ============================================================================
// Parsing (pub)
// ============================================================================
impl NewickProcessor {
    /// Reads a file and parses the first Newick statement in it.
    ///
    /// # Errors
    /// I/O failures are propagated unchanged; scan and parse failures are
    /// reported with their position. No partial tree is returned.
    pub fn from_file<N: NodeData, E: EdgeData, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Tree<N, E>, NewickError> {
        let text = fs::read_to_string(path)?;
        self.from_string(&text)
    }

    /// Parses the first Newick statement of the given text.
    pub fn from_string<N: NodeData, E: EdgeData>(
        &self,
        text: &str,
    ) -> Result<Tree<N, E>, NewickError> {
        let mut lexer = newick_lexer();
        lexer.process_string(text);
        self.from_lexer(&lexer)
    }

    /// Parses the first Newick statement from a processed lexer.
    ///
    /// The lexer may hold tokens for several semicolon-terminated
    /// statements; only the first is consumed here, see
    /// [all_from_lexer](Self::all_from_lexer) for the rest.
    pub fn from_lexer<N: NodeData, E: EdgeData>(
        &self,
        lexer: &Lexer,
    ) -> Result<Tree<N, E>, NewickError> {
        self.check_lexer(lexer)?;
        let mut tokens = lexer.tokens().iter().peekable();
        let mut broker = self.broker_from_tokens(&mut tokens)?;
        self.finish_broker(&mut broker)?;
        self.from_broker(&mut broker)
    }

    /// Reads a file and parses every Newick statement in it, one tree
    /// each.
    pub fn all_from_file<N: NodeData, E: EdgeData, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<Tree<N, E>>, NewickError> {
        let text = fs::read_to_string(path)?;
        self.all_from_string(&text)
    }

    /// Parses every Newick statement of the given text, one tree each.
    pub fn all_from_string<N: NodeData, E: EdgeData>(
        &self,
        text: &str,
    ) -> Result<Vec<Tree<N, E>>, NewickError> {
        let mut lexer = newick_lexer();
        lexer.process_string(text);
        self.all_from_lexer(&lexer)
    }

    /// Parses every Newick statement from a processed lexer.
    pub fn all_from_lexer<N: NodeData, E: EdgeData>(
        &self,
        lexer: &Lexer,
    ) -> Result<Vec<Tree<N, E>>, NewickError> {
        self.check_lexer(lexer)?;
        let mut tokens = lexer.tokens().iter().peekable();
        let mut trees = Vec::new();
        loop {
            // floating comments and tags between statements carry no
            // structure
            while tokens
                .peek()
                .is_some_and(|t| matches!(t.kind(), TokenKind::Comment | TokenKind::Tag))
            {
                tokens.next();
            }
            if tokens.peek().is_none() {
                break;
            }
            let mut broker = self.broker_from_tokens(&mut tokens)?;
            self.finish_broker(&mut broker)?;
            trees.push(self.from_broker(&mut broker)?);
        }
        if trees.is_empty() {
            return Err(NewickError::EmptyInput);
        }
        Ok(trees)
    }

    /// Builds a tree from a broker, allocating one node and its top link
    /// per element and wiring `next`/`outer` according to the recorded
    /// depths.
    ///
    /// # Errors
    /// Returns [NewickError::InvalidStructure] if the broker's depth
    /// structure is inconsistent, and [NewickError::EmptyInput] for an
    /// empty broker.
    pub fn from_broker<N: NodeData, E: EdgeData>(
        &self,
        broker: &mut NewickBroker,
    ) -> Result<Tree<N, E>, NewickError> {
        if broker.is_empty() {
            return Err(NewickError::EmptyInput);
        }
        broker.validate()?;
        broker.assign_ranks();

        let node_count = broker.len();
        let mut nodes: Vec<TreeNode<N>> = Vec::with_capacity(node_count);
        let mut edges: Vec<TreeEdge<E>> = Vec::with_capacity(node_count.saturating_sub(1));
        let mut links: Vec<TreeLink> = Vec::with_capacity(2 * node_count.saturating_sub(1) + 1);

        // down links of already processed nodes that still await a child
        let mut link_stack: Vec<LinkIndex> = Vec::new();

        for element in broker.iter() {
            let node_index: NodeIndex = nodes.len();

            // the link pointing toward the root, created for every node
            let top_link: LinkIndex = links.len();
            links.push(TreeLink {
                index: top_link,
                next: top_link,
                outer: top_link,
                node: node_index,
                edge: NO_EDGE,
            });
            nodes.push(TreeNode {
                index: node_index,
                link: top_link,
                data: N::from_broker_element(element),
            });

            // wire the top link to the parent's pending down link; the
            // first element is the root, whose top link stays its own outer
            if let Some(&parent_down) = link_stack.last() {
                links[top_link].outer = parent_down;
                links[parent_down].outer = top_link;

                let edge_index = edges.len();
                edges.push(TreeEdge {
                    index: edge_index,
                    link_primary: parent_down,
                    link_secondary: top_link,
                    data: E::from_broker_element(element),
                });
                links[top_link].edge = edge_index;
                links[parent_down].edge = edge_index;

                link_stack.pop();
            }

            // one down link per expected child, all chained into the
            // circular next list; leaves keep the top link self-chained
            let mut previous = top_link;
            for _ in 0..element.rank() {
                let down: LinkIndex = links.len();
                links.push(TreeLink {
                    index: down,
                    next: top_link,
                    outer: down,
                    node: node_index,
                    edge: NO_EDGE,
                });
                links[previous].next = down;
                previous = down;
                link_stack.push(down);
            }
            links[previous].next = top_link;
        }

        if !link_stack.is_empty() {
            return Err(NewickError::InvalidStructure(format!(
                "{} child links were never connected",
                link_stack.len()
            )));
        }

        let tree = Tree {
            nodes,
            edges,
            links,
            root_link: 0,
        };
        debug_assert!(tree.is_valid());
        Ok(tree)
    }
}

// ============================================================================
// Parsing internals
// ============================================================================
impl NewickProcessor {
    /// Rejects lexers whose token sequence cannot describe any tree.
    fn check_lexer(&self, lexer: &Lexer) -> Result<(), NewickError> {
        if lexer.is_empty() {
            warn!("input contains no tokens");
            return Err(NewickError::EmptyInput);
        }
        if let Some(token) = lexer.back() {
            if token.is_error() {
                return Err(NewickError::Scan {
                    line: token.line(),
                    column: token.column(),
                    message: token.value().to_string(),
                });
            }
        }
        if !lexer.validate_brackets() {
            return Err(NewickError::UnbalancedBrackets);
        }
        Ok(())
    }

    /// Consumes tokens up to and including the next `;`, emitting one
    /// depth-tagged broker element per finished node.
    fn broker_from_tokens<'a, I>(
        &self,
        tokens: &mut Peekable<I>,
    ) -> Result<NewickBroker, NewickError>
    where
        I: Iterator<Item = &'a Token>,
    {
        let mut broker = NewickBroker::new();
        let mut depth: usize = 0;
        let mut current: Option<NewickBrokerElement> = None;
        let mut previous = Previous::Start;
        let mut last_position = (1, 1);

        for token in tokens {
            last_position = (token.line(), token.column());
            match token.kind() {
                TokenKind::Comment => match current.as_mut() {
                    Some(element) => element.comments.push(token.value().to_string()),
                    None => warn!(
                        line = token.line(),
                        column = token.column(),
                        "dropping comment that precedes any node"
                    ),
                },
                TokenKind::Tag => match current.as_mut() {
                    Some(element) => element.tags.push(token.value().to_string()),
                    None => warn!(
                        line = token.line(),
                        column = token.column(),
                        "dropping tag that precedes any node"
                    ),
                },
                TokenKind::Bracket if token.value() == "(" => {
                    if matches!(
                        previous,
                        Previous::Label | Previous::Length | Previous::Close
                    ) {
                        return Err(parse_error(token, "unexpected '('"));
                    }
                    depth += 1;
                    previous = Previous::Open;
                }
                TokenKind::Bracket => {
                    if depth == 0 {
                        return Err(parse_error(token, "unexpected ')'"));
                    }
                    // the node ending here may be anonymous
                    broker.push_top(
                        current
                            .take()
                            .unwrap_or_else(|| NewickBrokerElement::new(depth)),
                    );
                    depth -= 1;
                    // the enclosing node now awaits its label and length
                    current = Some(NewickBrokerElement::new(depth));
                    previous = Previous::Close;
                }
                TokenKind::Operator if token.value() == "," => {
                    if depth == 0 {
                        return Err(parse_error(token, "',' outside of parentheses"));
                    }
                    broker.push_top(
                        current
                            .take()
                            .unwrap_or_else(|| NewickBrokerElement::new(depth)),
                    );
                    previous = Previous::Separator;
                }
                TokenKind::Operator => {
                    if depth != 0 {
                        return Err(parse_error(token, "';' inside unclosed parentheses"));
                    }
                    broker.push_top(
                        current
                            .take()
                            .unwrap_or_else(|| NewickBrokerElement::new(0)),
                    );
                    return Ok(broker);
                }
                TokenKind::Symbol | TokenKind::String => {
                    if matches!(previous, Previous::Label | Previous::Length) {
                        return Err(parse_error(
                            token,
                            format!("unexpected label '{}'", token.value()),
                        ));
                    }
                    current
                        .get_or_insert_with(|| NewickBrokerElement::new(depth))
                        .name = token.value().to_string();
                    previous = Previous::Label;
                }
                TokenKind::Number => {
                    if previous == Previous::Length {
                        return Err(parse_error(token, "more than one branch length"));
                    }
                    let value: f64 = token.value().parse().map_err(|_| {
                        parse_error(token, format!("invalid branch length '{}'", token.value()))
                    })?;
                    current
                        .get_or_insert_with(|| NewickBrokerElement::new(depth))
                        .branch_length = Some(value);
                    previous = Previous::Length;
                }
                TokenKind::Unknown => {
                    return Err(parse_error(
                        token,
                        format!("invalid character '{}'", token.value()),
                    ));
                }
                TokenKind::Whitespace => {}
                TokenKind::Error => {
                    return Err(NewickError::Scan {
                        line: token.line(),
                        column: token.column(),
                        message: token.value().to_string(),
                    });
                }
            }
        }

        Err(NewickError::Parse {
            line: last_position.0,
            column: last_position.1,
            message: "unexpected end of input, expected ';'".to_string(),
        })
    }

    /// Validates a freshly parsed broker, assigns ranks, and substitutes
    /// default names where the input had none.
    fn finish_broker(&self, broker: &mut NewickBroker) -> Result<(), NewickError> {
        broker.validate()?;
        broker.assign_ranks();

        if self.use_default_names {
            for i in 0..broker.len() {
                if !broker[i].name.is_empty() {
                    continue;
                }
                let name = if i == 0 {
                    &self.default_root_name
                } else if broker[i].is_leaf() {
                    &self.default_leaf_name
                } else {
                    &self.default_internal_name
                };
                debug!(element = i, name = %name, "substituting default name");
                broker[i].name = name.clone();
            }
        }

        debug!(
            elements = broker.len(),
            leaves = broker.leaf_count(),
            "staged newick statement"
        );
        Ok(())
    }
}

fn parse_error(token: &Token, message: impl Into<String>) -> NewickError {
    NewickError::Parse {
        line: token.line(),
        column: token.column(),
        message: message.into(),
    }
}

// ============================================================================
// Serialization (pub)
// ============================================================================
impl NewickProcessor {
    /// Serializes a tree and writes it to a file, terminated by a newline.
    pub fn to_file<N: NodeData, E: EdgeData, P: AsRef<Path>>(
        &self,
        tree: &Tree<N, E>,
        path: P,
    ) -> Result<(), NewickError> {
        let mut newick = self.to_newick_string(tree);
        newick.push('\n');
        fs::write(path, newick)?;
        Ok(())
    }

    /// Serializes a tree to a Newick string terminated by `;`.
    ///
    /// A valid in-memory tree always serializes; there is no failure path.
    pub fn to_newick_string<N: NodeData, E: EdgeData>(&self, tree: &Tree<N, E>) -> String {
        let broker = self.to_broker(tree);
        self.string_from_broker(&broker)
    }

    /// Fills a broker from a tree, in the same root-first, reverse-sibling
    /// order the parser produces, with ranks assigned.
    pub fn to_broker<N: NodeData, E: EdgeData>(&self, tree: &Tree<N, E>) -> NewickBroker {
        let mut broker = NewickBroker::new();
        if tree.node_count() == 0 {
            return broker;
        }

        // depth-first with siblings pushed in order, so they pop reversed
        let mut stack: Vec<(NodeIndex, usize)> = vec![(tree.root_index(), 0)];
        while let Some((node_index, node_depth)) = stack.pop() {
            let node = tree.node(node_index);
            let mut element = NewickBrokerElement::new(node_depth);
            node.data.to_broker_element(&mut element);
            if let Some(edge_index) = tree.link(node.primary_link()).edge() {
                tree.edge(edge_index).data.to_broker_element(&mut element);
            }
            broker.push_bottom(element);

            for child in tree.children(node_index) {
                stack.push((child, node_depth + 1));
            }
        }

        broker.assign_ranks();
        broker
    }

    /// Renders a broker to Newick text, bottom-up without recursion.
    ///
    /// # Panics
    /// Panics if ranks have not been assigned on the broker.
    pub fn string_from_broker(&self, broker: &NewickBroker) -> String {
        // walk the elements children-first; each finished subtree string is
        // stacked until its parent consumes it
        let mut stack: Vec<String> = Vec::new();
        for i in (0..broker.len()).rev() {
            let element = &broker[i];
            if element.is_leaf() {
                stack.push(self.element_to_string(element));
                continue;
            }
            let mut children: Vec<String> = (0..element.rank())
                .map(|_| stack.pop().unwrap())
                .collect();
            children.reverse();
            let mut rendered = String::with_capacity(children.iter().map(String::len).sum());
            rendered.push('(');
            rendered.push_str(&children.join(","));
            rendered.push(')');
            rendered.push_str(&self.element_to_string(element));
            stack.push(rendered);
        }

        let mut newick = stack.pop().unwrap_or_default();
        newick.push(';');
        newick
    }

    /// Renders one element according to the print toggles. Spaces in names
    /// become underscores so the label survives re-tokenization.
    fn element_to_string(&self, element: &NewickBrokerElement) -> String {
        let mut out = String::new();
        if self.print_names {
            out.push_str(&element.name.replace(' ', "_"));
        }
        if self.print_branch_lengths {
            if let Some(branch_length) = element.branch_length {
                let _ = write!(out, ":{:.*}", self.precision, branch_length);
            }
        }
        if self.print_comments {
            for comment in &element.comments {
                let _ = write!(out, "[{}]", comment);
            }
        }
        if self.print_tags {
            for tag in &element.tags {
                let _ = write!(out, "{{{}}}", tag);
            }
        }
        out
    }
}
