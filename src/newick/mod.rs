//! Newick format reading and writing.
//!
//! The pipeline is text → [Lexer](crate::lexer::Lexer) → [NewickBroker] →
//! [Tree](crate::model::Tree), and the reverse for serialization. The
//! [NewickProcessor] orchestrates both directions and carries all policy
//! (default names, print toggles, precision) as explicit configuration.
//!
//! # Quick API
//! For default settings and [DefaultTree]:
//! * [`parse_str`] — parse the first tree of a string
//! * [`parse_file`] — parse the first tree of a file
//! * [`all_from_file`] — parse every statement of a file, one tree each
//! * [`to_newick_str`] — serialize a tree with names printed
//! * [`write_file`] — serialize a tree into a file
//!
//! # Format
//! `(child,child,...)label:branchlength[comment]{tag};` recursively, where
//! a label is an unquoted run of symbol characters or a single-quoted
//! string, the branch length is introduced by `:`, comments are `[...]`,
//! and tags are `{...}`. Whitespace outside tokens is insignificant, and a
//! stream may hold several semicolon-terminated statements, one tree each.

pub mod broker;
pub mod lexer;
pub mod processor;

pub use broker::{NewickBroker, NewickBrokerElement};
pub use lexer::{newick_lexer, newick_lexer_config};
pub use processor::NewickProcessor;

use crate::error::NewickError;
use crate::model::DefaultTree;
use std::path::Path;

// ============================================================================
// Quick parsing API (pub)
// ============================================================================
/// Parses the first Newick statement of a string into a [DefaultTree],
/// using default settings.
///
/// # Example
/// ```
/// let tree = splitwick::newick::parse_str("((A:0.1,B:0.2):0.3,C:0.4);").unwrap();
/// assert_eq!(tree.leaf_count(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<DefaultTree, NewickError> {
    NewickProcessor::new().from_string(newick.as_ref())
}

/// Parses the first Newick statement of a file into a [DefaultTree],
/// using default settings.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DefaultTree, NewickError> {
    NewickProcessor::new().from_file(path)
}

/// Parses every Newick statement of a file, one [DefaultTree] each,
/// using default settings.
pub fn all_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<DefaultTree>, NewickError> {
    NewickProcessor::new().all_from_file(path)
}

// ============================================================================
// Quick writing API (pub)
// ============================================================================
/// Serializes a tree to a Newick string with default settings (names
/// printed, branch lengths omitted).
pub fn to_newick_str(tree: &DefaultTree) -> String {
    NewickProcessor::new().to_newick_string(tree)
}

/// Writes a tree to a file in Newick format with names and branch lengths
/// printed.
pub fn write_file<P: AsRef<Path>>(tree: &DefaultTree, path: P) -> Result<(), NewickError> {
    NewickProcessor::new()
        .with_print_branch_lengths(true)
        .to_file(tree, path)
}
