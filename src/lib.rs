//! Splitwick is a phylogenetic tree toolkit: it represents rooted trees,
//! reads and writes them in the Newick format, and checks whether the
//! bipartitions of a small query tree also occur in a large reference
//! tree.
//!
//! Core functionality provided:
//! - Tree model: an arena of nodes, edges, and links addressed by dense
//!   indices, generic over node and edge payloads, with preorder,
//!   postorder, level-order, per-node link, and Euler-tour traversals.
//!   See [crate::model].
//! - Newick: a configurable tokenizer and a two-phase reader/writer that
//!   stages trees in a flat, depth-tagged broker list. Streams with
//!   several semicolon-terminated statements yield one tree each.
//!   See [crate::newick].
//! - Plausibility: an Euler-tour range-minimum structure answering
//!   lowest-common-ancestor queries in constant time, used to test every
//!   split of a query tree against a reference tree's bipartitions.
//!   See [crate::plausibility].
//!
//! All algorithms are single-threaded, in-memory, and bounded by input
//! size; files are only touched at the parse/serialize boundary.
//! Recoverable anomalies are reported through the [tracing] facade, and
//! the embedding application owns the subscriber.
//!
//! # Usage
//! Parse a Newick string and serialize it back:
//! ```
//! use splitwick::parse_newick_str;
//! use splitwick::newick::to_newick_str;
//!
//! let tree = parse_newick_str("((A,B)X,C)Root;").unwrap();
//! assert_eq!(tree.leaf_count(), 3);
//! assert_eq!(to_newick_str(&tree), "((A,B)X,C)Root;");
//! ```
//!
//! Check query trees against a reference:
//! ```
//! use splitwick::parse_newick_str;
//! use splitwick::plausibility::PlausibilityChecker;
//!
//! let reference = parse_newick_str("((A,B),(C,D));").unwrap();
//! let checker = PlausibilityChecker::new(&reference);
//! let query = parse_newick_str("(A,C);").unwrap();
//! assert!(!checker.check(&query).unwrap().is_plausible());
//! ```

pub mod error;
pub mod lexer;
pub mod model;
pub mod newick;
pub mod plausibility;

pub use error::{NewickError, PlausibilityError};
pub use model::{DefaultTree, Tree};

use std::path::Path;

// ============================================================================
// Quick API (pub)
// ============================================================================
/// Parses the first Newick statement of a string using default settings.
///
/// See [`newick::parse_str`] for full documentation.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<DefaultTree, NewickError> {
    newick::parse_str(newick)
}

/// Parses the first Newick statement of a file using default settings.
///
/// See [`newick::parse_file`] for full documentation.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<DefaultTree, NewickError> {
    newick::parse_file(path)
}
