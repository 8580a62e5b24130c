//! Error types for Newick parsing and plausibility checking.
//!
//! This module provides [NewickError] for everything that can go wrong
//! between raw text and a finished tree, and [PlausibilityError] for the
//! preconditions of comparing a query tree against a reference tree.

use thiserror::Error;

/// Errors occurring while reading or constructing trees from Newick input.
///
/// Scanning failures carry the position reported by the tokenizer; parse
/// failures carry the position of the offending token. No partial tree is
/// ever returned alongside an error.
#[derive(Error, Debug)]
pub enum NewickError {
    /// Reading or writing a file failed; propagated unchanged.
    #[error("io error - {0}")]
    Io(#[from] std::io::Error),

    /// The tokenizer hit a malformed token and stopped.
    #[error("scan error at {line}:{column} - {message}")]
    Scan {
        line: usize,
        column: usize,
        message: String,
    },

    /// The token sequence is not a valid Newick tree.
    #[error("invalid newick at {line}:{column} - {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The input produced no tokens at all.
    #[error("input contains no tokens")]
    EmptyInput,

    /// Brackets in the token sequence are not properly nested.
    #[error("brackets are not properly nested")]
    UnbalancedBrackets,

    /// The broker contents and the tree under construction disagree.
    #[error("inconsistent tree structure - {0}")]
    InvalidStructure(String),
}

/// Errors occurring while checking a query tree against a reference tree.
///
/// A failed precondition aborts the whole comparison; there is no
/// per-edge best-effort answer.
#[derive(Error, Debug)]
pub enum PlausibilityError {
    /// Reading one of the trees failed.
    #[error(transparent)]
    Newick(#[from] NewickError),

    /// A query leaf is not part of the reference tree's leaf set.
    #[error("leaf '{0}' of the query tree does not occur in the reference tree")]
    UnknownLeaf(String),
}
