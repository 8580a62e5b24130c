//! Bipartition plausibility checking of query trees against a reference.
//!
//! A small query tree is *plausible* with respect to a large reference
//! tree if every leaf-set split implied by the query's inner nodes also
//! occurs as a bipartition of the reference tree. Both trees must share a
//! leaf-name vocabulary: every query leaf must occur in the reference.
//!
//! The reference tree is preprocessed once into a [PlausibilityChecker]:
//! preorder numbering, leaf-name map, Euler tour, first-occurrence table,
//! a [SparseRmq] for constant-time lowest-common-ancestor queries, and the
//! per-node clade bitsets of [TreeBipartitions]. Each query is then
//! answered in near-linear time.
//!
//! For the common file-driven case, [check_files] loads a reference file
//! and checks every tree of a query file against it.

pub mod bipartition;
pub mod checker;
pub mod rmq;

pub use bipartition::{Bipartition, TreeBipartitions};
pub use checker::{PlausibilityChecker, PlausibilityReport};
pub use rmq::SparseRmq;

use crate::error::PlausibilityError;
use crate::newick;
use std::path::Path;

/// Checks every query tree of one file against the reference tree of
/// another, returning one report per query tree.
///
/// The reference file contributes its first Newick statement; the query
/// file may hold any number of statements.
///
/// # Example
/// ```no_run
/// let reports = splitwick::plausibility::check_files("reference.nwk", "queries.nwk")?;
/// for report in &reports {
///     println!("{} splits checked, plausible: {}", report.splits_checked, report.is_plausible());
/// }
/// # Ok::<(), splitwick::PlausibilityError>(())
/// ```
pub fn check_files<P: AsRef<Path>, Q: AsRef<Path>>(
    reference_path: P,
    query_path: Q,
) -> Result<Vec<PlausibilityReport>, PlausibilityError> {
    let reference = newick::parse_file(reference_path)?;
    let queries = newick::all_from_file(query_path)?;

    let checker = PlausibilityChecker::new(&reference);
    queries.iter().map(|query| checker.check(query)).collect()
}
