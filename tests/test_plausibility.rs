use fixedbitset::FixedBitSet;
use splitwick::error::PlausibilityError;
use splitwick::model::{DefaultTree, NodeIndex};
use splitwick::parse_newick_str;
use splitwick::plausibility::{self, Bipartition, PlausibilityChecker, TreeBipartitions};

fn node_by_name(tree: &DefaultTree, name: &str) -> NodeIndex {
    tree.preorder()
        .find(|n| n.data.name == name)
        .map(|n| n.index())
        .unwrap_or_else(|| panic!("no node named '{}'", name))
}

/// Lowest common ancestor by intersecting the ancestor paths of both nodes.
fn naive_lca(tree: &DefaultTree, a: NodeIndex, b: NodeIndex) -> NodeIndex {
    let mut ancestors = Vec::new();
    let mut current = Some(a);
    while let Some(node) = current {
        ancestors.push(node);
        current = tree.parent(node);
    }
    let mut current = b;
    loop {
        if ancestors.contains(&current) {
            return current;
        }
        current = match tree.parent(current) {
            Some(parent) => parent,
            None => return current,
        };
    }
}

// --- TESTS LCA VIA EULER TOUR RMQ ---

#[test]
fn test_lca_small_tree() {
    let reference = parse_newick_str("((A,B)X,(C,D)Y)R;").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    let a = node_by_name(&reference, "A");
    let b = node_by_name(&reference, "B");
    let c = node_by_name(&reference, "C");
    let x = node_by_name(&reference, "X");
    let r = node_by_name(&reference, "R");

    assert_eq!(checker.lca(a, b), x);
    assert_eq!(checker.lca(a, c), r);
    assert_eq!(checker.lca(a, x), x);
    assert_eq!(checker.lca(a, a), a);
    assert_eq!(checker.lca(x, r), r);
}

#[test]
fn test_lca_matches_naive_for_all_pairs() {
    let reference =
        parse_newick_str("(((A,B)X,(C,(D,E)W)Y)P,((F,G)V,(H,(I,J)U)T)Q)R;").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    for a in 0..reference.node_count() {
        for b in 0..reference.node_count() {
            assert_eq!(
                checker.lca(a, b),
                naive_lca(&reference, a, b),
                "lca mismatch for nodes {} and {}",
                a,
                b
            );
        }
    }
}

// --- TESTS REFERENCE BIPARTITIONS ---

#[test]
fn test_reference_bipartitions() {
    let reference = parse_newick_str("((A,B),(C,D));").unwrap();
    let bipartitions = TreeBipartitions::new(&reference);
    assert_eq!(bipartitions.leaf_count(), 4);

    // six non-root nodes, but {A,B} and {C,D} normalize to one bipartition
    assert_eq!(bipartitions.splits().count(), 5);

    // leaves are indexed in traversal order: A=0, B=1, C=2, D=3
    let mut ab = FixedBitSet::with_capacity(4);
    ab.insert(0);
    ab.insert(1);
    assert!(bipartitions.contains(&Bipartition::new(ab)));

    // {C,D} is the complement of {A,B}: the same bipartition
    let mut cd = FixedBitSet::with_capacity(4);
    cd.insert(2);
    cd.insert(3);
    assert!(bipartitions.contains(&Bipartition::new(cd)));

    let mut ac = FixedBitSet::with_capacity(4);
    ac.insert(0);
    ac.insert(2);
    assert!(!bipartitions.contains(&Bipartition::new(ac)));
}

#[test]
fn test_clades_accumulate_bottom_up() {
    let reference = parse_newick_str("((A,B)X,(C,D)Y)R;").unwrap();
    let checker = PlausibilityChecker::new(&reference);
    let bipartitions = checker.reference_bipartitions();

    let x = node_by_name(&reference, "X");
    let r = node_by_name(&reference, "R");
    assert_eq!(bipartitions.clade(x).count_ones(..), 2);
    assert_eq!(bipartitions.clade(r).count_ones(..), 4);

    let a = node_by_name(&reference, "A");
    assert_eq!(bipartitions.clade(a).count_ones(..), 1);
    assert_eq!(bipartitions.leaf_index(a), Some(0));
    assert_eq!(bipartitions.leaf_index(x), None);
}

// --- TESTS PLAUSIBILITY END TO END ---

#[test]
fn test_plausible_and_implausible_pair() {
    let reference = parse_newick_str("((A,B),(C,D));").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    // {A,B}|{C,D} is a reference bipartition
    let query = parse_newick_str("(A,B);").unwrap();
    let report = checker.check(&query).unwrap();
    assert!(report.is_plausible());
    assert_eq!(report.splits_checked, 1);

    // {A,C}|{B,D} is not
    let query = parse_newick_str("(A,C);").unwrap();
    let report = checker.check(&query).unwrap();
    assert!(!report.is_plausible());
    assert_eq!(report.missing.len(), 1);
}

#[test]
fn test_reference_against_itself_is_plausible() {
    let newick = "(((A,B),(C,(D,E))),((F,G),H));";
    let reference = parse_newick_str(newick).unwrap();
    let checker = PlausibilityChecker::new(&reference);

    let query = parse_newick_str(newick).unwrap();
    let report = checker.check(&query).unwrap();
    assert!(report.is_plausible());
    assert_eq!(report.splits_checked, query.inner_count());
}

#[test]
fn test_query_on_leaf_subset() {
    let reference = parse_newick_str("((A,B),(C,D));").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    // {A,B} occurs directly; {A,B,C} is the complement side of the leaf
    // edge above D
    let query = parse_newick_str("((A,B),C);").unwrap();
    let report = checker.check(&query).unwrap();
    assert!(report.is_plausible());
    assert_eq!(report.splits_checked, 2);

    // {A,C} occurs nowhere
    let query = parse_newick_str("((A,C),B);").unwrap();
    let report = checker.check(&query).unwrap();
    assert!(!report.is_plausible());
    assert_eq!(report.missing.len(), 1);
}

#[test]
fn test_multifurcating_reference() {
    let reference = parse_newick_str("((A,B),(C,D,E));").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    // the trifurcation supports {C,D,E} but none of its sub-pairs
    let query = parse_newick_str("(C,D,E);").unwrap();
    assert!(checker.check(&query).unwrap().is_plausible());

    let query = parse_newick_str("((C,D),E);").unwrap();
    assert!(!checker.check(&query).unwrap().is_plausible());

    // {A,B,C}|{D,E} is not a split of the reference either
    let query = parse_newick_str("((A,B),C);").unwrap();
    assert!(!checker.check(&query).unwrap().is_plausible());
}

#[test]
fn test_checker_is_reusable() {
    let reference = parse_newick_str("((A,B),(C,D));").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    for (newick, expected) in [
        ("(A,B);", true),
        ("(A,C);", false),
        ("(C,D);", true),
        ("((A,B),(C,D));", true),
        ("((A,D),(C,B));", false),
    ] {
        let query = parse_newick_str(newick).unwrap();
        assert_eq!(
            checker.check(&query).unwrap().is_plausible(),
            expected,
            "unexpected verdict for {}",
            newick
        );
    }
}

#[test]
fn test_unknown_leaf_fails_whole_check() {
    let reference = parse_newick_str("((A,B),(C,D));").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    let query = parse_newick_str("(A,(B,Unknown));").unwrap();
    match checker.check(&query) {
        Err(PlausibilityError::UnknownLeaf(name)) => assert_eq!(name, "Unknown"),
        other => panic!("expected UnknownLeaf, got {:?}", other.map(|r| r.is_plausible())),
    }
}

#[test]
fn test_missing_splits_are_reported() {
    let reference = parse_newick_str("((A,B),(C,D));").unwrap();
    let checker = PlausibilityChecker::new(&reference);

    let query = parse_newick_str("((A,C),(B,D));").unwrap();
    let report = checker.check(&query).unwrap();
    assert_eq!(report.splits_checked, 3);
    // root split {A,B,C,D} is trivially present, both inner pairs are not
    assert_eq!(report.missing.len(), 2);

    // the missing split {A,C} is reported in normalized form
    let mut ac = FixedBitSet::with_capacity(4);
    ac.insert(0);
    ac.insert(2);
    assert!(report.missing.contains(&Bipartition::new(ac)));
    assert!(report.missing.iter().all(|b| b.bitset().count_ones(..) == 2));
}

// --- TESTS FILE-DRIVEN CHECKS ---

#[test]
fn test_check_files() {
    let dir = std::env::temp_dir();
    let reference_path = dir.join("splitwick_test_reference.nwk");
    let query_path = dir.join("splitwick_test_queries.nwk");
    std::fs::write(&reference_path, "((A,B),(C,D));\n").unwrap();
    std::fs::write(&query_path, "(A,B);\n(A,C);\n").unwrap();

    let reports = plausibility::check_files(&reference_path, &query_path).unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_plausible());
    assert!(!reports[1].is_plausible());

    std::fs::remove_file(&reference_path).ok();
    std::fs::remove_file(&query_path).ok();
}

#[test]
fn test_check_files_missing_reference() {
    let result = plausibility::check_files("/no/such/reference.nwk", "/no/such/queries.nwk");
    assert!(matches!(
        result,
        Err(PlausibilityError::Newick(_))
    ));
}
