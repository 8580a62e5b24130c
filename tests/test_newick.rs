use splitwick::error::NewickError;
use splitwick::model::{DefaultTree, NodeIndex};
use splitwick::newick::{self, NewickBroker, NewickBrokerElement, NewickProcessor};
use splitwick::parse_newick_str;

fn node_by_name(tree: &DefaultTree, name: &str) -> NodeIndex {
    tree.preorder()
        .find(|n| n.data.name == name)
        .map(|n| n.index())
        .unwrap_or_else(|| panic!("no node named '{}'", name))
}

fn branch_length_of(tree: &DefaultTree, node: NodeIndex) -> f64 {
    let link = tree.link(tree.node(node).primary_link());
    let edge = link.edge().expect("node has no parent edge");
    tree.edge(edge).data.branch_length
}

// --- TESTS NEWICK STRING PARSING ---

#[test]
fn test_basic_tree() {
    let tree = parse_newick_str("((A:1.0,B:2.0):3.0,C:4.0);").unwrap();

    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.inner_count(), 2);
    assert_eq!(tree.node_count(), 5);
    assert!(tree.is_valid());

    let a = node_by_name(&tree, "A");
    let c = node_by_name(&tree, "C");
    assert_eq!(branch_length_of(&tree, a), 1.0);
    assert_eq!(branch_length_of(&tree, c), 4.0);

    // C hangs off the root, A off the inner node
    assert_eq!(tree.parent(c), Some(tree.root_index()));
    let x = tree.parent(a).unwrap();
    assert_eq!(tree.parent(x), Some(tree.root_index()));
}

#[test]
fn test_example_with_root_label_and_lengths() {
    let tree = parse_newick_str("(A:0.1,B:0.2)Root:0.0;").unwrap();

    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.rank(tree.root_index()), 2);
    assert_eq!(tree.root_node().data.name, "Root");
    assert_eq!(branch_length_of(&tree, node_by_name(&tree, "A")), 0.1);
    assert_eq!(branch_length_of(&tree, node_by_name(&tree, "B")), 0.2);
}

#[test]
fn test_multifurcation() {
    let tree = parse_newick_str("(A,B,C,D,E);").unwrap();
    assert_eq!(tree.leaf_count(), 5);
    assert_eq!(tree.rank(tree.root_index()), 5);
    assert!(tree.is_valid());
}

#[test]
fn test_quoted_labels() {
    let tree = parse_newick_str("(('Taxon one':1.5,'Second''s taxon':2.5):3.0,'3rd Taxon':4.0);")
        .unwrap();
    assert_eq!(tree.leaf_count(), 3);
    node_by_name(&tree, "Taxon one");
    node_by_name(&tree, "Second's taxon");
    node_by_name(&tree, "3rd Taxon");
}

#[test]
fn test_whitespace_and_newlines_are_insignificant() {
    let tree = parse_newick_str("( ( A : 1.0 ,\n B : 2.0 ) :\n3.0 , C : 4.0 ) ;").unwrap();
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.node_count(), 5);
}

#[test]
fn test_comments_and_tags_do_not_break_parsing() {
    let newick = "[A tree of] (([Shags!]A[Great Commentoran]:0.33,B{edge_1}:0.33):1.87,C:2.2[King Commentoran]):0.0;";
    let tree = parse_newick_str(newick).unwrap();
    assert_eq!(tree.leaf_count(), 3);
}

#[test]
fn test_scientific_notation() {
    let tree = parse_newick_str("((A:1e-5,B:2.5E+3):1.0e2,C:3.14E-10);").unwrap();
    assert_eq!(branch_length_of(&tree, node_by_name(&tree, "A")), 1e-5);
    assert_eq!(branch_length_of(&tree, node_by_name(&tree, "B")), 2.5e3);
}

#[test]
fn test_anonymous_leaves_and_inner_nodes() {
    let tree = parse_newick_str("((,),C);").unwrap();
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.node_count(), 5);
    assert!(tree.is_valid());
}

#[test]
fn test_default_names() {
    let processor = NewickProcessor::new().with_default_names();
    let tree: DefaultTree = processor.from_string("((A,),C);").unwrap();

    node_by_name(&tree, "Leaf_Node");
    node_by_name(&tree, "Internal_Node");
    assert_eq!(tree.root_node().data.name, "Root_Node");
    // present labels are kept
    node_by_name(&tree, "A");
    node_by_name(&tree, "C");
}

#[test]
fn test_custom_name_templates() {
    let processor = NewickProcessor::new().with_name_templates("leaf", "inner", "root");
    let tree: DefaultTree = processor.from_string("((A,),C);").unwrap();
    node_by_name(&tree, "leaf");
    node_by_name(&tree, "inner");
    assert_eq!(tree.root_node().data.name, "root");
}

#[test]
fn test_deeply_nested_input() {
    // a 1000-level caterpillar must not exhaust the call stack
    let mut newick = String::from("A");
    for i in 0..1000 {
        newick = format!("({},L{})", newick, i);
    }
    newick.push(';');

    let tree = parse_newick_str(&newick).unwrap();
    assert_eq!(tree.leaf_count(), 1001);
    assert!(tree.is_valid());

    let processor = NewickProcessor::new();
    let out = processor.to_newick_string(&tree);
    let reparsed: DefaultTree = processor.from_string(&out).unwrap();
    assert_eq!(reparsed.node_count(), tree.node_count());
}

#[test]
fn test_multiple_trees_in_one_stream() {
    let processor = NewickProcessor::new();
    let trees: Vec<DefaultTree> = processor
        .all_from_string("(A,B);\n((C,D),E);[trailing remark]")
        .unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].leaf_count(), 2);
    assert_eq!(trees[1].leaf_count(), 3);
}

// --- TESTS DEALING WITH CORRUPT NEWICK STRINGS ---

#[test]
fn test_missing_closing_parenthesis() {
    let result = parse_newick_str("(A,B;");
    assert!(matches!(result, Err(NewickError::UnbalancedBrackets)));
}

#[test]
fn test_missing_semicolon() {
    let result = parse_newick_str("((A:1.0,B:2.0):3.0,C:4.0):0.5");
    assert!(matches!(result, Err(NewickError::Parse { .. })));
}

#[test]
fn test_missing_comma() {
    let result = parse_newick_str("((A:1.0 B:2.0):3.0,C:4.0);");
    assert!(matches!(result, Err(NewickError::Parse { .. })));
}

#[test]
fn test_invalid_branch_length() {
    let result = parse_newick_str("((A:1.0,B:abc):3.0,C:4.0);");
    assert!(matches!(result, Err(NewickError::Scan { .. })));
}

#[test]
fn test_empty_input() {
    assert!(matches!(
        parse_newick_str(""),
        Err(NewickError::EmptyInput)
    ));
    assert!(matches!(
        parse_newick_str("   \n "),
        Err(NewickError::EmptyInput)
    ));
}

#[test]
fn test_comma_outside_parentheses() {
    let result = parse_newick_str("A,B;");
    assert!(matches!(result, Err(NewickError::Parse { .. })));
}

#[test]
fn test_subtree_after_closing() {
    let result = parse_newick_str("(A,B)(C,D);");
    assert!(matches!(result, Err(NewickError::Parse { .. })));
}

#[test]
fn test_error_position_is_reported() {
    match parse_newick_str("((A:1.0 B:2.0):3.0,C:4.0);") {
        Err(NewickError::Parse { line, column, .. }) => {
            assert_eq!(line, 1);
            assert_eq!(column, 9);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

// --- TESTS SERIALIZATION ---

#[test]
fn test_serialize_names_only() {
    let tree = parse_newick_str("((A:1.0,B:2.0)X:3.0,C:4.0)R;").unwrap();
    let out = NewickProcessor::new().to_newick_string(&tree);
    assert_eq!(out, "((A,B)X,C)R;");
}

#[test]
fn test_serialize_with_branch_lengths_and_precision() {
    let tree = parse_newick_str("(A:0.1,B:0.25)R;").unwrap();

    let out = NewickProcessor::new()
        .with_print_branch_lengths(true)
        .with_precision(2)
        .to_newick_string(&tree);
    assert_eq!(out, "(A:0.10,B:0.25)R;");

    let without_names = NewickProcessor::new()
        .with_print_names(false)
        .with_print_branch_lengths(true)
        .with_precision(1)
        .to_newick_string(&tree);
    assert_eq!(without_names, "(:0.1,:0.2);");
}

#[test]
fn test_serialize_replaces_spaces_in_names() {
    let tree = parse_newick_str("('Taxon one',B);").unwrap();
    let out = NewickProcessor::new().to_newick_string(&tree);
    assert_eq!(out, "(Taxon_one,B);");
}

#[test]
fn test_serialization_is_idempotent() {
    let processor = NewickProcessor::new().with_print_branch_lengths(true);
    let tree = parse_newick_str("((A:1.0,B:2.0)X:3.0,(C:0.5,D:0.5)Y:1.5)R;").unwrap();
    let first = processor.to_newick_string(&tree);
    let second = processor.to_newick_string(&tree);
    assert_eq!(first, second);
}

#[test]
fn test_round_trip() {
    let processor = NewickProcessor::new().with_print_branch_lengths(true);
    let original = parse_newick_str("((A:1.0,B:2.0)X:3.0,(C:0.5,(D:0.25,E:0.25)Z:0.5)Y:1.5)R;")
        .unwrap();

    let text = processor.to_newick_string(&original);
    let reparsed: DefaultTree = processor.from_string(&text).unwrap();

    assert_eq!(reparsed.node_count(), original.node_count());
    assert_eq!(reparsed.leaf_count(), original.leaf_count());

    // same preorder label sequence
    let original_names: Vec<&str> = original.preorder().map(|n| n.data.name.as_str()).collect();
    let reparsed_names: Vec<&str> = reparsed.preorder().map(|n| n.data.name.as_str()).collect();
    assert_eq!(original_names, reparsed_names);

    // serializing again reproduces the text
    assert_eq!(processor.to_newick_string(&reparsed), text);
}

#[test]
fn test_comment_and_tag_emission_from_broker() {
    let mut broker = NewickBroker::new();
    let mut root = NewickBrokerElement::new(0);
    root.name = "R".to_string();
    let mut leaf_b = NewickBrokerElement::new(1);
    leaf_b.name = "B".to_string();
    leaf_b.tags.push("edge_2".to_string());
    let mut leaf_a = NewickBrokerElement::new(1);
    leaf_a.name = "A".to_string();
    leaf_a.comments.push("nice".to_string());

    // parser order: finished nodes pushed to the top, root in front
    broker.push_top(leaf_a);
    broker.push_top(leaf_b);
    broker.push_top(root);
    broker.assign_ranks();

    let plain = NewickProcessor::new().string_from_broker(&broker);
    assert_eq!(plain, "(A,B)R;");

    let decorated = NewickProcessor::new()
        .with_print_comments(true)
        .with_print_tags(true)
        .string_from_broker(&broker);
    assert_eq!(decorated, "(A[nice],B{edge_2})R;");
}

#[test]
fn test_to_broker_and_dump() {
    let tree = parse_newick_str("((A,B)X,C)R;").unwrap();
    let broker = NewickProcessor::new().to_broker(&tree);

    assert_eq!(broker.len(), 5);
    assert_eq!(broker.leaf_count(), 3);
    // root first, siblings reversed: R, C, X, B, A
    assert_eq!(broker[0].name, "R");
    assert_eq!(broker[0].depth, 0);
    assert_eq!(broker[0].rank(), 2);
    assert_eq!(broker[1].name, "C");
    assert_eq!(broker[4].name, "A");
    assert_eq!(broker[4].depth, 2);

    let dump = broker.dump();
    for name in ["R", "X", "A", "B", "C"] {
        assert!(dump.contains(name), "broker dump misses {}", name);
    }
}

#[test]
fn test_from_broker_rejects_depth_jumps() {
    let mut broker = NewickBroker::new();
    broker.push_bottom(NewickBrokerElement::new(0));
    broker.push_bottom(NewickBrokerElement::new(2));

    let processor = NewickProcessor::new();
    let result: Result<DefaultTree, _> = processor.from_broker(&mut broker);
    assert!(matches!(result, Err(NewickError::InvalidStructure(_))));
}

// --- TESTS PARSING AND WRITING FILES ---

#[test]
fn test_file_round_trip() {
    let path = std::env::temp_dir().join("splitwick_test_file_round_trip.nwk");

    let tree = parse_newick_str("((A:1.0,B:2.0)X:3.0,C:4.0)R;").unwrap();
    newick::write_file(&tree, &path).unwrap();

    let reparsed = newick::parse_file(&path).unwrap();
    assert_eq!(reparsed.node_count(), tree.node_count());
    assert_eq!(
        branch_length_of(&reparsed, node_by_name(&reparsed, "C")),
        4.0
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_all_from_file() {
    let path = std::env::temp_dir().join("splitwick_test_all_from_file.nwk");
    std::fs::write(&path, "(A,B);\n(C,(D,E));\n(F,G,H);\n").unwrap();

    let trees = newick::all_from_file(&path).unwrap();
    assert_eq!(trees.len(), 3);
    assert_eq!(trees[2].leaf_count(), 3);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_reports_io_error() {
    let result = newick::parse_file("/definitely/not/here.nwk");
    assert!(matches!(result, Err(NewickError::Io(_))));
}
