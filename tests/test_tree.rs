use phylotrunk::AnalysisError;
use phylotrunk::model::{BranchLength, PhyloTree, PhyloTreeBuilder, TreeBuilder};
use phylotrunk::newick::parse_str;

// ============= Tree Building Tests =============
#[test]
fn test_building_tree() {
    let mut tree = PhyloTree::new(5);
    let index_l1 = tree.add_leaf(Some(BranchLength::new(1.0)), Some("Kea".to_string()));
    let index_l2 = tree.add_leaf(Some(BranchLength::new(1.0)), Some("Kaka".to_string()));
    let index_l3 = tree.add_leaf(Some(BranchLength::new(0.5)), Some("Kakapo".to_string()));
    let index_i1 = tree.add_internal(vec![index_l1, index_l2], Some(BranchLength::new(1.5)), None);
    let index_root = tree.add_root(vec![index_l3, index_i1], None, None);

    // Counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_vertices(), 5);
    assert_eq!(tree.num_edges(), 4);
    assert_eq!(tree.total_branch_length(), 4.0);
    assert!(tree.vertices_have_branch_lengths());

    // Root
    let root = tree.root();
    assert_eq!(root.index(), index_root);
    assert!(root.is_root());
    assert_eq!(root.children(), &[index_l3, index_i1]);

    // Leaf
    let l2 = &tree[index_l2];
    assert!(l2.is_leaf());
    assert_eq!(l2.label(), Some("Kaka"));
    assert_eq!(l2.parent(), Some(index_i1));

    // Internal
    let internal = &tree[index_i1];
    assert!(internal.is_internal());
    assert_eq!(internal.branch_length(), Some(BranchLength::new(1.5)));
    assert!(tree.validate().is_ok());
}

#[test]
fn test_builder_trait() {
    let mut builder = PhyloTreeBuilder::new();
    builder.init_next(3);
    builder.set_name("tui".to_string());
    let a = builder.add_leaf(None, Some("A".to_string()));
    let b = builder.add_leaf(None, Some("B".to_string()));
    let root = builder.add_root(vec![a, b], None, None);
    builder.add_annotation("height".to_string(), root, 1.5.into());

    let tree = builder.finish_tree().unwrap();
    assert_eq!(tree.name(), Some("tui"));
    assert_eq!(tree.num_leaves(), 2);
    assert_eq!(tree.annotations().get("height", root).and_then(|v| v.as_f64()), Some(1.5));
    assert!(builder.finish_tree().is_none());
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = PhyloTree::new(2);
    tree.root(); // Should panic
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = PhyloTree::new(2);
    let _ = &tree[55];
}

#[test]
#[should_panic]
fn test_negative_branch_length() {
    BranchLength::new(-1.0);
}

#[test]
fn test_try_new_branch_length() {
    assert_eq!(BranchLength::try_new(-0.5), None);
    assert_eq!(BranchLength::try_new(f64::INFINITY), None);
    assert_eq!(*BranchLength::try_new(0.0).unwrap(), 0.0);
}

// ============= Validation Tests =============
#[test]
fn test_validate_without_root() {
    let mut tree = PhyloTree::new(2);
    tree.add_leaf(None, None);
    assert!(matches!(tree.validate(), Err(AnalysisError::MalformedTree(_))));
    assert!(!tree.is_valid());
}

#[test]
fn test_validate_detached_vertex() {
    let mut tree = PhyloTree::new(4);
    let a = tree.add_leaf(None, None);
    let b = tree.add_leaf(None, None);
    // Never attached to the root
    tree.add_leaf(None, None);
    tree.add_root(vec![a, b], None, None);
    assert!(matches!(tree.validate(), Err(AnalysisError::MalformedTree(_))));
}

// ============= Traversal Tests =============
#[test]
fn test_traversal_orders() {
    let tree = parse_str("((A,B)X,(C,D,E)Y)R;").unwrap();
    let labels = |it: Vec<&phylotrunk::model::Vertex>| -> Vec<String> {
        it.iter().map(|v| v.label().unwrap().to_string()).collect()
    };

    assert_eq!(
        labels(tree.level_order_iter().collect()),
        ["R", "X", "Y", "A", "B", "C", "D", "E"]
    );
    assert_eq!(
        labels(tree.pre_order_iter().collect()),
        ["R", "X", "A", "B", "Y", "C", "D", "E"]
    );
    assert_eq!(
        labels(tree.post_order_iter().collect()),
        ["A", "B", "X", "C", "D", "E", "Y", "R"]
    );
    assert_eq!(
        labels(tree.edges_level_order().collect()),
        ["X", "Y", "A", "B", "C", "D", "E"]
    );
    assert_eq!(labels(tree.leaves().collect()), ["A", "B", "C", "D", "E"]);
}

#[test]
fn test_traversal_of_empty_tree() {
    let tree = PhyloTree::default();
    assert_eq!(tree.level_order_iter().count(), 0);
    assert_eq!(tree.pre_order_iter().count(), 0);
    assert_eq!(tree.post_order_iter().count(), 0);
    assert!(!tree.is_root_set());
}
