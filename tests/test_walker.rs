use phylotrunk::model::PhyloTree;
use phylotrunk::newick::parse_str;
use phylotrunk::trunk::find_trunk;
use phylotrunk::walker::{TrunkThreshold, WalkConfig, walk_trunk};
use phylotrunk::{AnalysisError, TreeFormat, read_tree, write_tree};
use std::path::Path;

fn annotated_beast_tree() -> PhyloTree {
    let path = Path::new("tests").join("fixtures").join("beast_annotated.trees");
    let mut tree = read_tree(path, TreeFormat::Nexus).unwrap();
    find_trunk(&mut tree).unwrap();
    tree
}

// --- TESTS WALK ---
#[test]
fn test_walk_beast_tree() {
    let tree = annotated_beast_tree();
    let result = walk_trunk(&tree, &WalkConfig::new("location")).unwrap();

    let transitions = result.transitions();
    assert_eq!(transitions.len(), 2);

    // Root to its first child
    let first = &transitions[0];
    assert_eq!((first.from_id, first.to_id), (0, 1));
    assert_eq!((first.from_age, first.to_age), (7.0, 5.0));
    assert_eq!(first.duration, 2.0);
    assert_eq!((first.from_value.as_str(), first.to_value.as_str()), ("CH", "CH"));
    assert!(!first.is_switch());

    // Second child chained to the first one
    let second = &transitions[1];
    assert_eq!((second.from_id, second.to_id), (1, 2));
    assert_eq!((second.from_age, second.to_age), (5.0, 4.0));
    assert_eq!(second.duration, 3.0);
    assert_eq!((second.from_value.as_str(), second.to_value.as_str()), ("CH", "FR"));
    assert_eq!(second.switch_flag, 1);

    assert_eq!(result.switch_count(), 1);
    assert_eq!(result.durations().get("CH", "CH"), Some(2.0));
    assert_eq!(result.durations().get("CH", "FR"), Some(3.0));
    let permanence: Vec<_> = result.durations().permanence().collect();
    assert_eq!(permanence, vec![("CH", 2.0)]);
}

#[test]
fn test_threshold_is_strict() {
    let tree = annotated_beast_tree();

    let config = WalkConfig::new("location").with_threshold(TrunkThreshold::new(1).unwrap());
    assert_eq!(walk_trunk(&tree, &config).unwrap().transitions().len(), 2);

    let config = WalkConfig::new("location").with_threshold(TrunkThreshold::new(2).unwrap());
    let result = walk_trunk(&tree, &config).unwrap();
    assert!(result.transitions().is_empty());
    assert_eq!(result.switch_count(), 0);
    assert!(result.durations().is_empty());
}

#[test]
fn test_walk_after_writing_annotated_tree() {
    let tree = annotated_beast_tree();
    let expected = walk_trunk(&tree, &WalkConfig::new("location")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rsv_out.tree");
    write_tree(&path, &tree, TreeFormat::Nexus).unwrap();
    let reread = read_tree(&path, TreeFormat::Nexus).unwrap();

    assert_eq!(walk_trunk(&reread, &WalkConfig::new("location")).unwrap(), expected);
}

#[test]
fn test_walk_is_deterministic() {
    let tree = annotated_beast_tree();
    let config = WalkConfig::new("location");
    assert_eq!(walk_trunk(&tree, &config).unwrap(), walk_trunk(&tree, &config).unwrap());
}

#[test]
fn test_walk_only_descends_through_outer_contexts() {
    // X is processed as a child of the root and never becomes a context, so
    // the trunk edge into P is not walked
    let mut tree = parse_str(
        "(((A[&s=a,height=0]:1,B[&s=a,height=0]:1)P[&s=b,height=1]:1,C[&s=a,height=0]:2)X[&s=a,height=2]:1,\
         D[&s=a,height=0]:3)R[&s=a,height=3];",
    )
    .unwrap();
    find_trunk(&mut tree).unwrap();
    let result = walk_trunk(&tree, &WalkConfig::new("s")).unwrap();

    let pairs: Vec<(usize, usize)> = result
        .transitions()
        .iter()
        .map(|t| (t.from_id, t.to_id))
        .collect();
    assert_eq!(pairs, vec![(0, 1)]);
    assert_eq!(result.switch_count(), 0);
}

// --- TESTS PRECONDITIONS ---
#[test]
fn test_tree_without_trunk_annotation() {
    let path = Path::new("tests").join("fixtures").join("beast_annotated.trees");
    let tree = read_tree(path, TreeFormat::Nexus).unwrap();
    let err = walk_trunk(&tree, &WalkConfig::new("location")).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingAnnotation { ref key, .. } if key == "trunk"));
}

#[test]
fn test_unknown_trait() {
    let tree = annotated_beast_tree();
    let err = walk_trunk(&tree, &WalkConfig::new("host")).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingAnnotation { ref key, .. } if key == "host"));
}

#[test]
fn test_negative_trunk_is_invalid() {
    let tree = parse_str("(A[&s=a,height=0,trunk=-1]:1,B[&s=a,height=0,trunk=1]:1)[&s=a,height=1];")
        .unwrap();
    let err = walk_trunk(&tree, &WalkConfig::new("s")).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidAnnotation { ref key, .. } if key == "trunk"));
}

#[test]
fn test_invalid_thresholds() {
    assert!(matches!(
        "-3".parse::<TrunkThreshold>(),
        Err(AnalysisError::InvalidThreshold(_))
    ));
    assert!(matches!(
        "0.5".parse::<TrunkThreshold>(),
        Err(AnalysisError::InvalidThreshold(_))
    ));
    assert!(TrunkThreshold::try_from(-1).is_err());
}
