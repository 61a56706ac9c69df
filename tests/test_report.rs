use phylotrunk::newick::parse_str;
use phylotrunk::report::{write_summary_csv, write_switches_csv};
use phylotrunk::trunk::find_trunk;
use phylotrunk::walker::{WalkConfig, walk_trunk};
use phylotrunk::{TreeFormat, read_tree};
use std::fs;
use std::fs::File;
use std::path::Path;

#[test]
fn test_beast_tree_tables() {
    let path = Path::new("tests").join("fixtures").join("beast_annotated.trees");
    let mut tree = read_tree(path, TreeFormat::Nexus).unwrap();
    find_trunk(&mut tree).unwrap();
    let result = walk_trunk(&tree, &WalkConfig::new("location")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let switches = dir.path().join("rsv_location_switches.csv");
    let summary = dir.path().join("rsv_location_summary.csv");
    write_switches_csv(File::create(&switches).unwrap(), result.transitions()).unwrap();
    write_summary_csv(File::create(&summary).unwrap(), result.durations()).unwrap();

    assert_eq!(
        fs::read_to_string(&switches).unwrap(),
        "FROM-ID,TO-ID,F-AGE,T-AGE,DURATION,VFROM,VTO,C\n\
         0,1,7.0,5.0,2.0,CH,CH,0\n\
         1,2,5.0,4.0,3.0,CH,FR,1\n"
    );
    assert_eq!(
        fs::read_to_string(&summary).unwrap(),
        "VFROM,VTO,DURATION\nCH,CH,2.0\n"
    );
}

#[test]
fn test_summary_sums_and_orders_by_value() {
    let mut tree = parse_str(
        "((A[&s=z,height=0]:1,B[&s=z,height=0]:1)[&s=z,height=1]:1.5,\
         (C[&s=b,height=0]:1,D[&s=b,height=0]:1)[&s=b,height=1]:0.5,\
         (E[&s=b,height=0]:1,F[&s=b,height=0]:1)[&s=b,height=1]:2)[&s=z,height=2.5];",
    )
    .unwrap();
    find_trunk(&mut tree).unwrap();
    let result = walk_trunk(&tree, &WalkConfig::new("s")).unwrap();
    assert_eq!(result.switch_count(), 1);

    let mut out = Vec::new();
    write_summary_csv(&mut out, result.durations()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "VFROM,VTO,DURATION\nb,b,2.0\nz,z,1.5\n"
    );
}

#[test]
fn test_values_with_commas_are_quoted() {
    let mut tree = parse_str(
        "((A[&s=\"Bern, CH\",height=0]:1,B[&s=x,height=0]:1)[&s=\"Bern, CH\",height=1]:1,\
         C[&s=x,height=0]:1)[&s='say \"hi\"',height=2];",
    )
    .unwrap();
    find_trunk(&mut tree).unwrap();
    let result = walk_trunk(&tree, &WalkConfig::new("s")).unwrap();

    let mut out = Vec::new();
    write_switches_csv(&mut out, result.transitions()).unwrap();
    let written = String::from_utf8(out).unwrap();
    assert_eq!(
        written.lines().nth(1),
        Some("0,1,2.0,1.0,1.0,\"say \"\"hi\"\"\",\"Bern, CH\",1")
    );
}
