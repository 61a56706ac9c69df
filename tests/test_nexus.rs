use phylotrunk::model::{AnnotationValue, PhyloTreeBuilder};
use phylotrunk::nexus::{NexusParser, NexusWriter, parse_file};
use phylotrunk::parser::{ByteParser, ParsingErrorType};
use phylotrunk::{TreeFormat, read_tree, write_tree};
use std::path::Path;

fn beast_fixture() -> std::path::PathBuf {
    Path::new("tests").join("fixtures").join("beast_annotated.trees")
}

// --- TESTS NEXUS PARSING ---
#[test]
fn test_beast_tree_with_translate() {
    let result = parse_file(beast_fixture());
    if let Err(e) = &result {
        eprintln!("Error parsing annotated tree: {:?}", e);
    }
    let tree = result.unwrap();

    assert_eq!(tree.name(), Some("TREE1"));
    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.num_vertices(), 7);
    assert!(tree.is_valid());

    let leaves: Vec<_> = tree.leaves().map(|v| v.label().unwrap()).collect();
    assert_eq!(leaves, vec!["A_ch_2001", "B_de_2003", "C_ch_2005", "D_fr_2006"]);
}

#[test]
fn test_beast_annotations_survive() {
    let tree = parse_file(beast_fixture()).unwrap();
    let annotations = tree.annotations();
    let root = tree.root_index();
    assert_eq!(annotations.get("height", root), Some(&AnnotationValue::Float(7.0)));
    assert_eq!(
        annotations.get("location", root),
        Some(&AnnotationValue::String("CH".to_string()))
    );

    let a = tree.leaves().next().unwrap().index();
    assert_eq!(
        annotations.get("location.set", a),
        Some(&AnnotationValue::String("{\"CH\",\"DE\"}".to_string()))
    );
    assert!(
        tree.vertices()
            .all(|v| annotations.get("location", v.index()).is_some())
    );
}

#[test]
fn test_tree_without_taxa_block() {
    let input = "#NEXUS\nBEGIN TREES;\n\tTREE t1 = [&R] ((A:1,B:1):1,C:2);\nEND;\n";
    let tree = NexusParser::for_str(input).parse_first_tree().unwrap();
    assert_eq!(tree.name(), Some("t1"));
    assert_eq!(tree.num_leaves(), 3);
}

#[test]
fn test_numeric_labels_index_taxa_without_translate() {
    let input = "#NEXUS\nBegin taxa;\n\tDimensions ntax=2;\n\tTaxlabels Kea Kaka;\nEnd;\n\
                 Begin trees;\n\ttree * best = (2:1,1:1);\nEnd;\n";
    let tree = NexusParser::for_str(input).parse_first_tree().unwrap();
    let leaves: Vec<_> = tree.leaves().map(|v| v.label().unwrap()).collect();
    assert_eq!(leaves, vec!["Kaka", "Kea"]);
    assert_eq!(tree.name(), Some("best"));
}

#[test]
fn test_explicit_parser_construction() {
    let parser = NexusParser::new(
        ByteParser::for_str("#NEXUS\nBegin trees;\ntree t = (A:1,B:1);\nEnd;"),
        PhyloTreeBuilder::new(),
    );
    let tree = parser.parse_first_tree().unwrap();
    assert_eq!(tree.num_leaves(), 2);
}

// --- TESTS INVALID NEXUS ---
#[test]
fn test_missing_header() {
    let err = NexusParser::for_str("Begin trees;\ntree t = (A,B);\nEnd;")
        .parse_first_tree()
        .unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::MissingNexusHeader);
}

#[test]
fn test_file_without_trees_block() {
    let path = Path::new("tests").join("fixtures").join("no_trees.nex");
    let err = parse_file(path).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidTreesBlock(_)));
}

#[test]
fn test_ntax_mismatch() {
    let input = "#NEXUS\nBegin taxa;\n\tDimensions ntax=3;\n\tTaxlabels A B;\nEnd;\n\
                 Begin trees;\n\ttree t = (A,B);\nEnd;\n";
    let err = NexusParser::for_str(input).parse_first_tree().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidTaxaBlock(_)));
}

#[test]
fn test_translate_label_not_in_taxa() {
    let input = "#NEXUS\nBegin taxa;\n\tDimensions ntax=2;\n\tTaxlabels A B;\nEnd;\n\
                 Begin trees;\n\tTranslate 1 A, 2 Z;\n\ttree t = (1,2);\nEnd;\n";
    let err = NexusParser::for_str(input).parse_first_tree().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidTreesBlock(_)));
}

#[test]
fn test_unknown_leaf_label() {
    let input = "#NEXUS\nBegin taxa;\n\tDimensions ntax=2;\n\tTaxlabels A B;\nEnd;\n\
                 Begin trees;\n\ttree t = (A,Q);\nEnd;\n";
    let err = NexusParser::for_str(input).parse_first_tree().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::UnresolvedLabel(_)));
}

#[test]
fn test_empty_trees_block() {
    let err = NexusParser::for_str("#NEXUS\nBegin trees;\nEnd;\n")
        .parse_first_tree()
        .unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidTreesBlock(_)));
}

// --- TESTS NEXUS WRITING ---
#[test]
fn test_writer_output_layout() {
    let tree = phylotrunk::newick::parse_str("((Kea:1,'Kaka bird':1)[&trunk=2]:1,Kea:2);").unwrap();
    let mut buffer = Vec::new();
    NexusWriter::new(&mut buffer).write_nexus(&tree).unwrap();
    let written = String::from_utf8(buffer).unwrap();

    let expected = "#NEXUS\n\
                    Begin taxa;\n\
                    \tDimensions ntax=2;\n\
                    \tTaxlabels Kea 'Kaka bird';\n\
                    End;\n\
                    Begin trees;\n\
                    \tTranslate\n\
                    \t\t1 Kea,\n\
                    \t\t2 'Kaka bird'\n\
                    \t;\n\
                    \ttree tree_1 = [&R] ((1:1,2:1)[&trunk=2]:1,1:2);\n\
                    End;\n";
    assert_eq!(written, expected);
}

#[test]
fn test_write_and_read_back() {
    let tree = parse_file(beast_fixture()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.trees");

    write_tree(&path, &tree, TreeFormat::Nexus).unwrap();
    let reread = read_tree(&path, TreeFormat::Nexus).unwrap();

    assert_eq!(reread.name(), tree.name());
    let labels = |t: &phylotrunk::PhyloTree| -> Vec<String> {
        t.leaves().map(|v| v.label().unwrap().to_string()).collect()
    };
    assert_eq!(labels(&reread), labels(&tree));
    assert_eq!(reread.annotations(), tree.annotations());
}
