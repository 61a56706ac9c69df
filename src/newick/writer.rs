//! Newick format writing for [PhyloTree].

use crate::model::tree::VertexIndex;
use crate::model::vertex::BranchLength;
use crate::model::{AnnotationValue, PhyloTree};
use crate::parser::utils::{escape_annotation_value, escape_label};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Style for serializing a tree to Newick format.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NewickStyle {
    /// Labels and branch lengths only
    Plain,
    /// Also writes vertex annotations as BEAST-style `[&key=value,...]`
    /// blocks, placed between label and branch length
    #[default]
    Annotated,
}

/// Writes the tree to a file as a single Newick line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file(file: File, tree: &PhyloTree, style: NewickStyle) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(to_newick(style, tree).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of the tree with closing semicolon.
///
/// Labels are escaped if necessary; annotation keys come out sorted.
/// A tree without root yields just `;`.
///
/// # Example
/// ```
/// use phylotrunk::model::{AnnotationValue, BranchLength, PhyloTree};
/// use phylotrunk::newick::{NewickStyle, to_newick};
///
/// let mut tree = PhyloTree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), Some("A".to_string()));
/// let b = tree.add_leaf(Some(BranchLength::new(2.5)), Some("B C".to_string()));
/// tree.add_root(vec![a, b], None, None);
/// tree.annotations_mut().add("trunk", b, AnnotationValue::Int(0));
///
/// assert_eq!(to_newick(NewickStyle::Plain, &tree), "(A:1,'B C':2.5);");
/// assert_eq!(to_newick(NewickStyle::Annotated, &tree), "(A:1,'B C'[&trunk=0]:2.5);");
/// ```
pub fn to_newick(style: NewickStyle, tree: &PhyloTree) -> String {
    to_newick_translated(style, tree, None)
}

/// Returns the Newick representation of the tree, replacing leaf labels by
/// their key in `translation` (as used with a Nexus TRANSLATE command).
pub(crate) fn to_newick_translated(
    style: NewickStyle,
    tree: &PhyloTree,
    translation: Option<&HashMap<String, usize>>,
) -> String {
    fn build_newick(
        tree: &PhyloTree,
        newick: &mut String,
        index: VertexIndex,
        style: NewickStyle,
        translation: Option<&HashMap<String, usize>>,
    ) {
        let vertex = &tree[index];

        if !vertex.is_leaf() {
            newick.push('(');
            for (i, &child) in vertex.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child, style, translation);
            }
            newick.push(')');
        }

        if let Some(label) = vertex.label() {
            match translation.and_then(|t| t.get(label)) {
                Some(key) if vertex.is_leaf() => newick.push_str(&key.to_string()),
                _ => newick.push_str(&escape_label(label)),
            }
        }
        if style == NewickStyle::Annotated {
            push_annotations(tree, newick, index);
        }
        push_branch_length(newick, vertex.branch_length());
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    if tree.is_root_set() {
        build_newick(tree, &mut newick, tree.root_index(), style, translation);
    }
    newick.push(';');
    newick
}

fn push_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
    if let Some(branch_length) = branch_length {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

fn push_annotations(tree: &PhyloTree, newick: &mut String, index: VertexIndex) {
    let mut first = true;
    for (key, value) in tree.annotations().for_vertex(index) {
        newick.push_str(if first { "[&" } else { "," });
        first = false;
        newick.push_str(key);
        newick.push('=');
        match value {
            AnnotationValue::String(s) => newick.push_str(&escape_annotation_value(s)),
            other => newick.push_str(&other.to_string()),
        }
    }
    if !first {
        newick.push(']');
    }
}

/// Rough capacity estimate to avoid reallocations while writing.
fn estimate_newick_len(tree: &PhyloTree) -> usize {
    // "(,)" per vertex plus ~20 chars per branch length, plus labels
    const VERTEX_CHARS: usize = 3;
    const BRANCH_LENGTH_CHARS: usize = 20;

    let label_chars: usize = tree
        .vertices()
        .filter_map(|v| v.label())
        .map(str::len)
        .sum();
    tree.num_vertices() * (VERTEX_CHARS + BRANCH_LENGTH_CHARS) + label_chars + 1
}
