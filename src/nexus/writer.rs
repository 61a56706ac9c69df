//! NEXUS format file writer for an annotated [PhyloTree].

use crate::model::PhyloTree;
use crate::newick::writer::{NewickStyle, to_newick_translated};
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, DIMENSIONS, NEXUS_HEADER, NTAX, ROOTED, TAXA, TAXLABELS, TRANSLATE,
    TREE, TREES,
};
use crate::parser::utils::escape_label;
use std::collections::HashMap;
use std::io;
use std::io::{BufWriter, Write};

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================#=
/// Writer for a single phylogenetic tree in NEXUS format.
///
/// # Format Structure
/// - `#NEXUS` header
/// - `TAXA` block with dimensions and tax labels (distinct leaf labels in
///   pre-order)
/// - `TREES` block with a 1-based TRANSLATE command and one `TREE` command,
///   vertex annotations written as `[&key=value,...]`
///
/// # Example
/// ```no_run
/// use phylotrunk::nexus::NexusWriter;
/// use std::fs::File;
///
/// let tree = phylotrunk::newick::parse_str("((A:1,B:1):1,C:2);")?;
/// let mut writer = NexusWriter::new(File::create("out.tree")?);
/// writer.write_nexus(&tree)?;
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct NexusWriter<W: Write> {
    bw: BufWriter<W>,
}

// ============================================================================
// API (public)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Creates a new NEXUS writer on top of `inner`.
    pub fn new(inner: W) -> NexusWriter<W> {
        NexusWriter {
            bw: BufWriter::new(inner),
        }
    }

    /// Writes a complete NEXUS file holding the given tree.
    ///
    /// # Errors
    /// Returns an I/O error if writing fails
    pub fn write_nexus(&mut self, tree: &PhyloTree) -> io::Result<()> {
        let taxa = distinct_leaf_labels(tree);
        self.header()?
            .taxa_block(&taxa)?
            .trees_block(tree, &taxa)?;
        self.bw.flush()
    }
}

/// Distinct leaf labels in pre-order of first appearance.
fn distinct_leaf_labels(tree: &PhyloTree) -> Vec<String> {
    let mut taxa: Vec<String> = Vec::new();
    for label in tree.leaves().filter_map(|v| v.label()) {
        if !taxa.iter().any(|t| t == label) {
            taxa.push(label.to_string());
        }
    }
    taxa
}

// ============================================================================
// Nexus Block & Command Writing (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Writes the NEXUS file header ("#NEXUS"), returning itself for chaining.
    fn header(&mut self) -> io::Result<&mut Self> {
        self.write_all(NEXUS_HEADER)?.newline()?;
        Ok(self)
    }

    /// Writes the TAXA block with dimensions and taxon labels, returning itself for chaining.
    fn taxa_block(&mut self, taxa: &[String]) -> io::Result<&mut Self> {
        // "Begin TAXA;"
        self.write_all(BLOCK_BEGIN)?
            .space()?
            .write_all(TAXA)?
            .newline()?;

        // "\tDimensions ntax=n;"
        self.tab()?
            .write_all(DIMENSIONS)?
            .space()?
            .write_all(NTAX)?
            .equals()?
            .write_all(taxa.len().to_string().as_bytes())?
            .semicolon_ln()?;

        // "\tTaxlabels [label ...];"
        self.tab()?.write_all(TAXLABELS)?;
        for label in taxa {
            self.space()?.write_all(escape_label(label).as_bytes())?;
        }
        self.semicolon_ln()?;

        // "End;"
        self.write_all(BLOCK_END)?.newline()?;

        Ok(self)
    }

    /// Writes the TREES block with TRANSLATE command and the tree, returning itself for chaining.
    fn trees_block(&mut self, tree: &PhyloTree, taxa: &[String]) -> io::Result<&mut Self> {
        // "Begin TREES;"
        self.write_all(BLOCK_BEGIN)?
            .space()?
            .write_all(TREES)?
            .newline()?;

        let translation: HashMap<String, usize> = taxa
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i + 1))
            .collect();
        if !taxa.is_empty() {
            self.translate_cmd(taxa)?;
        }

        // "\ttree <name> = [&R] <Newick;>"
        let name = tree.name().map(escape_label).unwrap_or_else(|| "tree_1".to_string());
        let newick = to_newick_translated(NewickStyle::Annotated, tree, Some(&translation));
        self.tab()?
            .write_all(TREE)?
            .space()?
            .write_all(name.as_bytes())?
            .space()?
            .equals()?
            .space()?
            .write_all(ROOTED)?
            .space()?
            .write_all(newick.as_bytes())?
            .newline()?;

        // "End;"
        self.write_all(BLOCK_END)?.newline()?;

        Ok(self)
    }

    /// Writes the TRANSLATE command mapping 1-based indices to labels, returning itself for chaining.
    fn translate_cmd(&mut self, taxa: &[String]) -> io::Result<&mut Self> {
        self.tab()?.write_all(TRANSLATE)?.newline()?;

        for (i, label) in taxa.iter().enumerate() {
            // "\t\t(id + 1) escaped_label,\n"
            self.tab()?
                .tab()?
                .write_all((i + 1).to_string().as_bytes())?
                .space()?
                .write_all(escape_label(label).as_bytes())?;

            // No comma after last pair
            if i + 1 < taxa.len() {
                self.comma()?;
            }
            self.newline()?;
        }
        self.tab()?.semicolon_ln()?;

        Ok(self)
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Appends a byte slice to the [BufWriter], returning itself for chaining.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.bw.write_all(buf)?;
        Ok(self)
    }

    fn space(&mut self) -> io::Result<&mut Self> {
        self.write_all(b" ")
    }

    fn tab(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\t")
    }

    fn newline(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\n")
    }

    /// Appends a semicolon followed by a newline (';\n'), returning itself for chaining.
    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.write_all(b";\n")
    }

    fn comma(&mut self) -> io::Result<&mut Self> {
        self.write_all(b",")
    }

    fn equals(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"=")
    }
}
