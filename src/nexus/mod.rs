//! NEXUS format parser and writer for phylogenetic trees.
//!
//! This module provides:
//! - [NexusParser]: for reading the first tree of a NEXUS file
//! - [NexusWriter]: for writing a tree with its annotations
//!
//! # Quick API
//! - [`parse_file`]: parses the first tree of a file into a [PhyloTree]
//!
//! # Format
//! A NEXUS tree file typically contains:
//! - A TAXA block defining the species/labels
//! - A TREES block containing one or more phylogenetic trees, as written by
//!   BEAST or the `findtrunk` tool
//! - An optional TRANSLATE command mapping short keys to full taxon labels
//!
//! ## Assumptions
//! * A TREES block is present; a TAXA block, if present, precedes it
//! * Other blocks (DATA, ASSUMPTIONS, ...) are skipped
//! * A `TRANSLATE` command, if present, precedes any `TREE` command:
//!   - Command is a comma separated list of pairs `TRANSLATE <key> <label>, ...;`
//!   - `<label>` must match a label provided in the `TAXA` block, if there is one
//!   - A label with a space or an apostrophe in it must be enclosed in single
//!     quotes, an apostrophe doubled: `'Wilson''s storm-petrel'`
//! * One tree command has format `tree <name> = [&R] <Newick string>;`

mod defs;
mod parser;
mod writer;

pub use self::parser::NexusParser;
pub use self::writer::NexusWriter;

use crate::model::PhyloTree;
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (public)
// ============================================================================
/// Parses the first tree of a Nexus file, annotations included.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<PhyloTree, ParsingError> {
    NexusParser::for_file(path)?.parse_first_tree()
}
