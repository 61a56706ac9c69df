//! Newick format parser and writer for rooted phylogenetic trees.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string into a [PhyloTree]
//! * [`parse_file`] - parses the first tree of a file into a [PhyloTree]
//! * [`to_newick`] / [`write_newick_file`] - serialize a tree
//!
//! Both quick parsing functions read BEAST-style annotations.
//!
//! # Format
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex {',' vertex} ')' [label] suffix`
//! * `leaf ::= [label] suffix`
//! * `suffix ::= [annotation] [':' number] [annotation]`
//! * `annotation ::= '[&' key '=' value {',' key '=' value} ']'`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch length
//! * Labels can be single-quoted, with `''` standing for a literal quote
//! * Square brackets not starting with `&` are comments and are skipped

mod defs;
pub mod parser;
pub mod writer;

pub use parser::NewickParser;
pub use writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::PhyloTree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use log::warn;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses the first Newick tree of a file.
///
/// Further trees in the file are not parsed; a warning is logged instead.
///
/// # Errors
/// [ParsingError] if the file cannot be read, holds no tree, or the first
/// tree is not valid Newick.
///
/// # Example
/// ```no_run
/// use phylotrunk::newick::parse_file;
///
/// let tree = parse_file("takahe.nwk")?;
/// println!("Parsed tree with {} leaves", tree.num_leaves());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<PhyloTree, ParsingError> {
    let mut byte_parser = ByteParser::from_file(path)?;
    let mut newick_parser = NewickParser::new_defaults().with_annotations();
    let tree = newick_parser.parse_str(&mut byte_parser)?;

    byte_parser.skip_comment_and_whitespace()?;
    if !byte_parser.is_eof() {
        warn!("Input holds more than one tree, only the first one is analyzed");
    }
    Ok(tree)
}

/// Parses a single Newick string to obtain a [PhyloTree].
///
/// # Example
/// ```
/// use phylotrunk::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata)[&height=0.5]);")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut newick_parser = NewickParser::new_defaults().with_annotations();
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    newick_parser.parse_str(&mut byte_parser)
}
