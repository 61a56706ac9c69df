//! Format-agnostic reading and writing of a single tree.
//!
//! Both binaries take `--input-format` (and `findtrunk` additionally
//! `--output-format`); [TreeFormat] is the typed form of those flags.

use crate::model::PhyloTree;
use crate::newick::writer::{NewickStyle, write_newick_file};
use crate::nexus::NexusWriter;
use crate::parser::ParsingError;
use crate::{newick, nexus};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Supported tree file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TreeFormat {
    /// One Newick string, optionally with `[&key=value]` annotations
    Newick,
    /// NEXUS file with a TREES block (as written by BEAST)
    #[default]
    Nexus,
}

impl FromStr for TreeFormat {
    type Err = String;

    /// Parses a format name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newick" => Ok(TreeFormat::Newick),
            "nexus" => Ok(TreeFormat::Nexus),
            other => Err(format!("unknown tree format '{other}' (expected newick or nexus)")),
        }
    }
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFormat::Newick => write!(f, "newick"),
            TreeFormat::Nexus => write!(f, "nexus"),
        }
    }
}

/// Reads the first tree of the file at `path`, annotations included.
///
/// Further trees in the file are ignored with a warning.
///
/// # Errors
/// Returns a [ParsingError] if the file cannot be read or is not valid in
/// the given format.
pub fn read_tree<P: AsRef<Path>>(path: P, format: TreeFormat) -> Result<PhyloTree, ParsingError> {
    match format {
        TreeFormat::Newick => newick::parse_file(path),
        TreeFormat::Nexus => nexus::parse_file(path),
    }
}

/// Writes `tree` with all its annotations to `path`, replacing any
/// existing file.
///
/// # Errors
/// Returns an I/O error if the file cannot be created or written.
pub fn write_tree<P: AsRef<Path>>(path: P, tree: &PhyloTree, format: TreeFormat) -> io::Result<()> {
    let file = File::create(path)?;
    match format {
        TreeFormat::Newick => write_newick_file(file, tree, NewickStyle::Annotated),
        TreeFormat::Nexus => NexusWriter::new(file).write_nexus(tree),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str_ignores_case() {
        assert_eq!("NEXUS".parse::<TreeFormat>(), Ok(TreeFormat::Nexus));
        assert_eq!(" newick ".parse::<TreeFormat>(), Ok(TreeFormat::Newick));
        assert!("phylip".parse::<TreeFormat>().is_err());
    }

    #[test]
    fn test_format_display_round_trip() {
        for format in [TreeFormat::Newick, TreeFormat::Nexus] {
            assert_eq!(format.to_string().parse::<TreeFormat>(), Ok(format));
        }
    }
}
