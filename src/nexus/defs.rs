//! Keywords of the Nexus subset read and written by this crate.
//!
//! Matching against these byte strings is case-insensitive on input; the
//! spelling here is the one used when writing.

/// Bytes that end an unquoted taxon label or translate key.
pub(crate) const NEXUS_LABEL_DELIMITERS: &[u8] = b" ,;\t\n\r";

pub(crate) const NEXUS_HEADER: &[u8] = b"#NEXUS";
pub(crate) const BLOCK_BEGIN: &[u8] = b"Begin";
/// Includes the terminating semicolon.
pub(crate) const BLOCK_END: &[u8] = b"End;";

// ==== Taxa block ====
pub(crate) const TAXA: &[u8] = b"taxa;";
pub(crate) const DIMENSIONS: &[u8] = b"Dimensions";
pub(crate) const NTAX: &[u8] = b"ntax";
pub(crate) const TAXLABELS: &[u8] = b"Taxlabels";

// ==== Trees block ====
pub(crate) const TREES: &[u8] = b"trees;";
pub(crate) const TRANSLATE: &[u8] = b"Translate";
pub(crate) const TREE: &[u8] = b"tree";
/// Written in front of every tree; annotated trunk trees are always rooted.
pub(crate) const ROOTED: &[u8] = b"[&R]";

/// Blocks the parser distinguishes. Anything else is skipped up to its `End;`.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum NexusBlock {
    Taxa,
    Trees,
    Other(String),
}

impl NexusBlock {
    /// Classifies a block by the name following `Begin`.
    pub(crate) fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("taxa") {
            NexusBlock::Taxa
        } else if trimmed.eq_ignore_ascii_case("trees") {
            NexusBlock::Trees
        } else {
            NexusBlock::Other(trimmed.to_string())
        }
    }
}
