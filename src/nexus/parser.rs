//! Parser for NEXUS tree files.

use crate::model::tree_builder::{PhyloTreeBuilder, TreeBuilder};
use crate::model::LabelResolver;
use crate::newick::NewickParser;
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, DIMENSIONS, NEXUS_HEADER, NEXUS_LABEL_DELIMITERS, NTAX, NexusBlock,
    TAXLABELS, TRANSLATE, TREE,
};
use crate::parser::byte_parser::ConsumeMode::Inclusive;
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

// =#========================================================================#=
// NEXUS PARSER
// =#========================================================================€=
/// Parser for the first tree of a NEXUS file.
///
/// Reads the `#NEXUS` header, an optional TAXA block and the TREES block
/// with its optional TRANSLATE command. Other blocks are skipped. Vertex
/// annotations (`[&key=value,...]`) are always parsed.
///
/// Only the first `TREE` command is parsed; if more follow, they are
/// counted and a warning is logged.
///
/// # Example
/// ```
/// use phylotrunk::nexus::NexusParser;
///
/// let input = "#NEXUS
/// Begin taxa;
///     Dimensions ntax=3;
///     Taxlabels Kea Kaka Kakapo;
/// End;
/// Begin trees;
///     Translate 1 Kea, 2 Kaka, 3 Kakapo;
///     tree STATE_0 = [&R] ((1:1.0,2:1.0)[&height=1.0]:2.0,3:3.0)[&height=3.0];
/// End;";
///
/// let tree = NexusParser::for_str(input).parse_first_tree().unwrap();
/// assert_eq!(tree.name(), Some("STATE_0"));
/// assert_eq!(tree.leaves().map(|v| v.label().unwrap()).collect::<Vec<_>>(), vec!["Kea", "Kaka", "Kakapo"]);
/// ```
pub struct NexusParser<B: ByteSource, T: TreeBuilder> {
    byte_parser: ByteParser<B>,
    newick_parser: NewickParser<T>,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl NexusParser<InMemoryByteSource, PhyloTreeBuilder> {
    /// Creates a parser over the content of the file at `path`.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read.
    pub fn for_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(ByteParser::from_file(path)?, PhyloTreeBuilder::new()))
    }

    /// Creates a parser over a copy of the given string.
    pub fn for_str(input: &str) -> Self {
        Self::new(ByteParser::for_str(input), PhyloTreeBuilder::new())
    }
}

impl<B: ByteSource, T: TreeBuilder> NexusParser<B, T> {
    /// Creates a parser reading from `byte_parser` and building with `tree_builder`.
    pub fn new(byte_parser: ByteParser<B>, tree_builder: T) -> Self {
        Self {
            byte_parser,
            newick_parser: NewickParser::new(tree_builder).with_annotations(),
        }
    }

    /// Parses the file up to and including its first tree.
    ///
    /// # Errors
    /// * [MissingNexusHeader](crate::parser::ParsingErrorType::MissingNexusHeader)
    ///   if the file does not start with `#NEXUS`
    /// * [InvalidTaxaBlock](crate::parser::ParsingErrorType::InvalidTaxaBlock) /
    ///   [InvalidTreesBlock](crate::parser::ParsingErrorType::InvalidTreesBlock)
    ///   if a block is malformed or there is no tree
    /// * Any Newick parsing error of the tree itself
    pub fn parse_first_tree(mut self) -> Result<T::Tree, ParsingError> {
        self.parse_nexus_header()?;

        let mut taxa = Vec::new();
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.is_eof() {
                return Err(ParsingError::invalid_trees_block(
                    &self.byte_parser,
                    String::from("File contains no TREES block."),
                ));
            }

            match self.detect_next_block()? {
                NexusBlock::Taxa => taxa = self.parse_taxa_block()?,
                NexusBlock::Trees => return self.parse_trees_block(taxa),
                NexusBlock::Other(name) => {
                    debug!("Skipping NEXUS block '{name}'");
                    self.skip_to_block_end()?;
                }
            }
        }
    }
}

// ============================================================================
// Parsing helpers (private)
// ============================================================================
impl<B: ByteSource, T: TreeBuilder> NexusParser<B, T> {
    /// Parses header `#NEXUS` at start of file.
    fn parse_nexus_header(&mut self) -> Result<(), ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;

        if !self.byte_parser.consume_if_sequence(NEXUS_HEADER) {
            return Err(ParsingError::missing_nexus_header(&self.byte_parser));
        }

        Ok(())
    }

    /// Detects the next Nexus block, which must start with header
    /// `BEGIN <BlockType>;` (case-insensitive), consumes its header,
    /// and returns its type.
    fn detect_next_block(&mut self) -> Result<NexusBlock, ParsingError> {
        if !self.byte_parser.consume_if_sequence(BLOCK_BEGIN) {
            return Err(ParsingError::invalid_formatting(&self.byte_parser));
        }
        self.byte_parser.skip_comment_and_whitespace()?;

        let block_name = self.byte_parser.parse_unquoted_label(b";")?;
        if !self.byte_parser.consume_if(b';') {
            return Err(ParsingError::unexpected_eof(&self.byte_parser));
        }

        Ok(NexusBlock::from_name(&block_name))
    }

    /// Skips block, e.g. continuing until encountering and consuming `END;`.
    fn skip_to_block_end(&mut self) -> Result<(), ParsingError> {
        if !self.byte_parser.consume_until_sequence(BLOCK_END, Inclusive) {
            return Err(ParsingError::unexpected_eof(&self.byte_parser));
        }
        Ok(())
    }

    /// Skips the current command up to and including its `;`.
    fn skip_command(&mut self) -> Result<(), ParsingError> {
        if !self.byte_parser.consume_until(b';', Inclusive) {
            return Err(ParsingError::unexpected_eof(&self.byte_parser));
        }
        Ok(())
    }

    /// Parses TAXA block, extracting the taxon list from the `TAXLABELS`
    /// command and checking it against `DIMENSIONS NTAX=<n>;` if given.
    /// Other commands are skipped.
    fn parse_taxa_block(&mut self) -> Result<Vec<String>, ParsingError> {
        let mut ntax = None;
        let mut taxa = Vec::new();

        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.is_eof() {
                return Err(ParsingError::unexpected_eof(&self.byte_parser));
            }

            if self.byte_parser.consume_if_sequence(BLOCK_END) {
                break;
            } else if self.byte_parser.consume_if_sequence(DIMENSIONS) {
                ntax = Some(self.parse_taxa_block_ntax()?);
            } else if self.byte_parser.consume_if_sequence(TAXLABELS) {
                taxa = self.parse_taxa_block_labels()?;
            } else {
                self.skip_command()?;
            }
        }

        if let Some(ntax) = ntax.filter(|&n| n != taxa.len()) {
            return Err(ParsingError::invalid_taxa_block(
                &self.byte_parser,
                format!(
                    "Number of parsed labels ({}) did not match ntax value ({}).",
                    taxa.len(),
                    ntax
                ),
            ));
        }

        Ok(taxa)
    }

    /// Parses the rest of `DIMENSIONS NTAX=<n>;` after the keyword.
    fn parse_taxa_block_ntax(&mut self) -> Result<usize, ParsingError> {
        self.byte_parser.skip_whitespace();
        if !self.byte_parser.consume_if_sequence(NTAX) {
            return Err(ParsingError::invalid_taxa_block(
                &self.byte_parser,
                String::from("Expected 'NTAX' in TAXA block."),
            ));
        }

        self.byte_parser.skip_whitespace();
        if !self.byte_parser.consume_if(b'=') {
            return Err(ParsingError::invalid_taxa_block(
                &self.byte_parser,
                String::from("Expected '=' in TAXA block."),
            ));
        }

        self.byte_parser.skip_whitespace();
        let ntax_str = self.byte_parser.parse_unquoted_label(b"; \t\n\r")?;
        let ntax: usize = ntax_str.parse().map_err(|_| {
            ParsingError::invalid_taxa_block(
                &self.byte_parser,
                format!("Cannot parse `ntax` value: {}", ntax_str),
            )
        })?;
        self.skip_command()?;

        Ok(ntax)
    }

    /// Parses the labels of the `TAXLABELS` command, including its closing `;`.
    fn parse_taxa_block_labels(&mut self) -> Result<Vec<String>, ParsingError> {
        let mut taxa = Vec::new();
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;

            match self.byte_parser.peek() {
                None => return Err(ParsingError::unexpected_eof(&self.byte_parser)),
                Some(b';') => {
                    self.byte_parser.next_byte();
                    break;
                }
                Some(_) => {}
            }

            let label = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;
            if label.is_empty() {
                // Stray delimiter such as ','
                self.byte_parser.next_byte();
            } else {
                taxa.push(label);
            }
        }
        Ok(taxa)
    }

    /// Parses TREES block: optional `TRANSLATE`, then the first `TREE`.
    /// Remaining trees are counted and reported, not parsed.
    fn parse_trees_block(&mut self, taxa: Vec<String>) -> Result<T::Tree, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        let translation = if self.byte_parser.consume_if_sequence(TRANSLATE) {
            self.parse_tree_block_translate()?
        } else {
            HashMap::new()
        };

        let undeclared = translation
            .values()
            .find(|label| !taxa.is_empty() && !taxa.contains(label));
        if let Some(unknown) = undeclared {
            return Err(ParsingError::invalid_trees_block(
                &self.byte_parser,
                format!("TRANSLATE label '{unknown}' is not declared in TAXA block."),
            ));
        }

        if !translation.is_empty() || !taxa.is_empty() {
            self.newick_parser
                .set_resolver(LabelResolver::new_nexus_labels_resolver(translation, taxa));
        }

        // Move to the first TREE command, skipping others
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.is_eof() || self.byte_parser.peek_is_sequence(BLOCK_END) {
                return Err(ParsingError::invalid_trees_block(
                    &self.byte_parser,
                    String::from("TREES block contains no tree."),
                ));
            }
            if self.byte_parser.consume_if_sequence(TREE) {
                break;
            }
            self.skip_command()?;
        }

        let name = self.parse_tree_name()?;
        let tree = self
            .newick_parser
            .parse_str_and_name(&mut self.byte_parser, Some(name))?;

        let further_trees = self.count_remaining_trees()?;
        if further_trees > 0 {
            warn!(
                "TREES block holds {further_trees} further tree(s), only the first one is analyzed"
            );
        }

        Ok(tree)
    }

    /// Parses `<name> =` of a TREE command; a leading `*` (default tree marker)
    /// is skipped.
    fn parse_tree_name(&mut self) -> Result<String, ParsingError> {
        let mut name = self.byte_parser.parse_label(b" =;\t\n\r")?;
        if name == "*" {
            name = self.byte_parser.parse_label(b" =;\t\n\r")?;
        }

        self.byte_parser.skip_comment_and_whitespace()?;
        if !self.byte_parser.consume_if(b'=') {
            return Err(ParsingError::invalid_trees_block(
                &self.byte_parser,
                String::from("Expected '=' after tree name in tree command."),
            ));
        }
        Ok(name)
    }

    /// Parses the pairs of a `TRANSLATE` command after the keyword,
    /// including the closing `;`.
    fn parse_tree_block_translate(&mut self) -> Result<HashMap<String, String>, ParsingError> {
        let mut map = HashMap::new();
        loop {
            let key = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;
            let label = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;
            if key.is_empty() || label.is_empty() {
                return Err(ParsingError::invalid_trees_block(
                    &self.byte_parser,
                    String::from("Expected pair of key and label in TRANSLATE."),
                ));
            }
            map.insert(key, label);

            self.byte_parser.skip_comment_and_whitespace()?;
            match self.byte_parser.next_byte() {
                Some(b',') => continue,
                Some(b';') => break,
                None => return Err(ParsingError::unexpected_eof(&self.byte_parser)),
                Some(other) => {
                    return Err(ParsingError::invalid_trees_block(
                        &self.byte_parser,
                        format!("Unexpected char '{}' in TRANSLATE.", char::from(other)),
                    ));
                }
            }
        }
        Ok(map)
    }

    /// Counts the `TREE` commands left in the TREES block without parsing them.
    fn count_remaining_trees(&mut self) -> Result<usize, ParsingError> {
        let mut count = 0;
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.is_eof() || self.byte_parser.peek_is_sequence(BLOCK_END) {
                return Ok(count);
            }
            if self.byte_parser.consume_if_sequence(TREE) {
                count += 1;
            }
            self.skip_command()?;
        }
    }
}
