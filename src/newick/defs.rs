//! Constants and definitions for the Newick parser and writer.

/// Newick label delimiters: parentheses, comma, colon, semicolon, brackets, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Delimiters of an unquoted annotation key
pub(crate) const ANNOTATION_KEY_DELIMITERS: &[u8] = b"=,] \n\t\r";

/// Delimiters of an unquoted annotation value
pub(crate) const ANNOTATION_VALUE_DELIMITERS: &[u8] = b",]";

/// Default guess for number of vertices, when unknown
pub(crate) const DEFAULT_NUM_VERTICES_GUESS: usize = 32;
