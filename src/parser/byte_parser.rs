//! Low-level byte-by-byte parser for ASCII tree files.
//!
//! [ByteParser] offers peeking, consuming, case-insensitive matching,
//! comment skipping and quote-aware label parsing. Both the Newick and the
//! Nexus reader are built on top of it.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================$=
/// A byte-by-byte parser over a [ByteSource].
///
/// Matching of single bytes and sequences is ASCII case-insensitive, since
/// Nexus keywords are. Square brackets `[...]` are treated as comments by
/// [`skip_comment`](Self::skip_comment); callers that care about
/// `[&...]` annotations must check for them before skipping.
///
/// # Example
/// ```
/// use phylotrunk::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] BEGIN TREES;");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert!(parser.consume_if_sequence(b"begin"));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a parser over a copy of the given string.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }

    /// Creates a parser over the full content of the file at `path`.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a parser over the given source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Returns the current byte and advances past it.
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips spaces, tabs, newlines and carriage returns.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Skips a `[...]` comment if the parser is positioned at one.
    ///
    /// # Returns
    /// * `Ok(true)` - a comment was consumed
    /// * `Ok(false)` - no comment at the current position
    /// * `Err(ParsingError)` - the comment is never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if !self.consume_if(b'[') {
            return Ok(false);
        }
        if !self.consume_until(b']', ConsumeMode::Inclusive) {
            return Err(ParsingError::unclosed_comment(self));
        }
        Ok(true)
    }

    /// Skips any mix of whitespace and `[...]` comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();
        while self.skip_comment()? {
            self.skip_whitespace();
        }
        Ok(())
    }

    /// Checks whether the current byte equals `ch`, ignoring ASCII case.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek().is_some_and(|b| b.eq_ignore_ascii_case(&ch))
    }

    /// Checks whether the upcoming bytes equal `sequence`, ignoring ASCII case.
    pub fn peek_is_sequence(&self, sequence: &[u8]) -> bool {
        let upcoming = self.source.peek_slice(sequence.len());
        upcoming.len() == sequence.len() && upcoming.eq_ignore_ascii_case(sequence)
    }

    /// Consumes the current byte if it equals `ch` (ignoring ASCII case).
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes the upcoming bytes if they equal `sequence` (ignoring ASCII case).
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if !self.peek_is_sequence(sequence) {
            return false;
        }
        for _ in 0..sequence.len() {
            self.next_byte();
        }
        true
    }

    /// Consumes bytes until `target` is found.
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first.
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return true;
            }
            self.next_byte();
        }
        false
    }

    /// Consumes bytes until the upcoming bytes equal `sequence` (ignoring ASCII case).
    ///
    /// # Returns
    /// `true` if the sequence was found, `false` if EOF was reached first.
    pub fn consume_until_sequence(&mut self, sequence: &[u8], mode: ConsumeMode) -> bool {
        while !self.is_eof() {
            if self.peek_is_sequence(sequence) {
                if mode == ConsumeMode::Inclusive {
                    for _ in 0..sequence.len() {
                        self.next_byte();
                    }
                }
                return true;
            }
            self.next_byte();
        }
        false
    }

    /// Returns `true` once the whole input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current byte offset.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Returns up to `k` upcoming bytes as a (lossy) string for error messages.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.source.peek_slice(k)).into_owned()
    }

    /// Parses a label that is either single-quoted or unquoted.
    ///
    /// Leading whitespace and comments are skipped first.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label(b'\'')
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a label enclosed in `quote`, which must be the current byte.
    ///
    /// A doubled quote inside the label stands for one literal quote,
    /// e.g. `'Baillon''s crake'` becomes `Baillon's crake`.
    ///
    /// # Errors
    /// Returns [ParsingErrorType::UnclosedQuote](crate::parser::ParsingErrorType::UnclosedQuote)
    /// if the input ends before the closing quote.
    pub fn parse_quoted_label(&mut self, quote: u8) -> Result<String, ParsingError> {
        self.next_byte(); // opening quote

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                None => return Err(ParsingError::unclosed_quote(self)),
                Some(b) if b == quote => {
                    if self.peek() == Some(quote) {
                        bytes.push(quote);
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => bytes.push(b),
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parses an unquoted label up to (excluding) the first delimiter or EOF.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Whether `consume_until` methods also consume the target itself.
///
/// # Examples
/// ```
/// use phylotrunk::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("TREE t1 = ((A:0.5,B:0.5):0.3,C:0.8);");
/// parser.consume_until(b'=', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b' '));
///
/// let mut parser = ByteParser::for_str("('Wilson''s_Storm-petrel')");
/// parser.consume_until(b'\'', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b'\''));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target along with everything before it.
    Inclusive,
    /// Stop right before the target.
    Exclusive,
}
