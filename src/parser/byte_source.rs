//! Byte source abstraction for the [ByteParser](crate::parser::ByteParser).
//!
//! Tree files handled by this crate hold a single tree of interest, so the
//! only provided implementation is [InMemoryByteSource], which owns the whole
//! input. The trait keeps the parser independent of where the bytes live.

use std::fs::File;
use std::io::Read;
use std::path::Path;

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Interface of a seekable byte stream consumed by the parser.
pub trait ByteSource {
    /// Returns the current byte without consuming it, or `None` at EOF.
    fn peek(&self) -> Option<u8>;

    /// Returns the current byte and advances past it, or `None` at EOF.
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns up to `k` bytes from the current position without consuming them.
    fn peek_slice(&self, k: usize) -> &[u8];

    /// Returns the current byte offset.
    fn position(&self) -> usize;

    /// Returns `true` once every byte has been consumed.
    fn is_eof(&self) -> bool;
}

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================$=
/// A byte source that owns its complete input.
pub struct InMemoryByteSource {
    input: Vec<u8>,
    pos: usize,
}

impl InMemoryByteSource {
    /// Wraps an owned byte vector.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            input: bytes,
            pos: 0,
        }
    }

    /// Reads the entire file at `path` into memory.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut contents = Vec::new();
        File::open(path)?.read_to_end(&mut contents)?;
        Ok(Self::from_vec(contents))
    }
}

impl ByteSource for InMemoryByteSource {
    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    #[inline]
    fn peek_slice(&self, k: usize) -> &[u8] {
        let start = self.pos.min(self.input.len());
        let end = (self.pos + k).min(self.input.len());
        &self.input[start..end]
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
