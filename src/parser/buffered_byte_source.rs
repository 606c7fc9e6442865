//! Buffered reader implementation of byte source for parsing.
//!
//! This module provides [BufferedByteSource], which wraps a file in a
//! [BufReader] for streaming I/O. Coordinate tables for large trees are read
//! this way, row by row, instead of being loaded whole.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::parser::byte_source::ByteSource;

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================$=
/// A buffered byte source for streaming files.
pub struct BufferedByteSource {
    /// Underlying reader of file, handles getting chunks from file
    reader: BufReader<File>,

    /// Current absolute position in the stream
    pos: usize,
}

impl BufferedByteSource {
    /// Creates a new buffered byte source from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<BufferedByteSource> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            pos: 0,
        })
    }
}

impl ByteSource for BufferedByteSource {
    fn peek(&mut self) -> Option<u8> {
        let buf = self.reader.fill_buf().ok()?;
        buf.first().copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.reader.consume(1);
        self.pos += 1;
        Some(byte)
    }

    /// Only returns what is currently buffered, which may be fewer than `k`
    /// bytes close to a buffer boundary.
    fn get_context(&mut self, k: usize) -> Vec<u8> {
        match self.reader.fill_buf() {
            Ok(buf) => buf[..k.min(buf.len())].to_vec(),
            Err(_) => Vec::new(),
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_eof(&mut self) -> bool {
        match self.reader.fill_buf() {
            Ok(buf) => buf.is_empty(),
            Err(_) => true,
        }
    }
}
