//! Low-level byte-by-byte parser for text input.
//!
//! This module provides [ByteParser] for parsing text-based file formats with
//! support for peeking, consuming, comment skipping, and quote-aware label
//! parsing. Used as the foundation for both the Newick reader and the leaf
//! coordinate table reader.

use crate::parser::buffered_byte_source::BufferedByteSource;
use crate::parser::byte_source::ByteSource;
use crate::parser::in_memory_byte_source::InMemoryByteSource;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================$=
/// A byte-by-byte parser with support for peeking, consuming, and skipping.
///
/// # Features
/// - Works with any [ByteSource] (in-memory or buffered)
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes for Newick, double quotes for CSV)
/// - Context extraction for error reporting
///
/// Labels are collected as raw bytes and decoded as UTF-8, so non-ASCII
/// taxon names survive parsing; invalid UTF-8 is an error.
///
/// # Example
/// ```
/// use cosmic_tree::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] 'Homo sapiens':0.1");
/// parser.skip_comment_and_whitespace().unwrap();
/// let label = parser.parse_label(b":,;()").unwrap();
/// assert_eq!(label, "Homo sapiens");
/// assert!(parser.consume_if(b':'));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new [ByteParser] over a copy of the given string.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }
}

impl ByteParser<BufferedByteSource> {
    /// Creates a new [ByteParser] streaming the file through a buffered reader.
    ///
    /// # Errors
    /// Returns a [ParsingError] of type `IoError` if the file cannot be opened.
    pub fn for_buffered_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        Ok(Self::new(BufferedByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new [ByteParser] from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Returns `true` if the current byte equals `ch`.
    #[inline]
    pub fn peek_is(&mut self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters
    /// (space, tab, newline, carriage return).
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a comment `[...]` if present.
    ///
    /// Extended Newick annotations such as `[&&NHX:S=human]` are comments too.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        self.consume_until_any(&[target], mode).is_some()
    }

    /// Consumes bytes until any of the target bytes is found.
    ///
    /// # Returns
    /// `Some(u8)` with the found byte, or `None` if EOF was reached first
    pub fn consume_until_any(&mut self, targets: &[u8], mode: ConsumeMode) -> Option<u8> {
        while let Some(b) = self.peek() {
            if targets.contains(&b) {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return Some(b);
            }

            self.next_byte();
        }
        None
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&mut self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Returns a string from up to `k` bytes from the current position for
    /// error context. Invalid UTF-8 is replaced lossily.
    pub fn get_context_as_string(&mut self, k: usize) -> String {
        let context_bytes = self.source.get_context(k);
        String::from_utf8_lossy(&context_bytes).into_owned()
    }

    /// Parses a Newick label (quoted or unquoted) with the given delimiter set.
    ///
    /// Detects whether the label is single-quoted or unquoted. An empty label
    /// (delimiter right away) is valid and returned as empty string.
    ///
    /// # Errors
    /// Returns an error on an unclosed comment or quote, or invalid UTF-8.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek_is(b'\'') {
            self.parse_quoted(b'\'')
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a single CSV field: either double-quoted (with `""` escape) or
    /// raw until one of `delimiters`. Surrounding spaces of unquoted fields
    /// are trimmed.
    ///
    /// # Errors
    /// Returns an error if a quoted field is not closed or a field is not
    /// valid UTF-8.
    pub fn parse_field(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        while self.peek_is(b' ') || self.peek_is(b'\t') {
            self.next_byte();
        }

        if self.peek_is(b'"') {
            let field = self.parse_quoted(b'"')?;
            // Anything between closing quote and delimiter is dropped
            self.consume_until_any(delimiters, ConsumeMode::Exclusive);
            Ok(field)
        } else {
            let field = self.parse_unquoted_label(delimiters)?;
            Ok(field.trim().to_string())
        }
    }

    /// Parses an unquoted label until any of the given delimiters (or EOF).
    ///
    /// # Errors
    /// Returns an `InvalidUtf8` error if the label is not valid UTF-8.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let mut bytes = Vec::new();

        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }

        self.decode_label(bytes)
    }

    /// Parses a label enclosed in `quote` bytes; a doubled quote inside the
    /// label stands for one literal quote (`'Wilson''s'` becomes `Wilson's`).
    fn parse_quoted(&mut self, quote: u8) -> Result<String, ParsingError> {
        self.next_byte(); // opening quote

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                Some(b) if b == quote => {
                    if self.peek_is(quote) {
                        bytes.push(quote);
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => bytes.push(b),
                None => return Err(ParsingError::unclosed_quote(self)),
            }
        }

        self.decode_label(bytes)
    }

    fn decode_label(&mut self, bytes: Vec<u8>) -> Result<String, ParsingError> {
        String::from_utf8(bytes).map_err(|_| ParsingError::invalid_utf8(self))
    }
}

/// Specifies whether to consume or leave the target when using
/// `consume_until` methods.
///
/// # Examples
/// ```
/// use cosmic_tree::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("name,x,y\nA,1,2");
///
/// // Inclusive: consume up to and including the end of the header line
/// parser.consume_until(b'\n', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b'A'));
///
/// // Exclusive: stop right at the delimiter
/// parser.consume_until(b',', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b','));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    #[test]
    fn test_skip_nested_whitespace_and_comments() {
        let mut parser = ByteParser::for_str(" \n[first] \t[&&NHX:S=kiwi]\r\nA");
        parser.skip_comment_and_whitespace().unwrap();
        assert_eq!(parser.peek(), Some(b'A'));
    }

    #[test]
    fn test_unclosed_comment() {
        let mut parser = ByteParser::for_str("[never closed");
        let err = parser.skip_comment_and_whitespace().unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnclosedComment);
    }

    #[test]
    fn test_quoted_label_with_escaped_quote() {
        let mut parser = ByteParser::for_str("'Baillon''s Crake':1.0");
        let label = parser.parse_label(b":,;()").unwrap();
        assert_eq!(label, "Baillon's Crake");
        assert_eq!(parser.peek(), Some(b':'));
    }

    #[test]
    fn test_unclosed_quote() {
        let mut parser = ByteParser::for_str("'Takahe");
        let err = parser.parse_label(b":,;()").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
    }

    #[test]
    fn test_non_ascii_label() {
        let mut parser = ByteParser::for_str("Kākāpō:2");
        let label = parser.parse_label(b":,;()").unwrap();
        assert_eq!(label, "Kākāpō");
    }

    #[test]
    fn test_invalid_utf8_label() {
        let source = InMemoryByteSource::from_vec(b"Ka\xFFkapo:2".to_vec());
        let mut parser = ByteParser::new(source);
        let err = parser.parse_label(b":,;()").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::InvalidUtf8);

        let source = InMemoryByteSource::from_vec(b"\"Apteryx \xC3\",1,2".to_vec());
        let mut parser = ByteParser::new(source);
        let err = parser.parse_field(b",\r\n").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::InvalidUtf8);
    }

    #[test]
    fn test_csv_fields() {
        let mut parser = ByteParser::for_str("\"Apteryx, haastii\" , 1.5 ,2\n");
        assert_eq!(parser.parse_field(b",\r\n").unwrap(), "Apteryx, haastii");
        assert!(parser.consume_if(b','));
        assert_eq!(parser.parse_field(b",\r\n").unwrap(), "1.5");
        assert!(parser.consume_if(b','));
        assert_eq!(parser.parse_field(b",\r\n").unwrap(), "2");
        assert!(parser.peek_is(b'\n'));
    }
}
