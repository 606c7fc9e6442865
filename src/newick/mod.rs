//! Newick format parser for phylogenetic trees.
//!
//! This module provides [NewickParser] to parse Newick format strings
//! into tree structures. The parser uses a
//! [TreeBuilder](crate::model::TreeBuilder) internally.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_file`] - parses a file, returns all contained [Tree]s
//! * [`parse_str`] - parses a single string, returns a [Tree]
//!
//! # Full API
//! For more control, configure a [NewickParser] and
//! provide data via a [ByteParser]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//!
//! # Format
//! The grammar accepted is:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]`
//! * `leaf ::= [label] [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Labels may be single-quoted (`'Homo sapiens'`, with `''` as escaped quote)
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments are square brackets and can occur anywhere where whitespace is allowed
//! * Extended Newick annotations (`[&&NHX:...]`, `[&rate=0.5]`) are skipped as comments
//! * Branch lengths may be negative here; [Tree::validate] rejects them later

mod defs;
pub mod parser;

pub use parser::NewickParser;

use crate::model::Tree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a Newick file eagerly and returns all trees.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///   with semicolon-separated list of Newick strings
///
/// # Returns
/// * `Vec<Tree>` - All parsed trees, in file order
/// * [ParsingError] - If file reading fails or Newick format is invalid
///
/// # Example
/// ```no_run
/// use cosmic_tree::newick::parse_file;
///
/// let trees = parse_file("primates.nwk")?;
/// println!("Parsed {} trees", trees.len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Tree>, ParsingError> {
    let byte_parser = ByteParser::for_buffered_file(path)?;
    let mut newick_parser = NewickParser::new_arena_defaults();
    newick_parser.parse_all(byte_parser)
}

/// Parses a single Newick string to obtain a [Tree].
///
/// # Arguments
/// * `newick` - The Newick format string to parse
///
/// # Returns
/// * [Tree] - Tree parsed from the string
/// * [ParsingError] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use cosmic_tree::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut newick_parser = NewickParser::new_arena_defaults();
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    newick_parser.parse_str(&mut byte_parser)
}
