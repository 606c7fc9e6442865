//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse a single tree or all trees of a source.

use crate::model::tree_builder::{ArenaTreeBuilder, TreeBuilder};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for single/multiple Newick format phylogenetic trees
/// with any number of children per vertex.
///
/// Generic over [TreeBuilder] (construction).
///
/// # Construction
/// * [`new(tree_builder)`](Self::new) - generic constructor
/// * [`new_arena_defaults()`](Self::new_arena_defaults)
///     - uses [ArenaTreeBuilder], producing [Tree](crate::model::Tree)s
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Can be configured with number of leaves in trees to parse,
///       otherwise it is inferred from the first parsed tree and then stored.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
///
/// # Example
/// ```
/// use cosmic_tree::newick::NewickParser;
/// use cosmic_tree::parser::ByteParser;
///
/// let input = "((Pan_troglodytes:6.4,Homo_sapiens:6.4)Hominini:2.4,Gorilla_gorilla:8.8);";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::new_arena_defaults();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub struct NewickParser<T: TreeBuilder> {
    know_num_leaves: bool,
    num_leaves: usize,
    tree_builder: T,
}

// ============================================================================
// Construction & Configuration, Deconstruction (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Creates a new [NewickParser] with the given tree builder.
    pub fn new(tree_builder: T) -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
            tree_builder,
        }
    }

    /// Sets the expected number of leaves in each parsed tree.
    ///
    /// This allows pre-allocation of data structures for better performance.
    /// If not set, the parser will count leaves during parsing.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

impl NewickParser<ArenaTreeBuilder> {
    /// Creates a new [NewickParser] for [Tree](crate::model::Tree)
    /// with default settings:
    /// - Number of leaves is unknown (will be counted during parsing)
    pub fn new_arena_defaults() -> Self {
        Self::new(ArenaTreeBuilder::new())
    }
}

impl Default for NewickParser<ArenaTreeBuilder> {
    fn default() -> Self {
        Self::new_arena_defaults()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<T::Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all<B: ByteSource>(
        &mut self,
        mut byte_parser: ByteParser<B>,
    ) -> Result<Vec<T::Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(T::Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::Tree, ParsingError> {
        self.tree_builder.init_next(self.num_leaves);

        // If number of leaves not know yet, reset it to 0,
        // so actual count can now be tracked
        if !self.know_num_leaves {
            self.num_leaves = 0;
        }

        self.parse_root(parser)?;

        // Having parsed a full tree,
        // the number of leaves in a tree is now known
        self.know_num_leaves = true;

        self.tree_builder.finish_tree().ok_or_else(|| {
            ParsingError::invalid_newick_string(parser, "No tree was constructed".to_string())
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl<T: TreeBuilder> NewickParser<T> {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][:branch_length];` or `label[:branch_length];`
    /// - Skips leading comments and whitespace
    ///
    /// Equivalent to `parse_vertex` but takes care of root specialities.
    fn parse_root<B: ByteSource>(&mut self, parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        if parser.peek_is(b'(') {
            let children = self.parse_children(parser)?;
            let name = Self::parse_optional_label(parser)?;
            let branch_length = self.parse_branch_length(parser)?;
            Self::expect_semicolon(parser)?;
            self.tree_builder.add_root(children, name, branch_length);
        } else {
            // Single-leaf tree
            let leaf_index = self.parse_leaf(parser)?;
            Self::expect_semicolon(parser)?;
            self.tree_builder.set_root(leaf_index);
        }

        Ok(())
    }

    /// Consumes the terminating semicolon.
    fn expect_semicolon<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            }
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }
        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index:
    /// - Skips leading comments and whitespace
    /// - Dispatches to `parse_internal_vertex` if starts with `(`, otherwise `parse_leaf`
    fn parse_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::VertexIdx, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_vertex(parser)
        } else {
            self.parse_leaf(parser)
        }
    }

    /// Parses internal vertex, adds it to tree, and returns its index:
    /// - `(children)[label][:branch_length]`
    fn parse_internal_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::VertexIdx, ParsingError> {
        let children = self.parse_children(parser)?;
        let name = Self::parse_optional_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;
        Ok(self.tree_builder.add_internal(children, name, branch_length))
    }

    /// Parses children list `(first, second, ...)` and returns their indices:
    /// - Expects parser at opening `(`
    ///   (caller should skip leading comments/whitespace)
    /// - A single child is allowed
    fn parse_children<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Vec<T::VertexIdx>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = vec![self.parse_vertex(parser)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            match parser.next_byte() {
                Some(b',') => children.push(self.parse_vertex(parser)?),
                Some(b')') => break,
                Some(b) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!("Expected ',' or ')' after child but found {:?}", char::from(b)),
                    ));
                }
                None => return Err(ParsingError::unexpected_eof(parser)),
            }
        }

        Ok(children)
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `[label][:branch_length]`
    /// - Expects parser at start of label
    ///   (caller should skip leading comments/whitespace)
    fn parse_leaf<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<T::VertexIdx, ParsingError> {
        let name = Self::parse_optional_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;
        if !self.know_num_leaves {
            self.num_leaves += 1;
        }

        Ok(self.tree_builder.add_leaf(name, branch_length))
    }

    /// Parses a label, mapping an empty one to `None`.
    fn parse_optional_label<B: ByteSource>(
        parser: &mut ByteParser<B>,
    ) -> Result<Option<String>, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok(if label.is_empty() { None } else { Some(label) })
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`) and negative values
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if it couldn't parse branch length value
    fn parse_branch_length<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<f64>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+' || b == b'e' || b == b'E' {
                branch_length_str.push(b as char);
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {:?}", branch_length_str),
            )
        })?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    fn parse(input: &str) -> Result<crate::model::Tree, ParsingError> {
        let mut byte_parser = ByteParser::for_str(input);
        NewickParser::new_arena_defaults().parse_str(&mut byte_parser)
    }

    #[test]
    fn test_internal_labels_and_polytomy() {
        let tree = parse("(A:1,B:1,C:1)Root:0;").unwrap();
        assert_eq!(tree.root().children().len(), 3);
        assert_eq!(tree.root().name(), Some("Root"));
        assert_eq!(tree.root().branch_length(), Some(0.0));
    }

    #[test]
    fn test_leaf_count_is_learned() {
        let mut newick_parser = NewickParser::new_arena_defaults();
        let mut byte_parser = ByteParser::for_str("(A,(B,C));");
        newick_parser.parse_str(&mut byte_parser).unwrap();
        assert!(newick_parser.know_num_leaves);
        assert_eq!(newick_parser.num_leaves, 3);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("(A,B)").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
    }

    #[test]
    fn test_garbage_between_children() {
        let err = parse("(A B);").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
    }

    #[test]
    fn test_bad_branch_length() {
        let err = parse("(A:abc,B);").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
    }
}
