//! Tree model: arena [Tree] of n-ary [Vertex]es and the [TreeBuilder]
//! abstraction used by the Newick parser.

/// Phylogenetic tree structure and operations
pub mod tree;
/// Construction of trees during parsing
pub mod tree_builder;
/// Tree vertex type
pub mod vertex;

pub use tree::{PostOrderIter, PreOrderIter, Tree, VertexIndex};
pub use tree_builder::{ArenaTreeBuilder, TreeBuilder};
pub use vertex::{BranchLength, Vertex};
