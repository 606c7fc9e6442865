//! Trait for constructing phylogenetic trees during parsing.
//!
//! The [`TreeBuilder`] trait decouples parsers from concrete tree representations.
//! The Newick parser calls builder methods as it reads the input, and the
//! builder assembles whatever tree structure it wants.
//!
//! # Built-in implementation
//! * [`ArenaTreeBuilder`] - Builds the arena [`Tree`] used by the layout
//!
//! # Builder lifecycle
//! A builder can construct multiple trees sequentially:
//!
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_*/set_name ──→ finish_tree() ──→ Empty
//!   ↑                                                                           │
//!   └───────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::model::tree::{Tree, VertexIndex};

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================T=
/// Abstraction for constructing trees during parsing.
///
/// Parsers are generic over this trait, calling its methods as they encounter
/// leaves, internal vertices, and roots in the input.
///
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_leaf`](Self::add_leaf), [`add_internal`](Self::add_internal),
///    [`add_root`](Self::add_root) or [`set_root`](Self::set_root)
///    -> build structure
/// 3. [`set_name`](Self::set_name) -> optionally assign a name
/// 4. [`finish_tree`](Self::finish_tree) -> finalize and return the tree
pub trait TreeBuilder {
    /// The type used to identify vertices during construction.
    ///
    /// Returned by the `add_*` methods, then passed to subsequent calls to
    /// connect parent-child relationships.
    type VertexIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// Prepares the builder for constructing a new tree.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of leaves (hint for allocation)
    fn init_next(&mut self, num_leaves: usize);

    /// Adds a leaf vertex to the tree under construction.
    ///
    /// # Arguments
    /// * `name` - Leaf label, `None` if the input had none
    /// * `branch_len` - Branch length to parent, if specified
    fn add_leaf(&mut self, name: Option<String>, branch_len: Option<f64>) -> Self::VertexIdx;

    /// Adds an internal (non-root) vertex with any number of children.
    ///
    /// # Arguments
    /// * `children` - Indices returned by previous `add_*` calls, in input order
    /// * `name` - Internal vertex label, if any
    /// * `branch_len` - Branch length to parent, if specified
    fn add_internal(
        &mut self,
        children: Vec<Self::VertexIdx>,
        name: Option<String>,
        branch_len: Option<f64>,
    ) -> Self::VertexIdx;

    /// Adds the root vertex, completing the tree structure.
    ///
    /// # Arguments
    /// * `children` - Indices of the root's child vertices
    /// * `name` - Root label, if any
    /// * `branch_len` - Root branch length (rare, but allowed in Newick)
    fn add_root(
        &mut self,
        children: Vec<Self::VertexIdx>,
        name: Option<String>,
        branch_len: Option<f64>,
    ) -> Self::VertexIdx;

    /// Declares an already added vertex the root (single-leaf trees).
    fn set_root(&mut self, index: Self::VertexIdx);

    /// Sets the name of the currently constructed tree.
    fn set_name(&mut self, tree_name: String);

    /// Finalizes the building process and returns the resulting tree.
    ///
    /// Transitions builder from a "construction" state to an "empty" state.
    /// Returns `None` if no tree was under construction.
    fn finish_tree(&mut self) -> Option<Self::Tree>;
}

// =#========================================================================#=
// ARENA TREE BUILDER
// =#========================================================================$=
/// [TreeBuilder] producing [Tree]s.
#[derive(Debug, Default)]
pub struct ArenaTreeBuilder {
    tree: Option<Tree>,
}

impl ArenaTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree_mut(&mut self) -> &mut Tree {
        // Tolerate callers skipping init_next
        self.tree.get_or_insert_with(|| Tree::new(0))
    }
}

impl TreeBuilder for ArenaTreeBuilder {
    type VertexIdx = VertexIndex;
    type Tree = Tree;

    fn init_next(&mut self, num_leaves: usize) {
        // n leaves give at most 2n - 1 vertices
        self.tree = Some(Tree::new((2 * num_leaves).saturating_sub(1)));
    }

    fn add_leaf(&mut self, name: Option<String>, branch_len: Option<f64>) -> VertexIndex {
        self.tree_mut().add_leaf(name, branch_len)
    }

    fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_len: Option<f64>,
    ) -> VertexIndex {
        self.tree_mut()
            .add_internal_vertex(children, name, branch_len)
    }

    fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_len: Option<f64>,
    ) -> VertexIndex {
        self.tree_mut().add_root(children, name, branch_len)
    }

    fn set_root(&mut self, index: VertexIndex) {
        self.tree_mut().set_root(index);
    }

    fn set_name(&mut self, tree_name: String) {
        self.tree_mut().set_name(tree_name);
    }

    fn finish_tree(&mut self) -> Option<Tree> {
        self.tree.take()
    }
}
