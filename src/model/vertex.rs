//! Vertex module for phylogenetic tree representation.

use crate::model::tree::VertexIndex;

/// Length of the edge between a vertex and its parent.
///
/// Kept as plain `f64`; negative or non-finite values are accepted during
/// construction and reported by [Tree::validate](crate::model::Tree::validate).
pub type BranchLength = f64;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex is
/// - the **root** if it is the tree's root (no parent),
/// - a **leaf** if it has no children,
/// - **internal** otherwise.
///
/// A tree consisting of a single vertex has a root that is also a leaf.
///
/// # Invariants (checked by tree validation, not on construction)
/// - `index` is the position of this vertex in the tree arena
/// - every child lists this vertex as its `parent`
/// - `branch_length`, if set, is non-negative and finite
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    /// Index of this vertex in the tree arena
    index: VertexIndex,
    /// Name of this vertex; leaves usually have one, internal vertices may
    name: Option<String>,
    /// Index of the parent vertex, `None` for the root (or while detached)
    parent: Option<VertexIndex>,
    /// Ordered child indices, empty for leaves
    children: Vec<VertexIndex>,
    /// Distance to parent vertex
    branch_length: Option<BranchLength>,
}

impl Vertex {
    /// Creates a new leaf vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `name` - Leaf label, `None` if the input had none
    /// * `branch_length` - Distance to parent vertex
    pub fn new_leaf(
        index: VertexIndex,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            name,
            parent: None,
            children: Vec::new(),
            branch_length,
        }
    }

    /// Creates a new vertex with children (internal vertex or root).
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            name,
            parent: None,
            children,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the name of this vertex, if it has a non-empty one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Returns the branch length to the parent, if one was given.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Sets the branch length to the parent.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    /// Returns the index of the parent, `None` for the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<VertexIndex>) {
        self.parent = parent;
    }

    /// Returns the ordered children of this vertex (empty for leaves).
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the first child, if any.
    pub fn first_child(&self) -> Option<VertexIndex> {
        self.children.first().copied()
    }

    /// Returns the last child, if any.
    pub fn last_child(&self) -> Option<VertexIndex> {
        self.children.last().copied()
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex has children.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }
}
