//! Provides the arena tree representation.
//!
//! * [Tree] - rooted, ordered tree using the arena pattern
//! * [VertexIndex] - type used to index vertices in a tree
//! * [PreOrderIter] and [PostOrderIter] - stack-based traversals

use crate::layout::LayoutError;
use crate::model::vertex::{BranchLength, Vertex};

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex], which is stable for the lifetime of the tree. All tables
/// derived by the layout (heights, positions, segments) are indexed the same
/// way, so no vertex references are ever stored.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Vertices may have any number of children, kept in input order.
/// - Index of root is maintained.
/// - Branch lengths are optional.
///
/// # Construction
/// Add vertices bottom-up: leaves first, then vertices listing already added
/// children, finally the root. Check the result with [`Tree::validate()`].
///
/// ```
/// use cosmic_tree::model::Tree;
///
/// let mut tree = Tree::new(5);
/// let a = tree.add_leaf(Some("A".to_string()), Some(1.0));
/// let b = tree.add_leaf(Some("B".to_string()), Some(1.0));
/// let ab = tree.add_internal_vertex(vec![a, b], None, Some(1.0));
/// let c = tree.add_leaf(Some("C".to_string()), Some(2.0));
/// tree.add_root(vec![ab, c], None, None);
///
/// assert!(tree.validate().is_ok());
/// assert_eq!(tree.num_leaves(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Name of tree; optional
    name: Option<String>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new empty tree with room for `capacity` vertices.
    pub fn new(capacity: usize) -> Self {
        Tree {
            vertices: Vec::with_capacity(capacity),
            root_index: NO_ROOT_SET_INDEX,
            name: None,
        }
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// The leaf stays detached until a vertex listing it as child is added.
    pub fn add_leaf(
        &mut self,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, name, branch_length));
        index
    }

    /// Adds a vertex with the given (already added) children, assigning a
    /// unique index, which gets returned. Sets the parent of each child.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(Some(index));
        }
        self.vertices
            .push(Vertex::new_internal(index, children, name, branch_length));
        index
    }

    /// Adds the root vertex with the given children and marks it as root.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        name: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.add_internal_vertex(children, name, branch_length);
        self.root_index = index;
        index
    }

    /// Marks an already added vertex as root, e.g. for a single-leaf tree.
    pub fn set_root(&mut self, index: VertexIndex) {
        self.root_index = index;
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns all vertices in arena order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of vertices with at least one child (root included).
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the leaves reachable from the root, in left-to-right order.
    pub fn leaves(&self) -> Vec<VertexIndex> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(Vertex::index)
            .collect()
    }

    /// Returns the index of the first leaf called `name`, if any.
    pub fn leaf_index(&self, name: &str) -> Option<VertexIndex> {
        self.pre_order_iter()
            .find(|v| v.is_leaf() && v.name() == Some(name))
            .map(Vertex::index)
    }

    /// Checks whether any non-root vertex carries a non-zero branch length.
    ///
    /// Trees where this is `false` are laid out with unit branch lengths.
    pub fn has_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .filter(|v| v.index() != self.root_index)
            .any(|v| v.branch_length().is_some_and(|bl| bl != 0.0))
    }
}

// ============================================================================
// Validation, Pruning (pub)
// ============================================================================
impl Tree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, valid, and the root has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Every vertex is reached exactly once from the root
    ///   (no detached vertices, no second root, no cycles or shared children)
    /// - Branch lengths are non-negative and finite
    ///
    /// # Errors
    /// [LayoutError::MalformedTree] describing the first violation found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let num_vertices = self.vertices.len();

        if !self.is_root_set() {
            return Err(LayoutError::malformed_tree("no root set"));
        }
        if self.root_index >= num_vertices {
            return Err(LayoutError::malformed_tree(format!(
                "root index {} out of bounds",
                self.root_index
            )));
        }
        if self.root().has_parent() {
            return Err(LayoutError::malformed_tree(format!(
                "root vertex {} has a parent",
                self.root_index
            )));
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return Err(LayoutError::malformed_tree(format!(
                    "vertex stored at {index} claims index {}",
                    vertex.index()
                )));
            }

            if let Some(bl) = vertex.branch_length() {
                if !bl.is_finite() || bl < 0.0 {
                    return Err(LayoutError::malformed_tree(format!(
                        "vertex {} has invalid branch length {bl}",
                        self.describe(index)
                    )));
                }
            }

            for &child in vertex.children() {
                if child >= num_vertices {
                    return Err(LayoutError::malformed_tree(format!(
                        "vertex {index} has out of bounds child {child}"
                    )));
                }
                if self.vertices[child].parent() != Some(index) {
                    return Err(LayoutError::malformed_tree(format!(
                        "child {} of vertex {index} does not point back to it",
                        self.describe(child)
                    )));
                }
            }

            if let Some(parent) = vertex.parent() {
                if parent >= num_vertices || !self.vertices[parent].children().contains(&index) {
                    return Err(LayoutError::malformed_tree(format!(
                        "vertex {} is not a child of its parent {parent}",
                        self.describe(index)
                    )));
                }
            }
        }

        // Reachability from root
        let mut visited = vec![false; num_vertices];
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if visited[index] {
                return Err(LayoutError::malformed_tree(format!(
                    "vertex {} is reached twice from the root",
                    self.describe(index)
                )));
            }
            visited[index] = true;
            stack.extend(self.vertices[index].children());
        }

        let unreached: Vec<VertexIndex> = (0..num_vertices).filter(|&i| !visited[i]).collect();
        if let Some(&index) = unreached
            .iter()
            .find(|&&i| !self.vertices[i].has_parent() && self.vertices[i].is_internal())
        {
            return Err(LayoutError::malformed_tree(format!(
                "multiple roots, vertex {} has no parent",
                self.describe(index)
            )));
        }
        if let Some(&index) = unreached.first() {
            return Err(LayoutError::malformed_tree(format!(
                "vertex {} is detached from the root",
                self.describe(index)
            )));
        }

        Ok(())
    }

    /// Returns a copy of this tree restricted to the leaves for which `keep`
    /// returns `true`, preserving branch lengths.
    ///
    /// - Vertices without any kept leaf below them are removed.
    /// - A vertex left with a single child by the pruning is merged into that
    ///   child, whose branch length becomes the sum of both.
    /// - If the root is merged that way, its remaining child becomes the root.
    ///
    /// Vertex indices of the copy differ from this tree's; leaf order is kept.
    ///
    /// # Errors
    /// [LayoutError::MissingData] if no leaf is kept.
    pub fn prune<F>(&self, keep: F) -> Result<Tree, LayoutError>
    where
        F: Fn(&Vertex) -> bool,
    {
        let mut pruned = Tree::new(self.num_vertices());
        pruned.name = self.name.clone();

        // Index in `pruned` for each vertex of `self`
        let mut mapped: Vec<Option<VertexIndex>> = vec![None; self.num_vertices()];

        for vertex in self.post_order_iter() {
            let name = vertex.name().map(str::to_string);

            if vertex.is_leaf() {
                if keep(vertex) {
                    mapped[vertex.index()] = Some(pruned.add_leaf(name, vertex.branch_length()));
                }
                continue;
            }

            let kept: Vec<VertexIndex> = vertex
                .children()
                .iter()
                .filter_map(|&child| mapped[child])
                .collect();

            mapped[vertex.index()] = match kept.len() {
                0 => None,
                1 if vertex.children().len() > 1 => {
                    let child = kept[0];
                    let merged =
                        sum_branch_lengths(pruned[child].branch_length(), vertex.branch_length());
                    pruned[child].set_branch_length(merged);
                    Some(child)
                }
                _ => Some(pruned.add_internal_vertex(kept, name, vertex.branch_length())),
            };
        }

        let root = mapped
            .get(self.root_index)
            .copied()
            .flatten()
            .ok_or_else(|| LayoutError::missing_data("no leaf of the tree is kept"))?;
        pruned.set_root(root);

        Ok(pruned)
    }

    /// Name for error messages: index plus name if present.
    fn describe(&self, index: VertexIndex) -> String {
        match self.vertices.get(index).and_then(Vertex::name) {
            Some(name) => format!("{index} ('{name}')"),
            None => index.to_string(),
        }
    }
}

fn sum_branch_lengths(a: Option<BranchLength>, b: Option<BranchLength>) -> Option<BranchLength> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Useful for aggregating data from leaves upward, e.g. averaging child
    /// positions.
    ///
    /// # Example
    /// ```
    /// use cosmic_tree::model::Tree;
    ///
    /// let mut tree = Tree::new(3);
    /// let a = tree.add_leaf(Some("A".to_string()), Some(1.0));
    /// let b = tree.add_leaf(Some("B".to_string()), Some(1.0));
    /// let root = tree.add_root(vec![a, b], None, None);
    ///
    /// let indices: Vec<_> = tree.post_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![a, b, root]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Useful for propagating data from root to leaves, e.g. heights.
    ///
    /// # Example
    /// ```
    /// use cosmic_tree::model::Tree;
    ///
    /// let mut tree = Tree::new(3);
    /// let a = tree.add_leaf(Some("A".to_string()), Some(1.0));
    /// let b = tree.add_leaf(Some("B".to_string()), Some(1.0));
    /// let root = tree.add_root(vec![a, b], None, None);
    ///
    /// let indices: Vec<_> = tree.pre_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![root, a, b]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// Uses an explicit stack instead of recursion, so deep (caterpillar) trees
/// cannot overflow the call stack.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        for &child in vertex.children().iter().rev() {
            self.stack.push(child);
        }

        Some(vertex)
    }
}
