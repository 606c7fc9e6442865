//! 3D layout of a phylogenetic tree.
//!
//! [TreeLayouter] computes a position for every vertex of a [Tree] and the
//! [BranchSegment]s connecting them, in one of two modes:
//!
//! * **Topology** (no leaf coordinates): a ladder dendrogram with depth on x,
//!   leaf rank on y and height on z.
//! * **Coordinates** (with [LeafCoordinates]): leaves at their given x, y;
//!   internal vertices at the average of their children, dragged toward their
//!   parent.
//!
//! Either result can be projected onto a pseudo-sphere ([spherical]).
//!
//! # Example
//! ```
//! use cosmic_tree::layout::{LayoutParams, TreeLayouter};
//! use cosmic_tree::newick::parse_str;
//!
//! let tree = parse_str("((A:1,B:1):1,C:2);").unwrap();
//! let layout = TreeLayouter::new(LayoutParams::default())
//!     .layout(&tree, None)
//!     .unwrap();
//!
//! assert_eq!(layout.placements().len(), 5);
//! assert_eq!(layout.branches().len(), 6);
//! assert_eq!(layout.position_of("C").unwrap().x, 2.0);
//! ```

mod branches;
mod dendrogram;
mod height;
mod layout_error;
mod params;
mod point;
mod projected;
pub mod spherical;

pub use branches::{BranchSegment, SegmentKind};
pub use layout_error::LayoutError;
pub use params::{BranchStyle, DEFAULT_DRAG, DEFAULT_LATITUDE_LIMITS, DEFAULT_LONGITUDE_LIMITS, LayoutParams};
pub use point::Point3;

use crate::coords::LeafCoordinates;
use crate::model::{Tree, VertexIndex};
use log::{debug, info, warn};
use spherical::SphereBounds;

// =#========================================================================#=
// LAYOUT RESULT
// =#========================================================================$=
/// Position and metadata of one tree vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePlacement {
    /// Vertex name; unnamed vertices get `internal{i}` (or `leaf{i}` for
    /// leaves) with `i` their pre-order rank
    pub name: String,
    pub position: Point3,
    /// Distance from the root
    pub height: f64,
    pub is_leaf: bool,
}

/// A coordinate row without counterpart in the tree.
///
/// Never an endpoint of a [BranchSegment].
#[derive(Debug, Clone, PartialEq)]
pub struct MissingLeaf {
    pub name: String,
    pub position: Point3,
}

/// Result of [TreeLayouter::layout].
#[derive(Debug, Clone)]
pub struct TreeLayout {
    tree: Tree,
    placements: Vec<NodePlacement>,
    missing_leaves: Vec<MissingLeaf>,
    branches: Vec<BranchSegment>,
}

impl TreeLayout {
    /// The laid out tree: a pruned copy of the input if some of its leaves
    /// had no coordinates. Placements are indexed by its vertex indices.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Placements of all vertices, indexed by [VertexIndex].
    pub fn placements(&self) -> &[NodePlacement] {
        &self.placements
    }

    pub fn placement(&self, index: VertexIndex) -> &NodePlacement {
        &self.placements[index]
    }

    /// Placements of the leaves, left to right.
    pub fn leaf_placements(&self) -> impl Iterator<Item = &NodePlacement> {
        self.tree
            .leaves()
            .into_iter()
            .map(move |leaf| &self.placements[leaf])
    }

    /// Placements of vertices with children (root included), in pre-order.
    pub fn internal_placements(&self) -> impl Iterator<Item = &NodePlacement> {
        self.tree
            .pre_order_iter()
            .filter(|v| v.is_internal())
            .map(move |v| &self.placements[v.index()])
    }

    /// Coordinate rows absent from the tree, in coordinate order.
    pub fn missing_leaves(&self) -> &[MissingLeaf] {
        &self.missing_leaves
    }

    pub fn branches(&self) -> &[BranchSegment] {
        &self.branches
    }

    /// Position of the vertex or missing leaf called `name`.
    pub fn position_of(&self, name: &str) -> Option<Point3> {
        self.placements
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.position)
            .or_else(|| {
                self.missing_leaves
                    .iter()
                    .find(|m| m.name == name)
                    .map(|m| m.position)
            })
    }
}

// =#========================================================================#=
// TREE LAYOUTER
// =#========================================================================$=
/// Computes [TreeLayout]s with fixed [LayoutParams].
#[derive(Debug, Clone, Default)]
pub struct TreeLayouter {
    params: LayoutParams,
}

impl TreeLayouter {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }

    /// Lays out `tree`, using `coordinates` for the leaves if given.
    ///
    /// # Errors
    /// - [LayoutError::Configuration] for invalid parameters, or
    ///   `use_provided_z` without coordinates
    /// - [LayoutError::MalformedTree] if the tree fails [Tree::validate]
    /// - [LayoutError::MissingData] if leaf names of tree and coordinates
    ///   differ (unless `ignore_missing`), no tree leaf has coordinates, or
    ///   a z value is required but absent
    pub fn layout(
        &self,
        tree: &Tree,
        coordinates: Option<&LeafCoordinates>,
    ) -> Result<TreeLayout, LayoutError> {
        let params = &self.params;
        params.validate()?;
        tree.validate()?;

        if params.spherical_layout && params.use_provided_z {
            warn!("Spherical layout is incompatible with provided z values and will be ignored");
        }

        let (tree, heights, mut positions, mut missing_leaves) = match coordinates {
            None => {
                if params.use_provided_z {
                    return Err(LayoutError::configuration(
                        "use_provided_z requires leaf coordinates",
                    ));
                }
                if params.drag > 0.0 {
                    debug!("Drag only applies to layouts from leaf coordinates, ignoring it");
                }
                let heights = height::compute_heights(tree, params.ultrametric);
                let positions = dendrogram::place(tree, &heights, params);
                (tree.clone(), heights, positions, Vec::new())
            }
            Some(coordinates) => {
                let matched = projected::match_leaves(tree, coordinates, params.ignore_missing)?;
                let tree = matched.pruned.unwrap_or_else(|| tree.clone());
                let heights = height::compute_heights(&tree, params.ultrametric);
                let positions = projected::place(&tree, &heights, coordinates, params)?;
                let missing = projected::place_missing(
                    &matched.extra_rows,
                    &tree,
                    &positions,
                    coordinates,
                    params,
                );
                (tree, heights, positions, missing)
            }
        };

        let names = vertex_names(&tree);

        let mut branches = match params.branch_style {
            BranchStyle::Rectangular if coordinates.is_none() => {
                branches::rectangular(&tree, &positions, &names)
            }
            BranchStyle::Rectangular => {
                debug!("Rectangular branches need a topology layout, drawing direct segments");
                branches::direct(&tree, &positions, &names)
            }
            BranchStyle::Diagonal => branches::direct(&tree, &positions, &names),
        };

        if params.projects_spherically() {
            if let Some(bounds) = SphereBounds::from_points(&positions) {
                debug!("Projecting onto pseudo-sphere with bounds {bounds:?}");
                let project =
                    |p: Point3| bounds.project(p, params.longitude_limits, params.latitude_limits);

                for position in positions.iter_mut() {
                    *position = project(*position);
                }
                for missing in missing_leaves.iter_mut() {
                    missing.position = project(missing.position);
                }
                for segment in branches.iter_mut() {
                    segment.start = project(segment.start);
                    segment.end = project(segment.end);
                }
            }
        }

        let placements: Vec<NodePlacement> = tree
            .vertices()
            .iter()
            .zip(names)
            .map(|(vertex, name)| NodePlacement {
                name,
                position: positions[vertex.index()],
                height: heights[vertex.index()],
                is_leaf: vertex.is_leaf(),
            })
            .collect();

        info!(
            "Laid out {} vertices ({} leaves) with {} branch segments and {} missing leaves",
            placements.len(),
            tree.num_leaves(),
            branches.len(),
            missing_leaves.len()
        );

        Ok(TreeLayout {
            tree,
            placements,
            missing_leaves,
            branches,
        })
    }
}

/// Lays out `tree` with the given parameters, see [TreeLayouter::layout].
pub fn layout_tree(
    tree: &Tree,
    coordinates: Option<&LeafCoordinates>,
    params: &LayoutParams,
) -> Result<TreeLayout, LayoutError> {
    TreeLayouter::new(params.clone()).layout(tree, coordinates)
}

/// Output name of every vertex, indexed by vertex index.
///
/// Unnamed vertices, and internal vertices named `1` (a common leftover
/// support value), are named after their pre-order rank.
fn vertex_names(tree: &Tree) -> Vec<String> {
    let mut names = vec![String::new(); tree.num_vertices()];
    for (rank, vertex) in tree.pre_order_iter().enumerate() {
        names[vertex.index()] = match vertex.name() {
            Some("1") if vertex.is_internal() => format!("internal{rank}"),
            Some(name) => name.to_string(),
            None if vertex.is_leaf() => format!("leaf{rank}"),
            None => format!("internal{rank}"),
        };
    }
    names
}
