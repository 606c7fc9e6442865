//! Placement driven by externally supplied leaf coordinates.
//!
//! Leaves take x and y (and optionally z) from the [LeafCoordinates]; internal
//! vertices are placed at the unweighted average of their children and then
//! dragged toward their parent.

use crate::coords::LeafCoordinates;
use crate::layout::{LayoutError, LayoutParams, MissingLeaf, Point3};
use crate::model::{Tree, Vertex};
use log::{debug, warn};
use std::collections::HashSet;

/// Number of names listed in mismatch messages
const MAX_LISTED_NAMES: usize = 5;

/// Result of matching tree leaves against coordinate rows.
pub(crate) struct LeafMatch {
    /// The tree restricted to leaves with coordinates, `None` if all had some
    pub pruned: Option<Tree>,
    /// Coordinate rows without a tree leaf, in coordinate order
    pub extra_rows: Vec<String>,
}

/// Matches leaf names of `tree` with the rows of `coordinates`.
///
/// # Errors
/// - [LayoutError::MissingData] on any mismatch unless `ignore_missing`
/// - [LayoutError::MissingData] if no tree leaf has coordinates
pub(crate) fn match_leaves(
    tree: &Tree,
    coordinates: &LeafCoordinates,
    ignore_missing: bool,
) -> Result<LeafMatch, LayoutError> {
    let leaves = tree.leaves();

    let without_coordinates: Vec<String> = leaves
        .iter()
        .map(|&leaf| &tree[leaf])
        .filter(|leaf| !has_coordinates(leaf, coordinates))
        .map(describe_leaf)
        .collect();

    let tree_names: HashSet<&str> = leaves.iter().filter_map(|&leaf| tree[leaf].name()).collect();
    let extra_rows: Vec<String> = coordinates
        .names()
        .filter(|name| !tree_names.contains(name))
        .map(str::to_string)
        .collect();

    if !ignore_missing && (!without_coordinates.is_empty() || !extra_rows.is_empty()) {
        let mut problems = Vec::new();
        if !without_coordinates.is_empty() {
            problems.push(format!(
                "{} tree leaves have no coordinates ({})",
                without_coordinates.len(),
                list_names(&without_coordinates)
            ));
        }
        if !extra_rows.is_empty() {
            problems.push(format!(
                "{} coordinate rows are absent from the tree ({})",
                extra_rows.len(),
                list_names(&extra_rows)
            ));
        }
        return Err(LayoutError::missing_data(format!(
            "{}; use ignore_missing to skip them",
            problems.join("; ")
        )));
    }

    for name in &extra_rows {
        warn!("{name} is absent from the tree, placing it as missing leaf");
    }

    let pruned = if without_coordinates.is_empty() {
        None
    } else {
        for name in &without_coordinates {
            warn!("{name} has no coordinates, pruning it from the tree");
        }
        let pruned = tree.prune(|leaf| has_coordinates(leaf, coordinates))?;
        debug!(
            "Pruned tree from {} to {} leaves",
            leaves.len(),
            pruned.num_leaves()
        );
        Some(pruned)
    };

    Ok(LeafMatch { pruned, extra_rows })
}

/// Places all vertices of `tree`, whose leaves all have coordinates.
///
/// 1. Leaves: x, y from coordinates, z too if `use_provided_z`
/// 2. Internal vertices (post-order): average of children
/// 3. Drag (pre-order, root and leaves excluded): blend toward the already
///    dragged parent by `drag`
/// 4. Without `use_provided_z`: z = height × `z_scale`
pub(crate) fn place(
    tree: &Tree,
    heights: &[f64],
    coordinates: &LeafCoordinates,
    params: &LayoutParams,
) -> Result<Vec<Point3>, LayoutError> {
    let mut positions = vec![Point3::default(); tree.num_vertices()];

    for vertex in tree.post_order_iter() {
        positions[vertex.index()] = if vertex.is_leaf() {
            leaf_position(vertex, coordinates, params.use_provided_z)?
        } else {
            Point3::centroid(vertex.children().iter().map(|&child| positions[child]))
                .unwrap_or_default()
        };
    }

    if params.drag > 0.0 {
        for vertex in tree.pre_order_iter() {
            let Some(parent) = vertex.parent() else {
                continue;
            };
            if vertex.is_leaf() {
                continue;
            }
            positions[vertex.index()] = positions[vertex.index()].lerp(positions[parent], params.drag);
        }
    }

    if !params.use_provided_z {
        for (position, height) in positions.iter_mut().zip(heights) {
            position.z = height * params.z_scale;
        }
    }

    Ok(positions)
}

/// Places coordinate rows that have no tree leaf.
///
/// They keep their x, y; z is their own with `use_provided_z`, otherwise the
/// mean z of the tree leaves.
pub(crate) fn place_missing(
    names: &[String],
    tree: &Tree,
    positions: &[Point3],
    coordinates: &LeafCoordinates,
    params: &LayoutParams,
) -> Vec<MissingLeaf> {
    let mean_leaf_z = Point3::centroid(tree.leaves().into_iter().map(|leaf| positions[leaf]))
        .map_or(0.0, |p| p.z);

    names
        .iter()
        .filter_map(|name| coordinates.get(name).map(|point| (name, point)))
        .map(|(name, point)| {
            let z = match point.z {
                Some(z) if params.use_provided_z => z,
                _ => mean_leaf_z,
            };
            MissingLeaf {
                name: name.clone(),
                position: Point3::new(point.x, point.y, z),
            }
        })
        .collect()
}

fn leaf_position(
    leaf: &Vertex,
    coordinates: &LeafCoordinates,
    use_provided_z: bool,
) -> Result<Point3, LayoutError> {
    let point = leaf
        .name()
        .and_then(|name| coordinates.get(name))
        .ok_or_else(|| {
            LayoutError::missing_data(format!("{} has no coordinates", describe_leaf(leaf)))
        })?;

    let z = if use_provided_z {
        point.z.ok_or_else(|| {
            LayoutError::missing_data(format!("{} has no z coordinate", describe_leaf(leaf)))
        })?
    } else {
        0.0
    };

    Ok(Point3::new(point.x, point.y, z))
}

fn has_coordinates(leaf: &Vertex, coordinates: &LeafCoordinates) -> bool {
    leaf.name().is_some_and(|name| coordinates.contains(name))
}

fn describe_leaf(leaf: &Vertex) -> String {
    match leaf.name() {
        Some(name) => name.to_string(),
        None => format!("unnamed leaf {}", leaf.index()),
    }
}

fn list_names(names: &[String]) -> String {
    let mut listed = names
        .iter()
        .take(MAX_LISTED_NAMES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > MAX_LISTED_NAMES {
        listed.push_str(", ...");
    }
    listed
}
