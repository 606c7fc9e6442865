//! Cosmic-tree lays out phylogenetic trees in 3D for the
//! *Cosmic View of Life on Earth* visualizations.
//!
//! Given a rooted tree (Newick) and optionally 2D/3D coordinates of its
//! leaves (CSV, e.g. from a UMAP of genomes), it computes a position for every
//! vertex and the line segments ("branches") connecting them, ready to be
//! written as CSV tables or speck meshes.
//!
//! Core functionality provided:
//! - Newick: parse n-ary trees with internal labels, comments and annotations
//!   skipped. See [crate::newick].
//! - Coordinates: read leaf coordinate tables. See [crate::coords].
//! - Layout: topology-only ladder dendrograms or coordinate-driven layouts
//!   with drag smoothing, z from height, missing-leaf handling and an optional
//!   pseudo-spherical projection. See [crate::layout].
//! - Output: CSV tables of leaves, internal vertices and branches, plus speck
//!   files. See [crate::output].
//! - Tree model: arena [Tree] of [Vertex]es referenced by index only.
//!   See [crate::model].
//!
//! # Usage patterns
//! 1. [layout_newick_str] for a quick topology layout of a Newick string.
//! 2. Parse trees and coordinates yourself and configure a
//!    [TreeLayouter](crate::layout::TreeLayouter) with
//!    [LayoutParams](crate::layout::LayoutParams).
//!
//! ## Example Default Configuration
//! ```
//! use cosmic_tree::layout_newick_str;
//!
//! let layout = layout_newick_str("((A:1,B:1):1,C:2);").unwrap();
//! assert_eq!(layout.leaf_placements().count(), 3);
//! ```
//!
//! ## Example Coordinate Layout
//! ```
//! use cosmic_tree::coords::LeafCoordinates;
//! use cosmic_tree::layout::{LayoutParams, TreeLayouter};
//! use cosmic_tree::newick;
//!
//! let tree = newick::parse_str("((A:1,B:1):1,C:2);")?;
//! let coords = LeafCoordinates::from_str("name,x,y\nA,0,0\nB,2,0\nC,4,6\n", false)?;
//!
//! let params = LayoutParams::default().with_drag(0.0).with_z_scale(10.0);
//! let layout = TreeLayouter::new(params).layout(&tree, Some(&coords))?;
//!
//! let root = layout.placement(layout.tree().root_index());
//! assert_eq!((root.position.x, root.position.y, root.position.z), (2.5, 3.0, 0.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coords;
pub mod layout;
pub mod model;
pub mod newick;
pub mod output;
pub mod parser;

pub use crate::config::RunConfig;
pub use crate::coords::{LeafCoordinates, LeafPoint};
pub use crate::layout::{LayoutError, LayoutParams, TreeLayout, TreeLayouter};
pub use crate::model::{Tree, Vertex};
pub use crate::parser::ParsingError;

use std::error::Error;
use std::fmt;
use std::path::Path;

// =$========================================================================$=
// QUICK API (pub)
// =$========================================================================$=
/// Lays out a single Newick string with default [LayoutParams].
///
/// # Errors
/// [CosmicTreeError] if parsing or layout fails.
pub fn layout_newick_str<S: AsRef<str>>(newick: S) -> Result<TreeLayout, CosmicTreeError> {
    let tree = newick::parse_str(newick)?;
    Ok(TreeLayouter::default().layout(&tree, None)?)
}

/// Reads the first tree of `tree_path` and, if given, the coordinates of
/// `coordinates_path`, and lays them out with `params`.
///
/// Further trees in the file are ignored.
///
/// # Errors
/// [CosmicTreeError] if a file cannot be read or parsed, the file holds no
/// tree, or the layout fails.
pub fn layout_files<P: AsRef<Path>, Q: AsRef<Path>>(
    tree_path: P,
    coordinates_path: Option<Q>,
    params: &LayoutParams,
) -> Result<TreeLayout, CosmicTreeError> {
    let tree = newick::parse_file(tree_path)?
        .into_iter()
        .next()
        .ok_or(CosmicTreeError::NoTree)?;

    let coordinates = coordinates_path
        .map(|path| LeafCoordinates::from_file(path, params.use_provided_z))
        .transpose()?;

    Ok(layout::layout_tree(&tree, coordinates.as_ref(), params)?)
}

/// Error of the quick API, wrapping the error of the failing stage.
#[derive(Debug)]
pub enum CosmicTreeError {
    Parsing(ParsingError),
    Layout(LayoutError),
    /// The tree file contained no tree
    NoTree,
}

impl fmt::Display for CosmicTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CosmicTreeError::Parsing(err) => write!(f, "{err}"),
            CosmicTreeError::Layout(err) => write!(f, "{err}"),
            CosmicTreeError::NoTree => write!(f, "No tree found"),
        }
    }
}

impl Error for CosmicTreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CosmicTreeError::Parsing(err) => Some(err),
            CosmicTreeError::Layout(err) => Some(err),
            CosmicTreeError::NoTree => None,
        }
    }
}

impl From<ParsingError> for CosmicTreeError {
    fn from(err: ParsingError) -> Self {
        CosmicTreeError::Parsing(err)
    }
}

impl From<LayoutError> for CosmicTreeError {
    fn from(err: LayoutError) -> Self {
        CosmicTreeError::Layout(err)
    }
}
