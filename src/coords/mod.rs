//! Externally supplied leaf coordinates.
//!
//! * [LeafCoordinates] - insertion-ordered mapping from leaf name to [LeafPoint]
//! * [reader] - CSV reader producing [LeafCoordinates]
//!
//! # Example
//! ```
//! use cosmic_tree::coords::{LeafCoordinates, LeafPoint};
//!
//! let mut coords = LeafCoordinates::new();
//! coords.insert("Homo_sapiens", LeafPoint::new(0.5, 1.0));
//! coords.insert("Pan_paniscus", LeafPoint::new(0.7, 1.2));
//!
//! assert_eq!(coords.len(), 2);
//! assert!(!coords.has_z());
//! ```

pub mod reader;

use crate::parser::ParsingError;
use std::collections::HashMap;
use std::path::Path;

// =#========================================================================#=
// LEAF POINT
// =#========================================================================$=
/// Position of a leaf as given by the coordinate source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafPoint {
    pub x: f64,
    pub y: f64,
    /// Only present if the source had a z column and it was requested
    pub z: Option<f64>,
}

impl LeafPoint {
    /// Creates a planar point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a point with z.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

// =#========================================================================#=
// LEAF COORDINATES
// =#========================================================================$=
/// Mapping from leaf name to [LeafPoint], remembering insertion order.
///
/// Insertion order matters for output: leaves present here but missing in the
/// tree are reported in this order.
#[derive(Debug, Clone, Default)]
pub struct LeafCoordinates {
    names: Vec<String>,
    points: Vec<LeafPoint>,
    lookup: HashMap<String, usize>,
}

impl LeafCoordinates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads coordinates from a CSV file, see [reader] for the format.
    ///
    /// # Arguments
    /// * `path` - CSV file with header
    /// * `with_z` - whether a third coordinate column is required and read
    pub fn from_file<P: AsRef<Path>>(path: P, with_z: bool) -> Result<Self, ParsingError> {
        reader::read_file(path, with_z)
    }

    /// Reads coordinates from CSV text, see [reader] for the format.
    pub fn from_str(csv: &str, with_z: bool) -> Result<Self, ParsingError> {
        reader::read_str(csv, with_z)
    }

    /// Adds a leaf. Returns `false` (and keeps the existing point) if the
    /// name is already present.
    pub fn insert<S: Into<String>>(&mut self, name: S, point: LeafPoint) -> bool {
        let name = name.into();
        if self.lookup.contains_key(&name) {
            return false;
        }
        self.lookup.insert(name.clone(), self.points.len());
        self.names.push(name);
        self.points.push(point);
        true
    }

    /// Returns the point of the given leaf, if present.
    pub fn get(&self, name: &str) -> Option<&LeafPoint> {
        self.lookup.get(name).map(|&i| &self.points[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Returns the leaf names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns `(name, point)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LeafPoint)> {
        self.names.iter().map(String::as_str).zip(self.points.iter())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Checks whether every point carries a z value (`false` if empty).
    pub fn has_z(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.z.is_some())
    }
}
