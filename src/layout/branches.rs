//! Line segments connecting vertices to their parents.

use crate::layout::Point3;
use crate::model::{Tree, VertexIndex};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentKind {
    /// Along the depth axis, from the parent's depth to the child
    Horizontal,
    /// At a vertex's depth, spanning its first to last child
    Vertical,
    /// Straight from parent to child
    Direct,
}

/// A straight line segment of the drawn tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSegment {
    /// `branch_{child}` for segments leading to a child,
    /// `span_{vertex}` for vertical spans
    pub name: String,
    pub start: Point3,
    pub end: Point3,
    pub kind: SegmentKind,
    /// The vertex the segment hangs from (the spanning vertex for verticals)
    pub parent: VertexIndex,
    /// The vertex the segment leads to, `None` for verticals
    pub child: Option<VertexIndex>,
}

/// Right-angled segments of a dendrogram, in pre-order:
/// a horizontal for every non-root vertex and a vertical for every vertex
/// with children.
///
/// - horizontal: `(parent.x, v.y, parent.z)` to `v`
/// - vertical: `(v.x, first_child.y, v.z)` to `(v.x, last_child.y, v.z)`
pub(crate) fn rectangular(tree: &Tree, positions: &[Point3], names: &[String]) -> Vec<BranchSegment> {
    let mut segments = Vec::with_capacity(2 * tree.num_vertices());

    for vertex in tree.pre_order_iter() {
        let index = vertex.index();
        let here = positions[index];

        if let Some(parent) = vertex.parent() {
            let from = positions[parent];
            segments.push(BranchSegment {
                name: format!("branch_{}", names[index]),
                start: Point3::new(from.x, here.y, from.z),
                end: here,
                kind: SegmentKind::Horizontal,
                parent,
                child: Some(index),
            });
        }

        if let (Some(first), Some(last)) = (vertex.first_child(), vertex.last_child()) {
            segments.push(BranchSegment {
                name: format!("span_{}", names[index]),
                start: Point3::new(here.x, positions[first].y, here.z),
                end: Point3::new(here.x, positions[last].y, here.z),
                kind: SegmentKind::Vertical,
                parent: index,
                child: None,
            });
        }
    }

    segments
}

/// One straight segment per non-root vertex, in pre-order.
pub(crate) fn direct(tree: &Tree, positions: &[Point3], names: &[String]) -> Vec<BranchSegment> {
    tree.pre_order_iter()
        .filter_map(|vertex| {
            let parent = vertex.parent()?;
            let index = vertex.index();
            Some(BranchSegment {
                name: format!("branch_{}", names[index]),
                start: positions[parent],
                end: positions[index],
                kind: SegmentKind::Direct,
                parent,
                child: Some(index),
            })
        })
        .collect()
}
