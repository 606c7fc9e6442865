//! Ladder (dendrogram) placement derived from topology alone.

use crate::layout::{LayoutParams, Point3};
use crate::model::Tree;

/// Places every vertex of `tree` from its height and the leaf order.
///
/// - x: height, times `branch_scaling_factor`
/// - y: the i-th leaf (left to right) gets `i + 1`, an internal vertex the
///   midpoint of its first and last child; times `taxon_scaling_factor`
/// - z: height, times `z_scale`
pub(crate) fn place(tree: &Tree, heights: &[f64], params: &LayoutParams) -> Vec<Point3> {
    let mut ranks = vec![0.0; tree.num_vertices()];
    let mut next_rank = 1.0;

    for vertex in tree.post_order_iter() {
        ranks[vertex.index()] = match (vertex.first_child(), vertex.last_child()) {
            (Some(first), Some(last)) => (ranks[first] + ranks[last]) / 2.0,
            _ => {
                let rank = next_rank;
                next_rank += 1.0;
                rank
            }
        };
    }

    heights
        .iter()
        .zip(&ranks)
        .map(|(&height, &rank)| {
            Point3::new(
                height * params.branch_scaling_factor,
                rank * params.taxon_scaling_factor,
                height * params.z_scale,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::height::compute_heights;
    use crate::newick::parse_str;

    #[test]
    fn test_leaf_ranks_and_midpoints() {
        let tree = parse_str("((A:1,B:1):1,C:2);").unwrap();
        let heights = compute_heights(&tree, false);
        let positions = place(&tree, &heights, &LayoutParams::default());

        let a = tree.leaf_index("A").unwrap();
        let b = tree.leaf_index("B").unwrap();
        let c = tree.leaf_index("C").unwrap();
        let ab = tree[a].parent().unwrap();

        assert_eq!(positions[a].y, 1.0);
        assert_eq!(positions[b].y, 2.0);
        assert_eq!(positions[c].y, 3.0);
        assert_eq!(positions[ab].y, 1.5);
        assert_eq!(positions[tree.root_index()].y, 2.25);
    }

    #[test]
    fn test_scaling_factors() {
        let tree = parse_str("(A:2,B:4);").unwrap();
        let heights = compute_heights(&tree, false);
        let params = LayoutParams::default()
            .with_branch_scaling_factor(10.0)
            .with_taxon_scaling_factor(0.5)
            .with_z_scale(3.0);
        let positions = place(&tree, &heights, &params);

        let b = tree.leaf_index("B").unwrap();
        assert_eq!(positions[b], Point3::new(40.0, 1.0, 12.0));
    }
}
