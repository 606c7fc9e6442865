//! Height (distance from root) of every vertex.

use crate::model::Tree;

/// Computes the height of every vertex, indexed by vertex index.
///
/// - The root has height 0, every other vertex its parent's height plus its
///   branch length (pre-order).
/// - A missing branch length counts as 0, unless the whole tree has no
///   non-zero branch length: then every edge counts as 1.
/// - With `ultrametric`, leaves are moved to the maximum height.
///
/// Vertices not reachable from the root keep height 0.
pub(crate) fn compute_heights(tree: &Tree, ultrametric: bool) -> Vec<f64> {
    let unit_lengths = !tree.has_branch_lengths();
    let mut heights = vec![0.0; tree.num_vertices()];

    for vertex in tree.pre_order_iter() {
        let Some(parent) = vertex.parent() else {
            continue;
        };
        let length = if unit_lengths {
            1.0
        } else {
            vertex.branch_length().unwrap_or(0.0)
        };
        heights[vertex.index()] = heights[parent] + length;
    }

    if ultrametric {
        let leaves = tree.leaves();
        let max_height = leaves
            .iter()
            .map(|&leaf| heights[leaf])
            .fold(0.0, f64::max);
        for leaf in leaves {
            heights[leaf] = max_height;
        }
    }

    heights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::parse_str;

    #[test]
    fn test_heights_accumulate_branch_lengths() {
        let tree = parse_str("((A:1,B:2):0.5,C:3);").unwrap();
        let heights = compute_heights(&tree, false);
        let a = tree.leaf_index("A").unwrap();
        let b = tree.leaf_index("B").unwrap();
        let c = tree.leaf_index("C").unwrap();
        assert_eq!(heights[tree.root_index()], 0.0);
        assert_eq!(heights[a], 1.5);
        assert_eq!(heights[b], 2.5);
        assert_eq!(heights[c], 3.0);
    }

    #[test]
    fn test_unit_lengths_without_branch_lengths() {
        let tree = parse_str("((A,B),C);").unwrap();
        let heights = compute_heights(&tree, false);
        assert_eq!(heights[tree.leaf_index("A").unwrap()], 2.0);
        assert_eq!(heights[tree.leaf_index("C").unwrap()], 1.0);
    }

    #[test]
    fn test_ultrametric_aligns_leaves() {
        let tree = parse_str("((A:1,B:2):0.5,C:1);").unwrap();
        let heights = compute_heights(&tree, true);
        for name in ["A", "B", "C"] {
            assert_eq!(heights[tree.leaf_index(name).unwrap()], 2.5);
        }
    }
}
