use cosmic_tree::layout::LayoutError;
use cosmic_tree::model::{ArenaTreeBuilder, Tree, TreeBuilder};
use cosmic_tree::newick::parse_str;

fn name(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn test_building_tree() {
    let mut tree = Tree::new(5);
    let index_l1 = tree.add_leaf(name("Apteryx_haastii"), Some(1.0));
    let index_l2 = tree.add_leaf(name("Apteryx_owenii"), Some(1.0));
    let index_l3 = tree.add_leaf(name("Apteryx_mantelli"), Some(0.5));
    let index_i1 = tree.add_internal_vertex(vec![index_l1, index_l2], None, Some(1.5));
    let index_root = tree.add_root(vec![index_l3, index_i1], None, None);

    // Counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_vertices(), 5);

    // Root
    assert_eq!(tree.root_index(), index_root);
    assert!(!tree.root().has_parent());

    // Leaf
    let l2 = &tree[index_l2];
    assert!(l2.is_leaf());
    assert_eq!(l2.index(), index_l2);
    assert_eq!(l2.parent(), Some(index_i1));

    // Internal
    let inti = &tree[index_i1];
    assert!(inti.is_internal());
    assert_eq!(inti.branch_length(), Some(1.5));
    assert_eq!(inti.first_child(), Some(index_l1));
    assert_eq!(inti.last_child(), Some(index_l2));

    // Leaf order follows child order
    assert_eq!(tree.leaves(), vec![index_l3, index_l1, index_l2]);
    assert!(tree.validate().is_ok());
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = Tree::new(2);
    tree.root(); // Should panic
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = Tree::new(2);
    let _ = &tree[55];
}

#[test]
fn test_traversal_orders() {
    let tree = parse_str("((A,B)AB,(C,D,E)CDE)R;").unwrap();

    let pre: Vec<_> = tree.pre_order_iter().filter_map(|v| v.name()).collect();
    assert_eq!(pre, vec!["R", "AB", "A", "B", "CDE", "C", "D", "E"]);

    let post: Vec<_> = tree.post_order_iter().filter_map(|v| v.name()).collect();
    assert_eq!(post, vec!["A", "B", "AB", "C", "D", "E", "CDE", "R"]);
}

#[test]
fn test_deep_caterpillar_does_not_overflow() {
    // 100k nested vertices would overflow a recursive traversal
    let mut tree = Tree::new(200_001);
    let mut current = tree.add_leaf(name("L0"), Some(1.0));
    for i in 1..100_000 {
        let leaf = tree.add_leaf(Some(format!("L{i}")), Some(1.0));
        current = tree.add_internal_vertex(vec![current, leaf], None, Some(1.0));
    }
    let last = tree.add_leaf(name("last"), Some(1.0));
    tree.add_root(vec![current, last], None, None);

    assert!(tree.validate().is_ok());
    assert_eq!(tree.post_order_iter().count(), tree.num_vertices());
    assert_eq!(tree.leaves().len(), 100_001);
}

#[test]
fn test_has_branch_lengths() {
    assert!(!parse_str("((A,B),C);").unwrap().has_branch_lengths());
    assert!(!parse_str("((A:0,B:0):0,C:0);").unwrap().has_branch_lengths());
    assert!(parse_str("((A,B:0.1),C);").unwrap().has_branch_lengths());
}

#[test]
fn test_tree_builder_lifecycle() {
    let mut builder = ArenaTreeBuilder::new();
    builder.init_next(2);
    let a = builder.add_leaf(name("A"), Some(1.0));
    let b = builder.add_leaf(name("B"), None);
    builder.add_root(vec![a, b], None, None);
    builder.set_name("tiny".to_string());

    let tree = builder.finish_tree().unwrap();
    assert_eq!(tree.name().map(String::as_str), Some("tiny"));
    assert_eq!(tree.num_leaves(), 2);

    // Builder is empty again
    assert!(builder.finish_tree().is_none());
}

// --- VALIDATION ---

#[test]
fn test_validate_without_root() {
    let mut tree = Tree::new(1);
    tree.add_leaf(name("A"), None);
    assert!(matches!(tree.validate(), Err(LayoutError::MalformedTree(_))));
}

#[test]
fn test_validate_negative_branch_length() {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf(name("A"), Some(-0.5));
    let b = tree.add_leaf(name("B"), Some(1.0));
    tree.add_root(vec![a, b], None, None);

    let err = tree.validate().unwrap_err();
    assert!(matches!(err, LayoutError::MalformedTree(_)));
    assert!(err.message().contains("'A'"));
}

#[test]
fn test_validate_detached_vertex() {
    let mut tree = Tree::new(4);
    let a = tree.add_leaf(name("A"), None);
    let b = tree.add_leaf(name("B"), None);
    tree.add_leaf(name("Stray"), None);
    tree.add_root(vec![a, b], None, None);

    let err = tree.validate().unwrap_err();
    assert!(err.message().contains("detached"));
}

#[test]
fn test_validate_multiple_roots() {
    let mut tree = Tree::new(6);
    let a = tree.add_leaf(name("A"), None);
    let b = tree.add_leaf(name("B"), None);
    tree.add_internal_vertex(vec![a, b], name("OtherRoot"), None);
    let c = tree.add_leaf(name("C"), None);
    let d = tree.add_leaf(name("D"), None);
    tree.add_root(vec![c, d], None, None);

    let err = tree.validate().unwrap_err();
    assert!(err.message().contains("multiple roots"));
}

#[test]
fn test_validate_shared_child() {
    let mut tree = Tree::new(5);
    let a = tree.add_leaf(name("A"), None);
    let b = tree.add_leaf(name("B"), None);
    let first = tree.add_internal_vertex(vec![a], None, None);
    let second = tree.add_internal_vertex(vec![a, b], None, None);
    tree.add_root(vec![first, second], None, None);

    assert!(matches!(tree.validate(), Err(LayoutError::MalformedTree(_))));
}

#[test]
fn test_validate_root_with_parent() {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf(name("A"), None);
    let b = tree.add_leaf(name("B"), None);
    tree.add_root(vec![a, b], None, None);
    tree.set_root(a);

    let err = tree.validate().unwrap_err();
    assert!(err.message().contains("has a parent"));
}

// --- PRUNING ---

#[test]
fn test_prune_preserves_branch_lengths() {
    let tree = parse_str("(((A:1,B:2):3,C:4):5,D:6);").unwrap();
    let pruned = tree.prune(|leaf| leaf.name() != Some("B")).unwrap();

    assert!(pruned.validate().is_ok());
    assert_eq!(pruned.num_leaves(), 3);

    // (A,B) collapsed into A: 1 + 3
    let a = pruned.leaf_index("A").unwrap();
    assert_eq!(pruned[a].branch_length(), Some(4.0));
    let parent = pruned[a].parent().unwrap();
    assert_eq!(pruned[parent].branch_length(), Some(5.0));

    let names: Vec<_> = pruned
        .leaves()
        .into_iter()
        .map(|leaf| pruned[leaf].name().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "C", "D"]);
}

#[test]
fn test_prune_promotes_child_of_collapsed_root() {
    let tree = parse_str("((A:1,B:2)AB:3,C:4);").unwrap();
    let pruned = tree.prune(|leaf| leaf.name() != Some("C")).unwrap();

    assert!(pruned.validate().is_ok());
    assert_eq!(pruned.num_vertices(), 3);
    assert_eq!(pruned.root().name(), Some("AB"));
    assert_eq!(pruned.root().children().len(), 2);
}

#[test]
fn test_prune_keeps_original_unary_vertices() {
    let tree = parse_str("(((A:1)U:2,B:1):1,C:1);").unwrap();
    let pruned = tree.prune(|_| true).unwrap();
    assert_eq!(pruned.num_vertices(), tree.num_vertices());
}

#[test]
fn test_prune_everything_is_missing_data() {
    let tree = parse_str("(A,B);").unwrap();
    let err = tree.prune(|_| false).unwrap_err();
    assert!(matches!(err, LayoutError::MissingData(_)));
}
