use cosmic_tree::coords::{LeafCoordinates, LeafPoint};
use cosmic_tree::layout::{LayoutParams, TreeLayout, layout_tree};
use cosmic_tree::newick::parse_str;
use cosmic_tree::output::{
    BRANCHES_SUFFIX, DAT_SUFFIX, INTERNAL_SUFFIX, LEAVES_SUFFIX, SPECK_SUFFIX, write_branches_csv,
    write_branches_dat, write_branches_speck, write_internal_csv, write_layout_files,
    write_leaves_csv,
};
use std::fs;
use std::io;
use std::path::PathBuf;

fn scenario_layout() -> TreeLayout {
    let tree = parse_str("((A:1,B:1):1,C:2);").unwrap();
    layout_tree(&tree, None, &LayoutParams::default()).unwrap()
}

fn written<F>(write: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buffer = Vec::new();
    write(&mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cosmic-tree-{}-{}",
        test_name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_leaves_csv() {
    let layout = scenario_layout();
    let csv = written(|w| write_leaves_csv(&layout, w));
    assert_eq!(csv, "name,x,y,z\nA,2,1,2\nB,2,2,2\nC,2,3,2\n");
}

#[test]
fn test_leaves_csv_lists_missing_leaves_last() {
    let tree = parse_str("((A:1,B:1):1,C:2);").unwrap();
    let mut coords = LeafCoordinates::new();
    coords.insert("A", LeafPoint::new(0.0, 0.0));
    coords.insert("Macaca, rhesus", LeafPoint::new(5.0, 5.0));
    coords.insert("B", LeafPoint::new(2.0, 0.0));
    coords.insert("C", LeafPoint::new(4.0, 6.0));
    let layout = layout_tree(
        &tree,
        Some(&coords),
        &LayoutParams::default().with_ignore_missing(true),
    )
    .unwrap();

    let csv = written(|w| write_leaves_csv(&layout, w));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "A,0,0,2");
    assert_eq!(lines[4], "\"Macaca, rhesus\",5,5,2");
}

#[test]
fn test_internal_csv() {
    let layout = scenario_layout();
    let csv = written(|w| write_internal_csv(&layout, w));
    assert_eq!(csv, "name,x,y,z\ninternal0,0,2.25,0\ninternal1,1,1.5,1\n");
}

#[test]
fn test_branches_csv() {
    let layout = scenario_layout();
    let csv = written(|w| write_branches_csv(&layout, w));
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "name,x0,y0,z0,x1,y1,z1");
    assert_eq!(lines.len(), 1 + 6);
    assert_eq!(lines[1], "span_internal0,0,1.5,0,0,3,0");
    assert!(lines.contains(&"branch_A,1,1,1,2,1,2"));
}

#[test]
fn test_branches_speck() {
    let layout = scenario_layout();
    let speck = written(|w| write_branches_speck(&layout, w));

    let expected_first = "mesh -c 1 {\n  id span_internal0\n  2\n  0.00000000 1.50000000 0.00000000\n  0.00000000 3.00000000 0.00000000\n}\n";
    assert!(speck.starts_with(expected_first));
    assert_eq!(speck.matches("mesh -c 1 {").count(), 6);
    assert!(speck.contains("  id branch_C\n  2\n  0.00000000 3.00000000 0.00000000\n  2.00000000 3.00000000 2.00000000\n}\n"));
}

#[test]
fn test_branches_dat() {
    let layout = scenario_layout();
    let dat = written(|w| write_branches_dat(&layout, w));
    let lines: Vec<&str> = dat.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "span_internal0 span_internal0");
    assert!(lines.contains(&"branch_A branch_A"));
}

#[test]
fn test_write_layout_files() {
    let layout = scenario_layout();
    let dir = scratch_dir("layout-files");
    let prefix = dir.join("scenario");

    let paths = write_layout_files(&layout, &prefix, true).unwrap();
    let suffixes = [
        LEAVES_SUFFIX,
        INTERNAL_SUFFIX,
        BRANCHES_SUFFIX,
        SPECK_SUFFIX,
        DAT_SUFFIX,
    ];
    assert_eq!(paths.len(), suffixes.len());
    for (path, suffix) in paths.iter().zip(suffixes) {
        assert!(path.to_string_lossy().ends_with(&format!("scenario{suffix}")));
        assert!(path.exists());
    }

    let leaves = fs::read_to_string(&paths[0]).unwrap();
    assert_eq!(leaves, written(|w| write_leaves_csv(&layout, w)));

    let staged_left = fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().ends_with(".part"));
    assert!(!staged_left);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_write_layout_files_without_speck() {
    let layout = scenario_layout();
    let dir = scratch_dir("no-speck");
    let prefix = dir.join("scenario");

    let paths = write_layout_files(&layout, &prefix, false).unwrap();
    assert_eq!(paths.len(), 3);
    assert!(!dir.join(format!("scenario{SPECK_SUFFIX}")).exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_write_layout_files_into_missing_directory() {
    let layout = scenario_layout();
    let prefix = std::env::temp_dir()
        .join(format!("cosmic-tree-absent-{}", std::process::id()))
        .join("nested")
        .join("scenario");
    assert!(write_layout_files(&layout, &prefix, false).is_err());
}

#[test]
fn test_write_layout_files_leaves_nothing_on_failure() {
    let layout = scenario_layout();
    let dir = scratch_dir("partial");
    let prefix = dir.join("scenario");

    // Blocks the staging file of the second table
    fs::create_dir(dir.join(format!("scenario{INTERNAL_SUFFIX}.part"))).unwrap();

    assert!(write_layout_files(&layout, &prefix, true).is_err());
    for suffix in [LEAVES_SUFFIX, INTERNAL_SUFFIX, BRANCHES_SUFFIX] {
        assert!(!dir.join(format!("scenario{suffix}")).is_file());
    }
    assert!(!dir.join(format!("scenario{LEAVES_SUFFIX}.part")).exists());

    fs::remove_dir_all(&dir).unwrap();
}
