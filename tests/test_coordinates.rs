use cosmic_tree::coords::{LeafCoordinates, LeafPoint};
use cosmic_tree::parser::ParsingErrorType;
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

fn table_error(csv: &str, with_z: bool) -> String {
    let err = LeafCoordinates::from_str(csv, with_z).unwrap_err();
    match err.kind() {
        ParsingErrorType::InvalidCoordinateTable(msg) => msg.clone(),
        other => panic!("unexpected error kind {other:?}"),
    }
}

#[test]
fn test_read_planar_table() {
    let coords = LeafCoordinates::from_str("name,x,y\nA,1.5,-2\nB,0,3e2\n", false).unwrap();

    assert_eq!(coords.len(), 2);
    assert_eq!(coords.get("A"), Some(&LeafPoint::new(1.5, -2.0)));
    assert_eq!(coords.get("B"), Some(&LeafPoint::new(0.0, 300.0)));
    assert!(!coords.has_z());
    assert_eq!(coords.names().collect::<Vec<_>>(), vec!["A", "B"]);
}

#[test]
fn test_read_fixture_with_z() {
    let coords = LeafCoordinates::from_file(fixture("primates_umap.csv"), true).unwrap();

    assert_eq!(coords.len(), 6);
    assert!(coords.has_z());
    assert_eq!(
        coords.get("Pongo_abelii"),
        Some(&LeafPoint::with_z(4.0, 0.0, 1.1))
    );
}

#[test]
fn test_z_column_ignored_unless_requested() {
    let coords = LeafCoordinates::from_file(fixture("primates_umap.csv"), false).unwrap();
    assert_eq!(coords.get("Homo_sapiens"), Some(&LeafPoint::new(1.0, 2.0)));
    assert!(!coords.has_z());
}

#[test]
fn test_read_crlf_quoted_and_blank_lines() {
    let coords = LeafCoordinates::from_file(fixture("primates_extra.csv"), false).unwrap();

    assert_eq!(coords.len(), 7);
    assert_eq!(
        coords.get("Macaca mulatta, rhesus"),
        Some(&LeafPoint::new(6.0, 3.0))
    );
    assert_eq!(coords.names().last(), Some("Macaca mulatta, rhesus"));
}

#[test]
fn test_insertion_order_is_kept() {
    let mut coords = LeafCoordinates::new();
    assert!(coords.insert("Zosterops", LeafPoint::new(0.0, 0.0)));
    assert!(coords.insert("Acanthisitta", LeafPoint::new(1.0, 0.0)));
    assert!(!coords.insert("Zosterops", LeafPoint::new(9.0, 9.0)));

    let rows: Vec<_> = coords.iter().map(|(name, p)| (name, p.x)).collect();
    assert_eq!(rows, vec![("Zosterops", 0.0), ("Acanthisitta", 1.0)]);
}

// --- CORRUPT TABLES ---

#[test]
fn test_duplicate_leaf_name() {
    let msg = table_error("name,x,y\nA,1,2\nB,1,2\nA,3,4\n", false);
    assert!(msg.contains("line 4"));
    assert!(msg.contains("duplicate"));
}

#[test]
fn test_non_numeric_value() {
    let msg = table_error("name,x,y\nA,1,two\n", false);
    assert!(msg.contains("line 2"));
    assert!(msg.contains("y value"));
}

#[test]
fn test_missing_field() {
    let msg = table_error("name,x,y\nA,1\n", false);
    assert!(msg.contains("line 2"));
}

#[test]
fn test_empty_name() {
    let msg = table_error("name,x,y\n,1,2\n", false);
    assert!(msg.contains("empty leaf name"));
}

#[test]
fn test_header_too_short() {
    let msg = table_error("name,x\nA,1\n", false);
    assert!(msg.contains("header"));
}

#[test]
fn test_unclosed_quote() {
    let err = LeafCoordinates::from_str("name,x,y\n\"A,1,2\n", false).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
}

#[test]
fn test_missing_file() {
    let err = LeafCoordinates::from_file(fixture("absent.csv"), false).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}

#[test]
fn test_non_utf8_leaf_name() {
    let err = LeafCoordinates::from_file(fixture("latin1.csv"), false).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::InvalidUtf8);
}
