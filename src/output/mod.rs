//! Writers for the computed layout.
//!
//! * CSV tables: leaves, internal vertices, branch segments
//! * Speck mesh file of the branch segments plus its `.dat` label file
//!
//! All writers take any [Write]; [write_layout_files] writes the complete set
//! next to each other under a common path prefix.

use crate::layout::{Point3, TreeLayout};
use log::info;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix of the leaf table
pub const LEAVES_SUFFIX: &str = ".leaves.csv";
/// Suffix of the internal vertex table
pub const INTERNAL_SUFFIX: &str = ".internal.csv";
/// Suffix of the branch segment table
pub const BRANCHES_SUFFIX: &str = ".branches.csv";
/// Suffix of the branch mesh file
pub const SPECK_SUFFIX: &str = ".branches.speck";
/// Suffix of the branch label file
pub const DAT_SUFFIX: &str = ".branches.dat";

// ============================================================================
// CSV (pub)
// ============================================================================
/// Writes `name,x,y,z` for every tree leaf (left to right), then for every
/// missing leaf.
pub fn write_leaves_csv<W: Write>(layout: &TreeLayout, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "name,x,y,z")?;
    for placement in layout.leaf_placements() {
        write_point_row(writer, &placement.name, placement.position)?;
    }
    for missing in layout.missing_leaves() {
        write_point_row(writer, &missing.name, missing.position)?;
    }
    Ok(())
}

/// Writes `name,x,y,z` for every vertex with children, in pre-order.
pub fn write_internal_csv<W: Write>(layout: &TreeLayout, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "name,x,y,z")?;
    for placement in layout.internal_placements() {
        write_point_row(writer, &placement.name, placement.position)?;
    }
    Ok(())
}

/// Writes `name,x0,y0,z0,x1,y1,z1` for every branch segment.
pub fn write_branches_csv<W: Write>(layout: &TreeLayout, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "name,x0,y0,z0,x1,y1,z1")?;
    for segment in layout.branches() {
        let (s, e) = (segment.start, segment.end);
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            csv_field(&segment.name),
            s.x,
            s.y,
            s.z,
            e.x,
            e.y,
            e.z
        )?;
    }
    Ok(())
}

fn write_point_row<W: Write>(writer: &mut W, name: &str, p: Point3) -> io::Result<()> {
    writeln!(writer, "{},{},{},{}", csv_field(name), p.x, p.y, p.z)
}

/// Quotes a field containing a delimiter, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Speck (pub)
// ============================================================================
/// Writes every branch segment as two-point mesh:
/// ```text
/// mesh -c 1 {
///   id branch_A
///   2
///   0.00000000 1.00000000 0.00000000
///   2.00000000 1.00000000 2.00000000
/// }
/// ```
pub fn write_branches_speck<W: Write>(layout: &TreeLayout, writer: &mut W) -> io::Result<()> {
    for segment in layout.branches() {
        let (s, e) = (segment.start, segment.end);
        writeln!(writer, "mesh -c 1 {{")?;
        writeln!(writer, "  id {}", segment.name)?;
        writeln!(writer, "  2")?;
        writeln!(writer, "  {:.8} {:.8} {:.8}", s.x, s.y, s.z)?;
        writeln!(writer, "  {:.8} {:.8} {:.8}", e.x, e.y, e.z)?;
        writeln!(writer, "}}")?;
    }
    Ok(())
}

/// Writes the label file accompanying the speck file, `NAME NAME` per segment.
pub fn write_branches_dat<W: Write>(layout: &TreeLayout, writer: &mut W) -> io::Result<()> {
    for segment in layout.branches() {
        writeln!(writer, "{0} {0}", segment.name)?;
    }
    Ok(())
}

// ============================================================================
// Files (pub)
// ============================================================================
/// Writes all tables for `layout` to files named `{prefix}{suffix}`.
///
/// Every table is first written to `{prefix}{suffix}.part`; only when all of
/// them succeeded are they renamed to their final names. On a write error the
/// staged files are removed again, so no partial set of tables is left behind.
///
/// # Arguments
/// * `layout` - Successfully computed layout
/// * `prefix` - Path prefix, e.g. `out/primates` gives `out/primates.leaves.csv`
/// * `with_speck` - Also write the speck mesh and `.dat` files
///
/// # Returns
/// Paths of the written files.
///
/// # Errors
/// Returns an I/O error if a file cannot be created, written or renamed.
pub fn write_layout_files<P: AsRef<Path>>(
    layout: &TreeLayout,
    prefix: P,
    with_speck: bool,
) -> io::Result<Vec<PathBuf>> {
    let prefix = prefix.as_ref();

    let mut tables: Vec<(&str, TableWriter)> = vec![
        (LEAVES_SUFFIX, write_leaves_csv as TableWriter),
        (INTERNAL_SUFFIX, write_internal_csv as TableWriter),
        (BRANCHES_SUFFIX, write_branches_csv as TableWriter),
    ];
    if with_speck {
        tables.push((SPECK_SUFFIX, write_branches_speck as TableWriter));
        tables.push((DAT_SUFFIX, write_branches_dat as TableWriter));
    }

    // (staged, final)
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(tables.len());
    for (suffix, write_table) in tables {
        let path = output_path(prefix, suffix);
        let part = output_path(&path, PART_SUFFIX);
        info!("Writing {}", path.display());

        if let Err(err) = write_file(&part, |w| write_table(layout, w)) {
            let _ = fs::remove_file(&part);
            for (written, _) in &staged {
                let _ = fs::remove_file(written);
            }
            return Err(err);
        }
        staged.push((part, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (part, path) in staged {
        fs::rename(&part, &path)?;
        written.push(path);
    }

    Ok(written)
}

/// Returns `{prefix}{suffix}` as path.
pub fn output_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Suffix of a table while it is being written
const PART_SUFFIX: &str = ".part";

type TableWriter = fn(&TreeLayout, &mut BufWriter<File>) -> io::Result<()>;

fn write_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Homo_sapiens"), "Homo_sapiens");
        assert_eq!(csv_field("Homo, sapiens"), "\"Homo, sapiens\"");
        assert_eq!(csv_field("5\" tall"), "\"5\"\" tall\"");
    }

    #[test]
    fn test_output_path_appends_suffix() {
        let path = output_path(Path::new("out/primates"), LEAVES_SUFFIX);
        assert_eq!(path, PathBuf::from("out/primates.leaves.csv"));
    }
}
