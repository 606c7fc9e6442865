//! CSV reader for leaf coordinate tables.
//!
//! # Format
//! ```text
//! name,x,y[,z][,ignored...]
//! Homo_sapiens,0.12,-3.5
//! "Pan paniscus",0.3,-3.1
//! ```
//! * A header row is expected; the first column holds the leaf name.
//! * The next two columns are x and y, the third is z if requested.
//!   Columns are mapped by position; differently named ones are logged.
//! * Further columns are ignored with a warning.
//! * Fields may be double-quoted (`""` escapes a quote), blank lines are
//!   skipped and `\r\n` line endings are accepted.

use crate::coords::{LeafCoordinates, LeafPoint};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::{ParsingError, ParsingErrorType};
use log::{info, warn};
use std::path::Path;

/// Field delimiters of a CSV row
const FIELD_DELIMITERS: &[u8] = b",\r\n";

/// Expected names of the coordinate columns, in order
const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Reads a coordinate table from a file, streaming it through a buffer.
pub fn read_file<P: AsRef<Path>>(path: P, with_z: bool) -> Result<LeafCoordinates, ParsingError> {
    let parser = ByteParser::for_buffered_file(path)?;
    read(parser, with_z)
}

/// Reads a coordinate table from a string.
pub fn read_str(csv: &str, with_z: bool) -> Result<LeafCoordinates, ParsingError> {
    read(ByteParser::for_str(csv), with_z)
}

/// Reads a coordinate table from any byte source.
///
/// # Arguments
/// * `parser` - Parser positioned at the header row
/// * `with_z` - Whether a z column is required and read
///
/// # Errors
/// [ParsingErrorType::InvalidCoordinateTable] naming the offending line for
/// a missing header, rows with too few fields, empty or duplicate names and
/// non-numeric or non-finite values.
pub fn read<S: ByteSource>(
    mut parser: ByteParser<S>,
    with_z: bool,
) -> Result<LeafCoordinates, ParsingError> {
    let num_axes = if with_z { 3 } else { 2 };
    let mut line = 0;

    // Header
    let header = loop {
        match read_record(&mut parser)? {
            Some(record) => {
                line += 1;
                if !is_blank(&record) {
                    break record;
                }
            }
            None => {
                return Err(ParsingError::invalid_coordinate_table(
                    &mut parser,
                    "Missing header row".to_string(),
                ));
            }
        }
    };

    if header.len() < 1 + num_axes {
        return Err(ParsingError::invalid_coordinate_table(
            &mut parser,
            format!(
                "line {line}: header has {} columns, expected a name column and {num_axes} coordinate columns",
                header.len()
            ),
        ));
    }
    log_column_mapping(&header, num_axes);

    // Rows
    let mut coordinates = LeafCoordinates::new();
    while let Some(record) = read_record(&mut parser)? {
        line += 1;
        if is_blank(&record) {
            continue;
        }

        if record.len() < 1 + num_axes {
            return Err(ParsingError::invalid_coordinate_table(
                &mut parser,
                format!(
                    "line {line}: expected at least {} fields but found {}",
                    1 + num_axes,
                    record.len()
                ),
            ));
        }

        let name = record[0].as_str();
        if name.is_empty() {
            return Err(ParsingError::invalid_coordinate_table(
                &mut parser,
                format!("line {line}: empty leaf name"),
            ));
        }

        let mut values = [0.0; 3];
        for (axis, value) in values.iter_mut().enumerate().take(num_axes) {
            let field = &record[axis + 1];
            *value = match field.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    return Err(ParsingError::invalid_coordinate_table(
                        &mut parser,
                        format!(
                            "line {line}: invalid {} value {field:?} for leaf '{name}'",
                            AXIS_NAMES[axis]
                        ),
                    ));
                }
            };
        }

        let point = if with_z {
            LeafPoint::with_z(values[0], values[1], values[2])
        } else {
            LeafPoint::new(values[0], values[1])
        };

        if !coordinates.insert(name, point) {
            return Err(ParsingError::invalid_coordinate_table(
                &mut parser,
                format!("line {line}: duplicate leaf name '{name}'"),
            ));
        }
    }

    Ok(coordinates)
}

/// Reads the fields of the next row, consuming its line ending.
///
/// # Returns
/// `None` at EOF, otherwise the (possibly single empty) list of fields
fn read_record<S: ByteSource>(
    parser: &mut ByteParser<S>,
) -> Result<Option<Vec<String>>, ParsingError> {
    if parser.is_eof() {
        return Ok(None);
    }

    let mut fields = Vec::new();
    loop {
        fields.push(parser.parse_field(FIELD_DELIMITERS)?);
        match parser.next_byte() {
            Some(b',') => continue,
            Some(b'\r') => {
                parser.consume_if(b'\n');
                break;
            }
            Some(b'\n') | None => break,
            Some(b) => {
                return Err(ParsingError::from_parser(
                    ParsingErrorType::InvalidCoordinateTable(format!(
                        "unexpected byte {:?} after field",
                        char::from(b)
                    )),
                    parser,
                ));
            }
        }
    }

    Ok(Some(fields))
}

fn is_blank(record: &[String]) -> bool {
    record.iter().all(|field| field.is_empty())
}

/// Reports how header columns were mapped onto axes.
fn log_column_mapping(header: &[String], num_axes: usize) {
    for (axis, expected) in AXIS_NAMES.iter().take(num_axes).enumerate() {
        let column = &header[axis + 1];
        if !column.eq_ignore_ascii_case(expected) {
            info!("Mapped column '{column}' as {expected} coordinate");
        }
    }

    if header.len() > 1 + num_axes {
        warn!(
            "Ignoring columns after the coordinate columns: {}",
            header[1 + num_axes..].join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_table_is_empty() {
        let coords = read_str("name,x,y\n", false).unwrap();
        assert!(coords.is_empty());
    }

    #[test]
    fn test_missing_header() {
        let err = read_str("\n\n", false).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidCoordinateTable(_)));
    }

    #[test]
    fn test_z_column_required_when_requested() {
        let err = read_str("name,x,y\nA,1,2\n", true).unwrap_err();
        match err.kind() {
            ParsingErrorType::InvalidCoordinateTable(msg) => assert!(msg.contains("line 1")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_nan_is_rejected() {
        let err = read_str("name,x,y\nA,NaN,2\n", false).unwrap_err();
        match err.kind() {
            ParsingErrorType::InvalidCoordinateTable(msg) => {
                assert!(msg.contains("line 2"));
                assert!(msg.contains("x value"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
