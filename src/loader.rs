use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::record::{CellValue, EmployeeRecord, Row};

/// Input encodings the loader understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    /// Any workbook calamine can sniff: xlsx, xlsm, xlsb, xls, ods.
    Workbook,
}

impl SheetFormat {
    /// Pick the format from a file extension (case insensitive).
    ///
    /// # Returns
    /// * `Ok(SheetFormat)` for csv, xlsx, xlsm, xlsb, xls and ods
    /// * `Err(UnsupportedFormat)` or `Err(MissingExtension)` otherwise
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(SheetFormat::Csv),
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                Ok(SheetFormat::Workbook)
            }
            Some(ext) => Err(IngestError::UnsupportedFormat(ext.to_string())),
            None => Err(IngestError::MissingExtension),
        }
    }
}

/// A decoded sheet before header mapping; `None` marks an empty cell.
type Grid = Vec<Vec<Option<CellValue>>>;

/// Decode spreadsheet bytes into header-keyed rows.
///
/// The first row supplies the headers. Cells that are empty or falsy are
/// coerced to zero. A missing or blank header row yields no rows rather than
/// an error.
///
/// # Arguments
/// * `bytes` - Raw file content
/// * `format` - How to decode the bytes
///
/// # Returns
/// * `Result<Vec<Row>>` - Rows in sheet order, or a decode error
///
/// # Examples
/// ```
/// use leaderboard::{CellValue, SheetFormat, read_rows};
///
/// let rows = read_rows(b"Name,promoter\nAnn,\n", SheetFormat::Csv).unwrap();
/// assert_eq!(rows[0]["promoter"], CellValue::Number(0.0));
/// ```
pub fn read_rows(bytes: &[u8], format: SheetFormat) -> Result<Vec<Row>> {
    let grid = match format {
        SheetFormat::Csv => csv_grid(bytes)?,
        SheetFormat::Workbook => workbook_grid(bytes)?,
    };
    Ok(rows_from_grid(grid))
}

/// Decode spreadsheet bytes straight into employee records.
///
/// # Arguments
/// * `bytes` - Raw file content
/// * `format` - How to decode the bytes
///
/// # Returns
/// * `Result<Vec<EmployeeRecord>>` - One record per data row, or a decode error
pub fn read_records(bytes: &[u8], format: SheetFormat) -> Result<Vec<EmployeeRecord>> {
    let rows = read_rows(bytes, format)?;
    let records = records_from_rows(&rows);
    log::info!(
        "decoded {} rows into {} records ({:?})",
        rows.len(),
        records.len(),
        format
    );
    Ok(records)
}

/// Read a file from disk, choosing the decoder by extension.
///
/// # Arguments
/// * `path` - Path to a csv, xlsx, xlsm, xlsb, xls or ods file
///
/// # Returns
/// * `Result<Vec<EmployeeRecord>>` - The records, or an IO/decode error
///
/// # Examples
/// ```no_run
/// use leaderboard::load_records;
///
/// match load_records("team.xlsx") {
///     Ok(records) => println!("Loaded {} employees", records.len()),
///     Err(e) => eprintln!("Error loading file: {}", e),
/// }
/// ```
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<EmployeeRecord>> {
    let path = path.as_ref();
    let format = SheetFormat::from_path(path)?;
    let bytes = fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    read_records(&bytes, format)
}

/// The mapping step from loosely-typed rows to typed records.
///
/// `Name`, `Manager` and the four metric headers are read case-sensitively;
/// every other header is ignored.
pub fn records_from_rows(rows: &[Row]) -> Vec<EmployeeRecord> {
    rows.iter().map(EmployeeRecord::from_row).collect()
}

fn rows_from_grid(grid: Grid) -> Vec<Row> {
    let mut lines = grid.into_iter();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<Option<String>> = header_line
        .into_iter()
        .map(|cell| cell.map(|c| c.to_display_string()))
        .collect();
    if headers.iter().all(Option::is_none) {
        log::warn!("header row is empty; no records ingested");
        return Vec::new();
    }

    lines
        .filter(|line| line.iter().any(Option::is_some))
        .map(|line| {
            let mut row = Row::new();
            for (index, header) in headers.iter().enumerate() {
                let Some(header) = header else {
                    continue;
                };
                let cell = line
                    .get(index)
                    .cloned()
                    .flatten()
                    .filter(|c| !c.is_falsy())
                    .unwrap_or_else(CellValue::zero);
                // Later duplicate headers overwrite earlier ones
                row.insert(header.clone(), cell);
            }
            row
        })
        .collect()
}

fn csv_cell(field: &str) -> Option<CellValue> {
    if field.trim().is_empty() {
        return None;
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(field.to_string())),
    }
}

fn csv_grid(bytes: &[u8]) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(csv_cell).collect());
    }
    Ok(grid)
}

#[cfg(feature = "excel")]
fn workbook_grid(bytes: &[u8]) -> Result<Grid> {
    use calamine::{Data, Reader, open_workbook_auto_from_rs};
    use std::io::Cursor;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    // Only the first worksheet is read
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;

    let grid = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(CellValue::Number(*i as f64)),
                    Data::Float(f) => Some(CellValue::Number(*f)),
                    Data::String(s) if s.is_empty() => None,
                    Data::String(s) => Some(CellValue::Text(s.clone())),
                    Data::Bool(true) => Some(CellValue::Text("true".to_string())),
                    Data::Bool(false) => Some(CellValue::zero()),
                    Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => {
                        Some(CellValue::Text(s.clone()))
                    }
                    // Error cells and blanks read as missing
                    _ => None,
                })
                .collect()
        })
        .collect();

    Ok(grid)
}

#[cfg(not(feature = "excel"))]
fn workbook_grid(_bytes: &[u8]) -> Result<Grid> {
    Err(IngestError::UnsupportedFormat(
        "workbook support requires the 'excel' feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metric;

    #[test]
    fn csv_rows_use_first_line_as_headers() {
        let data = b"Name,Manager,mobileSales,Notes\nAnn,Xavier,12,hello\nBo,,3.5,\n";
        let rows = read_rows(data, SheetFormat::Csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], CellValue::Text("Ann".into()));
        assert_eq!(rows[0]["mobileSales"], CellValue::Number(12.0));
        assert_eq!(rows[1]["Manager"], CellValue::zero());
        assert_eq!(rows[1]["Notes"], CellValue::zero());
    }

    #[test]
    fn short_rows_are_padded_with_zero() {
        let data = b"Name,Manager,promoter\nAnn\n";
        let rows = read_rows(data, SheetFormat::Csv).unwrap();
        assert_eq!(rows[0]["promoter"], CellValue::zero());
    }

    #[test]
    fn blank_lines_and_empty_headers_are_skipped() {
        let data = b"Name,,fiberSales\n,,\nAnn,ignored,4\n";
        let rows = read_rows(data, SheetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
        assert!(!rows[0].contains_key(""));
    }

    #[test]
    fn missing_header_row_gives_no_records() {
        assert!(read_records(b"", SheetFormat::Csv).unwrap().is_empty());
        assert!(read_records(b",,\n1,2,3\n", SheetFormat::Csv).unwrap().is_empty());
    }

    #[test]
    fn duplicate_headers_keep_rightmost_column() {
        let data = b"Name,mobileSales,mobileSales\nAnn,1,2\n";
        let records = read_records(data, SheetFormat::Csv).unwrap();
        assert_eq!(records[0].metrics.get(Metric::MobileSales), 2.0);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let data = b"Name,Manager\n\xff\xfe,X\n";
        assert!(matches!(
            read_rows(data, SheetFormat::Csv),
            Err(IngestError::Csv(_))
        ));
    }

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(SheetFormat::from_path("team.CSV").unwrap(), SheetFormat::Csv);
        assert_eq!(
            SheetFormat::from_path("team.xlsx").unwrap(),
            SheetFormat::Workbook
        );
        assert!(matches!(
            SheetFormat::from_path("team.txt"),
            Err(IngestError::UnsupportedFormat(ext)) if ext == "txt"
        ));
        assert!(matches!(
            SheetFormat::from_path("team"),
            Err(IngestError::MissingExtension)
        ));
    }

    #[cfg(feature = "excel")]
    #[test]
    fn garbage_workbook_bytes_fail_to_decode() {
        assert!(read_rows(b"definitely not a workbook", SheetFormat::Workbook).is_err());
    }
}
