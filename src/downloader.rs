use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::ranking::ViewModel;

const EXPORT_HEADERS: [&str; 7] = [
    "rank",
    "manager",
    "average_score",
    "position",
    "employee",
    "score",
    "highlighted",
];

/// One flattened line of the export table.
struct ExportLine<'a> {
    rank: usize,
    manager: &'a str,
    average_score: f64,
    position: usize,
    employee: &'a str,
    score: f64,
    highlighted: bool,
}

fn export_lines(view: &ViewModel) -> Vec<ExportLine<'_>> {
    view.managers
        .iter()
        .enumerate()
        .flat_map(|(rank, summary)| {
            summary
                .top_employees
                .iter()
                .enumerate()
                .map(move |(position, employee)| ExportLine {
                    rank: rank + 1,
                    manager: &summary.manager,
                    average_score: summary.average_score,
                    position: position + 1,
                    employee: &employee.name,
                    score: employee.score,
                    highlighted: summary.highlighted,
                })
        })
        .collect()
}

/// Convert the leaderboard to CSV format
///
/// Each displayed employee becomes one line carrying its manager's rank,
/// name, card average and highlight flag. Fields containing commas or quotes
/// are escaped by the CSV writer.
///
/// # Arguments
/// * `view` - The computed leaderboard to export
///
/// # Returns
/// * `Result<String>` - CSV content with a header line, or an export error
///
/// # Examples
/// ```
/// use leaderboard::downloader::to_csv;
/// use leaderboard::{Filters, Session, sample_records};
///
/// let view = Session::from_records(sample_records()).recompute(&Filters::default());
/// let csv = to_csv(&view).unwrap();
/// assert_eq!(csv.lines().count(), 4);
/// ```
pub fn to_csv(view: &ViewModel) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for line in export_lines(view) {
        writer.write_record([
            line.rank.to_string(),
            line.manager.to_string(),
            line.average_score.to_string(),
            line.position.to_string(),
            line.employee.to_string(),
            line.score.to_string(),
            line.highlighted.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IngestError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IngestError::Export(e.to_string()))
}

/// Convert the leaderboard to XLSX format
///
/// Writes the same table as [`to_csv`] into a single worksheet named
/// "Leaderboard" using rust_xlsxwriter.
///
/// # Arguments
/// * `view` - The computed leaderboard to export
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes, or an export error
#[cfg(feature = "excel")]
pub fn to_xlsx(view: &ViewModel) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Leaderboard")?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (index, line) in export_lines(view).iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_number(row, 0, line.rank as f64)?;
        worksheet.write_string(row, 1, line.manager)?;
        worksheet.write_number(row, 2, line.average_score)?;
        worksheet.write_number(row, 3, line.position as f64)?;
        worksheet.write_string(row, 4, line.employee)?;
        worksheet.write_number(row, 5, line.score)?;
        worksheet.write_boolean(row, 6, line.highlighted)?;
    }

    workbook.push_worksheet(worksheet);
    Ok(workbook.save_to_buffer()?)
}

#[cfg(not(feature = "excel"))]
pub fn to_xlsx(_view: &ViewModel) -> Result<Vec<u8>> {
    Err(IngestError::UnsupportedFormat(
        "xlsx export requires the 'excel' feature".to_string(),
    ))
}

/// Convert the leaderboard to pretty-printed JSON
///
/// Metric modes serialize with their column keys (`"all"`, `"promoter"`, ...).
///
/// # Returns
/// * `Result<String>` - JSON document, or an export error
pub fn to_json(view: &ViewModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Write the leaderboard to a file
///
/// The encoding is picked from the extension: `csv`, `xlsx` or `json`
/// (case insensitive). Nothing is written for an unknown extension.
///
/// # Arguments
/// * `view` - The computed leaderboard to export
/// * `path` - Destination file
///
/// # Examples
/// ```no_run
/// use leaderboard::downloader::export_view;
/// use leaderboard::{Filters, Session, sample_records};
///
/// let view = Session::from_records(sample_records()).recompute(&Filters::default());
/// if let Err(e) = export_view(&view, "leaderboard.xlsx") {
///     eprintln!("Export failed: {}", e);
/// }
/// ```
pub fn export_view(view: &ViewModel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    let bytes = match extension.as_deref() {
        Some("csv") => to_csv(view)?.into_bytes(),
        Some("xlsx") => to_xlsx(view)?,
        Some("json") => to_json(view)?.into_bytes(),
        Some(ext) => return Err(IngestError::UnsupportedFormat(ext.to_string())),
        None => return Err(IngestError::MissingExtension),
    };

    fs::write(path, bytes)?;
    log::info!("exported leaderboard to {}", path.display());
    Ok(())
}
