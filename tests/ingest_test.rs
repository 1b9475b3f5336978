use std::io::Write;

use leaderboard::downloader::export_view;
use leaderboard::{Filters, IngestError, Metric, MetricFilter, SheetFormat, Session, load_records};
use tempfile::Builder;

const TEAM_CSV: &str = "\
Name,Manager,mobileSales,fiberSales,promoter,videoPackage,Region
Ann,Xavier,10,0,0,0,North
Bob,Xavier,5,5,,0,North
Cat,,99,99,99,99,South
Dan,Yolanda,3,n/a,2.5 pts,1,West
";

fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn csv_file_feeds_the_leaderboard() {
    let file = write_temp(".csv", TEAM_CSV.as_bytes());
    let mut session = Session::new();
    assert_eq!(session.ingest_file(file.path()).unwrap(), 4);

    let managers: Vec<_> = session.managers().iter().cloned().collect();
    assert_eq!(managers, vec!["Xavier".to_string(), "Yolanda".to_string()]);

    let view = session.recompute(&Filters::default());
    let xavier = &view.managers[0];
    assert_eq!(xavier.manager, "Xavier");
    let names: Vec<_> = xavier.top_employees.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
    assert_eq!(xavier.average_score, 10.0);

    let yolanda = &view.managers[1];
    assert_eq!(yolanda.top_employees[0].score, 6.5);
}

#[test]
fn unreadable_file_keeps_previous_records() {
    let good = write_temp(".csv", TEAM_CSV.as_bytes());
    let mut session = Session::new();
    session.ingest_file(good.path()).unwrap();

    let missing = good.path().with_file_name("does-not-exist.csv");
    assert!(matches!(session.ingest_file(&missing), Err(IngestError::Io(_))));

    let unsupported = write_temp(".txt", b"whatever");
    assert!(matches!(
        session.ingest_file(unsupported.path()),
        Err(IngestError::UnsupportedFormat(_))
    ));

    assert_eq!(session.records().len(), 4);
    assert!(session.has_manager("Yolanda"));
}

#[test]
fn header_only_file_yields_empty_leaderboard() {
    let file = write_temp(".csv", b"Name,Manager,promoter\n");
    let records = load_records(file.path()).unwrap();
    assert!(records.is_empty());

    let session = Session::from_records(records);
    let view = session.recompute(&Filters::default());
    assert!(view.managers.is_empty());
    assert!(view.top_manager.is_none());
}

#[test]
fn export_writes_csv_and_json() {
    let session = Session::from_records(leaderboard::sample_records());
    let view = session.recompute(&Filters::new(None, MetricFilter::Metric(Metric::FiberSales)));
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("board.csv");
    export_view(&view, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.lines().nth(1).unwrap().starts_with("1,Mike Johnson,41,1,Jane Smith,41,true"));

    let json_path = dir.path().join("board.json");
    export_view(&view, &json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["mode"], "fiberSales");
    assert_eq!(json["top_manager"]["employee"], "Jane Smith");

    assert!(matches!(
        export_view(&view, dir.path().join("board.pdf")),
        Err(IngestError::UnsupportedFormat(_))
    ));
}

#[cfg(feature = "excel")]
mod excel {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn team_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = ["Name", "Manager", "mobileSales", "fiberSales", "promoter", "videoPackage"];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }

        sheet.write_string(1, 0, "Ann").unwrap();
        sheet.write_string(1, 1, "Xavier").unwrap();
        sheet.write_number(1, 2, 4).unwrap();
        sheet.write_number(1, 4, 8.5).unwrap();

        sheet.write_string(2, 0, "Bob").unwrap();
        sheet.write_string(2, 1, "Xavier").unwrap();
        sheet.write_number(2, 2, 20).unwrap();
        sheet.write_string(2, 4, "3").unwrap();

        sheet.write_string(3, 0, "Cy").unwrap();
        sheet.write_number(3, 5, 100).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn xlsx_bytes_are_ingested_from_the_first_sheet() {
        let mut session = Session::new();
        let count = session.ingest(&team_workbook(), SheetFormat::Workbook).unwrap();
        assert_eq!(count, 3);
        assert_eq!(session.managers().len(), 1);

        let view = session.recompute(&Filters::new(None, MetricFilter::Metric(Metric::Promoter)));
        let names: Vec<_> = view.managers[0]
            .top_employees
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
        assert_eq!(view.managers[0].top_employees[1].score, 3.0);
        assert_eq!(view.managers[0].average_score, 5.8);
    }

    #[test]
    fn xlsx_export_reads_back() {
        let session = Session::from_records(leaderboard::sample_records());
        let view = session.recompute(&Filters::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.xlsx");
        export_view(&view, &path).unwrap();

        let rows = leaderboard::read_rows(&std::fs::read(&path).unwrap(), SheetFormat::Workbook)
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0]["manager"],
            leaderboard::CellValue::Text("Mike Johnson".to_string())
        );
    }

    #[test]
    fn corrupt_workbook_keeps_previous_records() {
        let mut session = Session::from_records(leaderboard::sample_records());
        assert!(session.ingest(b"PK\x03\x04 broken", SheetFormat::Workbook).is_err());
        assert_eq!(session.records().len(), 3);
    }
}
