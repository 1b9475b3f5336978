/*!
# Team Leaderboard

Ranks employees and their managers from a performance spreadsheet.

## Overview

A spreadsheet of employee performance rows (one per employee, with a `Name`,
a `Manager` and four metric columns) is loaded into a [`Session`]. Every time
the manager or metric filter changes, the session recomputes a leaderboard:
managers ranked by the strength of their best people, each with up to five
top employees and an average, plus a single "top manager" callout.

## Architecture

### Ingestion
- **loader**: CSV (via `csv`) and workbooks (xlsx, xls, xlsb, ods via
  `calamine`) decoded into header-keyed rows, then mapped into typed
  [`EmployeeRecord`]s. Missing or falsy cells read as zero.

### Aggregation & Ranking
- **record**: the typed record, metric enumeration and cell normalization
- **score**: total and per-metric scores, rounding
- **ranking**: filter → group → rank employees → rank managers → summaries
- **session**: owns the current record set and manager index; ingestion is
  all-or-nothing

### Presentation
- **render**: plain-text leaderboard for the terminal
- **downloader**: CSV, XLSX and JSON export of a computed view

## Ranking rules

- Employees within a manager are sorted by the active score, highest first,
  keeping input order on ties.
- Managers are sorted by the mean of their top three employees.
- The card average is taken over the (up to five) displayed employees.
- The first manager's card is highlighted unless a manager filter is applied.

## Example

```
use leaderboard::{Filters, MetricFilter, Session, sample_records};

let session = Session::from_records(sample_records());
let view = session.recompute(&Filters::new(None, MetricFilter::All));
assert_eq!(view.top_manager.unwrap().manager, "Mike Johnson");
```
*/

pub mod downloader;
pub mod error;
pub mod loader;
pub mod ranking;
pub mod record;
pub mod render;
pub mod score;
pub mod session;

pub use error::{IngestError, Result};
pub use loader::{SheetFormat, load_records, read_records, read_rows, records_from_rows};
pub use ranking::{
    EmployeeScore, Filters, ManagerSummary, MetricFilter, TopManager, ViewModel, derive_managers,
    recompute,
};
pub use record::{CellValue, EmployeeRecord, Metric, MetricValues, Row, sample_records};
pub use score::{metric_score, total_score};
pub use session::Session;
