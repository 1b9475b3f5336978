use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // Longest leading decimal literal, the way a lenient float parser reads text cells
    static ref NUMERIC_PREFIX_REGEX: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap();
}

/// Header used for the employee display name.
pub const NAME_HEADER: &str = "Name";
/// Header used for the manager grouping key.
pub const MANAGER_HEADER: &str = "Manager";

/// One raw cell as produced by the loader.
///
/// Missing and falsy cells never reach this type as `Text("")`: the loader
/// coerces them to `Number(0.0)`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

/// A row keyed by header name.
pub type Row = HashMap<String, CellValue>;

impl CellValue {
    /// The value every missing or falsy cell is coerced to.
    pub fn zero() -> Self {
        CellValue::Number(0.0)
    }

    /// Falsy cells are the ones a row mapping treats as "missing".
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Text(s) => s.is_empty(),
        }
    }

    /// Numeric reading of the cell; anything unreadable is zero.
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(n) if n.is_nan() => 0.0,
            CellValue::Number(n) => *n,
            CellValue::Text(s) => parse_leading_number(s),
        }
    }

    /// Text form of the cell; whole numbers print without a fraction.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

fn parse_leading_number(text: &str) -> f64 {
    NUMERIC_PREFIX_REGEX
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// The fixed set of performance metrics.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    #[serde(rename = "mobileSales")]
    MobileSales,
    #[serde(rename = "fiberSales")]
    FiberSales,
    #[serde(rename = "promoter")]
    Promoter,
    #[serde(rename = "videoPackage")]
    VideoPackage,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::MobileSales,
        Metric::FiberSales,
        Metric::Promoter,
        Metric::VideoPackage,
    ];

    /// Column header / filter key for the metric.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::MobileSales => "mobileSales",
            Metric::FiberSales => "fiberSales",
            Metric::Promoter => "promoter",
            Metric::VideoPackage => "videoPackage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::MobileSales => "Mobile Sales",
            Metric::FiberSales => "Fiber Sales",
            Metric::Promoter => "Promoter",
            Metric::VideoPackage => "Video Package",
        }
    }

    fn index(&self) -> usize {
        match self {
            Metric::MobileSales => 0,
            Metric::FiberSales => 1,
            Metric::Promoter => 2,
            Metric::VideoPackage => 3,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown metric '{}' (expected one of mobileSales, fiberSales, promoter, videoPackage, all)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.key() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// Values for every metric, indexed by `Metric`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MetricValues([f64; 4]);

impl MetricValues {
    pub fn new(mobile_sales: f64, fiber_sales: f64, promoter: f64, video_package: f64) -> Self {
        MetricValues([mobile_sales, fiber_sales, promoter, video_package])
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        // NaN would poison every comparison downstream
        self.0[metric.index()] = if value.is_nan() { 0.0 } else { value };
    }
}

/// One employee row after normalization.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EmployeeRecord {
    pub name: String,
    pub manager: Option<String>,
    pub metrics: MetricValues,
}

impl EmployeeRecord {
    pub fn new(name: impl Into<String>, manager: Option<&str>, metrics: MetricValues) -> Self {
        EmployeeRecord {
            name: name.into(),
            manager: manager.filter(|m| !m.is_empty()).map(str::to_string),
            metrics,
        }
    }

    /// Map a header-keyed row into a typed record.
    ///
    /// Headers are matched case-sensitively; unknown headers are ignored and
    /// missing metrics read as zero.
    pub fn from_row(row: &Row) -> Self {
        let name = row
            .get(NAME_HEADER)
            .map(CellValue::to_display_string)
            .unwrap_or_else(|| "0".to_string());

        let manager = row
            .get(MANAGER_HEADER)
            .filter(|cell| !cell.is_falsy())
            .map(CellValue::to_display_string);

        let mut metrics = MetricValues::default();
        for metric in Metric::ALL {
            let value = row.get(metric.key()).map(CellValue::as_number).unwrap_or(0.0);
            metrics.set(metric, value);
        }

        EmployeeRecord {
            name,
            manager,
            metrics,
        }
    }

    pub fn manager(&self) -> Option<&str> {
        self.manager.as_deref()
    }
}

/// Demonstration data set used when no file is supplied.
pub fn sample_records() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new(
            "John Doe",
            Some("Sarah Smith"),
            MetricValues::new(45.0, 32.0, 78.0, 56.0),
        ),
        EmployeeRecord::new(
            "Jane Smith",
            Some("Mike Johnson"),
            MetricValues::new(67.0, 41.0, 89.0, 62.0),
        ),
        EmployeeRecord::new(
            "Robert Brown",
            Some("Sarah Smith"),
            MetricValues::new(52.0, 38.0, 65.0, 71.0),
        ),
    ]
}
