use crate::record::{EmployeeRecord, Metric};
use crate::ranking::MetricFilter;

/// Sum of all four metrics.
pub fn total_score(record: &EmployeeRecord) -> f64 {
    Metric::ALL
        .iter()
        .map(|metric| metric_score(record, *metric))
        .sum()
}

/// Value of a single metric; zero when the cell was missing or unreadable.
pub fn metric_score(record: &EmployeeRecord, metric: Metric) -> f64 {
    record.metrics.get(metric)
}

/// Score under the active metric mode.
pub fn active_score(record: &EmployeeRecord, mode: MetricFilter) -> f64 {
    match mode {
        MetricFilter::All => total_score(record),
        MetricFilter::Metric(metric) => metric_score(record, metric),
    }
}

/// Round to one decimal place the way a fixed-point display does.
///
/// The magnitude is rounded half-up on its exact decimal expansion, so values
/// stored just under a tie (0.15 is 0.1499...) round down, and the sign is
/// put back afterwards (-0.25 becomes -0.3).
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // 30 fractional digits resolve any f64 at or above 0.05 against the tie
    let digits = format!("{:.30}", value.abs());
    let Some((whole, fraction)) = digits.split_once('.') else {
        return value;
    };
    let mut fraction = fraction.chars();
    let tenths = fraction.next().unwrap_or('0');
    let round_up = fraction.next().is_some_and(|hundredths| hundredths >= '5');

    let scaled = format!("{}{}", whole, tenths).parse::<f64>().unwrap_or(0.0);
    let scaled = if round_up { scaled + 1.0 } else { scaled };
    (scaled / 10.0).copysign(value)
}

/// Mean of the values, or zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
