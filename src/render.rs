//! Plain-text rendering of a [`ViewModel`] for the terminal front end.

use std::fmt::Write;

use crate::ranking::{MetricFilter, ViewModel};

fn format_score(score: f64, mode: MetricFilter) -> String {
    match mode {
        MetricFilter::All => format!("{:.1}", score),
        MetricFilter::Metric(_) => score.to_string(),
    }
}

/// Line describing the top manager
///
/// Aggregate mode shows the rounded total; metric mode shows the metric's
/// label and raw value.
///
/// # Returns
/// * `Some(String)` - Two lines: the manager and their top employee
/// * `None` - When no manager ranks
pub fn top_manager_line(view: &ViewModel) -> Option<String> {
    let top = view.top_manager.as_ref()?;
    let detail = match view.mode {
        MetricFilter::All => format!("Total Score: {}", format_score(top.score, view.mode)),
        MetricFilter::Metric(metric) => format!("{}: {}", metric.label(), top.score),
    };
    Some(format!(
        "🏆 {}\nTop Employee: {} ({})",
        top.manager, top.employee, detail
    ))
}

/// Render the whole leaderboard as terminal text
///
/// The top-manager callout comes first, then one card per manager in rank
/// order. The highlighted card is starred.
///
/// # Arguments
/// * `view` - The computed leaderboard
///
/// # Returns
/// * `String` - Text ready to print, ending in a newline
///
/// # Examples
/// ```
/// use leaderboard::render::render_view;
/// use leaderboard::{Filters, Session, sample_records};
///
/// let view = Session::from_records(sample_records()).recompute(&Filters::default());
/// assert!(render_view(&view).starts_with("🏆 Mike Johnson"));
/// ```
pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();

    match top_manager_line(view) {
        Some(line) => {
            let _ = writeln!(out, "{}\n", line);
        }
        None => {
            let _ = writeln!(out, "No manager data to rank.");
            return out;
        }
    }

    let suffix = if view.mode.is_aggregate() { " (Total)" } else { "" };
    for (rank, summary) in view.managers.iter().enumerate() {
        let marker = if summary.highlighted { "*" } else { " " };
        let _ = writeln!(
            out,
            "{}{:>2}. {}  Avg: {:.1}{}",
            marker,
            rank + 1,
            summary.manager,
            summary.average_score,
            suffix
        );
        for employee in &summary.top_employees {
            let _ = writeln!(
                out,
                "      {:<24} {}",
                employee.name,
                format_score(employee.score, view.mode)
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{Filters, recompute};
    use crate::record::{Metric, sample_records};

    #[test]
    fn empty_view_says_so() {
        assert_eq!(render_view(&ViewModel::default()), "No manager data to rank.\n");
    }

    #[test]
    fn aggregate_view_marks_top_card() {
        let text = render_view(&recompute(&sample_records(), &Filters::default()));

        assert!(text.starts_with("🏆 Mike Johnson\nTop Employee: Jane Smith (Total Score: 259.0)"));
        assert!(text.contains("* 1. Mike Johnson  Avg: 259.0 (Total)"));
        assert!(text.contains("  2. Sarah Smith  Avg: 218.5 (Total)"));
    }

    #[test]
    fn metric_view_uses_metric_label() {
        let filters = Filters::new(None, MetricFilter::Metric(Metric::VideoPackage));
        let view = recompute(&sample_records(), &filters);
        let line = top_manager_line(&view).unwrap();
        assert!(line.ends_with("(Video Package: 71)"));
    }
}
