//! Grouping and ranking of employee records into a leaderboard view.
//!
//! Everything here is a pure function of the record slice and the filters;
//! calling [`recompute`] twice with the same inputs yields the same view.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::record::{EmployeeRecord, Metric, UnknownMetric};
use crate::score::{active_score, mean, round1};

/// Members averaged to rank managers against each other.
pub const RANKING_DEPTH: usize = 3;
/// Members shown (and averaged) on each manager card.
pub const DISPLAY_DEPTH: usize = 5;

/// Metric selection: a single metric, or the aggregate of all four.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum MetricFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(untagged)]
    Metric(Metric),
}

impl MetricFilter {
    pub fn label(&self) -> &'static str {
        match self {
            MetricFilter::All => "All Metrics",
            MetricFilter::Metric(metric) => metric.label(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, MetricFilter::All)
    }
}

impl fmt::Display for MetricFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricFilter::All => f.write_str("all"),
            MetricFilter::Metric(metric) => write!(f, "{}", metric),
        }
    }
}

impl FromStr for MetricFilter {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(MetricFilter::All)
        } else {
            s.parse().map(MetricFilter::Metric)
        }
    }
}

/// Filter selections owned by the presentation layer.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Filters {
    /// `None` means every manager.
    pub manager: Option<String>,
    pub metric: MetricFilter,
}

impl Filters {
    pub fn new(manager: Option<&str>, metric: MetricFilter) -> Self {
        Filters {
            manager: manager.filter(|m| !m.is_empty()).map(str::to_string),
            metric,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EmployeeScore {
    pub name: String,
    /// Rounded total in aggregate mode, raw metric value otherwise.
    pub score: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ManagerSummary {
    pub manager: String,
    /// Rounded mean over `top_employees`.
    pub average_score: f64,
    /// Mean over the first `RANKING_DEPTH` members; the ranking key.
    pub team_score: f64,
    /// Number of filtered records in this manager's group.
    pub team_size: usize,
    pub top_employees: Vec<EmployeeScore>,
    pub highlighted: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TopManager {
    pub manager: String,
    pub employee: String,
    pub score: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ViewModel {
    pub mode: MetricFilter,
    pub managers: Vec<ManagerSummary>,
    pub top_manager: Option<TopManager>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

/// Distinct non-empty manager names, sorted for display.
pub fn derive_managers(records: &[EmployeeRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(EmployeeRecord::manager)
        .map(str::to_string)
        .collect()
}

struct ManagerGroup<'a> {
    manager: &'a str,
    members: Vec<&'a EmployeeRecord>,
    team_score: f64,
}

// Group in first-seen order, preserving member order within each group
fn group_by_manager<'a>(
    records: impl Iterator<Item = &'a EmployeeRecord>,
) -> Vec<ManagerGroup<'a>> {
    let mut groups: Vec<ManagerGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let Some(manager) = record.manager() else {
            continue;
        };
        let slot = *index.entry(manager).or_insert_with(|| {
            groups.push(ManagerGroup {
                manager,
                members: Vec::new(),
                team_score: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].members.push(record);
    }

    groups
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn head_scores(members: &[&EmployeeRecord], depth: usize, mode: MetricFilter) -> Vec<f64> {
    members
        .iter()
        .take(depth)
        .map(|record| active_score(record, mode))
        .collect()
}

/// Build the leaderboard for the given records and filter selection.
pub fn recompute(records: &[EmployeeRecord], filters: &Filters) -> ViewModel {
    let mode = filters.metric;
    let selected = filters.manager.as_deref();

    let filtered = records
        .iter()
        .filter(|record| selected.is_none_or(|m| record.manager() == Some(m)));
    let mut groups = group_by_manager(filtered);

    for group in groups.iter_mut() {
        // sort_by is stable: ties keep input order
        group
            .members
            .sort_by(|a, b| descending(active_score(a, mode), active_score(b, mode)));
        group.team_score = mean(&head_scores(&group.members, RANKING_DEPTH, mode));
    }
    groups.sort_by(|a, b| descending(a.team_score, b.team_score));

    log::debug!(
        "recompute: manager={:?} metric={} groups={}",
        selected,
        mode,
        groups.len()
    );

    let top_manager = groups.first().and_then(|group| {
        group.members.first().map(|leader| TopManager {
            manager: group.manager.to_string(),
            employee: leader.name.clone(),
            score: display_score(leader, mode),
        })
    });

    let managers = groups
        .iter()
        .enumerate()
        .map(|(rank, group)| {
            let shown = &group.members[..group.members.len().min(DISPLAY_DEPTH)];
            ManagerSummary {
                manager: group.manager.to_string(),
                average_score: round1(mean(&head_scores(shown, DISPLAY_DEPTH, mode))),
                team_score: group.team_score,
                team_size: group.members.len(),
                top_employees: shown
                    .iter()
                    .map(|record| EmployeeScore {
                        name: record.name.clone(),
                        score: display_score(record, mode),
                    })
                    .collect(),
                highlighted: rank == 0 && selected.is_none(),
            }
        })
        .collect();

    ViewModel {
        mode,
        managers,
        top_manager,
    }
}

fn display_score(record: &EmployeeRecord, mode: MetricFilter) -> f64 {
    match mode {
        MetricFilter::All => round1(active_score(record, mode)),
        MetricFilter::Metric(_) => active_score(record, mode),
    }
}
