use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;
use crate::loader::{self, SheetFormat};
use crate::ranking::{self, Filters, ViewModel};
use crate::record::EmployeeRecord;

/// The currently ingested data set and its manager index.
///
/// Presentation owns one of these and hands it filter selections; every
/// replacement swaps records and managers together, so a failed ingest leaves
/// the previous data set in place.
#[derive(Clone, Debug, Default)]
pub struct Session {
    records: Vec<EmployeeRecord>,
    managers: BTreeSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<EmployeeRecord>) -> Self {
        let mut session = Session::new();
        session.replace(records);
        session
    }

    /// Swap in a new record set, rebuilding the manager index.
    pub fn replace(&mut self, records: Vec<EmployeeRecord>) {
        self.managers = ranking::derive_managers(&records);
        self.records = records;
        log::info!(
            "session holds {} records across {} managers",
            self.records.len(),
            self.managers.len()
        );
    }

    /// Decode bytes and replace the data set; on error nothing changes.
    pub fn ingest(&mut self, bytes: &[u8], format: SheetFormat) -> Result<usize> {
        let records = loader::read_records(bytes, format).inspect_err(|e| {
            log::warn!("ingest failed, keeping {} records: {}", self.records.len(), e)
        })?;
        self.replace(records);
        Ok(self.records.len())
    }

    /// Load a file and replace the data set; on error nothing changes.
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let records = loader::load_records(&path).inspect_err(|e| {
            log::warn!(
                "loading {} failed, keeping {} records: {}",
                path.as_ref().display(),
                self.records.len(),
                e
            )
        })?;
        self.replace(records);
        Ok(self.records.len())
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn managers(&self) -> &BTreeSet<String> {
        &self.managers
    }

    pub fn has_manager(&self, manager: &str) -> bool {
        self.managers.contains(manager)
    }

    /// Turn a typed manager choice into a filter value.
    ///
    /// An empty choice or `all` clears the filter, unless a manager in the
    /// current data is literally named `all`.
    pub fn select_manager(&self, choice: &str) -> Option<String> {
        let choice = choice.trim();
        if choice.is_empty() || (choice == "all" && !self.has_manager(choice)) {
            None
        } else {
            Some(choice.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn recompute(&self, filters: &Filters) -> ViewModel {
        ranking::recompute(&self.records, filters)
    }
}
