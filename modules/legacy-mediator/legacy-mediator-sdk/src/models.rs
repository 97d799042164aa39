//! Public result models for the `legacy_mediator` module.

use crate::data::DataGroup;

/// Records produced by a list operation.
///
/// `total_matches` is the number of records actually returned by the
/// operation; it is not a separate full-table count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageReadResult {
    pub records: Vec<DataGroup>,
    pub total_matches: u64,
}

impl StorageReadResult {
    #[must_use]
    pub fn new(records: Vec<DataGroup>) -> Self {
        let total_matches = records.len() as u64;
        Self {
            records,
            total_matches,
        }
    }
}
