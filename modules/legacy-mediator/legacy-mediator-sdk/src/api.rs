//! `RecordStorage` trait definition.
//!
//! This trait defines the storage facade the `legacy_mediator` module offers
//! upward. Record types are addressed by their type string; ids are strings
//! and, for the relational backend, must be integer-valued.

use async_trait::async_trait;

use crate::data::DataGroup;
use crate::errors::MediatorError;
use crate::models::StorageReadResult;

/// Storage facade over the legacy relational database.
///
/// Operations without defined behavior for a type fail with
/// [`MediatorError::NotImplemented`], carrying the operation and type names.
/// `create`, `delete`, `links_exist`, `read_link_list` and
/// `generate_link_collection` never succeed against the relational backend.
///
/// A `filter` may contain the atomics `fromNo` and `toNo` holding
/// string-encoded integers that bound a list or count.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Read one record by type and id.
    async fn read(&self, record_type: &str, id: &str) -> Result<DataGroup, MediatorError>;

    /// Create a record.
    async fn create(
        &self,
        record_type: &str,
        id: &str,
        record: DataGroup,
        data_divider: &str,
    ) -> Result<(), MediatorError>;

    /// Delete a record by type and id.
    async fn delete(&self, record_type: &str, id: &str) -> Result<(), MediatorError>;

    /// Whether any other record links to the given one.
    async fn links_exist(&self, record_type: &str, id: &str) -> Result<bool, MediatorError>;

    /// Replace the stored state of a record with `record`.
    async fn update(
        &self,
        record_type: &str,
        id: &str,
        record: DataGroup,
    ) -> Result<(), MediatorError>;

    /// List records of a type, bounded by the filter's `fromNo`/`toNo`.
    async fn read_list(
        &self,
        record_type: &str,
        filter: &DataGroup,
    ) -> Result<StorageReadResult, MediatorError>;

    /// List records of an abstract type, bounded by the filter's `fromNo`/`toNo`.
    async fn read_abstract_list(
        &self,
        record_type: &str,
        filter: &DataGroup,
    ) -> Result<StorageReadResult, MediatorError>;

    /// List records linking to the given one.
    async fn read_link_list(
        &self,
        record_type: &str,
        id: &str,
    ) -> Result<Vec<DataGroup>, MediatorError>;

    /// Collect the links pointing to the given record.
    async fn generate_link_collection(
        &self,
        record_type: &str,
        id: &str,
    ) -> Result<Vec<DataGroup>, MediatorError>;

    /// Count records of a type within the filter's bounds.
    async fn count(&self, record_type: &str, filter: &DataGroup) -> Result<u64, MediatorError>;

    /// Count records of an abstract type within the filter's bounds.
    async fn count_abstract(
        &self,
        record_type: &str,
        implementing_types: &[String],
        filter: &DataGroup,
    ) -> Result<u64, MediatorError>;

    /// Whether a single-row read of the record succeeds.
    ///
    /// Every failure, not-found included, is reported as `false`.
    async fn exists(&self, record_type: &str, id: &str) -> bool;
}
