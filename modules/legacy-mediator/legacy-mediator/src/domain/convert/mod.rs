//! Row to record converters.
//!
//! Each converter turns exactly one fetched row into one hierarchical
//! record. Converters never aggregate across rows.

use legacy_mediator_sdk::DataGroup;

use crate::domain::error::DomainError;
use crate::domain::ports::Row;

mod organisation;
mod relations;
mod user;

pub(crate) use organisation::ADDRESS_COLUMNS;
pub use organisation::convert_organisation;
pub use relations::{ORGANISATION_LINK, convert_parent, convert_predecessor};
pub use user::{convert_user, role_group};

/// Per-call facts a converter stamps into `recordInfo`.
#[derive(Debug, Clone, Copy)]
pub struct ConvertContext<'a> {
    pub record_type: &'a str,
    pub data_divider: &'a str,
}

/// Converter for a top-level record row.
pub type RowConverter = fn(&Row, &ConvertContext<'_>) -> Result<DataGroup, DomainError>;

/// Converter for a relation row attached as a child of another record.
pub type ChildConverter = fn(&Row) -> Result<DataGroup, DomainError>;

pub(crate) fn required_text(row: &Row, column: &str) -> Result<String, DomainError> {
    row.text(column)
        .ok_or_else(|| DomainError::validation(format!("row is missing mandatory column {column}")))
}

pub(crate) fn record_info(id: String, ctx: &ConvertContext<'_>) -> DataGroup {
    DataGroup::new("recordInfo")
        .with_atomic("id", id)
        .with_child(DataGroup::link("type", "recordType", ctx.record_type))
        .with_child(DataGroup::link("dataDivider", "system", ctx.data_divider))
}
