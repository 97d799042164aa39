use legacy_mediator_sdk::DataGroup;

use super::required_text;
use crate::domain::error::DomainError;
use crate::domain::ports::Row;

/// Name of the link group inside a relation child.
pub const ORGANISATION_LINK: &str = "organisationLink";

const LINKED_TYPE: &str = "organisation";

/// Convert one parent relation row into a `parentOrganisation` child.
///
/// # Errors
/// Returns `DomainError::Validation` when the row has no parent id.
pub fn convert_parent(row: &Row) -> Result<DataGroup, DomainError> {
    let parent_id = required_text(row, "organisation_parent_id")?;
    Ok(DataGroup::new("parentOrganisation").with_child(DataGroup::link(
        ORGANISATION_LINK,
        LINKED_TYPE,
        parent_id,
    )))
}

/// Convert one predecessor relation row into a `predecessorOrganisation` child.
///
/// # Errors
/// Returns `DomainError::Validation` when the row has no predecessor id.
pub fn convert_predecessor(row: &Row) -> Result<DataGroup, DomainError> {
    let predecessor_id = required_text(row, "organisation_predecessor_id")?;
    let mut predecessor = DataGroup::new("predecessorOrganisation").with_child(DataGroup::link(
        ORGANISATION_LINK,
        LINKED_TYPE,
        predecessor_id,
    ));
    predecessor.add_atomic_if_present("internalNote", row.text("description"));
    Ok(predecessor)
}
