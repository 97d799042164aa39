use legacy_mediator_sdk::{DataAtomic, DataGroup};

use super::{ConvertContext, record_info, required_text};
use crate::domain::error::DomainError;
use crate::domain::ports::Row;
use crate::domain::roles::Role;

const SYSTEM_ADMINISTRATOR: &str = "systemAdministrator";
const DOMAIN_ADMINISTRATOR: &str = "domainAdministrator";
const DOMAIN_PERMISSION_TERM: &str = "domainPermissionTerm";

/// Convert one user table row.
///
/// # Errors
/// Returns `DomainError::Validation` when the row has no `db_id`.
pub fn convert_user(row: &Row, ctx: &ConvertContext<'_>) -> Result<DataGroup, DomainError> {
    let id = required_text(row, "db_id")?;

    let mut user = DataGroup::new("user").with_child(record_info(id, ctx));
    user.add_atomic_if_present("userFirstname", row.text("first_name"));
    user.add_atomic_if_present("userLastname", row.text("last_name"));
    Ok(user)
}

/// Build the `userRole` child for a derived role.
#[must_use]
pub fn role_group(role: &Role) -> DataGroup {
    match role {
        Role::SystemAdmin => DataGroup::new("userRole").with_child(DataGroup::link(
            "userRole",
            "permissionRole",
            SYSTEM_ADMINISTRATOR,
        )),
        Role::DomainAdmin { domains } => {
            let mut rule_part = DataGroup::new("permissionTermRulePart").with_child(
                DataGroup::link("rule", "permissionTerm", DOMAIN_PERMISSION_TERM),
            );
            for (repeat_id, domain) in domains.iter().enumerate() {
                rule_part.add_child(
                    DataAtomic::new("value", format!("system.{domain}"))
                        .with_repeat_id(repeat_id.to_string()),
                );
            }
            DataGroup::new("userRole")
                .with_child(DataGroup::link(
                    "userRole",
                    "permissionRole",
                    DOMAIN_ADMINISTRATOR,
                ))
                .with_child(rule_part.with_repeat_id("0"))
        }
    }
}
