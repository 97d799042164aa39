//! Derivation of a user's access role from legacy group rows.
//!
//! Two tiers: any `systemAdmin` row yields the system admin role and
//! discards domain rows; otherwise every `domainAdmin` row contributes its
//! domain, in row order and without deduplication. Anything else yields no
//! role.

use crate::domain::ports::Row;

pub const SYSTEM_ADMIN: &str = "systemAdmin";
pub const DOMAIN_ADMIN: &str = "domainAdmin";

/// One legacy permission grouping a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub domain: Option<String>,
    pub group_type: Option<String>,
}

impl GroupRow {
    #[must_use]
    pub fn new(group_type: impl Into<String>, domain: Option<&str>) -> Self {
        Self {
            domain: domain.map(str::to_owned),
            group_type: Some(group_type.into()),
        }
    }
}

impl From<&Row> for GroupRow {
    fn from(row: &Row) -> Self {
        Self {
            domain: row.text("domain"),
            group_type: row.text("group_type"),
        }
    }
}

/// The single role derived for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    SystemAdmin,
    DomainAdmin { domains: Vec<String> },
}

/// Strategy deriving at most one role from a user's group rows.
pub trait RoleResolver: Send + Sync {
    fn resolve(&self, rows: &[GroupRow]) -> Option<Role>;
}

/// The two-tier priority resolver used for legacy users.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityRoleResolver;

impl RoleResolver for PriorityRoleResolver {
    fn resolve(&self, rows: &[GroupRow]) -> Option<Role> {
        if rows
            .iter()
            .any(|row| row.group_type.as_deref() == Some(SYSTEM_ADMIN))
        {
            return Some(Role::SystemAdmin);
        }

        // A domainAdmin row without a domain has nothing to contribute.
        let domains: Vec<String> = rows
            .iter()
            .filter(|row| row.group_type.as_deref() == Some(DOMAIN_ADMIN))
            .filter_map(|row| row.domain.clone())
            .collect();

        (!domains.is_empty()).then_some(Role::DomainAdmin { domains })
    }
}
