//! Closed dispatch table from record-type strings to legacy storage bindings.
//!
//! Every supported type is bound once, at construction, to the view it is
//! read from, the column holding its id and the converter for its rows.
//! Anything else resolves to [`Resolution::Unsupported`].

use crate::config::MediatorConfig;
use crate::domain::convert::{RowConverter, convert_organisation, convert_user};
use crate::domain::error::DomainError;

pub const ORGANISATION: &str = "organisation";
pub const ROOT_ORGANISATION: &str = "rootOrganisation";
pub const TOP_ORGANISATION: &str = "topOrganisation";
pub const SUB_ORGANISATION: &str = "subOrganisation";
pub const USER: &str = "user";

/// Record families sharing read and update behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFamily {
    /// Organisation variants: parents and predecessors attached, updatable.
    Organisation,
    /// Users: roles attached, read-only.
    User,
}

/// Storage binding of one supported record type.
#[derive(Debug, Clone)]
pub struct TypeBinding {
    pub record_type: &'static str,
    pub family: RecordFamily,
    pub view: String,
    pub id_column: &'static str,
    pub converter: RowConverter,
}

impl TypeBinding {
    #[must_use]
    pub fn is_organisation(&self) -> bool {
        self.family == RecordFamily::Organisation
    }
}

/// Outcome of resolving a record-type string.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Bound(&'a TypeBinding),
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    bindings: Vec<TypeBinding>,
}

impl TypeRegistry {
    #[must_use]
    pub fn from_config(config: &MediatorConfig) -> Self {
        let views = &config.views;
        let organisation = |record_type, view: &str| TypeBinding {
            record_type,
            family: RecordFamily::Organisation,
            view: view.to_owned(),
            id_column: "id",
            converter: convert_organisation,
        };

        let bindings = vec![
            organisation(ORGANISATION, &views.organisation),
            organisation(ROOT_ORGANISATION, &views.root_organisation),
            organisation(TOP_ORGANISATION, &views.top_organisation),
            organisation(SUB_ORGANISATION, &views.sub_organisation),
            TypeBinding {
                record_type: USER,
                family: RecordFamily::User,
                view: config.users.user.clone(),
                id_column: "db_id",
                converter: convert_user,
            },
        ];
        Self { bindings }
    }

    #[must_use]
    pub fn resolve(&self, record_type: &str) -> Resolution<'_> {
        self.bindings
            .iter()
            .find(|binding| binding.record_type == record_type)
            .map_or(Resolution::Unsupported, Resolution::Bound)
    }

    /// Resolve a type that `operation` must support.
    ///
    /// # Errors
    /// Returns `DomainError::NotImplemented` naming the operation and type.
    pub fn require(
        &self,
        operation: &'static str,
        record_type: &str,
    ) -> Result<&TypeBinding, DomainError> {
        match self.resolve(record_type) {
            Resolution::Bound(binding) => Ok(binding),
            Resolution::Unsupported => Err(DomainError::not_implemented(operation, record_type)),
        }
    }

    /// Resolve a type that must belong to the organisation family.
    ///
    /// # Errors
    /// Returns `DomainError::NotImplemented` for any other type.
    pub fn require_organisation(
        &self,
        operation: &'static str,
        record_type: &str,
    ) -> Result<&TypeBinding, DomainError> {
        let binding = self.require(operation, record_type)?;
        if binding.is_organisation() {
            Ok(binding)
        } else {
            Err(DomainError::not_implemented(operation, record_type))
        }
    }
}
