//! Configuration for the legacy mediator module.
//!
//! Every field has a default matching the legacy schema, so an absent
//! `legacy_mediator` section yields a working configuration.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};

/// Section of the application configuration holding this module's settings.
pub const CONFIG_SECTION: &str = "legacy_mediator";

/// Prefix of environment variables overriding file configuration.
pub const ENV_PREFIX: &str = "LEGACY_MEDIATOR__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediatorConfig {
    pub views: OrganisationViews,
    pub relations: RelationTables,
    pub tables: OrganisationTables,
    pub users: UserTables,
    /// Stamped into `recordInfo/dataDivider` of every converted record.
    pub data_divider: String,
    /// Maximum number of parent levels walked when resolving ancestors.
    pub max_hierarchy_depth: usize,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            views: OrganisationViews::default(),
            relations: RelationTables::default(),
            tables: OrganisationTables::default(),
            users: UserTables::default(),
            data_divider: "diva".to_owned(),
            max_hierarchy_depth: 64,
        }
    }
}

/// Pre-filtered read views, one per organisation record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganisationViews {
    pub organisation: String,
    pub root_organisation: String,
    pub top_organisation: String,
    pub sub_organisation: String,
}

impl Default for OrganisationViews {
    fn default() -> Self {
        Self {
            organisation: "organisationview".to_owned(),
            root_organisation: "rootorganisationview".to_owned(),
            top_organisation: "toporganisationview".to_owned(),
            sub_organisation: "suborganisationview".to_owned(),
        }
    }
}

/// Multi-valued organisation relations and the column keying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelationTables {
    pub parent: String,
    pub predecessor: String,
    pub foreign_key: String,
}

impl Default for RelationTables {
    fn default() -> Self {
        Self {
            parent: "divaorganisationparent".to_owned(),
            predecessor: "divaorganisationpredecessor".to_owned(),
            foreign_key: "organisation_id".to_owned(),
        }
    }
}

/// Writable tables touched by an organisation update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganisationTables {
    pub organisation: String,
    pub alternative_name: String,
    pub address: String,
    pub parent: String,
    pub predecessor: String,
}

impl Default for OrganisationTables {
    fn default() -> Self {
        Self {
            organisation: "organisation".to_owned(),
            alternative_name: "organisation_name".to_owned(),
            address: "organisation_address".to_owned(),
            parent: "organisation_parent".to_owned(),
            predecessor: "organisation_predecessor".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserTables {
    pub user: String,
    pub groups: String,
}

impl Default for UserTables {
    fn default() -> Self {
        Self {
            user: "users".to_owned(),
            groups: "groupsforuser".to_owned(),
        }
    }
}

impl MediatorConfig {
    /// Extract the module section from an application figment.
    ///
    /// A missing section yields the defaults.
    ///
    /// # Errors
    /// Returns a figment error when the section exists but does not deserialize.
    pub fn from_figment(figment: &Figment) -> Result<Self, Box<figment::Error>> {
        if !figment.contains(CONFIG_SECTION) {
            return Ok(Self::default());
        }
        figment.extract_inner(CONFIG_SECTION).map_err(Box::new)
    }

    /// Load from a YAML file, with `LEGACY_MEDIATOR__*` environment overrides.
    ///
    /// Nested keys use `__` as separator, e.g. `LEGACY_MEDIATOR__USERS__GROUPS`.
    ///
    /// # Errors
    /// Returns a figment error when the merged configuration does not deserialize.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let figment = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .split("__")
                    .map(|key| format!("{CONFIG_SECTION}.{key}").into()),
            );
        Self::from_figment(&figment)
    }
}
