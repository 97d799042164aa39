//! Reconstruction of multi-valued organisation relations.
//!
//! [`MultiRowTreeReader`] turns the rows of one relation table into child
//! records, one child per row, in backend row order. [`OrganisationHierarchy`]
//! walks parent relations transitively with a worklist and a visited set.

use std::collections::HashSet;
use std::sync::Arc;

use legacy_mediator_sdk::DataGroup;
use tracing::{debug, warn};

use crate::config::RelationTables;
use crate::domain::convert::{ChildConverter, convert_parent, convert_predecessor};
use crate::domain::error::{DomainError, parse_id};
use crate::domain::ports::{Row, SelectQuery, SqlExecutor};

/// Organisation relations that may hold several rows per organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    ParentOrganisation,
    PredecessorOrganisation,
}

impl Relation {
    /// Relations attached to every organisation record, in attach order.
    pub const ALL: [Self; 2] = [Self::ParentOrganisation, Self::PredecessorOrganisation];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "parentOrganisation" => Some(Self::ParentOrganisation),
            "predecessorOrganisation" => Some(Self::PredecessorOrganisation),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ParentOrganisation => "parentOrganisation",
            Self::PredecessorOrganisation => "predecessorOrganisation",
        }
    }

    /// Column holding the id of the related organisation.
    #[must_use]
    pub fn target_column(self) -> &'static str {
        match self {
            Self::ParentOrganisation => "organisation_parent_id",
            Self::PredecessorOrganisation => "organisation_predecessor_id",
        }
    }

    fn converter(self) -> ChildConverter {
        match self {
            Self::ParentOrganisation => convert_parent,
            Self::PredecessorOrganisation => convert_predecessor,
        }
    }
}

pub struct MultiRowTreeReader {
    executor: Arc<dyn SqlExecutor>,
    tables: RelationTables,
}

impl MultiRowTreeReader {
    #[must_use]
    pub fn new(executor: Arc<dyn SqlExecutor>, tables: RelationTables) -> Self {
        Self { executor, tables }
    }

    fn table(&self, relation: Relation) -> &str {
        match relation {
            Relation::ParentOrganisation => &self.tables.parent,
            Relation::PredecessorOrganisation => &self.tables.predecessor,
        }
    }

    /// Fetch the raw relation rows of one organisation.
    ///
    /// # Errors
    /// Returns `DomainError::Backend` when the query fails.
    pub async fn rows(
        &self,
        relation: Relation,
        organisation_id: i64,
    ) -> Result<Vec<Row>, DomainError> {
        let query = SelectQuery::new(self.table(relation))
            .filter(self.tables.foreign_key.as_str(), organisation_id);
        self.executor
            .read_rows(&query)
            .await
            .map_err(DomainError::backend)
    }

    /// Read one relation of an organisation as converted child records.
    ///
    /// # Errors
    /// Returns `DomainError::Backend` when the query fails and
    /// `DomainError::Validation` when a row cannot be converted.
    pub async fn read(
        &self,
        relation: Relation,
        organisation_id: i64,
    ) -> Result<Vec<DataGroup>, DomainError> {
        let rows = self.rows(relation, organisation_id).await?;
        debug!(
            relation = relation.name(),
            organisation_id,
            rows = rows.len(),
            "read organisation relation"
        );
        let convert = relation.converter();
        rows.iter().map(convert).collect()
    }

    /// Read a relation addressed by name and string id.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidIdentifier` for a non-integer id and
    /// `DomainError::NotImplemented` for an unknown relation name, both
    /// before any query runs.
    pub async fn read_named(
        &self,
        relation_name: &str,
        organisation_id: &str,
    ) -> Result<Vec<DataGroup>, DomainError> {
        let organisation_id = parse_id(organisation_id)?;
        let relation = Relation::from_name(relation_name)
            .ok_or_else(|| DomainError::not_implemented("read relation", relation_name))?;
        self.read(relation, organisation_id).await
    }

    /// Attach parents and then predecessors to an organisation record.
    ///
    /// # Errors
    /// Propagates any failure of [`Self::read`].
    pub async fn attach_relations(
        &self,
        record: &mut DataGroup,
        organisation_id: i64,
    ) -> Result<(), DomainError> {
        for relation in Relation::ALL {
            let children = self.read(relation, organisation_id).await?;
            record.add_repeating_groups(children);
        }
        Ok(())
    }
}

/// Transitive walk over parent relations.
///
/// A revisited id is logged and skipped. A chain longer than `max_depth`
/// levels is a validation failure.
pub struct OrganisationHierarchy {
    reader: Arc<MultiRowTreeReader>,
    max_depth: usize,
}

impl OrganisationHierarchy {
    #[must_use]
    pub fn new(reader: Arc<MultiRowTreeReader>, max_depth: usize) -> Self {
        Self { reader, max_depth }
    }

    /// All ancestors of an organisation, nearest level first.
    ///
    /// # Errors
    /// Returns `DomainError::Validation` when the hierarchy is deeper than the
    /// configured limit and `DomainError::Backend` when a query fails.
    pub async fn ancestors(&self, organisation_id: i64) -> Result<Vec<i64>, DomainError> {
        let mut visited = HashSet::from([organisation_id]);
        let mut ancestors = Vec::new();
        let mut frontier = vec![organisation_id];
        let mut depth = 0_usize;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in frontier {
                for parent_id in self.parent_ids(id).await? {
                    if visited.insert(parent_id) {
                        next.push(parent_id);
                    } else {
                        warn!(
                            organisation_id,
                            from = id,
                            revisited = parent_id,
                            "organisation hierarchy revisits an id, skipping"
                        );
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            depth += 1;
            if depth > self.max_depth {
                return Err(DomainError::validation(format!(
                    "hierarchy above organisation {organisation_id} exceeds {} levels",
                    self.max_depth
                )));
            }
            ancestors.extend_from_slice(&next);
            frontier = next;
        }

        Ok(ancestors)
    }

    async fn parent_ids(&self, organisation_id: i64) -> Result<Vec<i64>, DomainError> {
        let relation = Relation::ParentOrganisation;
        let rows = self.reader.rows(relation, organisation_id).await?;
        rows.iter()
            .map(|row| {
                row.int(relation.target_column()).ok_or_else(|| {
                    DomainError::validation(format!(
                        "parent row of organisation {organisation_id} has no integer {}",
                        relation.target_column()
                    ))
                })
            })
            .collect()
    }
}
