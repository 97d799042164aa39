//! Organisation update: one record in, one atomic statement batch out.

use std::sync::Arc;

use chrono::NaiveDate;
use legacy_mediator_sdk::DataGroup;
use tracing::{debug, info, instrument};

use crate::config::OrganisationTables;
use crate::domain::convert::ORGANISATION_LINK;
use crate::domain::error::{DomainError, parse_id};
use crate::domain::ports::{Row, SelectQuery, SqlExecutor};
use crate::domain::statement::{DbStatement, SqlStatement, SqlValue, synthesize};
use crate::domain::tree_reader::OrganisationHierarchy;

pub mod related;

use related::{ALTERNATIVE_NAME_LOCALE, Address, ORGANISATION_ID, Predecessor};

const DEFAULT_NAME_LOCALE: &str = "sv";

pub struct OrganisationUpdater {
    executor: Arc<dyn SqlExecutor>,
    tables: OrganisationTables,
    hierarchy: OrganisationHierarchy,
}

impl OrganisationUpdater {
    #[must_use]
    pub fn new(
        executor: Arc<dyn SqlExecutor>,
        tables: OrganisationTables,
        hierarchy: OrganisationHierarchy,
    ) -> Self {
        Self {
            executor,
            tables,
            hierarchy,
        }
    }

    /// Write an organisation record back to the legacy tables.
    ///
    /// Returns the number of affected rows.
    ///
    /// # Errors
    /// - `DomainError::Validation` when the record is malformed, names
    ///   another id, or would make the organisation its own ancestor
    /// - `DomainError::InvalidIdentifier` when a linked id is not an integer
    /// - `DomainError::Backend` when reading current state or executing the
    ///   batch fails
    #[instrument(skip(self, record), fields(organisation.id = organisation_id))]
    pub async fn update(
        &self,
        organisation_id: i64,
        record: &DataGroup,
    ) -> Result<u64, DomainError> {
        check_record_id(organisation_id, record)?;

        let desired_parents = linked_ids(record, "parentOrganisation")?;
        self.reject_cycles(organisation_id, &desired_parents).await?;
        let desired_predecessors = predecessor_links(record)?;

        let mut statements = vec![main_row(&self.tables.organisation, organisation_id, record)?];
        statements.extend(self.alternative_name(organisation_id, record).await?);
        statements.extend(self.address(organisation_id, record).await?);

        let current_parents = self
            .related_rows(&self.tables.parent, organisation_id)
            .await?
            .iter()
            .map(|row| int_column(row, "organisation_parent_id"))
            .collect::<Result<Vec<_>, _>>()?;
        statements.extend(related::parents(
            &self.tables.parent,
            organisation_id,
            &current_parents,
            &desired_parents,
        ));

        let current_predecessors = self
            .related_rows(&self.tables.predecessor, organisation_id)
            .await?
            .iter()
            .map(|row| {
                Ok(Predecessor {
                    id: int_column(row, "organisation_predecessor_id")?,
                    description: row.text("description"),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        statements.extend(related::predecessors(
            &self.tables.predecessor,
            organisation_id,
            &current_predecessors,
            &desired_predecessors,
        ));

        let batch: Vec<SqlStatement> = statements.into_iter().map(synthesize).collect();
        debug!(db.statement.count = batch.len(), "executing organisation update batch");

        let affected = self
            .executor
            .execute_batch(batch)
            .await
            .map_err(DomainError::backend)?;
        info!(affected, "organisation updated");
        Ok(affected)
    }

    async fn reject_cycles(
        &self,
        organisation_id: i64,
        parents: &[i64],
    ) -> Result<(), DomainError> {
        for &parent_id in parents {
            if parent_id == organisation_id
                || self.hierarchy.ancestors(parent_id).await?.contains(&organisation_id)
            {
                return Err(DomainError::validation(format!(
                    "organisation {organisation_id} cannot have {parent_id} as parent, \
                     it would become its own ancestor"
                )));
            }
        }
        Ok(())
    }

    async fn alternative_name(
        &self,
        organisation_id: i64,
        record: &DataGroup,
    ) -> Result<Option<DbStatement>, DomainError> {
        let table = &self.tables.alternative_name;
        let query = SelectQuery::new(table.as_str())
            .filter(ORGANISATION_ID, organisation_id)
            .filter("locale", ALTERNATIVE_NAME_LOCALE);
        let current = self.read(&query).await?;
        let desired = record
            .first_group("alternativeName")
            .and_then(|group| group.first_atomic_value("organisationName"));
        Ok(related::alternative_name(table, organisation_id, current.first(), desired))
    }

    async fn address(
        &self,
        organisation_id: i64,
        record: &DataGroup,
    ) -> Result<Option<DbStatement>, DomainError> {
        let table = &self.tables.address;
        let current = self.related_rows(table, organisation_id).await?;
        let desired = Address::from_record(record);
        Ok(related::address(table, organisation_id, current.first(), desired.as_ref()))
    }

    async fn related_rows(
        &self,
        table: &str,
        organisation_id: i64,
    ) -> Result<Vec<Row>, DomainError> {
        self.read(&SelectQuery::new(table).filter(ORGANISATION_ID, organisation_id))
            .await
    }

    async fn read(&self, query: &SelectQuery) -> Result<Vec<Row>, DomainError> {
        self.executor
            .read_rows(query)
            .await
            .map_err(DomainError::backend)
    }
}

fn check_record_id(organisation_id: i64, record: &DataGroup) -> Result<(), DomainError> {
    let Some(record_id) = record
        .first_group("recordInfo")
        .and_then(|info| info.first_atomic_value("id"))
    else {
        return Ok(());
    };
    if record_id.parse::<i64>() == Ok(organisation_id) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "record id '{record_id}' does not match organisation {organisation_id}"
        )))
    }
}

fn int_column(row: &Row, column: &str) -> Result<i64, DomainError> {
    row.int(column)
        .ok_or_else(|| DomainError::validation(format!("stored row has no integer {column}")))
}

fn link_target(group: &DataGroup) -> Result<i64, DomainError> {
    let id = group
        .first_group(ORGANISATION_LINK)
        .and_then(DataGroup::linked_record_id)
        .ok_or_else(|| {
            DomainError::validation(format!(
                "{} has no {ORGANISATION_LINK}",
                group.name_in_data()
            ))
        })?;
    parse_id(id)
}

fn linked_ids(record: &DataGroup, name: &str) -> Result<Vec<i64>, DomainError> {
    record.groups_named(name).map(link_target).collect()
}

fn predecessor_links(record: &DataGroup) -> Result<Vec<Predecessor>, DomainError> {
    record
        .groups_named("predecessorOrganisation")
        .map(|group| {
            Ok(Predecessor {
                id: link_target(group)?,
                description: group.first_atomic_value("internalNote").map(str::to_owned),
            })
        })
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DomainError::validation(format!("closedDate must be formatted YYYY-MM-DD, got '{raw}'"))
    })
}

fn main_row(
    table: &str,
    organisation_id: i64,
    record: &DataGroup,
) -> Result<DbStatement, DomainError> {
    let name = record
        .first_group("name")
        .ok_or_else(|| DomainError::validation("organisation record has no name"))?;
    let organisation_name = name
        .first_atomic_value("organisationName")
        .ok_or_else(|| DomainError::validation("organisation name has no organisationName"))?;
    let locale = name.first_atomic_value("language").unwrap_or(DEFAULT_NAME_LOCALE);

    let closed_date = record
        .first_atomic_value("closedDate")
        .map(parse_date)
        .transpose()?;
    let not_eligible = record
        .first_group("recordInfo")
        .and_then(|info| info.first_atomic_value("selectable"))
        == Some("no");
    let optional = |name: &str| SqlValue::from(record.first_atomic_value(name));

    let values = vec![
        ("organisation_name".to_owned(), SqlValue::from(organisation_name)),
        ("organisation_name_locale".to_owned(), SqlValue::from(locale)),
        ("closed_date".to_owned(), SqlValue::from(closed_date)),
        ("organisation_code".to_owned(), optional("organisationCode")),
        ("orgnumber".to_owned(), optional("organisationNumber")),
        ("organisation_homepage".to_owned(), optional("URL")),
        ("organisation_type".to_owned(), optional("organisationType")),
        ("not_eligible".to_owned(), SqlValue::Bool(not_eligible)),
    ];
    Ok(DbStatement::update(
        table,
        values,
        vec![(ORGANISATION_ID.to_owned(), SqlValue::Int(organisation_id))],
    ))
}
