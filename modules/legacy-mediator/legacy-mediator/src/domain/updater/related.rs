//! Related-table policies of an organisation update.
//!
//! Each policy compares what is stored for one organisation with what the
//! incoming record carries and returns the statements reconciling the two.
//! An unchanged child produces no statement.

use legacy_mediator_sdk::DataGroup;

use crate::domain::convert::ADDRESS_COLUMNS;
use crate::domain::ports::Row;
use crate::domain::statement::{Columns, DbStatement, SqlValue, columns};

pub const ORGANISATION_ID: &str = "organisation_id";

/// Locale of the single alternative name an organisation may carry.
pub const ALTERNATIVE_NAME_LOCALE: &str = "en";

fn keyed(organisation_id: i64) -> Columns {
    columns([(ORGANISATION_ID, organisation_id)])
}

#[must_use]
pub fn alternative_name(
    table: &str,
    organisation_id: i64,
    current: Option<&Row>,
    desired: Option<&str>,
) -> Option<DbStatement> {
    let key = columns([
        (ORGANISATION_ID, SqlValue::from(organisation_id)),
        ("locale", SqlValue::from(ALTERNATIVE_NAME_LOCALE)),
    ]);

    match (current, desired) {
        (None, None) => None,
        (Some(_), None) => Some(DbStatement::delete(table, key)),
        (None, Some(name)) => Some(DbStatement::insert(
            table,
            columns([
                (ORGANISATION_ID, SqlValue::from(organisation_id)),
                ("organisation_name", SqlValue::from(name)),
                ("locale", SqlValue::from(ALTERNATIVE_NAME_LOCALE)),
            ]),
        )),
        (Some(row), Some(name)) => (row.text("organisation_name").as_deref() != Some(name))
            .then(|| DbStatement::update(table, columns([("organisation_name", name)]), key)),
    }
}

/// Postal address of an organisation, one optional value per address column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    fields: [Option<String>; ADDRESS_COLUMNS.len()],
}

impl Address {
    /// Read the `address` group of a record; `None` when absent or empty.
    #[must_use]
    pub fn from_record(record: &DataGroup) -> Option<Self> {
        let group = record.first_group("address")?;
        let fields =
            ADDRESS_COLUMNS.map(|(_, name)| group.first_atomic_value(name).map(str::to_owned));
        fields.iter().any(Option::is_some).then_some(Self { fields })
    }

    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        Self {
            fields: ADDRESS_COLUMNS.map(|(column, _)| row.text(column)),
        }
    }

    fn columns(&self) -> Columns {
        ADDRESS_COLUMNS
            .iter()
            .zip(&self.fields)
            .map(|((column, _), value)| ((*column).to_owned(), SqlValue::from(value.clone())))
            .collect()
    }
}

#[must_use]
pub fn address(
    table: &str,
    organisation_id: i64,
    current: Option<&Row>,
    desired: Option<&Address>,
) -> Option<DbStatement> {
    match (current, desired) {
        (None, None) => None,
        (Some(_), None) => Some(DbStatement::delete(table, keyed(organisation_id))),
        (None, Some(address)) => {
            let mut values = keyed(organisation_id);
            values.extend(address.columns());
            Some(DbStatement::insert(table, values))
        }
        (Some(row), Some(address)) => (Address::from_row(row) != *address)
            .then(|| DbStatement::update(table, address.columns(), keyed(organisation_id))),
    }
}

fn link_key(organisation_id: i64, link_column: &str, linked_id: i64) -> Columns {
    columns([(ORGANISATION_ID, organisation_id), (link_column, linked_id)])
}

/// Deletes for removed parents followed by inserts for added ones.
#[must_use]
pub fn parents(
    table: &str,
    organisation_id: i64,
    current: &[i64],
    desired: &[i64],
) -> Vec<DbStatement> {
    const LINK: &str = "organisation_parent_id";

    let removed = current
        .iter()
        .filter(|&&id| !desired.contains(&id))
        .map(|&id| DbStatement::delete(table, link_key(organisation_id, LINK, id)));

    let mut seen = current.to_vec();
    let mut added = Vec::new();
    for &id in desired {
        if !seen.contains(&id) {
            seen.push(id);
            added.push(DbStatement::insert(table, link_key(organisation_id, LINK, id)));
        }
    }

    removed.chain(added).collect()
}

/// One predecessor link with its optional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predecessor {
    pub id: i64,
    pub description: Option<String>,
}

/// Deletes for removed predecessors, inserts for added ones, and updates
/// for kept predecessors whose description changed.
#[must_use]
pub fn predecessors(
    table: &str,
    organisation_id: i64,
    current: &[Predecessor],
    desired: &[Predecessor],
) -> Vec<DbStatement> {
    const LINK: &str = "organisation_predecessor_id";

    let mut statements: Vec<DbStatement> = current
        .iter()
        .filter(|stored| !desired.iter().any(|d| d.id == stored.id))
        .map(|stored| DbStatement::delete(table, link_key(organisation_id, LINK, stored.id)))
        .collect();

    let mut handled: Vec<i64> = Vec::new();
    for wanted in desired {
        if handled.contains(&wanted.id) {
            continue;
        }
        handled.push(wanted.id);

        match current.iter().find(|stored| stored.id == wanted.id) {
            None => {
                let mut values = link_key(organisation_id, LINK, wanted.id);
                values.push(("description".to_owned(), wanted.description.clone().into()));
                statements.push(DbStatement::insert(table, values));
            }
            Some(stored) if stored.description != wanted.description => {
                statements.push(DbStatement::update(
                    table,
                    columns([("description", wanted.description.clone())]),
                    link_key(organisation_id, LINK, wanted.id),
                ));
            }
            Some(_) => {}
        }
    }

    statements
}
