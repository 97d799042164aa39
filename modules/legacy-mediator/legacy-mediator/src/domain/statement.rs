//! Abstract DML statements and their synthesis into SQL text.
//!
//! A [`DbStatement`] names a table, an operation and two ordered column
//! mappings. [`synthesize`] turns it into SQL text with `?` placeholders and
//! a parameter list aligned positionally with those placeholders: columns
//! appear in the text in mapping order, and their values appear in the
//! parameter list in the same order.

use chrono::NaiveDate;

/// Column type carried by a NULL so it binds with the column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Int,
    Bool,
    Date,
}

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null(SqlType),
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Rust types with a fixed SQL column type.
pub trait Typed {
    const SQL_TYPE: SqlType;
}

impl Typed for &str {
    const SQL_TYPE: SqlType = SqlType::Text;
}

impl Typed for String {
    const SQL_TYPE: SqlType = SqlType::Text;
}

impl Typed for i64 {
    const SQL_TYPE: SqlType = SqlType::Int;
}

impl Typed for bool {
    const SQL_TYPE: SqlType = SqlType::Bool;
}

impl Typed for NaiveDate {
    const SQL_TYPE: SqlType = SqlType::Date;
}

impl<T: Into<SqlValue> + Typed> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null(T::SQL_TYPE), Into::into)
    }
}

/// Ordered column to value mapping.
pub type Columns = Vec<(String, SqlValue)>;

/// DML operation of a [`DbStatement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

/// Abstract description of one mutation of the relational store.
///
/// For `Delete`, `values` is empty; for `Insert`, `conditions` is empty.
/// A delete without conditions is a caller error and is not special-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStatement {
    pub table_name: String,
    pub operation: Operation,
    pub values: Columns,
    pub conditions: Columns,
}

impl DbStatement {
    #[must_use]
    pub fn insert(table_name: impl Into<String>, values: Columns) -> Self {
        Self {
            table_name: table_name.into(),
            operation: Operation::Insert,
            values,
            conditions: Vec::new(),
        }
    }

    #[must_use]
    pub fn update(table_name: impl Into<String>, values: Columns, conditions: Columns) -> Self {
        Self {
            table_name: table_name.into(),
            operation: Operation::Update,
            values,
            conditions,
        }
    }

    #[must_use]
    pub fn delete(table_name: impl Into<String>, conditions: Columns) -> Self {
        Self {
            table_name: table_name.into(),
            operation: Operation::Delete,
            values: Vec::new(),
            conditions,
        }
    }
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub parameters: Vec<SqlValue>,
}

/// Build an ordered column mapping from `(column, value)` pairs.
#[must_use]
pub fn columns<I, K, V>(pairs: I) -> Columns
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<SqlValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Synthesize SQL text and parameters for a statement.
#[must_use]
pub fn synthesize(statement: DbStatement) -> SqlStatement {
    let DbStatement {
        table_name,
        operation,
        values,
        conditions,
    } = statement;

    match operation {
        Operation::Insert => {
            let (names, parameters): (Vec<_>, Vec<_>) = values.into_iter().unzip();
            let placeholders = vec!["?"; names.len()].join(", ");
            SqlStatement {
                sql: format!(
                    "INSERT INTO {table_name}({}) VALUES({placeholders})",
                    names.join(", ")
                ),
                parameters,
            }
        }
        Operation::Update => {
            let mut sql = format!("UPDATE {table_name} SET ");
            let mut parameters = Vec::with_capacity(values.len() + conditions.len());
            sql.push_str(&assignments(values, ", ", &mut parameters));
            if !conditions.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&assignments(conditions, " AND ", &mut parameters));
            }
            SqlStatement { sql, parameters }
        }
        Operation::Delete => {
            let mut parameters = Vec::with_capacity(conditions.len());
            let predicate = assignments(conditions, " AND ", &mut parameters);
            SqlStatement {
                sql: format!("DELETE FROM {table_name} WHERE {predicate}"),
                parameters,
            }
        }
    }
}

fn assignments(pairs: Columns, separator: &str, parameters: &mut Vec<SqlValue>) -> String {
    pairs
        .into_iter()
        .map(|(column, value)| {
            parameters.push(value);
            format!("{column} = ?")
        })
        .collect::<Vec<_>>()
        .join(separator)
}
