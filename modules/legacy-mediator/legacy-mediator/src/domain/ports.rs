//! Ports the domain needs from the relational execution facility.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::delimiter::Delimiter;
use crate::domain::statement::{Columns, SqlStatement, SqlValue};

/// One fetched row: an immutable column name to value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    #[must_use]
    pub fn new(columns: BTreeMap<String, Value>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Render a column as text; `None` for SQL NULL or a missing column.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<String> {
        match self.columns.get(column)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Render a column as an integer when it holds one, as a number or as text.
    #[must_use]
    pub fn int(&self, column: &str) -> Option<i64> {
        match self.columns.get(column)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret a column as a boolean flag; NULL and missing read as `false`.
    #[must_use]
    pub fn flag(&self, column: &str) -> bool {
        match self.columns.get(column) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
            Some(Value::String(s)) => {
                matches!(s.to_ascii_lowercase().as_str(), "t" | "true" | "1" | "yes")
            }
            _ => false,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Read-side query descriptor: `SELECT * FROM table WHERE c1 = ? AND ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    pub conditions: Columns,
    pub order_by: Option<String>,
    pub delimiter: Delimiter,
}

impl SelectQuery {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            order_by: None,
            delimiter: Delimiter::unbounded(),
        }
    }

    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    #[must_use]
    pub fn delimited(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// The relational execution facility.
///
/// Implementations run each call against the database and report failures
/// unmodified; the domain performs no retries.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run a query and return every row, in backend order.
    async fn read_rows(&self, query: &SelectQuery) -> anyhow::Result<Vec<Row>>;

    /// Count the rows the same (bounded) query would return.
    async fn count_rows(&self, query: &SelectQuery) -> anyhow::Result<u64>;

    /// Execute statements atomically, returning the total affected row count.
    async fn execute_batch(&self, statements: Vec<SqlStatement>) -> anyhow::Result<u64>;
}
