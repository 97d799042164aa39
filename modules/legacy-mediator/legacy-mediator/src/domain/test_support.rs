//! Recording in-memory executor for domain tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::domain::ports::{Row, SelectQuery, SqlExecutor};
use crate::domain::statement::{SqlStatement, SqlValue};

/// Serves canned rows per table, filtered by query conditions and windowed
/// by the query delimiter, and records every call it receives.
#[derive(Default)]
pub struct SpyExecutor {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    queries: Mutex<Vec<SelectQuery>>,
    batches: Mutex<Vec<Vec<SqlStatement>>>,
    read_failure: Mutex<Option<String>>,
    batch_failure: Mutex<Option<String>>,
}

impl SpyExecutor {
    pub fn add_rows(&self, table: &str, rows: Vec<Row>) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .extend(rows);
    }

    pub fn fail_reads(&self, message: &str) {
        *self.read_failure.lock().unwrap() = Some(message.to_owned());
    }

    pub fn fail_batches(&self, message: &str) {
        *self.batch_failure.lock().unwrap() = Some(message.to_owned());
    }

    pub fn queries(&self) -> Vec<SelectQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<Vec<SqlStatement>> {
        self.batches.lock().unwrap().clone()
    }

    fn select(&self, query: &SelectQuery) -> anyhow::Result<Vec<Row>> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(message) = self.read_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }

        let tables = self.tables.lock().unwrap();
        let matching = tables
            .get(&query.table)
            .into_iter()
            .flatten()
            .filter(|row| {
                query
                    .conditions
                    .iter()
                    .all(|(column, value)| matches(row, column, value))
            })
            .cloned();

        let offset = usize::try_from(query.delimiter.offset.unwrap_or(0).max(0)).unwrap();
        let windowed = matching.skip(offset);
        Ok(match query.delimiter.limit {
            Some(limit) => windowed.take(usize::try_from(limit.max(0)).unwrap()).collect(),
            None => windowed.collect(),
        })
    }
}

fn matches(row: &Row, column: &str, value: &SqlValue) -> bool {
    match value {
        SqlValue::Null(_) => row.text(column).is_none(),
        SqlValue::Text(text) => row.text(column).as_deref() == Some(text.as_str()),
        SqlValue::Int(int) => row.int(column) == Some(*int),
        SqlValue::Bool(flag) => row.flag(column) == *flag,
        SqlValue::Date(date) => row.text(column) == Some(date.to_string()),
    }
}

#[async_trait]
impl SqlExecutor for SpyExecutor {
    async fn read_rows(&self, query: &SelectQuery) -> anyhow::Result<Vec<Row>> {
        self.select(query)
    }

    async fn count_rows(&self, query: &SelectQuery) -> anyhow::Result<u64> {
        Ok(u64::try_from(self.select(query)?.len())?)
    }

    async fn execute_batch(&self, statements: Vec<SqlStatement>) -> anyhow::Result<u64> {
        if let Some(message) = self.batch_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        let affected = u64::try_from(statements.len())?;
        self.batches.lock().unwrap().push(statements);
        Ok(affected)
    }
}
