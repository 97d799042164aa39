use anyhow::Context;
use async_trait::async_trait;
use sea_orm::sea_query::{
    Alias, Asterisk, Expr, Func, IntoTableRef, Order, Query, SelectStatement, TableRef,
};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, JsonValue, Statement,
    TransactionTrait, Value,
};
use tracing::{debug, instrument};

use crate::domain::ports::{Row, SelectQuery, SqlExecutor};
use crate::domain::statement::{SqlStatement, SqlType, SqlValue};

const COUNT_COLUMN: &str = "total_count";

/// `SqlExecutor` over a `SeaORM` connection.
///
/// Select descriptors are rendered with `sea-query` for the connected
/// backend. Synthesized DML is sent as is, with `?` placeholders rewritten
/// to `$n` on `PostgreSQL`.
pub struct SeaOrmExecutor {
    db: DatabaseConnection,
}

impl SeaOrmExecutor {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }
}

/// Table reference for a possibly schema-qualified name such as `public.user`.
fn table_ref(name: &str) -> TableRef {
    match name.split_once('.') {
        Some((schema, table)) => (Alias::new(schema), Alias::new(table)).into_table_ref(),
        None => Alias::new(name).into_table_ref(),
    }
}

fn bind(value: SqlValue) -> Value {
    match value {
        SqlValue::Null(SqlType::Text) => Value::String(None),
        SqlValue::Null(SqlType::Int) => Value::BigInt(None),
        SqlValue::Null(SqlType::Bool) => Value::Bool(None),
        SqlValue::Null(SqlType::Date) => Value::ChronoDate(None),
        SqlValue::Text(text) => text.into(),
        SqlValue::Int(int) => int.into(),
        SqlValue::Bool(flag) => flag.into(),
        SqlValue::Date(date) => date.into(),
    }
}

pub(crate) fn select_statement(query: &SelectQuery) -> SelectStatement {
    let mut select = Query::select();
    select.column(Asterisk).from(table_ref(&query.table));

    for (column, value) in &query.conditions {
        let column = Expr::col(Alias::new(column.as_str()));
        match value {
            SqlValue::Null(_) => select.and_where(column.is_null()),
            other => select.and_where(column.eq(bind(other.clone()))),
        };
    }

    if let Some(order_by) = &query.order_by {
        select.order_by(Alias::new(order_by.as_str()), Order::Asc);
    }

    match query.delimiter.limit {
        Some(limit) if limit < 0 => {
            debug!(limit, "negative limit clamped to zero rows");
            select.limit(0);
        }
        Some(limit) => {
            select.limit(limit.unsigned_abs());
        }
        None => {}
    }
    if let Some(offset) = query.delimiter.offset.filter(|offset| *offset > 0) {
        select.offset(offset.unsigned_abs());
    }

    select
}

pub(crate) fn count_statement(query: &SelectQuery) -> SelectStatement {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new(COUNT_COLUMN))
        .from_subquery(select_statement(query), Alias::new("windowed"))
        .to_owned()
}

/// Rewrite `?` placeholders into the dialect of `backend`.
pub(crate) fn dialect_sql(backend: DatabaseBackend, sql: &str) -> String {
    match backend {
        DatabaseBackend::Postgres => {
            let mut out = String::with_capacity(sql.len() + 8);
            let mut index = 0_usize;
            for ch in sql.chars() {
                if ch == '?' {
                    index += 1;
                    out.push('$');
                    out.push_str(&index.to_string());
                } else {
                    out.push(ch);
                }
            }
            out
        }
        DatabaseBackend::MySql | DatabaseBackend::Sqlite => sql.to_owned(),
    }
}

fn into_row(value: JsonValue) -> anyhow::Result<Row> {
    match value {
        JsonValue::Object(columns) => Ok(columns.into_iter().collect()),
        other => anyhow::bail!("expected a row object, got {other}"),
    }
}

#[async_trait]
impl SqlExecutor for SeaOrmExecutor {
    #[instrument(skip(self, query), fields(db.operation = "select", db.table = %query.table))]
    async fn read_rows(&self, query: &SelectQuery) -> anyhow::Result<Vec<Row>> {
        let statement = self.backend().build(&select_statement(query));
        let rows = JsonValue::find_by_statement(statement.clone())
            .all(&self.db)
            .await
            .with_context(|| format!("query failed: {}", statement.sql))?;
        debug!(rows = rows.len(), "fetched rows");
        rows.into_iter().map(into_row).collect()
    }

    #[instrument(skip(self, query), fields(db.operation = "count", db.table = %query.table))]
    async fn count_rows(&self, query: &SelectQuery) -> anyhow::Result<u64> {
        let statement = self.backend().build(&count_statement(query));
        let row = self
            .db
            .query_one(statement.clone())
            .await
            .with_context(|| format!("count failed: {}", statement.sql))?
            .context("count query returned no row")?;
        let total: i64 = row.try_get("", COUNT_COLUMN)?;
        Ok(u64::try_from(total)?)
    }

    #[instrument(
        skip(self, statements),
        fields(db.operation = "batch", db.statement.count = statements.len())
    )]
    async fn execute_batch(&self, statements: Vec<SqlStatement>) -> anyhow::Result<u64> {
        let backend = self.backend();
        let txn = self.db.begin().await.context("failed to open transaction")?;

        let mut affected = 0_u64;
        for SqlStatement { sql, parameters } in statements {
            let sql = dialect_sql(backend, &sql);
            let values: Vec<Value> = parameters.into_iter().map(bind).collect();
            match txn
                .execute(Statement::from_sql_and_values(backend, &sql, values))
                .await
            {
                Ok(result) => affected += result.rows_affected(),
                Err(err) => {
                    _ = txn.rollback().await;
                    return Err(
                        anyhow::Error::new(err).context(format!("statement failed: {sql}"))
                    );
                }
            }
        }

        txn.commit().await.context("failed to commit transaction")?;
        debug!(affected, "batch committed");
        Ok(affected)
    }
}
