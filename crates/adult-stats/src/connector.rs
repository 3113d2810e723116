//! Database sessions: the connector seam and its MySQL implementation.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row as _, TypeInfo, ValueRef};

use crate::config::DatabaseConfig;
use crate::sql::TABLE_COLUMNS_SQL;
use crate::types::{QueryResult, Row, Scalar, StatsError, StatsResult};

/// Opens one database session per call.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> StatsResult<Box<dyn Session>>;
}

/// A single open database connection.
#[async_trait]
pub trait Session: Send {
    /// Column names of `table`, in ordinal order. Empty if the table does not exist.
    async fn table_columns(&mut self, table: &str) -> StatsResult<Vec<String>>;

    /// Run `sql` and collect every row.
    async fn fetch_all(&mut self, sql: &str) -> StatsResult<QueryResult>;

    async fn close(self: Box<Self>) -> StatsResult<()>;
}

/// Connects to MySQL with a fresh connection for every session.
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    target: String,
}

impl MySqlConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
            target: config.display_target(),
        }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self) -> StatsResult<Box<dyn Session>> {
        tracing::debug!("Connecting to {}", self.target);
        let conn = MySqlConnection::connect_with(&self.options).await?;
        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl Session for MySqlSession {
    async fn table_columns(&mut self, table: &str) -> StatsResult<Vec<String>> {
        let rows = sqlx::query(TABLE_COLUMNS_SQL)
            .bind(table)
            .fetch_all(&mut self.conn)
            .await?;

        rows.iter()
            .map(|row| row.try_get_unchecked::<String, _>(0).map_err(StatsError::from))
            .collect()
    }

    async fn fetch_all(&mut self, sql: &str) -> StatsResult<QueryResult> {
        tracing::debug!(%sql, "Executing query");
        // One-shot statement, not cached on the connection.
        let rows = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&mut self.conn)
            .await?;
        let rows = rows.iter().map(decode_row).collect::<StatsResult<Vec<_>>>()?;
        tracing::debug!("Query returned {} row(s)", rows.len());
        Ok(QueryResult::new(rows))
    }

    async fn close(self: Box<Self>) -> StatsResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn decode_row(row: &MySqlRow) -> StatsResult<Row> {
    (0..row.len()).map(|idx| decode_cell(row, idx)).collect()
}

/// How a cell is decoded, chosen from its MySQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    UInt,
    Float,
    Decimal,
    Text,
}

fn cell_kind(type_name: &str) -> CellKind {
    match type_name {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => CellKind::Int,
        name if name.ends_with(" UNSIGNED") => CellKind::UInt,
        "FLOAT" | "DOUBLE" => CellKind::Float,
        "DECIMAL" => CellKind::Decimal,
        _ => CellKind::Text,
    }
}

fn decode_cell(row: &MySqlRow, idx: usize) -> StatsResult<Scalar> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Scalar::Null);
    }

    let column = &row.columns()[idx];
    let type_name = column.type_info().name();
    let decode_err = |e: sqlx::Error| StatsError::Decode {
        column: column.name().to_string(),
        type_name: type_name.to_string(),
        reason: e.to_string(),
    };

    let value = match cell_kind(type_name) {
        CellKind::Int => Scalar::Int(row.try_get_unchecked::<i64, _>(idx).map_err(decode_err)?),
        CellKind::UInt => Scalar::UInt(row.try_get_unchecked::<u64, _>(idx).map_err(decode_err)?),
        CellKind::Float => Scalar::Float(row.try_get_unchecked::<f64, _>(idx).map_err(decode_err)?),
        CellKind::Decimal => {
            Scalar::Decimal(row.try_get_unchecked::<String, _>(idx).map_err(decode_err)?)
        }
        CellKind::Text => Scalar::Text(row.try_get_unchecked::<String, _>(idx).map_err(decode_err)?),
    };

    Ok(value)
}
