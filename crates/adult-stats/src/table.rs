//! The three operations over the `Adult` table.

use std::sync::Arc;

use crate::column::ColumnName;
use crate::connector::{Connector, Session};
use crate::sql::{first_row_sql, mean_sql, most_frequent_sql, ADULT_TABLE};
use crate::types::{QueryResult, Scalar, StatsError, StatsResult};

/// Runs queries against `Adult`, one connection per call.
#[derive(Clone)]
pub struct AdultTable {
    connector: Arc<dyn Connector>,
}

impl AdultTable {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// `SELECT * FROM Adult LIMIT 1`. An empty table yields an empty result.
    pub async fn first_row(&self) -> StatsResult<QueryResult> {
        let mut session = self.connector.connect().await?;
        let outcome = session.fetch_all(&first_row_sql()).await;
        finish(session, outcome).await
    }

    /// Average of `column`, as the server computes it.
    pub async fn mean_value(&self, column: &str) -> StatsResult<Scalar> {
        let mut session = self.connector.connect().await?;
        let outcome = scalar_query(session.as_mut(), column, mean_sql).await;
        finish(session, outcome).await
    }

    /// The value of `column` with the highest occurrence count.
    pub async fn most_frequent_value(&self, column: &str) -> StatsResult<Scalar> {
        let mut session = self.connector.connect().await?;
        let outcome = scalar_query(session.as_mut(), column, most_frequent_sql).await;
        finish(session, outcome).await
    }

    /// Column names of `Adult`, in ordinal order.
    pub async fn columns(&self) -> StatsResult<Vec<String>> {
        let mut session = self.connector.connect().await?;
        let outcome = session.table_columns(ADULT_TABLE).await;
        finish(session, outcome).await
    }
}

/// Validate `raw` against the schema, run the built query, take cell `[0][0]`.
async fn scalar_query(
    session: &mut dyn Session,
    raw: &str,
    build: fn(&ColumnName) -> String,
) -> StatsResult<Scalar> {
    let columns = session.table_columns(ADULT_TABLE).await?;
    let column = ColumnName::resolve(raw, ADULT_TABLE, &columns)?;
    let sql = build(&column);

    let result = session.fetch_all(&sql).await?;
    result
        .first_value()
        .cloned()
        .ok_or(StatsError::EmptyResult(sql))
}

/// Close the session, then report the operation's own error first.
async fn finish<T>(session: Box<dyn Session>, outcome: StatsResult<T>) -> StatsResult<T> {
    let closed = session.close().await;
    let value = outcome?;
    closed?;
    Ok(value)
}
