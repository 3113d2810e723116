//! In-process connector with canned results, for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::connector::{Connector, Session};
use crate::types::{QueryResult, StatsError, StatsResult};

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<String>>,
    results: HashMap<String, QueryResult>,
    executed: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// Serves a fixed schema and one registered result per SQL string.
///
/// Running SQL with no registered result is a backend error.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    state: Arc<MemoryState>,
}

impl MemoryConnector {
    /// Create a connector exposing one table with the given columns.
    pub fn new(table: &str, columns: &[&str]) -> Self {
        let mut state = MemoryState::default();
        state.tables.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        Self {
            state: Arc::new(state),
        }
    }

    /// Register the result returned for `sql`.
    ///
    /// Must be called before the connector is shared.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        match Arc::get_mut(&mut self.state) {
            Some(state) => {
                state.results.insert(sql.into(), result);
            }
            None => tracing::warn!("MemoryConnector already shared; result not registered"),
        }
        self
    }

    /// Every SQL string executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state.executed.lock().clone()
    }

    pub fn connections_opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn connections_closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> StatsResult<Box<dyn Session>> {
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            state: self.state.clone(),
        }))
    }
}

struct MemorySession {
    state: Arc<MemoryState>,
}

#[async_trait]
impl Session for MemorySession {
    async fn table_columns(&mut self, table: &str) -> StatsResult<Vec<String>> {
        Ok(self.state.tables.get(table).cloned().unwrap_or_default())
    }

    async fn fetch_all(&mut self, sql: &str) -> StatsResult<QueryResult> {
        self.state.executed.lock().push(sql.to_string());
        self.state
            .results
            .get(sql)
            .cloned()
            .ok_or_else(|| StatsError::Backend(format!("no result registered for: {sql}")))
    }

    async fn close(self: Box<Self>) -> StatsResult<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
