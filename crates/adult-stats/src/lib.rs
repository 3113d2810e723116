//! Aggregate queries over the `Adult` census table: first row, mean, most frequent value.

pub mod column;
pub mod config;
pub mod connector;
pub mod memory;
pub mod sql;
pub mod table;
pub mod types;

pub use column::{check_identifier, ColumnName};
pub use config::DatabaseConfig;
pub use connector::{Connector, MySqlConnector, Session};
pub use memory::MemoryConnector;
pub use sql::ADULT_TABLE;
pub use table::AdultTable;
pub use types::*;
