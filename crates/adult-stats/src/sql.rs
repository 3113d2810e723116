//! SQL text for the table operations.
//!
//! Only [`ColumnName`] values, which have passed the schema allow-list,
//! are ever spliced into a statement.

use crate::column::ColumnName;

/// The table every operation runs against.
pub const ADULT_TABLE: &str = "Adult";

/// Column lookup, bound to the table name and the connection's database.
pub const TABLE_COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

pub fn first_row_sql() -> String {
    format!("SELECT * FROM {ADULT_TABLE} LIMIT 1")
}

pub fn mean_sql(column: &ColumnName) -> String {
    format!("SELECT AVG({}) FROM {ADULT_TABLE} LIMIT 1", column.quoted())
}

pub fn most_frequent_sql(column: &ColumnName) -> String {
    let col = column.quoted();
    format!(
        "SELECT {col}, COUNT({col}) AS value_occurrence FROM {ADULT_TABLE} \
         GROUP BY {col} ORDER BY value_occurrence DESC LIMIT 1"
    )
}
