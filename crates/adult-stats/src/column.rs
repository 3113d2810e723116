//! Column identifiers: syntax checks and schema allow-list resolution.

use std::fmt;

use crate::types::{StatsError, StatsResult};

/// MySQL's identifier length limit.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// A column name known to exist in the table, in the schema's spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnName(String);

impl ColumnName {
    /// Resolve a caller-supplied name against the table's column list.
    ///
    /// Matching is ASCII case-insensitive, as MySQL column names are.
    pub fn resolve(raw: &str, table: &str, columns: &[String]) -> StatsResult<Self> {
        check_identifier(raw)?;

        columns
            .iter()
            .find(|c| c.eq_ignore_ascii_case(raw))
            .map(|c| ColumnName(c.clone()))
            .ok_or_else(|| StatsError::UnknownColumn {
                column: raw.to_string(),
                table: table.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick-quoted form for SQL text.
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0.replace('`', "``"))
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reject names that can never be a MySQL column name.
///
/// Other characters are allowed; the schema lookup decides the rest.
pub fn check_identifier(raw: &str) -> StatsResult<()> {
    if raw.is_empty() || raw.chars().count() > MAX_IDENTIFIER_LEN {
        Err(StatsError::InvalidColumn(raw.to_string()))
    } else {
        Ok(())
    }
}
