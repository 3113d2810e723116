//! Core data types for query results and errors.

use std::fmt;

use serde::{Serialize, Serializer};

/// A single cell returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Exact decimal, kept in the textual form the server sent.
    Decimal(String),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("None"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => f.write_str(&format_float(*v)),
            Scalar::Decimal(v) | Scalar::Text(v) => f.write_str(v),
        }
    }
}

/// Shortest round-trip form with a fractional part or exponent, as in
/// Python's `repr(float)`: `38.0`, `0.0001`, `1e+20`, `1.5e-05`.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if (-4..16).contains(&exp) {
        let plain = v.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Int(v) => serializer.serialize_i64(*v),
            Scalar::UInt(v) => serializer.serialize_u64(*v),
            Scalar::Float(v) => serializer.serialize_f64(*v),
            Scalar::Decimal(v) | Scalar::Text(v) => serializer.serialize_str(v),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

/// One result row, in selected-column order.
pub type Row = Vec<Scalar>;

/// All rows returned by a query, in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryResult {
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a result holding a single one-cell row.
    pub fn single(value: impl Into<Scalar>) -> Self {
        Self {
            rows: vec![vec![value.into()]],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First cell of the first row, if any.
    pub fn first_value(&self) -> Option<&Scalar> {
        self.rows.first().and_then(|row| row.first())
    }
}

/// Errors that can occur while querying the table.
#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid column name: {0:?}")]
    InvalidColumn(String),

    #[error("Unknown column {column:?} in table {table}")]
    UnknownColumn { column: String, table: String },

    #[error("Query returned no rows: {0}")]
    EmptyResult(String),

    #[error("Cannot decode column {column} of type {type_name}: {reason}")]
    Decode {
        column: String,
        type_name: String,
        reason: String,
    },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StatsError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StatsError::Database(_) => "database",
            StatsError::InvalidColumn(_) => "invalid_column",
            StatsError::UnknownColumn { .. } => "unknown_column",
            StatsError::EmptyResult(_) => "empty_result",
            StatsError::Decode { .. } => "decode",
            StatsError::Backend(_) => "backend",
        }
    }
}

/// Convenience result type.
pub type StatsResult<T> = Result<T, StatsError>;
