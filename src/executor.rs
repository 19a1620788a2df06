//! Query execution seam
//!
//! Introspection never talks to a driver directly. It hands SQL and bound
//! parameters to a [`QueryExecutor`] and reads back a fully materialised
//! [`QueryResult`]. Adapting a concrete Oracle driver means implementing this
//! one trait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Executes SQL on behalf of the introspector
///
/// Placeholders are Oracle positional binds (`:1`, `:2`, ...) matched to
/// `params` in order. Transaction and threading discipline belong to the
/// implementor.
pub trait QueryExecutor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one statement and return its column metadata and every row
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult, Self::Error>;
}

/// A bound parameter or a fetched cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Catalog flag columns come back as `1` or `NULL`; this folds any such
    /// raw value into a boolean.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Metadata for one result column
///
/// Only `name` and `type_code` are interpreted. The remaining fields are
/// whatever the driver reports and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnDescription {
    pub name: String,
    pub type_code: u32,
    pub display_size: Option<u32>,
    pub internal_size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<i32>,
    pub null_ok: Option<bool>,
}

impl ColumnDescription {
    /// Create a description with only a name and type code
    pub fn new(name: impl Into<String>, type_code: u32) -> Self {
        Self {
            name: name.into(),
            type_code,
            display_size: None,
            internal_size: None,
            precision: None,
            scale: None,
            null_ok: None,
        }
    }

    pub fn with_internal_size(mut self, size: u32) -> Self {
        self.internal_size = Some(size);
        self
    }

    pub fn with_null_ok(mut self, null_ok: bool) -> Self {
        self.null_ok = Some(null_ok);
        self
    }
}

/// Output of a single executed statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub description: Vec<ColumnDescription>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(description: Vec<ColumnDescription>, rows: Vec<Vec<Value>>) -> Self {
        Self { description, rows }
    }

    /// Result with column metadata and no rows
    pub fn empty(description: Vec<ColumnDescription>) -> Self {
        Self {
            description,
            rows: Vec::new(),
        }
    }
}
