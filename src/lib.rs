//! # orascope
//!
//! Oracle schema introspection
//!
//! This crate answers catalog questions about a connected Oracle schema:
//! which tables exist, what columns they have, and which columns take part in
//! primary key or unique constraints. Connections are not managed here; the
//! caller supplies a [`QueryExecutor`](executor::QueryExecutor) that runs SQL.

pub mod config;
pub mod error;
pub mod executor;
pub mod introspect;
pub mod quote;
pub mod schema;

pub mod prelude {
    pub use crate::config::IntrospectConfig;
    pub use crate::error::OrascopeError;
    pub use crate::executor::{ColumnDescription, QueryExecutor, QueryResult, Value};
    pub use crate::introspect::{Introspector, OracleIntrospector, TableFilter};
    pub use crate::quote::{IdentifierQuoter, OracleQuoter};
    pub use crate::schema::{FieldType, ForeignKeyTarget, IndexInfo, Schema, Table};
}

pub use introspect::OracleIntrospector;
