//! Database introspection
//!
//! This module provides functionality for extracting schema information
//! from an Oracle catalog through a caller-supplied executor.

use crate::prelude::{OrascopeError, Schema};

pub mod mock;
mod oracle;

pub use oracle::OracleIntrospector;

/// Filters to apply during whole-schema introspection
///
/// Catalog names come back upper-cased, so matching ignores ASCII case.
#[derive(Debug, Default, Clone)]
pub struct TableFilter {
    /// Only include these tables (if Some)
    pub include: Option<Vec<String>>,
    /// Exclude these tables
    pub exclude: Option<Vec<String>>,
}

impl TableFilter {
    /// Check if a table should be included
    pub fn should_include(&self, table_name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|t| t.eq_ignore_ascii_case(table_name)) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|t| t.eq_ignore_ascii_case(table_name)) {
                return false;
            }
        }

        true
    }
}

/// Trait for whole-schema introspection
pub trait Introspector {
    /// Describe every table that passes the filter
    fn introspect(&mut self, filter: &TableFilter) -> Result<Schema, OrascopeError>;
}
