//! Schema data structures
//!
//! These types are what introspection hands to the schema-mapping layer:
//! per-column index flags, foreign key targets, the type-code table and a
//! whole-schema snapshot.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::executor::ColumnDescription;

/// Constraint membership of a single column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexInfo {
    pub is_primary_key: bool,
    pub is_unique: bool,
}

/// Column a foreign key points at, by ordinal in the referenced table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForeignKeyTarget {
    pub column_index: usize,
    pub table: String,
}

/// Field type a catalog type code maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    Boolean,
    SmallInteger,
    Integer,
    Text,
    IpAddress,
    Char,
    Date,
    Time,
    DateTime,
    Float,
}

/// Type code to field type, in ascending code order
pub const DATA_TYPES_REVERSE: [(u32, FieldType); 12] = [
    (16, FieldType::Boolean),
    (21, FieldType::SmallInteger),
    (23, FieldType::Integer),
    (25, FieldType::Text),
    (869, FieldType::IpAddress),
    (1043, FieldType::Char),
    (1082, FieldType::Date),
    (1083, FieldType::Time),
    (1114, FieldType::DateTime),
    (1184, FieldType::DateTime),
    (1266, FieldType::Time),
    (1700, FieldType::Float),
];

impl FieldType {
    /// Look up the field type for a type code. Unknown codes yield `None`.
    pub const fn from_type_code(code: u32) -> Option<FieldType> {
        let mut i = 0;
        while i < DATA_TYPES_REVERSE.len() {
            let (known, field_type) = DATA_TYPES_REVERSE[i];
            if known == code {
                return Some(field_type);
            }
            i += 1;
        }
        None
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::SmallInteger => "small_integer",
            FieldType::Integer => "integer",
            FieldType::Text => "text",
            FieldType::IpAddress => "ip_address",
            FieldType::Char => "char",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "date_time",
            FieldType::Float => "float",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of every introspected table
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Database table
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    pub name: String,
    /// Columns in declared order
    pub columns: Vec<ColumnDescription>,
    /// Only columns in a primary key or unique index have an entry
    pub indexes: HashMap<String, IndexInfo>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&ColumnDescription> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Primary key column names in declared column order
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns_where(|info| info.is_primary_key)
    }

    /// Uniquely indexed column names in declared column order
    pub fn unique_columns(&self) -> Vec<&str> {
        self.columns_where(|info| info.is_unique)
    }

    /// Index flags for a column, all false when it has no entry
    pub fn index_info(&self, column: &str) -> IndexInfo {
        self.indexes.get(column).copied().unwrap_or_default()
    }

    pub fn field_type(&self, column: &str) -> Option<FieldType> {
        self.column(column)
            .and_then(|col| FieldType::from_type_code(col.type_code))
    }

    pub fn column_index_map(&self) -> HashMap<String, usize> {
        name_to_index(&self.columns)
    }

    fn columns_where(&self, pred: impl Fn(&IndexInfo) -> bool) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|col| self.indexes.get(&col.name).is_some_and(&pred))
            .map(|col| col.name.as_str())
            .collect()
    }
}

/// Map each column name to its zero-based position
pub(crate) fn name_to_index(columns: &[ColumnDescription]) -> HashMap<String, usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| (col.name.clone(), i))
        .collect()
}
