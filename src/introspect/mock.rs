//! Mock executor for testing
//!
//! Returns scripted results without connecting to any database. Each script
//! entry is keyed by a fragment of SQL text; the first entry whose fragment
//! occurs in an executed statement answers it. Every statement is recorded
//! so tests can assert on the SQL and binds that were issued.
//!
//! ```rust
//! use orascope::executor::{QueryResult, Value};
//! use orascope::introspect::mock::MockExecutor;
//! use orascope::OracleIntrospector;
//!
//! let mut executor = MockExecutor::new().with_result(
//!     "USER_TABLES",
//!     QueryResult::new(vec![], vec![vec![Value::from("users")]]),
//! );
//!
//! let tables = OracleIntrospector::new(&mut executor).list_tables().unwrap();
//! assert_eq!(tables, vec!["USERS".to_string()]);
//! ```

use thiserror::Error;

use crate::executor::{QueryExecutor, QueryResult, Value};

/// Error returned by [`MockExecutor`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MockQueryError(pub String);

/// A statement the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug)]
struct Script {
    fragment: String,
    response: Result<QueryResult, MockQueryError>,
}

/// Scripted in-memory executor
#[derive(Debug, Default)]
pub struct MockExecutor {
    scripts: Vec<Script>,
    executed: Vec<ExecutedStatement>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer statements containing `fragment` with `result`
    pub fn with_result(mut self, fragment: impl Into<String>, result: QueryResult) -> Self {
        self.scripts.push(Script {
            fragment: fragment.into(),
            response: Ok(result),
        });
        self
    }

    /// Fail statements containing `fragment` with `message`
    pub fn with_error(mut self, fragment: impl Into<String>, message: impl Into<String>) -> Self {
        self.scripts.push(Script {
            fragment: fragment.into(),
            response: Err(MockQueryError(message.into())),
        });
        self
    }

    /// Statements executed so far, oldest first
    pub fn executed(&self) -> &[ExecutedStatement] {
        &self.executed
    }
}

impl QueryExecutor for MockExecutor {
    type Error = MockQueryError;

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult, Self::Error> {
        self.executed.push(ExecutedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        self.scripts
            .iter()
            .find(|script| sql.contains(&script.fragment))
            .map(|script| script.response.clone())
            .unwrap_or_else(|| {
                Err(MockQueryError(format!(
                    "no scripted result for statement: {}",
                    sql.trim()
                )))
            })
    }
}
