use std::collections::HashMap;

use tracing::{debug, error, info, trace};

use super::{Introspector, TableFilter};
use crate::config::IntrospectConfig;
use crate::executor::{ColumnDescription, QueryExecutor, QueryResult, Value};
use crate::prelude::OrascopeError;
use crate::quote::{IdentifierQuoter, OracleQuoter};
use crate::schema::{name_to_index, ForeignKeyTarget, IndexInfo, Schema, Table};

const TABLES_SQL: &str = "SELECT TABLE_NAME FROM USER_TABLES";

// One row per column that is in the primary key, a unique index, or both.
const INDEXES_SQL: &str = r#"
WITH primarycols AS (
    SELECT user_cons_columns.table_name, user_cons_columns.column_name, 1 AS primarycol
    FROM   user_cons_columns, user_constraints
    WHERE  user_cons_columns.constraint_name = user_constraints.constraint_name
      AND  user_constraints.constraint_type = 'P'
      AND  user_cons_columns.table_name = :1),
uniquecols AS (
    SELECT user_ind_columns.table_name, user_ind_columns.column_name, 1 AS uniquecol
    FROM   user_indexes, user_ind_columns
    WHERE  user_indexes.uniqueness = 'UNIQUE'
      AND  user_indexes.index_name = user_ind_columns.index_name
      AND  user_ind_columns.table_name = :2)
SELECT allcols.column_name, primarycols.primarycol, uniquecols.uniquecol
FROM   (SELECT column_name FROM primarycols
        UNION
        SELECT column_name FROM uniquecols) allcols
LEFT OUTER JOIN primarycols ON allcols.column_name = primarycols.column_name
LEFT OUTER JOIN uniquecols ON allcols.column_name = uniquecols.column_name
"#;

/// Oracle introspector
///
/// Reads the `USER_*` catalog views, so every answer is scoped to tables
/// owned by the connected user. Each operation issues a single statement.
pub struct OracleIntrospector<'a, E, Q = OracleQuoter> {
    executor: &'a mut E,
    quoter: Q,
    config: IntrospectConfig,
}

impl<'a, E: QueryExecutor> OracleIntrospector<'a, E> {
    pub fn new(executor: &'a mut E) -> Self {
        Self {
            executor,
            quoter: OracleQuoter,
            config: IntrospectConfig::default(),
        }
    }
}

impl<'a, E: QueryExecutor, Q: IdentifierQuoter> OracleIntrospector<'a, E, Q> {
    /// Replace the identifier quoter used by [`describe_table`](Self::describe_table)
    pub fn with_quoter<R: IdentifierQuoter>(self, quoter: R) -> OracleIntrospector<'a, E, R> {
        OracleIntrospector {
            executor: self.executor,
            quoter,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: IntrospectConfig) -> Self {
        self.config = config;
        self
    }

    /// Names of all tables owned by the current user, upper-cased
    pub fn list_tables(&mut self) -> Result<Vec<String>, OrascopeError> {
        let result = run(&mut *self.executor, "tables", TABLES_SQL, &[])?;

        let tables = result
            .rows
            .iter()
            .map(|row| text_cell(row, 0, "tables").map(str::to_uppercase))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = ?tables.len(), "Found tables");
        trace!(tables = ?tables, "Tables found");
        Ok(tables)
    }

    /// Column metadata for a table, as reported by the executor
    ///
    /// Runs a probe that fetches at most `probe_rows` rows. The table name
    /// is quoted and interpolated; the row bound is a bind parameter.
    pub fn describe_table(
        &mut self,
        table_name: &str,
    ) -> Result<Vec<ColumnDescription>, OrascopeError> {
        let sql = format!(
            "SELECT * FROM {} WHERE ROWNUM <= :1",
            self.quoter.quote_name(table_name)
        );
        let params = [Value::Int(i64::from(self.config.probe_rows()))];

        let result = run(&mut *self.executor, "describe", &sql, &params)?;

        debug!(
            table = ?table_name,
            columns = ?result.description.len(),
            rows = ?result.rows.len(),
            "Described table"
        );
        Ok(result.description)
    }

    /// Map of column name to zero-based position within the table
    pub fn column_index_map(
        &mut self,
        table_name: &str,
    ) -> Result<HashMap<String, usize>, OrascopeError> {
        let description = self.describe_table(table_name)?;
        Ok(name_to_index(&description))
    }

    /// Foreign keys leaving `table_name`, keyed by local column ordinal
    ///
    /// Not supported yet. Always fails with
    /// [`OrascopeError::NotImplemented`] so that callers can tell it apart
    /// from a table that has no foreign keys.
    pub fn list_relations(
        &mut self,
        table_name: &str,
    ) -> Result<HashMap<usize, ForeignKeyTarget>, OrascopeError> {
        debug!(table = ?table_name, "Relation introspection requested");
        Err(OrascopeError::NotImplemented {
            operation: "list_relations",
        })
    }

    /// Primary key and unique index membership for each column of a table
    ///
    /// Columns in neither constraint have no entry. `table_name` is bound as
    /// given, so it must match the stored catalog case (upper-case unless the
    /// table was created with a quoted name); a mismatch yields an empty map.
    pub fn list_indexes(
        &mut self,
        table_name: &str,
    ) -> Result<HashMap<String, IndexInfo>, OrascopeError> {
        let params = [Value::from(table_name), Value::from(table_name)];
        let result = run(&mut *self.executor, "indexes", INDEXES_SQL, &params)?;

        let mut indexes = HashMap::with_capacity(result.rows.len());
        for row in &result.rows {
            let column = text_cell(row, 0, "indexes")?;
            let is_primary_key = flag_cell(row, 1);
            let is_unique = flag_cell(row, 2);

            trace!(
                column = ?column,
                is_primary_key = ?is_primary_key,
                is_unique = ?is_unique,
                "Parsed index row"
            );

            // A column in several unique indexes comes back once per index
            let info: &mut IndexInfo = indexes.entry(column.to_string()).or_default();
            info.is_primary_key |= is_primary_key;
            info.is_unique |= is_unique;
        }

        debug!(table = ?table_name, count = ?indexes.len(), "Found indexed columns");
        Ok(indexes)
    }
}

impl<E: QueryExecutor, Q: IdentifierQuoter> Introspector for OracleIntrospector<'_, E, Q> {
    fn introspect(&mut self, filter: &TableFilter) -> Result<Schema, OrascopeError> {
        info!("Starting schema introspection");

        let all_table_names = self.list_tables()?;

        let table_names: Vec<String> = all_table_names
            .into_iter()
            .filter(|name| filter.should_include(name))
            .collect();
        debug!(count = ?table_names.len(), "Tables after filtering");

        let mut tables = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            debug!(table = ?table_name, "Introspecting table");

            let columns = self.describe_table(&table_name)?;
            let indexes = self.list_indexes(&table_name)?;

            tables.push(Table {
                name: table_name,
                columns,
                indexes,
            });
        }

        info!(tables = ?tables.len(), "Schema introspection complete");

        Ok(Schema { tables })
    }
}

/// Execute one statement, boxing any executor failure unchanged
fn run<E: QueryExecutor>(
    executor: &mut E,
    query: &'static str,
    sql: &str,
    params: &[Value],
) -> Result<QueryResult, OrascopeError> {
    trace!(query = ?query, sql = ?sql, params = ?params, "Executing catalog query");

    executor.execute(sql, params).map_err(|e| {
        error!(query = ?query, error = ?e, "Catalog query failed");
        OrascopeError::query(e)
    })
}

fn text_cell<'r>(row: &'r [Value], idx: usize, query: &'static str) -> Result<&'r str, OrascopeError> {
    match row.get(idx) {
        Some(Value::Text(s)) => Ok(s.as_str()),
        other => Err(OrascopeError::UnexpectedRow {
            query,
            message: format!("expected text in column {}, got {:?}", idx, other),
        }),
    }
}

/// Missing cells count as absent flags
fn flag_cell(row: &[Value], idx: usize) -> bool {
    row.get(idx).is_some_and(Value::is_truthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::mock::MockExecutor;

    fn index_row(column: &str, primary: Value, unique: Value) -> Vec<Value> {
        vec![Value::from(column), primary, unique]
    }

    #[test]
    fn test_text_cell() {
        let row = vec![Value::from("ID"), Value::Null];

        assert_eq!(text_cell(&row, 0, "tables").unwrap(), "ID");
        assert!(matches!(
            text_cell(&row, 1, "tables"),
            Err(OrascopeError::UnexpectedRow { query: "tables", .. })
        ));
        assert!(text_cell(&row, 2, "tables").is_err());
    }

    #[test]
    fn test_flag_cell() {
        let row = vec![Value::from("ID"), Value::Int(1), Value::Null];

        assert!(flag_cell(&row, 1));
        assert!(!flag_cell(&row, 2));
        assert!(!flag_cell(&row, 3));
    }

    #[test]
    fn test_describe_binds_row_limit() {
        let mut executor = MockExecutor::new().with_result(
            "ROWNUM",
            QueryResult::empty(vec![ColumnDescription::new("ID", 23)]),
        );

        OracleIntrospector::new(&mut executor)
            .with_config(IntrospectConfig::default().with_probe_rows(0))
            .describe_table("users")
            .unwrap();

        let stmt = &executor.executed()[0];
        assert_eq!(stmt.sql, "SELECT * FROM \"USERS\" WHERE ROWNUM <= :1");
        assert_eq!(stmt.params, vec![Value::Int(0)]);
    }

    #[test]
    fn test_custom_quoter() {
        struct Verbatim;

        impl IdentifierQuoter for Verbatim {
            fn quote_name(&self, name: &str) -> String {
                format!("[{}]", name)
            }
        }

        let mut executor = MockExecutor::new().with_result("ROWNUM", QueryResult::default());

        OracleIntrospector::new(&mut executor)
            .with_quoter(Verbatim)
            .describe_table("t")
            .unwrap();

        assert!(executor.executed()[0].sql.starts_with("SELECT * FROM [t] WHERE"));
    }

    #[test]
    fn test_list_indexes_binds_table_twice() {
        let mut executor = MockExecutor::new().with_result(
            "primarycols",
            QueryResult::new(vec![], vec![index_row("ID", Value::Int(1), Value::Null)]),
        );

        OracleIntrospector::new(&mut executor)
            .list_indexes("USERS")
            .unwrap();

        let stmt = &executor.executed()[0];
        assert!(stmt.sql.contains(":1") && stmt.sql.contains(":2"));
        assert!(!stmt.sql.contains("USERS"));
        assert_eq!(stmt.params, vec![Value::from("USERS"), Value::from("USERS")]);
    }

    #[test]
    fn test_indexes_sql_shape() {
        let sql = INDEXES_SQL;

        assert!(sql.contains("user_constraints.constraint_type = 'P'"));
        assert!(sql.contains("user_indexes.uniqueness = 'UNIQUE'"));
        assert!(sql.contains("user_cons_columns.table_name = :1"));
        assert!(sql.contains("user_ind_columns.table_name = :2"));
        assert!(sql.contains(
            "SELECT column_name FROM primarycols\n        UNION\n        SELECT column_name FROM uniquecols"
        ));
        assert!(!sql.contains("UNION ALL"));
        assert!(sql.contains(
            "LEFT OUTER JOIN primarycols ON allcols.column_name = primarycols.column_name"
        ));
        assert!(sql.contains(
            "LEFT OUTER JOIN uniquecols ON allcols.column_name = uniquecols.column_name"
        ));
        assert_eq!(sql.matches("JOIN").count(), 2);
        assert_eq!(sql.matches(':').count(), 2);
    }

    #[test]
    fn test_list_indexes_rejects_malformed_row() {
        let mut executor = MockExecutor::new().with_result(
            "primarycols",
            QueryResult::new(vec![], vec![vec![Value::Int(7), Value::Int(1), Value::Null]]),
        );

        let err = OracleIntrospector::new(&mut executor)
            .list_indexes("USERS")
            .unwrap_err();

        assert!(matches!(err, OrascopeError::UnexpectedRow { query: "indexes", .. }));
    }

    #[test]
    fn test_list_relations_issues_no_query() {
        let mut executor = MockExecutor::new();

        let err = OracleIntrospector::new(&mut executor)
            .list_relations("USERS")
            .unwrap_err();

        assert!(err.is_not_implemented());
        assert!(executor.executed().is_empty());
    }
}
