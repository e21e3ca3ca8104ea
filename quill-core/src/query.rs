use crate::{Parameters, Value, truncate_long};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// SQL text plus its named parameters, the unit handed to an [`crate::Executor`].
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub parameters: Parameters,
}

impl Statement {
    pub fn new(sql: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }
}

impl From<&str> for Statement {
    fn from(value: &str) -> Self {
        Statement::new(value, Parameters::new())
    }
}

impl From<String> for Statement {
    fn from(value: String) -> Self {
        Statement::new(value, Parameters::new())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted / affected identifier when available.
    pub last_affected_id: Option<i64>,
}

impl RowsAffected {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_affected_id: None,
        }
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;
/// Every row of one result set.
pub type RowSet = Vec<RowLabeled>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    /// Value of a column, labels are compared case insensitively.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v.eq_ignore_ascii_case(name))
            .map(|i| &self.values()[i])
    }
}

/// Heterogeneous items emitted by `Executor::run` combining rows and modify results.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// A labeled row.
    Row(RowLabeled),
    /// A modify effect aggregation.
    Affected(RowsAffected),
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
