use crate::{
    QueryError, QueryResult, Result, RowLabeled, RowSet, RowsAffected, Statement,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

/// The row execution collaborator: sends statements to the database.
///
/// Parameters are referenced in the SQL by the dialect prefix followed by their name, an
/// executor binds them by name.
pub trait Executor: Send + Sized {
    /// General method to send any statement and return any result type (either row or count)
    fn run(&mut self, statement: Statement) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the statement and returns the rows.
    fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(statement).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the statement and return the total number of rows affected.
    fn execute(&mut self, statement: Statement) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(statement)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }

    /// Execute a batch of selects and return one row set per select, in order.
    ///
    /// Defaults to an error for executors that cannot tell result sets apart, the implementor
    /// then falls back to one round trip per select.
    fn fetch_multiple(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<Vec<RowSet>>> + Send {
        let _ = statement;
        async {
            Err(QueryError::Unsupported(
                "This executor cannot read several result sets from one statement".into(),
            )
            .into())
        }
    }
}

/// An executor owning a database session that can start transactions.
pub trait Connection: Executor {
    type Transaction<'c>: Transaction<'c>
    where
        Self: 'c;

    fn begin(&mut self) -> impl Future<Output = Result<Self::Transaction<'_>>> + Send;
}

pub trait Transaction<'c>: Executor {
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}
