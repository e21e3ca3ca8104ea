use quill::{
    Connection, Error, Executor, QueryError, QueryResult, Result, RowLabeled, RowSet,
    RowsAffected, Statement, Transaction, Value,
    stream::{self, Stream},
};
use std::{collections::VecDeque, future::Future, sync::Arc};

/// Scripted outcome of the next statement received by a [`MockConnection`].
#[derive(Debug, Clone)]
pub enum Response {
    /// Items emitted by `run`, in order.
    Results(Vec<QueryResult>),
    /// Result sets returned by `fetch_multiple`.
    Sets(Vec<RowSet>),
    /// The statement fails with this message.
    Error(String),
}

/// Build a result set from column labels and rows of values.
pub fn rows<const N: usize>(labels: [&str; N], rows: impl IntoIterator<Item = [Value; N]>) -> RowSet {
    let labels: Arc<[String]> = labels.iter().map(|v| v.to_string()).collect();
    rows.into_iter()
        .map(|values| RowLabeled::new(labels.clone(), values.into()))
        .collect()
}

/// In memory connection recording every statement and replaying scripted responses.
///
/// A statement without a scripted response produces no rows and affects no rows.
#[derive(Debug)]
pub struct MockConnection {
    statements: Vec<Statement>,
    responses: VecDeque<Response>,
    multiple_results: bool,
    pub transactions: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self {
            statements: Vec::new(),
            responses: VecDeque::new(),
            multiple_results: true,
            transactions: 0,
            commits: 0,
            rollbacks: 0,
        }
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the driver cannot split the result sets of a batch.
    pub fn without_multiple_results(mut self) -> Self {
        self.multiple_results = false;
        self
    }

    pub fn respond(&mut self, response: Response) -> &mut Self {
        self.responses.push_back(response);
        self
    }

    pub fn respond_rows(&mut self, rows: RowSet) -> &mut Self {
        self.respond(Response::Results(
            rows.into_iter().map(QueryResult::Row).collect(),
        ))
    }

    pub fn respond_affected(&mut self, rows_affected: u64) -> &mut Self {
        self.respond(Response::Results(vec![QueryResult::Affected(
            RowsAffected::new(rows_affected),
        )]))
    }

    pub fn respond_sets(&mut self, sets: Vec<RowSet>) -> &mut Self {
        self.respond(Response::Sets(sets))
    }

    pub fn respond_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.respond(Response::Error(message.into()))
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn last_statement(&self) -> Option<&Statement> {
        self.statements.last()
    }

    pub fn take_statements(&mut self) -> Vec<Statement> {
        std::mem::take(&mut self.statements)
    }

    /// Responses scripted but never consumed.
    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

impl Executor for MockConnection {
    fn run(&mut self, statement: Statement) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.statements.push(statement);
        let items = match self.responses.pop_front() {
            None => Vec::new(),
            Some(Response::Results(results)) => results.into_iter().map(Ok).collect(),
            Some(Response::Sets(sets)) => sets
                .into_iter()
                .flatten()
                .map(|row| Ok(QueryResult::Row(row)))
                .collect(),
            Some(Response::Error(message)) => vec![Err(Error::msg(message))],
        };
        stream::iter(items)
    }

    fn fetch_multiple(&mut self, statement: Statement) -> impl Future<Output = Result<Vec<RowSet>>> + Send {
        self.statements.push(statement);
        let result = if !self.multiple_results {
            Err(QueryError::Unsupported("The mock connection does not split result sets".into()).into())
        } else {
            match self.responses.pop_front() {
                None => Ok(Vec::new()),
                Some(Response::Sets(sets)) => Ok(sets),
                Some(Response::Results(results)) => Ok(vec![
                    results
                        .into_iter()
                        .filter_map(|v| match v {
                            QueryResult::Row(row) => Some(row),
                            QueryResult::Affected(..) => None,
                        })
                        .collect(),
                ]),
                Some(Response::Error(message)) => Err(Error::msg(message)),
            }
        };
        async move { result }
    }
}

impl Connection for MockConnection {
    type Transaction<'c> = MockTransaction<'c>;

    fn begin(&mut self) -> impl Future<Output = Result<Self::Transaction<'_>>> + Send {
        self.transactions += 1;
        async move { Ok(MockTransaction { connection: self }) }
    }
}

/// Transaction over a [`MockConnection`], statements are recorded on the connection.
#[derive(Debug)]
pub struct MockTransaction<'c> {
    connection: &'c mut MockConnection,
}

impl<'c> Executor for MockTransaction<'c> {
    fn run(&mut self, statement: Statement) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.connection.run(statement)
    }

    fn fetch_multiple(&mut self, statement: Statement) -> impl Future<Output = Result<Vec<RowSet>>> + Send {
        self.connection.fetch_multiple(statement)
    }
}

impl<'c> Transaction<'c> for MockTransaction<'c> {
    fn commit(self) -> impl Future<Output = Result<()>> + Send {
        self.connection.commits += 1;
        async { Ok(()) }
    }

    fn rollback(self) -> impl Future<Output = Result<()>> + Send {
        self.connection.rollbacks += 1;
        async { Ok(()) }
    }
}
