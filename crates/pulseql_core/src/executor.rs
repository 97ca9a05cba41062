//! Single statement execution against an SQLite connection.

use std::sync::Arc;

use async_sqlite::rusqlite::{self, Batch, Connection};
use tracing::{trace, warn};

use crate::dictionary::KeywordDictionary;
use crate::encode::{OutputFormat, QueryOutput, Row, Value};
use crate::errors::Result;
use crate::translate::{QueryTranslator, RewriteMode};

/// Executes queries with a fixed translation and output configuration.
///
/// Cheap to clone, the dictionary is shared.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    translator: Option<QueryTranslator>,
    format: OutputFormat,
}

impl QueryExecutor {
    pub fn new(format: OutputFormat) -> Self {
        QueryExecutor {
            translator: None,
            format,
        }
    }

    pub fn with_dictionary(
        mut self,
        dictionary: Arc<KeywordDictionary>,
        mode: RewriteMode,
    ) -> Self {
        self.translator = Some(QueryTranslator::new(dictionary, mode));
        self
    }

    pub fn with_dictionary_opt(
        self,
        dictionary: Option<Arc<KeywordDictionary>>,
        mode: RewriteMode,
    ) -> Self {
        match dictionary {
            Some(dictionary) => self.with_dictionary(dictionary, mode),
            None => self,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn dictionary(&self) -> Option<&KeywordDictionary> {
        self.translator.as_ref().map(|t| t.dictionary())
    }

    /// Execute a single statement.
    ///
    /// The query is translated first if a dictionary is configured. All rows
    /// are fetched before encoding. Any open transaction on the connection is
    /// committed afterwards, whether or not execution succeeded.
    pub fn execute(&self, conn: &Connection, query: &str) -> Result<QueryOutput> {
        let query = match &self.translator {
            Some(translator) => translator.translate(query),
            None => query.to_string(),
        };
        trace!(%query, "executing");

        with_commit(conn, |conn| {
            let rows = fetch_rows(conn, &query)?;
            QueryOutput::encode(rows, self.format)
        })
    }
}

/// Run `f`, then commit any transaction left open on the connection.
///
/// The commit runs on every exit path. An error from `f` takes precedence over
/// an error from the commit.
pub fn with_commit<T>(conn: &Connection, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    let result = f(conn);
    let committed = commit(conn);

    match (result, committed) {
        (Ok(v), Ok(())) => Ok(v),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(commit_err)) => {
            warn!(%commit_err, "commit after failed execution also failed");
            Err(e)
        }
    }
}

fn commit(conn: &Connection) -> Result<()> {
    if !conn.is_autocommit() {
        conn.execute_batch("COMMIT")?;
    }
    Ok(())
}

/// Prepare and step through exactly one statement, collecting every row.
///
/// Text after the first statement is rejected rather than run or silently
/// dropped. Whitespace and comments don't count as a statement.
fn fetch_rows(conn: &Connection, query: &str) -> Result<Vec<Row>> {
    let mut batch = Batch::new(conn, query);
    let mut stmt = match batch.next()? {
        Some(stmt) => stmt,
        None => return Ok(Vec::new()),
    };
    if batch.next()?.is_some() {
        return Err(rusqlite::Error::MultipleStatement.into());
    }

    let num_cols = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..num_cols)
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<Result<Row, _>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}
