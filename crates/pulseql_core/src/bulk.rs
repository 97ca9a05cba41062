//! Best-effort loading of `;` separated script files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use async_sqlite::rusqlite::Connection;
use tracing::{debug, info};

use crate::encode::OutputFormat;
use crate::errors::{PulseError, Result};
use crate::executor::QueryExecutor;

/// A fragment that failed to execute.
#[derive(Debug)]
pub struct FragmentFailure {
    pub source: PathBuf,
    /// Zero based position of the fragment within its script.
    pub index: usize,
    pub error: PulseError,
}

impl fmt::Display for FragmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (statement {}): {}",
            self.source.display(),
            self.index + 1,
            self.error
        )
    }
}

#[derive(Debug, Default)]
pub struct BulkLoadReport {
    /// Number of fragments that executed successfully.
    pub executed: usize,
    pub failures: Vec<FragmentFailure>,
}

impl BulkLoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: BulkLoadReport) {
        self.executed += other.executed;
        self.failures.extend(other.failures);
    }
}

/// Loads scripts through a plain executor. Scripts are never translated.
#[derive(Debug)]
pub struct BulkLoader {
    conn: Connection,
    executor: QueryExecutor,
}

impl BulkLoader {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self::new(conn))
    }

    pub fn new(conn: Connection) -> Self {
        BulkLoader {
            conn,
            executor: QueryExecutor::new(OutputFormat::Native),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Load every file in order.
    ///
    /// Failing fragments are collected and loading carries on. Failing to read
    /// a file aborts the load.
    pub fn load_files<P: AsRef<Path>>(&self, files: &[P]) -> Result<BulkLoadReport> {
        let mut report = BulkLoadReport::default();
        for path in files {
            let path = path.as_ref();
            let content = fs::read_to_string(path)?;
            info!(path = %path.display(), "loading script");
            report.merge(self.load_script(path, &content));
        }
        Ok(report)
    }

    /// Execute each `;` separated fragment of `content`.
    pub fn load_script(&self, source: &Path, content: &str) -> BulkLoadReport {
        let mut report = BulkLoadReport::default();
        for (index, outcome) in self.execute_fragments(content).enumerate() {
            match outcome {
                Ok(()) => report.executed += 1,
                Err(error) => {
                    debug!(%error, index, "script fragment failed");
                    report.failures.push(FragmentFailure {
                        source: source.to_path_buf(),
                        index,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Lazily execute fragments, yielding one outcome per fragment.
    ///
    /// Blank fragments (such as the one after a trailing `;`) are skipped.
    pub fn execute_fragments<'a>(
        &'a self,
        content: &'a str,
    ) -> impl Iterator<Item = Result<()>> + 'a {
        content
            .split(';')
            .filter(|fragment| !fragment.trim().is_empty())
            .map(move |fragment| self.executor.execute(&self.conn, fragment).map(|_| ()))
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{QueryOutput, Value};

    fn dump(conn: &Connection) -> QueryOutput {
        QueryExecutor::default()
            .execute(conn, "SELECT id, name FROM t ORDER BY id")
            .unwrap()
    }

    const SCRIPT: &str = "
        CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
        INSERT INTO t VALUES (1, 'a');
        INSERT INTO t VALUES (2, 'b');
        UPDATE t SET name = 'c' WHERE id = 2;
    ";

    #[test]
    fn script_matches_individual_execution() {
        let loader = BulkLoader::new(Connection::open_in_memory().unwrap());
        let report = loader.load_script(Path::new("script.sql"), SCRIPT);
        assert!(report.is_clean());
        assert_eq!(4, report.executed);

        let single = Connection::open_in_memory().unwrap();
        let executor = QueryExecutor::default();
        for stmt in SCRIPT.split(';').filter(|s| !s.trim().is_empty()) {
            executor.execute(&single, stmt).unwrap();
        }

        assert_eq!(dump(&single), dump(loader.connection()));
    }

    #[test]
    fn failures_do_not_abort() {
        let loader = BulkLoader::new(Connection::open_in_memory().unwrap());
        let script = "
            CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
            INSERT INTO t VALUES (1, 'a');
            INSERT INTO nope VALUES (1);
            INSERT INTO t VALUES (1, 'dup');
            INSERT INTO t VALUES (2, 'b');
        ";
        let report = loader.load_script(Path::new("bad.sql"), script);

        assert_eq!(3, report.executed);
        let failed: Vec<_> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(vec![2, 3], failed);
        assert!(report.failures[0].to_string().starts_with("bad.sql (statement 3): "));

        let expected = QueryOutput::Rows(vec![
            vec![Value::Integer(1), Value::Text("a".to_string())],
            vec![Value::Integer(2), Value::Text("b".to_string())],
        ]);
        assert_eq!(expected, dump(loader.connection()));
    }

    #[test]
    fn load_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.sql");
        let data = dir.path().join("data.sql");
        fs::write(&schema, "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);").unwrap();
        fs::write(&data, "INSERT INTO t VALUES (1, 'a'); INSERT INTO t VALUES (2, 'b')").unwrap();

        let db = dir.path().join("db.sqlite");
        let loader = BulkLoader::open(&db).unwrap();
        let report = loader.load_files(&[&schema, &data]).unwrap();
        assert!(report.is_clean());
        assert_eq!(3, report.executed);
        loader.close().unwrap();

        // Persisted.
        let conn = Connection::open(&db).unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM t", [], |r| r.get(0))
            .unwrap();
        assert_eq!(2, count);
    }

    #[test]
    fn missing_file_aborts() {
        let loader = BulkLoader::new(Connection::open_in_memory().unwrap());
        let err = loader.load_files(&["/no/such/script.sql"]).unwrap_err();
        assert!(matches!(err, PulseError::Io(_)));
    }
}
