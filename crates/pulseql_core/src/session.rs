//! Line oriented interactive session.
//!
//! The session is driven one input line at a time and knows nothing about
//! terminals beyond writing output and a clear-screen sequence. Line editing
//! lives with the caller.

use std::io::Write;
use std::path::Path;

use async_sqlite::rusqlite::Connection;

use crate::errors::Result;
use crate::executor::QueryExecutor;
use crate::{TOOL_NAME, TOOL_VERSION};

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";

/// Meta command clearing the screen.
pub const CMD_CLEAR: &str = "_clear";
/// Meta command ending the session.
pub const CMD_EXIT: &str = "_exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    Clear,
    Exit,
    Query(&'a str),
}

impl<'a> ShellCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line {
            CMD_CLEAR => ShellCommand::Clear,
            CMD_EXIT => ShellCommand::Exit,
            query => ShellCommand::Query(query),
        }
    }
}

pub fn is_meta_command(line: &str) -> bool {
    !matches!(ShellCommand::parse(line), ShellCommand::Query(_))
}

#[derive(Debug)]
pub struct InteractiveSession<W: Write> {
    conn: Option<Connection>,
    executor: QueryExecutor,
    writer: W,
}

impl<W: Write> InteractiveSession<W> {
    pub fn open(db_path: impl AsRef<Path>, executor: QueryExecutor, writer: W) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self::new(conn, executor, writer))
    }

    pub fn new(conn: Connection, executor: QueryExecutor, writer: W) -> Self {
        InteractiveSession {
            conn: Some(conn),
            executor,
            writer,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.conn {
            Some(_) => SessionState::Running,
            None => SessionState::Terminated,
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn write_banner(&mut self) -> Result<()> {
        writeln!(
            self.writer,
            "{TOOL_NAME} {TOOL_VERSION} ConsoleMode is running."
        )?;
        writeln!(
            self.writer,
            "('{CMD_CLEAR}' for clear console, '{CMD_EXIT}' for exit)"
        )?;
        self.writer.flush()?;
        Ok(())
    }

    /// Handle one line of input.
    ///
    /// Query errors are written out and leave the session running. Only
    /// failures to write output are returned.
    pub fn handle_line(&mut self, line: &str) -> Result<SessionState> {
        let conn = match &self.conn {
            Some(conn) => conn,
            None => return Ok(SessionState::Terminated),
        };

        match ShellCommand::parse(line) {
            ShellCommand::Clear => {
                write!(self.writer, "{CLEAR_SCREEN}{CURSOR_HOME}")?;
            }
            ShellCommand::Exit => {
                self.close()?;
                return Ok(SessionState::Terminated);
            }
            ShellCommand::Query(query) => {
                let rendered = self
                    .executor
                    .execute(conn, query)
                    .and_then(|out| out.to_pretty_string());
                match rendered {
                    Ok(text) if text.is_empty() => (),
                    Ok(text) => writeln!(self.writer, "{text}")?,
                    Err(e) => writeln!(self.writer, "{e}")?,
                }
            }
        }

        self.writer.flush()?;
        Ok(SessionState::Running)
    }

    /// Close the connection, terminating the session.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| e)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dictionary::KeywordDictionary;
    use crate::encode::OutputFormat;
    use crate::translate::RewriteMode;

    fn session(executor: QueryExecutor) -> InteractiveSession<Vec<u8>> {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'a');")
            .unwrap();
        InteractiveSession::new(conn, executor, Vec::new())
    }

    fn output(sess: &mut InteractiveSession<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(sess.writer_mut())).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(ShellCommand::Clear, ShellCommand::parse("_clear"));
        assert_eq!(ShellCommand::Exit, ShellCommand::parse("_exit"));
        assert_eq!(ShellCommand::Query(" _exit"), ShellCommand::parse(" _exit"));
        assert!(is_meta_command("_exit"));
        assert!(!is_meta_command("SELECT 1"));
    }

    #[test]
    fn query_then_exit() {
        let mut sess = session(QueryExecutor::default());
        assert_eq!(SessionState::Running, sess.state());

        assert_eq!(SessionState::Running, sess.handle_line("SELECT * FROM t").unwrap());
        assert_eq!("1|a\n", output(&mut sess));

        assert_eq!(SessionState::Terminated, sess.handle_line("_exit").unwrap());
        assert_eq!(SessionState::Terminated, sess.state());

        // Further input is ignored.
        assert_eq!(SessionState::Terminated, sess.handle_line("SELECT 1").unwrap());
        assert_eq!("", output(&mut sess));
    }

    #[test]
    fn errors_keep_running() {
        let mut sess = session(QueryExecutor::default());
        assert_eq!(SessionState::Running, sess.handle_line("SELEKT 1").unwrap());
        assert!(output(&mut sess).contains("syntax error"));

        assert_eq!(SessionState::Running, sess.handle_line("SELECT 2").unwrap());
        assert_eq!("2\n", output(&mut sess));
    }

    #[test]
    fn clear_writes_escape_sequence() {
        let mut sess = session(QueryExecutor::default());
        assert_eq!(SessionState::Running, sess.handle_line("_clear").unwrap());
        assert_eq!("\x1b[2J\x1b[H", output(&mut sess));
    }

    #[test]
    fn json_output_is_pretty() {
        let mut sess = session(QueryExecutor::new(OutputFormat::Json));
        sess.handle_line("SELECT id FROM t").unwrap();
        assert_eq!("[\n  [\n    1\n  ]\n]\n", output(&mut sess));
    }

    #[test]
    fn dictionary_applies() {
        let dict = KeywordDictionary::from_pairs([("PICK", "SELECT")]);
        let executor =
            QueryExecutor::default().with_dictionary(Arc::new(dict), RewriteMode::QuoteAware);
        let mut sess = session(executor);
        sess.handle_line("PICK name FROM t").unwrap();
        assert_eq!("a\n", output(&mut sess));
    }

    #[test]
    fn banner() {
        let mut sess = session(QueryExecutor::default());
        sess.write_banner().unwrap();
        let out = output(&mut sess);
        assert!(out.starts_with("PulseQL "));
        assert!(out.contains("ConsoleMode is running."));
        assert!(out.contains("'_exit' for exit"));
    }
}
