use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use pulseql_core::addr::{DEFAULT_SERVER_ADDR, validate_server_addr};
use pulseql_core::server::DEFAULT_BUFFER_SIZE;
use pulseql_core::translate::RewriteMode;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Activity,
    Json,
}

impl From<LogFormat> for logutil::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Activity => logutil::LogFormat::Activity,
            LogFormat::Json => logutil::LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum RewriteModeArg {
    /// Rewrite every matching word, string literals included.
    Naive,
    /// Leave words inside quoted strings alone.
    #[default]
    QuoteAware,
}

impl From<RewriteModeArg> for RewriteMode {
    fn from(mode: RewriteModeArg) -> Self {
        match mode {
            RewriteModeArg::Naive => RewriteMode::Naive,
            RewriteModeArg::QuoteAware => RewriteMode::QuoteAware,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(name = "PulseQL")]
#[clap(version)]
#[clap(about = "Console and query server for SQLite databases", long_about = None)]
pub struct Cli {
    /// Path of the database file.
    #[clap(
        long = "database",
        visible_alias = "db",
        value_name = "DATABASE_PATH",
        default_value = "database.db",
        env = "PULSEQL_DATABASE"
    )]
    pub database: PathBuf,

    /// Start the interactive console.
    #[clap(short, long)]
    pub console: bool,

    /// Insert a keyword completion immediately when it's the only candidate.
    #[clap(long, visible_alias = "ac")]
    pub console_auto_complete: bool,

    /// Start the query server (default 0.0.0.0:5500).
    #[clap(
        short,
        long,
        value_name = "ADDRESS:PORT",
        num_args = 0..=1,
        default_missing_value = DEFAULT_SERVER_ADDR,
        value_parser = validate_server_addr
    )]
    pub server: Option<SocketAddr>,

    /// Mirror server logs to a file (default logfile.log).
    #[clap(
        long,
        value_name = "FILELOG_PATH",
        num_args = 0..=1,
        default_missing_value = "logfile.log"
    )]
    pub server_file_log: Option<PathBuf>,

    /// Max number of bytes read from a server request.
    #[clap(long, value_name = "BUFFER_SIZE", default_value_t = DEFAULT_BUFFER_SIZE, value_parser = parse_buffer_size)]
    pub server_buffer_size: usize,

    /// Seconds in-flight server requests may run after an interrupt.
    #[clap(long, value_name = "SECONDS", default_value_t = 5)]
    pub server_shutdown_grace: u64,

    /// Encode results as JSON.
    #[clap(short, long)]
    pub json: bool,

    /// Load scripts into the database before starting the console or server.
    #[clap(short = 'f', long = "file", value_name = "PATH.sql", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Dictionary translating alternative keywords to SQL keywords.
    #[clap(short = 'd', long, value_name = "FILE.json")]
    pub dictionary_json: Option<PathBuf>,

    /// How dictionary words are rewritten.
    #[clap(long, value_enum, default_value_t)]
    pub rewrite_mode: RewriteModeArg,

    /// Log verbosity.
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log line format.
    #[clap(long, value_enum, default_value_t)]
    pub log_format: LogFormat,
}

fn parse_buffer_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("buffer size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
