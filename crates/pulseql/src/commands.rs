use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use clap::CommandFactory;
use pulseql_core::bulk::BulkLoader;
use pulseql_core::dictionary::KeywordDictionary;
use pulseql_core::encode::OutputFormat;
use pulseql_core::executor::QueryExecutor;
use pulseql_core::server::{QueryServer, ServerConfig};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

use crate::args::Cli;
use crate::local::LocalShell;

impl Cli {
    /// Whether this invocation ends up serving requests.
    pub fn is_server(&self) -> bool {
        self.server.is_some() && !self.console
    }

    /// Run the requested modes. Files are always loaded first, then the
    /// console takes precedence over the server.
    pub fn run(self) -> Result<()> {
        let executor = self.build_executor()?;

        if !self.files.is_empty() {
            load_files(&self.database, &self.files)?;
        }

        if self.console {
            let shell = LocalShell::open(&self.database, executor, self.console_auto_complete)?;
            return shell.run();
        }

        if let Some(addr) = self.server {
            let conf = ServerConfig::new(&self.database, executor)
                .with_buffer_size(self.server_buffer_size)
                .with_shutdown_grace(Duration::from_secs(self.server_shutdown_grace));

            let runtime = build_runtime("server")?;
            return runtime.block_on(async move {
                let server = QueryServer::bind(addr, conf).await?;
                server.serve().await?;
                Ok(())
            });
        }

        if self.files.is_empty() {
            Cli::command().print_help()?;
        }
        Ok(())
    }

    fn build_executor(&self) -> Result<QueryExecutor> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Native
        };

        let dictionary = match &self.dictionary_json {
            Some(path) => Some(Arc::new(KeywordDictionary::load(path)?)),
            None => None,
        };

        Ok(QueryExecutor::new(format).with_dictionary_opt(dictionary, self.rewrite_mode.into()))
    }
}

fn load_files(db_path: &Path, files: &[impl AsRef<Path>]) -> Result<()> {
    let loader = BulkLoader::open(db_path)?;
    let report = loader.load_files(files)?;
    loader.close()?;

    for failure in &report.failures {
        println!("{failure}");
    }
    if report.is_clean() {
        info!(executed = report.executed, "files loaded");
    } else {
        warn!(
            executed = report.executed,
            failed = report.failures.len(),
            "files loaded with failures"
        );
    }
    Ok(())
}

fn build_runtime(thread_label: &'static str) -> Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .thread_name_fn(move || {
            static THREAD_ID: AtomicU64 = AtomicU64::new(0);
            let id = THREAD_ID.fetch_add(1, Ordering::Relaxed);
            format!("{}-thread-{}", thread_label, id)
        })
        .enable_all()
        .build()?;

    Ok(runtime)
}
