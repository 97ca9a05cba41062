use anyhow::Result;
use clap::Parser;
use pulseql::args::Cli;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (base, log_file) = if cli.is_server() {
        (Level::INFO, cli.server_file_log.as_deref())
    } else {
        (Level::WARN, None)
    };
    logutil::init(
        logutil::level_for_verbosity(base, cli.verbose),
        cli.log_format.into(),
        log_file,
    )?;

    cli.run()
}
