use anyhow::Context;
use clap::Parser;
use fcm::config::{LoggingConfig, MigratorConfig, load_config};
use fcm_cli::{Cli, Terminal, run};
use fcm_logger::{Logger, parse_level, verbosity};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config: MigratorConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cli, &config.logging)?;

    let stdin = std::io::stdin();
    let mut terminal =
        Terminal { input: stdin.lock(), output: std::io::stdout(), error: std::io::stderr() };

    run(&cli, &config, &mut terminal)
}

/// Command-line verbosity flags win over the configured level.
fn init_logger(cli: &Cli, logging: &LoggingConfig) -> anyhow::Result<Logger> {
    let level = if cli.quiet || cli.verbose > 0 {
        verbosity(cli.quiet, cli.verbose)
    } else {
        parse_level(&logging.level)?
    };

    let builder = Logger::builder().name(env!("CARGO_BIN_NAME")).level(level);
    let logger = match &logging.directory {
        Some(directory) => {
            let builder = builder.path(directory).max_files(logging.max_files);
            if logging.json { builder.json().init() } else { builder.init() }
        },
        None => builder.init(),
    }?;

    Ok(logger)
}
