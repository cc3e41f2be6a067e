//! Rosette CLI

use std::{io, process::ExitCode};

use rosette::{cli, config::CliConfig, observability};
use tracing::error;

fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(err) => {
            // Help and version requests also arrive here.
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Observability error: {err}");
        }

        return ExitCode::FAILURE;
    }

    if let Err(err) = cli::run(&config, io::stdout().lock()) {
        error!(error = %err, "command failed");

        #[expect(clippy::print_stderr, reason = "report failures to the user")]
        {
            eprintln!("Error: {err}");
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
