//! GraphCanvas CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use graphcanvas_cli::{Args, error_adapter};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match graphcanvas_cli::run(&args) {
        Ok(()) => {
            info!(output_file = args.output; "Render finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(input_path = args.input; "Render failed");
            error!("{}", error_adapter::render_report(&err));
            ExitCode::FAILURE
        }
    }
}

/// Installs `env_logger`, falling back to `warn` for unknown level names.
fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or_else(|_| {
        eprintln!("Unknown log level `{level}`, logging warnings only");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
}
