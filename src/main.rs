use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use auto_library::{logging, Config, LibraryLocator};

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { config_path: Option<PathBuf> },
    Help,
    Version,
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--config" | "-c" => {
                let path = args.next().context("--config requires a path argument")?;
                config_path = Some(PathBuf::from(path));
            }
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok(Command::Run { config_path })
}

fn print_help() {
    println!(
        r#"auto-library - locate or create the Calibre library and record its location

USAGE:
    auto-library [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    AUTO_LIBRARY_CONFIG Path to config file (overrides default location)
    AUTO_LIBRARY_LOG    Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/auto-library/config.toml

Exits 0 once dirs.json and the Calibre-Web settings database both point
at the library, 1 on any failure."#
    );
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    }
}

fn main() -> ExitCode {
    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run { config_path }) => config_path,
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("auto-library {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[auto-library] ERROR: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("[auto-library] ERROR: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let locator = LibraryLocator::new(config);
    match locator.run() {
        Ok(library_dir) => {
            info!(
                "Library location successfully set to: {}",
                library_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(stage = %e.stage(), "{}", e);
            ExitCode::FAILURE
        }
    }
}
