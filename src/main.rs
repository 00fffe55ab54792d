//! pigeoneer-setup CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use pigeoneer_setup::cli::{Cli, CommandDispatcher};
use pigeoneer_setup::installer::EXIT_BLOCKED;
use pigeoneer_setup::shell::is_ci;
use pigeoneer_setup::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Diagnostics go to stderr so they never mix with the summary on stdout.
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pigeoneer_setup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pigeoneer_setup=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("pigeoneer-setup starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    // Handle --no-color
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let base_dir = match cli.dir.clone() {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("✗ Cannot determine the current directory: {}", e);
                return ExitCode::from(EXIT_BLOCKED as u8);
            }
        },
    };

    let mut ui = create_ui(!is_ci(), output_mode);
    let mut dispatcher = CommandDispatcher::new(base_dir);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(EXIT_BLOCKED as u8)
        }
    }
}
