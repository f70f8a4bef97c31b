mod cli;
mod commands;
mod config;
mod discovery;
mod error;
mod output;
mod readings;

use crate::{
    cli::{Args, Commands, OutputFormat},
    commands::CommandExecutor,
    config::AppConfig,
    error::Result,
};
use clap::Parser;
use colored::*;
use std::process;
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let output_format = match &args.command {
        Commands::Status { output, .. }
        | Commands::Watch { output, .. }
        | Commands::Discover { output, .. } => *output,
        _ => None,
    };

    if let Err(e) = run(args).await {
        if output_format.is_some_and(OutputFormat::is_json) {
            let error_json = serde_json::json!({
                "status": "error",
                "message": e.to_string(),
            });
            println!("{error_json}");
        } else {
            error!("Application error: {}", e);
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet);

    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout.max(1);
    }

    let executor = CommandExecutor::new(config, args.config, !args.no_color);

    match args.command {
        Commands::Status { host, output } => executor.status(host, output).await?,

        Commands::Watch {
            host,
            interval,
            output,
        } => executor.watch(host, interval, output).await?,

        Commands::Discover { save, output } => executor.discover(save, output).await?,

        Commands::Config {
            show,
            reset,
            set_host,
        } => executor.config(show, reset, set_host)?,

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Logs go to stderr so that JSON on stdout stays machine readable.
fn init_logging(verbose: bool, quiet: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, quiet, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// `--quiet` and `--verbose` win over `RUST_LOG`, which falls back to info
/// when unset or invalid.
fn log_filter(verbose: bool, quiet: bool, rust_log: Option<&str>) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}
