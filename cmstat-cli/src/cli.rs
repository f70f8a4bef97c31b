use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "cmstat",
    author,
    version,
    about = "Poll a cable modem's status page and show its channel metrics",
    long_about = None
)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "CMSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Request timeout in seconds (overrides the configuration file)
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the status page once and print the readings
    Status {
        /// Modem host or IP address
        #[arg(long, env = "CMSTAT_HOST")]
        host: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Poll the modem on a fixed interval until interrupted
    Watch {
        /// Modem host or IP address
        #[arg(long, env = "CMSTAT_HOST")]
        host: Option<String>,

        /// Poll interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Probe the usual modem addresses for a supported modem
    Discover {
        /// Store the first modem found as the configured host
        #[arg(long)]
        save: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Show or change the configuration
    Config {
        /// Print the current configuration
        #[arg(long)]
        show: bool,

        /// Restore the default configuration
        #[arg(long)]
        reset: bool,

        /// Set the modem host
        #[arg(long, value_name = "HOST")]
        set_host: Option<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human readable, colored
    #[default]
    Pretty,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    /// Tables
    Table,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonCompact)
    }
}
