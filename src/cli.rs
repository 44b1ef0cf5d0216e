use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ScanConfig;
use crate::types::ProbeStrategy;

/// Switcheroo - will my hardware work on Linux?
#[derive(Parser)]
#[command(name = "switcheroo")]
#[command(about = "Inventory this machine's hardware and estimate how well it will run Linux")]
#[command(version)]
pub struct Cli {
    /// Configuration file (JSON) to start from
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip remote lookups and use the vendor table only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Base URL of the compatibility service
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Remote lookup timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Hardware query backend
    #[arg(long, global = true, value_enum)]
    pub strategy: Option<ProbeStrategy>,

    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe, resolve and print a compatibility report (default)
    Scan {
        /// Output format on stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also save the JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Also save the text report to this file
        #[arg(long)]
        text: Option<PathBuf>,
    },
    /// List detected components without resolving them
    Probe,
    /// Show the detected run environment
    Env,
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(value_name = "CONFIG")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Apply command line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ScanConfig) {
        if self.offline {
            config.offline = true;
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
    }
}
