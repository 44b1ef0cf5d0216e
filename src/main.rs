//! Switcheroo - Main entry point
//!
//! Probes the hardware, resolves each component against the compatibility
//! service and the vendor table, and prints a readiness report.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use switcheroo::cli::{Cli, Commands, OutputFormat};
use switcheroo::config::ScanConfig;
use switcheroo::environment::detect_environment;
use switcheroo::hardware::select_query;
use switcheroo::logic::resolver::Resolver;
use switcheroo::pipeline::{self, ScanOutcome};
use switcheroo::report::SystemInfo;
use switcheroo::report::sink;

/// Exit status when the probe found nothing to report on
const EXIT_NO_COMPONENTS: i32 = 2;

/// Initialize the logger with appropriate settings
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    // RUST_LOG overrides the default level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    info!("Switcheroo starting up");
    debug!("CLI arguments parsed");

    if let Some(Commands::Validate { file }) = &cli.command {
        run_validate(file);
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            eprintln!("✗ Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Probe) => run_probe(&config),
        Some(Commands::Env) => {
            println!("{}", detect_environment());
            Ok(())
        }
        Some(Commands::Scan { format, json, text }) => {
            run_scan(&config, format, json.as_deref(), text.as_deref())
        }
        Some(Commands::Validate { .. }) => Ok(()),
        None => run_scan(&config, OutputFormat::Text, None, None),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

/// Load the config file if given, apply CLI overrides, then validate.
fn load_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration file: {:?}", path);
            ScanConfig::load_from_file(path)?
        }
        None => ScanConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run_validate(path: &Path) {
    info!("Validating configuration file: {:?}", path);
    match ScanConfig::load_from_file(path) {
        Ok(config) => match config.validate() {
            Ok(_) => {
                info!("Configuration validation successful");
                println!("✓ Configuration file is valid: {:?}", path);
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to load configuration file: {:#}", e);
            eprintln!("✗ Failed to load configuration file: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_probe(config: &ScanConfig) -> Result<()> {
    let query = select_query(config.strategy)?;
    let components = pipeline::inventory(query.as_ref());
    if components.is_empty() {
        eprintln!("✗ No components detected via {}", query.name());
        std::process::exit(EXIT_NO_COMPONENTS);
    }
    for component in &components {
        println!("{}", component);
    }
    Ok(())
}

fn run_scan(
    config: &ScanConfig,
    format: OutputFormat,
    json_path: Option<&Path>,
    text_path: Option<&Path>,
) -> Result<()> {
    let query = select_query(config.strategy)?;
    let table = config
        .load_vendor_table()
        .context("Failed to load vendor table")?;
    let mut resolver = Resolver::new(config.compatibility_source(), table);

    let outcome = pipeline::scan(query.as_ref(), &mut resolver, SystemInfo::collect());
    let no_components = matches!(outcome, ScanOutcome::NoComponents(_));
    let report = outcome.into_report();

    match format {
        OutputFormat::Text => print!("{}", sink::render_text(&report)),
        OutputFormat::Json => println!("{}", sink::to_json(&report)?),
    }

    if let Some(path) = json_path {
        sink::save_json(&report, path)?;
        info!("JSON report saved to {:?}", path);
    }
    if let Some(path) = text_path {
        sink::save_text(&report, path)?;
        info!("Text report saved to {:?}", path);
    }

    if no_components {
        eprintln!("✗ No components detected");
        std::process::exit(EXIT_NO_COMPONENTS);
    }
    Ok(())
}
