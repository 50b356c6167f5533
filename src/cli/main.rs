use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

mod config;
use config::Config;

use mprisctl::dispatcher::write_command_list;
use mprisctl::{Invocation, Selector, SessionBus};

#[derive(Parser)]
#[command(name = "mprisctl")]
#[command(about = "Command line client for MPRIS2 compatible media players")]
#[command(version)]
struct Args {
    /// Player command to execute, or "services" to list players
    #[arg(default_value = "status")]
    command: String,

    /// Arguments for the command, if any
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,

    /// Use the Nth MPRIS2 service, or the one whose bus name ends with SERVICE
    #[arg(short, long, value_name = "SERVICE", allow_hyphen_values = true)]
    service: Option<String>,

    /// Enable extra output
    #[arg(short, long)]
    verbose: bool,

    /// List supported commands, then exit
    #[arg(long)]
    commands: bool,

    /// Output format
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

impl From<OutputFormat> for mprisctl::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => mprisctl::OutputFormat::Human,
            OutputFormat::Json => mprisctl::OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.commands {
        let stdout = io::stdout();
        return match write_command_list(&mut stdout.lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", anyhow::Error::from(e));
                ExitCode::FAILURE
            }
        };
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => default_config_path(std::env::var("HOME").ok().as_deref()),
    };
    let config = Config::load(config_path.as_deref())?;

    // Initialize logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level()
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Starting mprisctl v{}", mprisctl::VERSION);
    if let Some(path) = &config_path {
        debug!("Loaded configuration from {}", path.display());
    }

    let invocation = build_invocation(args, &config);
    let bus = SessionBus::connect(Duration::from_millis(config.bus.timeout_ms))
        .context("Failed to connect to the D-Bus session bus")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    mprisctl::run(&invocation, &bus, &mut out)?;
    out.flush().context("Failed to flush output")?;
    Ok(())
}

/// The `-s` flag wins over the configured default service
fn build_invocation(args: &Args, config: &Config) -> Invocation {
    let selector = args
        .service
        .as_deref()
        .or(config.player.default_service.as_deref())
        .map(Selector::parse)
        .unwrap_or_default();

    Invocation {
        selector,
        command: args.command.clone(),
        args: args.args.clone(),
        verbose: args.verbose,
        format: args.format.into(),
    }
}

/// The default config file, if it exists. It is optional, so an unknown
/// home directory just means there is none.
fn default_config_path(home: Option<&str>) -> Option<PathBuf> {
    expand_path(mprisctl::DEFAULT_CONFIG_PATH, home)
        .ok()
        .filter(|path| path.exists())
}

fn expand_path(path: &str, home: Option<&str>) -> Result<PathBuf> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = home.context("HOME environment variable not set")?;
            Ok(Path::new(home).join(rest.trim_start_matches('/')))
        }
        None => Ok(PathBuf::from(path)),
    }
}
