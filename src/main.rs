use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use lockscan::{
    config::Config,
    lockfile::{self, LockfileKind},
    logging::init_logging,
    model::LintReport,
    output::{format_result_to_string, print_result, OutputFormat},
    validator::{InternalSshExternalHttpsValidator, ValidateOptions},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VIOLATIONS: u8 = 2;
}

#[derive(Parser)]
#[command(name = "lockscan")]
#[command(
    author,
    version,
    about = "Check lockfile resolved URLs against an internal-ssh / external-https policy"
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the resolved URLs of a lockfile
    Lint {
        /// Lockfile to check
        #[arg(short, long, default_value = "package-lock.json")]
        path: PathBuf,

        /// Lockfile type (npm, yarn); detected from the file name if omitted
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Organization whose packages must use git+ssh
        #[arg(long)]
        org: Option<String>,

        /// Host the organization's repositories live on (default: github.com)
        #[arg(long)]
        internal_host: Option<String>,

        /// Output format (table, json, sarif)
        #[arg(short, long)]
        format: Option<String>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = Config::load()?;

    match cli.command {
        Commands::Lint {
            path,
            kind,
            org,
            internal_host,
            format,
            output,
        } => run_lint(&config, path, kind, org, internal_host, format, output),
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_lint(
    config: &Config,
    path: PathBuf,
    kind: Option<String>,
    org: Option<String>,
    internal_host: Option<String>,
    format: Option<String>,
    output_file: Option<PathBuf>,
) -> Result<u8> {
    let format_str = format.unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow!(e))?;

    let kind = kind
        .map(|k| LockfileKind::from_str(&k))
        .transpose()
        .map_err(|e| anyhow!(e))?;

    let org_name = org
        .or_else(|| config.org_name.clone())
        .context("No organization given. Pass --org or set org_name in the config file")?;

    let options = match internal_host {
        Some(host) => ValidateOptions::with_internal_host(host),
        None => config.validate_options(),
    };

    let mut packages = lockfile::load(&path, kind)?;

    let total = packages.len();
    packages.retain(|name| !config.ignore.should_ignore_package(name));
    if packages.len() != total {
        tracing::info!(ignored = total - packages.len(), "skipping ignored packages");
    }

    let checked = packages.len();
    let validator = InternalSshExternalHttpsValidator::new(packages);
    let result = validator.validate(&org_name, &options);

    tracing::debug!(
        org = %org_name,
        internal_host = options.internal_host(),
        checked,
        violations = result.errors().len(),
        "lint finished"
    );

    let report = LintReport::new(
        path.display().to_string(),
        org_name,
        options.internal_host(),
        checked,
        result,
    );

    if let Some(out) = output_file {
        let content = format_result_to_string(&report, format)?;
        std::fs::write(&out, content)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        if format == OutputFormat::Table {
            println!("Results written to: {}", out.display());
        }
    } else {
        print_result(&report, format)?;
    }

    if report.result.is_success() {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::VIOLATIONS)
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'lockscan config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
