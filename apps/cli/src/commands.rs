//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tildegen_core::pipeline::{self, GenerateResult};
use tildegen_core::render::renderer_for_name;
use tildegen_discovery::AccountSource;
use tildegen_shared::{
    AccountEntry, AppConfig, CONFIG_LOCATIONS, TracingReporter, init_config, load_config,
    resolve_config_path,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// tildegen — publish the list of tilde users on this host.
#[derive(Parser)]
#[command(
    name = "tildegen",
    version,
    about = "Generate a JSON/YAML/text listing of the tilde users on this host.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to /etc/tildegen.toml, then /usr/local/etc/tildegen.toml).
    #[arg(short, long, env = "TILDEGEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `generate`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write the listing to every configured output.
    Generate {
        /// Render only this format to standard output instead.
        #[arg(long, value_name = "FORMAT")]
        stdout: Option<String>,
    },

    /// Show which users would be listed.
    Users,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Where to write it (defaults to /etc/tildegen.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["tildegen", "tildegen_core", "tildegen_discovery", "tildegen_shared"]
        .map(|target| format!("{target}={level}"))
        .join(",");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command.unwrap_or(Command::Generate { stdout: None }) {
        Command::Generate { stdout } => cmd_generate(config_path, stdout.as_deref()),
        Command::Users => cmd_users(config_path),
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(path.as_deref().or(config_path)),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config and the account database it points at.
fn load_inputs(config_path: Option<&Path>) -> Result<(AppConfig, Vec<AccountEntry>)> {
    let config = load_config(config_path)?;
    let accounts = AccountSource::from_override(config.users.passwd_file.as_deref()).load()?;
    Ok((config, accounts))
}

fn cmd_generate(config_path: Option<&Path>, stdout: Option<&str>) -> Result<()> {
    let (config, accounts) = load_inputs(config_path)?;

    if let Some(format) = stdout {
        let renderer = renderer_for_name(format, &config)?;
        let document = pipeline::build_document(&config, &accounts, &TracingReporter);
        println!("{}", renderer.render(&document)?);
        return Ok(());
    }

    if config.output.is_empty() {
        warn!("no [output] entries configured, nothing to write");
    }

    let result = pipeline::generate(&config, &accounts, &TracingReporter)?;
    print_summary(&result);

    if !result.failed.is_empty() && result.outputs.is_empty() {
        return Err(eyre!(
            "every output failed: {}",
            result.failed.join(", ")
        ));
    }

    Ok(())
}

fn print_summary(result: &GenerateResult) {
    println!();
    println!("  Users:   {}", result.user_count);
    for output in &result.outputs {
        println!(
            "  {:<8} {} ({} bytes, sha256 {})",
            format!("{}:", output.format),
            output.path.display(),
            output.size_bytes,
            output.sha256
        );
    }
    if !result.failed.is_empty() {
        println!("  Failed:  {}", result.failed.join(", "));
    }
    println!("  Time:    {:.2}s", result.elapsed.as_secs_f64());
    println!();
}

fn cmd_users(config_path: Option<&Path>) -> Result<()> {
    let (config, accounts) = load_inputs(config_path)?;
    let document = pipeline::build_document(&config, &accounts, &TracingReporter);

    println!("{:<20} {:>12}  TITLE", "USER", "MTIME");
    for user in document.users() {
        println!(
            "{:<20} {:>12}  {}",
            user.username,
            user.mtime,
            user.title.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!("{} user(s) listed", document.user_count());

    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let target = path.unwrap_or_else(|| Path::new(CONFIG_LOCATIONS[0]));
    let written = init_config(target)?;
    println!("Config file created at: {}", written.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    match resolve_config_path(config_path) {
        Some(path) => info!(path = %path.display(), "using config file"),
        None => info!("no config file found, showing defaults"),
    }
    let config = load_config(config_path)?;
    let content = toml::to_string_pretty(&config)?;
    println!("{content}");
    Ok(())
}
