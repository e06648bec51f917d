mod cli;
mod core;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "uled", about = "OpenAI API usage and cost ledger", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the month's ledger, then report its total cost
    Build {
        /// Target year (default: current)
        #[arg(short, long)]
        year: Option<i32>,

        /// Target month, 1-12 (default: current)
        #[arg(short, long)]
        month: Option<u32>,
    },
    /// Report the total cost recorded for a month
    Summary {
        /// Target year (default: current)
        #[arg(short, long)]
        year: Option<i32>,

        /// Target month, 1-12 (default: current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Include the per-day table
        #[arg(short, long)]
        all: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output_opts = cli::OutputOptions::from_flags(
        cli.json,
        cli.format.as_deref(),
        cli.pretty,
        cli.no_color,
        cli.verbose,
    );

    match cli.command {
        None | Some(Commands::Build { .. }) => {
            let (year, month) = match cli.command {
                Some(Commands::Build { year, month }) => (year, month),
                _ => (None, None),
            };
            cli::build_cmd::run(year, month, &output_opts).await?;
        }
        Some(Commands::Summary { year, month, all }) => {
            cli::summary_cmd::run(year, month, all, &output_opts)?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
            ConfigAction::Path => cli::config_cmd::path(&output_opts)?,
        },
    }

    Ok(())
}
