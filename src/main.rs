use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use superthanks::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for superthanks::AppCommand {
    fn from(cmd: Commands) -> superthanks::AppCommand {
        use superthanks::AppCommand;
        match cmd {
            Commands::Analyze { captures } => AppCommand::Analyze { captures },
            Commands::Stats { video } => AppCommand::Stats { video },
            Commands::Videos => AppCommand::Videos,
            Commands::Tips { video } => AppCommand::Tips { video },
            Commands::Currencies => AppCommand::Currencies,
            Commands::Rates => AppCommand::Rates,
            Commands::Parse { text } => AppCommand::Parse { text },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Resolve and store the Super Thanks of one or more page captures
    Analyze {
        /// JSON page captures written by the scraper
        #[arg(required = true)]
        captures: Vec<PathBuf>,
    },
    /// Display database statistics
    Stats {
        /// Video URL or id to include per-video figures for
        video: Option<String>,
    },
    /// List stored videos
    Videos,
    /// List the Super Thanks of a video
    Tips {
        /// Video URL or id
        video: String,
    },
    /// Display totals per currency
    Currencies,
    /// Display the conversion rate table
    Rates,
    /// Resolve a single price text, e.g. "US$ 5.00"
    Parse { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => superthanks::cli::setup::setup(),
        Some(cmd) => superthanks::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
