//! shortmatch CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::grade::OutputFormat;

#[derive(Parser)]
#[command(
    name = "shortmatch",
    version,
    about = "Regex short-answer grading"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one answer
    Grade {
        /// Path to a .json or .toml problem definition
        #[arg(long)]
        definition: PathBuf,

        /// The answer text to grade
        #[arg(long, allow_hyphen_values = true)]
        answer: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a file of submissions
    Batch {
        /// Path to a .json or .toml problem definition
        #[arg(long)]
        definition: PathBuf,

        /// JSON array or JSON Lines file of {"id", "answer"} objects
        #[arg(long)]
        submissions: PathBuf,

        /// Max concurrent gradings (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate problem definition files
    Validate {
        /// Path to a definition file or directory
        #[arg(long)]
        definition: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example definition
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shortmatch=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            definition,
            answer,
            format,
            config,
        } => commands::grade::execute(definition, answer, format, config),
        Commands::Batch {
            definition,
            submissions,
            parallelism,
            output,
            config,
        } => commands::batch::execute(definition, submissions, parallelism, output, config).await,
        Commands::Validate { definition, config } => {
            commands::validate::execute(definition, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
