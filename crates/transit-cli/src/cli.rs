use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "transit",
    about = "Transit: explore the forest of in-flight transfers",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a script of forest operations and print each outcome
    Replay(ReplayArgs),
    /// Show the ancestors a path is linked through, nearest first
    Ancestors(AncestorsArgs),
    /// Print the effective forest configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Script to replay; read from stdin when omitted
    pub script: Option<PathBuf>,
    /// TOML file with the forest configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct AncestorsArgs {
    /// Remote paths, e.g. /docs/report.txt
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML file with the forest configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
