pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "oak")]
#[command(about = "Oak CLI - run the game module's RPCs and hooks against a host database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print the bundled baseline game configuration")]
    Baseline,

    #[command(about = "List or invoke registered RPCs")]
    Rpc {
        #[command(subcommand)]
        cmd: commands::rpc::RpcCommands,
    },

    #[command(about = "Run module hooks")]
    Hook {
        #[command(subcommand)]
        cmd: commands::hook::HookCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Baseline => commands::baseline::handle(output_format).await,
        Commands::Rpc { cmd } => commands::rpc::handle(cmd, output_format).await,
        Commands::Hook { cmd } => commands::hook::handle(cmd, output_format).await,
    }
}
