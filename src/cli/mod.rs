//! CLI module for Olympus
//!
//! Provides commands:
//! - `run`: orchestrate one or more tasks through a persona
//! - `analyze`: show the complexity score of a task
//! - `pantheon`: list the available personas

use clap::{Args, Parser, Subcommand};

pub mod analyze;
pub mod pantheon;
pub mod run;

/// Olympus agent hierarchy CLI
#[derive(Parser, Debug)]
#[command(name = "olympus")]
#[command(about = "Safe, bounded delegation between Olympus personas")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Orchestrate tasks through a persona
    Run(RunArgs),
    /// Score a task without running it
    Analyze {
        /// Task description
        task: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// List personas, or show one in detail
    Pantheon {
        /// Persona name
        name: Option<String>,
    },
}

/// Arguments for `olympus run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Task descriptions; several run concurrently
    #[arg(required = true)]
    pub tasks: Vec<String>,
    /// Persona that receives the tasks (defaults to the configured persona)
    #[arg(long, short)]
    pub persona: Option<String>,
    /// Print JSON
    #[arg(long)]
    pub json: bool,
    /// Delegates orchestrate the task again instead of executing it directly
    #[arg(long)]
    pub nested: bool,
    /// Make the simulated backend fail (exercises fallback)
    #[arg(long)]
    pub fail_backend: bool,
    /// Simulated backend latency in milliseconds
    #[arg(long, default_value_t = 50)]
    pub latency_ms: u64,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => {
            let config = crate::config::load_config()?;
            run::run(args, &config).await
        }
        Some(Commands::Analyze { task, json }) => {
            let config = crate::config::load_config()?;
            analyze::run(&task, json, &config)
        }
        Some(Commands::Pantheon { name }) => {
            let config = crate::config::load_config()?;
            pantheon::run(name.as_deref(), &config)
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
