pub mod api_client;
mod commands;
pub mod error;
mod utils;

#[cfg(test)]
mod utils_test;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskbridge")]
#[command(author, version, about = "Taskbridge gateway CLI", long_about = None)]
pub struct Cli {
    /// Override the gateway URL (default: TASKBRIDGE_GATEWAY_URL env or http://localhost:3010)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List callable functions
    Functions {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Call a function
    Call {
        /// Function name, e.g. getTasks
        name: String,
        /// Parameters as a JSON object
        #[arg(long)]
        params: Option<String>,
    },
    /// Show gateway and upstream health
    Health,
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let api_client = api_client::ApiClient::new(cli.api_url);

    let output = match cli.command {
        Some(Commands::Functions { format }) => {
            commands::functions::list_functions(&api_client, &format).await?
        }
        Some(Commands::Call { name, params }) => {
            commands::functions::call_function(&api_client, &name, params.as_deref()).await?
        }
        Some(Commands::Health) => commands::functions::health(&api_client).await?,
        None => {
            // Show help when no command provided
            let _ = Cli::parse_from(["taskbridge", "--help"]);
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}
