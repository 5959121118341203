//! Petstore CLI - runs the end-to-end pet scenarios against a deployment.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use petstore_harness::transport::TrafficLevel;

#[derive(Parser)]
#[command(name = "petstore")]
#[command(author, version, about = "End-to-end checks for the Petstore pet API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display version information
    Version,
    /// Run the add -> fetch -> verify -> delete -> absent lifecycle
    Run {
        /// Base URL of the deployment (overrides PETSTORE_BASE_URL)
        #[arg(long, env = "PETSTORE_BASE_URL")]
        base_url: Option<String>,
        /// HTTP traffic log level: none, basic, headers, body
        #[arg(long, env = "PETSTORE_TRAFFIC_LOG")]
        traffic: Option<TrafficLevel>,
        /// Use this pet id instead of a generated one
        #[arg(long)]
        id: Option<i64>,
        /// Emit logs as JSON
        #[arg(long)]
        json_logs: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            print_version();
        }
        Some(Commands::Run {
            base_url,
            traffic,
            id,
            json_logs,
        }) => {
            let options = commands::run::RunOptions {
                base_url,
                traffic,
                id,
                json_logs,
            };
            if let Err(e) = commands::run::execute(options) {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        }
        None => {
            println!();
            println!("  {}", "Petstore end-to-end harness".bold());
            println!();
            println!("Run {} for usage information.", "petstore --help".cyan());
        }
    }
}

fn print_version() {
    println!("petstore-cli {}", env!("CARGO_PKG_VERSION"));
}
