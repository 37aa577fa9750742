//! Replay CLI
//!
//! Runs recorded snapshots through the tactical core and prints the chosen
//! actions or the intercept table.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ss2d_replay")]
#[command(about = "Replay recorded snapshots through the tactical core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Decide actions for one request or a sequence of cycles
    Decide {
        /// Request JSON file (object or array)
        #[arg(long)]
        r#in: PathBuf,

        /// Print the full response JSON instead of a summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print reach cycles for every actor
    Reach {
        /// Request JSON file
        #[arg(long)]
        r#in: PathBuf,

        /// Index of the request when the file holds a sequence
        #[arg(long, default_value = "0")]
        index: usize,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide { r#in, json } => {
            tracing::info!(path = %r#in.display(), "replaying");
            let requests = ss2d_replay::load_requests(&r#in)?;
            let responses = ss2d_replay::replay(&requests)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&responses)?);
            } else {
                for (request, response) in requests.iter().zip(&responses) {
                    let family = response.family.map_or("fallback", |f| f.label());
                    println!("cycle {} [{}]", request.snapshot.cycle, family);
                    for action in &response.actions {
                        println!("   {}", serde_json::to_string(action)?);
                    }
                }
            }
        }

        Commands::Reach { r#in, index } => {
            let requests = ss2d_replay::load_requests(&r#in)?;
            let Some(request) = requests.get(index) else {
                anyhow::bail!("request index {} out of range ({} loaded)", index, requests.len());
            };
            println!("cycle {}", request.snapshot.cycle);
            for row in ss2d_replay::reach_report(request)? {
                let marker = if row.unreachable { " (unreachable)" } else { "" };
                println!("   {:<12} {:>4}{}", row.actor, row.cycles, marker);
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ss2d_replay CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
