//! Guessmaster terminal front end.
//!
//! A line-oriented interface: type a number to guess, or a `#command`.
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run -p guess -- --difficulty hard
//! ```

mod cli;
mod play;

use clap::Parser;
use cli::Cli;
use guess_core::{GameShow, GeneratorConfig};
use std::io;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so the game transcript on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if cli.offline {
        GeneratorConfig::offline()
    } else {
        GeneratorConfig::from_env()
    };
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    if !config.has_credential() && !cli.offline {
        eprintln!("Note: GEMINI_API_KEY is not set; the host will use canned lines.");
    }

    let mut show = GameShow::new(&config);
    if let Some(seed) = cli.seed {
        show = show.with_seed(seed);
    }
    let show = show.with_difficulty(cli.difficulty);

    let stdin = io::stdin();
    play::run(show, stdin.lock(), io::stdout()).await?;

    Ok(())
}
