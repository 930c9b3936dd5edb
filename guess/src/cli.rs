//! Command-line interface for the guess binary.

use clap::Parser;
use guess_core::Difficulty;

/// Guessmaster - guess the number while an AI host heckles you
#[derive(Parser, Debug)]
#[command(name = "guess")]
#[command(about = "Number guessing game with an AI game-show host", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Starting difficulty (easy, medium, hard, insane)
    #[arg(short, long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Gemini model used for the host
    #[arg(long)]
    pub model: Option<String>,

    /// Never call the generator, even if a key is configured
    #[arg(long)]
    pub offline: bool,

    /// Seed for target selection (repeatable games)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["guess"]);
        assert_eq!(cli.difficulty, Difficulty::Medium);
        assert!(!cli.offline);
        assert!(cli.seed.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["guess", "-d", "INSANE", "--offline", "--seed", "7"]);
        assert_eq!(cli.difficulty, Difficulty::Insane);
        assert!(cli.offline);
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_bad_difficulty_rejected() {
        assert!(Cli::try_parse_from(["guess", "--difficulty", "nightmare"]).is_err());
    }
}
