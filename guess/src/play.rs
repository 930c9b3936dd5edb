//! The game loop.
//!
//! A simple line-oriented protocol:
//! - A whole number is a guess
//! - Lines starting with `#` are commands (hint, new, difficulty, status, history, quit)
//! - Everything printed is either host narration or game state

use guess_core::difficulty::UnknownDifficulty;
use guess_core::{parse_guess, AiState, Difficulty, GameShow, GuessInputError, GuessStatus, Outcome};
use std::io::{self, BufRead, Write};

const HELP: &[&str] = &[
    "  <number>            - Make a guess",
    "  #hint               - Ask the host for a hint",
    "  #new                - Start a new game",
    "  #difficulty <name>  - Switch difficulty (easy, medium, hard, insane) and restart",
    "  #status             - Show attempts left and range",
    "  #history            - Show your guesses, newest first",
    "  #help               - Show this help",
    "  #quit               - Exit the game",
];

/// One line of player input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Guess(i64),
    Invalid(GuessInputError),
    Hint,
    NewGame,
    SetDifficulty(Result<Difficulty, UnknownDifficulty>),
    Status,
    History,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let Some(rest) = line.strip_prefix('#') else {
            return match parse_guess(line) {
                Ok(value) => Command::Guess(value),
                Err(e) => Command::Invalid(e),
            };
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        match parts.first().copied() {
            Some("hint") => Command::Hint,
            Some("new") | Some("reset") => Command::NewGame,
            Some("difficulty") => Command::SetDifficulty(
                parts
                    .get(1)
                    .copied()
                    .unwrap_or_default()
                    .parse::<Difficulty>(),
            ),
            Some("status") => Command::Status,
            Some("history") => Command::History,
            Some("help") => Command::Help,
            Some("quit") | Some("exit") => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Run the game until `#quit` or end of input.
pub async fn run<R: BufRead, W: Write>(mut show: GameShow, input: R, mut out: W) -> io::Result<()> {
    writeln!(out, "=== Guessmaster ===")?;
    print_host(&mut out, &AiState::welcome())?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    for line in HELP {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    print_status(&mut out, &show)?;
    print_host(&mut out, show.ai())?;
    out.flush()?;

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            Command::Guess(value) => play_guess(&mut show, value, &mut out).await?,
            Command::Invalid(e) => {
                writeln!(out, "[{}] {e}", GuessStatus::Invalid)?;
            }
            Command::Hint => {
                if show.session().is_over() {
                    writeln!(out, "[ERROR] The game is over. Type #new to play again.")?;
                } else {
                    write!(out, "[THINKING]")?;
                    out.flush()?;
                    show.request_hint().await;
                    write!(out, "\r            \r")?;
                    print_host(&mut out, show.ai())?;
                }
            }
            Command::NewGame => {
                show.new_game();
                print_status(&mut out, &show)?;
                print_host(&mut out, show.ai())?;
            }
            Command::SetDifficulty(Ok(difficulty)) => {
                show.set_difficulty(difficulty);
                print_status(&mut out, &show)?;
                print_host(&mut out, show.ai())?;
            }
            Command::SetDifficulty(Err(e)) => {
                writeln!(out, "[ERROR] {e}")?;
            }
            Command::Status => print_status(&mut out, &show)?,
            Command::History => print_history(&mut out, &show)?,
            Command::Help => {
                writeln!(out, "[HELP]")?;
                for line in HELP {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Unknown(_) => {
                writeln!(out, "[ERROR] Unknown command. Type #help for help.")?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

async fn play_guess<W: Write>(show: &mut GameShow, value: i64, out: &mut W) -> io::Result<()> {
    let Some(ticket) = show.guess(value) else {
        writeln!(out, "[ERROR] The game is over. Type #new to play again.")?;
        return Ok(());
    };

    writeln!(
        out,
        "[GUESS] {} -> {} ({} left)",
        ticket.record.value,
        ticket.record.status,
        show.attempts_remaining()
    )?;
    write!(out, "[THINKING]")?;
    out.flush()?;

    let commentary = show.resolve_guess(&ticket).await;
    show.apply_commentary(&ticket, commentary);

    write!(out, "\r            \r")?;
    print_host(out, show.ai())?;

    match show.session().outcome() {
        Outcome::Won => writeln!(
            out,
            "[WON] {} in {} guesses! Type #new to play again.",
            show.session().target(),
            show.session().attempts_used()
        )?,
        Outcome::Lost => writeln!(
            out,
            "[LOST] The number was {}. Type #new to play again.",
            show.session().target()
        )?,
        Outcome::InProgress => {}
    }

    Ok(())
}

fn print_host<W: Write>(out: &mut W, ai: &AiState) -> io::Result<()> {
    writeln!(out, "[HOST {}] {}", ai.emotion.face(), ai.message)
}

fn print_status<W: Write>(out: &mut W, show: &GameShow) -> io::Result<()> {
    let session = show.session();
    writeln!(out, "[STATUS]")?;
    writeln!(out, "  Difficulty: {}", session.difficulty())?;
    writeln!(out, "  Range: 1 - {}", session.config().max)?;
    writeln!(out, "  Attempts left: {}", show.attempts_remaining())?;
    if let Some(target) = show.revealed_target() {
        writeln!(out, "  The number was: {target}")?;
    }
    Ok(())
}

fn print_history<W: Write>(out: &mut W, show: &GameShow) -> io::Result<()> {
    let history = show.session().history();
    if history.is_empty() {
        return writeln!(out, "[HISTORY] No guesses yet.");
    }
    writeln!(out, "[HISTORY]")?;
    for (i, record) in history.iter().enumerate().rev() {
        writeln!(
            out,
            "  #{:<3} {:>6}  {}",
            i + 1,
            record.value,
            record.status
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use guess_core::GameSession;

    async fn transcript(show: GameShow, input: &str) -> String {
        let mut out = Vec::new();
        run(show, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    fn offline_show(difficulty: Difficulty, target: i64) -> GameShow {
        let mut show = GameShow::offline();
        show.load_session(GameSession::with_target(difficulty, target).unwrap());
        show
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("42"), Command::Guess(42));
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse("#hint"), Command::Hint);
        assert_eq!(Command::parse("#new"), Command::NewGame);
        assert_eq!(Command::parse("#quit"), Command::Quit);
        assert_eq!(
            Command::parse("#difficulty hard"),
            Command::SetDifficulty(Ok(Difficulty::Hard))
        );
        assert!(matches!(
            Command::parse("#difficulty"),
            Command::SetDifficulty(Err(_))
        ));
        assert!(matches!(Command::parse("abc"), Command::Invalid(_)));
        assert!(matches!(Command::parse("#dance"), Command::Unknown(_)));
    }

    #[tokio::test]
    async fn test_win_transcript() {
        let out = transcript(offline_show(Difficulty::Easy, 27), "10\n40\n27\n#quit\n").await;
        assert!(out.contains("[GUESS] 10 -> TOO_LOW (9 left)"));
        assert!(out.contains("[GUESS] 40 -> TOO_HIGH (8 left)"));
        assert!(out.contains("[GUESS] 27 -> CORRECT (7 left)"));
        assert!(out.contains("[WON] 27 in 3 guesses!"));
        assert!(out.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_invalid_input_does_not_count() {
        let out = transcript(offline_show(Difficulty::Easy, 27), "banana\n#status\n").await;
        assert!(out.contains("[INVALID] 'banana' is not a whole number"));
        assert!(out.contains("Attempts left: 10"));
    }

    #[tokio::test]
    async fn test_loss_transcript_reveals_number() {
        let input = "1\n".repeat(10) + "5\n";
        let out = transcript(offline_show(Difficulty::Medium, 50), &input).await;
        assert!(out.contains("Game Over! The number was 50."));
        assert!(out.contains("[LOST] The number was 50."));
        assert!(out.contains("[ERROR] The game is over."));
    }

    #[tokio::test]
    async fn test_difficulty_switch_restarts() {
        let out = transcript(offline_show(Difficulty::Easy, 27), "3\n#difficulty insane\n#history\n").await;
        assert!(out.contains("Range: 1 - 1000"));
        assert!(out.contains("[HISTORY] No guesses yet."));
    }
}
