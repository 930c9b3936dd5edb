//! Prompts sent to the generator.

use crate::generator::{CommentaryRequest, HintRequest};

/// System instruction for commentary: who the host is.
pub const HOST_PERSONA: &str = r#"You are "Gemini", a witty, slightly sarcastic, but ultimately helpful game show host for a Number Guessing Game."#;

/// Build the prompt asking for a one-sentence reaction to a guess.
///
/// Sent together with [`HOST_PERSONA`] as the system instruction.
pub fn build_commentary_prompt(request: &CommentaryRequest) -> String {
    format!(
        r#"## Context
- Difficulty: {difficulty}
- The Secret Number is: {target}
- User just guessed: {guess}
- Result: {status}
- Guesses used so far: {used}
- Guesses remaining: {remaining}

## Task
Generate a short, 1-sentence reaction to the user's guess.
- If they are WAY off, roast them gently.
- If they are close, encourage them (or tease them about being *almost* there).
- If they won, celebrate enthusiastically.
- If they lost (no guesses remaining), offer condolences mixed with a "better luck next time".

## Output Format
Return ONLY a JSON object with two fields:
1. "text": The message string.
2. "emotion": One of ["neutral", "happy", "sarcastic", "surprised", "thinking"]."#,
        difficulty = request.difficulty,
        target = request.target,
        guess = request.guess,
        status = request.status,
        used = request.guesses_used,
        remaining = request.attempts_remaining,
    )
}

/// Build the prompt asking for a cryptic clue that never names the number.
pub fn build_hint_prompt(request: &HintRequest) -> String {
    let guesses = if request.guesses.is_empty() {
        "nothing yet".to_string()
    } else {
        request
            .guesses
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"The secret number is {target}.
The user has guessed: {guesses}.

Give a helpful but cryptic mathematical or logical hint about the number.
Do NOT reveal the number directly.
Keep it under 15 words."#,
        target = request.target,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::game::GuessStatus;

    #[test]
    fn test_commentary_prompt_carries_all_fields() {
        let request = CommentaryRequest {
            difficulty: Difficulty::Hard,
            target: 321,
            guess: 400,
            status: GuessStatus::TooHigh,
            guesses_used: 4,
            attempts_remaining: 11,
        };
        let prompt = build_commentary_prompt(&request);

        assert!(prompt.contains("Difficulty: HARD"));
        assert!(prompt.contains("The Secret Number is: 321"));
        assert!(prompt.contains("User just guessed: 400"));
        assert!(prompt.contains("Result: TOO_HIGH"));
        assert!(prompt.contains("Guesses used so far: 4"));
        assert!(prompt.contains("Guesses remaining: 11"));
        assert!(prompt.contains("\"emotion\""));
        assert!(!prompt.contains(HOST_PERSONA));
    }

    #[test]
    fn test_hint_prompt_lists_guesses() {
        let request = HintRequest {
            target: 64,
            guesses: vec![10, 90, 70],
        };
        let prompt = build_hint_prompt(&request);

        assert!(prompt.contains("The secret number is 64."));
        assert!(prompt.contains("The user has guessed: 10, 90, 70."));
        assert!(prompt.contains("Do NOT reveal the number"));
    }

    #[test]
    fn test_hint_prompt_without_guesses() {
        let prompt = build_hint_prompt(&HintRequest {
            target: 5,
            guesses: vec![],
        });
        assert!(prompt.contains("The user has guessed: nothing yet."));
    }
}
