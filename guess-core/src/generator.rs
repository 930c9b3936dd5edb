//! The external text generator behind the AI host.
//!
//! [`Generator`] is the capability the commentary and hint clients are
//! built on. [`GeminiGenerator`] talks to the Gemini API; tests use
//! [`crate::testing::MockGenerator`] instead.
//!
//! Generators return the raw reply text. Interpreting it is the clients'
//! job, so a malformed reply is handled the same way whatever produced it.

use crate::config::GeneratorConfig;
use crate::difficulty::Difficulty;
use crate::game::{GameSession, GuessRecord, GuessStatus};
use crate::prompts::{build_commentary_prompt, build_hint_prompt, HOST_PERSONA};
use async_trait::async_trait;
use gemini::{FinishReason, Gemini, Request, Response};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a generator request produced nothing usable.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("No API key configured")]
    NoCredential,

    #[error("Gemini API error: {0}")]
    Api(#[from] gemini::Error),

    #[error("Malformed reply: {0}")]
    Malformed(String),

    #[error("Generator returned an empty reply")]
    EmptyReply,
}

/// Everything the generator needs to react to one guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub difficulty: Difficulty,
    pub target: i64,
    pub guess: i64,
    pub status: GuessStatus,
    /// History length including this guess.
    pub guesses_used: usize,
    pub attempts_remaining: usize,
}

impl CommentaryRequest {
    /// Describe a guess that has already been applied to `history`.
    pub fn new(
        guess: i64,
        target: i64,
        status: GuessStatus,
        history: &[GuessRecord],
        difficulty: Difficulty,
    ) -> Self {
        let attempts = difficulty.attempts() as usize;
        Self {
            difficulty,
            target,
            guess,
            status,
            guesses_used: history.len(),
            attempts_remaining: attempts.saturating_sub(history.len()),
        }
    }

    /// Describe the most recent guess of a session.
    pub fn for_last_guess(session: &GameSession) -> Option<Self> {
        let last = session.last_guess()?;
        Some(Self::new(
            last.value,
            session.target(),
            last.status,
            session.history(),
            session.difficulty(),
        ))
    }
}

/// Everything the generator needs for a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub target: i64,
    /// Prior guesses, oldest first.
    pub guesses: Vec<i64>,
}

impl HintRequest {
    pub fn new(target: i64, history: &[GuessRecord]) -> Self {
        Self {
            target,
            guesses: history.iter().map(|r| r.value).collect(),
        }
    }
}

/// A source of host narration.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Ask for a reaction to a guess. The reply should be a JSON object
    /// with `text` and `emotion` fields.
    async fn fetch_commentary(&self, request: &CommentaryRequest) -> Result<String, GeneratorError>;

    /// Ask for a short clue that does not reveal the target.
    async fn fetch_hint(&self, request: &HintRequest) -> Result<String, GeneratorError>;
}

/// Generator backed by the Gemini API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Gemini,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GeminiGenerator {
    /// Wrap an existing client.
    pub fn new(client: Gemini) -> Self {
        Self {
            client,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Build a generator from config. Fails if there is no credential.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(GeneratorError::NoCredential)?;

        let mut client = Gemini::new(api_key)?
            .with_model(&config.model)
            .with_timeout(config.timeout)?;
        if let Some(ref base_url) = config.base_url {
            client = client.with_base_url(base_url);
        }

        Ok(Self {
            client,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn request(&self, prompt: String) -> Request {
        let mut request = Request::prompt(prompt);
        if let Some(temp) = self.temperature {
            request = request.with_temperature(temp);
        }
        if let Some(tokens) = self.max_output_tokens {
            request = request.with_max_output_tokens(tokens);
        }
        request
    }

    /// Commentary asks for a JSON reply, in the host's voice.
    fn commentary_request(&self, request: &CommentaryRequest) -> Request {
        self.request(build_commentary_prompt(request))
            .with_system(HOST_PERSONA)
            .json()
    }

    /// Hints are plain text.
    fn hint_request(&self, request: &HintRequest) -> Request {
        self.request(build_hint_prompt(request))
    }

    async fn send(&self, request: Request) -> Result<String, GeneratorError> {
        let response = self.client.complete(request).await?;
        reply_text(response)
    }
}

fn reply_text(response: Response) -> Result<String, GeneratorError> {
    if let Some(ref usage) = response.usage {
        debug!(
            model = response.model_version.as_deref().unwrap_or("unknown"),
            prompt_tokens = usage.prompt_tokens,
            output_tokens = usage.output_tokens,
            "generator replied"
        );
    }
    if response.finish_reason == Some(FinishReason::MaxTokens) {
        warn!("generator reply was cut off at the token limit");
    }
    if response.is_empty() {
        return Err(GeneratorError::EmptyReply);
    }
    Ok(response.text())
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn fetch_commentary(&self, request: &CommentaryRequest) -> Result<String, GeneratorError> {
        debug!(guess = request.guess, status = %request.status, "requesting commentary");
        self.send(self.commentary_request(request)).await
    }

    async fn fetch_hint(&self, request: &HintRequest) -> Result<String, GeneratorError> {
        debug!(guesses = request.guesses.len(), "requesting hint");
        self.send(self.hint_request(request)).await
    }
}

/// The JSON body of a reply, without any markdown fence around it.
///
/// Models in JSON mode still sometimes answer with ```` ```json ```` blocks.
/// Unfenced replies come back trimmed.
pub(crate) fn extract_json(reply: &str) -> &str {
    let reply = reply.trim();
    let Some(open) = reply.find("```") else {
        return reply;
    };

    let body = &reply[open + 3..];
    let body = body.strip_prefix("json").unwrap_or(body);
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => reply,
    }
}
