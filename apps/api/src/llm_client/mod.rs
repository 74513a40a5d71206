/// LLM Client: the single point of entry for all Gemini calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation endpoint directly.
/// All LLM interactions MUST go through this module.
///
/// Transient failures (429, 503, transport errors) are retried on the fixed
/// schedule in [`RETRY_DELAYS_SECS`]; a wait follows every transient failure,
/// including the last. Delays go through the [`Sleeper`] seam so tests never sleep.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Wait after each failed transient attempt. One attempt per entry.
pub const RETRY_DELAYS_SECS: [u64; 5] = [1, 2, 4, 8, 16];
const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("The model is currently overloaded after multiple retries. Please try again in a moment.")]
    Overloaded,

    #[error("API Error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("No API key was supplied and GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// Injectable delay between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    system_instruction: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: [Part { text }],
        }
    }
}

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(Result<String, LlmError>),
    Transient(String),
}

/// The single LLM client used by the service.
/// Wraps the Gemini `generateContent` API with the bounded retry loop.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_base: String,
    model: String,
    default_api_key: Option<String>,
    sleeper: Arc<dyn Sleeper>,
}

impl LlmClient {
    pub fn new(
        api_base: String,
        model: String,
        default_api_key: Option<String>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            default_api_key: default_api_key.filter(|k| !k.trim().is_empty()),
            sleeper,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_default_key(&self) -> bool {
        self.default_api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Sends `prompt` with the `system` instruction and returns the generated text.
    /// `api_key` overrides the configured default when non-empty.
    pub async fn generate(
        &self,
        prompt: &str,
        system: &str,
        api_key: Option<&str>,
    ) -> Result<String, LlmError> {
        let key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.default_api_key.as_deref())
            .ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateRequest {
            contents: [Content::text(prompt)],
            system_instruction: Content::text(system),
        };
        let url = self.endpoint();

        for (attempt, delay) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.attempt(&url, key, &request_body).await {
                Attempt::Done(result) => return result,
                Attempt::Transient(reason) => {
                    warn!(
                        "Gemini attempt {}/{} failed ({reason}), retrying after {delay}s...",
                        attempt + 1,
                        RETRY_DELAYS_SECS.len()
                    );
                    self.sleeper.sleep(Duration::from_secs(*delay)).await;
                }
            }
        }

        Err(LlmError::Overloaded)
    }

    async fn attempt(&self, url: &str, key: &str, body: &GenerateRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(url)
            .query(&[("key", key)])
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Attempt::Transient(format!("transport: {e}")),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => return Attempt::Transient(format!("reading body: {e}")),
        };

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            return Attempt::Transient(format!("status {}", status.as_u16()));
        }

        if status != StatusCode::OK {
            return Attempt::Done(Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            }));
        }

        debug!("Gemini call succeeded ({} bytes)", text.len());
        Attempt::Done(extract_text(&text))
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(body: &str) -> Result<String, LlmError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| LlmError::UnexpectedShape(e.to_string()))?;
    value
        .pointer(TEXT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LlmError::UnexpectedShape(format!("missing {TEXT_POINTER}")))
}
