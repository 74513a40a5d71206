//! SOW Generation: orchestrates one generation call for a session.
//!
//! Flow: validate intake → resolve use-case → assemble prompt →
//!       LLM generate (bounded retries) → store text on the session.
//!
//! On failure the session's previous text is left untouched.

use serde::Serialize;
use tracing::info;

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::intake::assembler::assemble_prompt;
use crate::llm_client::prompts::SOLUTIONS_ARCHITECT_SYSTEM;
use crate::llm_client::LlmClient;
use crate::session::SowSession;

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub use_case: String,
    pub prompt_chars: usize,
    pub generated_text: String,
}

/// Runs the generation pipeline against `session`, replacing its document text
/// on success. The caller holds the session lock for the whole call.
pub async fn generate_document(
    llm: &LlmClient,
    catalog: &Catalog,
    session: &mut SowSession,
    api_key: Option<&str>,
) -> Result<GenerationOutcome, AppError> {
    session.intake.validate().map_err(AppError::Validation)?;

    let use_case = catalog.lookup(&session.intake.use_case);
    let prompt = assemble_prompt(&session.intake, &use_case, &session.timeline);
    info!(
        "Generating SOW '{}' for session {} ({} prompt chars)",
        use_case.name,
        session.id,
        prompt.len()
    );

    let text = llm
        .generate(&prompt, SOLUTIONS_ARCHITECT_SYSTEM, api_key)
        .await?;

    info!(
        "Generated {} chars for session {}",
        text.len(),
        session.id
    );
    session.generated_text = text.clone();

    Ok(GenerationOutcome {
        use_case: use_case.name,
        prompt_chars: prompt.len(),
        generated_text: text,
    })
}
