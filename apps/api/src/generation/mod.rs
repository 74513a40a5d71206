// SOW generation: intake → prompt → LLM → session document text.
// All LLM calls go through llm_client; nothing here talks HTTP directly.

pub mod generator;
pub mod handlers;
