//! AI-assisted copy for magazine sections: per-field prompts, model
//! selection, and the LLM round trip.

pub mod engine;
pub mod models;
mod parse;
pub mod prompt;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use glossy_core::{ai_configured, AiSettings};

pub use models::{select_model, settings_for_task, GenerationTask, ModelInfo, MODELS};
pub use parse::{clean_field_text, parse_section_output};
pub use prompt::{field_prompt, prompts_for, CopyContext, FieldPrompt, FIELD_PROMPTS};

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("AI is not configured: set provider, model and API key")]
    NotConfigured,
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("no prompt for field '{field}' of section type '{section_type}'")]
    UnknownField { section_type: String, field: String },
    #[error("no prompts for section type '{0}'")]
    UnknownSection(String),
    #[error("build LLM: {0}")]
    Build(String),
    #[error("chat: {0}")]
    Chat(String),
    #[error("LLM returned no text")]
    EmptyOutput,
}

/// Generate copy for a single field.
pub async fn generate_field(
    settings: &AiSettings,
    section_type: &str,
    field: &str,
    ctx: &CopyContext,
) -> Result<String, SuggestError> {
    if !ai_configured(settings) {
        return Err(SuggestError::NotConfigured);
    }
    let prompt = field_prompt(section_type, field).ok_or_else(|| SuggestError::UnknownField {
        section_type: section_type.to_string(),
        field: field.to_string(),
    })?;

    let settings = settings_for_task(settings, GenerationTask::for_prompt(prompt));
    let (system, user) = prompt::field_request(prompt, ctx);
    info!(provider = %settings.provider, model = %settings.model, section_type, field, "generating field");

    let raw = engine::generate(&settings, &system, &user)
        .await
        .inspect_err(|e| warn!(error = %e, section_type, field, "generation failed"))?;
    debug!(raw = %raw, "raw LLM output");

    let text = clean_field_text(&raw, prompt.label, prompt.max_words);
    if text.is_empty() {
        return Err(SuggestError::EmptyOutput);
    }
    Ok(text)
}

/// Generate every field of a section in one request. Fields the model
/// skipped or garbled are absent from the result.
pub async fn generate_section(
    settings: &AiSettings,
    section_type: &str,
    ctx: &CopyContext,
) -> Result<Map<String, Value>, SuggestError> {
    if !ai_configured(settings) {
        return Err(SuggestError::NotConfigured);
    }
    let prompts = prompts_for(section_type);
    if prompts.is_empty() {
        return Err(SuggestError::UnknownSection(section_type.to_string()));
    }

    let settings = settings_for_task(settings, GenerationTask::FullSection);
    let (system, user) = prompt::section_request(&prompts, ctx);
    info!(provider = %settings.provider, model = %settings.model, section_type, "generating section");

    let raw = engine::generate(&settings, &system, &user)
        .await
        .inspect_err(|e| warn!(error = %e, section_type, "generation failed"))?;
    let fields = parse_section_output(&raw, &prompts);
    info!(section_type, parsed = fields.len(), expected = prompts.len(), "section generated");
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refuses_when_unconfigured() {
        let settings = AiSettings::default();
        let err = generate_field(&settings, "cover-story", "headline", &CopyContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::NotConfigured));
    }

    #[tokio::test]
    async fn unknown_field_fails_before_any_request() {
        let settings = AiSettings {
            provider: "ollama".into(),
            api_key: String::new(),
            model: "llama3.1".into(),
        };
        let err = generate_field(&settings, "cover-story", "byline", &CopyContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::UnknownField { .. }));

        let err = generate_section(&settings, "horoscope", &CopyContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::UnknownSection(_)));
    }
}
