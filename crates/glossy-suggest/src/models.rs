//! Model metadata and the heuristic that picks a model for a copy task.

use serde::Serialize;

use glossy_core::AiSettings;

use crate::prompt::FieldPrompt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Standard,
    Slow,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub provider: &'static str,
    pub id: &'static str,
    pub label: &'static str,
    pub context_window: u32,
    pub cost_tier: CostTier,
    pub speed: Speed,
    /// Holds a consistent voice over several hundred words.
    pub long_form: bool,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo { provider: "openai", id: "gpt-4o-mini", label: "GPT-4o mini", context_window: 128_000, cost_tier: CostTier::Low, speed: Speed::Fast, long_form: false },
    ModelInfo { provider: "openai", id: "gpt-4o", label: "GPT-4o", context_window: 128_000, cost_tier: CostTier::High, speed: Speed::Standard, long_form: true },
    ModelInfo { provider: "anthropic", id: "claude-3-5-haiku-latest", label: "Claude 3.5 Haiku", context_window: 200_000, cost_tier: CostTier::Low, speed: Speed::Fast, long_form: false },
    ModelInfo { provider: "anthropic", id: "claude-3-5-sonnet-latest", label: "Claude 3.5 Sonnet", context_window: 200_000, cost_tier: CostTier::Medium, speed: Speed::Standard, long_form: true },
    ModelInfo { provider: "google", id: "gemini-1.5-flash", label: "Gemini 1.5 Flash", context_window: 1_000_000, cost_tier: CostTier::Low, speed: Speed::Fast, long_form: false },
    ModelInfo { provider: "google", id: "gemini-1.5-pro", label: "Gemini 1.5 Pro", context_window: 2_000_000, cost_tier: CostTier::High, speed: Speed::Slow, long_form: true },
    ModelInfo { provider: "groq", id: "llama-3.1-8b-instant", label: "Llama 3.1 8B (Groq)", context_window: 128_000, cost_tier: CostTier::Low, speed: Speed::Fast, long_form: false },
    ModelInfo { provider: "groq", id: "llama-3.3-70b-versatile", label: "Llama 3.3 70B (Groq)", context_window: 128_000, cost_tier: CostTier::Medium, speed: Speed::Fast, long_form: true },
    ModelInfo { provider: "mistral", id: "mistral-small-latest", label: "Mistral Small", context_window: 32_000, cost_tier: CostTier::Low, speed: Speed::Fast, long_form: false },
    ModelInfo { provider: "mistral", id: "mistral-large-latest", label: "Mistral Large", context_window: 128_000, cost_tier: CostTier::Medium, speed: Speed::Standard, long_form: true },
    ModelInfo { provider: "deepseek", id: "deepseek-chat", label: "DeepSeek Chat", context_window: 64_000, cost_tier: CostTier::Low, speed: Speed::Standard, long_form: true },
];

/// Fields longer than this many words count as long-form.
pub const LONG_FORM_WORDS: usize = 120;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GenerationTask {
    /// Headlines, titles, deks, quotes.
    ShortField,
    /// Body copy and bios.
    LongForm,
    /// Every field of a section in one request.
    FullSection,
}

impl GenerationTask {
    pub fn for_prompt(prompt: &FieldPrompt) -> Self {
        if prompt.max_words > LONG_FORM_WORDS {
            GenerationTask::LongForm
        } else {
            GenerationTask::ShortField
        }
    }

    fn needs_long_form(&self) -> bool {
        !matches!(self, GenerationTask::ShortField)
    }
}

pub fn model_info(provider: &str, id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.provider == provider && m.id == id)
}

/// Pick a model for `task` from the given providers.
///
/// Long-form work goes to long-form models, largest context first, cheaper
/// breaking ties. Short fields go to the cheapest model, faster breaking
/// ties.
pub fn select_model(task: GenerationTask, providers: &[&str]) -> Option<&'static ModelInfo> {
    let candidates = MODELS.iter().filter(|m| providers.contains(&m.provider));
    if task.needs_long_form() {
        candidates
            .filter(|m| m.long_form)
            .min_by_key(|m| (std::cmp::Reverse(m.context_window), m.cost_tier))
    } else {
        candidates.min_by_key(|m| (m.cost_tier, m.speed))
    }
}

/// Settings to use for `task`. The configured model is kept when it is
/// unknown (e.g. a local Ollama model) or already suits the task;
/// otherwise the best model of the configured provider is swapped in.
pub fn settings_for_task(settings: &AiSettings, task: GenerationTask) -> AiSettings {
    let keep = match model_info(&settings.provider, &settings.model) {
        None => true,
        Some(info) => !task.needs_long_form() || info.long_form,
    };
    if keep {
        return settings.clone();
    }
    match select_model(task, &[settings.provider.as_str()]) {
        Some(info) => AiSettings {
            model: info.id.to_string(),
            ..settings.clone()
        },
        None => settings.clone(),
    }
}
