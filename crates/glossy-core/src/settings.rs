use serde::{Deserialize, Serialize};

/// Provider credentials for AI copy generation, stored in `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_needs_no_key() {
        let mut s = AiSettings {
            provider: "ollama".into(),
            api_key: String::new(),
            model: "llama3.1".into(),
        };
        assert!(ai_configured(&s));
        s.provider = "openai".into();
        assert!(!ai_configured(&s));
        s.api_key = "sk-test".into();
        assert!(ai_configured(&s));
    }
}
