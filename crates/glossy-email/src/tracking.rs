//! Campaign attribution: UTM query parameters on outbound links.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Utm {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl Utm {
    /// Defaults for a newsletter send: source "glossy", medium "email".
    pub fn email(campaign: &str) -> Self {
        Self {
            source: "glossy".to_string(),
            medium: "email".to_string(),
            campaign: campaign.to_string(),
            content: None,
            term: None,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("utm_source", self.source.as_str()),
            ("utm_medium", self.medium.as_str()),
            ("utm_campaign", self.campaign.as_str()),
        ];
        if let Some(content) = &self.content {
            pairs.push(("utm_content", content));
        }
        if let Some(term) = &self.term {
            pairs.push(("utm_term", term));
        }
        pairs.retain(|(_, v)| !v.is_empty());
        pairs
    }
}

/// Append `utm` to an http(s) URL.
///
/// Existing `utm_*` pairs are replaced, other query pairs and the fragment
/// are kept. Anything that is not an absolute http(s) URL (mailto:,
/// relative paths, garbage) comes back unchanged.
pub fn track(raw: &str, utm: &Utm) -> String {
    let Ok(mut url) = Url::parse(raw.trim()) else {
        return raw.to_string();
    };
    if !matches!(url.scheme(), "http" | "https") {
        return raw.to_string();
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !k.starts_with("utm_"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let utm_pairs = utm.pairs();
    if kept.is_empty() && utm_pairs.is_empty() {
        url.set_query(None);
        return url.to_string();
    }

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(utm_pairs);
    url.to_string()
}
