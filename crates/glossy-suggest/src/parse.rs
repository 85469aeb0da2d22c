use serde_json::{Map, Value};

use crate::prompt::FieldPrompt;

/// Clean one field's raw LLM output: drop code fences, a leading
/// "Label:" echo and wrapping quotes, then cap at `max_words`.
pub fn clean_field_text(raw: &str, label: &str, max_words: usize) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Skip an optional language tag on the fence line.
        let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
        text = rest.trim_end().strip_suffix("```").unwrap_or(rest).trim();
    }

    if let Some((head, rest)) = text.split_once(':') {
        if head.trim().eq_ignore_ascii_case(label) {
            text = rest.trim();
        }
    }

    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')] {
        if text.len() > 1 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
            break;
        }
    }

    cap_words(text, max_words)
}

/// Keep at most `max_words` whitespace-separated words. Line breaks inside
/// the kept part survive, so lists stay lists.
fn cap_words(text: &str, max_words: usize) -> String {
    let mut count = 0;
    let mut end = text.len();
    let mut in_word = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            count += 1;
            if count > max_words {
                end = i;
                break;
            }
        }
    }
    text[..end].trim_end().to_string()
}

/// Parse a whole-section answer into field -> text for the known fields.
/// Returns an empty map on total parse failure.
pub fn parse_section_output(raw: &str, prompts: &[&FieldPrompt]) -> Map<String, Value> {
    let parsed = extract_json_object(raw)
        .and_then(|json| serde_json::from_str::<Map<String, Value>>(json).ok())
        .unwrap_or_else(|| parse_line_by_line(raw));

    prompts
        .iter()
        .filter_map(|p| {
            let value = parsed.get(p.field)?;
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| format!("- {}", s.trim_start_matches("- ")))
                    .collect::<Vec<_>>()
                    .join("\n"),
                _ => return None,
            };
            let cleaned = clean_field_text(&text, p.label, p.max_words);
            (!cleaned.is_empty()).then(|| (p.field.to_string(), Value::String(cleaned)))
        })
        .collect()
}

/// Extract the JSON object substring from raw LLM output.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Salvage `"field": "value"` pairs from malformed output, one per line.
fn parse_line_by_line(raw: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for line in raw.lines() {
        let line = line.trim().trim_end_matches(',');
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_matches('"');
        let Some(value) = value
            .trim()
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
        else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        out.insert(key.to_string(), Value::String(value.replace("\\\"", "\"")));
    }
    out
}
