use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Editorial,
    Playful,
    Luxe,
    Informative,
}

impl Tone {
    fn describe(&self) -> &'static str {
        match self {
            Tone::Editorial => "confident magazine voice, vivid but precise",
            Tone::Playful => "warm, witty and conversational, like a friend at the salon",
            Tone::Luxe => "polished and aspirational, short sentences, no slang",
            Tone::Informative => "clear and practical, concrete steps and facts",
        }
    }
}

/// Generation instructions for one CMS field of one magazine section type.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldPrompt {
    pub section_type: &'static str,
    pub field: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
    pub max_words: usize,
    pub tone: Tone,
}

const fn fp(
    section_type: &'static str,
    field: &'static str,
    label: &'static str,
    prompt: &'static str,
    max_words: usize,
    tone: Tone,
) -> FieldPrompt {
    FieldPrompt {
        section_type,
        field,
        label,
        prompt,
        max_words,
        tone,
    }
}

pub const FIELD_PROMPTS: &[FieldPrompt] = &[
    // cover-story
    fp("cover-story", "headline", "Headline",
        "Write a cover headline that names the look or trend. No puns on the word 'glow'.",
        10, Tone::Editorial),
    fp("cover-story", "dek", "Dek",
        "Write the one-sentence dek under the headline. Say who it is for and what they will learn.",
        30, Tone::Editorial),
    fp("cover-story", "body", "Body",
        "Write the cover story body in short paragraphs. Open with a scene, then cover the technique, \
the products by category (not brand), and one pro tip from the artist.",
        400, Tone::Editorial),
    // maries-corner
    fp("maries-corner", "title", "Title",
        "Write a personal column title in Marie's voice.",
        8, Tone::Playful),
    fp("maries-corner", "intro", "Intro",
        "Write a two-sentence intro in first person, as the founder talking to regulars.",
        45, Tone::Playful),
    fp("maries-corner", "tip", "Tip of the month",
        "Give one practical at-home care tip that follows from the brief. Start with a verb.",
        60, Tone::Informative),
    // artist-spotlight
    fp("artist-spotlight", "headline", "Headline",
        "Write a spotlight headline built around the artist's signature specialty.",
        10, Tone::Luxe),
    fp("artist-spotlight", "bio", "Bio",
        "Write a third-person bio: training, specialty, what clients book them for.",
        150, Tone::Luxe),
    fp("artist-spotlight", "quote", "Pull quote",
        "Write a short first-person quote the artist could plausibly say about their craft.",
        25, Tone::Luxe),
    // trend-report
    fp("trend-report", "headline", "Headline",
        "Write a headline naming the trend and the season.",
        10, Tone::Editorial),
    fp("trend-report", "summary", "Summary",
        "Summarize the trend in two sentences: what it looks like and why it is rising now.",
        50, Tone::Informative),
    fp("trend-report", "body", "Body",
        "Write the trend report: origin, how to wear it at three skill levels, and how to ask for it \
at a booking.",
        350, Tone::Editorial),
    // event-recap
    fp("event-recap", "title", "Title",
        "Write a recap title naming the event.",
        10, Tone::Playful),
    fp("event-recap", "summary", "Summary",
        "Summarize the event for people who missed it.",
        60, Tone::Playful),
    fp("event-recap", "highlights", "Highlights",
        "List three highlights, one per line, each starting with '- '.",
        80, Tone::Informative),
];

/// Every field prompt for a section type, in form order.
pub fn prompts_for(section_type: &str) -> Vec<&'static FieldPrompt> {
    FIELD_PROMPTS
        .iter()
        .filter(|p| p.section_type == section_type)
        .collect()
}

pub fn field_prompt(section_type: &str, field: &str) -> Option<&'static FieldPrompt> {
    FIELD_PROMPTS
        .iter()
        .find(|p| p.section_type == section_type && p.field == field)
}

/// Section types that have prompts, sorted and de-duplicated.
pub fn section_types() -> Vec<&'static str> {
    let mut types: Vec<&'static str> = FIELD_PROMPTS.iter().map(|p| p.section_type).collect();
    types.sort_unstable();
    types.dedup();
    types
}

/// What the editor knows about the page when asking for copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyContext {
    pub page_title: String,
    pub brief: String,
    /// Already-filled fields of the same section, as (field, value).
    pub existing: Vec<(String, String)>,
}

pub const SYSTEM_PROMPT: &str = "\
You write copy for Glossy, a beauty magazine and booking platform. Readers are clients who book \
brow, lash, hair and makeup services, and the artists who serve them.\n\n\
Rules:\n\
1. Never invent prices, discounts, dates or product brand names.\n\
2. No medical claims. Say \"may help\" rather than \"cures\" or \"treats\".\n\
3. Inclusive by default: no assumptions about gender, skin tone or hair type unless the brief states them.\n\
4. Respect the word limit. Shorter is better than padded.\n\
5. Plain text only. No markdown headings, no surrounding quotes, no labels like \"Headline:\".";

fn push_context(out: &mut String, ctx: &CopyContext) {
    if !ctx.page_title.is_empty() {
        out.push_str("PAGE: ");
        out.push_str(&ctx.page_title);
        out.push('\n');
    }
    if !ctx.brief.is_empty() {
        out.push_str("BRIEF: ");
        out.push_str(&ctx.brief);
        out.push('\n');
    }
    if !ctx.existing.is_empty() {
        out.push_str("ALREADY WRITTEN:\n");
        for (field, value) in &ctx.existing {
            out.push_str("  ");
            out.push_str(field);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
}

/// System and user messages for one field.
pub fn field_request(prompt: &FieldPrompt, ctx: &CopyContext) -> (String, String) {
    let system = format!(
        "{}\n\nTone: {}.\nOutput ONLY the {} text, at most {} words.",
        SYSTEM_PROMPT,
        prompt.tone.describe(),
        prompt.label.to_lowercase(),
        prompt.max_words
    );
    let mut user = String::with_capacity(512);
    push_context(&mut user, ctx);
    user.push_str("SECTION: ");
    user.push_str(prompt.section_type);
    user.push_str("\nTASK: ");
    user.push_str(prompt.prompt);
    user.push('\n');
    (system, user)
}

/// System and user messages asking for every field of a section at once,
/// answered as a single JSON object.
pub fn section_request(prompts: &[&FieldPrompt], ctx: &CopyContext) -> (String, String) {
    let system = format!(
        "{}\n\nOutput ONLY a JSON object whose keys are exactly the field names listed, each \
value a string. Output nothing else.",
        SYSTEM_PROMPT
    );
    let mut user = String::with_capacity(1024);
    push_context(&mut user, ctx);
    if let Some(first) = prompts.first() {
        user.push_str("SECTION: ");
        user.push_str(first.section_type);
        user.push('\n');
    }
    user.push_str("FIELDS:\n");
    for p in prompts {
        user.push_str(&format!(
            "  \"{}\" ({} words max, tone: {}): {}\n",
            p.field,
            p.max_words,
            p.tone.describe(),
            p.prompt
        ));
    }
    (system, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_prompts() {
        assert_eq!(prompts_for("cover-story").len(), 3);
        assert!(prompts_for("horoscope").is_empty());
        let tip = field_prompt("maries-corner", "tip").unwrap();
        assert_eq!(tip.tone, Tone::Informative);
        assert!(field_prompt("maries-corner", "headline").is_none());
    }

    #[test]
    fn section_types_are_unique() {
        assert_eq!(
            section_types(),
            vec!["artist-spotlight", "cover-story", "event-recap", "maries-corner", "trend-report"]
        );
    }

    #[test]
    fn field_request_carries_context_and_limit() {
        let ctx = CopyContext {
            page_title: "June issue".into(),
            brief: "Soap brows for summer".into(),
            existing: vec![("headline".into(), "The Soap Brow Summer".into())],
        };
        let (system, user) = field_request(field_prompt("cover-story", "dek").unwrap(), &ctx);
        assert!(system.contains("at most 30 words"));
        assert!(user.contains("BRIEF: Soap brows for summer"));
        assert!(user.contains("  headline: The Soap Brow Summer"));
        assert!(user.contains("SECTION: cover-story"));
    }

    #[test]
    fn section_request_lists_all_fields() {
        let prompts = prompts_for("event-recap");
        let (_, user) = section_request(&prompts, &CopyContext::default());
        for p in &prompts {
            assert!(user.contains(&format!("\"{}\"", p.field)));
        }
    }
}
