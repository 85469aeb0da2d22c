//! "Load from section": find existing section content that fits a content
//! block and copy it into a custom-block layout object.
//!
//! Each section is tried against three tiers, first hit wins:
//!
//! 1. **Direct**: the section is already split into content blocks and one
//!    of them has the block's type (or, failing that, its category).
//! 2. **Extractor**: a hand-written mapping from the historical field names
//!    of the block's legacy section types.
//! 3. **Generic**: a recursive key search of the section content for the
//!    block's declared field names.
//!
//! Sections that do not relate to the block never match. Sections are only
//! read.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::blocks::{normalize, ContentBlockKind};
use crate::editor::LayoutEditor;
use crate::error::{Error, Result};
use crate::layout::{is_empty_value, LayoutObject};
use crate::page::Section;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Direct,
    Extractor,
    Generic,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionMatch {
    pub section_id: String,
    pub section_type: String,
    pub tier: MatchTier,
    /// Values keyed by the block's field names. Never empty.
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ApplyOutcome {
    Applied,
    /// The destination already holds data and overwrite was not confirmed.
    NeedsConfirmation,
    NotCustomBlock,
}

/// Search `sections` for content that fits `block`. At most one match per
/// section, in section order.
pub fn find_section_matches(block: ContentBlockKind, sections: &[Section]) -> Vec<SectionMatch> {
    let matches: Vec<SectionMatch> = sections
        .iter()
        .filter_map(|section| match_section(block, section))
        .collect();
    debug!(%block, sections = sections.len(), matches = matches.len(), "section search");
    matches
}

fn match_section(block: ContentBlockKind, section: &Section) -> Option<SectionMatch> {
    let found = |tier, data: Map<String, Value>| {
        (!data.is_empty()).then(|| SectionMatch {
            section_id: section.id.clone(),
            section_type: section.section_type.clone(),
            tier,
            data,
        })
    };

    if let Some(m) = found(MatchTier::Direct, direct_match(block, section)) {
        return Some(m);
    }

    if !block.relates_to_section_type(&section.section_type) {
        return None;
    }

    let is_legacy = block
        .legacy_section_types()
        .iter()
        .any(|t| normalize(t) == normalize(&section.section_type));
    if is_legacy {
        if let Some(m) = found(MatchTier::Extractor, extract_legacy(block, section)) {
            return Some(m);
        }
    }

    found(MatchTier::Generic, generic_search(block, section))
}

// --- Tier 1 ---

fn direct_match(block: ContentBlockKind, section: &Section) -> Map<String, Value> {
    let name = normalize(block.name());
    let category = normalize(block.category());

    let by_type = section
        .content_blocks
        .iter()
        .filter(|b| normalize(&b.block_type) == name);
    let by_category = section
        .content_blocks
        .iter()
        .filter(|b| !b.category.is_empty() && normalize(&b.category) == category);

    // A type match holding none of the declared fields does not hide a
    // usable block of the same category.
    by_type
        .chain(by_category)
        .map(|content_block| keep_declared(block, &content_block.data))
        .find(|data| !data.is_empty())
        .unwrap_or_default()
}

fn keep_declared(block: ContentBlockKind, data: &Map<String, Value>) -> Map<String, Value> {
    block
        .fields()
        .iter()
        .filter_map(|f| {
            data.get(f.name)
                .filter(|v| !is_empty_value(v))
                .map(|v| (f.name.to_string(), v.clone()))
        })
        .collect()
}

// --- Tier 2 ---

/// Look up the first non-empty value among `keys`, in `content` first and
/// then in the section's loose per-type fields. Keys may be `/`-separated
/// paths, e.g. "cta/url".
fn pick<'a>(section: &'a Section, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        for source in [&section.content, &section.extra] {
            let mut parts = key.split('/');
            let value = parts
                .next()
                .and_then(|k| source.get(k))
                .and_then(|first| parts.try_fold(first, |v, k| v.get(k)));
            if let Some(v) = value.filter(|v| !is_empty_value(v)) {
                return Some(v);
            }
        }
    }
    None
}

fn pick_str(item: &Value, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|k| item.get(*k))
        .find(|v| !is_empty_value(v))
        .cloned()
}

/// Reshape a legacy list into objects with the block's item keys. Each
/// entry of `mapping` is (target key, candidate source keys). Bare string
/// items are taken as the first target key.
fn reshape_list(list: &Value, mapping: &[(&str, &[&str])]) -> Value {
    let Some(items) = list.as_array() else {
        return Value::Null;
    };
    let reshaped: Vec<Value> = items
        .iter()
        .filter_map(|item| {
            let mut out = Map::new();
            match item {
                Value::String(s) if !s.trim().is_empty() => {
                    out.insert(mapping[0].0.to_string(), Value::String(s.clone()));
                }
                Value::Object(_) => {
                    for (target, sources) in mapping {
                        if let Some(v) = pick_str(item, sources) {
                            out.insert(target.to_string(), v);
                        }
                    }
                }
                _ => {}
            }
            (!out.is_empty()).then_some(Value::Object(out))
        })
        .collect();
    Value::Array(reshaped)
}

fn extract_legacy(block: ContentBlockKind, section: &Section) -> Map<String, Value> {
    let mut out = Map::new();
    let mut put = |key: &str, value: Option<Value>| {
        if let Some(v) = value.filter(|v| !is_empty_value(v)) {
            out.insert(key.to_string(), v);
        }
    };
    let get = |keys: &[&str]| pick(section, keys).cloned();

    match block {
        ContentBlockKind::PhotoGallery => {
            put("title", get(&["title", "heading", "sectionTitle"]));
            put("subtitle", get(&["subtitle", "intro", "description"]));
            put(
                "photos",
                pick(section, &["photos", "images", "gallery", "items"]).map(|list| {
                    reshape_list(
                        list,
                        &[
                            ("url", &["url", "src", "imageUrl", "image"]),
                            ("caption", &["caption", "alt", "title"]),
                        ],
                    )
                }),
            );
        }
        ContentBlockKind::StatsCta => {
            put("headline", get(&["headline", "title"]));
            put(
                "stats",
                pick(section, &["stats", "numbers", "metrics"]).map(|list| {
                    reshape_list(
                        list,
                        &[
                            ("value", &["value", "number", "stat"]),
                            ("label", &["label", "description", "caption"]),
                        ],
                    )
                }),
            );
            put("ctaText", get(&["ctaText", "buttonText", "cta/text"]));
            put("ctaUrl", get(&["ctaUrl", "buttonUrl", "cta/url", "link"]));
        }
        ContentBlockKind::Leaderboard => {
            put("title", get(&["title", "heading"]));
            put(
                "entries",
                pick(section, &["entries", "artists", "rankings", "leaders"]).map(|list| {
                    reshape_list(
                        list,
                        &[
                            ("name", &["name", "artistName", "displayName"]),
                            ("score", &["score", "points", "bookings"]),
                            ("imageUrl", &["imageUrl", "avatar", "photo"]),
                        ],
                    )
                }),
            );
            put("ctaText", get(&["ctaText", "buttonText"]));
            put("ctaUrl", get(&["ctaUrl", "buttonUrl", "link"]));
        }
        ContentBlockKind::EventList => {
            put("title", get(&["title", "heading"]));
            put(
                "events",
                pick(section, &["events", "items", "schedule"]).map(|list| {
                    reshape_list(
                        list,
                        &[
                            ("title", &["title", "name"]),
                            ("date", &["date", "startDate", "when"]),
                            ("location", &["location", "venue", "city"]),
                            ("url", &["url", "link", "rsvpUrl"]),
                        ],
                    )
                }),
            );
        }
        ContentBlockKind::HeroBanner => {
            put("headline", get(&["headline", "title", "coverTitle"]));
            put("subheadline", get(&["subheadline", "subtitle", "dek"]));
            put("imageUrl", get(&["imageUrl", "coverImage", "heroImage", "image"]));
            put("ctaText", get(&["ctaText", "buttonText", "cta/text"]));
            put("ctaUrl", get(&["ctaUrl", "buttonUrl", "cta/url"]));
        }
        ContentBlockKind::QuoteCard => {
            put("quote", get(&["quote", "pullQuote", "text"]));
            put("author", get(&["author", "by", "name"]));
            put("authorTitle", get(&["authorTitle", "role", "title"]));
            put("imageUrl", get(&["authorImage", "avatar", "image"]));
        }
        ContentBlockKind::ProductSpotlight => {
            put("productName", get(&["productName", "name", "title"]));
            put("description", get(&["description", "blurb", "body"]));
            put("imageUrl", get(&["imageUrl", "productImage", "image"]));
            put("price", get(&["price", "retailPrice"]));
            put("ctaUrl", get(&["ctaUrl", "shopUrl", "url", "link"]));
        }
    }
    out
}

// --- Tier 3 ---

fn generic_search(block: ContentBlockKind, section: &Section) -> Map<String, Value> {
    block
        .fields()
        .iter()
        .filter_map(|f| {
            let wanted = normalize(f.name);
            find_key(&section.content, &wanted).map(|v| (f.name.to_string(), v.clone()))
        })
        .collect()
}

/// Depth-first search for the first non-empty value under a key that
/// normalizes to `wanted`.
fn find_key<'a>(map: &'a Map<String, Value>, wanted: &str) -> Option<&'a Value> {
    for (key, value) in map {
        if normalize(key) == wanted && !is_empty_value(value) {
            return Some(value);
        }
    }
    map.values().find_map(|value| find_in_value(value, wanted))
}

fn find_in_value<'a>(value: &'a Value, wanted: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => find_key(map, wanted),
        Value::Array(items) => items.iter().find_map(|v| find_in_value(v, wanted)),
        _ => None,
    }
}

// --- Apply ---

/// Copy a match into the custom block at `index`.
///
/// Existing non-empty data is only replaced when `overwrite_confirmed` is
/// set; otherwise the object is left alone and the caller is asked to
/// confirm.
pub fn apply_section_match(
    editor: &mut LayoutEditor,
    index: usize,
    found: &SectionMatch,
    overwrite_confirmed: bool,
) -> Result<ApplyOutcome> {
    let len = editor.len();
    let block = match editor.get(index) {
        Some(LayoutObject::CustomBlock(block)) => block,
        Some(_) => return Ok(ApplyOutcome::NotCustomBlock),
        None => return Err(Error::IndexOutOfRange { index, len }),
    };
    if block.has_data() && !overwrite_confirmed {
        return Ok(ApplyOutcome::NeedsConfirmation);
    }

    let mut props = block.props.clone();
    for (key, value) in &found.data {
        props.insert(key.clone(), value.clone());
    }
    let mut patch = Map::new();
    patch.insert("props".to_string(), Value::Object(props));
    editor.update(index, &patch)?;
    debug!(index, section = %found.section_id, tier = ?found.tier, "applied section data");
    Ok(ApplyOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use crate::page::ContentBlock;
    use serde_json::json;

    fn section(value: Value) -> Section {
        serde_json::from_value(value).unwrap()
    }

    fn sample_sections() -> Vec<Section> {
        vec![
            section(json!({
                "id": "s1",
                "type": "maries-corner",
                "content": {
                    "heading": "Marie's Corner",
                    "images": [
                        {"src": "https://cdn.example.com/1.jpg", "alt": "Bold brow"},
                        "https://cdn.example.com/2.jpg"
                    ]
                }
            })),
            section(json!({
                "id": "s2",
                "type": "top-artists",
                "content": {"artists": [{"artistName": "Jo", "bookings": 41}]}
            })),
            section(json!({
                "id": "s3",
                "type": "custom",
                "content": {},
                "contentBlocks": [
                    {"type": "PhotoGallery", "category": "media",
                     "data": {"title": "Backstage", "photos": [{"url": "b.jpg"}], "unrelated": 1}}
                ]
            })),
        ]
    }

    #[test]
    fn tiers_in_order() {
        let sections = sample_sections();
        let matches = find_section_matches(ContentBlockKind::PhotoGallery, &sections);
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].section_id, "s1");
        assert_eq!(matches[0].tier, MatchTier::Extractor);
        assert_eq!(matches[0].data["title"], "Marie's Corner");
        assert_eq!(
            matches[0].data["photos"],
            json!([
                {"url": "https://cdn.example.com/1.jpg", "caption": "Bold brow"},
                {"url": "https://cdn.example.com/2.jpg"}
            ])
        );

        assert_eq!(matches[1].section_id, "s3");
        assert_eq!(matches[1].tier, MatchTier::Direct);
        assert!(!matches[1].data.contains_key("unrelated"));
    }

    #[test]
    fn unrelated_sections_yield_nothing() {
        let sections = sample_sections();
        let before = sections.clone();
        let matches = find_section_matches(ContentBlockKind::ProductSpotlight, &sections);
        assert!(matches.is_empty());
        assert_eq!(sections, before);
    }

    #[test]
    fn generic_search_finds_nested_keys() {
        let sections = vec![section(json!({
            "id": "q",
            "type": "editorial",
            "content": {"layout": {"left": {"Quote": "Less is more."}}, "author": "Marie"}
        }))];
        let matches = find_section_matches(ContentBlockKind::QuoteCard, &sections);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tier, MatchTier::Generic);
        assert_eq!(matches[0].data["quote"], "Less is more.");
        assert_eq!(matches[0].data["author"], "Marie");
    }

    #[test]
    fn extractor_reads_loose_fields_and_paths() {
        let sections = vec![section(json!({
            "id": "st",
            "type": "by-the-numbers",
            "content": {"title": "2025 in review", "cta": {"url": "https://glossy.example/join"}},
            "numbers": [{"number": "12k", "caption": "bookings"}]
        }))];
        let matches = find_section_matches(ContentBlockKind::StatsCta, &sections);
        assert_eq!(matches.len(), 1);
        let data = &matches[0].data;
        assert_eq!(data["headline"], "2025 in review");
        assert_eq!(data["ctaUrl"], "https://glossy.example/join");
        assert_eq!(data["stats"], json!([{"value": "12k", "label": "bookings"}]));
    }

    #[test]
    fn category_direct_match() {
        let s = Section {
            id: "c".into(),
            section_type: "misc".into(),
            content_blocks: vec![ContentBlock {
                block_type: "Lookbook".into(),
                category: "media".into(),
                data: json!({"photos": ["x.jpg"]}).as_object().cloned().unwrap(),
            }],
            ..Default::default()
        };
        let matches = find_section_matches(ContentBlockKind::PhotoGallery, &[s]);
        assert_eq!(matches[0].tier, MatchTier::Direct);
    }

    #[test]
    fn empty_type_match_falls_back_to_category() {
        let block = |block_type: &str, data: Value| ContentBlock {
            block_type: block_type.into(),
            category: "media".into(),
            data: data.as_object().cloned().unwrap(),
        };
        let s = Section {
            id: "c".into(),
            section_type: "misc".into(),
            content_blocks: vec![
                block("PhotoGallery", json!({"title": "", "photos": []})),
                block("Lookbook", json!({"photos": ["y.jpg"], "title": "Summer"})),
            ],
            ..Default::default()
        };
        let matches = find_section_matches(ContentBlockKind::PhotoGallery, &[s]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tier, MatchTier::Direct);
        assert_eq!(matches[0].data["title"], "Summer");
        assert_eq!(matches[0].data["photos"], json!(["y.jpg"]));
    }

    #[test]
    fn apply_requires_confirmation_over_existing_data() {
        let sections = sample_sections();
        let found = find_section_matches(ContentBlockKind::PhotoGallery, &sections).remove(0);

        let mut editor = LayoutEditor::new();
        editor.push(LayoutObject::custom_block(ContentBlockKind::PhotoGallery, 0));
        editor.add(LayoutKind::Text);

        assert_eq!(
            apply_section_match(&mut editor, 0, &found, false).unwrap(),
            ApplyOutcome::Applied
        );
        assert_eq!(
            apply_section_match(&mut editor, 0, &found, false).unwrap(),
            ApplyOutcome::NeedsConfirmation
        );
        assert_eq!(
            apply_section_match(&mut editor, 0, &found, true).unwrap(),
            ApplyOutcome::Applied
        );
        assert_eq!(
            apply_section_match(&mut editor, 1, &found, true).unwrap(),
            ApplyOutcome::NotCustomBlock
        );

        let LayoutObject::CustomBlock(block) = &editor.objects()[0] else {
            panic!("expected custom block");
        };
        assert_eq!(block.props["title"], "Marie's Corner");
        assert!(block.props.contains_key("subtitle"));
    }
}
