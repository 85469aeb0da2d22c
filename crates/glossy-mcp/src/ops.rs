//! Tool bodies, kept apart from the rmcp plumbing. Every operation returns
//! the text shown to the agent, or an error message.

use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::info;

use glossy_core::{
    apply_section_match, find_section_matches, ApplyOutcome, ContentBlockKind, Direction,
    LayoutEditor, LayoutKind, LayoutObject, LocalMediaStorage, MediaFile, Page, PageStore,
    Section, UploadCache, MAX_LAYOUT_OBJECTS,
};
use glossy_email::{EmailDocument, RenderContext, Utm};
use glossy_suggest::{CopyContext, GenerationTask};

pub type OpResult = Result<String, String>;

fn load(store: &PageStore, name: &str) -> Result<(Page, LayoutEditor), String> {
    let mut page = store
        .read_page(name)
        .map_err(|e| format!("Failed to read page '{}': {}", name, e))?;
    let editor = LayoutEditor::from_objects(std::mem::take(&mut page.layout));
    Ok((page, editor))
}

fn save(store: &PageStore, name: &str, mut page: Page, editor: LayoutEditor) -> Result<(), String> {
    page.layout = editor.into_objects();
    store
        .write_page(name, &page)
        .map_err(|e| format!("Failed to write page '{}': {}", name, e))
}

fn parse_object(data: &str, what: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(format!("{} must be a JSON object", what)),
        Err(e) => Err(format!("Invalid {} JSON: {}", what, e)),
    }
}

fn resolve_block(component: &str) -> Result<ContentBlockKind, String> {
    ContentBlockKind::from_name(component).ok_or_else(|| {
        let known: Vec<&str> = ContentBlockKind::ALL.iter().map(|k| k.name()).collect();
        format!(
            "Unknown component '{}'. Known components: {}",
            component,
            known.join(", ")
        )
    })
}

pub fn list_pages(store: &PageStore) -> OpResult {
    let names = store.list_pages().map_err(|e| e.to_string())?;
    if names.is_empty() {
        return Ok("No pages found. Use create_page to create one.".to_string());
    }
    Ok(names.join("\n"))
}

pub fn get_page(store: &PageStore, name: &str) -> OpResult {
    let page = store
        .read_page(name)
        .map_err(|e| format!("Failed to read page '{}': {}", name, e))?;
    serde_json::to_string_pretty(&page).map_err(|e| format!("Serialization error: {}", e))
}

pub fn create_page(store: &PageStore, name: &str, title: &str, sections: Option<&str>) -> OpResult {
    if store.page_exists(name) {
        return Err(format!("Page '{}' already exists", name));
    }
    let mut page = Page::new(name, title);
    if let Some(raw) = sections {
        page.sections = serde_json::from_str::<Vec<Section>>(raw)
            .map_err(|e| format!("Invalid sections JSON: {}", e))?;
    }
    store.write_page(name, &page).map_err(|e| e.to_string())?;
    Ok(format!(
        "Created page '{}' (slug '{}') with {} section(s)",
        name,
        page.slug,
        page.sections.len()
    ))
}

pub fn add_object(
    store: &PageStore,
    name: &str,
    kind: LayoutKind,
    component: Option<&str>,
) -> OpResult {
    let block = match component {
        Some(c) if kind == LayoutKind::CustomBlock => Some(resolve_block(c)?),
        Some(_) => return Err(format!("'component' only applies to custom-block, not {}", kind)),
        None => None,
    };

    let (page, mut editor) = load(store, name)?;
    let z_index = editor.len() as i32;
    let added = match block {
        Some(block) => editor.push(LayoutObject::custom_block(block, z_index)),
        None => editor.add(kind),
    };
    let Some(index) = added else {
        return Ok(format!(
            "Page already holds {} objects; nothing added",
            MAX_LAYOUT_OBJECTS
        ));
    };
    let summary = editor.objects()[index].summary();
    save(store, name, page, editor)?;
    info!(page = name, index, %kind, "object added");
    Ok(format!("Added {} at index {}", summary, index))
}

pub fn remove_object(store: &PageStore, name: &str, index: usize) -> OpResult {
    let (page, mut editor) = load(store, name)?;
    let Some(removed) = editor.remove(index) else {
        return Ok(format!(
            "No object at index {} (page holds {}); nothing removed",
            index,
            editor.len()
        ));
    };
    save(store, name, page, editor)?;
    Ok(format!("Removed {} from index {}", removed.summary(), index))
}

pub fn move_object(store: &PageStore, name: &str, index: usize, direction: Direction) -> OpResult {
    let (page, mut editor) = load(store, name)?;
    if !editor.move_object(index, direction) {
        let why = if index >= editor.len() {
            format!("no object at index {}", index)
        } else {
            match direction {
                Direction::Up => format!("object {} is already first", index),
                Direction::Down => format!("object {} is already last", index),
            }
        };
        return Ok(format!("Nothing moved: {}", why));
    }
    let to = match direction {
        Direction::Up => index - 1,
        Direction::Down => index + 1,
    };
    save(store, name, page, editor)?;
    Ok(format!("Moved object {} to index {}", index, to))
}

pub fn update_object(store: &PageStore, name: &str, index: usize, patch: &str) -> OpResult {
    let patch = parse_object(patch, "patch")?;
    let (page, mut editor) = load(store, name)?;
    let kind = editor
        .get(index)
        .map(|o| o.kind())
        .ok_or_else(|| format!("No object at index {} (page holds {})", index, editor.len()))?;
    editor.update(index, &patch).map_err(|e| e.to_string())?;

    let ignored: Vec<&str> = patch
        .keys()
        .map(String::as_str)
        .filter(|k| !kind.accepts_field(k))
        .collect();
    save(store, name, page, editor)?;

    let mut text = format!("Updated {} at index {}", kind, index);
    if !ignored.is_empty() {
        text.push_str(&format!(
            ". Ignored fields not in the {} schema: {}",
            kind,
            ignored.join(", ")
        ));
    }
    Ok(text)
}

pub fn list_components() -> String {
    let layout: Vec<Value> = LayoutKind::ALL
        .iter()
        .map(|k| json!({ "type": k.as_str(), "fields": k.form_fields() }))
        .collect();
    let blocks: Vec<Value> = ContentBlockKind::ALL
        .iter()
        .map(|b| {
            json!({
                "name": b.name(),
                "category": b.category(),
                "fields": b.fields(),
                "legacySectionTypes": b.legacy_section_types(),
            })
        })
        .collect();
    let out = json!({
        "maxObjects": MAX_LAYOUT_OBJECTS,
        "layoutObjects": layout,
        "contentBlocks": blocks,
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|e| format!("Serialization error: {}", e))
}

pub fn find_section_data(store: &PageStore, name: &str, component: &str) -> OpResult {
    let block = resolve_block(component)?;
    let page = store
        .read_page(name)
        .map_err(|e| format!("Failed to read page '{}': {}", name, e))?;
    let matches = find_section_matches(block, &page.sections);
    if matches.is_empty() {
        return Ok(format!("No sections of page '{}' hold {} content", name, block));
    }
    serde_json::to_string_pretty(&matches).map_err(|e| format!("Serialization error: {}", e))
}

pub fn apply_section_data(
    store: &PageStore,
    name: &str,
    index: usize,
    section_id: &str,
    overwrite: bool,
) -> OpResult {
    let (page, mut editor) = load(store, name)?;
    let component = match editor.get(index) {
        Some(LayoutObject::CustomBlock(b)) => b.component.clone(),
        Some(other) => {
            return Err(format!(
                "Object {} is a {}, not a custom block",
                index,
                other.kind()
            ))
        }
        None => return Err(format!("No object at index {} (page holds {})", index, editor.len())),
    };
    let block = resolve_block(&component)?;

    let found = find_section_matches(block, &page.sections)
        .into_iter()
        .find(|m| m.section_id == section_id)
        .ok_or_else(|| format!("Section '{}' holds no {} content", section_id, block))?;

    match apply_section_match(&mut editor, index, &found, overwrite).map_err(|e| e.to_string())? {
        ApplyOutcome::Applied => {
            let fields: Vec<&str> = found.data.keys().map(String::as_str).collect();
            save(store, name, page, editor)?;
            Ok(format!(
                "Loaded {} from section '{}' ({} match): {}",
                block,
                section_id,
                serde_json::to_value(found.tier)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                fields.join(", ")
            ))
        }
        ApplyOutcome::NeedsConfirmation => Ok(format!(
            "Object {} already holds data. Call again with overwrite=true to replace it.",
            index
        )),
        ApplyOutcome::NotCustomBlock => Err(format!("Object {} is not a custom block", index)),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Upload a local file into the store's media folder and point the image
/// object at `index` to it.
pub async fn upload_image(
    store: &PageStore,
    cache: &mut UploadCache,
    name: &str,
    index: usize,
    file_path: &str,
) -> OpResult {
    let path = Path::new(file_path);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read '{}': {}", file_path, e))?;
    let file = MediaFile {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string()),
        content_type: content_type_for(path).to_string(),
        bytes,
    };

    let (page, mut editor) = load(store, name)?;
    let storage = LocalMediaStorage::new(store.media_dir());
    let url = glossy_core::upload_image(&mut editor, index, &storage, cache, file)
        .await
        .map_err(|e| e.to_string())?;
    save(store, name, page, editor)?;
    Ok(format!("Image {} now shows {}", index, url))
}

pub fn render_email(document: &str, campaign: Option<&str>) -> OpResult {
    let doc: EmailDocument =
        serde_json::from_str(document).map_err(|e| format!("Invalid email document: {}", e))?;
    let ctx = match campaign {
        Some(c) if !c.trim().is_empty() => RenderContext::tracked(Utm::email(c)),
        _ => RenderContext::default(),
    };
    Ok(doc.render(&ctx))
}

pub fn field_prompts(section_type: Option<&str>) -> String {
    let prompts: Vec<&glossy_suggest::FieldPrompt> = match section_type {
        Some(t) => glossy_suggest::prompts_for(t),
        None => glossy_suggest::FIELD_PROMPTS.iter().collect(),
    };
    if prompts.is_empty() {
        return format!(
            "No field prompts for section type '{}'. Known types: {}",
            section_type.unwrap_or_default(),
            glossy_suggest::prompt::section_types().join(", ")
        );
    }
    serde_json::to_string_pretty(&prompts).unwrap_or_else(|e| format!("Serialization error: {}", e))
}

pub fn suggest_model(task: &str, providers: &[String]) -> OpResult {
    let task = match task {
        "short-field" | "short" => GenerationTask::ShortField,
        "long-form" | "long" => GenerationTask::LongForm,
        "full-section" | "section" => GenerationTask::FullSection,
        other => {
            return Err(format!(
                "Unknown task '{}'. Use short-field, long-form or full-section",
                other
            ))
        }
    };
    let providers: Vec<&str> = providers.iter().map(String::as_str).collect();
    match glossy_suggest::select_model(task, &providers) {
        Some(model) => serde_json::to_string_pretty(model)
            .map_err(|e| format!("Serialization error: {}", e)),
        None => Ok(format!(
            "No known model fits that task for providers: {}",
            providers.join(", ")
        )),
    }
}

/// Existing string fields of the page's first section of `section_type`.
fn existing_copy(page: &Page, section_type: &str) -> Vec<(String, String)> {
    page.sections
        .iter()
        .find(|s| s.section_type == section_type)
        .map(|s| {
            s.content
                .iter()
                .filter_map(|(k, v)| {
                    let text = v.as_str()?.trim();
                    (!text.is_empty()).then(|| (k.clone(), text.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

pub async fn generate_copy(
    store: &PageStore,
    name: &str,
    section_type: &str,
    field: Option<&str>,
    brief: &str,
) -> OpResult {
    let page = store
        .read_page(name)
        .map_err(|e| format!("Failed to read page '{}': {}", name, e))?;
    let settings = store.read_settings();
    let ctx = CopyContext {
        page_title: page.title.clone(),
        brief: brief.to_string(),
        existing: existing_copy(&page, section_type),
    };

    match field {
        Some(field) => glossy_suggest::generate_field(&settings, section_type, field, &ctx)
            .await
            .map_err(|e| e.to_string()),
        None => {
            let fields = glossy_suggest::generate_section(&settings, section_type, &ctx)
                .await
                .map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&fields).map_err(|e| format!("Serialization error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_page() -> (tempfile::TempDir, PageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        let sections = r#"[{"id":"s1","type":"maries-corner","content":{
            "heading":"Marie's Corner",
            "images":[{"src":"https://cdn.example.com/1.jpg","alt":"Bold brow"}]}}]"#;
        create_page(&store, "june", "June Issue", Some(sections)).unwrap();
        (dir, store)
    }

    fn layout(store: &PageStore) -> Vec<LayoutObject> {
        store.read_page("june").unwrap().layout
    }

    #[test]
    fn create_refuses_duplicates() {
        let (_dir, store) = store_with_page();
        assert!(create_page(&store, "june", "Again", None).is_err());
        assert_eq!(list_pages(&store).unwrap(), "june");
    }

    #[test]
    fn add_stops_at_capacity() {
        let (_dir, store) = store_with_page();
        for _ in 0..MAX_LAYOUT_OBJECTS {
            add_object(&store, "june", LayoutKind::Spacer, None).unwrap();
        }
        let text = add_object(&store, "june", LayoutKind::Text, None).unwrap();
        assert!(text.contains("nothing added"));
        assert_eq!(layout(&store).len(), MAX_LAYOUT_OBJECTS);
    }

    #[test]
    fn component_needs_custom_block() {
        let (_dir, store) = store_with_page();
        assert!(add_object(&store, "june", LayoutKind::Text, Some("PhotoGallery")).is_err());
        assert!(add_object(&store, "june", LayoutKind::CustomBlock, Some("Horoscope")).is_err());
        add_object(&store, "june", LayoutKind::CustomBlock, Some("photo-gallery")).unwrap();
        let LayoutObject::CustomBlock(block) = &layout(&store)[0] else {
            panic!("expected custom block");
        };
        assert_eq!(block.component, "PhotoGallery");
    }

    #[test]
    fn boundary_moves_are_reported_not_failed() {
        let (_dir, store) = store_with_page();
        add_object(&store, "june", LayoutKind::Text, None).unwrap();
        add_object(&store, "june", LayoutKind::Image, None).unwrap();

        assert!(move_object(&store, "june", 0, Direction::Up).unwrap().starts_with("Nothing moved"));
        move_object(&store, "june", 0, Direction::Down).unwrap();
        let kinds: Vec<LayoutKind> = layout(&store).iter().map(|o| o.kind()).collect();
        assert_eq!(kinds, vec![LayoutKind::Image, LayoutKind::Text]);

        assert!(remove_object(&store, "june", 7).unwrap().contains("nothing removed"));
        remove_object(&store, "june", 0).unwrap();
        assert_eq!(layout(&store).len(), 1);
    }

    #[test]
    fn update_reports_ignored_fields() {
        let (_dir, store) = store_with_page();
        add_object(&store, "june", LayoutKind::Text, None).unwrap();
        let text = update_object(&store, "june", 0, r#"{"title":"Brows","src":"x.jpg","type":"image"}"#)
            .unwrap();
        assert!(text.contains("src"));
        assert!(text.contains("type"));
        let LayoutObject::Text(obj) = &layout(&store)[0] else {
            panic!("variant must not change");
        };
        assert_eq!(obj.title, "Brows");

        assert!(update_object(&store, "june", 0, "[1]").is_err());
        assert!(update_object(&store, "june", 3, "{}").is_err());
    }

    #[test]
    fn loads_section_data_with_confirmation() {
        let (_dir, store) = store_with_page();
        add_object(&store, "june", LayoutKind::CustomBlock, Some("PhotoGallery")).unwrap();

        let found = find_section_data(&store, "june", "PhotoGallery").unwrap();
        assert!(found.contains("\"sectionId\": \"s1\""));

        apply_section_data(&store, "june", 0, "s1", false).unwrap();
        let again = apply_section_data(&store, "june", 0, "s1", false).unwrap();
        assert!(again.contains("overwrite=true"));
        apply_section_data(&store, "june", 0, "s1", true).unwrap();

        let LayoutObject::CustomBlock(block) = &layout(&store)[0] else {
            panic!("expected custom block");
        };
        assert_eq!(block.props["title"], "Marie's Corner");
        assert!(apply_section_data(&store, "june", 0, "missing", true).is_err());
    }

    #[test]
    fn unrelated_component_finds_nothing() {
        let (_dir, store) = store_with_page();
        let text = find_section_data(&store, "june", "Leaderboard").unwrap();
        assert!(text.starts_with("No sections"));
    }

    #[tokio::test]
    async fn uploads_once_per_content() {
        let (dir, store) = store_with_page();
        add_object(&store, "june", LayoutKind::Image, None).unwrap();
        add_object(&store, "june", LayoutKind::Image, None).unwrap();
        let photo = dir.path().join("brow.png");
        std::fs::write(&photo, b"not really a png").unwrap();
        let photo = photo.to_string_lossy().to_string();

        let mut cache = UploadCache::new();
        upload_image(&store, &mut cache, "june", 0, &photo).await.unwrap();
        upload_image(&store, &mut cache, "june", 1, &photo).await.unwrap();
        assert_eq!(cache.len(), 1);

        let objects = layout(&store);
        let (LayoutObject::Image(a), LayoutObject::Image(b)) = (&objects[0], &objects[1]) else {
            panic!("expected images");
        };
        assert!(a.src.starts_with("file://"));
        assert_eq!(a.src, b.src);

        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();
        let err = upload_image(&store, &mut cache, "june", 0, &notes.to_string_lossy())
            .await
            .unwrap_err();
        assert!(err.contains("unsupported content type"));
        assert_eq!(layout(&store)[0], objects[0]);
    }

    #[test]
    fn renders_tracked_email() {
        let doc = r#"{"subject":"June","sections":[{"type":"hero-banner","headline":"Soap Brows",
            "ctaText":"Book","ctaUrl":"https://glossy.example.com/book"}]}"#;
        let html = render_email(doc, Some("june")).unwrap();
        assert!(html.contains("Soap Brows"));
        assert!(html.contains("utm_campaign=june"));
        assert!(render_email("{\"sections\":1}", None).is_err());
    }

    #[test]
    fn model_suggestions() {
        let out = suggest_model("short-field", &["openai".to_string()]).unwrap();
        assert!(out.contains("gpt-4o-mini"));
        assert!(suggest_model("poem", &[]).is_err());
        assert!(field_prompts(Some("horoscope")).starts_with("No field prompts"));
        assert!(field_prompts(Some("cover-story")).contains("\"headline\""));
    }
}
