mod ops;

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use glossy_core::{Direction, LayoutKind, PageStore, UploadCache};

use crate::ops::OpResult;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct PageRequest {
    /// Page name (file name without .json), e.g. "june-issue"
    name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CreatePageRequest {
    /// Page name: letters, digits, '-' or '_'
    name: String,
    /// Display title. The slug is derived from it.
    title: String,
    /// Optional JSON array of existing sections: [{id, type, content, contentBlocks?}]
    sections: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AddObjectRequest {
    /// Page name
    page: String,
    /// Object type: "text", "image", "spacer", "link" or "custom-block"
    kind: LayoutKind,
    /// Content block name for custom-block objects, e.g. "PhotoGallery". See list_components.
    component: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct IndexRequest {
    /// Page name
    page: String,
    /// Zero-based position of the object in the layout
    index: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct MoveObjectRequest {
    /// Page name
    page: String,
    /// Zero-based position of the object to move
    index: usize,
    /// "up" moves toward index 0, "down" toward the end
    direction: Direction,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct UpdateObjectRequest {
    /// Page name
    page: String,
    /// Zero-based position of the object to update
    index: usize,
    /// JSON object of fields to merge, e.g. {"title": "Spring Looks", "width": 480}. Fields outside the object's type are ignored; the type itself cannot change.
    patch: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct FindSectionDataRequest {
    /// Page name
    page: String,
    /// Content block name, e.g. "PhotoGallery" or "photo-gallery"
    component: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ApplySectionDataRequest {
    /// Page name
    page: String,
    /// Index of the custom-block object to fill
    index: usize,
    /// ID of the section to copy from (see find_section_data)
    section_id: String,
    /// Replace data the object already holds. Default: false.
    overwrite: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct UploadImageRequest {
    /// Page name
    page: String,
    /// Index of the image object to fill
    index: usize,
    /// Absolute path of a local image or video file
    file_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct RenderEmailRequest {
    /// Email document JSON: {subject, preheader?, sections: [{type: "hero-banner" | "stats-cta" | "leaderboard" | "photo-gallery" | "event-list" | "cta-modal", ...}]}
    document: String,
    /// Campaign name. When set, outbound links carry utm_source=glossy, utm_medium=email and utm_campaign.
    campaign: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct FieldPromptsRequest {
    /// Section type, e.g. "cover-story". Omit to list every prompt.
    section_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SuggestModelRequest {
    /// "short-field", "long-form" or "full-section"
    task: String,
    /// Providers the user has keys for, e.g. ["openai", "anthropic"]
    providers: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GenerateCopyRequest {
    /// Page name. Its title and the section's existing copy are sent as context.
    page: String,
    /// Section type with field prompts, e.g. "cover-story"
    section_type: String,
    /// Single field to write. Omit to write every field of the section.
    field: Option<String>,
    /// What this issue or section is about
    brief: String,
}

fn respond(result: OpResult) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
    }
}

// --- Server ---

#[derive(Clone)]
pub struct GlossyServer {
    store: PageStore,
    uploads: Arc<Mutex<UploadCache>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GlossyServer {
    pub fn new(store: PageStore) -> Self {
        Self {
            store,
            uploads: Arc::new(Mutex::new(UploadCache::new())),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List all magazine pages")]
    fn list_pages(&self) -> Result<CallToolResult, McpError> {
        respond(ops::list_pages(&self.store))
    }

    #[tool(description = "Get the full JSON of a page: title, slug, sections and layout objects")]
    fn get_page(
        &self,
        Parameters(req): Parameters<PageRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::get_page(&self.store, &req.name))
    }

    #[tool(description = "Create an empty page, optionally seeded with existing sections")]
    fn create_page(
        &self,
        Parameters(req): Parameters<CreatePageRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::create_page(
            &self.store,
            &req.name,
            &req.title,
            req.sections.as_deref(),
        ))
    }

    #[tool(
        description = "Append a layout object with default values. A page holds at most 20 objects; adding to a full page changes nothing."
    )]
    fn add_object(
        &self,
        Parameters(req): Parameters<AddObjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::add_object(
            &self.store,
            &req.page,
            req.kind,
            req.component.as_deref(),
        ))
    }

    #[tool(description = "Remove the layout object at an index; later objects shift down")]
    fn remove_object(
        &self,
        Parameters(req): Parameters<IndexRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::remove_object(&self.store, &req.page, req.index))
    }

    #[tool(description = "Swap a layout object with its neighbor. Moving past either end changes nothing.")]
    fn move_object(
        &self,
        Parameters(req): Parameters<MoveObjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::move_object(&self.store, &req.page, req.index, req.direction))
    }

    #[tool(description = "Merge fields into a layout object. See list_components for each type's fields.")]
    fn update_object(
        &self,
        Parameters(req): Parameters<UpdateObjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::update_object(&self.store, &req.page, req.index, &req.patch))
    }

    #[tool(
        description = "List layout object types with their form fields, and the content blocks a custom-block can reference"
    )]
    fn list_components(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(ops::list_components())]))
    }

    #[tool(
        description = "Find existing page sections whose content fits a content block. Returns one match per section with the tier that found it (direct, extractor or generic) and the extracted data."
    )]
    fn find_section_data(
        &self,
        Parameters(req): Parameters<FindSectionDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::find_section_data(&self.store, &req.page, &req.component))
    }

    #[tool(
        description = "Copy a section's matched data into a custom-block object. Objects that already hold data need overwrite=true."
    )]
    fn apply_section_data(
        &self,
        Parameters(req): Parameters<ApplySectionDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::apply_section_data(
            &self.store,
            &req.page,
            req.index,
            &req.section_id,
            req.overwrite.unwrap_or(false),
        ))
    }

    #[tool(
        description = "Copy a local image or video into the Glossy media folder and set it as the source of an image object. Identical files are stored once per session."
    )]
    async fn upload_image(
        &self,
        Parameters(req): Parameters<UploadImageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut cache = self.uploads.lock().await;
        respond(ops::upload_image(&self.store, &mut cache, &req.page, req.index, &req.file_path).await)
    }

    #[tool(description = "Render an email document to responsive HTML")]
    fn render_email(
        &self,
        Parameters(req): Parameters<RenderEmailRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::render_email(&req.document, req.campaign.as_deref()))
    }

    #[tool(description = "Get the AI copy prompts for each CMS field of a section type")]
    fn get_field_prompts(
        &self,
        Parameters(req): Parameters<FieldPromptsRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(ops::field_prompts(
            req.section_type.as_deref(),
        ))]))
    }

    #[tool(description = "Recommend a model for a copy task from the given providers")]
    fn suggest_model(
        &self,
        Parameters(req): Parameters<SuggestModelRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(ops::suggest_model(&req.task, &req.providers))
    }

    #[tool(
        description = "Write copy for one field or a whole section with the configured AI provider (settings.json in the Glossy home)"
    )]
    async fn generate_copy(
        &self,
        Parameters(req): Parameters<GenerateCopyRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ops::generate_copy(
                &self.store,
                &req.page,
                &req.section_type,
                req.field.as_deref(),
                &req.brief,
            )
            .await,
        )
    }
}

const INSTRUCTIONS: &str = "\
Glossy page layout editor. A page has read-only sections (the existing magazine content) and a \
custom layout of up to 20 positioned objects: text, image, spacer, link and custom-block. \
Object order is list order; moves swap with a neighbor. A custom-block references a content block \
(see list_components) and can be filled from a matching section with find_section_data and \
apply_section_data.";

#[tool_handler]
impl ServerHandler for GlossyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let store = PageStore::open_default();
    tracing::info!(root = %store.root().display(), "glossy-mcp starting");

    let service = GlossyServer::new(store)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    Ok(())
}
