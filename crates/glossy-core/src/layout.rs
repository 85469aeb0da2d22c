//! Layout objects: the positioned elements of a custom page layout.
//!
//! A page's `layout` is a JSON array of these records. Each record carries a
//! frame (position, size, stacking order) plus a variant payload, tagged by
//! its `"type"` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::blocks::ContentBlockKind;

/// Upper bound on the number of objects a single layout may hold.
pub const MAX_LAYOUT_OBJECTS: usize = 20;

const DEFAULT_WIDTH: f64 = 400.0;
const DEFAULT_HEIGHT: f64 = 200.0;
const SPACER_HEIGHT: f64 = 40.0;

// --- Shared pieces ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

impl Frame {
    fn sized(width: f64, height: f64, z_index: i32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            z_index,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Free-form style settings for one run of text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: u16,
    pub color: String,
    pub line_height: f64,
    pub align: TextAlign,
}

impl Default for Typography {
    fn default() -> Self {
        Self::body()
    }
}

impl Typography {
    pub fn title() -> Self {
        Self {
            font_size: 32.0,
            font_family: "Playfair Display".to_string(),
            font_weight: 700,
            color: "#1a1a1a".to_string(),
            line_height: 1.2,
            align: TextAlign::Left,
        }
    }

    pub fn subtitle() -> Self {
        Self {
            font_size: 18.0,
            font_family: "Inter".to_string(),
            font_weight: 500,
            color: "#4a4a4a".to_string(),
            line_height: 1.4,
            align: TextAlign::Left,
        }
    }

    pub fn body() -> Self {
        Self {
            font_size: 16.0,
            font_family: "Inter".to_string(),
            font_weight: 400,
            color: "#333333".to_string(),
            line_height: 1.6,
            align: TextAlign::Left,
        }
    }
}

/// Vertical gaps between the runs of a text object, in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSpacing {
    pub after_title: f64,
    pub after_subtitle: f64,
}

impl Default for TextSpacing {
    fn default() -> Self {
        Self {
            after_title: 12.0,
            after_subtitle: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    #[default]
    Url,
    Page,
    Section,
    Email,
}

// --- Variants ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    #[serde(flatten)]
    pub frame: Frame,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub title_style: Typography,
    pub subtitle_style: Typography,
    pub body_style: Typography,
    pub spacing: TextSpacing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageObject {
    #[serde(flatten)]
    pub frame: Frame,
    /// Storage reference returned by the upload service. Empty until uploaded.
    pub src: String,
    pub alt: String,
    pub fit: ImageFit,
    pub border_radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpacerObject {
    #[serde(flatten)]
    pub frame: Frame,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkObject {
    #[serde(flatten)]
    pub frame: Frame,
    pub target: LinkTarget,
    pub destination: String,
    pub label: String,
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomBlockObject {
    #[serde(flatten)]
    pub frame: Frame,
    /// Content block name, e.g. "PhotoGallery".
    pub component: String,
    pub category: String,
    pub props: Map<String, Value>,
}

impl CustomBlockObject {
    /// True when the property bag holds at least one non-empty value.
    pub fn has_data(&self) -> bool {
        self.props.values().any(|v| !is_empty_value(v))
    }
}

/// One positioned element of a custom page layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayoutObject {
    Text(TextObject),
    Image(ImageObject),
    Spacer(SpacerObject),
    Link(LinkObject),
    CustomBlock(CustomBlockObject),
}

impl LayoutObject {
    /// Build a fresh object of `kind` with the variant's default field values.
    pub fn new(kind: LayoutKind, z_index: i32) -> Self {
        let frame = Frame::sized(DEFAULT_WIDTH, DEFAULT_HEIGHT, z_index);
        match kind {
            LayoutKind::Text => LayoutObject::Text(TextObject {
                frame,
                title: String::new(),
                subtitle: String::new(),
                body: String::new(),
                title_style: Typography::title(),
                subtitle_style: Typography::subtitle(),
                body_style: Typography::body(),
                spacing: TextSpacing::default(),
            }),
            LayoutKind::Image => LayoutObject::Image(ImageObject {
                frame,
                src: String::new(),
                alt: String::new(),
                fit: ImageFit::Cover,
                border_radius: 0.0,
            }),
            LayoutKind::Spacer => LayoutObject::Spacer(SpacerObject {
                frame: Frame::sized(DEFAULT_WIDTH, SPACER_HEIGHT, z_index),
            }),
            LayoutKind::Link => LayoutObject::Link(LinkObject {
                frame,
                target: LinkTarget::Url,
                destination: String::new(),
                label: String::new(),
                open_in_new_tab: false,
            }),
            LayoutKind::CustomBlock => LayoutObject::CustomBlock(CustomBlockObject {
                frame,
                component: String::new(),
                category: String::new(),
                props: Map::new(),
            }),
        }
    }

    /// A custom block pre-wired to a known content block, with an empty
    /// value for every field the block declares.
    pub fn custom_block(block: ContentBlockKind, z_index: i32) -> Self {
        LayoutObject::CustomBlock(CustomBlockObject {
            frame: Frame::sized(DEFAULT_WIDTH, DEFAULT_HEIGHT, z_index),
            component: block.name().to_string(),
            category: block.category().to_string(),
            props: block.empty_props(),
        })
    }

    pub fn kind(&self) -> LayoutKind {
        match self {
            LayoutObject::Text(_) => LayoutKind::Text,
            LayoutObject::Image(_) => LayoutKind::Image,
            LayoutObject::Spacer(_) => LayoutKind::Spacer,
            LayoutObject::Link(_) => LayoutKind::Link,
            LayoutObject::CustomBlock(_) => LayoutKind::CustomBlock,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            LayoutObject::Text(o) => &o.frame,
            LayoutObject::Image(o) => &o.frame,
            LayoutObject::Spacer(o) => &o.frame,
            LayoutObject::Link(o) => &o.frame,
            LayoutObject::CustomBlock(o) => &o.frame,
        }
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        match self {
            LayoutObject::Text(o) => &mut o.frame,
            LayoutObject::Image(o) => &mut o.frame,
            LayoutObject::Spacer(o) => &mut o.frame,
            LayoutObject::Link(o) => &mut o.frame,
            LayoutObject::CustomBlock(o) => &mut o.frame,
        }
    }

    /// Short human-readable label for listings, e.g. `text "Spring Looks"`.
    pub fn summary(&self) -> String {
        match self {
            LayoutObject::Text(o) if !o.title.is_empty() => format!("text \"{}\"", o.title),
            LayoutObject::Image(o) if !o.src.is_empty() => format!("image {}", o.src),
            LayoutObject::Link(o) if !o.destination.is_empty() => {
                format!("link -> {}", o.destination)
            }
            LayoutObject::CustomBlock(o) if !o.component.is_empty() => {
                format!("custom-block {}", o.component)
            }
            other => other.kind().to_string(),
        }
    }
}

/// True for JSON values that carry no content: null, "", [], {}.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

// --- Variant discriminant and field schema ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    Text,
    Image,
    Spacer,
    Link,
    CustomBlock,
}

const FRAME_FIELDS: [&str; 5] = ["x", "y", "width", "height", "zIndex"];

impl LayoutKind {
    pub const ALL: [LayoutKind; 5] = [
        LayoutKind::Text,
        LayoutKind::Image,
        LayoutKind::Spacer,
        LayoutKind::Link,
        LayoutKind::CustomBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Text => "text",
            LayoutKind::Image => "image",
            LayoutKind::Spacer => "spacer",
            LayoutKind::Link => "link",
            LayoutKind::CustomBlock => "custom-block",
        }
    }

    /// Payload fields of this variant, excluding the shared frame fields.
    pub fn payload_fields(&self) -> &'static [&'static str] {
        match self {
            LayoutKind::Text => &[
                "title",
                "subtitle",
                "body",
                "titleStyle",
                "subtitleStyle",
                "bodyStyle",
                "spacing",
            ],
            LayoutKind::Image => &["src", "alt", "fit", "borderRadius"],
            LayoutKind::Spacer => &[],
            LayoutKind::Link => &["target", "destination", "label", "openInNewTab"],
            LayoutKind::CustomBlock => &["component", "category", "props"],
        }
    }

    /// Every field a patch may touch for this variant. `type` is never
    /// among them: the variant is fixed at creation.
    pub fn fields(&self) -> Vec<&'static str> {
        FRAME_FIELDS
            .iter()
            .chain(self.payload_fields())
            .copied()
            .collect()
    }

    pub fn accepts_field(&self, name: &str) -> bool {
        FRAME_FIELDS.contains(&name) || self.payload_fields().contains(&name)
    }

    /// Object-valued fields that a patch merges into instead of replacing.
    pub fn merges_field(&self, name: &str) -> bool {
        matches!(self, LayoutKind::Text)
            && matches!(name, "titleStyle" | "subtitleStyle" | "bodyStyle" | "spacing")
    }

    /// Form controls for the variant's editable fields, in display order.
    pub fn form_fields(&self) -> Vec<FormField> {
        let mut out = vec![
            FormField::new("x", "X", FormControl::Number),
            FormField::new("y", "Y", FormControl::Number),
            FormField::new("width", "Width", FormControl::Number),
            FormField::new("height", "Height", FormControl::Number),
            FormField::new("zIndex", "Layer", FormControl::Number),
        ];
        match self {
            LayoutKind::Text => out.extend([
                FormField::new("title", "Title", FormControl::Text),
                FormField::new("subtitle", "Subtitle", FormControl::Text),
                FormField::new("body", "Body", FormControl::TextArea),
                FormField::new("titleStyle", "Title style", FormControl::Typography),
                FormField::new("subtitleStyle", "Subtitle style", FormControl::Typography),
                FormField::new("bodyStyle", "Body style", FormControl::Typography),
                FormField::new("spacing", "Spacing", FormControl::Json),
            ]),
            LayoutKind::Image => out.extend([
                FormField::new("src", "Image", FormControl::Upload),
                FormField::new("alt", "Alt text", FormControl::Text),
                FormField::new("fit", "Fit", FormControl::Select(&["cover", "contain", "fill"])),
                FormField::new("borderRadius", "Corner radius", FormControl::Number),
            ]),
            LayoutKind::Spacer => {}
            LayoutKind::Link => out.extend([
                FormField::new(
                    "target",
                    "Link type",
                    FormControl::Select(&["url", "page", "section", "email"]),
                ),
                FormField::new("destination", "Destination", FormControl::Text),
                FormField::new("label", "Label", FormControl::Text),
                FormField::new("openInNewTab", "Open in new tab", FormControl::Toggle),
            ]),
            LayoutKind::CustomBlock => out.extend([
                FormField::new("component", "Component", FormControl::Text),
                FormField::new("category", "Category", FormControl::Text),
                FormField::new("props", "Properties", FormControl::Json),
            ]),
        }
        out
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LayoutKind::Text),
            "image" => Ok(LayoutKind::Image),
            "spacer" => Ok(LayoutKind::Spacer),
            "link" => Ok(LayoutKind::Link),
            "custom-block" | "customBlock" | "custom" => Ok(LayoutKind::CustomBlock),
            other => Err(format!(
                "Invalid layout object type '{}'. Must be: text, image, spacer, link, custom-block",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "control", content = "options")]
pub enum FormControl {
    Text,
    TextArea,
    Number,
    Typography,
    Select(&'static [&'static str]),
    Toggle,
    Upload,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub control: FormControl,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, control: FormControl) -> Self {
        Self {
            name,
            label,
            control,
        }
    }
}
