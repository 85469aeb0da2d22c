//! Registry of content blocks that custom-block layout objects can reference.
//!
//! The set of blocks is closed: a block name resolves through
//! [`ContentBlockKind::from_name`] or not at all.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, schemars::JsonSchema)]
pub enum ContentBlockKind {
    PhotoGallery,
    StatsCta,
    Leaderboard,
    EventList,
    HeroBanner,
    QuoteCard,
    ProductSpotlight,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    LongText,
    Url,
    Image,
    Number,
    List,
}

/// One field of a content block's declared schema.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: false,
    }
}

const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
    }
}

const PHOTO_GALLERY: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text),
    field("subtitle", "Subtitle", FieldKind::Text),
    required("photos", "Photos", FieldKind::List),
];

const STATS_CTA: &[FieldSpec] = &[
    field("headline", "Headline", FieldKind::Text),
    required("stats", "Stats", FieldKind::List),
    field("ctaText", "Button text", FieldKind::Text),
    required("ctaUrl", "Button link", FieldKind::Url),
];

const LEADERBOARD: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text),
    required("entries", "Entries", FieldKind::List),
    field("ctaText", "Button text", FieldKind::Text),
    field("ctaUrl", "Button link", FieldKind::Url),
];

const EVENT_LIST: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text),
    required("events", "Events", FieldKind::List),
];

const HERO_BANNER: &[FieldSpec] = &[
    required("headline", "Headline", FieldKind::Text),
    field("subheadline", "Subheadline", FieldKind::LongText),
    field("imageUrl", "Image", FieldKind::Image),
    field("ctaText", "Button text", FieldKind::Text),
    field("ctaUrl", "Button link", FieldKind::Url),
];

const QUOTE_CARD: &[FieldSpec] = &[
    required("quote", "Quote", FieldKind::LongText),
    field("author", "Author", FieldKind::Text),
    field("authorTitle", "Author title", FieldKind::Text),
    field("imageUrl", "Portrait", FieldKind::Image),
];

const PRODUCT_SPOTLIGHT: &[FieldSpec] = &[
    required("productName", "Product name", FieldKind::Text),
    field("description", "Description", FieldKind::LongText),
    field("imageUrl", "Image", FieldKind::Image),
    field("price", "Price", FieldKind::Text),
    field("ctaUrl", "Shop link", FieldKind::Url),
];

impl ContentBlockKind {
    pub const ALL: [ContentBlockKind; 7] = [
        ContentBlockKind::PhotoGallery,
        ContentBlockKind::StatsCta,
        ContentBlockKind::Leaderboard,
        ContentBlockKind::EventList,
        ContentBlockKind::HeroBanner,
        ContentBlockKind::QuoteCard,
        ContentBlockKind::ProductSpotlight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContentBlockKind::PhotoGallery => "PhotoGallery",
            ContentBlockKind::StatsCta => "StatsCta",
            ContentBlockKind::Leaderboard => "Leaderboard",
            ContentBlockKind::EventList => "EventList",
            ContentBlockKind::HeroBanner => "HeroBanner",
            ContentBlockKind::QuoteCard => "QuoteCard",
            ContentBlockKind::ProductSpotlight => "ProductSpotlight",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ContentBlockKind::PhotoGallery => "media",
            ContentBlockKind::StatsCta | ContentBlockKind::Leaderboard => "engagement",
            ContentBlockKind::EventList
            | ContentBlockKind::HeroBanner
            | ContentBlockKind::QuoteCard => "editorial",
            ContentBlockKind::ProductSpotlight => "commerce",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            ContentBlockKind::PhotoGallery => PHOTO_GALLERY,
            ContentBlockKind::StatsCta => STATS_CTA,
            ContentBlockKind::Leaderboard => LEADERBOARD,
            ContentBlockKind::EventList => EVENT_LIST,
            ContentBlockKind::HeroBanner => HERO_BANNER,
            ContentBlockKind::QuoteCard => QUOTE_CARD,
            ContentBlockKind::ProductSpotlight => PRODUCT_SPOTLIGHT,
        }
    }

    /// Section types that historically held this block's content before
    /// pages were broken into typed blocks.
    pub fn legacy_section_types(&self) -> &'static [&'static str] {
        match self {
            ContentBlockKind::PhotoGallery => {
                &["maries-corner", "gallery", "photo-gallery", "behind-the-scenes"]
            }
            ContentBlockKind::StatsCta => &["stats", "by-the-numbers"],
            ContentBlockKind::Leaderboard => &["top-artists", "leaderboard"],
            ContentBlockKind::EventList => &["events", "upcoming-events"],
            ContentBlockKind::HeroBanner => &["cover", "cover-story", "hero"],
            ContentBlockKind::QuoteCard => &["quote", "testimonial", "pull-quote"],
            ContentBlockKind::ProductSpotlight => &["product-feature", "shop-the-look"],
        }
    }

    /// Resolve a block by name. Case, `-`, `_` and spaces are ignored, so
    /// "photo-gallery" and "PhotoGallery" are the same block.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL.into_iter().find(|k| normalize(k.name()) == wanted)
    }

    /// True when `section_type` names this block, its category, or one of
    /// its legacy section types.
    pub fn relates_to_section_type(&self, section_type: &str) -> bool {
        let t = normalize(section_type);
        t == normalize(self.name())
            || t == normalize(self.category())
            || self
                .legacy_section_types()
                .iter()
                .any(|legacy| normalize(legacy) == t)
    }

    /// A property bag with an empty value for every declared field.
    pub fn empty_props(&self) -> Map<String, Value> {
        self.fields()
            .iter()
            .map(|f| {
                let empty = match f.kind {
                    FieldKind::List => Value::Array(Vec::new()),
                    FieldKind::Number => Value::Null,
                    _ => Value::String(String::new()),
                };
                (f.name.to_string(), empty)
            })
            .collect()
    }
}

impl fmt::Display for ContentBlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase and drop separators so naming styles compare equal.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
