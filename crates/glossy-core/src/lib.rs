pub mod blocks;
pub mod editor;
pub mod error;
pub mod extract;
pub mod layout;
pub mod media;
pub mod page;
pub mod settings;
pub mod store;

pub use blocks::{ContentBlockKind, FieldKind, FieldSpec};
pub use editor::{Direction, LayoutEditor};
pub use error::{Error, Result};
pub use extract::{apply_section_match, find_section_matches, ApplyOutcome, MatchTier, SectionMatch};
pub use layout::{
    CustomBlockObject, FormControl, FormField, Frame, ImageFit, ImageObject, LayoutKind,
    LayoutObject, LinkObject, LinkTarget, SpacerObject, TextAlign, TextObject, TextSpacing,
    Typography, MAX_LAYOUT_OBJECTS,
};
pub use media::{upload_image, LocalMediaStorage, MediaFile, MediaStorage, UploadCache};
pub use page::{ContentBlock, Page, Section};
pub use settings::{ai_configured, AiSettings};
pub use store::PageStore;
