//! Server-rendered HTML email sections.
//!
//! Every section is a pure function of its display data: the same input
//! always renders the same bytes, and a section missing a required field
//! renders to an empty string instead of a partial fragment. Sections are
//! table rows; [`EmailDocument`] wraps them in a complete document whose
//! `<style>` block swaps each row's desktop table for its mobile twin on
//! narrow screens.

pub mod events;
pub mod gallery;
mod html;
pub mod hero;
pub mod leaderboard;
pub mod modal;
pub mod stats;
pub mod tracking;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use events::{EventItem, EventList};
pub use gallery::{Photo, PhotoGallery};
pub use hero::HeroBanner;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use modal::CtaModal;
pub use stats::{Stat, StatsCta};
pub use tracking::{track, Utm};

/// Width of the email body column, in pixels.
pub const CONTENT_WIDTH: u32 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    pub accent: String,
    pub on_accent: String,
    pub text: String,
    pub muted: String,
    pub background: String,
    pub heading_font: String,
    pub body_font: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            accent: "#d6336c".to_string(),
            on_accent: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            muted: "#5c5c5c".to_string(),
            background: "#f6f2ef".to_string(),
            heading_font: "'Playfair Display', Georgia, serif".to_string(),
            body_font: "'Helvetica Neue', Helvetica, Arial, sans-serif".to_string(),
        }
    }
}

/// Shared render inputs: brand styling and optional link tracking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderContext {
    pub brand: Brand,
    pub utm: Option<Utm>,
}

impl RenderContext {
    pub fn tracked(utm: Utm) -> Self {
        Self {
            brand: Brand::default(),
            utm: Some(utm),
        }
    }

    /// An outbound link with the campaign's UTM parameters, if any.
    pub fn link(&self, url: &str) -> String {
        match &self.utm {
            Some(utm) => track(url, utm),
            None => url.to_string(),
        }
    }
}

/// The closed set of section renderers, selected by the `"type"` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EmailSection {
    HeroBanner(HeroBanner),
    StatsCta(StatsCta),
    Leaderboard(Leaderboard),
    PhotoGallery(PhotoGallery),
    EventList(EventList),
    CtaModal(CtaModal),
}

impl EmailSection {
    pub fn render(&self, ctx: &RenderContext) -> String {
        match self {
            EmailSection::HeroBanner(s) => s.render(ctx),
            EmailSection::StatsCta(s) => s.render(ctx),
            EmailSection::Leaderboard(s) => s.render(ctx),
            EmailSection::PhotoGallery(s) => s.render(ctx),
            EmailSection::EventList(s) => s.render(ctx),
            EmailSection::CtaModal(s) => s.render(ctx),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            EmailSection::HeroBanner(_) => "hero-banner",
            EmailSection::StatsCta(_) => "stats-cta",
            EmailSection::Leaderboard(_) => "leaderboard",
            EmailSection::PhotoGallery(_) => "photo-gallery",
            EmailSection::EventList(_) => "event-list",
            EmailSection::CtaModal(_) => "cta-modal",
        }
    }
}

const MOBILE_STYLE: &str = "\
.gl-mobile{display:none;max-height:0;overflow:hidden;mso-hide:all;}\n\
@media only screen and (max-width: 600px){\n\
  .gl-container{width:100% !important;}\n\
  .gl-desktop{display:none !important;}\n\
  .gl-mobile{display:block !important;max-height:none !important;overflow:visible !important;}\n\
}\n";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailDocument {
    pub subject: String,
    #[serde(default)]
    pub preheader: String,
    #[serde(default)]
    pub sections: Vec<EmailSection>,
}

impl EmailDocument {
    /// Render a self-contained HTML document. Sections that render empty
    /// are left out.
    pub fn render(&self, ctx: &RenderContext) -> String {
        let mut body = String::new();
        for section in &self.sections {
            let html = section.render(ctx);
            if html.is_empty() {
                debug!(section = section.type_name(), "section skipped, missing required field");
            }
            body.push_str(&html);
        }

        let mut out = String::with_capacity(body.len() + 1024);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str("<title>");
        out.push_str(&html::text(&self.subject));
        out.push_str("</title>\n<style>\n");
        out.push_str(MOBILE_STYLE);
        out.push_str("</style>\n</head>\n");
        out.push_str(&format!(
            "<body style=\"margin:0;padding:0;background:{};\">\n",
            html::attr(&ctx.brand.background)
        ));
        if html::non_empty(&self.preheader) {
            out.push_str("<div style=\"display:none;max-height:0;overflow:hidden;\">");
            out.push_str(&html::text(&self.preheader));
            out.push_str("</div>\n");
        }
        out.push_str("<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td align=\"center\">\n");
        out.push_str(&format!(
            "<table role=\"presentation\" class=\"gl-container\" width=\"{}\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" style=\"background:#ffffff;\">\n",
            CONTENT_WIDTH
        ));
        out.push_str(&body);
        out.push_str("</table>\n</td></tr></table>\n</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn campaign() -> EmailDocument {
        serde_json::from_value(json!({
            "subject": "Your month in beauty",
            "preheader": "Top artists & new looks",
            "sections": [
                {"type": "hero-banner", "headline": "Spring is here",
                 "ctaText": "Book now", "ctaUrl": "https://glossy.example/book"},
                {"type": "stats-cta", "headline": "Your numbers", "stats": [{"value": "42", "label": "bookings"}],
                 "ctaText": "See more", "ctaUrl": ""},
                {"type": "leaderboard", "title": "Top artists",
                 "entries": [{"name": "Jo", "score": "98"}]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn document_embeds_mobile_breakpoint() {
        let html = campaign().render(&RenderContext::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("@media only screen and (max-width: 600px)"));
        assert!(html.contains("Top artists &amp; new looks"));
    }

    #[test]
    fn document_skips_sections_missing_required_fields() {
        let html = campaign().render(&RenderContext::default());
        assert!(html.contains("Spring is here"));
        assert!(!html.contains("Your numbers"));
        assert!(html.contains("Top artists"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = campaign();
        let ctx = RenderContext::tracked(Utm::email("monthly-recap"));
        assert_eq!(doc.render(&ctx), doc.render(&ctx));
        assert!(doc.render(&ctx).contains("utm_campaign=monthly-recap"));
    }

    #[test]
    fn brand_values_cannot_leave_style_attributes() {
        let mut ctx = RenderContext::default();
        ctx.brand.accent = "red\" onmouseover=\"alert(1)".to_string();
        ctx.brand.background = "#fff\"><script>x()</script>".to_string();
        let html = campaign().render(&ctx);
        assert!(!html.contains("\" onmouseover"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("red&quot; onmouseover=&quot;alert(1)"));
    }

    #[test]
    fn unknown_section_type_is_rejected() {
        let res: Result<EmailSection, _> = serde_json::from_value(json!({"type": "carousel"}));
        assert!(res.is_err());
    }
}
