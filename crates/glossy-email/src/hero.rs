use serde::{Deserialize, Serialize};

use crate::html::{button, heading, image, non_empty, paragraph, responsive_row};
use crate::{RenderContext, CONTENT_WIDTH};

/// Full-width banner: image, headline, optional subheadline and button.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroBanner {
    pub headline: String,
    pub subheadline: String,
    pub image_url: String,
    pub image_alt: String,
    pub cta_text: String,
    pub cta_url: String,
}

impl HeroBanner {
    pub fn render(&self, ctx: &RenderContext) -> String {
        if !non_empty(&self.headline) {
            return String::new();
        }

        let img = non_empty(&self.image_url)
            .then(|| image(&self.image_url, &self.image_alt, CONTENT_WIDTH, 0));
        let sub = non_empty(&self.subheadline).then(|| paragraph(&self.subheadline, ctx));
        let has_cta = non_empty(&self.cta_text) && non_empty(&self.cta_url);

        let mut desktop = String::new();
        if let Some(img) = &img {
            desktop.push_str("<tr><td style=\"padding:0;\">");
            desktop.push_str(img);
            desktop.push_str("</td></tr>");
        }
        desktop.push_str("<tr><td align=\"center\" style=\"padding:32px 48px;text-align:center;\">");
        desktop.push_str(&heading(&self.headline, 34, ctx));
        if let Some(sub) = &sub {
            desktop.push_str(sub);
        }
        if has_cta {
            desktop.push_str(&button(&self.cta_text, &self.cta_url, false, ctx));
        }
        desktop.push_str("</td></tr>");

        let mut mobile = String::new();
        if let Some(img) = &img {
            mobile.push_str(img);
        }
        mobile.push_str("<div style=\"padding:24px 20px;text-align:center;\">");
        mobile.push_str(&heading(&self.headline, 26, ctx));
        if let Some(sub) = &sub {
            mobile.push_str(sub);
        }
        if has_cta {
            mobile.push_str(&button(&self.cta_text, &self.cta_url, true, ctx));
        }
        mobile.push_str("</div>");

        responsive_row(&desktop, &mobile)
    }
}
