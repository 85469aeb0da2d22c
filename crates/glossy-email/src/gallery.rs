use serde::{Deserialize, Serialize};

use crate::html::{attr, heading, image, non_empty, paragraph, responsive_row, text};
use crate::{RenderContext, CONTENT_WIDTH};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    pub url: String,
    pub caption: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoGallery {
    pub title: String,
    pub subtitle: String,
    pub photos: Vec<Photo>,
    /// Photos per desktop row, 1 to 4.
    pub columns: usize,
    /// Photos shown on mobile, where they stack one per row.
    pub mobile_limit: usize,
}

impl Default for PhotoGallery {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            photos: Vec::new(),
            columns: 3,
            mobile_limit: 4,
        }
    }
}

const GUTTER: u32 = 8;
const SIDE_PADDING: u32 = 32;

impl PhotoGallery {
    pub fn render(&self, ctx: &RenderContext) -> String {
        let photos: Vec<&Photo> = self.photos.iter().filter(|p| non_empty(&p.url)).collect();
        if photos.is_empty() {
            return String::new();
        }
        let columns = self.columns.clamp(1, 4);
        let inner = CONTENT_WIDTH - 2 * SIDE_PADDING;
        let cell = (inner - GUTTER * (columns as u32 - 1)) / columns as u32;

        let mut desktop = String::new();
        if non_empty(&self.title) || non_empty(&self.subtitle) {
            desktop.push_str(&format!(
                "<tr><td colspan=\"{}\" style=\"padding:32px {}px 12px;\">",
                columns, SIDE_PADDING
            ));
            if non_empty(&self.title) {
                desktop.push_str(&heading(&self.title, 24, ctx));
            }
            if non_empty(&self.subtitle) {
                desktop.push_str(&paragraph(&self.subtitle, ctx));
            }
            desktop.push_str("</td></tr>");
        }
        for row in photos.chunks(columns) {
            desktop.push_str("<tr>");
            for (i, photo) in row.iter().enumerate() {
                let left = if i == 0 { SIDE_PADDING } else { GUTTER / 2 };
                let right = if i + 1 == columns { SIDE_PADDING } else { GUTTER / 2 };
                desktop.push_str(&format!(
                    "<td width=\"{}\" valign=\"top\" style=\"padding:{}px {}px {}px {}px;\">{}</td>",
                    cell,
                    GUTTER / 2,
                    right,
                    GUTTER / 2,
                    left,
                    self.photo_html(photo, cell, ctx)
                ));
            }
            for _ in row.len()..columns {
                desktop.push_str(&format!("<td width=\"{}\"></td>", cell));
            }
            desktop.push_str("</tr>");
        }

        let mut mobile = String::from("<div style=\"padding:24px 20px;\">");
        if non_empty(&self.title) {
            mobile.push_str(&heading(&self.title, 22, ctx));
        }
        if non_empty(&self.subtitle) {
            mobile.push_str(&paragraph(&self.subtitle, ctx));
        }
        for photo in photos.iter().take(self.mobile_limit.max(1)) {
            mobile.push_str("<div style=\"padding-bottom:16px;\">");
            mobile.push_str(&self.photo_html(photo, inner, ctx));
            mobile.push_str("</div>");
        }
        mobile.push_str("</div>");

        responsive_row(&desktop, &mobile)
    }

    fn photo_html(&self, photo: &Photo, width: u32, ctx: &RenderContext) -> String {
        let img = image(&photo.url, &photo.caption, width, 8);
        let mut out = if non_empty(&photo.link) {
            format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                attr(&ctx.link(&photo.link)),
                img
            )
        } else {
            img
        };
        if non_empty(&photo.caption) {
            out.push_str(&format!(
                "<div style=\"padding-top:6px;font-family:{};font-size:13px;color:{};\">{}</div>",
                attr(&ctx.brand.body_font),
                attr(&ctx.brand.muted),
                text(&photo.caption)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(url: &str) -> Photo {
        Photo {
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn no_usable_photos_renders_nothing() {
        let gallery = PhotoGallery {
            title: "Backstage".into(),
            photos: vec![photo(" ")],
            ..Default::default()
        };
        assert_eq!(gallery.render(&RenderContext::default()), "");
    }

    #[test]
    fn pads_incomplete_rows() {
        let gallery = PhotoGallery {
            photos: vec![photo("a.jpg"), photo("b.jpg"), photo("c.jpg"), photo("d.jpg")],
            ..Default::default()
        };
        let html = gallery.render(&RenderContext::default());
        // 4 photos in rows of 3: the second row has two empty cells.
        assert_eq!(html.matches("<td width=\"173\"></td>").count(), 2);
    }

    #[test]
    fn mobile_shows_limited_photos() {
        let gallery = PhotoGallery {
            photos: (0..6).map(|i| photo(&format!("p{}.jpg", i))).collect(),
            mobile_limit: 2,
            ..Default::default()
        };
        let html = gallery.render(&RenderContext::default());
        let mobile = &html[html.find("gl-mobile").unwrap()..];
        assert!(mobile.contains("p1.jpg"));
        assert!(!mobile.contains("p2.jpg"));
    }
}
