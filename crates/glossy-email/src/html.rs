//! Small string builders shared by the section renderers. Everything here
//! writes inline styles; email clients ignore most stylesheet rules.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::RenderContext;

pub(crate) fn text(s: &str) -> String {
    encode_text(s).into_owned()
}

pub(crate) fn attr(s: &str) -> String {
    encode_double_quoted_attribute(s).into_owned()
}

/// One email row holding a desktop table and its stacked mobile twin.
/// The mobile block stays hidden until the media query in the document
/// head swaps the two.
pub(crate) fn responsive_row(desktop: &str, mobile: &str) -> String {
    let mut out = String::with_capacity(desktop.len() + mobile.len() + 320);
    out.push_str("<tr><td style=\"padding:0;\">");
    out.push_str("<table role=\"presentation\" class=\"gl-desktop\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">");
    out.push_str(desktop);
    out.push_str("</table>");
    out.push_str("<div class=\"gl-mobile\" style=\"display:none;max-height:0;overflow:hidden;mso-hide:all;\">");
    out.push_str(mobile);
    out.push_str("</div>");
    out.push_str("</td></tr>\n");
    out
}

pub(crate) fn heading(s: &str, size: u32, ctx: &RenderContext) -> String {
    format!(
        "<h2 style=\"margin:0 0 12px;font-family:{};font-size:{}px;line-height:1.25;color:{};\">{}</h2>",
        attr(&ctx.brand.heading_font),
        size,
        attr(&ctx.brand.text),
        text(s)
    )
}

pub(crate) fn paragraph(s: &str, ctx: &RenderContext) -> String {
    format!(
        "<p style=\"margin:0 0 16px;font-family:{};font-size:15px;line-height:1.6;color:{};\">{}</p>",
        attr(&ctx.brand.body_font),
        attr(&ctx.brand.muted),
        text(s)
    )
}

/// A bulletproof button. `href` is tracked through the context.
pub(crate) fn button(label: &str, href: &str, full_width: bool, ctx: &RenderContext) -> String {
    let width = if full_width { "display:block;" } else { "display:inline-block;" };
    let mut out = String::new();
    let _ = write!(
        out,
        "<a href=\"{}\" target=\"_blank\" style=\"{}background:{};color:{};font-family:{};font-size:15px;font-weight:700;text-decoration:none;text-align:center;padding:14px 28px;border-radius:999px;\">{}</a>",
        attr(&ctx.link(href)),
        width,
        attr(&ctx.brand.accent),
        attr(&ctx.brand.on_accent),
        attr(&ctx.brand.body_font),
        text(label)
    );
    out
}

pub(crate) fn image(src: &str, alt: &str, width: u32, radius: u32) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" width=\"{}\" style=\"display:block;width:100%;max-width:{}px;height:auto;border:0;border-radius:{}px;\">",
        attr(src),
        attr(alt),
        width,
        width,
        radius
    )
}

pub(crate) fn non_empty(s: &str) -> bool {
    !s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(text("<b>Tom & Jo</b>"), "&lt;b&gt;Tom &amp; Jo&lt;/b&gt;");
        assert_eq!(attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn row_hides_mobile_block() {
        let row = responsive_row("<tr><td>D</td></tr>", "<p>M</p>");
        assert!(row.starts_with("<tr>"));
        assert!(row.contains("class=\"gl-desktop\""));
        assert!(row.contains("class=\"gl-mobile\" style=\"display:none;"));
    }
}
