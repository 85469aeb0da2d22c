use serde::{Deserialize, Serialize};

use crate::html::{attr, button, heading, image, non_empty, paragraph, responsive_row, text};
use crate::RenderContext;

/// A card styled like an in-app modal: title, short body and one action.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CtaModal {
    pub title: String,
    pub body: String,
    pub image_url: String,
    pub cta_text: String,
    pub cta_url: String,
    pub dismiss_text: String,
    pub dismiss_url: String,
}

impl CtaModal {
    pub fn render(&self, ctx: &RenderContext) -> String {
        if !(non_empty(&self.title) && non_empty(&self.cta_text) && non_empty(&self.cta_url)) {
            return String::new();
        }

        let mut card = String::new();
        if non_empty(&self.image_url) {
            card.push_str("<div style=\"padding-bottom:20px;\">");
            card.push_str(&image(&self.image_url, "", 120, 60));
            card.push_str("</div>");
        }
        card.push_str(&heading(&self.title, 24, ctx));
        if non_empty(&self.body) {
            card.push_str(&paragraph(&self.body, ctx));
        }
        let card_end = self.dismiss_html(ctx);

        let desktop = format!(
            "<tr><td align=\"center\" style=\"padding:32px 40px;\"><table role=\"presentation\" width=\"440\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" style=\"border-radius:16px;border:1px solid #ececec;\"><tr><td align=\"center\" style=\"padding:32px;text-align:center;\">{}{}{}</td></tr></table></td></tr>",
            card,
            button(&self.cta_text, &self.cta_url, false, ctx),
            card_end
        );
        let mobile = format!(
            "<div style=\"margin:24px 16px;padding:24px 20px;border-radius:16px;border:1px solid #ececec;text-align:center;\">{}{}{}</div>",
            card,
            button(&self.cta_text, &self.cta_url, true, ctx),
            card_end
        );

        responsive_row(&desktop, &mobile)
    }

    fn dismiss_html(&self, ctx: &RenderContext) -> String {
        if !non_empty(&self.dismiss_text) {
            return String::new();
        }
        let style = format!(
            "display:block;padding-top:14px;font-family:{};font-size:13px;color:{};",
            attr(&ctx.brand.body_font), attr(&ctx.brand.muted)
        );
        if non_empty(&self.dismiss_url) {
            format!(
                "<a href=\"{}\" target=\"_blank\" style=\"{}\">{}</a>",
                attr(&ctx.link(&self.dismiss_url)),
                style,
                text(&self.dismiss_text)
            )
        } else {
            format!("<span style=\"{}\">{}</span>", style, text(&self.dismiss_text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal() -> CtaModal {
        CtaModal {
            title: "Claim your free brow tint".into(),
            body: "Valid until Sunday.".into(),
            cta_text: "Claim".into(),
            cta_url: "https://glossy.example/claim".into(),
            dismiss_text: "Maybe later".into(),
            ..Default::default()
        }
    }

    #[test]
    fn requires_title_and_action() {
        let ctx = RenderContext::default();
        assert_eq!(CtaModal { cta_url: String::new(), ..modal() }.render(&ctx), "");
        assert_eq!(CtaModal { cta_text: String::new(), ..modal() }.render(&ctx), "");
        assert_eq!(CtaModal { title: String::new(), ..modal() }.render(&ctx), "");
    }

    #[test]
    fn renders_dismiss_without_link() {
        let html = modal().render(&RenderContext::default());
        assert_eq!(html.matches("Maybe later</span>").count(), 2);
        assert_eq!(html.matches("href=\"https://glossy.example/claim\"").count(), 2);
    }
}
