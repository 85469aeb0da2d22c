use serde::{Deserialize, Serialize};

use crate::html::{attr, button, heading, non_empty, responsive_row, text};
use crate::RenderContext;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

/// A row of headline numbers with a call to action underneath.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsCta {
    pub headline: String,
    pub stats: Vec<Stat>,
    pub cta_text: String,
    pub cta_url: String,
}

const MAX_STATS: usize = 4;

impl StatsCta {
    pub fn render(&self, ctx: &RenderContext) -> String {
        let stats: Vec<&Stat> = self
            .stats
            .iter()
            .filter(|s| non_empty(&s.value))
            .take(MAX_STATS)
            .collect();
        if stats.is_empty() || !non_empty(&self.cta_url) {
            return String::new();
        }
        let cta_text = if non_empty(&self.cta_text) {
            self.cta_text.as_str()
        } else {
            "Learn more"
        };

        let value_style = format!(
            "font-family:{};font-size:36px;font-weight:700;line-height:1.1;color:{};",
            attr(&ctx.brand.heading_font), attr(&ctx.brand.accent)
        );
        let label_style = format!(
            "font-family:{};font-size:13px;letter-spacing:0.08em;text-transform:uppercase;color:{};",
            attr(&ctx.brand.body_font), attr(&ctx.brand.muted)
        );

        let mut desktop = String::new();
        if non_empty(&self.headline) {
            desktop.push_str("<tr><td colspan=\"");
            desktop.push_str(&stats.len().to_string());
            desktop.push_str("\" align=\"center\" style=\"padding:32px 40px 8px;\">");
            desktop.push_str(&heading(&self.headline, 26, ctx));
            desktop.push_str("</td></tr>");
        }
        desktop.push_str("<tr>");
        let cell_width = 100 / stats.len();
        for stat in &stats {
            desktop.push_str(&format!(
                "<td width=\"{}%\" align=\"center\" valign=\"top\" style=\"padding:16px 8px;\"><div style=\"{}\">{}</div><div style=\"{}\">{}</div></td>",
                cell_width,
                value_style,
                text(&stat.value),
                label_style,
                text(&stat.label)
            ));
        }
        desktop.push_str("</tr>");
        desktop.push_str(&format!(
            "<tr><td colspan=\"{}\" align=\"center\" style=\"padding:16px 40px 36px;\">{}</td></tr>",
            stats.len(),
            button(cta_text, &self.cta_url, false, ctx)
        ));

        let mut mobile = String::from("<div style=\"padding:24px 20px;text-align:center;\">");
        if non_empty(&self.headline) {
            mobile.push_str(&heading(&self.headline, 22, ctx));
        }
        for stat in &stats {
            mobile.push_str(&format!(
                "<div style=\"padding:12px 0;\"><div style=\"{}\">{}</div><div style=\"{}\">{}</div></div>",
                value_style,
                text(&stat.value),
                label_style,
                text(&stat.label)
            ));
        }
        mobile.push_str(&button(cta_text, &self.cta_url, true, ctx));
        mobile.push_str("</div>");

        responsive_row(&desktop, &mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(n: usize) -> Vec<Stat> {
        (0..n)
            .map(|i| Stat {
                value: format!("{}", i * 10),
                label: format!("metric {}", i),
            })
            .collect()
    }

    #[test]
    fn missing_cta_url_renders_nothing() {
        let section = StatsCta {
            headline: "Your year".into(),
            stats: stats(3),
            cta_text: "Share".into(),
            cta_url: String::new(),
        };
        assert_eq!(section.render(&RenderContext::default()), "");
    }

    #[test]
    fn no_stats_renders_nothing() {
        let section = StatsCta {
            cta_url: "https://glossy.example".into(),
            stats: vec![Stat::default()],
            ..Default::default()
        };
        assert_eq!(section.render(&RenderContext::default()), "");
    }

    #[test]
    fn caps_stats_and_defaults_button_text() {
        let section = StatsCta {
            headline: String::new(),
            stats: stats(6),
            cta_text: String::new(),
            cta_url: "https://glossy.example/stats".into(),
        };
        let html = section.render(&RenderContext::default());
        assert!(html.contains("width=\"25%\""));
        assert!(html.contains("metric 3"));
        assert!(!html.contains("metric 4"));
        assert_eq!(html.matches("Learn more").count(), 2);
    }
}
