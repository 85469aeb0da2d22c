use serde::{Deserialize, Serialize};

use crate::html::{attr, button, heading, non_empty, responsive_row, text};
use crate::RenderContext;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: String,
    pub image_url: String,
    pub profile_url: String,
}

/// Ranked list of artists, clients or salons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Leaderboard {
    pub title: String,
    pub entries: Vec<LeaderboardEntry>,
    pub cta_text: String,
    pub cta_url: String,
    /// Number of ranks shown.
    pub limit: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self {
            title: String::new(),
            entries: Vec::new(),
            cta_text: String::new(),
            cta_url: String::new(),
            limit: 10,
        }
    }
}

const AVATAR_SIZE: u32 = 40;

impl Leaderboard {
    pub fn render(&self, ctx: &RenderContext) -> String {
        let entries: Vec<&LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|e| non_empty(&e.name))
            .take(self.limit.max(1))
            .collect();
        if entries.is_empty() {
            return String::new();
        }

        let mut desktop = String::new();
        if non_empty(&self.title) {
            desktop.push_str("<tr><td colspan=\"4\" style=\"padding:32px 40px 12px;\">");
            desktop.push_str(&heading(&self.title, 24, ctx));
            desktop.push_str("</td></tr>");
        }
        let mut mobile = String::from("<div style=\"padding:24px 20px;\">");
        if non_empty(&self.title) {
            mobile.push_str(&heading(&self.title, 22, ctx));
        }

        for (i, entry) in entries.iter().enumerate() {
            let rank = i + 1;
            let name = self.name_html(entry, ctx);
            let rank_color = attr(if rank <= 3 { &ctx.brand.accent } else { &ctx.brand.muted });
            let avatar = if non_empty(&entry.image_url) {
                format!(
                    "<img src=\"{}\" alt=\"\" width=\"{s}\" height=\"{s}\" style=\"display:block;border:0;border-radius:50%;\">",
                    attr(&entry.image_url),
                    s = AVATAR_SIZE
                )
            } else {
                String::new()
            };

            desktop.push_str(&format!(
                "<tr><td width=\"48\" align=\"center\" style=\"padding:10px 0 10px 40px;font-family:{font};font-size:18px;font-weight:700;color:{rank_color};\">{rank}</td>\
<td width=\"{w}\" style=\"padding:10px 12px;\">{avatar}</td>\
<td style=\"padding:10px 0;font-family:{font};font-size:16px;color:{color};\">{name}</td>\
<td align=\"right\" style=\"padding:10px 40px 10px 0;font-family:{font};font-size:16px;font-weight:700;color:{color};\">{score}</td></tr>",
                font = attr(&ctx.brand.body_font),
                rank_color = rank_color,
                rank = rank,
                w = AVATAR_SIZE,
                avatar = avatar,
                color = attr(&ctx.brand.text),
                name = name,
                score = text(&entry.score),
            ));

            mobile.push_str(&format!(
                "<div style=\"padding:8px 0;border-bottom:1px solid #eeeeee;font-family:{font};font-size:15px;color:{color};\"><strong style=\"color:{rank_color};\">{rank}.</strong> {name}",
                font = attr(&ctx.brand.body_font),
                color = attr(&ctx.brand.text),
                rank_color = rank_color,
                rank = rank,
                name = name,
            ));
            if non_empty(&entry.score) {
                mobile.push_str(&format!(
                    " <span style=\"float:right;font-weight:700;\">{}</span>",
                    text(&entry.score)
                ));
            }
            mobile.push_str("</div>");
        }

        if non_empty(&self.cta_text) && non_empty(&self.cta_url) {
            desktop.push_str(&format!(
                "<tr><td colspan=\"4\" align=\"center\" style=\"padding:20px 40px 36px;\">{}</td></tr>",
                button(&self.cta_text, &self.cta_url, false, ctx)
            ));
            mobile.push_str("<div style=\"padding-top:20px;\">");
            mobile.push_str(&button(&self.cta_text, &self.cta_url, true, ctx));
            mobile.push_str("</div>");
        }
        mobile.push_str("</div>");

        responsive_row(&desktop, &mobile)
    }

    fn name_html(&self, entry: &LeaderboardEntry, ctx: &RenderContext) -> String {
        if non_empty(&entry.profile_url) {
            format!(
                "<a href=\"{}\" target=\"_blank\" style=\"color:inherit;text-decoration:none;\">{}</a>",
                attr(&ctx.link(&entry.profile_url)),
                text(&entry.name)
            )
        } else {
            text(&entry.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: &str) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.into(),
            score: score.into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_board_renders_nothing() {
        let board = Leaderboard {
            entries: vec![entry("", "10")],
            ..Default::default()
        };
        assert_eq!(board.render(&RenderContext::default()), "");
    }

    #[test]
    fn ranks_in_order_up_to_limit() {
        let board = Leaderboard {
            title: "Top artists".into(),
            entries: vec![entry("Ana", "120"), entry("Bo", "98"), entry("Cy", "75")],
            limit: 2,
            ..Default::default()
        };
        let html = board.render(&RenderContext::default());
        let ana = html.find("Ana").unwrap();
        let bo = html.find("Bo").unwrap();
        assert!(ana < bo);
        assert!(!html.contains("Cy"));
        assert!(html.contains("<strong style=\"color:#d6336c;\">2.</strong>"));
    }

    #[test]
    fn limit_defaults_when_missing_from_json() {
        let board: Leaderboard =
            serde_json::from_str(r#"{"entries":[{"name":"Ana"}]}"#).unwrap();
        assert_eq!(board.limit, 10);
    }
}
