use serde::{Deserialize, Serialize};

use crate::html::{attr, heading, non_empty, responsive_row, text};
use crate::RenderContext;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EventItem {
    pub title: String,
    /// Display date, already formatted, e.g. "Sat 14 June".
    pub date: String,
    pub location: String,
    pub url: String,
}

impl EventItem {
    fn is_complete(&self) -> bool {
        non_empty(&self.title) && non_empty(&self.date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EventList {
    pub title: String,
    pub events: Vec<EventItem>,
}

impl EventList {
    pub fn render(&self, ctx: &RenderContext) -> String {
        let events: Vec<&EventItem> = self.events.iter().filter(|e| e.is_complete()).collect();
        if events.is_empty() {
            return String::new();
        }

        let date_style = format!(
            "font-family:{};font-size:12px;font-weight:700;letter-spacing:0.08em;text-transform:uppercase;color:{};",
            attr(&ctx.brand.body_font), attr(&ctx.brand.accent)
        );
        let title_style = format!(
            "font-family:{};font-size:17px;font-weight:700;color:{};text-decoration:none;",
            attr(&ctx.brand.body_font), attr(&ctx.brand.text)
        );
        let location_style = format!(
            "font-family:{};font-size:14px;color:{};",
            attr(&ctx.brand.body_font), attr(&ctx.brand.muted)
        );

        let mut desktop = String::new();
        let mut mobile = String::from("<div style=\"padding:24px 20px;\">");
        if non_empty(&self.title) {
            desktop.push_str("<tr><td colspan=\"2\" style=\"padding:32px 40px 8px;\">");
            desktop.push_str(&heading(&self.title, 24, ctx));
            desktop.push_str("</td></tr>");
            mobile.push_str(&heading(&self.title, 22, ctx));
        }

        for event in events {
            let title = if non_empty(&event.url) {
                format!(
                    "<a href=\"{}\" target=\"_blank\" style=\"{}\">{}</a>",
                    attr(&ctx.link(&event.url)),
                    title_style,
                    text(&event.title)
                )
            } else {
                format!("<span style=\"{}\">{}</span>", title_style, text(&event.title))
            };
            let location = if non_empty(&event.location) {
                format!("<div style=\"{}\">{}</div>", location_style, text(&event.location))
            } else {
                String::new()
            };

            desktop.push_str(&format!(
                "<tr><td width=\"140\" valign=\"top\" style=\"padding:12px 0 12px 40px;{}\">{}</td><td valign=\"top\" style=\"padding:12px 40px 12px 12px;border-bottom:1px solid #eeeeee;\">{}{}</td></tr>",
                date_style,
                text(&event.date),
                title,
                location
            ));
            mobile.push_str(&format!(
                "<div style=\"padding:12px 0;border-bottom:1px solid #eeeeee;\"><div style=\"{}\">{}</div>{}{}</div>",
                date_style,
                text(&event.date),
                title,
                location
            ));
        }
        mobile.push_str("</div>");

        responsive_row(&desktop, &mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_events_are_dropped() {
        let list = EventList {
            title: "Upcoming".into(),
            events: vec![EventItem {
                title: "Brow masterclass".into(),
                ..Default::default()
            }],
        };
        assert_eq!(list.render(&RenderContext::default()), "");
    }

    #[test]
    fn renders_each_event_twice() {
        let list = EventList {
            title: String::new(),
            events: vec![
                EventItem {
                    title: "Brow masterclass".into(),
                    date: "Sat 14 June".into(),
                    location: "Brooklyn".into(),
                    url: "https://glossy.example/e/1".into(),
                },
                EventItem {
                    title: "Lash lab".into(),
                    date: "Sun 15 June".into(),
                    ..Default::default()
                },
            ],
        };
        let html = list.render(&RenderContext::default());
        assert_eq!(html.matches("Brow masterclass").count(), 2);
        assert_eq!(html.matches("Lash lab").count(), 2);
        assert_eq!(html.matches("https://glossy.example/e/1").count(), 2);
        assert!(!html.contains("<h2"));
    }
}
