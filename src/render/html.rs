//! Drawing of shaped rows and feed items as HTML fragments.

use std::fmt::Write;

use super::feed::FeedItem;
use super::table::{Cell, RowSet};
use crate::models::Icon;

/// Escape text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn icons_html(out: &mut String, icons: &[Icon]) {
    out.push_str(r#"<div class="member-icons-wrapper">"#);
    for icon in icons {
        let _ = write!(
            out,
            r#"<div class="user-with-icon"><img src="{}"><span>{}</span></div>"#,
            escape(&icon.pic),
            escape(&icon.name)
        );
    }
    out.push_str("</div>");
}

pub fn table_html(rows: &RowSet) -> String {
    let mut out = String::new();
    let style = if rows.hidden { r#" style="display:none""# } else { "" };
    let _ = write!(out, r#"<table id="{}"{}>"#, escape(&rows.table_id), style);

    out.push_str("<thead><tr>");
    for header in &rows.headers {
        let _ = write!(out, r#"<th entryKey="{}""#, escape(&header.name));
        if let Some(mode) = header.sort_mode {
            let _ = write!(out, r#" sortMode="{}""#, mode.as_str());
        }
        let _ = write!(out, ">{}</th>", escape(&header.label));
    }
    out.push_str("</tr></thead><tbody>");

    for row in &rows.rows {
        let _ = write!(out, r#"<tr entryId="{}">"#, row.entry_id);
        for cell in &row.cells {
            out.push_str("<td>");
            match cell {
                Cell::Text(text) => out.push_str(&escape(text)),
                Cell::Image(src) => {
                    let _ = write!(out, r#"<img src="{}">"#, escape(src));
                }
                Cell::Html(html) => out.push_str(html),
                Cell::Icons(icons) => icons_html(&mut out, icons),
            }
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub fn feed_html(items: &[FeedItem]) -> String {
    let mut out = String::from(r#"<div id="events-wrapper">"#);
    for item in items {
        let _ = write!(
            out,
            concat!(
                r#"<div class="event-item" entryId="{id}">"#,
                r#"<div class="user-wrapper"><img src="{pic}"><span>{name}</span></div>"#,
                r#"<div class="event-item-actual-content">{content}</div>"#,
                r#"<div class="event-item-date">{date}</div>"#,
                r#"<div class="readBy">{read_by}</div>"#,
                "</div>"
            ),
            id = item.entry_id,
            pic = escape(&item.author_pic),
            name = escape(&item.author_name),
            content = item.content,
            date = escape(&item.date_label),
            read_by = escape(&item.read_by_label),
        );
    }
    out.push_str("</div>");
    out
}
