//! Event feed: events joined to their authors, as a templated list.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::table;
use crate::models::{Collection, CollectionConfig, Event, Roster, SortConfig, SortMode};

/// Fields the feed can be ordered by. `None` resets to id order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FeedSortField {
    None,
    Date,
    ReadBy,
}

impl FeedSortField {
    pub fn column(&self) -> &'static str {
        match self {
            FeedSortField::None => "id",
            FeedSortField::Date => "date",
            FeedSortField::ReadBy => "readBy",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub entry_id: u64,
    pub author_name: String,
    pub author_pic: String,
    /// Trusted HTML, drawn as is
    pub content: String,
    pub date: i64,
    pub date_label: String,
    pub read_by: u32,
    pub read_by_label: String,
}

/// Store the user's feed ordering in the events configuration.
pub fn set_feed_sort(config: &mut CollectionConfig, field: FeedSortField, mode: SortMode) {
    config.sort = match field {
        FeedSortField::None => SortConfig::by("id", SortMode::Asc),
        other => SortConfig::by(other.column(), mode),
    };
}

/// Build feed items in the configured order, skipping events whose author is gone.
pub fn render(events: &Collection<Event>, roster: &Roster<'_>) -> Vec<FeedItem> {
    table::sorted(&events.data, &events.config, roster)
        .into_iter()
        .filter_map(|event| {
            let Some(author) = roster.user(event.user_id) else {
                tracing::warn!(
                    "Skipping event {}: could not find user with id {}",
                    event.id,
                    event.user_id
                );
                return None;
            };

            Some(FeedItem {
                entry_id: event.id,
                author_name: author.name.clone(),
                author_pic: author.pic.clone(),
                content: event.content.clone(),
                date: event.date,
                date_label: format_date(event.date),
                read_by: event.read_by,
                read_by_label: format!("Read by {}", event.read_by),
            })
        })
        .collect()
}

/// Local date and time of a millisecond timestamp.
pub fn format_date(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(date) => date.format("%x %X").to_string(),
        None => "Invalid Date".to_string(),
    }
}
