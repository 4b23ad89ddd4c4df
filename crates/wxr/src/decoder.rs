// ABOUTME: Decodes a filtered WXR document into typed feed and item records.
// ABOUTME: Combines feed-rs for native RSS fields with the raw WordPress extension pass.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, FeedType, Link};

use crate::error::WxrError;
use crate::time_parse::{parse_flexible_time, published_date};
use crate::wp_ext::{parse_wp_extensions, ChannelExt, ItemExt};

/// A WXR export decoded into typed records, before classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WxrFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub language: String,
    pub wp: ChannelExt,
    pub items: Vec<WxrItem>,
}

/// One `<item>` with its native RSS fields and WordPress extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WxrItem {
    pub title: String,
    pub link: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub content: String,
    pub wp: ItemExt,
}

/// Decodes export bytes (already stripped of invalid characters).
///
/// Fails if the XML is malformed, the document is not RSS 2.0, or the two
/// passes disagree about how many items the channel holds.
pub fn decode_feed(data: &[u8]) -> Result<WxrFeed, WxrError> {
    let parsed = feed_rs::parser::parse(data).map_err(WxrError::decode)?;
    if parsed.feed_type != FeedType::RSS2 {
        return Err(WxrError::Decode(format!(
            "expected an RSS 2.0 export, found {:?}",
            parsed.feed_type
        )));
    }

    let ext = parse_wp_extensions(data)?;
    if ext.items.len() != parsed.entries.len() {
        return Err(WxrError::Decode(format!(
            "found {} items but {} WordPress item records",
            parsed.entries.len(),
            ext.items.len()
        )));
    }

    let items = parsed
        .entries
        .iter()
        .zip(ext.items)
        .map(|(entry, wp)| map_entry(entry, wp))
        .collect();

    let pub_date = resolve_date(parsed.published, ext.channel.pub_date.as_deref());
    // feed-rs trims text and normalises URLs, so the raw text wins.
    let title = ext
        .channel
        .title
        .clone()
        .or_else(|| parsed.title.map(|t| t.content))
        .unwrap_or_default();
    let link = ext
        .channel
        .link
        .clone()
        .unwrap_or_else(|| first_link(&parsed.links));
    let description = ext
        .channel
        .description
        .clone()
        .or_else(|| parsed.description.map(|d| d.content))
        .unwrap_or_default();

    Ok(WxrFeed {
        title,
        link,
        description,
        pub_date,
        language: parsed.language.unwrap_or_default(),
        wp: ext.channel,
        items,
    })
}

fn map_entry(entry: &Entry, wp: ItemExt) -> WxrItem {
    // content:encoded when present, otherwise description.
    let content = entry
        .content
        .as_ref()
        .and_then(|c| c.body.clone())
        .or_else(|| entry.summary.as_ref().map(|s| s.content.clone()))
        .unwrap_or_default();

    let title = wp
        .title
        .clone()
        .or_else(|| entry.title.as_ref().map(|t| t.content.clone()))
        .unwrap_or_default();
    let link = wp.link.clone().unwrap_or_else(|| first_link(&entry.links));

    WxrItem {
        title,
        link,
        pub_date: resolve_date(entry.published, wp.pub_date.as_deref()),
        content,
        wp,
    }
}

/// Prefers the date feed-rs parsed, falling back to our own parser on the
/// raw text. Placeholder dates for unpublished items become None.
fn resolve_date(parsed: Option<DateTime<Utc>>, raw: Option<&str>) -> Option<DateTime<Utc>> {
    match parsed {
        Some(dt) => published_date(dt),
        None => raw.and_then(parse_flexible_time),
    }
}

fn first_link(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| l.rel.as_deref() != Some("enclosure"))
        .map(|l| l.href.clone())
        .unwrap_or_default()
}
