// ABOUTME: Classifies decoded items by wp:post_type and extracts their typed fields.
// ABOUTME: Builds the CommonFields shared by posts, pages, and attachments.

use std::collections::HashSet;
use std::fmt;

use crate::decoder::WxrItem;
use crate::error::WxrError;
use crate::models::{CommonFields, PublishStatus};
use crate::time_parse::parse_wp_timestamp;

/// The post types that end up in the website model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Attachment,
    Page,
    Post,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Attachment => "attachment",
            ItemKind::Page => "page",
            ItemKind::Post => "post",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of looking at an item's post type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Keep(ItemKind),
    /// One of the configured housekeeping types (menus, custom CSS, ...).
    Ignored,
    /// A post type we know nothing about, e.g. from a plugin.
    Unknown,
}

/// Post types WordPress uses for site plumbing rather than content.
pub const DEFAULT_IGNORED_POST_TYPES: [&str; 5] = [
    "amp_validated_url",
    "nav_menu_item",
    "custom_css",
    "wp_global_styles",
    "wp_navigation",
];

/// Maps a post type to what should happen to the item. The ignore list is
/// consulted first so callers can drop even built-in types.
pub fn classify(post_type: &str, ignored: &HashSet<String>) -> Classification {
    if ignored.contains(post_type) {
        return Classification::Ignored;
    }
    match post_type {
        "attachment" => Classification::Keep(ItemKind::Attachment),
        "page" => Classification::Keep(ItemKind::Page),
        "post" => Classification::Keep(ItemKind::Post),
        _ => Classification::Unknown,
    }
}

/// Returns the item's post type, which every WXR item must carry.
pub fn post_type(item: &WxrItem) -> Result<&str, WxrError> {
    item.wp
        .post_type
        .as_deref()
        .ok_or_else(|| WxrError::missing("wp:post_type", describe(item)))
}

/// Extracts the fields shared by every content kind.
///
/// The last-modified timestamp and status are mandatory; a bad value in
/// either fails the whole parse.
pub fn extract_common(item: &WxrItem) -> Result<CommonFields, WxrError> {
    let modified_raw = item
        .wp
        .post_modified_gmt
        .as_deref()
        .ok_or_else(|| WxrError::missing("wp:post_modified_gmt", describe(item)))?;
    let last_modified_date =
        parse_wp_timestamp(modified_raw).map_err(|source| WxrError::InvalidTimestamp {
            field: "wp:post_modified_gmt",
            value: modified_raw.to_string(),
            item: item.title.clone(),
            source,
        })?;

    let publish_status: PublishStatus = item
        .wp
        .status
        .as_deref()
        .ok_or_else(|| WxrError::missing("wp:status", describe(item)))?
        .parse()?;

    let post_id = item
        .wp
        .post_id
        .clone()
        .ok_or_else(|| WxrError::missing("wp:post_id", describe(item)))?;

    let (categories, tags) = term_slugs(item);

    Ok(CommonFields {
        post_id,
        title: item.title.clone(),
        link: item.link.clone(),
        publish_date: item.pub_date,
        last_modified_date,
        publish_status,
        content: item.content.clone(),
        excerpt: item.wp.excerpt.clone().unwrap_or_default(),
        author: item.wp.creator.clone().filter(|s| !s.is_empty()),
        slug: item.wp.post_name.clone().filter(|s| !s.is_empty()),
        categories,
        tags,
    })
}

/// Splits the item's `<category>` references into category and tag slugs.
fn term_slugs(item: &WxrItem) -> (Vec<String>, Vec<String>) {
    let mut categories = Vec::new();
    let mut tags = Vec::new();
    for term in &item.wp.terms {
        let Some(slug) = term.nicename.clone() else {
            continue;
        };
        match term.domain.as_deref() {
            Some("category") => categories.push(slug),
            Some("post_tag") => tags.push(slug),
            _ => {}
        }
    }
    (categories, tags)
}

fn describe(item: &WxrItem) -> String {
    match item.wp.post_id.as_deref() {
        Some(id) => format!("item {:?} (post {})", item.title, id),
        None => format!("item {:?}", item.title),
    }
}
