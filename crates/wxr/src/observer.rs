// ABOUTME: Observer hooks the parser calls for warnings, skipped items, and the final summary.
// ABOUTME: TracingObserver forwards them to `tracing`; NoopObserver discards them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::extract::ItemKind;
use crate::models::{CommonFields, WebsiteInfo};

/// Where a publish date was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateScope<'a> {
    Feed,
    /// Carries the item title.
    Item(&'a str),
}

/// Why an item did not make it into the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    UnknownType,
}

/// Counts reported once a parse completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub title: String,
    pub attachments: usize,
    pub pages: usize,
    pub posts: usize,
    pub categories: usize,
    pub tags: usize,
    pub skipped: usize,
}

impl ParseSummary {
    pub fn from_website(site: &WebsiteInfo, skipped: usize) -> Self {
        Self {
            title: site.title.clone(),
            attachments: site.attachments.len(),
            pages: site.pages.len(),
            posts: site.posts.len(),
            categories: site.categories.len(),
            tags: site.tags.len(),
            skipped,
        }
    }
}

/// Receives the parser's observations. Nothing here affects the result.
pub trait ParseObserver {
    /// A publish date was absent or could not be parsed.
    fn missing_publish_date(&mut self, _scope: DateScope<'_>, _raw: Option<&str>) {}

    /// An item was left out of the model.
    fn skipped_item(&mut self, _title: &str, _post_type: &str, _reason: SkipReason) {}

    /// An item was extracted.
    fn item_extracted(&mut self, _kind: ItemKind, _fields: &CommonFields) {}

    /// The parse finished successfully.
    fn finished(&mut self, _summary: &ParseSummary) {}
}

/// Discards every observation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

/// Emits observations as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn missing_publish_date(&mut self, scope: DateScope<'_>, raw: Option<&str>) {
        match scope {
            DateScope::Feed => warn!(raw = raw.unwrap_or(""), "could not parse feed publish date"),
            // Drafts routinely have no date.
            DateScope::Item(title) => debug!(title, raw = raw.unwrap_or(""), "item has no publish date"),
        }
    }

    fn skipped_item(&mut self, title: &str, post_type: &str, reason: SkipReason) {
        match reason {
            SkipReason::Ignored => trace!(title, post_type, "ignoring item"),
            SkipReason::UnknownType => info!(title, post_type, "ignoring item of unknown type"),
        }
    }

    fn item_extracted(&mut self, kind: ItemKind, fields: &CommonFields) {
        trace!(
            kind = kind.as_str(),
            post_id = %fields.post_id,
            title = %fields.title,
            status = %fields.publish_status,
            "extracted item"
        );
    }

    fn finished(&mut self, summary: &ParseSummary) {
        info!(
            num_attachments = summary.attachments,
            num_pages = summary.pages,
            num_posts = summary.posts,
            num_categories = summary.categories,
            num_tags = summary.tags,
            num_skipped = summary.skipped,
            "parsed website {}",
            summary.title
        );
    }
}
