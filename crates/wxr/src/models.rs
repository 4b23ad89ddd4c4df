// ABOUTME: Typed Rust models for a parsed WordPress site export.
// ABOUTME: WebsiteInfo aggregates site metadata, taxonomies, posts, pages, and attachments.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WxrError;

/// Everything extracted from one WXR export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsiteInfo {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub language: String,

    pub categories: Vec<CategoryInfo>,
    pub tags: Vec<TagInfo>,

    /// Uploaded media. Most consumers only care about the ones posts and
    /// pages actually reference.
    pub attachments: Vec<AttachmentInfo>,
    pub pages: Vec<PageInfo>,
    pub posts: Vec<PostInfo>,
}

/// A category term defined at the channel level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Term ID. Numeric in practice but kept opaque.
    pub id: String,
    pub name: String,
    pub nice_name: String,
}

/// A tag term defined at the channel level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Value of `wp:status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Publish,
    Draft,
    Pending,
    Inherit,
    Future,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Publish => "publish",
            PublishStatus::Draft => "draft",
            PublishStatus::Pending => "pending",
            PublishStatus::Inherit => "inherit",
            PublishStatus::Future => "future",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublishStatus {
    type Err = WxrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(PublishStatus::Publish),
            "draft" => Ok(PublishStatus::Draft),
            "pending" => Ok(PublishStatus::Pending),
            "inherit" => Ok(PublishStatus::Inherit),
            "future" => Ok(PublishStatus::Future),
            other => Err(WxrError::UnexpectedEnumValue {
                field: "wp:status",
                value: other.to_string(),
            }),
        }
    }
}

/// Fields shared by posts, pages, and attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    pub post_id: String,

    pub title: String,
    /// Absolute permalink, e.g. `https://example.com/about/`.
    pub link: String,
    /// Absent for items that were never published (drafts).
    pub publish_date: Option<DateTime<Utc>>,
    pub last_modified_date: DateTime<Utc>,
    pub publish_status: PublishStatus,
    pub content: String,
    /// May be empty.
    pub excerpt: String,

    /// Login of the author (`dc:creator`).
    pub author: Option<String>,
    /// `wp:post_name`; absent when WordPress never generated one.
    pub slug: Option<String>,
    /// Nice names of the categories this item is filed under.
    pub categories: Vec<String>,
    /// Slugs of the tags attached to this item.
    pub tags: Vec<String>,
}

macro_rules! content_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            pub common: CommonFields,
        }

        impl From<CommonFields> for $name {
            fn from(common: CommonFields) -> Self {
                Self { common }
            }
        }

        impl Deref for $name {
            type Target = CommonFields;

            fn deref(&self) -> &CommonFields {
                &self.common
            }
        }
    };
}

content_kind!(
    /// An item with `wp:post_type` of `post`.
    PostInfo
);
content_kind!(
    /// An item with `wp:post_type` of `page`.
    PageInfo
);
content_kind!(
    /// An item with `wp:post_type` of `attachment`.
    AttachmentInfo
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_status_accepts_closed_set() {
        for s in ["publish", "draft", "pending", "inherit", "future"] {
            let status: PublishStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn publish_status_rejects_other_values() {
        let err = "scheduled".parse::<PublishStatus>().unwrap_err();
        assert!(matches!(
            err,
            WxrError::UnexpectedEnumValue { field: "wp:status", ref value } if value == "scheduled"
        ));
        // Case matters: WordPress always writes lowercase.
        assert!("Publish".parse::<PublishStatus>().is_err());
    }
}
