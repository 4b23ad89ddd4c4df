// ABOUTME: WordPress WXR export parsing library for wpexport.
// ABOUTME: Turns an export stream into typed site metadata, taxonomies, posts, pages, and attachments.

pub mod decoder;
pub mod error;
pub mod extract;
pub mod models;
pub mod observer;
pub mod options;
pub mod parser;
pub mod sanitize;
pub mod taxonomy;
pub mod time_parse;
pub mod wp_ext;

pub use error::WxrError;
pub use extract::{ItemKind, DEFAULT_IGNORED_POST_TYPES};
pub use models::{
    AttachmentInfo, CategoryInfo, CommonFields, PageInfo, PostInfo, PublishStatus, TagInfo,
    WebsiteInfo,
};
pub use observer::{DateScope, NoopObserver, ParseObserver, ParseSummary, SkipReason, TracingObserver};
pub use options::{ParserBuilder, ParserOptions};
pub use parser::{parse_export, Parser};
pub use sanitize::InvalidCharFilter;
pub use time_parse::{parse_flexible_time, parse_wp_timestamp};

