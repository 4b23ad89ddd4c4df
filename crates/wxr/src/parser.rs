// ABOUTME: WXR parsing entry points: filter, decode, classify, and assemble WebsiteInfo.
// ABOUTME: Parser holds the options; observations go to a caller-supplied ParseObserver.

use std::io::Read;

use crate::decoder::{decode_feed, WxrFeed};
use crate::error::WxrError;
use crate::extract::{classify, extract_common, post_type, Classification, ItemKind};
use crate::models::{AttachmentInfo, PageInfo, PostInfo, WebsiteInfo};
use crate::observer::{DateScope, ParseObserver, ParseSummary, SkipReason, TracingObserver};
use crate::options::{ParserBuilder, ParserOptions};
use crate::sanitize::InvalidCharFilter;
use crate::taxonomy::{categories_from, tags_from};

/// Parses WordPress WXR exports into [`WebsiteInfo`].
///
/// A parser carries no per-parse state and can be reused.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    /// Creates a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses an export, reporting through `tracing`.
    pub fn parse<R: Read>(&self, reader: R) -> Result<WebsiteInfo, WxrError> {
        self.parse_with(reader, &mut TracingObserver)
    }

    /// Parses an export, reporting to `observer`.
    ///
    /// # Returns
    /// * `Ok(WebsiteInfo)` - every item was classified and extracted
    /// * `Err(WxrError)` - the first fatal problem; nothing partial is returned
    pub fn parse_with<R: Read>(
        &self,
        reader: R,
        observer: &mut dyn ParseObserver,
    ) -> Result<WebsiteInfo, WxrError> {
        let data = self.read_all(reader)?;
        let feed = decode_feed(&data)?;
        build_website(feed, &self.options, observer)
    }

    fn read_all<R: Read>(&self, reader: R) -> Result<Vec<u8>, WxrError> {
        let mut data = Vec::new();
        if self.options.strip_invalid_chars {
            InvalidCharFilter::new(reader).read_to_end(&mut data)?;
        } else {
            let mut reader = reader;
            reader.read_to_end(&mut data)?;
        }
        Ok(data)
    }
}

/// Parses an export with default options.
pub fn parse_export<R: Read>(reader: R) -> Result<WebsiteInfo, WxrError> {
    Parser::new().parse(reader)
}

/// Assembles the website model from a decoded feed.
pub fn build_website(
    feed: WxrFeed,
    options: &ParserOptions,
    observer: &mut dyn ParseObserver,
) -> Result<WebsiteInfo, WxrError> {
    if feed.pub_date.is_none() {
        observer.missing_publish_date(DateScope::Feed, feed.wp.pub_date.as_deref());
    }

    let mut attachments: Vec<AttachmentInfo> = Vec::new();
    let mut pages: Vec<PageInfo> = Vec::new();
    let mut posts: Vec<PostInfo> = Vec::new();
    let mut skipped = 0;

    for item in &feed.items {
        let wp_type = post_type(item)?;
        let kind = match classify(wp_type, &options.ignored_post_types) {
            Classification::Keep(kind) => kind,
            Classification::Ignored => {
                observer.skipped_item(&item.title, wp_type, SkipReason::Ignored);
                skipped += 1;
                continue;
            }
            Classification::Unknown => {
                observer.skipped_item(&item.title, wp_type, SkipReason::UnknownType);
                skipped += 1;
                continue;
            }
        };

        let common = extract_common(item)?;
        if common.publish_date.is_none() {
            observer.missing_publish_date(DateScope::Item(&item.title), item.wp.pub_date.as_deref());
        }
        observer.item_extracted(kind, &common);

        match kind {
            ItemKind::Attachment => attachments.push(common.into()),
            ItemKind::Page => pages.push(common.into()),
            ItemKind::Post => posts.push(common.into()),
        }
    }

    let website = WebsiteInfo {
        categories: categories_from(&feed.wp.categories)?,
        tags: tags_from(&feed.wp.tags)?,
        title: feed.title,
        link: feed.link,
        description: feed.description,
        pub_date: feed.pub_date,
        language: feed.language,
        attachments,
        pages,
        posts,
    };

    observer.finished(&ParseSummary::from_website(&website, skipped));
    Ok(website)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::WxrItem;
    use crate::wp_ext::ItemExt;

    fn item(title: &str, post_type: &str) -> WxrItem {
        WxrItem {
            title: title.to_string(),
            link: format!("https://example.com/{title}/"),
            wp: ItemExt {
                post_id: Some(title.to_string()),
                post_type: Some(post_type.to_string()),
                status: Some("publish".to_string()),
                post_modified_gmt: Some("2023-05-10 12:00:00".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct Counting {
        skipped: Vec<(String, SkipReason)>,
        summary: Option<ParseSummary>,
    }

    impl ParseObserver for Counting {
        fn skipped_item(&mut self, _title: &str, post_type: &str, reason: SkipReason) {
            self.skipped.push((post_type.to_string(), reason));
        }

        fn finished(&mut self, summary: &ParseSummary) {
            self.summary = Some(summary.clone());
        }
    }

    #[test]
    fn routes_items_to_their_lists() {
        let feed = WxrFeed {
            items: vec![
                item("a", "attachment"),
                item("b", "page"),
                item("c", "post"),
                item("d", "post"),
                item("e", "nav_menu_item"),
                item("f", "product"),
            ],
            ..Default::default()
        };
        let mut observer = Counting::default();
        let site = build_website(feed, &ParserOptions::default(), &mut observer).unwrap();

        assert_eq!(site.attachments.len(), 1);
        assert_eq!(site.pages.len(), 1);
        assert_eq!(site.posts.len(), 2);
        assert_eq!(site.posts[1].post_id, "d");
        assert_eq!(
            observer.skipped,
            vec![
                ("nav_menu_item".to_string(), SkipReason::Ignored),
                ("product".to_string(), SkipReason::UnknownType),
            ]
        );
        let summary = observer.summary.unwrap();
        assert_eq!(summary.posts, 2);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn skipped_items_are_not_validated() {
        // Plumbing items never reach field extraction, so junk there is fine.
        let mut menu = item("menu", "nav_menu_item");
        menu.wp.status = Some("whatever".to_string());
        let feed = WxrFeed {
            items: vec![menu],
            ..Default::default()
        };
        let site = build_website(feed, &ParserOptions::default(), &mut Counting::default()).unwrap();
        assert!(site.posts.is_empty());
    }

    #[test]
    fn one_bad_item_fails_everything() {
        let mut bad = item("bad", "page");
        bad.wp.post_modified_gmt = Some("not-a-date".to_string());
        let feed = WxrFeed {
            items: vec![item("good", "post"), bad],
            ..Default::default()
        };
        let mut observer = Counting::default();
        let err = build_website(feed, &ParserOptions::default(), &mut observer).unwrap_err();
        assert!(matches!(err, WxrError::InvalidTimestamp { .. }));
        assert!(observer.summary.is_none());
    }
}
