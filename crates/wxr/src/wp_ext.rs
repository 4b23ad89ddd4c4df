// ABOUTME: Raw XML pass collecting the WordPress extension elements feed-rs does not expose.
// ABOUTME: Produces typed channel and per-item records (wp:*, excerpt:encoded, dc:creator, item terms).

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::WxrError;

/// One channel-level `<wp:category>` record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryRecord {
    pub term_id: Option<String>,
    pub cat_name: Option<String>,
    pub category_nicename: Option<String>,
}

/// One channel-level `<wp:tag>` record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TagRecord {
    pub term_id: Option<String>,
    pub tag_name: Option<String>,
    pub tag_slug: Option<String>,
}

/// An item-level `<category domain=".." nicename="..">`. Only the
/// attributes are kept; the display name lives in the channel taxonomy.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemTerm {
    pub domain: Option<String>,
    pub nicename: Option<String>,
}

/// WordPress data found directly under `<channel>`.
///
/// `title`, `link` and `description` hold the raw element text, untouched
/// by URL normalisation or trimming.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChannelExt {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    /// Raw `pubDate` text, kept for diagnostics and fallback parsing.
    pub pub_date: Option<String>,
    pub categories: Vec<CategoryRecord>,
    pub tags: Vec<TagRecord>,
}

/// WordPress data found directly under one `<item>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemExt {
    /// Raw `<title>` text.
    pub title: Option<String>,
    /// Raw `<link>` text.
    pub link: Option<String>,
    pub post_id: Option<String>,
    pub post_type: Option<String>,
    pub status: Option<String>,
    pub post_modified_gmt: Option<String>,
    pub post_name: Option<String>,
    /// `excerpt:encoded`, untrimmed.
    pub excerpt: Option<String>,
    /// `dc:creator`.
    pub creator: Option<String>,
    pub pub_date: Option<String>,
    pub terms: Vec<ItemTerm>,
}

/// Extension records for a whole export, items in document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedWpExtensions {
    pub channel: ChannelExt,
    pub items: Vec<ItemExt>,
}

/// Scans the document and collects WordPress extension elements.
///
/// Only direct children of `<channel>`, `<item>`, `<wp:category>` and
/// `<wp:tag>` are considered, so nested records such as `<wp:comment>` or
/// `<wp:postmeta>` never leak into the item's own fields.
pub fn parse_wp_extensions(data: &[u8]) -> Result<ParsedWpExtensions, WxrError> {
    let mut reader = Reader::from_reader(data);
    let mut collector = Collector::default();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            WxrError::decode(format!(
                "extension pass at byte {}: {}",
                reader.error_position(),
                e
            ))
        })?;
        match event {
            Event::Start(ref e) => collector.start(e),
            Event::Empty(ref e) => {
                collector.start(e);
                collector.end(&qualified_name(e));
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                collector.end(&name);
            }
            Event::Text(ref e) => {
                if collector.wants_text() {
                    let text = e.decode().map_err(WxrError::decode)?;
                    collector.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if collector.wants_text() {
                    let text = e.decode().map_err(WxrError::decode)?;
                    collector.text.push_str(&text);
                }
            }
            Event::GeneralRef(ref e) => {
                if collector.wants_text() {
                    push_entity(&mut collector.text, e)?;
                }
            }
            Event::Eof => {
                if collector.depth != 0 {
                    return Err(WxrError::Decode(format!(
                        "unexpected end of document with {} unclosed elements",
                        collector.depth
                    )));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(collector.finish())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TermKind {
    Category,
    Tag,
}

#[derive(Debug)]
struct OpenTerm {
    depth: usize,
    kind: TermKind,
    category: CategoryRecord,
    tag: TagRecord,
}

#[derive(Debug)]
struct OpenLeaf {
    depth: usize,
    name: String,
    domain: Option<String>,
    nicename: Option<String>,
}

/// Tracks where we are in the document while events stream past.
#[derive(Debug, Default)]
struct Collector {
    depth: usize,
    channel_depth: Option<usize>,
    item: Option<(usize, ItemExt)>,
    term: Option<OpenTerm>,
    leaf: Option<OpenLeaf>,
    text: String,
    result: ParsedWpExtensions,
}

impl Collector {
    fn wants_text(&self) -> bool {
        matches!(self.leaf, Some(ref leaf) if leaf.depth == self.depth)
    }

    fn start(&mut self, e: &BytesStart) {
        self.depth += 1;
        let name = qualified_name(e);
        let parent = self.depth - 1;

        match name.as_str() {
            "channel" if self.channel_depth.is_none() => {
                self.channel_depth = Some(self.depth);
                return;
            }
            "item" if self.item.is_none() && self.channel_depth == Some(parent) => {
                self.item = Some((self.depth, ItemExt::default()));
                return;
            }
            "wp:category" | "wp:tag" if self.item.is_none() && self.channel_depth == Some(parent) => {
                let kind = if name == "wp:category" {
                    TermKind::Category
                } else {
                    TermKind::Tag
                };
                self.term = Some(OpenTerm {
                    depth: self.depth,
                    kind,
                    category: CategoryRecord::default(),
                    tag: TagRecord::default(),
                });
                return;
            }
            _ => {}
        }

        let (domain, nicename) = if name == "category" {
            (get_attribute(e, "domain"), get_attribute(e, "nicename"))
        } else {
            (None, None)
        };
        self.leaf = Some(OpenLeaf {
            depth: self.depth,
            name,
            domain,
            nicename,
        });
        self.text.clear();
    }

    fn end(&mut self, name: &str) {
        let depth = self.depth;
        self.depth = depth.saturating_sub(1);

        let closes_leaf =
            matches!(self.leaf, Some(ref leaf) if leaf.depth == depth && leaf.name == name);
        if closes_leaf {
            if let Some(leaf) = self.leaf.take() {
                let text = std::mem::take(&mut self.text);
                self.assign(leaf, text, depth - 1);
            }
            return;
        }

        if name == "item" && matches!(self.item, Some((d, _)) if d == depth) {
            if let Some((_, item)) = self.item.take() {
                self.result.items.push(item);
            }
        } else if (name == "wp:category" || name == "wp:tag")
            && matches!(self.term, Some(ref t) if t.depth == depth)
        {
            if let Some(term) = self.term.take() {
                match term.kind {
                    TermKind::Category => self.result.channel.categories.push(term.category),
                    TermKind::Tag => self.result.channel.tags.push(term.tag),
                }
            }
        } else if name == "channel" && self.channel_depth == Some(depth) {
            self.channel_depth = None;
        }
    }

    /// Stores a finished leaf on whichever record is its direct parent.
    fn assign(&mut self, leaf: OpenLeaf, text: String, parent: usize) {
        if let Some((item_depth, item)) = self.item.as_mut() {
            if *item_depth == parent {
                assign_item_field(item, leaf, text);
            }
            return;
        }

        if let Some(term) = self.term.as_mut() {
            if term.depth == parent {
                let value = Some(text.trim().to_string());
                match (term.kind, leaf.name.as_str()) {
                    (_, "wp:term_id") => {
                        term.category.term_id = value.clone();
                        term.tag.term_id = value;
                    }
                    (TermKind::Category, "wp:cat_name") => term.category.cat_name = value,
                    (TermKind::Category, "wp:category_nicename") => {
                        term.category.category_nicename = value
                    }
                    (TermKind::Tag, "wp:tag_name") => term.tag.tag_name = value,
                    (TermKind::Tag, "wp:tag_slug") => term.tag.tag_slug = value,
                    _ => {}
                }
            }
            return;
        }

        if self.channel_depth == Some(parent) {
            let channel = &mut self.result.channel;
            match leaf.name.as_str() {
                "title" => channel.title = Some(text),
                "link" => channel.link = Some(text),
                "description" => channel.description = Some(text),
                "pubDate" => channel.pub_date = Some(text.trim().to_string()),
                _ => {}
            }
        }
    }

    fn finish(self) -> ParsedWpExtensions {
        self.result
    }
}

fn assign_item_field(item: &mut ItemExt, leaf: OpenLeaf, text: String) {
    let OpenLeaf {
        name,
        domain,
        nicename,
        ..
    } = leaf;
    // Excerpt, title and link are kept exactly as written.
    let trimmed = || Some(text.trim().to_string());
    match name.as_str() {
        "excerpt:encoded" => item.excerpt = Some(text.clone()),
        "title" => item.title = Some(text.clone()),
        "link" => item.link = Some(text.clone()),
        "wp:post_id" => item.post_id = trimmed(),
        "wp:post_type" => item.post_type = trimmed(),
        "wp:status" => item.status = trimmed(),
        "wp:post_modified_gmt" => item.post_modified_gmt = trimmed(),
        "wp:post_name" => item.post_name = trimmed(),
        "dc:creator" => item.creator = trimmed(),
        "pubDate" => item.pub_date = trimmed(),
        "category" => item.terms.push(ItemTerm { domain, nicename }),
        _ => {}
    }
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Gets an attribute value from an XML element.
fn get_attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Appends the text an entity reference stands for. Unknown entities and
/// invalid character references are kept verbatim.
fn push_entity(out: &mut String, reference: &BytesRef) -> Result<(), WxrError> {
    let name = reference.decode().map_err(WxrError::decode)?;
    if let Some(text) = resolve_predefined_entity(&name) {
        out.push_str(text);
    } else if let Ok(Some(c)) = reference.resolve_char_ref() {
        out.push(c);
    } else {
        out.push('&');
        out.push_str(&name);
        out.push(';');
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
    <title>Site</title>
    <pubDate>Wed, 10 May 2023 12:00:00 +0000</pubDate>
    <wp:category>
        <wp:term_id>3</wp:term_id>
        <wp:category_nicename><![CDATA[news]]></wp:category_nicename>
        <wp:category_parent><![CDATA[]]></wp:category_parent>
        <wp:cat_name><![CDATA[News &amp; Views]]></wp:cat_name>
    </wp:category>
    <wp:tag>
        <wp:term_id>7</wp:term_id>
        <wp:tag_slug><![CDATA[rust]]></wp:tag_slug>
        <wp:tag_name><![CDATA[Rust]]></wp:tag_name>
    </wp:tag>
    <item>
        <title>Hello</title>
        <dc:creator><![CDATA[admin]]></dc:creator>
        <excerpt:encoded><![CDATA[Short]]></excerpt:encoded>
        <wp:post_id>42</wp:post_id>
        <wp:post_modified_gmt><![CDATA[2023-05-10 12:00:00]]></wp:post_modified_gmt>
        <wp:post_name><![CDATA[hello]]></wp:post_name>
        <wp:status><![CDATA[publish]]></wp:status>
        <wp:post_type><![CDATA[post]]></wp:post_type>
        <category domain="category" nicename="news"><![CDATA[News]]></category>
        <category domain="post_tag" nicename="rust"><![CDATA[Rust]]></category>
        <wp:postmeta>
            <wp:meta_key><![CDATA[_edit_last]]></wp:meta_key>
            <wp:meta_value><![CDATA[1]]></wp:meta_value>
        </wp:postmeta>
        <wp:comment>
            <wp:comment_id>9</wp:comment_id>
            <wp:comment_date_gmt><![CDATA[2020-01-01 00:00:00]]></wp:comment_date_gmt>
        </wp:comment>
    </item>
    <item>
        <title>Empty</title>
        <wp:post_type>page</wp:post_type>
        <excerpt:encoded/>
    </item>
</channel>
</rss>"#;

    #[test]
    fn collects_channel_terms() {
        let ext = parse_wp_extensions(EXPORT.as_bytes()).unwrap();

        assert_eq!(
            ext.channel.pub_date.as_deref(),
            Some("Wed, 10 May 2023 12:00:00 +0000")
        );
        assert_eq!(
            ext.channel.categories,
            vec![CategoryRecord {
                term_id: Some("3".to_string()),
                cat_name: Some("News & Views".to_string()),
                category_nicename: Some("news".to_string()),
            }]
        );
        assert_eq!(
            ext.channel.tags,
            vec![TagRecord {
                term_id: Some("7".to_string()),
                tag_name: Some("Rust".to_string()),
                tag_slug: Some("rust".to_string()),
            }]
        );
    }

    #[test]
    fn collects_item_fields_in_order() {
        let ext = parse_wp_extensions(EXPORT.as_bytes()).unwrap();
        assert_eq!(ext.items.len(), 2);

        let post = &ext.items[0];
        assert_eq!(post.post_id.as_deref(), Some("42"));
        assert_eq!(post.post_type.as_deref(), Some("post"));
        assert_eq!(post.status.as_deref(), Some("publish"));
        assert_eq!(post.post_modified_gmt.as_deref(), Some("2023-05-10 12:00:00"));
        assert_eq!(post.post_name.as_deref(), Some("hello"));
        assert_eq!(post.excerpt.as_deref(), Some("Short"));
        assert_eq!(post.creator.as_deref(), Some("admin"));
        assert_eq!(post.terms.len(), 2);
        assert_eq!(post.terms[0].domain.as_deref(), Some("category"));
        assert_eq!(post.terms[1].nicename.as_deref(), Some("rust"));

        let page = &ext.items[1];
        assert_eq!(page.post_type.as_deref(), Some("page"));
        assert_eq!(page.excerpt.as_deref(), Some(""));
        assert!(page.post_id.is_none());
    }

    #[test]
    fn nested_records_do_not_leak_into_item() {
        let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.2/"><channel><item>
            <wp:comment><wp:status>spam</wp:status></wp:comment>
            <wp:status>draft</wp:status>
        </item></channel></rss>"#;
        let ext = parse_wp_extensions(xml.as_bytes()).unwrap();
        assert_eq!(ext.items[0].status.as_deref(), Some("draft"));
    }

    #[test]
    fn resolves_character_references() {
        let mut out = String::new();
        for name in ["#65", "#x42", "amp", "nbsp", "#0"] {
            push_entity(&mut out, &BytesRef::new(name)).unwrap();
        }
        assert_eq!(out, "AB&&nbsp;&#0;");
    }

    #[test]
    fn keeps_raw_title_and_link_text() {
        let xml = r#"<rss xmlns:atom="http://www.w3.org/2005/Atom"><channel>
            <title> Spaced Site </title>
            <link>https://example.com</link>
            <atom:link rel="self" href="https://example.com/feed/"/>
            <description>Tag &amp; line</description>
            <image><link>https://example.com/logo</link></image>
            <item>
                <title> Spaced </title>
                <link>https://Example.com/a b/</link>
            </item>
        </channel></rss>"#;
        let ext = parse_wp_extensions(xml.as_bytes()).unwrap();

        assert_eq!(ext.channel.title.as_deref(), Some(" Spaced Site "));
        assert_eq!(ext.channel.link.as_deref(), Some("https://example.com"));
        assert_eq!(ext.channel.description.as_deref(), Some("Tag & line"));
        assert_eq!(ext.items[0].title.as_deref(), Some(" Spaced "));
        assert_eq!(ext.items[0].link.as_deref(), Some("https://Example.com/a b/"));
    }

    #[test]
    fn truncated_document_is_decode_error() {
        let err = parse_wp_extensions(b"<rss><channel><item><wp:status>pub").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn malformed_xml_is_decode_error() {
        let err = parse_wp_extensions(b"<rss><channel><item></channel></rss>").unwrap_err();
        assert!(err.is_decode());
    }
}
