// ABOUTME: Taxonomy extraction for channel-level wp:category and wp:tag records.
// ABOUTME: Produces flat CategoryInfo / TagInfo lists with term IDs kept as strings.

use crate::error::WxrError;
use crate::models::{CategoryInfo, TagInfo};
use crate::wp_ext::{CategoryRecord, TagRecord};

/// Converts `wp:category` records to CategoryInfo, keeping document order.
/// `category_parent` is not modeled.
pub fn categories_from(records: &[CategoryRecord]) -> Result<Vec<CategoryInfo>, WxrError> {
    records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let context = || format!("category #{}", idx + 1);
            Ok(CategoryInfo {
                id: required(&r.term_id, "wp:term_id", context)?,
                name: required(&r.cat_name, "wp:cat_name", context)?,
                nice_name: required(&r.category_nicename, "wp:category_nicename", context)?,
            })
        })
        .collect()
}

/// Converts `wp:tag` records to TagInfo, keeping document order.
pub fn tags_from(records: &[TagRecord]) -> Result<Vec<TagInfo>, WxrError> {
    records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let context = || format!("tag #{}", idx + 1);
            Ok(TagInfo {
                id: required(&r.term_id, "wp:term_id", context)?,
                name: required(&r.tag_name, "wp:tag_name", context)?,
                slug: required(&r.tag_slug, "wp:tag_slug", context)?,
            })
        })
        .collect()
}

fn required(
    value: &Option<String>,
    field: &'static str,
    context: impl Fn() -> String,
) -> Result<String, WxrError> {
    value.clone().ok_or_else(|| WxrError::missing(field, context()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn keeps_order_and_opaque_ids() {
        let records = vec![
            CategoryRecord {
                term_id: some("12"),
                cat_name: some("Travel"),
                category_nicename: some("travel"),
            },
            CategoryRecord {
                term_id: some("99999999999999999999"),
                cat_name: some("Food"),
                category_nicename: some("food"),
            },
        ];
        let categories = categories_from(&records).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].nice_name, "travel");
        assert_eq!(categories[1].id, "99999999999999999999");
    }

    #[test]
    fn empty_records_give_empty_list() {
        assert!(categories_from(&[]).unwrap().is_empty());
        assert!(tags_from(&[]).unwrap().is_empty());
    }

    #[test]
    fn missing_child_is_named() {
        let records = vec![TagRecord {
            term_id: some("5"),
            tag_name: some("Rust"),
            tag_slug: None,
        }];
        let err = tags_from(&records).unwrap_err();
        assert_eq!(err.to_string(), "missing required field wp:tag_slug on tag #1");
    }
}
