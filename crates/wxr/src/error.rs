// ABOUTME: Error types for WXR export parsing.
// ABOUTME: Provides WxrError with decode, missing-field, timestamp, enum, and I/O variants.

use std::fmt;
use thiserror::Error;

/// Errors that abort a WXR parse. A parse either returns a complete
/// `WebsiteInfo` or one of these; there is no partial output.
#[derive(Debug, Error)]
pub enum WxrError {
    /// Reading the underlying stream failed.
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not well-formed XML or not an RSS feed.
    #[error("failed to decode export: {0}")]
    Decode(String),

    /// A required WordPress element is absent.
    #[error("missing required field {field} on {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    /// A timestamp did not match the `YYYY-MM-DD HH:MM:SS` layout.
    #[error("invalid {field} {value:?} on item {item:?}: {source}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        item: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A closed-set value (e.g. `wp:status`) held something outside the set.
    #[error("unexpected value {value:?} for {field}")]
    UnexpectedEnumValue { field: &'static str, value: String },
}

impl WxrError {
    /// Creates a Decode error from an underlying parser error.
    pub fn decode(err: impl fmt::Display) -> Self {
        WxrError::Decode(err.to_string())
    }

    /// Creates a MissingField error for the given element and location.
    pub fn missing(field: &'static str, context: impl Into<String>) -> Self {
        WxrError::MissingField {
            field,
            context: context.into(),
        }
    }

    /// Returns true if the error came from malformed XML or a non-RSS document.
    pub fn is_decode(&self) -> bool {
        matches!(self, WxrError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_field_and_context() {
        let err = WxrError::missing("wp:post_type", "item \"Hello\"");
        assert_eq!(
            err.to_string(),
            "missing required field wp:post_type on item \"Hello\""
        );
    }

    #[test]
    fn unexpected_enum_message_quotes_value() {
        let err = WxrError::UnexpectedEnumValue {
            field: "wp:status",
            value: "scheduled".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected value \"scheduled\" for wp:status");
    }

    #[test]
    fn decode_helper_wraps_display() {
        let err = WxrError::decode("unexpected end of file");
        assert!(err.is_decode());
        assert_eq!(err.to_string(), "failed to decode export: unexpected end of file");
    }
}
