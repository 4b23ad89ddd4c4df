// ABOUTME: Configuration options for the WXR parser and a fluent ParserBuilder.
// ABOUTME: Controls which post types are skipped and whether invalid characters are stripped.

use std::collections::HashSet;

use crate::extract::DEFAULT_IGNORED_POST_TYPES;
use crate::parser::Parser;

/// Configuration options for the WXR parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Post types skipped without any report above trace level.
    pub ignored_post_types: HashSet<String>,
    /// Remove XML-invalid control characters before decoding.
    pub strip_invalid_chars: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            ignored_post_types: DEFAULT_IGNORED_POST_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strip_invalid_chars: true,
        }
    }
}

/// Builder for constructing Parser instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    opts: ParserOptions,
}

impl ParserBuilder {
    /// Create a new ParserBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a post type to skip silently.
    pub fn ignore_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.opts.ignored_post_types.insert(post_type.into());
        self
    }

    /// Replace the whole ignore list.
    pub fn ignored_post_types<I, S>(mut self, post_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.ignored_post_types = post_types.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable control-character stripping.
    pub fn strip_invalid_chars(mut self, strip: bool) -> Self {
        self.opts.strip_invalid_chars = strip;
        self
    }

    /// Return the options as configured so far.
    pub fn options(&self) -> &ParserOptions {
        &self.opts
    }

    /// Build the Parser.
    pub fn build(self) -> Parser {
        Parser::with_options(self.opts)
    }
}
