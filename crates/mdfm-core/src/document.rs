//! Document type: raw text split into frontmatter block and body.

use tracing::warn;

use crate::block::{self, BlockLocation, LineEnding};
use crate::frontmatter::{self, Frontmatter};

/// A borrowed document with its frontmatter block located.
///
/// The body is everything after the closing delimiter (starting with that
/// delimiter's line terminator), or the whole text when there is no block.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    text: &'a str,
    location: BlockLocation,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let location = block::locate(text);
        if location == BlockLocation::Unterminated {
            warn!("frontmatter block has no closing delimiter, treating it as absent");
        }
        Self { text, location }
    }

    #[must_use]
    pub fn location(&self) -> &BlockLocation {
        &self.location
    }

    #[must_use]
    pub fn has_frontmatter(&self) -> bool {
        self.location.span().is_some()
    }

    /// The block text, delimiters included.
    #[must_use]
    pub fn block(&self) -> Option<&'a str> {
        self.location.span().map(|span| &self.text[span.range()])
    }

    #[must_use]
    pub fn body(&self) -> &'a str {
        match self.location.span() {
            Some(span) => &self.text[span.end..],
            None => self.text,
        }
    }

    /// Parse the block. Absent and unterminated blocks give an empty mapping.
    #[must_use]
    pub fn frontmatter(&self) -> Frontmatter {
        match self.location.span() {
            Some(span) => frontmatter::parse(&self.text[span.content.clone()], span.line_ending),
            None => Frontmatter::with_line_ending(self.preferred_line_ending()),
        }
    }

    /// Reassemble the document around a new block, leaving the body untouched.
    ///
    /// Without an existing block, the new one is prepended and separated
    /// from the original text by a blank line.
    #[must_use]
    pub fn with_frontmatter(&self, fm: &Frontmatter) -> String {
        let block = fm.to_block();
        if self.has_frontmatter() {
            let body = self.body();
            let mut out = String::with_capacity(block.len() + body.len());
            out.push_str(&block);
            out.push_str(body);
            return out;
        }
        let nl = fm.line_ending().as_str();
        let mut out = String::with_capacity(block.len() + 2 * nl.len() + self.text.len());
        out.push_str(&block);
        out.push_str(nl);
        out.push_str(nl);
        out.push_str(self.text);
        out
    }

    fn preferred_line_ending(&self) -> LineEnding {
        if self.text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }
}
