//! Locating the `---` delimited frontmatter block.
//!
//! A block exists only when the very first line of the document is exactly
//! `---`. It ends at the next line that is exactly `---`. Without a closing
//! delimiter the block is [`BlockLocation::Unterminated`], which every
//! operation treats as absent.

use std::ops::Range;

/// The delimiter line that opens and closes a block.
pub const DELIMITER: &str = "---";

/// Line terminator style of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Byte offsets of a terminated block within its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    /// Lines between the delimiters, terminators included.
    pub content: Range<usize>,
    /// Offset just past the closing `---`, before its line terminator.
    /// The body is `text[end..]`.
    pub end: usize,
    /// Terminator of the opening delimiter line.
    pub line_ending: LineEnding,
}

impl BlockSpan {
    /// The block always starts at the beginning of the document.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        0..self.end
    }

    /// `true` for `---` immediately followed by `---`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Where (and whether) a document carries frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLocation {
    /// The first line is not a delimiter.
    Absent,
    /// Opened with `---` but never closed.
    Unterminated,
    Present(BlockSpan),
}

impl BlockLocation {
    #[must_use]
    pub fn span(&self) -> Option<&BlockSpan> {
        match self {
            Self::Present(span) => Some(span),
            Self::Absent | Self::Unterminated => None,
        }
    }
}

/// Find the frontmatter block of `text`.
#[must_use]
pub fn locate(text: &str) -> BlockLocation {
    let mut lines = Lines::new(text);

    let Some(first) = lines.next() else {
        return BlockLocation::Absent;
    };
    if first.content != DELIMITER {
        return BlockLocation::Absent;
    }
    let line_ending = if first.terminator == "\r\n" {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    };
    if first.terminator.is_empty() {
        return BlockLocation::Unterminated;
    }

    let content_start = first.end;
    for line in lines {
        if line.content == DELIMITER {
            return BlockLocation::Present(BlockSpan {
                content: content_start..line.start,
                end: line.start + DELIMITER.len(),
                line_ending,
            });
        }
    }
    BlockLocation::Unterminated
}

/// A line of text with its terminator split off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub start: usize,
    pub end: usize,
    /// Content and terminator together.
    pub raw: &'a str,
    pub content: &'a str,
    pub terminator: &'a str,
}

/// Iterator over lines that keeps byte offsets and terminators.
pub(crate) struct Lines<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let (raw, end) = match rest.find('\n') {
            Some(i) => (&rest[..=i], start + i + 1),
            None => (rest, self.text.len()),
        };
        self.pos = end;

        let content_len = if raw.ends_with("\r\n") {
            raw.len() - 2
        } else if raw.ends_with('\n') {
            raw.len() - 1
        } else {
            raw.len()
        };
        Some(Line {
            start,
            end,
            raw,
            content: &raw[..content_len],
            terminator: &raw[content_len..],
        })
    }
}
