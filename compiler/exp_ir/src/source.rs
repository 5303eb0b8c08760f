//! Source buffers and text ranges tied back to them.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::Span;

/// An immutable source buffer with its logical file name.
///
/// Shared via `Arc` between the reader, the syntax tree and diagnostics
/// rendering; nothing mutates it after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    text: String,
    /// Byte offset of the start of every line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(
                text.match_indices('\n')
                    .map(|(idx, _)| u32::try_from(idx + 1).unwrap_or(u32::MAX)),
            )
            .collect();
        Arc::new(SourceFile {
            name: name.into(),
            text,
            line_starts,
        })
    }

    /// Load a file from disk; the path becomes the logical name.
    pub fn read(path: &Path) -> io::Result<Arc<Self>> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), text))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        u32::try_from(self.text.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text covered by `span`, or `""` if the span is out of bounds.
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.to_range()).unwrap_or("")
    }

    /// 1-based line and column for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line as u32 + 1, offset - line_start + 1)
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}

/// A span paired with the buffer it points into.
#[derive(Clone, PartialEq, Eq)]
pub struct TextRange {
    span: Span,
    source: Arc<SourceFile>,
}

impl TextRange {
    pub fn new(span: Span, source: Arc<SourceFile>) -> Self {
        TextRange { span, source }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn min(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.span.end
    }

    #[inline]
    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// The covered text.
    pub fn text(&self) -> &str {
        self.source.slice(self.span)
    }

    /// Smallest range covering all of `ranges`. All ranges must share a buffer;
    /// returns `None` for an empty set.
    pub fn combine<'a>(ranges: impl IntoIterator<Item = &'a TextRange>) -> Option<TextRange> {
        let mut iter = ranges.into_iter();
        let first = iter.next()?;
        let span = iter.fold(first.span, |acc, r| {
            debug_assert!(Arc::ptr_eq(&first.source, &r.source));
            acc.merge(r.span)
        });
        Some(TextRange::new(span, Arc::clone(&first.source)))
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?} {:?}", self.source.name(), self.span, self.text())
    }
}
