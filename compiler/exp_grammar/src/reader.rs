//! Cursor over an immutable source buffer.
//!
//! Every `match_*` method either returns the consumed span and advances the
//! cursor, or returns `None` and leaves the cursor where it was.

use std::sync::Arc;

use exp_ir::{SourceFile, Span};
use regex::Regex;

#[derive(Clone, Debug)]
pub struct Reader {
    source: Arc<SourceFile>,
    pos: u32,
}

impl Reader {
    pub fn new(source: Arc<SourceFile>) -> Self {
        Reader { source, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: u32) {
        debug_assert!(pos <= self.source.len());
        self.pos = pos;
    }

    #[inline]
    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Unconsumed text.
    #[inline]
    pub fn rest(&self) -> &str {
        self.source.text().get(self.pos as usize..).unwrap_or("")
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Consume `n` bytes (clamped to the end of input).
    pub fn read_range(&mut self, n: u32) -> Span {
        let start = self.pos;
        let end = start.saturating_add(n).min(self.source.len());
        self.pos = end;
        Span::new(start, end)
    }

    /// Consume `lit` if the input continues with it.
    pub fn match_lit_range(&mut self, lit: &str) -> Option<Span> {
        if self.rest().starts_with(lit) {
            Some(self.read_range(lit.len() as u32))
        } else {
            None
        }
    }

    /// Consume the regex match anchored at the cursor. Empty matches fail.
    pub fn match_regex_range(&mut self, regex: &Regex) -> Option<Span> {
        let m = regex.find(self.rest())?;
        if m.start() != 0 || m.end() == 0 {
            return None;
        }
        Some(self.read_range(m.end() as u32))
    }

    /// Consume from `start` through the next `end` (inclusive), or to the end
    /// of input if `end` never appears.
    pub fn match_start_end(&mut self, start: &str, end: &str) -> Option<Span> {
        let rest = self.rest();
        let body = rest.strip_prefix(start)?;
        let len = match body.find(end) {
            Some(idx) => start.len() + idx + end.len(),
            None => rest.len(),
        };
        Some(self.read_range(len as u32))
    }
}
