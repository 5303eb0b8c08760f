//! Diagnostic queue: collects diagnostics in emission order, counts errors
//! and enforces the error limit.

use crate::Diagnostic;

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            config,
        }
    }

    /// Queue a diagnostic. Returns `false` if it was filtered out.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() && self.limit_reached() {
            return false;
        }
        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }
        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.add(diag);
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Take the queued diagnostics, leaving the queue empty.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use exp_ir::Span;

    use super::*;
    use crate::{unknown_identifier, ErrorCode};

    #[test]
    fn test_queue_keeps_emission_order() {
        let mut queue = DiagnosticQueue::new();
        queue.add(unknown_identifier(Span::new(10, 11), "b"));
        queue.add(unknown_identifier(Span::new(0, 1), "a"));
        let flushed = queue.flush();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].primary_span(), Some(Span::new(10, 11)));
        assert!(queue.is_empty());
        assert_eq!(queue.error_count(), 0);
    }

    #[test]
    fn test_queue_error_limit() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
            error_limit: 2,
            deduplicate: false,
        });
        for i in 0..5 {
            queue.add(unknown_identifier(Span::new(i, i + 1), "x"));
        }
        assert_eq!(queue.error_count(), 2);
        assert!(queue.limit_reached());
        // Warnings still pass.
        assert!(queue.add(Diagnostic::warning(ErrorCode::E2005)));
    }

    #[test]
    fn test_queue_deduplicates() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.add(unknown_identifier(Span::new(0, 1), "x")));
        assert!(!queue.add(unknown_identifier(Span::new(0, 1), "x")));
        assert_eq!(queue.len(), 1);
    }
}
