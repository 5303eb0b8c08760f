//! Reader context: cursor, skipper stack, node arena and step budget.

use std::sync::Arc;

use exp_ir::{SourceFile, Span};

use crate::tree::{NodeData, NodeId, SyntaxTree};
use crate::{Reader, Skipper, SyntaxKind};

/// Cursor position and arena length. Restoring truncates nodes built since.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pos: u32,
    nodes: usize,
}

impl Snapshot {
    #[inline]
    pub fn pos(self) -> u32 {
        self.pos
    }
}

pub struct ReaderContext<K> {
    reader: Reader,
    /// Never empty: the default skipper sits at the bottom.
    skippers: Vec<Skipper>,
    tree: SyntaxTree<K>,
    steps: u64,
    budget: u64,
    exhausted: bool,
}

impl<K: SyntaxKind> ReaderContext<K> {
    /// Context with the whitespace skipper installed and no step limit.
    pub fn new(source: Arc<SourceFile>) -> Self {
        Self::with_skipper(source, Skipper::default())
    }

    pub fn with_skipper(source: Arc<SourceFile>, skipper: Skipper) -> Self {
        ReaderContext {
            reader: Reader::new(Arc::clone(&source)),
            skippers: vec![skipper],
            tree: SyntaxTree::new(source),
            steps: 0,
            budget: u64::MAX,
            exhausted: false,
        }
    }

    /// Stop matching after `budget` matcher invocations.
    #[must_use]
    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.reader.pos()
    }

    #[inline]
    pub fn set_pos(&mut self, pos: u32) {
        self.reader.set_pos(pos);
    }

    pub fn reader_mut(&mut self) -> &mut Reader {
        &mut self.reader
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.reader.pos(),
            nodes: self.tree.len(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.reader.set_pos(snapshot.pos);
        self.tree.truncate(snapshot.nodes);
    }

    pub fn push_skipper(&mut self, skipper: Skipper) {
        self.skippers.push(skipper);
    }

    /// Pop the innermost skipper. The default skipper is never popped.
    pub fn pop_skipper(&mut self) {
        if self.skippers.len() > 1 {
            self.skippers.pop();
        }
    }

    pub fn skipper(&self) -> Skipper {
        self.skippers.last().copied().unwrap_or_default()
    }

    /// Where the next token would start, without moving the cursor.
    pub fn skipped_pos(&self) -> u32 {
        self.skipper()
            .skip(self.reader.source().text(), self.reader.pos())
    }

    /// Apply the active skipper to the cursor.
    pub fn skip(&mut self) -> u32 {
        let pos = self.skipped_pos();
        self.reader.set_pos(pos);
        pos
    }

    /// Count one matcher step. Returns `false` once the budget is spent.
    pub(crate) fn step(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        self.steps += 1;
        if self.steps > self.budget {
            tracing::warn!(budget = self.budget, pos = self.pos(), "matching step budget exhausted");
            self.exhausted = true;
            return false;
        }
        true
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn alloc(&mut self, data: NodeData<K>) -> NodeId {
        self.tree.push(data)
    }

    pub fn tree(&self) -> &SyntaxTree<K> {
        &self.tree
    }

    pub fn into_tree(self) -> SyntaxTree<K> {
        self.tree
    }

    pub(crate) fn span_of(&self, id: NodeId) -> Span {
        self.tree.span(id)
    }
}
