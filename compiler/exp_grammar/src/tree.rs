//! Syntax tree arena.
//!
//! Nodes are stored in one vector per parse and addressed by [`NodeId`].
//! Children are built before their parent; creating the parent stamps each
//! child's parent link, and nothing is re-parented afterwards. Once the
//! enclosing match returns the tree is read-only.

use std::fmt::{self, Write};
use std::sync::Arc;

use exp_ir::{SourceFile, Span, TextRange};

use crate::SyntaxKind;

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What produced a node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind<K> {
    /// A literal or regex match.
    Token,
    /// An anonymous sequence.
    Group,
    /// A list; its single capture holds elements and separators.
    List,
    /// An optional that did not match.
    Empty,
    /// A named grammar rule.
    Rule(K),
}

impl<K: SyntaxKind> NodeKind<K> {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Token => "token",
            NodeKind::Group => "group",
            NodeKind::List => "list",
            NodeKind::Empty => "empty",
            NodeKind::Rule(kind) => kind.name(),
        }
    }
}

/// One captured slot of a node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Capture {
    /// A sub-match; `None` for an optional that did not match.
    Node(Option<NodeId>),
    /// A list's elements and the separators between them.
    List {
        elements: Vec<NodeId>,
        separators: Vec<NodeId>,
    },
}

impl Capture {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Capture::Node(node) => *node,
            Capture::List { .. } => None,
        }
    }

    pub fn list(&self) -> Option<(&[NodeId], &[NodeId])> {
        match self {
            Capture::List {
                elements,
                separators,
            } => Some((elements, separators)),
            Capture::Node(_) => None,
        }
    }
}

/// The hole left by a committed match that could not continue.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expected {
    /// Human-readable description, e.g. "`;`" or "expression".
    pub what: String,
    /// Byte offset where it was expected.
    pub at: u32,
}

#[derive(Clone, Debug)]
pub struct NodeData<K> {
    pub kind: NodeKind<K>,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub captures: Vec<Capture>,
    /// False if this node, or any node inside it, stopped at a hole.
    pub complete: bool,
    pub hole: Option<Expected>,
}

pub struct SyntaxTree<K> {
    source: Arc<SourceFile>,
    nodes: Vec<NodeData<K>>,
}

impl<K: SyntaxKind> SyntaxTree<K> {
    pub(crate) fn new(source: Arc<SourceFile>) -> Self {
        SyntaxTree {
            source,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, data: NodeData<K>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        for &child in &data.children {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(data);
        id
    }

    /// Drop every node allocated after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &NodeData<K> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind<K> {
        self.get(id).kind
    }

    /// The rule kind, if `id` is a rule node.
    pub fn rule(&self, id: NodeId) -> Option<K> {
        match self.kind(id) {
            NodeKind::Rule(kind) => Some(kind),
            _ => None,
        }
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.source.slice(self.span(id))
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        TextRange::new(self.span(id), Arc::clone(&self.source))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    pub fn captures(&self, id: NodeId) -> &[Capture] {
        &self.get(id).captures
    }

    pub fn is_complete(&self, id: NodeId) -> bool {
        self.get(id).complete
    }

    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Indented outline of the subtree at `id`, for internal-error reports.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.get(id);
        let _ = write!(out, "{:indent$}{} {:?}", "", node.kind.name(), node.span, indent = depth * 2);
        if node.children.is_empty() {
            let _ = write!(out, " {:?}", self.text(id));
        }
        if !node.complete {
            out.push_str(" (incomplete)");
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_into(child, depth + 1, out);
        }
    }
}

impl<K: SyntaxKind> fmt::Debug for SyntaxTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("source", &self.source.name())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
