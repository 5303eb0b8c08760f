//! Positional capture access for typed node constructors.
//!
//! A concrete grammar turns matched nodes into its own typed tree through
//! constructors of shape [`Constructor`]. [`Slots`] hands out the stored
//! sub-matches by position and reports a wrong shape as a [`BindError`]
//! instead of panicking.

use exp_ir::{InternalError, Span};

use crate::tree::{Capture, NodeId, SyntaxTree};
use crate::SyntaxKind;

/// Builds a `T` from a node's span and captures.
pub type Constructor<K, T> = fn(Span, Slots<'_, K>) -> Result<T, BindError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("`{kind}` has {found} captures but its constructor takes {expected}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
        node: NodeId,
    },

    #[error("capture {index} of `{kind}` should be {expected}")]
    Shape {
        kind: &'static str,
        index: usize,
        expected: &'static str,
        node: NodeId,
    },

    #[error("`{found}` cannot be bound as {expected}")]
    Unexpected {
        found: &'static str,
        expected: &'static str,
        node: NodeId,
    },

    /// A token the grammar accepted but whose value is out of range.
    #[error("invalid {what} literal `{text}`")]
    Literal {
        what: &'static str,
        text: String,
        span: Span,
    },

    /// A constructor refused a well-formed node.
    #[error("{message}")]
    Rejected { message: String, span: Span },
}

impl BindError {
    /// Whether the input, rather than the grammar, is at fault.
    pub fn is_user_error(&self) -> bool {
        matches!(self, BindError::Literal { .. })
    }

    /// Report a grammar/constructor mismatch as a compiler bug, with a dump
    /// of the offending subtree.
    pub fn into_internal<K: SyntaxKind>(self, tree: &SyntaxTree<K>) -> InternalError {
        match self {
            BindError::Arity {
                kind,
                expected,
                found,
                ..
            } => InternalError::Arity {
                kind: kind.to_string(),
                expected,
                found,
            },
            BindError::Shape { node, .. } | BindError::Unexpected { node, .. } => {
                InternalError::UnexpectedNode {
                    kind: tree.kind(node).name().to_string(),
                    span: tree.span(node),
                    dump: tree.dump(node),
                }
            }
            BindError::Literal { what, span, .. } => InternalError::UnexpectedNode {
                kind: what.to_string(),
                span,
                dump: String::new(),
            },
            BindError::Rejected { message, span } => InternalError::UnexpectedNode {
                kind: message,
                span,
                dump: String::new(),
            },
        }
    }
}

/// The captures of one node.
#[derive(Copy, Clone)]
pub struct Slots<'t, K> {
    tree: &'t SyntaxTree<K>,
    node: NodeId,
}

impl<'t, K: SyntaxKind> Slots<'t, K> {
    pub fn new(tree: &'t SyntaxTree<K>, node: NodeId) -> Self {
        Slots { tree, node }
    }

    pub fn tree(&self) -> &'t SyntaxTree<K> {
        self.tree
    }

    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn len(&self) -> usize {
        self.captures().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures().is_empty()
    }

    fn captures(&self) -> &'t [Capture] {
        self.tree.captures(self.node)
    }

    fn kind_name(&self) -> &'static str {
        self.tree.kind(self.node).name()
    }

    /// Fail unless the node has exactly `arity` captures.
    pub fn expect(&self, arity: usize) -> Result<(), BindError> {
        if self.len() == arity {
            Ok(())
        } else {
            Err(BindError::Arity {
                kind: self.kind_name(),
                expected: arity,
                found: self.len(),
                node: self.node,
            })
        }
    }

    fn shape(&self, index: usize, expected: &'static str) -> BindError {
        BindError::Shape {
            kind: self.kind_name(),
            index,
            expected,
            node: self.node,
        }
    }

    /// A sub-match that must be present.
    pub fn required(&self, index: usize) -> Result<NodeId, BindError> {
        match self.captures().get(index) {
            Some(Capture::Node(Some(id))) => Ok(*id),
            _ => Err(self.shape(index, "a node")),
        }
    }

    /// An optional sub-match.
    pub fn optional(&self, index: usize) -> Result<Option<NodeId>, BindError> {
        match self.captures().get(index) {
            Some(Capture::Node(node)) => Ok(*node),
            _ => Err(self.shape(index, "an optional node")),
        }
    }

    /// A list sub-match: `(elements, separators)`.
    pub fn list(&self, index: usize) -> Result<(&'t [NodeId], &'t [NodeId]), BindError> {
        self.captures()
            .get(index)
            .and_then(Capture::list)
            .ok_or_else(|| self.shape(index, "a list"))
    }
}

/// Run `ctor` on the node `id`.
pub fn bind<K: SyntaxKind, T>(
    tree: &SyntaxTree<K>,
    id: NodeId,
    ctor: Constructor<K, T>,
) -> Result<T, BindError> {
    ctor(tree.span(id), Slots::new(tree, id))
}
