//! Abstract Syntax Tree.
//!
//! Every node is either a *pair* (up to two children) or a *list* (an
//! ordered, growable run of children). Which shape a node has is decided by
//! its kind: kinds ordered before [`NodeKind::FIRST_LIST`] are pairs, the
//! rest are lists.
//!
//! Nodes and child lists live in two arenas owned by the [`Ast`], so the
//! whole tree is released at once when the `Ast` is dropped. Nodes are
//! addressed through [`NodeId`] handles.
//!
//! | kind      | content            | children                           |
//! |-----------|--------------------|------------------------------------|
//! | `Error`   | offending text     | none                               |
//! | `Type`    | type name          | none                               |
//! | `Ident`   | name               | none                               |
//! | `Literal` | literal text       | none                               |
//! | `Unary`   | operator           | left: operand                      |
//! | `Binary`  | operator           | left, right: operands              |
//! | `Assign`  | `=` or `op=`       | left: target, right: value         |
//! | `Return`  | `return`           | left: value                        |
//! | `While`   | `while`            | left: condition, right: body       |
//! | `Var`     | variable name      | left: type, right: initial value   |
//! | `Branch`  | `if`/`elif`/`else` | left: condition (none for else), right: body |
//! | `Block`   |                    | statements                         |
//! | `VarList` | `var`              | `Var` declarations                 |
//! | `If`      | `if`               | `Branch`es                         |
//! | `Call`    | callee name        | arguments                          |

use crate::arena::{Arena, Block};
use crate::error::Result;
use crate::span::Span;

/// Minimum region size of the node arena.
const NODE_REGION: usize = 256;
/// Minimum region size of the child-list arena.
const LIST_REGION: usize = 256;

/// Handle to a node of an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(Block);

/// The kind of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NodeKind {
    // === Pair-shaped ===
    /// Placeholder substituted where a node was required but missing.
    #[default]
    Error,
    Type,
    Ident,
    Literal,
    Unary,
    Binary,
    Assign,
    Return,
    While,
    Var,
    Branch,

    // === List-shaped ===
    Block,
    VarList,
    If,
    Call,
}

impl NodeKind {
    /// First list-shaped kind.
    pub const FIRST_LIST: NodeKind = NodeKind::Block;

    #[inline]
    pub fn is_list(self) -> bool {
        self >= Self::FIRST_LIST
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Type => "type",
            Self::Ident => "ident",
            Self::Literal => "literal",
            Self::Unary => "unary",
            Self::Binary => "binary",
            Self::Assign => "assign",
            Self::Return => "return",
            Self::While => "while",
            Self::Var => "var",
            Self::Branch => "branch",
            Self::Block => "block",
            Self::VarList => "var-list",
            Self::If => "if",
            Self::Call => "call",
        }
    }
}

/// Children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Pair {
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    List {
        /// Slots in the child-list arena; `count` of them are in use.
        children: Block,
        count: u32,
    },
}

impl Default for Shape {
    fn default() -> Self {
        Self::Pair {
            left: None,
            right: None,
        }
    }
}

/// A syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Node<'src> {
    pub kind: NodeKind,
    /// Operator text, identifier name or literal text, borrowed from source.
    pub content: &'src str,
    pub span: Span,
    pub shape: Shape,
}

/// An arena-owned syntax tree.
pub struct Ast<'src> {
    nodes: Arena<Node<'src>>,
    lists: Arena<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl<'src> Ast<'src> {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(NODE_REGION),
            lists: Arena::new(LIST_REGION),
            root: None,
            len: 0,
        }
    }

    fn alloc(&mut self, node: Node<'src>) -> Result<NodeId> {
        let block = self.nodes.alloc(1)?;
        self.nodes.set(block, 0, node);
        self.len += 1;
        Ok(NodeId(block))
    }

    /// Create a pair node with no children.
    ///
    /// # Panics
    /// Panics if `kind` is list-shaped.
    pub fn pair_node(&mut self, kind: NodeKind, content: &'src str, span: Span) -> Result<NodeId> {
        assert!(!kind.is_list(), "{} is not a pair kind", kind.name());
        self.alloc(Node {
            kind,
            content,
            span,
            shape: Shape::default(),
        })
    }

    /// Create an empty list node with room for `capacity` children.
    ///
    /// # Panics
    /// Panics if `kind` is pair-shaped.
    pub fn list_node(
        &mut self,
        capacity: usize,
        kind: NodeKind,
        content: &'src str,
        span: Span,
    ) -> Result<NodeId> {
        assert!(kind.is_list(), "{} is not a list kind", kind.name());
        let children = self.lists.alloc(capacity.max(1))?;
        self.alloc(Node {
            kind,
            content,
            span,
            shape: Shape::List { children, count: 0 },
        })
    }

    pub fn set_left(&mut self, id: NodeId, child: NodeId) {
        self.update_pair(id, |left, _| *left = Some(child));
    }

    pub fn set_right(&mut self, id: NodeId, child: NodeId) {
        self.update_pair(id, |_, right| *right = Some(child));
    }

    fn update_pair(&mut self, id: NodeId, f: impl FnOnce(&mut Option<NodeId>, &mut Option<NodeId>)) {
        let mut node = self.node(id);
        match &mut node.shape {
            Shape::Pair { left, right } => f(left, right),
            Shape::List { .. } => panic!("{} node has no left/right children", node.kind.name()),
        }
        self.nodes.set(id.0, 0, node);
    }

    /// Append `child` to the list node `parent`.
    ///
    /// When the list is full, a new node with twice the room is allocated,
    /// the children are copied over and its handle is returned. Callers must
    /// use the returned handle from then on.
    ///
    /// # Panics
    /// Panics if `parent` is a pair node.
    pub fn list_add(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        let node = self.node(parent);
        let Shape::List { children, count } = node.shape else {
            panic!("{} node has no child list", node.kind.name());
        };

        if (count as usize) < children.len() {
            self.lists.set(children, count as usize, child);
            self.nodes.set(
                parent.0,
                0,
                Node {
                    shape: Shape::List { children, count: count + 1 },
                    ..node
                },
            );
            return Ok(parent);
        }

        let grown = self.lists.alloc(children.len() * 2)?;
        self.lists.copy(children, grown, count as usize);
        self.lists.set(grown, count as usize, child);
        self.alloc(Node {
            shape: Shape::List {
                children: grown,
                count: count + 1,
            },
            ..node
        })
    }

    pub fn node(&self, id: NodeId) -> Node<'src> {
        self.nodes.get(id.0, 0)
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn content(&self, id: NodeId) -> &'src str {
        self.node(id).content
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Left child of a pair node; `None` for lists.
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).shape {
            Shape::Pair { left, .. } => left,
            Shape::List { .. } => None,
        }
    }

    /// Right child of a pair node; `None` for lists.
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).shape {
            Shape::Pair { right, .. } => right,
            Shape::List { .. } => None,
        }
    }

    /// Children of a list node in insertion order; empty for pairs.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id).shape {
            Shape::List { children, count } => self.lists.to_vec(children, count as usize),
            Shape::Pair { .. } => Vec::new(),
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of nodes allocated, including nodes replaced by list growth.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Ast<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ast<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ast")
            .field("root", &self.root)
            .field("len", &self.len)
            .finish()
    }
}
