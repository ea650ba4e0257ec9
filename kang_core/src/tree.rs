use crate::lr::{RuleId, TerminalId};
use crate::token::{Position, Token};

/// A node in the parse tree: a terminal (one token from the source), a
/// variable replacement, or an error marker left behind by recovery. Nodes
/// own their children; there are no parent links.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T> {
    /// A token matched against a terminal of the grammar.
    Terminal { token: T },
    /// A variable replaced by the given rule.
    Variable {
        rule: RuleId,
        children: Vec<Node<T>>,
        /// The tokenizer position when the node was created; the node's
        /// span when it has no children.
        fallback: Position,
    },
    /// A syntax error recovered via an error rule.
    Error {
        /// The offending token, if the error was not at end of input.
        token: Option<T>,
        /// The terminals that would have been valid at the point of the
        /// error.
        expected: Vec<TerminalId>,
        position: Position,
    },
}

impl<T: Token> Node<T> {
    /// This node's children. Leaf nodes (terminals and errors) have none.
    pub fn children(&self) -> &[Node<T>] {
        match self {
            Node::Variable { children, .. } => children,
            Node::Terminal { .. } | Node::Error { .. } => &[],
        }
    }

    /// The position of the start of this node in its source: the start of
    /// its token for leaves, the start of the first child for variables.
    pub fn start(&self) -> Position {
        match self {
            Node::Terminal { token } => token.start(),
            Node::Variable {
                children, fallback, ..
            } => match children.first() {
                Some(first) => first.start(),
                None => fallback.clone(),
            },
            Node::Error { position, .. } => position.clone(),
        }
    }

    /// The position of the end of this node in its source.
    pub fn end(&self) -> Position {
        match self {
            Node::Terminal { token } => token.end(),
            Node::Variable {
                children, fallback, ..
            } => match children.last() {
                Some(last) => last.end(),
                None => fallback.clone(),
            },
            Node::Error { position, .. } => position.clone(),
        }
    }

    /// Did parsing of this node or any of its children hit a syntax error?
    pub fn has_error(&self) -> bool {
        match self {
            Node::Error { .. } => true,
            Node::Terminal { .. } => false,
            Node::Variable { children, .. } => children.iter().any(Node::has_error),
        }
    }
}

/// A parsed program in tree form. The root corresponds to the grammar's
/// start symbol; error nodes mark the places where the parser had to
/// recover.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree<T> {
    root: Node<T>,
}

impl<T: Token> ParseTree<T> {
    pub(crate) fn new(root: Node<T>) -> Self {
        ParseTree { root }
    }

    /// The root node of the tree, a [`Node::Variable`] over the start
    /// symbol.
    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    pub fn has_error(&self) -> bool {
        self.root.has_error()
    }
}
