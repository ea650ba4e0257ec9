#![allow(dead_code)]

use std::collections::VecDeque;

use kang_core::{Node, Position, Token, TokenSource};

/// A pre-lexed token whose class doubles as its lexeme. Positions are the
/// token's index in the stream, which is enough for span assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct TestToken {
    class: String,
    column: u32,
}

impl Token for TestToken {
    fn token_class(&self) -> &str {
        &self.class
    }

    fn lexeme(&self) -> Option<&str> {
        Some(&self.class)
    }

    fn start(&self) -> Position {
        Position::new(None, 0, self.column)
    }

    fn end(&self) -> Position {
        Position::new(None, 0, self.column)
    }
}

/// A token source over a fixed list of token classes.
pub struct TestSource {
    tokens: VecDeque<TestToken>,
    consumed: u32,
}

impl TestSource {
    pub fn new(classes: &[&str]) -> Self {
        TestSource {
            tokens: classes
                .iter()
                .enumerate()
                .map(|(index, class)| TestToken {
                    class: class.to_string(),
                    column: index as u32,
                })
                .collect(),
            consumed: 0,
        }
    }
}

impl TokenSource for TestSource {
    type Token = TestToken;

    fn extract_token(&mut self) -> Option<TestToken> {
        let token = self.tokens.pop_front();
        if token.is_some() {
            self.consumed += 1;
        }
        token
    }

    fn position(&self) -> Position {
        Position::new(None, 0, self.consumed)
    }
}

/// Renders the shape of a tree like "((id + (id * id)) + id)". Variables
/// with a single child render as that child so leaf rules don't add noise.
pub fn shape(node: &Node<TestToken>) -> String {
    match node {
        Node::Terminal { token } => token.token_class().to_string(),
        Node::Error { .. } => "<error>".to_string(),
        Node::Variable { children, .. } => {
            if children.len() == 1 {
                shape(&children[0])
            } else {
                let rendered: Vec<String> = children.iter().map(shape).collect();
                format!("({})", rendered.join(" "))
            }
        }
    }
}

/// Counts the error nodes in a tree.
pub fn count_errors(node: &Node<TestToken>) -> usize {
    match node {
        Node::Error { .. } => 1,
        Node::Terminal { .. } => 0,
        Node::Variable { children, .. } => children.iter().map(count_errors).sum(),
    }
}
