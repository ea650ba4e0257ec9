//! Engineering core of the Kang compiler front-end: a canonical LR(1)
//! parser generator with precedence-based conflict resolution and
//! panic-mode error recovery, plus the transactional token-stream
//! framework the parser's recovery relies on.
//!
//! The grammar itself is loaded from a declarative description by a
//! separate crate; this one is grammar-agnostic.

mod diag;
mod error;
mod lr;
mod parser;
mod token;
mod tokenizer;
mod tree;

pub use crate::diag::{BufLog, Logger, Severity};
pub use crate::error::ParseError;
pub use crate::lr::{
    Action, Associativity, Conflict, Grammar, ParseItem, Reference, Rule, RuleId, State, Symbol,
    TableError, Terminal, TerminalId, Variable, VariableId,
};
pub use crate::parser::Parser;
pub use crate::token::{Position, Token};
pub use crate::tokenizer::{TokenSource, Tokenizer};
pub use crate::tree::{Node, ParseTree};
