//! Lexer for Kang source files.
//!
//! Kang's surface syntax is indentation-sensitive, so on top of the usual
//! identifier/keyword/number/symbol recognition the lexer synthesizes
//! `open block`, `close block`, and `end of line` marker tokens from the
//! layout of the source. It plugs into the parser through
//! [`kang_core::TokenSource`], which also gives the parser transactional
//! lookahead over the token stream during error recovery.

mod lexer;
mod token;

pub use crate::lexer::{Diagnostic, Lexer};
pub use crate::token::{InvalidLexeme, KangToken, TokenType, TokenValue};
