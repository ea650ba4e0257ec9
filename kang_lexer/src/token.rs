use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use once_cell::sync::Lazy;

use kang_core::{Position, Token};

/// A Kang token's type, which determines its token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Open block (beginning of an indented section).
    OpenBlock,
    /// Close block (end of an indented section).
    CloseBlock,
    /// End of the current line.
    EndOfLine,
    /// Integer literal (e.g., 54).
    IntegerLiteral,
    /// Real literal (e.g., 3.1415).
    RealLiteral,
    /// Character literal (e.g., 'x').
    CharacterLiteral,
    /// String literal (e.g., "Hello world!").
    StringLiteral,
    Identifier,
    Keyword,
    /// A token that is the only one in its class, distinguishable from all
    /// other tokens by its lexeme alone.
    Symbol,
}

/// The typed payload carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Integer(i64),
    Real(f64),
    Character(char),
    String {
        /// The contents with the outer delimiters stripped.
        value: String,
        /// The character that began the literal, verbatim.
        left_delimiter: char,
        /// The character that ended the literal, verbatim.
        right_delimiter: char,
    },
}

/// A token from a Kang source file.
#[derive(Debug, Clone, PartialEq)]
pub struct KangToken {
    token_type: TokenType,
    lexeme: Option<String>,
    value: Option<TokenValue>,
    start: Position,
    end: Position,
}

/// Indicates that a lexeme does not form a valid token, most likely
/// because of an invalid character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLexeme {
    lexeme: String,
}

impl InvalidLexeme {
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn into_lexeme(self) -> String {
        self.lexeme
    }
}

impl fmt::Display for InvalidLexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "invalid token: {}", self.lexeme)
    }
}

impl Error for InvalidLexeme {}

pub(crate) const SYMBOLS: &[char] = &[
    '+', '-', '×', '÷', '^', '(', ')', '[', ']', '{', '}', '=', '≠', '<', '>', '≤', '≥', '.',
    ',', ':', '→', '←', '↑', '&',
];

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abstract",
        "and",
        "assures",
        "at",
        "break",
        "case",
        "catch",
        "class",
        "constant",
        "continue",
        "default",
        "each",
        "else",
        "ensures",
        "exceptions",
        "explicit",
        "finalize",
        "for",
        "function",
        "get",
        "goto",
        "if",
        "implicit",
        "in",
        "initialize",
        "invariants",
        "is",
        "not",
        "of",
        "or",
        "out",
        "parameters",
        "private",
        "property",
        "protected",
        "public",
        "record",
        "repeat",
        "requires",
        "return",
        "returns",
        "self",
        "set",
        "shared",
        "switch",
        "throw",
        "to",
        "until",
        "variables",
        "while",
        "xor",
    ]
    .into_iter()
    .collect()
});

pub(crate) fn is_keyword(identifier: &str) -> bool {
    KEYWORDS.contains(identifier)
}

pub(crate) fn is_symbol(ch: char) -> bool {
    SYMBOLS.contains(&ch)
}

fn is_identifier(lexeme: &str) -> bool {
    let mut chars = lexeme.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => chars.all(|ch| ch.is_alphanumeric()),
        _ => false,
    }
}

fn is_integer(lexeme: &str) -> bool {
    !lexeme.is_empty() && lexeme.chars().all(|ch| ch.is_ascii_digit())
}

fn is_real(lexeme: &str) -> bool {
    match lexeme.split_once('.') {
        Some((whole, fraction)) => is_integer(whole) && is_integer(fraction),
        None => false,
    }
}

impl KangToken {
    /// Creates a token from its lexeme, determining the type automatically:
    /// an identifier or keyword, an integer or real literal, or a
    /// single-character symbol.
    pub fn from_lexeme(
        lexeme: String,
        start: Position,
        end: Position,
    ) -> Result<Self, InvalidLexeme> {
        let token_type = if is_identifier(&lexeme) {
            if is_keyword(&lexeme) {
                TokenType::Keyword
            } else {
                TokenType::Identifier
            }
        } else if is_integer(&lexeme) {
            TokenType::IntegerLiteral
        } else if is_real(&lexeme) {
            TokenType::RealLiteral
        } else {
            let mut chars = lexeme.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if is_symbol(ch) => TokenType::Symbol,
                _ => return Err(InvalidLexeme { lexeme }),
            }
        };

        let value = match token_type {
            TokenType::IntegerLiteral => match lexeme.parse() {
                Ok(value) => Some(TokenValue::Integer(value)),
                Err(_) => return Err(InvalidLexeme { lexeme }),
            },
            TokenType::RealLiteral => match lexeme.parse() {
                Ok(value) => Some(TokenValue::Real(value)),
                Err(_) => return Err(InvalidLexeme { lexeme }),
            },
            _ => None,
        };

        Ok(KangToken {
            token_type,
            lexeme: Some(lexeme),
            value,
            start,
            end,
        })
    }

    /// Creates a marker token with no lexeme: an open block, close block,
    /// or end of line.
    pub fn marker(token_type: TokenType, position: Position) -> Self {
        debug_assert!(matches!(
            token_type,
            TokenType::OpenBlock | TokenType::CloseBlock | TokenType::EndOfLine
        ));

        KangToken {
            token_type,
            lexeme: None,
            value: None,
            start: position.clone(),
            end: position,
        }
    }

    /// Creates a character literal from its lexeme, delimiters included.
    pub fn character_literal(
        lexeme: String,
        start: Position,
        end: Position,
    ) -> Result<Self, InvalidLexeme> {
        let value = {
            let mut chars = lexeme.chars();
            match (chars.next(), chars.next(), chars.next(), chars.next()) {
                (Some(_), Some(value), Some(_), None) => value,
                _ => return Err(InvalidLexeme { lexeme }),
            }
        };

        Ok(KangToken {
            token_type: TokenType::CharacterLiteral,
            lexeme: Some(lexeme),
            value: Some(TokenValue::Character(value)),
            start,
            end,
        })
    }

    /// Creates a string literal from its lexeme. The payload has the outer
    /// delimiters stripped; the delimiters themselves are recorded
    /// verbatim.
    pub fn string_literal(
        lexeme: String,
        start: Position,
        end: Position,
    ) -> Result<Self, InvalidLexeme> {
        let chars: Vec<char> = lexeme.chars().collect();
        if chars.len() < 2 {
            return Err(InvalidLexeme { lexeme });
        }

        let left_delimiter = chars[0];
        let right_delimiter = chars[chars.len() - 1];
        let value: String = chars[1..chars.len() - 1].iter().collect();

        Ok(KangToken {
            token_type: TokenType::StringLiteral,
            lexeme: Some(lexeme),
            value: Some(TokenValue::String {
                value,
                left_delimiter,
                right_delimiter,
            }),
            start,
            end,
        })
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The token's typed payload, for literals.
    pub fn value(&self) -> Option<&TokenValue> {
        self.value.as_ref()
    }
}

impl Token for KangToken {
    fn token_class(&self) -> &str {
        match self.token_type {
            TokenType::OpenBlock => "open block",
            TokenType::CloseBlock => "close block",
            TokenType::EndOfLine => "end of line",
            TokenType::IntegerLiteral => "integer",
            TokenType::RealLiteral => "real number",
            TokenType::CharacterLiteral => "character",
            TokenType::StringLiteral => "string",
            TokenType::Identifier => "identifier",
            // Keywords and symbols are the only members of their class.
            TokenType::Keyword | TokenType::Symbol => {
                self.lexeme.as_deref().unwrap_or_default()
            }
        }
    }

    fn lexeme(&self) -> Option<&str> {
        self.lexeme.as_deref()
    }

    fn start(&self) -> Position {
        self.start.clone()
    }

    fn end(&self) -> Position {
        self.end.clone()
    }
}
