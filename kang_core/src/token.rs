use std::fmt;
use std::sync::Arc;

/// A position in a token source: the source's name (if it has one) and a
/// 0-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    source: Option<Arc<str>>,
    line: u32,
    column: u32,
}

impl Position {
    pub fn new(source: Option<Arc<str>>, line: u32, column: u32) -> Self {
        Position {
            source,
            line,
            column,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The line number, starting from 0.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The column number, starting from 0.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.source {
            Some(source) => write!(f, "{}:{}:{}", source, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// Minimal interface for the tokens produced by a lexer. Tokens are the
/// indivisible pieces of text in a program: numbers, symbols, identifiers,
/// and so on.
///
/// Tokens are cloned when the tokenizer buffers them for transactional
/// lookahead, so implementations should keep cloning cheap.
pub trait Token: Clone + fmt::Debug {
    /// This token's class. Tokens of the same class are equivalent during
    /// parsing; classes correspond to terminals in a grammar. Depending on
    /// the granularity of the divisions some classes have a single member
    /// (like "plus sign"), others many (like "identifier").
    fn token_class(&self) -> &str;

    /// The exact characters the token was composed of in the source, if it
    /// has any (synthetic markers do not).
    fn lexeme(&self) -> Option<&str>;

    /// The position of the token's first character.
    fn start(&self) -> Position;

    /// The position of the token's last character.
    fn end(&self) -> Position;

    /// Renders the token for messages, as "class: 'lexeme'" with redundant
    /// parts left out.
    fn describe(&self) -> String {
        let mut rendered = String::new();

        if self.lexeme() != Some(self.token_class()) {
            rendered.push_str(self.token_class());
            if self.lexeme().is_some() {
                rendered.push_str(": ");
            }
        }

        if let Some(lexeme) = self.lexeme() {
            rendered.push('\'');
            rendered.push_str(lexeme);
            rendered.push('\'');
        }

        rendered
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone)]
    struct Fake(&'static str, Option<&'static str>);

    impl Token for Fake {
        fn token_class(&self) -> &str {
            self.0
        }

        fn lexeme(&self) -> Option<&str> {
            self.1
        }

        fn start(&self) -> Position {
            Position::new(None, 0, 0)
        }

        fn end(&self) -> Position {
            Position::new(None, 0, 0)
        }
    }

    #[test]
    fn tokens_describe_themselves() {
        assert_eq!(Fake("identifier", Some("count")).describe(), "identifier: 'count'");
        assert_eq!(Fake("+", Some("+")).describe(), "'+'");
        assert_eq!(Fake("end of line", None).describe(), "end of line");
    }

    #[test]
    fn positions_render_with_optional_source() {
        let bare = Position::new(None, 3, 14);
        assert_eq!(bare.to_string(), "3:14");

        let named = Position::new(Some(Arc::from("main.kang")), 0, 7);
        assert_eq!(named.to_string(), "main.kang:0:7");
    }
}
