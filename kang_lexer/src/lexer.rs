use std::collections::VecDeque;
use std::fmt;
use std::iter::Peekable;
use std::sync::Arc;

use kang_core::{Logger, Position, Severity, TokenSource};

use crate::token::{is_symbol, KangToken, TokenType};

const TAB_SIZE: u32 = 8;
const ELLIPSIS: char = '…';

/// A lexical problem in the source. Diagnostics are reported through the
/// lexer's logger; the lexer recovers locally and keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An ellipsis that is not immediately followed by the end of its
    /// line.
    EllipsisNotAtEndOfLine,
    /// A character that cannot begin any token.
    InvalidCharacter(char),
    /// A number run extended by letters or extra decimal points.
    InvalidNumber(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Diagnostic::EllipsisNotAtEndOfLine => {
                write!(f, "ellipsis '…' not at the end of the line")
            }
            Diagnostic::InvalidCharacter(ch) => write!(f, "invalid character '{}'", ch),
            Diagnostic::InvalidNumber(lexeme) => write!(f, "{} is not a valid number", lexeme),
        }
    }
}

/// Extracts tokens from Kang source text.
///
/// Kang is indentation-sensitive: along with ordinary tokens the lexer
/// synthesizes `open block` and `close block` markers from changes in
/// indentation and an `end of line` marker after every line that produced
/// at least one token. An ellipsis at the end of a line continues the
/// logical line onto the next physical one, suppressing the markers.
pub struct Lexer<I: Iterator<Item = char>, L: Logger> {
    source: Peekable<I>,
    log: L,
    source_name: Option<Arc<str>>,

    /// The current character, or `None` at end of input.
    current: Option<char>,
    line: u32,
    column: u32,

    /// Tokens synthesized but not yet returned.
    pending: VecDeque<KangToken>,
    /// Is the next token the first on its line?
    is_first_token: bool,
    /// Did an ellipsis appear since the last newline?
    just_saw_ellipsis: bool,
    /// Indentation column of each open block. The base entry is 0.
    block_levels: Vec<u32>,
}

impl<I: Iterator<Item = char>, L: Logger> Lexer<I, L> {
    pub fn new(source: I, log: L) -> Self {
        Lexer::with_source_name(None, source, log)
    }

    pub fn with_source_name(source_name: Option<Arc<str>>, source: I, log: L) -> Self {
        let mut source = source.peekable();
        let current = source.next();

        Lexer {
            source,
            log,
            source_name,
            current,
            line: 0,
            column: 0,
            pending: VecDeque::new(),
            is_first_token: true,
            just_saw_ellipsis: false,
            block_levels: vec![0],
        }
    }

    pub fn logger(&self) -> &L {
        &self.log
    }

    pub fn into_logger(self) -> L {
        self.log
    }

    fn at_end(&self) -> bool {
        self.current.is_none()
    }

    fn current_position(&self) -> Position {
        Position::new(self.source_name.clone(), self.line, self.column)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}: {}", self.current_position(), diagnostic);
        self.log
            .message(Severity::Error, &diagnostic.to_string());
    }

    /// Consumes and returns the current character, updating the cursor:
    /// a newline resets the column and bumps the line, a tab advances to
    /// the next multiple of [`TAB_SIZE`], anything else advances by one.
    ///
    /// Consuming a newline also ends the logical line: if the line
    /// produced tokens and was not continued by an ellipsis (and the lexer
    /// is not inside a multi-line token), an `end of line` marker is
    /// queued.
    fn get_char(&mut self, multi_line_token: bool) -> char {
        let consumed = self.current.expect("get_char past end of input");

        match consumed {
            '\n' => {
                if !multi_line_token && !self.just_saw_ellipsis && !self.is_first_token {
                    self.pending.push_back(KangToken::marker(
                        TokenType::EndOfLine,
                        self.current_position(),
                    ));
                    self.is_first_token = true;
                }

                self.just_saw_ellipsis = false;

                self.line += 1;
                self.column = 0;
            }
            '\t' => {
                self.column += TAB_SIZE;
                self.column -= self.column % TAB_SIZE;
            }
            _ => {
                self.column += 1;
            }
        }

        self.current = self.source.next();
        consumed
    }

    /// Skips white space, ellipses, and comments between tokens. A comment
    /// runs from `--` to the end of the line. Ellipses must be the last
    /// thing on their line; anything else is reported.
    fn skip_white_space(&mut self) {
        loop {
            while let Some(ch) = self.current {
                if !ch.is_whitespace() && ch != ELLIPSIS {
                    break;
                }

                if ch == ELLIPSIS {
                    if self.just_saw_ellipsis {
                        self.report(Diagnostic::EllipsisNotAtEndOfLine);
                    }
                    self.just_saw_ellipsis = true;
                }

                self.get_char(false);
            }

            let comment = self.current == Some('-') && self.source.peek() == Some(&'-');
            if !comment {
                break;
            }

            // Skip to the end of the line; the newline itself is handled
            // by the next round of white space skipping.
            loop {
                self.get_char(false);
                match self.current {
                    None | Some('\n') => break,
                    Some(_) => {}
                }
            }
        }

        if !self.at_end() && self.just_saw_ellipsis {
            self.report(Diagnostic::EllipsisNotAtEndOfLine);
            self.just_saw_ellipsis = false;
        }
    }

    /// Synthesizes block markers when the indentation of a line's first
    /// token differs from the enclosing block's.
    fn update_block_level(&mut self) {
        if !self.is_first_token {
            return;
        }

        let top = *self.block_levels.last().expect("base block level");

        if self.column > top {
            self.block_levels.push(self.column);
            self.pending.push_back(KangToken::marker(
                TokenType::OpenBlock,
                self.current_position(),
            ));
        } else {
            while self
                .block_levels
                .last()
                .map_or(false, |&level| self.column < level)
            {
                self.block_levels.pop();
                self.pending.push_back(KangToken::marker(
                    TokenType::CloseBlock,
                    self.current_position(),
                ));
            }
        }
    }

    fn read_identifier_or_keyword(&mut self) {
        let start = self.current_position();
        let mut lexeme = String::new();
        let mut end;

        loop {
            end = self.current_position();
            lexeme.push(self.get_char(false));

            match self.current {
                Some(ch) if ch.is_alphanumeric() => {}
                _ => break,
            }
        }

        match KangToken::from_lexeme(lexeme, start, end) {
            Ok(token) => self.pending.push_back(token),
            Err(_) => unreachable!("a letter followed by letters and digits always classifies"),
        }

        self.is_first_token = false;
    }

    fn read_number(&mut self) {
        let start = self.current_position();
        let mut lexeme = String::new();
        let mut end;

        loop {
            end = self.current_position();
            lexeme.push(self.get_char(false));

            match self.current {
                Some(ch) if ch.is_ascii_digit() => {}
                _ => break,
            }
        }

        // A decimal point followed by at least one digit.
        let decimal = self.current == Some('.')
            && self.source.peek().map_or(false, |ch| ch.is_ascii_digit());

        if decimal {
            lexeme.push(self.get_char(false));

            loop {
                end = self.current_position();
                lexeme.push(self.get_char(false));

                match self.current {
                    Some(ch) if ch.is_ascii_digit() => {}
                    _ => break,
                }
            }
        }

        // A trailing letter or decimal point makes the whole run invalid;
        // consume it so lexing resumes cleanly afterwards.
        if self
            .current
            .map_or(false, |ch| ch.is_alphabetic() || ch == '.')
        {
            let mut invalid = String::new();

            loop {
                invalid.push(self.get_char(false));

                match self.current {
                    Some(ch) if ch.is_alphanumeric() || ch == '.' => {}
                    _ => break,
                }
            }

            self.report(Diagnostic::InvalidNumber(format!("{}{}", lexeme, invalid)));
        }

        match KangToken::from_lexeme(lexeme, start, end) {
            Ok(token) => self.pending.push_back(token),
            Err(error) => self.report(Diagnostic::InvalidNumber(error.into_lexeme())),
        }

        self.is_first_token = false;
    }

    fn read_symbol(&mut self) {
        let position = self.current_position();
        let ch = self.get_char(false);

        if is_symbol(ch) {
            match KangToken::from_lexeme(ch.to_string(), position.clone(), position) {
                Ok(token) => self.pending.push_back(token),
                Err(_) => unreachable!("symbol alphabet lexemes always classify"),
            }
        } else {
            self.report(Diagnostic::InvalidCharacter(ch));
        }

        self.is_first_token = false;
    }
}

impl<I: Iterator<Item = char>, L: Logger> TokenSource for Lexer<I, L> {
    type Token = KangToken;

    /// Extracts the next token from the source, or `None` once the input
    /// and all synthesized markers are exhausted.
    fn extract_token(&mut self) -> Option<KangToken> {
        loop {
            if !self.at_end() {
                self.skip_white_space();
                self.update_block_level();
            }

            if !self.at_end() {
                match self.current {
                    Some(ch) if ch.is_alphabetic() => self.read_identifier_or_keyword(),
                    Some(ch) if ch.is_ascii_digit() => self.read_number(),
                    Some(_) => self.read_symbol(),
                    None => {}
                }
            }

            // Out of characters: end the line and close any open blocks.
            if self.at_end() {
                if !self.is_first_token {
                    self.pending.push_back(KangToken::marker(
                        TokenType::EndOfLine,
                        self.current_position(),
                    ));
                    self.is_first_token = true;
                }

                while self.block_levels.len() > 1 {
                    self.block_levels.pop();
                    self.pending.push_back(KangToken::marker(
                        TokenType::CloseBlock,
                        self.current_position(),
                    ));
                }
            }

            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }

            if self.at_end() {
                return None;
            }
        }
    }

    fn position(&self) -> Position {
        self.current_position()
    }
}
