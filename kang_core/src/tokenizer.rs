use crate::token::{Position, Token};

/// Something that extracts tokens from a token source, usually a source
/// code file. As far as the tokenizer is concerned the source is just an
/// abstract entity tokens come out of.
pub trait TokenSource {
    type Token: Token;

    /// Extracts and returns the next token, or `None` when there are no
    /// tokens left.
    fn extract_token(&mut self) -> Option<Self::Token>;

    /// The source's current position.
    fn position(&self) -> Position;
}

/// A token stream with transactions, so the parser can back up and restart
/// from a prior point during error recovery.
///
/// While a transaction is open every token delivered by [`get_token`] is
/// remembered; rolling the transaction back rewinds the stream so those
/// tokens are delivered again, in their original order. Committing the last
/// open transaction forgets the remembered tokens. Transactions nest, and a
/// rollback only undoes the innermost one.
///
/// [`get_token`]: Tokenizer::get_token
#[derive(Debug)]
pub struct Tokenizer<S: TokenSource> {
    source: S,
    /// Tokens extracted while a transaction was in progress. End-of-input
    /// is buffered too, so a rollback can reproduce it.
    extracted: Vec<Option<S::Token>>,
    /// Index into `extracted` of the next token to deliver.
    cursor: usize,
    /// For each open transaction, the cursor at the time it began.
    markers: Vec<usize>,
}

impl<S: TokenSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Tokenizer {
            source,
            extracted: Vec::new(),
            cursor: 0,
            markers: Vec::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// The source's current position.
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// Delivers the next token, or `None` at end of input. Replays
    /// previously buffered tokens after a rollback; otherwise pulls a fresh
    /// token from the source, remembering it if a transaction is open.
    pub fn get_token(&mut self) -> Option<S::Token> {
        if self.cursor < self.extracted.len() {
            let token = self.extracted[self.cursor].clone();
            self.cursor += 1;
            token
        } else {
            let token = self.source.extract_token();

            if self.is_transaction_in_progress() {
                self.extracted.push(token.clone());
                self.cursor += 1;
            }

            token
        }
    }

    /// Begins a new transaction, remembering the current point in the
    /// stream.
    pub fn begin_transaction(&mut self) {
        self.markers.push(self.cursor);
    }

    /// Commits the innermost transaction: the option to roll back to its
    /// start is lost. When the last transaction commits, the buffered
    /// tokens are released.
    pub fn commit_transaction(&mut self) {
        match self.markers.pop() {
            Some(_) => {
                if self.markers.is_empty() {
                    self.extracted.clear();
                    self.cursor = 0;
                }
            }
            None => panic!("commit_transaction with no transaction in progress"),
        }
    }

    /// Rolls back the innermost transaction: tokens delivered since it
    /// began will be delivered again by subsequent [`get_token`] calls.
    ///
    /// [`get_token`]: Tokenizer::get_token
    pub fn rollback_transaction(&mut self) {
        match self.markers.pop() {
            Some(marker) => self.cursor = marker,
            None => panic!("rollback_transaction with no transaction in progress"),
        }
    }

    /// The number of nested transactions in progress.
    pub fn transaction_depth(&self) -> usize {
        self.markers.len()
    }

    pub fn is_transaction_in_progress(&self) -> bool {
        !self.markers.is_empty()
    }
}
