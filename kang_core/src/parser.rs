use std::collections::BTreeSet;

use crate::error::ParseError;
use crate::lr::{
    build_tables, Action, Grammar, Reference, RuleId, State, TableError, TerminalId, VariableId,
};
use crate::token::Token;
use crate::tokenizer::{TokenSource, Tokenizer};
use crate::tree::{Node, ParseTree};

/// An LR(1) parser for a context-free grammar. Construction generates the
/// canonical LR(1) action and goto tables; parsing then runs the
/// shift/reduce loop against a token stream, building a parse tree and
/// recovering from syntax errors through the grammar's `@error` rules.
///
/// A parser is immutable once built and can be shared between parses.
#[derive(Debug)]
pub struct Parser {
    grammar: Grammar,
    start: VariableId,
    states: Vec<State>,
    follow_sets: Vec<BTreeSet<TerminalId>>,
}

impl Parser {
    /// Builds a parser for the language described by `grammar`.
    ///
    /// Fails when the grammar has no start rule or contains a conflict
    /// that precedence and associativity declarations cannot resolve; the
    /// report names the offending rules and the state they collide in.
    pub fn build(grammar: Grammar) -> Result<Self, TableError> {
        let tables = build_tables(grammar)?;

        Ok(Parser {
            grammar: tables.grammar,
            start: tables.start,
            states: tables.states,
            follow_sets: tables.follow_sets,
        })
    }

    /// The grammar this parser was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The parser's state collection, with the filled action and goto
    /// tables.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The FOLLOW set of a variable. Canonical LR(1) construction does not
    /// need FOLLOW; the sets are retained for diagnostics.
    pub fn follow_set(&self, variable: VariableId) -> &BTreeSet<TerminalId> {
        &self.follow_sets[variable.index()]
    }

    /// Parses the stream produced by `tokenizer` and returns a parse tree,
    /// or `None` if the parser hits an error it cannot recover from.
    ///
    /// Syntax errors covered by `@error` rules are recovered in place and
    /// show up as [`Node::Error`] nodes in the tree.
    pub fn parse<S>(
        &self,
        tokenizer: &mut Tokenizer<S>,
    ) -> Result<Option<ParseTree<S::Token>>, ParseError<S::Token>>
    where
        S: TokenSource,
    {
        let mut state_stack: Vec<usize> = vec![0];
        let mut nodes: Vec<Node<S::Token>> = Vec::new();
        let mut token = tokenizer.get_token();
        let mut error_mode = false;

        loop {
            let mut terminal = match &token {
                Some(token) => match self.grammar.terminal_by_name(token.token_class()) {
                    Some(terminal) => terminal,
                    None => {
                        let token = token.clone();
                        return Err(ParseError::UnknownToken(token));
                    }
                },
                None => self.grammar.end_terminal(),
            };

            let state = *state_stack.last().expect("state stack is never empty");

            // In error mode but the @error token hasn't been shifted yet:
            // pretend @error is the current token.
            if error_mode && !tokenizer.is_transaction_in_progress() {
                terminal = self.grammar.error_terminal();
            }

            let action = match self.states[state].action(terminal) {
                Some(action) => action,
                None => {
                    // The current token is invalid in the current state;
                    // begin or continue panic-mode error recovery.
                    if error_mode {
                        self.retry_recovery(tokenizer, &mut state_stack, &mut nodes, &mut token);

                        if token.is_none() {
                            let top = *state_stack.last().expect("state stack is never empty");
                            if self.states[top]
                                .action(self.grammar.end_terminal())
                                .is_none()
                            {
                                // Out of tokens to discard and end-of-input
                                // is invalid too; admit defeat.
                                return Ok(None);
                            }
                        }
                    } else {
                        if !self.enter_recovery(&mut state_stack, &mut nodes) {
                            return Ok(None);
                        }
                        error_mode = true;
                    }

                    continue;
                }
            };

            match action {
                Action::Shift(target) => {
                    if terminal == self.grammar.error_terminal() {
                        log::trace!("shift @error into state {}", target);

                        // The terminals that would have been valid here,
                        // minus @error itself.
                        let expected: Vec<TerminalId> = self.states[state]
                            .actions()
                            .keys()
                            .copied()
                            .filter(|&candidate| candidate != self.grammar.error_terminal())
                            .collect();
                        let position = match &token {
                            Some(token) => token.start(),
                            None => tokenizer.position(),
                        };

                        nodes.push(Node::Error {
                            token: token.clone(),
                            expected,
                            position,
                        });
                        state_stack.push(target);

                        // The offending token stays as lookahead; remember
                        // this point so failed resyncs can rewind to it.
                        tokenizer.begin_transaction();
                    } else {
                        log::trace!("shift into state {}", target);

                        let shifted = token.take().expect("shifting past end of input");
                        nodes.push(Node::Terminal { token: shifted });
                        state_stack.push(target);

                        token = tokenizer.get_token();
                    }
                }

                Action::Reduce(rule_id) => {
                    log::trace!("reduce by {}", self.grammar.display_rule(rule_id));

                    // A reduction by an error rule means recovery managed
                    // to resynchronize.
                    if self.grammar.is_error_rule(rule_id) {
                        error_mode = false;
                        tokenizer.commit_transaction();
                    }

                    let rule = self.grammar.rule(rule_id);
                    let count = rule.rhs().len();

                    state_stack.truncate(state_stack.len() - count);
                    let children: Vec<_> = nodes.drain(nodes.len() - count..).collect();
                    let children = self.collapse(rule_id, children);

                    nodes.push(Node::Variable {
                        rule: rule_id,
                        children,
                        fallback: tokenizer.position(),
                    });

                    let top = *state_stack.last().expect("state stack is never empty");
                    let target = self.states[top]
                        .goto(rule.lhs())
                        .expect("goto entry missing after reduction");
                    state_stack.push(target);
                }

                Action::Accept => {
                    log::trace!("accept");

                    debug_assert_eq!(nodes.len(), 1);
                    let root = match nodes.pop() {
                        Some(root @ Node::Variable { .. }) => root,
                        _ => unreachable!("accept with a malformed node stack"),
                    };
                    debug_assert!(matches!(
                        &root,
                        Node::Variable { rule, .. }
                            if self.grammar.rule(*rule).lhs() == self.start
                    ));

                    return Ok(Some(ParseTree::new(root)));
                }
            }
        }
    }

    /// Starts panic-mode recovery: pops states until one accepts `@error`.
    /// Returns `false` when the stack runs out, meaning the error is
    /// unrecoverable.
    fn enter_recovery<T: Token>(
        &self,
        state_stack: &mut Vec<usize>,
        nodes: &mut Vec<Node<T>>,
    ) -> bool {
        let error = self.grammar.error_terminal();
        let mut top = *state_stack.last().expect("state stack is never empty");

        while self.states[top].action(error).is_none() {
            if state_stack.len() <= 1 {
                return false;
            }

            state_stack.pop();
            nodes.pop();
            top = *state_stack.last().expect("state stack is never empty");
        }

        log::trace!("entering error recovery in state {}", top);
        true
    }

    /// A resync attempt failed: unwind back to the error node, rewind the
    /// tokenizer, and discard one token before trying again.
    fn retry_recovery<S: TokenSource>(
        &self,
        tokenizer: &mut Tokenizer<S>,
        state_stack: &mut Vec<usize>,
        nodes: &mut Vec<Node<S::Token>>,
        token: &mut Option<S::Token>,
    ) {
        loop {
            match nodes.last() {
                Some(Node::Error { .. }) => break,
                Some(_) => {
                    state_stack.pop();
                    nodes.pop();
                }
                None => unreachable!("error node missing during recovery"),
            }
        }

        tokenizer.rollback_transaction();

        log::trace!("discarding a token during error recovery");
        *token = tokenizer.get_token();
        tokenizer.begin_transaction();
    }

    /// Splices collapsible variable nodes into their parent and drops
    /// discardable terminals, per the rule's references.
    fn collapse<T>(&self, rule: RuleId, children: Vec<Node<T>>) -> Vec<Node<T>> {
        let rhs = self.grammar.rule(rule).rhs();
        let mut collapsed = Vec::with_capacity(children.len());

        for (reference, child) in rhs.iter().zip(children) {
            match (reference, child) {
                (Reference::Terminal { preserved: false, .. }, Node::Terminal { .. }) => {}
                (Reference::Variable(variable), Node::Variable { children: inner, .. })
                    if self.grammar.variable(*variable).is_collapsible() =>
                {
                    collapsed.extend(inner);
                }
                (_, child) => collapsed.push(child),
            }
        }

        collapsed
    }
}
