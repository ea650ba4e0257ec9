use crate::lr::grammar::RuleId;

/// One entry in the parser's action table: shift the lookahead, reduce by a
/// rule, or accept the input and return the parse tree. Undefined entries
/// indicate a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the next token and push the given state.
    Shift(usize),
    /// Reduce by the given rule.
    Reduce(RuleId),
    /// Accept the input.
    Accept,
}
