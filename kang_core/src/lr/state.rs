use std::collections::{BTreeMap, BTreeSet};

use crate::lr::action::Action;
use crate::lr::grammar::{TerminalId, VariableId};
use crate::lr::item::ParseItem;

/// One state of the parser: the set of LR(1) items it corresponds to, its
/// slice of the action table, and its slice of the goto table. Two states
/// are the same state exactly when their item sets are equal.
#[derive(Debug, Clone)]
pub struct State {
    items: BTreeSet<ParseItem>,
    actions: BTreeMap<TerminalId, Action>,
    gotos: BTreeMap<VariableId, usize>,
}

impl State {
    pub(crate) fn new(
        items: BTreeSet<ParseItem>,
        actions: BTreeMap<TerminalId, Action>,
        gotos: BTreeMap<VariableId, usize>,
    ) -> Self {
        State {
            items,
            actions,
            gotos,
        }
    }

    /// The LR(1) items making up this state.
    pub fn items(&self) -> &BTreeSet<ParseItem> {
        &self.items
    }

    /// The action for a lookahead terminal, or `None` for a syntax error.
    pub fn action(&self, terminal: TerminalId) -> Option<Action> {
        self.actions.get(&terminal).copied()
    }

    /// Every defined action of this state, keyed by lookahead terminal.
    pub fn actions(&self) -> &BTreeMap<TerminalId, Action> {
        &self.actions
    }

    /// The state to move to after reducing to `variable`.
    pub fn goto(&self, variable: VariableId) -> Option<usize> {
        self.gotos.get(&variable).copied()
    }
}
