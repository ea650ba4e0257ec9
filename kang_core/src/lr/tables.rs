use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::error::Error;
use std::fmt;

use crate::lr::action::Action;
use crate::lr::assoc::Associativity;
use crate::lr::grammar::{Grammar, Reference, RuleId, Symbol, TerminalId, VariableId};
use crate::lr::item::ParseItem;
use crate::lr::state::State;

/// The output of table construction: the (unaugmented) grammar, the state
/// collection with filled action and goto maps, and the FOLLOW sets kept
/// around for diagnostics.
#[derive(Debug)]
pub(crate) struct BuiltTables {
    pub grammar: Grammar,
    pub start: VariableId,
    pub states: Vec<State>,
    pub follow_sets: Vec<BTreeSet<TerminalId>>,
}

/// Generates canonical LR(1) tables for a grammar.
///
/// The grammar is augmented with a fresh start variable "`@start` → S" and
/// the `@end` terminal, the state collection is generated from
/// `closure({[@start → · S, @end]})`, and the action/goto tables are filled
/// in, resolving shift/reduce conflicts through rule precedence and
/// associativity. The augmentation is removed from the public grammar view
/// before returning.
pub(crate) fn build_tables(grammar: Grammar) -> Result<BuiltTables, TableError> {
    TableBuilder::prepare(grammar)?.build()
}

struct TableBuilder {
    grammar: Grammar,
    original_start: VariableId,
    augmented_start: VariableId,
    augmented_rule: RuleId,
    /// Indexed by variable, whether the variable can derive ε.
    nullable: Vec<bool>,
    /// Indexed by variable, the terminals that can begin a derivation.
    first_sets: Vec<BTreeSet<TerminalId>>,
    /// Indexed by variable, the terminals that can follow a derivation.
    follow_sets: Vec<BTreeSet<TerminalId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Shift,
    Reduce,
}

impl TableBuilder {
    fn prepare(mut grammar: Grammar) -> Result<Self, TableError> {
        let original_start = match grammar.start_variable() {
            Some(start) if !grammar.variable(start).rules().is_empty() => start,
            _ => return Err(TableError::MissingStartRule),
        };

        let (augmented_start, augmented_rule) = grammar.augment();

        let mut builder = TableBuilder {
            grammar,
            original_start,
            augmented_start,
            augmented_rule,
            nullable: Vec::new(),
            first_sets: Vec::new(),
            follow_sets: Vec::new(),
        };

        builder.compute_nullable();
        builder.compute_first_sets();
        builder.compute_follow_sets();

        Ok(builder)
    }

    fn build(self) -> Result<BuiltTables, TableError> {
        let (item_sets, transitions) = self.generate_states();
        log::debug!("generated {} LR(1) states", item_sets.len());

        let states = self.populate_tables(item_sets, &transitions)?;

        let TableBuilder {
            mut grammar,
            original_start,
            follow_sets,
            ..
        } = self;
        grammar.unaugment(original_start);

        Ok(BuiltTables {
            grammar,
            start: original_start,
            states,
            follow_sets,
        })
    }

    /// A variable is nullable if any of its rules consists entirely of
    /// nullable variables; terminals are never nullable. Least fixed point.
    fn compute_nullable(&mut self) {
        self.nullable = vec![false; self.grammar.variable_count()];

        let mut changed = true;
        while changed {
            changed = false;

            for variable in self.grammar.variable_ids() {
                if self.nullable[variable.index()] {
                    continue;
                }

                let derives_empty = self.grammar.variable(variable).rules().iter().any(|&rule| {
                    self.grammar
                        .rule(rule)
                        .rhs()
                        .iter()
                        .all(|reference| match reference {
                            Reference::Terminal { .. } => false,
                            Reference::Variable(inner) => self.nullable[inner.index()],
                        })
                });

                if derives_empty {
                    self.nullable[variable.index()] = true;
                    changed = true;
                }
            }
        }
    }

    /// For each variable, the terminals that can appear at the beginning of
    /// a string derived from it: scan each rule's right side left to right,
    /// folding in FIRST of every item up to and including the first
    /// non-nullable one. Least fixed point.
    fn compute_first_sets(&mut self) {
        self.first_sets = vec![BTreeSet::new(); self.grammar.variable_count()];

        let mut changed = true;
        while changed {
            changed = false;

            for variable in self.grammar.variable_ids() {
                for &rule in self.grammar.variable(variable).rules() {
                    for reference in self.grammar.rule(rule).rhs() {
                        match reference {
                            Reference::Terminal { terminal, .. } => {
                                changed |= self.first_sets[variable.index()].insert(*terminal);
                                break;
                            }
                            Reference::Variable(inner) => {
                                let source = self.first_sets[inner.index()].clone();
                                for terminal in source {
                                    changed |= self.first_sets[variable.index()].insert(terminal);
                                }
                                if !self.nullable[inner.index()] {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// For each variable, the terminals that can follow it in some valid
    /// derivation. Canonical LR(1) construction does not consult FOLLOW;
    /// the sets are kept for diagnostics. Bootstrapped with
    /// `@end ∈ FOLLOW(@start)`.
    fn compute_follow_sets(&mut self) {
        self.follow_sets = vec![BTreeSet::new(); self.grammar.variable_count()];
        let end = self.grammar.end_terminal();
        self.follow_sets[self.augmented_start.index()].insert(end);

        let mut changed = true;
        while changed {
            changed = false;

            for variable in self.grammar.variable_ids() {
                for &rule in self.grammar.variable(variable).rules() {
                    let rhs = self.grammar.rule(rule).rhs();

                    for (index, reference) in rhs.iter().enumerate() {
                        let target = match reference {
                            Reference::Variable(inner) => *inner,
                            Reference::Terminal { .. } => continue,
                        };

                        // FIRST of the rest of the rule goes into FOLLOW of
                        // the variable; if the rest is nullable, FOLLOW of
                        // the left side does too.
                        let mut tail_nullable = true;
                        for follower in &rhs[index + 1..] {
                            match follower {
                                Reference::Terminal { terminal, .. } => {
                                    changed |=
                                        self.follow_sets[target.index()].insert(*terminal);
                                    tail_nullable = false;
                                    break;
                                }
                                Reference::Variable(inner) => {
                                    let source = self.first_sets[inner.index()].clone();
                                    for terminal in source {
                                        changed |=
                                            self.follow_sets[target.index()].insert(terminal);
                                    }
                                    if !self.nullable[inner.index()] {
                                        tail_nullable = false;
                                        break;
                                    }
                                }
                            }
                        }

                        if tail_nullable {
                            let source = self.follow_sets[variable.index()].clone();
                            for terminal in source {
                                changed |= self.follow_sets[target.index()].insert(terminal);
                            }
                        }
                    }
                }
            }
        }
    }

    /// For an item `[A → α · B β, a]`, the possible first terminals of the
    /// string βa, folding nullable prefixes of β.
    fn first_of_suffix(&self, item: &ParseItem) -> BTreeSet<TerminalId> {
        let rhs = self.grammar.rule(item.rule).rhs();
        let mut first = BTreeSet::new();

        for reference in &rhs[item.position + 1..] {
            match reference {
                Reference::Terminal { terminal, .. } => {
                    first.insert(*terminal);
                    return first;
                }
                Reference::Variable(inner) => {
                    first.extend(self.first_sets[inner.index()].iter().copied());
                    if !self.nullable[inner.index()] {
                        return first;
                    }
                }
            }
        }

        first.insert(item.lookahead);
        first
    }

    /// The closure of an item set: for every `[A → α · B β, a]` in the set
    /// and every rule B → γ, add `[B → · γ, b]` for every terminal
    /// `b ∈ FIRST(βa)`. Fixed point on set union.
    fn closure(&self, items: BTreeSet<ParseItem>) -> BTreeSet<ParseItem> {
        let mut closure = items;
        let mut pending: Vec<ParseItem> = closure.iter().copied().collect();

        while let Some(item) = pending.pop() {
            let variable = match self.grammar.rule(item.rule).rhs().get(item.position) {
                Some(Reference::Variable(inner)) => *inner,
                _ => continue,
            };

            let lookaheads = self.first_of_suffix(&item);

            for &rule in self.grammar.variable(variable).rules() {
                for &lookahead in &lookaheads {
                    let new_item = ParseItem::new(rule, 0, lookahead);
                    if closure.insert(new_item) {
                        pending.push(new_item);
                    }
                }
            }
        }

        closure
    }

    /// The state reached from `items` after recognizing `symbol`.
    fn goto(&self, items: &BTreeSet<ParseItem>, symbol: Symbol) -> BTreeSet<ParseItem> {
        let mut moved = BTreeSet::new();

        for item in items {
            match self.grammar.rule(item.rule).rhs().get(item.position) {
                Some(reference) if reference.symbol() == symbol => {
                    moved.insert(ParseItem::new(item.rule, item.position + 1, item.lookahead));
                }
                _ => {}
            }
        }

        if moved.is_empty() {
            moved
        } else {
            self.closure(moved)
        }
    }

    /// Generates the canonical LR(1) state collection and the transition
    /// relation between states. State indices are assigned in discovery
    /// order, which is deterministic because states and symbols are
    /// iterated in a fixed order.
    #[allow(clippy::type_complexity)]
    fn generate_states(&self) -> (Vec<BTreeSet<ParseItem>>, BTreeMap<(usize, Symbol), usize>) {
        let start_item = ParseItem::new(self.augmented_rule, 0, self.grammar.end_terminal());
        let mut initial = BTreeSet::new();
        initial.insert(start_item);
        let initial = self.closure(initial);

        let mut item_sets = vec![initial.clone()];
        let mut interned: HashMap<BTreeSet<ParseItem>, usize> = HashMap::new();
        interned.insert(initial, 0);

        let symbols: Vec<Symbol> = self
            .grammar
            .terminal_ids()
            .map(Symbol::Terminal)
            .chain(self.grammar.variable_ids().map(Symbol::Variable))
            .collect();

        let mut transitions = BTreeMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(0);

        while let Some(index) = queue.pop_front() {
            for &symbol in &symbols {
                let target = self.goto(&item_sets[index], symbol);
                if target.is_empty() {
                    continue;
                }

                let target_index = match interned.get(&target) {
                    Some(&existing) => existing,
                    None => {
                        let fresh = item_sets.len();
                        item_sets.push(target.clone());
                        interned.insert(target, fresh);
                        queue.push_back(fresh);
                        fresh
                    }
                };

                transitions.insert((index, symbol), target_index);
            }
        }

        (item_sets, transitions)
    }

    /// Fills the action and goto maps for every state. The reason maps,
    /// which remember the rule that produced each action so conflicts can
    /// be diagnosed, live only for the duration of this pass.
    fn populate_tables(
        &self,
        item_sets: Vec<BTreeSet<ParseItem>>,
        transitions: &BTreeMap<(usize, Symbol), usize>,
    ) -> Result<Vec<State>, TableError> {
        let end = self.grammar.end_terminal();
        let mut states = Vec::with_capacity(item_sets.len());

        for (index, items) in item_sets.into_iter().enumerate() {
            let mut actions: BTreeMap<TerminalId, Action> = BTreeMap::new();
            let mut reasons: BTreeMap<TerminalId, RuleId> = BTreeMap::new();

            for item in &items {
                let rule = self.grammar.rule(item.rule);

                match rule.rhs().get(item.position) {
                    Some(Reference::Terminal { terminal, .. }) => {
                        if let Some(&target) =
                            transitions.get(&(index, Symbol::Terminal(*terminal)))
                        {
                            self.add_shift(
                                &mut actions,
                                &mut reasons,
                                &items,
                                item.rule,
                                *terminal,
                                target,
                            )?;
                        }
                    }
                    Some(Reference::Variable(_)) => {}
                    None => {
                        if rule.lhs() == self.augmented_start && item.lookahead == end {
                            self.add_accept(&mut actions, &mut reasons, &items)?;
                        } else {
                            self.add_reduce(
                                &mut actions,
                                &mut reasons,
                                &items,
                                item.lookahead,
                                item.rule,
                            )?;
                        }
                    }
                }
            }

            let mut gotos = BTreeMap::new();
            for variable in self.grammar.variable_ids() {
                if let Some(&target) = transitions.get(&(index, Symbol::Variable(variable))) {
                    gotos.insert(variable, target);
                }
            }

            states.push(State::new(items, actions, gotos));
        }

        Ok(states)
    }

    fn add_shift(
        &self,
        actions: &mut BTreeMap<TerminalId, Action>,
        reasons: &mut BTreeMap<TerminalId, RuleId>,
        items: &BTreeSet<ParseItem>,
        reason: RuleId,
        terminal: TerminalId,
        target: usize,
    ) -> Result<(), TableError> {
        match actions.get(&terminal) {
            // An identical shift is already present.
            Some(Action::Shift(_)) => return Ok(()),
            Some(Action::Reduce(reduce_rule)) => {
                let reduce_rule = *reduce_rule;
                if self.resolve_shift_reduce(reason, reduce_rule, items)? == Resolution::Reduce {
                    return Ok(());
                }
            }
            // @end never appears on the right side of a rule, so a shift
            // can never target the accept entry.
            Some(Action::Accept) => unreachable!("shift proposed on the end-of-input terminal"),
            None => {}
        }

        actions.insert(terminal, Action::Shift(target));
        reasons.insert(terminal, reason);
        Ok(())
    }

    fn add_reduce(
        &self,
        actions: &mut BTreeMap<TerminalId, Action>,
        reasons: &mut BTreeMap<TerminalId, RuleId>,
        items: &BTreeSet<ParseItem>,
        terminal: TerminalId,
        rule: RuleId,
    ) -> Result<(), TableError> {
        match actions.get(&terminal) {
            Some(Action::Shift(_)) => {
                let shift_rule = reasons[&terminal];
                if self.resolve_shift_reduce(shift_rule, rule, items)? == Resolution::Shift {
                    return Ok(());
                }
            }
            // An identical reduce is already present.
            Some(Action::Reduce(existing)) if *existing == rule => return Ok(()),
            Some(Action::Reduce(existing)) => {
                return Err(TableError::ReduceReduce(
                    self.conflict(rule, *existing, items),
                ));
            }
            Some(Action::Accept) => {
                return Err(TableError::ReduceReduce(self.conflict(
                    rule,
                    self.augmented_rule,
                    items,
                )));
            }
            None => {}
        }

        actions.insert(terminal, Action::Reduce(rule));
        reasons.insert(terminal, rule);
        Ok(())
    }

    fn add_accept(
        &self,
        actions: &mut BTreeMap<TerminalId, Action>,
        reasons: &mut BTreeMap<TerminalId, RuleId>,
        items: &BTreeSet<ParseItem>,
    ) -> Result<(), TableError> {
        let end = self.grammar.end_terminal();

        match actions.get(&end) {
            Some(Action::Accept) => Ok(()),
            Some(Action::Reduce(existing)) => Err(TableError::ReduceReduce(self.conflict(
                self.augmented_rule,
                *existing,
                items,
            ))),
            Some(Action::Shift(_)) => {
                unreachable!("shift recorded on the end-of-input terminal")
            }
            None => {
                actions.insert(end, Action::Accept);
                reasons.insert(end, self.augmented_rule);
                Ok(())
            }
        }
    }

    /// Decides a shift/reduce conflict from the two rules' precedence and
    /// associativity. Both rules must belong to the same precedence set;
    /// the higher level wins, and equal levels fall back to associativity.
    fn resolve_shift_reduce(
        &self,
        shift_rule: RuleId,
        reduce_rule: RuleId,
        items: &BTreeSet<ParseItem>,
    ) -> Result<Resolution, TableError> {
        let shift_set = self.grammar.effective_precedence_set(shift_rule);
        let reduce_set = self.grammar.effective_precedence_set(reduce_rule);

        if let (Some(shift_in), Some(reduce_in)) = (shift_set, reduce_set) {
            if shift_in == reduce_in {
                let shift_level = self
                    .grammar
                    .effective_precedence_level(shift_rule)
                    .unwrap_or(0);
                let reduce_level = self
                    .grammar
                    .effective_precedence_level(reduce_rule)
                    .unwrap_or(0);

                if shift_level > reduce_level {
                    return Ok(Resolution::Shift);
                }
                if shift_level < reduce_level {
                    return Ok(Resolution::Reduce);
                }

                match self.grammar.effective_associativity(shift_rule) {
                    Associativity::Left => return Ok(Resolution::Reduce),
                    Associativity::Right => return Ok(Resolution::Shift),
                    Associativity::None => {}
                }
            }
        }

        Err(TableError::ShiftReduce(self.conflict(
            shift_rule,
            reduce_rule,
            items,
        )))
    }

    fn conflict(
        &self,
        first_rule: RuleId,
        second_rule: RuleId,
        items: &BTreeSet<ParseItem>,
    ) -> Conflict {
        Conflict {
            first_rule,
            second_rule,
            first_display: self.grammar.display_rule(first_rule),
            second_display: self.grammar.display_rule(second_rule),
            item_display: items
                .iter()
                .map(|item| item.display(&self.grammar))
                .collect(),
            items: items.iter().copied().collect(),
        }
    }
}

/// A parsing conflict the table builder could not resolve. Carries the two
/// offending rules and the full state they collide in, pre-rendered so the
/// report stays readable after the grammar has been consumed.
///
/// For a shift/reduce conflict, `first_rule` is the rule calling for the
/// shift and `second_rule` the rule calling for the reduction. For a
/// reduce/reduce conflict, `first_rule` is the newly proposed rule and
/// `second_rule` the one already in the table.
#[derive(Debug)]
pub struct Conflict {
    pub first_rule: RuleId,
    pub second_rule: RuleId,
    first_display: String,
    second_display: String,
    items: Vec<ParseItem>,
    item_display: Vec<String>,
}

impl Conflict {
    /// The items of the state in which the conflict occurs.
    pub fn state_items(&self) -> &[ParseItem] {
        &self.items
    }

    fn write_state(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "parser state:")?;
        for item in &self.item_display {
            writeln!(f, "    {}", item)?;
        }
        Ok(())
    }
}

/// Raised when the action and goto tables cannot be constructed for a
/// grammar.
#[derive(Debug)]
pub enum TableError {
    /// The grammar has no start variable, or the start variable has no
    /// rules.
    MissingStartRule,
    /// A shift/reduce conflict not covered by precedence declarations.
    ShiftReduce(Conflict),
    /// Two different rules propose a reduction on the same lookahead.
    ReduceReduce(Conflict),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            TableError::MissingStartRule => write!(f, "missing start rule"),
            TableError::ShiftReduce(conflict) => {
                writeln!(f, "shift/reduce conflict encountered")?;
                writeln!(f)?;
                writeln!(f, "shift rule:  {}", conflict.first_display)?;
                writeln!(f, "reduce rule: {}", conflict.second_display)?;
                writeln!(f)?;
                conflict.write_state(f)
            }
            TableError::ReduceReduce(conflict) => {
                writeln!(f, "reduce/reduce conflict encountered")?;
                writeln!(f)?;
                writeln!(f, "rule #1: {}", conflict.first_display)?;
                writeln!(f, "rule #2: {}", conflict.second_display)?;
                writeln!(f)?;
                conflict.write_state(f)
            }
        }
    }
}

impl Error for TableError {}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    /// A → B C 'd'; B → 'b' | ε; C → 'c' | ε. Small oracle pinning the
    /// FIRST/nullable semantics: FIRST folds nullable prefixes and stops at
    /// the first non-nullable item.
    fn oracle_grammar() -> (Grammar, [TerminalId; 3], [VariableId; 3]) {
        let mut grammar = Grammar::new();

        let b = grammar.add_terminal("b", false);
        let c = grammar.add_terminal("c", false);
        let d = grammar.add_terminal("d", false);

        let var_a = grammar.add_variable("A");
        let var_b = grammar.add_variable("B");
        let var_c = grammar.add_variable("C");

        let rule = grammar.add_rule(var_a);
        grammar.push_variable(rule, var_b);
        grammar.push_variable(rule, var_c);
        grammar.push_terminal(rule, d, true);

        let rule = grammar.add_rule(var_b);
        grammar.push_terminal(rule, b, true);
        grammar.add_rule(var_b);

        let rule = grammar.add_rule(var_c);
        grammar.push_terminal(rule, c, true);
        grammar.add_rule(var_c);

        grammar.set_start(var_a);

        (grammar, [b, c, d], [var_a, var_b, var_c])
    }

    #[test]
    fn nullable_oracle() {
        let (grammar, _, [var_a, var_b, var_c]) = oracle_grammar();
        let builder = TableBuilder::prepare(grammar).unwrap();

        assert!(!builder.nullable[var_a.index()]);
        assert!(builder.nullable[var_b.index()]);
        assert!(builder.nullable[var_c.index()]);
    }

    #[test]
    fn first_set_oracle() {
        let (grammar, [b, c, d], [var_a, var_b, var_c]) = oracle_grammar();
        let builder = TableBuilder::prepare(grammar).unwrap();

        let first_a: Vec<_> = builder.first_sets[var_a.index()].iter().copied().collect();
        assert_eq!(first_a, vec![b, c, d]);

        assert!(builder.first_sets[var_b.index()].contains(&b));
        assert!(!builder.first_sets[var_b.index()].contains(&c));
        assert!(builder.first_sets[var_c.index()].contains(&c));
    }

    #[test]
    fn follow_set_oracle() {
        let (grammar, [_, c, d], [var_a, var_b, var_c]) = oracle_grammar();
        let end = grammar.end_terminal();
        let builder = TableBuilder::prepare(grammar).unwrap();

        // FOLLOW(B) = FIRST(C) plus, since C is nullable, 'd'.
        assert!(builder.follow_sets[var_b.index()].contains(&c));
        assert!(builder.follow_sets[var_b.index()].contains(&d));
        assert!(builder.follow_sets[var_c.index()].contains(&d));
        assert!(builder.follow_sets[var_a.index()].contains(&end));
    }

    #[test]
    fn simple_grammar_accepts() {
        let mut grammar = Grammar::new();
        let a = grammar.add_terminal("a", false);
        let b = grammar.add_terminal("b", false);
        let s = grammar.add_variable("S");

        let rule = grammar.add_rule(s);
        grammar.push_terminal(rule, a, true);
        grammar.push_terminal(rule, b, true);
        grammar.set_start(s);

        let end = grammar.end_terminal();
        let tables = build_tables(grammar).unwrap();

        assert_matches!(tables.states[0].action(a), Some(Action::Shift(_)));
        assert!(tables
            .states
            .iter()
            .any(|state| state.action(end) == Some(Action::Accept)));
        assert!(tables
            .states
            .iter()
            .any(|state| matches!(state.action(end), Some(Action::Reduce(r)) if r == rule)));
    }

    #[test]
    fn missing_start_rule_is_reported() {
        let grammar = Grammar::new();
        assert_matches!(build_tables(grammar), Err(TableError::MissingStartRule));

        let mut grammar = Grammar::new();
        let s = grammar.add_variable("S");
        grammar.set_start(s);
        assert_matches!(build_tables(grammar), Err(TableError::MissingStartRule));
    }

    /// S → S S | 'a' with no precedence declarations is ambiguous; the
    /// build must fail with a shift/reduce report naming both rules and
    /// enumerating the conflicting state.
    #[test]
    fn ambiguous_grammar_reports_shift_reduce_conflict() {
        let mut grammar = Grammar::new();
        let a = grammar.add_terminal("a", false);
        let s = grammar.add_variable("S");

        let recursive = grammar.add_rule(s);
        grammar.push_variable(recursive, s);
        grammar.push_variable(recursive, s);

        let leaf = grammar.add_rule(s);
        grammar.push_terminal(leaf, a, true);

        grammar.set_start(s);
        let end = grammar.end_terminal();

        let conflict = match build_tables(grammar) {
            Err(TableError::ShiftReduce(conflict)) => conflict,
            other => panic!("expected a shift/reduce conflict, got {:?}", other),
        };

        assert_eq!(conflict.first_rule, leaf);
        assert_eq!(conflict.second_rule, recursive);

        let items = conflict.state_items();
        assert!(items.contains(&ParseItem::new(recursive, 1, a)));
        assert!(items.contains(&ParseItem::new(recursive, 1, end)));
    }

    /// Equal precedence levels resolve through associativity; left means
    /// reduce, right means shift, and unspecified stays a conflict.
    #[test]
    fn associativity_resolves_equal_precedence() {
        for (associativity, expect_ok) in [
            (Associativity::Left, true),
            (Associativity::Right, true),
            (Associativity::None, false),
        ] {
            let mut grammar = Grammar::new();
            let plus = grammar.add_terminal("+", false);
            let id = grammar.add_terminal("id", false);
            let e = grammar.add_variable("E");

            let sum = grammar.add_rule(e);
            grammar.push_variable(sum, e);
            grammar.push_terminal(sum, plus, true);
            grammar.push_variable(sum, e);
            grammar.set_precedence(sum, 0, 0);
            grammar.set_associativity(sum, associativity);

            let leaf = grammar.add_rule(e);
            grammar.push_terminal(leaf, id, true);

            grammar.set_start(e);

            let result = build_tables(grammar);
            assert_eq!(result.is_ok(), expect_ok, "{:?}", associativity);
        }
    }
}
