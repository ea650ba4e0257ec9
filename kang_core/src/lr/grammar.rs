use std::collections::BTreeMap;
use std::fmt;

use crate::lr::assoc::Associativity;

/// Index of a terminal in its owning [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(usize);

/// Index of a variable (non-terminal) in its owning [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(usize);

/// Index of a production rule in its owning [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(usize);

impl TerminalId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl VariableId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A terminal symbol, corresponding to a token class produced by a lexer.
/// Terminals are the atomic units of text that make up a source program.
#[derive(Debug, Clone)]
pub struct Terminal {
    name: String,
    discardable: bool,
}

impl Terminal {
    /// The token class associated with this terminal.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// If `true`, instances of this terminal are left out of the parse tree
    /// by default. Individual rule references can override this with their
    /// `preserved` flag.
    pub fn is_discardable(&self) -> bool {
        self.discardable
    }
}

/// A variable (non-terminal), which has associated production rules that
/// determine the possible derivations in the grammar.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    rules: Vec<RuleId>,
    parent_rule: Option<RuleId>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The possible replacement rules for this variable, in declaration order.
    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    /// For auxiliary variables synthesized from extended grammar constructs
    /// (`optional`, `repeat`, ...), the rule they were created for.
    pub fn parent_rule(&self) -> Option<RuleId> {
        self.parent_rule
    }

    /// If `true`, the variable is collapsed after being parsed: its children
    /// are spliced into the parse tree where the variable itself would be.
    pub fn is_collapsible(&self) -> bool {
        self.parent_rule.is_some()
    }
}

/// Reference to a terminal or variable on the right side of a rule. A
/// separate type from the grammar items themselves so that per-reference
/// attributes can be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Terminal {
        terminal: TerminalId,
        /// If `false`, the matched token is discarded after being parsed and
        /// is not added to the parse tree.
        preserved: bool,
    },
    Variable(VariableId),
}

impl Reference {
    pub fn symbol(&self) -> Symbol {
        match *self {
            Reference::Terminal { terminal, .. } => Symbol::Terminal(terminal),
            Reference::Variable(variable) => Symbol::Variable(variable),
        }
    }
}

/// A terminal or variable, without reference attributes. Used wherever the
/// two kinds of grammar item need to travel together, e.g. transitions
/// during table construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(TerminalId),
    Variable(VariableId),
}

/// A single production "variable → variables and terminals".
#[derive(Debug, Clone)]
pub struct Rule {
    lhs: VariableId,
    rhs: Vec<Reference>,
    precedence_set: Option<usize>,
    precedence_level: Option<usize>,
    associativity: Associativity,
}

impl Rule {
    /// The variable on the left side of the rule.
    pub fn lhs(&self) -> VariableId {
        self.lhs
    }

    /// The replacement items on the right side of the rule.
    pub fn rhs(&self) -> &[Reference] {
        &self.rhs
    }

    /// This rule's own precedence set, ignoring parent-rule inheritance.
    /// Only rules in the same set can be compared during conflict
    /// resolution.
    pub fn precedence_set(&self) -> Option<usize> {
        self.precedence_set
    }

    /// This rule's own precedence level, ignoring parent-rule inheritance.
    pub fn precedence_level(&self) -> Option<usize> {
        self.precedence_level
    }

    /// This rule's own associativity, ignoring parent-rule inheritance.
    pub fn associativity(&self) -> Associativity {
        self.associativity
    }
}

/// A context-free grammar: terminals, variables, and their production rules,
/// plus a designated start variable and the distinguished `@error` terminal
/// used for panic-mode recovery.
///
/// All items live in arenas owned by the grammar and are addressed by id;
/// references always resolve through the grammar value itself.
#[derive(Debug, Clone)]
pub struct Grammar {
    terminals: Vec<Terminal>,
    variables: Vec<Variable>,
    rules: Vec<Rule>,
    terminal_names: BTreeMap<String, TerminalId>,
    variable_names: BTreeMap<String, VariableId>,
    start: Option<VariableId>,
}

impl Grammar {
    /// Creates an empty grammar. The `@error` recovery terminal always
    /// exists; the `@end` terminal is reserved for the table builder and
    /// never appears in the public terminal map.
    pub fn new() -> Self {
        let mut grammar = Grammar {
            terminals: Vec::new(),
            variables: Vec::new(),
            rules: Vec::new(),
            terminal_names: BTreeMap::new(),
            variable_names: BTreeMap::new(),
            start: None,
        };

        let error = grammar.add_terminal("@error", false);
        debug_assert_eq!(error, grammar.error_terminal());

        grammar.terminals.push(Terminal {
            name: "@end".to_string(),
            discardable: false,
        });

        grammar
    }

    /// The sentinel terminal shifted during panic-mode error recovery.
    pub fn error_terminal(&self) -> TerminalId {
        TerminalId(0)
    }

    /// The end-of-input terminal. Internal to table construction; tokens
    /// never carry this class.
    pub fn end_terminal(&self) -> TerminalId {
        TerminalId(1)
    }

    /// Adds a new terminal to this grammar. If `discardable`, instances are
    /// omitted from the parse tree unless a reference says otherwise.
    pub fn add_terminal(&mut self, name: &str, discardable: bool) -> TerminalId {
        let id = TerminalId(self.terminals.len());
        self.terminals.push(Terminal {
            name: name.to_string(),
            discardable,
        });
        self.terminal_names.insert(name.to_string(), id);
        id
    }

    /// Adds a new variable to this grammar.
    pub fn add_variable(&mut self, name: &str) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(Variable {
            name: name.to_string(),
            rules: Vec::new(),
            parent_rule: None,
        });
        self.variable_names.insert(name.to_string(), id);
        id
    }

    /// Adds a new auxiliary variable created while desugaring an extended
    /// construct inside `parent_rule`. The synthetic name contains `@`,
    /// which cannot occur in user identifiers, so it can never collide.
    pub fn add_auxiliary_variable(&mut self, parent_rule: RuleId) -> VariableId {
        let parent_name = self.variable(self.rule(parent_rule).lhs).name.clone();
        let name = format!("{}@{}", parent_name, self.variables.len());

        let id = VariableId(self.variables.len());
        self.variables.push(Variable {
            name: name.clone(),
            rules: Vec::new(),
            parent_rule: Some(parent_rule),
        });
        self.variable_names.insert(name, id);
        id
    }

    /// Adds a new, initially empty rule ("`lhs` → ε") to a variable.
    pub fn add_rule(&mut self, lhs: VariableId) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules.push(Rule {
            lhs,
            rhs: Vec::new(),
            precedence_set: None,
            precedence_level: None,
            associativity: Associativity::None,
        });
        self.variables[lhs.0].rules.push(id);
        id
    }

    /// Appends a terminal reference to the end of a rule.
    pub fn push_terminal(&mut self, rule: RuleId, terminal: TerminalId, preserved: bool) {
        self.rules[rule.0].rhs.push(Reference::Terminal {
            terminal,
            preserved,
        });
    }

    /// Appends a variable reference to the end of a rule.
    pub fn push_variable(&mut self, rule: RuleId, variable: VariableId) {
        self.rules[rule.0].rhs.push(Reference::Variable(variable));
    }

    /// Appends an `@error` recovery marker to the end of a rule. Error
    /// markers are always preserved so the resulting error node stays in
    /// the parse tree.
    pub fn push_error(&mut self, rule: RuleId) {
        let error = self.error_terminal();
        self.push_terminal(rule, error, true);
    }

    pub fn set_precedence(&mut self, rule: RuleId, set: usize, level: usize) {
        self.rules[rule.0].precedence_set = Some(set);
        self.rules[rule.0].precedence_level = Some(level);
    }

    pub fn set_associativity(&mut self, rule: RuleId, associativity: Associativity) {
        self.rules[rule.0].associativity = associativity;
    }

    pub fn set_start(&mut self, variable: VariableId) {
        self.start = Some(variable);
    }

    /// The start symbol, the root variable of the grammar.
    pub fn start_variable(&self) -> Option<VariableId> {
        self.start
    }

    pub fn terminal(&self, id: TerminalId) -> &Terminal {
        &self.terminals[id.0]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    pub fn terminal_by_name(&self, name: &str) -> Option<TerminalId> {
        self.terminal_names.get(name).copied()
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.get(name).copied()
    }

    /// The named terminals of this grammar, in name order. The internal
    /// `@end` sentinel is not included.
    pub fn terminals(&self) -> impl Iterator<Item = (TerminalId, &Terminal)> {
        self.terminal_names
            .values()
            .map(move |&id| (id, &self.terminals[id.0]))
    }

    /// The named variables of this grammar, in name order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variable_names
            .values()
            .map(move |&id| (id, &self.variables[id.0]))
    }

    pub(crate) fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn terminal_ids(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terminals.len()).map(TerminalId)
    }

    pub(crate) fn variable_ids(&self) -> impl Iterator<Item = VariableId> {
        (0..self.variables.len()).map(VariableId)
    }

    /// Does this rule contain an `@error` recovery marker?
    pub fn is_error_rule(&self, rule: RuleId) -> bool {
        let error = self.error_terminal();
        self.rule(rule).rhs.iter().any(|reference| {
            matches!(reference, Reference::Terminal { terminal, .. } if *terminal == error)
        })
    }

    /// The rule whose precedence and associativity govern `rule`. Rules of
    /// collapsible auxiliary variables defer to their parent rule,
    /// transitively.
    pub fn effective_rule(&self, rule: RuleId) -> RuleId {
        let mut current = rule;
        while let Some(parent) = self.variable(self.rule(current).lhs).parent_rule {
            current = parent;
        }
        current
    }

    pub fn effective_precedence_set(&self, rule: RuleId) -> Option<usize> {
        self.rule(self.effective_rule(rule)).precedence_set
    }

    pub fn effective_precedence_level(&self, rule: RuleId) -> Option<usize> {
        self.rule(self.effective_rule(rule)).precedence_level
    }

    pub fn effective_associativity(&self, rule: RuleId) -> Associativity {
        self.rule(self.effective_rule(rule)).associativity
    }

    /// Appends the augmented start variable `@start` with the single rule
    /// "`@start` → S" and makes it the start symbol. The synthetic variable
    /// is not registered in the name map, so it never shows up in the
    /// public grammar view.
    pub(crate) fn augment(&mut self) -> (VariableId, RuleId) {
        let original = self.start.expect("augmenting a grammar without a start variable");

        let start = VariableId(self.variables.len());
        self.variables.push(Variable {
            name: "@start".to_string(),
            rules: Vec::new(),
            parent_rule: None,
        });

        let rule = self.add_rule(start);
        self.push_variable(rule, original);
        self.start = Some(start);

        (start, rule)
    }

    /// Restores the original start symbol after table construction. The
    /// augmented items stay in the arena so ids embedded in the tables
    /// remain valid.
    pub(crate) fn unaugment(&mut self, original: VariableId) {
        self.start = Some(original);
    }

    /// Renders a terminal the way rules are printed, adding single quotes
    /// unless the name consists of word characters and spaces only.
    pub fn display_terminal(&self, id: TerminalId) -> String {
        let name = &self.terminal(id).name;
        let plain = !name.is_empty()
            && name
                .chars()
                .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == ' ' || ch == '@');

        if plain {
            name.clone()
        } else {
            format!("'{}'", name)
        }
    }

    pub(crate) fn display_reference(&self, reference: &Reference) -> String {
        match reference {
            Reference::Terminal { terminal, .. } => self.display_terminal(*terminal),
            Reference::Variable(variable) => self.variable(*variable).name.clone(),
        }
    }

    /// Renders a rule as a string like "statement → expression ';'".
    pub fn display_rule(&self, id: RuleId) -> String {
        let rule = self.rule(id);
        let mut rendered = format!("{} →", self.variable(rule.lhs).name);

        if rule.rhs.is_empty() {
            rendered.push_str(" ε");
        } else {
            for reference in &rule.rhs {
                rendered.push(' ');
                rendered.push_str(&self.display_reference(reference));
            }
        }

        rendered
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new()
    }
}

impl fmt::Display for Grammar {
    /// Renders a summary of the grammar: the terminal alphabet followed by
    /// every variable's rules with their precedence attributes.
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Terminals:")?;
        for (id, _) in self.terminals() {
            write!(f, " {}", self.display_terminal(id))?;
        }
        writeln!(f)?;

        for (_, variable) in self.variables() {
            writeln!(f)?;
            writeln!(f, "{}:", variable.name())?;

            for &rule in variable.rules() {
                write!(f, "    {}", self.display_rule(rule))?;

                if let Some(set) = self.effective_precedence_set(rule) {
                    write!(
                        f,
                        " (set = {}, precedence = {}, associativity = {})",
                        set,
                        self.effective_precedence_level(rule).unwrap_or(0),
                        self.effective_associativity(rule),
                    )?;
                }

                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_terminal_always_exists() {
        let grammar = Grammar::new();
        assert_eq!(
            grammar.terminal_by_name("@error"),
            Some(grammar.error_terminal())
        );
        assert!(!grammar.terminal(grammar.error_terminal()).is_discardable());
    }

    #[test]
    fn end_terminal_is_hidden() {
        let grammar = Grammar::new();
        assert_eq!(grammar.terminal_by_name("@end"), None);
        assert_eq!(grammar.terminal(grammar.end_terminal()).name(), "@end");
        assert!(grammar.terminals().all(|(id, _)| id != grammar.end_terminal()));
    }

    #[test]
    fn auxiliary_names_cannot_collide_with_identifiers() {
        let mut grammar = Grammar::new();
        let expression = grammar.add_variable("expression");
        let rule = grammar.add_rule(expression);
        let auxiliary = grammar.add_auxiliary_variable(rule);

        assert!(grammar.variable(auxiliary).name().contains('@'));
        assert!(grammar.variable(auxiliary).is_collapsible());
        assert_eq!(grammar.variable(auxiliary).parent_rule(), Some(rule));
    }

    #[test]
    fn precedence_is_inherited_transitively() {
        let mut grammar = Grammar::new();
        let expression = grammar.add_variable("expression");

        let rule = grammar.add_rule(expression);
        grammar.set_precedence(rule, 0, 3);
        grammar.set_associativity(rule, Associativity::Left);

        let auxiliary = grammar.add_auxiliary_variable(rule);
        let inner = grammar.add_rule(auxiliary);
        let nested = grammar.add_auxiliary_variable(inner);
        let innermost = grammar.add_rule(nested);

        assert_eq!(grammar.effective_precedence_set(innermost), Some(0));
        assert_eq!(grammar.effective_precedence_level(innermost), Some(3));
        assert_eq!(
            grammar.effective_associativity(innermost),
            Associativity::Left
        );

        // A rule with no auxiliary ancestry keeps its own attributes.
        assert_eq!(grammar.effective_rule(rule), rule);
    }

    #[test]
    fn rules_render_like_productions() {
        let mut grammar = Grammar::new();
        let semicolon = grammar.add_terminal(";", false);
        let statement = grammar.add_variable("statement");
        let expression = grammar.add_variable("expression");

        let rule = grammar.add_rule(statement);
        grammar.push_variable(rule, expression);
        grammar.push_terminal(rule, semicolon, true);

        assert_eq!(grammar.display_rule(rule), "statement → expression ';'");

        let empty = grammar.add_rule(expression);
        assert_eq!(grammar.display_rule(empty), "expression → ε");
    }

    #[test]
    fn error_rules_are_detected() {
        let mut grammar = Grammar::new();
        let semicolon = grammar.add_terminal(";", false);
        let statement = grammar.add_variable("statement");

        let plain = grammar.add_rule(statement);
        grammar.push_terminal(plain, semicolon, true);

        let recovery = grammar.add_rule(statement);
        grammar.push_error(recovery);
        grammar.push_terminal(recovery, semicolon, true);

        assert!(!grammar.is_error_rule(plain));
        assert!(grammar.is_error_rule(recovery));
    }
}
