use crate::lr::grammar::{Grammar, RuleId, TerminalId};

/// An LR(1) item `[A → α · β, a]`: a rule in the grammar, the position of
/// the dot within its right side, and a lookahead terminal. Equality and
/// hashing are structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParseItem {
    /// The rule A → αβ.
    pub rule: RuleId,
    /// The position of the dot, `0 ..= rule.rhs().len()`.
    pub position: usize,
    /// The lookahead terminal.
    pub lookahead: TerminalId,
}

impl ParseItem {
    pub fn new(rule: RuleId, position: usize, lookahead: TerminalId) -> Self {
        ParseItem {
            rule,
            position,
            lookahead,
        }
    }

    /// Is the dot at the end of the rule?
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.position == grammar.rule(self.rule).rhs().len()
    }

    /// Renders the item as a string like `[A → α · β, a]`.
    pub fn display(&self, grammar: &Grammar) -> String {
        let rule = grammar.rule(self.rule);
        let mut rendered = format!("[{} →", grammar.variable(rule.lhs()).name());

        for (index, reference) in rule.rhs().iter().enumerate() {
            if index == self.position {
                rendered.push_str(" ·");
            }
            rendered.push(' ');
            rendered.push_str(&grammar.display_reference(reference));
        }

        if self.position == rule.rhs().len() {
            rendered.push_str(" ·");
        }

        rendered.push_str(&format!(
            ", {}]",
            grammar.display_terminal(self.lookahead)
        ));

        rendered
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn items_render_with_a_dot() {
        let mut grammar = Grammar::new();
        let plus = grammar.add_terminal("+", false);
        let expression = grammar.add_variable("expression");

        let rule = grammar.add_rule(expression);
        grammar.push_variable(rule, expression);
        grammar.push_terminal(rule, plus, true);
        grammar.push_variable(rule, expression);

        let item = ParseItem::new(rule, 2, plus);
        assert_eq!(
            item.display(&grammar),
            "[expression → expression '+' · expression, '+']"
        );

        let complete = ParseItem::new(rule, 3, plus);
        assert!(complete.is_complete(&grammar));
        assert_eq!(
            complete.display(&grammar),
            "[expression → expression '+' expression ·, '+']"
        );
    }
}
