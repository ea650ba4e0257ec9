//! Loads a context-free grammar from an XML description and elaborates it
//! into plain BNF over [`kang_core::Grammar`].
//!
//! The description declares terminals and variables up front, so forward
//! references always resolve, and builds rules out of plain references plus
//! the extended constructs `group`, `optional`, `repeat`, `choice`, and
//! `error`. Extended constructs desugar into fresh auxiliary variables
//! that collapse out of the parse tree. `ordered-by-precedence` blocks
//! assign rules a shared precedence set; entries listed later bind
//! tighter.
//!
//! ```xml
//! <grammar start="expression">
//!   <terminal name="+"/>
//!   <terminal name="identifier"/>
//!   <variable name="expression">
//!     <ordered-by-precedence>
//!       <group associativity="left">
//!         <rule>
//!           <variable>expression</variable>
//!           <terminal>+</terminal>
//!           <variable>expression</variable>
//!         </rule>
//!       </group>
//!     </ordered-by-precedence>
//!     <rule><terminal>identifier</terminal></rule>
//!   </variable>
//! </grammar>
//! ```

use kang_core::{Associativity, Grammar, RuleId, VariableId};

mod error;
mod xml;

pub use crate::error::InvalidGrammar;

use crate::xml::Element;

/// Loads a grammar from an XML description.
pub fn load(description: &str) -> Result<Grammar, InvalidGrammar> {
    let root = xml::parse_document(description)?;
    if root.name != "grammar" {
        return Err(InvalidGrammar::UnexpectedElement { element: root.name });
    }

    let mut grammar = Grammar::new();

    // Register every terminal and every variable before building any rule,
    // so rules can reference items declared later in the document.
    for element in root.children_named("terminal") {
        let name = element.require_attribute("name")?;
        if grammar.terminal_by_name(name).is_some() {
            return Err(InvalidGrammar::DuplicateTerminal {
                name: name.to_string(),
            });
        }

        let discardable = yes_no(element, "discard", false)?;
        grammar.add_terminal(name, discardable);
    }

    let mut variables: Vec<(VariableId, &Element)> = Vec::new();
    for element in root.children_named("variable") {
        let name = element.require_attribute("name")?;
        if grammar.variable_by_name(name).is_some() {
            return Err(InvalidGrammar::DuplicateVariable {
                name: name.to_string(),
            });
        }

        variables.push((grammar.add_variable(name), element));
    }

    // The start symbol defaults to the first declared variable.
    let start = match root.attribute("start") {
        Some(name) => grammar
            .variable_by_name(name)
            .ok_or_else(|| InvalidGrammar::UnknownVariable {
                name: name.to_string(),
            })?,
        None => match variables.first() {
            Some(&(first, _)) => first,
            None => return Err(InvalidGrammar::NoVariables),
        },
    };
    grammar.set_start(start);

    // Every ordered-by-precedence block in the document gets its own
    // precedence set id; levels are the ordinal positions of its entries.
    let mut precedence_set = 0;

    for (variable, element) in variables {
        for child in &element.children {
            match child.name.as_str() {
                "rule" => {
                    let rule = grammar.add_rule(variable);
                    add_items(&mut grammar, rule, &child.children)?;
                }
                "ordered-by-precedence" => {
                    let mut level = 0;

                    for entry in &child.children {
                        match entry.name.as_str() {
                            "group" => {
                                // Every rule in the group shares the same
                                // precedence level and associativity.
                                let associativity = associativity_of(entry)?;

                                for rule_element in &entry.children {
                                    if rule_element.name != "rule" {
                                        return Err(InvalidGrammar::UnexpectedElement {
                                            element: rule_element.name.clone(),
                                        });
                                    }

                                    let rule = grammar.add_rule(variable);
                                    grammar.set_precedence(rule, precedence_set, level);
                                    grammar.set_associativity(rule, associativity);
                                    add_items(&mut grammar, rule, &rule_element.children)?;
                                }
                            }
                            "rule" => {
                                let associativity = associativity_of(entry)?;

                                let rule = grammar.add_rule(variable);
                                grammar.set_precedence(rule, precedence_set, level);
                                grammar.set_associativity(rule, associativity);
                                add_items(&mut grammar, rule, &entry.children)?;
                            }
                            other => {
                                return Err(InvalidGrammar::UnexpectedElement {
                                    element: other.to_string(),
                                });
                            }
                        }

                        level += 1;
                    }

                    precedence_set += 1;
                }
                other => {
                    return Err(InvalidGrammar::UnexpectedElement {
                        element: other.to_string(),
                    });
                }
            }
        }
    }

    log::debug!(
        "loaded grammar: {} terminals, {} variables",
        grammar.terminals().count(),
        grammar.variables().count(),
    );

    Ok(grammar)
}

/// Appends the rule items described by `items` to `rule`, desugaring
/// extended constructs into auxiliary collapsible variables.
fn add_items(
    grammar: &mut Grammar,
    rule: RuleId,
    items: &[Element],
) -> Result<(), InvalidGrammar> {
    for item in items {
        match item.name.as_str() {
            "terminal" => {
                let name = item.text_trim();
                let terminal =
                    grammar
                        .terminal_by_name(name)
                        .ok_or_else(|| InvalidGrammar::UnknownTerminal {
                            name: name.to_string(),
                        })?;

                let preserved = yes_no(
                    item,
                    "preserved",
                    !grammar.terminal(terminal).is_discardable(),
                )?;
                grammar.push_terminal(rule, terminal, preserved);
            }

            "variable" => {
                let name = item.text_trim();
                let variable =
                    grammar
                        .variable_by_name(name)
                        .ok_or_else(|| InvalidGrammar::UnknownVariable {
                            name: name.to_string(),
                        })?;

                grammar.push_variable(rule, variable);
            }

            "group" => {
                // Let A → items.
                let auxiliary = grammar.add_auxiliary_variable(rule);
                let inner = grammar.add_rule(auxiliary);
                add_items(grammar, inner, &item.children)?;

                grammar.push_variable(rule, auxiliary);
            }

            "optional" => {
                // Let A → items | ε.
                let auxiliary = grammar.add_auxiliary_variable(rule);
                let present = grammar.add_rule(auxiliary);
                add_items(grammar, present, &item.children)?;
                grammar.add_rule(auxiliary);

                grammar.push_variable(rule, auxiliary);
            }

            "repeat" => {
                let min = require_usize(item, "min")?;

                match item.attribute("max") {
                    None => {
                        // Let A → A items | items^min.
                        let auxiliary = grammar.add_auxiliary_variable(rule);

                        let recursive = grammar.add_rule(auxiliary);
                        grammar.push_variable(recursive, auxiliary);
                        add_items(grammar, recursive, &item.children)?;

                        let base = grammar.add_rule(auxiliary);
                        for _ in 0..min {
                            add_items(grammar, base, &item.children)?;
                        }

                        grammar.push_variable(rule, auxiliary);
                    }
                    Some(_) => {
                        let max = require_usize(item, "max")?;
                        if min > max {
                            return Err(InvalidGrammar::RepeatBounds { min, max });
                        }

                        // Let A → items^i for each i between min and max.
                        let auxiliary = grammar.add_auxiliary_variable(rule);

                        for count in min..=max {
                            let alternative = grammar.add_rule(auxiliary);
                            for _ in 0..count {
                                add_items(grammar, alternative, &item.children)?;
                            }
                        }

                        grammar.push_variable(rule, auxiliary);
                    }
                }
            }

            "choice" => {
                // Let A → alternative, one rule per alternative.
                let auxiliary = grammar.add_auxiliary_variable(rule);

                for alternative in &item.children {
                    let inner = grammar.add_rule(auxiliary);
                    add_items(grammar, inner, std::slice::from_ref(alternative))?;
                }

                grammar.push_variable(rule, auxiliary);
            }

            "error" => {
                grammar.push_error(rule);
            }

            other => {
                return Err(InvalidGrammar::UnexpectedElement {
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn yes_no(element: &Element, attribute: &str, default: bool) -> Result<bool, InvalidGrammar> {
    match element.attribute(attribute) {
        None => Ok(default),
        Some("yes") => Ok(true),
        Some("no") => Ok(false),
        Some(other) => Err(InvalidGrammar::InvalidAttribute {
            element: element.name.clone(),
            attribute: attribute.to_string(),
            value: other.to_string(),
        }),
    }
}

fn require_usize(element: &Element, attribute: &str) -> Result<usize, InvalidGrammar> {
    let value = element.require_attribute(attribute)?;
    value
        .parse()
        .map_err(|_| InvalidGrammar::InvalidAttribute {
            element: element.name.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

fn associativity_of(element: &Element) -> Result<Associativity, InvalidGrammar> {
    match element.attribute("associativity") {
        None | Some("none") => Ok(Associativity::None),
        Some("left") => Ok(Associativity::Left),
        Some("right") => Ok(Associativity::Right),
        Some(other) => Err(InvalidGrammar::InvalidAttribute {
            element: element.name.clone(),
            attribute: "associativity".to_string(),
            value: other.to_string(),
        }),
    }
}
