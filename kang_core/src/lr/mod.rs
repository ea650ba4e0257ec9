mod grammar;
pub use self::grammar::{
    Grammar, Reference, Rule, RuleId, Symbol, Terminal, TerminalId, Variable, VariableId,
};

mod assoc;
pub use self::assoc::Associativity;

mod item;
pub use self::item::ParseItem;

mod state;
pub use self::state::State;

mod action;
pub use self::action::Action;

mod tables;
pub use self::tables::{Conflict, TableError};

pub(crate) use self::tables::build_tables;
