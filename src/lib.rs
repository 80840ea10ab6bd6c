mod context;
mod error;
mod expr;
mod grammar;
mod lsystem;
mod module;
mod rng;
mod rule;

pub use error::{LSystemError, Result};
pub use expr::{evaluate, evaluate_bool, parse as parse_expr, BinOp, Expr};
pub use grammar::{parse_axiom, parse_rule};
pub use lsystem::LSystem;
pub use module::{Binding, Definitions, IgnoreSet, Module, PatternModule, WordModule};
pub use rule::{Rule, RuleKind, Successor, TemplateModule, WeightedSuccessor};

#[cfg(test)]
mod tests;
