//! Component B: production rule representation.
//!
//! A `Rule` pairs a predecessor pattern (possibly with left/right context,
//! §4.B) and an optional condition with a successor, which is either a
//! single deterministic replacement or a set of alternatives picked by
//! cumulative probability (§4.C). `RuleKind` carries exactly the context
//! fields each of the four rule shapes needs instead of leaving the
//! non-context fields present-but-unused.

use crate::expr::Expr;
use crate::module::{Module, PatternModule};

/// A module in a successor template: a symbol with parameter expressions
/// evaluated against the binding captured at match time.
pub type TemplateModule = Module<Expr>;

/// The four production rule shapes (§3, §4.B). Each variant carries only
/// the context pattern(s) its shape actually uses.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleKind {
    /// 0L: context-free.
    ZeroL,
    /// 1L, context to the left only.
    OneLLeft { left: PatternModule },
    /// 1L, context to the right only.
    OneLRight { right: PatternModule },
    /// 2L: context on both sides.
    TwoL {
        left: PatternModule,
        right: PatternModule,
    },
}

impl RuleKind {
    pub fn left(&self) -> Option<&PatternModule> {
        match self {
            RuleKind::OneLLeft { left } => Some(left),
            RuleKind::TwoL { left, .. } => Some(left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&PatternModule> {
        match self {
            RuleKind::OneLRight { right } => Some(right),
            RuleKind::TwoL { right, .. } => Some(right),
            _ => None,
        }
    }
}

/// One alternative successor, weighted by probability, as written by a
/// stochastic rule. A deterministic rule is modelled as a single
/// alternative with probability 1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSuccessor {
    pub probability: f64,
    pub modules: Vec<TemplateModule>,
}

/// The right-hand side of a production rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Successor {
    Deterministic(Vec<TemplateModule>),
    Stochastic(Vec<WeightedSuccessor>),
}

/// A single production rule: `predecessor : condition ? successor`, with
/// context folded into `kind` per §4.B.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub kind: RuleKind,
    pub predecessor: PatternModule,
    pub condition: Option<Expr>,
    pub successor: Successor,
}

impl Rule {
    /// The symbol this rule's predecessor matches against, used to index
    /// the rule table.
    pub fn symbol(&self) -> &str {
        &self.predecessor.symbol
    }

    /// Whether this rule requires left context, right context, or both, to
    /// decide applicability — used by the derivation engine to skip the
    /// context locator entirely for plain 0L rules.
    pub fn needs_context(&self) -> bool {
        !matches!(self.kind, RuleKind::ZeroL)
    }
}
