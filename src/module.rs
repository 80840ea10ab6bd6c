use std::collections::HashMap;

use crate::error::{LSystemError, Result};

/// A symbol together with an ordered list of parameters.
///
/// The parameter type varies with the module's role (§3 of the spec):
/// a real number in the current word, a formal identifier in a rule's
/// predecessor/context pattern, or a parsed expression in a successor
/// template. Each role gets its own instantiation of this generic struct
/// rather than a shared untyped parameter list.
#[derive(Clone, Debug, PartialEq)]
pub struct Module<P> {
    pub symbol: String,
    pub params: Vec<P>,
}

impl<P> Module<P> {
    pub fn new(symbol: impl Into<String>, params: Vec<P>) -> Self {
        Module {
            symbol: symbol.into(),
            params,
        }
    }

    /// The sentinel module denoting "no context present". Always freshly
    /// allocated — never a shared default — per §9's warning against the
    /// host language's mutable-default-argument hazard.
    pub fn empty() -> Self {
        Module {
            symbol: String::new(),
            params: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_empty()
    }
}

/// A module as it appears in the current word: a symbol with real-valued parameters.
pub type WordModule = Module<f64>;

/// A module as it appears in a rule's predecessor or context pattern: a symbol
/// with formal parameter names.
pub type PatternModule = Module<String>;

/// A name→value binding used while evaluating conditions and successor
/// expressions. Wraps a plain map; kept as its own type so call sites read
/// `Binding` rather than `HashMap<String, f64>` everywhere.
#[derive(Clone, Debug, Default)]
pub struct Binding {
    values: HashMap<String, f64>,
}

impl Binding {
    pub fn new() -> Self {
        Binding {
            values: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Zips `names` with `values` positionally and inserts each pair.
    /// `names` and `values` must be the same length; a mismatch indicates a
    /// rule whose formal parameter count does not match the module bound
    /// against it, which is a structural error raised by the caller.
    pub fn bind_pairs(&mut self, names: &[String], values: &[f64]) -> Result<()> {
        if names.len() != values.len() {
            return Err(LSystemError::structural(
                names.join(","),
                names.len(),
                values.len(),
            ));
        }
        for (name, value) in names.iter().zip(values.iter()) {
            self.insert(name.clone(), *value);
        }
        Ok(())
    }
}

/// Set of symbols the context locator treats as transparent.
#[derive(Clone, Debug, Default)]
pub struct IgnoreSet {
    symbols: std::collections::HashSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        IgnoreSet {
            symbols: std::collections::HashSet::new(),
        }
    }

    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IgnoreSet {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }
}

/// Global name→number bindings injected into every successor-expression
/// evaluation, after the positional binding so a positional name shadows a
/// definition of the same name (§4.E.f).
#[derive(Clone, Debug, Default)]
pub struct Definitions {
    values: HashMap<String, f64>,
}

impl Definitions {
    pub fn new() -> Self {
        Definitions {
            values: HashMap::new(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Definitions {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn apply(&self, binding: &mut Binding) {
        for (name, value) in &self.values {
            if binding.get(name).is_none() {
                binding.insert(name.clone(), *value);
            }
        }
    }
}
