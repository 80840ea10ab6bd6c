//! Component E: the parallel derivation engine (§4.E).
//!
//! `LSystem` owns the current word, the immutable rule table, ignore set
//! and definitions, and an injectable random source. `next_generation`
//! scans the word left to right, finds context for each position with
//! component D, selects the first matching rule in declared order, and
//! either emits its evaluated successor or falls back to identity
//! production.

use log::{debug, trace};

use crate::context::{find_left_context, find_right_context};
use crate::error::Result;
use crate::expr;
use crate::grammar;
use crate::module::{Binding, Definitions, IgnoreSet, WordModule};
use crate::rng::DerivationRng;
use crate::rule::{Rule, RuleKind, Successor};

/// An L-system derivation: an axiom, a rule table, and the bookkeeping
/// needed to advance it one generation at a time.
pub struct LSystem {
    word: Vec<WordModule>,
    rules: Vec<Rule>,
    ignore: IgnoreSet,
    definitions: Definitions,
    rng: DerivationRng,
    generation: u32,
}

impl LSystem {
    /// Parses `axiom` and every entry of `rule_texts`, and constructs an
    /// `LSystem` ready to derive. Parsing failures are fatal here; the
    /// caller is told which string was at fault.
    pub fn construct<S: AsRef<str>>(
        axiom: &str,
        rule_texts: &[S],
        ignore: IgnoreSet,
        definitions: Definitions,
    ) -> Result<Self> {
        let word = grammar::parse_axiom(axiom)?;
        let rules = rule_texts
            .iter()
            .map(|text| grammar::parse_rule(text.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "constructed l-system: axiom has {} modules, {} rules",
            word.len(),
            rules.len()
        );

        Ok(LSystem {
            word,
            rules,
            ignore,
            definitions,
            rng: DerivationRng::default(),
            generation: 0,
        })
    }

    /// Replaces the random source's seed, for reproducible stochastic runs.
    pub fn seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// The current word, as of the last `next_generation` call (or the
    /// axiom, if none has been performed yet).
    pub fn current_word(&self) -> &[WordModule] {
        &self.word
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Derives the next generation and returns the new word. On success
    /// the old word is replaced; on failure (an unbound identifier or
    /// similar evaluation error) the prior word is left untouched.
    pub fn next_generation(&mut self) -> Result<&[WordModule]> {
        let mut output = Vec::with_capacity(self.word.len() * 2);

        for i in 0..self.word.len() {
            let current = &self.word[i];
            let mut accepted = false;

            for rule in &self.rules {
                if rule.symbol() != current.symbol {
                    continue;
                }

                let left = if rule.kind.left().is_some() {
                    find_left_context(&self.word, i, &self.ignore)
                } else {
                    WordModule::empty()
                };
                let right = if rule.kind.right().is_some() {
                    find_right_context(&self.word, i, &self.ignore)
                } else {
                    WordModule::empty()
                };

                if let Some(left_pat) = rule.kind.left() {
                    if left_pat.symbol != left.symbol {
                        continue;
                    }
                }
                if let Some(right_pat) = rule.kind.right() {
                    if right_pat.symbol != right.symbol {
                        continue;
                    }
                }

                let mut binding = build_binding(rule, &left, current, &right)?;

                if let Some(condition) = &rule.condition {
                    if !expr::evaluate_bool(condition, &binding)? {
                        continue;
                    }
                }

                self.definitions.apply(&mut binding);

                let templates = select_successor(&rule.successor, &mut self.rng);
                for template in templates {
                    let values = template
                        .params
                        .iter()
                        .map(|e| expr::evaluate(e, &binding))
                        .collect::<Result<Vec<_>>>()?;
                    output.push(WordModule::new(template.symbol.clone(), values));
                }

                trace!(
                    "generation {}: position {i} ('{}') matched rule for '{}'",
                    self.generation + 1,
                    current.symbol,
                    rule.symbol()
                );
                accepted = true;
                break;
            }

            if !accepted {
                trace!(
                    "generation {}: position {i} ('{}') had no matching rule, identity production",
                    self.generation + 1,
                    current.symbol
                );
                output.push(current.clone());
            }
        }

        self.generation += 1;
        self.word = output;
        debug!(
            "generation {}: word now has {} modules",
            self.generation,
            self.word.len()
        );
        Ok(&self.word)
    }
}

fn build_binding(
    rule: &Rule,
    left: &WordModule,
    center: &WordModule,
    right: &WordModule,
) -> Result<Binding> {
    let mut binding = Binding::new();
    match &rule.kind {
        RuleKind::ZeroL => {
            binding.bind_pairs(&rule.predecessor.params, &center.params)?;
        }
        RuleKind::OneLLeft { left: left_pat } => {
            let names: Vec<String> = left_pat
                .params
                .iter()
                .cloned()
                .chain(rule.predecessor.params.iter().cloned())
                .collect();
            let values: Vec<f64> = left
                .params
                .iter()
                .cloned()
                .chain(center.params.iter().cloned())
                .collect();
            binding.bind_pairs(&names, &values)?;
        }
        RuleKind::OneLRight { right: right_pat } => {
            let names: Vec<String> = rule
                .predecessor
                .params
                .iter()
                .cloned()
                .chain(right_pat.params.iter().cloned())
                .collect();
            let values: Vec<f64> = center
                .params
                .iter()
                .cloned()
                .chain(right.params.iter().cloned())
                .collect();
            binding.bind_pairs(&names, &values)?;
        }
        RuleKind::TwoL {
            left: left_pat,
            right: right_pat,
        } => {
            let names: Vec<String> = left_pat
                .params
                .iter()
                .cloned()
                .chain(rule.predecessor.params.iter().cloned())
                .chain(right_pat.params.iter().cloned())
                .collect();
            let values: Vec<f64> = left
                .params
                .iter()
                .cloned()
                .chain(center.params.iter().cloned())
                .chain(right.params.iter().cloned())
                .collect();
            binding.bind_pairs(&names, &values)?;
        }
    }
    Ok(binding)
}

/// Picks the successor template to emit: the only one for a deterministic
/// rule, or a weighted draw for a stochastic one. Ties at the drawn sample
/// favour the earlier alternative.
fn select_successor<'a>(
    successor: &'a Successor,
    rng: &mut DerivationRng,
) -> &'a [crate::rule::TemplateModule] {
    match successor {
        Successor::Deterministic(modules) => modules,
        Successor::Stochastic(alternatives) => {
            let u = rng.next_unit();
            let mut cumulative = 0.0;
            for alt in alternatives {
                cumulative += alt.probability;
                if cumulative >= u {
                    return &alt.modules;
                }
            }
            // Floating-point rounding may leave the cumulative sum just
            // under `u`; fall back to the last alternative.
            &alternatives.last().expect("stochastic successor has at least one alternative").modules
        }
    }
}
