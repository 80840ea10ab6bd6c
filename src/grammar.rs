//! Component C: the rule-language grammar parser (§4.C).
//!
//! Converts axiom text and rule text into the model types of [`crate::module`]
//! and [`crate::rule`]. Separators are matched textually, following the
//! original notation's own splitting approach: predecessor versus
//! condition versus successor on `?`/`:`, context on `<`/`>`, stochastic
//! alternatives on `;`. Parameter expressions are parsed with
//! [`crate::expr::parse_list`], which splits on commas but is paren-depth
//! aware, so a nested function call inside a parameter slot survives.

use crate::error::{LSystemError, Result};
use crate::expr;
use crate::module::{Module, PatternModule, WordModule};
use crate::rule::{Rule, RuleKind, Successor, TemplateModule, WeightedSuccessor};

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Splits `text` on runs of ASCII whitespace, but only outside parentheses,
/// so `"F(x * 0.3, 2) + F(x, 1)"` yields `["F(x * 0.3, 2)", "+", "F(x, 1)"]`
/// rather than fracturing on the internal spaces.
fn split_top_level_whitespace(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Splits a single module token like `F(a,b)` into its symbol (`F`) and the
/// raw text between the parentheses (`a,b`), or `None` if there is no
/// parameter list.
fn split_symbol_and_params(token: &str) -> Result<(String, Option<String>)> {
    match token.find('(') {
        None => Ok((token.to_string(), None)),
        Some(open) => {
            if !token.ends_with(')') {
                return Err(LSystemError::parse(
                    token,
                    token.len(),
                    "unterminated parameter list",
                ));
            }
            let symbol = token[..open].to_string();
            let inner = &token[open + 1..token.len() - 1];
            Ok((symbol, Some(inner.to_string())))
        }
    }
}

fn split_top_level_commas(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn parse_number(text: &str, context: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| LSystemError::parse(context, 0, format!("malformed number '{text}'")))
}

/// Parses a module with real-valued parameters, as used in an axiom or the
/// word it derives.
pub(crate) fn parse_word_module(token: &str) -> Result<WordModule> {
    let (symbol, params_text) = split_symbol_and_params(token)?;
    let params = match params_text {
        None => Vec::new(),
        Some(text) => split_top_level_commas(&text)
            .iter()
            .map(|p| parse_number(p, token))
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(Module::new(symbol, params))
}

/// Parses a module with formal-name parameters, as used in a rule's
/// predecessor or context pattern.
fn parse_pattern_module(token: &str) -> Result<PatternModule> {
    let (symbol, params_text) = split_symbol_and_params(token)?;
    let params = match params_text {
        None => Vec::new(),
        Some(text) => split_top_level_commas(&text)
            .iter()
            .map(|p| p.trim().to_string())
            .collect(),
    };
    Ok(Module::new(symbol, params))
}

/// Parses a module whose parameters are arithmetic expressions, as used in
/// a successor template.
fn parse_template_module(token: &str) -> Result<TemplateModule> {
    let (symbol, params_text) = split_symbol_and_params(token)?;
    let params = match params_text {
        None => Vec::new(),
        Some(text) => expr::parse_list(&text)?,
    };
    Ok(Module::new(symbol, params))
}

/// Parses an axiom string: modules separated by whitespace, each with
/// literal numeric parameters.
pub fn parse_axiom(text: &str) -> Result<Vec<WordModule>> {
    split_top_level_whitespace(text)
        .iter()
        .map(|tok| parse_word_module(tok))
        .collect()
}

/// Splits `text` on runs of one or more `<`/`>` characters, mirroring the
/// original notation's own predecessor splitting, and reports whether `<`
/// and/or `>` were present.
fn split_context_runs(text: &str) -> (Vec<String>, bool, bool) {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut saw_lt = false;
    let mut saw_gt = false;
    let mut in_run = false;

    for c in text.chars() {
        match c {
            '<' | '>' => {
                if c == '<' {
                    saw_lt = true;
                } else {
                    saw_gt = true;
                }
                if !in_run {
                    parts.push(std::mem::take(&mut current));
                    in_run = true;
                }
            }
            c => {
                current.push(c);
                in_run = false;
            }
        }
    }
    parts.push(current);
    (parts, saw_lt, saw_gt)
}

fn parse_predecessor(text: &str) -> Result<(RuleKind, PatternModule)> {
    let (parts, saw_lt, saw_gt) = split_context_runs(text);
    match parts.len() {
        1 => {
            let predecessor = parse_pattern_module(parts[0].trim())?;
            Ok((RuleKind::ZeroL, predecessor))
        }
        2 if saw_lt && !saw_gt => {
            let left = parse_pattern_module(parts[0].trim())?;
            let predecessor = parse_pattern_module(parts[1].trim())?;
            Ok((RuleKind::OneLLeft { left }, predecessor))
        }
        2 if saw_gt && !saw_lt => {
            let predecessor = parse_pattern_module(parts[0].trim())?;
            let right = parse_pattern_module(parts[1].trim())?;
            Ok((RuleKind::OneLRight { right }, predecessor))
        }
        3 if saw_lt && saw_gt => {
            let left = parse_pattern_module(parts[0].trim())?;
            let predecessor = parse_pattern_module(parts[1].trim())?;
            let right = parse_pattern_module(parts[2].trim())?;
            Ok((RuleKind::TwoL { left, right }, predecessor))
        }
        _ => Err(LSystemError::parse(
            text,
            0,
            "malformed predecessor: expected SymMod, SymMod<SymMod, SymMod>SymMod, or SymMod<SymMod>SymMod",
        )),
    }
}

fn parse_successor(text: &str) -> Result<Successor> {
    if !text.contains(';') {
        let modules = split_top_level_whitespace(text)
            .iter()
            .map(|tok| parse_template_module(tok))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Successor::Deterministic(modules));
    }

    let parts: Vec<&str> = text.split(';').collect();
    if parts.len() % 2 != 0 {
        return Err(LSystemError::parse(
            text,
            0,
            "stochastic successor must alternate probability;sequence pairs",
        ));
    }

    let mut alternatives = Vec::new();
    let mut total = 0.0;
    let mut index = 0;
    while index < parts.len() {
        let probability = parse_number(parts[index], text)?;
        if probability <= 0.0 {
            return Err(LSystemError::eval(format!(
                "stochastic successor probabilities must be strictly positive, got {probability}"
            )));
        }
        let modules = split_top_level_whitespace(parts[index + 1])
            .iter()
            .map(|tok| parse_template_module(tok))
            .collect::<Result<Vec<_>>>()?;
        total += probability;
        alternatives.push(WeightedSuccessor {
            probability,
            modules,
        });
        index += 2;
    }

    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(LSystemError::eval(format!(
            "stochastic successor probabilities sum to {total}, expected 1.0 within {PROBABILITY_TOLERANCE}"
        )));
    }

    Ok(Successor::Stochastic(alternatives))
}

/// Parses a full rule string: `Predecessor ? Successor` or
/// `Predecessor : Condition ? Successor`.
pub fn parse_rule(text: &str) -> Result<Rule> {
    let question = text.find('?');
    let colon = text.find(':');

    let split_at = match (question, colon) {
        (None, None) => {
            return Err(LSystemError::parse(
                text,
                0,
                "rule is missing a '?' successor separator",
            ))
        }
        (Some(q), None) => q,
        (None, Some(c)) => c,
        (Some(q), Some(c)) => q.min(c),
    };

    let predecessor_text = &text[..split_at];
    let (kind, predecessor) = parse_predecessor(predecessor_text)?;

    let (condition, successor_text) = if text.as_bytes()[split_at] == b':' {
        let after_colon = &text[split_at + 1..];
        let next_question = after_colon.find('?').ok_or_else(|| {
            LSystemError::parse(text, split_at, "condition is missing a '?' terminator")
        })?;
        let condition_text = after_colon[..next_question].trim();
        let condition = if condition_text.is_empty() {
            None
        } else {
            Some(expr::parse(condition_text)?)
        };
        (condition, &after_colon[next_question + 1..])
    } else {
        (None, &text[split_at + 1..])
    };

    let successor = parse_successor(successor_text.trim())?;

    Ok(Rule {
        kind,
        predecessor,
        condition,
        successor,
    })
}
