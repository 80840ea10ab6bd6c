//! Component A: the arithmetic/boolean expression engine shared by rule
//! conditions and successor parameter slots (§4.A).
//!
//! Text is tokenized with a small regex-driven lexer in the style of the
//! teacher crate's `lexer.rs`, then parsed with a hand-rolled
//! precedence-climbing recursive descent parser into a pure `Expr` value
//! tree. Evaluation walks the tree against an immutable [`Binding`],
//! allocation-free after parsing.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{LSystemError, Result};
use crate::module::Binding;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
    Comma,
}

struct ExprPatterns {
    number: Regex,
    ident: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static ExprPatterns {
    static PATTERNS: OnceLock<ExprPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ExprPatterns {
        number: Regex::new(r"^\d+(\.\d+)?").unwrap(),
        ident: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap(),
        whitespace: Regex::new(r"^\s+").unwrap(),
    })
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let pat = patterns();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < text.len() {
        let rest = &text[pos..];

        if let Some(m) = pat.whitespace.find(rest) {
            pos += m.end();
            continue;
        }

        let two = rest.get(0..2);
        if let Some(two) = two {
            let two_tok = match two {
                "==" => Some(Token::EqEq),
                "!=" => Some(Token::NotEq),
                "<=" => Some(Token::Le),
                ">=" => Some(Token::Ge),
                _ => None,
            };
            if let Some(tok) = two_tok {
                tokens.push(tok);
                pos += 2;
                continue;
            }
        }

        let c = rest.chars().next().unwrap();
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '<' => Some(Token::Lt),
            '>' => Some(Token::Gt),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(tok) = single {
            tokens.push(tok);
            pos += c.len_utf8();
            continue;
        }

        if let Some(m) = pat.number.find(rest) {
            let text = m.as_str();
            let value = text
                .parse::<f64>()
                .map_err(|_| LSystemError::parse(text, pos, "malformed number literal"))?;
            tokens.push(Token::Number(value));
            pos += m.end();
            continue;
        }

        if let Some(m) = pat.ident.find(rest) {
            tokens.push(Token::Ident(m.as_str().to_string()));
            pos += m.end();
            continue;
        }

        return Err(LSystemError::parse(
            text,
            pos,
            format!("unexpected character '{c}'"),
        ));
    }

    Ok(tokens)
}

/// A parsed expression tree. Shared (read-only) across evaluations.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Ident(String),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

struct TokenCursor<'a> {
    tokens: &'a [Token],
    index: usize,
    source: &'a str,
}

impl<'a> TokenCursor<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.index).cloned();
        if tok.is_some() {
            self.index += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<()> {
        match self.advance() {
            Some(ref tok) if tok == expected => Ok(()),
            other => Err(LSystemError::parse(
                self.source,
                self.index,
                format!("expected {what}, found {other:?}"),
            )),
        }
    }

    fn err(&self, message: impl Into<String>) -> LSystemError {
        LSystemError::parse(self.source, self.index, message)
    }
}

/// Parses expression text (a rule condition or a successor parameter slot)
/// into an [`Expr`] tree.
pub fn parse(text: &str) -> Result<Expr> {
    let tokens = tokenize(text)?;
    let mut cursor = TokenCursor {
        tokens: &tokens,
        index: 0,
        source: text,
    };
    let expr = parse_or(&mut cursor)?;
    if cursor.peek().is_some() {
        return Err(cursor.err("trailing tokens after expression"));
    }
    Ok(expr)
}

fn ident_is(cursor: &TokenCursor, keyword: &str) -> bool {
    matches!(cursor.peek(), Some(Token::Ident(s)) if s == keyword)
}

fn parse_or(cursor: &mut TokenCursor) -> Result<Expr> {
    let mut left = parse_and(cursor)?;
    while ident_is(cursor, "or") {
        cursor.advance();
        let right = parse_and(cursor)?;
        left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and(cursor: &mut TokenCursor) -> Result<Expr> {
    let mut left = parse_not(cursor)?;
    while ident_is(cursor, "and") {
        cursor.advance();
        let right = parse_not(cursor)?;
        left = Expr::Binary(BinOp::And, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_not(cursor: &mut TokenCursor) -> Result<Expr> {
    if ident_is(cursor, "not") {
        cursor.advance();
        let inner = parse_not(cursor)?;
        return Ok(Expr::Not(Box::new(inner)));
    }
    parse_comparison(cursor)
}

fn parse_comparison(cursor: &mut TokenCursor) -> Result<Expr> {
    let left = parse_add(cursor)?;
    let op = match cursor.peek() {
        Some(Token::EqEq) => Some(BinOp::Eq),
        Some(Token::NotEq) => Some(BinOp::Ne),
        Some(Token::Lt) => Some(BinOp::Lt),
        Some(Token::Le) => Some(BinOp::Le),
        Some(Token::Gt) => Some(BinOp::Gt),
        Some(Token::Ge) => Some(BinOp::Ge),
        _ => None,
    };
    match op {
        Some(op) => {
            cursor.advance();
            let right = parse_add(cursor)?;
            Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
        }
        None => Ok(left),
    }
}

fn parse_add(cursor: &mut TokenCursor) -> Result<Expr> {
    let mut left = parse_mul(cursor)?;
    loop {
        let op = match cursor.peek() {
            Some(Token::Plus) => Some(BinOp::Add),
            Some(Token::Minus) => Some(BinOp::Sub),
            _ => None,
        };
        match op {
            Some(op) => {
                cursor.advance();
                let right = parse_mul(cursor)?;
                left = Expr::Binary(op, Box::new(left), Box::new(right));
            }
            None => break,
        }
    }
    Ok(left)
}

fn parse_mul(cursor: &mut TokenCursor) -> Result<Expr> {
    let mut left = parse_unary(cursor)?;
    loop {
        let op = match cursor.peek() {
            Some(Token::Star) => Some(BinOp::Mul),
            Some(Token::Slash) => Some(BinOp::Div),
            _ => None,
        };
        match op {
            Some(op) => {
                cursor.advance();
                let right = parse_unary(cursor)?;
                left = Expr::Binary(op, Box::new(left), Box::new(right));
            }
            None => break,
        }
    }
    Ok(left)
}

fn parse_unary(cursor: &mut TokenCursor) -> Result<Expr> {
    if matches!(cursor.peek(), Some(Token::Minus)) {
        cursor.advance();
        let inner = parse_unary(cursor)?;
        return Ok(Expr::Neg(Box::new(inner)));
    }
    parse_pow(cursor)
}

fn parse_pow(cursor: &mut TokenCursor) -> Result<Expr> {
    let left = parse_primary(cursor)?;
    if matches!(cursor.peek(), Some(Token::Caret)) {
        cursor.advance();
        // Right-associative; the exponent may itself carry a unary minus.
        let right = parse_unary(cursor)?;
        return Ok(Expr::Binary(BinOp::Pow, Box::new(left), Box::new(right)));
    }
    Ok(left)
}

fn parse_primary(cursor: &mut TokenCursor) -> Result<Expr> {
    match cursor.advance() {
        Some(Token::Number(n)) => Ok(Expr::Number(n)),
        Some(Token::LParen) => {
            let inner = parse_or(cursor)?;
            cursor.expect(&Token::RParen, "')'")?;
            Ok(inner)
        }
        Some(Token::Ident(name)) => {
            if matches!(cursor.peek(), Some(Token::LParen)) {
                cursor.advance();
                let mut args = Vec::new();
                if !matches!(cursor.peek(), Some(Token::RParen)) {
                    loop {
                        args.push(parse_or(cursor)?);
                        if matches!(cursor.peek(), Some(Token::Comma)) {
                            cursor.advance();
                        } else {
                            break;
                        }
                    }
                }
                cursor.expect(&Token::RParen, "')'")?;
                Ok(Expr::Call(name, args))
            } else {
                Ok(Expr::Ident(name))
            }
        }
        other => Err(cursor.err(format!("expected a value, found {other:?}"))),
    }
}

/// Evaluates a parsed expression against a binding. Boolean contexts treat
/// the numeric result as false iff equal to zero.
pub fn evaluate(expr: &Expr, binding: &Binding) -> Result<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Ident(name) => binding
            .get(name)
            .ok_or_else(|| LSystemError::eval(format!("unbound identifier '{name}'"))),
        Expr::Neg(inner) => Ok(-evaluate(inner, binding)?),
        Expr::Not(inner) => Ok(as_bool(evaluate(inner, binding)?).not_f64()),
        Expr::Binary(op, lhs, rhs) => evaluate_binary(*op, lhs, rhs, binding),
        Expr::Call(name, args) => evaluate_call(name, args, binding),
    }
}

trait BoolF64 {
    fn not_f64(self) -> f64;
}

impl BoolF64 for bool {
    fn not_f64(self) -> f64 {
        if self {
            0.0
        } else {
            1.0
        }
    }
}

fn as_bool(value: f64) -> bool {
    value != 0.0
}

fn evaluate_binary(op: BinOp, lhs: &Expr, rhs: &Expr, binding: &Binding) -> Result<f64> {
    // Logical operators short-circuit; everything else evaluates both sides.
    match op {
        BinOp::And => {
            let l = evaluate(lhs, binding)?;
            if !as_bool(l) {
                return Ok(0.0);
            }
            let r = evaluate(rhs, binding)?;
            Ok(bool_to_f64(as_bool(r)))
        }
        BinOp::Or => {
            let l = evaluate(lhs, binding)?;
            if as_bool(l) {
                return Ok(1.0);
            }
            let r = evaluate(rhs, binding)?;
            Ok(bool_to_f64(as_bool(r)))
        }
        _ => {
            let l = evaluate(lhs, binding)?;
            let r = evaluate(rhs, binding)?;
            match op {
                BinOp::Add => Ok(l + r),
                BinOp::Sub => Ok(l - r),
                BinOp::Mul => Ok(l * r),
                BinOp::Div => {
                    if r == 0.0 {
                        Err(LSystemError::eval("division by zero"))
                    } else {
                        Ok(l / r)
                    }
                }
                BinOp::Pow => Ok(l.powf(r)),
                BinOp::Eq => Ok(bool_to_f64(l == r)),
                BinOp::Ne => Ok(bool_to_f64(l != r)),
                BinOp::Lt => Ok(bool_to_f64(l < r)),
                BinOp::Le => Ok(bool_to_f64(l <= r)),
                BinOp::Gt => Ok(bool_to_f64(l > r)),
                BinOp::Ge => Ok(bool_to_f64(l >= r)),
                BinOp::And | BinOp::Or => unreachable!("handled above"),
            }
        }
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn evaluate_call(name: &str, args: &[Expr], binding: &Binding) -> Result<f64> {
    let values = args
        .iter()
        .map(|a| evaluate(a, binding))
        .collect::<Result<Vec<_>>>()?;

    match name {
        "sin" => unary_fn(name, &values, f64::sin),
        "cos" => unary_fn(name, &values, f64::cos),
        "sqrt" => unary_fn(name, &values, f64::sqrt),
        "abs" => unary_fn(name, &values, f64::abs),
        "min" => fold_fn(name, &values, f64::min),
        "max" => fold_fn(name, &values, f64::max),
        _ => Err(LSystemError::eval(format!("unknown function '{name}'"))),
    }
}

fn unary_fn(name: &str, values: &[f64], f: impl Fn(f64) -> f64) -> Result<f64> {
    match values {
        [x] => Ok(f(*x)),
        _ => Err(LSystemError::eval(format!(
            "function '{name}' expects exactly 1 argument, got {}",
            values.len()
        ))),
    }
}

fn fold_fn(name: &str, values: &[f64], f: impl Fn(f64, f64) -> f64) -> Result<f64> {
    if values.len() < 2 {
        return Err(LSystemError::eval(format!(
            "function '{name}' expects at least 2 arguments, got {}",
            values.len()
        )));
    }
    let mut iter = values.iter().copied();
    let first = iter.next().unwrap();
    Ok(iter.fold(first, f))
}

/// Evaluates `expr` and treats a nonzero result as true, per the boolean
/// contract in §4.A. Used by rule condition checking.
pub fn evaluate_bool(expr: &Expr, binding: &Binding) -> Result<bool> {
    evaluate(expr, binding).map(as_bool)
}

/// Parses a comma-separated list of expressions, such as the parameter
/// slots of a successor template module (`F(x*0.3, t-1)`). Splits on
/// top-level commas only, so a nested function call's own commas (e.g.
/// `min(a, b)`) do not fracture the outer argument list.
pub fn parse_list(text: &str) -> Result<Vec<Expr>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tokens = tokenize(text)?;
    let mut groups: Vec<Vec<Token>> = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0i32;

    for tok in tokens {
        match tok {
            Token::LParen => {
                depth += 1;
                current.push(tok);
            }
            Token::RParen => {
                depth -= 1;
                current.push(tok);
            }
            Token::Comma if depth == 0 => {
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(tok),
        }
    }
    groups.push(current);

    groups
        .into_iter()
        .map(|toks| {
            let mut cursor = TokenCursor {
                tokens: &toks,
                index: 0,
                source: text,
            };
            let expr = parse_or(&mut cursor)?;
            if cursor.peek().is_some() {
                return Err(cursor.err("trailing tokens in argument"));
            }
            Ok(expr)
        })
        .collect()
}
