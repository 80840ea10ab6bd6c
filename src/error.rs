use thiserror::Error;

/// The error type returned by every fallible entry point of the crate.
///
/// Parse-time failures surface from [`crate::LSystem::construct`] and from
/// the standalone grammar/expression parsing functions; evaluation failures
/// surface from [`crate::LSystem::next_generation`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LSystemError {
    #[error("parse error at {position}: {message} (in {source:?})")]
    Parse {
        message: String,
        source: String,
        position: usize,
    },

    #[error("evaluation error: {message}")]
    Eval { message: String },

    #[error(
        "structural error: module '{symbol}' expected {expected} parameter(s) but has {actual}"
    )]
    Structural {
        symbol: String,
        expected: usize,
        actual: usize,
    },
}

impl LSystemError {
    pub fn parse(source: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        LSystemError::Parse {
            message: message.into(),
            source: source.into(),
            position,
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        LSystemError::Eval {
            message: message.into(),
        }
    }

    pub fn structural(symbol: impl Into<String>, expected: usize, actual: usize) -> Self {
        LSystemError::Structural {
            symbol: symbol.into(),
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, LSystemError>;
