use thiserror::Error;

use crate::language::{Token, Var};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("malformed operator at position {position}: expected '{operator}', found {}", describe(.found))]
    MalformedOperator {
        operator: &'static str,
        found: Option<char>,
        position: usize,
    },
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'{c}'"),
        None => "end of input".to_owned(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        token: Token,
        position: usize,
        expected: Vec<String>,
    },

    #[error("unexpected end of formula")]
    UnexpectedEnd { expected: Vec<String> },

    #[error("trailing token '{token}' at position {position} after a complete formula")]
    TrailingToken { token: Token, position: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WffError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("pattern '{0}' does not occur")]
    NoMatch(String),

    #[error("occurrence {index} requested but only {count} found")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("replacement variable '{0}' is not bound by the search pattern")]
    UnboundReplacementVariable(Var),
}
