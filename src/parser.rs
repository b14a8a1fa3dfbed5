use std::convert::Infallible;

use lalrpop_util::ParseError;
use tracing::trace;

use crate::{
    error::{GrammarError, WffError},
    grammar::FormulaParser,
    language::Token,
    lexer::{self, Spanned},
    tree::{NodeId, Tree},
};

/// Tokenize and parse `source`. The whole input must form exactly one formula.
pub fn parse(source: &str) -> Result<(Tree, NodeId), WffError> {
    let tokens = lexer::lex(source)?;
    Ok(parse_spanned(tokens)?)
}

/// Parse an already tokenized formula. Error positions are token indices.
pub fn parse_tokens(tokens: &[Token]) -> Result<(Tree, NodeId), GrammarError> {
    parse_spanned(
        tokens
            .iter()
            .enumerate()
            .map(|(i, &token)| (i, token, i + 1)),
    )
}

fn parse_spanned(
    tokens: impl IntoIterator<Item = Spanned>,
) -> Result<(Tree, NodeId), GrammarError> {
    let mut tree = Tree::new();
    let root = FormulaParser::new()
        .parse(&mut tree, tokens)
        .map_err(grammar_error)?;
    trace!(nodes = tree.len(), "parsed formula");
    Ok((tree, root))
}

fn grammar_error(error: ParseError<usize, Token, Infallible>) -> GrammarError {
    match error {
        // Nothing may follow a complete formula, so an empty expectation set
        // means the parse was already done.
        ParseError::UnrecognizedToken {
            token: (position, token, _),
            expected,
        } if expected.is_empty() => GrammarError::TrailingToken { token, position },
        ParseError::UnrecognizedToken {
            token: (position, token, _),
            expected,
        } => GrammarError::UnexpectedToken {
            token,
            position,
            expected,
        },
        ParseError::ExtraToken {
            token: (position, token, _),
        } => GrammarError::TrailingToken { token, position },
        ParseError::UnrecognizedEof { expected, .. } => GrammarError::UnexpectedEnd { expected },
        ParseError::InvalidToken { location } => {
            unreachable!("tokens are produced by our own lexer (location {location})")
        }
        ParseError::User { error } => match error {},
    }
}
