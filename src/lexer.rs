use std::{iter::Peekable, str::CharIndices};

use crate::{
    error::LexError,
    language::{Operator, Token, Var},
};

/// A token together with the character positions it spans, as lalrpop expects.
pub type Spanned = (usize, Token, usize);

/// Scan position within the source string.
#[derive(Debug, Clone)]
pub struct Cursor<'s> {
    chars: Peekable<CharIndices<'s>>,
    len: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            len: source.len(),
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.len, |&(i, _)| i)
    }

    /// Consume `expected` or report the compound operator as malformed.
    fn expect(&mut self, expected: char, operator: Operator) -> Result<usize, LexError> {
        let position = self.position();
        match self.bump() {
            Some((i, c)) if c == expected => Ok(i),
            found => Err(LexError::MalformedOperator {
                operator: operator.symbol(),
                found: found.map(|(_, c)| c),
                position,
            }),
        }
    }
}

/// Iterator over the tokens of a formula string. Spaces are skipped.
pub struct Lexer<'s> {
    cursor: Cursor<'s>,
    failed: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            cursor: Cursor::new(source),
            failed: false,
        }
    }
}

/// Scan one character (or compound operator) starting at the cursor.
/// `Ok(None)` means the character produced no token.
fn scan(cursor: &mut Cursor<'_>, start: usize, c: char) -> Result<Option<Spanned>, LexError> {
    let single = |token: Token| -> Result<Option<Spanned>, LexError> {
        Ok(Some((start, token, start + 1)))
    };
    match c {
        ' ' => Ok(None),
        '~' => single(Token::Operator(Operator::Not)),
        '^' => single(Token::Operator(Operator::And)),
        'v' => single(Token::Operator(Operator::Or)),
        '(' => single(Token::LeftParen),
        ')' => single(Token::RightParen),
        '=' => {
            let end = cursor.expect('>', Operator::Cond)?;
            Ok(Some((start, Token::Operator(Operator::Cond), end + 1)))
        }
        '<' => {
            cursor.expect('=', Operator::Bicond)?;
            let end = cursor.expect('>', Operator::Bicond)?;
            Ok(Some((start, Token::Operator(Operator::Bicond), end + 1)))
        }
        c if c.is_ascii_alphabetic() => single(Token::Proposition(Var(c))),
        character => Err(LexError::UnexpectedCharacter {
            character,
            position: start,
        }),
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some((start, c)) = self.cursor.bump() {
            match scan(&mut self.cursor, start, c) {
                Ok(None) => continue,
                Ok(Some(spanned)) => return Some(Ok(spanned)),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

pub fn lex(source: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(source).collect()
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source)
        .map(|spanned| spanned.map(|(_, token, _)| token))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn p(c: char) -> Token {
        Token::Proposition(Var(c))
    }

    fn op(o: Operator) -> Token {
        Token::Operator(o)
    }

    #[test]
    fn tokenizes_binary_formula() {
        assert_eq!(
            tokenize("(p v q)").unwrap(),
            vec![
                Token::LeftParen,
                p('p'),
                op(Operator::Or),
                p('q'),
                Token::RightParen
            ]
        );
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            tokenize("(a=>b)<=>~c").unwrap(),
            vec![
                Token::LeftParen,
                p('a'),
                op(Operator::Cond),
                p('b'),
                Token::RightParen,
                op(Operator::Bicond),
                op(Operator::Not),
                p('c'),
            ]
        );
    }

    #[test]
    fn spans_cover_compound_operators() {
        let spans = lex("p <=> q").unwrap();
        assert_eq!(spans[1], (2, op(Operator::Bicond), 5));
        assert_eq!(spans[2], (6, p('q'), 7));
    }

    #[test]
    fn letters_are_case_sensitive_and_v_is_or() {
        assert_eq!(
            tokenize("Pp v").unwrap(),
            vec![p('P'), p('p'), op(Operator::Or)]
        );
    }

    #[test]
    fn empty_and_blank_input_have_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[rstest]
    #[case("p & q", '&', 2)]
    #[case("(p v 1)", '1', 5)]
    #[case("\tp", '\t', 0)]
    fn rejects_unknown_characters(
        #[case] source: &str,
        #[case] character: char,
        #[case] position: usize,
    ) {
        assert_eq!(
            tokenize(source),
            Err(LexError::UnexpectedCharacter {
                character,
                position
            })
        );
    }

    #[rstest]
    #[case("p = q", "=>", Some(' '), 3)]
    #[case("p =", "=>", None, 3)]
    #[case("p <= q", "<=>", Some(' '), 4)]
    #[case("p <> q", "<=>", Some('>'), 3)]
    #[case("p <", "<=>", None, 3)]
    fn rejects_malformed_compound_operators(
        #[case] source: &str,
        #[case] operator: &'static str,
        #[case] found: Option<char>,
        #[case] position: usize,
    ) {
        assert_eq!(
            tokenize(source),
            Err(LexError::MalformedOperator {
                operator,
                found,
                position
            })
        );
    }

    #[test]
    fn lexer_stops_after_error() {
        let mut lexer = Lexer::new("p # q");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
