use std::fmt::Display;

/// A propositional variable. Identity is the (case-sensitive) letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub char);

impl Var {
    pub fn name(self) -> char {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Not,
    And,
    Or,
    Cond,
    Bicond,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Not => "~",
            Self::And => "^",
            Self::Or => "v",
            Self::Cond => "=>",
            Self::Bicond => "<=>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    LeftParen,
    RightParen,
    Proposition(Var),
    Operator(Operator),
}

impl Token {
    pub fn as_var(&self) -> Option<Var> {
        match self {
            Self::Proposition(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::Proposition(v) => write!(f, "{v}"),
            Self::Operator(op) => write!(f, "{op}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Token::LeftParen, "(")]
    #[case(Token::RightParen, ")")]
    #[case(Token::Proposition(Var('Q')), "Q")]
    #[case(Token::Operator(Operator::Not), "~")]
    #[case(Token::Operator(Operator::Or), "v")]
    #[case(Token::Operator(Operator::Cond), "=>")]
    #[case(Token::Operator(Operator::Bicond), "<=>")]
    fn token_spelling(#[case] token: Token, #[case] expected: &str) {
        assert_eq!(token.to_string(), expected);
    }
}
