use std::fmt;

use nom::{
    branch::alt,
    character::complete::{anychar, char, none_of},
    combinator::{all_consuming, map, value},
    multi::many0,
    sequence::preceded,
    IResult,
};

use crate::error::{PatternError, Result};

/// One element of a tokenized pattern: a literal symbol or an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<A> {
    Symbol(A),
    Open,
    Close,
    Union,
    Star,
    /// One or more repetitions.
    Plus,
    /// Explicit concatenation, normally inserted by the compiler.
    Concat,
}

impl<A> Token<A> {
    pub fn operator_char(&self) -> Option<char> {
        match self {
            Token::Symbol(_) => None,
            Token::Open => Some('('),
            Token::Close => Some(')'),
            Token::Union => Some('|'),
            Token::Star => Some('*'),
            Token::Plus => Some('+'),
            Token::Concat => Some('.'),
        }
    }
}

impl<A: fmt::Display> fmt::Display for Token<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.operator_char()) {
            (Token::Symbol(a), _) => write!(f, "{}", a),
            (_, Some(c)) => write!(f, "{}", c),
            (_, None) => Ok(()),
        }
    }
}

fn token(input: &str) -> IResult<&str, Token<char>> {
    alt((
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
        value(Token::Union, char('|')),
        value(Token::Star, char('*')),
        value(Token::Plus, char('+')),
        map(preceded(char('\\'), anychar), Token::Symbol),
        map(none_of("()|*+\\"), Token::Symbol),
    ))(input)
}

/// Splits a pattern string into tokens. Every character is a literal symbol except
/// `( ) | * +`; a backslash makes the next character literal.
pub fn tokenize(pattern: &str) -> Result<Vec<Token<char>>> {
    if pattern.is_empty() {
        return Err(PatternError::Empty.into());
    }
    match all_consuming(many0(token))(pattern) {
        Ok((_, tokens)) => Ok(tokens),
        // a lone trailing backslash is the only input no token accepts
        Err(_) => Err(PatternError::TrailingEscape.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomatonError;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("(a|b)*c+").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Open,
                Token::Symbol('a'),
                Token::Union,
                Token::Symbol('b'),
                Token::Close,
                Token::Star,
                Token::Symbol('c'),
                Token::Plus,
            ]
        );
        assert_eq!(tokens.iter().map(|t| t.to_string()).collect::<String>(), "(a|b)*c+");
    }

    #[test]
    fn test_tokenize_escapes() {
        let tokens = tokenize(r"\*\\x").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Symbol('*'), Token::Symbol('\\'), Token::Symbol('x')]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            tokenize("").unwrap_err(),
            AutomatonError::MalformedPattern(PatternError::Empty)
        );
        assert_eq!(
            tokenize(r"ab\").unwrap_err(),
            AutomatonError::MalformedPattern(PatternError::TrailingEscape)
        );
    }
}
