//! Regular expression to NFA compilation.
//!
//! A token stream is compiled in three passes: explicit concatenation is inserted between
//! adjacent operands, the infix stream is reordered to postfix with the shunting-yard
//! algorithm, and the postfix stream is evaluated into Thompson fragments. Precedence is
//! `*`/`+` over concatenation over `|`.

use crate::{
    automaton::Symbol,
    error::{PatternError, Result},
    nfa::{Nfa, NfaBuilder, StateId},
    pattern::{tokenize, Token},
};

fn precedence<A>(token: &Token<A>) -> u8 {
    match token {
        Token::Star | Token::Plus => 3,
        Token::Concat => 2,
        Token::Union => 1,
        _ => 0,
    }
}

/// Inserts [`Token::Concat`] between adjacent tokens unless the left one is `(`, `|` or an
/// explicit concatenation, or the right one is `)`, `*`, `+`, `|` or an explicit concatenation.
pub fn insert_concat<A: Clone>(tokens: &[Token<A>]) -> Vec<Token<A>> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        out.push(token.clone());
        if let Some(next) = iter.peek() {
            let left_blocks = matches!(token, Token::Open | Token::Union | Token::Concat);
            let right_blocks = matches!(
                next,
                Token::Close | Token::Star | Token::Plus | Token::Union | Token::Concat
            );
            if !left_blocks && !right_blocks {
                out.push(Token::Concat);
            }
        }
    }
    out
}

/// Shunting-yard reordering of an explicit-concatenation stream. Positions in errors are
/// indices into `infix`.
pub fn to_postfix<A>(infix: Vec<Token<A>>) -> Result<Vec<Token<A>>> {
    let mut output = Vec::with_capacity(infix.len());
    let mut operators: Vec<Token<A>> = vec![];
    for (position, token) in infix.into_iter().enumerate() {
        match token {
            Token::Symbol(_) => output.push(token),
            Token::Open => operators.push(token),
            Token::Close => loop {
                match operators.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None => return Err(PatternError::UnexpectedCloseParen { position }.into()),
                }
            },
            _ => {
                while let Some(top) = operators.last() {
                    if matches!(top, Token::Open) || precedence(top) < precedence(&token) {
                        break;
                    }
                    output.extend(operators.pop());
                }
                operators.push(token);
            }
        }
    }
    while let Some(op) = operators.pop() {
        if matches!(op, Token::Open) {
            return Err(PatternError::UnclosedParen.into());
        }
        output.push(op);
    }
    Ok(output)
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

fn pop_operand(stack: &mut Vec<Fragment>, operator: char) -> Result<Fragment> {
    stack
        .pop()
        .ok_or_else(|| PatternError::MissingOperand { operator }.into())
}

/// Thompson construction over a postfix stream. Every fragment on the operand stack has
/// exactly one accepting state, and the states are allocated by a builder owned by this call.
pub fn postfix_to_nfa<A: Symbol>(postfix: &[Token<A>]) -> Result<Nfa<A>> {
    let mut builder = NfaBuilder::new();
    let mut stack: Vec<Fragment> = vec![];

    for (position, token) in postfix.iter().enumerate() {
        match token {
            Token::Symbol(symbol) => {
                let start = builder.add_state();
                let accept = builder.add_state();
                builder.add_edge(start, symbol.clone(), accept);
                stack.push(Fragment { start, accept });
            }
            Token::Concat => {
                let right = pop_operand(&mut stack, '.')?;
                let left = pop_operand(&mut stack, '.')?;
                builder.add_epsilon(left.accept, right.start);
                stack.push(Fragment {
                    start: left.start,
                    accept: right.accept,
                });
            }
            Token::Union => {
                let right = pop_operand(&mut stack, '|')?;
                let left = pop_operand(&mut stack, '|')?;
                let start = builder.add_state();
                let accept = builder.add_state();
                builder.add_epsilon(start, left.start);
                builder.add_epsilon(start, right.start);
                builder.add_epsilon(left.accept, accept);
                builder.add_epsilon(right.accept, accept);
                stack.push(Fragment { start, accept });
            }
            Token::Star => {
                let inner = pop_operand(&mut stack, '*')?;
                let start = builder.add_state();
                let accept = builder.add_state();
                builder.add_epsilon(start, inner.start);
                builder.add_epsilon(start, accept);
                builder.add_epsilon(inner.accept, inner.start);
                builder.add_epsilon(inner.accept, accept);
                stack.push(Fragment { start, accept });
            }
            Token::Plus => {
                let inner = pop_operand(&mut stack, '+')?;
                let start = builder.add_state();
                let accept = builder.add_state();
                builder.add_epsilon(start, inner.start);
                builder.add_epsilon(inner.accept, inner.start);
                builder.add_epsilon(inner.accept, accept);
                stack.push(Fragment { start, accept });
            }
            Token::Open => return Err(PatternError::UnclosedParen.into()),
            Token::Close => return Err(PatternError::UnexpectedCloseParen { position }.into()),
        }
    }

    match stack.as_slice() {
        [] => Err(PatternError::Empty.into()),
        [fragment] => builder.build(fragment.start, fragment.accept),
        rest => Err(PatternError::DanglingOperands { count: rest.len() }.into()),
    }
}

pub fn compile<A: Symbol>(pattern: &[Token<A>]) -> Result<Nfa<A>> {
    if pattern.is_empty() {
        return Err(PatternError::Empty.into());
    }
    let postfix = to_postfix(insert_concat(pattern))?;
    let nfa = postfix_to_nfa(&postfix)?;
    log::debug!(
        "compiled {} tokens ({} postfix) into an NFA with {} states",
        pattern.len(),
        postfix.len(),
        nfa.num_states()
    );
    Ok(nfa)
}

pub fn compile_str(pattern: &str) -> Result<Nfa<char>> {
    compile(&tokenize(pattern)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomatonError;

    fn postfix_string(pattern: &str) -> String {
        let tokens = tokenize(pattern).unwrap();
        to_postfix(insert_concat(&tokens))
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_insert_concat() {
        let tokens = tokenize("a(b|c)*d").unwrap();
        let out: String = insert_concat(&tokens).iter().map(|t| t.to_string()).collect();
        assert_eq!(out, "a.(b|c)*.d");

        let tokens = tokenize("(a)(b)c+").unwrap();
        let out: String = insert_concat(&tokens).iter().map(|t| t.to_string()).collect();
        assert_eq!(out, "(a).(b).c+");
    }

    #[test]
    fn test_postfix() {
        assert_eq!(postfix_string("ab|c"), "ab.c|");
        assert_eq!(postfix_string("a|bc"), "abc.|");
        assert_eq!(postfix_string("ab*"), "ab*.");
        assert_eq!(postfix_string("(a|b)*abb"), "ab|*a.b.b.");
        assert_eq!(postfix_string("abc"), "ab.c.");
    }

    #[test]
    fn test_abb() {
        let nfa = compile_str("(a|b)*abb").unwrap();
        for s in ["abb", "aabb", "babb", "ababb", "bbbabb"] {
            assert!(nfa.accepts_str(s), "{}", s);
        }
        for s in ["", "ab", "ba", "abbb", "abba", "bb"] {
            assert!(!nfa.accepts_str(s), "{}", s);
        }
    }

    #[test]
    fn test_from_regex() {
        let nfa = compile_str("a(b|c)*d").unwrap();
        assert!(nfa.accepts_str("ad"));
        assert!(nfa.accepts_str("abd"));
        assert!(nfa.accepts_str("acbbcd"));
        assert!(!nfa.accepts_str("abbdbd"));
        assert!(!nfa.accepts_str("a"));
    }

    #[test]
    fn test_star_and_plus() {
        let star = compile_str("a*").unwrap();
        assert!(star.accepts_str(""));
        assert!(star.accepts_str("aaaa"));
        assert!(!star.accepts_str("ab"));

        let plus = compile_str("a+b").unwrap();
        assert!(!plus.accepts_str("b"));
        assert!(plus.accepts_str("ab"));
        assert!(plus.accepts_str("aaab"));

        let nested = compile_str("(a*)*").unwrap();
        assert!(nested.accepts_str(""));
        assert!(nested.accepts_str("aaa"));
    }

    #[test]
    fn test_explicit_concat_token() {
        let tokens = vec![
            Token::Symbol("x".to_string()),
            Token::Concat,
            Token::Symbol("yz".to_string()),
        ];
        let nfa = compile(&tokens).unwrap();
        assert!(nfa.accepts(&["x".to_string(), "yz".to_string()]));
        assert!(!nfa.accepts(&["x".to_string()]));
    }

    #[test]
    fn test_thompson_shape() {
        // a: 2 states; b: 2; union: +2; star: +2
        let nfa = compile_str("(a|b)*").unwrap();
        assert_eq!(nfa.num_states(), 8);
        let accepting_edges = nfa.edges().into_iter().filter(|e| e.from == nfa.accept()).count();
        assert_eq!(accepting_edges, 0);
    }

    #[test]
    fn test_compilations_are_independent() {
        let first = compile_str("ab").unwrap();
        let second = compile_str("ab").unwrap();
        assert_eq!(first.start(), second.start());
        assert_eq!(first.num_states(), second.num_states());
    }

    #[test]
    fn test_malformed() {
        let err = |p: &str| match compile_str(p).unwrap_err() {
            AutomatonError::MalformedPattern(e) => e,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(err("(ab"), PatternError::UnclosedParen);
        assert!(matches!(err("ab)"), PatternError::UnexpectedCloseParen { .. }));
        assert_eq!(err("|a"), PatternError::MissingOperand { operator: '|' });
        assert_eq!(err("*"), PatternError::MissingOperand { operator: '*' });
        assert_eq!(err("()"), PatternError::Empty);
        assert_eq!(err(""), PatternError::Empty);

        let dangling = postfix_to_nfa(&[Token::Symbol('a'), Token::Symbol('b')]).unwrap_err();
        assert_eq!(
            dangling,
            AutomatonError::MalformedPattern(PatternError::DanglingOperands { count: 2 })
        );
    }
}
