//! Error types shared by every component of the toolkit.

use thiserror::Error;

use crate::automaton::State;

/// Why a pattern could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("`)` at token {position} has no matching `(`")]
    UnexpectedCloseParen { position: usize },
    #[error("`(` is never closed")]
    UnclosedParen,
    /// An operator was applied with fewer operands than it takes.
    #[error("operator `{operator}` is missing an operand")]
    MissingOperand { operator: char },
    /// Postfix evaluation ended with more than one fragment on the stack.
    #[error("{count} fragments left after evaluation, expected exactly one")]
    DanglingOperands { count: usize },
    #[error("pattern ends with a lone escape")]
    TrailingEscape,
}

/// A DFA description that breaks referential integrity.
///
/// Symbols are rendered with `Debug` so the variants stay independent of the symbol type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("start state {0:?} is not a declared state")]
    UnknownStartState(State),
    #[error("accepting state {0:?} is not a declared state")]
    UnknownAcceptState(State),
    #[error("transition ({state:?}, {symbol}) leaves from undeclared state")]
    UnknownSourceState { state: State, symbol: String },
    #[error("transition ({state:?}, {symbol}) -> {target:?} points to undeclared state")]
    UnknownTargetState {
        state: State,
        symbol: String,
        target: State,
    },
    #[error("symbol {symbol} in transition from {state:?} is not in the alphabet")]
    UnknownSymbol { state: State, symbol: String },
    #[error("state {0:?} declared more than once")]
    DuplicateState(State),
    #[error("symbol {0} declared more than once")]
    DuplicateSymbol(String),
    #[error("no transition defined for ({state:?}, {symbol})")]
    MissingTransition { state: State, symbol: String },
    #[error("NFA state q{0} was never allocated")]
    UnknownNfaState(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("malformed pattern: {0}")]
    MalformedPattern(#[from] PatternError),
    #[error("invalid automaton: {0}")]
    Validation(#[from] ValidationError),
    #[error("nondeterministic transition ({state:?}, {symbol}): both {first:?} and {second:?}")]
    NondeterministicTransition {
        state: State,
        symbol: String,
        first: State,
        second: State,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
