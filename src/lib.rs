pub mod automaton;
pub mod compiler;
pub mod equivalence;
pub mod error;
pub mod minimize;
pub mod nfa;
pub mod pattern;
pub mod wasm;

pub use automaton::{Dfa, State, Symbol, Transition};
pub use compiler::{compile, compile_str};
pub use equivalence::{check, equivalent};
pub use error::{AutomatonError, Result};
pub use minimize::{minimize, Minimized};
pub use nfa::{Nfa, NfaBuilder, StateId};
pub use pattern::{tokenize, Token};
