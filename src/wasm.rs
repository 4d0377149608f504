//! String-in, string-out entry points for a JavaScript host.

use wasm_bindgen::prelude::*;

use crate::{
    automaton::Dfa, compiler::compile_str, equivalence::equivalent, minimize::minimize,
};

#[wasm_bindgen]
pub fn regex_accepts(pattern: &str, input: &str) -> Result<bool, String> {
    let nfa = compile_str(pattern).map_err(|e| e.to_string())?;
    Ok(nfa.accepts_str(input))
}

/// Transition listing of the NFA compiled from `pattern`.
#[wasm_bindgen]
pub fn regex_to_nfa(pattern: &str) -> Result<String, String> {
    compile_str(pattern)
        .map(|nfa| nfa.to_string())
        .map_err(|e| e.to_string())
}

/// Minimizes a DFA given in text form, completing it first if it is partial. The result
/// is in the same text form followed by `# S0 = ...` lines naming the merged states.
#[wasm_bindgen]
pub fn minimize_dfa(description: &str) -> Result<String, String> {
    let dfa = Dfa::parse_dfa_string(description).map_err(|e| e.to_string())?;
    minimize(&dfa.complete())
        .map(|minimized| minimized.to_string())
        .map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn dfa_equivalent(left: &str, right: &str) -> Result<bool, String> {
    let left = Dfa::parse_dfa_string(left).map_err(|e| e.to_string())?;
    let right = Dfa::parse_dfa_string(right).map_err(|e| e.to_string())?;
    equivalent(&left, &right).map_err(|e| e.to_string())
}

#[test]
fn test_regex_entry_points() {
    assert_eq!(regex_accepts("(a|b)*abb", "babb"), Ok(true));
    assert_eq!(regex_accepts("(a|b)*abb", "ba"), Ok(false));
    assert!(regex_accepts("(a|b", "a").unwrap_err().contains("never closed"));
    assert!(regex_to_nfa("ab").unwrap().contains("q1 -ε-> q2"));
}

#[test]
fn test_dfa_entry_points() {
    let text = "states: A B C\nalphabet: 0 1\nstart: A\naccept: B C\nA -1-> B\nB -1-> C\nC -1-> B\n";
    let minimized = minimize_dfa(text).unwrap();
    assert!(minimized.contains("# S0 = B C\n"));
    assert_eq!(dfa_equivalent(text, &minimized), Ok(true));
    assert_eq!(dfa_equivalent(text, "states: A\nalphabet: 1\nstart: A\n"), Ok(false));
    assert!(dfa_equivalent(text, "states: A\n").is_err());
}
