use std::io::Read;
use std::process::exit;

use itertools::Itertools;

use fa_toolkit::{automaton::split_dfa_strings, check, Dfa};

// Two DFA descriptions separated by a line containing only `---`.
// Exit status: 0 equivalent, 1 not equivalent, 2 bad input.
fn main() {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("{}", e);
        exit(2);
    }
    let parts = split_dfa_strings(&input);
    if parts.len() != 2 {
        eprintln!("expected two descriptions separated by `---`, got {}", parts.len());
        exit(2);
    }

    let report = Dfa::parse_dfa_string(&parts[0])
        .and_then(|left| Dfa::parse_dfa_string(&parts[1]).map(|right| (left, right)))
        .and_then(|(left, right)| check(&left, &right));
    match report {
        Ok(report) => match report.counterexample {
            None => {
                println!("equivalent ({} state pairs explored)", report.explored);
                exit(0);
            }
            Some(c) => {
                let side = if c.left_accepts { "first" } else { "second" };
                println!(
                    "not equivalent: {:?} is accepted only by the {} automaton",
                    c.word.iter().join(" "),
                    side
                );
                exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            exit(2);
        }
    }
}
