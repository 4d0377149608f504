use std::io::Read;
use std::process::exit;

use fa_toolkit::compile_str;

// First line: the pattern. Every further line is a string to test.
fn main() {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("{}", e);
        exit(2);
    }
    let mut lines = input.lines();
    let pattern = lines.next().unwrap_or("").trim();

    let nfa = match compile_str(pattern) {
        Ok(nfa) => nfa,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    print!("{}", nfa);

    for line in lines {
        let verdict = if nfa.accepts_str(line) { "accepted" } else { "rejected" };
        println!("{:?}: {}", line, verdict);
    }
}
