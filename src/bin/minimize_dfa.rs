use std::io::Read;
use std::process::exit;

use fa_toolkit::{minimize, Dfa};

fn main() {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("{}", e);
        exit(2);
    }
    let result = Dfa::parse_dfa_string(&input).and_then(|dfa| {
        if !dfa.is_total() {
            log::info!("input is partial, adding a dead state");
        }
        minimize(&dfa.complete())
    });
    match result {
        Ok(minimized) => print!("{}", minimized),
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}
