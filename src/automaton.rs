use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt,
    hash::Hash,
    sync::OnceLock,
};

use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, hex_digit1, none_of},
    combinator::{all_consuming, map, map_opt, value},
    multi::many0,
    sequence::delimited,
    IResult,
};
use rand::Rng;
use regex::Regex;

use crate::error::{AutomatonError, Result, ValidationError};

/// Anything usable as an input symbol. The ordering fixes the alphabet order used when
/// comparing transition signatures.
pub trait Symbol: Eq + Ord + Hash + Clone + fmt::Debug {}

impl<T> Symbol for T where T: Eq + Ord + Hash + Clone + fmt::Debug {}

pub type State = String;

const DEAD_STATE: &str = "DEAD";
const DEAD_STATE_SUFFIX: &str = "_X";

pub(crate) fn render_symbol<A: Symbol>(symbol: &A) -> String {
    format!("{:?}", symbol)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition<A>
where
    A: Symbol,
{
    pub from: State,
    pub to: State,
    pub label: A,
}

impl<A: Symbol> Transition<A> {
    pub fn new(from: impl Into<State>, label: A, to: impl Into<State>) -> Self {
        Transition {
            from: from.into(),
            to: to.into(),
            label,
        }
    }
}

/// Why a [`Dfa::run`] stopped before consuming its whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt<A> {
    UnknownSymbol(A),
    NoTransition { state: State, symbol: A },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaRun<A> {
    /// States visited, starting with the start state.
    pub path: Vec<State>,
    pub accepted: bool,
    pub halted: Option<Halt<A>>,
}

/// A deterministic automaton over named states.
///
/// The transition relation may be partial. Instances are only built through [`Dfa::init`]
/// (or by operations that preserve its invariants), so every transition refers to declared
/// states and symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa<A>
where
    A: Symbol,
{
    states: BTreeSet<State>,
    alphabet: BTreeSet<A>,
    transition: BTreeMap<State, BTreeMap<A, State>>,
    start: State,
    accept: BTreeSet<State>,
}

impl<A> Dfa<A>
where
    A: Symbol,
{
    pub fn init(
        states: Vec<State>,
        alphabet: Vec<A>,
        transitions: Vec<Transition<A>>,
        start: State,
        accept: Vec<State>,
    ) -> Result<Dfa<A>> {
        let mut state_set = BTreeSet::new();
        for state in states {
            if state_set.contains(&state) {
                return Err(ValidationError::DuplicateState(state).into());
            }
            state_set.insert(state);
        }
        let mut symbol_set = BTreeSet::new();
        for symbol in alphabet {
            if symbol_set.contains(&symbol) {
                return Err(ValidationError::DuplicateSymbol(render_symbol(&symbol)).into());
            }
            symbol_set.insert(symbol);
        }

        let mut transition: BTreeMap<State, BTreeMap<A, State>> = BTreeMap::new();
        for t in transitions {
            let row = transition.entry(t.from.clone()).or_default();
            if let Some(existing) = row.get(&t.label) {
                if *existing != t.to {
                    return Err(AutomatonError::NondeterministicTransition {
                        state: t.from,
                        symbol: render_symbol(&t.label),
                        first: existing.clone(),
                        second: t.to,
                    });
                }
                continue;
            }
            row.insert(t.label, t.to);
        }

        let dfa = Dfa {
            states: state_set,
            alphabet: symbol_set,
            transition,
            start,
            accept: accept.into_iter().collect(),
        };
        dfa.validate()?;
        Ok(dfa)
    }

    /// Checks referential integrity: start, accepting states and every transition must use
    /// declared states and symbols.
    pub fn validate(&self) -> Result<()> {
        if !self.states.contains(&self.start) {
            return Err(ValidationError::UnknownStartState(self.start.clone()).into());
        }
        if let Some(state) = self.accept.iter().find(|s| !self.states.contains(*s)) {
            return Err(ValidationError::UnknownAcceptState(state.clone()).into());
        }
        for (from, row) in &self.transition {
            for (symbol, to) in row {
                if !self.states.contains(from) {
                    return Err(ValidationError::UnknownSourceState {
                        state: from.clone(),
                        symbol: render_symbol(symbol),
                    }
                    .into());
                }
                if !self.alphabet.contains(symbol) {
                    return Err(ValidationError::UnknownSymbol {
                        state: from.clone(),
                        symbol: render_symbol(symbol),
                    }
                    .into());
                }
                if !self.states.contains(to) {
                    return Err(ValidationError::UnknownTargetState {
                        state: from.clone(),
                        symbol: render_symbol(symbol),
                        target: to.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<A> {
        &self.alphabet
    }

    pub fn start(&self) -> &State {
        &self.start
    }

    pub fn accept(&self) -> &BTreeSet<State> {
        &self.accept
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept.contains(state)
    }

    pub fn next(&self, state: &str, symbol: &A) -> Option<&State> {
        self.transition.get(state).and_then(|row| row.get(symbol))
    }

    /// Like [`Dfa::next`], but a missing transition is an error.
    pub fn require_next(&self, state: &str, symbol: &A) -> Result<&State> {
        self.next(state, symbol).ok_or_else(|| {
            ValidationError::MissingTransition {
                state: state.to_string(),
                symbol: render_symbol(symbol),
            }
            .into()
        })
    }

    pub fn transitions(&self) -> Vec<Transition<A>> {
        self.transition
            .iter()
            .flat_map(|(from, row)| {
                row.iter()
                    .map(move |(symbol, to)| Transition::new(from.clone(), symbol.clone(), to.clone()))
            })
            .collect()
    }

    /// First (state, symbol) pair, in sorted order, without a transition.
    pub fn missing_transition(&self) -> Option<(&State, &A)> {
        self.states
            .iter()
            .cartesian_product(self.alphabet.iter())
            .find(|(state, symbol)| self.next(state, symbol).is_none())
    }

    pub fn is_total(&self) -> bool {
        self.missing_transition().is_none()
    }

    pub fn require_total(&self) -> Result<()> {
        match self.missing_transition() {
            Some((state, symbol)) => Err(ValidationError::MissingTransition {
                state: state.clone(),
                symbol: render_symbol(symbol),
            }
            .into()),
            None => Ok(()),
        }
    }

    fn fresh_dead_state(&self) -> State {
        let mut dead = DEAD_STATE.to_string();
        while self.states.contains(&dead) {
            dead.push_str(DEAD_STATE_SUFFIX);
        }
        dead
    }

    /// Adds a fresh non-accepting sink and routes every undefined (state, symbol) pair over
    /// the union of `alphabet` and the own alphabet into it. The sink is added even when
    /// nothing is missing.
    pub fn complete_over(&self, alphabet: &BTreeSet<A>) -> Dfa<A> {
        let dead = self.fresh_dead_state();
        let mut states = self.states.clone();
        states.insert(dead.clone());
        let alphabet: BTreeSet<A> = self.alphabet.union(alphabet).cloned().collect();

        let mut transition = self.transition.clone();
        let mut added = 0usize;
        for state in &states {
            let row = transition.entry(state.clone()).or_default();
            for symbol in &alphabet {
                row.entry(symbol.clone()).or_insert_with(|| {
                    added += 1;
                    dead.clone()
                });
            }
        }
        log::trace!("completed with sink {:?}: {} transitions added", dead, added);

        Dfa {
            states,
            alphabet,
            transition,
            start: self.start.clone(),
            accept: self.accept.clone(),
        }
    }

    /// Returns a total copy, adding a sink only if some transition is missing.
    pub fn complete(&self) -> Dfa<A> {
        if self.is_total() {
            self.clone()
        } else {
            self.complete_over(&self.alphabet)
        }
    }

    pub fn run(&self, input: &[A]) -> DfaRun<A> {
        let mut current = self.start.clone();
        let mut path = vec![current.clone()];
        for symbol in input {
            if !self.alphabet.contains(symbol) {
                return DfaRun {
                    path,
                    accepted: false,
                    halted: Some(Halt::UnknownSymbol(symbol.clone())),
                };
            }
            match self.next(&current, symbol) {
                Some(next) => {
                    current = next.clone();
                    path.push(current.clone());
                }
                None => {
                    return DfaRun {
                        path,
                        accepted: false,
                        halted: Some(Halt::NoTransition {
                            state: current,
                            symbol: symbol.clone(),
                        }),
                    };
                }
            }
        }
        let accepted = self.accept.contains(&current);
        DfaRun {
            path,
            accepted,
            halted: None,
        }
    }

    pub fn accepts(&self, input: &[A]) -> bool {
        self.run(input).accepted
    }

    pub fn reachable_states(&self) -> BTreeSet<State> {
        let mut reachable: BTreeSet<State> = BTreeSet::new();
        let mut queue: VecDeque<&State> = VecDeque::new();
        queue.push_back(&self.start);
        reachable.insert(self.start.clone());
        while let Some(cur) = queue.pop_front() {
            if let Some(row) = self.transition.get(cur) {
                for to in row.values() {
                    if reachable.insert(to.clone()) {
                        queue.push_back(to);
                    }
                }
            }
        }
        reachable
    }

    pub fn without_unreachable(&self) -> Dfa<A> {
        let reachable = self.reachable_states();
        let transition = self
            .transition
            .iter()
            .filter(|(from, _)| reachable.contains(*from))
            .map(|(from, row)| (from.clone(), row.clone()))
            .collect();
        Dfa {
            accept: self.accept.intersection(&reachable).cloned().collect(),
            states: reachable,
            alphabet: self.alphabet.clone(),
            transition,
            start: self.start.clone(),
        }
    }
}

fn line_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"^(states|alphabet|start|accept)\s*:\s*(.*)$").expect("valid header pattern"),
            Regex::new(r"^(\S+)\s*-(\S+?)->\s*(\S+)$").expect("valid arrow pattern"),
        )
    })
}

// characters the line format gives a meaning to
const RESERVED: &[char] = &['#', '-', '>', ':'];

/// Renders a state or symbol as a single token of the text format. Whitespace and reserved
/// characters become `\u{hex}`, a backslash becomes `\\`, and the empty name is `\e`.
pub(crate) fn escape_name(name: &str) -> String {
    if name.is_empty() {
        return r"\e".to_string();
    }
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '\\' {
            out.push_str(r"\\");
        } else if c.is_whitespace() || RESERVED.contains(&c) {
            out.push_str(&format!(r"\u{{{:x}}}", u32::from(c)));
        } else {
            out.push(c);
        }
    }
    out
}

fn name_fragment(input: &str) -> IResult<&str, Option<char>> {
    alt((
        value(Some('\\'), tag(r"\\")),
        value(None, tag(r"\e")),
        map_opt(delimited(tag(r"\u{"), hex_digit1, char('}')), |hex: &str| {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(Some)
        }),
        map(none_of("\\"), Some),
    ))(input)
}

/// Inverse of [`escape_name`]. Unescaped reserved characters are taken literally so
/// hand-written names like `q-1` still read back.
fn unescape_name(token: &str, line: usize) -> Result<String> {
    match all_consuming(many0(name_fragment))(token) {
        Ok((_, chars)) => Ok(chars.into_iter().flatten().collect()),
        Err(_) => Err(AutomatonError::Parse {
            line,
            message: format!("invalid escape in {:?}", token),
        }),
    }
}

/// Splits input holding several text-format descriptions on lines that contain only `---`.
/// Blank chunks, such as one after a trailing separator, are dropped.
pub fn split_dfa_strings(input: &str) -> Vec<String> {
    input
        .lines()
        .collect_vec()
        .split(|line| line.trim() == "---")
        .filter(|chunk| chunk.iter().any(|line| !line.trim().is_empty()))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

impl Dfa<String> {
    // parse text like
    //   states: A B
    //   alphabet: 0 1
    //   start: A
    //   accept: B
    //   A -1-> B
    pub fn parse_dfa_string(s: &str) -> Result<Dfa<String>> {
        let (header, arrow) = line_patterns();
        let mut states: Option<Vec<State>> = None;
        let mut alphabet: Option<Vec<String>> = None;
        let mut start: Option<State> = None;
        let mut accept: Vec<State> = vec![];
        let mut transitions = vec![];

        for (idx, raw) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if let Some(cap) = header.captures(line) {
                let values = cap[2]
                    .split_whitespace()
                    .map(|token| unescape_name(token, line_no))
                    .collect::<Result<Vec<_>>>()?;
                match &cap[1] {
                    "states" => states = Some(values),
                    "alphabet" => alphabet = Some(values),
                    "start" => {
                        if values.len() != 1 {
                            return Err(AutomatonError::Parse {
                                line: line_no,
                                message: format!("expected one start state, found {}", values.len()),
                            });
                        }
                        start = values.into_iter().next();
                    }
                    _ => accept = values,
                }
            } else if let Some(cap) = arrow.captures(line) {
                transitions.push(Transition::new(
                    unescape_name(&cap[1], line_no)?,
                    unescape_name(&cap[2], line_no)?,
                    unescape_name(&cap[3], line_no)?,
                ));
            } else {
                return Err(AutomatonError::Parse {
                    line: line_no,
                    message: format!("unrecognized line {:?}", line),
                });
            }
        }

        let end = s.lines().count();
        let missing = |section: &str| AutomatonError::Parse {
            line: end,
            message: format!("missing `{}:` section", section),
        };
        let states = states.ok_or_else(|| missing("states"))?;
        let alphabet = alphabet.ok_or_else(|| missing("alphabet"))?;
        let start = start.ok_or_else(|| missing("start"))?;
        Dfa::init(states, alphabet, transitions, start, accept)
    }
}

impl<A> fmt::Display for Dfa<A>
where
    A: Symbol + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = |a: &A| escape_name(&a.to_string());
        writeln!(f, "states: {}", self.states.iter().map(|s| escape_name(s)).join(" "))?;
        writeln!(f, "alphabet: {}", self.alphabet.iter().map(symbol).join(" "))?;
        writeln!(f, "start: {}", escape_name(&self.start))?;
        writeln!(f, "accept: {}", self.accept.iter().map(|s| escape_name(s)).join(" "))?;
        for t in self.transitions() {
            writeln!(
                f,
                "{} -{}-> {}",
                escape_name(&t.from),
                symbol(&t.label),
                escape_name(&t.to)
            )?;
        }
        Ok(())
    }
}

/// Random DFA over `s0..s{n-1}`; with `partial` roughly a quarter of the transitions are left out.
pub fn gen_random_dfa<R: Rng>(
    rng: &mut R,
    num_states: usize,
    alphabet: &[char],
    partial: bool,
) -> Dfa<char> {
    let num_states = num_states.max(1);
    let states = (0..num_states).map(|i| format!("s{}", i)).collect_vec();
    let mut transition: BTreeMap<State, BTreeMap<char, State>> = BTreeMap::new();
    for from in &states {
        for &symbol in alphabet {
            if partial && rng.gen_bool(0.25) {
                continue;
            }
            let to = states[rng.gen_range(0..num_states)].clone();
            transition.entry(from.clone()).or_default().insert(symbol, to);
        }
    }
    let accept = states.iter().filter(|_| rng.gen_bool(0.4)).cloned().collect();
    Dfa {
        start: states[0].clone(),
        states: states.into_iter().collect(),
        alphabet: alphabet.iter().copied().collect(),
        transition,
        accept,
    }
}

#[cfg(test)]
pub(crate) fn str_dfa(
    states: &[&str],
    alphabet: &[char],
    transitions: &[(&str, char, &str)],
    start: &str,
    accept: &[&str],
) -> Result<Dfa<char>> {
    Dfa::init(
        states.iter().map(|s| s.to_string()).collect(),
        alphabet.to_vec(),
        transitions
            .iter()
            .map(|&(from, label, to)| Transition::new(from, label, to))
            .collect(),
        start.to_string(),
        accept.iter().map(|s| s.to_string()).collect(),
    )
}

#[cfg(test)]
fn ends_in_one() -> Dfa<char> {
    str_dfa(
        &["A", "B"],
        &['0', '1'],
        &[("A", '0', "A"), ("A", '1', "B"), ("B", '0', "A"), ("B", '1', "B")],
        "A",
        &["B"],
    )
    .unwrap()
}

#[test]
fn test_init_rejects_unknown_start() {
    let err = str_dfa(&["A"], &['0'], &[], "Z", &[]).unwrap_err();
    assert_eq!(
        err,
        AutomatonError::Validation(ValidationError::UnknownStartState("Z".to_string()))
    );
}

#[test]
fn test_init_rejects_bad_references() {
    let err = str_dfa(&["A"], &['0'], &[], "A", &["B"]).unwrap_err();
    assert!(matches!(
        err,
        AutomatonError::Validation(ValidationError::UnknownAcceptState(s)) if s == "B"
    ));

    let err = str_dfa(&["A"], &['0'], &[("A", '0', "C")], "A", &[]).unwrap_err();
    assert!(matches!(
        err,
        AutomatonError::Validation(ValidationError::UnknownTargetState { target, .. }) if target == "C"
    ));

    let err = str_dfa(&["A"], &['0'], &[("X", '0', "A")], "A", &[]).unwrap_err();
    assert!(matches!(
        err,
        AutomatonError::Validation(ValidationError::UnknownSourceState { state, .. }) if state == "X"
    ));

    let err = str_dfa(&["A"], &['0'], &[("A", '2', "A")], "A", &[]).unwrap_err();
    assert!(matches!(
        err,
        AutomatonError::Validation(ValidationError::UnknownSymbol { symbol, .. }) if symbol == "'2'"
    ));

    let err = str_dfa(&["A", "A"], &['0'], &[], "A", &[]).unwrap_err();
    assert_eq!(
        err,
        AutomatonError::Validation(ValidationError::DuplicateState("A".to_string()))
    );
    let err = str_dfa(&["A"], &['0', '0'], &[], "A", &[]).unwrap_err();
    assert_eq!(
        err,
        AutomatonError::Validation(ValidationError::DuplicateSymbol("'0'".to_string()))
    );
}

#[test]
fn test_init_rejects_nondeterminism() {
    let err = str_dfa(
        &["A", "B"],
        &['0'],
        &[("A", '0', "A"), ("A", '0', "B")],
        "A",
        &[],
    )
    .unwrap_err();
    assert_eq!(
        err,
        AutomatonError::NondeterministicTransition {
            state: "A".to_string(),
            symbol: "'0'".to_string(),
            first: "A".to_string(),
            second: "B".to_string(),
        }
    );

    // the same edge twice is not a conflict
    let dfa = str_dfa(&["A"], &['0'], &[("A", '0', "A"), ("A", '0', "A")], "A", &[]).unwrap();
    assert_eq!(dfa.transitions().len(), 1);
}

#[test]
fn test_run() {
    let dfa = ends_in_one();
    assert!(dfa.accepts(&['1']));
    assert!(dfa.accepts(&['1', '1']));
    assert!(dfa.accepts(&['0', '0', '1']));
    assert!(!dfa.accepts(&['1', '0']));
    assert!(!dfa.accepts(&['1', '1', '0']));
    assert!(!dfa.accepts(&[]));

    let run = dfa.run(&['0', '1', '0']);
    assert_eq!(run.path, vec!["A", "A", "B", "A"]);
    assert!(!run.accepted);
    assert_eq!(run.halted, None);

    let run = dfa.run(&['1', '2', '1']);
    assert_eq!(run.path, vec!["A", "B"]);
    assert_eq!(run.halted, Some(Halt::UnknownSymbol('2')));
}

#[test]
fn test_run_halts_on_missing_transition() {
    let dfa = str_dfa(&["A", "B"], &['a', 'b'], &[("A", 'a', "B")], "A", &["B"]).unwrap();
    assert!(dfa.accepts(&['a']));
    let run = dfa.run(&['a', 'a']);
    assert!(!run.accepted);
    assert_eq!(
        run.halted,
        Some(Halt::NoTransition {
            state: "B".to_string(),
            symbol: 'a'
        })
    );
}

#[test]
fn test_complete() {
    let dfa = str_dfa(
        &["A", "DEAD"],
        &['a'],
        &[("A", 'a', "DEAD")],
        "A",
        &["DEAD"],
    )
    .unwrap();
    assert!(!dfa.is_total());
    assert_eq!(
        dfa.require_total().unwrap_err(),
        AutomatonError::Validation(ValidationError::MissingTransition {
            state: "DEAD".to_string(),
            symbol: "'a'".to_string(),
        })
    );

    let total = dfa.complete_over(&['b'].into_iter().collect());
    assert!(total.is_total());
    assert!(total.states().contains("DEAD_X"));
    assert!(!total.is_accepting("DEAD_X"));
    assert_eq!(total.next("A", &'b'), Some(&"DEAD_X".to_string()));
    assert_eq!(total.next("DEAD_X", &'a'), Some(&"DEAD_X".to_string()));
    assert_eq!(total.next("A", &'a'), Some(&"DEAD".to_string()));
    total.validate().unwrap();
    // input untouched
    assert_eq!(dfa.states().len(), 2);

    let already = ends_in_one();
    assert_eq!(already.complete(), already);
}

#[test]
fn test_reachable() {
    let dfa = str_dfa(
        &["A", "B", "C"],
        &['x'],
        &[("A", 'x', "B"), ("B", 'x', "A"), ("C", 'x', "A")],
        "A",
        &["C"],
    )
    .unwrap();
    let reachable = dfa.reachable_states();
    assert_eq!(
        reachable,
        ["A", "B"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
    );
    let trimmed = dfa.without_unreachable();
    assert_eq!(trimmed.states().len(), 2);
    assert!(trimmed.accept().is_empty());
    trimmed.validate().unwrap();
}

#[test]
fn test_parse_dfa_string() {
    let text = "
        # last symbol is 1
        states: A B
        alphabet: 0 1
        start: A
        accept: B
        A -0-> A
        A -1-> B
        B -0-> A
        B -1-> B
    ";
    let dfa = Dfa::parse_dfa_string(text).unwrap();
    assert_eq!(dfa.states().len(), 2);
    assert!(dfa.accepts(&["1".to_string()]));
    assert!(dfa.is_total());

    let reparsed = Dfa::parse_dfa_string(&dfa.to_string()).unwrap();
    assert_eq!(reparsed, dfa);
}

#[test]
fn test_parse_dfa_string_errors() {
    let err = Dfa::parse_dfa_string("states: A\nalphabet: 0\nstart: A\nA => A\n").unwrap_err();
    assert!(matches!(err, AutomatonError::Parse { line: 4, .. }));

    let err = Dfa::parse_dfa_string("states: A\nalphabet: 0\n").unwrap_err();
    assert!(matches!(err, AutomatonError::Parse { message, .. } if message.contains("start")));

    let err = Dfa::parse_dfa_string("states: A\nalphabet: 0\nstart: A\nA -0-> B\n").unwrap_err();
    assert!(matches!(
        err,
        AutomatonError::Validation(ValidationError::UnknownTargetState { .. })
    ));
}

#[test]
fn test_text_format_escapes() {
    let names = ["A B", "q#1", "x->y", "", "start:", r"back\slash"];
    let dfa = Dfa::init(
        names.iter().map(|s| s.to_string()).collect(),
        vec!["#".to_string(), "x".to_string(), " ".to_string()],
        vec![
            Transition::new("A B", "#".to_string(), "q#1"),
            Transition::new("", " ".to_string(), "x->y"),
            Transition::new(r"back\slash", "x".to_string(), "start:"),
        ],
        "start:".to_string(),
        vec!["q#1".to_string(), "".to_string()],
    )
    .unwrap();
    let text = dfa.to_string();
    assert!(text.contains(r"A\u{20}B -\u{23}-> q\u{23}1"));
    assert!(text.contains(r"back\\slash -x-> start\u{3a}"));
    assert_eq!(Dfa::parse_dfa_string(&text).unwrap(), dfa);

    // unescaped reserved characters in hand-written names are literal
    let dfa = Dfa::parse_dfa_string("states: q-1 q-2\nalphabet: 0\nstart: q-1\naccept: q-2\nq-1 -0-> q-2\n")
        .unwrap();
    assert!(dfa.accepts(&["0".to_string()]));
    assert_eq!(dfa.next("q-1", &"0".to_string()), Some(&"q-2".to_string()));

    let err = Dfa::parse_dfa_string("states: A\\q\nalphabet: 0\nstart: A\n").unwrap_err();
    assert!(matches!(err, AutomatonError::Parse { line: 1, .. }));
}

#[test]
fn test_split_dfa_strings() {
    let input = "states: A\r\nalphabet: a\r\nstart: A\r\n --- \r\nstates: B\nalphabet: a\nstart: B\n---\n";
    let parts = split_dfa_strings(input);
    assert_eq!(parts.len(), 2);
    assert_eq!(Dfa::parse_dfa_string(&parts[0]).unwrap().start(), "A");
    assert_eq!(Dfa::parse_dfa_string(&parts[1]).unwrap().start(), "B");
    assert!(split_dfa_strings("states: A\n").len() == 1);
}

#[test]
fn test_gen_random_dfa() {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let dfa = gen_random_dfa(&mut rng, 5, &['a', 'b'], false);
        dfa.validate().unwrap();
        assert!(dfa.is_total());
        let partial = gen_random_dfa(&mut rng, 5, &['a', 'b'], true);
        partial.validate().unwrap();
    }
}
