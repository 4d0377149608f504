//! Language equivalence of two DFAs by breadth-first exploration of their product.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::{
    automaton::{Dfa, State, Symbol},
    error::Result,
};

/// A shortest word accepted by exactly one of the two automata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample<A> {
    pub word: Vec<A>,
    /// State reached by the word in the first automaton (after completion).
    pub left: State,
    pub right: State,
    pub left_accepts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceReport<A> {
    /// Number of product pairs taken off the queue.
    pub explored: usize,
    pub counterexample: Option<Counterexample<A>>,
}

impl<A> EquivalenceReport<A> {
    pub fn is_equivalent(&self) -> bool {
        self.counterexample.is_none()
    }
}

type Pair<'a> = (&'a State, &'a State);

fn word_to<'a, A: Clone>(parent: &HashMap<Pair<'a>, Option<(Pair<'a>, &'a A)>>, mut pair: Pair<'a>) -> Vec<A> {
    let mut word = vec![];
    while let Some(Some((prev, symbol))) = parent.get(&pair) {
        word.push((*symbol).clone());
        pair = *prev;
    }
    word.reverse();
    word
}

/// Decides whether `left` and `right` accept the same language. Both may be partial and
/// may use different alphabets: each is completed over the union alphabet with its own
/// fresh dead state before the product is explored from the pair of start states.
pub fn check<A: Symbol>(left: &Dfa<A>, right: &Dfa<A>) -> Result<EquivalenceReport<A>> {
    left.validate()?;
    right.validate()?;

    let alphabet: BTreeSet<A> = left.alphabet().union(right.alphabet()).cloned().collect();
    let left = left.complete_over(&alphabet);
    let right = right.complete_over(&alphabet);

    let start: Pair = (left.start(), right.start());
    let mut parent: HashMap<Pair, Option<(Pair, &A)>> = HashMap::new();
    let mut queue: VecDeque<Pair> = VecDeque::new();
    parent.insert(start, None);
    queue.push_back(start);

    let mut explored = 0usize;
    while let Some(pair) = queue.pop_front() {
        explored += 1;
        let (p, q) = pair;
        let left_accepts = left.is_accepting(p);
        if left_accepts != right.is_accepting(q) {
            let word = word_to(&parent, pair);
            log::debug!(
                "not equivalent: ({}, {}) differ after {} symbols, {} pairs explored",
                p,
                q,
                word.len(),
                explored
            );
            return Ok(EquivalenceReport {
                explored,
                counterexample: Some(Counterexample {
                    word,
                    left: p.clone(),
                    right: q.clone(),
                    left_accepts,
                }),
            });
        }
        for symbol in &alphabet {
            let next = (left.require_next(p, symbol)?, right.require_next(q, symbol)?);
            if !parent.contains_key(&next) {
                log::trace!("({}, {}) -{:?}-> ({}, {})", p, q, symbol, next.0, next.1);
                parent.insert(next, Some((pair, symbol)));
                queue.push_back(next);
            }
        }
    }

    log::debug!("equivalent: {} pairs explored", explored);
    Ok(EquivalenceReport {
        explored,
        counterexample: None,
    })
}

pub fn equivalent<A: Symbol>(left: &Dfa<A>, right: &Dfa<A>) -> Result<bool> {
    Ok(check(left, right)?.is_equivalent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{gen_random_dfa, str_dfa, Transition};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn ends_in_one(a: &str, b: &str) -> Dfa<char> {
        str_dfa(
            &[a, b],
            &['0', '1'],
            &[(a, '0', a), (a, '1', b), (b, '0', a), (b, '1', b)],
            a,
            &[b],
        )
        .unwrap()
    }

    fn renamed(dfa: &Dfa<char>, prefix: &str) -> Dfa<char> {
        let rename = |s: &State| format!("{}{}", prefix, s);
        Dfa::init(
            dfa.states().iter().map(rename).collect(),
            dfa.alphabet().iter().copied().collect(),
            dfa.transitions()
                .into_iter()
                .map(|t| Transition::new(rename(&t.from), t.label, rename(&t.to)))
                .collect(),
            rename(dfa.start()),
            dfa.accept().iter().map(rename).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_renamed_states() {
        assert!(equivalent(&ends_in_one("A", "B"), &ends_in_one("X", "Y")).unwrap());
    }

    #[test]
    fn test_counterexample() {
        // at least two symbols vs at least three
        let two = str_dfa(
            &["0", "1", "2"],
            &['a'],
            &[("0", 'a', "1"), ("1", 'a', "2"), ("2", 'a', "2")],
            "0",
            &["2"],
        )
        .unwrap();
        let three = str_dfa(
            &["0", "1", "2", "3"],
            &['a'],
            &[("0", 'a', "1"), ("1", 'a', "2"), ("2", 'a', "3"), ("3", 'a', "3")],
            "0",
            &["3"],
        )
        .unwrap();
        let report = check(&two, &three).unwrap();
        assert!(!report.is_equivalent());
        let counterexample = report.counterexample.unwrap();
        assert_eq!(counterexample.word, vec!['a', 'a']);
        assert_eq!(counterexample.left, "2");
        assert_eq!(counterexample.right, "2");
        assert!(counterexample.left_accepts);
        assert!(two.accepts(&counterexample.word));
        assert!(!three.accepts(&counterexample.word));
    }

    #[test]
    fn test_different_alphabets() {
        let a_star = str_dfa(&["P"], &['a'], &[("P", 'a', "P")], "P", &["P"]).unwrap();
        // same language, b leads nowhere
        let partial = str_dfa(&["Q"], &['a', 'b'], &[("Q", 'a', "Q")], "Q", &["Q"]).unwrap();
        assert!(equivalent(&a_star, &partial).unwrap());
        assert!(equivalent(&partial, &a_star).unwrap());

        let ab_star = str_dfa(
            &["Q"],
            &['a', 'b'],
            &[("Q", 'a', "Q"), ("Q", 'b', "Q")],
            "Q",
            &["Q"],
        )
        .unwrap();
        let report = check(&a_star, &ab_star).unwrap();
        let counterexample = report.counterexample.unwrap();
        assert_eq!(counterexample.word, vec!['b']);
        assert_eq!(counterexample.left, "DEAD");
        assert!(!counterexample.left_accepts);
    }

    #[test]
    fn test_dead_state_name_collision() {
        let dfa = str_dfa(
            &["DEAD", "DEAD_X"],
            &['a', 'b'],
            &[("DEAD", 'a', "DEAD_X")],
            "DEAD",
            &["DEAD_X"],
        )
        .unwrap();
        let other = str_dfa(&["s", "t"], &['a'], &[("s", 'a', "t")], "s", &["t"]).unwrap();
        assert!(equivalent(&dfa, &other).unwrap());
        assert!(!dfa.is_total());
    }

    #[test]
    fn test_empty_languages() {
        let nothing = str_dfa(&["A"], &['a'], &[], "A", &[]).unwrap();
        let unreachable_accept =
            str_dfa(&["A", "B"], &['b'], &[("B", 'b', "B")], "A", &["B"]).unwrap();
        assert!(equivalent(&nothing, &unreachable_accept).unwrap());
        let epsilon = str_dfa(&["A"], &['a'], &[], "A", &["A"]).unwrap();
        let report = check(&nothing, &epsilon).unwrap();
        assert_eq!(report.explored, 1);
        assert_eq!(report.counterexample.unwrap().word, Vec::<char>::new());
    }

    #[test]
    fn test_random_properties() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let n = rng.gen_range(1..6);
            let m = rng.gen_range(1..6);
            let d1 = gen_random_dfa(&mut rng, n, &['a', 'b'], true);
            let d2 = gen_random_dfa(&mut rng, m, &['a', 'b', 'c'], true);

            assert!(equivalent(&d1, &d1).unwrap());
            assert!(equivalent(&d1, &renamed(&d1, "r_")).unwrap());

            let forward = check(&d1, &d2).unwrap();
            let backward = check(&d2, &d1).unwrap();
            assert_eq!(forward.is_equivalent(), backward.is_equivalent());
            if let Some(counterexample) = forward.counterexample {
                assert_ne!(d1.accepts(&counterexample.word), d2.accepts(&counterexample.word));
                assert_eq!(d1.accepts(&counterexample.word), counterexample.left_accepts);
                assert_eq!(
                    backward.counterexample.map(|c| c.word.len()),
                    Some(counterexample.word.len())
                );
            }
        }
    }
}
