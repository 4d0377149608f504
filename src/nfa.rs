use std::{collections::BTreeMap, collections::BTreeSet, fmt};

use itertools::Itertools;

use crate::{
    automaton::Symbol,
    error::{Result, ValidationError},
};

/// Index of a state in an [`Nfa`] arena. Equal ids are the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NfaState<A> {
    edges: BTreeMap<A, Vec<StateId>>,
    epsilon: Vec<StateId>,
}

impl<A> NfaState<A> {
    fn new() -> Self {
        NfaState {
            edges: BTreeMap::new(),
            epsilon: vec![],
        }
    }
}

/// A transition as listed by [`Nfa::edges`]; `label == None` is an epsilon move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaEdge<A> {
    pub from: StateId,
    pub to: StateId,
    pub label: Option<A>,
}

/// Active state set after one simulation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaStep<A> {
    /// Symbol consumed in this step, `None` for the initial closure.
    pub symbol: Option<A>,
    pub active: BTreeSet<StateId>,
}

/// Nondeterministic automaton with a single accepting state.
#[derive(Debug, Clone)]
pub struct Nfa<A>
where
    A: Symbol,
{
    states: Vec<NfaState<A>>,
    start: StateId,
    accept: StateId,
}

/// Allocates states for one automaton. Ids are only meaningful for the builder that
/// produced them.
#[derive(Debug, Clone)]
pub struct NfaBuilder<A>
where
    A: Symbol,
{
    num_states: usize,
    edges: Vec<NfaEdge<A>>,
}

impl<A: Symbol> Default for NfaBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> NfaBuilder<A>
where
    A: Symbol,
{
    pub fn new() -> Self {
        NfaBuilder {
            num_states: 0,
            edges: vec![],
        }
    }

    pub fn add_state(&mut self) -> StateId {
        let id = StateId(self.num_states);
        self.num_states += 1;
        id
    }

    pub fn add_edge(&mut self, from: StateId, symbol: A, to: StateId) {
        self.edges.push(NfaEdge {
            from,
            to,
            label: Some(symbol),
        });
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.edges.push(NfaEdge {
            from,
            to,
            label: None,
        });
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn build(self, start: StateId, accept: StateId) -> Result<Nfa<A>> {
        let check = |id: StateId| {
            if id.0 < self.num_states {
                Ok(())
            } else {
                Err(ValidationError::UnknownNfaState(id.0))
            }
        };
        check(start)?;
        check(accept)?;
        for edge in &self.edges {
            check(edge.from)?;
            check(edge.to)?;
        }

        let mut states: Vec<NfaState<A>> = (0..self.num_states).map(|_| NfaState::new()).collect();
        for edge in self.edges {
            let state = &mut states[edge.from.0];
            match edge.label {
                Some(symbol) => state.edges.entry(symbol).or_default().push(edge.to),
                None => state.epsilon.push(edge.to),
            }
        }
        Ok(Nfa {
            states,
            start,
            accept,
        })
    }
}

impl<A> Nfa<A>
where
    A: Symbol,
{
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Smallest superset of `seeds` closed under epsilon moves.
    pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<StateId> = vec![];
        for seed in seeds {
            if closure.insert(seed) {
                stack.push(seed);
            }
        }
        while let Some(state) = stack.pop() {
            let Some(nfa_state) = self.states.get(state.0) else {
                continue;
            };
            for &next in &nfa_state.epsilon {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }
        closure
    }

    /// Active set after reading `symbol` from `current`. Empty if no active state has a
    /// matching edge.
    pub fn step(&self, current: &BTreeSet<StateId>, symbol: &A) -> BTreeSet<StateId> {
        let moved = current
            .iter()
            .filter_map(|state| self.states.get(state.0)?.edges.get(symbol))
            .flatten()
            .copied()
            .collect_vec();
        self.epsilon_closure(moved)
    }

    pub fn accepts(&self, input: &[A]) -> bool {
        let mut current = self.epsilon_closure([self.start]);
        for symbol in input {
            current = self.step(&current, symbol);
        }
        current.contains(&self.accept)
    }

    /// The initial closure followed by the active set after every input symbol.
    pub fn trace(&self, input: &[A]) -> Vec<NfaStep<A>> {
        let mut steps = vec![NfaStep {
            symbol: None,
            active: self.epsilon_closure([self.start]),
        }];
        for symbol in input {
            let active = self.step(&steps[steps.len() - 1].active, symbol);
            steps.push(NfaStep {
                symbol: Some(symbol.clone()),
                active,
            });
        }
        steps
    }

    pub fn edges(&self) -> Vec<NfaEdge<A>> {
        let mut edges = vec![];
        for (idx, state) in self.states.iter().enumerate() {
            for (symbol, targets) in &state.edges {
                edges.extend(targets.iter().map(|&to| NfaEdge {
                    from: StateId(idx),
                    to,
                    label: Some(symbol.clone()),
                }));
            }
            edges.extend(state.epsilon.iter().map(|&to| NfaEdge {
                from: StateId(idx),
                to,
                label: None,
            }));
        }
        edges
    }
}

impl Nfa<char> {
    pub fn accepts_str(&self, input: &str) -> bool {
        self.accepts(&input.chars().collect_vec())
    }
}

impl<A> fmt::Display for Nfa<A>
where
    A: Symbol + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        writeln!(f, "accept: {}", self.accept)?;
        for edge in self.edges() {
            match &edge.label {
                Some(symbol) => writeln!(f, "{} -{}-> {}", edge.from, symbol, edge.to)?,
                None => writeln!(f, "{} -ε-> {}", edge.from, edge.to)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomatonError;

    // q0 -a-> q1, q1 -ε-> q2, q2 -ε-> q1, q2 -b-> q3, q0 -a-> q3
    fn sample() -> Nfa<char> {
        let mut b = NfaBuilder::new();
        let q: Vec<StateId> = (0..4).map(|_| b.add_state()).collect();
        b.add_edge(q[0], 'a', q[1]);
        b.add_epsilon(q[1], q[2]);
        b.add_epsilon(q[2], q[1]);
        b.add_edge(q[2], 'b', q[3]);
        b.add_edge(q[0], 'a', q[3]);
        assert_eq!(b.num_states(), 4);
        b.build(q[0], q[3]).unwrap()
    }

    #[test]
    fn test_epsilon_closure_cycle() {
        let nfa = sample();
        let closure = nfa.epsilon_closure([StateId(1)]);
        assert_eq!(closure, [StateId(1), StateId(2)].into_iter().collect::<BTreeSet<_>>());
        assert_eq!(nfa.epsilon_closure(closure.clone()), closure);
        assert_eq!(
            nfa.epsilon_closure([StateId(0)]),
            [StateId(0)].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_accepts_nondeterministic() {
        let nfa = sample();
        assert!(nfa.accepts(&['a']));
        assert!(nfa.accepts(&['a', 'b']));
        assert!(!nfa.accepts(&['b']));
        assert!(!nfa.accepts(&[]));
        assert!(!nfa.accepts(&['a', 'b', 'b']));
        // symbols the automaton never mentions simply block
        assert!(!nfa.accepts(&['z', 'a']));
    }

    #[test]
    fn test_trace() {
        let nfa = sample();
        let steps = nfa.trace(&['a', 'c', 'b']);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].symbol, None);
        assert_eq!(
            steps[1].active,
            [StateId(1), StateId(2), StateId(3)].into_iter().collect::<BTreeSet<_>>()
        );
        assert!(steps[2].active.is_empty());
        assert!(steps[3].active.is_empty());
        assert_eq!(steps[3].symbol, Some('b'));
    }

    #[test]
    fn test_build_rejects_foreign_ids() {
        let mut b: NfaBuilder<char> = NfaBuilder::new();
        let s = b.add_state();
        assert_eq!(b.num_states(), 1);
        b.add_epsilon(s, StateId(5));
        assert_eq!(
            b.build(s, s).unwrap_err(),
            AutomatonError::Validation(ValidationError::UnknownNfaState(5))
        );
    }

    #[test]
    fn test_display() {
        let nfa = sample();
        let text = nfa.to_string();
        assert!(text.starts_with("start: q0\naccept: q3\n"));
        assert!(text.contains("q0 -a-> q1\n"));
        assert!(text.contains("q1 -ε-> q2\n"));
        assert_eq!(nfa.edges().len(), 5);
    }
}
