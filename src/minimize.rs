//! Moore-style partition refinement for total DFAs.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use itertools::Itertools;

use crate::{
    automaton::{escape_name, Dfa, State, Symbol, Transition},
    error::Result,
};

const MINIMIZED_STATE_PREFIX: &str = "S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minimized<A>
where
    A: Symbol,
{
    pub dfa: Dfa<A>,
    /// Every original state to the minimized state representing it.
    pub state_mapping: BTreeMap<State, State>,
}

impl<A: Symbol> Minimized<A> {
    /// Minimized state to the sorted original states it represents.
    pub fn groups(&self) -> BTreeMap<State, Vec<State>> {
        self.state_mapping
            .iter()
            .map(|(original, new)| (new.clone(), original.clone()))
            .into_group_map()
            .into_iter()
            .map(|(new, originals)| (new, originals.into_iter().sorted().collect()))
            .collect()
    }
}

impl<A> fmt::Display for Minimized<A>
where
    A: Symbol + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dfa)?;
        for (new, originals) in self.groups() {
            writeln!(
                f,
                "# {} = {}",
                new,
                originals.iter().map(|s| escape_name(s)).join(" ")
            )?;
        }
        Ok(())
    }
}

/// Computes the coarsest partition of `dfa`'s states that separates accepting from
/// non-accepting states and is stable under every transition, and returns the quotient
/// automaton. Unreachable states are kept and mapped like any other.
///
/// The DFA must be total; use [`Dfa::complete`] first otherwise.
pub fn minimize<A: Symbol>(dfa: &Dfa<A>) -> Result<Minimized<A>> {
    dfa.validate()?;
    dfa.require_total()?;
    let alphabet = dfa.alphabet().iter().collect_vec();

    let (accepting, rejecting): (Vec<&State>, Vec<&State>) =
        dfa.states().iter().partition(|s| dfa.is_accepting(s));
    let mut partition: Vec<Vec<&State>> = [accepting, rejecting]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect();

    let mut rounds = 0usize;
    loop {
        rounds += 1;
        // signatures refer to this snapshot, not to the groups being built below
        let group_of: HashMap<&State, usize> = partition
            .iter()
            .enumerate()
            .flat_map(|(idx, group)| group.iter().map(move |&state| (state, idx)))
            .collect();

        let mut refined: Vec<Vec<&State>> = Vec::with_capacity(partition.len());
        let mut split = false;
        for group in &partition {
            let mut index: HashMap<Vec<usize>, usize> = HashMap::new();
            let mut subgroups: Vec<Vec<&State>> = vec![];
            for &state in group {
                let signature = alphabet
                    .iter()
                    .map(|symbol| dfa.require_next(state, symbol).map(|to| group_of[to]))
                    .collect::<Result<Vec<usize>>>()?;
                match index.get(&signature) {
                    Some(&i) => subgroups[i].push(state),
                    None => {
                        index.insert(signature, subgroups.len());
                        subgroups.push(vec![state]);
                    }
                }
            }
            split |= subgroups.len() > 1;
            refined.extend(subgroups);
        }
        log::trace!("round {}: {} -> {} groups", rounds, partition.len(), refined.len());
        partition = refined;
        if !split {
            break;
        }
    }

    let name = |idx: usize| format!("{}{}", MINIMIZED_STATE_PREFIX, idx);
    let state_mapping: BTreeMap<State, State> = partition
        .iter()
        .enumerate()
        .flat_map(|(idx, group)| group.iter().map(move |&state| (state.clone(), name(idx))))
        .collect();

    let mut transitions = vec![];
    for (idx, group) in partition.iter().enumerate() {
        // members of a stable group agree on the group of every successor
        if let Some(&representative) = group.first() {
            for &symbol in &alphabet {
                let to = dfa.require_next(representative, symbol)?;
                transitions.push(Transition::new(
                    name(idx),
                    symbol.clone(),
                    state_mapping[to].clone(),
                ));
            }
        }
    }
    let accept = dfa
        .accept()
        .iter()
        .map(|state| state_mapping[state].clone())
        .unique()
        .collect_vec();

    let minimized = Dfa::init(
        (0..partition.len()).map(name).collect(),
        alphabet.into_iter().cloned().collect(),
        transitions,
        state_mapping[dfa.start()].clone(),
        accept,
    )?;
    log::debug!(
        "minimized {} states to {} in {} rounds",
        dfa.states().len(),
        minimized.states().len(),
        rounds
    );
    Ok(Minimized {
        dfa: minimized,
        state_mapping,
    })
}
