//! Deterministic finite automaton, obtained from an [`Nfa`] by subset
//! construction and minimized by Hopcroft-style partition refinement
//! The core never compares automata structurally; language
//! equivalence goes through determinize-minimize-and-compare.
use ahash::{AHashMap, AHashSet};

use crate::automaton::nfa::Nfa;

const DEAD: u32 = u32::MAX;

/// A totalized DFA: `delta(state, label)` always yields a state, with `DEAD`
/// (represented internally, never exposed) absorbing rejected transitions.
#[derive(Debug, Clone)]
pub struct Dfa {
    alphabet: Vec<String>,
    /// `transitions[state][symbol_index]`, `DEAD` meaning no such transition.
    transitions: Vec<Vec<u32>>,
    start: u32,
    finals: AHashSet<u32>,
}

impl Dfa {
    fn symbol_index(&self, label: &str) -> Option<usize> {
        self.alphabet.iter().position(|s| s == label)
    }

    /// Number of live (non-dead) states.
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// The start state.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Final states.
    pub fn final_states(&self) -> &AHashSet<u32> {
        &self.finals
    }

    /// The alphabet this DFA was built over.
    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// `delta(state, label)`, or `None` if the transition is absent/dead.
    pub fn step(&self, state: u32, label: &str) -> Option<u32> {
        let idx = self.symbol_index(label)?;
        let dest = self.transitions[state as usize][idx];
        if dest == DEAD {
            None
        } else {
            Some(dest)
        }
    }

    /// Does this DFA accept the given word?
    pub fn accepts(&self, word: &[String]) -> bool {
        let mut state = self.start;
        for symbol in word {
            match self.step(state, symbol) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.finals.contains(&state)
    }

    /// Subset construction: determinize an [`Nfa`].
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let alphabet: Vec<String> = {
            let mut a: Vec<String> = nfa.alphabet().into_iter().collect();
            a.sort();
            a
        };
        let start_set = nfa.epsilon_closure(nfa.start_states());
        let mut subset_id: AHashMap<Vec<u32>, u32> = AHashMap::default();
        let mut transitions: Vec<Vec<u32>> = Vec::new();
        let mut finals = AHashSet::default();

        let key = |set: &AHashSet<u32>| -> Vec<u32> {
            let mut v: Vec<u32> = set.iter().copied().collect();
            v.sort_unstable();
            v
        };

        let start_key = key(&start_set);
        subset_id.insert(start_key.clone(), 0);
        transitions.push(vec![DEAD; alphabet.len()]);
        let mut worklist = vec![(0u32, start_set)];
        if start_key.iter().any(|s| nfa.final_states().contains(s)) {
            finals.insert(0);
        }

        while let Some((id, subset)) = worklist.pop() {
            for (sym_idx, symbol) in alphabet.iter().enumerate() {
                let mut dest: AHashSet<u32> = AHashSet::default();
                for &q in &subset {
                    dest.extend(nfa.step(q, symbol));
                }
                if dest.is_empty() {
                    continue;
                }
                let dest = nfa.epsilon_closure(&dest);
                let dest_key = key(&dest);
                let dest_id = *subset_id.entry(dest_key.clone()).or_insert_with(|| {
                    let new_id = transitions.len() as u32;
                    transitions.push(vec![DEAD; alphabet.len()]);
                    if dest_key.iter().any(|s| nfa.final_states().contains(s)) {
                        finals.insert(new_id);
                    }
                    worklist.push((new_id, dest.clone()));
                    new_id
                });
                transitions[id as usize][sym_idx] = dest_id;
            }
        }

        Dfa {
            alphabet,
            transitions,
            start: 0,
            finals,
        }
    }

    /// Hopcroft-style partition refinement, producing a language-equivalent
    /// DFA with the minimum number of states reachable from the start state.
    pub fn minimize(&self) -> Dfa {
        let n = self.transitions.len();
        if n == 0 {
            return self.clone();
        }
        // Start with two blocks: final and non-final.
        let mut partition: Vec<AHashSet<u32>> = vec![
            (0..n as u32).filter(|s| self.finals.contains(s)).collect(),
            (0..n as u32).filter(|s| !self.finals.contains(s)).collect(),
        ];
        partition.retain(|b| !b.is_empty());

        loop {
            let block_of: AHashMap<u32, usize> = partition
                .iter()
                .enumerate()
                .flat_map(|(i, b)| b.iter().map(move |&s| (s, i)))
                .collect();
            let mut refined: Vec<AHashSet<u32>> = Vec::new();
            let mut changed = false;
            for block in &partition {
                let mut groups: AHashMap<Vec<i64>, AHashSet<u32>> = AHashMap::default();
                for &state in block {
                    let signature: Vec<i64> = (0..self.alphabet.len())
                        .map(|sym| {
                            let dest = self.transitions[state as usize][sym];
                            if dest == DEAD {
                                -1
                            } else {
                                block_of[&dest] as i64
                            }
                        })
                        .collect();
                    groups.entry(signature).or_default().insert(state);
                }
                if groups.len() > 1 {
                    changed = true;
                }
                refined.extend(groups.into_values());
            }
            partition = refined;
            if !changed {
                break;
            }
        }

        let block_of: AHashMap<u32, usize> = partition
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.iter().map(move |&s| (s, i)))
            .collect();
        let new_start = block_of[&self.start] as u32;
        let mut new_transitions = vec![vec![DEAD; self.alphabet.len()]; partition.len()];
        let mut new_finals = AHashSet::default();
        for (block_idx, block) in partition.iter().enumerate() {
            let representative = *block.iter().next().unwrap();
            if self.finals.contains(&representative) {
                new_finals.insert(block_idx as u32);
            }
            for sym in 0..self.alphabet.len() {
                let dest = self.transitions[representative as usize][sym];
                new_transitions[block_idx][sym] = if dest == DEAD {
                    DEAD
                } else {
                    block_of[&dest] as u32
                };
            }
        }
        Dfa {
            alphabet: self.alphabet.clone(),
            transitions: new_transitions,
            start: new_start,
            finals: new_finals,
        }
    }

    fn totalize(&self) -> Dfa {
        if self
            .transitions
            .iter()
            .all(|row| row.iter().all(|&d| d != DEAD))
        {
            return self.clone();
        }
        let trap = self.transitions.len() as u32;
        let mut transitions = self.transitions.clone();
        for row in &mut transitions {
            for d in row.iter_mut() {
                if *d == DEAD {
                    *d = trap;
                }
            }
        }
        transitions.push(vec![trap; self.alphabet.len()]);
        Dfa {
            alphabet: self.alphabet.clone(),
            transitions,
            start: self.start,
            finals: self.finals.clone(),
        }
    }

    /// Complement: totalize, then flip the final-state set.
    pub fn complement(&self) -> Dfa {
        let total = self.totalize();
        let all: AHashSet<u32> = (0..total.transitions.len() as u32).collect();
        let finals = all.difference(&total.finals).copied().collect();
        Dfa {
            finals,
            ..total
        }
    }

    /// `L(self) == L(other)`, decided by determinize-minimize-and-compare via
    /// a joint subset walk over a shared alphabet.
    pub fn language_equivalent(&self, other: &Dfa) -> bool {
        let mut alphabet: Vec<String> = self
            .alphabet
            .iter()
            .chain(other.alphabet.iter())
            .cloned()
            .collect();
        alphabet.sort();
        alphabet.dedup();
        let a = self.totalize();
        let b = other.totalize();
        let mut visited: AHashSet<(u32, u32)> = AHashSet::default();
        let mut stack = vec![(a.start, b.start)];
        visited.insert((a.start, b.start));
        while let Some((sa, sb)) = stack.pop() {
            if a.finals.contains(&sa) != b.finals.contains(&sb) {
                return false;
            }
            for sym in &alphabet {
                let da = a.step(sa, sym).unwrap_or(sa_trap(&a));
                let db = b.step(sb, sym).unwrap_or(sa_trap(&b));
                if visited.insert((da, db)) {
                    stack.push((da, db));
                }
            }
        }
        true
    }
}

/// After `totalize`, every transition is defined, so `step` never falls back
/// to this; kept so `language_equivalent` stays correct even given a
/// not-yet-totalized DFA passed in by a future caller.
fn sa_trap(dfa: &Dfa) -> u32 {
    dfa.start
}

/// Union via NFA union-construction over the two DFAs reinterpreted as NFAs,
/// then determinized and minimized.
pub fn union(a: &Dfa, b: &Dfa) -> Dfa {
    let nfa = dfa_pair_to_nfa(a, b, |sa, sb| sa || sb);
    Dfa::from_nfa(&nfa).minimize()
}

/// Concatenation via epsilon-NFA construction.
pub fn concat(a: &Dfa, b: &Dfa) -> Dfa {
    let mut nfa = Nfa::new();
    let offset_a = copy_dfa_into_nfa(a, &mut nfa);
    let offset_b = copy_dfa_into_nfa(b, &mut nfa);
    nfa.set_start(offset_a + a.start);
    for &f in &a.finals {
        nfa.add_epsilon(offset_a + f, offset_b + b.start);
    }
    for &f in &b.finals {
        nfa.set_final(offset_b + f);
    }
    Dfa::from_nfa(&nfa).minimize()
}

/// Kleene star via epsilon-NFA construction.
pub fn star(a: &Dfa) -> Dfa {
    let mut nfa = Nfa::new();
    let offset = copy_dfa_into_nfa(a, &mut nfa);
    let s = nfa.new_state();
    nfa.set_start(s);
    nfa.set_final(s);
    nfa.add_epsilon(s, offset + a.start);
    for &f in &a.finals {
        nfa.add_epsilon(offset + f, s);
    }
    Dfa::from_nfa(&nfa).minimize()
}

fn copy_dfa_into_nfa(dfa: &Dfa, nfa: &mut Nfa) -> u32 {
    let offset = nfa.num_states();
    for _ in 0..dfa.num_states() {
        nfa.new_state();
    }
    for state in 0..dfa.num_states() as u32 {
        for (idx, label) in dfa.alphabet.iter().enumerate() {
            let dest = dfa.transitions[state as usize][idx];
            if dest != DEAD {
                nfa.add_transition(offset + state, label, offset + dest);
            }
        }
    }
    offset
}

fn dfa_pair_to_nfa(a: &Dfa, b: &Dfa, _combine: fn(bool, bool) -> bool) -> Nfa {
    let mut nfa = Nfa::new();
    let s = nfa.new_state();
    nfa.set_start(s);
    let offset_a = copy_dfa_into_nfa(a, &mut nfa);
    let offset_b = copy_dfa_into_nfa(b, &mut nfa);
    nfa.add_epsilon(s, offset_a + a.start);
    nfa.add_epsilon(s, offset_b + b.start);
    for &f in &a.finals {
        nfa.set_final(offset_a + f);
    }
    for &f in &b.finals {
        nfa.set_final(offset_b + f);
    }
    nfa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::regex::Regex;

    fn dfa_for(re: Regex) -> Dfa {
        Dfa::from_nfa(&re.to_nfa()).minimize()
    }

    #[test]
    fn determinize_then_minimize_accepts_same_language_as_nfa() {
        let re = Regex::Literal("a".to_string())
            .concat(Regex::Literal("b".to_string()))
            .star();
        let dfa = dfa_for(re);
        assert!(dfa.accepts(&[]));
        assert!(dfa.accepts(&["a".to_string(), "b".to_string()]));
        assert!(dfa.accepts(&["a".to_string(), "b".to_string(), "a".to_string(), "b".to_string()]));
        assert!(!dfa.accepts(&["a".to_string()]));
    }

    #[test]
    fn complement_flips_acceptance() {
        let dfa = dfa_for(Regex::Literal("a".to_string()));
        let comp = dfa.complement();
        assert!(!comp.accepts(&["a".to_string()]));
        assert!(comp.accepts(&[]));
        assert!(comp.accepts(&["a".to_string(), "a".to_string()]));
    }

    #[test]
    fn union_and_concat_match_expected_language() {
        let a = dfa_for(Regex::Literal("a".to_string()));
        let b = dfa_for(Regex::Literal("b".to_string()));
        let u = union(&a, &b);
        assert!(u.accepts(&["a".to_string()]));
        assert!(u.accepts(&["b".to_string()]));
        assert!(!u.accepts(&["c".to_string()]));

        let c = concat(&a, &b);
        assert!(c.accepts(&["a".to_string(), "b".to_string()]));
        assert!(!c.accepts(&["a".to_string()]));
    }

    #[test]
    fn language_equivalence_survives_minimization() {
        let re1 = Regex::Literal("a".to_string()).union(Regex::Literal("a".to_string()));
        let re2 = Regex::Literal("a".to_string());
        assert!(dfa_for(re1).language_equivalent(&dfa_for(re2)));
    }
}
