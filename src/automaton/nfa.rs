//! NFA/DFA value type: a tuple `(States, Sigma, delta, S0, F)`. States are
//! dense `u32` indices; determinism is a property of `delta`, not a type
//! constraint.
use ahash::{AHashMap, AHashSet};

/// A nondeterministic finite automaton over string-labeled transitions, with
/// an explicit epsilon-transition relation.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    num_states: u32,
    /// `transitions[state]` maps a label to the set of destination states.
    transitions: Vec<AHashMap<String, AHashSet<u32>>>,
    epsilons: Vec<AHashSet<u32>>,
    start: AHashSet<u32>,
    finals: AHashSet<u32>,
}

impl Nfa {
    /// An NFA with no states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh state and return its id.
    pub fn new_state(&mut self) -> u32 {
        let id = self.num_states;
        self.num_states += 1;
        self.transitions.push(AHashMap::default());
        self.epsilons.push(AHashSet::default());
        id
    }

    /// Number of states.
    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    /// Add `q --label--> q'`.
    pub fn add_transition(&mut self, q: u32, label: &str, q_prime: u32) {
        self.transitions[q as usize]
            .entry(label.to_string())
            .or_default()
            .insert(q_prime);
    }

    /// Add an epsilon transition `q --eps--> q'`.
    pub fn add_epsilon(&mut self, q: u32, q_prime: u32) {
        self.epsilons[q as usize].insert(q_prime);
    }

    /// Mark `q` as a start state (additive; an NFA may have several).
    pub fn set_start(&mut self, q: u32) {
        self.start.insert(q);
    }

    /// Mark `q` as a final/accepting state (additive).
    pub fn set_final(&mut self, q: u32) {
        self.finals.insert(q);
    }

    /// Start states.
    pub fn start_states(&self) -> &AHashSet<u32> {
        &self.start
    }

    /// Final states.
    pub fn final_states(&self) -> &AHashSet<u32> {
        &self.finals
    }

    /// All distinct alphabet symbols that appear on some transition.
    pub fn alphabet(&self) -> AHashSet<String> {
        self.transitions
            .iter()
            .flat_map(|m| m.keys().cloned())
            .collect()
    }

    /// Destinations of `q` on `label` (excluding epsilon closure).
    pub fn step(&self, q: u32, label: &str) -> AHashSet<u32> {
        self.transitions[q as usize]
            .get(label)
            .cloned()
            .unwrap_or_default()
    }

    /// The epsilon-closure of a set of states.
    pub fn epsilon_closure(&self, states: &AHashSet<u32>) -> AHashSet<u32> {
        let mut closure = states.clone();
        let mut stack: Vec<u32> = states.iter().copied().collect();
        while let Some(q) = stack.pop() {
            for &q_prime in &self.epsilons[q as usize] {
                if closure.insert(q_prime) {
                    stack.push(q_prime);
                }
            }
        }
        closure
    }

    /// All `(u, label, v)` transition triples (epsilon transitions excluded).
    pub fn transition_triples(&self) -> impl Iterator<Item = (u32, &str, u32)> + '_ {
        self.transitions.iter().enumerate().flat_map(|(q, m)| {
            m.iter()
                .flat_map(move |(label, dests)| dests.iter().map(move |&d| (q as u32, label.as_str(), d)))
        })
    }

    /// Build an NFA directly from a graph: one state per node, one
    /// transition per edge. If `start_nodes`/`final_nodes` are `None`, every
    /// node is both a start and a final state.
    pub fn from_graph(
        graph: &crate::graph::MultiDiGraph,
        start_nodes: Option<&[usize]>,
        final_nodes: Option<&[usize]>,
    ) -> Nfa {
        let n = graph.node_count();
        let mut nfa = Nfa::new();
        for _ in 0..n {
            nfa.new_state();
        }
        for (u, label, v) in graph.edges() {
            nfa.add_transition(u as u32, graph.label_str(label), v as u32);
        }
        match start_nodes {
            Some(nodes) => nodes.iter().for_each(|&s| nfa.set_start(s as u32)),
            None => (0..n as u32).for_each(|s| nfa.set_start(s)),
        }
        match final_nodes {
            Some(nodes) => nodes.iter().for_each(|&f| nfa.set_final(f as u32)),
            None => (0..n as u32).for_each(|f| nfa.set_final(f)),
        }
        nfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_closure_follows_chains() {
        let mut nfa = Nfa::new();
        let a = nfa.new_state();
        let b = nfa.new_state();
        let c = nfa.new_state();
        nfa.add_epsilon(a, b);
        nfa.add_epsilon(b, c);
        let closure = nfa.epsilon_closure(&[a].into_iter().collect());
        assert_eq!(closure, [a, b, c].into_iter().collect());
    }

    #[test]
    fn from_graph_defaults_every_node_to_start_and_final() {
        let mut g = crate::graph::MultiDiGraph::new(2);
        g.add_edge(0, "a", 1);
        let nfa = Nfa::from_graph(&g, None, None);
        assert_eq!(nfa.start_states(), &[0, 1].into_iter().collect());
        assert_eq!(nfa.final_states(), &[0, 1].into_iter().collect());
    }
}
