//! Regular Path Queries: reachability between graph nodes constrained by a
//! regular language.
use ahash::AHashSet;

use crate::automaton::bma::Bma;
use crate::automaton::dfa::Dfa;
use crate::automaton::nfa::Nfa;
use crate::automaton::regex::Regex;
use crate::config::CancelToken;
use crate::error::Result;
use crate::graph::MultiDiGraph;

/// Run a regular path query: `(u, v)` is in the result iff there is a walk
/// `u ->* v` in `graph` whose concatenated edge labels form a word in the
/// language of `pattern`.
///
/// `start_nodes`/`final_nodes` restrict which graph nodes may open/close a
/// walk; `None` means every node is eligible, matching
/// [`Nfa::from_graph`]'s default.
pub fn rpq(
    graph: &MultiDiGraph,
    pattern: &Regex,
    start_nodes: Option<&[usize]>,
    final_nodes: Option<&[usize]>,
) -> Result<AHashSet<(usize, usize)>> {
    rpq_cancellable(graph, pattern, start_nodes, final_nodes, &CancelToken::new())
}

/// As [`rpq`], but checked against `cancel` before the (possibly expensive)
/// transitive closure step.
pub fn rpq_cancellable(
    graph: &MultiDiGraph,
    pattern: &Regex,
    start_nodes: Option<&[usize]>,
    final_nodes: Option<&[usize]>,
    cancel: &CancelToken,
) -> Result<AHashSet<(usize, usize)>> {
    if let Some(nodes) = start_nodes {
        graph.validate_nodes(nodes)?;
    }
    if let Some(nodes) = final_nodes {
        graph.validate_nodes(nodes)?;
    }

    log::debug!(
        "rpq: graph with {} nodes, {} start filter, {} final filter",
        graph.node_count(),
        start_nodes.map_or("no".to_string(), |n| n.len().to_string()),
        final_nodes.map_or("no".to_string(), |n| n.len().to_string()),
    );

    let graph_nfa = Nfa::from_graph(graph, start_nodes, final_nodes);
    let pattern_dfa = Dfa::from_nfa(&pattern.to_nfa()).minimize();
    let pattern_nfa = dfa_to_single_path_nfa(&pattern_dfa);

    let graph_bma = Bma::from_nfa(&graph_nfa);
    let pattern_bma = Bma::from_nfa(&pattern_nfa);
    let pattern_states = pattern_bma.num_states();

    if cancel.is_cancelled() {
        return Err(crate::error::Error::Cancelled);
    }

    let intersection = graph_bma.intersect(&pattern_bma);
    intersection.reachable_pairs(Some(pattern_states))
}

/// Rebuild a DFA as an `Nfa` so it can be fed through [`Bma::from_nfa`]
/// without a separate boolean-matrix code path for deterministic automata.
fn dfa_to_single_path_nfa(dfa: &Dfa) -> Nfa {
    let mut nfa = Nfa::new();
    for _ in 0..dfa.num_states() {
        nfa.new_state();
    }
    for label in dfa.alphabet() {
        for from in 0..dfa.num_states() as u32 {
            if let Some(to) = dfa.step(from, label) {
                nfa.add_transition(from, label, to);
            }
        }
    }
    nfa.set_start(dfa.start());
    for f in dfa.final_states() {
        nfa.set_final(*f);
    }
    nfa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn cycle_graph() -> MultiDiGraph {
        // 0 --a--> 1 --a--> 2 --a--> 0
        let mut b = GraphBuilder::new();
        b.add_edge("0", "a", "1")
            .add_edge("1", "a", "2")
            .add_edge("2", "a", "0");
        b.build()
    }

    #[test]
    fn star_of_single_label_reaches_every_node_on_a_cycle() {
        let g = cycle_graph();
        let pattern = Regex::Literal("a".to_string()).star();
        let pairs = rpq(&g, &pattern, None, None).unwrap();
        for u in 0..3 {
            for v in 0..3 {
                assert!(pairs.contains(&(u, v)), "expected {u} -> {v} via a*");
            }
        }
    }

    #[test]
    fn single_label_reaches_only_direct_successor() {
        let g = cycle_graph();
        let pattern = Regex::Literal("a".to_string());
        let pairs = rpq(&g, &pattern, None, None).unwrap();
        assert_eq!(pairs, [(0, 1), (1, 2), (2, 0)].into_iter().collect());
    }

    #[test]
    fn start_and_final_filters_restrict_endpoints() {
        let g = cycle_graph();
        let pattern = Regex::Literal("a".to_string()).star();
        let pairs = rpq(&g, &pattern, Some(&[0]), Some(&[2])).unwrap();
        assert_eq!(pairs, [(0, 2)].into_iter().collect());
    }

    #[test]
    fn out_of_range_node_is_an_error() {
        let g = cycle_graph();
        let pattern = Regex::Literal("a".to_string());
        assert!(rpq(&g, &pattern, Some(&[99]), None).is_err());
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let g = cycle_graph();
        let pattern = Regex::Literal("a".to_string());
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            rpq_cancellable(&g, &pattern, None, None, &cancel),
            Err(crate::error::Error::Cancelled)
        ));
    }
}
