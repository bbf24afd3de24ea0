//! Tensor (RSM x graph) fixed point: the graph and the grammar's Recursive
//! State Machine are both boolean-matrix automata; their Kronecker product
//! exposes "a box's start state reaches its own final state" as ordinary
//! reachability, and every such pair is a newly derived nonterminal edge fed
//! back into the graph side for the next round.
use ahash::{AHashMap, AHashSet};

use crate::automaton::sbm::SparseBoolMatrix;
use crate::config::CancelToken;
use crate::error::{Error, Result};
use crate::grammar::cfg::{Cfg, VarId};
use crate::grammar::rsm::{cfg_to_ecfg, ecfg_to_rsm, Rsm, NONTERMINAL_PREFIX};
use crate::graph::MultiDiGraph;

/// All `(i, N, j)` triples derivable in `cfg` over `graph`, computed via the
/// RSM/graph Kronecker-product fixed point. Unlike [`crate::cfpq::hellings`]
/// and [`crate::cfpq::matrix`], this algorithm works from the grammar
/// directly (through its RSM) and never normalizes to WCNF.
pub fn cfpq_tensor(
    cfg: &Cfg,
    graph: &MultiDiGraph,
    cancel: &CancelToken,
    max_iterations: Option<usize>,
) -> Result<AHashSet<(usize, VarId, usize)>> {
    let rsm = ecfg_to_rsm(&cfg_to_ecfg(cfg)).minimize();
    let graph_n = graph.node_count();

    let layout = RsmLayout::build(&rsm);
    if layout.total_states == 0 {
        return Ok(AHashSet::default());
    }

    let mut rsm_matrices: AHashMap<String, SparseBoolMatrix> =
        AHashMap::default();
    for b in rsm.boxes() {
        let offset = layout.offset[&b.variable];
        for label in b.dfa.alphabet() {
            for from in 0..b.dfa.num_states() as u32 {
                if let Some(to) = b.dfa.step(from, label) {
                    rsm_matrices
                        .entry(label.clone())
                        .or_insert_with(|| SparseBoolMatrix::new(layout.total_states, layout.total_states))
                        .set(offset + from as usize, offset + to as usize, true);
                }
            }
        }
    }

    let mut graph_matrices: AHashMap<String, SparseBoolMatrix> = AHashMap::default();
    for (u, label, v) in graph.edges() {
        graph_matrices
            .entry(graph.label_str(label).to_string())
            .or_insert_with(|| SparseBoolMatrix::new(graph_n, graph_n))
            .set(u, v, true);
    }
    for v in cfg.variables() {
        let key = format!("{NONTERMINAL_PREFIX}{}", cfg.var_name(v));
        graph_matrices
            .entry(key)
            .or_insert_with(|| SparseBoolMatrix::new(graph_n, graph_n));
    }

    let total_n = layout.total_states * graph_n;
    let mut sweeps = 0usize;
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(limit) = max_iterations {
            sweeps += 1;
            if sweeps > limit {
                return Err(Error::Cancelled);
            }
        }
        log::trace!("cfpq_tensor: sweep {sweeps}");

        let mut combined = SparseBoolMatrix::new(total_n, total_n);
        for (label, rsm_m) in &rsm_matrices {
            if let Some(graph_m) = graph_matrices.get(label) {
                combined.or_into(&SparseBoolMatrix::kron(rsm_m, graph_m))?;
            }
        }
        for k in 0..total_n {
            combined.set(k, k, true);
        }
        let closure = combined.transitive_closure()?;

        let mut changed = false;
        for b in rsm.boxes() {
            let offset = layout.offset[&b.variable];
            let start_global = offset + b.dfa.start() as usize;
            let key = format!("{NONTERMINAL_PREFIX}{}", rsm.var_name(b.variable));
            for &local_final in b.dfa.final_states() {
                let final_global = offset + local_final as usize;
                for i in 0..graph_n {
                    let row = start_global * graph_n + i;
                    for j in 0..graph_n {
                        let col = final_global * graph_n + j;
                        if closure.get(row, col) {
                            let m = graph_matrices.get_mut(&key).unwrap();
                            if !m.get(i, j) {
                                m.set(i, j, true);
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    let mut result = AHashSet::default();
    for v in cfg.variables() {
        let key = format!("{NONTERMINAL_PREFIX}{}", cfg.var_name(v));
        if let Some(m) = graph_matrices.get(&key) {
            for (i, j) in m.nonzero() {
                result.insert((i, v, j));
            }
        }
    }
    Ok(result)
}

/// Assigns each RSM box a disjoint range of global state ids so all boxes
/// can share one dense combined automaton.
struct RsmLayout {
    offset: AHashMap<VarId, usize>,
    total_states: usize,
}

impl RsmLayout {
    fn build(rsm: &Rsm) -> RsmLayout {
        let mut offset = AHashMap::default();
        let mut total_states = 0usize;
        let mut boxes: Vec<_> = rsm.boxes().collect();
        boxes.sort_by_key(|b| b.variable);
        for b in boxes {
            offset.insert(b.variable, total_states);
            total_states += b.dfa.num_states();
        }
        RsmLayout { offset, total_states }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CancelToken;
    use crate::grammar::cfg::{Cfg, Symbol};
    use crate::grammar::normalize::to_wcnf;
    use crate::graph::GraphBuilder;

    fn ab_grammar() -> Cfg {
        let mut cfg = Cfg::new("S");
        let s = cfg.start();
        let a = cfg.intern_var("A");
        let b = cfg.intern_var("B");
        let s1 = cfg.intern_var("S1");
        cfg.add_production(s, vec![Symbol::Var(a), Symbol::Var(b)]);
        cfg.add_production(s, vec![Symbol::Var(a), Symbol::Var(s1)]);
        cfg.add_production(s1, vec![Symbol::Var(s), Symbol::Var(b)]);
        cfg.add_production(a, vec![Symbol::Term("a".to_string())]);
        cfg.add_production(b, vec![Symbol::Term("b".to_string())]);
        cfg
    }

    #[test]
    fn matches_matrix_algorithm_on_the_same_grammar_and_graph() {
        let cfg = ab_grammar();
        let s = cfg.start();
        let mut b = GraphBuilder::new();
        b.add_edge("0", "a", "1")
            .add_edge("1", "a", "2")
            .add_edge("2", "b", "3")
            .add_edge("3", "b", "4");
        let graph = b.build();
        let tensor_triples = cfpq_tensor(&cfg, &graph, &CancelToken::new(), None).unwrap();
        let wcnf = to_wcnf(&cfg);
        let matrix_triples =
            crate::cfpq::matrix::cfpq_matrix(&wcnf, &graph, &CancelToken::new(), None).unwrap();
        assert_eq!(tensor_triples, matrix_triples);
        assert!(tensor_triples.contains(&(0, s, 4)));
    }

    #[test]
    fn epsilon_accepting_variable_derives_every_reflexive_pair() {
        let mut cfg = Cfg::new("S");
        let s = cfg.start();
        cfg.add_production(s, vec![]);
        let mut b = GraphBuilder::new();
        b.add_edge("0", "a", "1");
        let graph = b.build();
        let triples = cfpq_tensor(&cfg, &graph, &CancelToken::new(), None).unwrap();
        assert!(triples.contains(&(0, s, 0)));
        assert!(triples.contains(&(1, s, 1)));
    }
}
