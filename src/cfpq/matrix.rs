//! Per-nonterminal sparse boolean matrix fixed point: one `n x n` matrix
//! `T_N` per nonterminal `N`, seeded from terminal and epsilon productions,
//! then closed under `T_P |= T_M * T_N` for every binary production `P -> M
//! N` until no matrix gains a nonzero cell.
use ahash::AHashSet;

use crate::automaton::sbm::SparseBoolMatrix;
use crate::config::CancelToken;
use crate::error::{Error, Result};
use crate::grammar::cfg::{Symbol, VarId};
use crate::grammar::normalize::Wcnf;
use crate::graph::MultiDiGraph;

/// All `(i, N, j)` triples derivable in `wcnf` over `graph`, computed by
/// iterating the per-nonterminal matrix fixed point to convergence.
pub fn cfpq_matrix(
    wcnf: &Wcnf,
    graph: &MultiDiGraph,
    cancel: &CancelToken,
    max_iterations: Option<usize>,
) -> Result<AHashSet<(usize, VarId, usize)>> {
    let cfg = wcnf.cfg();
    let n = graph.node_count();
    let vars = cfg.variables();

    let mut matrices: Vec<SparseBoolMatrix> = vars.iter().map(|_| SparseBoolMatrix::new(n, n)).collect();
    let index_of = |v: VarId| vars.iter().position(|&x| x == v).unwrap();

    for (u, label, v) in graph.edges() {
        let label_str = graph.label_str(label);
        for p in cfg.productions() {
            if let [Symbol::Term(t)] = p.body.as_slice() {
                if t == label_str {
                    matrices[index_of(p.head)].set(u, v, true);
                }
            }
        }
    }
    for p in cfg.productions() {
        if p.body.is_empty() {
            let m = &mut matrices[index_of(p.head)];
            for v in 0..n {
                m.set(v, v, true);
            }
        }
    }

    let binary: Vec<(VarId, VarId, VarId)> = cfg
        .productions()
        .iter()
        .filter_map(|p| match p.body.as_slice() {
            [Symbol::Var(m), Symbol::Var(n)] => Some((p.head, *m, *n)),
            _ => None,
        })
        .collect();

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
        log::trace!("cfpq_matrix: sweep {sweeps}");
        let mut changed = false;
        for &(head, m, n_) in &binary {
            let product = SparseBoolMatrix::matmul(&matrices[index_of(m)], &matrices[index_of(n_)])?;
            let before = matrices[index_of(head)].nnz();
            matrices[index_of(head)].or_into(&product)?;
            if matrices[index_of(head)].nnz() != before {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut result = AHashSet::default();
    for (idx, v) in vars.iter().enumerate() {
        for (i, j) in matrices[idx].nonzero() {
            result.insert((i, *v, j));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::cfg::Cfg;
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
    fn matches_hellings_on_the_same_grammar_and_graph() {
        let cfg = ab_grammar();
        let s = cfg.start();
        let wcnf = to_wcnf(&cfg);
        let mut b = GraphBuilder::new();
        b.add_edge("0", "a", "1")
            .add_edge("1", "a", "2")
            .add_edge("2", "b", "3")
            .add_edge("3", "b", "4");
        let graph = b.build();
        let matrix_triples = cfpq_matrix(&wcnf, &graph, &CancelToken::new(), None).unwrap();
        let hellings_triples =
            crate::cfpq::hellings::cfpq_hellings(&wcnf, &graph, &CancelToken::new(), None).unwrap();
        assert_eq!(matrix_triples, hellings_triples);
        assert!(matrix_triples.contains(&(0, s, 4)));
    }
}
