//! The `cfpq` query surface: normalizes inputs as each algorithm requires,
//! dispatches to one of the three engines by [`CfpqAlgorithm`], then filters
//! the raw `(i, N, j)` triples down to the caller's start variable and
//! optional endpoint sets.
use ahash::AHashSet;

use crate::cfpq::engine::{CfpqEngine, Hellings, Matrix, Tensor};
use crate::config::{CancelToken, CfpqAlgorithm, Config};
use crate::error::Result;
use crate::grammar::cfg::Cfg;
use crate::graph::MultiDiGraph;

/// Run a context-free path query: `(u, v)` is in the result iff there is a
/// walk `u ->* v` in `graph` whose concatenated edge labels form a word
/// derivable from `cfg`'s start symbol. Use [`Cfg::with_start`] first to
/// query from a different symbol without mutating the caller's grammar.
pub fn cfpq(
    cfg: &Cfg,
    graph: &MultiDiGraph,
    config: &Config,
    start_nodes: Option<&[usize]>,
    final_nodes: Option<&[usize]>,
) -> Result<AHashSet<(usize, usize)>> {
    cfpq_cancellable(cfg, graph, config, &CancelToken::new(), start_nodes, final_nodes)
}

/// As [`cfpq`], but checked against `cancel` between fixed-point sweeps.
pub fn cfpq_cancellable(
    cfg: &Cfg,
    graph: &MultiDiGraph,
    config: &Config,
    cancel: &CancelToken,
    start_nodes: Option<&[usize]>,
    final_nodes: Option<&[usize]>,
) -> Result<AHashSet<(usize, usize)>> {
    if let Some(nodes) = start_nodes {
        graph.validate_nodes(nodes)?;
    }
    if let Some(nodes) = final_nodes {
        graph.validate_nodes(nodes)?;
    }

    log::debug!("cfpq: algorithm={:?} start symbol={}", config.algorithm, cfg.var_name(cfg.start()));

    let engine: &dyn CfpqEngine = match config.algorithm {
        CfpqAlgorithm::Hellings => &Hellings,
        CfpqAlgorithm::Matrix => &Matrix,
        CfpqAlgorithm::Tensor => &Tensor,
    };
    let triples = engine.derive(cfg, graph, cancel, config.max_iterations)?;

    let start = cfg.start();
    let start_set: Option<AHashSet<usize>> = start_nodes.map(|n| n.iter().copied().collect());
    let final_set: Option<AHashSet<usize>> = final_nodes.map(|n| n.iter().copied().collect());
    Ok(triples
        .into_iter()
        .filter(|&(i, n, j)| {
            n == start
                && start_set.as_ref().map_or(true, |s| s.contains(&i))
                && final_set.as_ref().map_or(true, |s| s.contains(&j))
        })
        .map(|(i, _, j)| (i, j))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::cfg::Symbol;

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
    fn all_three_algorithms_agree() {
        let cfg = ab_grammar();
        let mut b = crate::graph::GraphBuilder::new();
        b.add_edge("0", "a", "1")
            .add_edge("1", "a", "2")
            .add_edge("2", "b", "3")
            .add_edge("3", "b", "4");
        let graph = b.build();

        let mut hellings_cfg = Config::default();
        hellings_cfg.algorithm = CfpqAlgorithm::Hellings;
        let mut matrix_cfg = Config::default();
        matrix_cfg.algorithm = CfpqAlgorithm::Matrix;
        let mut tensor_cfg = Config::default();
        tensor_cfg.algorithm = CfpqAlgorithm::Tensor;

        let h = cfpq(&cfg, &graph, &hellings_cfg, None, None).unwrap();
        let m = cfpq(&cfg, &graph, &matrix_cfg, None, None).unwrap();
        let t = cfpq(&cfg, &graph, &tensor_cfg, None, None).unwrap();
        assert_eq!(h, m);
        assert_eq!(m, t);
        assert!(h.contains(&(0, 4)));
    }

    #[test]
    fn endpoint_filters_restrict_results() {
        let cfg = ab_grammar();
        let mut b = crate::graph::GraphBuilder::new();
        b.add_edge("0", "a", "1")
            .add_edge("1", "a", "2")
            .add_edge("2", "b", "3")
            .add_edge("3", "b", "4");
        let graph = b.build();
        let config = Config::default();
        let pairs = cfpq(&cfg, &graph, &config, Some(&[0]), Some(&[4])).unwrap();
        assert_eq!(pairs, [(0, 4)].into_iter().collect());
        let pairs = cfpq(&cfg, &graph, &config, Some(&[1]), None).unwrap();
        assert!(pairs.is_empty());
    }
}
