//! Hellings' worklist closure algorithm: incrementally grows a set of
//! `(i, N, j)` triples meaning nonterminal `N` derives some walk `i ->* j`,
//! combining two triples through a WCNF binary production whenever one's
//! right endpoint meets the other's left endpoint.
use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::config::CancelToken;
use crate::error::{Error, Result};
use crate::grammar::cfg::{Symbol, VarId};
use crate::grammar::normalize::Wcnf;
use crate::graph::MultiDiGraph;

/// All `(i, N, j)` triples derivable in `wcnf` over `graph`: `N` derives a
/// walk from node `i` to node `j`. Callers filter down to a single start
/// variable and/or endpoint set (see [`crate::cfpq::cfpq`]).
pub fn cfpq_hellings(
    wcnf: &Wcnf,
    graph: &MultiDiGraph,
    cancel: &CancelToken,
    max_iterations: Option<usize>,
) -> Result<AHashSet<(usize, VarId, usize)>> {
    let cfg = wcnf.cfg();

    // Index binary productions P -> M N by the (M, N) body pair, so a newly
    // combined triple can look up every head it can become.
    let mut body2: AHashMap<(VarId, VarId), Vec<VarId>> = AHashMap::default();
    for p in cfg.productions() {
        if let [Symbol::Var(m), Symbol::Var(n)] = p.body.as_slice() {
            body2.entry((*m, *n)).or_default().push(p.head);
        }
    }

    let mut state = HellingsState::default();

    for (u, label, v) in graph.edges() {
        let label_str = graph.label_str(label);
        for p in cfg.productions() {
            if let [Symbol::Term(t)] = p.body.as_slice() {
                if t == label_str {
                    state.insert(u, p.head, v);
                }
            }
        }
    }
    for p in cfg.productions() {
        if p.body.is_empty() {
            for v in 0..graph.node_count() {
                state.insert(v, p.head, v);
            }
        }
    }

    let mut sweeps = 0usize;
    while let Some((i, n, j)) = state.worklist.pop_front() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(limit) = max_iterations {
            sweeps += 1;
            if sweeps > limit {
                return Err(Error::Cancelled);
            }
        }
        if let Some(pairs) = state.ending_at.get(&i).cloned() {
            for (k, m) in pairs {
                if let Some(heads) = body2.get(&(m, n)).cloned() {
                    for head in heads {
                        state.insert(k, head, j);
                    }
                }
            }
        }
        if let Some(pairs) = state.starting_at.get(&j).cloned() {
            for (m, l) in pairs {
                if let Some(heads) = body2.get(&(n, m)).cloned() {
                    for head in heads {
                        state.insert(i, head, l);
                    }
                }
            }
        }
    }

    Ok(state.r)
}

/// The worklist closure's mutable bookkeeping: the triple set itself plus
/// two reverse indices so a newly discovered triple can find every existing
/// triple it combines with in O(1) amortized lookups.
#[derive(Default)]
struct HellingsState {
    r: AHashSet<(usize, VarId, usize)>,
    ending_at: AHashMap<usize, Vec<(usize, VarId)>>,
    starting_at: AHashMap<usize, Vec<(VarId, usize)>>,
    worklist: VecDeque<(usize, VarId, usize)>,
}

impl HellingsState {
    fn insert(&mut self, i: usize, n: VarId, j: usize) {
        if self.r.insert((i, n, j)) {
            self.ending_at.entry(j).or_default().push((i, n));
            self.starting_at.entry(i).or_default().push((n, j));
            self.worklist.push_back((i, n, j));
        }
    }
}
