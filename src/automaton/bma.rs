//! Boolean-Matrix Automaton: compiles an [`Nfa`] into
//! per-label sparse boolean matrices plus a dense state index; intersects by
//! Kronecker product; extracts reachable pairs via transitive closure.
use ahash::{AHashMap, AHashSet};

use crate::automaton::nfa::Nfa;
use crate::automaton::sbm::SparseBoolMatrix;
use crate::error::Result;

/// A bundle of per-label sparse boolean matrices over a shared dense state
/// index, with start/final sets recorded as indices into that space.
#[derive(Debug, Clone)]
pub struct Bma {
    n_states: usize,
    start: AHashSet<usize>,
    finals: AHashSet<usize>,
    matrices: AHashMap<String, SparseBoolMatrix>,
}

impl Bma {
    /// Dense-index `nfa`'s states and populate one matrix per label.
    pub fn from_nfa(nfa: &Nfa) -> Bma {
        let n_states = nfa.num_states() as usize;
        let mut matrices: AHashMap<String, SparseBoolMatrix> = AHashMap::default();
        for (q, label, q_prime) in nfa.transition_triples() {
            matrices
                .entry(label.to_string())
                .or_insert_with(|| SparseBoolMatrix::new(n_states, n_states))
                .set(q as usize, q_prime as usize, true);
        }
        Bma {
            n_states,
            start: nfa.start_states().iter().map(|&s| s as usize).collect(),
            finals: nfa.final_states().iter().map(|&s| s as usize).collect(),
            matrices,
        }
    }

    /// Number of states in the dense index.
    pub fn num_states(&self) -> usize {
        self.n_states
    }

    /// Start-state indices.
    pub fn start_states(&self) -> &AHashSet<usize> {
        &self.start
    }

    /// Final-state indices.
    pub fn final_states(&self) -> &AHashSet<usize> {
        &self.finals
    }

    /// The per-label matrices.
    pub fn matrices(&self) -> &AHashMap<String, SparseBoolMatrix> {
        &self.matrices
    }

    /// Intersection by Kronecker product on shared labels: the composite
    /// state space is indexed `i * other.n_states + j`.
    pub fn intersect(&self, other: &Bma) -> Bma {
        let mut matrices = AHashMap::default();
        for (label, my_matrix) in &self.matrices {
            if let Some(other_matrix) = other.matrices.get(label) {
                matrices.insert(label.clone(), SparseBoolMatrix::kron(my_matrix, other_matrix));
            }
        }
        let mut start = AHashSet::default();
        for &i in &self.start {
            for &j in &other.start {
                start.insert(i * other.n_states + j);
            }
        }
        let mut finals = AHashSet::default();
        for &i in &self.finals {
            for &j in &other.finals {
                finals.insert(i * other.n_states + j);
            }
        }
        Bma {
            n_states: self.n_states * other.n_states,
            start,
            finals,
            matrices,
        }
    }

    /// Sum every per-label matrix into one `n x n` adjacency matrix.
    fn union_of_labels(&self) -> SparseBoolMatrix {
        let mut sum = SparseBoolMatrix::new(self.n_states, self.n_states);
        for m in self.matrices.values() {
            sum.or_into(m).expect("same-shape matrices by construction");
        }
        sum
    }

    /// Transitive closure of the label-summed adjacency matrix, then the set
    /// of `(i, j)` with `i` a start state, `j` a final state and `T[i,j]`
    /// true. If `divisor` is given, composite indices are mapped back to
    /// host-graph node ids by integer division (e.g. `divisor` = the other
    /// operand's state count after a Kronecker intersection).
    pub fn reachable_pairs(&self, divisor: Option<usize>) -> Result<AHashSet<(usize, usize)>> {
        let adjacency = self.union_of_labels();
        let closure = adjacency.transitive_closure()?;
        let mut pairs = AHashSet::default();
        for &i in &self.start {
            for &j in &self.finals {
                if closure.get(i, j) {
                    let (pi, pj) = match divisor {
                        Some(d) if d > 0 => (i / d, j / d),
                        _ => (i, j),
                    };
                    pairs.insert((pi, pj));
                }
            }
        }
        Ok(pairs)
    }
}
