//! The sealed `CfpqEngine` trait: a common harness for the three fixed-point
//! algorithms, so [`crate::cfpq::cfpq`] can dispatch through a trait object
//! instead of a match arm duplicated at every call site. Sealed because
//! there are exactly three algorithms the data model recognizes
//! ([`crate::config::CfpqAlgorithm`]); a fourth would need its own grounding
//! in the fixed-point theory the other three share, not just a trait impl.
use ahash::AHashSet;

use crate::config::CancelToken;
use crate::error::Result;
use crate::grammar::cfg::{Cfg, VarId};
use crate::graph::MultiDiGraph;

mod sealed {
    pub trait Sealed {}
}

/// One of the three CFPQ fixed-point algorithms.
pub trait CfpqEngine: sealed::Sealed {
    /// All `(i, N, j)` triples derivable in `cfg` over `graph`.
    fn derive(
        &self,
        cfg: &Cfg,
        graph: &MultiDiGraph,
        cancel: &CancelToken,
        max_iterations: Option<usize>,
    ) -> Result<AHashSet<(usize, VarId, usize)>>;
}

/// Worklist closure over WCNF triples.
pub struct Hellings;
/// Per-nonterminal sparse boolean matrix fixed point.
pub struct Matrix;
/// RSM x graph Kronecker-product fixed point.
pub struct Tensor;

impl sealed::Sealed for Hellings {}
impl sealed::Sealed for Matrix {}
impl sealed::Sealed for Tensor {}

impl CfpqEngine for Hellings {
    fn derive(
        &self,
        cfg: &Cfg,
        graph: &MultiDiGraph,
        cancel: &CancelToken,
        max_iterations: Option<usize>,
    ) -> Result<AHashSet<(usize, VarId, usize)>> {
        let wcnf = crate::grammar::normalize::to_wcnf(cfg);
        crate::cfpq::hellings::cfpq_hellings(&wcnf, graph, cancel, max_iterations)
    }
}

impl CfpqEngine for Matrix {
    fn derive(
        &self,
        cfg: &Cfg,
        graph: &MultiDiGraph,
        cancel: &CancelToken,
        max_iterations: Option<usize>,
    ) -> Result<AHashSet<(usize, VarId, usize)>> {
        let wcnf = crate::grammar::normalize::to_wcnf(cfg);
        crate::cfpq::matrix::cfpq_matrix(&wcnf, graph, cancel, max_iterations)
    }
}

impl CfpqEngine for Tensor {
    fn derive(
        &self,
        cfg: &Cfg,
        graph: &MultiDiGraph,
        cancel: &CancelToken,
        max_iterations: Option<usize>,
    ) -> Result<AHashSet<(usize, VarId, usize)>> {
        crate::cfpq::tensor::cfpq_tensor(cfg, graph, cancel, max_iterations)
    }
}
