//! The configuration module for reachability queries.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Which CFPQ fixed-point algorithm to run. See the `cfpq` module docs for the
/// tradeoffs between the three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, strum::Display)]
pub enum CfpqAlgorithm {
    /// Worklist closure over WCNF triples.
    Hellings,
    /// Per-nonterminal sparse boolean matrix fixed point.
    Matrix,
    /// Kronecker product between RSM boxes and the graph.
    Tensor,
}

impl Default for CfpqAlgorithm {
    fn default() -> Self {
        CfpqAlgorithm::Matrix
    }
}

/// The public configuration of a reachability query. This should suffice
/// for most scenarios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Config {
    /// Which CFPQ algorithm `cfpq` dispatches to. Ignored by `rpq`, which has
    /// only one strategy.
    pub algorithm: CfpqAlgorithm,
    /// An upper bound on fixed-point sweeps/worklist pops, guarding against
    /// pathological grammars during testing. `None` means unbounded.
    pub max_iterations: Option<usize>,
    /// The default start symbol used when a grammar text does not declare
    /// one explicitly. The default is `S`, per the documented grammar text
    /// format.
    pub default_start_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: CfpqAlgorithm::default(),
            max_iterations: None,
            default_start_symbol: "S".to_string(),
        }
    }
}

/// A cooperative cancellation token. Fixed-point engines check it between
/// sweeps; once set, the in-progress query returns `Error::Cancelled` and
/// discards its partial result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Safe to call from another thread.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
