//! The `MultiDiGraph` value type: nodes are dense non-negative integers,
//! edges are labeled and multiple edges between a pair are permitted.
use ahash::AHashMap;
use string_interner::{symbol::SymbolU32, StringInterner};

use crate::error::{Error, Result};

/// An interned edge label. Cheap to copy and compare; resolve back to text
/// with `MultiDiGraph::label_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub(crate) SymbolU32);

/// A directed edge-labeled multigraph over the dense node set `0..n`.
///
/// If the caller's node identifiers are not already a dense `0..n` range,
/// build the graph through [`GraphBuilder`], which establishes the
/// bijection described in the data model.
#[derive(Debug, Clone, Default)]
pub struct MultiDiGraph {
    node_count: usize,
    /// `edges[u]` is the list of `(label, v)` pairs for edges leaving `u`.
    edges: Vec<Vec<(LabelId, usize)>>,
    labels: StringInterner<string_interner::backend::StringBackend<SymbolU32>>,
}

impl MultiDiGraph {
    /// An empty graph over `n` nodes with no edges.
    pub fn new(n: usize) -> Self {
        Self {
            node_count: n,
            edges: vec![Vec::new(); n],
            labels: StringInterner::new(),
        }
    }

    /// Number of nodes, i.e. the dense range is `0..node_count()`.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Add an edge `u --label--> v`. Panics if `u` or `v` is out of range;
    /// callers constructing graphs from untrusted data should validate node
    /// ids first (or use [`GraphBuilder`]).
    pub fn add_edge(&mut self, u: usize, label: &str, v: usize) {
        let label = LabelId(self.labels.get_or_intern(label));
        self.edges[u].push((label, v));
    }

    /// Iterate over all `(u, label, v)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (usize, LabelId, usize)> + '_ {
        self.edges.iter().enumerate().flat_map(|(u, outs)| {
            outs.iter().map(move |&(label, v)| (u, label, v))
        })
    }

    /// Edges leaving `u`.
    pub fn edges_from(&self, u: usize) -> &[(LabelId, usize)] {
        &self.edges[u]
    }

    /// Resolve an interned label back to its text.
    pub fn label_str(&self, label: LabelId) -> &str {
        self.labels.resolve(label.0).unwrap()
    }

    /// Look up the interned id for a label string, if it occurs in the graph.
    pub fn label_id(&self, label: &str) -> Option<LabelId> {
        self.labels.get(label).map(LabelId)
    }

    /// Validate that every id in `nodes` lies in `0..node_count()`.
    pub(crate) fn validate_nodes(&self, nodes: &[usize]) -> Result<()> {
        for &n in nodes {
            if n >= self.node_count {
                return Err(Error::InvalidGraph(n));
            }
        }
        Ok(())
    }
}

/// Builds a [`MultiDiGraph`] from arbitrary, possibly sparse, node keys.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    index: AHashMap<String, usize>,
    edges: Vec<(usize, String, usize)>,
}

impl GraphBuilder {
    /// A builder with no nodes or edges.
    pub fn new() -> Self {
        Self::default()
    }

    fn node_id(&mut self, key: impl Into<String>) -> usize {
        let key = key.into();
        let next = self.index.len();
        *self.index.entry(key).or_insert(next)
    }

    /// Record an edge between two node keys, interning both into the dense
    /// range as they are first seen.
    pub fn add_edge(&mut self, u: impl Into<String>, label: impl Into<String>, v: impl Into<String>) -> &mut Self {
        let u = self.node_id(u);
        let v = self.node_id(v);
        self.edges.push((u, label.into(), v));
        self
    }

    /// Finalize into a dense [`MultiDiGraph`].
    pub fn build(self) -> MultiDiGraph {
        let mut graph = MultiDiGraph::new(self.index.len());
        for (u, label, v) in self.edges {
            graph.add_edge(u, &label, v);
        }
        graph
    }
}
