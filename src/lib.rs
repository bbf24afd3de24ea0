/*!
# cfpq-engine

This crate answers reachability questions over a directed, edge-labeled
multigraph where the allowed walks are constrained by a formal language:
either a regular language (a Regular Path Query, RPQ) or a context-free
language (a Context-Free Path Query, CFPQ).

Given a graph and a pattern, both queries return the set of `(u, v)` node
pairs connected by some walk whose concatenated edge labels form a word in
the pattern's language.

```rust
use cfpq_engine::automaton::regex::Regex;
use cfpq_engine::graph::GraphBuilder;
use cfpq_engine::rpq::rpq;

let mut builder = GraphBuilder::new();
builder
    .add_edge("0", "a", "1")
    .add_edge("1", "a", "2")
    .add_edge("2", "a", "0");
let graph = builder.build();

// a* reaches every node from every node on this cycle.
let pattern = Regex::Literal("a".to_string()).star();
let pairs = rpq(&graph, &pattern, None, None).unwrap();
assert_eq!(pairs.len(), 9);
```

```rust
use cfpq_engine::cfpq::cfpq;
use cfpq_engine::config::Config;
use cfpq_engine::grammar::cfg::{Cfg, Symbol};
use cfpq_engine::graph::GraphBuilder;

// S -> a S b S | epsilon: balanced-parenthesis walks.
let mut cfg = Cfg::new("S");
let s = cfg.start();
cfg.add_production(
    s,
    vec![
        Symbol::Term("a".to_string()),
        Symbol::Var(s),
        Symbol::Term("b".to_string()),
        Symbol::Var(s),
    ],
);
cfg.add_production(s, vec![]);

let mut builder = GraphBuilder::new();
builder
    .add_edge("0", "a", "1")
    .add_edge("1", "a", "2")
    .add_edge("2", "b", "3")
    .add_edge("3", "b", "4");
let graph = builder.build();

let pairs = cfpq(&cfg, &graph, &Config::default(), None, None).unwrap();
assert!(pairs.contains(&(0, 4)));
assert!(!pairs.contains(&(0, 3)));
```

# Overview

The value types are [`graph::MultiDiGraph`] (the host graph) and, for CFPQ,
[`grammar::cfg::Cfg`] (the pattern grammar). [`rpq::rpq`] takes a
[`automaton::regex::Regex`] pattern directly; [`cfpq::cfpq`] takes a `Cfg`
and dispatches to one of three interchangeable fixed-point algorithms
chosen by [`config::CfpqAlgorithm`] — all three compute the same answer, they
differ only in how.

This crate-level documentation is organized as follows:

- [Pipeline](#pipeline): how a query moves from input to boolean-matrix
  automaton and back.
- [Grammar text formats](#grammar-text-formats): the two surface syntaxes
  parsed by [`parser`].
- [Choosing a CFPQ algorithm](#choosing-a-cfpq-algorithm): tradeoffs between
  [`config::CfpqAlgorithm`] variants.

# Pipeline

Both query kinds bottom out in the same primitive: a
[`automaton::bma::Bma`], a bundle of per-label [`automaton::sbm::SparseBoolMatrix`]
over a dense state index. `rpq` builds one BMA from the graph (one state per
node) and one from the pattern's minimized DFA, intersects them by Kronecker
product, and reads off reachable pairs via transitive closure.

`cfpq` cannot intersect a context-free pattern's automaton directly —
context-free languages are not closed under intersection with an arbitrary
automaton in that simple a way — so it instead normalizes the grammar (to
Weak Chomsky Normal Form for [`cfpq::hellings`]/[`cfpq::matrix`], or to a
[`grammar::rsm::Rsm`] for [`cfpq::tensor`]) and runs a worklist or matrix
fixed point that grows a set of derivable `(node, nonterminal, node)` triples
until no production can add another.

# Grammar text formats

[`parser::grammar::parse_grammar`] reads `head -> body_1 | body_2 | ...`
lines (capital-initial tokens are variables, everything else is a terminal,
epsilon may be spelled `epsilon`, `$`, `ε`, `ϵ` or `Є`).
[`parser::ecfg::parse_ecfg`] reads one `head -> regex` line per variable,
routing the body through [`parser::regex::parse_regex`]. Both are optional
conveniences; the value types ([`grammar::cfg::Cfg`], [`grammar::rsm::Ecfg`])
can equally well be built by hand.

# Choosing a CFPQ algorithm

- [`config::CfpqAlgorithm::Hellings`]: simplest to reason about, good for
  small-to-medium grammars and graphs where a worklist's overhead dominates.
- [`config::CfpqAlgorithm::Matrix`]: the default. Favors dense reachability
  (many start/end pairs) where bulk boolean-matrix operations amortize well.
- [`config::CfpqAlgorithm::Tensor`]: skips WCNF normalization, reusing the
  grammar's own recursive structure (its [`grammar::rsm::Rsm`]) as the
  automaton multiplied against the graph. Favors grammars with few but large
  productions.

Every algorithm is cooperatively cancellable through a [`config::CancelToken`]
and bounded by [`config::Config::max_iterations`], so a caller embedding this
crate in a service can bail out of a pathological query rather than block
indefinitely.
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod automaton;
pub mod cfpq;
pub mod config;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod parser;
pub mod rpq;

pub use cfpq::{cfpq, cfpq_cancellable, cfpq_hellings, cfpq_matrix, cfpq_tensor, cyk};
pub use config::{CancelToken, CfpqAlgorithm, Config};
pub use error::{Error, Result};
pub use graph::{GraphBuilder, MultiDiGraph};
pub use rpq::{rpq, rpq_cancellable};
