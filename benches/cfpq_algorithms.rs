use std::time::Duration;

use cfpq_engine::cfpq::cfpq;
use cfpq_engine::config::{CfpqAlgorithm, Config};
use cfpq_engine::grammar::cfg::{Cfg, Symbol};
use cfpq_engine::graph::{GraphBuilder, MultiDiGraph};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// `S -> a S b S | epsilon`, the balanced-parenthesis grammar used across the
/// algorithm's own unit tests.
fn balanced_parens_grammar() -> Cfg {
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
    cfg
}

/// `n` nested `a...b` shells: `0 -a-> 1 -a-> ... -a-> n -b-> n+1 -b-> ... -b-> 2n+1`.
fn nested_graph(n: usize) -> MultiDiGraph {
    let mut builder = GraphBuilder::new();
    for i in 0..n {
        builder.add_edge(i.to_string(), "a", (i + 1).to_string());
    }
    for i in n..2 * n {
        builder.add_edge(i.to_string(), "b", (i + 1).to_string());
    }
    builder.build()
}

fn config_for(algorithm: CfpqAlgorithm) -> Config {
    Config {
        algorithm,
        ..Config::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut c = c.benchmark_group("cfpq_algorithms");
    c.measurement_time(Duration::from_secs(10)).sample_size(50);

    let cfg = balanced_parens_grammar();
    let small_graph = nested_graph(8);
    let medium_graph = nested_graph(32);

    for (name, graph) in [("8 nested shells", &small_graph), ("32 nested shells", &medium_graph)] {
        for algorithm in [CfpqAlgorithm::Hellings, CfpqAlgorithm::Matrix, CfpqAlgorithm::Tensor] {
            let config = config_for(algorithm);
            c.bench_function(&format!("{algorithm} on {name}"), |b| {
                b.iter(|| cfpq(black_box(&cfg), black_box(graph), black_box(&config), None, None).unwrap())
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
