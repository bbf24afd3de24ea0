use std::time::Duration;

use cfpq_engine::automaton::regex::Regex;
use cfpq_engine::graph::{GraphBuilder, MultiDiGraph};
use cfpq_engine::rpq::rpq;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A cycle `0 -a-> 1 -a-> 2 -a-> ... -a-> n-1 -a-> 0`, the worst case for a
/// reflexive-transitive pattern since every node reaches every other.
fn cycle_graph(n: usize) -> MultiDiGraph {
    let mut builder = GraphBuilder::new();
    for i in 0..n {
        builder.add_edge(i.to_string(), "a", ((i + 1) % n).to_string());
    }
    builder.build()
}

/// Two interleaved label cycles sharing the same node set, for patterns that
/// alternate between two letters.
fn two_label_graph(n: usize) -> MultiDiGraph {
    let mut builder = GraphBuilder::new();
    for i in 0..n {
        builder.add_edge(i.to_string(), "a", ((i + 1) % n).to_string());
        builder.add_edge(i.to_string(), "b", ((i + 2) % n).to_string());
    }
    builder.build()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut c = c.benchmark_group("rpq");
    c.measurement_time(Duration::from_secs(10)).sample_size(50);

    let small = cycle_graph(16);
    let medium = cycle_graph(128);
    let star_a = Regex::Literal("a".to_string()).star();
    c.bench_function("a* on a 16-node cycle", |b| {
        b.iter(|| rpq(black_box(&small), black_box(&star_a), None, None).unwrap())
    });
    c.bench_function("a* on a 128-node cycle", |b| {
        b.iter(|| rpq(black_box(&medium), black_box(&star_a), None, None).unwrap())
    });

    let mixed = two_label_graph(128);
    let alternating = Regex::Literal("a".to_string())
        .concat(Regex::Literal("b".to_string()))
        .star();
    c.bench_function("(ab)* on a 128-node two-label graph", |b| {
        b.iter(|| rpq(black_box(&mixed), black_box(&alternating), None, None).unwrap())
    });

    let endpoints: Vec<usize> = (0..16).collect();
    c.bench_function("a* on a 128-node cycle, 16 start nodes", |b| {
        b.iter(|| {
            rpq(
                black_box(&medium),
                black_box(&star_a),
                Some(&endpoints),
                None,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
