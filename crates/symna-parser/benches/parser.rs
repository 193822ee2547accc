//! Benchmarks for netlist parsing.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symna_parser::parse;

/// An RC ladder with `sections` stages driven by one source.
fn ladder(sections: usize) -> String {
    let mut netlist = String::from("* RC ladder\nV1 1 0 DC 1\n");
    for i in 1..=sections {
        netlist.push_str(&format!("R{i} {i} {} 1k\n", i + 1));
        netlist.push_str(&format!("C{i} {} 0 10n\n", i + 1));
    }
    netlist.push_str(".end\n");
    netlist
}

fn bench_parse(c: &mut Criterion) {
    let small = ladder(5);
    let large = ladder(200);

    c.bench_function("parse_ladder_5", |b| b.iter(|| parse(black_box(&small))));
    c.bench_function("parse_ladder_200", |b| b.iter(|| parse(black_box(&large))));
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
