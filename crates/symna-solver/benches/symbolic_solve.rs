//! Benchmarks for symbolic solving of ladder networks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symna_core::Circuit;
use symna_parser::parse;
use symna_solver::{Analysis, SolverConfig, solve};

/// RC ladder with symbolic component values.
fn rc_ladder(sections: usize) -> String {
    let mut netlist = String::from("Vin 1 0 Symbolic\n");
    for k in 1..=sections {
        netlist.push_str(&format!("R{k} {k} {} Symbolic\n", k + 1));
        netlist.push_str(&format!("C{k} {} 0 Symbolic\n", k + 1));
    }
    netlist
}

fn circuit(sections: usize) -> Circuit {
    let (components, nodes) = parse(&rc_ladder(sections)).unwrap().into_parts();
    Circuit::new(components, nodes).unwrap()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbolic_solve");
    for sections in [1, 2, 4, 8] {
        let circuit = circuit(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &circuit, |b, circuit| {
            b.iter(|| solve(black_box(circuit), &SolverConfig::default()).unwrap())
        });
    }
    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_function");
    for sections in [1, 2, 4, 8] {
        let output = (sections + 1).to_string();
        group.bench_function(BenchmarkId::from_parameter(sections), |b| {
            b.iter(|| {
                let analysis = Analysis::new(circuit(sections));
                analysis.transfer_function("1", black_box(&output)).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solve, bench_transfer);
criterion_main!(benches);
