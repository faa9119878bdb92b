//! Benchmarks for Stratum circuit operations
//!
//! Run with: cargo bench -p stratum-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use stratum_ir::{Basis, Circuit, Instruction, QubitId, StandardGate};

/// One round of a repetition-code style syndrome extraction.
fn syndrome_round(n: u32) -> Circuit {
    let mut circuit = Circuit::new();
    for q in (1..n).step_by(2) {
        circuit.reset(Basis::Z, QubitId(q)).unwrap();
    }
    circuit.tick().unwrap();
    for q in (1..n).step_by(2) {
        circuit.cx(QubitId(q - 1), QubitId(q)).unwrap();
    }
    circuit.tick().unwrap();
    for q in (1..n.saturating_sub(1)).step_by(2) {
        circuit.cx(QubitId(q + 1), QubitId(q)).unwrap();
    }
    circuit.tick().unwrap();
    for q in (1..n).step_by(2) {
        circuit.measure(Basis::Z, QubitId(q)).unwrap();
    }
    circuit
}

/// Benchmark adding gates to a circuit
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::new();
        b.iter(|| {
            circuit.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::new();
        b.iter(|| {
            circuit
                .cx(black_box(QubitId(0)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.bench_function("append_merged", |b| {
        let mut circuit = Circuit::new();
        b.iter(|| {
            circuit
                .append_merged(Instruction::on_qubits(
                    StandardGate::H,
                    [black_box(QubitId(3))],
                ))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark whole-circuit statistics
fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for n in &[11, 51, 201] {
        let mut circuit = Circuit::new();
        circuit.append_repeat(1000, syndrome_round(*n));

        group.bench_with_input(BenchmarkId::new("num_measurements", n), &circuit, |b, c| {
            b.iter(|| black_box(c).num_measurements());
        });
        group.bench_with_input(BenchmarkId::new("num_qubits", n), &circuit, |b, c| {
            b.iter(|| black_box(c).num_qubits());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate_addition, bench_statistics);
criterion_main!(benches);
