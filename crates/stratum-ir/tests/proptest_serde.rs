//! Property-based tests for the serialized form of circuits.
//!
//! Circuits built through the builder API must survive a JSON round trip
//! unchanged, repeat blocks and custom gates included.

use proptest::prelude::*;
use stratum_ir::{Basis, Circuit, GateKind, Instruction, QubitId, StandardGate, Target};

/// Builder operations used to generate circuits.
#[derive(Debug, Clone)]
enum Op {
    H(u32),
    S(u32),
    Cx(u32, u32),
    Measure(Basis, u32),
    Reset(Basis, u32),
    Detector(i32, u32),
    Observable(Basis, u32),
    Custom(u32),
    Tick,
}

impl Op {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::S(q) => circuit.s(QubitId(q)),
            Op::Cx(a, b) => circuit.cx(QubitId(a), QubitId(b)),
            Op::Measure(basis, q) => circuit.measure(basis, QubitId(q)),
            Op::Reset(basis, q) => circuit.reset(basis, QubitId(q)),
            Op::Detector(coord, k) => circuit.detector([f64::from(coord)], [k]),
            Op::Observable(basis, q) => circuit.append(
                Instruction::new(StandardGate::ObservableInclude, [Target::pauli(basis, q)])
                    .with_args([0.0]),
            ),
            Op::Custom(q) => circuit.append(Instruction::new(
                GateKind::from_name("MY_GATE"),
                [Target::qubit(q)],
            )),
            Op::Tick => circuit.tick(),
        };
    }
}

fn arb_basis() -> impl Strategy<Value = Basis> {
    prop::sample::select(Basis::ALL.to_vec())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_u32..6).prop_map(Op::H),
        (0_u32..6).prop_map(Op::S),
        (0_u32..6, 0_u32..6)
            .prop_filter("operands must differ", |(a, b)| a != b)
            .prop_map(|(a, b)| Op::Cx(a, b)),
        (arb_basis(), 0_u32..6).prop_map(|(b, q)| Op::Measure(b, q)),
        (arb_basis(), 0_u32..6).prop_map(|(b, q)| Op::Reset(b, q)),
        (-4_i32..4, 1_u32..4).prop_map(|(c, k)| Op::Detector(c, k)),
        (arb_basis(), 0_u32..6).prop_map(|(b, q)| Op::Observable(b, q)),
        (0_u32..6).prop_map(Op::Custom),
        Just(Op::Tick),
    ]
}

fn build(ops: Vec<Op>) -> Circuit {
    let mut circuit = Circuit::new();
    for op in ops {
        op.apply(&mut circuit);
    }
    circuit
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (
        prop::collection::vec(arb_op(), 0..12),
        prop::option::of((0_u64..5, prop::collection::vec(arb_op(), 0..6))),
        prop::collection::vec(arb_op(), 0..6),
    )
        .prop_map(|(head, repeat, tail)| {
            let mut circuit = build(head);
            if let Some((reps, body)) = repeat {
                circuit.append_repeat(reps, build(body));
            }
            for op in tail {
                op.apply(&mut circuit);
            }
            circuit
        })
}

proptest! {
    #[test]
    fn test_json_roundtrip(circuit in arb_circuit()) {
        let json = serde_json::to_string(&circuit).expect("circuits serialize");
        let back: Circuit = serde_json::from_str(&json).expect("serialized circuits parse");
        prop_assert_eq!(back, circuit);
    }

    /// Counts of the deserialized circuit match the original, loops unrolled.
    #[test]
    fn test_roundtrip_preserves_counts(circuit in arb_circuit()) {
        let back: Circuit = serde_json::from_value(serde_json::to_value(&circuit).unwrap()).unwrap();
        prop_assert_eq!(back.num_measurements(), circuit.num_measurements());
        prop_assert_eq!(back.num_ticks(), circuit.num_ticks());
        prop_assert_eq!(back.num_qubits(), circuit.num_qubits());
    }
}
