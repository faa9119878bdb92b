//! Grouping a flat instruction stream into timing layers.

use rustc_hash::FxHashSet;
use stratum_ir::{Basis, Circuit, GateKind, Instruction, Operation, QubitId, StandardGate, Target};

use super::LayerCircuit;
use crate::error::{CompileError, CompileResult};
use crate::layers::{
    DetObsAnnotationLayer, FeedbackEntry, FeedbackLayer, InteractLayer, InteractPair,
    InteractSwapLayer, ISwapLayer, Layer, LoopLayer, MeasureLayer, MeasureTarget, MppLayer,
    QubitCoordAnnotationLayer, ResetLayer, RotationLayer, ShiftCoordAnnotationLayer,
    SqrtPauliPair, SqrtPauliProductLayer, SwapLayer,
};
use crate::rotation::Rotation;

/// Accumulates layers, folding each new layer into the previous one when both
/// belong to the current tick.
#[derive(Default)]
struct LayerBuilder {
    layers: Vec<Layer>,
    tick_start: usize,
}

impl LayerBuilder {
    fn push(&mut self, layer: Layer) {
        if self.layers.len() > self.tick_start {
            if let Some(last) = self.layers.last_mut() {
                if let Some(rest) = last.absorb(layer) {
                    self.layers.push(rest);
                }
                return;
            }
        }
        self.layers.push(layer);
    }

    fn tick(&mut self) {
        if self.layers.len() == self.tick_start {
            self.layers.push(Layer::Empty);
        }
        self.tick_start = self.layers.len();
    }

    fn push_loop(&mut self, layer: LoopLayer) {
        self.layers.push(Layer::Loop(layer));
        self.tick_start = self.layers.len();
    }
}

impl LayerCircuit {
    /// Group a flat circuit into layers.
    ///
    /// Instructions between two `TICK`s share layers where their kinds and
    /// qubits allow it. A `REPEAT` block becomes a [`LoopLayer`] and closes the
    /// current tick.
    pub fn from_circuit(circuit: &Circuit) -> CompileResult<LayerCircuit> {
        let mut builder = LayerBuilder::default();
        for operation in circuit {
            match operation {
                Operation::Instruction(inst) if inst.is(StandardGate::Tick) => builder.tick(),
                Operation::Instruction(inst) => {
                    for layer in instruction_layers(inst)? {
                        builder.push(layer);
                    }
                }
                Operation::Repeat(block) => {
                    let body = LayerCircuit::from_circuit(&block.body)?;
                    builder.push_loop(LoopLayer::new(body, block.repetitions));
                }
            }
        }
        Ok(LayerCircuit {
            layers: builder.layers,
        })
    }
}

/// Split `units` into maximal runs in which no qubit appears twice.
fn runs<T>(units: Vec<T>, qubits: impl Fn(&T) -> Vec<QubitId>) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = Vec::new();
    for unit in units {
        let qs = qubits(&unit);
        if qs.iter().any(|q| seen.contains(q)) {
            out.push(std::mem::take(&mut current));
            seen.clear();
        }
        seen.extend(qs);
        current.push(unit);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn has_nonzero_args(inst: &Instruction) -> bool {
    inst.args.iter().any(|a| *a != 0.0)
}

fn plain_qubits(inst: &Instruction) -> CompileResult<Vec<QubitId>> {
    inst.targets
        .iter()
        .map(|t| match t {
            Target::Qubit {
                id,
                inverted: false,
            } => Ok(*id),
            _ => Err(CompileError::unsupported(
                inst,
                format!("target '{t}' is not a plain qubit"),
            )),
        })
        .collect()
}

fn qubit_pairs(inst: &Instruction) -> CompileResult<Vec<(QubitId, QubitId)>> {
    let qubits = plain_qubits(inst)?;
    Ok(qubits.chunks_exact(2).map(|p| (p[0], p[1])).collect())
}

fn pair_qubits(pair: &(QubitId, QubitId)) -> Vec<QubitId> {
    vec![pair.0, pair.1]
}

/// The layers equivalent to one non-`TICK` instruction, in order.
fn instruction_layers(inst: &Instruction) -> CompileResult<Vec<Layer>> {
    let gate = match &inst.gate {
        GateKind::Standard(gate) => *gate,
        GateKind::Custom(_) => return Err(CompileError::unsupported(inst, "unknown gate")),
    };
    if gate.is_noise() {
        return Err(CompileError::unsupported(inst, "noise channels are not supported"));
    }

    match gate {
        StandardGate::Detector | StandardGate::ObservableInclude => {
            Ok(vec![Layer::DetObsAnnotation(DetObsAnnotationLayer {
                instructions: vec![inst.clone()],
            })])
        }
        StandardGate::ShiftCoords => Ok(vec![Layer::ShiftCoordAnnotation(
            ShiftCoordAnnotationLayer {
                shift: inst.args.clone(),
            },
        )]),
        StandardGate::QubitCoords => {
            let coords = plain_qubits(inst)?
                .into_iter()
                .map(|q| (q, inst.args.clone()))
                .collect();
            Ok(vec![Layer::QubitCoordAnnotation(QubitCoordAnnotationLayer {
                coords,
            })])
        }
        StandardGate::MPP => mpp_layers(inst),
        StandardGate::Swap => Ok(runs(qubit_pairs(inst)?, pair_qubits)
            .into_iter()
            .map(|run| Layer::Swap(run.into_iter().collect::<SwapLayer>()))
            .collect()),
        StandardGate::ISwap => Ok(runs(qubit_pairs(inst)?, pair_qubits)
            .into_iter()
            .map(|run| Layer::ISwap(run.into_iter().collect::<ISwapLayer>()))
            .collect()),
        StandardGate::ISwapDag => Err(CompileError::unsupported(
            inst,
            "ISWAP_DAG has no layer representation",
        )),
        StandardGate::CXSwap | StandardGate::SwapCX | StandardGate::CZSwap => {
            let pairs = qubit_pairs(inst)?
                .into_iter()
                .map(|(a, b)| match gate {
                    StandardGate::CXSwap => InteractPair::new(a, Basis::Z, b, Basis::X),
                    StandardGate::SwapCX => InteractPair::new(b, Basis::Z, a, Basis::X),
                    _ => InteractPair::new(a, Basis::Z, b, Basis::Z),
                })
                .collect();
            Ok(runs(pairs, |p| vec![p.q1, p.q2])
                .into_iter()
                .map(|run| Layer::InteractSwap(run.into_iter().collect::<InteractSwapLayer>()))
                .collect())
        }
        _ => {
            if let Some(rotation) = Rotation::from_gate(gate) {
                let layer: RotationLayer = plain_qubits(inst)?
                    .into_iter()
                    .map(|q| (q, rotation))
                    .collect();
                return Ok(vec![Layer::Rotation(layer)]);
            }
            if gate.measurement_basis().is_some() || gate.reset_basis().is_some() {
                return collapse_layers(inst, gate);
            }
            if let Some((b1, b2)) = gate.interaction_bases() {
                return interaction_layers(inst, b1, b2);
            }
            if let Some((basis, dagger)) = gate.sqrt_pauli_product() {
                let pairs = qubit_pairs(inst)?
                    .into_iter()
                    .map(|(q1, q2)| SqrtPauliPair {
                        q1,
                        q2,
                        basis,
                        dagger,
                    })
                    .collect();
                return Ok(runs(pairs, |p: &SqrtPauliPair| vec![p.q1, p.q2])
                    .into_iter()
                    .map(|run| {
                        Layer::SqrtPauliProduct(run.into_iter().collect::<SqrtPauliProductLayer>())
                    })
                    .collect());
            }
            Err(CompileError::unsupported(inst, "no layer representation"))
        }
    }
}

/// Measurements, resets, and measure-resets (a measurement layer followed by a
/// reset layer per run of distinct qubits).
fn collapse_layers(inst: &Instruction, gate: StandardGate) -> CompileResult<Vec<Layer>> {
    if has_nonzero_args(inst) {
        return Err(CompileError::unsupported(inst, "noisy measurements are not supported"));
    }
    let mut targets = Vec::with_capacity(inst.targets.len());
    for t in &inst.targets {
        match t {
            Target::Qubit { id, inverted } => targets.push((*id, *inverted)),
            _ => {
                return Err(CompileError::unsupported(
                    inst,
                    format!("target '{t}' is not a qubit"),
                ));
            }
        }
    }
    if gate.measurement_basis().is_none() && targets.iter().any(|(_, inv)| *inv) {
        return Err(CompileError::unsupported(inst, "inverted reset target"));
    }

    let mut out = Vec::new();
    for run in runs(targets, |(q, _)| vec![*q]) {
        if let Some(basis) = gate.measurement_basis() {
            out.push(Layer::Measure(
                run.iter()
                    .map(|&(qubit, inverted)| MeasureTarget {
                        qubit,
                        basis,
                        inverted,
                    })
                    .collect::<MeasureLayer>(),
            ));
        }
        if let Some(basis) = gate.reset_basis() {
            out.push(Layer::Reset(
                run.iter().map(|&(q, _)| (q, basis)).collect::<ResetLayer>(),
            ));
        }
    }
    Ok(out)
}

/// Quantum-quantum pairs become interactions. A pair with a classical side is
/// feedback, which needs the classical side to act as a Z control.
fn interaction_layers(inst: &Instruction, b1: Basis, b2: Basis) -> CompileResult<Vec<Layer>> {
    let mut out = Vec::new();
    let mut pairs = Vec::new();
    let flush = |pairs: &mut Vec<InteractPair>, out: &mut Vec<Layer>| {
        for run in runs(std::mem::take(pairs), |p: &InteractPair| vec![p.q1, p.q2]) {
            out.push(Layer::Interact(run.into_iter().collect::<InteractLayer>()));
        }
    };

    for (t1, t2) in inst.target_pairs() {
        let entry = match (t1, t2) {
            (
                Target::Qubit {
                    id: q1,
                    inverted: false,
                },
                Target::Qubit {
                    id: q2,
                    inverted: false,
                },
            ) => {
                pairs.push(InteractPair::new(q1, b1, q2, b2));
                continue;
            }
            (control, Target::Qubit { id, inverted: false })
                if control.is_classical() && b1 == Basis::Z =>
            {
                FeedbackEntry {
                    control,
                    qubit: id,
                    basis: b2,
                }
            }
            (Target::Qubit { id, inverted: false }, control)
                if control.is_classical() && b2 == Basis::Z =>
            {
                FeedbackEntry {
                    control,
                    qubit: id,
                    basis: b1,
                }
            }
            (t1, t2) => {
                return Err(CompileError::unsupported(
                    inst,
                    format!("cannot apply to targets '{t1}' and '{t2}'"),
                ));
            }
        };
        flush(&mut pairs, &mut out);
        out.push(Layer::Feedback(FeedbackLayer::from_iter([entry])));
    }
    flush(&mut pairs, &mut out);
    Ok(out)
}

/// One layer per Pauli product; disjoint products share a layer.
fn mpp_layers(inst: &Instruction) -> CompileResult<Vec<Layer>> {
    if has_nonzero_args(inst) {
        return Err(CompileError::unsupported(inst, "noisy measurements are not supported"));
    }
    let mut products: Vec<Vec<Target>> = Vec::new();
    let mut joined = false;
    for &t in &inst.targets {
        match t {
            Target::Combiner => {
                if let Some(last) = products.last_mut() {
                    last.push(t);
                }
                joined = true;
            }
            Target::Pauli { .. } if joined => {
                if let Some(last) = products.last_mut() {
                    last.push(t);
                }
                joined = false;
            }
            Target::Pauli { .. } => products.push(vec![t]),
            _ => {
                return Err(CompileError::unsupported(
                    inst,
                    format!("target '{t}' is not a Pauli target"),
                ));
            }
        }
    }
    Ok(products
        .into_iter()
        .map(|targets| Layer::Mpp(MppLayer { targets }))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_stim::parse;

    fn layers(source: &str) -> Vec<Layer> {
        LayerCircuit::from_circuit(&parse(source).unwrap())
            .unwrap()
            .layers
    }

    fn kinds(source: &str) -> Vec<&'static str> {
        layers(source).iter().map(Layer::kind_name).collect()
    }

    #[test]
    fn test_same_tick_instructions_share_layers() {
        assert_eq!(kinds("H 0\nH 1\nTICK\nCX 0 1\n"), vec!["rotation", "interact"]);
        assert_eq!(kinds("R 0\nRX 1\nTICK\nM 0 1\n"), vec!["reset", "measure"]);
        assert_eq!(kinds("M 0\nTICK\nM 1\n"), vec!["measure", "measure"]);
    }

    #[test]
    fn test_duplicate_qubits_split_layers() {
        assert_eq!(kinds("CX 0 1 1 2\n"), vec!["interact", "interact"]);
        assert_eq!(kinds("M 0 0\n"), vec!["measure", "measure"]);
        // Rotations on the same qubit compose instead.
        assert_eq!(kinds("H 0 0\n"), vec!["rotation"]);
    }

    #[test]
    fn test_measure_reset_splits() {
        assert_eq!(kinds("MR 0 1\n"), vec!["measure", "reset"]);
        assert_eq!(kinds("MRX 0 0\n"), vec!["measure", "reset", "measure", "reset"]);
    }

    #[test]
    fn test_empty_ticks() {
        assert_eq!(kinds("TICK\nTICK\nH 0\n"), vec!["empty", "empty", "rotation"]);
        assert_eq!(kinds("H 0\nTICK\nH 1\n"), vec!["rotation", "rotation"]);
    }

    #[test]
    fn test_repeat_becomes_loop() {
        let out = layers("H 0\nREPEAT 3 {\n    CZ 0 1\n    TICK\n}\nH 1\n");
        assert_eq!(out.len(), 3);
        let Layer::Loop(lp) = &out[1] else {
            panic!("expected loop, got {:?}", out[1]);
        };
        assert_eq!(lp.repetitions, 3);
        assert_eq!(lp.body.layers.len(), 1);
    }

    #[test]
    fn test_feedback() {
        let out = layers("CX rec[-1] 0 sweep[2] 1\nCZ 2 rec[-3]\n");
        assert_eq!(out.len(), 1);
        let Layer::Feedback(f) = &out[0] else {
            panic!("expected feedback, got {:?}", out[0]);
        };
        assert_eq!(f.entries.len(), 3);
        assert_eq!(f.entries[2].qubit, QubitId(2));
        assert_eq!(f.entries[2].basis, Basis::Z);
    }

    #[test]
    fn test_feedback_with_non_z_control_is_unsupported() {
        let circuit = parse("CX 0 rec[-1]\n").unwrap();
        assert!(matches!(
            LayerCircuit::from_circuit(&circuit),
            Err(CompileError::UnsupportedInstruction { .. })
        ));
    }

    #[test]
    fn test_swap_variants() {
        let out = layers("CXSWAP 0 1\nSWAPCX 2 3\n");
        assert_eq!(
            out,
            vec![Layer::InteractSwap(InteractSwapLayer::from_iter([
                InteractPair::new(QubitId(0), Basis::Z, QubitId(1), Basis::X),
                InteractPair::new(QubitId(3), Basis::Z, QubitId(2), Basis::X),
            ]))]
        );
    }

    #[test]
    fn test_mpp_products() {
        let out = layers("MPP X0*Z1 Y2 Z0\n");
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            Layer::Mpp(MppLayer {
                targets: vec![
                    Target::pauli(Basis::X, 0u32),
                    Target::Combiner,
                    Target::pauli(Basis::Z, 1u32),
                    Target::pauli(Basis::Y, 2u32),
                ]
            })
        );
    }

    #[test]
    fn test_qubit_coords_apply_to_each_target() {
        let out = layers("QUBIT_COORDS(1, 2) 0 1\n");
        let Layer::QubitCoordAnnotation(c) = &out[0] else {
            panic!("expected coords, got {:?}", out[0]);
        };
        assert_eq!(c.coords.len(), 2);
        assert_eq!(c.coords[&QubitId(1)], vec![1.0, 2.0]);
    }

    #[test]
    fn test_unsupported_instructions() {
        for source in [
            "X_ERROR(0.1) 0\n",
            "ISWAP_DAG 0 1\n",
            "FOO 0\n",
            "H !0\n",
            "M(0.01) 0\n",
        ] {
            let circuit = parse(source).unwrap();
            assert!(
                matches!(
                    LayerCircuit::from_circuit(&circuit),
                    Err(CompileError::UnsupportedInstruction { .. })
                ),
                "{source}"
            );
        }
    }
}
