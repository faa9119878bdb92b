//! Exchange the roles of the X and Z bases throughout a circuit.
//!
//! Every gate is replaced by its counterpart under the relabeling `X <-> Z`
//! (`Y` fixed), so `M` becomes `MX`, `CX` becomes `XCZ`, `S` becomes `SQRT_X`
//! and so on. Pauli targets of annotations have their letter exchanged.
//! Applying the transform twice gives back the original circuit.

use stratum_ir::{Basis, Circuit, GateKind, Instruction, Operation, StandardGate, Target};

use crate::error::{CompileError, CompileResult};

/// Flip X and Z in every instruction, recursing into repeat blocks.
pub fn xz_flip(circuit: &Circuit) -> CompileResult<Circuit> {
    let mut out = Circuit::new();
    for operation in circuit {
        match operation {
            Operation::Instruction(inst) => {
                out.append(flipped_instruction(inst)?)?;
            }
            Operation::Repeat(block) => {
                out.append_repeat(block.repetitions, xz_flip(&block.body)?);
            }
        }
    }
    Ok(out)
}

fn flipped_instruction(inst: &Instruction) -> CompileResult<Instruction> {
    let GateKind::Standard(gate) = &inst.gate else {
        return Err(CompileError::unsupported(inst, "unknown gate"));
    };
    let gate = *gate;

    if let Some((b1, b2)) = gate.interaction_bases() {
        return flipped_interaction(inst, b1, b2);
    }

    let flipped = flipped_gate(gate)
        .ok_or_else(|| CompileError::unsupported(inst, "no X/Z-flipped counterpart"))?;
    let targets = inst.targets.iter().map(|&t| flipped_target(t)).collect();
    Ok(Instruction {
        gate: GateKind::Standard(flipped),
        targets,
        args: inst.args.clone(),
    })
}

/// Quantum operands have their basis flipped. Classical operands keep
/// theirs, so `CX rec[-1] 0` becomes `CZ rec[-1] 0`.
fn flipped_interaction(inst: &Instruction, b1: Basis, b2: Basis) -> CompileResult<Instruction> {
    let mut gate: Option<StandardGate> = None;
    for (t1, t2) in inst.target_pairs() {
        let bases = match (t1.is_classical(), t2.is_classical()) {
            (true, false) => (b1, b2.xz_flipped()),
            (false, true) => (b1.xz_flipped(), b2),
            _ => (b1.xz_flipped(), b2.xz_flipped()),
        };
        let pair_gate = StandardGate::from_interaction_bases(bases.0, bases.1);
        match gate {
            None => gate = Some(pair_gate),
            Some(g) if g == pair_gate => {}
            Some(_) => {
                return Err(CompileError::unsupported(
                    inst,
                    "classically controlled and quantum pairs flip to different gates",
                ));
            }
        }
    }
    let gate = gate.unwrap_or(StandardGate::from_interaction_bases(
        b1.xz_flipped(),
        b2.xz_flipped(),
    ));
    Ok(Instruction {
        gate: GateKind::Standard(gate),
        targets: inst.targets.clone(),
        args: inst.args.clone(),
    })
}

fn flipped_target(target: Target) -> Target {
    match target {
        Target::Pauli {
            basis,
            id,
            inverted,
        } => Target::Pauli {
            basis: basis.xz_flipped(),
            id,
            inverted,
        },
        other => other,
    }
}

/// Counterpart of a non-interaction gate, `None` when there is none.
fn flipped_gate(gate: StandardGate) -> Option<StandardGate> {
    use StandardGate as G;
    let flipped = match gate {
        G::Tick | G::QubitCoords | G::Detector | G::ObservableInclude | G::ShiftCoords => gate,

        G::I | G::Y | G::H | G::SqrtY | G::SqrtYDag => gate,
        G::X => G::Z,
        G::Z => G::X,
        G::HXY => G::HYZ,
        G::HYZ => G::HXY,
        G::CXyz => G::CZyx,
        G::CZyx => G::CXyz,
        G::S => G::SqrtX,
        G::SqrtX => G::S,
        G::SDag => G::SqrtXDag,
        G::SqrtXDag => G::SDag,

        G::R => G::RX,
        G::RX => G::R,
        G::RY => G::RY,
        G::M => G::MX,
        G::MX => G::M,
        G::MY => G::MY,
        G::MR => G::MRX,
        G::MRX => G::MR,
        G::MRY => G::MRY,

        G::Swap | G::SqrtYY | G::SqrtYYDag => gate,
        G::SqrtXX => G::SqrtZZ,
        G::SqrtZZ => G::SqrtXX,
        G::SqrtXXDag => G::SqrtZZDag,
        G::SqrtZZDag => G::SqrtXXDag,
        G::CXSwap => G::SwapCX,
        G::SwapCX => G::CXSwap,

        G::XError => G::ZError,
        G::ZError => G::XError,
        G::YError | G::Depolarize1 | G::Depolarize2 => gate,

        G::MPP
        | G::ISwap
        | G::ISwapDag
        | G::CZSwap
        | G::PauliChannel1
        | G::PauliChannel2
        | G::CorrelatedError
        | G::ElseCorrelatedError => return None,

        G::CX | G::CY | G::CZ | G::XCX | G::XCY | G::XCZ | G::YCX | G::YCY | G::YCZ => {
            let (b1, b2) = gate.interaction_bases()?;
            G::from_interaction_bases(b1.xz_flipped(), b2.xz_flipped())
        }
    };
    Some(flipped)
}
