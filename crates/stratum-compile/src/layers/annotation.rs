//! Annotation layers. These never require or imply a `TICK`.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use stratum_ir::{Circuit, Instruction, QubitId, StandardGate, Target};

use crate::error::CompileResult;

/// `DETECTOR` and `OBSERVABLE_INCLUDE` instructions, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetObsAnnotationLayer {
    pub instructions: Vec<Instruction>,
}

impl DetObsAnnotationLayer {
    /// Qubits named by Pauli targets of observables.
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.instructions
            .iter()
            .flat_map(|inst| inst.targets.iter())
            .filter(|t| matches!(t, Target::Pauli { .. }))
            .filter_map(Target::qubit_id)
            .collect()
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for inst in &self.instructions {
            out.append(inst.clone())?;
        }
        Ok(())
    }
}

/// `QUBIT_COORDS` per qubit. Later entries replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QubitCoordAnnotationLayer {
    pub coords: BTreeMap<QubitId, Vec<f64>>,
}

impl QubitCoordAnnotationLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.coords.keys().copied().collect()
    }

    /// Add `offset` to every qubit's coordinates, index by index.
    pub fn shift(&mut self, offset: &[f64]) {
        for coords in self.coords.values_mut() {
            for (c, d) in coords.iter_mut().zip(offset) {
                *c += d;
            }
        }
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for (&q, coords) in &self.coords {
            out.append(
                Instruction::new(StandardGate::QubitCoords, [Target::qubit(q)])
                    .with_args(coords.iter().copied()),
            )?;
        }
        Ok(())
    }
}

/// `SHIFT_COORDS`, with consecutive shifts summed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftCoordAnnotationLayer {
    pub shift: Vec<f64>,
}

impl ShiftCoordAnnotationLayer {
    pub fn is_vacuous(&self) -> bool {
        self.shift.iter().all(|s| *s == 0.0)
    }

    /// Add another shift, extending to the longer of the two.
    pub fn add(&mut self, other: &[f64]) {
        add_shift(&mut self.shift, other);
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        out.append(
            Instruction::new(StandardGate::ShiftCoords, []).with_args(self.shift.iter().copied()),
        )?;
        Ok(())
    }
}

/// Element-wise `total += other`, padding `total` with zeros as needed.
pub(crate) fn add_shift(total: &mut Vec<f64>, other: &[f64]) {
    if total.len() < other.len() {
        total.resize(other.len(), 0.0);
    }
    for (t, o) in total.iter_mut().zip(other) {
        *t += o;
    }
}
