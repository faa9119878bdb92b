use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use stratum_ir::{Basis, Circuit, Instruction, QubitId, StandardGate};

use super::{Layer, RotationLayer};
use crate::error::CompileResult;
use crate::rotation::Rotation;

/// Resets, at most one per qubit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetLayer {
    pub targets: BTreeMap<QubitId, Basis>,
}

impl ResetLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.targets.keys().copied().collect()
    }

    pub fn is_z_basis(&self) -> bool {
        self.targets.values().all(|b| *b == Basis::Z)
    }

    /// Merge a disjoint reset layer, or hand it back.
    pub fn absorb(&mut self, next: ResetLayer) -> Option<ResetLayer> {
        if next.targets.keys().any(|q| self.targets.contains_key(q)) {
            return Some(next);
        }
        self.targets.extend(next.targets);
        None
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for basis in [Basis::Z, Basis::X, Basis::Y] {
            let qubits: Vec<QubitId> = self
                .targets
                .iter()
                .filter(|(_, b)| **b == basis)
                .map(|(q, _)| *q)
                .collect();
            if !qubits.is_empty() {
                out.append_merged(Instruction::on_qubits(StandardGate::reset(basis), qubits))?;
            }
        }
        Ok(())
    }

    pub fn to_z_basis(self) -> Vec<Layer> {
        if self.is_z_basis() {
            return vec![Layer::Reset(self)];
        }
        let pre: RotationLayer = self
            .targets
            .iter()
            .map(|(&q, &b)| (q, Rotation::to_z(b)))
            .collect();
        let post = pre.inverse();
        let z_form = ResetLayer {
            targets: self.targets.keys().map(|&q| (q, Basis::Z)).collect(),
        };
        Layer::conjugated(pre, Layer::Reset(z_form), post)
    }
}

impl FromIterator<(QubitId, Basis)> for ResetLayer {
    fn from_iter<T: IntoIterator<Item = (QubitId, Basis)>>(iter: T) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
