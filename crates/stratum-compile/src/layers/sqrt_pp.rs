use rustc_hash::FxHashSet;
use stratum_ir::{Basis, Circuit, Instruction, QubitId, StandardGate};

use super::{Layer, RotationLayer};
use crate::error::CompileResult;
use crate::rotation::Rotation;

/// `SQRT_{PP}` or `SQRT_{PP}_DAG` on one qubit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqrtPauliPair {
    pub q1: QubitId,
    pub q2: QubitId,
    pub basis: Basis,
    pub dagger: bool,
}

impl SqrtPauliPair {
    fn gate(&self) -> StandardGate {
        StandardGate::from_sqrt_pauli_product(self.basis, self.dagger)
    }

    fn sort_key(&self) -> (u8, bool, QubitId, QubitId) {
        let basis_rank = match self.basis {
            Basis::Z => 0,
            Basis::X => 1,
            Basis::Y => 2,
        };
        (
            basis_rank,
            self.dagger,
            self.q1.min(self.q2),
            self.q1.max(self.q2),
        )
    }
}

/// Square roots of two-qubit Pauli products on disjoint pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqrtPauliProductLayer {
    pub pairs: Vec<SqrtPauliPair>,
}

impl SqrtPauliProductLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.pairs.iter().flat_map(|p| [p.q1, p.q2]).collect()
    }

    pub fn is_z_basis(&self) -> bool {
        self.pairs.iter().all(|p| p.basis == Basis::Z)
    }

    pub fn absorb(&mut self, next: SqrtPauliProductLayer) -> Option<SqrtPauliProductLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.pairs.extend(next.pairs);
        None
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        let mut pairs = self.pairs.clone();
        pairs.sort_by_key(SqrtPauliPair::sort_key);
        for p in pairs {
            let (a, b) = (p.q1.min(p.q2), p.q1.max(p.q2));
            out.append_merged(Instruction::on_qubits(p.gate(), [a, b]))?;
        }
        Ok(())
    }

    pub fn to_z_basis(self) -> Vec<Layer> {
        if self.is_z_basis() {
            return vec![Layer::SqrtPauliProduct(self)];
        }
        let pre: RotationLayer = self
            .pairs
            .iter()
            .flat_map(|p| {
                let r = Rotation::to_z(p.basis);
                [(p.q1, r), (p.q2, r)]
            })
            .collect();
        let post = pre.inverse();
        let z_form = SqrtPauliProductLayer {
            pairs: self
                .pairs
                .iter()
                .map(|p| SqrtPauliPair {
                    basis: Basis::Z,
                    ..*p
                })
                .collect(),
        };
        Layer::conjugated(pre, Layer::SqrtPauliProduct(z_form), post)
    }
}

impl FromIterator<SqrtPauliPair> for SqrtPauliProductLayer {
    fn from_iter<T: IntoIterator<Item = SqrtPauliPair>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
