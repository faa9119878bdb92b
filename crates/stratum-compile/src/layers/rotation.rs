//! Single-qubit rotation layers.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use stratum_ir::{Circuit, Instruction, QubitId};

use crate::error::CompileResult;
use crate::rotation::Rotation;

/// Per-qubit rotations. Absent qubits are rotated by the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationLayer {
    pub rotations: BTreeMap<QubitId, Rotation>,
}

impl RotationLayer {
    /// Create an empty (identity) rotation layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation applied to a qubit.
    pub fn get(&self, qubit: QubitId) -> Rotation {
        self.rotations.get(&qubit).copied().unwrap_or_default()
    }

    /// Apply `rotation` to `qubit` after whatever this layer already does.
    pub fn append_rotation(&mut self, qubit: QubitId, rotation: Rotation) {
        let entry = self.rotations.entry(qubit).or_default();
        *entry = entry.then(rotation);
    }

    /// Qubits rotated by something other than the identity.
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.rotations
            .iter()
            .filter(|(_, r)| !r.is_identity())
            .map(|(q, _)| *q)
            .collect()
    }

    /// Whether every qubit is rotated by the identity.
    pub fn is_vacuous(&self) -> bool {
        self.rotations.values().all(|r| r.is_identity())
    }

    /// This layer followed by `next`.
    #[must_use]
    pub fn then(&self, next: &RotationLayer) -> RotationLayer {
        let mut out = self.clone();
        for (&qubit, &rotation) in &next.rotations {
            out.append_rotation(qubit, rotation);
        }
        out.without_identities()
    }

    /// The layer undoing this one.
    #[must_use]
    pub fn inverse(&self) -> RotationLayer {
        self.rotations
            .iter()
            .map(|(&q, r)| (q, r.inverse()))
            .collect()
    }

    /// This layer applied `n` times in a row.
    #[must_use]
    pub fn pow(&self, n: u64) -> RotationLayer {
        self.rotations
            .iter()
            .map(|(&q, r)| (q, r.pow(n)))
            .collect::<RotationLayer>()
            .without_identities()
    }

    /// Drop identity entries.
    #[must_use]
    pub fn without_identities(mut self) -> RotationLayer {
        self.rotations.retain(|_, r| !r.is_identity());
        self
    }

    /// Drop the entries of the given qubits.
    #[must_use]
    pub fn without_qubits<'a>(mut self, qubits: impl IntoIterator<Item = &'a QubitId>) -> Self {
        for q in qubits {
            self.rotations.remove(q);
        }
        self
    }

    /// Emit one instruction per distinct rotation, qubits ascending.
    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for rotation in Rotation::ALL {
            let Some(gate) = rotation.gate() else {
                continue;
            };
            let qubits: Vec<QubitId> = self
                .rotations
                .iter()
                .filter(|(_, r)| **r == rotation)
                .map(|(q, _)| *q)
                .collect();
            if !qubits.is_empty() {
                out.append_merged(Instruction::on_qubits(gate, qubits))?;
            }
        }
        Ok(())
    }
}

impl FromIterator<(QubitId, Rotation)> for RotationLayer {
    fn from_iter<T: IntoIterator<Item = (QubitId, Rotation)>>(iter: T) -> Self {
        let mut layer = RotationLayer::new();
        for (q, r) in iter {
            layer.append_rotation(q, r);
        }
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_stim::emit;

    #[test]
    fn test_then_composes_per_qubit() {
        let a: RotationLayer = [(QubitId(0), Rotation::H), (QubitId(1), Rotation::H_XY)]
            .into_iter()
            .collect();
        let b: RotationLayer = [(QubitId(0), Rotation::H), (QubitId(2), Rotation::C_XYZ)]
            .into_iter()
            .collect();
        let c = a.then(&b);
        assert_eq!(c.get(QubitId(0)), Rotation::IDENTITY);
        assert_eq!(c.get(QubitId(1)), Rotation::H_XY);
        assert_eq!(c.get(QubitId(2)), Rotation::C_XYZ);
        assert!(!c.rotations.contains_key(&QubitId(0)));
    }

    #[test]
    fn test_inverse_undoes() {
        let a: RotationLayer = [(QubitId(0), Rotation::C_XYZ), (QubitId(3), Rotation::H_YZ)]
            .into_iter()
            .collect();
        assert!(a.then(&a.inverse()).is_vacuous());
    }

    #[test]
    fn test_emission_groups_by_gate() {
        let a: RotationLayer = [
            (QubitId(4), Rotation::H),
            (QubitId(1), Rotation::C_ZYX),
            (QubitId(0), Rotation::H),
            (QubitId(2), Rotation::IDENTITY),
        ]
        .into_iter()
        .collect();
        let mut out = Circuit::new();
        a.append_into(&mut out).unwrap();
        assert_eq!(emit(&out), "H 0 4\nC_ZYX 1\n");
    }
}
