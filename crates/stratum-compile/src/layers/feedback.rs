use rustc_hash::FxHashSet;
use stratum_ir::{Basis, Circuit, Instruction, QubitId, StandardGate, Target};

use super::RotationLayer;
use crate::error::CompileResult;

/// A Pauli on `qubit` controlled by a measurement record or sweep bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackEntry {
    /// `rec[-k]` or `sweep[k]`.
    pub control: Target,
    pub qubit: QubitId,
    pub basis: Basis,
}

/// Classically controlled Paulis on distinct qubits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackLayer {
    pub entries: Vec<FeedbackEntry>,
}

impl FeedbackLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.entries.iter().map(|e| e.qubit).collect()
    }

    pub fn absorb(&mut self, next: FeedbackLayer) -> Option<FeedbackLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.entries.extend(next.entries);
        None
    }

    /// The equivalent feedback to apply before `rotation` instead of after it.
    #[must_use]
    pub fn moved_before(&self, rotation: &RotationLayer) -> FeedbackLayer {
        FeedbackLayer {
            entries: self
                .entries
                .iter()
                .map(|e| FeedbackEntry {
                    basis: rotation.get(e.qubit).inverse().apply(e.basis),
                    ..*e
                })
                .collect(),
        }
    }

    /// Emit `CX`/`CY`/`CZ` with the classical control first.
    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for e in &self.entries {
            let gate = StandardGate::from_interaction_bases(Basis::Z, e.basis);
            out.append_merged(Instruction::new(gate, [e.control, Target::qubit(e.qubit)]))?;
        }
        Ok(())
    }
}

impl FromIterator<FeedbackEntry> for FeedbackLayer {
    fn from_iter<T: IntoIterator<Item = FeedbackEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
