use rustc_hash::FxHashSet;
use stratum_ir::{Basis, Circuit, Instruction, QubitId, StandardGate, Target};

use super::{Layer, RotationLayer};
use crate::error::CompileResult;
use crate::rotation::Rotation;

/// One single-qubit measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureTarget {
    pub qubit: QubitId,
    pub basis: Basis,
    /// Whether the recorded result is flipped (`M !q`).
    pub inverted: bool,
}

impl MeasureTarget {
    /// A plain Z-basis measurement.
    pub fn z(qubit: QubitId) -> Self {
        Self {
            qubit,
            basis: Basis::Z,
            inverted: false,
        }
    }
}

/// Measurements in record order, at most one per qubit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasureLayer {
    pub targets: Vec<MeasureTarget>,
}

impl MeasureLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.targets.iter().map(|t| t.qubit).collect()
    }

    pub fn is_z_basis(&self) -> bool {
        self.targets.iter().all(|t| t.basis == Basis::Z)
    }

    /// Append a disjoint measurement layer after this one's records, or
    /// hand it back.
    pub fn absorb(&mut self, next: MeasureLayer) -> Option<MeasureLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.targets.extend(next.targets);
        None
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for t in &self.targets {
            out.append_merged(Instruction::new(
                StandardGate::measurement(t.basis),
                [Target::Qubit {
                    id: t.qubit,
                    inverted: t.inverted,
                }],
            ))?;
        }
        Ok(())
    }

    pub fn to_z_basis(self) -> Vec<Layer> {
        if self.is_z_basis() {
            return vec![Layer::Measure(self)];
        }
        let pre: RotationLayer = self
            .targets
            .iter()
            .map(|t| (t.qubit, Rotation::to_z(t.basis)))
            .collect();
        let post = pre.inverse();
        let z_form = MeasureLayer {
            targets: self
                .targets
                .iter()
                .map(|t| MeasureTarget {
                    basis: Basis::Z,
                    ..*t
                })
                .collect(),
        };
        Layer::conjugated(pre, Layer::Measure(z_form), post)
    }
}

impl FromIterator<MeasureTarget> for MeasureLayer {
    fn from_iter<T: IntoIterator<Item = MeasureTarget>>(iter: T) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
